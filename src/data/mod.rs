// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything between label files on disk and tensor batches:
//
//   train.txt / test.txt        (or SyntheticSource)
//       │
//       ▼
//   LabelFileSource   → parses labels, decodes + crops images
//       │
//       ▼
//   Preprocessor      → grayscale, resize, standardise
//       │
//       ▼
//   augment           → rotation policy on the training split
//       │
//       ▼
//   LandmarkDataset   → implements Burn's Dataset trait
//       │
//       ▼
//   LandmarkBatcher   → stacks samples into tensor batches
//       │
//       ▼
//   DataLoader        → feeds batches to the training loop
//
// Reference: Burn Book §4 (Datasets and Dataloaders)

/// Reads train.txt / test.txt label files and their images
pub mod loader;

/// Random but learnable samples for demos and tests
pub mod synthetic;

/// Grayscale conversion, resizing, standardisation and display
pub mod preprocessor;

/// Flip / rotation copies selected by the rotation policy
pub mod augment;

/// Implements Burn's Dataset trait for landmark samples
pub mod dataset;

/// Implements Burn's Batcher trait to create tensor batches
pub mod batcher;

/// Seeded train/validation split
pub mod splitter;
