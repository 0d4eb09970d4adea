// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust types shared by every other layer:
//
//   sample.rs    — one grayscale face crop + its 42 landmark values
//   landmarks.rs — landmark layout constants and pixel conversion
//   rotation.rs  — the augmentation policy selector
//   progress.rs  — per-batch and per-epoch training records
//   traits.rs    — seams implemented by the data and infra layers
//
// Rules for this layer:
//   - NO Burn framework types allowed here
//   - NO file I/O
//   - Only plain Rust structs, enums, and traits

pub mod sample;

pub mod landmarks;

pub mod rotation;

pub mod progress;

// Core abstractions (traits) that other layers implement
pub mod traits;
