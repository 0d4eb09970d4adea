// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// All network and training code built on burn.
//
//   norm.rs       — batch normalisation with explicit train/eval
//                   and running-stat tracking flags
//
//   pool.rs       — 2x2 average pooling in ceil mode
//
//   model.rs      — the landmark detector CNN and its MSE loss
//
//   trainer.rs    — the training loop: forward, loss, backward,
//                   Adam step, validation, checkpoint, epoch log
//
//   inferencer.rs — loads a checkpoint and predicts landmarks
//
//   backend.rs    — ndarray (CPU) or wgpu (GPU) selection
//
// Reference: Burn Book §3 (Building Blocks)
//            Burn Book §5 (Training)

/// Explicit-mode batch normalisation
pub mod norm;

/// Ceil-mode average pooling
pub mod pool;

/// Landmark detector architecture
pub mod model;

/// Training loop with validation and checkpointing
pub mod trainer;

/// Inference engine for a saved checkpoint
pub mod inferencer;

/// CPU / GPU backend selection
pub mod backend;
