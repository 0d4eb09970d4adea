// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Cross-cutting concerns that don't belong to one business
// layer:
//
//   checkpoint.rs — Saving and loading detector weights
//                   (NamedMpkFileRecorder, full precision) and
//                   the run's TrainConfig as JSON.
//
//   epoch_log.rs  — The plain-text per-epoch loss log.
//
//   progress.rs   — Console rendering of the training
//                   transcript (TrainingObserver impl).
//
//   annotate.rs   — Draws ground-truth and predicted landmarks
//                   onto a grayscale crop.
//
//   viewer.rs     — Writes annotated frames to disk and steps
//                   through them on key presses.
//
// Reference: Rust Book §7 (Modules)
//            Rust Book §9 (Error Handling with anyhow)
//            Burn Book §5 (Checkpointing)

/// Model checkpoint saving and loading
pub mod checkpoint;

/// Per-epoch loss log file
pub mod epoch_log;

/// Console training transcript
pub mod progress;

/// Landmark markers on prediction frames
pub mod annotate;

/// PNG frame output with stdin stepping
pub mod viewer;
