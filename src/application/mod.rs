// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Orchestrates the other layers for one phase of a run.
//
// Rules for this layer:
//   - No ML math or model code here
//   - No argument parsing here (that's Layer 1)
//   - Only workflow coordination
//
// Reference: Clean Architecture pattern
//            Rust Book §7 (Module System)

// Choosing and loading the sample source
pub mod samples;

// The training workflow
pub mod train_use_case;

// The prediction / visualisation workflow
pub mod predict_use_case;
