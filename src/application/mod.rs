// ============================================================
// Layer 2: Application / Use Cases
// ============================================================
// This layer orchestrates the other layers to accomplish one
// user-facing goal each.
//
// Rules for this layer:
//   - No ML math or model code here
//   - No printing here (that's Layer 1)
//   - Only workflow coordination
//
// Reference: Clean Architecture pattern
//            Rust Book §7 (Module System)

// Raw CSV → cleaned, stratified split CSV
pub mod prepare_use_case;

// The training workflow
pub mod train_use_case;

// The inference workflow
pub mod predict_use_case;
