// ============================================================
// Layer 3: Domain Layer
// ============================================================
// Plain Rust structs, enums and traits that name the core
// concepts of the system: a labelled review, the split it
// belongs to, and the errors the data pipeline can raise.
//
// Rules for this layer:
//   - NO Burn framework types allowed here
//   - NO file I/O
//   - Only plain Rust structs, enums, and traits
//
// Reference: Rust Book §5 (Structs), §6 (Enums), §10 (Traits)

// Review records and the train/val/test split tag
pub mod review;

// Typed errors for vocabulary and dataset operations
pub mod error;

// Core abstractions (traits) that other layers implement
pub mod traits;
