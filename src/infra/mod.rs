// ============================================================
// Layer 6: Infrastructure Layer
// ============================================================
// Cross-cutting persistence that does not belong to any single
// business layer:
//
//   checkpoint.rs        - Saving and loading classifier weights
//                          (Burn CompactRecorder) plus the train
//                          and classifier configs as JSON.
//
//   vectorizer_store.rs  - Vectorizer persistence, and the check
//                          that a loaded vectorizer matches the
//                          classifier it is paired with.
//
//   metrics.rs           - Per-epoch loss/accuracy CSV log.
//
// Reference: Rust Book §7 (Modules)
//            Burn Book §5 (Checkpointing)

/// Model checkpoint saving and loading
pub mod checkpoint;

/// Vectorizer saving, loading and compatibility checks
pub mod vectorizer_store;

/// Training metrics CSV logger
pub mod metrics;
