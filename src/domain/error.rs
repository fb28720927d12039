// ============================================================
// Layer 3: Pipeline Errors
// ============================================================
// The vocabulary and dataset code is pure computation, so every
// failure is a caller or data-integrity problem. Each one gets
// its own variant and is propagated unchanged: nothing in the
// pipeline retries, clamps, or silently substitutes a default.
//
// The application layer wraps these in anyhow::Error with
// extra context; inside the data layer they stay typed so tests
// can match on the exact failure.
//
// Reference: Rust Book §9 (Recoverable Errors with Result)
//            thiserror crate documentation

use thiserror::Error;

/// Errors raised by `Vocabulary` lookups and deserialisation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VocabularyError {
    /// The token is absent and the vocabulary has no unknown fallback.
    #[error("token '{0}' is not in the vocabulary and no unknown token is configured")]
    KeyLookup(String),

    /// The index lies outside `[0, size)`.
    #[error("index {index} is out of range for a vocabulary of size {size}")]
    IndexLookup { index: usize, size: usize },

    /// A serialised vocabulary could not be turned back into a valid mapping.
    #[error("malformed serialized vocabulary: {0}")]
    Malformed(String),
}

/// Errors raised while partitioning, activating, or reading a dataset split.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DatasetError {
    /// A record carried a split tag other than train/val/test.
    #[error("record {row} has split tag '{tag}', expected one of: train, val, test")]
    InvalidSplitTag { row: usize, tag: String },

    /// A caller asked for a split name that does not exist.
    #[error("unknown split '{0}', expected one of: train, val, test")]
    UnknownSplit(String),

    /// Indexed access past the end of the active split.
    #[error("index {index} is out of range for the '{split}' split of length {len}")]
    IndexOutOfRange {
        split: &'static str,
        index: usize,
        len:   usize,
    },

    /// Batches must contain at least one example.
    #[error("batch size must be at least 1")]
    ZeroBatchSize,

    /// A label or token lookup failed while building a sample.
    #[error(transparent)]
    Vocabulary(#[from] VocabularyError),
}
