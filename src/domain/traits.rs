// ============================================================
// Layer 3: Core Traits (Abstractions)
// ============================================================
// The rest of the system programs against these traits rather
// than concrete types:
//   - SplitDataset implements IndexedDataset
//   - ReviewCsvLoader implements RecordSource
//   - ReviewVectorizer implements Persistable
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)
//            Rust Book §17 (Object Oriented Patterns)

use std::path::Path;

use anyhow::Result;

use crate::domain::error::DatasetError;
use crate::domain::review::ReviewRecord;

// ─── IndexedDataset ───────────────────────────────────────────────────────────
/// Anything that can report its length and hand out the item at a
/// given position. This is all the batch iterator needs to know.
pub trait IndexedDataset {
    /// The value produced for one position.
    type Item;

    /// Number of items currently visible.
    fn len(&self) -> usize;

    /// Build the item at `index`.
    ///
    /// Fails with `DatasetError::IndexOutOfRange` when
    /// `index >= self.len()`; implementations may raise other
    /// variants while building the item.
    fn get(&self, index: usize) -> Result<Self::Item, DatasetError>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ─── RecordSource ─────────────────────────────────────────────────────────────
/// Any component that can load the labelled, split-tagged record table.
pub trait RecordSource {
    fn load_all(&self) -> Result<Vec<ReviewRecord>>;
}

// ─── Persistable ──────────────────────────────────────────────────────────────
/// Any component whose state can be saved and restored from disk.
pub trait Persistable: Sized {
    /// Save this component's state to the given path
    fn save(&self, path: &Path) -> Result<()>;

    /// Load a component's state from the given path.
    fn load(path: &Path) -> Result<Self>;
}
