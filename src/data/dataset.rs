// ============================================================
// Layer 4: Split Dataset
// ============================================================
// Wraps the full record table together with a vectorizer and
// exposes one split at a time:
//
//   records:    [r0 train] [r1 val] [r2 train] [r3 test] ...
//   partitions: train → [0, 2, ...]   val → [1, ...]   test → [3, ...]
//
// The partitions are index lists into the immutable record
// table, so each record belongs to exactly one of them and
// switching the active split never touches the records.
//
// `get` vectorises on demand:
//   record.text  → vectorizer.vectorize()   → features
//   record.label → vectorizer.label_index() → label
//
// Reference: Rust Book §8 (Vectors), §10 (Traits)

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::data::vectorizer::ReviewVectorizer;
use crate::domain::error::DatasetError;
use crate::domain::review::{ReviewRecord, Split};
use crate::domain::traits::IndexedDataset;

/// One vectorised example.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewSample {
    /// Presence-encoded review, length = vectorizer feature dimension
    pub features: Vec<f32>,
    /// Index of the label in the label vocabulary
    pub label:    usize,
}

pub struct SplitDataset {
    records:    Vec<ReviewRecord>,
    vectorizer: Arc<ReviewVectorizer>,
    /// Record indices per split, in `Split::ALL` order
    partitions: [Vec<usize>; 3],
    active:     Split,
}

impl SplitDataset {
    /// Partition `records` by split tag. The active split starts as train.
    pub fn new(
        records:    Vec<ReviewRecord>,
        vectorizer: Arc<ReviewVectorizer>,
    ) -> Result<Self, DatasetError> {
        let partitions = partition(&records)?;
        Ok(Self {
            records,
            vectorizer,
            partitions,
            active: Split::Train,
        })
    }

    /// Build a fresh vectorizer from the TRAIN records only, then
    /// wrap the whole table with it.
    pub fn with_fresh_vectorizer(
        records:          Vec<ReviewRecord>,
        frequency_cutoff: usize,
    ) -> Result<Self, DatasetError> {
        let partitions = partition(&records)?;

        let train_records: Vec<ReviewRecord> = partitions[Split::Train.position()]
            .iter()
            .map(|&i| records[i].clone())
            .collect();
        let vectorizer = ReviewVectorizer::from_corpus(&train_records, frequency_cutoff);

        tracing::info!(
            "Vectorizer built from {} training reviews: {} features, {} labels",
            train_records.len(),
            vectorizer.feature_dim(),
            vectorizer.num_labels(),
        );

        Ok(Self {
            records,
            vectorizer: Arc::new(vectorizer),
            partitions,
            active: Split::Train,
        })
    }

    /// Wrap `records` with a previously persisted vectorizer.
    pub fn with_vectorizer(
        records:    Vec<ReviewRecord>,
        vectorizer: Arc<ReviewVectorizer>,
    ) -> Result<Self, DatasetError> {
        Self::new(records, vectorizer)
    }

    /// Activate a split by name ("train", "val" or "test").
    pub fn set_split(&mut self, name: &str) -> Result<(), DatasetError> {
        self.active = name.parse()?;
        Ok(())
    }

    /// Activate a split.
    pub fn set_active(&mut self, split: Split) {
        self.active = split;
    }

    pub fn active_split(&self) -> Split {
        self.active
    }

    /// Size of any split, regardless of which one is active.
    pub fn split_len(&self, split: Split) -> usize {
        self.partitions[split.position()].len()
    }

    /// Size of the whole record table.
    pub fn total_len(&self) -> usize {
        self.records.len()
    }

    pub fn vectorizer(&self) -> &Arc<ReviewVectorizer> {
        &self.vectorizer
    }

    /// Number of batches the active split yields for `batch_size`.
    pub fn num_batches(&self, batch_size: usize, drop_last: bool) -> usize {
        if batch_size == 0 {
            return 0;
        }
        let len = self.len();
        if drop_last { len / batch_size } else { len.div_ceil(batch_size) }
    }

    /// The raw record at `index` of the active split.
    pub fn record(&self, index: usize) -> Result<&ReviewRecord, DatasetError> {
        let active = &self.partitions[self.active.position()];
        active
            .get(index)
            .map(|&row| &self.records[row])
            .ok_or(DatasetError::IndexOutOfRange {
                split: self.active.as_str(),
                index,
                len:   active.len(),
            })
    }
}

impl IndexedDataset for SplitDataset {
    type Item = ReviewSample;

    fn len(&self) -> usize {
        self.split_len(self.active)
    }

    fn get(&self, index: usize) -> Result<ReviewSample, DatasetError> {
        let record   = self.record(index)?;
        let features = self.vectorizer.vectorize(&record.text)?;
        let label    = self.vectorizer.label_index(&record.label)?;
        Ok(ReviewSample { features, label })
    }
}

/// Group record indices by split tag, rejecting unknown tags.
fn partition(records: &[ReviewRecord]) -> Result<[Vec<usize>; 3], DatasetError> {
    let mut partitions: [Vec<usize>; 3] = Default::default();

    for (row, record) in records.iter().enumerate() {
        let split: Split = record.split.parse().map_err(|_| DatasetError::InvalidSplitTag {
            row,
            tag: record.split.clone(),
        })?;
        partitions[split.position()].push(row);
    }

    tracing::debug!(
        "Partitioned {} records: {} train, {} val, {} test",
        records.len(),
        partitions[0].len(),
        partitions[1].len(),
        partitions[2].len(),
    );

    Ok(partitions)
}
