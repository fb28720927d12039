// ============================================================
// Layer 4: Batch Iterator
// ============================================================
// Draws fixed-size batches from whatever split of a dataset is
// active, lazily: each batch is vectorised only when the
// iterator reaches it.
//
//   len = 10, batch_size = 4
//     drop_last = false → [4] [4] [2]
//     drop_last = true  → [4] [4]
//
// With `shuffle`, a fresh permutation of 0..len is drawn from
// the caller's RNG on every call, so one call = one epoch and
// every epoch sees a new order. The iterator itself is one-shot;
// calling `generate_batches` again restarts from scratch.
//
// Each batch stacks its feature vectors row by row into one
// flat matrix (row-major) plus a label vector in the same order.
//
// Reference: Rust Book §13 (Iterators)
//            rand crate documentation (SliceRandom)

use rand::seq::SliceRandom;
use rand::Rng;

use crate::data::dataset::ReviewSample;
use crate::domain::error::DatasetError;
use crate::domain::traits::IndexedDataset;

// ─── SampleBatch ──────────────────────────────────────────────────────────────
/// A stacked batch: `features` has shape (rows, feature_dim), `labels` (rows,).
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBatch {
    /// Row-major feature matrix
    pub features:    Vec<f32>,
    pub feature_dim: usize,
    pub labels:      Vec<usize>,
}

impl SampleBatch {
    /// Stack samples in the given order.
    ///
    /// All samples are expected to share one feature dimension, which
    /// holds for anything produced by a single vectorizer.
    pub fn stack(samples: Vec<ReviewSample>) -> Self {
        let feature_dim = samples.first().map_or(0, |s| s.features.len());
        let mut features = Vec::with_capacity(samples.len() * feature_dim);
        let mut labels   = Vec::with_capacity(samples.len());

        for sample in samples {
            debug_assert_eq!(sample.features.len(), feature_dim);
            features.extend_from_slice(&sample.features);
            labels.push(sample.label);
        }

        Self { features, feature_dim, labels }
    }

    /// Number of examples in the batch.
    pub fn num_rows(&self) -> usize {
        self.labels.len()
    }

    /// Feature vector of example `i`.
    pub fn row(&self, i: usize) -> &[f32] {
        &self.features[i * self.feature_dim..(i + 1) * self.feature_dim]
    }
}

// ─── Batches ──────────────────────────────────────────────────────────────────
/// Lazy sequence of batches over one pass of a dataset.
pub struct Batches<'a, D> {
    dataset:     &'a D,
    order:       Vec<usize>,
    batch_size:  usize,
    num_batches: usize,
    next_batch:  usize,
}

impl<'a, D> Iterator for Batches<'a, D>
where
    D: IndexedDataset<Item = ReviewSample>,
{
    type Item = Result<SampleBatch, DatasetError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next_batch >= self.num_batches {
            return None;
        }

        let start = self.next_batch * self.batch_size;
        let end   = (start + self.batch_size).min(self.order.len());
        self.next_batch += 1;

        let samples: Result<Vec<ReviewSample>, DatasetError> = self.order[start..end]
            .iter()
            .map(|&i| self.dataset.get(i))
            .collect();

        Some(samples.map(SampleBatch::stack))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.num_batches - self.next_batch;
        (remaining, Some(remaining))
    }
}

impl<'a, D> ExactSizeIterator for Batches<'a, D> where D: IndexedDataset<Item = ReviewSample> {}

/// Start one pass over the active split of `dataset`.
pub fn generate_batches<'a, D, R>(
    dataset:    &'a D,
    batch_size: usize,
    shuffle:    bool,
    drop_last:  bool,
    rng:        &mut R,
) -> Result<Batches<'a, D>, DatasetError>
where
    D: IndexedDataset<Item = ReviewSample>,
    R: Rng + ?Sized,
{
    if batch_size == 0 {
        return Err(DatasetError::ZeroBatchSize);
    }

    let len = dataset.len();
    let mut order: Vec<usize> = (0..len).collect();
    if shuffle {
        order.shuffle(rng);
    }

    let num_batches = if drop_last { len / batch_size } else { len.div_ceil(batch_size) };

    Ok(Batches {
        dataset,
        order,
        batch_size,
        num_batches,
        next_batch: 0,
    })
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Dataset whose i-th sample has feature [i] and label i.
    struct Counting(usize);

    impl IndexedDataset for Counting {
        type Item = ReviewSample;

        fn len(&self) -> usize {
            self.0
        }

        fn get(&self, index: usize) -> Result<ReviewSample, DatasetError> {
            if index >= self.0 {
                return Err(DatasetError::IndexOutOfRange { split: "train", index, len: self.0 });
            }
            Ok(ReviewSample { features: vec![index as f32, 1.0], label: index })
        }
    }

    fn collect(ds: &Counting, batch_size: usize, shuffle: bool, drop_last: bool, seed: u64) -> Vec<SampleBatch> {
        let mut rng = StdRng::seed_from_u64(seed);
        generate_batches(ds, batch_size, shuffle, drop_last, &mut rng)
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap()
    }

    #[test]
    fn test_coverage_without_drop_last() {
        let ds      = Counting(10);
        let batches = collect(&ds, 4, false, false, 0);
        assert_eq!(batches.len(), 3);
        let sizes: Vec<usize> = batches.iter().map(SampleBatch::num_rows).collect();
        assert_eq!(sizes, vec![4, 4, 2]);
        assert_eq!(sizes.iter().sum::<usize>(), 10);
    }

    #[test]
    fn test_coverage_with_drop_last() {
        let ds      = Counting(10);
        let batches = collect(&ds, 4, true, true, 0);
        assert_eq!(batches.len(), 2);
        assert!(batches.iter().all(|b| b.num_rows() == 4));
    }

    #[test]
    fn test_exact_multiple_has_no_partial_batch() {
        let ds = Counting(8);
        assert_eq!(collect(&ds, 4, false, false, 0).len(), 2);
        assert_eq!(collect(&ds, 4, false, true, 0).len(), 2);
    }

    #[test]
    fn test_unshuffled_preserves_stored_order() {
        let ds      = Counting(5);
        let labels: Vec<usize> = collect(&ds, 2, false, false, 0)
            .into_iter()
            .flat_map(|b| b.labels)
            .collect();
        assert_eq!(labels, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_shuffled_pass_is_a_permutation() {
        let ds = Counting(50);
        let mut labels: Vec<usize> = collect(&ds, 7, true, false, 42)
            .into_iter()
            .flat_map(|b| b.labels)
            .collect();
        assert_ne!(labels, (0..50).collect::<Vec<_>>());
        labels.sort_unstable();
        assert_eq!(labels, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn test_each_call_redraws_the_permutation() {
        let ds      = Counting(50);
        let mut rng = StdRng::seed_from_u64(7);
        let first: Vec<usize> = generate_batches(&ds, 50, true, false, &mut rng)
            .unwrap()
            .flat_map(|b| b.unwrap().labels)
            .collect();
        let second: Vec<usize> = generate_batches(&ds, 50, true, false, &mut rng)
            .unwrap()
            .flat_map(|b| b.unwrap().labels)
            .collect();
        assert_ne!(first, second);
    }

    #[test]
    fn test_rows_stay_aligned_with_labels() {
        let ds = Counting(9);
        for batch in collect(&ds, 4, true, false, 3) {
            assert_eq!(batch.feature_dim, 2);
            for (i, &label) in batch.labels.iter().enumerate() {
                assert_eq!(batch.row(i), &[label as f32, 1.0]);
            }
        }
    }

    #[test]
    fn test_zero_batch_size_is_rejected() {
        let ds      = Counting(3);
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(
            generate_batches(&ds, 0, false, false, &mut rng),
            Err(DatasetError::ZeroBatchSize)
        ));
    }

    #[test]
    fn test_size_hint_counts_down() {
        let ds      = Counting(10);
        let mut rng = StdRng::seed_from_u64(0);
        let mut it  = generate_batches(&ds, 3, false, false, &mut rng).unwrap();
        assert_eq!(it.len(), 4);
        it.next();
        assert_eq!(it.len(), 3);
    }

    #[test]
    fn test_empty_dataset_yields_nothing() {
        let ds = Counting(0);
        assert!(collect(&ds, 4, true, false, 0).is_empty());
    }
}
