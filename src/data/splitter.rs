// ============================================================
// Layer 4: Stratified Split Assignment
// ============================================================
// Tags every raw review with train / val / test so that each
// label keeps the same proportions in all three splits.
//
//   positive reviews ──shuffle──▶ [ train 70% | val 15% | test 15% ]
//   negative reviews ──shuffle──▶ [ train 70% | val 15% | test 15% ]
//
// The shuffle uses a StdRng seeded by the caller (Fisher-Yates
// via rand::seq::SliceRandom), and labels are visited in sorted
// order, so the same corpus and seed always produce the same
// assignment.
//
// Reference: Rust Book §8 (Vectors)
//            rand crate documentation

use std::collections::BTreeMap;

use anyhow::{bail, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::domain::review::{RawReview, ReviewRecord, Split};

/// Fractions of each label group assigned to train and val.
/// Test receives whatever is left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitRatios {
    pub train: f64,
    pub val:   f64,
}

impl SplitRatios {
    pub fn new(train: f64, val: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&train) || !(0.0..=1.0).contains(&val) {
            bail!("split ratios must lie in [0, 1], got train={train}, val={val}");
        }
        if train + val > 1.0 + f64::EPSILON {
            bail!("train + val ratios exceed 1.0 ({train} + {val})");
        }
        Ok(Self { train, val })
    }

    pub fn test(&self) -> f64 {
        (1.0 - self.train - self.val).max(0.0)
    }
}

impl Default for SplitRatios {
    fn default() -> Self {
        Self { train: 0.70, val: 0.15 }
    }
}

/// Assign a split to every review, stratified by label.
pub fn assign_splits(reviews: Vec<RawReview>, ratios: SplitRatios, seed: u64) -> Vec<ReviewRecord> {
    let total = reviews.len();

    let mut by_label: BTreeMap<String, Vec<RawReview>> = BTreeMap::new();
    for review in reviews {
        by_label.entry(review.label.clone()).or_default().push(review);
    }

    let mut rng     = StdRng::seed_from_u64(seed);
    let mut records = Vec::with_capacity(total);

    for (label, mut group) in by_label {
        group.shuffle(&mut rng);

        let n       = group.len();
        let n_train = (((n as f64) * ratios.train).round() as usize).min(n);
        let n_val   = (((n as f64) * ratios.val).round() as usize).min(n - n_train);

        tracing::debug!(
            "Label '{}': {} train, {} val, {} test",
            label, n_train, n_val, n - n_train - n_val,
        );

        for (i, review) in group.into_iter().enumerate() {
            let split = if i < n_train {
                Split::Train
            } else if i < n_train + n_val {
                Split::Val
            } else {
                Split::Test
            };
            records.push(review.into_record(split));
        }
    }

    records
}
