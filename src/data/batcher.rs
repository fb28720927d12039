// ============================================================
// Layer 4: Review Batcher
// ============================================================
// Converts stacked batches into Burn tensors on the target
// device.
//
//   SampleBatch { features: [N * F] f32, labels: [N] usize }
//        │
//        ▼
//   ReviewBatch { features: Tensor [N, F], labels: Tensor<Int> [N] }
//
// The batch iterator already stacked the rows, so this is just
// one from_floats + reshape and one from_ints.
//
// Reference: Burn Book §4 (Batcher)

use burn::prelude::*;

use crate::data::batch_iter::SampleBatch;

// ─── ReviewBatch ──────────────────────────────────────────────────────────────
#[derive(Debug, Clone)]
pub struct ReviewBatch<B: Backend> {
    /// Presence-encoded reviews, shape: [batch_size, feature_dim]
    pub features: Tensor<B, 2>,

    /// Label indices, shape: [batch_size]
    pub labels: Tensor<B, 1, Int>,
}

// ─── ReviewBatcher ────────────────────────────────────────────────────────────
#[derive(Clone, Debug)]
pub struct ReviewBatcher<B: Backend> {
    pub device: B::Device,
}

impl<B: Backend> ReviewBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }

    /// Move an already stacked batch onto the device.
    pub fn to_tensors(&self, batch: &SampleBatch) -> ReviewBatch<B> {
        let rows = batch.num_rows();

        let features = Tensor::<B, 1>::from_floats(
            batch.features.as_slice(), &self.device
        ).reshape([rows, batch.feature_dim]);

        let labels: Vec<i32> = batch.labels.iter().map(|&l| l as i32).collect();
        let labels = Tensor::<B, 1, Int>::from_ints(labels.as_slice(), &self.device);

        ReviewBatch { features, labels }
    }
}
