// ============================================================
// Layer 5: ML / Model Layer (Burn)
// ============================================================
// The Burn-specific model code: the classifier, the training
// loop and the inference engine.
//
//   model.rs      - Linear classifier over the presence-encoded
//                   review, producing one raw logit per example;
//                   BCE-with-logits loss and accuracy helpers
//
//   trainer.rs    - Epoch loop: Adam updates on the train split,
//                   validation, early stopping, best-model
//                   checkpointing, final test evaluation
//
//   inferencer.rs - Loads checkpoint + vectorizer, classifies
//                   single reviews, lists influential words
//
// Backends: the CPU ndarray backend by default, wgpu when the
// crate is built with `--features wgpu`.
//
// Reference: Burn Book §3 (Building Blocks)
//            Burn Book §5 (Training)

/// Linear review classifier
pub mod model;

/// Training loop with validation, early stopping and checkpointing
pub mod trainer;

/// Inference engine: loads artefacts and predicts labels
pub mod inferencer;

#[cfg(not(feature = "wgpu"))]
pub type InferBackend = burn::backend::NdArray;

#[cfg(feature = "wgpu")]
pub type InferBackend = burn::backend::Wgpu;

pub type TrainBackend = burn::backend::Autodiff<InferBackend>;

/// Default device of the configured backend.
pub fn default_device() -> <InferBackend as burn::tensor::backend::Backend>::Device {
    Default::default()
}
