// ============================================================
// Layer 2: PredictUseCase
// ============================================================
// Loads the artefacts written by `train` and classifies reviews:
//
//   save_dir/vectorizer.json         ─┐
//   save_dir/classifier_config.json  ─┼─▶ Inferencer
//   save_dir/classifier.mpk.gz       ─┘
//
// The vectorizer is always the saved one; rebuilding it from
// data would silently change the feature layout.

use std::path::Path;

use anyhow::Result;

use crate::infra::{checkpoint::CheckpointManager, vectorizer_store::VectorizerStore};
use crate::ml::inferencer::{InfluentialWords, Inferencer, Prediction};

pub struct PredictUseCase {
    inferencer: Inferencer,
}

impl PredictUseCase {
    pub fn new(save_dir: impl AsRef<Path>, threshold: f64) -> Result<Self> {
        let save_dir   = save_dir.as_ref();
        let vectorizer = VectorizerStore::new(save_dir).load()?;
        let ckpt       = CheckpointManager::new(save_dir);
        let inferencer = Inferencer::from_checkpoint(&ckpt, vectorizer)?
            .with_threshold(threshold);
        Ok(Self { inferencer })
    }

    pub fn predict(&self, review: &str) -> Result<Prediction> {
        self.inferencer.predict(review)
    }

    pub fn influential_words(&self, k: usize) -> Result<InfluentialWords> {
        self.inferencer.influential_words(k)
    }
}
