// ============================================================
// Layer 6: Checkpoint Manager
// ============================================================
// Saves and restores the classifier using Burn's CompactRecorder.
//
// What gets saved:
//   1. classifier.mpk.gz        : weights of the best epoch so far
//   2. best_epoch.json          : which epoch those weights are from
//   3. classifier_config.json   : ReviewClassifierConfig (input width)
//   4. train_config.json        : hyperparameters of the run
//
// classifier_config.json is what lets inference rebuild a model
// of the right shape, and what the drift check compares against
// the vectorizer's feature dimension.
//
// File layout:
//   <save_dir>/
//     classifier.mpk.gz
//     best_epoch.json
//     classifier_config.json
//     train_config.json
//     vectorizer.json        ← written by VectorizerStore
//     metrics.csv            ← written by MetricsLogger
//
// Reference: Burn Book §5 (Records and Checkpointing)
//            Rust Book §9 (Error Handling)

use anyhow::{bail, Context, Result};
use std::{fs, path::{Path, PathBuf}};
use burn::{
    prelude::*,
    record::{CompactRecorder, Recorder},
};
use serde::{de::DeserializeOwned, Serialize};

use crate::application::train_use_case::TrainConfig;
use crate::ml::model::{ReviewClassifier, ReviewClassifierConfig};

const MODEL_FILE:             &str = "classifier";
const BEST_EPOCH_FILE:        &str = "best_epoch.json";
const CLASSIFIER_CONFIG_FILE: &str = "classifier_config.json";
const TRAIN_CONFIG_FILE:      &str = "train_config.json";

/// Manages saving and loading of model checkpoints.
/// All files are stored in the configured directory.
pub struct CheckpointManager {
    dir: PathBuf,
}

impl CheckpointManager {
    /// Create a new CheckpointManager.
    /// Creates the directory if it doesn't already exist.
    pub fn new(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref().to_path_buf();
        // .ok(): an unwritable directory surfaces on the first save instead
        fs::create_dir_all(&dir).ok();
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Overwrite the stored weights with `model`, tagged with `epoch`.
    pub fn save_model<B: Backend>(
        &self,
        model: &ReviewClassifier<B>,
        epoch: usize,
    ) -> Result<()> {
        // The recorder appends its own extension
        let path = self.dir.join(MODEL_FILE);

        CompactRecorder::new()
            .record(model.clone().into_record(), path.clone())
            .with_context(|| {
                format!("Failed to save checkpoint to '{}'", path.display())
            })?;

        self.write_json(BEST_EPOCH_FILE, &epoch)?;

        tracing::debug!("Saved checkpoint: epoch {}", epoch);
        Ok(())
    }

    /// Load the stored weights into `model`, which must have the
    /// architecture the checkpoint was saved with.
    pub fn load_model<B: Backend>(
        &self,
        model:  ReviewClassifier<B>,
        device: &B::Device,
    ) -> Result<ReviewClassifier<B>> {
        let path = self.dir.join(MODEL_FILE);

        let record = CompactRecorder::new()
            .load(path.clone(), device)
            .with_context(|| {
                format!("Cannot load checkpoint '{}'. Have you trained the model first?",
                    path.display())
            })?;

        let expected = model.fc.weight.val().dims();
        let model    = model.load_record(record);
        let found    = model.fc.weight.val().dims();
        if found != expected {
            bail!(
                "Checkpoint '{}' holds weights of shape {:?}, but the classifier expects {:?}. \
                 Retrain so weights, classifier config and vectorizer come from one run.",
                path.display(), found, expected
            );
        }

        tracing::info!("Loaded classifier weights from epoch {}", self.best_epoch()?);
        Ok(model)
    }

    /// Epoch of the stored weights.
    pub fn best_epoch(&self) -> Result<usize> {
        self.read_json(BEST_EPOCH_FILE)
    }

    pub fn save_config(&self, cfg: &TrainConfig) -> Result<()> {
        self.write_json(TRAIN_CONFIG_FILE, cfg)
    }

    pub fn load_config(&self) -> Result<TrainConfig> {
        self.read_json(TRAIN_CONFIG_FILE)
    }

    pub fn save_classifier_config(&self, cfg: &ReviewClassifierConfig) -> Result<()> {
        self.write_json(CLASSIFIER_CONFIG_FILE, cfg)
    }

    pub fn load_classifier_config(&self) -> Result<ReviewClassifierConfig> {
        self.read_json(CLASSIFIER_CONFIG_FILE)
    }

    fn write_json<T: Serialize + ?Sized>(&self, name: &str, value: &T) -> Result<()> {
        let path = self.dir.join(name);
        let json = serde_json::to_string_pretty(value)?;
        fs::write(&path, json)
            .with_context(|| format!("Cannot write '{}'", path.display()))?;
        tracing::debug!("Saved '{}'", path.display());
        Ok(())
    }

    fn read_json<T: DeserializeOwned>(&self, name: &str) -> Result<T> {
        let path = self.dir.join(name);
        let json = fs::read_to_string(&path)
            .with_context(|| {
                format!(
                    "Cannot read '{}'. Make sure you have run 'train' first.",
                    path.display()
                )
            })?;
        serde_json::from_str(&json)
            .with_context(|| format!("Cannot parse '{}'", path.display()))
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TestBackend = NdArray;

    #[test]
    fn test_config_round_trip() {
        let dir  = tempfile::tempdir().unwrap();
        let ckpt = CheckpointManager::new(dir.path());

        let cfg = TrainConfig { batch_size: 16, seed: 7, ..TrainConfig::default() };
        ckpt.save_config(&cfg).unwrap();
        let loaded = ckpt.load_config().unwrap();
        assert_eq!(loaded.batch_size, 16);
        assert_eq!(loaded.seed, 7);

        ckpt.save_classifier_config(&ReviewClassifierConfig::new(42)).unwrap();
        assert_eq!(ckpt.load_classifier_config().unwrap().num_features, 42);
    }

    #[test]
    fn test_model_round_trip_keeps_shape_and_epoch() {
        let dir    = tempfile::tempdir().unwrap();
        let ckpt   = CheckpointManager::new(dir.path());
        let device = Default::default();
        let cfg    = ReviewClassifierConfig::new(4);

        let model: ReviewClassifier<TestBackend> = cfg.init(&device);
        ckpt.save_model(&model, 3).unwrap();

        let fresh: ReviewClassifier<TestBackend> = cfg.init(&device);
        let loaded = ckpt.load_model(fresh, &device).unwrap();
        assert_eq!(ckpt.best_epoch().unwrap(), 3);

        // Half-precision storage: compare with a tolerance
        let before = model.feature_weights().unwrap();
        let after  = loaded.feature_weights().unwrap();
        assert_eq!(before.len(), after.len());
        for (a, b) in before.iter().zip(&after) {
            assert!((a - b).abs() < 1e-2, "{a} vs {b}");
        }
    }

    #[test]
    fn test_load_rejects_weights_of_another_shape() {
        let dir    = tempfile::tempdir().unwrap();
        let ckpt   = CheckpointManager::new(dir.path());
        let device = Default::default();

        let narrow: ReviewClassifier<TestBackend> = ReviewClassifierConfig::new(4).init(&device);
        ckpt.save_model(&narrow, 1).unwrap();

        let wide: ReviewClassifier<TestBackend> = ReviewClassifierConfig::new(8).init(&device);
        let err = ckpt.load_model(wide, &device).unwrap_err();
        assert!(err.to_string().contains("[4, 1]"), "{err}");
    }

    #[test]
    fn test_missing_checkpoint_is_an_error() {
        let dir  = tempfile::tempdir().unwrap();
        let ckpt = CheckpointManager::new(dir.path());
        assert!(ckpt.load_config().is_err());
        assert!(ckpt.best_epoch().is_err());
    }
}
