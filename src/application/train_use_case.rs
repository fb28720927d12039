// ============================================================
// Layer 2: TrainUseCase
// ============================================================
// Orchestrates the full training pipeline in order:
//
//   Step 1: Load the split review CSV      (Layer 4 - data)
//   Step 2: Build or reload vectorizer     (Layer 4 / Layer 6)
//   Step 3: Wrap records in SplitDataset   (Layer 4 - data)
//   Step 4: Save train config + metrics    (Layer 6 - infra)
//   Step 5: Run training loop              (Layer 5 - ml)
//
// The vectorizer is NOT saved here: the trainer writes it next to
// the first checkpoint, so the saved vectorizer, classifier config
// and weights always belong to the same run.
//
// Reference: Rust Book §13 (Iterators and Closures)
//            Burn Book §5 (Training)

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::{dataset::SplitDataset, loader::ReviewCsvLoader};
use crate::domain::review::Split;
use crate::domain::traits::RecordSource;
use crate::infra::{
    checkpoint::CheckpointManager,
    metrics::MetricsLogger,
    vectorizer_store::VectorizerStore,
};
use crate::ml::trainer::{run_training, TrainReport};

// ─── Training Configuration ──────────────────────────────────────────────────
// All hyperparameters for a training run.
// Serialisable so it can be saved next to the checkpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    /// Split review table (rating,review,split)
    pub dataset_csv:             PathBuf,
    /// Directory for vectorizer, checkpoint, configs and metrics
    pub save_dir:                PathBuf,
    /// Tokens must occur MORE than this many times in train
    pub frequency_cutoff:        usize,
    pub batch_size:              usize,
    pub epochs:                  usize,
    pub lr:                      f64,
    /// Stale validation epochs tolerated before stopping; 0 disables
    pub early_stopping_criteria: usize,
    pub seed:                    u64,
    /// Reuse `save_dir/vectorizer.json` instead of rebuilding it
    pub reload_vectorizer:       bool,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            dataset_csv:             PathBuf::from("data/reviews_with_splits.csv"),
            save_dir:                PathBuf::from("model_storage"),
            frequency_cutoff:        25,
            batch_size:              128,
            epochs:                  100,
            lr:                      0.001,
            early_stopping_criteria: 5,
            seed:                    1337,
            reload_vectorizer:       false,
        }
    }
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    /// Execute the full training pipeline end to end
    pub fn execute(&self) -> Result<TrainReport> {
        let cfg = &self.config;

        // ── Step 1: Load records ──────────────────────────────────────────────
        let records = ReviewCsvLoader::new(&cfg.dataset_csv).load_all()?;

        // ── Steps 2-3: Vectorizer + dataset ───────────────────────────────────
        // A fresh vectorizer only ever sees the train split.
        let store = VectorizerStore::new(&cfg.save_dir);
        let mut dataset = if cfg.reload_vectorizer && store.exists() {
            let vectorizer = store.load()?;
            SplitDataset::with_vectorizer(records, Arc::new(vectorizer))?
        } else {
            SplitDataset::with_fresh_vectorizer(records, cfg.frequency_cutoff)
                .context("Cannot build dataset from review table")?
        };

        tracing::info!(
            "Dataset: {} train, {} val, {} test",
            dataset.split_len(Split::Train),
            dataset.split_len(Split::Val),
            dataset.split_len(Split::Test),
        );

        // ── Step 4: Save run config ───────────────────────────────────────────
        let ckpt_manager = CheckpointManager::new(&cfg.save_dir);
        ckpt_manager.save_config(cfg)?;
        let metrics = MetricsLogger::new(&cfg.save_dir)?;

        // ── Step 5: Run training loop (Layer 5) ───────────────────────────────
        run_training(cfg, &mut dataset, &ckpt_manager, &metrics)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::write_records;
    use crate::domain::review::ReviewRecord;
    use crate::domain::traits::Persistable;
    use crate::data::vectorizer::ReviewVectorizer;

    fn write_table(path: &std::path::Path) {
        let mut records = Vec::new();
        for split in ["train", "train", "val", "test"] {
            records.push(ReviewRecord::new("positive", "lovely fresh bread", split));
            records.push(ReviewRecord::new("negative", "stale cold bread",   split));
        }
        write_records(path, &records).unwrap();
    }

    #[test]
    fn test_execute_writes_all_artefacts() {
        let dir = tempfile::tempdir().unwrap();
        let csv = dir.path().join("reviews.csv");
        write_table(&csv);

        let cfg = TrainConfig {
            dataset_csv:      csv,
            save_dir:         dir.path().join("model"),
            frequency_cutoff: 0,
            batch_size:       2,
            epochs:           2,
            ..TrainConfig::default()
        };
        let report = TrainUseCase::new(cfg.clone()).execute().unwrap();
        assert!(report.epochs_run >= 1);

        let saved = ReviewVectorizer::load(&cfg.save_dir.join("vectorizer.json")).unwrap();
        // <UNK>, lovely, fresh, bread, stale, cold
        assert_eq!(saved.feature_dim(), 6);
        assert!(cfg.save_dir.join("train_config.json").exists());
        assert!(cfg.save_dir.join("metrics.csv").exists());
    }

    #[test]
    fn test_reload_vectorizer_reuses_saved_file() {
        let dir = tempfile::tempdir().unwrap();
        let csv = dir.path().join("reviews.csv");
        write_table(&csv);
        let save_dir = dir.path().join("model");

        // A vectorizer that knows only one review token
        let mut tokens = crate::data::vocabulary::Vocabulary::with_unknown();
        tokens.add_token("bread");
        let mut labels = crate::data::vocabulary::Vocabulary::without_unknown();
        labels.add_many(["positive", "negative"]);
        VectorizerStore::new(&save_dir)
            .save(&ReviewVectorizer::new(tokens, labels).unwrap())
            .unwrap();

        let cfg = TrainConfig {
            dataset_csv:       csv,
            save_dir:          save_dir.clone(),
            batch_size:        2,
            epochs:            1,
            reload_vectorizer: true,
            ..TrainConfig::default()
        };
        TrainUseCase::new(cfg).execute().unwrap();

        let ckpt = CheckpointManager::new(&save_dir);
        assert_eq!(ckpt.load_classifier_config().unwrap().num_features, 2);
    }
}
