// ============================================================
// Layer 2: PrepareUseCase
// ============================================================
// Turns a raw `rating,review` CSV into the split table the
// trainer expects:
//
//   Step 1: Load raw reviews              (Layer 4 - data)
//   Step 2: Clean review text             (Layer 4 - data)
//   Step 3: Stratified train/val/test     (Layer 4 - data)
//   Step 4: Write rating,review,split CSV (Layer 4 - data)

use std::path::PathBuf;

use anyhow::Result;

use crate::data::{
    loader::{load_raw, write_records},
    preprocessor::Preprocessor,
    splitter::{assign_splits, SplitRatios},
};
use crate::domain::review::Split;

#[derive(Debug, Clone)]
pub struct PrepareConfig {
    pub raw_csv:    PathBuf,
    pub output_csv: PathBuf,
    pub ratios:     SplitRatios,
    pub seed:       u64,
}

/// Number of reviews written per split, in `Split::ALL` order.
pub type SplitCounts = [usize; 3];

pub struct PrepareUseCase {
    config: PrepareConfig,
}

impl PrepareUseCase {
    pub fn new(config: PrepareConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<SplitCounts> {
        let cfg = &self.config;

        // ── Step 1 ────────────────────────────────────────────────────────────
        let mut reviews = load_raw(&cfg.raw_csv)?;

        // ── Step 2 ────────────────────────────────────────────────────────────
        let preprocessor = Preprocessor::new();
        for review in &mut reviews {
            review.text = preprocessor.clean(&review.text);
        }

        // ── Step 3 ────────────────────────────────────────────────────────────
        let records = assign_splits(reviews, cfg.ratios, cfg.seed);

        let mut counts: SplitCounts = [0; 3];
        for split in Split::ALL {
            counts[split.position()] = records.iter().filter(|r| r.split == split.as_str()).count();
        }
        tracing::info!(
            "Assigned {} train, {} val, {} test",
            counts[0], counts[1], counts[2],
        );

        // ── Step 4 ────────────────────────────────────────────────────────────
        write_records(&cfg.output_csv, &records)?;
        Ok(counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::ReviewCsvLoader;
    use crate::domain::traits::RecordSource;
    use std::fs;

    #[test]
    fn test_prepare_cleans_and_splits() {
        let dir = tempfile::tempdir().unwrap();
        let raw = dir.path().join("raw.csv");

        let mut body = String::from("rating,review\n");
        for i in 0..20 {
            body.push_str(&format!("positive,\"Loved it!! {i}\"\n"));
            body.push_str(&format!("negative,\"Hated it... {i}\"\n"));
        }
        fs::write(&raw, body).unwrap();

        let cfg = PrepareConfig {
            raw_csv:    raw,
            output_csv: dir.path().join("split.csv"),
            ratios:     SplitRatios::default(),
            seed:       1337,
        };
        let counts = PrepareUseCase::new(cfg.clone()).execute().unwrap();
        assert_eq!(counts, [28, 6, 6]);

        let records = ReviewCsvLoader::new(&cfg.output_csv).load_all().unwrap();
        assert_eq!(records.len(), 40);
        assert!(records.iter().any(|r| r.text == "loved it ! !"));
        assert!(records.iter().all(|r| !r.text.chars().any(|c| c.is_ascii_digit())));
    }
}
