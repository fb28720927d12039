// ============================================================
// Layer 1: CLI Commands and Arguments
// ============================================================
// Defines the three subcommands: `prepare`, `train` and
// `predict`, plus all their configurable flags.
//
// clap's derive macros automatically generate:
//   - help text (--help)
//   - error messages for missing args
//   - type conversion (string → usize, f64, etc.)
//
// Reference: Rust Book §12 (Building a CLI Program)

use std::path::PathBuf;

use clap::{Args, Subcommand};
use crate::application::train_use_case::TrainConfig;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Clean a raw rating,review CSV and assign train/val/test splits
    Prepare(PrepareArgs),

    /// Train the review classifier on a split CSV
    Train(TrainArgs),

    /// Classify a review with a trained model
    Predict(PredictArgs),
}

#[derive(Args, Debug)]
pub struct PrepareArgs {
    /// Raw CSV with `rating` and `review` columns
    #[arg(long)]
    pub raw_csv: PathBuf,

    /// Where to write the rating,review,split table
    #[arg(long, default_value = "data/reviews_with_splits.csv")]
    pub output_csv: PathBuf,

    /// Fraction of each label assigned to train
    #[arg(long, default_value_t = 0.70)]
    pub train_proportion: f64,

    /// Fraction of each label assigned to val; the rest is test
    #[arg(long, default_value_t = 0.15)]
    pub val_proportion: f64,

    #[arg(long, default_value_t = 1337)]
    pub seed: u64,
}

/// All arguments for the `train` command.
/// Each field becomes a --flag on the command line.
#[derive(Args, Debug)]
pub struct TrainArgs {
    /// Split review table produced by `prepare`
    #[arg(long, default_value = "data/reviews_with_splits.csv")]
    pub dataset_csv: PathBuf,

    /// Directory for the vectorizer, checkpoint and metrics
    #[arg(long, default_value = "model_storage")]
    pub save_dir: PathBuf,

    /// Keep only tokens seen MORE than this many times in train
    #[arg(long, default_value_t = 25)]
    pub frequency_cutoff: usize,

    #[arg(long, default_value_t = 128)]
    pub batch_size: usize,

    #[arg(long, default_value_t = 100)]
    pub epochs: usize,

    #[arg(long, default_value_t = 0.001)]
    pub lr: f64,

    /// Epochs without validation improvement before stopping (0 = never)
    #[arg(long, default_value_t = 5)]
    pub early_stopping_criteria: usize,

    #[arg(long, default_value_t = 1337)]
    pub seed: u64,

    /// Reuse the vectorizer already saved in --save-dir
    #[arg(long)]
    pub reload_vectorizer: bool,
}

/// Convert CLI TrainArgs into the application-layer TrainConfig.
/// The application layer never sees clap types.
impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            dataset_csv:             a.dataset_csv,
            save_dir:                a.save_dir,
            frequency_cutoff:        a.frequency_cutoff,
            batch_size:              a.batch_size,
            epochs:                  a.epochs,
            lr:                      a.lr,
            early_stopping_criteria: a.early_stopping_criteria,
            seed:                    a.seed,
            reload_vectorizer:       a.reload_vectorizer,
        }
    }
}

#[derive(Args, Debug)]
pub struct PredictArgs {
    /// The review text to classify
    #[arg(long)]
    pub review: String,

    /// Directory the model was trained into
    #[arg(long, default_value = "model_storage")]
    pub save_dir: PathBuf,

    /// Probability above which the second label is predicted
    #[arg(long, default_value_t = 0.5)]
    pub threshold: f64,

    /// Also print this many most influential words per label
    #[arg(long, default_value_t = 0)]
    pub top_words: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser, Debug)]
    struct TestCli {
        #[command(subcommand)]
        command: Commands,
    }

    #[test]
    fn test_train_defaults_map_to_config() {
        let cli = TestCli::parse_from(["bin", "train"]);
        let Commands::Train(args) = cli.command else { panic!("expected train") };
        let cfg: TrainConfig = args.into();
        assert_eq!(cfg.frequency_cutoff, 25);
        assert_eq!(cfg.batch_size, 128);
        assert_eq!(cfg.early_stopping_criteria, 5);
        assert!(!cfg.reload_vectorizer);
    }

    #[test]
    fn test_predict_requires_review() {
        assert!(TestCli::try_parse_from(["bin", "predict"]).is_err());
        let cli = TestCli::try_parse_from(["bin", "predict", "--review", "great", "--top-words", "3"]).unwrap();
        let Commands::Predict(args) = cli.command else { panic!("expected predict") };
        assert_eq!(args.top_words, 3);
    }
}
