// ============================================================
// Layer 1: CLI / Presentation Layer
// ============================================================
// This is the entry point for all user interaction.
// It uses the `clap` crate to parse command line arguments.
// All business logic is delegated to Layer 2 (application).
//
// Three commands are supported:
//   1. `prepare` : raw reviews → cleaned, split CSV
//   2. `train`   : split CSV → vectorizer + classifier checkpoint
//   3. `predict` : loads the checkpoint and classifies a review
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, PredictArgs, PrepareArgs, TrainArgs};

/// The main CLI struct; clap generates the argument parsing
/// via the Parser derive macro.
#[derive(Parser, Debug)]
#[command(
    name = "review-sentiment",
    version = "0.1.0",
    about = "Train a bag-of-words review sentiment classifier, then classify reviews."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Match on the subcommand and dispatch to the correct use case.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Prepare(args) => run_prepare(args),
            Commands::Train(args)   => run_train(args),
            Commands::Predict(args) => run_predict(args),
        }
    }
}

fn run_prepare(args: PrepareArgs) -> Result<()> {
    use crate::application::prepare_use_case::{PrepareConfig, PrepareUseCase};
    use crate::data::splitter::SplitRatios;

    let config = PrepareConfig {
        raw_csv:    args.raw_csv,
        output_csv: args.output_csv,
        ratios:     SplitRatios::new(args.train_proportion, args.val_proportion)?,
        seed:       args.seed,
    };
    let output = config.output_csv.clone();
    let [train, val, test] = PrepareUseCase::new(config).execute()?;

    println!("Wrote {} reviews to '{}'", train + val + test, output.display());
    println!("  train: {train}  val: {val}  test: {test}");
    Ok(())
}

fn run_train(args: TrainArgs) -> Result<()> {
    use crate::application::train_use_case::TrainUseCase;

    tracing::info!("Starting training on: {}", args.dataset_csv.display());

    let save_dir = args.save_dir.clone();
    let report   = TrainUseCase::new(args.into()).execute()?;

    println!(
        "Training complete after {} epochs. Best epoch {} (val loss {:.4}).",
        report.epochs_run, report.best_epoch, report.best_val_loss,
    );
    println!("Test loss: {:.3}", report.test_loss);
    println!("Test Accuracy: {:.2}", report.test_acc * 100.0);
    println!("Artefacts saved to '{}'", save_dir.display());
    Ok(())
}

fn run_predict(args: PredictArgs) -> Result<()> {
    use crate::application::predict_use_case::PredictUseCase;

    let use_case   = PredictUseCase::new(&args.save_dir, args.threshold)?;
    let prediction = use_case.predict(&args.review)?;
    println!(
        "{} -> {} (p = {:.4})",
        args.review, prediction.label, prediction.probability,
    );

    if args.top_words > 0 {
        let words = use_case.influential_words(args.top_words)?;
        println!("\nInfluential words in {} reviews:", words.positive_label);
        for (token, weight) in &words.positive {
            println!("  {token:<20} {weight:+.4}");
        }
        println!("\nInfluential words in {} reviews:", words.negative_label);
        for (token, weight) in &words.negative {
            println!("  {token:<20} {weight:+.4}");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn run(args: &[&str]) -> Result<()> {
        Cli::try_parse_from(args)?.run()
    }

    #[test]
    fn test_prepare_train_predict_through_the_cli() {
        let dir      = tempfile::tempdir().unwrap();
        let raw      = dir.path().join("raw.csv");
        let split    = dir.path().join("split.csv");
        let save_dir = dir.path().join("model");

        let mut body = String::from("rating,review\n");
        for i in 0..20 {
            body.push_str(&format!("positive,\"Kind staff, lovely room {i}\"\n"));
            body.push_str(&format!("negative,\"Rude staff, dirty room {i}\"\n"));
        }
        fs::write(&raw, body).unwrap();

        let raw      = raw.to_str().unwrap();
        let split    = split.to_str().unwrap();
        let save_dir = save_dir.to_str().unwrap();

        run(&["bin", "prepare", "--raw-csv", raw, "--output-csv", split]).unwrap();
        run(&[
            "bin", "train",
            "--dataset-csv", split,
            "--save-dir", save_dir,
            "--frequency-cutoff", "0",
            "--batch-size", "4",
            "--epochs", "2",
        ]).unwrap();
        run(&["bin", "predict", "--review", "lovely room", "--save-dir", save_dir, "--top-words", "2"]).unwrap();
    }

    #[test]
    fn test_predict_without_a_trained_model_fails() {
        let dir = tempfile::tempdir().unwrap();
        let save_dir = dir.path().join("missing");
        let result = run(&["bin", "predict", "--review", "fine", "--save-dir", save_dir.to_str().unwrap()]);
        assert!(result.is_err());
    }
}
