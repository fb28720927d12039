// ============================================================
// Layer 5: Training Loop
// ============================================================
// Train + validation loop with Adam, early stopping and a final
// evaluation on the test split.
//
// Per epoch:
//   1. train split, shuffled, drop_last = true
//        forward → BCE on logits → backward → Adam step
//   2. val split on the inner backend (no autodiff graph)
//   3. log EpochMetrics, checkpoint if val_loss improved
//   4. stop once val_loss has not improved for
//      `early_stopping_criteria` epochs in a row
//
// After the loop the best checkpoint is reloaded and scored on
// the test split.
//
// The classifier config and vectorizer are written together with
// the first checkpoint of a run. A run that fails before that
// point leaves the artefacts of the previous run untouched.
//
// Key Burn insight:
//   - Training uses TrainBackend (Autodiff<..>) for gradients
//   - model.valid() returns the model on the inner backend, so
//     evaluation batches are built for B::InnerBackend
//
// Reference: Burn Book §5, Kingma & Ba (2015) Adam

use std::sync::Arc;

use anyhow::{bail, Result};
use burn::{
    module::AutodiffModule,
    optim::{AdamConfig, GradientsParams, Optimizer},
    prelude::*,
    tensor::backend::AutodiffBackend,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::application::train_use_case::TrainConfig;
use crate::data::{
    batch_iter::generate_batches,
    batcher::ReviewBatcher,
    dataset::SplitDataset,
    vectorizer::ReviewVectorizer,
};
use crate::domain::review::Split;
use crate::infra::checkpoint::CheckpointManager;
use crate::infra::metrics::{EpochMetrics, MetricsLogger};
use crate::infra::vectorizer_store::VectorizerStore;
use crate::ml::model::{compute_accuracy, ReviewClassifier, ReviewClassifierConfig};
use crate::ml::{TrainBackend, default_device};

// ─── TrainState ───────────────────────────────────────────────────────────────
/// Early-stopping bookkeeping across epochs.
#[derive(Debug, Clone)]
pub struct TrainState {
    criteria:      usize,
    best_val_loss: f64,
    best_epoch:    Option<usize>,
    stale_epochs:  usize,
    history:       Vec<EpochMetrics>,
}

impl TrainState {
    /// `criteria` = 0 disables early stopping.
    pub fn new(criteria: usize) -> Self {
        Self {
            criteria,
            best_val_loss: f64::INFINITY,
            best_epoch:    None,
            stale_epochs:  0,
            history:       Vec::new(),
        }
    }

    /// Record an epoch. Returns true when it is the new best.
    pub fn update(&mut self, m: EpochMetrics) -> bool {
        let improved = m.is_improvement(self.best_val_loss);
        if improved {
            self.best_val_loss = m.val_loss;
            self.best_epoch    = Some(m.epoch);
            self.stale_epochs  = 0;
        } else {
            self.stale_epochs += 1;
        }
        self.history.push(m);
        improved
    }

    pub fn should_stop(&self) -> bool {
        self.criteria > 0 && self.stale_epochs >= self.criteria
    }

    pub fn best_epoch(&self) -> Option<usize> {
        self.best_epoch
    }

    pub fn best_val_loss(&self) -> f64 {
        self.best_val_loss
    }

    pub fn history(&self) -> &[EpochMetrics] {
        &self.history
    }
}

// ─── TrainReport ──────────────────────────────────────────────────────────────
#[derive(Debug, Clone)]
pub struct TrainReport {
    pub epochs_run:    usize,
    pub best_epoch:    usize,
    pub best_val_loss: f64,
    pub test_loss:     f64,
    pub test_acc:      f64,
}

pub fn run_training(
    cfg:          &TrainConfig,
    dataset:      &mut SplitDataset,
    ckpt_manager: &CheckpointManager,
    metrics:      &MetricsLogger,
) -> Result<TrainReport> {
    let device = default_device();
    tracing::info!("Using device: {:?}", device);
    train_loop::<TrainBackend>(cfg, dataset, ckpt_manager, metrics, device)
}

pub fn train_loop<B: AutodiffBackend>(
    cfg:          &TrainConfig,
    dataset:      &mut SplitDataset,
    ckpt_manager: &CheckpointManager,
    metrics:      &MetricsLogger,
    device:       B::Device,
) -> Result<TrainReport> {
    let vectorizer = Arc::clone(dataset.vectorizer());
    if vectorizer.num_labels() != 2 {
        bail!(
            "binary classifier needs exactly 2 labels in the training split, found {}",
            vectorizer.num_labels()
        );
    }

    let train_len = dataset.split_len(Split::Train);
    if train_len < cfg.batch_size {
        bail!(
            "train split has {} reviews, fewer than one batch of {}; lower --batch-size",
            train_len, cfg.batch_size
        );
    }

    // ── Seeding ───────────────────────────────────────────────────────────────
    // Backend seed → weight init, StdRng → batch order
    B::seed(cfg.seed);
    let mut rng = StdRng::seed_from_u64(cfg.seed);

    // ── Build model ───────────────────────────────────────────────────────────
    let model_cfg = ReviewClassifierConfig::new(vectorizer.feature_dim());
    let mut model: ReviewClassifier<B> = model_cfg.init(&device);
    tracing::info!("Model ready: linear classifier over {} features", model_cfg.num_features);

    let mut optim = AdamConfig::new().init();
    let batcher   = ReviewBatcher::<B>::new(device.clone());
    let mut state = TrainState::new(cfg.early_stopping_criteria);
    let mut first_checkpoint = true;

    // ── Epoch loop ────────────────────────────────────────────────────────────
    for epoch in 1..=cfg.epochs {

        // ── Training phase ────────────────────────────────────────────────────
        dataset.set_active(Split::Train);

        let mut loss_sum = 0.0f64;
        let mut acc_sum  = 0.0f64;
        let mut batches  = 0usize;

        for batch in generate_batches(&*dataset, cfg.batch_size, true, true, &mut rng)? {
            let batch = batcher.to_tensors(&batch?);

            let (loss, logits) = model.forward_loss(batch.features, batch.labels.clone());
            loss_sum += loss.clone().into_scalar().elem::<f64>();
            acc_sum  += compute_accuracy(logits.detach(), batch.labels);
            batches  += 1;

            let grads = loss.backward();
            let grads = GradientsParams::from_grads(grads, &model);
            model = optim.step(cfg.lr, model, grads);
        }

        let train_loss = loss_sum / batches as f64;
        let train_acc  = acc_sum  / batches as f64;

        // ── Validation phase ──────────────────────────────────────────────────
        dataset.set_active(Split::Val);
        let (val_loss, val_acc) = evaluate(&model.valid(), dataset, cfg.batch_size, &device)?;

        println!(
            "Epoch {:>3}/{} | train_loss={:.4} | train_acc={:.1}% | val_loss={:.4} | val_acc={:.1}%",
            epoch, cfg.epochs, train_loss, train_acc * 100.0, val_loss, val_acc * 100.0,
        );

        let m = EpochMetrics::new(epoch, train_loss, train_acc, val_loss, val_acc);
        metrics.log(&m)?;

        if state.update(m) {
            save_checkpoint(ckpt_manager, &model, &model_cfg, &vectorizer, epoch, &mut first_checkpoint)?;
            tracing::info!("Validation loss improved to {:.4}, checkpoint saved", val_loss);
        }

        if state.should_stop() {
            tracing::info!(
                "Early stopping after epoch {}: no improvement for {} epochs",
                epoch, cfg.early_stopping_criteria
            );
            break;
        }
    }

    let epochs_run = state.history().len();
    let best_epoch = match state.best_epoch() {
        Some(epoch) => epoch,
        None => {
            // Validation never produced a finite loss; keep the last weights
            tracing::warn!("No validation improvement recorded, saving final weights");
            save_checkpoint(ckpt_manager, &model, &model_cfg, &vectorizer, epochs_run, &mut first_checkpoint)?;
            epochs_run
        }
    };

    // ── Test phase ────────────────────────────────────────────────────────────
    let best: ReviewClassifier<B::InnerBackend> =
        ckpt_manager.load_model(model_cfg.init(&device), &device)?;
    dataset.set_active(Split::Test);
    let (test_loss, test_acc) = evaluate(&best, dataset, cfg.batch_size, &device)?;
    dataset.set_active(Split::Train);

    tracing::info!(
        "Training complete: best epoch {}, test_loss={:.4}, test_acc={:.1}%",
        best_epoch, test_loss, test_acc * 100.0
    );

    Ok(TrainReport {
        epochs_run,
        best_epoch,
        best_val_loss: state.best_val_loss(),
        test_loss,
        test_acc,
    })
}

/// Mean loss and accuracy over the active split, every example counted once.
/// Overwrite the stored weights; the first call of a run also
/// writes the classifier config and the vectorizer.
fn save_checkpoint<B: Backend>(
    ckpt_manager: &CheckpointManager,
    model:        &ReviewClassifier<B>,
    model_cfg:    &ReviewClassifierConfig,
    vectorizer:   &ReviewVectorizer,
    epoch:        usize,
    first:        &mut bool,
) -> Result<()> {
    ckpt_manager.save_model(model, epoch)?;
    if *first {
        ckpt_manager.save_classifier_config(model_cfg)?;
        VectorizerStore::new(ckpt_manager.dir()).save(vectorizer)?;
        *first = false;
    }
    Ok(())
}

pub fn evaluate<B: Backend>(
    model:      &ReviewClassifier<B>,
    dataset:    &SplitDataset,
    batch_size: usize,
    device:     &B::Device,
) -> Result<(f64, f64)> {
    let batcher = ReviewBatcher::<B>::new(device.clone());
    // Evaluation order does not matter; the RNG is never consulted
    let mut rng = StdRng::seed_from_u64(0);

    let mut loss_sum = 0.0f64;
    let mut correct  = 0.0f64;
    let mut seen     = 0usize;

    for batch in generate_batches(dataset, batch_size, false, false, &mut rng)? {
        let batch = batch?;
        let rows  = batch.num_rows();
        let batch = batcher.to_tensors(&batch);

        let (loss, logits) = model.forward_loss(batch.features, batch.labels.clone());
        loss_sum += loss.into_scalar().elem::<f64>() * rows as f64;
        correct  += compute_accuracy(logits, batch.labels) * rows as f64;
        seen     += rows;
    }

    if seen == 0 {
        tracing::warn!("Split '{}' is empty, nothing to evaluate", dataset.active_split());
        return Ok((f64::NAN, 0.0));
    }
    Ok((loss_sum / seen as f64, correct / seen as f64))
}
