// ============================================================
// Layer 5: Inferencer
// ============================================================
use std::sync::Arc;

use anyhow::Result;
use burn::prelude::*;
use serde::Serialize;

use crate::data::preprocessor::Preprocessor;
use crate::data::vectorizer::ReviewVectorizer;
use crate::infra::checkpoint::CheckpointManager;
use crate::infra::vectorizer_store::ensure_compatible;
use crate::ml::model::ReviewClassifier;
use crate::ml::{InferBackend, default_device};

/// Probability above which a review gets label index 1.
pub const DEFAULT_THRESHOLD: f64 = 0.5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub label:       String,
    /// Sigmoid output, i.e. the probability of label index 1
    pub probability: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InfluentialWords {
    /// Label that high-weight words push towards
    pub positive_label: String,
    pub positive:       Vec<(String, f32)>,
    /// Label that low-weight words push towards
    pub negative_label: String,
    pub negative:       Vec<(String, f32)>,
}

pub struct Inferencer<B: Backend = InferBackend> {
    model:        ReviewClassifier<B>,
    vectorizer:   Arc<ReviewVectorizer>,
    preprocessor: Preprocessor,
    threshold:    f64,
    device:       B::Device,
}

impl Inferencer<InferBackend> {
    /// Rebuild the classifier from `ckpt_manager` and pair it with `vectorizer`.
    pub fn from_checkpoint(
        ckpt_manager: &CheckpointManager,
        vectorizer:   ReviewVectorizer,
    ) -> Result<Self> {
        let device    = default_device();
        let model_cfg = ckpt_manager.load_classifier_config()?;
        ensure_compatible(&vectorizer, &model_cfg)?;

        let model: ReviewClassifier<InferBackend> = model_cfg.init(&device);
        let model = ckpt_manager.load_model(model, &device)?;
        tracing::info!("Classifier loaded: {} features", model_cfg.num_features);

        Ok(Self::new(model, Arc::new(vectorizer), device))
    }
}

impl<B: Backend> Inferencer<B> {
    pub fn new(model: ReviewClassifier<B>, vectorizer: Arc<ReviewVectorizer>, device: B::Device) -> Self {
        Self {
            model,
            vectorizer,
            preprocessor: Preprocessor::new(),
            threshold:    DEFAULT_THRESHOLD,
            device,
        }
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Classify one raw review.
    pub fn predict(&self, review: &str) -> Result<Prediction> {
        let text     = self.preprocessor.clean(review);
        let features = self.vectorizer.vectorize(&text)?;
        let dim      = features.len();

        let input = Tensor::<B, 1>::from_floats(features.as_slice(), &self.device)
            .reshape([1, dim]);
        let probability: f64 = self.model
            .forward_probabilities(input)
            .into_scalar()
            .elem::<f64>();

        let index = usize::from(probability > self.threshold);
        let label = self.vectorizer.label_name(index)?.to_string();

        tracing::debug!("'{}' → {} (p={:.4})", text, label, probability);
        Ok(Prediction { label, probability })
    }

    /// The `k` tokens with the largest and the smallest weights.
    pub fn influential_words(&self, k: usize) -> Result<InfluentialWords> {
        let weights = self.model.feature_weights()?;
        let vocab   = self.vectorizer.token_vocabulary();

        let mut ranked: Vec<(String, f32)> = vocab
            .tokens()
            .zip(weights)
            .filter(|(token, _)| *token != vocab.unknown_token())
            .map(|(token, w)| (token.to_string(), w))
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

        let positive: Vec<(String, f32)> = ranked.iter().take(k).cloned().collect();
        let negative: Vec<(String, f32)> = ranked.iter().rev().take(k).cloned().collect();

        Ok(InfluentialWords {
            positive_label: self.vectorizer.label_name(1)?.to_string(),
            positive,
            negative_label: self.vectorizer.label_name(0)?.to_string(),
            negative,
        })
    }
}
