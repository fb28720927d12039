use burn::{
    nn::{loss::BinaryCrossEntropyLossConfig, Linear, LinearConfig},
    prelude::*,
    tensor::activation::sigmoid,
};

// NOTE: #[derive(Config)] already generates Clone and Serialize/Deserialize
// internally, do NOT add them again or you get conflicting impls.
#[derive(Config, Debug)]
pub struct ReviewClassifierConfig {
    /// Feature dimension, i.e. the token vocabulary size
    pub num_features: usize,
}

impl ReviewClassifierConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> ReviewClassifier<B> {
        ReviewClassifier {
            fc: LinearConfig::new(self.num_features, 1).init(device),
        }
    }
}

/// Single linear layer over the presence-encoded review.
#[derive(Module, Debug)]
pub struct ReviewClassifier<B: Backend> {
    pub fc: Linear<B>,
}

impl<B: Backend> ReviewClassifier<B> {
    /// features: [batch, num_features] → raw logits: [batch]
    pub fn forward(&self, features: Tensor<B, 2>) -> Tensor<B, 1> {
        self.fc.forward(features).flatten::<1>(0, 1)
    }

    /// Probability of label index 1, for inference and reporting only.
    pub fn forward_probabilities(&self, features: Tensor<B, 2>) -> Tensor<B, 1> {
        sigmoid(self.forward(features))
    }

    /// Binary cross-entropy computed on the raw logits.
    pub fn forward_loss(
        &self,
        features: Tensor<B, 2>,
        labels:   Tensor<B, 1, Int>,
    ) -> (Tensor<B, 1>, Tensor<B, 1>) {
        let logits = self.forward(features);
        let bce = BinaryCrossEntropyLossConfig::new()
            .with_logits(true)
            .init(&logits.device());
        let loss = bce.forward(logits.clone(), labels);
        (loss, logits)
    }

    /// Learned weight of every input feature, in vocabulary order.
    pub fn feature_weights(&self) -> anyhow::Result<Vec<f32>> {
        self.fc.weight.val()
            .into_data()
            .convert::<f32>()
            .to_vec::<f32>()
            .map_err(|e| anyhow::anyhow!("Cannot read classifier weights: {e:?}"))
    }
}

/// Fraction of examples whose thresholded prediction matches the label.
pub fn compute_accuracy<B: Backend>(logits: Tensor<B, 1>, labels: Tensor<B, 1, Int>) -> f64 {
    let total = labels.dims()[0];
    if total == 0 {
        return 0.0;
    }
    let predicted = sigmoid(logits).greater_elem(0.5).int();
    let correct: i64 = predicted
        .equal(labels)
        .int().sum().into_scalar().elem::<i64>();
    correct as f64 / total as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TestBackend = NdArray;

    #[test]
    fn test_forward_shape() {
        let device = Default::default();
        let model: ReviewClassifier<TestBackend> = ReviewClassifierConfig::new(6).init(&device);
        let x = Tensor::<TestBackend, 2>::zeros([4, 6], &device);
        assert_eq!(model.forward(x).dims(), [4]);
    }

    #[test]
    fn test_probabilities_are_in_unit_interval() {
        let device = Default::default();
        let model: ReviewClassifier<TestBackend> = ReviewClassifierConfig::new(3).init(&device);
        let x = Tensor::<TestBackend, 2>::ones([2, 3], &device);
        let probs = model.forward_probabilities(x).into_data().to_vec::<f32>().unwrap();
        assert!(probs.iter().all(|p| (0.0..=1.0).contains(p)));
    }

    #[test]
    fn test_weights_cover_every_feature() {
        let device = Default::default();
        let model: ReviewClassifier<TestBackend> = ReviewClassifierConfig::new(5).init(&device);
        assert_eq!(model.feature_weights().unwrap().len(), 5);
    }

    #[test]
    fn test_compute_accuracy() {
        let device = Default::default();
        // sigmoid > 0.5 ⇔ logit > 0
        let logits = Tensor::<TestBackend, 1>::from_floats([2.0, -1.0, 0.5, -3.0], &device);
        let labels = Tensor::<TestBackend, 1, Int>::from_ints([1, 0, 0, 0], &device);
        assert!((compute_accuracy(logits, labels) - 0.75).abs() < 1e-9);
    }
}
