//! Provides the [`Classifier`] and [`ClassifierFactory`] capability
//! traits.
use crate::sample::{DataInstance, LabeledDataset};


/// A binary classifier that can be trained on a weighted dataset.
///
/// Implementors provide [`train`](Classifier::train),
/// [`response`](Classifier::response) and, when the default sign rule is
/// not appropriate, [`classify`](Classifier::classify); the batch
/// helpers are inherited. Both weak learners and the boosted ensemble
/// itself satisfy this contract, which is what lets ensembles nest.
///
/// A classification of `0` is an abstention: the sample contributes to
/// neither side of a boosting line search.
pub trait Classifier {
    /// Fit the classifier to `dataset` under the per-sample `weights`.
    fn train(&mut self, dataset: &LabeledDataset, weights: &[f64]);


    /// The real-valued confidence for one instance.
    /// Positive values lean towards the label `+1`.
    fn response(&self, instance: &DataInstance) -> f64;


    /// The predicted label for one instance, in `{-1, 0, +1}`.
    fn classify(&self, instance: &DataInstance) -> i8 {
        if self.response(instance) >= 0.0 { 1 } else { -1 }
    }


    /// Responses for every instance of `dataset`, in order.
    fn responses(&self, dataset: &LabeledDataset) -> Vec<f64> {
        (0..dataset.len())
            .map(|i| self.response(dataset.instance_at(i)))
            .collect()
    }


    /// Predicted labels for every instance of `dataset`, in order.
    fn classifications(&self, dataset: &LabeledDataset) -> Vec<i8> {
        (0..dataset.len())
            .map(|i| self.classify(dataset.instance_at(i)))
            .collect()
    }


    /// Fraction of misclassified instances under uniform weights.
    fn classification_error(&self, dataset: &LabeledDataset) -> f64 {
        let n_sample = dataset.len();
        let uniform = vec![1.0 / n_sample as f64; n_sample];
        self.weighted_classification_error(dataset, &uniform)
    }


    /// Misclassified weight mass divided by total weight mass.
    fn weighted_classification_error(
        &self,
        dataset: &LabeledDataset,
        weights: &[f64],
    ) -> f64
    {
        assert_eq!(dataset.len(), weights.len());

        let mut error_mass = 0.0;
        let mut total_mass = 0.0;
        for (i, (instance, label)) in dataset.iter().enumerate() {
            assert!(weights[i] >= 0.0, "weights must be non-negative");
            if self.classify(instance) != label {
                error_mass += weights[i];
            }
            total_mass += weights[i];
        }

        error_mass / total_mass
    }
}


/// Creates randomized classifier instances for trial-based search.
///
/// A boosting round asks the factory for several fresh instances, trains
/// each one, and keeps only the best; the randomization (for example, a
/// random feature index) is what makes the trials explore different
/// candidates.
pub trait ClassifierFactory {
    /// The classifier type this factory produces.
    type Hypothesis: Classifier;

    /// Create one new randomized instance.
    /// The caller owns the returned classifier.
    fn random_instance(&self) -> Self::Hypothesis;
}
