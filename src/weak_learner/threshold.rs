//! Provides [`ThresholdLearner`], a single-feature threshold stump.
use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::classifier::{Classifier, ClassifierFactory};
use crate::common::checker;
use crate::sample::{DataInstance, LabeledDataset};


/// A weak learner that thresholds a single feature.
///
/// Training sweeps the sorted feature values and keeps the split of
/// minimum weighted error over both polarities: instances whose feature
/// value falls below the threshold are given `label_on_left`, the rest
/// the opposite label. Samples whose feature value is not finite are
/// ignored during training, and classified as `0` (abstention).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThresholdLearner {
    feature_index: usize,
    threshold: f64,
    label_on_left: i8,
}


impl ThresholdLearner {
    /// An untrained stump over the given feature.
    pub fn new(feature_index: usize) -> Self {
        Self {
            feature_index,
            threshold: 0.0,
            label_on_left: -1,
        }
    }


    /// The feature this stump thresholds.
    pub fn feature_index(&self) -> usize {
        self.feature_index
    }


    /// The learned threshold.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }
}


impl Classifier for ThresholdLearner {
    fn train(&mut self, dataset: &LabeledDataset, weights: &[f64]) {
        checker::check_dataset(dataset);
        checker::check_binary_labels(dataset);
        checker::check_weights(weights, dataset.len());

        // keep only the samples where the feature is available
        let mut values = Vec::with_capacity(dataset.len());
        let mut labels = Vec::with_capacity(dataset.len());
        let mut mass = Vec::with_capacity(dataset.len());
        for (i, (instance, label)) in dataset.iter().enumerate() {
            let value = instance.feature(self.feature_index);
            if value.is_finite() {
                values.push((value, labels.len()));
                labels.push(label);
                mass.push(weights[i]);
            }
        }

        if values.is_empty() {
            // the stump will abstain everywhere; it is never selected
            self.threshold = 0.0;
            self.label_on_left = 1;
            return;
        }

        values.sort_by(|a, b| a.partial_cmp(b).unwrap());

        // error mass of each polarity, with nothing on the left yet:
        // increasing (-1 | +1) misclassifies every negative,
        // decreasing (+1 | -1) every positive
        let mut fp_if_inc = 0.0;
        let mut fn_if_inc = 0.0;
        let mut fp_if_dec = 0.0;
        let mut fn_if_dec = 0.0;
        for (i, &label) in labels.iter().enumerate() {
            if label < 0 {
                fp_if_inc += mass[i];
            } else {
                fn_if_dec += mass[i];
            }
        }

        self.threshold = values[0].0;
        let mut min_error;
        if fp_if_inc < fn_if_dec {
            min_error = fp_if_inc;
            self.label_on_left = -1;
        } else {
            min_error = fn_if_dec;
            self.label_on_left = 1;
        }

        // move samples to the left side one by one; a new split is only
        // valid between two distinct feature values
        for i in 1..values.len() {
            let prev = values[i - 1].1;
            if labels[prev] < 0 {
                fp_if_inc -= mass[prev];
                fp_if_dec += mass[prev];
            } else {
                fn_if_inc += mass[prev];
                fn_if_dec -= mass[prev];
            }

            if values[i].0 > values[i - 1].0 {
                let error_if_inc = fp_if_inc + fn_if_inc;
                let error_if_dec = fp_if_dec + fn_if_dec;

                if error_if_inc < min_error {
                    min_error = error_if_inc;
                    self.threshold = values[i].0;
                    self.label_on_left = -1;
                }
                if error_if_dec < min_error {
                    min_error = error_if_dec;
                    self.threshold = values[i].0;
                    self.label_on_left = 1;
                }
            }
        }
    }


    /// Signed margin to the threshold, oriented so that positive values
    /// lean towards `+1`. Not finite when the feature is not available.
    fn response(&self, instance: &DataInstance) -> f64 {
        let value = instance.feature(self.feature_index);
        if !value.is_finite() {
            return value;
        }

        let margin = value - self.threshold;
        if self.label_on_left < 0 { margin } else { -margin }
    }


    fn classify(&self, instance: &DataInstance) -> i8 {
        let value = instance.feature(self.feature_index);
        if !value.is_finite() {
            return 0;
        }

        if value < self.threshold {
            self.label_on_left
        } else {
            -self.label_on_left
        }
    }
}


/// Creates [`ThresholdLearner`]s over uniformly random feature indices,
/// which is what makes the trials of a boosting round explore different
/// splits.
pub struct ThresholdLearnerFactory {
    n_features: usize,
}


impl ThresholdLearnerFactory {
    /// A factory over datasets with `n_features` features.
    pub fn new(n_features: usize) -> Self {
        assert!(n_features > 0, "at least one feature is required");
        Self { n_features }
    }
}


impl ClassifierFactory for ThresholdLearnerFactory {
    type Hypothesis = ThresholdLearner;

    fn random_instance(&self) -> ThresholdLearner {
        let feature_index = rand::thread_rng().gen_range(0..self.n_features);
        ThresholdLearner::new(feature_index)
    }
}
