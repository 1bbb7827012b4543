//! This file defines some functions that check pre-conditions
//! E.g., shape of data, label sets, weight vectors.

use crate::sample::LabeledDataset;


/// Check whether the training dataset is usable at all.
#[inline(always)]
pub(crate) fn check_dataset(dataset: &LabeledDataset) {
    assert!(!dataset.is_empty(), "the training dataset is empty");

    let (_, n_feature) = dataset.shape();
    assert!(n_feature > 0, "instances carry no features");
}


/// Check whether the dataset is a binary classification dataset
/// over the labels `-1` and `+1`.
#[inline(always)]
pub(crate) fn check_binary_labels(dataset: &LabeledDataset) {
    assert_eq!(
        dataset.n_labels(), 2,
        "binary boosting requires exactly 2 allowed labels, got {}",
        dataset.n_labels(),
    );
    assert!(
        dataset.label_is_allowed(-1) && dataset.label_is_allowed(1),
        "binary boosting requires the allowed labels -1 and +1",
    );
}


/// Check a per-sample weight vector against a dataset of `n` items.
#[inline(always)]
pub(crate) fn check_weights(weights: &[f64], n: usize) {
    assert_eq!(
        weights.len(), n,
        "weight vector has length {}, dataset has {n} items",
        weights.len(),
    );
    assert!(
        weights.iter().all(|w| w.is_finite() && *w >= 0.0),
        "weights must be finite and non-negative",
    );
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::DataInstance;

    fn separable() -> LabeledDataset {
        let mut dataset = LabeledDataset::binary();
        dataset.push(DataInstance::new(vec![0.0]), -1);
        dataset.push(DataInstance::new(vec![1.0]), 1);
        dataset
    }

    #[test]
    fn accepts_binary_dataset() {
        let dataset = separable();
        check_dataset(&dataset);
        check_binary_labels(&dataset);
        check_weights(&[0.5, 0.5], dataset.len());
    }

    #[test]
    #[should_panic]
    fn rejects_empty_dataset() {
        check_dataset(&LabeledDataset::binary());
    }

    #[test]
    #[should_panic]
    fn rejects_non_pm_one_labels() {
        let dataset = LabeledDataset::new([0, 1]);
        check_binary_labels(&dataset);
    }

    #[test]
    #[should_panic]
    fn rejects_short_weight_vector() {
        check_weights(&[1.0], 2);
    }

    #[test]
    #[should_panic]
    fn rejects_negative_weights() {
        check_weights(&[1.0, -0.1], 2);
    }
}
