//! Provides [`LabeledDataset`], the in-memory labeled dataset.
use polars::prelude::*;

use std::collections::BTreeSet;
use std::io;

use super::instance::DataInstance;


/// An ordered sequence of `(DataInstance, label)` pairs together with a
/// fixed set of allowed labels, established at construction and never
/// mutated afterwards.
///
/// Invariants maintained by [`push`](LabeledDataset::push):
/// every stored label is a member of the allowed-label set, and every
/// stored instance is feature-compatible with the first one.
///
/// For binary boosting the allowed set is exactly `{-1, +1}`; use
/// [`LabeledDataset::binary`].
#[derive(Debug, Clone)]
pub struct LabeledDataset {
    allowed_labels: BTreeSet<i8>,
    instances: Vec<DataInstance>,
    labels: Vec<i8>,
}


impl LabeledDataset {
    /// Construct an empty dataset accepting the given labels.
    pub fn new<I>(allowed_labels: I) -> Self
        where I: IntoIterator<Item = i8>,
    {
        let allowed_labels = allowed_labels.into_iter().collect();
        Self {
            allowed_labels,
            instances: Vec::new(),
            labels: Vec::new(),
        }
    }


    /// Construct an empty dataset accepting the labels `-1` and `+1`.
    pub fn binary() -> Self {
        Self::new([-1, 1])
    }


    /// Convert a `polars` DataFrame and a label `Series` into a dataset.
    /// Feature columns and the target must be of dtype `f64`;
    /// target values are truncated to integer labels.
    /// The allowed-label set is the set of distinct labels in `target`.
    pub fn from_dataframe(data: DataFrame, target: Series) -> io::Result<Self> {
        let (n_sample, _) = data.shape();
        let labels = target.f64()
            .expect("The target is not a dtype f64")
            .into_iter()
            .collect::<Option<Vec<_>>>()
            .expect("The target contains missing values")
            .into_iter()
            .map(|y| y as i8)
            .collect::<Vec<_>>();

        let columns = data.get_columns()
            .iter()
            .map(|series| {
                series.f64()
                    .expect("A feature column is not a dtype f64")
                    .into_iter()
                    .collect::<Option<Vec<_>>>()
                    .expect("A feature column contains missing values")
            })
            .collect::<Vec<_>>();

        let mut dataset = Self::new(labels.iter().copied());
        for i in 0..n_sample {
            let features = columns.iter().map(|col| col[i]).collect::<Vec<_>>();
            dataset.push(DataInstance::new(features), labels[i]);
        }
        Ok(dataset)
    }


    /// Append one `(instance, label)` pair.
    ///
    /// # Panics
    /// When `label` is not in the allowed-label set, or when `instance`
    /// is not feature-compatible with the first stored instance.
    pub fn push(&mut self, instance: DataInstance, label: i8) {
        assert!(
            self.label_is_allowed(label),
            "label {label} is not in the allowed-label set {:?}",
            self.allowed_labels,
        );
        if let Some(first) = self.instances.first() {
            assert!(
                instance.is_compatible(first),
                "instance with {} features is incompatible \
                 with the dataset ({} features)",
                instance.len(),
                first.len(),
            );
        }

        self.instances.push(instance);
        self.labels.push(label);
    }


    /// The instance stored at `pos`.
    pub fn instance_at(&self, pos: usize) -> &DataInstance {
        &self.instances[pos]
    }


    /// The label stored at `pos`.
    pub fn label_at(&self, pos: usize) -> i8 {
        self.labels[pos]
    }


    /// All labels, in storage order.
    pub fn labels(&self) -> &[i8] {
        &self.labels[..]
    }


    /// Remove the pair stored at `pos`, shifting later pairs left.
    pub fn remove_at(&mut self, pos: usize) {
        assert!(pos < self.instances.len(), "position {pos} is out of range");
        self.instances.remove(pos);
        self.labels.remove(pos);
    }


    /// Drop every stored pair. The allowed-label set is kept.
    pub fn clear(&mut self) {
        self.instances.clear();
        self.labels.clear();
    }


    /// Number of stored pairs.
    pub fn len(&self) -> usize {
        self.instances.len()
    }


    /// `true` if the dataset stores no pairs.
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }


    /// The pair `(number of examples, number of features)`.
    pub fn shape(&self) -> (usize, usize) {
        let n_feature = self.instances.first()
            .map(DataInstance::len)
            .unwrap_or(0);
        (self.instances.len(), n_feature)
    }


    /// Size of the allowed-label set.
    pub fn n_labels(&self) -> usize {
        self.allowed_labels.len()
    }


    /// Whether `label` belongs to the allowed-label set.
    pub fn label_is_allowed(&self, label: i8) -> bool {
        self.allowed_labels.contains(&label)
    }


    /// Iterate over `(instance, label)` pairs in storage order.
    pub fn iter(&self) -> impl Iterator<Item = (&DataInstance, i8)> {
        self.instances.iter().zip(self.labels.iter().copied())
    }
}
