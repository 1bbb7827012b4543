//! Provides [`BufferedLabeledDataset`], the out-of-core dataset with a
//! resampled in-memory active set.
use crate::sampler::{DataSampler, WeightedSampler};

use super::instance::DataInstance;
use super::labeled::LabeledDataset;


/// Materializes one [`DataInstance`] on demand.
///
/// The buffer never stores instance data itself; each item of the full
/// dataset is reached through its loader, which owns (or knows how to
/// reach) the backing storage: a file, a memory-mapped region, a
/// decoded record.
pub trait DataInstanceLoader {
    /// Produce the instance. Called every time the item is needed;
    /// no caching is implied.
    fn load(&self) -> DataInstance;
}


impl<T: DataInstanceLoader + ?Sized> DataInstanceLoader for Box<T> {
    fn load(&self) -> DataInstance {
        (**self).load()
    }
}


/// A loader over an instance that already lives in memory.
/// Useful in tests and for callers whose data does fit in memory.
#[derive(Debug, Clone)]
pub struct MemoryLoader {
    instance: DataInstance,
}


impl MemoryLoader {
    /// Wrap an owned instance.
    pub fn new(instance: DataInstance) -> Self {
        Self { instance }
    }
}


impl DataInstanceLoader for MemoryLoader {
    fn load(&self) -> DataInstance {
        self.instance.clone()
    }
}


/// A binary labeled dataset too large to keep in memory.
///
/// The buffer owns, for every item of the *full* dataset, a label and a
/// loader; instance data stays with the loaders. It additionally owns one
/// in-memory **active set** of fixed class balance
/// (`n_positives` items labeled `+1` followed by `n_negatives` items
/// labeled `-1`), refreshed by [`resample_active_set`] from the current
/// per-item weights. Training runs on the active set only, so the full
/// dataset is never materialized at once.
///
/// [`resample_active_set`]: BufferedLabeledDataset::resample_active_set
///
/// # Example
/// ```
/// use activeboost::{BufferedLabeledDataset, DataInstance, MemoryLoader};
///
/// let mut buffer = BufferedLabeledDataset::new(1, 1).seed(5);
/// buffer.add_loader(MemoryLoader::new(DataInstance::new(vec![0.0])), -1);
/// buffer.add_loader(MemoryLoader::new(DataInstance::new(vec![1.0])), 1);
///
/// let frequencies = buffer.resample_active_set(&[1.0, 1.0]);
/// assert_eq!(buffer.active_set().len(), 2);
/// assert_eq!(frequencies.len(), 2);
/// ```
pub struct BufferedLabeledDataset<L> {
    loaders: Vec<L>,
    labels: Vec<i8>,

    active_set: LabeledDataset,
    n_positives: usize,
    n_negatives: usize,

    sampler: WeightedSampler,
}


impl<L: DataInstanceLoader> BufferedLabeledDataset<L> {
    /// Construct an empty buffer whose active set holds `n_positives`
    /// items labeled `+1` and `n_negatives` items labeled `-1` after
    /// every resample.
    pub fn new(n_positives: usize, n_negatives: usize) -> Self {
        Self {
            loaders: Vec::new(),
            labels: Vec::new(),
            active_set: LabeledDataset::binary(),
            n_positives,
            n_negatives,
            sampler: WeightedSampler::new(),
        }
    }


    /// Seed the resampling draws, for reproducible active sets.
    pub fn seed(mut self, seed: u64) -> Self {
        self.sampler = WeightedSampler::with_seed(seed);
        self
    }


    /// Append one `(loader, label)` pair to the full-dataset index.
    /// The active set is not touched.
    pub fn add_loader(&mut self, loader: L, label: i8) {
        assert!(
            label == -1 || label == 1,
            "the buffer holds binary data; got label {label}",
        );
        self.loaders.push(loader);
        self.labels.push(label);
    }


    /// Number of items in the full dataset.
    pub fn len(&self) -> usize {
        self.labels.len()
    }


    /// `true` if the full dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }


    /// The label of the full-dataset item at `pos`.
    pub fn label_at(&self, pos: usize) -> i8 {
        self.labels[pos]
    }


    /// All full-dataset labels, in index order.
    pub fn labels(&self) -> &[i8] {
        &self.labels[..]
    }


    /// Materialize the full-dataset item at `pos` through its loader.
    pub fn instance_at(&self, pos: usize) -> DataInstance {
        self.loaders[pos].load()
    }


    /// The current active set.
    pub fn active_set(&self) -> &LabeledDataset {
        &self.active_set
    }


    /// The size the active set has after any resample.
    pub fn active_set_size(&self) -> usize {
        self.n_positives + self.n_negatives
    }


    /// Number of `+1` items the active set maintains.
    pub fn n_positives_in_active_set(&self) -> usize {
        self.n_positives
    }


    /// Number of `-1` items the active set maintains.
    pub fn n_negatives_in_active_set(&self) -> usize {
        self.n_negatives
    }


    /// Drop every item of the active set.
    pub fn clear_active_set(&mut self) {
        self.active_set.clear();
    }


    /// Refresh the active set by weighted resampling of the full dataset.
    ///
    /// `sampling_weights` holds one non-negative weight per full-dataset
    /// item. The weight vector is split into a positive-only and a
    /// negative-only copy (the other class zeroed out), each class is
    /// drawn through the weighted sampler in one call, and the selected
    /// items are materialized in a fixed order: **all positives, then all
    /// negatives**.
    ///
    /// Returns one frequency per active-set slot, the class's total
    /// weight mass times the item's normalized in-class frequency, laid
    /// out in the same positives-then-negatives order, so the result can
    /// be used directly as per-item training weights for the active set.
    ///
    /// # Panics
    /// When `sampling_weights` does not match the full-dataset size, or
    /// when a class has fewer positively-weighted items than its active
    /// set quota.
    pub fn resample_active_set(&mut self, sampling_weights: &[f64]) -> Vec<f64> {
        assert_eq!(
            sampling_weights.len(),
            self.labels.len(),
            "one sampling weight per full-dataset item is required",
        );

        self.active_set.clear();

        let mut positive_weights = vec![0.0; sampling_weights.len()];
        let mut negative_weights = vec![0.0; sampling_weights.len()];
        for (i, &weight) in sampling_weights.iter().enumerate() {
            if self.labels[i] == 1 {
                positive_weights[i] = weight;
            } else {
                negative_weights[i] = weight;
            }
        }

        let positives = self.sampler.sample(&positive_weights, self.n_positives);
        let negatives = self.sampler.sample(&negative_weights, self.n_negatives);

        // order is important here
        self.load_to_active_set(&positives.indices);
        self.load_to_active_set(&negatives.indices);

        let mut frequencies = Vec::with_capacity(self.active_set_size());
        frequencies.extend(
            positives.frequencies.iter().map(|f| positives.total_mass * f)
        );
        frequencies.extend(
            negatives.frequencies.iter().map(|f| negatives.total_mass * f)
        );

        assert_eq!(self.active_set.len(), self.active_set_size());

        frequencies
    }


    fn load_to_active_set(&mut self, selected: &[usize]) {
        for &index in selected {
            let instance = self.loaders[index].load();
            debug_assert_eq!(self.labels[selected[0]], self.labels[index]);
            self.active_set.push(instance, self.labels[index]);
        }
    }
}
