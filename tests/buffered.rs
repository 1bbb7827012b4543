use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use activeboost::prelude::*;


/// A loader that counts how often it materializes its instance.
struct CountingLoader {
    instance: DataInstance,
    loads: Arc<AtomicUsize>,
}

impl CountingLoader {
    fn new(instance: DataInstance, loads: Arc<AtomicUsize>) -> Self {
        Self { instance, loads }
    }
}

impl DataInstanceLoader for CountingLoader {
    fn load(&self) -> DataInstance {
        self.loads.fetch_add(1, Ordering::Relaxed);
        self.instance.clone()
    }
}


/// A full dataset of `n` one-dimensional items, feature value `i`,
/// negative below the midpoint.
fn filled_buffer<F, L>(
    n: usize,
    n_pos: usize,
    n_neg: usize,
    seed: u64,
    make_loader: F,
) -> BufferedLabeledDataset<L>
    where F: Fn(DataInstance) -> L,
          L: DataInstanceLoader,
{
    let mut buffer = BufferedLabeledDataset::new(n_pos, n_neg).seed(seed);
    for i in 0..n {
        let label = if i < n / 2 { -1 } else { 1 };
        buffer.add_loader(make_loader(DataInstance::new(vec![i as f64])), label);
    }
    buffer
}


#[test]
fn resampling_always_restores_the_requested_shape() {
    let mut buffer = filled_buffer(40, 6, 10, 31, MemoryLoader::new);

    // two resamples under very different weight vectors
    let uniform = vec![1.0; 40];
    let skewed = (0..40).map(|i| 1.0 / (i + 1) as f64).collect::<Vec<_>>();

    for weights in [&uniform, &skewed] {
        let frequencies = buffer.resample_active_set(weights);

        assert_eq!(buffer.active_set().len(), 16);
        assert_eq!(frequencies.len(), 16);

        let n_pos = buffer.active_set()
            .labels()
            .iter()
            .filter(|y| **y == 1)
            .count();
        assert_eq!(n_pos, 6);
        assert_eq!(&buffer.active_set().labels()[..6], &[1; 6]);
        assert_eq!(&buffer.active_set().labels()[6..], &[-1; 10]);
    }
}


#[test]
fn resampled_frequencies_scale_with_class_mass() {
    let mut buffer = filled_buffer(20, 4, 4, 5, MemoryLoader::new);

    let frequencies = buffer.resample_active_set(&vec![0.5; 20]);

    // each class carries mass 5.0; per-slot frequencies are the class
    // mass times the in-class share, so each class block sums to it
    let positive_block = frequencies[..4].iter().sum::<f64>();
    let negative_block = frequencies[4..].iter().sum::<f64>();
    assert!((positive_block - 5.0).abs() < 1e-9);
    assert!((negative_block - 5.0).abs() < 1e-9);
}


#[test]
fn resampling_touches_only_the_selected_loaders() {
    let counters = (0..30)
        .map(|_| Arc::new(AtomicUsize::new(0)))
        .collect::<Vec<_>>();

    let mut buffer = BufferedLabeledDataset::new(5, 5).seed(77);
    for (i, counter) in counters.iter().enumerate() {
        let label = if i < 15 { -1 } else { 1 };
        let loader = CountingLoader::new(
            DataInstance::new(vec![i as f64]),
            Arc::clone(counter),
        );
        buffer.add_loader(loader, label);
    }

    buffer.resample_active_set(&vec![1.0; 30]);
    assert_eq!(buffer.active_set().len(), 10);

    // exactly one load per active-set slot, nothing else materialized
    let loads = counters.iter()
        .map(|c| c.load(Ordering::Relaxed))
        .sum::<usize>();
    assert_eq!(loads, 10);
}


#[test]
fn batch_mode_trains_through_the_active_set_only() {
    let mut buffer = filled_buffer(60, 8, 8, 99, MemoryLoader::new);
    let factory = ThresholdLearnerFactory::new(1);

    let mut booster = BoostedClassifier::new(&factory, 2, 5);
    booster.train_in_batch_mode(&mut buffer, &vec![1.0; 60], 3);

    // every batch contributes at least one accepted weak learner
    assert!(booster.num_weak_learners() >= 3);
    assert!(booster.num_weak_learners() <= 6);

    // the ensemble generalizes from the active sets to the full dataset
    let mut errors = 0;
    for i in 0..buffer.len() {
        let instance = buffer.instance_at(i);
        if booster.classify(&instance) != buffer.label_at(i) {
            errors += 1;
        }
    }
    let error_rate = errors as f64 / buffer.len() as f64;
    assert!(error_rate <= 0.25, "full-dataset error is {error_rate}");
}


#[test]
#[should_panic]
fn batch_mode_rejects_an_empty_buffer() {
    let mut buffer: BufferedLabeledDataset<MemoryLoader> =
        BufferedLabeledDataset::new(1, 1);
    let factory = ThresholdLearnerFactory::new(1);

    let mut booster = BoostedClassifier::new(&factory, 1, 1);
    booster.train_in_batch_mode(&mut buffer, &[], 1);
}
