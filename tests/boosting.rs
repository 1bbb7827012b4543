use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use std::ops::ControlFlow;

use activeboost::prelude::*;


/// Instances with feature value `i`, labeled `-1` below the midpoint.
fn separable_line(n: usize) -> LabeledDataset {
    let mut dataset = LabeledDataset::binary();
    for i in 0..n {
        let label = if i < n / 2 { -1 } else { 1 };
        dataset.push(DataInstance::new(vec![i as f64]), label);
    }
    dataset
}


/// One feature alternates with the labels, so no single threshold
/// separates the classes.
fn alternating_line() -> LabeledDataset {
    let mut dataset = LabeledDataset::binary();
    for (i, label) in [-1_i8, 1, -1, 1].into_iter().enumerate() {
        dataset.push(DataInstance::new(vec![i as f64]), label);
    }
    dataset
}


/// Two overlapping Gaussian clusters in two dimensions.
fn gaussian_clusters(n_per_class: usize, seed: u64) -> LabeledDataset {
    let mut rng = StdRng::seed_from_u64(seed);
    let negative = Normal::new(-1.2, 1.0).unwrap();
    let positive = Normal::new(1.2, 1.0).unwrap();

    let mut dataset = LabeledDataset::binary();
    for _ in 0..n_per_class {
        let x = vec![negative.sample(&mut rng), negative.sample(&mut rng)];
        dataset.push(DataInstance::new(x), -1);

        let x = vec![positive.sample(&mut rng), positive.sample(&mut rng)];
        dataset.push(DataInstance::new(x), 1);
    }
    dataset
}


#[test]
fn separable_data_converges_to_zero_error() {
    let dataset = separable_line(10);
    let factory = ThresholdLearnerFactory::new(1);

    let mut rounds_run = 0;
    let mut booster = BoostedClassifier::new(&factory, 5, 10);
    booster.train_with_callback(&dataset, &[1.0; 10], |_| {
        rounds_run += 1;
        ControlFlow::Continue(())
    });

    assert_eq!(booster.classification_error(&dataset), 0.0);
    assert!(rounds_run <= 5);
    assert_eq!(booster.num_weak_learners(), rounds_run);
}


#[test]
fn overlapping_data_accumulates_a_useful_ensemble() {
    let dataset = gaussian_clusters(40, 2024);
    let factory = ThresholdLearnerFactory::new(2);

    let mut events: Vec<RoundEvent> = Vec::new();
    let mut booster = BoostedClassifier::new(&factory, 8, 10);
    booster.train_with_callback(&dataset, &vec![1.0; dataset.len()], |e| {
        events.push(e);
        ControlFlow::Continue(())
    });

    // one event per completed round, ensemble growing by one each time
    assert!(!events.is_empty());
    for (i, event) in events.iter().enumerate() {
        assert_eq!(event.round, i);
        assert_eq!(event.n_weak_learners, i + 1);
    }
    assert_eq!(booster.num_weak_learners(), events.len());

    let error = booster.classification_error(&dataset);
    assert!(error <= 0.3, "training error stayed at {error}");
}


#[test]
fn single_trial_rounds_accept_whatever_they_get() {
    let dataset = alternating_line();
    let factory = ThresholdLearnerFactory::new(1);

    let mut booster = BoostedClassifier::new(&factory, 3, 1);
    booster.train(&dataset, &[1.0; 4]);

    // no candidate is ever perfect here, so every round accepts its
    // single trial regardless of the attained loss
    assert_eq!(booster.num_weak_learners(), 3);
}


#[test]
fn classification_is_deterministic() {
    let dataset = separable_line(10);
    let factory = ThresholdLearnerFactory::new(1);

    let mut booster = BoostedClassifier::new(&factory, 3, 5);
    booster.train(&dataset, &[1.0; 10]);

    let probe = DataInstance::new(vec![3.0]);
    assert_eq!(booster.classify(&probe), booster.classify(&probe));
    assert_eq!(booster.response(&probe), booster.response(&probe));
}


#[test]
fn response_ranges_partition_the_full_response() {
    let dataset = gaussian_clusters(30, 7);
    let factory = ThresholdLearnerFactory::new(2);

    let mut booster = BoostedClassifier::new(&factory, 6, 5);
    booster.train(&dataset, &vec![1.0; dataset.len()]);

    let n = booster.num_weak_learners();
    assert!(n >= 1);

    let probe = dataset.instance_at(0);
    for split in 0..=n {
        let head = booster.response_range(probe, 0, split);
        let tail = booster.response_range(probe, split, n - split);
        let total = booster.response(probe);
        assert!((head + tail - total).abs() < 1e-9);
    }
}


#[test]
fn breaking_from_the_callback_stops_at_the_round_boundary() {
    let dataset = alternating_line();
    let factory = ThresholdLearnerFactory::new(1);

    let mut booster = BoostedClassifier::new(&factory, 10, 3);
    booster.train_with_callback(&dataset, &[1.0; 4], |event| {
        assert_eq!(event.round, 0);
        ControlFlow::Break(())
    });

    assert_eq!(booster.num_weak_learners(), 1);
}


#[test]
fn training_twice_appends_to_the_ensemble() {
    let dataset = alternating_line();
    let factory = ThresholdLearnerFactory::new(1);

    let mut booster = BoostedClassifier::new(&factory, 2, 3);
    booster.train(&dataset, &[1.0; 4]);
    let first = booster.num_weak_learners();

    booster.train(&dataset, &[1.0; 4]);
    assert_eq!(booster.num_weak_learners(), first + 2);
}


#[test]
#[should_panic]
fn empty_datasets_are_rejected() {
    let factory = ThresholdLearnerFactory::new(1);
    let mut booster = BoostedClassifier::new(&factory, 1, 1);
    booster.train(&LabeledDataset::binary(), &[]);
}


#[test]
#[should_panic]
fn mismatched_weight_vectors_are_rejected() {
    let dataset = separable_line(10);
    let factory = ThresholdLearnerFactory::new(1);
    let mut booster = BoostedClassifier::new(&factory, 1, 1);
    booster.train(&dataset, &[1.0; 9]);
}
