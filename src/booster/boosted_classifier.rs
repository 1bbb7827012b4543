//! Provides [`BoostedClassifier`], AdaBoost over trial-selected weak
//! learners.
use rayon::prelude::*;

use std::ops::ControlFlow;

use crate::classifier::{Classifier, ClassifierFactory};
use crate::common::checker;
use crate::loss::{Degeneracy, ExponentialLoss, OptimalStep};
use crate::sample::{
    BufferedLabeledDataset,
    DataInstance,
    DataInstanceLoader,
    LabeledDataset,
};


/// What the round callback observes after every completed boosting round.
#[derive(Debug, Clone, Copy)]
pub struct RoundEvent {
    /// Zero-based index of the round that just completed.
    pub round: usize,
    /// Number of weak learners accepted so far, over all training calls.
    pub n_weak_learners: usize,
}


/// The outcome of a single trial inside a round.
struct Trial<H> {
    learner: H,
    predictions: Vec<i8>,
    optimal: Result<OptimalStep, Degeneracy>,
}


/// A linear combination of weak learners trained by the AdaBoost
/// algorithm.
///
/// Every round runs `trials_per_learner` independent trials: each trial
/// asks the factory for a fresh randomized weak learner, trains it on the
/// dataset under the current per-sample weights, and evaluates the
/// closed-form line search along its predictions. The trial with the
/// strictly lowest attainable loss wins (earliest trial on ties); the
/// losers are dropped before the round ends. The winner's weighted
/// predictions are folded into the running response vector, and the next
/// round's weights are recomputed from the *initial* weights and the
/// accumulated responses, which is the exponential-loss weight update.
///
/// Trials inside one round are independent and run on the rayon pool;
/// rounds themselves are strictly sequential, since each depends on the
/// previous round's weights and responses.
///
/// A trial whose line search diverges is rejected rather than given a
/// non-finite weight, with one exception. A trial that is *perfect*
/// under the current weights (no misclassified loss mass) competes by
/// the loss it attains, and on winning its round is accepted with unit
/// weight; training then stops at the round boundary, since such a
/// learner leaves nothing for boosting to reweight against.
///
/// Training calls accumulate: a second call to
/// [`train`](BoostedClassifier::train) appends further weak learners to
/// the existing ensemble, which is what
/// [`train_in_batch_mode`](BoostedClassifier::train_in_batch_mode)
/// relies on.
///
/// # Example
/// ```
/// use activeboost::prelude::*;
///
/// let mut dataset = LabeledDataset::binary();
/// for i in 0..10 {
///     let label = if i < 5 { -1 } else { 1 };
///     dataset.push(DataInstance::new(vec![i as f64, 0.5]), label);
/// }
///
/// let factory = ThresholdLearnerFactory::new(2);
/// let mut booster = BoostedClassifier::new(&factory, 5, 10);
/// booster.train(&dataset, &vec![1.0; 10]);
///
/// assert!(booster.num_weak_learners() >= 1);
/// let label = booster.classify(dataset.instance_at(0));
/// assert!(label == -1 || label == 1);
/// ```
pub struct BoostedClassifier<'a, W: ClassifierFactory> {
    factory: &'a W,
    loss_function: ExponentialLoss,
    learners_to_add: usize,
    trials_per_learner: usize,

    // training state, rebuilt at the start of every `train` call
    responses: Vec<f64>,
    curr_weights: Vec<f64>,

    // full-dataset state carried across batches in batch mode
    big_dataset_responses: Vec<f64>,
    big_dataset_weights: Vec<f64>,

    // the strong classifier
    weak_learner_weights: Vec<f64>,
    weak_learners: Vec<W::Hypothesis>,
    decision_threshold: f64,
}


impl<'a, W: ClassifierFactory> BoostedClassifier<'a, W> {
    /// Construct an untrained boosted classifier.
    ///
    /// `learners_to_add` is the number of rounds one training call runs;
    /// `trials_per_learner` the number of weak learner candidates tried
    /// per round. The factory is borrowed for the classifier's lifetime.
    pub fn new(
        factory: &'a W,
        learners_to_add: usize,
        trials_per_learner: usize,
    ) -> Self
    {
        Self {
            factory,
            loss_function: ExponentialLoss,
            learners_to_add,
            trials_per_learner,

            responses: Vec::new(),
            curr_weights: Vec::new(),
            big_dataset_responses: Vec::new(),
            big_dataset_weights: Vec::new(),

            weak_learner_weights: Vec::new(),
            weak_learners: Vec::new(),
            decision_threshold: 0.0,
        }
    }


    /// Set the decision threshold used by
    /// [`classify`](Classifier::classify). Defaults to `0`.
    pub fn decision_threshold(mut self, threshold: f64) -> Self {
        self.decision_threshold = threshold;
        self
    }


    /// Number of weak learners accepted so far.
    pub fn num_weak_learners(&self) -> usize {
        self.weak_learners.len()
    }


    /// The weight given to each accepted weak learner, in order.
    pub fn weak_learner_weights(&self) -> &[f64] {
        &self.weak_learner_weights[..]
    }


    /// The combined response of the contiguous weak learner range
    /// `[first, first + count)`, for inspecting the marginal
    /// contribution of a slice of the ensemble.
    pub fn response_range(
        &self,
        instance: &DataInstance,
        first: usize,
        count: usize,
    ) -> f64
    {
        assert!(
            first + count <= self.weak_learners.len(),
            "weak learner range {first}..{} is out of bounds ({} accepted)",
            first + count,
            self.weak_learners.len(),
        );

        self.weak_learner_weights[first..first + count]
            .iter()
            .zip(&self.weak_learners[first..first + count])
            .map(|(weight, learner)| {
                weight * f64::from(learner.classify(instance))
            })
            .sum()
    }
}


impl<'a, W> BoostedClassifier<'a, W>
    where W: ClassifierFactory + Sync,
          W::Hypothesis: Send,
{
    /// Run `learners_to_add` boosting rounds on an in-memory dataset,
    /// appending the winning weak learner of every round.
    ///
    /// `initial_weights` is the per-sample importance the weight updates
    /// stay relative to; pass uniform weights when in doubt.
    pub fn train(
        &mut self,
        dataset: &LabeledDataset,
        initial_weights: &[f64],
    )
    {
        self.train_with_callback(dataset, initial_weights, |_| {
            ControlFlow::Continue(())
        });
    }


    /// As [`train`](BoostedClassifier::train), invoking `callback` after
    /// every completed round with the round index and the current
    /// ensemble size. Returning [`ControlFlow::Break`] stops training at
    /// the round boundary, with the ensemble intact; a partially trained
    /// candidate is never promoted.
    pub fn train_with_callback<C>(
        &mut self,
        dataset: &LabeledDataset,
        initial_weights: &[f64],
        mut callback: C,
    )
        where C: FnMut(RoundEvent) -> ControlFlow<()>,
    {
        checker::check_dataset(dataset);
        checker::check_binary_labels(dataset);
        checker::check_weights(initial_weights, dataset.len());
        assert!(self.learners_to_add > 0, "learners_to_add must be positive");
        assert!(
            self.trials_per_learner > 0,
            "trials_per_learner must be positive",
        );

        let labels = dataset.labels();
        self.responses = vec![0.0; dataset.len()];
        self.curr_weights = initial_weights.to_vec();

        for round in 0..self.learners_to_add {
            let trials = self.run_trials(dataset, labels, initial_weights);

            // strictly lower attainable loss wins; ties keep the
            // earliest trial. A perfect trial attains its abstained
            // mass, so it competes on the same scale.
            let mut best: Option<(Trial<W::Hypothesis>, f64)> = None;
            for trial in trials {
                let attainable = match trial.optimal {
                    Ok(optimal) => optimal.loss,
                    Err(Degeneracy::PerfectDirection { loss }) => loss,
                    Err(_) => continue, // unusable candidate, drop it
                };
                let incumbent = best.as_ref().map(|(_, loss)| *loss);
                if incumbent.map_or(true, |loss| attainable < loss) {
                    best = Some((trial, attainable));
                }
            }

            let Some((trial, _)) = best else {
                panic!(
                    "every trial of round {round} produced a divergent \
                     line search; no usable weak learner was found"
                );
            };

            let terminal = match trial.optimal {
                Ok(optimal) => {
                    self.accept(trial, optimal.step, labels, initial_weights);
                    false
                }
                // a perfect learner leaves nothing for boosting to
                // reweight against; adopt it and stop at the boundary
                Err(_) => {
                    self.accept(trial, 1.0, labels, initial_weights);
                    true
                }
            };

            let event = RoundEvent {
                round,
                n_weak_learners: self.weak_learners.len(),
            };
            if callback(event).is_break() || terminal {
                break;
            }
        }
    }


    /// Train on a dataset that does not fit in memory.
    ///
    /// Keeps a weight/response pair sized to the *full* dataset. Every
    /// batch refreshes the full-dataset weights through the loss
    /// function, resamples the buffer's active set under them, and runs
    /// the in-memory round loop on the active set with the resampled
    /// frequencies as weights, so only the active set is ever
    /// materialized for training.
    ///
    /// At the start of each batch, only the weak learners appended during
    /// the *previous* batch are folded into the stored full-dataset
    /// responses, while the round loop tracks its own responses per
    /// active-set slot. Since resampling changes which physical items
    /// occupy those slots, the aggregation across batches is a known
    /// approximation, accepted in exchange for never touching more than
    /// one batch of response updates per full-dataset pass.
    pub fn train_in_batch_mode<L>(
        &mut self,
        buffered_dataset: &mut BufferedLabeledDataset<L>,
        initial_weights: &[f64],
        n_batches: usize,
    )
        where L: DataInstanceLoader,
    {
        assert!(n_batches > 0, "n_batches must be positive");
        assert!(
            !buffered_dataset.is_empty(),
            "the buffered dataset holds no items",
        );
        checker::check_weights(initial_weights, buffered_dataset.len());

        let n_items = buffered_dataset.len();
        self.big_dataset_weights = initial_weights.to_vec();
        self.big_dataset_responses = vec![0.0; n_items];

        // span of the ensemble filled by the previous batch
        let mut previous_span = self.weak_learners.len()..self.weak_learners.len();

        for batch in 0..n_batches {
            if batch > 0 {
                let first = previous_span.start;
                let count = previous_span.len();
                for i in 0..n_items {
                    let instance = buffered_dataset.instance_at(i);
                    let contribution =
                        self.response_range(&instance, first, count);
                    self.big_dataset_responses[i] += contribution;
                }
            }

            self.loss_function.value_into(
                buffered_dataset.labels(),
                initial_weights,
                &self.big_dataset_responses,
                &mut self.big_dataset_weights,
            );

            let active_weights =
                buffered_dataset.resample_active_set(&self.big_dataset_weights);

            let before = self.weak_learners.len();
            self.train(buffered_dataset.active_set(), &active_weights);
            previous_span = before..self.weak_learners.len();
        }
    }


    /// Run the independent trials of one round on the rayon pool.
    fn run_trials(
        &self,
        dataset: &LabeledDataset,
        labels: &[i8],
        initial_weights: &[f64],
    ) -> Vec<Trial<W::Hypothesis>>
    {
        let factory = self.factory;
        let loss_function = self.loss_function;
        let responses = &self.responses[..];
        let curr_weights = &self.curr_weights[..];

        (0..self.trials_per_learner)
            .into_par_iter()
            .map(|_| {
                let mut learner = factory.random_instance();
                learner.train(dataset, curr_weights);
                let predictions = learner.classifications(dataset);

                let optimal = loss_function.optimal_step(
                    labels,
                    initial_weights,
                    responses,
                    &predictions,
                );
                Trial { learner, predictions, optimal }
            })
            .collect()
    }


    /// Promote a winning trial into the strong classifier and update the
    /// responses and weights for the next round.
    fn accept(
        &mut self,
        trial: Trial<W::Hypothesis>,
        weight: f64,
        labels: &[i8],
        initial_weights: &[f64],
    )
    {
        let Trial { learner, predictions, .. } = trial;

        self.weak_learner_weights.push(weight);
        self.weak_learners.push(learner);

        self.responses.par_iter_mut()
            .zip(&predictions)
            .for_each(|(r, &p)| *r += weight * f64::from(p));

        self.loss_function.value_into(
            labels,
            initial_weights,
            &self.responses,
            &mut self.curr_weights,
        );
    }
}


impl<W> Classifier for BoostedClassifier<'_, W>
    where W: ClassifierFactory + Sync,
          W::Hypothesis: Send,
{
    fn train(&mut self, dataset: &LabeledDataset, weights: &[f64]) {
        BoostedClassifier::train(self, dataset, weights);
    }


    /// The weighted vote of every accepted weak learner.
    fn response(&self, instance: &DataInstance) -> f64 {
        self.weak_learner_weights.iter()
            .zip(&self.weak_learners)
            .map(|(weight, learner)| {
                weight * f64::from(learner.classify(instance))
            })
            .sum()
    }


    /// `-1` when the response does not exceed the decision threshold,
    /// `+1` otherwise.
    fn classify(&self, instance: &DataInstance) -> i8 {
        let response = Classifier::response(self, instance);
        if response <= self.decision_threshold { -1 } else { 1 }
    }
}
