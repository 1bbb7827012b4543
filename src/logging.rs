//! Provides [`RoundLogger`], console progress reporting for training.
use colored::Colorize;

use std::ops::ControlFlow;
use std::time::{Duration, Instant};

use crate::booster::RoundEvent;

const WIDTH: usize = 8;


/// Prints one tagged line per observed boosting round, and optionally
/// stops training when a wall-clock deadline passes.
///
/// Use it as the round callback of
/// [`train_with_callback`](crate::BoostedClassifier::train_with_callback).
/// The deadline is checked at round boundaries only, so a cancelled run
/// never keeps a partially trained weak learner.
///
/// # Example
/// ```
/// use std::time::Duration;
/// use activeboost::prelude::*;
///
/// let mut dataset = LabeledDataset::binary();
/// for i in 0..10 {
///     let label = if i < 5 { -1 } else { 1 };
///     dataset.push(DataInstance::new(vec![i as f64, 1.0]), label);
/// }
///
/// let factory = ThresholdLearnerFactory::new(2);
/// let mut booster = BoostedClassifier::new(&factory, 10, 5);
///
/// let mut logger = RoundLogger::new()
///     .print_every(2)
///     .time_limit(Duration::from_secs(30));
/// booster.train_with_callback(&dataset, &vec![1.0; 10], |event| {
///     logger.observe(event)
/// });
/// ```
pub struct RoundLogger {
    print_every: usize,
    time_limit: Option<Duration>,
    started: Option<Instant>,
}


impl RoundLogger {
    /// A logger that prints every round and never cancels.
    pub fn new() -> Self {
        Self {
            print_every: 1,
            time_limit: None,
            started: None,
        }
    }


    /// Print only every `rounds`-th round.
    /// Pass `usize::MAX` to silence the log entirely.
    pub fn print_every(mut self, rounds: usize) -> Self {
        self.print_every = rounds;
        self
    }


    /// Stop training once `limit` has elapsed, measured from the first
    /// observed round.
    pub fn time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }


    /// Handle one completed round: log it, then decide whether training
    /// continues.
    pub fn observe(&mut self, event: RoundEvent) -> ControlFlow<()> {
        let started = *self.started.get_or_insert_with(Instant::now);
        let elapsed = started.elapsed();

        if let Some(limit) = self.time_limit {
            if elapsed > limit {
                println!(
                    "{} {}\t{}\t{}",
                    "[TLE]".bold().bright_red(),
                    format!("{:>WIDTH$}", event.round).bold().red(),
                    format!("{:>WIDTH$}", event.n_weak_learners).bold().green(),
                    time_format(elapsed.as_millis()).bold().cyan(),
                );
                return ControlFlow::Break(());
            }
        }

        if self.print_every != usize::MAX
            && (event.round + 1) % self.print_every == 0
        {
            println!(
                "{} {}\t{}\t{}",
                "[LOG]".bold().magenta(),
                format!("{:>WIDTH$}", event.round).red(),
                format!("{:>WIDTH$}", event.n_weak_learners).green(),
                time_format(elapsed.as_millis()).cyan(),
            );
        }

        ControlFlow::Continue(())
    }
}


impl Default for RoundLogger {
    fn default() -> Self {
        Self::new()
    }
}


fn time_format(millisec: u128) -> String {
    if millisec < 1_000 {
        return format!("  0.{:0>3}s", millisec);
    }
    let sec = millisec / 1_000;
    let millisec = millisec % 1_000;
    if sec < 60 {
        return format!(" {:0>2}.{:0>3}s", sec, millisec);
    }
    let min = sec / 60;
    let sec = sec % 60;
    if min < 60 {
        return format!(" {:0>2}m {:0>2}s", min, sec);
    }
    let hours = min / 60;
    let min = min % 60;
    format!(" {:0>2}h {:0>2}m", hours, min)
}
