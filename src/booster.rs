//! The files in `booster/` directory define the boosting round loop.

mod boosted_classifier;

pub use boosted_classifier::{BoostedClassifier, RoundEvent};
