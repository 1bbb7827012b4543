//! The files in `weak_learner/` directory define concrete weak learners
//! usable with the boosting round loop.

mod threshold;

pub use threshold::{ThresholdLearner, ThresholdLearnerFactory};
