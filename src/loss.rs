//! Provides [`ExponentialLoss`], the loss driving the AdaBoost round loop.
use rayon::prelude::*;


/// The solution of the closed-form line search along a weak learner's
/// prediction direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OptimalStep {
    /// How far to move along the direction: `0.5 · ln(W₊ / W₋)`.
    pub step: f64,
    /// The loss attained after the step: `W₀ + 2·√(W₊·W₋)`.
    pub loss: f64,
}


/// Why a line search has no finite optimizer.
///
/// Surfaced as an explicit value so the caller can reject (or, for a
/// perfect direction, adopt and terminate) instead of carrying a
/// non-finite step into the ensemble.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Degeneracy {
    /// The direction agrees with every sample carrying loss mass
    /// (`W₋ = 0`): the optimal step diverges to `+∞`, and the loss
    /// approaches the abstained mass `W₀` carried here.
    PerfectDirection {
        /// The infimum of the loss along the direction, `W₀`.
        loss: f64,
    },
    /// The direction opposes every sample carrying loss mass
    /// (`W₊ = 0`): the optimal step diverges to `−∞`.
    OpposedDirection,
    /// The direction abstains on every sample carrying loss mass,
    /// so no step changes the loss.
    NoSignedMass,
}


/// The exponential loss `wᵢ · exp(-yᵢ rᵢ)` over per-sample responses.
///
/// [`value`](ExponentialLoss::value) doubles as the AdaBoost weight
/// update: evaluating it with the *original* sample weights and the
/// accumulated responses yields the next round's training weights, so the
/// round loop reuses the same computation for reporting loss and for
/// reweighting.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExponentialLoss;


impl ExponentialLoss {
    /// Per-sample loss:
    /// `out[i] = base_weights[i] · exp(-labels[i] · responses[i])`.
    pub fn value(
        &self,
        labels: &[i8],
        base_weights: &[f64],
        responses: &[f64],
    ) -> Vec<f64>
    {
        let mut out = vec![0.0; labels.len()];
        self.value_into(labels, base_weights, responses, &mut out);
        out
    }


    /// As [`value`](ExponentialLoss::value), writing into a caller-owned
    /// buffer so the round loop can reuse its weight vector in place.
    pub fn value_into(
        &self,
        labels: &[i8],
        base_weights: &[f64],
        responses: &[f64],
        out: &mut [f64],
    )
    {
        assert_eq!(labels.len(), base_weights.len());
        assert_eq!(labels.len(), responses.len());
        assert_eq!(labels.len(), out.len());

        out.par_iter_mut()
            .zip(labels)
            .zip(base_weights)
            .zip(responses)
            .for_each(|(((o, &y), &w), &r)| {
                *o = w * (-f64::from(y) * r).exp();
            });
    }


    /// Per-sample derivative with respect to the responses:
    /// `-labels[i] · value[i]`.
    pub fn gradient(
        &self,
        labels: &[i8],
        base_weights: &[f64],
        responses: &[f64],
    ) -> Vec<f64>
    {
        let mut out = self.value(labels, base_weights, responses);
        out.iter_mut()
            .zip(labels)
            .for_each(|(o, &y)| *o *= -f64::from(y));
        out
    }


    /// Closed-form line search along `direction`.
    ///
    /// Partitions the per-sample loss mass into three buckets by the sign
    /// of `direction[i] · labels[i]` (`W₋`, `W₀`, `W₊`) and returns the
    /// optimal step `0.5·ln(W₊/W₋)` with the loss attained after it.
    ///
    /// When `W₋` or `W₊` carries no mass the step is infinite; the
    /// returned [`Degeneracy`] says which way, so the caller can reject
    /// the direction (or recognize a perfect one) instead of propagating
    /// a non-finite weight into the ensemble.
    ///
    /// # Panics
    /// When some `direction[i] · labels[i]` lies outside `{-1, 0, +1}`,
    /// which violates the classifier contract.
    pub fn optimal_step(
        &self,
        labels: &[i8],
        base_weights: &[f64],
        responses: &[f64],
        direction: &[i8],
    ) -> Result<OptimalStep, Degeneracy>
    {
        assert_eq!(labels.len(), base_weights.len());
        assert_eq!(labels.len(), responses.len());
        assert_eq!(labels.len(), direction.len());

        let mut w_minus = 0.0;
        let mut w_zero = 0.0;
        let mut w_plus = 0.0;

        for i in 0..labels.len() {
            let val = base_weights[i]
                * (-f64::from(labels[i]) * responses[i]).exp();

            match direction[i] * labels[i] {
                -1 => w_minus += val,
                0 => w_zero += val,
                1 => w_plus += val,
                product => panic!(
                    "direction[{i}] · label[{i}] = {product}; \
                     predictions must lie in {{-1, 0, +1}}"
                ),
            }
        }

        if w_minus <= 0.0 && w_plus <= 0.0 {
            return Err(Degeneracy::NoSignedMass);
        }
        if w_minus <= 0.0 {
            return Err(Degeneracy::PerfectDirection { loss: w_zero });
        }
        if w_plus <= 0.0 {
            return Err(Degeneracy::OpposedDirection);
        }

        Ok(OptimalStep {
            step: 0.5 * (w_plus / w_minus).ln(),
            loss: w_zero + 2.0 * (w_plus * w_minus).sqrt(),
        })
    }
}
