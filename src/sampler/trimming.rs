//! Provides [`TrimmingSampler`], deterministic top-k selection.
use super::{check_sampling_request, DataSampler, Draw};


/// Keeps the `k` indices of highest weight instead of sampling.
///
/// A cheaper, zero-variance alternative to
/// [`WeightedSampler`](crate::WeightedSampler) for callers that care about
/// covering the heaviest part of the distribution rather than drawing an
/// unbiased subset. Frequencies are each selected weight divided by the
/// captured mass (the sum over the selected items); ties between equal
/// weights are broken towards the higher index.
pub struct TrimmingSampler;


impl DataSampler for TrimmingSampler {
    fn sample(&mut self, weights: &[f64], k: usize) -> Draw {
        check_sampling_request(weights, k);

        let total_mass = weights.iter().sum::<f64>();
        assert!(total_mass > 0.0, "total weight mass must be positive");

        let mut order = (0..weights.len()).collect::<Vec<_>>();
        order.sort_by(|&i, &j| {
            weights[i].partial_cmp(&weights[j])
                .expect("weights must not contain NaN")
                .then(i.cmp(&j))
        });

        let mut indices = order.into_iter().rev().take(k).collect::<Vec<_>>();
        indices.sort_unstable();

        let captured_mass = indices.iter().map(|&i| weights[i]).sum::<f64>();
        let frequencies = indices.iter()
            .map(|&i| weights[i] / captured_mass)
            .collect::<Vec<_>>();

        Draw { indices, frequencies, total_mass }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_the_heaviest_items() {
        let weights = [0.3, 5.0, 0.01, 2.0, 1.0];
        let draw = TrimmingSampler.sample(&weights, 3);

        assert_eq!(draw.indices, vec![1, 3, 4]);
        assert_eq!(draw.total_mass, weights.iter().sum::<f64>());

        let captured = 5.0 + 2.0 + 1.0;
        assert_eq!(
            draw.frequencies,
            vec![5.0 / captured, 2.0 / captured, 1.0 / captured],
        );
    }

    #[test]
    fn frequencies_sum_to_one() {
        let weights = [1.0, 2.0, 3.0, 4.0];
        let draw = TrimmingSampler.sample(&weights, 2);
        let sum = draw.frequencies.iter().sum::<f64>();
        assert!((sum - 1.0).abs() < 1e-12);
    }

    #[test]
    fn ties_break_towards_higher_index() {
        let weights = [1.0, 1.0, 1.0];
        let draw = TrimmingSampler.sample(&weights, 2);
        assert_eq!(draw.indices, vec![1, 2]);
    }
}
