//! Provides [`WeightedSampler`], weighted sampling through a binary
//! reduction tree.
use rand::prelude::*;
use rand::rngs::StdRng;

use super::{check_sampling_request, DataSampler, Draw};


/// Draws `k` **distinct** indices from a weight vector, each item's
/// chance of selection proportional to its weight.
///
/// The sampler builds a binary reduction tree over the weight vector by
/// pairing adjacent entries and summing, level by level, up to a single
/// root holding the total mass. A draw starts at the root and walks down,
/// choosing at every node between the two children with probability
/// proportional to each child's share of the pair-sum. One draw costs
/// `O(log n)` instead of the `O(n)` of a cumulative scan.
///
/// Independent draws repeat, so whole sampling rounds of `k` draws are
/// replayed, merging per-item occurrence counts, until `k` distinct
/// indices have been seen. The reported frequency of an item is its
/// occurrence count normalized over the selected items only.
///
/// # Example
/// ```
/// use activeboost::{DataSampler, WeightedSampler};
///
/// let weights = [0.1, 4.0, 0.0, 2.5];
/// let draw = WeightedSampler::with_seed(7).sample(&weights, 2);
///
/// assert_eq!(draw.indices.len(), 2);
/// assert!((draw.total_mass - 6.6).abs() < 1e-9);
/// let sum = draw.frequencies.iter().sum::<f64>();
/// assert!((sum - 1.0).abs() < 1e-9);
/// ```
pub struct WeightedSampler {
    rng: StdRng,
}


impl WeightedSampler {
    /// Construct a sampler seeded from system entropy.
    pub fn new() -> Self {
        Self { rng: StdRng::from_entropy() }
    }


    /// Construct a sampler with a fixed seed, for reproducible draws.
    pub fn with_seed(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed) }
    }


    /// Build the reduction tree bottom-up.
    /// `levels[0]` is the weight vector itself; every following level
    /// holds the sums of adjacent pairs, an odd tail carried up
    /// unchanged; the last level is the single root.
    fn build_levels(weights: &[f64]) -> Vec<Vec<f64>> {
        let mut levels = vec![weights.to_vec()];
        while levels.last().unwrap().len() > 1 {
            let prev = levels.last().unwrap();
            let n = prev.len();

            let mut next = Vec::with_capacity((n + 1) / 2);
            for k in 0..n / 2 {
                next.push(prev[2 * k] + prev[2 * k + 1]);
            }
            if n % 2 == 1 {
                next.push(prev[n - 1]);
            }
            levels.push(next);
        }
        levels
    }


    /// Resolve one draw top-down: start at the root and descend,
    /// at each node keeping the left child with probability
    /// `left / parent`.
    fn descend(&mut self, levels: &[Vec<f64>]) -> usize {
        let mut index = 0;
        for depth in (0..levels.len() - 1).rev() {
            let children = &levels[depth];
            let parent_weight = levels[depth + 1][index];

            let left = 2 * index;
            if left + 1 >= children.len() {
                // odd tail: the node was carried up unchanged
                index = left;
                continue;
            }

            let u = self.rng.gen::<f64>();
            index = if u * parent_weight <= children[left] {
                left
            } else {
                left + 1
            };
        }
        index
    }
}


impl Default for WeightedSampler {
    fn default() -> Self {
        Self::new()
    }
}


impl DataSampler for WeightedSampler {
    fn sample(&mut self, weights: &[f64], k: usize) -> Draw {
        check_sampling_request(weights, k);

        let levels = Self::build_levels(weights);
        let total_mass = levels.last().unwrap()[0];
        assert!(total_mass > 0.0, "total weight mass must be positive");

        // Repeat whole rounds of `k` draws, merging occurrence counts,
        // until `k` distinct indices have been reached. Draws arriving
        // after the k-th distinct index are discarded.
        let mut occurrences = vec![0usize; weights.len()];
        let mut n_distinct = 0;
        while n_distinct < k {
            let round = (0..k)
                .map(|_| self.descend(&levels))
                .collect::<Vec<_>>();

            for index in round {
                if n_distinct == k {
                    break;
                }
                occurrences[index] += 1;
                if occurrences[index] == 1 {
                    n_distinct += 1;
                }
            }
        }

        let mut indices = Vec::with_capacity(k);
        let mut frequencies = Vec::with_capacity(k);
        let mut sampled_mass = 0.0;
        for (index, &count) in occurrences.iter().enumerate() {
            if count > 0 {
                indices.push(index);
                frequencies.push(count as f64);
                sampled_mass += count as f64;
            }
        }

        for freq in frequencies.iter_mut() {
            *freq /= sampled_mass;
        }

        Draw { indices, frequencies, total_mass }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_item_always_selected() {
        let mut sampler = WeightedSampler::with_seed(0);
        let draw = sampler.sample(&[3.5], 1);

        assert_eq!(draw.indices, vec![0]);
        assert_eq!(draw.frequencies, vec![1.0]);
        assert_eq!(draw.total_mass, 3.5);
    }

    #[test]
    fn never_selects_zero_weight_items() {
        let weights = [0.0, 1.0, 0.0, 2.0, 0.0];
        let mut sampler = WeightedSampler::with_seed(42);

        for _ in 0..50 {
            let draw = sampler.sample(&weights, 2);
            assert_eq!(draw.indices, vec![1, 3]);
        }
    }

    #[test]
    fn heavy_items_dominate() {
        // one item carries 99% of the mass; over many single draws
        // it must be selected most of the time
        let mut weights = vec![0.001; 11];
        weights[4] = 1.0;

        let mut sampler = WeightedSampler::with_seed(1);
        let hits = (0..500)
            .filter(|_| sampler.sample(&weights, 1).indices == vec![4])
            .count();
        assert!(hits > 400, "heavy item selected only {hits}/500 times");
    }

    #[test]
    fn sampling_everything_returns_all_indices() {
        let weights = [0.5, 0.25, 0.125, 0.125];
        let mut sampler = WeightedSampler::with_seed(9);
        let draw = sampler.sample(&weights, 4);

        assert_eq!(draw.indices, vec![0, 1, 2, 3]);
        let sum = draw.frequencies.iter().sum::<f64>();
        assert!((sum - 1.0).abs() < 1e-9);
        assert!((draw.total_mass - 1.0).abs() < 1e-12);
    }

    #[test]
    #[should_panic]
    fn rejects_all_zero_weights() {
        WeightedSampler::with_seed(3).sample(&[0.0, 0.0], 1);
    }
}
