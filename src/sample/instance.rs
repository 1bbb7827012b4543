//! Provides [`DataInstance`], the basic feature-vector type.
use serde::{Serialize, Deserialize};

use std::ops::Index;


/// A single example: an ordered, fixed-length sequence of real-valued
/// features. Instances are immutable after creation.
///
/// Two instances are *compatible* when they carry the same number of
/// features. Datasets enforce compatibility across all of their members,
/// so a classifier trained on one dataset can score any instance the
/// dataset would accept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataInstance {
    features: Vec<f64>,
}


impl DataInstance {
    /// Construct an instance from its feature values.
    pub fn new(features: Vec<f64>) -> Self {
        Self { features }
    }


    /// The feature values as a slice.
    pub fn features(&self) -> &[f64] {
        &self.features[..]
    }


    /// The value of the `index`-th feature.
    pub fn feature(&self, index: usize) -> f64 {
        self.features[index]
    }


    /// Number of features.
    pub fn len(&self) -> usize {
        self.features.len()
    }


    /// `true` if the instance has no features.
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }


    /// Two instances are compatible when their feature counts agree.
    pub fn is_compatible(&self, other: &Self) -> bool {
        self.features.len() == other.features.len()
    }
}


impl From<Vec<f64>> for DataInstance {
    fn from(features: Vec<f64>) -> Self {
        Self::new(features)
    }
}


impl Index<usize> for DataInstance {
    type Output = f64;

    fn index(&self, index: usize) -> &Self::Output {
        &self.features[index]
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compatibility_is_length_equality() {
        let a = DataInstance::new(vec![1.0, 2.0, 3.0]);
        let b = DataInstance::new(vec![-0.5, 0.0, 9.9]);
        let c = DataInstance::new(vec![1.0]);

        assert!(a.is_compatible(&b));
        assert!(b.is_compatible(&a));
        assert!(!a.is_compatible(&c));
    }

    #[test]
    fn indexing_matches_features() {
        let x = DataInstance::from(vec![0.25, -1.5]);
        assert_eq!(x[0], 0.25);
        assert_eq!(x.feature(1), -1.5);
        assert_eq!(x.len(), 2);
    }
}
