//! Sparse linear model over string features.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use transbeam_core::{ParameterModel, WeightDelta};

/// Feature counts accumulated along a derivation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseWeightVector {
    counts: HashMap<String, f64>,
}

impl SparseWeightVector {
    /// Creates an empty vector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the count of `feature` (0 if absent).
    pub fn get(&self, feature: &str) -> f64 {
        self.counts.get(feature).copied().unwrap_or(0.0)
    }

    /// Returns true if `feature` was accumulated at least once.
    pub fn contains(&self, feature: &str) -> bool {
        self.counts.contains_key(feature)
    }

    /// Returns the number of distinct features.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Returns true if nothing was accumulated.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Iterates over distinct features and their counts.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.counts.iter().map(|(f, c)| (f.as_str(), *c))
    }
}

impl WeightDelta<Vec<String>> for SparseWeightVector {
    fn accumulate(&mut self, features: &Vec<String>) {
        for feature in features {
            *self.counts.entry(feature.clone()).or_insert(0.0) += 1.0;
        }
    }
}

/// A linear model summing the weights of present features.
///
/// Features without an explicit weight score 0, or, for a seeded model,
/// a fixed pseudo-random weight in `[-1, 1)` derived from the feature.
#[derive(Debug, Clone, Default)]
pub struct LinearModel {
    weights: HashMap<String, f64>,
    seed: Option<u64>,
}

impl LinearModel {
    /// Creates a model with all weights zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a model with seeded pseudo-random default weights.
    pub fn seeded(seed: u64) -> Self {
        Self {
            weights: HashMap::new(),
            seed: Some(seed),
        }
    }

    /// Sets the weight of `feature`.
    pub fn with_weight(mut self, feature: impl Into<String>, weight: f64) -> Self {
        self.weights.insert(feature.into(), weight);
        self
    }

    /// Returns the weight of `feature`.
    pub fn weight(&self, feature: &str) -> f64 {
        match (self.weights.get(feature), self.seed) {
            (Some(weight), _) => *weight,
            (None, Some(seed)) => seeded_weight(feature, seed),
            (None, None) => 0.0,
        }
    }

    /// Applies a perceptron update: adds `add` and subtracts `subtract`.
    pub fn update(&mut self, add: &SparseWeightVector, subtract: &SparseWeightVector) {
        for (feature, count) in add.iter() {
            let weight = self.weight(feature) + count;
            self.weights.insert(feature.to_string(), weight);
        }
        for (feature, count) in subtract.iter() {
            let weight = self.weight(feature) - count;
            self.weights.insert(feature.to_string(), weight);
        }
    }
}

fn seeded_weight(feature: &str, seed: u64) -> f64 {
    let mut hasher = DefaultHasher::new();
    feature.hash(&mut hasher);
    let mut rng = ChaCha8Rng::seed_from_u64(hasher.finish() ^ seed);
    rng.random_range(-1.0..1.0)
}

impl ParameterModel<Vec<String>> for LinearModel {
    type Delta = SparseWeightVector;

    fn score(&self, features: &Vec<String>) -> f64 {
        features.iter().map(|f| self.weight(f)).sum()
    }

    fn zero_delta(&self) -> Self::Delta {
        SparseWeightVector::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_sums_weights() {
        let model = LinearModel::new().with_weight("a", 1.5).with_weight("b", -0.5);
        let features = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        assert_eq!(model.score(&features), 1.0);
    }

    #[test]
    fn test_seeded_weights_are_stable() {
        let model = LinearModel::seeded(7);
        let w = model.weight("s0p=NN");
        assert_eq!(w, LinearModel::seeded(7).weight("s0p=NN"));
        assert!((-1.0..1.0).contains(&w));
    }

    #[test]
    fn test_update() {
        let mut add = SparseWeightVector::new();
        add.accumulate(&vec!["x".to_string(), "x".to_string()]);
        let mut subtract = SparseWeightVector::new();
        subtract.accumulate(&vec!["y".to_string()]);

        let mut model = LinearModel::new();
        model.update(&add, &subtract);
        assert_eq!(model.weight("x"), 2.0);
        assert_eq!(model.weight("y"), -1.0);
    }
}
