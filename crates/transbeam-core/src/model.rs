//! Feature extraction and linear parameter models.

use std::fmt::Debug;

/// Maps a configuration to a feature representation.
pub trait FeatureExtractor<C>: Send + Sync {
    /// Domain-opaque sparse feature representation.
    type Features: Send;

    /// Extracts the features of `configuration`.
    fn features(&self, configuration: &C) -> Self::Features;
}

/// An accumulation of feature counts used as a weight-vector update.
pub trait WeightDelta<F>: Debug + Send {
    /// Adds one occurrence of every feature in `features`.
    fn accumulate(&mut self, features: &F);
}

/// A linear model scoring feature representations.
///
/// The search never mutates a model; training deltas are returned to
/// the caller, which owns the online-learning update.
pub trait ParameterModel<F>: Send + Sync {
    /// Weight-vector delta produced for training.
    type Delta: WeightDelta<F>;

    /// Scores `features` as the increment for the transition just taken.
    fn score(&self, features: &F) -> f64;

    /// Creates an empty delta.
    fn zero_delta(&self) -> Self::Delta;
}
