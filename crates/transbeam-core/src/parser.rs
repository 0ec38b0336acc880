//! Parser and training-decoder entry points.

use std::sync::Arc;

use crate::error::Result;

/// A decoded instance: the original input paired with its prediction.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded<I, G> {
    /// The input as supplied by the caller.
    pub instance: I,
    /// The predicted graph.
    pub graph: G,
}

/// Parses sentences into dependency graphs.
pub trait DependencyParser {
    /// The sentence type.
    type Input;
    /// The parse result type.
    type Output;

    /// Parses `input` with the parser's current model.
    fn parse(&self, input: &Self::Input) -> Result<Self::Output>;
}

/// Decodes a training instance against its gold derivation.
///
/// Implementations return the prediction together with the weight
/// deltas an online learner adds and subtracts.
pub trait EarlyUpdateDecoder {
    /// The sentence type.
    type Input;
    /// One element of the gold derivation sequence.
    type Gold;
    /// The model snapshot scoring the search.
    type Model;
    /// The decoding result with its deltas.
    type Output;

    /// Searches `input` with `model`, comparing the beam against `gold`.
    fn decode_early_update(
        &mut self,
        input: &Self::Input,
        gold: &[Self::Gold],
        model: Arc<Self::Model>,
    ) -> Result<Self::Output>;
}
