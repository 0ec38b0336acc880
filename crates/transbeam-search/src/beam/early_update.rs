//! Early-update training decode.

use std::sync::Arc;

use tracing::error;
use transbeam_core::{
    Configuration, Decoded, DependencyGraph, EarlyUpdateDecoder, FeatureExtractor,
    ParameterModel, Result, TransbeamError, TransitionSystem,
};

use super::Beam;
use crate::driver::{search_early_update, EarlyUpdateOutcome};

/// Prediction and weight deltas for one training instance.
///
/// An online learner adds `gold_delta` to its weights and subtracts
/// `predicted_delta`. The beam never applies them itself.
#[derive(Debug, Clone)]
pub struct EarlyUpdate<C: Configuration, D> {
    /// The input paired with the predicted graph.
    pub decoded: Decoded<C::Input, C::Graph>,
    /// Features of the gold derivation up to where the search stopped.
    pub gold_delta: D,
    /// Features of the best predicted derivation up to the same point.
    pub predicted_delta: D,
    /// How the search ended.
    pub outcome: EarlyUpdateOutcome,
    /// Index of the last gold state compared.
    pub gold_index: usize,
}

impl<T, F, M> EarlyUpdateDecoder for Beam<T, F, M>
where
    T: TransitionSystem,
    F: FeatureExtractor<T::Configuration>,
    M: ParameterModel<F::Features>,
{
    type Input = <T::Configuration as Configuration>::Input;
    type Gold = T::Configuration;
    type Model = M;
    type Output = EarlyUpdate<T::Configuration, M::Delta>;

    /// Searches `input` with `model`, stopping as soon as the gold
    /// derivation falls out of the beam.
    ///
    /// `gold` runs from the start configuration to a terminal one. When
    /// the gold state is lost at step `k`, both deltas cover steps
    /// `1..=k` only. When it survives, both cover their full derivations.
    ///
    /// # Errors
    ///
    /// Returns [`TransbeamError::OracleMismatch`] if the gold derivation
    /// survived to the goal but the prediction has as many arcs as the
    /// gold graph without being equal to it.
    fn decode_early_update(
        &mut self,
        input: &Self::Input,
        gold: &[Self::Gold],
        model: Arc<Self::Model>,
    ) -> Result<Self::Output> {
        self.set_model(model);
        let run = search_early_update(&*self, input, self.config.beam_width, gold)?;
        let graph = run.best.configuration().graph();

        let gold_prefix = match run.outcome {
            EarlyUpdateOutcome::GoldLost { .. } => &gold[1..=run.gold_index],
            EarlyUpdateOutcome::GoldSurvivedToGoal { .. } => {
                let gold_graph = gold[gold.len() - 1].graph();
                let edges = graph.number_of_edges();
                if edges == gold_graph.number_of_edges() && graph != gold_graph {
                    error!(event = "oracle_mismatch", edges);
                    return Err(TransbeamError::OracleMismatch { edges });
                }
                &gold[1..]
            }
        };

        Ok(EarlyUpdate {
            decoded: Decoded {
                instance: input.clone(),
                graph,
            },
            gold_delta: self.accumulate(gold_prefix),
            predicted_delta: self.accumulate_derivation(&run.best),
            outcome: run.outcome,
            gold_index: run.gold_index,
        })
    }
}
