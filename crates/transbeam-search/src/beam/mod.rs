//! The beam: one search step's operations over a transition system.
//!
//! Expansion is cheap and structural, scoring is expensive, so the two
//! run on different threads:
//! - [`Search::expand`] hands each candidate to a worker of the beam's
//!   expansion pool, which enumerates every legal transition into a
//!   bounded [`ChildStream`]. Children carry the parent's score as-is.
//! - [`Search::insert`] drains one stream, extracts features, scores
//!   each child, and keeps a local top-K set of beam width. The set is
//!   merged into the shared agenda under its lock once, at the end.
//! - [`Search::top`] and [`Search::top_b`] cut the next beam from the
//!   merged agenda.

mod builder;
mod early_update;
mod stream;

use std::fmt;
use std::sync::Arc;

use crossbeam::channel;
use rayon::ThreadPool;
use tracing::trace;
use transbeam_config::BeamConfig;
use transbeam_core::{
    Configuration, DependencyParser, FeatureExtractor, ParameterModel, Result, TransbeamError,
    TransitionSystem, WeightDelta,
};

use crate::agenda::{Agenda, LocalAgenda};
use crate::candidate::{CandidateId, ScoredConfiguration};
use crate::driver::{search, GoldSearch, Search};
use crate::statistics::{SearchStatistics, StatisticsCollector};

pub use builder::BeamBuilder;
pub use early_update::EarlyUpdate;
pub use stream::ChildStream;

/// Beam-search decoder over a transition system.
///
/// # Type Parameters
/// * `T` - The transition system
/// * `F` - The feature extractor
/// * `M` - The parameter model
pub struct Beam<T, F, M>
where
    T: TransitionSystem,
    F: FeatureExtractor<T::Configuration>,
    M: ParameterModel<F::Features>,
{
    base: T::Configuration,
    transitions: Arc<T>,
    features: F,
    model: Arc<M>,
    config: BeamConfig,
    pool: ThreadPool,
    statistics: StatisticsCollector,
}

/// Result of parsing one sentence.
#[derive(Debug, Clone)]
pub struct ParseResult<C: Configuration, D> {
    /// Graph of the best terminal configuration.
    pub graph: C::Graph,
    /// Path score of the best terminal configuration.
    pub score: f64,
    /// Number of search iterations run.
    pub steps: usize,
    /// The predicted derivation, start state first.
    pub sequence: Option<Vec<C>>,
    /// Feature accumulation of the predicted derivation.
    pub model_value: Option<D>,
}

impl<T, F, M> Beam<T, F, M>
where
    T: TransitionSystem,
    F: FeatureExtractor<T::Configuration>,
    M: ParameterModel<F::Features>,
{
    /// Returns a builder.
    pub fn builder() -> BeamBuilder<T, F, M> {
        BeamBuilder::new()
    }

    /// Returns the beam width.
    pub fn width(&self) -> usize {
        self.config.beam_width
    }

    /// Returns the beam configuration.
    pub fn config(&self) -> &BeamConfig {
        &self.config
    }

    /// Returns the transition system.
    pub fn transition_system(&self) -> &T {
        &self.transitions
    }

    /// Returns the current model snapshot.
    pub fn model(&self) -> &Arc<M> {
        &self.model
    }

    /// Replaces the model snapshot used for subsequent searches.
    pub fn set_model(&mut self, model: Arc<M>) {
        self.model = model;
    }

    /// Returns a snapshot of the statistics collected so far.
    pub fn statistics(&self) -> SearchStatistics {
        self.statistics.snapshot()
    }

    /// Clears the collected statistics.
    pub fn reset_statistics(&self) {
        self.statistics.reset();
    }

    /// Sums the features of `configurations` into a fresh delta.
    pub fn accumulate<'a>(
        &self,
        configurations: impl IntoIterator<Item = &'a T::Configuration>,
    ) -> M::Delta {
        let mut delta = self.model.zero_delta();
        for configuration in configurations {
            delta.accumulate(&self.features.features(configuration));
        }
        delta
    }

    // Features of every configuration reached by a transition, i.e.
    // everything but the start state.
    fn accumulate_derivation(&self, candidate: &ScoredConfiguration<T::Configuration>) -> M::Delta {
        self.accumulate(candidate.ancestors().take(candidate.depth()))
    }
}

impl<T, F, M> Search for Beam<T, F, M>
where
    T: TransitionSystem,
    F: FeatureExtractor<T::Configuration>,
    M: ParameterModel<F::Features>,
{
    type Problem = <T::Configuration as Configuration>::Input;
    type Candidate = ScoredConfiguration<T::Configuration>;
    type Agenda = Agenda<T::Configuration>;
    type Stream = ChildStream<T::Configuration>;

    fn start_item(&self, problem: &Self::Problem) -> Result<Vec<Self::Candidate>> {
        Ok(vec![ScoredConfiguration::start(self.base.init(problem))])
    }

    fn clear(&self) -> Self::Agenda {
        self.statistics.record_step();
        Agenda::with_capacity(self.config.agenda_capacity())
    }

    fn expand(&self, candidate: &Self::Candidate, _problem: &Self::Problem) -> Self::Stream {
        self.statistics.record_expansion();
        let (sender, receiver) = channel::bounded(self.config.estimated_transitions());
        let transitions = Arc::clone(&self.transitions);
        let parent = candidate.clone();

        self.pool.spawn(move || {
            let configuration = parent.configuration();
            for (ordinal, transition) in transitions.legal_transitions(configuration).enumerate() {
                let child = parent.child(transitions.apply(configuration, transition), ordinal);
                // only fails once the stream was dropped unread
                if sender.send(child).is_err() {
                    break;
                }
            }
        });

        ChildStream::new(receiver)
    }

    fn insert(&self, stream: Self::Stream, agenda: &Self::Agenda) {
        let mut local = LocalAgenda::new(self.config.beam_width);
        let mut scored = 0u64;

        for mut child in stream {
            let features = self.features.features(child.configuration());
            child.add_score(self.model.score(&features));
            scored += 1;
            local.offer(child);
        }

        let kept = local.len() as u64;
        trace!(event = "stream_drained", scored, kept);

        agenda.append(local.into_vec());
        self.statistics.record_insert(scored, scored - kept);
    }

    fn carry(&self, mut candidate: Self::Candidate, agenda: &Self::Agenda) {
        candidate.set_id(CandidateId::new(candidate.rank(), 0));
        agenda.push(candidate);
    }

    fn agenda_len(&self, agenda: &Self::Agenda) -> usize {
        agenda.len()
    }

    fn top<'a>(&self, agenda: &'a mut Self::Agenda) -> Option<&'a Self::Candidate> {
        agenda.peek()
    }

    fn top_b(&self, agenda: &mut Self::Agenda, b: usize) -> Result<Vec<Self::Candidate>> {
        if b > self.config.beam_width {
            return Err(TransbeamError::BeamOverflow {
                requested: b,
                width: self.config.beam_width,
            });
        }
        let mut best = agenda.pop_best(b)?;
        for (rank, candidate) in best.iter_mut().enumerate() {
            candidate.set_rank(rank);
        }
        Ok(best)
    }

    fn goal_test(&self, _problem: &Self::Problem, candidate: &Self::Candidate) -> bool {
        candidate.configuration().is_terminal()
    }

    fn score(&self, candidate: &Self::Candidate) -> f64 {
        candidate.score()
    }
}

impl<T, F, M> GoldSearch for Beam<T, F, M>
where
    T: TransitionSystem,
    F: FeatureExtractor<T::Configuration>,
    M: ParameterModel<F::Features>,
{
    type Gold = T::Configuration;

    fn matches_gold(&self, candidate: &Self::Candidate, gold: &Self::Gold) -> bool {
        candidate.configuration() == gold
    }
}

impl<T, F, M> DependencyParser for Beam<T, F, M>
where
    T: TransitionSystem,
    F: FeatureExtractor<T::Configuration>,
    M: ParameterModel<F::Features>,
{
    type Input = <T::Configuration as Configuration>::Input;
    type Output = ParseResult<T::Configuration, M::Delta>;

    fn parse(&self, input: &Self::Input) -> Result<Self::Output> {
        let outcome = search(self, input, self.config.beam_width)?;
        let steps = outcome.steps;
        let best = outcome
            .into_best()
            .ok_or(TransbeamError::EmptyBeam { step: steps })?;

        Ok(ParseResult {
            graph: best.configuration().graph(),
            score: best.score(),
            steps,
            sequence: self.config.return_sequence.then(|| best.sequence()),
            model_value: self
                .config
                .return_model_value
                .then(|| self.accumulate_derivation(&best)),
        })
    }
}

impl<T, F, M> fmt::Debug for Beam<T, F, M>
where
    T: TransitionSystem,
    F: FeatureExtractor<T::Configuration>,
    M: ParameterModel<F::Features>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Beam")
            .field("base", &self.base)
            .field("config", &self.config)
            .field("threads", &self.pool.current_num_threads())
            .finish()
    }
}
