//! Validated construction of a [`Beam`].

use std::fmt;
use std::sync::Arc;

use rayon::ThreadPoolBuilder;
use tracing::debug;
use transbeam_config::BeamConfig;
use transbeam_core::{FeatureExtractor, ParameterModel, Result, TransbeamError, TransitionSystem};

use super::Beam;
use crate::statistics::StatisticsCollector;

/// Builder for [`Beam`].
///
/// Every collaborator must be supplied before [`BeamBuilder::build`]
/// succeeds, so a missing component is reported before any search
/// starts rather than partway through one.
pub struct BeamBuilder<T: TransitionSystem, F, M> {
    base: Option<T::Configuration>,
    transitions: Option<Arc<T>>,
    features: Option<F>,
    model: Option<Arc<M>>,
    config: BeamConfig,
}

impl<T: TransitionSystem, F, M> BeamBuilder<T, F, M> {
    /// Creates an empty builder with the default configuration.
    pub fn new() -> Self {
        Self {
            base: None,
            transitions: None,
            features: None,
            model: None,
            config: BeamConfig::default(),
        }
    }

    /// Sets the configuration template every search is seeded from.
    pub fn base(mut self, base: T::Configuration) -> Self {
        self.base = Some(base);
        self
    }

    /// Sets the transition system.
    pub fn transition_system(mut self, transitions: T) -> Self {
        self.transitions = Some(Arc::new(transitions));
        self
    }

    /// Sets a transition system shared with other owners.
    pub fn shared_transition_system(mut self, transitions: Arc<T>) -> Self {
        self.transitions = Some(transitions);
        self
    }

    /// Sets the feature extractor.
    pub fn feature_extractor(mut self, features: F) -> Self {
        self.features = Some(features);
        self
    }

    /// Sets the parameter model.
    pub fn model(mut self, model: M) -> Self {
        self.model = Some(Arc::new(model));
        self
    }

    /// Sets a parameter model snapshot shared with other owners.
    pub fn shared_model(mut self, model: Arc<M>) -> Self {
        self.model = Some(model);
        self
    }

    /// Replaces the beam configuration.
    pub fn config(mut self, config: BeamConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the beam width.
    pub fn beam_width(mut self, beam_width: usize) -> Self {
        self.config.beam_width = beam_width;
        self
    }

    /// Sets the relation inventory size.
    pub fn relation_count(mut self, relation_count: usize) -> Self {
        self.config.relation_count = relation_count;
        self
    }
}

impl<T, F, M> BeamBuilder<T, F, M>
where
    T: TransitionSystem,
    F: FeatureExtractor<T::Configuration>,
    M: ParameterModel<F::Features>,
{
    /// Validates the collaborators and configuration and builds the beam.
    ///
    /// # Errors
    ///
    /// - [`TransbeamError::MissingComponent`] if a collaborator is unset
    /// - [`TransbeamError::Config`] if the configuration is invalid
    /// - [`TransbeamError::ThreadPool`] if the expansion pool cannot start
    pub fn build(self) -> Result<Beam<T, F, M>> {
        let base = self
            .base
            .ok_or(TransbeamError::MissingComponent("base configuration"))?;
        let transitions = self
            .transitions
            .ok_or(TransbeamError::MissingComponent("transition system"))?;
        let features = self
            .features
            .ok_or(TransbeamError::MissingComponent("feature extractor"))?;
        let model = self
            .model
            .ok_or(TransbeamError::MissingComponent("parameter model"))?;
        self.config.validate()?;

        let threads = self.config.expansion_thread_count();
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("transbeam-expand-{i}"))
            .build()
            .map_err(|e| TransbeamError::ThreadPool(e.to_string()))?;

        debug!(
            event = "beam_built",
            beam_width = self.config.beam_width,
            estimated_transitions = self.config.estimated_transitions(),
            threads,
        );

        Ok(Beam {
            base,
            transitions,
            features,
            model,
            config: self.config,
            pool,
            statistics: StatisticsCollector::new(),
        })
    }
}

impl<T: TransitionSystem, F, M> Default for BeamBuilder<T, F, M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: TransitionSystem, F, M> fmt::Debug for BeamBuilder<T, F, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BeamBuilder")
            .field("has_base", &self.base.is_some())
            .field("has_transition_system", &self.transitions.is_some())
            .field("has_feature_extractor", &self.features.is_some())
            .field("has_model", &self.model.is_some())
            .field("config", &self.config)
            .finish()
    }
}
