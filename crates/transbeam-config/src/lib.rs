//! Configuration system for transbeam.
//!
//! Load beam configuration from TOML or YAML files to control beam
//! width, agenda sizing, and the expansion worker pool without code
//! changes.
//!
//! # Examples
//!
//! ```
//! use transbeam_config::BeamConfig;
//!
//! let config = BeamConfig::from_toml_str(r#"
//!     beam_width = 3
//!     relation_count = 2
//! "#).unwrap();
//!
//! assert_eq!(config.estimated_transitions(), 6);
//! assert_eq!(config.agenda_capacity(), 18);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use transbeam_core::TransbeamError;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl From<ConfigError> for TransbeamError {
    fn from(err: ConfigError) -> Self {
        TransbeamError::Config(err.to_string())
    }
}

const DEFAULT_BEAM_WIDTH: usize = 4;

fn default_beam_width() -> usize {
    DEFAULT_BEAM_WIDTH
}

/// Beam search configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct BeamConfig {
    /// Number of candidates retained between steps.
    #[serde(default = "default_beam_width")]
    pub beam_width: usize,

    /// Size of the relation inventory of the transition system.
    #[serde(default)]
    pub relation_count: usize,

    /// Overrides the per-configuration transition estimate.
    #[serde(default)]
    pub estimated_transitions: Option<usize>,

    /// Size of the expansion worker pool.
    #[serde(default)]
    pub expansion_threads: ExpansionThreads,

    /// Whether parse results carry the predicted configuration sequence.
    #[serde(default)]
    pub return_sequence: bool,

    /// Whether parse results carry the predicted feature accumulation.
    #[serde(default)]
    pub return_model_value: bool,
}

impl Default for BeamConfig {
    fn default() -> Self {
        Self {
            beam_width: DEFAULT_BEAM_WIDTH,
            relation_count: 0,
            estimated_transitions: None,
            expansion_threads: ExpansionThreads::Auto,
            return_sequence: false,
            return_model_value: false,
        }
    }
}

impl BeamConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if file doesn't exist or contains invalid TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_file(path)
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Loads configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(s)?)
    }

    /// Sets the beam width.
    pub fn with_beam_width(mut self, beam_width: usize) -> Self {
        self.beam_width = beam_width;
        self
    }

    /// Sets the relation inventory size.
    pub fn with_relation_count(mut self, relation_count: usize) -> Self {
        self.relation_count = relation_count;
        self
    }

    /// Sets the expansion worker pool size.
    pub fn with_expansion_threads(mut self, threads: ExpansionThreads) -> Self {
        self.expansion_threads = threads;
        self
    }

    /// Requests the predicted sequence in parse results.
    pub fn with_return_sequence(mut self, enabled: bool) -> Self {
        self.return_sequence = enabled;
        self
    }

    /// Requests the predicted feature accumulation in parse results.
    pub fn with_return_model_value(mut self, enabled: bool) -> Self {
        self.return_model_value = enabled;
        self
    }

    /// Upper bound on the transitions leaving one configuration.
    ///
    /// Covers shift, reduce, and a left and right arc per relation.
    pub fn estimated_transitions(&self) -> usize {
        self.estimated_transitions.unwrap_or(self.relation_count * 2 + 2)
    }

    /// Pre-sized capacity of a fresh agenda.
    pub fn agenda_capacity(&self) -> usize {
        self.beam_width * self.estimated_transitions()
    }

    /// Number of expansion workers to start.
    pub fn expansion_thread_count(&self) -> usize {
        self.expansion_threads.resolve(self.beam_width)
    }

    /// Checks the configuration for values the beam cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.beam_width == 0 {
            return Err(ConfigError::Invalid(
                "beam_width must be at least 1".to_string(),
            ));
        }
        if self.estimated_transitions() == 0 {
            return Err(ConfigError::Invalid(
                "estimated_transitions must be at least 1".to_string(),
            ));
        }
        if self.expansion_threads == ExpansionThreads::Count(0) {
            return Err(ConfigError::Invalid(
                "expansion_threads count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Expansion worker pool size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpansionThreads {
    /// One worker per beam slot.
    #[default]
    Auto,

    /// Specific number of workers.
    Count(usize),
}

impl ExpansionThreads {
    /// Resolves the worker count for a beam of `beam_width`.
    ///
    /// Never fewer than `beam_width`, so every retained candidate's
    /// expansion runs at once.
    pub fn resolve(&self, beam_width: usize) -> usize {
        let width = beam_width.max(1);
        match self {
            ExpansionThreads::Auto => width,
            ExpansionThreads::Count(n) => (*n).max(width),
        }
    }
}

#[cfg(test)]
mod tests;
