//! transbeam - Beam-Search Decoding for Transition-Based Parsers
//!
//! Plug in a transition system, a feature extractor and a linear model,
//! then parse or decode with early update.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use transbeam::prelude::*;
//! use transbeam_test::{BinaryConfiguration, BinaryFeatures, BinaryTree, Bit, LinearModel};
//!
//! let model = LinearModel::new().with_weight("1:R", 1.0);
//! let mut beam = Beam::builder()
//!     .base(BinaryConfiguration::template())
//!     .transition_system(BinaryTree)
//!     .feature_extractor(BinaryFeatures)
//!     .model(model.clone())
//!     .config(BeamConfig::new().with_beam_width(2))
//!     .build()?;
//!
//! let parsed = beam.parse(&3)?;
//! assert_eq!(parsed.graph.number_of_edges(), 3);
//!
//! let gold = BinaryTree.derivation(&Bit::path("RRR"), 3);
//! let update = beam.decode_early_update(&3, &gold, Arc::new(model))?;
//! assert!(update.gold_delta.contains("1:R"));
//! # Ok::<(), transbeam::TransbeamError>(())
//! ```

// Collaborator contracts
pub use transbeam_core::{
    Configuration, Decoded, DependencyGraph, DependencyParser, EarlyUpdateDecoder,
    FeatureExtractor, ParameterModel, TransitionSystem, WeightDelta,
};

// Errors
pub use transbeam_core::{Result, TransbeamError};

// Configuration
pub use transbeam_config::{BeamConfig, ConfigError, ExpansionThreads};

// Search engine
pub use transbeam_search::{
    search, search_early_update, Agenda, Beam, BeamBuilder, CandidateId, EarlyUpdate,
    EarlyUpdateOutcome, ParseResult, ScoredConfiguration, SearchStatistics,
};

/// Lower-level driver pieces for custom searchers.
pub mod driver {
    pub use transbeam_search::{
        ChildStream, EarlyUpdateSearch, GoldSearch, LocalAgenda, Search, SearchOutcome,
        StatisticsCollector,
    };
}

pub mod prelude {
    pub use super::{
        Configuration, DependencyGraph, DependencyParser, EarlyUpdateDecoder, FeatureExtractor,
        ParameterModel, TransitionSystem, WeightDelta,
    };
    pub use super::{Beam, BeamConfig, EarlyUpdateOutcome, ParseResult, TransbeamError};
}
