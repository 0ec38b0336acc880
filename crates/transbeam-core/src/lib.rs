//! transbeam Core - Contracts shared by the beam-search decoder
//!
//! This crate defines the seams between the search engine and the
//! collaborators it drives:
//! - Parser configurations and the dependency graphs they build
//! - Transition systems that enumerate and apply legal moves
//! - Feature extraction and linear parameter models
//! - Parser and training-decoder entry points
//! - The error taxonomy shared by every crate in the workspace

pub mod configuration;
pub mod error;
pub mod model;
pub mod parser;
pub mod transition;

pub use configuration::{Configuration, DependencyGraph};
pub use error::{Result, TransbeamError};
pub use model::{FeatureExtractor, ParameterModel, WeightDelta};
pub use parser::{Decoded, DependencyParser, EarlyUpdateDecoder};
pub use transition::TransitionSystem;
