//! Shared test fixtures for transbeam crates.
//!
//! This crate provides small, fully specified collaborators for testing
//! the search engine. None of them is meant for real parsing.
//!
//! - [`arc_standard`] - Arc-standard transition system with a static oracle
//! - [`binary`] - Synthetic system with exactly two transitions per step
//! - [`ladder`] - Synthetic system whose derivations differ in length
//! - [`perceptron`] - Sparse linear model and weight deltas
//!
//! # Usage
//!
//! Add as a dev-dependency in your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! transbeam-test = { workspace = true }
//! ```

pub mod arc_standard;
pub mod binary;
pub mod ladder;
pub mod perceptron;

// Re-export commonly used types at crate root for convenience
pub use arc_standard::{
    sentence, ArcFeatures, ArcGraph, ArcStandard, ArcStandardConfiguration, Dependency, Move,
    Sentence, TaggedToken,
};
pub use binary::{BinaryConfiguration, BinaryFeatures, BinaryGraph, BinaryTree, Bit};
pub use ladder::{Ladder, LadderConfiguration, LadderFeatures, LadderGraph, Rung};
pub use perceptron::{LinearModel, SparseWeightVector};
