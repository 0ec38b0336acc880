//! transbeam Search Engine
//!
//! This crate provides the beam-search decoder including:
//! - Scored configurations and their derivation trails
//! - Bounded, score-ordered agendas
//! - The beam: concurrent expansion, scoring, and top-K selection
//! - The generic search driver with early-update training support
//! - Statistics collection

pub mod agenda;
pub mod beam;
pub mod candidate;
pub mod driver;
pub mod statistics;

pub use agenda::{Agenda, LocalAgenda};
pub use beam::{Beam, BeamBuilder, ChildStream, EarlyUpdate, ParseResult};
pub use candidate::{CandidateId, ScoredConfiguration};
pub use driver::{
    search, search_early_update, EarlyUpdateOutcome, EarlyUpdateSearch, GoldSearch, Search,
    SearchOutcome,
};
pub use statistics::{SearchStatistics, StatisticsCollector};
