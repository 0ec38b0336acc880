//! Error types for transbeam

use thiserror::Error;

/// Main error type for transbeam operations.
///
/// Every variant is fatal for the search or training step that raised it.
/// Nothing is retried internally.
#[derive(Debug, Error)]
pub enum TransbeamError {
    /// A required collaborator was not supplied before building a beam.
    #[error("Missing component: set a {0} before searching")]
    MissingComponent(&'static str),

    /// More candidates were requested from an agenda than it holds.
    #[error("Agenda underflow: requested {requested} candidates but only {available} available")]
    AgendaUnderflow { requested: usize, available: usize },

    /// More candidates were requested than the beam may retain.
    #[error("Beam overflow: requested {requested} candidates from a beam of width {width}")]
    BeamOverflow { requested: usize, width: usize },

    /// A gold-derived prediction disagrees with the gold graph.
    #[error("Oracle parse result does not equal gold ({edges} edges on both sides)")]
    OracleMismatch { edges: usize },

    /// No candidate survived an expansion step.
    #[error("Beam emptied at step {step}: no surviving candidate offered a transition")]
    EmptyBeam { step: usize },

    /// Training was requested without a gold derivation.
    #[error("Gold derivation sequence is empty")]
    EmptyGoldSequence,

    /// Error in beam configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The expansion worker pool could not be created.
    #[error("Thread pool error: {0}")]
    ThreadPool(String),
}

/// Result type alias for transbeam operations
pub type Result<T> = std::result::Result<T, TransbeamError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_component_display() {
        let err = TransbeamError::MissingComponent("transition system");
        assert_eq!(
            err.to_string(),
            "Missing component: set a transition system before searching"
        );
    }

    #[test]
    fn test_underflow_display() {
        let err = TransbeamError::AgendaUnderflow {
            requested: 5,
            available: 3,
        };
        assert!(err.to_string().contains("requested 5"));
        assert!(err.to_string().contains("only 3"));
    }
}
