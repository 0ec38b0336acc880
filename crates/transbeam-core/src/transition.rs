//! Transition system contract.

use std::fmt::Debug;

use crate::configuration::Configuration;

/// Enumerates and applies the legal moves of a parsing formalism.
///
/// The beam shares one transition system across its expansion workers,
/// so implementations must be `Send + Sync`.
pub trait TransitionSystem: Send + Sync + 'static {
    /// The configuration type this system operates on.
    type Configuration: Configuration;

    /// A single atomic move.
    type Transition: Copy + Debug + Send;

    /// Yields every legal transition from `configuration` exactly once.
    ///
    /// A terminal configuration yields nothing.
    fn legal_transitions<'a>(
        &'a self,
        configuration: &'a Self::Configuration,
    ) -> impl Iterator<Item = Self::Transition> + 'a;

    /// Applies `transition`, returning the successor configuration.
    ///
    /// Must leave `configuration` unchanged.
    fn apply(
        &self,
        configuration: &Self::Configuration,
        transition: Self::Transition,
    ) -> Self::Configuration;
}
