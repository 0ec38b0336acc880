//! Parser configurations and the graphs they derive.

use std::fmt::Debug;

/// A dependency graph built by a derivation.
///
/// Equality is structural: two graphs are equal when they hold the
/// same labeled arcs.
pub trait DependencyGraph: Clone + PartialEq + Debug + Send + Sync {
    /// Returns the number of arcs in the graph.
    fn number_of_edges(&self) -> usize;
}

/// An intermediate parser state (stack, buffer, partial graph).
///
/// A value of this type doubles as the base template the beam seeds
/// every search from: [`Configuration::init`] produces a fresh start
/// state for an input without touching the template.
///
/// `PartialEq` is structural equality and must ignore any score the
/// search attaches to the configuration.
pub trait Configuration: Clone + PartialEq + Debug + Send + Sync + 'static {
    /// The sentence type a derivation starts from.
    type Input: Clone + Debug + Send + Sync;

    /// The graph a derivation builds.
    type Graph: DependencyGraph;

    /// Creates the start configuration for `input`.
    fn init(&self, input: &Self::Input) -> Self;

    /// Returns true when no legal transition remains.
    fn is_terminal(&self) -> bool;

    /// Returns the (possibly partial) graph built so far.
    fn graph(&self) -> Self::Graph;
}
