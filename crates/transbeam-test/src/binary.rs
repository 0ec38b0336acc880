//! Synthetic binary-branching system.
//!
//! Every non-terminal configuration has exactly two transitions, `Left`
//! and `Right`, and a derivation ends at a fixed depth. Each step
//! produces one feature, `"{depth}:{L|R}"`, so scores and weight deltas
//! can be worked out by hand.

use std::fmt;

use transbeam_core::{Configuration, DependencyGraph, FeatureExtractor, TransitionSystem};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bit {
    Left,
    Right,
}

impl Bit {
    /// Parses a path such as `"RRL"`. Other characters are skipped.
    pub fn path(letters: &str) -> Vec<Bit> {
        letters
            .chars()
            .filter_map(|c| match c {
                'L' => Some(Bit::Left),
                'R' => Some(Bit::Right),
                _ => None,
            })
            .collect()
    }
}

impl fmt::Display for Bit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bit::Left => write!(f, "L"),
            Bit::Right => write!(f, "R"),
        }
    }
}

/// The path taken so far; one edge per step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BinaryGraph(pub Vec<Bit>);

impl DependencyGraph for BinaryGraph {
    fn number_of_edges(&self) -> usize {
        self.0.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryConfiguration {
    path: Vec<Bit>,
    depth_limit: usize,
}

impl BinaryConfiguration {
    /// Creates the base template. The input of a search is its depth limit.
    pub fn template() -> Self {
        Self {
            path: Vec::new(),
            depth_limit: 0,
        }
    }

    pub fn path(&self) -> &[Bit] {
        &self.path
    }

    pub fn depth(&self) -> usize {
        self.path.len()
    }
}

impl Configuration for BinaryConfiguration {
    type Input = usize;
    type Graph = BinaryGraph;

    fn init(&self, depth_limit: &usize) -> Self {
        Self {
            path: Vec::new(),
            depth_limit: *depth_limit,
        }
    }

    fn is_terminal(&self) -> bool {
        self.path.len() >= self.depth_limit
    }

    fn graph(&self) -> BinaryGraph {
        BinaryGraph(self.path.clone())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BinaryTree;

impl BinaryTree {
    /// Returns the derivation following `path`, start configuration included.
    pub fn derivation(&self, path: &[Bit], depth_limit: usize) -> Vec<BinaryConfiguration> {
        let mut configuration = BinaryConfiguration::template().init(&depth_limit);
        let mut derivation = vec![configuration.clone()];
        for bit in path {
            configuration = self.apply(&configuration, *bit);
            derivation.push(configuration.clone());
        }
        derivation
    }
}

impl TransitionSystem for BinaryTree {
    type Configuration = BinaryConfiguration;
    type Transition = Bit;

    fn legal_transitions<'a>(
        &'a self,
        configuration: &'a BinaryConfiguration,
    ) -> impl Iterator<Item = Bit> + 'a {
        let open = !configuration.is_terminal();
        [Bit::Left, Bit::Right].into_iter().filter(move |_| open)
    }

    fn apply(&self, configuration: &BinaryConfiguration, transition: Bit) -> BinaryConfiguration {
        let mut next = configuration.clone();
        next.path.push(transition);
        next
    }
}

/// Emits `"{depth}:{bit}"` for the last step; nothing for the start state.
#[derive(Debug, Clone, Copy, Default)]
pub struct BinaryFeatures;

impl FeatureExtractor<BinaryConfiguration> for BinaryFeatures {
    type Features = Vec<String>;

    fn features(&self, c: &BinaryConfiguration) -> Vec<String> {
        c.path
            .last()
            .map(|bit| format!("{}:{}", c.path.len(), bit))
            .into_iter()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derivation() {
        let derivation = BinaryTree.derivation(&Bit::path("RL"), 2);

        assert_eq!(derivation.len(), 3);
        assert!(!derivation[1].is_terminal());
        assert!(derivation[2].is_terminal());
        assert_eq!(derivation[2].graph(), BinaryGraph(Bit::path("RL")));
    }

    #[test]
    fn test_terminal_has_no_transitions() {
        let derivation = BinaryTree.derivation(&Bit::path("L"), 1);
        assert_eq!(BinaryTree.legal_transitions(&derivation[1]).count(), 0);
        assert_eq!(BinaryTree.legal_transitions(&derivation[0]).count(), 2);
    }

    #[test]
    fn test_features() {
        let derivation = BinaryTree.derivation(&Bit::path("RL"), 2);
        assert!(BinaryFeatures.features(&derivation[0]).is_empty());
        assert_eq!(BinaryFeatures.features(&derivation[1]), vec!["1:R"]);
        assert_eq!(BinaryFeatures.features(&derivation[2]), vec!["2:L"]);
    }
}
