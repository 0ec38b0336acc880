//! Synthetic system whose derivations differ in length.
//!
//! From any open configuration a derivation either stops, which ends
//! it at once, or climbs one rung. Climbing also ends once the rung
//! limit given as input is reached. Each step produces one feature,
//! `"stop{h}"` or `"climb{h}"` where `h` is the height after the step.

use std::fmt;

use transbeam_core::{Configuration, DependencyGraph, FeatureExtractor, TransitionSystem};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rung {
    Stop,
    Climb,
}

impl fmt::Display for Rung {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rung::Stop => write!(f, "stop"),
            Rung::Climb => write!(f, "climb"),
        }
    }
}

/// The moves taken so far; one edge per step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LadderGraph(pub Vec<Rung>);

impl DependencyGraph for LadderGraph {
    fn number_of_edges(&self) -> usize {
        self.0.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LadderConfiguration {
    path: Vec<Rung>,
    limit: usize,
}

impl LadderConfiguration {
    /// Creates the base template. The input of a search is its rung limit.
    pub fn template() -> Self {
        Self {
            path: Vec::new(),
            limit: 0,
        }
    }

    pub fn path(&self) -> &[Rung] {
        &self.path
    }

    /// Number of rungs climbed.
    pub fn height(&self) -> usize {
        self.path.iter().filter(|r| **r == Rung::Climb).count()
    }
}

impl Configuration for LadderConfiguration {
    type Input = usize;
    type Graph = LadderGraph;

    fn init(&self, limit: &usize) -> Self {
        Self {
            path: Vec::new(),
            limit: *limit,
        }
    }

    fn is_terminal(&self) -> bool {
        self.path.last() == Some(&Rung::Stop) || self.height() >= self.limit
    }

    fn graph(&self) -> LadderGraph {
        LadderGraph(self.path.clone())
    }
}

/// The ladder system. A dead-end ladder offers no move at all, so even
/// an open configuration cannot advance.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ladder {
    dead_end: bool,
}

impl Ladder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a ladder without any legal move.
    pub fn dead_end() -> Self {
        Self { dead_end: true }
    }
}

impl TransitionSystem for Ladder {
    type Configuration = LadderConfiguration;
    type Transition = Rung;

    fn legal_transitions<'a>(
        &'a self,
        configuration: &'a LadderConfiguration,
    ) -> impl Iterator<Item = Rung> + 'a {
        let open = !self.dead_end && !configuration.is_terminal();
        [Rung::Stop, Rung::Climb].into_iter().filter(move |_| open)
    }

    fn apply(&self, configuration: &LadderConfiguration, transition: Rung) -> LadderConfiguration {
        let mut next = configuration.clone();
        next.path.push(transition);
        next
    }
}

/// Emits `"{rung}{height}"` for the last step; nothing for the start state.
#[derive(Debug, Clone, Copy, Default)]
pub struct LadderFeatures;

impl FeatureExtractor<LadderConfiguration> for LadderFeatures {
    type Features = Vec<String>;

    fn features(&self, c: &LadderConfiguration) -> Vec<String> {
        c.path
            .last()
            .map(|rung| format!("{}{}", rung, c.height()))
            .into_iter()
            .collect()
    }
}
