//! Arc-standard transition system over POS-tagged sentences.
//!
//! Token 0 is the artificial root; sentence tokens are numbered from 1.
//! The start configuration has the root on the stack and the whole
//! sentence in the buffer. A configuration is terminal once the buffer
//! is empty and only the root remains on the stack.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use rand::Rng;
use transbeam_core::{Configuration, DependencyGraph, FeatureExtractor, TransitionSystem};

/// A word with its part-of-speech tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TaggedToken {
    pub word: String,
    pub pos: String,
}

impl TaggedToken {
    pub fn new(word: impl Into<String>, pos: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            pos: pos.into(),
        }
    }
}

/// A tagged sentence, without the root token.
pub type Sentence = Vec<TaggedToken>;

/// Builds a sentence from `(word, pos)` pairs.
pub fn sentence(tokens: &[(&str, &str)]) -> Sentence {
    tokens
        .iter()
        .map(|(word, pos)| TaggedToken::new(*word, *pos))
        .collect()
}

/// A labeled arc `head -> dependent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Dependency {
    pub head: usize,
    pub dependent: usize,
    pub relation: usize,
}

impl Dependency {
    pub fn new(head: usize, dependent: usize, relation: usize) -> Self {
        Self {
            head,
            dependent,
            relation,
        }
    }
}

/// A set of labeled arcs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArcGraph {
    arcs: BTreeSet<Dependency>,
}

impl ArcGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an arc, returning `self` for chaining.
    pub fn with_arc(mut self, head: usize, dependent: usize, relation: usize) -> Self {
        self.arcs.insert(Dependency::new(head, dependent, relation));
        self
    }

    /// Returns the head and relation of `dependent`, if attached.
    pub fn head_of(&self, dependent: usize) -> Option<(usize, usize)> {
        self.arcs
            .iter()
            .find(|arc| arc.dependent == dependent)
            .map(|arc| (arc.head, arc.relation))
    }

    /// Iterates over the dependents of `head`.
    pub fn dependents_of(&self, head: usize) -> impl Iterator<Item = usize> + '_ {
        self.arcs
            .iter()
            .filter(move |arc| arc.head == head)
            .map(|arc| arc.dependent)
    }

    pub fn contains(&self, arc: &Dependency) -> bool {
        self.arcs.contains(arc)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Dependency> {
        self.arcs.iter()
    }
}

impl FromIterator<Dependency> for ArcGraph {
    fn from_iter<I: IntoIterator<Item = Dependency>>(iter: I) -> Self {
        Self {
            arcs: iter.into_iter().collect(),
        }
    }
}

impl DependencyGraph for ArcGraph {
    fn number_of_edges(&self) -> usize {
        self.arcs.len()
    }
}

/// An arc-standard transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Move {
    /// Moves the buffer front onto the stack.
    Shift,
    /// Attaches the second stack item under the top one.
    LeftArc(usize),
    /// Attaches the top stack item under the second one.
    RightArc(usize),
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Move::Shift => write!(f, "SH"),
            Move::LeftArc(r) => write!(f, "LA{}", r),
            Move::RightArc(r) => write!(f, "RA{}", r),
        }
    }
}

/// An arc-standard parser state.
///
/// Equality covers stack, buffer position and arcs. The move that led
/// here is kept for feature extraction only.
#[derive(Debug, Clone)]
pub struct ArcStandardConfiguration {
    sentence: Arc<Sentence>,
    stack: Vec<usize>,
    next: usize,
    arcs: ArcGraph,
    last: Option<Move>,
}

impl ArcStandardConfiguration {
    /// Creates the base template. Use [`Configuration::init`] to seed
    /// a sentence.
    pub fn template() -> Self {
        Self {
            sentence: Arc::new(Vec::new()),
            stack: Vec::new(),
            next: 1,
            arcs: ArcGraph::new(),
            last: None,
        }
    }

    pub fn stack(&self) -> &[usize] {
        &self.stack
    }

    /// Returns the buffer front, if the buffer is not empty.
    pub fn buffer_front(&self) -> Option<usize> {
        (self.next <= self.sentence.len()).then_some(self.next)
    }

    pub fn last_move(&self) -> Option<Move> {
        self.last
    }

    pub fn arcs(&self) -> &ArcGraph {
        &self.arcs
    }

    /// Returns the token at `index` (0 is the root).
    pub fn token(&self, index: usize) -> Option<&TaggedToken> {
        index.checked_sub(1).and_then(|i| self.sentence.get(i))
    }

    /// Returns the stack item `depth` positions below the top.
    fn stack_item(&self, depth: usize) -> Option<usize> {
        self.stack
            .len()
            .checked_sub(depth + 1)
            .map(|i| self.stack[i])
    }
}

impl PartialEq for ArcStandardConfiguration {
    fn eq(&self, other: &Self) -> bool {
        self.stack == other.stack
            && self.next == other.next
            && self.arcs == other.arcs
            && self.sentence == other.sentence
    }
}

impl Configuration for ArcStandardConfiguration {
    type Input = Sentence;
    type Graph = ArcGraph;

    fn init(&self, input: &Sentence) -> Self {
        Self {
            sentence: Arc::new(input.clone()),
            stack: vec![0],
            next: 1,
            arcs: ArcGraph::new(),
            last: None,
        }
    }

    fn is_terminal(&self) -> bool {
        self.buffer_front().is_none() && self.stack.len() <= 1
    }

    fn graph(&self) -> ArcGraph {
        self.arcs.clone()
    }
}

/// The arc-standard system with `relations` arc labels.
///
/// With jitter enabled, every `apply` sleeps for a random number of
/// microseconds so concurrent expansions finish in varying order.
#[derive(Debug, Clone)]
pub struct ArcStandard {
    relations: usize,
    jitter_micros: u64,
}

impl ArcStandard {
    /// Creates a system with at least one relation label.
    pub fn new(relations: usize) -> Self {
        Self {
            relations: relations.max(1),
            jitter_micros: 0,
        }
    }

    /// Enables random delays of up to `micros` per transition.
    pub fn with_jitter(mut self, micros: u64) -> Self {
        self.jitter_micros = micros;
        self
    }

    pub fn relations(&self) -> usize {
        self.relations
    }

    /// Returns the gold derivation for a projective `gold` tree, start
    /// configuration included, or `None` if the static oracle gets stuck.
    pub fn oracle(
        &self,
        template: &ArcStandardConfiguration,
        input: &Sentence,
        gold: &ArcGraph,
    ) -> Option<Vec<ArcStandardConfiguration>> {
        let mut configuration = template.init(input);
        let mut derivation = vec![configuration.clone()];
        while !configuration.is_terminal() {
            let next = self.oracle_move(&configuration, gold)?;
            configuration = self.apply(&configuration, next);
            derivation.push(configuration.clone());
        }
        Some(derivation)
    }

    fn oracle_move(&self, c: &ArcStandardConfiguration, gold: &ArcGraph) -> Option<Move> {
        if let (Some(s0), Some(s1)) = (c.stack_item(0), c.stack_item(1)) {
            if s1 != 0 {
                if let Some((head, relation)) = gold.head_of(s1) {
                    if head == s0 {
                        return Some(Move::LeftArc(relation));
                    }
                }
            }
            if let Some((head, relation)) = gold.head_of(s0) {
                let complete = gold
                    .dependents_of(s0)
                    .all(|d| c.arcs.head_of(d).is_some());
                if head == s1 && complete && (s1 != 0 || c.buffer_front().is_none()) {
                    return Some(Move::RightArc(relation));
                }
            }
        }
        c.buffer_front().map(|_| Move::Shift)
    }

    fn jitter(&self) {
        if self.jitter_micros > 0 {
            let micros = rand::rng().random_range(0..=self.jitter_micros);
            thread::sleep(Duration::from_micros(micros));
        }
    }
}

impl TransitionSystem for ArcStandard {
    type Configuration = ArcStandardConfiguration;
    type Transition = Move;

    fn legal_transitions<'a>(
        &'a self,
        configuration: &'a ArcStandardConfiguration,
    ) -> impl Iterator<Item = Move> + 'a {
        let can_shift = configuration.buffer_front().is_some();
        let depth = configuration.stack.len();
        // The root never becomes a dependent, and attaches its single
        // child only once the buffer is exhausted.
        let can_left = depth > 2;
        let can_right = depth > 2 || (depth == 2 && !can_shift);

        let shift = can_shift.then_some(Move::Shift);
        let left = (0..self.relations)
            .filter(move |_| can_left)
            .map(Move::LeftArc);
        let right = (0..self.relations)
            .filter(move |_| can_right)
            .map(Move::RightArc);
        shift.into_iter().chain(left).chain(right)
    }

    fn apply(
        &self,
        configuration: &ArcStandardConfiguration,
        transition: Move,
    ) -> ArcStandardConfiguration {
        self.jitter();
        let mut next = configuration.clone();
        next.last = Some(transition);
        match transition {
            Move::Shift => {
                next.stack.push(next.next);
                next.next += 1;
            }
            Move::LeftArc(relation) => {
                if let (Some(s0), Some(s1)) = (next.stack.pop(), next.stack.pop()) {
                    next.arcs.arcs.insert(Dependency::new(s0, s1, relation));
                    next.stack.push(s0);
                }
            }
            Move::RightArc(relation) => {
                if let (Some(s0), Some(&s1)) = (next.stack.pop(), next.stack.last()) {
                    next.arcs.arcs.insert(Dependency::new(s1, s0, relation));
                }
            }
        }
        next
    }
}

/// Extracts string features from the stack top, the item below it,
/// the buffer front and the last move.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArcFeatures;

impl ArcFeatures {
    fn word(c: &ArcStandardConfiguration, index: Option<usize>) -> &str {
        match index {
            Some(0) => "ROOT",
            Some(i) => c.token(i).map_or("?", |t| t.word.as_str()),
            None => "NONE",
        }
    }

    fn pos(c: &ArcStandardConfiguration, index: Option<usize>) -> &str {
        match index {
            Some(0) => "ROOT",
            Some(i) => c.token(i).map_or("?", |t| t.pos.as_str()),
            None => "NONE",
        }
    }
}

impl FeatureExtractor<ArcStandardConfiguration> for ArcFeatures {
    type Features = Vec<String>;

    fn features(&self, c: &ArcStandardConfiguration) -> Vec<String> {
        let m = c.last.map_or_else(|| "START".to_string(), |m| m.to_string());
        let s0 = c.stack_item(0);
        let s1 = c.stack_item(1);
        let b0 = c.buffer_front();
        let (s0w, s0p) = (Self::word(c, s0), Self::pos(c, s0));
        let (s1w, s1p) = (Self::word(c, s1), Self::pos(c, s1));
        let (b0w, b0p) = (Self::word(c, b0), Self::pos(c, b0));
        vec![
            format!("m={}", m),
            format!("m={},s0p={}", m, s0p),
            format!("m={},s0p={},s1p={}", m, s0p, s1p),
            format!("m={},s0p={},b0p={}", m, s0p, b0p),
            format!("m={},s0w={},s1w={}", m, s0w, s1w),
            format!("m={},s0w={},s1w={},b0w={}", m, s0w, s1w, b0w),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> (ArcStandard, ArcStandardConfiguration, Sentence, ArcGraph) {
        let words = sentence(&[("dogs", "NNS"), ("chase", "VBP"), ("cats", "NNS")]);
        let gold = ArcGraph::new()
            .with_arc(2, 1, 0)
            .with_arc(2, 3, 1)
            .with_arc(0, 2, 2);
        (ArcStandard::new(3), ArcStandardConfiguration::template(), words, gold)
    }

    #[test]
    fn test_start_configuration() {
        let (system, template, words, _) = fixture();
        let start = template.init(&words);

        assert_eq!(start.stack(), &[0]);
        assert_eq!(start.buffer_front(), Some(1));
        assert!(!start.is_terminal());
        let moves: Vec<_> = system.legal_transitions(&start).collect();
        assert_eq!(moves, vec![Move::Shift]);
    }

    #[test]
    fn test_transition_count_within_estimate() {
        let (system, template, words, _) = fixture();
        let mut c = template.init(&words);
        c = system.apply(&c, Move::Shift);
        c = system.apply(&c, Move::Shift);

        let count = system.legal_transitions(&c).count();
        assert_eq!(count, 1 + 2 * system.relations());
        assert!(count <= 2 * system.relations() + 2);
    }

    #[test]
    fn test_oracle_reaches_gold() {
        let (system, template, words, gold) = fixture();
        let derivation = system.oracle(&template, &words, &gold).unwrap();

        // 2n transitions for n tokens
        assert_eq!(derivation.len(), 7);
        let last = derivation.last().unwrap();
        assert!(last.is_terminal());
        assert_eq!(last.graph(), gold);
        assert_eq!(last.graph().number_of_edges(), 3);
    }

    #[test]
    fn test_equality_ignores_last_move() {
        let (system, template, words, _) = fixture();
        let a = system.apply(&template.init(&words), Move::Shift);
        let mut b = a.clone();
        b.last = None;
        assert_eq!(a, b);
    }

    #[test]
    fn test_features_mention_last_move() {
        let (system, template, words, _) = fixture();
        let c = system.apply(&template.init(&words), Move::Shift);
        let features = ArcFeatures.features(&c);

        assert!(features.contains(&"m=SH".to_string()));
        assert!(features.contains(&"m=SH,s0p=NNS,s1p=ROOT".to_string()));
    }
}
