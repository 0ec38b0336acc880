//! Scored configurations and their derivation trails.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

/// Stable identity of a candidate within one search step.
///
/// Built from the rank of the parent in the previous beam and the
/// position of the transition in the parent's enumeration, so it does
/// not depend on which expansion finished first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CandidateId {
    parent_rank: usize,
    ordinal: usize,
}

impl CandidateId {
    /// Creates an identifier.
    pub fn new(parent_rank: usize, ordinal: usize) -> Self {
        Self {
            parent_rank,
            ordinal,
        }
    }

    /// Rank of the parent in the previous beam.
    #[inline]
    pub fn parent_rank(&self) -> usize {
        self.parent_rank
    }

    /// Position of the transition in the parent's enumeration.
    #[inline]
    pub fn ordinal(&self) -> usize {
        self.ordinal
    }
}

// One link of a derivation, shared by every descendant.
#[derive(Debug)]
struct Trail<C> {
    configuration: C,
    parent: Option<Arc<Trail<C>>>,
    depth: usize,
}

/// A configuration paired with its cumulative path score.
///
/// A child starts out with its parent's score; the increment for the
/// transition that produced it is added when it is scored. Equality
/// compares configurations only and ignores the score.
pub struct ScoredConfiguration<C> {
    trail: Arc<Trail<C>>,
    score: f64,
    id: CandidateId,
    rank: usize,
}

impl<C> ScoredConfiguration<C> {
    /// Creates a start candidate with score 0.
    pub fn start(configuration: C) -> Self {
        Self::new(configuration, 0.0, CandidateId::default())
    }

    /// Creates a root candidate with an explicit score and identity.
    pub fn new(configuration: C, score: f64, id: CandidateId) -> Self {
        Self {
            trail: Arc::new(Trail {
                configuration,
                parent: None,
                depth: 0,
            }),
            score,
            id,
            rank: 0,
        }
    }

    /// Creates the successor reached from `self` by one transition.
    ///
    /// The child carries this candidate's score unmodified.
    pub fn child(&self, configuration: C, ordinal: usize) -> Self {
        Self {
            trail: Arc::new(Trail {
                configuration,
                parent: Some(Arc::clone(&self.trail)),
                depth: self.trail.depth + 1,
            }),
            score: self.score,
            id: CandidateId::new(self.rank, ordinal),
            rank: 0,
        }
    }

    /// Returns the configuration.
    #[inline]
    pub fn configuration(&self) -> &C {
        &self.trail.configuration
    }

    /// Returns the cumulative path score.
    #[inline]
    pub fn score(&self) -> f64 {
        self.score
    }

    /// Adds a transition increment to the path score.
    pub fn add_score(&mut self, increment: f64) {
        self.score += increment;
    }

    /// Returns the candidate's identity within its step.
    #[inline]
    pub fn id(&self) -> CandidateId {
        self.id
    }

    pub(crate) fn set_id(&mut self, id: CandidateId) {
        self.id = id;
    }

    /// Returns the rank this candidate was retained at (0 = best).
    #[inline]
    pub fn rank(&self) -> usize {
        self.rank
    }

    pub(crate) fn set_rank(&mut self, rank: usize) {
        self.rank = rank;
    }

    /// Number of transitions taken from the start configuration.
    #[inline]
    pub fn depth(&self) -> usize {
        self.trail.depth
    }

    /// Iterates the derivation backwards, from this configuration to the
    /// start configuration.
    pub fn ancestors(&self) -> impl Iterator<Item = &C> + '_ {
        let mut next = Some(self.trail.as_ref());
        std::iter::from_fn(move || {
            let trail = next?;
            next = trail.parent.as_deref();
            Some(&trail.configuration)
        })
    }

    /// Compares two candidates by score descending, then by identity.
    ///
    /// `Ordering::Greater` means `self` ranks ahead of `other`.
    pub fn rank_cmp(&self, other: &Self) -> Ordering {
        self.score
            .total_cmp(&other.score)
            .then_with(|| other.id.cmp(&self.id))
    }
}

impl<C: Clone> ScoredConfiguration<C> {
    /// Returns the derivation from the start configuration to this one.
    pub fn sequence(&self) -> Vec<C> {
        let mut sequence: Vec<C> = self.ancestors().cloned().collect();
        sequence.reverse();
        sequence
    }
}

impl<C> Clone for ScoredConfiguration<C> {
    fn clone(&self) -> Self {
        Self {
            trail: Arc::clone(&self.trail),
            score: self.score,
            id: self.id,
            rank: self.rank,
        }
    }
}

impl<C: PartialEq> PartialEq for ScoredConfiguration<C> {
    fn eq(&self, other: &Self) -> bool {
        self.configuration() == other.configuration()
    }
}

impl<C: fmt::Debug> fmt::Debug for ScoredConfiguration<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScoredConfiguration")
            .field("configuration", self.configuration())
            .field("score", &self.score)
            .field("id", &self.id)
            .field("depth", &self.trail.depth)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_candidate() {
        let start = ScoredConfiguration::start("s");
        assert_eq!(start.score(), 0.0);
        assert_eq!(start.depth(), 0);
        assert_eq!(start.id(), CandidateId::default());
        assert_eq!(start.sequence(), vec!["s"]);
    }

    #[test]
    fn test_child_keeps_parent_score() {
        let mut parent = ScoredConfiguration::new("p", 2.5, CandidateId::default());
        parent.set_rank(3);

        let child = parent.child("c", 1);
        assert_eq!(child.score(), 2.5);
        assert_eq!(child.depth(), 1);
        assert_eq!(child.id(), CandidateId::new(3, 1));
        assert_eq!(child.sequence(), vec!["p", "c"]);
    }

    #[test]
    fn test_add_score() {
        let mut c = ScoredConfiguration::start(0u8);
        c.add_score(1.5);
        c.add_score(-4.0);
        assert_eq!(c.score(), -2.5);
    }

    #[test]
    fn test_equality_ignores_score() {
        let a = ScoredConfiguration::new(7, 1.0, CandidateId::new(0, 0));
        let b = ScoredConfiguration::new(7, -3.0, CandidateId::new(1, 4));
        let c = ScoredConfiguration::new(8, 1.0, CandidateId::new(0, 0));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_rank_cmp_breaks_ties_by_id() {
        let high = ScoredConfiguration::new('a', 2.0, CandidateId::new(5, 5));
        let early = ScoredConfiguration::new('b', 1.0, CandidateId::new(0, 1));
        let late = ScoredConfiguration::new('c', 1.0, CandidateId::new(0, 2));

        assert_eq!(high.rank_cmp(&early), Ordering::Greater);
        assert_eq!(early.rank_cmp(&late), Ordering::Greater);
        assert_eq!(late.rank_cmp(&early), Ordering::Less);
        assert_eq!(late.rank_cmp(&late.clone()), Ordering::Equal);
    }

    #[test]
    fn test_ancestors_walk_back_to_start() {
        let root = ScoredConfiguration::start(0);
        let one = root.child(1, 0);
        let two = one.child(2, 0);

        let back: Vec<i32> = two.ancestors().copied().collect();
        assert_eq!(back, vec![2, 1, 0]);
        assert_eq!(two.sequence(), vec![0, 1, 2]);
    }
}
