//! Score-ordered candidate collections.
//!
//! Two collections back one search step:
//! - [`LocalAgenda`]: a bounded top-K set owned by a single consumer
//!   while it drains one expansion stream
//! - [`Agenda`]: the shared collection every consumer merges into
//!   under a single lock, from which the next beam is extracted

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::fmt::{self, Debug};
use std::sync::{Mutex, PoisonError};

use transbeam_core::{Result, TransbeamError};

use crate::candidate::ScoredConfiguration;

/// A candidate wrapper for priority queue ordering.
///
/// Greater means better: higher score, then lower [`CandidateId`].
///
/// [`CandidateId`]: crate::candidate::CandidateId
struct Ranked<C>(ScoredConfiguration<C>);

impl<C> Eq for Ranked<C> {}

impl<C> PartialEq for Ranked<C> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<C> Ord for Ranked<C> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.rank_cmp(&other.0)
    }
}

impl<C> PartialOrd for Ranked<C> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// The shared, score-ordered collection filled during one search step.
///
/// Appends take `&self` and serialize on an internal lock so concurrent
/// consumers can merge into the same agenda. Reordering and extraction
/// take `&mut self`: they run on the driving thread once every consumer
/// has finished.
pub struct Agenda<C> {
    entries: Mutex<BinaryHeap<Ranked<C>>>,
}

impl<C> Agenda<C> {
    /// Creates an empty agenda pre-sized to `capacity` candidates.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Mutex::new(BinaryHeap::with_capacity(capacity)),
        }
    }

    /// Appends a batch of candidates under the agenda lock.
    ///
    /// The agenda is not bounded here; the beam is cut afterwards by
    /// [`Agenda::pop_best`].
    pub fn append(&self, batch: Vec<ScoredConfiguration<C>>) {
        if batch.is_empty() {
            return;
        }
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.extend(batch.into_iter().map(Ranked));
    }

    /// Appends a single candidate under the agenda lock.
    pub fn push(&self, candidate: ScoredConfiguration<C>) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.push(Ranked(candidate));
    }

    /// Returns the number of candidates.
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns true if the agenda holds no candidates.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the number of candidates the agenda holds without
    /// reallocating.
    pub fn capacity(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .capacity()
    }

    /// Returns the best candidate without removing it.
    pub fn peek(&mut self) -> Option<&ScoredConfiguration<C>> {
        self.entries_mut().peek().map(|ranked| &ranked.0)
    }

    /// Removes the `count` best candidates, best first.
    ///
    /// # Errors
    ///
    /// Returns [`TransbeamError::AgendaUnderflow`] if fewer than `count`
    /// candidates are present; nothing is removed in that case.
    pub fn pop_best(&mut self, count: usize) -> Result<Vec<ScoredConfiguration<C>>> {
        let entries = self.entries_mut();
        if count > entries.len() {
            return Err(TransbeamError::AgendaUnderflow {
                requested: count,
                available: entries.len(),
            });
        }
        let mut best = Vec::with_capacity(count);
        while best.len() < count {
            match entries.pop() {
                Some(Ranked(candidate)) => best.push(candidate),
                None => break,
            }
        }
        Ok(best)
    }

    fn entries_mut(&mut self) -> &mut BinaryHeap<Ranked<C>> {
        self.entries
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl<C> Debug for Agenda<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Agenda")
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .finish()
    }
}

/// A bounded top-K set filled by one consumer.
///
/// Kept as a min-heap so the worst retained candidate is always at the
/// top, ready to be compared against and evicted.
pub struct LocalAgenda<C> {
    limit: usize,
    entries: BinaryHeap<Reverse<Ranked<C>>>,
}

impl<C> LocalAgenda<C> {
    /// Creates an empty set retaining at most `limit` candidates.
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            entries: BinaryHeap::with_capacity(limit),
        }
    }

    /// Offers a scored candidate.
    ///
    /// When the set is full, a candidate that does not outrank the
    /// worst retained one is discarded and `false` is returned;
    /// otherwise the worst is evicted to make room.
    pub fn offer(&mut self, candidate: ScoredConfiguration<C>) -> bool {
        if self.limit == 0 {
            return false;
        }
        let ranked = Ranked(candidate);
        if self.entries.len() >= self.limit {
            match self.entries.peek() {
                Some(Reverse(worst)) if ranked <= *worst => return false,
                _ => {}
            }
            self.entries.pop();
        }
        self.entries.push(Reverse(ranked));
        true
    }

    /// Returns the number of retained candidates.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is retained.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the retained candidates in no particular order.
    pub fn into_vec(self) -> Vec<ScoredConfiguration<C>> {
        self.entries
            .into_vec()
            .into_iter()
            .map(|Reverse(ranked)| ranked.0)
            .collect()
    }
}

impl<C> Debug for LocalAgenda<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalAgenda")
            .field("limit", &self.limit)
            .field("len", &self.entries.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidate::CandidateId;

    fn scored(label: u32, score: f64, ordinal: usize) -> ScoredConfiguration<u32> {
        ScoredConfiguration::new(label, score, CandidateId::new(0, ordinal))
    }

    fn labels(candidates: &[ScoredConfiguration<u32>]) -> Vec<u32> {
        candidates.iter().map(|c| *c.configuration()).collect()
    }

    #[test]
    fn test_peek_returns_best() {
        let mut agenda = Agenda::with_capacity(4);
        agenda.append(vec![scored(1, 0.5, 0), scored(2, 3.0, 1), scored(3, -1.0, 2)]);

        assert_eq!(agenda.peek().map(|c| *c.configuration()), Some(2));
        // peeking leaves the contents in place
        assert_eq!(agenda.len(), 3);
    }

    #[test]
    fn test_peek_empty() {
        let mut agenda: Agenda<u32> = Agenda::with_capacity(0);
        assert!(agenda.peek().is_none());
        assert!(agenda.is_empty());
    }

    #[test]
    fn test_pop_best_all_is_descending() {
        let mut agenda = Agenda::with_capacity(8);
        agenda.append(vec![
            scored(1, 0.25, 0),
            scored(2, 4.0, 1),
            scored(3, -2.0, 2),
            scored(4, 1.0, 3),
            scored(5, 3.5, 4),
        ]);

        let all = agenda.pop_best(5).unwrap();
        assert_eq!(labels(&all), vec![2, 5, 4, 1, 3]);
        assert!(all.windows(2).all(|w| w[0].score() > w[1].score()));
        assert!(agenda.is_empty());
    }

    #[test]
    fn test_pop_best_returns_exactly_the_best() {
        let mut agenda = Agenda::with_capacity(8);
        agenda.append(vec![scored(1, 1.0, 0), scored(2, 5.0, 1), scored(3, 2.0, 2)]);
        agenda.append(vec![scored(4, 4.0, 3), scored(5, 0.0, 4)]);

        let top = agenda.pop_best(2).unwrap();
        assert_eq!(labels(&top), vec![2, 4]);
        assert_eq!(agenda.len(), 3);
    }

    #[test]
    fn test_pop_best_zero() {
        let mut agenda = Agenda::with_capacity(1);
        agenda.push(scored(1, 1.0, 0));
        assert!(agenda.pop_best(0).unwrap().is_empty());
        assert_eq!(agenda.len(), 1);
    }

    #[test]
    fn test_pop_best_underflow() {
        let mut agenda = Agenda::with_capacity(2);
        agenda.append(vec![scored(1, 1.0, 0), scored(2, 2.0, 1)]);

        let err = agenda.pop_best(3).unwrap_err();
        assert!(matches!(
            err,
            TransbeamError::AgendaUnderflow {
                requested: 3,
                available: 2
            }
        ));
        // a failed extraction removes nothing
        assert_eq!(agenda.len(), 2);
    }

    #[test]
    fn test_ties_resolved_by_id() {
        let mut agenda = Agenda::with_capacity(3);
        agenda.append(vec![scored(30, 1.0, 2), scored(10, 1.0, 0), scored(20, 1.0, 1)]);

        let all = agenda.pop_best(3).unwrap();
        assert_eq!(labels(&all), vec![10, 20, 30]);
    }

    #[test]
    fn test_capacity_is_presized() {
        let agenda: Agenda<u32> = Agenda::with_capacity(18);
        assert!(agenda.capacity() >= 18);
    }

    #[test]
    fn test_concurrent_appends() {
        let agenda = Agenda::with_capacity(64);
        std::thread::scope(|s| {
            for t in 0..8u32 {
                let agenda = &agenda;
                s.spawn(move || {
                    let batch = (0..8u32)
                        .map(|i| scored(t * 8 + i, f64::from(i), (t * 8 + i) as usize))
                        .collect();
                    agenda.append(batch);
                });
            }
        });
        assert_eq!(agenda.len(), 64);
    }

    #[test]
    fn test_local_agenda_keeps_top_k() {
        let mut local = LocalAgenda::new(2);
        assert!(local.offer(scored(1, 1.0, 0)));
        assert!(local.offer(scored(2, 3.0, 1)));
        // full, and worse than the worst retained
        assert!(!local.offer(scored(3, 0.5, 2)));
        // full, better than the worst: evicts 1
        assert!(local.offer(scored(4, 2.0, 3)));

        let mut kept = labels(&local.into_vec());
        kept.sort_unstable();
        assert_eq!(kept, vec![2, 4]);
    }

    #[test]
    fn test_local_agenda_discards_equal_score_from_later_transition() {
        let mut local = LocalAgenda::new(1);
        assert!(local.offer(scored(1, 1.0, 0)));
        assert!(!local.offer(scored(2, 1.0, 1)));
        assert_eq!(labels(&local.into_vec()), vec![1]);
    }

    #[test]
    fn test_local_agenda_zero_limit() {
        let mut local = LocalAgenda::new(0);
        assert!(!local.offer(scored(1, 1.0, 0)));
        assert!(local.is_empty());
    }
}
