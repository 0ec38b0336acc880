//! Search statistics collection.
//!
//! The beam records counters from the driving thread and from every
//! concurrent consumer, so all counters are atomics.

use std::sync::atomic::{AtomicU64, Ordering};

/// Snapshot of the counters collected by a beam.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStatistics {
    /// Search steps started (one fresh agenda each).
    pub step_count: u64,
    /// Candidates handed to expansion.
    pub candidates_expanded: u64,
    /// Children scored by consumers.
    pub children_scored: u64,
    /// Children discarded by a consumer's local top-K bound.
    pub children_pruned: u64,
    /// Local sets merged into a shared agenda.
    pub agenda_merges: u64,
}

impl SearchStatistics {
    /// Returns the fraction of scored children discarded locally.
    pub fn prune_rate(&self) -> f64 {
        if self.children_scored == 0 {
            0.0
        } else {
            self.children_pruned as f64 / self.children_scored as f64
        }
    }
}

/// Thread-safe collector for search statistics.
#[derive(Debug, Default)]
pub struct StatisticsCollector {
    step_count: AtomicU64,
    candidates_expanded: AtomicU64,
    children_scored: AtomicU64,
    children_pruned: AtomicU64,
    agenda_merges: AtomicU64,
}

impl StatisticsCollector {
    /// Creates a new collector with zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the start of a search step.
    pub fn record_step(&self) {
        self.step_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Records one candidate handed to expansion.
    pub fn record_expansion(&self) {
        self.candidates_expanded.fetch_add(1, Ordering::Relaxed);
    }

    /// Records the outcome of draining one expansion stream.
    pub fn record_insert(&self, scored: u64, pruned: u64) {
        self.children_scored.fetch_add(scored, Ordering::Relaxed);
        self.children_pruned.fetch_add(pruned, Ordering::Relaxed);
        self.agenda_merges.fetch_add(1, Ordering::Relaxed);
    }

    /// Returns a snapshot of the current counters.
    pub fn snapshot(&self) -> SearchStatistics {
        SearchStatistics {
            step_count: self.step_count.load(Ordering::Relaxed),
            candidates_expanded: self.candidates_expanded.load(Ordering::Relaxed),
            children_scored: self.children_scored.load(Ordering::Relaxed),
            children_pruned: self.children_pruned.load(Ordering::Relaxed),
            agenda_merges: self.agenda_merges.load(Ordering::Relaxed),
        }
    }

    /// Resets every counter to zero.
    pub fn reset(&self) {
        self.step_count.store(0, Ordering::Relaxed);
        self.candidates_expanded.store(0, Ordering::Relaxed);
        self.children_scored.store(0, Ordering::Relaxed);
        self.children_pruned.store(0, Ordering::Relaxed);
        self.agenda_merges.store(0, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collector_snapshot() {
        let collector = StatisticsCollector::new();

        collector.record_step();
        collector.record_expansion();
        collector.record_expansion();
        collector.record_insert(6, 2);

        let snapshot = collector.snapshot();
        assert_eq!(snapshot.step_count, 1);
        assert_eq!(snapshot.candidates_expanded, 2);
        assert_eq!(snapshot.children_scored, 6);
        assert_eq!(snapshot.children_pruned, 2);
        assert_eq!(snapshot.agenda_merges, 1);
        assert!((snapshot.prune_rate() - 1.0 / 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_collector_reset() {
        let collector = StatisticsCollector::new();
        collector.record_step();
        collector.record_insert(3, 1);
        collector.reset();

        assert_eq!(collector.snapshot(), SearchStatistics::default());
        assert_eq!(collector.snapshot().prune_rate(), 0.0);
    }

    #[test]
    fn test_collector_thread_safety() {
        let collector = StatisticsCollector::new();

        rayon::scope(|s| {
            for _ in 0..4 {
                s.spawn(|_| {
                    for _ in 0..1000 {
                        collector.record_expansion();
                        collector.record_insert(2, 1);
                    }
                });
            }
        });

        let snapshot = collector.snapshot();
        assert_eq!(snapshot.candidates_expanded, 4000);
        assert_eq!(snapshot.children_scored, 8000);
        assert_eq!(snapshot.agenda_merges, 4000);
    }
}
