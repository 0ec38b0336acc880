//! Generic beam-search driver.
//!
//! The driver owns the iteration loop and nothing else. Each iteration:
//! 1. Expands every non-terminal candidate (fan-out, one stream each)
//! 2. Drains the streams concurrently into a fresh agenda (fan-in)
//! 3. Carries terminal candidates into the agenda unchanged
//! 4. Reorders the agenda and cuts the next beam from its front
//!
//! Iterations never overlap: step `i + 1` starts only after step `i`'s
//! agenda has been cut. The loop ends once every retained candidate
//! passes the goal test.

use std::time::Instant;

use rayon::prelude::*;
use tracing::{debug, info};
use transbeam_core::{Result, TransbeamError};

/// The step operations a beam exposes to the driver.
pub trait Search: Sync {
    /// The input being searched.
    type Problem: ?Sized + Sync;
    /// A scored search state.
    type Candidate: Send;
    /// The collection one step's children are merged into.
    type Agenda: Sync;
    /// The children produced by expanding one candidate.
    type Stream: IntoIterator<Item = Self::Candidate> + Send;

    /// Returns the initial beam for `problem`.
    fn start_item(&self, problem: &Self::Problem) -> Result<Vec<Self::Candidate>>;

    /// Returns an empty agenda for the next step.
    fn clear(&self) -> Self::Agenda;

    /// Starts expanding `candidate`, returning its child stream.
    fn expand(&self, candidate: &Self::Candidate, problem: &Self::Problem) -> Self::Stream;

    /// Scores a child stream and merges the survivors into `agenda`.
    ///
    /// Called concurrently for different streams of the same step.
    fn insert(&self, stream: Self::Stream, agenda: &Self::Agenda);

    /// Moves a terminal candidate into `agenda` without rescoring it.
    fn carry(&self, candidate: Self::Candidate, agenda: &Self::Agenda);

    /// Returns the number of candidates in `agenda`.
    fn agenda_len(&self, agenda: &Self::Agenda) -> usize;

    /// Reorders `agenda` and returns its best candidate.
    fn top<'a>(&self, agenda: &'a mut Self::Agenda) -> Option<&'a Self::Candidate>;

    /// Removes the `b` best candidates of a reordered agenda, best first.
    fn top_b(&self, agenda: &mut Self::Agenda, b: usize) -> Result<Vec<Self::Candidate>>;

    /// Returns true if `candidate` is a finished derivation.
    fn goal_test(&self, problem: &Self::Problem, candidate: &Self::Candidate) -> bool;

    /// Returns the path score of `candidate`.
    fn score(&self, candidate: &Self::Candidate) -> f64;
}

/// A search that can be aligned against a gold derivation.
pub trait GoldSearch: Search {
    /// One element of the gold derivation.
    type Gold;

    /// Returns true if `candidate` is structurally the gold state `gold`.
    fn matches_gold(&self, candidate: &Self::Candidate, gold: &Self::Gold) -> bool;
}

/// Result of a plain search.
#[derive(Debug)]
pub struct SearchOutcome<C> {
    /// The final beam, best first.
    pub beam: Vec<C>,
    /// Number of iterations run.
    pub steps: usize,
    /// Largest beam retained after any cut.
    pub peak_beam_size: usize,
}

impl<C> SearchOutcome<C> {
    /// Returns the best candidate of the final beam.
    pub fn best(&self) -> Option<&C> {
        self.beam.first()
    }

    /// Consumes the outcome, returning the best candidate.
    pub fn into_best(self) -> Option<C> {
        self.beam.into_iter().next()
    }
}

/// Terminal state of an early-update search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EarlyUpdateOutcome {
    /// The gold state fell out of the beam at `step`; search stopped there.
    GoldLost {
        /// The step whose cut discarded the gold state.
        step: usize,
    },
    /// The gold state stayed in the beam until every candidate finished.
    GoldSurvivedToGoal {
        /// Number of iterations run.
        steps: usize,
    },
}

impl EarlyUpdateOutcome {
    /// Returns true if the search stopped early.
    pub fn is_gold_lost(&self) -> bool {
        matches!(self, EarlyUpdateOutcome::GoldLost { .. })
    }

    /// Returns the number of iterations run.
    pub fn steps(&self) -> usize {
        match *self {
            EarlyUpdateOutcome::GoldLost { step } => step,
            EarlyUpdateOutcome::GoldSurvivedToGoal { steps } => steps,
        }
    }
}

/// Result of an early-update search.
#[derive(Debug)]
pub struct EarlyUpdateSearch<C> {
    /// Best candidate of the last beam.
    pub best: C,
    /// Index of the gold state compared at the last step.
    pub gold_index: usize,
    /// How the search ended.
    pub outcome: EarlyUpdateOutcome,
}

/// Runs beam search until every retained candidate is a goal.
///
/// # Errors
///
/// Propagates errors from the searcher and returns
/// [`TransbeamError::EmptyBeam`] if a step leaves no candidate.
pub fn search<S: Search>(
    searcher: &S,
    problem: &S::Problem,
    beam_size: usize,
) -> Result<SearchOutcome<S::Candidate>> {
    let started = Instant::now();
    let mut beam = searcher.start_item(problem)?;
    let mut steps = 0usize;
    let mut peak_beam_size = beam.len();

    debug!(event = "search_start", beam_size);

    while !all_goals(searcher, problem, &beam) {
        steps += 1;
        beam = step(searcher, problem, beam, beam_size, steps)?;
        peak_beam_size = peak_beam_size.max(beam.len());
    }

    let best_score = match beam.first() {
        Some(best) => searcher.score(best),
        None => return Err(TransbeamError::EmptyBeam { step: steps }),
    };

    info!(
        event = "search_end",
        steps,
        duration_ms = started.elapsed().as_millis() as u64,
        best_score,
    );

    Ok(SearchOutcome {
        beam,
        steps,
        peak_beam_size,
    })
}

/// Runs beam search alongside a gold derivation, stopping as soon as
/// the gold state is no longer retained.
///
/// `gold[0]` is the start state; `gold[i]` is compared against the beam
/// retained after step `i`. A gold derivation shorter than the search
/// is compared through its final state.
///
/// # Errors
///
/// Returns [`TransbeamError::EmptyGoldSequence`] for an empty `gold`,
/// and otherwise fails like [`search`].
pub fn search_early_update<S: GoldSearch>(
    searcher: &S,
    problem: &S::Problem,
    beam_size: usize,
    gold: &[S::Gold],
) -> Result<EarlyUpdateSearch<S::Candidate>> {
    let last_gold = gold
        .len()
        .checked_sub(1)
        .ok_or(TransbeamError::EmptyGoldSequence)?;
    let mut beam = searcher.start_item(problem)?;
    let mut steps = 0usize;
    let mut gold_index = 0usize;

    debug!(event = "search_start", beam_size, gold_len = gold.len());

    let outcome = loop {
        if all_goals(searcher, problem, &beam) {
            break EarlyUpdateOutcome::GoldSurvivedToGoal { steps };
        }
        steps += 1;
        beam = step(searcher, problem, beam, beam_size, steps)?;

        gold_index = steps.min(last_gold);
        let gold_state = &gold[gold_index];
        if !beam.iter().any(|c| searcher.matches_gold(c, gold_state)) {
            info!(event = "gold_lost", step = steps, gold_index);
            break EarlyUpdateOutcome::GoldLost { step: steps };
        }
    };

    let best = beam
        .into_iter()
        .next()
        .ok_or(TransbeamError::EmptyBeam { step: steps })?;

    info!(
        event = "early_update_end",
        steps,
        gold_lost = outcome.is_gold_lost(),
        best_score = searcher.score(&best),
    );

    Ok(EarlyUpdateSearch {
        best,
        gold_index,
        outcome,
    })
}

fn all_goals<S: Search>(searcher: &S, problem: &S::Problem, beam: &[S::Candidate]) -> bool {
    beam.iter().all(|c| searcher.goal_test(problem, c))
}

// One iteration: fan out, fan in, cut.
fn step<S: Search>(
    searcher: &S,
    problem: &S::Problem,
    beam: Vec<S::Candidate>,
    beam_size: usize,
    step_index: usize,
) -> Result<Vec<S::Candidate>> {
    let mut agenda = searcher.clear();
    let mut streams = Vec::with_capacity(beam.len());

    for candidate in beam {
        if searcher.goal_test(problem, &candidate) {
            searcher.carry(candidate, &agenda);
        } else {
            streams.push(searcher.expand(&candidate, problem));
        }
    }

    streams
        .into_par_iter()
        .for_each(|stream| searcher.insert(stream, &agenda));

    let agenda_size = searcher.agenda_len(&agenda);
    let best_score = match searcher.top(&mut agenda) {
        Some(best) => searcher.score(best),
        None => return Err(TransbeamError::EmptyBeam { step: step_index }),
    };
    let next = searcher.top_b(&mut agenda, beam_size.min(agenda_size))?;

    debug!(
        event = "step_end",
        step = step_index,
        agenda_size,
        beam_size = next.len(),
        best_score,
    );

    Ok(next)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    // Scores are the candidates; every candidate is a goal, and the
    // start beam holds whatever the test gives it.
    struct Scores(Vec<f64>);

    impl Search for Scores {
        type Problem = ();
        type Candidate = f64;
        type Agenda = Mutex<Vec<f64>>;
        type Stream = Vec<f64>;

        fn start_item(&self, _problem: &()) -> Result<Vec<f64>> {
            Ok(self.0.clone())
        }

        fn clear(&self) -> Mutex<Vec<f64>> {
            Mutex::new(Vec::new())
        }

        fn expand(&self, _candidate: &f64, _problem: &()) -> Vec<f64> {
            Vec::new()
        }

        fn insert(&self, stream: Vec<f64>, agenda: &Mutex<Vec<f64>>) {
            agenda.lock().unwrap().extend(stream);
        }

        fn carry(&self, candidate: f64, agenda: &Mutex<Vec<f64>>) {
            agenda.lock().unwrap().push(candidate);
        }

        fn agenda_len(&self, agenda: &Mutex<Vec<f64>>) -> usize {
            agenda.lock().unwrap().len()
        }

        fn top<'a>(&self, agenda: &'a mut Mutex<Vec<f64>>) -> Option<&'a f64> {
            let scores = agenda.get_mut().unwrap();
            scores.sort_by(|a, b| b.total_cmp(a));
            scores.first()
        }

        fn top_b(&self, agenda: &mut Mutex<Vec<f64>>, b: usize) -> Result<Vec<f64>> {
            Ok(agenda.get_mut().unwrap().drain(..b).collect())
        }

        fn goal_test(&self, _problem: &(), _candidate: &f64) -> bool {
            true
        }

        fn score(&self, candidate: &f64) -> f64 {
            *candidate
        }
    }

    impl GoldSearch for Scores {
        type Gold = f64;

        fn matches_gold(&self, candidate: &f64, gold: &f64) -> bool {
            candidate == gold
        }
    }

    #[test]
    fn test_search_without_start_candidates_is_an_empty_beam() {
        let err = search(&Scores(Vec::new()), &(), 2).unwrap_err();
        assert!(matches!(err, TransbeamError::EmptyBeam { step: 0 }));
    }

    #[test]
    fn test_early_update_without_start_candidates_is_an_empty_beam() {
        let err = search_early_update(&Scores(Vec::new()), &(), 2, &[0.0]).unwrap_err();
        assert!(matches!(err, TransbeamError::EmptyBeam { step: 0 }));
    }

    #[test]
    fn test_finished_start_beam_runs_no_step() {
        let outcome = search(&Scores(vec![2.0, 1.0]), &(), 2).unwrap();
        assert_eq!(outcome.steps, 0);
        assert_eq!(outcome.best(), Some(&2.0));

        let early = search_early_update(&Scores(vec![2.0]), &(), 2, &[2.0]).unwrap();
        assert_eq!(early.outcome, EarlyUpdateOutcome::GoldSurvivedToGoal { steps: 0 });
        assert_eq!(early.best, 2.0);
    }
}
