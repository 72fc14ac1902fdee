//! Retry-until-convergence over render rounds.
//!
//! Renderer failures are often transient (the headless browser times out
//! under load), so failed pages are fed into another round as long as each
//! round shrinks the failed set.

use diplo_traits::Interrupt;
use diplo_types::{PageId, TranscriptPage};
use itertools::Itertools;
use std::collections::HashSet;

/// Upper bound on render rounds when nothing else stops the loop.
pub const DEFAULT_MAX_ROUNDS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_rounds: usize,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_rounds: DEFAULT_MAX_ROUNDS,
        }
    }
}

/// The outcome of one render round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundSummary {
    /// 1-based.
    pub round: usize,
    pub attempted: usize,
    pub failed: usize,
}

#[derive(Debug)]
pub struct Convergence {
    /// Pages that never rendered successfully.
    pub failed: Vec<TranscriptPage>,
    pub rounds: Vec<RoundSummary>,
    pub interrupted: bool,
}

impl Convergence {
    /// Number of rounds that ran.
    pub fn tries(&self) -> usize {
        self.rounds.len()
    }
}

/// Runs `round` over `pages`, then over each round's failures, until the
/// failed set is empty or stops shrinking.
///
/// The loop also stops after `policy.max_rounds` rounds and as soon as
/// `interrupt` is triggered. Whatever is still failing then is terminal.
pub fn converge<F>(
    pages: Vec<TranscriptPage>,
    policy: RetryPolicy,
    interrupt: &Interrupt,
    mut round: F,
) -> Convergence
where
    F: FnMut(Vec<TranscriptPage>) -> Vec<TranscriptPage>,
{
    let mut current = pages;
    let mut rounds = Vec::new();
    let mut interrupted = false;

    while !current.is_empty() {
        if interrupt.is_triggered() {
            interrupted = true;
            break;
        }

        let attempted = current.len();
        let tries = rounds.len() + 1;
        let failed = round(current.clone());
        let shrank = !failed.is_empty() && failed.len() < attempted;

        if shrank && tries > 1 {
            let still_failing: HashSet<PageId> = failed.iter().map(TranscriptPage::id).collect();
            log::warn!(
                "The following {} pages needed {} tries to properly convert:\n {}",
                attempted - failed.len(),
                tries,
                current
                    .iter()
                    .filter(|p| !still_failing.contains(&p.id()))
                    .join("\n ")
            );
        } else {
            log::info!(
                "Failed to convert {} of {} pages at try {}",
                failed.len(),
                attempted,
                tries
            );
        }

        rounds.push(RoundSummary {
            round: tries,
            attempted,
            failed: failed.len(),
        });
        current = failed;

        if interrupt.is_triggered() {
            interrupted = true;
            break;
        }
        if !shrank {
            break;
        }
        if tries >= policy.max_rounds {
            log::warn!("Giving up on {} pages after {} rounds", current.len(), tries);
            break;
        }
    }

    Convergence {
        failed: current,
        rounds,
        interrupted,
    }
}
