//! Deterministic minimum selection.

use std::cmp::Ordering;

use crate::{candidate::Ply, scorer::ScoredCandidate};

/// Failures rank behind successes; a first-ply failure ranks behind a second-ply one.
fn failure_rank(scored: &ScoredCandidate) -> u8 {
    match scored.candidate().failed_ply() {
        None => 0,
        Some(Ply::Second) => 1,
        Some(Ply::First) => 2,
    }
}

fn compare(a: &ScoredCandidate, b: &ScoredCandidate) -> Ordering {
    a.score()
        .total_cmp(&b.score())
        .then_with(|| failure_rank(a).cmp(&failure_rank(b)))
}

/// Returns the cheapest candidate, or `None` for an empty input.
///
/// Candidates must be supplied in enumeration order: among equal scores the earliest one
/// wins, which makes the result independent of how the scores were computed.
pub fn select_best<I>(candidates: I) -> Option<ScoredCandidate>
where
    I: IntoIterator<Item = ScoredCandidate>,
{
    let mut best: Option<ScoredCandidate> = None;
    for scored in candidates {
        match &best {
            Some(current) if compare(&scored, current).is_ge() => {}
            _ => best = Some(scored),
        }
    }
    best
}
