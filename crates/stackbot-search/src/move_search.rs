//! The best-move search.
//!
//! [`MoveSearcher`] owns a [`ParallelExecutor`] and runs the pipeline
//! `first_ply → second_ply → score → select_best` on it. The worker pool is built once and
//! reused for every stage of every call.

use std::time::Instant;

use stackbot_engine::{Field, PieceKind};

use crate::{
    candidate::{self, Candidate, Ply},
    config::SearchConfig,
    error::SearchError,
    executor::ParallelExecutor,
    placement::{Placement, enumerate_placements},
    rotation_set::RotationSet,
    scorer::{CandidateScorer, LinearScorer, ScoredCandidate, WeightVector},
    selector,
};

/// How many pieces a candidate enumeration places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum SearchDepth {
    /// Only the current piece.
    #[display("single")]
    Single,
    /// The current piece, then the next piece on every resulting field.
    #[display("double")]
    Double,
}

#[derive(Debug)]
pub struct MoveSearcher {
    executor: ParallelExecutor,
}

impl MoveSearcher {
    /// Builds a searcher with a pool of `num_threads` workers.
    pub fn new(num_threads: usize) -> Result<Self, SearchError> {
        Ok(Self::with_executor(ParallelExecutor::new(num_threads)?))
    }

    #[must_use]
    pub fn with_executor(executor: ParallelExecutor) -> Self {
        Self { executor }
    }

    /// A searcher that does all work on the calling thread.
    #[must_use]
    pub fn sequential() -> Self {
        Self::with_executor(ParallelExecutor::sequential())
    }

    pub fn from_config(config: &SearchConfig) -> Result<Self, SearchError> {
        Self::new(config.num_threads)
    }

    #[must_use]
    pub fn executor(&self) -> &ParallelExecutor {
        &self.executor
    }

    /// Finds the cheapest two-ply continuation of `field` with `piece` then `next_piece`.
    ///
    /// The returned candidate's first ply is the move to play now. Its second ply is the
    /// look-ahead that justified it.
    ///
    /// # Errors
    ///
    /// - [`SearchError::ConfigurationMismatch`] if `weights` has the wrong length; checked
    ///   before any work is done
    /// - [`SearchError::EmptyEnumeration`] if `piece` cannot be placed anywhere
    pub fn best_move(
        &self,
        field: &Field,
        piece: PieceKind,
        next_piece: PieceKind,
        weights: &WeightVector,
    ) -> Result<ScoredCandidate, SearchError> {
        let scorer = LinearScorer::new(weights)?;
        self.best_move_with(field, piece, Some(next_piece), &scorer)
    }

    /// Like [`best_move`](Self::best_move), with weights picked by `config`.
    pub fn best_move_configured(
        &self,
        config: &SearchConfig,
        field: &Field,
        piece: PieceKind,
        next_piece: PieceKind,
        per_call_weights: Option<&WeightVector>,
    ) -> Result<ScoredCandidate, SearchError> {
        let weights = config.weights_for_call(per_call_weights)?;
        self.best_move(field, piece, next_piece, &weights)
    }

    /// Finds the cheapest placement of `piece` alone.
    pub fn best_single_move(
        &self,
        field: &Field,
        piece: PieceKind,
        weights: &WeightVector,
    ) -> Result<ScoredCandidate, SearchError> {
        let scorer = LinearScorer::new(weights)?;
        self.best_move_with(field, piece, None, &scorer)
    }

    /// Runs the search with an arbitrary scorer. Without `next_piece` only one ply is
    /// searched.
    pub fn best_move_with<S>(
        &self,
        field: &Field,
        piece: PieceKind,
        next_piece: Option<PieceKind>,
        scorer: &S,
    ) -> Result<ScoredCandidate, SearchError>
    where
        S: CandidateScorer + ?Sized,
    {
        let start = Instant::now();
        let candidates = self.candidates(field, piece, next_piece)?;
        let scores = self.executor.map(&candidates, |c| scorer.score(c));
        let best = selector::select_best(
            candidates
                .into_iter()
                .zip(scores)
                .map(|(candidate, score)| ScoredCandidate::new(candidate, score)),
        );

        let Some(best) = best.filter(|best| best.candidate().failed_ply() != Some(Ply::First))
        else {
            log::debug!("no placement of {piece} can be performed");
            return Err(SearchError::EmptyEnumeration { piece });
        };
        log::debug!(
            "best move for {piece}: {:?} (score {:.3}, {:.2?})",
            best.candidate().first().placement,
            best.score(),
            start.elapsed()
        );
        Ok(best)
    }

    /// Generates every candidate for `piece`, and for `next_piece` on each first-ply result
    /// when given, in enumeration order.
    ///
    /// Invalid candidates are included.
    pub fn candidates(
        &self,
        field: &Field,
        piece: PieceKind,
        next_piece: Option<PieceKind>,
    ) -> Result<Vec<Candidate>, SearchError> {
        let rotations = RotationSet::for_piece(piece);
        let first_moves: Vec<Placement> = enumerate_placements(&rotations, Field::WIDTH).collect();
        if first_moves.is_empty() {
            return Err(SearchError::EmptyEnumeration { piece });
        }
        let first = self.executor.map(&first_moves, |&placement| {
            candidate::first_ply(field, rotations.state(placement.rotation_index), placement)
        });
        log::trace!("{piece}: {} first-ply candidates", first.len());

        let Some(next_piece) = next_piece else {
            return Ok(first);
        };

        let next_rotations = RotationSet::for_piece(next_piece);
        let next_moves: Vec<Placement> =
            enumerate_placements(&next_rotations, Field::WIDTH).collect();
        if next_moves.is_empty() {
            return Err(SearchError::EmptyEnumeration { piece: next_piece });
        }
        let expansions: Vec<(usize, Placement)> = (0..first.len())
            .flat_map(|i| next_moves.iter().map(move |&placement| (i, placement)))
            .collect();
        let second = self.executor.map(&expansions, |&(i, placement)| {
            candidate::second_ply(
                &first[i],
                next_rotations.state(placement.rotation_index),
                placement,
            )
        });
        log::trace!("{piece} then {next_piece}: {} second-ply candidates", second.len());
        Ok(second)
    }
}

/// Enumerates candidates on the calling thread.
///
/// This is the reference the pooled search is compared against.
pub fn all_candidates_sequential(
    field: &Field,
    piece: PieceKind,
    next_piece: PieceKind,
    depth: SearchDepth,
) -> Result<Vec<Candidate>, SearchError> {
    let next_piece = match depth {
        SearchDepth::Single => None,
        SearchDepth::Double => Some(next_piece),
    };
    MoveSearcher::sequential().candidates(field, piece, next_piece)
}
