//! Applying placements to copies of a field.
//!
//! A [`Candidate`] is the field that results from one placement (first ply) or from two
//! consecutive placements (second ply), together with the placements that produced it. The
//! input field is never modified; each candidate owns its own copy.
//!
//! A placement that cannot be performed does not abort the search. It produces an invalid
//! candidate that records which ply failed, and the scorer later ranks it last.

use serde::Serialize;
use stackbot_engine::{DropError, Field, RotationState};

use crate::placement::Placement;

/// Which of the two plies a placement belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Ply {
    #[display("first")]
    First,
    #[display("second")]
    Second,
}

/// A placement that could not be performed, and why.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("{ply} ply placement failed: {source}")]
pub struct InvalidPlacement {
    ply: Ply,
    source: DropError,
}

impl InvalidPlacement {
    #[must_use]
    pub fn ply(&self) -> Ply {
        self.ply
    }

    #[must_use]
    pub fn drop_error(&self) -> DropError {
        self.source
    }
}

/// The placement applied at one ply and the number of rows it cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlyRecord {
    pub placement: Placement,
    pub cleared_lines: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::IsVariant)]
pub enum CandidateOutcome {
    Valid(Field),
    Invalid(InvalidPlacement),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    outcome: CandidateOutcome,
    first: PlyRecord,
    second: Option<PlyRecord>,
}

impl Candidate {
    #[must_use]
    pub fn outcome(&self) -> &CandidateOutcome {
        &self.outcome
    }

    /// The resulting field, or `None` if a placement failed.
    #[must_use]
    pub fn field(&self) -> Option<&Field> {
        match &self.outcome {
            CandidateOutcome::Valid(field) => Some(field),
            CandidateOutcome::Invalid(_) => None,
        }
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.outcome.is_valid()
    }

    #[must_use]
    pub fn invalid_placement(&self) -> Option<&InvalidPlacement> {
        match &self.outcome {
            CandidateOutcome::Valid(_) => None,
            CandidateOutcome::Invalid(invalid) => Some(invalid),
        }
    }

    /// The ply whose placement failed, if any.
    #[must_use]
    pub fn failed_ply(&self) -> Option<Ply> {
        self.invalid_placement().map(InvalidPlacement::ply)
    }

    #[must_use]
    pub fn first(&self) -> &PlyRecord {
        &self.first
    }

    #[must_use]
    pub fn second(&self) -> Option<&PlyRecord> {
        self.second.as_ref()
    }

    /// Rows cleared by both plies together.
    #[must_use]
    pub fn total_cleared_lines(&self) -> usize {
        self.first.cleared_lines + self.second.map_or(0, |second| second.cleared_lines)
    }
}

/// Places `state` on a copy of `field` at `placement.column`.
#[must_use]
pub fn first_ply(field: &Field, state: &RotationState, placement: Placement) -> Candidate {
    let mut next = field.clone();
    match next.drop_piece(state, placement.column) {
        Ok(cleared_lines) => Candidate {
            outcome: CandidateOutcome::Valid(next),
            first: PlyRecord {
                placement,
                cleared_lines,
            },
            second: None,
        },
        Err(source) => Candidate {
            outcome: CandidateOutcome::Invalid(InvalidPlacement {
                ply: Ply::First,
                source,
            }),
            first: PlyRecord {
                placement,
                cleared_lines: 0,
            },
            second: None,
        },
    }
}

/// Places `state` on a copy of the first-ply candidate's field.
///
/// If the first ply already failed, no drop is attempted: the result stays invalid and keeps
/// the first-ply failure, with the second placement recorded as clearing nothing.
#[must_use]
pub fn second_ply(first: &Candidate, state: &RotationState, placement: Placement) -> Candidate {
    let outcome = match &first.outcome {
        CandidateOutcome::Invalid(invalid) => Err(*invalid),
        CandidateOutcome::Valid(field) => {
            let mut next = field.clone();
            next.drop_piece(state, placement.column)
                .map(|cleared| (next, cleared))
                .map_err(|source| InvalidPlacement {
                    ply: Ply::Second,
                    source,
                })
        }
    };
    let (outcome, cleared_lines) = match outcome {
        Ok((field, cleared)) => (CandidateOutcome::Valid(field), cleared),
        Err(invalid) => (CandidateOutcome::Invalid(invalid), 0),
    };
    Candidate {
        outcome,
        first: first.first,
        second: Some(PlyRecord {
            placement,
            cleared_lines,
        }),
    }
}
