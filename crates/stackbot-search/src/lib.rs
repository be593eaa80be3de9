//! Two-ply placement search: picks where to put the current piece, looking one piece ahead.
//!
//! Given a [`Field`](stackbot_engine::Field), the current piece and the next piece, the
//! search tries every placement of the current piece, then every placement of the next piece
//! on each resulting field, scores every resulting field with a linear heuristic model and
//! returns the cheapest one.
//!
//! # Pipeline
//!
//! ```text
//! RotationSet ──► enumerate_placements ──► first_ply ──► second_ply ──► score ──► select_best
//!                                            (map)         (map)        (map)
//! ```
//!
//! Each `(map)` stage runs on a [`ParallelExecutor`]; stages are separated by barriers.
//!
//! - [`rotation_set`] - distinct orientations of a piece
//! - [`placement`] - `(rotation, column)` enumeration
//! - [`candidate`] - applying one or two placements to a field copy
//! - [`scorer`] - weighted linear cost of a candidate
//! - [`selector`] - deterministic minimum selection
//! - [`executor`] - reusable worker pool with an order-preserving parallel map
//! - [`config`] - search configuration and weight model files
//! - [`move_search`] - [`MoveSearcher`], tying the stages together
//!
//! # Example
//!
//! ```
//! use stackbot_engine::{Field, PieceKind};
//! use stackbot_search::{MoveSearcher, WeightVector};
//!
//! let searcher = MoveSearcher::new(2).unwrap();
//! let decision = searcher
//!     .best_move(&Field::EMPTY, PieceKind::T, PieceKind::O, &WeightVector::default())
//!     .unwrap();
//!
//! let first = decision.candidate().first().placement;
//! assert!(first.column < Field::WIDTH);
//! assert!(decision.candidate().second().is_some());
//! ```
//!
//! # Scores
//!
//! Scores are costs: lower is better. A candidate whose placement could not be performed
//! scores `f32::INFINITY`, so it can only be chosen when nothing else exists; if even the
//! first piece cannot be placed anywhere, the search fails with
//! [`SearchError::EmptyEnumeration`].

pub use self::{
    candidate::{Candidate, CandidateOutcome, InvalidPlacement, Ply, PlyRecord},
    config::{FeatureWeight, SearchConfig, WeightModel, WeightModelError},
    error::SearchError,
    executor::ParallelExecutor,
    move_search::{MoveSearcher, SearchDepth},
    placement::Placement,
    rotation_set::RotationSet,
    scorer::{CandidateScorer, LinearScorer, ScoredCandidate, WeightVector},
};

pub mod candidate;
pub mod config;
mod error;
pub mod executor;
pub mod move_search;
pub mod placement;
pub mod rotation_set;
pub mod scorer;
pub mod selector;
