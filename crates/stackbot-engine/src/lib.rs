//! Field simulation for the stackbot placement search.
//!
//! This crate owns everything the search treats as a collaborator:
//!
//! - [`Field`] - fixed-size grid with copy, drop and row clearing
//! - [`PieceKind`] and [`RotationState`] - piece geometry and its rotations
//! - [`FieldAnalysis`] - heuristic feature extraction ([`Field::heuristics`])
//! - [`PieceBuffer`] and [`GameStats`] - 7-bag piece supply and play statistics
//!
//! # Example
//!
//! ```
//! use stackbot_engine::{Field, PieceKind};
//!
//! let mut field = Field::EMPTY;
//! let state = PieceKind::I.rotation_state(0);
//! let cleared = field.drop_piece(&state, 0).unwrap();
//!
//! assert_eq!(cleared, 0);
//! assert_eq!(field.heuristics()[0], 4.0); // aggregate height
//! ```

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

/// Failure of [`Field::drop_piece`].
///
/// A drop either fits horizontally and finds a resting place, or fails with one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum DropError {
    #[display("piece of width {piece_width} does not fit at column {column}")]
    ColumnOutOfRange { column: usize, piece_width: usize },
    #[display("piece collides with the stack at the top of column {column}")]
    BlockedAtSpawn { column: usize },
}
