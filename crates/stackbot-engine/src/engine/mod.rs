//! Piece supply and play statistics for driving repeated decisions.
//!
//! - [`PieceBuffer`] - 7-bag piece generation with a one-piece preview
//! - [`PieceSeed`] - seed for deterministic piece generation
//! - [`GameStats`] - score, cleared lines and placed pieces

pub use self::{game_stats::*, piece_buffer::*};

mod game_stats;
mod piece_buffer;
