use std::mem;

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
    seq::SliceRandom,
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::PieceKind;

/// Seed for deterministic piece generation.
///
/// Two buffers built from the same seed yield the same piece sequence.
///
/// # Example
///
/// ```
/// use stackbot_engine::{PieceBuffer, PieceSeed};
///
/// let seed = PieceSeed::new(42);
/// let mut a = PieceBuffer::with_seed(seed);
/// let mut b = PieceBuffer::with_seed(seed);
/// assert_eq!(a.pop_next(), b.pop_next());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, derive_more::Display)]
#[serde(transparent)]
#[display("{_0:016x}")]
pub struct PieceSeed(u64);

impl PieceSeed {
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }
}

impl Distribution<PieceSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceSeed {
        PieceSeed(rng.random())
    }
}

/// Supplies pieces using the 7-bag randomization algorithm.
///
/// Each bag holds all 7 piece kinds in shuffled order and is drawn from front to back before
/// the next bag is shuffled. One piece is always drawn ahead, so the search can look at the
/// upcoming piece through [`Self::peek_next`].
#[derive(Debug, Clone)]
pub struct PieceBuffer {
    rng: Pcg32,
    bag: [PieceKind; PieceKind::LEN],
    position: usize,
    next: PieceKind,
}

impl PieceBuffer {
    /// Creates a buffer whose piece sequence is fully determined by `seed`.
    #[must_use]
    pub fn with_seed(seed: PieceSeed) -> Self {
        let mut this = Self {
            rng: Pcg32::seed_from_u64(seed.0),
            bag: PieceKind::ALL,
            position: PieceKind::LEN,
            next: PieceKind::I,
        };
        this.next = this.draw();
        this
    }

    fn draw(&mut self) -> PieceKind {
        if self.position == PieceKind::LEN {
            self.bag = PieceKind::ALL;
            self.bag.shuffle(&mut self.rng);
            self.position = 0;
        }
        let piece = self.bag[self.position];
        self.position += 1;
        piece
    }

    /// Draws the next piece.
    pub fn pop_next(&mut self) -> PieceKind {
        let upcoming = self.draw();
        mem::replace(&mut self.next, upcoming)
    }

    /// Returns the piece that the next [`Self::pop_next`] call will return.
    #[must_use]
    pub fn peek_next(&self) -> PieceKind {
        self.next
    }
}
