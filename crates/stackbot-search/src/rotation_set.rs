//! Distinct orientations of a piece.
//!
//! Rotating the O piece never changes its shape, and the I, S and Z pieces repeat after a
//! half turn. Searching only the distinct orientations avoids scoring identical placements
//! more than once.

use arrayvec::ArrayVec;
use stackbot_engine::{PieceKind, RotationState};

/// Number of physically distinct orientations of a piece kind.
#[must_use]
pub const fn distinct_rotation_count(kind: PieceKind) -> u8 {
    match kind {
        PieceKind::O => 1,
        PieceKind::I | PieceKind::S | PieceKind::Z => 2,
        PieceKind::J | PieceKind::L | PieceKind::T => 4,
    }
}

/// The orientations of one piece that the search tries.
///
/// Entry `i` is the base shape rotated clockwise `i` times, so a rotation index reported by
/// the search can be replayed by rotating the spawned piece that many times.
///
/// # Example
///
/// ```
/// use stackbot_engine::PieceKind;
/// use stackbot_search::RotationSet;
///
/// assert_eq!(RotationSet::for_piece(PieceKind::O).len(), 1);
/// assert_eq!(RotationSet::for_piece(PieceKind::S).len(), 2);
/// assert_eq!(RotationSet::for_piece(PieceKind::T).len(), 4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationSet {
    kind: PieceKind,
    states: ArrayVec<RotationState, 4>,
}

impl RotationSet {
    #[must_use]
    pub fn for_piece(kind: PieceKind) -> Self {
        let states = (0..distinct_rotation_count(kind))
            .map(|rotation| kind.rotation_state(rotation))
            .collect();
        Self { kind, states }
    }

    #[must_use]
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    #[must_use]
    pub fn get(&self, rotation_index: usize) -> Option<&RotationState> {
        self.states.get(rotation_index)
    }

    /// Returns the orientation at `rotation_index`.
    ///
    /// # Panics
    ///
    /// Panics if `rotation_index >= self.len()`.
    #[must_use]
    pub fn state(&self, rotation_index: usize) -> &RotationState {
        &self.states[rotation_index]
    }

    pub fn iter(&self) -> impl Iterator<Item = &RotationState> + '_ {
        self.states.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotation_counts() {
        for kind in PieceKind::ALL {
            let expected = match kind {
                PieceKind::O => 1,
                PieceKind::I | PieceKind::S | PieceKind::Z => 2,
                _ => 4,
            };
            assert_eq!(RotationSet::for_piece(kind).len(), expected, "{kind}");
        }
    }

    #[test]
    fn test_index_zero_is_base_shape() {
        for kind in PieceKind::ALL {
            let set = RotationSet::for_piece(kind);
            assert_eq!(set.state(0), &kind.rotation_state(0));
            assert_eq!(set.kind(), kind);
        }
    }

    #[test]
    fn test_index_is_rotation_count() {
        for kind in PieceKind::ALL {
            for (i, state) in RotationSet::for_piece(kind).iter().enumerate() {
                assert_eq!(usize::from(state.rotation()), i);
            }
        }
    }

    #[test]
    fn test_states_are_distinct() {
        for kind in PieceKind::ALL {
            let set = RotationSet::for_piece(kind);
            for (i, a) in set.iter().enumerate() {
                for b in set.iter().skip(i + 1) {
                    let a_cells: Vec<_> = a.cells().collect();
                    let b_cells: Vec<_> = b.cells().collect();
                    assert_ne!(a_cells, b_cells, "{kind} has duplicate orientations");
                }
            }
        }
    }

    #[test]
    fn test_get_out_of_range() {
        let set = RotationSet::for_piece(PieceKind::I);
        assert!(set.get(1).is_some());
        assert!(set.get(2).is_none());
        assert!(!set.is_empty());
    }
}
