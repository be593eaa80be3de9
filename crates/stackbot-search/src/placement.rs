//! `(rotation, column)` enumeration.

use serde::{Deserialize, Serialize};

use crate::rotation_set::RotationSet;

/// One candidate move for one piece.
///
/// `rotation_index` indexes the piece's [`RotationSet`]; `column` is the left edge of the
/// rotated piece's bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Placement {
    pub rotation_index: usize,
    pub column: usize,
}

impl Placement {
    #[must_use]
    pub const fn new(rotation_index: usize, column: usize) -> Self {
        Self {
            rotation_index,
            column,
        }
    }
}

/// Lazily enumerates every placement that fits horizontally in a field of `width` columns.
///
/// Placements come rotation index ascending, then column ascending. Columns run over
/// `0..=width - state.width()`; an orientation wider than the field contributes nothing.
/// Whether the piece can actually come to rest is left to the drop.
///
/// # Example
///
/// ```
/// use stackbot_engine::PieceKind;
/// use stackbot_search::{Placement, RotationSet, placement::enumerate_placements};
///
/// let rotations = RotationSet::for_piece(PieceKind::I);
/// let placements: Vec<_> = enumerate_placements(&rotations, 10).collect();
///
/// assert_eq!(placements.len(), 7 + 10);
/// assert_eq!(placements[0], Placement::new(0, 0));
/// assert_eq!(placements[7], Placement::new(1, 0));
/// ```
pub fn enumerate_placements(
    rotations: &RotationSet,
    width: usize,
) -> impl Iterator<Item = Placement> + '_ {
    rotations
        .iter()
        .enumerate()
        .flat_map(move |(rotation_index, state)| {
            let columns = (width + 1).saturating_sub(state.width());
            (0..columns).map(move |column| Placement::new(rotation_index, column))
        })
}

/// Number of placements [`enumerate_placements`] yields.
#[must_use]
pub fn placement_count(rotations: &RotationSet, width: usize) -> usize {
    rotations
        .iter()
        .map(|state| (width + 1).saturating_sub(state.width()))
        .sum()
}

#[cfg(test)]
mod tests {
    use stackbot_engine::PieceKind;

    use super::*;

    #[test]
    fn test_columns_stay_in_bounds() {
        for kind in PieceKind::ALL {
            let rotations = RotationSet::for_piece(kind);
            for placement in enumerate_placements(&rotations, 10) {
                let state = rotations.state(placement.rotation_index);
                assert!(placement.column + state.width() <= 10);
            }
        }
    }

    #[test]
    fn test_counts_per_piece() {
        let count = |kind| placement_count(&RotationSet::for_piece(kind), 10);
        assert_eq!(count(PieceKind::O), 9);
        assert_eq!(count(PieceKind::I), 7 + 10);
        assert_eq!(count(PieceKind::S), 8 + 9);
        assert_eq!(count(PieceKind::T), 8 + 9 + 8 + 9);
        for kind in PieceKind::ALL {
            let rotations = RotationSet::for_piece(kind);
            assert_eq!(enumerate_placements(&rotations, 10).count(), count(kind));
        }
    }

    #[test]
    fn test_order_is_rotation_then_column() {
        let rotations = RotationSet::for_piece(PieceKind::L);
        let placements: Vec<_> = enumerate_placements(&rotations, 10).collect();
        assert!(placements.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_narrow_field() {
        let rotations = RotationSet::for_piece(PieceKind::I);
        let placements: Vec<_> = enumerate_placements(&rotations, 3).collect();
        assert_eq!(
            placements,
            [
                Placement::new(1, 0),
                Placement::new(1, 1),
                Placement::new(1, 2)
            ]
        );

        let square = RotationSet::for_piece(PieceKind::O);
        assert_eq!(enumerate_placements(&square, 1).count(), 0);
        assert_eq!(enumerate_placements(&square, 0).count(), 0);
    }
}
