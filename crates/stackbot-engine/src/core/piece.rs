use serde::{Deserialize, Serialize};

/// Enum representing the type of piece.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Deserialize,
    Serialize,
    derive_more::Display,
    derive_more::FromStr,
)]
#[repr(u8)]
pub enum PieceKind {
    /// I-piece.
    I = 0,
    /// O-piece.
    O = 1,
    /// S-piece.
    S = 2,
    /// Z-piece.
    Z = 3,
    /// J-piece.
    J = 4,
    /// L-piece.
    L = 5,
    /// T-piece.
    T = 6,
}

impl PieceKind {
    /// Number of piece types (7).
    pub const LEN: usize = 7;

    /// All piece kinds in declaration order.
    pub const ALL: [Self; Self::LEN] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
        PieceKind::T,
    ];

    /// Returns the shape of this piece rotated clockwise `rotation` times.
    ///
    /// Rotation counts wrap modulo 4, so `rotation_state(4)` equals `rotation_state(0)`.
    ///
    /// # Examples
    ///
    /// ```
    /// use stackbot_engine::PieceKind;
    ///
    /// let flat = PieceKind::I.rotation_state(0);
    /// let upright = PieceKind::I.rotation_state(1);
    /// assert_eq!((flat.width(), flat.height()), (4, 1));
    /// assert_eq!((upright.width(), upright.height()), (1, 4));
    /// ```
    #[must_use]
    pub const fn rotation_state(self, rotation: u8) -> RotationState {
        ROTATION_STATES[self as usize][(rotation % 4) as usize]
    }
}

/// One fixed orientation of a piece, trimmed to its bounding box.
///
/// Row masks are stored top to bottom; bit `dx` of a row is the cell `dx` columns right of
/// the box's left edge. States are plain `Copy` values, built at compile time, and can be
/// shared freely across threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationState {
    kind: PieceKind,
    rotation: u8,
    rows: PieceMask,
    width: u8,
    height: u8,
}

impl RotationState {
    #[must_use]
    pub const fn kind(&self) -> PieceKind {
        self.kind
    }

    /// Number of clockwise quarter turns applied to the base shape.
    #[must_use]
    pub const fn rotation(&self) -> u8 {
        self.rotation
    }

    #[must_use]
    pub const fn width(&self) -> usize {
        self.width as usize
    }

    #[must_use]
    pub const fn height(&self) -> usize {
        self.height as usize
    }

    /// Row masks of the bounding box, top row first.
    #[must_use]
    pub fn row_masks(&self) -> &[u16] {
        &self.rows[..self.height()]
    }

    /// Iterates `(dx, dy)` offsets of the occupied cells relative to the box's top-left.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.row_masks()
            .iter()
            .enumerate()
            .flat_map(move |(dy, mask)| {
                (0..self.width()).filter_map(move |dx| (mask & (1 << dx) != 0).then_some((dx, dy)))
            })
    }
}

/// Bitboard representation of a piece within its 4×4 bounding box.
///
/// Each element is one row; bit `x` is column `x`.
pub(crate) type PieceMask = [u16; 4];

/// Generates all 4 rotation states of a piece mask by rotating 90° clockwise.
///
/// # Arguments
///
/// * `size` - Effective size of the piece (3 for most pieces, 4 for I, 2 for O)
/// * `mask` - Initial piece mask at 0° rotation
const fn mask_rotations(size: usize, mask: PieceMask) -> [PieceMask; 4] {
    let mut rotates = [mask; 4];
    let mut i = 1;
    while i < 4 {
        let mut new_mask = [0; 4];
        let mut y = 0;
        while y < size {
            let mut x = 0;
            while x < size {
                if (rotates[i - 1][size - 1 - x] & (1 << y)) != 0 {
                    new_mask[y] |= 1 << x;
                }
                x += 1;
            }
            y += 1;
        }
        rotates[i] = new_mask;
        i += 1;
    }
    rotates
}

const PIECE_MASKS: [[PieceMask; 4]; PieceKind::LEN] = {
    const fn m(bits: [bool; 4]) -> u16 {
        let mut mask = 0;
        let mut i = 0;
        while i < 4 {
            if bits[i] {
                mask |= 1 << i;
            }
            i += 1;
        }
        mask
    }

    const C: bool = true;
    const E: bool = false;
    const EEEE: u16 = m([E; 4]);

    [
        // I-piece
        mask_rotations(4, [EEEE, m([C, C, C, C]), EEEE, EEEE]),
        // O-piece
        mask_rotations(2, [m([C, C, E, E]), m([C, C, E, E]), EEEE, EEEE]),
        // S-piece
        mask_rotations(3, [m([E, C, C, E]), m([C, C, E, E]), EEEE, EEEE]),
        // Z-piece
        mask_rotations(3, [m([C, C, E, E]), m([E, C, C, E]), EEEE, EEEE]),
        // J-piece
        mask_rotations(3, [m([C, E, E, E]), m([C, C, C, E]), EEEE, EEEE]),
        // L-piece
        mask_rotations(3, [m([E, E, C, E]), m([C, C, C, E]), EEEE, EEEE]),
        // T-piece
        mask_rotations(3, [m([E, C, E, E]), m([C, C, C, E]), EEEE, EEEE]),
    ]
};

/// Shifts a 4×4 mask so its occupied cells touch the top-left corner.
#[expect(clippy::cast_possible_truncation)]
const fn trim_to_bounding_box(kind: PieceKind, rotation: u8, mask: PieceMask) -> RotationState {
    let mut union = 0;
    let mut top = mask.len();
    let mut bottom = 0;
    let mut y = 0;
    while y < mask.len() {
        if mask[y] != 0 {
            union |= mask[y];
            if top == mask.len() {
                top = y;
            }
            bottom = y;
        }
        y += 1;
    }

    let left = union.trailing_zeros();
    let width = u16::BITS - union.leading_zeros() - left;
    let mut rows = [0; 4];
    let mut height = 0;
    while top + height <= bottom {
        rows[height] = mask[top + height] >> left;
        height += 1;
    }

    RotationState {
        kind,
        rotation,
        rows,
        width: width as u8,
        height: height as u8,
    }
}

const fn rotation_states(kind: PieceKind) -> [RotationState; 4] {
    let masks = &PIECE_MASKS[kind as usize];
    [
        trim_to_bounding_box(kind, 0, masks[0]),
        trim_to_bounding_box(kind, 1, masks[1]),
        trim_to_bounding_box(kind, 2, masks[2]),
        trim_to_bounding_box(kind, 3, masks[3]),
    ]
}

const ROTATION_STATES: [[RotationState; 4]; PieceKind::LEN] = [
    rotation_states(PieceKind::I),
    rotation_states(PieceKind::O),
    rotation_states(PieceKind::S),
    rotation_states(PieceKind::Z),
    rotation_states(PieceKind::J),
    rotation_states(PieceKind::L),
    rotation_states(PieceKind::T),
];

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(state: &RotationState) -> Vec<(usize, usize)> {
        state.cells().collect()
    }

    #[test]
    fn test_every_state_has_four_cells() {
        for kind in PieceKind::ALL {
            for rotation in 0..4 {
                let state = kind.rotation_state(rotation);
                assert_eq!(state.cells().count(), 4, "{kind} rotated {rotation} times");
                assert_eq!(state.kind(), kind);
                assert_eq!(state.rotation(), rotation);
            }
        }
    }

    #[test]
    fn test_states_touch_top_left() {
        for kind in PieceKind::ALL {
            for rotation in 0..4 {
                let state = kind.rotation_state(rotation);
                assert!(state.cells().any(|(dx, _)| dx == 0));
                assert!(state.cells().any(|(_, dy)| dy == 0));
                assert!(state.cells().all(|(dx, dy)| dx < state.width() && dy < state.height()));
            }
        }
    }

    #[test]
    fn test_base_shapes() {
        assert_eq!(
            cells(&PieceKind::T.rotation_state(0)),
            [(1, 0), (0, 1), (1, 1), (2, 1)]
        );
        assert_eq!(
            cells(&PieceKind::S.rotation_state(0)),
            [(1, 0), (2, 0), (0, 1), (1, 1)]
        );
        assert_eq!(
            cells(&PieceKind::O.rotation_state(0)),
            [(0, 0), (1, 0), (0, 1), (1, 1)]
        );
        assert_eq!(
            cells(&PieceKind::I.rotation_state(0)),
            [(0, 0), (1, 0), (2, 0), (3, 0)]
        );
    }

    #[test]
    fn test_rotated_dimensions() {
        let s1 = PieceKind::S.rotation_state(1);
        assert_eq!((s1.width(), s1.height()), (2, 3));
        assert_eq!(cells(&s1), [(0, 0), (0, 1), (1, 1), (1, 2)]);

        let t1 = PieceKind::T.rotation_state(1);
        assert_eq!((t1.width(), t1.height()), (2, 3));

        let o3 = PieceKind::O.rotation_state(3);
        assert_eq!(cells(&o3), cells(&PieceKind::O.rotation_state(0)));
    }

    #[test]
    fn test_rotation_wraps() {
        for kind in PieceKind::ALL {
            assert_eq!(kind.rotation_state(4), kind.rotation_state(0));
            assert_eq!(kind.rotation_state(7), kind.rotation_state(3));
        }
    }

    #[test]
    fn test_half_turn_symmetry() {
        for kind in [PieceKind::I, PieceKind::S, PieceKind::Z] {
            assert_eq!(
                cells(&kind.rotation_state(0)),
                cells(&kind.rotation_state(2)),
                "{kind}"
            );
        }
        for kind in [PieceKind::J, PieceKind::L, PieceKind::T] {
            assert_ne!(
                cells(&kind.rotation_state(0)),
                cells(&kind.rotation_state(2)),
                "{kind}"
            );
        }
    }

    #[test]
    fn test_piece_kind_from_str() {
        assert_eq!("T".parse::<PieceKind>().ok(), Some(PieceKind::T));
        assert!("Q".parse::<PieceKind>().is_err());
    }
}
