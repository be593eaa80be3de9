use std::fmt::{self, Write as _};

use serde::{Deserialize, Serialize};

use crate::{
    DropError,
    core::{
        FIELD_HEIGHT, FIELD_WIDTH,
        field_analysis::{FeatureVector, FieldAnalysis},
        piece::RotationState,
    },
};

// Full row (all cells occupied)
const FULL_ROW_MASK: u16 = (1 << FIELD_WIDTH) - 1;

/// Single row of the field.
///
/// Stores one row as a 16-bit bitmask where bit `x` is column `x`. Only the low
/// [`Field::WIDTH`] bits are used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRow {
    bits: u16,
}

impl FieldRow {
    pub const EMPTY: Self = Self { bits: 0 };

    /// Checks if every cell of the row is occupied.
    #[inline]
    #[must_use]
    pub fn is_filled(self) -> bool {
        self.bits == FULL_ROW_MASK
    }

    #[inline]
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.bits == 0
    }

    /// Checks if the cell at column `x` is occupied.
    #[inline]
    #[must_use]
    pub fn is_cell_occupied(self, x: usize) -> bool {
        (self.bits & (1 << x)) != 0
    }

    /// Checks if any cell in the given mask (shifted by x0) is occupied.
    #[inline]
    fn is_any_cell_occupied(self, x0: usize, mask: u16) -> bool {
        (self.bits & (mask << x0)) != 0
    }

    /// Sets cells in the given mask (shifted by x0) as occupied.
    #[inline]
    fn occupy_cells(&mut self, x0: usize, mask: u16) {
        self.bits |= mask << x0;
    }

    /// Iterates over the cells of the row from left to right.
    #[inline]
    pub fn iter_cells(self) -> impl Iterator<Item = bool> {
        (0..FIELD_WIDTH).map(move |x| self.is_cell_occupied(x))
    }
}

/// The playing field: a 10×20 grid of filled or empty cells.
///
/// Rows are indexed from the top (`y = 0`) to the bottom (`y = HEIGHT - 1`), columns from the
/// left. A `Field` is a plain value: [`Clone`] produces an independent deep copy, and every
/// mutating operation acts only on the instance it is called on.
///
/// # Example
///
/// ```
/// use stackbot_engine::{Field, PieceKind};
///
/// let field = Field::from_ascii(
///     r"
///     ..........
///     .#########
///     ",
/// );
///
/// let mut copy = field.clone();
/// let upright_i = PieceKind::I.rotation_state(1);
/// let cleared = copy.drop_piece(&upright_i, 0).unwrap();
///
/// assert_eq!(cleared, 1);
/// assert_ne!(copy, field);
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Field {
    rows: [FieldRow; FIELD_HEIGHT],
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Field {{")?;
        for row in &self.rows {
            f.write_str("    ")?;
            for occupied in row.iter_cells() {
                f.write_char(if occupied { '#' } else { '.' })?;
            }
            f.write_char('\n')?;
        }
        f.write_char('}')
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (y, row) in self.rows.iter().enumerate() {
            if y > 0 {
                f.write_char('\n')?;
            }
            for occupied in row.iter_cells() {
                f.write_char(if occupied { '#' } else { '.' })?;
            }
        }
        Ok(())
    }
}

impl Default for Field {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Serialize for Field {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        // Format: "0000,0000,...,03ff" (comma-separated hex values, top row first)
        let mut hex_string = String::with_capacity(FIELD_HEIGHT * 4 + FIELD_HEIGHT - 1);
        for (i, row) in self.rows.iter().enumerate() {
            if i > 0 {
                hex_string.push(',');
            }
            write!(&mut hex_string, "{:04x}", row.bits).map_err(serde::ser::Error::custom)?;
        }
        serializer.serialize_str(&hex_string)
    }
}

impl<'de> Deserialize<'de> for Field {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;

        let parts: Vec<&str> = s.split(',').collect();
        if parts.len() != FIELD_HEIGHT {
            return Err(serde::de::Error::custom(format!(
                "expected {} comma-separated hex values, got {}",
                FIELD_HEIGHT,
                parts.len()
            )));
        }

        let mut rows = [FieldRow::EMPTY; FIELD_HEIGHT];
        for (i, hex_str) in parts.iter().enumerate() {
            let bits = u16::from_str_radix(hex_str, 16).map_err(|e| {
                serde::de::Error::custom(format!("invalid hex at row {i}: {hex_str} ({e})"))
            })?;
            if bits & !FULL_ROW_MASK != 0 {
                return Err(serde::de::Error::custom(format!(
                    "row {i} has cells outside the field: {hex_str}"
                )));
            }
            rows[i] = FieldRow { bits };
        }

        Ok(Field { rows })
    }
}

impl Field {
    pub const WIDTH: usize = FIELD_WIDTH;
    pub const HEIGHT: usize = FIELD_HEIGHT;

    pub const EMPTY: Self = Self {
        rows: [FieldRow::EMPTY; FIELD_HEIGHT],
    };

    #[must_use]
    pub fn row(&self, y: usize) -> FieldRow {
        self.rows[y]
    }

    /// Returns an iterator over the rows, top row first.
    pub fn rows(&self) -> impl Iterator<Item = FieldRow> + '_ {
        self.rows.iter().copied()
    }

    #[must_use]
    pub fn is_occupied(&self, x: usize, y: usize) -> bool {
        self.rows[y].is_cell_occupied(x)
    }

    /// Checks if a piece whose bounding box has its top-left corner at `(x0, y0)` overlaps
    /// occupied cells or reaches below the floor.
    #[must_use]
    pub fn is_colliding(&self, piece: &RotationState, x0: usize, y0: usize) -> bool {
        if y0 + piece.height() > Self::HEIGHT {
            return true;
        }
        piece
            .row_masks()
            .iter()
            .zip(&self.rows[y0..])
            .any(|(mask, row)| row.is_any_cell_occupied(x0, *mask))
    }

    /// Drops a piece straight down at `column` (the left edge of its bounding box), locks
    /// it and clears completed rows.
    ///
    /// The piece enters at the top of the field and falls until it rests on the floor or
    /// the stack. Returns the number of cleared rows.
    ///
    /// # Errors
    ///
    /// - [`DropError::ColumnOutOfRange`] if the piece does not fit horizontally at `column`
    /// - [`DropError::BlockedAtSpawn`] if the piece overlaps the stack at the top row
    ///
    /// The field is left untouched when an error is returned.
    pub fn drop_piece(&mut self, piece: &RotationState, column: usize) -> Result<usize, DropError> {
        if column + piece.width() > Self::WIDTH {
            return Err(DropError::ColumnOutOfRange {
                column,
                piece_width: piece.width(),
            });
        }
        if self.is_colliding(piece, column, 0) {
            return Err(DropError::BlockedAtSpawn { column });
        }

        let mut y = 0;
        while !self.is_colliding(piece, column, y + 1) {
            y += 1;
        }
        self.fill_piece(piece, column, y);
        Ok(self.clear_lines())
    }

    /// Locks a piece onto the field by setting its occupied cells.
    fn fill_piece(&mut self, piece: &RotationState, x0: usize, y0: usize) {
        for (mask, row) in piece.row_masks().iter().zip(&mut self.rows[y0..]) {
            row.occupy_cells(x0, *mask);
        }
    }

    /// Clears filled lines and returns the number of lines cleared.
    pub fn clear_lines(&mut self) -> usize {
        let mut count = 0;

        for y in (0..Self::HEIGHT).rev() {
            if self.rows[y].is_filled() {
                count += 1;
                continue;
            }
            if count > 0 {
                self.rows[y + count] = self.rows[y];
            }
        }

        self.rows[..count].fill(FieldRow::EMPTY);
        count
    }

    /// Computes the heuristic feature vector of this field.
    ///
    /// See [`HeuristicFeature`](crate::HeuristicFeature) for the order and meaning of the
    /// entries.
    #[must_use]
    pub fn heuristics(&self) -> FeatureVector {
        FieldAnalysis::from_field(self).feature_vector()
    }

    /// Creates a `Field` from ASCII art.
    ///
    /// `'#'` is an occupied cell and `'.'` an empty one; other characters are ignored. Each
    /// non-blank line must hold exactly [`Field::WIDTH`] cells. The art is aligned to the
    /// bottom of the field, so only the lowest rows need to be written.
    ///
    /// # Panics
    ///
    /// Panics if a row has the wrong number of cells or there are too many rows.
    #[must_use]
    pub fn from_ascii(art: &str) -> Self {
        Self::parse_ascii(art).unwrap_or_else(|e| panic!("{e}"))
    }

    /// Fallible counterpart of [`Field::from_ascii`].
    pub fn parse_ascii(art: &str) -> Result<Self, ParseFieldError> {
        let lines: Vec<&str> = art.lines().filter(|line| !line.trim().is_empty()).collect();
        if lines.len() > Self::HEIGHT {
            return Err(ParseFieldError::TooManyRows { rows: lines.len() });
        }

        let mut field = Self::EMPTY;
        let top = Self::HEIGHT - lines.len();
        for (i, line) in lines.iter().enumerate() {
            let cells: Vec<char> = line.chars().filter(|c| *c == '#' || *c == '.').collect();
            if cells.len() != Self::WIDTH {
                return Err(ParseFieldError::RowWidth {
                    row: i,
                    cells: cells.len(),
                });
            }
            for (x, &ch) in cells.iter().enumerate() {
                if ch == '#' {
                    field.rows[top + i].occupy_cells(x, 0b1);
                }
            }
        }
        Ok(field)
    }
}

/// Failure of [`Field::parse_ascii`].
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ParseFieldError {
    #[display("each row must have exactly {} cells, got {cells} at row {row}", Field::WIDTH)]
    RowWidth { row: usize, cells: usize },
    #[display("field has at most {} rows, got {rows}", Field::HEIGHT)]
    TooManyRows { rows: usize },
}

#[cfg(test)]
mod tests {
    use crate::PieceKind;

    use super::*;

    #[test]
    fn test_empty_field() {
        let field = Field::EMPTY;
        for y in 0..Field::HEIGHT {
            for x in 0..Field::WIDTH {
                assert!(!field.is_occupied(x, y), "({x}, {y}) should be empty");
            }
        }
    }

    #[test]
    fn test_from_ascii_is_bottom_aligned() {
        let field = Field::from_ascii(
            r"
            #.........
            ##........
            ",
        );
        assert!(field.is_occupied(0, Field::HEIGHT - 2));
        assert!(!field.is_occupied(1, Field::HEIGHT - 2));
        assert!(field.is_occupied(1, Field::HEIGHT - 1));
        assert!(field.row(0).is_empty());
    }

    #[test]
    fn test_parse_ascii_errors() {
        assert_eq!(
            Field::parse_ascii("#####"),
            Err(ParseFieldError::RowWidth { row: 0, cells: 5 })
        );
        let too_tall = "..........\n".repeat(Field::HEIGHT + 1);
        assert_eq!(
            Field::parse_ascii(&too_tall),
            Err(ParseFieldError::TooManyRows {
                rows: Field::HEIGHT + 1
            })
        );
    }

    #[test]
    fn test_drop_on_empty_field_rests_on_floor() {
        let mut field = Field::EMPTY;
        let cleared = field
            .drop_piece(&PieceKind::O.rotation_state(0), 4)
            .unwrap();
        assert_eq!(cleared, 0);
        let expected = Field::from_ascii(
            r"
            ....##....
            ....##....
            ",
        );
        assert_eq!(field, expected);
    }

    #[test]
    fn test_drop_rests_on_stack() {
        let mut field = Field::from_ascii(
            r"
            .#........
            .#........
            ",
        );
        field
            .drop_piece(&PieceKind::T.rotation_state(0), 0)
            .unwrap();
        let expected = Field::from_ascii(
            r"
            .#........
            ###.......
            .#........
            .#........
            ",
        );
        assert_eq!(field, expected);
    }

    #[test]
    fn test_drop_does_not_slide_under_overhang() {
        let mut field = Field::from_ascii(
            r"
            ##........
            ..........
            ",
        );
        field
            .drop_piece(&PieceKind::I.rotation_state(1), 0)
            .unwrap();
        assert!(field.is_occupied(0, Field::HEIGHT - 3));
        assert!(!field.is_occupied(0, Field::HEIGHT - 1));
    }

    #[test]
    fn test_drop_clears_lines() {
        let mut field = Field::from_ascii(
            r"
            ########..
            ########..
            #.#.#.#.##
            ",
        );
        let cleared = field
            .drop_piece(&PieceKind::O.rotation_state(0), 8)
            .unwrap();
        assert_eq!(cleared, 2);
        let expected = Field::from_ascii(
            r"
            #.#.#.#.##
            ",
        );
        assert_eq!(field, expected);
    }

    #[test]
    fn test_drop_column_out_of_range() {
        let mut field = Field::EMPTY;
        let err = field
            .drop_piece(&PieceKind::I.rotation_state(0), 7)
            .unwrap_err();
        assert_eq!(
            err,
            DropError::ColumnOutOfRange {
                column: 7,
                piece_width: 4
            }
        );
        assert_eq!(field, Field::EMPTY);
    }

    #[test]
    fn test_drop_blocked_at_spawn() {
        let art = "#.........\n".repeat(Field::HEIGHT);
        let mut field = Field::from_ascii(&art);
        let before = field.clone();
        let err = field
            .drop_piece(&PieceKind::O.rotation_state(0), 0)
            .unwrap_err();
        assert_eq!(err, DropError::BlockedAtSpawn { column: 0 });
        assert_eq!(field, before);

        field
            .drop_piece(&PieceKind::O.rotation_state(0), 1)
            .unwrap();
    }

    #[test]
    fn test_clone_is_independent() {
        let original = Field::EMPTY;
        let mut copy = original.clone();
        copy.drop_piece(&PieceKind::L.rotation_state(0), 3).unwrap();
        assert_eq!(original, Field::EMPTY);
        assert_ne!(copy, original);
    }

    #[test]
    fn test_clear_lines_all_filled() {
        let art = "##########\n".repeat(Field::HEIGHT);
        let mut field = Field::from_ascii(&art);
        assert_eq!(field.clear_lines(), Field::HEIGHT);
        assert_eq!(field, Field::EMPTY);
    }

    #[test]
    fn test_field_serialization() {
        let field = Field::from_ascii(
            r"
            ##........
            ",
        );
        let serialized = serde_json::to_string(&field).unwrap();
        assert!(serialized.starts_with("\"0000,"));
        assert!(serialized.ends_with(",0003\""));
        assert_eq!(serialized.len(), Field::HEIGHT * 4 + (Field::HEIGHT - 1) + 2);

        let deserialized: Field = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized, field);
    }

    #[test]
    fn test_field_deserialization_errors() {
        assert!(serde_json::from_str::<Field>("\"0000,0000\"").is_err());
        let out_of_range = vec!["0400"; Field::HEIGHT].join(",");
        assert!(serde_json::from_str::<Field>(&format!("\"{out_of_range}\"")).is_err());
    }

    #[test]
    fn test_display_round_trips_through_ascii() {
        let field = Field::from_ascii(
            r"
            ...#......
            #.##..####
            ",
        );
        assert_eq!(Field::from_ascii(&field.to_string()), field);
    }
}
