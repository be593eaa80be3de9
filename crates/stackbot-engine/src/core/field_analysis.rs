//! Heuristic feature extraction from a [`Field`].
//!
//! Every feature measures something undesirable, so a lower value always means a better
//! field. The search combines them with a weight vector into a cost.

use std::{cell::OnceCell, iter};

use crate::core::field::Field;

/// Fixed-order heuristic summary of a field, indexed by [`HeuristicFeature`].
pub type FeatureVector = [f32; HeuristicFeature::LEN];

/// The heuristic features, in feature-vector order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum HeuristicFeature {
    /// Sum of all column heights.
    #[display("aggregate_height")]
    AggregateHeight,
    /// Empty cells with at least one filled cell above them in the same column.
    #[display("holes")]
    Holes,
    /// Sum of absolute height differences between neighboring columns.
    #[display("bumpiness")]
    Bumpiness,
    /// Height of the tallest column.
    #[display("max_height")]
    MaxHeight,
    /// Filled/empty changes between horizontally adjacent cells.
    #[display("row_transitions")]
    RowTransitions,
    /// Filled/empty changes between vertically adjacent cells.
    #[display("column_transitions")]
    ColumnTransitions,
    /// Sum of well depths (columns lower than both neighbors; walls count as infinitely high).
    #[display("well_depth")]
    WellDepth,
    /// Sum over holes of the number of filled cells above each hole.
    #[display("hole_depth")]
    HoleDepth,
}

impl HeuristicFeature {
    pub const LEN: usize = 8;

    pub const ALL: [Self; Self::LEN] = [
        Self::AggregateHeight,
        Self::Holes,
        Self::Bumpiness,
        Self::MaxHeight,
        Self::RowTransitions,
        Self::ColumnTransitions,
        Self::WellDepth,
        Self::HoleDepth,
    ];

    /// Stable identifier used in weight model files.
    #[must_use]
    pub fn id(self) -> String {
        self.to_string()
    }

    /// Looks up a feature by its identifier.
    ///
    /// # Examples
    ///
    /// ```
    /// use stackbot_engine::HeuristicFeature;
    ///
    /// assert_eq!(HeuristicFeature::from_id("holes"), Some(HeuristicFeature::Holes));
    /// assert_eq!(HeuristicFeature::from_id("lines"), None);
    /// ```
    #[must_use]
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.id() == id)
    }

    /// Position of this feature in a [`FeatureVector`].
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Lazily evaluated metrics of a single field.
///
/// Column heights and occupancy are computed once and shared by the metrics that need them.
#[derive(Debug)]
pub struct FieldAnalysis<'a> {
    field: &'a Field,
    column_heights: OnceCell<[u8; Field::WIDTH]>,
    column_occupied_cells: OnceCell<[u8; Field::WIDTH]>,
}

impl<'a> FieldAnalysis<'a> {
    #[must_use]
    pub fn from_field(field: &'a Field) -> Self {
        Self {
            field,
            column_heights: OnceCell::new(),
            column_occupied_cells: OnceCell::new(),
        }
    }

    #[must_use]
    pub fn field(&self) -> &Field {
        self.field
    }

    #[must_use]
    pub fn column_heights(&self) -> &[u8; Field::WIDTH] {
        self.column_heights.get_or_init(|| {
            let mut column_heights = [0; Field::WIDTH];
            for (x, h) in column_heights.iter_mut().enumerate() {
                let Some(min_y) = self.field.rows().position(|row| row.is_cell_occupied(x)) else {
                    continue;
                };
                *h = u8::try_from(Field::HEIGHT - min_y).unwrap_or(u8::MAX);
            }
            column_heights
        })
    }

    #[must_use]
    pub fn column_occupied_cells(&self) -> &[u8; Field::WIDTH] {
        self.column_occupied_cells.get_or_init(|| {
            let mut column_occupied_cells = [0; Field::WIDTH];
            for row in self.field.rows() {
                for (o, occupied) in iter::zip(&mut column_occupied_cells, row.iter_cells()) {
                    if occupied {
                        *o += 1;
                    }
                }
            }
            column_occupied_cells
        })
    }

    #[must_use]
    pub fn aggregate_height(&self) -> u16 {
        self.column_heights().iter().copied().map(u16::from).sum()
    }

    #[must_use]
    pub fn max_height(&self) -> u8 {
        self.column_heights().iter().copied().max().unwrap_or(0)
    }

    #[must_use]
    pub fn num_holes(&self) -> u16 {
        iter::zip(self.column_heights(), self.column_occupied_cells())
            .map(|(h, occ)| u16::from(h - occ))
            .sum()
    }

    #[must_use]
    pub fn bumpiness(&self) -> u16 {
        self.column_heights()
            .windows(2)
            .map(|w| u16::from(w[0].abs_diff(w[1])))
            .sum()
    }

    #[must_use]
    pub fn row_transitions(&self) -> u16 {
        let mut transitions = 0;
        for row in self.field.rows().filter(|row| !row.is_empty()) {
            let mut cells = row.iter_cells();
            let Some(mut prev_occupied) = cells.next() else {
                continue;
            };
            for occupied in cells {
                if occupied != prev_occupied {
                    transitions += 1;
                }
                prev_occupied = occupied;
            }
        }
        transitions
    }

    #[must_use]
    pub fn column_transitions(&self) -> u16 {
        let mut transitions = 0;
        for x in 0..Field::WIDTH {
            let mut prev_occupied = self.field.is_occupied(x, 0);
            for y in 1..Field::HEIGHT {
                let occupied = self.field.is_occupied(x, y);
                if occupied != prev_occupied {
                    transitions += 1;
                }
                prev_occupied = occupied;
            }
        }
        transitions
    }

    #[must_use]
    pub fn well_depth(&self) -> u16 {
        let h = self.column_heights();
        let start = &[u8::MAX, h[0], h[1]][..];
        let end = &[h[h.len() - 2], h[h.len() - 1], u8::MAX][..];
        iter::once(start)
            .chain(h.windows(3))
            .chain(iter::once(end))
            .map(|w| {
                if w[1] < w[0] && w[1] < w[2] {
                    u16::from(u8::min(w[0], w[2]) - w[1])
                } else {
                    0
                }
            })
            .sum()
    }

    #[must_use]
    pub fn hole_depth(&self) -> u16 {
        let mut depth_sum = 0;
        for x in 0..Field::WIDTH {
            let mut depth = 0;
            for y in 0..Field::HEIGHT {
                if self.field.is_occupied(x, y) {
                    depth += 1;
                } else if depth > 0 {
                    depth_sum += depth;
                }
            }
        }
        depth_sum
    }

    /// Returns the value of a single feature.
    #[must_use]
    pub fn feature(&self, feature: HeuristicFeature) -> f32 {
        match feature {
            HeuristicFeature::AggregateHeight => f32::from(self.aggregate_height()),
            HeuristicFeature::Holes => f32::from(self.num_holes()),
            HeuristicFeature::Bumpiness => f32::from(self.bumpiness()),
            HeuristicFeature::MaxHeight => f32::from(self.max_height()),
            HeuristicFeature::RowTransitions => f32::from(self.row_transitions()),
            HeuristicFeature::ColumnTransitions => f32::from(self.column_transitions()),
            HeuristicFeature::WellDepth => f32::from(self.well_depth()),
            HeuristicFeature::HoleDepth => f32::from(self.hole_depth()),
        }
    }

    /// Returns every feature in [`HeuristicFeature::ALL`] order.
    #[must_use]
    pub fn feature_vector(&self) -> FeatureVector {
        HeuristicFeature::ALL.map(|f| self.feature(f))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn features(field: &Field) -> FeatureVector {
        field.heuristics()
    }

    #[test]
    fn test_empty_field_has_zero_features() {
        assert_eq!(features(&Field::EMPTY), [0.0; HeuristicFeature::LEN]);
    }

    #[test]
    fn test_feature_order_matches_index() {
        for (i, feature) in HeuristicFeature::ALL.into_iter().enumerate() {
            assert_eq!(feature.index(), i);
            assert_eq!(HeuristicFeature::from_id(&feature.id()), Some(feature));
        }
    }

    #[test]
    fn test_heights_holes_and_bumpiness() {
        let field = Field::from_ascii(
            r"
            .#........
            ..........
            ##.......#
            ",
        );
        let analysis = FieldAnalysis::from_field(&field);
        assert_eq!(analysis.column_heights(), &[1, 3, 0, 0, 0, 0, 0, 0, 0, 1]);
        assert_eq!(analysis.aggregate_height(), 5);
        assert_eq!(analysis.max_height(), 3);
        assert_eq!(analysis.num_holes(), 1);
        assert_eq!(analysis.hole_depth(), 1);
        assert_eq!(analysis.bumpiness(), 2 + 3 + 1);
    }

    #[test]
    fn test_transitions() {
        let field = Field::from_ascii(
            r"
            #.#.......
            ",
        );
        let analysis = FieldAnalysis::from_field(&field);
        assert_eq!(analysis.row_transitions(), 3);
        assert_eq!(analysis.column_transitions(), 2);
    }

    #[test]
    fn test_well_depth() {
        let field = Field::from_ascii(
            r"
            ###.######
            ###.######
            ",
        );
        let analysis = FieldAnalysis::from_field(&field);
        assert_eq!(analysis.well_depth(), 2);
    }

    #[test]
    fn test_feature_vector_layout() {
        let field = Field::from_ascii(
            r"
            #.........
            ..........
            ",
        );
        let v = features(&field);
        assert_eq!(v[HeuristicFeature::AggregateHeight.index()], 2.0);
        assert_eq!(v[HeuristicFeature::Holes.index()], 1.0);
        assert_eq!(v[HeuristicFeature::MaxHeight.index()], 2.0);
        assert_eq!(v[HeuristicFeature::HoleDepth.index()], 1.0);
    }
}
