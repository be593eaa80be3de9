use serde::Serialize;

/// Score values for line clears.
///
/// Index corresponds to number of lines cleared simultaneously:
/// - 0 lines: 0 points
/// - 1 line: 100 points
/// - 2 lines: 300 points
/// - 3 lines: 500 points
/// - 4 lines: 800 points
const SCORE_TABLE: [usize; 5] = [0, 100, 300, 500, 800];

/// Running totals for a sequence of placements.
///
/// # Example
///
/// ```
/// use stackbot_engine::GameStats;
///
/// let mut stats = GameStats::new();
/// stats.complete_piece_drop(4);
/// stats.complete_piece_drop(0);
///
/// assert_eq!(stats.score(), 800);
/// assert_eq!(stats.completed_pieces(), 2);
/// assert_eq!(stats.line_cleared_counter()[4], 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GameStats {
    score: usize,
    completed_pieces: usize,
    total_cleared_lines: usize,
    line_cleared_counter: [usize; 5],
}

impl GameStats {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: 0,
            completed_pieces: 0,
            total_cleared_lines: 0,
            line_cleared_counter: [0; 5],
        }
    }

    #[must_use]
    pub const fn score(&self) -> usize {
        self.score
    }

    #[must_use]
    pub const fn completed_pieces(&self) -> usize {
        self.completed_pieces
    }

    #[must_use]
    pub const fn total_cleared_lines(&self) -> usize {
        self.total_cleared_lines
    }

    /// Histogram of placements by number of rows they cleared (index 0 to 4).
    #[must_use]
    pub const fn line_cleared_counter(&self) -> &[usize; 5] {
        &self.line_cleared_counter
    }

    /// Records one locked piece that cleared `cleared_lines` rows.
    pub fn complete_piece_drop(&mut self, cleared_lines: usize) {
        self.completed_pieces += 1;
        self.total_cleared_lines += cleared_lines;
        let bucket = cleared_lines.min(SCORE_TABLE.len() - 1);
        self.line_cleared_counter[bucket] += 1;
        self.score += SCORE_TABLE[bucket];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulates_clears() {
        let mut stats = GameStats::new();
        for cleared in [1, 2, 3, 0] {
            stats.complete_piece_drop(cleared);
        }
        assert_eq!(stats.completed_pieces(), 4);
        assert_eq!(stats.total_cleared_lines(), 6);
        assert_eq!(stats.score(), 100 + 300 + 500);
        assert_eq!(stats.line_cleared_counter(), &[1, 1, 1, 1, 0]);
    }
}
