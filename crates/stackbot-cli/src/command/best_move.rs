use std::path::PathBuf;

use serde::Serialize;
use stackbot_engine::{Field, PieceKind};
use stackbot_search::{MoveSearcher, PlyRecord, ScoredCandidate};

use crate::{command::SearchArg, util::Output};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct BestMoveArg {
    /// Piece to place (I, O, S, Z, J, L, T)
    piece: PieceKind,
    /// Next piece; searches a single ply when omitted
    next_piece: Option<PieceKind>,
    /// Field file (ASCII art, `#` filled, `.` empty); empty field when omitted
    #[arg(long)]
    field: Option<PathBuf>,
    #[clap(flatten)]
    search: SearchArg,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct MoveReport {
    piece: PieceKind,
    next_piece: Option<PieceKind>,
    /// `null` when only an impossible second ply remained
    score: Option<f32>,
    first: PlyRecord,
    second: Option<PlyRecord>,
    cleared_lines: usize,
    field: Option<Field>,
}

impl MoveReport {
    fn new(piece: PieceKind, next_piece: Option<PieceKind>, best: &ScoredCandidate) -> Self {
        let candidate = best.candidate();
        Self {
            piece,
            next_piece,
            score: best.score().is_finite().then_some(best.score()),
            first: *candidate.first(),
            second: candidate.second().copied(),
            cleared_lines: candidate.total_cleared_lines(),
            field: candidate.field().cloned(),
        }
    }
}

pub(crate) fn run(arg: &BestMoveArg) -> anyhow::Result<()> {
    let BestMoveArg {
        piece,
        next_piece,
        field,
        search,
        output,
    } = arg;

    let field = super::load_field(field.as_ref())?;
    let (config, weights) = search.resolve()?;
    let searcher = MoveSearcher::from_config(&config)?;

    let best = match next_piece {
        Some(next_piece) => searcher.best_move(&field, *piece, *next_piece, &weights)?,
        None => searcher.best_single_move(&field, *piece, &weights)?,
    };

    let candidate = best.candidate();
    let first = candidate.first().placement;
    eprintln!(
        "Best placement for {piece}: rotation {}, column {}",
        first.rotation_index, first.column
    );
    if let Some(second) = candidate.second() {
        eprintln!(
            "  followed by {}: rotation {}, column {}",
            next_piece.map_or_else(String::new, |p| p.to_string()),
            second.placement.rotation_index,
            second.placement.column
        );
    }
    if let Some(invalid) = candidate.invalid_placement() {
        eprintln!("  look-ahead is impossible: {invalid}");
    }
    if let Some(result) = candidate.field() {
        eprintln!("{result}");
    }

    Output::save_json(&MoveReport::new(*piece, *next_piece, &best), output.clone())?;
    Ok(())
}
