use std::path::PathBuf;

use serde::Serialize;
use stackbot_engine::{Field, GameStats, PieceBuffer, PieceSeed};
use stackbot_search::{MoveSearcher, RotationSet, SearchError, WeightVector};

use crate::{command::SearchArg, util::Output};

const PROGRESS_INTERVAL: usize = 100;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct AutoPlayArg {
    /// Seed for the piece sequence; random when omitted
    #[arg(long)]
    seed: Option<u64>,
    /// Stop after this many pieces
    #[arg(long, default_value_t = 500)]
    max_turns: usize,
    /// Field file (ASCII art) to start from; empty field when omitted
    #[arg(long)]
    field: Option<PathBuf>,
    #[clap(flatten)]
    search: SearchArg,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct AutoPlayReport {
    seed: PieceSeed,
    turns: usize,
    game_over: bool,
    stats: GameStats,
    field: Field,
}

/// State at the end of a headless game.
#[derive(Debug)]
struct GameOutcome {
    stats: GameStats,
    game_over: bool,
    field: Field,
}

/// Drops up to `max_turns` pieces on `field`, each at the searcher's best placement.
///
/// The game ends early when the current piece has no performable placement.
fn play(
    searcher: &MoveSearcher,
    mut field: Field,
    pieces: &mut PieceBuffer,
    max_turns: usize,
    weights: &WeightVector,
) -> anyhow::Result<GameOutcome> {
    let mut stats = GameStats::new();
    let mut game_over = false;

    for turn in 0..max_turns {
        let piece = pieces.pop_next();
        let next_piece = pieces.peek_next();
        let best = match searcher.best_move(&field, piece, next_piece, weights) {
            Ok(best) => best,
            Err(SearchError::EmptyEnumeration { .. }) => {
                game_over = true;
                break;
            }
            Err(e) => return Err(e.into()),
        };

        let placement = best.candidate().first().placement;
        let state = *RotationSet::for_piece(piece).state(placement.rotation_index);
        let cleared = field.drop_piece(&state, placement.column)?;
        stats.complete_piece_drop(cleared);
        log::trace!("turn {turn}: {piece} at {placement:?}, cleared {cleared}");

        if (turn + 1) % PROGRESS_INTERVAL == 0 {
            eprintln!(
                "  {} pieces, {} lines, score {}",
                stats.completed_pieces(),
                stats.total_cleared_lines(),
                stats.score()
            );
        }
    }

    Ok(GameOutcome {
        stats,
        game_over,
        field,
    })
}

pub(crate) fn run(arg: &AutoPlayArg) -> anyhow::Result<()> {
    let AutoPlayArg {
        seed,
        max_turns,
        field,
        search,
        output,
    } = arg;

    let seed = seed.map_or_else(rand::random, PieceSeed::new);
    let field = super::load_field(field.as_ref())?;
    let (config, weights) = search.resolve()?;
    let searcher = MoveSearcher::from_config(&config)?;
    let mut pieces = PieceBuffer::with_seed(seed);

    eprintln!("Auto-playing up to {max_turns} pieces (seed {seed})...");
    let GameOutcome {
        stats,
        game_over,
        field,
    } = play(&searcher, field, &mut pieces, *max_turns, &weights)?;

    eprintln!("{field}");
    eprintln!(
        "{}: {} pieces, {} lines, score {}",
        if game_over { "Game over" } else { "Turn limit reached" },
        stats.completed_pieces(),
        stats.total_cleared_lines(),
        stats.score()
    );

    let report = AutoPlayReport {
        seed,
        turns: stats.completed_pieces(),
        game_over,
        stats,
        field,
    };
    Output::save_json(&report, output.clone())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plays_until_turn_limit() {
        let searcher = MoveSearcher::sequential();
        let mut pieces = PieceBuffer::with_seed(PieceSeed::new(11));
        let outcome = play(
            &searcher,
            Field::EMPTY,
            &mut pieces,
            20,
            &WeightVector::default(),
        )
        .unwrap();
        assert!(!outcome.game_over);
        assert_eq!(outcome.stats.completed_pieces(), 20);
        assert_ne!(outcome.field, Field::EMPTY);
    }

    #[test]
    fn test_blocked_field_ends_game() {
        let mut art = String::from("##########\n");
        art.push_str(&"..........\n".repeat(Field::HEIGHT - 1));
        let blocked = Field::from_ascii(&art);

        let searcher = MoveSearcher::sequential();
        let mut pieces = PieceBuffer::with_seed(PieceSeed::new(5));
        let outcome = play(
            &searcher,
            blocked.clone(),
            &mut pieces,
            10,
            &WeightVector::default(),
        )
        .unwrap();
        assert!(outcome.game_over);
        assert_eq!(outcome.stats.completed_pieces(), 0);
        assert_eq!(outcome.field, blocked);
    }

    #[test]
    fn test_search_errors_propagate() {
        let searcher = MoveSearcher::sequential();
        let mut pieces = PieceBuffer::with_seed(PieceSeed::new(5));
        let short = WeightVector::new(vec![1.0; 2]);
        let err = play(&searcher, Field::EMPTY, &mut pieces, 10, &short).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SearchError>(),
            Some(SearchError::ConfigurationMismatch { .. })
        ));
    }
}
