use std::{
    path::PathBuf,
    time::{Duration, Instant},
};

use anyhow::ensure;
use serde::Serialize;
use stackbot_engine::{Field, PieceKind};
use stackbot_search::{
    MoveSearcher, RotationSet, ScoredCandidate, WeightVector, placement::placement_count,
};

use crate::{command::SearchArg, util::Output};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct BenchArg {
    /// Piece to place
    #[arg(long, default_value_t = PieceKind::T)]
    piece: PieceKind,
    /// Next piece
    #[arg(long, default_value_t = PieceKind::I)]
    next_piece: PieceKind,
    /// Field file (ASCII art); empty field when omitted
    #[arg(long)]
    field: Option<PathBuf>,
    /// Number of timed searches per executor
    #[arg(long, default_value_t = 5)]
    iterations: usize,
    #[clap(flatten)]
    search: SearchArg,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct BenchReport {
    piece: PieceKind,
    next_piece: PieceKind,
    candidates: usize,
    threads: usize,
    iterations: usize,
    sequential_ms: f64,
    pooled_ms: f64,
    speedup: f64,
}

fn time_search(
    searcher: &MoveSearcher,
    field: &Field,
    piece: PieceKind,
    next_piece: PieceKind,
    weights: &WeightVector,
    iterations: usize,
) -> anyhow::Result<(ScoredCandidate, Duration)> {
    let start = Instant::now();
    let mut best = searcher.best_move(field, piece, next_piece, weights)?;
    for _ in 1..iterations {
        best = searcher.best_move(field, piece, next_piece, weights)?;
    }
    Ok((best, start.elapsed()))
}

#[expect(clippy::cast_precision_loss)]
fn millis_per_iteration(elapsed: Duration, iterations: usize) -> f64 {
    elapsed.as_secs_f64() * 1000.0 / iterations as f64
}

pub(crate) fn run(arg: &BenchArg) -> anyhow::Result<()> {
    let BenchArg {
        piece,
        next_piece,
        field,
        iterations,
        search,
        output,
    } = arg;
    let iterations = (*iterations).max(1);

    let field = super::load_field(field.as_ref())?;
    let (config, weights) = search.resolve()?;
    let pooled = MoveSearcher::from_config(&config)?;
    let sequential = MoveSearcher::sequential();

    let candidates = placement_count(&RotationSet::for_piece(*piece), Field::WIDTH)
        * placement_count(&RotationSet::for_piece(*next_piece), Field::WIDTH);
    eprintln!(
        "Searching {candidates} candidates ({piece} then {next_piece}), {iterations} iterations each"
    );

    eprintln!("Running sequential search...");
    let (sequential_best, sequential_time) = time_search(
        &sequential,
        &field,
        *piece,
        *next_piece,
        &weights,
        iterations,
    )?;
    eprintln!("Sequential: {sequential_time:.2?}");

    eprintln!(
        "Running pooled search ({} threads)...",
        pooled.executor().num_threads()
    );
    let (pooled_best, pooled_time) =
        time_search(&pooled, &field, *piece, *next_piece, &weights, iterations)?;
    eprintln!("Pooled: {pooled_time:.2?}");

    ensure!(
        sequential_best == pooled_best,
        "sequential and pooled searches disagree on the best move"
    );

    let sequential_ms = millis_per_iteration(sequential_time, iterations);
    let pooled_ms = millis_per_iteration(pooled_time, iterations);
    let report = BenchReport {
        piece: *piece,
        next_piece: *next_piece,
        candidates,
        threads: pooled.executor().num_threads(),
        iterations,
        sequential_ms,
        pooled_ms,
        speedup: sequential_ms / pooled_ms,
    };
    eprintln!("Speedup: {:.2}x", report.speedup);
    Output::save_json(&report, output.clone())?;
    Ok(())
}
