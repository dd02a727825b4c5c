//! Match runner for MCTS engine variants.
//!
//! Plays tic-tac-toe games between two engine kinds in parallel and writes
//! the tally plus every game record as JSON.

mod player;

use anyhow::{Context, Result};
use baymcts::games::{Cell, TicTacToe};
use baymcts::Limit;
use baymcts_core::{GameState, Side};
use clap::{Parser, Subcommand};
use player::{EngineKind, EvalKind, Player};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

/// Bayesian vs classical MCTS arena.
#[derive(Parser)]
#[command(name = "baymcts-arena")]
#[command(about = "Play matches between MCTS engine variants")]
struct Cli {
    /// Log level used when RUST_LOG is not set.
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a match; the engines swap colours every game.
    Match {
        /// Number of games to play.
        #[arg(short, long, default_value = "10")]
        games: usize,

        /// Engine playing White in even-numbered games (bayesian, classical, random).
        #[arg(long, default_value = "bayesian")]
        white: EngineKind,

        /// Engine playing Black in even-numbered games.
        #[arg(long, default_value = "classical")]
        black: EngineKind,

        /// Search steps per move.
        #[arg(short, long, default_value = "200", conflicts_with = "seconds")]
        nodes: usize,

        /// Seconds per move instead of a node budget.
        #[arg(long)]
        seconds: Option<f64>,

        /// Maximum moves per rollout.
        #[arg(long, default_value = "4")]
        rollout_depth: usize,

        /// Static evaluation applied where rollouts stop.
        #[arg(long, value_enum, default_value = "heuristic")]
        eval: EvalKind,

        /// Random seed for reproducibility.
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Write the JSON report here.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Everything needed to replay a match.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct MatchSettings {
    first: EngineKind,
    second: EngineKind,
    limit: Limit,
    rollout_depth: usize,
    eval: EvalKind,
    seed: u64,
}

/// One finished game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct GameRecord {
    index: usize,
    seed: u64,
    white: EngineKind,
    black: EngineKind,
    /// Cells played, in order.
    moves: Vec<u8>,
    winner: Option<Side>,
    /// Search steps per move for each side.
    white_nodes: Vec<usize>,
    black_nodes: Vec<usize>,
}

/// Match tally from the first engine's point of view.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct MatchReport {
    settings: MatchSettings,
    first_wins: usize,
    second_wins: usize,
    draws: usize,
    games: Vec<GameRecord>,
}

impl MatchReport {
    fn from_games(settings: MatchSettings, games: Vec<GameRecord>) -> Self {
        let mut first_wins = 0;
        let mut second_wins = 0;
        let mut draws = 0;

        for game in &games {
            match game.winner {
                None => draws += 1,
                Some(side) => {
                    // The first engine plays White in even games
                    let first_side = if game.index % 2 == 0 { Side::White } else { Side::Black };
                    if side == first_side {
                        first_wins += 1;
                    } else {
                        second_wins += 1;
                    }
                }
            }
        }

        Self {
            settings,
            first_wins,
            second_wins,
            draws,
            games,
        }
    }

    fn first_score(&self) -> f64 {
        let total = self.games.len().max(1) as f64;
        (self.first_wins as f64 + 0.5 * self.draws as f64) / total
    }
}

fn init_tracing(level: &str) -> Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialise tracing: {}", e))?;

    Ok(())
}

/// Play one game; colours swap on odd indices.
fn play_game(settings: &MatchSettings, index: usize) -> Result<GameRecord> {
    let seed = settings.seed.wrapping_add(index as u64 * 1000);
    let (white_kind, black_kind) = if index % 2 == 0 {
        (settings.first, settings.second)
    } else {
        (settings.second, settings.first)
    };

    let mut white = Player::new(white_kind, settings.eval, settings.rollout_depth, seed);
    let mut black = Player::new(black_kind, settings.eval, settings.rollout_depth, seed.wrapping_add(1));

    let mut board = TicTacToe::new();
    let mut moves = Vec::new();
    let mut last: Option<Cell> = None;

    while !board.is_terminal() {
        let player = match board.side_to_move() {
            Side::White => &mut white,
            Side::Black => &mut black,
        };
        let mv = player
            .play(&board, last, &settings.limit)
            .with_context(|| format!("game {} move {} failed", index, moves.len() + 1))?;

        board.push(mv);
        moves.push(mv.0);
        last = Some(mv);
    }

    let winner = board.winner();
    debug!(index, %white_kind, %black_kind, ?winner, moves = moves.len(), "game finished");

    Ok(GameRecord {
        index,
        seed,
        white: white_kind,
        black: black_kind,
        moves,
        winner,
        white_nodes: white.node_counts(),
        black_nodes: black.node_counts(),
    })
}

/// Play every game of a match in parallel.
fn run_match(settings: &MatchSettings, games: usize) -> Result<MatchReport> {
    let records = (0..games)
        .into_par_iter()
        .map(|index| play_game(settings, index))
        .collect::<Result<Vec<_>>>()?;

    Ok(MatchReport::from_games(settings.clone(), records))
}

fn write_report(report: &MatchReport, path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Failed to create file: {:?}", path))?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, report).with_context(|| format!("Failed to write report to {:?}", path))?;
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn cmd_match(
    games: usize,
    white: EngineKind,
    black: EngineKind,
    nodes: usize,
    seconds: Option<f64>,
    rollout_depth: usize,
    eval: EvalKind,
    seed: u64,
    output: Option<PathBuf>,
) -> Result<()> {
    let limit = match seconds {
        Some(seconds) => Limit::seconds(seconds)?,
        None => Limit::nodes(nodes)?,
    };
    let settings = MatchSettings {
        first: white,
        second: black,
        limit,
        rollout_depth,
        eval,
        seed,
    };

    info!(games, %white, %black, %limit, rollout_depth, seed, "starting match");
    let start = Instant::now();

    let report = run_match(&settings, games)?;

    info!(
        elapsed_secs = start.elapsed().as_secs_f64(),
        first_wins = report.first_wins,
        second_wins = report.second_wins,
        draws = report.draws,
        "match finished"
    );
    println!(
        "{} {} - {} {} ({} draws), score {:.1}%",
        white,
        report.first_wins,
        report.second_wins,
        black,
        report.draws,
        report.first_score() * 100.0
    );

    if let Some(path) = output {
        write_report(&report, &path)?;
        info!(path = ?path, "report written");
    }

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level)?;

    match cli.command {
        Commands::Match {
            games,
            white,
            black,
            nodes,
            seconds,
            rollout_depth,
            eval,
            seed,
            output,
        } => cmd_match(games, white, black, nodes, seconds, rollout_depth, eval, seed, output),
    }
}
