//! Match participants: the two MCTS variants and a random mover.

use baymcts::games::{tictactoe, Cell, TicTacToe};
use baymcts::{BeliefModel, Limit, MctsConfig, MctsEngine, RandomPolicy, ScoreModel, StaticEval};
use baymcts_core::{GameState, MctsError};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

type Rollouts = RandomPolicy<TicTacToe, ChaCha8Rng>;

/// Which kind of player takes a seat.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineKind {
    Bayesian,
    Classical,
    Random,
}

impl FromStr for EngineKind {
    type Err = MctsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bayesian" | "bayes" => Ok(EngineKind::Bayesian),
            "classical" | "classic" => Ok(EngineKind::Classical),
            "random" => Ok(EngineKind::Random),
            other => Err(MctsError::PolicyUnavailable(format!(
                "unknown engine kind '{}' (expected bayesian, classical or random)",
                other
            ))),
        }
    }
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EngineKind::Bayesian => "bayesian",
            EngineKind::Classical => "classical",
            EngineKind::Random => "random",
        };
        f.write_str(name)
    }
}

/// Static evaluation used at the end of rollouts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum EvalKind {
    /// Open-line heuristic plus mate scores.
    Heuristic,
    /// Mate scores only.
    Outcome,
}

impl EvalKind {
    fn function(self) -> StaticEval<TicTacToe> {
        match self {
            EvalKind::Heuristic => tictactoe::evaluate,
            EvalKind::Outcome => tictactoe::evaluate_outcome,
        }
    }
}

/// A seated player with its own search state and random sources.
pub enum Player {
    Bayesian(MctsEngine<TicTacToe, Rollouts, BeliefModel>),
    Classical(MctsEngine<TicTacToe, Rollouts, ScoreModel>),
    Random(ChaCha8Rng),
}

impl Player {
    /// Seat a player. The search config supplies the tree seed; rollouts
    /// get a stream of their own.
    pub fn new(kind: EngineKind, eval: EvalKind, rollout_depth: usize, seed: u64) -> Self {
        let mut rollout_rng = ChaCha8Rng::seed_from_u64(seed);
        rollout_rng.set_stream(2);
        let policy = RandomPolicy::new(rollout_rng, eval.function());

        match kind {
            EngineKind::Bayesian => {
                let config = MctsConfig::bayesian()
                    .with_seed(seed)
                    .with_rollout_depth(rollout_depth);
                Player::Bayesian(MctsEngine::bayesian(TicTacToe::new(), policy, config))
            }
            EngineKind::Classical => {
                let config = MctsConfig::classical()
                    .with_seed(seed)
                    .with_rollout_depth(rollout_depth);
                Player::Classical(MctsEngine::classical(TicTacToe::new(), policy, config))
            }
            EngineKind::Random => Player::Random(ChaCha8Rng::seed_from_u64(seed)),
        }
    }

    /// Choose a move on `board`, given the opponent's last move.
    pub fn play(&mut self, board: &TicTacToe, last_move: Option<Cell>, limit: &Limit) -> baymcts_core::Result<Cell> {
        match self {
            Player::Bayesian(engine) => engine.play(last_move, limit),
            Player::Classical(engine) => engine.play(last_move, limit),
            Player::Random(rng) => board
                .legal_moves()
                .choose(rng)
                .copied()
                .ok_or(MctsError::NoLegalMoves),
        }
    }

    /// Search steps spent per move (empty for the random player).
    pub fn node_counts(&self) -> Vec<usize> {
        match self {
            Player::Bayesian(engine) => engine.node_counts().to_vec(),
            Player::Classical(engine) => engine.node_counts().to_vec(),
            Player::Random(_) => Vec::new(),
        }
    }
}
