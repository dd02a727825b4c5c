//! Classical and Bayesian Monte Carlo Tree Search.
//!
//! This crate searches any game implementing `baymcts_core::GameState`,
//! using a pluggable rollout [`Policy`] to play out and score leaves.
//!
//! # Features
//!
//! - **Two value models**: cumulative scores with UCB1 selection
//!   ([`ScoreModel`]), or Gaussian beliefs fused with the max/min of the
//!   children ([`BeliefModel`])
//! - **Tree reuse**: [`SearchTree::apply_move`] keeps the subtree below the
//!   played move
//! - **Memoized Gaussian math**: [`GaussianOps`] caches normal CDF/PDF values
//! - **Search budgets**: [`Limit`] by node count or wall-clock time
//! - **Deterministic**: every random choice flows from seeded `ChaCha8Rng`s
//!
//! # Example
//!
//! ```
//! use baymcts::{games::{tictactoe, TicTacToe}, Limit, MctsConfig, MctsEngine, RandomPolicy};
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//!
//! let policy = RandomPolicy::new(ChaCha8Rng::seed_from_u64(42), tictactoe::evaluate);
//! let mut engine = MctsEngine::bayesian(TicTacToe::new(), policy, MctsConfig::default());
//!
//! let limit = Limit::nodes(100).unwrap();
//! let mv = engine.play(None, &limit).unwrap();
//! println!("Best move: {}", mv);
//!
//! for child in engine.tree().get_move_values() {
//!     println!("{}: {} visits, {}", child.mv, child.visits, child.value);
//! }
//! ```

pub mod config;
pub mod engine;
pub mod games;
pub mod gaussian;
pub mod limit;
pub mod node;
pub mod policy;
pub mod search;
mod tree;
pub mod value;

pub use config::{Expansion, MctsConfig};
pub use engine::MctsEngine;
pub use gaussian::GaussianOps;
pub use limit::Limit;
pub use node::{Node, NodeId};
pub use policy::{FirstMovePolicy, Policy, RandomPolicy, StaticEval};
pub use search::{BayesianTree, ClassicalTree, MoveValue, SearchTree};
pub use value::{BeliefModel, ScoreModel, ValueModel};
