//! MCTS configuration parameters.
//!
//! These parameters control how the tree grows and how leaves are evaluated.
//! The value representation (scalar score or Gaussian belief) is chosen by
//! the tree's `ValueModel` type; everything else lives here.

use serde::{Deserialize, Serialize};

/// How a selected leaf grows new children.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Expansion {
    /// Materialize every legal move at once, then select among the new
    /// children. A node is only expanded after its first rollout.
    AllMoves,

    /// Materialize one random untried move and return that child.
    SingleRandom,
}

/// MCTS configuration parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MctsConfig {
    /// Expansion policy for leaves.
    pub expansion: Expansion,

    /// Maximum number of moves played by the policy in one rollout.
    pub rollout_depth: usize,

    /// Seed for the tree's random source (tie-breaking, expansion order,
    /// fusion order).
    pub seed: u64,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self::bayesian()
    }
}

impl MctsConfig {
    /// Settings used by the Bayesian search: expand all moves at once.
    pub fn bayesian() -> Self {
        Self {
            expansion: Expansion::AllMoves,
            rollout_depth: 4,
            seed: 0,
        }
    }

    /// Settings used by the classical search: grow one random child at a time.
    pub fn classical() -> Self {
        Self {
            expansion: Expansion::SingleRandom,
            rollout_depth: 4,
            seed: 0,
        }
    }

    /// A fast config for testing.
    pub fn for_testing() -> Self {
        Self {
            expansion: Expansion::AllMoves,
            rollout_depth: 2,
            seed: 42,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_expansion(mut self, expansion: Expansion) -> Self {
        self.expansion = expansion;
        self
    }

    pub fn with_rollout_depth(mut self, rollout_depth: usize) -> Self {
        self.rollout_depth = rollout_depth;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MctsConfig::default();
        assert_eq!(config.expansion, Expansion::AllMoves);
        assert_eq!(config.rollout_depth, 4);
        assert_eq!(config.seed, 0);
    }

    #[test]
    fn test_classical() {
        let config = MctsConfig::classical();
        assert_eq!(config.expansion, Expansion::SingleRandom);
        assert_eq!(config.rollout_depth, 4);
    }

    #[test]
    fn test_builders() {
        let config = MctsConfig::classical()
            .with_seed(7)
            .with_expansion(Expansion::AllMoves)
            .with_rollout_depth(12);
        assert_eq!(config.seed, 7);
        assert_eq!(config.expansion, Expansion::AllMoves);
        assert_eq!(config.rollout_depth, 12);
    }
}
