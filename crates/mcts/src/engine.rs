//! Move-playing driver around a [`SearchTree`].
//!
//! The engine follows a game one move at a time: it feeds the opponent's
//! reply into the tree (keeping the matching subtree), searches within a
//! [`Limit`] and commits to a move.

use baymcts_core::{GameState, MctsError, Result};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use crate::config::MctsConfig;
use crate::limit::Limit;
use crate::policy::Policy;
use crate::search::SearchTree;
use crate::value::{BeliefModel, ScoreModel, ValueModel};

/// Stream of the engine's random source, kept apart from the tree's.
const DECISION_STREAM: u64 = 1;

/// Plays moves using MCTS.
pub struct MctsEngine<S: GameState, P: Policy<S>, V: ValueModel> {
    tree: SearchTree<S, P, V>,
    rng: ChaCha8Rng,
    node_counts: Vec<usize>,
}

impl<S: GameState, P: Policy<S>> MctsEngine<S, P, BeliefModel> {
    /// Engine that ranks moves by a draw from each child's belief.
    pub fn bayesian(state: S, policy: P, config: MctsConfig) -> Self {
        Self::new(SearchTree::bayesian(state, policy, config))
    }
}

impl<S: GameState, P: Policy<S>> MctsEngine<S, P, ScoreModel> {
    /// Engine that ranks moves by cumulative rollout score.
    pub fn classical(state: S, policy: P, config: MctsConfig) -> Self {
        Self::new(SearchTree::classical(state, policy, config))
    }
}

impl<S, P, V> MctsEngine<S, P, V>
where
    S: GameState,
    P: Policy<S>,
    V: ValueModel,
{
    /// Wrap an existing tree. The engine's random source is seeded from the
    /// tree's config.
    pub fn new(tree: SearchTree<S, P, V>) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(tree.config().seed);
        rng.set_stream(DECISION_STREAM);
        Self {
            tree,
            rng,
            node_counts: Vec::new(),
        }
    }

    /// Search the current position and play a move.
    ///
    /// `last_move` is the opponent's reply since this engine last moved (or
    /// `None` when the engine opens the game).
    ///
    /// # Errors
    /// Returns `MctsError::IllegalMove` if `last_move` is not legal, and
    /// `MctsError::NoLegalMoves` if the game is already over.
    pub fn play(&mut self, last_move: Option<S::Move>, limit: &Limit) -> Result<S::Move> {
        if let Some(mv) = last_move {
            self.tree.apply_move(mv)?;
        }
        if self.tree.state().is_terminal() {
            return Err(MctsError::NoLegalMoves);
        }

        let tree = &mut self.tree;
        let searched = limit.run(|| tree.sample(1));
        self.node_counts.push(searched);

        let mv = self.choose_move()?;
        debug!(
            ?mv,
            side = %self.tree.side_to_move(),
            searched,
            nodes = self.tree.node_count(),
            "engine move"
        );
        self.tree.apply_move(mv)?;
        Ok(mv)
    }

    /// Pick the root child with the extreme decision value for the side to
    /// move.
    fn choose_move(&mut self) -> Result<S::Move> {
        let maximizing = self.tree.side_to_move().is_maximizing();
        let model = self.tree.model();

        let mut best: Option<(S::Move, f64)> = None;
        for candidate in self.tree.get_move_values() {
            let value = model.decision_value(&candidate.value, &mut self.rng);
            let better = match best {
                None => true,
                Some((_, incumbent)) if maximizing => value > incumbent,
                Some((_, incumbent)) => value < incumbent,
            };
            if better {
                best = Some((candidate.mv, value));
            }
        }

        best.map(|(mv, _)| mv).ok_or(MctsError::NoLegalMoves)
    }

    /// Number of search steps run for each move played so far.
    pub fn node_counts(&self) -> &[usize] {
        &self.node_counts
    }

    pub fn tree(&self) -> &SearchTree<S, P, V> {
        &self.tree
    }
}
