//! Monte Carlo Tree Search over an arena of nodes.
//!
//! Every sample runs the four phases from the root:
//! 1. Selection: descend by the tree policy to a node without children
//! 2. Expansion: grow children according to the configured policy
//! 3. Rollout: play the rollout policy for a few moves and score the result
//! 4. Backpropagation: update values from the leaf back to the root
//!
//! White picks the child with the highest selection score, Black the lowest.
//! The tree survives between real moves: [`SearchTree::apply_move`] promotes
//! the matching child instead of starting over.

use baymcts_core::{GameState, MctsError, Result, Side};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, trace};

use crate::config::{Expansion, MctsConfig};
use crate::node::{Node, NodeId};
use crate::policy::Policy;
use crate::tree::Tree;
use crate::value::{BackupInput, BeliefModel, ScoreModel, ValueModel};

/// Visit count given to a root, fresh or promoted. A promoted child drops
/// its accumulated visits for this baseline; its children keep theirs.
pub const ROOT_VISITS: u32 = 1;

/// One root child as reported after a search.
#[derive(Clone, Debug, PartialEq)]
pub struct MoveValue<M, V> {
    /// Move leading to the child.
    pub mv: M,

    /// Times the child was visited.
    pub visits: u32,

    /// The child's value (cumulative score or belief).
    pub value: V,
}

/// Monte Carlo Tree Search with tree reuse.
///
/// Generic over:
/// - `S`: The game state being searched
/// - `P`: The rollout policy
/// - `V`: The value model (classical scores or Gaussian beliefs)
pub struct SearchTree<S: GameState, P: Policy<S>, V: ValueModel> {
    config: MctsConfig,
    policy: P,
    model: V,
    rng: ChaCha8Rng,
    state: S,
    tree: Tree<S, V::Value>,
    plies: u32,
}

/// Classical MCTS tree.
pub type ClassicalTree<S, P> = SearchTree<S, P, ScoreModel>;

/// Bayesian MCTS tree.
pub type BayesianTree<S, P> = SearchTree<S, P, BeliefModel>;

impl<S: GameState, P: Policy<S>> SearchTree<S, P, ScoreModel> {
    /// Create a classical search tree rooted at `state`.
    pub fn classical(state: S, policy: P, config: MctsConfig) -> Self {
        Self::new(state, policy, ScoreModel::new(), config)
    }
}

impl<S: GameState, P: Policy<S>> SearchTree<S, P, BeliefModel> {
    /// Create a Bayesian search tree rooted at `state`.
    pub fn bayesian(state: S, policy: P, config: MctsConfig) -> Self {
        Self::new(state, policy, BeliefModel::new(), config)
    }
}

impl<S, P, V> SearchTree<S, P, V>
where
    S: GameState,
    P: Policy<S>,
    V: ValueModel,
{
    /// Create a new search tree with a single root node for `state`.
    pub fn new(state: S, policy: P, model: V, config: MctsConfig) -> Self {
        let root = Node::root(state.clone(), model.root_value(), ROOT_VISITS);
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            config,
            policy,
            model,
            state,
            tree: Tree::new(root),
            plies: 0,
        }
    }

    /// Run up to `n` samples, returning how many were run.
    ///
    /// Stops early once the tracked position is terminal: there is nothing
    /// left to search.
    pub fn sample(&mut self, n: usize) -> usize {
        let mut runs = 0;
        for _ in 0..n {
            if self.state.is_terminal() {
                break;
            }

            let selected = self.select(NodeId::ROOT);
            let leaf = self.expand(selected);
            let score = self.rollout(leaf);
            self.backpropagate(leaf, Some(score));
            runs += 1;
        }
        trace!(runs, nodes = self.tree.len(), "sampled");
        runs
    }

    /// Advance the tracked position by `mv`, reusing the matching subtree.
    ///
    /// Returns `Ok(true)` if a root child carried `mv` and became the new
    /// root, `Ok(false)` if the tree was rebuilt from scratch.
    ///
    /// # Errors
    /// Returns `MctsError::IllegalMove` if `mv` is not legal in the tracked
    /// position; the tree is left unchanged.
    pub fn apply_move(&mut self, mv: S::Move) -> Result<bool> {
        if !self.state.legal_moves().contains(&mv) {
            return Err(MctsError::IllegalMove(format!("{:?}", mv)));
        }
        self.state.push(mv);
        self.plies += 1;

        let matching = self
            .tree
            .root()
            .children
            .iter()
            .copied()
            .find(|&child| self.tree.get(child).mv == Some(mv));

        match matching {
            Some(child) => {
                let before = self.tree.len();
                self.tree.promote(child);
                self.tree.root_mut().visits = ROOT_VISITS;
                debug!(?mv, kept = self.tree.len(), dropped = before - self.tree.len(), "reused subtree");
                Ok(true)
            }
            None => {
                let root = Node::root(self.state.clone(), self.model.root_value(), ROOT_VISITS);
                self.tree.reset(root);
                debug!(?mv, "no subtree for move, starting fresh tree");
                Ok(false)
            }
        }
    }

    /// Moves and values of the root's children, in expansion order.
    pub fn get_move_values(&self) -> Vec<MoveValue<S::Move, V::Value>> {
        self.tree
            .root()
            .children
            .iter()
            .map(|&id| {
                let child = self.tree.get(id);
                MoveValue {
                    mv: child.mv.expect("BUG: non-root node without a move"),
                    visits: child.visits,
                    value: child.value.clone(),
                }
            })
            .collect()
    }

    /// The tracked position (the root's state).
    pub fn state(&self) -> &S {
        &self.state
    }

    /// Side to move at the root.
    pub fn side_to_move(&self) -> Side {
        self.tree.root().side
    }

    /// Visits recorded on the root.
    pub fn root_visits(&self) -> u32 {
        self.tree.root().visits
    }

    /// Number of moves applied since the tree was created.
    pub fn depth_of_root(&self) -> u32 {
        self.plies
    }

    /// The root node.
    pub fn root(&self) -> &Node<S, V::Value> {
        self.tree.root()
    }

    /// Get a node by ID.
    ///
    /// # Panics
    /// Panics if the NodeId does not belong to the current tree.
    pub fn node(&self, id: NodeId) -> &Node<S, V::Value> {
        self.tree.get(id)
    }

    /// Iterate over every live node.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node<S, V::Value>)> {
        self.tree.iter()
    }

    /// Number of live nodes.
    pub fn node_count(&self) -> usize {
        self.tree.len()
    }

    /// The search configuration.
    pub fn config(&self) -> &MctsConfig {
        &self.config
    }

    /// The value model, including any state it carries.
    pub fn model(&self) -> &V {
        &self.model
    }

    /// Descend from `from` to the node the next expansion should grow.
    ///
    /// Stops at terminal nodes, at nodes without children and at nodes that
    /// still have untried moves.
    pub(crate) fn select(&mut self, from: NodeId) -> NodeId {
        let mut current = from;
        loop {
            let node = self.tree.get(current);
            if node.terminal || node.is_leaf() || !node.is_fully_expanded() {
                return current;
            }
            current = self.select_child(current);
        }
    }

    /// Pick the child of `node_id` the tree policy prefers.
    ///
    /// Unvisited children win outright. Otherwise the incumbent starts as a
    /// random child and is only replaced by a strictly better score.
    fn select_child(&mut self, node_id: NodeId) -> NodeId {
        let node = self.tree.get(node_id);

        if let Some(&unvisited) = node
            .children
            .iter()
            .find(|&&child| self.tree.get(child).visits == 0)
        {
            return unvisited;
        }

        let maximizing = node.side.is_maximizing();
        let parent_visits = node.visits;
        let score = |child: NodeId| {
            let child = self.tree.get(child);
            self.model.selection_score(&child.value, child.visits, parent_visits)
        };

        // INVARIANT: only called on nodes with children
        let mut best = *node
            .children
            .choose(&mut self.rng)
            .expect("BUG: select_child called on node without children");
        let mut best_score = score(best);

        for &child in &node.children {
            let child_score = score(child);
            let better = if maximizing {
                child_score > best_score
            } else {
                child_score < best_score
            };
            if better {
                best = child;
                best_score = child_score;
            }
        }

        best
    }

    /// Grow the tree below `node_id` and return the node to roll out.
    pub(crate) fn expand(&mut self, node_id: NodeId) -> NodeId {
        match self.config.expansion {
            Expansion::AllMoves => {
                let node = self.tree.get(node_id);
                if node.visits == 0 || node.terminal {
                    return node_id;
                }

                let moves = std::mem::take(&mut self.tree.get_mut(node_id).untried);
                for mv in moves {
                    self.add_child(node_id, mv);
                }

                if self.tree.get(node_id).is_leaf() {
                    node_id
                } else {
                    self.select_child(node_id)
                }
            }
            Expansion::SingleRandom => {
                let untried = &mut self.tree.get_mut(node_id).untried;
                if untried.is_empty() {
                    return node_id;
                }
                let index = self.rng.gen_range(0..untried.len());
                let mv = untried.remove(index);
                self.add_child(node_id, mv)
            }
        }
    }

    fn add_child(&mut self, parent_id: NodeId, mv: S::Move) -> NodeId {
        let parent = self.tree.get(parent_id);
        let mut state = parent.state.clone();
        state.push(mv);

        let child = Node::new(
            state,
            Some(mv),
            Some(parent_id),
            parent.side.opposite(),
            parent.depth + 1,
            parent.result,
            self.model.child_value(&parent.value, parent.result),
        );
        self.tree.add_child(parent_id, child)
    }

    /// Play the rollout policy from `node_id` and cache the damped score.
    ///
    /// The step count starts at the node's depth and the evaluation is
    /// divided by `log2(max(steps, 2))`, rounding down.
    pub(crate) fn rollout(&mut self, node_id: NodeId) -> i64 {
        let node = self.tree.get(node_id);
        let mut state = node.state.clone();
        let mut steps = u64::from(node.depth);

        for _ in 0..self.config.rollout_depth {
            if state.is_terminal() {
                break;
            }
            match self.policy.pick_next_move(&state) {
                Some(mv) => {
                    state.push(mv);
                    steps += 1;
                }
                None => break,
            }
        }

        let score = damp(self.policy.evaluate(&state), steps);
        self.tree.get_mut(node_id).result = score;
        score
    }

    /// Update `leaf` and every ancestor up to the root.
    ///
    /// A supplied score overwrites the leaf's cached rollout result.
    pub(crate) fn backpropagate(&mut self, leaf: NodeId, score: Option<i64>) {
        if let Some(score) = score {
            self.tree.get_mut(leaf).result = score;
        }
        let leaf_score = self.tree.get(leaf).result;

        let mut current = Some(leaf);
        while let Some(id) = current {
            let node = self.tree.get(id);
            let input = BackupInput {
                value: &node.value,
                side: node.side,
                result: node.result,
                leaf_score,
            };
            let children = node.children.iter().map(|&child| &self.tree.get(child).value);
            let value = self.model.backup(input, children, &mut self.rng);

            let node = self.tree.get_mut(id);
            node.visits += 1;
            node.value = value;
            current = node.parent;
        }
    }
}

/// Discount an evaluation by the length of the line that produced it.
pub fn damp(evaluation: i64, steps: u64) -> i64 {
    let divisor = (steps.max(2) as f64).log2();
    (evaluation as f64 / divisor).floor() as i64
}
