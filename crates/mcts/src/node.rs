//! MCTS node types for tree storage.
//!
//! Uses arena allocation with indices for cache locality and simpler memory management.

use baymcts_core::{GameState, Side};

/// Index into the node arena.
///
/// This is a lightweight handle that references a node in the tree.
/// Parents are stored as plain indices, so a child never owns its parent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// The root node is always at index 0.
    pub const ROOT: NodeId = NodeId(0);
}

/// A node in the MCTS tree.
///
/// Each node owns a snapshot of the game state reached by `mv` and the
/// value estimate the search has built for it. `V` is the value
/// representation of the tree's `ValueModel` (a cumulative score or a belief).
#[derive(Clone, Debug)]
pub struct Node<S: GameState, V> {
    /// Game state at this node.
    pub state: S,

    /// Move that led to this node (None for root).
    pub mv: Option<S::Move>,

    /// Parent node (None for root).
    pub parent: Option<NodeId>,

    /// Materialized children, in expansion order.
    pub children: Vec<NodeId>,

    /// Side that acts from this state.
    pub side: Side,

    /// Distance from the current root.
    pub depth: u32,

    /// Number of backpropagation passes through this node.
    pub visits: u32,

    /// Legal moves that have no child yet.
    pub untried: Vec<S::Move>,

    /// Whether the state is terminal (cached at creation).
    pub terminal: bool,

    /// Last rollout result recorded on this node.
    pub result: i64,

    /// Value estimate.
    pub value: V,
}

impl<S: GameState, V> Node<S, V> {
    /// Create a node for `state`. Terminal states get no untried moves.
    pub fn new(
        state: S,
        mv: Option<S::Move>,
        parent: Option<NodeId>,
        side: Side,
        depth: u32,
        result: i64,
        value: V,
    ) -> Self {
        let terminal = state.is_terminal();
        let untried = if terminal { Vec::new() } else { state.legal_moves() };
        Self {
            state,
            mv,
            parent,
            children: Vec::new(),
            side,
            depth,
            visits: 0,
            untried,
            terminal,
            result,
            value,
        }
    }

    /// Create a root node with a baseline visit count.
    pub fn root(state: S, value: V, visits: u32) -> Self {
        let side = state.side_to_move();
        let mut node = Self::new(state, None, None, side, 0, 0, value);
        node.visits = visits;
        node
    }

    /// True once every legal move has a child.
    pub fn is_fully_expanded(&self) -> bool {
        self.untried.is_empty()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}
