//! Arena-allocated MCTS tree.
//!
//! Using a Vec<Node> with indices provides better cache locality
//! and simpler ownership compared to Rc<RefCell<Node>>. Rerooting copies the
//! kept subtree into a fresh arena so discarded siblings are freed at once.

use std::collections::VecDeque;

use baymcts_core::GameState;

use crate::node::{Node, NodeId};

/// Arena-allocated MCTS tree.
///
/// Nodes are stored in a contiguous vector and referenced by index.
/// The root is always at [`NodeId::ROOT`].
#[derive(Debug)]
pub struct Tree<S: GameState, V> {
    nodes: Vec<Node<S, V>>,
}

impl<S: GameState, V> Tree<S, V> {
    /// Create a tree holding only `root`.
    pub fn new(root: Node<S, V>) -> Self {
        Self { nodes: vec![root] }
    }

    /// Get a reference to a node by ID.
    ///
    /// # Panics
    /// Panics if the NodeId is invalid.
    pub fn get(&self, id: NodeId) -> &Node<S, V> {
        &self.nodes[id.0]
    }

    /// Get a mutable reference to a node by ID.
    ///
    /// # Panics
    /// Panics if the NodeId is invalid.
    pub fn get_mut(&mut self, id: NodeId) -> &mut Node<S, V> {
        &mut self.nodes[id.0]
    }

    /// Add `node` as the last child of `parent`, returning its ID.
    pub fn add_child(&mut self, parent: NodeId, mut node: Node<S, V>) -> NodeId {
        let id = NodeId(self.nodes.len());
        node.parent = Some(parent);
        self.nodes.push(node);
        self.get_mut(parent).children.push(id);
        id
    }

    /// Replace the whole tree with a single fresh root.
    pub fn reset(&mut self, root: Node<S, V>) {
        self.nodes.clear();
        self.nodes.push(root);
    }

    /// Make `new_root` the root, dropping every node outside its subtree.
    ///
    /// Surviving nodes are renumbered breadth-first, their depths rebased so
    /// the new root has depth 0, and the new root's parent link is cleared.
    pub fn promote(&mut self, new_root: NodeId) {
        let mut old: Vec<Option<Node<S, V>>> =
            std::mem::take(&mut self.nodes).into_iter().map(Some).collect();

        let mut queue = VecDeque::from([(new_root, None, 0u32)]);
        let mut next_id = 1;

        while let Some((old_id, parent, depth)) = queue.pop_front() {
            let mut node = old[old_id.0]
                .take()
                .expect("BUG: node reached twice while promoting subtree");
            let own_id = NodeId(self.nodes.len());

            node.parent = parent;
            node.depth = depth;
            node.children = std::mem::take(&mut node.children)
                .into_iter()
                .map(|child| {
                    queue.push_back((child, Some(own_id), depth + 1));
                    let id = NodeId(next_id);
                    next_id += 1;
                    id
                })
                .collect();

            self.nodes.push(node);
        }
    }

    /// Get the number of nodes in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Get the root node.
    pub fn root(&self) -> &Node<S, V> {
        self.get(NodeId::ROOT)
    }

    /// Get a mutable reference to the root node.
    pub fn root_mut(&mut self) -> &mut Node<S, V> {
        self.get_mut(NodeId::ROOT)
    }

    /// Iterate over all live nodes with their IDs.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node<S, V>)> {
        self.nodes.iter().enumerate().map(|(i, node)| (NodeId(i), node))
    }
}
