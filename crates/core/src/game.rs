use std::fmt::Debug;
use std::hash::Hash;

use crate::{Outcome, Side};

/// A two-player game position that the search can copy and advance.
///
/// The search never inspects the rules directly: it only asks for legal
/// moves, pushes moves onto private copies (via `Clone`) and checks for the
/// end of the game. Implementations own all rule knowledge.
pub trait GameState: Clone {
    /// A move in this game (e.g., a chess move or a board cell).
    type Move: Clone + Copy + Debug + Eq + Hash;

    /// Returns all legal moves from this position, in a stable order.
    fn legal_moves(&self) -> Vec<Self::Move>;

    /// Applies a move in place. The move is assumed to be legal.
    fn push(&mut self, mv: Self::Move);

    /// Returns true if the game has ended (win, loss or draw).
    fn is_terminal(&self) -> bool;

    /// Returns the outcome if the game has ended, `None` otherwise.
    fn outcome(&self) -> Option<Outcome>;

    /// The side that acts from this position.
    fn side_to_move(&self) -> Side;
}
