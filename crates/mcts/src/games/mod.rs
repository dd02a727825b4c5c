//! Reference game implementations.
//!
//! These games let the search be exercised end to end without a chess rules
//! engine: scenario tests, determinism checks and the match runner all use
//! them.

pub mod tictactoe;

pub use tictactoe::{Cell, TicTacToe};
