//! Bayesian MCTS core - game abstraction and common types
//!
//! This crate provides the `GameState` trait that any two-player game must
//! implement to be searched, plus the small value types shared by the
//! search crate and its drivers.
//!
//! # Types
//!
//! - [`GameState`] - Trait for game positions
//! - [`Side`] - The two players; `White` maximizes, `Black` minimizes
//! - [`Outcome`] - Result of a finished game
//! - [`Belief`] - Gaussian (mean, stddev) estimate with a positive stddev

mod error;
mod game;
mod types;

pub use error::{MctsError, Result};
pub use game::GameState;
pub use types::{Belief, Outcome, Side, MATE_SCORE, STDDEV_EPSILON};
