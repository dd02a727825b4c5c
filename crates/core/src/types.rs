//! Shared domain types with enforced invariants.
//!
//! - Side: the two players, `White` is the maximizing side
//! - Outcome: winner or draw of a finished game
//! - Belief: Gaussian estimate whose stddev is finite and positive

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{MctsError, Result};

/// Score magnitude reported for a won or lost position.
///
/// Evaluations are bounded by this value so that mate scores stay finite
/// through rollout damping and Gaussian fusion.
pub const MATE_SCORE: i64 = 100_000;

/// Smallest standard deviation a belief may carry.
pub const STDDEV_EPSILON: f64 = 1e-3;

/// One of the two players.
///
/// Evaluations are signed from White's point of view: White picks the child
/// with the highest value, Black the lowest.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub enum Side {
    White,
    Black,
}

impl Side {
    /// Get the opposing side.
    pub fn opposite(self) -> Self {
        match self {
            Side::White => Side::Black,
            Side::Black => Side::White,
        }
    }

    /// True for the side that maximizes evaluations.
    pub fn is_maximizing(self) -> bool {
        self == Side::White
    }

    /// Sign to apply to a White-relative score to get this side's view.
    pub fn sign(self) -> i64 {
        match self {
            Side::White => 1,
            Side::Black => -1,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::White => write!(f, "white"),
            Side::Black => write!(f, "black"),
        }
    }
}

/// Result of a finished game.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Outcome {
    /// The winning side, `None` for a draw.
    pub winner: Option<Side>,
}

impl Outcome {
    /// A game won by `side`.
    pub fn win(side: Side) -> Self {
        Self { winner: Some(side) }
    }

    /// A drawn game.
    pub fn draw() -> Self {
        Self { winner: None }
    }

    pub fn is_draw(&self) -> bool {
        self.winner.is_none()
    }

    /// Mate-bounded score from White's point of view.
    pub fn score(&self) -> i64 {
        match self.winner {
            Some(side) => side.sign() * MATE_SCORE,
            None => 0,
        }
    }
}

/// A Gaussian belief about a node's value.
///
/// Invariant: `mean` is finite and `stddev` is finite and at least
/// [`STDDEV_EPSILON`].
///
/// # Example
/// ```
/// use baymcts_core::Belief;
///
/// let belief = Belief::new(12.0, 2.0).unwrap();
/// assert_eq!(belief.variance(), 4.0);
/// assert!(Belief::new(0.0, f64::NAN).is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Belief {
    mean: f64,
    stddev: f64,
}

impl Belief {
    /// Create a belief, rejecting non-finite values and a non-positive stddev.
    ///
    /// # Errors
    /// Returns `MctsError::InvalidBelief` if the mean is not finite or the
    /// stddev is not finite and strictly positive.
    pub fn new(mean: f64, stddev: f64) -> Result<Self> {
        if !mean.is_finite() {
            return Err(MctsError::InvalidBelief(format!("mean {} is not finite", mean)));
        }
        if !stddev.is_finite() || stddev <= 0.0 {
            return Err(MctsError::InvalidBelief(format!(
                "stddev {} must be finite and positive",
                stddev
            )));
        }
        Ok(Self {
            mean,
            stddev: stddev.max(STDDEV_EPSILON),
        })
    }

    /// Create a belief, raising a degenerate stddev to [`STDDEV_EPSILON`].
    ///
    /// # Panics
    /// Panics if either value is NaN or infinite: that can only come from a
    /// broken update upstream.
    pub fn clamped(mean: f64, stddev: f64) -> Self {
        assert!(
            mean.is_finite() && stddev.is_finite(),
            "BUG: non-finite belief ({}, {})",
            mean,
            stddev
        );
        Self {
            mean,
            stddev: stddev.max(STDDEV_EPSILON),
        }
    }

    /// Unit-variance prior centred on `mean`.
    pub fn prior(mean: f64) -> Self {
        Self::clamped(mean, 1.0)
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    pub fn stddev(&self) -> f64 {
        self.stddev
    }

    pub fn variance(&self) -> f64 {
        self.stddev * self.stddev
    }
}

impl fmt::Display for Belief {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "N({:.2}, {:.2})", self.mean, self.stddev)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_opposite() {
        assert_eq!(Side::White.opposite(), Side::Black);
        assert_eq!(Side::Black.opposite(), Side::White);
        assert!(Side::White.is_maximizing());
        assert!(!Side::Black.is_maximizing());
    }

    #[test]
    fn test_outcome_score() {
        assert_eq!(Outcome::win(Side::White).score(), MATE_SCORE);
        assert_eq!(Outcome::win(Side::Black).score(), -MATE_SCORE);
        assert_eq!(Outcome::draw().score(), 0);
        assert!(Outcome::draw().is_draw());
        assert!(!Outcome::win(Side::Black).is_draw());
    }

    #[test]
    fn test_belief_new_valid() {
        let belief = Belief::new(-3.5, 0.5).unwrap();
        assert_eq!(belief.mean(), -3.5);
        assert_eq!(belief.stddev(), 0.5);
        assert_eq!(belief.variance(), 0.25);
    }

    #[test]
    fn test_belief_new_invalid() {
        assert!(Belief::new(f64::INFINITY, 1.0).is_err());
        assert!(Belief::new(0.0, 0.0).is_err());
        assert!(Belief::new(0.0, -1.0).is_err());
        assert!(Belief::new(0.0, f64::NAN).is_err());
    }

    #[test]
    fn test_belief_clamped_raises_degenerate_stddev() {
        assert_eq!(Belief::clamped(1.0, 0.0).stddev(), STDDEV_EPSILON);
        assert_eq!(Belief::clamped(1.0, 1e-9).stddev(), STDDEV_EPSILON);
        assert_eq!(Belief::clamped(1.0, 2.0).stddev(), 2.0);
    }

    #[test]
    #[should_panic(expected = "BUG")]
    fn test_belief_clamped_rejects_nan() {
        Belief::clamped(f64::NAN, 1.0);
    }

    #[test]
    fn test_belief_prior() {
        let prior = Belief::prior(42.0);
        assert_eq!(prior.mean(), 42.0);
        assert_eq!(prior.stddev(), 1.0);
    }
}
