//! Search budgets.

use std::time::{Duration, Instant};

use baymcts_core::{MctsError, Result};
use serde::{Deserialize, Serialize};

/// When a search stops.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Limit {
    /// Run exactly this many search steps.
    Nodes(usize),

    /// Keep stepping until this much wall-clock time has passed.
    ///
    /// Checked between steps, so a slow step can overrun it.
    Time(Duration),
}

impl Limit {
    /// A node budget.
    ///
    /// # Errors
    /// Returns `MctsError::InvalidLimit` if `nodes` is zero.
    pub fn nodes(nodes: usize) -> Result<Self> {
        if nodes == 0 {
            return Err(MctsError::InvalidLimit("node limit must be positive".into()));
        }
        Ok(Limit::Nodes(nodes))
    }

    /// A time budget in seconds.
    ///
    /// # Errors
    /// Returns `MctsError::InvalidLimit` unless `seconds` is finite, positive
    /// and representable as a `Duration`.
    pub fn seconds(seconds: f64) -> Result<Self> {
        if !seconds.is_finite() || seconds <= 0.0 {
            return Err(MctsError::InvalidLimit(format!(
                "time limit must be a positive number of seconds, got {}",
                seconds
            )));
        }
        Duration::try_from_secs_f64(seconds)
            .map(Limit::Time)
            .map_err(|e| MctsError::InvalidLimit(format!("time limit of {} seconds: {}", seconds, e)))
    }

    /// Call `step` until the budget is spent and return the sum of what it
    /// reported.
    ///
    /// `step` returns how many search steps it performed. A step reporting 0
    /// means there is nothing left to search and ends the loop early.
    pub fn run<F: FnMut() -> usize>(&self, mut step: F) -> usize {
        let mut total = 0;
        match *self {
            Limit::Nodes(nodes) => {
                for _ in 0..nodes {
                    match step() {
                        0 => break,
                        n => total += n,
                    }
                }
            }
            Limit::Time(budget) => {
                let start = Instant::now();
                while start.elapsed() < budget {
                    match step() {
                        0 => break,
                        n => total += n,
                    }
                }
            }
        }
        total
    }
}

impl std::fmt::Display for Limit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Limit::Nodes(nodes) => write!(f, "{} nodes", nodes),
            Limit::Time(budget) => write!(f, "{:.3}s", budget.as_secs_f64()),
        }
    }
}
