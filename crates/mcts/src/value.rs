//! Value representations for the search tree.
//!
//! The tree protocol (select, expand, rollout, backpropagate) is the same for
//! every variant. What differs is how a node's value is stored, scored during
//! selection and updated during backpropagation; a [`ValueModel`] owns those
//! three decisions.
//!
//! - [`ScoreModel`]: classical MCTS, cumulative integer score averaged at
//!   selection time.
//! - [`BeliefModel`]: Bayesian MCTS, Gaussian beliefs fused with order
//!   statistics of the children.

use baymcts_core::{Belief, Side};
use rand::seq::SliceRandom;
use rand::Rng;
use rand_distr::{Distribution, Normal};
use std::fmt::Debug;

use crate::gaussian::{gaussian_ucb1, GaussianOps};

/// What a node knows when its value is recomputed.
#[derive(Clone, Copy, Debug)]
pub struct BackupInput<'a, V> {
    /// Current value of the node.
    pub value: &'a V,

    /// Side that acts from the node.
    pub side: Side,

    /// The node's own cached rollout result.
    pub result: i64,

    /// Rollout result of the leaf this pass started from.
    pub leaf_score: i64,
}

/// Storage, scoring and update rule for node values.
pub trait ValueModel {
    /// Per-node value representation.
    type Value: Clone + Debug + PartialEq;

    /// Value of a freshly created root.
    fn root_value(&self) -> Self::Value;

    /// Initial value of a new child of a node holding `parent` whose last
    /// rollout result was `parent_result`.
    fn child_value(&self, parent: &Self::Value, parent_result: i64) -> Self::Value;

    /// Tree-policy score of a visited child. The parent picks the maximum
    /// (maximizing side) or the minimum of these.
    fn selection_score(&self, child: &Self::Value, child_visits: u32, parent_visits: u32) -> f64;

    /// New value of a node during backpropagation.
    fn backup<'a, I, R>(&mut self, input: BackupInput<'a, Self::Value>, children: I, rng: &mut R) -> Self::Value
    where
        I: Iterator<Item = &'a Self::Value>,
        R: Rng + ?Sized;

    /// A single number used to rank moves when the search is over.
    ///
    /// May be random: the Bayesian model draws from the belief.
    fn decision_value<R: Rng + ?Sized>(&self, value: &Self::Value, rng: &mut R) -> f64;
}

/// Classical MCTS: each node accumulates the raw rollout scores of every
/// sample that passed through it.
#[derive(Clone, Copy, Debug, Default)]
pub struct ScoreModel;

impl ScoreModel {
    pub fn new() -> Self {
        Self
    }
}

impl ValueModel for ScoreModel {
    type Value = i64;

    fn root_value(&self) -> i64 {
        0
    }

    fn child_value(&self, _parent: &i64, _parent_result: i64) -> i64 {
        // Scores are sums over visits; a child with no visits has none.
        0
    }

    /// UCB1: `score / visits + sqrt(2 ln(N) / visits)`.
    fn selection_score(&self, child: &i64, child_visits: u32, parent_visits: u32) -> f64 {
        let n = f64::from(child_visits.max(1));
        let parent = f64::from(parent_visits.max(1));
        *child as f64 / n + (2.0 * parent.ln() / n).sqrt()
    }

    fn backup<'a, I, R>(&mut self, input: BackupInput<'a, i64>, _children: I, _rng: &mut R) -> i64
    where
        I: Iterator<Item = &'a i64>,
        R: Rng + ?Sized,
    {
        input.value + input.leaf_score
    }

    fn decision_value<R: Rng + ?Sized>(&self, value: &i64, _rng: &mut R) -> f64 {
        *value as f64
    }
}

/// Bayesian MCTS: each node holds a Gaussian belief.
///
/// Leaves combine their belief with the rollout result as a unit-variance
/// observation. Interior nodes are rebuilt from their children as the
/// distribution of the max (maximizing side) or min of the children.
#[derive(Debug, Default)]
pub struct BeliefModel {
    gaussian: GaussianOps,
}

impl BeliefModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// The memoized Gaussian helper owned by this model.
    pub fn gaussian(&self) -> &GaussianOps {
        &self.gaussian
    }

    /// Combine a prior belief with one unit-variance observation.
    ///
    /// `stddev' = sqrt(var + 1)`, `mean' = (var * observed + mean) / (var + 1)`.
    pub fn observe(prior: &Belief, observed: i64) -> Belief {
        let prior_var = prior.variance();
        let likelihood_var = 1.0;
        let stddev = (prior_var + likelihood_var).sqrt();
        let mean = (prior_var * observed as f64 + likelihood_var * prior.mean()) / (prior_var + likelihood_var);
        Belief::clamped(mean, stddev)
    }

    /// Fold beliefs pairwise with the max (maximizing side) or min of two
    /// Gaussians, in a random order.
    ///
    /// # Panics
    /// Panics if `beliefs` is empty.
    pub fn fuse<R: Rng + ?Sized>(&mut self, side: Side, beliefs: &mut [Belief], rng: &mut R) -> Belief {
        beliefs.shuffle(rng);
        let (first, rest) = beliefs
            .split_first()
            .expect("BUG: fusing an empty set of beliefs");

        rest.iter().fold(*first, |acc, next| {
            let (mean, stddev) = if side.is_maximizing() {
                self.gaussian
                    .max_gaussian(acc.mean(), acc.stddev(), next.mean(), next.stddev())
            } else {
                self.gaussian
                    .min_gaussian(acc.mean(), acc.stddev(), next.mean(), next.stddev())
            };
            Belief::clamped(mean, stddev)
        })
    }
}

impl ValueModel for BeliefModel {
    type Value = Belief;

    fn root_value(&self) -> Belief {
        Belief::prior(0.0)
    }

    fn child_value(&self, _parent: &Belief, parent_result: i64) -> Belief {
        Belief::prior(parent_result as f64)
    }

    fn selection_score(&self, child: &Belief, _child_visits: u32, parent_visits: u32) -> f64 {
        gaussian_ucb1(child.mean(), child.stddev(), parent_visits)
    }

    fn backup<'a, I, R>(&mut self, input: BackupInput<'a, Belief>, children: I, rng: &mut R) -> Belief
    where
        I: Iterator<Item = &'a Belief>,
        R: Rng + ?Sized,
    {
        let mut beliefs: Vec<Belief> = children.copied().collect();
        if beliefs.is_empty() {
            Self::observe(input.value, input.result)
        } else {
            self.fuse(input.side, &mut beliefs, rng)
        }
    }

    fn decision_value<R: Rng + ?Sized>(&self, value: &Belief, rng: &mut R) -> f64 {
        let normal = Normal::new(value.mean(), value.stddev()).expect("BUG: belief with invalid stddev");
        normal.sample(rng)
    }
}
