//! Rollout policies.
//!
//! A [`Policy`] drives the simulated continuation of a leaf and scores the
//! position it ends in. The search treats it as a black box: a policy may
//! play random moves, consult static tables, or block on an external engine.
//!
//! - `RandomPolicy` plays uniformly random legal moves
//! - `FirstMovePolicy` always plays the first legal move (deterministic)

use baymcts_core::GameState;
use rand::seq::SliceRandom;
use rand::Rng;

/// Static evaluation: White-relative score of a position.
pub type StaticEval<S> = fn(&S) -> i64;

/// Move picker and position scorer used by rollouts.
pub trait Policy<S: GameState> {
    /// Choose the next rollout move, or `None` to stop the rollout.
    fn pick_next_move(&mut self, state: &S) -> Option<S::Move>;

    /// Score a position from White's point of view.
    ///
    /// Positive values favor White. Won or lost positions should map to a
    /// bounded mate score (see `baymcts_core::MATE_SCORE`).
    fn evaluate(&mut self, state: &S) -> i64;
}

impl<S: GameState, P: Policy<S> + ?Sized> Policy<S> for Box<P> {
    fn pick_next_move(&mut self, state: &S) -> Option<S::Move> {
        (**self).pick_next_move(state)
    }

    fn evaluate(&mut self, state: &S) -> i64 {
        (**self).evaluate(state)
    }
}

/// Policy using random rollouts and a static evaluation.
pub struct RandomPolicy<S, R: Rng> {
    /// Random number generator for move choice.
    rng: R,

    /// Evaluation applied where the rollout stops.
    eval: StaticEval<S>,
}

impl<S: GameState, R: Rng> RandomPolicy<S, R> {
    /// Create a new random policy.
    ///
    /// # Arguments
    /// * `rng` - Random number generator for rollouts
    /// * `eval` - Scores the position where a rollout ends
    pub fn new(rng: R, eval: StaticEval<S>) -> Self {
        Self { rng, eval }
    }
}

impl<S: GameState, R: Rng> Policy<S> for RandomPolicy<S, R> {
    fn pick_next_move(&mut self, state: &S) -> Option<S::Move> {
        state.legal_moves().choose(&mut self.rng).copied()
    }

    fn evaluate(&mut self, state: &S) -> i64 {
        (self.eval)(state)
    }
}

/// Deterministic policy: always plays the first legal move.
pub struct FirstMovePolicy<S> {
    eval: StaticEval<S>,
}

impl<S: GameState> FirstMovePolicy<S> {
    pub fn new(eval: StaticEval<S>) -> Self {
        Self { eval }
    }
}

impl<S: GameState> Policy<S> for FirstMovePolicy<S> {
    fn pick_next_move(&mut self, state: &S) -> Option<S::Move> {
        state.legal_moves().first().copied()
    }

    fn evaluate(&mut self, state: &S) -> i64 {
        (self.eval)(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::{tictactoe, Cell, TicTacToe};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_random_policy_picks_legal_moves() {
        let rng = ChaCha8Rng::seed_from_u64(42);
        let mut policy = RandomPolicy::new(rng, tictactoe::evaluate);
        let state = TicTacToe::from_cells(&[4, 0]);

        for _ in 0..20 {
            let mv = policy.pick_next_move(&state).unwrap();
            assert!(state.legal_moves().contains(&mv));
        }
    }

    #[test]
    fn test_random_policy_stops_on_finished_game() {
        let rng = ChaCha8Rng::seed_from_u64(42);
        let mut policy = RandomPolicy::new(rng, tictactoe::evaluate);
        let state = TicTacToe::from_cells(&[0, 3, 1, 4, 2]);
        assert_eq!(policy.pick_next_move(&state), None);
    }

    #[test]
    fn test_first_move_policy() {
        let mut policy = FirstMovePolicy::<TicTacToe>::new(|_| 0);
        let state = TicTacToe::from_cells(&[0, 1]);
        assert_eq!(policy.pick_next_move(&state), Some(Cell(2)));
        assert_eq!(policy.evaluate(&state), 0);
    }

    #[test]
    fn test_boxed_policy() {
        let mut policy: Box<dyn Policy<TicTacToe>> = Box::new(FirstMovePolicy::new(tictactoe::evaluate));
        let state = TicTacToe::new();
        assert_eq!(policy.pick_next_move(&state), Some(Cell(0)));
    }
}
