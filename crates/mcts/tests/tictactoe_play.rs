//! End-to-end play tests on tic-tac-toe.
//!
//! Tic-tac-toe is solved, so the expectations are concrete:
//! - A single sample materializes exactly one visited child
//! - An immediate win is always taken
//! - A random opponent is beaten far more often than not

use baymcts::games::{tictactoe, Cell, TicTacToe};
use baymcts::{FirstMovePolicy, Limit, MctsConfig, MctsEngine, Policy, RandomPolicy, SearchTree, ValueModel};
use baymcts_core::{GameState, Side};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn random_policy(seed: u64) -> RandomPolicy<TicTacToe, ChaCha8Rng> {
    RandomPolicy::new(ChaCha8Rng::seed_from_u64(seed), tictactoe::evaluate)
}

/// Play one game between an engine and a uniformly random opponent.
fn play_vs_random<P, V>(mut engine: MctsEngine<TicTacToe, P, V>, engine_side: Side, seed: u64) -> TicTacToe
where
    P: Policy<TicTacToe>,
    V: ValueModel,
{
    let limit = Limit::nodes(400).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(seed + 1000);
    let mut board = TicTacToe::new();
    let mut last = None;

    while !board.is_terminal() {
        let mv = if board.side_to_move() == engine_side {
            engine.play(last, &limit).unwrap()
        } else {
            *board.legal_moves().choose(&mut rng).unwrap()
        };
        board.push(mv);
        last = Some(mv);
    }
    board
}

#[test]
fn test_first_sample_creates_one_visited_child() {
    // Zero evaluation and first-move rollouts: nothing random in the outcome
    let policy = FirstMovePolicy::<TicTacToe>::new(|_| 0);
    let mut tree = SearchTree::bayesian(TicTacToe::new(), policy, MctsConfig::default());

    assert_eq!(tree.sample(1), 1);

    let visited: Vec<_> = tree.get_move_values().into_iter().filter(|v| v.visits > 0).collect();
    assert_eq!(visited.len(), 1);
    assert_eq!(visited[0].visits, 1);
    assert_eq!(visited[0].mv, Cell(0));
}

#[test]
fn test_single_sample_surfaces_winning_move() {
    // X: 0, 1  O: 3, 4  X to move; cell 2 is the first legal move and wins
    let state = TicTacToe::from_cells(&[0, 3, 1, 4]);
    let mut tree = SearchTree::bayesian(state, random_policy(0), MctsConfig::default());

    assert_eq!(tree.sample(1), 1);

    let values = tree.get_move_values();
    assert_eq!(values.len(), 5);
    let (winning, others): (Vec<_>, Vec<_>) = values.into_iter().partition(|v| v.mv == Cell(2));
    assert_eq!(winning[0].visits, 1);
    // Mate score observed once against a unit prior centred on 0
    assert!((winning[0].value.mean() - 50_000.0).abs() < 1e-9);
    for other in &others {
        assert_eq!(other.visits, 0);
        assert!(other.value.mean() < winning[0].value.mean());
    }
}

#[test]
fn test_winning_move_carries_extreme_value() {
    // X: 0, 1  O: 3, 4  X to move wins with 2
    let state = TicTacToe::from_cells(&[0, 3, 1, 4]);
    let mut won = state.clone();
    won.push(Cell(2));
    assert!(tictactoe::is_mate_score(tictactoe::evaluate(&won)));

    let mut bayesian = SearchTree::bayesian(state.clone(), random_policy(3), MctsConfig::bayesian().with_seed(3));
    bayesian.sample(200);
    let values = bayesian.get_move_values();
    let best = values
        .iter()
        .max_by(|a, b| a.value.mean().total_cmp(&b.value.mean()))
        .unwrap();
    assert_eq!(best.mv, Cell(2));

    let mut classical = SearchTree::classical(state, random_policy(3), MctsConfig::classical().with_seed(3));
    classical.sample(200);
    let values = classical.get_move_values();
    let best = values.iter().max_by_key(|v| v.value).unwrap();
    assert_eq!(best.mv, Cell(2));
}

#[test]
fn test_finds_mate_in_one_for_black() {
    // X: 0, 1, 6  O: 4, 5  O to move wins with 3
    let state = TicTacToe::from_cells(&[0, 4, 1, 5, 6]);
    assert_eq!(state.side_to_move(), Side::Black);

    for seed in 0..5 {
        let config = MctsConfig::bayesian().with_seed(seed);
        let mut engine = MctsEngine::bayesian(state.clone(), random_policy(seed), config);
        let mv = engine.play(None, &Limit::nodes(200).unwrap()).unwrap();
        assert_eq!(mv, Cell(3), "seed {}", seed);
    }
}

#[test]
fn test_bayesian_beats_random_as_x() {
    let mut losses = 0;
    let mut wins = 0;
    for seed in 0..10 {
        let config = MctsConfig::bayesian().with_seed(seed);
        let engine = MctsEngine::bayesian(TicTacToe::new(), random_policy(seed), config);
        match play_vs_random(engine, Side::White, seed).winner() {
            Some(Side::White) => wins += 1,
            Some(Side::Black) => losses += 1,
            None => {}
        }
    }
    assert!(losses <= 2, "lost {} of 10 games as X", losses);
    assert!(wins > losses);
}

#[test]
fn test_classical_beats_random_as_x() {
    let mut losses = 0;
    let mut wins = 0;
    for seed in 0..10 {
        let config = MctsConfig::classical().with_seed(seed);
        let engine = MctsEngine::classical(TicTacToe::new(), random_policy(seed), config);
        match play_vs_random(engine, Side::White, seed).winner() {
            Some(Side::White) => wins += 1,
            Some(Side::Black) => losses += 1,
            None => {}
        }
    }
    assert!(losses <= 2, "lost {} of 10 games as X", losses);
    assert!(wins > losses);
}

#[test]
fn test_bayesian_rarely_loses_as_o() {
    let mut losses = 0;
    for seed in 0..10 {
        let config = MctsConfig::bayesian().with_seed(seed);
        let engine = MctsEngine::bayesian(TicTacToe::new(), random_policy(seed), config);
        if play_vs_random(engine, Side::Black, seed).winner() == Some(Side::White) {
            losses += 1;
        }
    }
    assert!(losses <= 3, "lost {} of 10 games as O", losses);
}
