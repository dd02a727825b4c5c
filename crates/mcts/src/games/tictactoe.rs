//! Tic-tac-toe as a [`GameState`].
//!
//! X is White (the maximizing side) and moves first. Tic-tac-toe is solved,
//! which makes it a good yardstick: a sound search never loses it and always
//! finds an immediate win.

use baymcts_core::{GameState, Outcome, Side, MATE_SCORE};
use std::fmt;

/// The eight winning lines.
const LINES: [[usize; 3]; 8] = [
    [0, 1, 2], // top row
    [3, 4, 5], // middle row
    [6, 7, 8], // bottom row
    [0, 3, 6], // left column
    [1, 4, 7], // center column
    [2, 5, 8], // right column
    [0, 4, 8], // main diagonal
    [2, 4, 6], // anti-diagonal
];

/// Heuristic weight of an open line holding two of one side's marks.
const TWO_IN_LINE: i64 = 10;

/// A move: the index of the cell to mark, row-major 0-8.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct Cell(pub u8);

impl Cell {
    /// Get the row (0-2).
    pub fn row(self) -> u8 {
        self.0 / 3
    }

    /// Get the column (0-2).
    pub fn col(self) -> u8 {
        self.0 % 3
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row(), self.col())
    }
}

/// Tic-tac-toe position.
#[derive(Clone, PartialEq, Eq, Debug, Hash)]
pub struct TicTacToe {
    /// Board: 9 cells, indexed 0-8 (row-major).
    /// ```text
    /// 0 | 1 | 2
    /// ---------
    /// 3 | 4 | 5
    /// ---------
    /// 6 | 7 | 8
    /// ```
    board: [Option<Side>; 9],

    /// Side to move.
    current: Side,

    /// Cached winner (if any).
    winner: Option<Side>,
}

impl TicTacToe {
    /// Create a new empty board with X (White) to move.
    pub fn new() -> Self {
        Self {
            board: [None; 9],
            current: Side::White,
            winner: None,
        }
    }

    /// Play the given cells in order from the empty board.
    ///
    /// # Panics
    /// Panics if a cell is occupied or out of range; meant for fixtures.
    pub fn from_cells(cells: &[u8]) -> Self {
        let mut state = Self::new();
        for &cell in cells {
            assert!(
                state.get(cell as usize).is_none() && cell < 9,
                "cell {} is not playable",
                cell
            );
            state.push(Cell(cell));
        }
        state
    }

    /// Get the winner, if any.
    pub fn winner(&self) -> Option<Side> {
        self.winner
    }

    /// Get the mark at a cell, if any.
    pub fn get(&self, cell: usize) -> Option<Side> {
        self.board.get(cell).copied().flatten()
    }

    fn check_winner(&self) -> Option<Side> {
        LINES.iter().find_map(|line| {
            let first = self.board[line[0]]?;
            (self.board[line[1]] == Some(first) && self.board[line[2]] == Some(first)).then_some(first)
        })
    }

    fn is_full(&self) -> bool {
        self.board.iter().all(|c| c.is_some())
    }
}

impl Default for TicTacToe {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState for TicTacToe {
    type Move = Cell;

    fn legal_moves(&self) -> Vec<Cell> {
        if self.winner.is_some() {
            return Vec::new();
        }
        (0..9u8)
            .filter(|&i| self.board[i as usize].is_none())
            .map(Cell)
            .collect()
    }

    fn push(&mut self, mv: Cell) {
        self.board[mv.0 as usize] = Some(self.current);
        self.current = self.current.opposite();
        self.winner = self.check_winner();
    }

    fn is_terminal(&self) -> bool {
        self.winner.is_some() || self.is_full()
    }

    fn outcome(&self) -> Option<Outcome> {
        match self.winner {
            Some(side) => Some(Outcome::win(side)),
            None if self.is_full() => Some(Outcome::draw()),
            None => None,
        }
    }

    fn side_to_move(&self) -> Side {
        self.current
    }
}

impl fmt::Display for TicTacToe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..3 {
            if row > 0 {
                writeln!(f, "-----------")?;
            }
            for col in 0..3 {
                if col > 0 {
                    write!(f, "|")?;
                }
                match self.board[row * 3 + col] {
                    Some(Side::White) => write!(f, " X ")?,
                    Some(Side::Black) => write!(f, " O ")?,
                    None => write!(f, "   ")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// White-relative static evaluation.
///
/// Finished games score `±MATE_SCORE` (0 for a draw). Otherwise each line
/// still open for only one side counts for that side: one mark scores 1, two
/// marks score [`TWO_IN_LINE`].
pub fn evaluate(state: &TicTacToe) -> i64 {
    if let Some(outcome) = state.outcome() {
        return outcome.score();
    }

    LINES
        .iter()
        .map(|line| {
            let marks = line.iter().filter_map(|&i| state.board[i]);
            let (white, black) = marks.fold((0, 0), |(w, b), side| match side {
                Side::White => (w + 1, b),
                Side::Black => (w, b + 1),
            });
            let weight = |count: i64| if count == 2 { TWO_IN_LINE } else { count };
            match (white, black) {
                (w, 0) => weight(w),
                (0, b) => -weight(b),
                _ => 0,
            }
        })
        .sum()
}

/// Mate-only evaluation: `±MATE_SCORE` for a win, 0 for anything else.
pub fn evaluate_outcome(state: &TicTacToe) -> i64 {
    state.outcome().map_or(0, |outcome| outcome.score())
}

/// Returns true if `score` is a decisive (mate) score.
pub fn is_mate_score(score: i64) -> bool {
    score.abs() >= MATE_SCORE
}
