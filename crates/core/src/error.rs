use thiserror::Error;

/// Errors that can occur while searching or driving a search.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MctsError {
    #[error("Illegal move: {0}")]
    IllegalMove(String),

    #[error("No legal moves available")]
    NoLegalMoves,

    #[error("Invalid belief: {0}")]
    InvalidBelief(String),

    #[error("Invalid limit: {0}")]
    InvalidLimit(String),

    #[error("Policy unavailable: {0}")]
    PolicyUnavailable(String),
}

/// Convenience Result type for MCTS operations
pub type Result<T> = std::result::Result<T, MctsError>;
