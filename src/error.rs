use crate::puzzle::Position;

/// Errors raised by board construction and move application.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PuzzleError {
    #[error("illegal move from {from} to {to}")]
    IllegalMove { from: Position, to: Position },

    #[error("invalid grid: {0}")]
    InvalidGrid(String),
}
