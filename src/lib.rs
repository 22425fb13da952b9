//! A 2x3 chess-piece sliding puzzle and a breadth-first solver for it.
//!
//! The board holds one king, two bishops, two rooks and a single empty cell.
//! A piece may only ever move into the empty cell, following its usual chess
//! movement with a clear path.

pub mod error;
pub mod puzzle;
pub mod solver;

pub use error::PuzzleError;
pub use puzzle::{Move, Piece, Position, PuzzleState, COLS, ROWS};
pub use solver::{solve, BreadthFirstSearch, SearchStats, State};
