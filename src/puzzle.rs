use rand::{seq::SliceRandom, Rng};
use std::fmt;
use std::str::FromStr;

use crate::error::PuzzleError;

pub const ROWS: usize = 2;
pub const COLS: usize = 3;

const SOLVED_BOARD: [[Piece; COLS]; ROWS] = [
    [Piece::Bishop, Piece::Bishop, Piece::Empty],
    [Piece::Rook, Piece::Rook, Piece::King],
];

const INITIAL_BOARD: [[Piece; COLS]; ROWS] = [
    [Piece::King, Piece::Bishop, Piece::Bishop],
    [Piece::Rook, Piece::Rook, Piece::Empty],
];

/// A board cell. Coordinates are signed so that off-board positions can be
/// represented and rejected instead of wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    pub fn offset(&self, d_row: i32, d_col: i32) -> Self {
        Self::new(self.row + d_row, self.col + d_col)
    }

    pub fn up(&self) -> Self {
        self.offset(-1, 0)
    }

    pub fn down(&self) -> Self {
        self.offset(1, 0)
    }

    pub fn left(&self) -> Self {
        self.offset(0, -1)
    }

    pub fn right(&self) -> Self {
        self.offset(0, 1)
    }

    fn index(&self) -> Option<(usize, usize)> {
        let row = usize::try_from(self.row).ok().filter(|&r| r < ROWS)?;
        let col = usize::try_from(self.col).ok().filter(|&c| c < COLS)?;
        Some((row, col))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Piece {
    King,
    Bishop,
    Rook,
    Empty,
}

impl Piece {
    pub fn symbol(&self) -> char {
        match self {
            Piece::King => 'K',
            Piece::Bishop => 'B',
            Piece::Rook => 'R',
            Piece::Empty => '.',
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Piece::Empty
    }
}

impl TryFrom<char> for Piece {
    type Error = PuzzleError;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        match c {
            'K' => Ok(Piece::King),
            'B' => Ok(Piece::Bishop),
            'R' => Ok(Piece::Rook),
            '.' | ' ' => Ok(Piece::Empty),
            other => Err(PuzzleError::InvalidGrid(format!(
                "unknown piece symbol {:?}",
                other
            ))),
        }
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Relocates whatever sits on `from` into `to`. Carries no piece or board;
/// legality is decided by the state it is applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Position,
    pub to: Position,
}

impl Move {
    pub const fn new(from: Position, to: Position) -> Self {
        Self { from, to }
    }

    pub fn reversed(&self) -> Self {
        Self::new(self.to, self.from)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}

/// One board configuration. `empty` always names the single empty cell of
/// `board`; every constructor and `make_move` keep the two in step.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PuzzleState {
    board: [[Piece; COLS]; ROWS],
    empty: Position,
}

impl PuzzleState {
    /// The canonical starting configuration.
    pub fn new() -> Self {
        Self {
            board: INITIAL_BOARD,
            empty: Position::new(1, 2),
        }
    }

    /// The goal configuration.
    pub fn solved() -> Self {
        Self {
            board: SOLVED_BOARD,
            empty: Position::new(0, 2),
        }
    }

    /// Builds a state from an explicit grid, checking that it holds exactly
    /// one empty cell and that `empty` points at it.
    pub fn from_grid(board: [[Piece; COLS]; ROWS], empty: Position) -> Result<Self, PuzzleError> {
        let empties: Vec<Position> = Self::cells()
            .filter(|pos| pos.index().map(|(row, col)| board[row][col]) == Some(Piece::Empty))
            .collect();

        match empties.as_slice() {
            [only] if *only == empty => Ok(Self { board, empty }),
            [only] => Err(PuzzleError::InvalidGrid(format!(
                "empty position {} does not match empty cell {}",
                empty, only
            ))),
            _ => Err(PuzzleError::InvalidGrid(format!(
                "expected exactly one empty cell, found {}",
                empties.len()
            ))),
        }
    }

    pub fn board(&self) -> &[[Piece; COLS]; ROWS] {
        &self.board
    }

    pub fn empty_position(&self) -> Position {
        self.empty
    }

    /// The piece on `pos`, or `None` when `pos` is off the board.
    pub fn piece_at(&self, pos: Position) -> Option<Piece> {
        pos.index().map(|(row, col)| self.board[row][col])
    }

    pub fn is_on_board(pos: Position) -> bool {
        pos.index().is_some()
    }

    pub fn is_solved(&self) -> bool {
        self.board == SOLVED_BOARD
    }

    pub fn is_legal_move(&self, movement: Move) -> bool {
        let Move { from, to } = movement;

        if !Self::is_on_board(from) || !Self::is_on_board(to) || to != self.empty {
            return false;
        }

        let d_row = to.row - from.row;
        let d_col = to.col - from.col;

        match self.piece_at(from) {
            Some(Piece::King) => d_row.abs().max(d_col.abs()) <= 1,
            Some(Piece::Bishop) => {
                d_row != 0 && d_row.abs() == d_col.abs() && self.is_path_clear(from, to)
            }
            Some(Piece::Rook) => (d_row == 0) != (d_col == 0) && self.is_path_clear(from, to),
            Some(Piece::Empty) | None => false,
        }
    }

    /// Every legal move, in row-major order of the moving piece. Each
    /// candidate targets the empty cell, so no two share a `from`.
    pub fn legal_moves(&self) -> Vec<Move> {
        Self::cells()
            .filter(|&pos| pos != self.empty)
            .map(|pos| Move::new(pos, self.empty))
            .filter(|&movement| self.is_legal_move(movement))
            .collect()
    }

    /// Applies `movement`, leaving the state untouched if it is illegal.
    pub fn make_move(&mut self, movement: Move) -> Result<(), PuzzleError> {
        if !self.is_legal_move(movement) {
            return Err(PuzzleError::IllegalMove {
                from: movement.from,
                to: movement.to,
            });
        }

        let (Some((from_row, from_col)), Some((to_row, to_col))) =
            (movement.from.index(), movement.to.index())
        else {
            return Err(PuzzleError::IllegalMove {
                from: movement.from,
                to: movement.to,
            });
        };

        self.board[to_row][to_col] = self.board[from_row][from_col];
        self.board[from_row][from_col] = Piece::Empty;
        self.empty = movement.from;
        Ok(())
    }

    /// Replays `moves` in order, stopping at the first illegal one. Moves
    /// before it stay applied.
    pub fn apply_all(&mut self, moves: &[Move]) -> Result<(), PuzzleError> {
        for &movement in moves {
            self.make_move(movement)?;
        }
        Ok(())
    }

    /// Random walk of up to `steps` legal moves. Stops early on a board with
    /// no legal moves.
    pub fn scramble<R: Rng + ?Sized>(&mut self, rng: &mut R, steps: usize) {
        for _ in 0..steps {
            let moves = self.legal_moves();
            let Some(&movement) = moves.choose(rng) else {
                break;
            };
            if self.make_move(movement).is_err() {
                break;
            }
        }
    }

    fn cells() -> impl Iterator<Item = Position> {
        (0..ROWS as i32).flat_map(|row| (0..COLS as i32).map(move |col| Position::new(row, col)))
    }

    // Cells strictly between `from` and `to` must all be empty. Callers
    // guarantee the two lie on a common line or diagonal.
    fn is_path_clear(&self, from: Position, to: Position) -> bool {
        let step_row = (to.row - from.row).signum();
        let step_col = (to.col - from.col).signum();
        let mut current = from.offset(step_row, step_col);

        while current != to {
            if self.piece_at(current) != Some(Piece::Empty) {
                return false;
            }
            current = current.offset(step_row, step_col);
        }
        true
    }
}

impl Default for PuzzleState {
    fn default() -> Self {
        Self::new()
    }
}

/// Parses rows of piece symbols separated by `/` or newlines, e.g. `KBB/RR.`.
impl FromStr for PuzzleState {
    type Err = PuzzleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rows: Vec<&str> = s
            .split(|c: char| c == '/' || c == '\n')
            .filter(|row| !row.is_empty())
            .collect();
        if rows.len() != ROWS {
            return Err(PuzzleError::InvalidGrid(format!(
                "expected {} rows, found {}",
                ROWS,
                rows.len()
            )));
        }

        let mut board = [[Piece::Empty; COLS]; ROWS];
        let mut empty = None;
        for (i, row) in rows.iter().enumerate() {
            let symbols: Vec<char> = row.chars().collect();
            if symbols.len() != COLS {
                return Err(PuzzleError::InvalidGrid(format!(
                    "row {} has {} cells, expected {}",
                    i,
                    symbols.len(),
                    COLS
                )));
            }
            for (j, &symbol) in symbols.iter().enumerate() {
                board[i][j] = Piece::try_from(symbol)?;
                if board[i][j].is_empty() {
                    empty = Some(Position::new(i as i32, j as i32));
                }
            }
        }

        let empty = empty.ok_or_else(|| PuzzleError::InvalidGrid("no empty cell".to_string()))?;
        Self::from_grid(board, empty)
    }
}

impl fmt::Display for PuzzleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.board {
            for piece in row {
                write!(f, "{} ", piece)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_offsets() {
        let p = Position::new(1, 1);
        assert_eq!(p.up(), Position::new(0, 1));
        assert_eq!(p.down(), Position::new(2, 1));
        assert_eq!(p.left(), Position::new(1, 0));
        assert_eq!(p.right(), Position::new(1, 2));
    }

    #[test]
    fn test_position_index_rejects_off_board() {
        assert_eq!(Position::new(1, 2).index(), Some((1, 2)));
        assert_eq!(Position::new(-1, 0).index(), None);
        assert_eq!(Position::new(0, 3).index(), None);
        assert_eq!(Position::new(2, 0).index(), None);
    }

    #[test]
    fn test_path_clear_checks_intermediate_cells() {
        let open: PuzzleState = "R.B/KRB".parse().unwrap();
        // Only intermediate cells count, so an adjacent step is always clear.
        assert!(open.is_path_clear(Position::new(0, 0), Position::new(0, 1)));

        let blocked: PuzzleState = "RB./KRB".parse().unwrap();
        assert!(!blocked.is_path_clear(Position::new(0, 0), Position::new(0, 2)));
        assert!(!blocked.is_path_clear(Position::new(1, 0), Position::new(1, 2)));
    }

    #[test]
    fn test_cells_are_row_major() {
        let cells: Vec<Position> = PuzzleState::cells().collect();
        assert_eq!(cells.len(), ROWS * COLS);
        assert_eq!(cells[0], Position::new(0, 0));
        assert_eq!(cells[3], Position::new(1, 0));
    }
}
