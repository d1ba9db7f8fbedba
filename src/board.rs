use anyhow::{anyhow, Result};
use static_assertions::*;
use tracing::debug;

use std::collections::BTreeSet;
use std::fmt::{self, Display, Formatter};

use crate::error::EngineError;
use crate::solver::{MAX_SCORE, MIN_SCORE};
use crate::{CELLS, SIZE};

/// One of the two sides of a game, X always moves first
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Player {
    X,
    O,
}

impl Player {
    /// Returns the other player
    pub fn opponent(self) -> Self {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }
}

impl Display for Player {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Player::X => write!(f, "X"),
            Player::O => write!(f, "O"),
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Cell {
    Empty,
    Mark(Player),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            _ => false,
        }
    }

    fn symbol(&self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Mark(Player::X) => 'X',
            Cell::Mark(Player::O) => 'O',
        }
    }
}

/// A move, as the (row, column) of the cell to mark
///
/// Actions order row-major, which is the order the solver tries them in.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct Action {
    pub row: usize,
    pub col: usize,
}

impl Action {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Creates an action from a cell number, counting 1-9 row-major from the top left
    pub fn from_cell_number(number: usize) -> Option<Self> {
        match number {
            1..=CELLS => Some(Self::new((number - 1) / SIZE, (number - 1) % SIZE)),
            _ => None,
        }
    }

    /// The 1-9 cell number of this action
    pub fn cell_number(&self) -> usize {
        self.row * SIZE + self.col + 1
    }

    fn index(&self) -> Option<usize> {
        if self.row < SIZE && self.col < SIZE {
            Some(self.row * SIZE + self.col)
        } else {
            None
        }
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

// rows top-to-bottom, columns left-to-right, then both diagonals
const LINES: [[usize; SIZE]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];
const_assert_eq!(LINES.len(), 2 * SIZE + 2);

/// A tic-tac-toe position
///
/// Boards are plain values: every move produces a new board and leaves the old one intact.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Board {
    cells: [Cell; CELLS], // cells are stored row-major from the top left
}

// one byte per cell, copied on every move
assert_eq_size!(Board, [u8; CELLS]);

impl Board {
    /// The empty board every game starts from
    pub const fn initial_state() -> Self {
        Self {
            cells: [Cell::Empty; CELLS],
        }
    }

    /// Plays a string of cell numbers (1-9) from the empty board, starting with X
    pub fn from_moves<S: AsRef<str>>(moves: S) -> Result<Self> {
        let mut board = Self::initial_state();

        for cell_char in moves.as_ref().chars() {
            match cell_char.to_digit(10).map(|c| c as usize) {
                Some(number @ 1..=CELLS) => {
                    // abort if the position is decided at any point
                    if board.terminal() {
                        return Err(anyhow!("Invalid position, game is over"));
                    }
                    board = board.result(Action::new((number - 1) / SIZE, (number - 1) % SIZE))?;
                }
                _ => return Err(anyhow!("could not parse '{}' as a valid move", cell_char)),
            }
        }
        Ok(board)
    }

    /// Reads a board drawn as rows of `X`, `O` and `.` (or `-`)
    ///
    /// Whitespace and `/` are ignored, so `"XO./.X./..."` and the output of
    /// `Display` are both accepted. The mark counts must be consistent with X
    /// moving first and turns alternating; beyond that the position is taken
    /// as given, even if it could not arise in play.
    pub fn from_grid<S: AsRef<str>>(grid: S) -> Result<Self> {
        let symbols: Vec<char> = grid
            .as_ref()
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '/')
            .collect();
        if symbols.len() != CELLS {
            return Err(anyhow!(
                "Invalid board, expected {} cells but found {}",
                CELLS,
                symbols.len()
            ));
        }

        let mut cells = [Cell::Empty; CELLS];
        for (cell, symbol) in cells.iter_mut().zip(symbols) {
            *cell = match symbol.to_ascii_uppercase() {
                'X' => Cell::Mark(Player::X),
                'O' => Cell::Mark(Player::O),
                '.' | '-' => Cell::Empty,
                _ => return Err(anyhow!("could not parse '{}' as a cell", symbol)),
            };
        }

        let board = Self { cells };
        let (x, o) = (board.count(Player::X), board.count(Player::O));
        if x < o || x > o + 1 {
            return Err(EngineError::Malformed { x, o }.into());
        }
        Ok(board)
    }

    pub fn cells(&self) -> &[Cell; CELLS] {
        &self.cells
    }

    /// The contents of a cell, or `None` if the action is off the board
    pub fn cell(&self, action: Action) -> Option<Cell> {
        action.index().map(|i| self.cells[i])
    }

    /// The number of marks a player has on the board
    pub fn count(&self, player: Player) -> usize {
        self.cells
            .iter()
            .filter(|&&cell| cell == Cell::Mark(player))
            .count()
    }

    pub fn num_moves(&self) -> usize {
        self.cells.iter().filter(|cell| !cell.is_empty()).count()
    }

    /// Returns the player whose turn it is
    pub fn player(&self) -> Player {
        if self.count(Player::X) == self.count(Player::O) {
            Player::X
        } else {
            Player::O
        }
    }

    /// Returns every legal action, or an empty set once the game is over
    pub fn actions(&self) -> BTreeSet<Action> {
        if self.terminal() {
            return BTreeSet::new();
        }
        (0..CELLS)
            .filter(|&i| self.cells[i].is_empty())
            .map(|i| Action::new(i / SIZE, i % SIZE))
            .collect()
    }

    /// Returns the board after the current player marks the action's cell
    pub fn result(&self, action: Action) -> Result<Self, EngineError> {
        if !self.actions().contains(&action) {
            debug!(%action, "rejected illegal move");
            return Err(EngineError::InvalidMove { action });
        }
        Ok(self.play(action))
    }

    /// Marks a cell for the current player without checking legality
    pub(crate) fn play(&self, action: Action) -> Self {
        let mut next = *self;
        next.cells[action.row * SIZE + action.col] = Cell::Mark(self.player());
        next
    }

    /// Returns the owner of the first completed line, if any
    pub fn winner(&self) -> Option<Player> {
        for line in LINES.iter() {
            let first = self.cells[line[0]];
            if let Cell::Mark(player) = first {
                if line.iter().all(|&i| self.cells[i] == first) {
                    return Some(player);
                }
            }
        }
        None
    }

    /// Returns true if the game is over
    pub fn terminal(&self) -> bool {
        self.winner().is_some() || !self.cells.iter().any(|cell| cell.is_empty())
    }

    /// Scores a finished game: 1 if X won, -1 if O won, 0 for a draw
    pub fn utility(&self) -> Result<i32, EngineError> {
        if !self.terminal() {
            return Err(EngineError::NonTerminal);
        }
        Ok(self.score())
    }

    /// Score of a board already known to be terminal
    pub(crate) fn score(&self) -> i32 {
        match self.winner() {
            Some(Player::X) => MAX_SCORE,
            Some(Player::O) => MIN_SCORE,
            None => 0,
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::initial_state()
    }
}

impl Display for Board {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(SIZE) {
            for cell in row {
                write!(f, "{}", cell.symbol())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
