//! A perfect agent for playing or analysing the game of tic-tac-toe
//!
//! This agent searches the complete game tree with minimax to find the
//! optimal move for any position.
//!
//! # Basic Usage
//!
//! ```
//! use tictactoe_ai::{board::{Action, Board}, solver::Solver};
//!
//!# use std::error::Error;
//!# fn main() -> Result<(), Box<dyn Error>> {
//! let mut solver = Solver::new(Board::from_moves("1425")?);
//! let (score, best_move) = solver.evaluate();
//!
//! assert!((score, best_move) == (1, Some(Action::new(0, 2))));
//!# Ok(())
//!# }
//! ```

use static_assertions::*;
pub use anyhow;

pub mod error;

pub mod board;

pub mod solver;

pub mod analysis;

mod test;

pub use board::{Action, Board, Cell, Player};
pub use error::EngineError;
pub use solver::{minimax, Solver};

/// The width and height of the game board in cells
pub const SIZE: usize = 3;

/// The number of cells on the game board
pub const CELLS: usize = SIZE * SIZE;

// cell numbers 1-9 are entered and parsed as single digits
const_assert!(CELLS <= 9);

/// Returns the all-empty board that every game starts from
pub fn initial_state() -> Board {
    Board::initial_state()
}
