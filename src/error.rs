//! Errors raised by the game engine

use derive_more::{Display, Error};

use crate::board::Action;

/// Failures of the engine's board operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum EngineError {
    /// The action is off the board, targets an occupied cell, or the game is over
    #[display("Invalid move {action}, the cell is not free to play")]
    InvalidMove { action: Action },

    /// Utility was requested for a board whose game is still in progress
    #[display("Utility is undefined for a board that is still in play")]
    NonTerminal,

    /// The mark counts cannot come from alternating turns with X first
    #[display("Invalid position, {x} X marks against {o} O marks")]
    Malformed { x: usize, o: usize },
}
