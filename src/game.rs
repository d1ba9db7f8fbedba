use anyhow::{anyhow, Result};
use crossterm::{
    style::{style, Attribute, Color, PrintStyledContent},
    QueueableCommand,
};

use std::io::{stdout, Write};

use tictactoe_ai::{Action, Board, Cell, Player, CELLS, SIZE};

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum GameState {
    Playing,
    XWin,
    OWin,
    Draw,
}

#[derive(Clone)]
pub struct Game {
    board: Board,
    pub moves: String,
    pub state: GameState,
}

impl Game {
    pub fn new() -> Self {
        Self {
            board: Board::initial_state(),
            moves: String::new(),
            state: GameState::Playing,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn play_checked(&mut self, cell_number: usize) -> Result<GameState> {
        let action = Action::from_cell_number(cell_number).ok_or_else(|| {
            anyhow!(
                "Invalid move, cell {} out of range. Cells must be between 1 and {}",
                cell_number,
                CELLS
            )
        })?;
        if self.board.cell(action) != Some(Cell::Empty) {
            return Err(anyhow!("Invalid move, cell {} taken", cell_number));
        }

        self.board = self.board.result(action)?;
        self.moves.push_str(&cell_number.to_string());

        self.state = match self.board.winner() {
            Some(Player::X) => GameState::XWin,
            Some(Player::O) => GameState::OWin,
            None if self.board.terminal() => GameState::Draw,
            None => GameState::Playing,
        };
        Ok(self.state)
    }

    pub fn display(&self) -> Result<()> {
        let mut stdout = stdout();

        stdout.queue(PrintStyledContent(style("\n".to_string())))?;
        for (idx, cell) in self.board.cells().iter().enumerate() {
            // free cells show the number used to play them
            let (symbol, color) = match cell {
                Cell::Mark(Player::X) => ("X".to_string(), Color::Red),
                Cell::Mark(Player::O) => ("O".to_string(), Color::Yellow),
                Cell::Empty => ((idx + 1).to_string(), Color::DarkGrey),
            };
            stdout.queue(PrintStyledContent(
                style(format!(" {} ", symbol))
                    .attribute(Attribute::Bold)
                    .on(Color::DarkBlue)
                    .with(color),
            ))?;
            if idx % SIZE == SIZE - 1 {
                stdout.queue(PrintStyledContent(style("\n".to_string())))?;
            }
        }
        stdout.flush()?;
        Ok(())
    }
}
