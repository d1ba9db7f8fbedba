use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use std::cmp::Ordering;
use std::io::{stdin, stdout, Write};
use std::time::Duration;

use tictactoe_ai::{analysis::Census, Player, Solver, CELLS};

mod game;
use game::*;

/// Play or analyse tic-tac-toe against a perfect opponent
#[derive(Parser, Debug)]
#[command(name = "tictactoe", version, about, long_about = None)]
struct Cli {
    /// Subcommand to run, a game against the computer if omitted
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Play a game in the terminal
    Play {
        /// Which side(s) the computer plays
        #[arg(long, value_enum, default_value_t = AiPlayers::O)]
        ai: AiPlayers,

        /// Search the computer's candidate moves in parallel
        #[arg(long)]
        parallel: bool,
    },

    /// Walk every legal game and print statistics about the game tree
    Census,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum AiPlayers {
    Neither,
    X,
    O,
    Both,
}

impl AiPlayers {
    fn controls(self, player: Player) -> bool {
        match (self, player) {
            (AiPlayers::Both, _) | (AiPlayers::X, Player::X) | (AiPlayers::O, Player::O) => true,
            _ => false,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Command::Play { ai, parallel }) => play(ai, parallel),
        Some(Command::Census) => census(),
        None => play(AiPlayers::O, false),
    }
}

fn play(ai_players: AiPlayers, parallel: bool) -> Result<()> {
    let mut game = Game::new();
    let stdin = stdin();

    println!("Welcome to Tic-tac-toe");

    // game loop
    loop {
        game.display()?;

        match game.state {
            GameState::Playing => {
                let player = game.board().player();
                let next_move =
                    // AI player
                    if ai_players.controls(player) {
                        println!("AI is thinking...");
                        stdout().flush()?;

                        // slow down play if both players are AI
                        if ai_players == AiPlayers::Both {
                            std::thread::sleep(Duration::from_secs(1));
                        }

                        let mut solver = Solver::new(*game.board());
                        let (score, best_move) = if parallel {
                            solver.evaluate_parallel()
                        } else {
                            solver.evaluate()
                        };

                        let winner = match score.cmp(&0) {
                            Ordering::Greater => Some(Player::X),
                            Ordering::Less => Some(Player::O),
                            Ordering::Equal => None,
                        };
                        match winner {
                            Some(winner) if winner == player => {
                                println!("{} can force a win.", player)
                            }
                            Some(_) => println!(
                                "{} can force a win, {} can only delay it.",
                                player.opponent(),
                                player
                            ),
                            None => println!("{} can at best force a draw.", player),
                        }

                        let best_move = best_move
                            .ok_or_else(|| anyhow!("no move found for a game in progress"))?;
                        println!("Best move: {}", best_move.cell_number());
                        best_move.cell_number()

                    // human player
                    } else {
                        print!("{} to move, cell 1-{} > ", player, CELLS);
                        stdout().flush()?;
                        let mut input_str = String::new();
                        if stdin.read_line(&mut input_str)? == 0 {
                            // input closed
                            return Ok(());
                        }

                        match input_str.trim().parse::<usize>() {
                            Err(_) => {
                                println!("Invalid number: {}", input_str.trim());
                                continue;
                            }
                            Ok(cell) => cell,
                        }
                    };

                if let Err(err) = game.play_checked(next_move) {
                    println!("{}", err);
                    // try the move again
                    continue;
                }
            }

            // end states
            GameState::XWin => {
                println!(
                    "X wins! {} moves: {}",
                    game.board().num_moves(),
                    game.moves
                );
                break;
            }
            GameState::OWin => {
                println!(
                    "O wins! {} moves: {}",
                    game.board().num_moves(),
                    game.moves
                );
                break;
            }
            GameState::Draw => {
                println!(
                    "Draw! {} moves: {}",
                    game.board().num_moves(),
                    game.moves
                );
                break;
            }
        }
    }
    Ok(())
}

fn census() -> Result<()> {
    let progress = ProgressBar::new(CELLS as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("Walking openings: {bar:40.cyan/blue} {pos}/{len} {msg}")
            .progress_chars("█▓▒░  "),
    );

    let census = Census::collect(&progress);

    println!("Game tree nodes:     {}", census.nodes);
    println!("Distinct positions:  {}", census.distinct_positions());
    println!("Finished games:      {}", census.games());
    println!("  won by X:          {}", census.x_wins);
    println!("  won by O:          {}", census.o_wins);
    println!("  drawn:             {}", census.draws);
    match census.value.cmp(&0) {
        Ordering::Greater => println!("Perfect play: X wins"),
        Ordering::Less => println!("Perfect play: O wins"),
        Ordering::Equal => println!("Perfect play: draw"),
    }
    Ok(())
}
