//! An agent to solve the game of tic-tac-toe

use rayon::prelude::*;
use tracing::debug;

use crate::board::{Action, Board, Player};

/// The score of a position won by O
pub const MIN_SCORE: i32 = -1;
/// The score of a position won by X
pub const MAX_SCORE: i32 = 1;

/// An agent to solve tic-tac-toe positions
///
/// # Notes
/// This agent runs a plain minimax search over the full game tree. X is the
/// maximizing player and O the minimizing one. The search over a position's
/// moves stops as soon as one reaches the best score the mover could ever get,
/// otherwise every move is examined and the first one with the best score is kept.
///
/// # Position Scoring
/// Scores are from X's point of view: 1 if X can force a win, -1 if O can
/// force a win and 0 if perfect play ends in a draw
#[derive(Clone)]
pub struct Solver {
    board: Board,

    /// The number of nodes searched by this `Solver` so far (for diagnostics only)
    pub node_count: usize,
}

impl Solver {
    /// Creates a new `Solver` for a position
    pub fn new(board: Board) -> Self {
        Self {
            board,
            node_count: 0,
        }
    }

    /// Returns the optimal action for the player to move, or `None` if the game is over
    pub fn solve(&mut self) -> Option<Action> {
        if self.board.terminal() {
            return None;
        }
        self.evaluate().1
    }

    /// Returns the optimal action, evaluating the moves of this position in parallel
    pub fn solve_parallel(&mut self) -> Option<Action> {
        if self.board.terminal() {
            return None;
        }
        self.evaluate_parallel().1
    }

    /// Calculates the score of the position and the best move for the player to move
    pub fn evaluate(&mut self) -> (i32, Option<Action>) {
        let board = self.board;
        let (score, best_move) = match board.player() {
            Player::X => self.max_search(&board),
            Player::O => self.min_search(&board),
        };
        debug!(score, ?best_move, nodes = self.node_count, "search complete");
        (score, best_move)
    }

    /// Same as [`evaluate`](Self::evaluate), but every move of this position is
    /// searched on its own thread
    ///
    /// The chosen move is the one `evaluate` would pick: moves are compared in
    /// the same order and only a strictly better score replaces the current best.
    pub fn evaluate_parallel(&mut self) -> (i32, Option<Action>) {
        let board = self.board;
        self.node_count += 1;
        if board.terminal() {
            return (board.score(), None);
        }

        let maximizing = board.player() == Player::X;
        let moves: Vec<Action> = board.actions().into_iter().collect();
        let scored: Vec<(Action, i32, usize)> = moves
            .par_iter()
            .map(|&action| {
                let child = board.play(action);
                let mut next = Solver::new(child);
                let (score, _) = if maximizing {
                    next.min_search(&child)
                } else {
                    next.max_search(&child)
                };
                (action, score, next.node_count)
            })
            .collect();

        let mut best_score = if maximizing { i32::MIN } else { i32::MAX };
        let mut best_move = None;
        for (action, score, nodes) in scored {
            self.node_count += nodes;
            let improved = if maximizing {
                score > best_score
            } else {
                score < best_score
            };
            if improved {
                best_score = score;
                best_move = Some(action);
            }
        }
        debug!(
            score = best_score,
            ?best_move,
            nodes = self.node_count,
            "parallel search complete"
        );
        (best_score, best_move)
    }

    /// Searches a position with X to move
    ///
    /// Returns the best score X can force and the move that forces it
    fn max_search(&mut self, board: &Board) -> (i32, Option<Action>) {
        self.node_count += 1;

        if board.terminal() {
            return (board.score(), None);
        }

        let mut best_score = i32::MIN;
        let mut best_move = None;
        for action in board.actions() {
            let (score, _) = self.min_search(&board.play(action));
            if score > best_score {
                best_score = score;
                best_move = Some(action);
                // nothing beats a win, skip the remaining moves
                if best_score == MAX_SCORE {
                    break;
                }
            }
        }
        (best_score, best_move)
    }

    /// Searches a position with O to move
    ///
    /// Returns the best score O can force and the move that forces it
    fn min_search(&mut self, board: &Board) -> (i32, Option<Action>) {
        self.node_count += 1;

        if board.terminal() {
            return (board.score(), None);
        }

        let mut best_score = i32::MAX;
        let mut best_move = None;
        for action in board.actions() {
            let (score, _) = self.max_search(&board.play(action));
            if score < best_score {
                best_score = score;
                best_move = Some(action);
                if best_score == MIN_SCORE {
                    break;
                }
            }
        }
        (best_score, best_move)
    }
}

impl std::ops::Deref for Solver {
    type Target = Board;

    fn deref(&self) -> &Self::Target {
        &self.board
    }
}

/// Returns the optimal action for the player to move, or `None` if the game is over
pub fn minimax(board: &Board) -> Option<Action> {
    Solver::new(*board).solve()
}
