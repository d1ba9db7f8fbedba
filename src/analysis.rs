//! Exhaustive enumeration of every legal game

use indicatif::ProgressBar;
use rayon::prelude::*;
use tracing::info;

use std::collections::HashSet;

use crate::board::{Action, Board, Player};
use crate::solver::Solver;

/// Tallies of the complete tic-tac-toe game tree
#[derive(Clone, Default, Debug)]
pub struct Census {
    /// Nodes in the game tree, counting the empty board
    pub nodes: usize,
    /// Finished games won by X
    pub x_wins: usize,
    /// Finished games won by O
    pub o_wins: usize,
    /// Finished games with a full board and no winner
    pub draws: usize,
    /// Score of the empty board under perfect play
    pub value: i32,
    positions: HashSet<Board>,
}

impl Census {
    /// Walks every legal game from the empty board
    ///
    /// Each opening move is walked on its own thread, and `progress` is
    /// advanced once per finished opening.
    pub fn collect(progress: &ProgressBar) -> Self {
        let root = Board::initial_state();
        let openings: Vec<Action> = root.actions().into_iter().collect();

        let subtrees: Vec<Census> = openings
            .into_par_iter()
            .map(|action| {
                let mut subtree = Census::default();
                subtree.walk(root.play(action));
                progress.inc(1);
                subtree
            })
            .collect();

        let mut census = Census::default();
        census.nodes = 1;
        census.positions.insert(root);
        for subtree in subtrees {
            census.merge(subtree);
        }
        census.value = Solver::new(root).evaluate().0;
        progress.finish_with_message("done");

        info!(
            nodes = census.nodes,
            positions = census.distinct_positions(),
            games = census.games(),
            "census complete"
        );
        census
    }

    fn walk(&mut self, board: Board) {
        self.nodes += 1;
        self.positions.insert(board);

        if board.terminal() {
            match board.winner() {
                Some(Player::X) => self.x_wins += 1,
                Some(Player::O) => self.o_wins += 1,
                None => self.draws += 1,
            }
            return;
        }

        for action in board.actions() {
            self.walk(board.play(action));
        }
    }

    fn merge(&mut self, other: Census) {
        self.nodes += other.nodes;
        self.x_wins += other.x_wins;
        self.o_wins += other.o_wins;
        self.draws += other.draws;
        self.positions.extend(other.positions);
    }

    /// The number of finished games
    pub fn games(&self) -> usize {
        self.x_wins + self.o_wins + self.draws
    }

    /// The number of different boards reachable in play
    pub fn distinct_positions(&self) -> usize {
        self.positions.len()
    }

    /// Every board reachable in play, in no particular order
    pub fn positions(&self) -> impl Iterator<Item = &Board> {
        self.positions.iter()
    }
}
