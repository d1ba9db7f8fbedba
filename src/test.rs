#[cfg(test)]
pub mod test {
    use anyhow::{anyhow, Result};
    use indicatif::ProgressBar;

    use crate::analysis::Census;
    use crate::{initial_state, minimax, Action, Board, Cell, EngineError, Player, Solver};

    fn census() -> Census {
        Census::collect(&ProgressBar::hidden())
    }

    #[test]
    pub fn initial_board() -> Result<()> {
        let board = initial_state();

        assert!(board.cells().iter().all(|cell| *cell == Cell::Empty));
        assert_eq!(board, Board::default());
        assert_eq!(board.player(), Player::X);
        assert_eq!(board.actions().len(), 9);
        assert_eq!(board.winner(), None);
        assert!(!board.terminal());
        Ok(())
    }

    #[test]
    pub fn players_alternate() -> Result<()> {
        let mut board = initial_state();
        let mut expected = Player::X;

        // X takes the first free cell every turn, O the last
        while !board.terminal() {
            assert_eq!(board.player(), expected);
            let actions = board.actions();
            let action = match expected {
                Player::X => actions.iter().next(),
                Player::O => actions.iter().next_back(),
            }
            .copied()
            .ok_or_else(|| anyhow!("no actions on a board in play"))?;
            board = board.result(action)?;
            expected = expected.opponent();
        }
        Ok(())
    }

    #[test]
    pub fn actions_are_free_cells() -> Result<()> {
        let board = Board::from_grid("X.O/.X./O..")?;
        let expected: Vec<Action> = vec![
            Action::new(0, 1),
            Action::new(1, 0),
            Action::new(1, 2),
            Action::new(2, 1),
            Action::new(2, 2),
        ];

        assert_eq!(board.actions().into_iter().collect::<Vec<_>>(), expected);
        Ok(())
    }

    #[test]
    pub fn no_actions_when_over() -> Result<()> {
        let full = Board::from_grid("XOX/XOO/OXX")?;
        assert!(full.actions().is_empty());

        let won = Board::from_grid("XXX/OO./...")?;
        assert!(won.actions().is_empty());
        Ok(())
    }

    #[test]
    pub fn result_leaves_input_untouched() -> Result<()> {
        let board = Board::from_moves("15")?;
        let before = board;

        let next = board.result(Action::new(2, 2))?;

        assert_eq!(board, before);
        assert_eq!(board.cell(Action::new(2, 2)), Some(Cell::Empty));
        assert_eq!(next.cell(Action::new(2, 2)), Some(Cell::Mark(Player::X)));
        assert_eq!(next.num_moves(), board.num_moves() + 1);

        // siblings from the same parent don't see each other
        let sibling = board.result(Action::new(0, 1))?;
        assert_eq!(sibling.cell(Action::new(2, 2)), Some(Cell::Empty));
        Ok(())
    }

    #[test]
    pub fn result_rejects_illegal_moves() -> Result<()> {
        let board = Board::from_moves("5")?;

        for action in [Action::new(1, 1), Action::new(3, 0), Action::new(0, 3)] {
            assert_eq!(
                board.result(action),
                Err(EngineError::InvalidMove { action })
            );
        }

        // no move can be made once the game is won
        let won = Board::from_grid("XXX/OO./...")?;
        let action = Action::new(2, 2);
        assert_eq!(won.result(action), Err(EngineError::InvalidMove { action }));
        Ok(())
    }

    #[test]
    pub fn move_string_errors() -> Result<()> {
        let occupied = Board::from_moves("55").unwrap_err();
        assert_eq!(
            occupied.downcast_ref::<EngineError>(),
            Some(&EngineError::InvalidMove {
                action: Action::new(1, 1)
            })
        );

        assert!(Board::from_moves("1a").is_err());
        assert!(Board::from_moves("0").is_err());
        // X has already won with 1, 2, 3
        assert!(Board::from_moves("142536").is_err());
        Ok(())
    }

    #[test]
    pub fn grid_errors() -> Result<()> {
        let skewed = Board::from_grid("XX./.../...").unwrap_err();
        assert_eq!(
            skewed.downcast_ref::<EngineError>(),
            Some(&EngineError::Malformed { x: 2, o: 0 })
        );

        let o_first = Board::from_grid("O../.../...").unwrap_err();
        assert_eq!(
            o_first.downcast_ref::<EngineError>(),
            Some(&EngineError::Malformed { x: 0, o: 1 })
        );

        assert!(Board::from_grid("X../...").is_err());
        assert!(Board::from_grid("X?./.../...").is_err());
        Ok(())
    }

    #[test]
    pub fn grid_matches_move_string() -> Result<()> {
        let played = Board::from_moves("5137")?;
        let drawn = Board::from_grid(played.to_string())?;

        assert_eq!(played, drawn);
        assert_eq!(played.to_string(), "O.X\n.X.\nO..\n");
        Ok(())
    }

    #[test]
    pub fn win_detection() -> Result<()> {
        let board = Board::from_grid("XXX/OO./...")?;

        assert_eq!(board.winner(), Some(Player::X));
        assert!(board.terminal());
        assert_eq!(board.utility(), Ok(1));

        let column = Board::from_grid("OX./OX./.X.")?;
        assert_eq!(column.winner(), Some(Player::X));

        let diagonal = Board::from_grid("XXO/XO./O..")?;
        assert_eq!(diagonal.winner(), Some(Player::O));
        assert_eq!(diagonal.utility(), Ok(-1));
        Ok(())
    }

    #[test]
    pub fn full_board_draw() -> Result<()> {
        let board = Board::from_grid("XOX/XOO/OXX")?;

        assert_eq!(board.winner(), None);
        assert!(board.terminal());
        assert_eq!(board.utility(), Ok(0));
        Ok(())
    }

    #[test]
    pub fn utility_needs_finished_game() -> Result<()> {
        assert_eq!(initial_state().utility(), Err(EngineError::NonTerminal));
        assert_eq!(
            Board::from_moves("1234")?.utility(),
            Err(EngineError::NonTerminal)
        );
        Ok(())
    }

    #[test]
    pub fn double_line_reports_first() -> Result<()> {
        // not reachable in play, but the counts are consistent
        let rows = Board::from_grid("XXX/OOO/X..")?;
        assert_eq!(rows.winner(), Some(Player::X));
        assert!(rows.terminal());
        assert!(rows.actions().is_empty());
        assert_eq!(minimax(&rows), None);

        // column 0 is checked before column 2
        let crossing = Board::from_grid("XOO/XXO/X.O")?;
        assert_eq!(crossing.winner(), Some(Player::X));
        Ok(())
    }

    #[test]
    pub fn takes_immediate_win() -> Result<()> {
        let board = Board::from_grid("XX./OO./...")?;
        assert_eq!(board.player(), Player::X);

        let mut solver = Solver::new(board);
        assert_eq!(solver.num_moves(), 4);
        assert_eq!(solver.evaluate(), (1, Some(Action::new(0, 2))));
        // the winning move is tried first, so its siblings are never searched
        assert_eq!(solver.node_count, 2);
        Ok(())
    }

    #[test]
    pub fn takes_immediate_win_as_o() -> Result<()> {
        let board = Board::from_grid("XX./.O./O.X")?;
        assert_eq!(board.player(), Player::O);

        // (0, 2) is O's first move and completes the anti-diagonal
        let mut solver = Solver::new(board);
        assert_eq!(solver.evaluate(), (-1, Some(Action::new(0, 2))));
        assert_eq!(solver.node_count, 2);
        Ok(())
    }

    #[test]
    pub fn blocks_threat() -> Result<()> {
        let board = Board::from_grid("X../XO./...")?;
        assert_eq!(board.player(), Player::O);

        assert_eq!(minimax(&board), Some(Action::new(2, 0)));
        Ok(())
    }

    #[test]
    pub fn blocks_diagonal() -> Result<()> {
        let board = Board::from_grid("XOX/.X./O..")?;
        assert_eq!(board.player(), Player::O);

        // every other move lets X complete the main diagonal
        let mut solver = Solver::new(board);
        assert_eq!(solver.evaluate(), (0, Some(Action::new(2, 2))));
        Ok(())
    }

    #[test]
    pub fn finds_forced_win() -> Result<()> {
        // O answered the corner opening on an adjacent edge
        let board = Board::from_grid("XO./.../...")?;
        assert_eq!(board.player(), Player::X);

        let (score, best_move) = Solver::new(board).evaluate();
        assert_eq!(score, 1);

        let action = best_move.ok_or_else(|| anyhow!("no move found"))?;
        let (next_score, _) = Solver::new(board.result(action)?).evaluate();
        assert_eq!(next_score, 1);
        Ok(())
    }

    #[test]
    pub fn prefers_win_over_block() -> Result<()> {
        let board = Board::from_grid("X.X/.X./O.O")?;
        assert_eq!(board.player(), Player::O);

        // blocking row 0 at (0, 1) comes first, but completing row 2 wins outright
        let mut solver = Solver::new(board);
        assert_eq!(solver.evaluate(), (-1, Some(Action::new(2, 1))));
        Ok(())
    }

    #[test]
    pub fn perfect_play_draws() -> Result<()> {
        let mut board = initial_state();
        let mut moves = 0;

        while let Some(action) = minimax(&board) {
            board = board.result(action)?;
            moves += 1;
        }

        assert!(board.terminal());
        assert_eq!(board.utility(), Ok(0));
        assert_eq!(moves, 9);
        Ok(())
    }

    #[test]
    pub fn early_exit_saves_nodes() -> Result<()> {
        let mut solver = Solver::new(initial_state());
        let (score, best_move) = solver.evaluate();

        assert_eq!(score, 0);
        assert!(best_move.is_some());
        assert!(solver.node_count > 1);
        // the complete game tree has 549,946 nodes
        assert!(solver.node_count < 549_946);
        Ok(())
    }

    #[test]
    pub fn game_tree_census() -> Result<()> {
        let census = census();

        assert_eq!(census.nodes, 549_946);
        assert_eq!(census.distinct_positions(), 5_478);
        assert_eq!(census.games(), 255_168);
        assert_eq!(census.x_wins, 131_184);
        assert_eq!(census.o_wins, 77_904);
        assert_eq!(census.draws, 46_080);
        assert_eq!(census.value, 0);
        Ok(())
    }

    #[test]
    pub fn reachable_positions_are_well_formed() -> Result<()> {
        for board in census().positions() {
            let (x, o) = (board.count(Player::X), board.count(Player::O));
            assert!(x == o || x == o + 1, "bad counts on\n{}", board);
            assert_eq!(Board::from_grid(board.to_string())?, *board);
        }
        Ok(())
    }

    #[test]
    pub fn no_move_on_terminal_boards() -> Result<()> {
        let census = census();
        let terminal: Vec<&Board> = census.positions().filter(|b| b.terminal()).collect();
        assert!(!terminal.is_empty());

        for board in terminal {
            assert_eq!(minimax(board), None, "move found on\n{}", board);
            assert_eq!(Solver::new(*board).solve_parallel(), None);
            assert!(board.utility().is_ok());
        }
        Ok(())
    }

    #[test]
    pub fn optimal_moves_are_legal() -> Result<()> {
        for board in census().positions().filter(|b| !b.terminal()) {
            let action = minimax(board).ok_or_else(|| anyhow!("no move on\n{}", board))?;
            assert!(board.actions().contains(&action));

            // the chosen move keeps the value of the position
            let (score, _) = Solver::new(*board).evaluate();
            let (next_score, _) = Solver::new(board.result(action)?).evaluate();
            assert_eq!(score, next_score, "value changed after {} on\n{}", action, board);
        }
        Ok(())
    }

    #[test]
    pub fn parallel_matches_sequential() -> Result<()> {
        for board in census().positions().filter(|b| b.num_moves() >= 2) {
            let sequential = Solver::new(*board).evaluate();
            let parallel = Solver::new(*board).evaluate_parallel();
            assert_eq!(sequential, parallel, "mismatch on\n{}", board);
        }

        let mut solver = Solver::new(initial_state());
        assert_eq!(solver.solve_parallel(), minimax(&initial_state()));
        Ok(())
    }
}
