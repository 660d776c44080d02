// src/tictactoe.rs
// Tic-Tac-Toe engine: single shared board, X always opens.

use serde::{Deserialize, Serialize};

use crate::defs::{TICTACTOE_CELLS, WIN_LINES};
use crate::game::GameError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    pub fn other(self) -> Self {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }
}

/// A board cell, serialized as `""`, `"X"` or `"O"`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    #[serde(rename = "")]
    Empty,
    X,
    O,
}

impl From<Mark> for Cell {
    fn from(mark: Mark) -> Self {
        match mark {
            Mark::X => Cell::X,
            Mark::O => Cell::O,
        }
    }
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        *self == Cell::Empty
    }

    fn mark(&self) -> Option<Mark> {
        match self {
            Cell::Empty => None,
            Cell::X => Some(Mark::X),
            Cell::O => Some(Mark::O),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Winner {
    X,
    O,
    #[serde(rename = "tie")]
    Tie,
}

impl From<Mark> for Winner {
    fn from(mark: Mark) -> Self {
        match mark {
            Mark::X => Winner::X,
            Mark::O => Winner::O,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicTacToeState {
    pub board: [Cell; TICTACTOE_CELLS],
    pub current_player: Mark,
    pub winner: Option<Winner>,
    pub game_over: bool,
}

impl Default for TicTacToeState {
    fn default() -> Self {
        Self::new()
    }
}

impl TicTacToeState {
    pub fn new() -> Self {
        Self {
            board: [Cell::Empty; TICTACTOE_CELLS],
            current_player: Mark::X,
            winner: None,
            game_over: false,
        }
    }

    /// Place the current player's mark at `position` (0..=8) and return the next state.
    pub fn apply_move(&self, position: usize) -> Result<Self, GameError> {
        if self.game_over {
            return Err(GameError::InvalidMove("game is over".to_string()));
        }
        let Some(cell) = self.board.get(position) else {
            return Err(GameError::InvalidMove(format!("position {position} is off the board")));
        };
        if !cell.is_empty() {
            return Err(GameError::InvalidMove(format!("position {position} is already taken")));
        }

        let mut next = self.clone();
        next.board[position] = next.current_player.into();

        if let Some(mark) = next.line_winner() {
            next.winner = Some(mark.into());
            next.game_over = true;
        } else if next.board.iter().all(|cell| !cell.is_empty()) {
            next.winner = Some(Winner::Tie);
            next.game_over = true;
        } else {
            next.current_player = next.current_player.other();
        }

        Ok(next)
    }

    // First completed line wins; a legal game can only ever complete lines of one mark
    fn line_winner(&self) -> Option<Mark> {
        WIN_LINES.iter().find_map(|&[a, b, c]| {
            let first = self.board[a];
            if first == self.board[b] && first == self.board[c] {
                first.mark()
            } else {
                None
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn play(moves: &[usize]) -> Result<TicTacToeState, GameError> {
        moves
            .iter()
            .try_fold(TicTacToeState::new(), |state, &position| state.apply_move(position))
    }

    #[test]
    fn test_new_game() {
        let state = TicTacToeState::new();
        assert!(state.board.iter().all(Cell::is_empty));
        assert_eq!(state.current_player, Mark::X);
        assert_eq!(state.winner, None);
        assert!(!state.game_over);
    }

    #[test]
    fn test_move_toggles_player() {
        let state = TicTacToeState::new().apply_move(4).unwrap();
        assert_eq!(state.board[4], Cell::X);
        assert_eq!(state.current_player, Mark::O);

        let state = state.apply_move(0).unwrap();
        assert_eq!(state.board[0], Cell::O);
        assert_eq!(state.current_player, Mark::X);
    }

    #[test]
    fn test_top_row_win() {
        let state = play(&[0, 4, 1, 3, 2]).unwrap();
        assert_eq!(state.winner, Some(Winner::X));
        assert!(state.game_over);
        // Winner keeps the turn marker
        assert_eq!(state.current_player, Mark::X);
    }

    #[test]
    fn test_column_and_diagonal_wins_for_o() {
        // O takes the middle column
        let state = play(&[0, 1, 2, 4, 3, 7]).unwrap();
        assert_eq!(state.winner, Some(Winner::O));

        // X takes the anti-diagonal
        let state = play(&[2, 0, 4, 1, 6]).unwrap();
        assert_eq!(state.winner, Some(Winner::X));
    }

    #[test]
    fn test_tie() {
        let state = play(&[0, 1, 2, 4, 3, 5, 7, 6, 8]).unwrap();
        assert_eq!(state.winner, Some(Winner::Tie));
        assert!(state.game_over);
    }

    #[test]
    fn test_win_on_last_cell_is_not_a_tie() {
        // X fills the final cell and completes the left column
        let state = play(&[0, 1, 3, 4, 2, 5, 7, 8, 6]).unwrap();
        assert_eq!(state.winner, Some(Winner::X));
        assert!(state.game_over);
    }

    #[test]
    fn test_occupied_cell_rejected() {
        let state = TicTacToeState::new().apply_move(0).unwrap();
        assert!(matches!(state.apply_move(0), Err(GameError::InvalidMove(_))));
        // Rejected move leaves the input untouched
        assert_eq!(state.board[0], Cell::X);
        assert_eq!(state.current_player, Mark::O);
    }

    #[test]
    fn test_move_after_game_over_rejected() {
        let state = play(&[0, 4, 1, 3, 2]).unwrap();
        assert!(matches!(state.apply_move(8), Err(GameError::InvalidMove(_))));
    }

    #[test]
    fn test_out_of_range_position_rejected() {
        assert!(matches!(
            TicTacToeState::new().apply_move(9),
            Err(GameError::InvalidMove(_))
        ));
    }

    #[test]
    fn test_cells_are_write_once() {
        let moves = [4, 0, 8, 2, 1, 7, 6, 3, 5];
        let mut state = TicTacToeState::new();
        for &position in &moves {
            let before = state.board;
            match state.apply_move(position) {
                Ok(next) => {
                    for (index, cell) in before.iter().enumerate() {
                        if !cell.is_empty() {
                            assert_eq!(next.board[index], *cell);
                        }
                    }
                    state = next;
                }
                Err(_) => break,
            }
        }
        assert!(state.game_over);
    }

    #[test]
    fn test_json_shape() {
        let state = play(&[0, 4]).unwrap();
        let value = serde_json::to_value(&state).unwrap();
        assert_eq!(value["board"][0], "X");
        assert_eq!(value["board"][4], "O");
        assert_eq!(value["board"][1], "");
        assert_eq!(value["currentPlayer"], "X");
        assert!(value["winner"].is_null());
        assert_eq!(value["gameOver"], false);

        let tie = play(&[0, 1, 2, 4, 3, 5, 7, 6, 8]).unwrap();
        assert_eq!(serde_json::to_value(&tie).unwrap()["winner"], "tie");
    }
}
