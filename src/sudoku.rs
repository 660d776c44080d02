// src/sudoku.rs
// 4x4 Sudoku engine over a single fixed puzzle/solution pair.
//
// Wrong values are accepted and only counted in `errors`; the counter never
// goes down when a cell is corrected. A completed grid is not locked: further
// moves on blank cells are still applied and `completed` is recomputed.

use serde::{Deserialize, Serialize};

use crate::defs::{SUDOKU_PUZZLE, SUDOKU_SIZE, SUDOKU_SOLUTION, SudokuGrid};
use crate::game::GameError;

/// The puzzle/solution pair every new game starts from
pub fn new_game() -> (SudokuGrid, SudokuGrid) {
    (SUDOKU_PUZZLE, SUDOKU_SOLUTION)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SudokuState {
    pub puzzle: SudokuGrid,
    pub solution: SudokuGrid,
    pub current_grid: SudokuGrid,
    pub completed: bool,
    pub errors: u32,
}

impl Default for SudokuState {
    fn default() -> Self {
        Self::new()
    }
}

impl SudokuState {
    pub fn new() -> Self {
        let (puzzle, solution) = new_game();
        Self {
            puzzle,
            solution,
            current_grid: puzzle,
            completed: false,
            errors: 0,
        }
    }

    /// Write `value` (0 clears) into a blank cell of the puzzle.
    pub fn apply_move(&self, row: usize, col: usize, value: u8) -> Result<Self, GameError> {
        if row >= SUDOKU_SIZE || col >= SUDOKU_SIZE {
            return Err(GameError::InvalidMove(format!("cell ({row}, {col}) is off the grid")));
        }
        if value as usize > SUDOKU_SIZE {
            return Err(GameError::InvalidMove(format!("value {value} is out of range 0-{SUDOKU_SIZE}")));
        }
        if self.puzzle[row][col] != 0 {
            return Err(GameError::InvalidMove("cannot modify pre-filled cell".to_string()));
        }

        let mut next = self.clone();
        next.current_grid[row][col] = value;

        if value != 0 && value != next.solution[row][col] {
            next.errors += 1;
        }

        next.completed = next.current_grid == next.solution;
        Ok(next)
    }

    pub fn blank_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..SUDOKU_SIZE)
            .flat_map(|row| (0..SUDOKU_SIZE).map(move |col| (row, col)))
            .filter(|&(row, col)| self.puzzle[row][col] == 0)
    }
}
