// src/defs.rs
// Fixed game and proxy constants shared by the engines and the news client.

pub const TICTACTOE_CELLS: usize = 9;

// Rows, columns and diagonals of the 3x3 board, by cell index
pub const WIN_LINES: [[usize; 3]; 8] = [
    [0, 1, 2], [3, 4, 5], [6, 7, 8], // rows
    [0, 3, 6], [1, 4, 7], [2, 5, 8], // columns
    [0, 4, 8], [2, 4, 6],            // diagonals
];

pub const SUDOKU_SIZE: usize = 4;

pub type SudokuGrid = [[u8; SUDOKU_SIZE]; SUDOKU_SIZE];

pub const SUDOKU_PUZZLE: SudokuGrid = [
    [1, 0, 3, 0],
    [0, 3, 0, 1],
    [3, 0, 1, 0],
    [0, 1, 0, 3],
];

pub const SUDOKU_SOLUTION: SudokuGrid = [
    [1, 2, 3, 4],
    [4, 3, 2, 1],
    [3, 4, 1, 2],
    [2, 1, 4, 3],
];

pub const FINAL_SQUARE: u8 = 100;
pub const DICE_FACES: u8 = 6;

// head -> tail
pub const SNAKES: [(u8, u8); 10] = [
    (16, 6), (47, 26), (49, 11), (56, 53), (62, 19),
    (64, 60), (87, 24), (93, 73), (95, 75), (98, 78),
];

// foot -> top
pub const LADDERS: [(u8, u8); 9] = [
    (1, 38), (4, 14), (9, 21), (21, 42), (28, 84),
    (36, 44), (51, 67), (71, 91), (80, 100),
];

// Frontend category -> provider category
pub const NEWS_CATEGORIES: [(&str, &str); 6] = [
    ("sports", "sports"),
    ("esports", "technology"),
    ("international", "world"),
    ("national", "domestic"),
    ("politics", "politics"),
    ("tech", "technology"),
];

pub const NEWS_FALLBACK_CATEGORY: &str = "general";
pub const NEWS_DEFAULT_LANGUAGE: &str = "en";
