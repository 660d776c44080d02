// lib.rs
// Library modules for the gamenews server

pub mod defs;
pub mod logging;
pub mod config;
pub mod game;
pub mod tictactoe;
pub mod sudoku;
pub mod dice;
pub mod snakeladder;
pub mod store;
pub mod news;
pub mod api_handlers;
pub mod server;
