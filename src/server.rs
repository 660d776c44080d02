use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tokio::sync::Notify;
use tower_http::cors::CorsLayer;

use crate::api_handlers::*;
use crate::config::ServerConfig;
use crate::dice::{DiceRoller, RandomDice};
use crate::logging::{log_error, log_error_stderr, log_info};
use crate::news::NewsClient;
use crate::snakeladder::SnakeLadderState;
use crate::store::{GameStore, JsonFileStore, MemoryStore};
use crate::sudoku::SudokuState;
use crate::tictactoe::TicTacToeState;

pub struct AppState {
    pub store: Arc<dyn GameStore>,
    pub news: NewsClient,
    pub dice: Arc<dyn DiceRoller>,
    pub config: ServerConfig,
}

impl AppState {
    pub fn new(
        config: ServerConfig,
        store: Arc<dyn GameStore>,
        dice: Arc<dyn DiceRoller>,
    ) -> Result<Self, reqwest::Error> {
        let news = NewsClient::from_config(&config)?;
        Ok(Self {
            store,
            news,
            dice,
            config,
        })
    }

    /// Memory-backed state with the given dice
    pub fn in_memory(config: ServerConfig, dice: Arc<dyn DiceRoller>) -> Result<Self, reqwest::Error> {
        Self::new(config, Arc::new(MemoryStore::new()), dice)
    }

    /// Store picked from `store_dir`, thread-RNG dice
    pub fn from_config(config: ServerConfig) -> Result<Self, reqwest::Error> {
        let store: Arc<dyn GameStore> = match &config.store_dir {
            Some(dir) => {
                log_info(&format!("Persisting games as JSON documents under {}", dir.display()));
                Arc::new(JsonFileStore::new(dir))
            }
            None => {
                log_info("Persisting games in memory");
                Arc::new(MemoryStore::new())
            }
        };
        Self::new(config, store, Arc::new(RandomDice))
    }
}

pub fn build_router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/", get(handle_root))
        .route("/api/news", post(handle_news))
        // Tic-Tac-Toe
        .route("/api/games/tictactoe/new", post(handle_tictactoe_new))
        .route("/api/games/tictactoe/{game_id}", get(handle_get_game::<TicTacToeState>))
        .route("/api/games/tictactoe/{game_id}/move", post(handle_tictactoe_move))
        // Sudoku
        .route("/api/games/sudoku/new", post(handle_sudoku_new))
        .route("/api/games/sudoku/{game_id}", get(handle_get_game::<SudokuState>))
        .route("/api/games/sudoku/{game_id}/move", post(handle_sudoku_move))
        // Snakes & Ladders
        .route("/api/games/snakeladder/new", post(handle_snakeladder_new))
        .route("/api/games/snakeladder/{game_id}", get(handle_get_game::<SnakeLadderState>))
        .route("/api/games/snakeladder/{game_id}/roll", post(handle_snakeladder_roll))
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}

/// Bind the listener and serve in the background until `shutdown` is notified.
pub async fn start_server(
    app_state: Arc<AppState>,
) -> Result<(tokio::task::JoinHandle<()>, Arc<Notify>, SocketAddr), std::io::Error> {
    let addr = app_state.config.bind_address();

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            log_error_stderr(&format!("Failed to start API server on {addr}: {e}"));
            return Err(e);
        }
    };
    let local_addr = listener.local_addr()?;

    let shutdown_signal = Arc::new(Notify::new());
    let shutdown_wait = Arc::clone(&shutdown_signal);
    let app = build_router(app_state);

    let handle = tokio::spawn(async move {
        log_info(&format!("Server starting on {local_addr}"));

        let shutdown = async move { shutdown_wait.notified().await };
        if let Err(err) = axum::serve(listener, app).with_graceful_shutdown(shutdown).await {
            log_error(&format!("Server error: {err:?}"));
        }

        log_info("Server shutdown complete");
    });

    Ok((handle, shutdown_signal, local_addr))
}
