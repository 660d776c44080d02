use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    Json as JsonExtractor,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::defs::SUDOKU_SIZE;
use crate::game::{GameError, GameState, GameType, PayloadState};
use crate::logging::{log_error, log_info, log_warning};
use crate::news::{NewsRequest, NewsResponse};
use crate::server::AppState;
use crate::snakeladder::SnakeLadderState;
use crate::store::StoreError;
use crate::sudoku::SudokuState;
use crate::tictactoe::TicTacToeState;

// Response structures for JSON serialization
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGameResponse<S> {
    pub game_id: String,
    pub state: S,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StateResponse<S> {
    pub state: S,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameView {
    pub game_id: String,
    pub game_type: GameType,
    pub state: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

// Move fields are read as plain integers so that negative or oversized values
// come back as a 400 from the engine checks instead of an extractor rejection.
#[derive(Debug, Clone, Deserialize)]
pub struct TicTacToeMove {
    pub position: i64,
}

impl TicTacToeMove {
    fn board_position(&self) -> Result<usize, GameError> {
        usize::try_from(self.position)
            .map_err(|_| GameError::InvalidMove(format!("position {} is off the board", self.position)))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SudokuMove {
    pub row: i64,
    pub col: i64,
    pub value: i64,
}

impl SudokuMove {
    fn cell(&self) -> Result<(usize, usize, u8), GameError> {
        let (Ok(row), Ok(col)) = (usize::try_from(self.row), usize::try_from(self.col)) else {
            return Err(GameError::InvalidMove(format!("cell ({}, {}) is off the grid", self.row, self.col)));
        };
        let value = u8::try_from(self.value)
            .map_err(|_| GameError::InvalidMove(format!("value {} is out of range 0-{SUDOKU_SIZE}", self.value)))?;
        Ok((row, col, value))
    }
}

// Custom error type for handlers
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let error_response = ErrorResponse {
            error: self.message,
        };
        (self.status, Json(error_response)).into_response()
    }
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { .. } => ApiError::new(StatusCode::NOT_FOUND, "Game not found"),
            other => {
                log_error(&format!("Game store failure: {other}"));
                ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        }
    }
}

impl From<GameError> for ApiError {
    fn from(err: GameError) -> Self {
        ApiError::new(StatusCode::BAD_REQUEST, err.to_string())
    }
}

// Create and persist a fresh game of type S
fn create_game<S: PayloadState>(app_state: &Arc<AppState>, state: S) -> Result<NewGameResponse<S>, ApiError> {
    let game = GameState::new(state.clone().into_payload());
    let info = game.game_info();
    let game_id = app_state.store.create(game)?;
    log_info(&format!("Created new game instance: {info}"));
    Ok(NewGameResponse { game_id, state })
}

// Load, transition and store back. Not atomic: concurrent moves on one game race.
fn apply_to_game<S, F>(app_state: &Arc<AppState>, game_id: &str, transition: F) -> Result<S, ApiError>
where
    S: PayloadState,
    F: FnOnce(&S) -> Result<S, GameError>,
{
    let game = app_state.store.get(S::GAME_TYPE, game_id)?;
    let current = S::from_payload(game.payload).ok_or_else(|| {
        log_error(&format!("Stored game '{game_id}' does not hold {} state", S::GAME_TYPE));
        ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    })?;

    let next = match transition(&current) {
        Ok(next) => next,
        Err(e) => {
            log_warning(&format!("Rejected {} move on game '{game_id}': {e}", S::GAME_TYPE));
            return Err(e.into());
        }
    };

    app_state.store.update(game_id, next.clone().into_payload())?;
    Ok(next)
}

pub async fn handle_root() -> Json<serde_json::Value> {
    Json(json!({ "message": "gamenews API is running" }))
}

pub async fn handle_news(
    State(app_state): State<Arc<AppState>>,
    JsonExtractor(request): JsonExtractor<NewsRequest>,
) -> Json<NewsResponse> {
    log_info(&format!("News request: category='{}', language='{}'", request.category, request.language));
    let response = app_state.news.fetch_news(&request.category, &request.language).await;
    log_info(&format!("News response: {} articles, status {:?}", response.articles.len(), response.status));
    Json(response)
}

pub async fn handle_tictactoe_new(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<NewGameResponse<TicTacToeState>>, ApiError> {
    create_game(&app_state, TicTacToeState::new()).map(Json)
}

pub async fn handle_tictactoe_move(
    State(app_state): State<Arc<AppState>>,
    Path(game_id): Path<String>,
    JsonExtractor(request): JsonExtractor<TicTacToeMove>,
) -> Result<Json<StateResponse<TicTacToeState>>, ApiError> {
    log_info(&format!("Tic-Tac-Toe move on game '{game_id}': position {}", request.position));
    let state = apply_to_game(&app_state, &game_id, |state: &TicTacToeState| {
        state.apply_move(request.board_position()?)
    })?;
    Ok(Json(StateResponse { state }))
}

pub async fn handle_sudoku_new(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<NewGameResponse<SudokuState>>, ApiError> {
    create_game(&app_state, SudokuState::new()).map(Json)
}

pub async fn handle_sudoku_move(
    State(app_state): State<Arc<AppState>>,
    Path(game_id): Path<String>,
    JsonExtractor(request): JsonExtractor<SudokuMove>,
) -> Result<Json<StateResponse<SudokuState>>, ApiError> {
    log_info(&format!(
        "Sudoku move on game '{game_id}': ({}, {}) = {}",
        request.row, request.col, request.value
    ));
    let state = apply_to_game(&app_state, &game_id, |state: &SudokuState| {
        let (row, col, value) = request.cell()?;
        state.apply_move(row, col, value)
    })?;
    Ok(Json(StateResponse { state }))
}

pub async fn handle_snakeladder_new(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<NewGameResponse<SnakeLadderState>>, ApiError> {
    create_game(&app_state, SnakeLadderState::new()).map(Json)
}

pub async fn handle_snakeladder_roll(
    State(app_state): State<Arc<AppState>>,
    Path(game_id): Path<String>,
) -> Result<Json<StateResponse<SnakeLadderState>>, ApiError> {
    log_info(&format!("Snakes & Ladders roll on game '{game_id}'"));
    let state = apply_to_game(&app_state, &game_id, |state: &SnakeLadderState| {
        state.roll_dice(&*app_state.dice)
    })?;
    log_info(&format!(
        "Game '{game_id}' rolled {} -> square {}{}",
        state.last_roll,
        state.player_position,
        if state.game_won { " (won)" } else { "" }
    ));
    Ok(Json(StateResponse { state }))
}

/// Read-only view of a stored game of type S
pub async fn handle_get_game<S: PayloadState>(
    State(app_state): State<Arc<AppState>>,
    Path(game_id): Path<String>,
) -> Result<Json<GameView>, ApiError> {
    let game = app_state.store.get(S::GAME_TYPE, &game_id)?;
    Ok(Json(GameView {
        state: game.payload.to_json(),
        game_type: game.game_type(),
        game_id: game.id,
        created_at: game.created_at,
    }))
}
