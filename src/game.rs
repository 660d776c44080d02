// src/game.rs
// Persisted game document and the per-game payload union shared by the store,
// the engines and the HTTP layer.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::snakeladder::SnakeLadderState;
use crate::sudoku::SudokuState;
use crate::tictactoe::TicTacToeState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameType {
    #[serde(rename = "tictactoe")]
    TicTacToe,
    #[serde(rename = "sudoku")]
    Sudoku,
    #[serde(rename = "snakeladder")]
    SnakeLadder,
}

impl GameType {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameType::TicTacToe => "tictactoe",
            GameType::Sudoku => "sudoku",
            GameType::SnakeLadder => "snakeladder",
        }
    }
}

impl fmt::Display for GameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tictactoe" => Ok(GameType::TicTacToe),
            "sudoku" => Ok(GameType::Sudoku),
            "snakeladder" => Ok(GameType::SnakeLadder),
            other => Err(format!("Unknown game type '{other}'")),
        }
    }
}

/// Game-specific state, one concrete shape per game type
#[derive(Debug, Clone, PartialEq)]
pub enum GamePayload {
    TicTacToe(TicTacToeState),
    Sudoku(SudokuState),
    SnakeLadder(SnakeLadderState),
}

impl GamePayload {
    pub fn game_type(&self) -> GameType {
        match self {
            GamePayload::TicTacToe(_) => GameType::TicTacToe,
            GamePayload::Sudoku(_) => GameType::Sudoku,
            GamePayload::SnakeLadder(_) => GameType::SnakeLadder,
        }
    }

    /// The bare `state` body as it appears in responses and documents
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            GamePayload::TicTacToe(state) => serde_json::to_value(state),
            GamePayload::Sudoku(state) => serde_json::to_value(state),
            GamePayload::SnakeLadder(state) => serde_json::to_value(state),
        }
        .unwrap_or(serde_json::Value::Null)
    }

    /// Fresh payload for a new game of the given type
    pub fn fresh(game_type: GameType) -> Self {
        match game_type {
            GameType::TicTacToe => GamePayload::TicTacToe(TicTacToeState::new()),
            GameType::Sudoku => GamePayload::Sudoku(SudokuState::new()),
            GameType::SnakeLadder => GamePayload::SnakeLadder(SnakeLadderState::new()),
        }
    }
}

/// Links an engine state to its `GamePayload` variant
pub trait PayloadState: Sized + Clone {
    const GAME_TYPE: GameType;

    fn from_payload(payload: GamePayload) -> Option<Self>;

    fn into_payload(self) -> GamePayload;
}

macro_rules! payload_state {
    ($state:ty, $variant:ident) => {
        impl PayloadState for $state {
            const GAME_TYPE: GameType = GameType::$variant;

            fn from_payload(payload: GamePayload) -> Option<Self> {
                match payload {
                    GamePayload::$variant(state) => Some(state),
                    _ => None,
                }
            }

            fn into_payload(self) -> GamePayload {
                GamePayload::$variant(self)
            }
        }
    };
}

payload_state!(TicTacToeState, TicTacToe);
payload_state!(SudokuState, Sudoku);
payload_state!(SnakeLadderState, SnakeLadder);

/// One persisted game instance: `{id, gameType, state, createdAt}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "GameDocument", try_from = "GameDocument")]
pub struct GameState {
    pub id: String,
    pub payload: GamePayload,
    pub created_at: DateTime<Utc>,
}

// Wire form of GameState; `state` is resolved against `gameType` on load.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GameDocument {
    id: String,
    game_type: GameType,
    state: serde_json::Value,
    created_at: DateTime<Utc>,
}

impl From<GameState> for GameDocument {
    fn from(game: GameState) -> Self {
        GameDocument {
            game_type: game.game_type(),
            state: game.payload.to_json(),
            id: game.id,
            created_at: game.created_at,
        }
    }
}

impl TryFrom<GameDocument> for GameState {
    type Error = String;

    fn try_from(doc: GameDocument) -> Result<Self, Self::Error> {
        let payload = match doc.game_type {
            GameType::TicTacToe => serde_json::from_value(doc.state).map(GamePayload::TicTacToe),
            GameType::Sudoku => serde_json::from_value(doc.state).map(GamePayload::Sudoku),
            GameType::SnakeLadder => serde_json::from_value(doc.state).map(GamePayload::SnakeLadder),
        }
        .map_err(|e| format!("Malformed {} state for game '{}': {e}", doc.game_type, doc.id))?;

        Ok(GameState {
            id: doc.id,
            payload,
            created_at: doc.created_at,
        })
    }
}

impl GameState {
    pub fn new(payload: GamePayload) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            payload,
            created_at: Utc::now(),
        }
    }

    pub fn game_type(&self) -> GameType {
        self.payload.game_type()
    }

    pub fn created_at_string(&self) -> String {
        self.created_at.format("%Y-%m-%d %H:%M:%S UTC").to_string()
    }

    pub fn game_info(&self) -> String {
        format!(
            "Game[id={}, type={}, created={}]",
            self.id,
            self.game_type(),
            self.created_at_string()
        )
    }
}

/// Rule violations reported by the engines
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    InvalidMove(String),
    AlreadyWon,
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::InvalidMove(reason) => write!(f, "Invalid move: {reason}"),
            GameError::AlreadyWon => f.write_str("Game already won"),
        }
    }
}

impl std::error::Error for GameError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_type_round_trip_names() {
        for game_type in [GameType::TicTacToe, GameType::Sudoku, GameType::SnakeLadder] {
            assert_eq!(game_type.as_str().parse::<GameType>(), Ok(game_type));
        }
        assert!("chess".parse::<GameType>().is_err());
    }

    #[test]
    fn test_new_game_state() {
        let game = GameState::new(GamePayload::fresh(GameType::Sudoku));
        assert_eq!(game.game_type(), GameType::Sudoku);
        assert_eq!(game.id.len(), 36); // hyphenated uuid
        assert!(game.created_at_string().ends_with("UTC"));
        assert!(game.game_info().contains("type=sudoku"));
    }

    #[test]
    fn test_unique_game_ids() {
        let game1 = GameState::new(GamePayload::fresh(GameType::TicTacToe));
        let game2 = GameState::new(GamePayload::fresh(GameType::TicTacToe));
        assert_ne!(game1.id, game2.id);
        assert_eq!(game1.payload, game2.payload);
    }

    #[test]
    fn test_persisted_record_shape() {
        let game = GameState::new(GamePayload::fresh(GameType::TicTacToe));
        let value = serde_json::to_value(&game).unwrap();

        assert_eq!(value["id"], game.id.as_str());
        assert_eq!(value["gameType"], "tictactoe");
        assert_eq!(value["state"]["currentPlayer"], "X");
        assert_eq!(value["state"]["gameOver"], false);
        assert!(value["createdAt"].is_string());

        let restored: GameState = serde_json::from_value(value).unwrap();
        assert_eq!(restored, game);
    }

    #[test]
    fn test_payload_tag_must_match_body() {
        let value = serde_json::json!({
            "id": "abc",
            "gameType": "sudoku",
            "state": { "board": ["", "", "", "", "", "", "", "", ""] },
            "createdAt": "2024-01-01T00:00:00Z"
        });
        assert!(serde_json::from_value::<GameState>(value).is_err());
    }

    #[test]
    fn test_payload_state_conversions() {
        let payload = SudokuState::new().into_payload();
        assert_eq!(payload.game_type(), <SudokuState as PayloadState>::GAME_TYPE);
        assert_eq!(SudokuState::from_payload(payload.clone()), Some(SudokuState::new()));
        assert_eq!(TicTacToeState::from_payload(payload), None);
    }

    #[test]
    fn test_game_error_display() {
        assert_eq!(GameError::AlreadyWon.to_string(), "Game already won");
        assert_eq!(
            GameError::InvalidMove("cell occupied".to_string()).to_string(),
            "Invalid move: cell occupied"
        );
    }
}
