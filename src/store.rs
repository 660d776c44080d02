// src/store.rs
// Game document persistence. Lookups are keyed by id and game type together.
//
// Handlers do a plain get -> engine -> update, so two concurrent moves on the
// same game race and the last write wins. `compare_and_swap` is available for
// callers that want to detect that.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::game::{GamePayload, GameState, GameType};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    NotFound { game_type: GameType, id: String },
    Io(String),
    Serialization(String),
    Poisoned,
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::NotFound { game_type, id } => write!(f, "No {game_type} game with ID '{id}'"),
            StoreError::Io(e) => write!(f, "Store I/O error: {e}"),
            StoreError::Serialization(e) => write!(f, "Store serialization error: {e}"),
            StoreError::Poisoned => f.write_str("Store lock poisoned"),
        }
    }
}

impl std::error::Error for StoreError {}

pub trait GameStore: Send + Sync {
    /// Persist a new game and return its id
    fn create(&self, game: GameState) -> Result<String, StoreError>;

    /// Fetch a game; a game of another type under the same id counts as missing
    fn get(&self, game_type: GameType, id: &str) -> Result<GameState, StoreError>;

    /// Replace the state of an existing game of the payload's type
    fn update(&self, id: &str, payload: GamePayload) -> Result<(), StoreError>;

    /// Replace the state only if it still equals `expected`. Returns whether the swap happened.
    fn compare_and_swap(&self, id: &str, expected: &GamePayload, payload: GamePayload) -> Result<bool, StoreError>;
}

fn not_found(game_type: GameType, id: &str) -> StoreError {
    StoreError::NotFound {
        game_type,
        id: id.to_string(),
    }
}

/// In-process store, lost on restart
#[derive(Debug, Default)]
pub struct MemoryStore {
    games: Mutex<HashMap<String, GameState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.games.lock().map(|games| games.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl GameStore for MemoryStore {
    fn create(&self, game: GameState) -> Result<String, StoreError> {
        let mut games = self.games.lock().map_err(|_| StoreError::Poisoned)?;
        let id = game.id.clone();
        games.insert(id.clone(), game);
        Ok(id)
    }

    fn get(&self, game_type: GameType, id: &str) -> Result<GameState, StoreError> {
        let games = self.games.lock().map_err(|_| StoreError::Poisoned)?;
        games
            .get(id)
            .filter(|game| game.game_type() == game_type)
            .cloned()
            .ok_or_else(|| not_found(game_type, id))
    }

    fn update(&self, id: &str, payload: GamePayload) -> Result<(), StoreError> {
        let game_type = payload.game_type();
        let mut games = self.games.lock().map_err(|_| StoreError::Poisoned)?;
        match games.get_mut(id).filter(|game| game.game_type() == game_type) {
            Some(game) => {
                game.payload = payload;
                Ok(())
            }
            None => Err(not_found(game_type, id)),
        }
    }

    fn compare_and_swap(&self, id: &str, expected: &GamePayload, payload: GamePayload) -> Result<bool, StoreError> {
        let game_type = payload.game_type();
        let mut games = self.games.lock().map_err(|_| StoreError::Poisoned)?;
        match games.get_mut(id).filter(|game| game.game_type() == game_type) {
            Some(game) if game.payload == *expected => {
                game.payload = payload;
                Ok(true)
            }
            Some(_) => Ok(false),
            None => Err(not_found(game_type, id)),
        }
    }
}

/// One pretty-printed `<id>.json` document per game under a directory.
///
/// Calls do blocking `std::fs` I/O on the caller's thread. Documents are a few
/// hundred bytes, so handlers call it inline rather than through `spawn_blocking`.
#[derive(Debug)]
pub struct JsonFileStore {
    dir: PathBuf,
    // Serializes read-modify-write sequences within this process
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
        }
    }

    // Ids come from the URL; anything but a uuid-like token cannot name a document
    fn document_path(&self, id: &str) -> Option<PathBuf> {
        let valid = !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');
        valid.then(|| self.dir.join(format!("{id}.json")))
    }

    fn read(&self, game_type: GameType, id: &str) -> Result<GameState, StoreError> {
        let path = self.document_path(id).ok_or_else(|| not_found(game_type, id))?;
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Err(not_found(game_type, id)),
            Err(e) => return Err(StoreError::Io(format!("Failed to read {}: {e}", path.display()))),
        };
        let game: GameState = serde_json::from_str(&content)
            .map_err(|e| StoreError::Serialization(format!("Failed to parse {}: {e}", path.display())))?;

        if game.game_type() == game_type {
            Ok(game)
        } else {
            Err(not_found(game_type, id))
        }
    }

    fn write(&self, game: &GameState) -> Result<(), StoreError> {
        let path = self
            .document_path(&game.id)
            .ok_or_else(|| StoreError::Io(format!("Invalid game ID '{}'", game.id)))?;

        if let Err(e) = fs::create_dir_all(&self.dir) {
            return Err(StoreError::Io(format!("Failed to create directory {}: {e}", self.dir.display())));
        }

        let json_content = serde_json::to_string_pretty(game)
            .map_err(|e| StoreError::Serialization(format!("Failed to serialize game state: {e}")))?;

        // Readers take no lock, so they must only ever see a whole document
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, json_content)
            .map_err(|e| StoreError::Io(format!("Failed to write file {}: {e}", tmp_path.display())))?;
        fs::rename(&tmp_path, &path)
            .map_err(|e| StoreError::Io(format!("Failed to replace file {}: {e}", path.display())))
    }
}

impl GameStore for JsonFileStore {
    fn create(&self, game: GameState) -> Result<String, StoreError> {
        let _guard = self.write_lock.lock().map_err(|_| StoreError::Poisoned)?;
        self.write(&game)?;
        Ok(game.id)
    }

    fn get(&self, game_type: GameType, id: &str) -> Result<GameState, StoreError> {
        self.read(game_type, id)
    }

    fn update(&self, id: &str, payload: GamePayload) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().map_err(|_| StoreError::Poisoned)?;
        let mut game = self.read(payload.game_type(), id)?;
        game.payload = payload;
        self.write(&game)
    }

    fn compare_and_swap(&self, id: &str, expected: &GamePayload, payload: GamePayload) -> Result<bool, StoreError> {
        let _guard = self.write_lock.lock().map_err(|_| StoreError::Poisoned)?;
        let mut game = self.read(payload.game_type(), id)?;
        if game.payload != *expected {
            return Ok(false);
        }
        game.payload = payload;
        self.write(&game)?;
        Ok(true)
    }
}
