// src/snakeladder.rs
// Single-player Snakes & Ladders on a 100 square board.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::defs::{DICE_FACES, FINAL_SQUARE, LADDERS, SNAKES};
use crate::dice::DiceRoller;
use crate::game::GameError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnakeLadderState {
    pub player_position: u8,
    pub snakes: BTreeMap<u8, u8>,
    pub ladders: BTreeMap<u8, u8>,
    pub game_won: bool,
    pub last_roll: u8,
    pub moves: u32,
}

impl Default for SnakeLadderState {
    fn default() -> Self {
        Self::new()
    }
}

impl SnakeLadderState {
    pub fn new() -> Self {
        Self {
            player_position: 0,
            snakes: SNAKES.into_iter().collect(),
            ladders: LADDERS.into_iter().collect(),
            game_won: false,
            last_roll: 0,
            moves: 0,
        }
    }

    /// Roll the injected dice once and move.
    pub fn roll_dice(&self, dice: &dyn DiceRoller) -> Result<Self, GameError> {
        if self.game_won {
            return Err(GameError::AlreadyWon);
        }
        self.advance(dice.roll())
    }

    /// Move by an already rolled face.
    ///
    /// Reaching or passing the final square wins outright. Otherwise at most one
    /// snake or ladder is followed from the landing square, snakes first.
    pub fn advance(&self, roll: u8) -> Result<Self, GameError> {
        if self.game_won {
            return Err(GameError::AlreadyWon);
        }
        if !(1..=DICE_FACES).contains(&roll) {
            return Err(GameError::InvalidMove(format!("roll {roll} is not a die face")));
        }

        let mut next = self.clone();
        next.last_roll = roll;
        next.moves += 1;

        let candidate = u16::from(self.player_position) + u16::from(roll);
        if candidate >= u16::from(FINAL_SQUARE) {
            next.player_position = FINAL_SQUARE;
            next.game_won = true;
            return Ok(next);
        }

        let landing = candidate as u8;
        next.player_position = match (next.snakes.get(&landing), next.ladders.get(&landing)) {
            (Some(&tail), _) => tail,
            (None, Some(&top)) => top,
            (None, None) => landing,
        };

        Ok(next)
    }
}
