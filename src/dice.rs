// src/dice.rs
// Dice providers for the Snakes & Ladders roll endpoint. The server uses the
// thread RNG; tests inject a seeded or scripted source.

use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::defs::DICE_FACES;

pub trait DiceRoller: Send + Sync {
    /// A uniformly distributed face in 1..=6
    fn roll(&self) -> u8;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct RandomDice;

impl DiceRoller for RandomDice {
    fn roll(&self) -> u8 {
        rand::random_range(1..=DICE_FACES)
    }
}

/// Reproducible dice: the same seed yields the same sequence of rolls
#[derive(Debug)]
pub struct SeededDice {
    rng: Mutex<StdRng>,
}

impl SeededDice {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl DiceRoller for SeededDice {
    fn roll(&self) -> u8 {
        match self.rng.lock() {
            Ok(mut rng) => rng.random_range(1..=DICE_FACES),
            // A poisoned generator is still a valid generator
            Err(poisoned) => poisoned.into_inner().random_range(1..=DICE_FACES),
        }
    }
}

/// Replays a fixed sequence of faces, cycling when exhausted
#[derive(Debug)]
pub struct ScriptedDice {
    faces: Vec<u8>,
    next: Mutex<usize>,
}

impl ScriptedDice {
    pub fn new(faces: Vec<u8>) -> Self {
        let faces = faces
            .into_iter()
            .map(|face| face.clamp(1, DICE_FACES))
            .collect::<Vec<_>>();
        Self {
            faces,
            next: Mutex::new(0),
        }
    }
}

impl DiceRoller for ScriptedDice {
    fn roll(&self) -> u8 {
        if self.faces.is_empty() {
            return 1;
        }
        let mut next = match self.next.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let face = self.faces[*next % self.faces.len()];
        *next += 1;
        face
    }
}
