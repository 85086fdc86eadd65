use std::sync::Arc;

use parking_lot::Mutex;
use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::Serialize;

pub const DECK_SIZE: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Character {
    Cat,
    Defuse,
    Shuffle,
    Exploding,
}

impl Character {
    pub const ALL: [Character; 4] = [
        Character::Cat,
        Character::Defuse,
        Character::Shuffle,
        Character::Exploding,
    ];
}

pub type ArcDeckGenerator = Arc<DeckGenerator>;

/// Draws decks from an owned random source. Each card is picked uniformly
/// and independently, so duplicates are expected.
pub struct DeckGenerator {
    rng: Mutex<StdRng>,
}

impl DeckGenerator {
    pub fn new(rng: StdRng) -> Self {
        Self {
            rng: Mutex::new(rng),
        }
    }

    pub fn from_os_rng() -> Self {
        Self::new(StdRng::from_os_rng())
    }

    pub fn generate_deck(&self) -> [Character; DECK_SIZE] {
        let mut rng = self.rng.lock();
        std::array::from_fn(|_| Character::ALL[rng.random_range(0..Character::ALL.len())])
    }
}
