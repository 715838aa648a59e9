//! Players and generated player names.

use alloc::format;
use alloc::string::String;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::roster::Roster;

/// Attempts at a random suffix before falling back to a counter.
const RANDOM_ATTEMPTS: usize = 16;

/// A player, identified by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Player {
    /// Display name, also the player's identity.
    pub name: String,
}

impl Player {
    /// Creates a new player.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl core::fmt::Display for Player {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.name)
    }
}

/// Generates names for newly added players.
///
/// Names look like `"new player 417"` and never repeat a name already in the
/// roster they are generated for.
///
/// ```
/// use taprs::{GameOptions, NameGenerator, Roster};
///
/// let roster = Roster::from_options(&GameOptions::default());
/// let mut names = NameGenerator::new(7);
/// let player = names.next_for(&roster);
/// assert!(player.name.starts_with("new player "));
/// assert!(!roster.contains(&player));
/// ```
#[derive(Debug, Clone)]
pub struct NameGenerator {
    rng: ChaCha8Rng,
}

impl NameGenerator {
    /// Creates a generator with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Returns a player whose name is not taken in `roster`.
    pub fn next_for(&mut self, roster: &Roster) -> Player {
        for _ in 0..RANDOM_ATTEMPTS {
            let candidate = Player::new(format!(
                "new player {}",
                self.rng.random_range(1..=1000_u32)
            ));
            if !roster.contains(&candidate) {
                return candidate;
            }
        }

        (roster.len() + 1..)
            .map(|n| Player::new(format!("new player {n}")))
            .find(|candidate| !roster.contains(candidate))
            .unwrap_or_else(|| Player::new("new player"))
    }
}
