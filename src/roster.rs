//! The roster of players taking part in the next game.

use alloc::string::String;
use alloc::vec::Vec;

use crate::error::RosterError;
use crate::options::GameOptions;
use crate::player::Player;

/// An ordered list of at least two players.
///
/// The first two players are kept in dedicated head slots so the two-player
/// minimum holds by construction. Removing a head promotes the first of the
/// remaining players into the freed slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roster {
    first: Player,
    second: Player,
    others: Vec<Player>,
}

impl Roster {
    /// Creates a roster with two players.
    #[must_use]
    pub const fn new(first: Player, second: Player) -> Self {
        Self {
            first,
            second,
            others: Vec::new(),
        }
    }

    /// Creates the starting roster configured in `options`.
    #[must_use]
    pub fn from_options(options: &GameOptions) -> Self {
        let (first, second) = &options.default_players;
        Self::new(Player::new(first.clone()), Player::new(second.clone()))
    }

    /// Adds a player at the end of the roster.
    pub fn add(&mut self, player: Player) {
        self.others.push(player);
    }

    /// Removes a player.
    ///
    /// # Errors
    ///
    /// Returns [`RosterError::Underflow`] if only two players are left and
    /// [`RosterError::PlayerNotFound`] if the player is not in the roster.
    pub fn remove(&mut self, player: &Player) -> Result<(), RosterError> {
        if self.others.is_empty() {
            return Err(RosterError::Underflow);
        }

        if self.first == *player {
            let promoted = self.others.remove(0);
            self.first = core::mem::replace(&mut self.second, promoted);
        } else if self.second == *player {
            self.second = self.others.remove(0);
        } else {
            let before = self.others.len();
            self.others.retain(|p| p != player);
            if self.others.len() == before {
                return Err(RosterError::PlayerNotFound);
            }
        }

        Ok(())
    }

    /// Renames a player in place, keeping its position.
    ///
    /// # Errors
    ///
    /// Returns [`RosterError::PlayerNotFound`] if the player is not in the
    /// roster.
    pub fn rename(&mut self, player: &Player, name: impl Into<String>) -> Result<(), RosterError> {
        let slot = self
            .players_mut()
            .find(|p| **p == *player)
            .ok_or(RosterError::PlayerNotFound)?;
        slot.name = name.into();
        Ok(())
    }

    /// Returns the number of players.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.others.len() + 2
    }

    /// Always `false`: a roster holds at least two players.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Returns whether the player is in the roster.
    #[must_use]
    pub fn contains(&self, player: &Player) -> bool {
        self.position(player).is_some()
    }

    /// Returns the player's position in turn order.
    #[must_use]
    pub fn position(&self, player: &Player) -> Option<usize> {
        self.players().position(|p| p == player)
    }

    /// Iterates over the players in turn order.
    pub fn players(&self) -> impl Iterator<Item = &Player> {
        [&self.first, &self.second]
            .into_iter()
            .chain(self.others.iter())
    }

    fn players_mut(&mut self) -> impl Iterator<Item = &mut Player> {
        [&mut self.first, &mut self.second]
            .into_iter()
            .chain(self.others.iter_mut())
    }

    /// Returns the players in turn order, ready to start a game.
    #[must_use]
    pub fn turn_queue(&self) -> Vec<Player> {
        self.players().cloned().collect()
    }
}
