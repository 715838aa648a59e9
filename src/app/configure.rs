//! Player setup before a game.

use alloc::string::String;

use crate::error::RosterError;
use crate::player::Player;
use crate::roster::Roster;

/// Actions available while configuring players.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigureAction {
    /// Add a player at the end of the roster.
    Add(Player),
    /// Remove a player.
    Remove(Player),
    /// Rename a player.
    Rename {
        /// The player to rename.
        player: Player,
        /// The new name.
        name: String,
    },
    /// Confirm the roster and start the game.
    Next,
}

/// Result of feeding an action to the roster editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigureStep {
    /// Keep editing.
    Stay(Roster),
    /// Start a game with this roster.
    Confirm(Roster),
}

fn log_rejected(result: Result<(), RosterError>, action: &str) {
    if let Err(err) = result {
        tracing::debug!(%err, action, "roster edit rejected");
    }
}

/// Applies a configure action to a roster.
///
/// Rejected edits (removing below two players, unknown players) leave the
/// roster unchanged.
#[must_use]
pub fn process(mut roster: Roster, action: ConfigureAction) -> ConfigureStep {
    match action {
        ConfigureAction::Add(player) => roster.add(player),
        ConfigureAction::Remove(player) => log_rejected(roster.remove(&player), "remove"),
        ConfigureAction::Rename { player, name } => {
            log_rejected(roster.rename(&player, name), "rename");
        }
        ConfigureAction::Next => return ConfigureStep::Confirm(roster),
    }
    ConfigureStep::Stay(roster)
}
