//! Error types for roster edits and the presentation port.

use thiserror::Error;

/// Errors that can occur while editing a [`Roster`](crate::Roster).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RosterError {
    /// Player not found.
    #[error("player not found")]
    PlayerNotFound,
    /// Removing the player would leave fewer than two players.
    #[error("a roster needs at least two players")]
    Underflow,
}

/// Errors reported by the bundled [`ChannelPort`](crate::ChannelPort).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PortError {
    /// No render is currently waiting for an action.
    #[error("no render is waiting for an action")]
    NoListener,
    /// The host side of the port has been closed.
    #[error("presentation port disconnected")]
    Disconnected,
}
