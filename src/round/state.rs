//! Round state types.

use alloc::vec::Vec;
use core::time::Duration;

use crate::player::Player;
use crate::tap::Tap;

/// A tap in the recorded sequence, together with the player who added it.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedTap {
    /// Player who added the tap.
    pub player: Player,
    /// Where the tap landed.
    pub tap: Tap,
}

/// State of a game in progress.
#[derive(Debug, Clone, PartialEq)]
pub enum RoundState {
    /// The player at the front of the queue adds one tap to the sequence.
    Adding {
        /// Turn order; the front player acts.
        queue: Vec<Player>,
        /// Taps everyone has to repeat.
        recorded: Vec<RecordedTap>,
        /// Always empty while adding.
        attempt: Vec<Tap>,
    },
    /// The player at the front of the queue repeats the recorded sequence.
    Repeating {
        /// Turn order; the front player acts.
        queue: Vec<Player>,
        /// Taps to repeat.
        recorded: Vec<RecordedTap>,
        /// Taps repeated so far.
        attempt: Vec<Tap>,
        /// Time allowed for the next tap.
        timeout: Duration,
    },
    /// A player missed a tap or ran out of time.
    GameOver {
        /// The player who lost.
        loser: Player,
        /// Everyone else, in turn order.
        others: Vec<Player>,
        /// The sequence at the time of the loss.
        recorded: Vec<RecordedTap>,
        /// The failed attempt, including a mistap if there was one.
        attempt: Vec<Tap>,
    },
}

/// Copyable tag naming a [`RoundState`] variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoundPhase {
    /// See [`RoundState::Adding`].
    Adding,
    /// See [`RoundState::Repeating`].
    Repeating,
    /// See [`RoundState::GameOver`].
    GameOver,
}

/// Actions that drive a round.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameAction {
    /// The active player tapped the play surface.
    Tap(Tap),
    /// The active player ran out of time.
    Timeout,
    /// Acknowledge the end of the game.
    Next,
}
