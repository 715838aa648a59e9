//! Round engine: turn order, the recorded sequence, and tap verification.

use alloc::vec::Vec;

use crate::effect::Effects;
use crate::options::{GameOptions, MatchPolicy};
use crate::player::Player;
use crate::tap::Tap;

pub mod state;

pub use state::{GameAction, RecordedTap, RoundPhase, RoundState};

/// Result of feeding an action to a round.
#[derive(Debug, Clone, PartialEq)]
pub enum RoundStep {
    /// The game goes on in this state.
    Stay(RoundState),
    /// The game is over and acknowledged; control returns to the menu.
    Exit,
}

fn game_over(queue: Vec<Player>, recorded: Vec<RecordedTap>, attempt: Vec<Tap>) -> RoundState {
    let mut players = queue.into_iter();
    match players.next() {
        Some(loser) => {
            tracing::info!(
                loser = %loser,
                sequence = recorded.len(),
                repeated = attempt.len(),
                "game over"
            );
            RoundState::GameOver {
                loser,
                others: players.collect(),
                recorded,
                attempt,
            }
        }
        // Queues built from a roster are never empty; keep the round alive
        // rather than invent a loser.
        None => RoundState::Adding {
            queue: Vec::new(),
            recorded,
            attempt: Vec::new(),
        },
    }
}

/// Checks the attempt against the recorded sequence.
///
/// An attempt longer than the sequence never matches.
fn attempt_matches(options: &GameOptions, recorded: &[RecordedTap], attempt: &[Tap]) -> bool {
    if attempt.len() > recorded.len() {
        return false;
    }

    let near = |(original, repeated): (&RecordedTap, &Tap)| {
        original.tap.is_near(repeated, options.tolerance)
    };

    match options.match_policy {
        MatchPolicy::LatestTap => recorded.iter().zip(attempt).last().is_none_or(near),
        MatchPolicy::WholeAttempt => recorded.iter().zip(attempt).all(near),
    }
}

impl RoundState {
    /// Starts a game with the given turn order.
    ///
    /// # Example
    ///
    /// ```
    /// use taprs::{Player, RoundPhase, RoundState};
    ///
    /// let round = RoundState::new(vec![Player::new("ana"), Player::new("bo")]);
    /// assert_eq!(round.phase(), RoundPhase::Adding);
    /// assert_eq!(round.active_player().map(|p| p.name.as_str()), Some("ana"));
    /// ```
    #[must_use]
    pub const fn new(queue: Vec<Player>) -> Self {
        Self::Adding {
            queue,
            recorded: Vec::new(),
            attempt: Vec::new(),
        }
    }

    /// Returns the phase tag of this state.
    #[must_use]
    pub const fn phase(&self) -> RoundPhase {
        match self {
            Self::Adding { .. } => RoundPhase::Adding,
            Self::Repeating { .. } => RoundPhase::Repeating,
            Self::GameOver { .. } => RoundPhase::GameOver,
        }
    }

    /// Returns whether the game has been lost.
    #[must_use]
    pub const fn is_over(&self) -> bool {
        matches!(self, Self::GameOver { .. })
    }

    /// Returns the player expected to act, or the loser once the game is over.
    #[must_use]
    pub fn active_player(&self) -> Option<&Player> {
        match self {
            Self::Adding { queue, .. } | Self::Repeating { queue, .. } => queue.first(),
            Self::GameOver { loser, .. } => Some(loser),
        }
    }

    /// Returns the recorded sequence.
    #[must_use]
    pub fn recorded(&self) -> &[RecordedTap] {
        match self {
            Self::Adding { recorded, .. }
            | Self::Repeating { recorded, .. }
            | Self::GameOver { recorded, .. } => recorded,
        }
    }

    /// Returns the taps of the current (or failed) repetition.
    #[must_use]
    pub fn attempt(&self) -> &[Tap] {
        match self {
            Self::Adding { attempt, .. }
            | Self::Repeating { attempt, .. }
            | Self::GameOver { attempt, .. } => attempt,
        }
    }

    /// Counts the leading taps of the attempt that match the recorded
    /// sequence. After a miss this excludes the missed tap; after a timeout it
    /// is the whole attempt.
    #[must_use]
    pub fn repeated(&self, tolerance: f32) -> usize {
        self.attempt()
            .iter()
            .zip(self.recorded())
            .take_while(|(tap, original)| original.tap.is_near(tap, tolerance))
            .count()
    }

    /// Returns the effects to start while this state is shown.
    #[must_use]
    pub fn effects(&self) -> Effects {
        match self {
            Self::Repeating { timeout, .. } => Effects::render_with_timeout(*timeout),
            Self::Adding { .. } | Self::GameOver { .. } => Effects::render(),
        }
    }

    /// Applies an action.
    ///
    /// Actions that make no sense in the current state leave it unchanged.
    #[must_use]
    pub fn process(self, action: GameAction, options: &GameOptions) -> RoundStep {
        match (self, action) {
            (
                Self::Adding {
                    mut queue,
                    mut recorded,
                    attempt,
                },
                GameAction::Tap(tap),
            ) => {
                if queue.is_empty() {
                    return RoundStep::Stay(Self::Adding {
                        queue,
                        recorded,
                        attempt,
                    });
                }
                let player = queue.remove(0);
                recorded.push(RecordedTap {
                    player: player.clone(),
                    tap,
                });
                queue.push(player);

                RoundStep::Stay(Self::Repeating {
                    queue,
                    recorded,
                    attempt: Vec::new(),
                    timeout: options.repeat_timeout,
                })
            }
            (
                Self::Repeating {
                    queue,
                    recorded,
                    mut attempt,
                    timeout,
                },
                GameAction::Tap(tap),
            ) => {
                attempt.push(tap);

                if !attempt_matches(options, &recorded, &attempt) {
                    RoundStep::Stay(game_over(queue, recorded, attempt))
                } else if attempt.len() == recorded.len() {
                    RoundStep::Stay(Self::Adding {
                        queue,
                        recorded,
                        attempt: Vec::new(),
                    })
                } else {
                    RoundStep::Stay(Self::Repeating {
                        queue,
                        recorded,
                        attempt,
                        timeout,
                    })
                }
            }
            (
                Self::Repeating {
                    queue,
                    recorded,
                    attempt,
                    ..
                },
                GameAction::Timeout,
            ) => RoundStep::Stay(game_over(queue, recorded, attempt)),
            (Self::GameOver { .. }, GameAction::Next) => RoundStep::Exit,
            (state, action) => {
                tracing::debug!(phase = ?state.phase(), ?action, "ignored round action");
                RoundStep::Stay(state)
            }
        }
    }
}
