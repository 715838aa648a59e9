//! Game configuration options.

use alloc::string::String;
use core::time::Duration;

use crate::tap::DEFAULT_TOLERANCE;

/// How a repetition is checked against the recorded sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[non_exhaustive]
pub enum MatchPolicy {
    /// Only the tap just added is compared with the recorded tap at the same
    /// position. Earlier taps were already checked when they arrived.
    #[default]
    LatestTap,
    /// Every tap of the attempt is compared with the recorded prefix each
    /// time a tap arrives.
    WholeAttempt,
}

/// What the orchestrator does when the presentation port fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FallbackPolicy {
    /// Throw the current state away and show the menu.
    #[default]
    ResetToMenu,
    /// Show the current state again, re-arming its timer.
    RestartStep,
}

/// Configuration options for a game.
///
/// Use the builder pattern to customize options:
///
/// ```
/// use core::time::Duration;
/// use taprs::GameOptions;
///
/// let options = GameOptions::default()
///     .with_tolerance(0.1)
///     .with_repeat_timeout(Duration::from_secs(3));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct GameOptions {
    /// Maximum distance between a recorded tap and its repetition.
    pub tolerance: f32,
    /// Time a player gets for each tap while repeating.
    pub repeat_timeout: Duration,
    /// How repetitions are checked.
    pub match_policy: MatchPolicy,
    /// Names of the two players a new roster starts with.
    pub default_players: (String, String),
    /// Recovery strategy for presentation failures.
    pub fallback: FallbackPolicy,
    /// Consecutive failures after which [`FallbackPolicy::RestartStep`]
    /// gives up and resets to the menu. 0 to never give up.
    pub max_consecutive_failures: u32,
}

impl Default for GameOptions {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            repeat_timeout: Duration::from_secs(2),
            match_policy: MatchPolicy::LatestTap,
            default_players: (String::from("player1"), String::from("player2")),
            fallback: FallbackPolicy::ResetToMenu,
            max_consecutive_failures: 3,
        }
    }
}

impl GameOptions {
    /// Sets the tap tolerance.
    ///
    /// # Example
    ///
    /// ```
    /// use taprs::GameOptions;
    ///
    /// let options = GameOptions::default().with_tolerance(0.1);
    /// assert_eq!(options.tolerance, 0.1);
    /// ```
    #[must_use]
    pub const fn with_tolerance(mut self, tolerance: f32) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the per-tap timeout while repeating.
    #[must_use]
    pub const fn with_repeat_timeout(mut self, timeout: Duration) -> Self {
        self.repeat_timeout = timeout;
        self
    }

    /// Sets the match policy.
    #[must_use]
    pub const fn with_match_policy(mut self, policy: MatchPolicy) -> Self {
        self.match_policy = policy;
        self
    }

    /// Sets the names of the two players every new roster starts with.
    ///
    /// # Example
    ///
    /// ```
    /// use taprs::{GameOptions, Roster};
    ///
    /// let options = GameOptions::default().with_default_players("ana", "bo");
    /// let roster = Roster::from_options(&options);
    /// assert_eq!(roster.players().next().map(|p| p.name.as_str()), Some("ana"));
    /// ```
    #[must_use]
    pub fn with_default_players(
        mut self,
        first: impl Into<String>,
        second: impl Into<String>,
    ) -> Self {
        self.default_players = (first.into(), second.into());
        self
    }

    /// Sets the recovery strategy for presentation failures.
    #[must_use]
    pub const fn with_fallback(mut self, fallback: FallbackPolicy) -> Self {
        self.fallback = fallback;
        self
    }

    /// Sets how many consecutive failures are retried before resetting.
    #[must_use]
    pub const fn with_max_consecutive_failures(mut self, failures: u32) -> Self {
        self.max_consecutive_failures = failures;
        self
    }
}
