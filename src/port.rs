//! The boundary between the game and whatever draws it.

use core::fmt::Display;
use core::time::Duration;

use crate::app::{AppAction, AppState};

/// A presentation layer the [`Orchestrator`](crate::Orchestrator) can drive.
///
/// Both methods return futures that the orchestrator may drop before they
/// complete. Dropping must cancel the underlying work: a dropped render stops
/// listening for input, a dropped timeout never fires.
pub trait PresentationPort {
    /// Failure while rendering or waiting for input.
    type Error: Display;

    /// Shows `state` and resolves with the first action the player takes.
    fn render_and_await(
        &self,
        state: &AppState,
    ) -> impl Future<Output = Result<AppAction, Self::Error>>;

    /// Resolves once `duration` has elapsed.
    fn schedule_timeout(&self, duration: Duration) -> impl Future<Output = ()>;
}
