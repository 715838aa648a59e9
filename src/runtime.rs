//! The loop that drives the game through a presentation port.

use alloc::vec::Vec;
use core::fmt::Display;
use core::pin::pin;
use core::time::Duration;

use futures::future::{Either, FutureExt, LocalBoxFuture, select};

use crate::app::{App, AppAction, AppState};
use crate::effect::{Effect, Effects};
use crate::options::{FallbackPolicy, GameOptions};
use crate::port::PresentationPort;
use crate::race::next_of;
use crate::round::GameAction;

/// What a single [`Orchestrator::step`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// An action was applied. `winner` is the index of the effect that
    /// produced it: 0 for the render, 1 for the timeout.
    Advanced {
        /// Index of the winning effect.
        winner: usize,
    },
    /// The port failed and the orchestrator fell back to a safe state.
    Recovered,
}

/// How the race of a single step ended.
enum Settled<E> {
    /// An action arrived and nothing else is still running.
    Action { action: AppAction, winner: usize },
    /// An action arrived and already produced a new state.
    Applied {
        state: AppState,
        effects: Effects,
        winner: usize,
    },
    Failed(E),
    Idle,
}

/// Owns the application state and feeds it actions from a
/// [`PresentationPort`], one at a time.
///
/// Each step renders the current state, races the player's action against
/// the state's timer (if any), applies the winner and cancels the rest.
pub struct Orchestrator<P> {
    port: P,
    app: App,
    state: AppState,
    effects: Effects,
    failures: u32,
}

impl<P: PresentationPort> Orchestrator<P> {
    /// Creates an orchestrator starting at the menu.
    pub fn new(port: P, options: GameOptions) -> Self {
        Self::with_state(port, options, AppState::initial())
    }

    /// Creates an orchestrator that resumes from `state`.
    pub fn with_state(port: P, options: GameOptions, state: AppState) -> Self {
        let effects = state.effects();
        Self {
            port,
            app: App::new(options),
            state,
            effects,
            failures: 0,
        }
    }

    /// Returns the current state.
    pub const fn state(&self) -> &AppState {
        &self.state
    }

    /// Returns the effects the next step will start.
    pub const fn effects(&self) -> &Effects {
        &self.effects
    }

    /// Returns the port.
    pub const fn port(&self) -> &P {
        &self.port
    }

    /// Returns the port and the current state.
    pub fn into_parts(self) -> (P, AppState) {
        (self.port, self.state)
    }

    fn racer<'a>(
        port: &'a P,
        state: &'a AppState,
        effect: Effect,
    ) -> LocalBoxFuture<'a, Result<AppAction, P::Error>> {
        match effect {
            Effect::Render => port.render_and_await(state).boxed_local(),
            Effect::Timeout(duration) => Self::timeout(port, duration).boxed_local(),
        }
    }

    async fn timeout(port: &P, duration: Duration) -> Result<AppAction, P::Error> {
        port.schedule_timeout(duration).await;
        Ok(AppAction::Game(GameAction::Timeout))
    }

    /// Renders the current state, waits for one action and applies it.
    ///
    /// An action that leaves a timed state unchanged does not end the step:
    /// the state is rendered again while the running timer keeps counting
    /// down, so ignored input never buys the player more time.
    ///
    /// Port failures never escape: they are logged and the state falls back
    /// according to [`GameOptions::fallback`].
    pub async fn step(&mut self) -> StepOutcome {
        let port = &self.port;
        let app = &self.app;
        let state = &self.state;
        let effects = &self.effects;
        let mut racers: Vec<_> = effects
            .iter()
            .map(|effect| Self::racer(port, state, *effect))
            .collect();

        let settled = loop {
            let Some((result, winner, rest)) = next_of(racers).await else {
                break Settled::Idle;
            };
            let action = match result {
                Ok(action) => action,
                Err(err) => break Settled::Failed(err),
            };
            if rest.is_empty() {
                break Settled::Action { action, winner };
            }

            let (next, next_effects) = app.process(state.clone(), action);
            if next != *state {
                break Settled::Applied {
                    state: next,
                    effects: next_effects,
                    winner,
                };
            }

            let effect = effects.iter().nth(winner).copied().unwrap_or(Effect::Render);
            tracing::debug!(state = state.name(), "action ignored, timer still running");
            racers = rest;
            racers.insert(winner, Self::racer(port, state, effect));
        };

        match settled {
            Settled::Action { action, winner } => {
                let current = core::mem::take(&mut self.state);
                let (state, effects) = self.app.process(current, action);
                self.advance(state, effects);
                StepOutcome::Advanced { winner }
            }
            Settled::Applied {
                state,
                effects,
                winner,
            } => {
                self.advance(state, effects);
                StepOutcome::Advanced { winner }
            }
            Settled::Failed(err) => {
                self.recover(&err);
                StepOutcome::Recovered
            }
            Settled::Idle => {
                self.recover(&"no effects to start");
                StepOutcome::Recovered
            }
        }
    }

    fn advance(&mut self, state: AppState, effects: Effects) {
        self.failures = 0;
        self.state = state;
        self.effects = effects;
    }

    fn recover(&mut self, reason: &dyn Display) {
        self.failures = self.failures.saturating_add(1);
        let options = self.app.options();
        let exhausted = options.max_consecutive_failures != 0
            && self.failures >= options.max_consecutive_failures;
        let policy = if exhausted {
            FallbackPolicy::ResetToMenu
        } else {
            options.fallback
        };

        tracing::warn!(
            %reason,
            failures = self.failures,
            state = self.state.name(),
            ?policy,
            "presentation failed, recovering"
        );

        match policy {
            FallbackPolicy::ResetToMenu => {
                self.state = AppState::initial();
                self.effects = self.state.effects();
            }
            FallbackPolicy::RestartStep => {}
        }
    }

    /// Runs steps until `shutdown` resolves.
    ///
    /// Whatever is in flight when `shutdown` fires (a render, a timer) is
    /// cancelled, and the state stays where it was. Calling `run` again
    /// resumes from it, rendering it anew.
    pub async fn run(&mut self, shutdown: impl Future<Output = ()>) {
        let mut shutdown = pin!(shutdown);
        tracing::info!(state = self.state.name(), "orchestrator started");

        loop {
            let step = pin!(self.step());
            if let Either::Left(((), _)) = select(shutdown.as_mut(), step).await {
                break;
            }
        }

        tracing::info!(state = self.state.name(), "orchestrator stopped");
    }
}
