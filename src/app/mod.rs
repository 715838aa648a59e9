//! Top-level game flow: menu, player setup, and the game itself.

use crate::effect::Effects;
use crate::options::GameOptions;
use crate::roster::Roster;
use crate::round::{GameAction, RoundState, RoundStep};

pub mod configure;
pub mod menu;

pub use configure::{ConfigureAction, ConfigureStep};
pub use menu::{MenuAction, MenuState};

/// Global application state.
#[derive(Debug, Clone, PartialEq)]
pub enum AppState {
    /// The start screen.
    Menu(MenuState),
    /// Choosing who plays.
    ConfigureGame(Roster),
    /// A game in progress or just lost.
    Game(RoundState),
}

impl AppState {
    /// The state the application starts in.
    #[must_use]
    pub const fn initial() -> Self {
        Self::Menu(MenuState::Menu)
    }

    /// Short name of the current screen, for logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Menu(_) => "menu",
            Self::ConfigureGame(_) => "configure",
            Self::Game(RoundState::Adding { .. }) => "adding",
            Self::Game(RoundState::Repeating { .. }) => "repeating",
            Self::Game(RoundState::GameOver { .. }) => "game_over",
        }
    }

    /// Returns the effects to start while this state is shown.
    #[must_use]
    pub fn effects(&self) -> Effects {
        match self {
            Self::Game(round) => round.effects(),
            Self::Menu(_) | Self::ConfigureGame(_) => Effects::render(),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::initial()
    }
}

/// Actions proposed by the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub enum AppAction {
    /// An action from the menu.
    Menu(MenuAction),
    /// An action from the player setup screen.
    Configure(ConfigureAction),
    /// An action from the game screen.
    Game(GameAction),
}

/// The application's transition function.
///
/// `App` holds no state of its own beyond its options: every call maps a
/// state and an action to the next state and the effects to start for it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct App {
    options: GameOptions,
}

impl App {
    /// Creates the transition function for the given options.
    #[must_use]
    pub const fn new(options: GameOptions) -> Self {
        Self { options }
    }

    /// Returns the options in use.
    #[must_use]
    pub const fn options(&self) -> &GameOptions {
        &self.options
    }

    /// Applies an action to a state.
    ///
    /// Actions meant for another screen are ignored, so a late action from a
    /// screen that is no longer shown cannot change the game.
    ///
    /// # Example
    ///
    /// ```
    /// use taprs::{App, AppAction, AppState, GameAction, GameOptions, Tap};
    ///
    /// let app = App::new(GameOptions::default());
    /// let tap = AppAction::Game(GameAction::Tap(Tap::new(0.5, 0.5)));
    /// let (state, _) = app.process(AppState::initial(), tap);
    /// assert_eq!(state, AppState::initial());
    /// ```
    #[must_use]
    pub fn process(&self, state: AppState, action: AppAction) -> (AppState, Effects) {
        let before = state.name();
        let next = self.transition(state, action.clone());
        tracing::debug!(state = before, ?action, result = next.name(), "step");

        let effects = next.effects();
        (next, effects)
    }

    fn transition(&self, state: AppState, action: AppAction) -> AppState {
        match (state, action) {
            (AppState::Menu(_), AppAction::Menu(MenuAction::Start)) => {
                AppState::ConfigureGame(Roster::from_options(&self.options))
            }
            (AppState::ConfigureGame(roster), AppAction::Configure(action)) => {
                match configure::process(roster, action) {
                    ConfigureStep::Stay(roster) => AppState::ConfigureGame(roster),
                    ConfigureStep::Confirm(roster) => {
                        AppState::Game(RoundState::new(roster.turn_queue()))
                    }
                }
            }
            (AppState::Game(round), AppAction::Game(action)) => {
                match round.process(action, &self.options) {
                    RoundStep::Stay(round) => AppState::Game(round),
                    RoundStep::Exit => AppState::initial(),
                }
            }
            (state, action) => {
                tracing::debug!(state = state.name(), ?action, "ignored stale action");
                state
            }
        }
    }
}
