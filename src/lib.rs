//! A "repeat the taps" memory game engine with optional `no_std` support.
//!
//! Players take turns: each round one player adds a tap to a shared sequence
//! and the next player must reproduce the whole sequence before a timer runs
//! out. The crate provides the pure state machines for the game flow
//! ([`App`], [`RoundState`], [`Roster`]) and an asynchronous driver
//! ([`Orchestrator`]) that connects them to any [`PresentationPort`].
//!
//! # Example
//!
//! ```
//! use taprs::{App, AppAction, AppState, ConfigureAction, GameOptions, MenuAction};
//!
//! let app = App::new(GameOptions::default());
//! let (state, _) = app.process(AppState::initial(), AppAction::Menu(MenuAction::Start));
//! let (state, _) = app.process(state, AppAction::Configure(ConfigureAction::Next));
//! assert!(matches!(state, AppState::Game(_)));
//! ```
#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(docsrs, feature(doc_cfg))]

#[cfg(all(not(feature = "std"), not(feature = "alloc")))]
compile_error!(
    "`std` is disabled but `alloc` feature is not enabled. Enable `alloc` or keep `std` enabled."
);

extern crate alloc;

pub mod app;
pub mod channel;
pub mod effect;
pub mod error;
pub mod options;
pub mod player;
pub mod port;
pub mod race;
pub mod roster;
pub mod round;
pub mod runtime;
pub mod tap;
mod sync;

// Re-export main types
pub use app::{App, AppAction, AppState, ConfigureAction, MenuAction, MenuState};
pub use channel::{ChannelHandle, ChannelPort};
pub use effect::{Effect, Effects};
pub use error::{PortError, RosterError};
pub use options::{FallbackPolicy, GameOptions, MatchPolicy};
pub use player::{NameGenerator, Player};
pub use port::PresentationPort;
pub use race::{first_of, next_of};
pub use roster::Roster;
pub use round::{GameAction, RoundPhase, RoundState};
pub use runtime::{Orchestrator, StepOutcome};
pub use tap::{DEFAULT_TOLERANCE, Tap};
