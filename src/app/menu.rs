//! Main menu.

/// Menu state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MenuState {
    /// The start screen.
    #[default]
    Menu,
}

/// Menu actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    /// Set up a new game.
    Start,
}
