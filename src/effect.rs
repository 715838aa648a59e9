//! Pending asynchronous work produced by a transition.

use alloc::vec::Vec;
use core::time::Duration;

/// One piece of asynchronous work the orchestrator starts after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Show the new state and wait for the player's next action.
    Render,
    /// Deliver a timeout action once the duration has elapsed.
    Timeout(Duration),
}

/// The effects started for a state. Every state is rendered, so the list
/// always starts with [`Effect::Render`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Effects(Vec<Effect>);

impl Effects {
    /// Render only.
    #[must_use]
    pub fn render() -> Self {
        Self(alloc::vec![Effect::Render])
    }

    /// Render and race the player against a timer.
    #[must_use]
    pub fn render_with_timeout(timeout: Duration) -> Self {
        Self(alloc::vec![Effect::Render, Effect::Timeout(timeout)])
    }

    /// Returns the timeout, if one is armed.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.0.iter().find_map(|effect| match effect {
            Effect::Timeout(duration) => Some(*duration),
            Effect::Render => None,
        })
    }

    /// Iterates over the effects in start order.
    pub fn iter(&self) -> core::slice::Iter<'_, Effect> {
        self.0.iter()
    }

    /// Returns the number of effects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`: every state is rendered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a Effects {
    type Item = &'a Effect;
    type IntoIter = core::slice::Iter<'a, Effect>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
