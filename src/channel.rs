//! A presentation port fed from callbacks.
//!
//! UI toolkits usually deliver input through callbacks on their own thread.
//! [`ChannelPort`] adapts that to [`PresentationPort`]: the orchestrator side
//! publishes each state and waits, and the UI side reads the latest snapshot
//! through a [`ChannelHandle`] and submits actions into it.

use alloc::sync::Arc;
use core::time::Duration;

use futures::channel::oneshot;

use crate::app::{AppAction, AppState};
use crate::error::PortError;
use crate::port::PresentationPort;
use crate::sync::Mutex;

#[derive(Default)]
struct Shared {
    snapshot: Option<AppState>,
    generation: u64,
    listener: Option<oneshot::Sender<AppAction>>,
    closed: bool,
}

/// Detaches the listener installed by a render when that render is dropped.
struct ListenerGuard<'a> {
    shared: &'a Mutex<Shared>,
    generation: u64,
    receiver: oneshot::Receiver<AppAction>,
}

impl Drop for ListenerGuard<'_> {
    fn drop(&mut self) {
        self.shared.with(|shared| {
            if shared.generation == self.generation {
                shared.listener = None;
            }
        });

        // Sends happen under the lock, so nothing can arrive after this point.
        self.receiver.close();
        if let Ok(Some(action)) = self.receiver.try_recv() {
            tracing::debug!(
                generation = self.generation,
                ?action,
                "render superseded, delivered action discarded"
            );
        }
    }
}

/// Orchestrator side of a callback-driven presentation layer.
///
/// `sleep` is the host's timer, e.g. `tokio::time::sleep`.
///
/// ```
/// use core::time::Duration;
/// use taprs::ChannelPort;
///
/// let (port, handle) = ChannelPort::new(|_: Duration| futures::future::ready(()));
/// assert!(handle.snapshot().is_none());
/// # drop(port);
/// ```
pub struct ChannelPort<S> {
    shared: Arc<Mutex<Shared>>,
    sleep: S,
}

impl<S> ChannelPort<S> {
    /// Creates a port and the handle the UI uses to talk to it.
    pub fn new(sleep: S) -> (Self, ChannelHandle) {
        let shared = Arc::new(Mutex::new(Shared::default()));
        let handle = ChannelHandle {
            shared: Arc::clone(&shared),
        };
        (Self { shared, sleep }, handle)
    }
}

impl<S, F> PresentationPort for ChannelPort<S>
where
    S: Fn(Duration) -> F,
    F: Future<Output = ()>,
{
    type Error = PortError;

    async fn render_and_await(&self, state: &AppState) -> Result<AppAction, PortError> {
        let (sender, receiver) = oneshot::channel();
        let generation = self
            .shared
            .with(|shared| {
                if shared.closed {
                    return None;
                }
                shared.snapshot = Some(state.clone());
                shared.generation += 1;
                shared.listener = Some(sender);
                Some(shared.generation)
            })
            .ok_or(PortError::Disconnected)?;

        let mut guard = ListenerGuard {
            shared: &self.shared,
            generation,
            receiver,
        };
        (&mut guard.receiver).await.map_err(|_| PortError::Disconnected)
    }

    fn schedule_timeout(&self, duration: Duration) -> impl Future<Output = ()> {
        (self.sleep)(duration)
    }
}

/// UI side of a [`ChannelPort`]. Cheap to clone.
#[derive(Clone)]
pub struct ChannelHandle {
    shared: Arc<Mutex<Shared>>,
}

impl ChannelHandle {
    /// Returns the most recently rendered state.
    #[must_use]
    pub fn snapshot(&self) -> Option<AppState> {
        self.shared.with(|shared| shared.snapshot.clone())
    }

    /// Returns a counter that increases with every render.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.shared.with(|shared| shared.generation)
    }

    /// Returns whether a render is waiting for an action.
    #[must_use]
    pub fn is_listening(&self) -> bool {
        self.shared.with(|shared| {
            shared
                .listener
                .as_ref()
                .is_some_and(|sender| !sender.is_canceled())
        })
    }

    /// Delivers an action to the waiting render.
    ///
    /// # Errors
    ///
    /// Returns [`PortError::NoListener`] if nothing is waiting (for example a
    /// tap arriving after the timer already fired), and
    /// [`PortError::Disconnected`] after [`close`](Self::close).
    ///
    /// `Ok` means the waiting render received the action. If that render
    /// loses its race in the same instant (the timer fired first), the
    /// orchestrator discards the action and logs it at `debug`.
    pub fn submit(&self, action: AppAction) -> Result<(), PortError> {
        self.deliver(None, action)
    }

    /// Delivers an action only if it was produced for the render with the
    /// given [`generation`](Self::generation).
    ///
    /// # Errors
    ///
    /// Same as [`submit`](Self::submit); an action for an older render is
    /// rejected with [`PortError::NoListener`].
    pub fn submit_at(&self, generation: u64, action: AppAction) -> Result<(), PortError> {
        self.deliver(Some(generation), action)
    }

    fn deliver(&self, generation: Option<u64>, action: AppAction) -> Result<(), PortError> {
        self.shared.with(|shared| {
            if shared.closed {
                return Err(PortError::Disconnected);
            }
            if generation.is_some_and(|g| g != shared.generation) {
                return Err(PortError::NoListener);
            }
            let listener = shared.listener.take().ok_or(PortError::NoListener)?;
            if listener.is_canceled() {
                return Err(PortError::NoListener);
            }
            listener.send(action).map_err(|_| PortError::NoListener)
        })
    }

    /// Disconnects the UI. The waiting render, and every later one, fails
    /// with [`PortError::Disconnected`].
    pub fn close(&self) {
        let listener = self.shared.with(|shared| {
            shared.closed = true;
            shared.listener.take()
        });
        drop(listener);
    }
}
