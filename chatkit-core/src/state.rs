//! Init State
//!
//! Observable lifecycle of the SDK initialization.

use parking_lot::Mutex;
use tracing::{info, warn};

/// Initialization state of a [`ChatKit`](crate::ChatKit) context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InitState {
    /// `init` has not completed (or state was cleared by disconnect).
    #[default]
    Uninitialized,
    /// Local database migration is in progress.
    Migrating,
    /// Initialization succeeded.
    Succeeded,
    /// Initialization failed.
    Failed,
}

impl InitState {
    /// Returns true if `next` is a legal step within one init cycle.
    pub fn can_transition_to(self, next: InitState) -> bool {
        matches!(
            (self, next),
            (InitState::Uninitialized, InitState::Migrating)
                | (InitState::Uninitialized, InitState::Succeeded)
                | (InitState::Uninitialized, InitState::Failed)
                | (InitState::Migrating, InitState::Succeeded)
                | (InitState::Migrating, InitState::Failed)
        )
    }

    /// Returns true for `Succeeded` and `Failed`.
    pub fn is_terminal(self) -> bool {
        matches!(self, InitState::Succeeded | InitState::Failed)
    }
}

struct CellInner {
    state: InitState,
    subscribers: Vec<flume::Sender<InitState>>,
}

/// Single current [`InitState`] with change subscribers.
pub struct InitStateCell {
    inner: Mutex<CellInner>,
}

impl Default for InitStateCell {
    fn default() -> Self {
        Self::new()
    }
}

impl InitStateCell {
    /// Creates a cell in `Uninitialized`.
    pub fn new() -> Self {
        InitStateCell {
            inner: Mutex::new(CellInner {
                state: InitState::Uninitialized,
                subscribers: Vec::new(),
            }),
        }
    }

    /// Returns the current state.
    pub fn current(&self) -> InitState {
        self.inner.lock().state
    }

    /// Returns a receiver of subsequent state changes.
    ///
    /// The current value is not replayed.
    pub fn subscribe(&self) -> flume::Receiver<InitState> {
        let (tx, rx) = flume::unbounded();
        self.inner.lock().subscribers.push(tx);
        rx
    }

    /// Moves to `next` if the step is legal. Returns whether it moved.
    pub(crate) fn transition(&self, next: InitState) -> bool {
        let mut inner = self.inner.lock();
        if !inner.state.can_transition_to(next) {
            warn!(from = ?inner.state, to = ?next, "rejected init state transition");
            return false;
        }
        info!(from = ?inner.state, to = ?next, "init state changed");
        inner.state = next;
        broadcast(&mut inner);
        true
    }

    /// Returns to `Uninitialized`, notifying subscribers if the state changed.
    pub(crate) fn reset(&self) {
        let mut inner = self.inner.lock();
        if inner.state == InitState::Uninitialized {
            return;
        }
        info!(from = ?inner.state, "init state reset");
        inner.state = InitState::Uninitialized;
        broadcast(&mut inner);
    }
}

fn broadcast(inner: &mut CellInner) {
    let state = inner.state;
    inner.subscribers.retain(|tx| tx.send(state).is_ok());
}
