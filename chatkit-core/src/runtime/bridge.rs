// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Async Bridge
//!
//! Turns a single callback delivery into a blocking return on the worker.

use std::marker::PhantomData;
use std::time::Duration;

use thiserror::Error;

/// Errors from waiting on a callback.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BridgeError {
    /// The completion was dropped without being completed.
    #[error("completion dropped before delivering a result")]
    Abandoned,

    /// No result arrived within the caller-supplied bound.
    #[error("timed out after {0:?}")]
    TimedOut(Duration),
}

/// One-shot completion handed to a callback-style operation.
///
/// Consuming `complete` makes double delivery impossible.
pub struct Completion<T> {
    tx: flume::Sender<T>,
}

impl<T> Completion<T> {
    /// Delivers the result and wakes the waiting worker.
    pub fn complete(self, value: T) {
        // A send error means the waiter already gave up (timeout).
        let _ = self.tx.send(value);
    }
}

/// Capability to block, held only by the task queue worker.
///
/// Jobs receive a `&WorkerContext`; code running on the UI-affinity thread
/// never has one, so it cannot call [`WorkerContext::await_once`]. The type is
/// neither `Send` nor `Sync`, so it cannot be smuggled to another thread.
pub struct WorkerContext {
    _not_send: PhantomData<*const ()>,
}

impl WorkerContext {
    pub(crate) fn new() -> Self {
        WorkerContext {
            _not_send: PhantomData,
        }
    }

    /// Starts `op` with a fresh completion and blocks until it is completed.
    ///
    /// No timeout is applied; the service's own timeouts govern the wait.
    /// Returns [`BridgeError::Abandoned`] if the completion is dropped unused.
    pub fn await_once<T, F>(&self, op: F) -> Result<T, BridgeError>
    where
        F: FnOnce(Completion<T>),
    {
        let (tx, rx) = flume::bounded(1);
        op(Completion { tx });
        rx.recv().map_err(|_| BridgeError::Abandoned)
    }

    /// Like [`Self::await_once`], giving up after `timeout`.
    pub fn await_once_timeout<T, F>(&self, timeout: Duration, op: F) -> Result<T, BridgeError>
    where
        F: FnOnce(Completion<T>),
    {
        let (tx, rx) = flume::bounded(1);
        op(Completion { tx });
        rx.recv_timeout(timeout).map_err(|e| match e {
            flume::RecvTimeoutError::Timeout => BridgeError::TimedOut(timeout),
            flume::RecvTimeoutError::Disconnected => BridgeError::Abandoned,
        })
    }
}
