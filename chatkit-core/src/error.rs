// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Error Types
//!
//! Errors that reach callers ([`ChatKitError`]) and errors that are absorbed
//! at reconciliation stage boundaries ([`ReconcileError`]).

use thiserror::Error;

use crate::emoji::{EmojiCacheError, SnapshotError};
use crate::runtime::{BridgeError, TaskError};
use crate::service::ServiceError;
use crate::storage::PrefsError;

/// Unified error type for ChatKit operations.
#[derive(Error, Debug)]
pub enum ChatKitError {
    /// The remote service reported an error (connect, disconnect, mutations).
    #[error("connection error: {0}")]
    Connection(#[from] ServiceError),

    /// A mirror operation was attempted with no bound entity.
    #[error("not found: {0}")]
    NotFound(String),

    /// Connecting or fetching the mirrored entity failed.
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Waiting on a service callback failed.
    #[error("bridge error: {0}")]
    Bridge(#[from] BridgeError),

    /// A background job failed.
    #[error("task error: {0}")]
    Task(#[from] TaskError),

    /// Persisted snapshot could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] SnapshotError),

    /// Preferences storage failed.
    #[error("storage error: {0}")]
    Storage(#[from] PrefsError),

    /// Spawning a runtime thread failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Invalid operation in current state.
    #[error("invalid state: {0}")]
    InvalidState(String),
}

/// Result type for ChatKit operations.
pub type ChatKitResult<T> = Result<T, ChatKitError>;

/// Failure of a best-effort reconciliation stage.
///
/// Logged and discarded; never surfaced to connect callers.
#[derive(Error, Debug)]
pub enum ReconcileError {
    #[error("service error: {0}")]
    Service(#[from] ServiceError),

    #[error("bridge error: {0}")]
    Bridge(#[from] BridgeError),

    #[error("storage error: {0}")]
    Storage(#[from] PrefsError),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("emoji cache error: {0}")]
    EmojiCache(#[from] EmojiCacheError),
}
