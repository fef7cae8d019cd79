//! Push Events
//!
//! Server-pushed channel notifications and the handler types that receive them.

use super::types::{Channel, ChannelKind, User};

/// Events pushed by the service to registered handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelEvent {
    /// Channel properties changed.
    ChannelChanged {
        /// Snapshot after the change.
        channel: Channel,
    },

    /// A user entered an open channel.
    UserEntered {
        channel: Channel,
        user: User,
    },

    /// A user exited an open channel.
    UserExited {
        channel: Channel,
        user: User,
    },

    /// A user joined a group channel.
    UserJoined {
        channel: Channel,
        user: User,
    },

    /// A user left a group channel.
    UserLeft {
        channel: Channel,
        user: User,
    },

    /// The operator list changed.
    OperatorUpdated {
        channel: Channel,
    },

    /// A user was banned from the channel.
    UserBanned {
        channel: Channel,
        user: User,
    },

    /// The channel was frozen.
    ChannelFrozen {
        channel: Channel,
    },

    /// The channel was unfrozen.
    ChannelUnfrozen {
        channel: Channel,
    },

    /// The channel was deleted.
    ChannelDeleted {
        /// URL of the deleted channel.
        channel_url: String,
        /// Kind of the deleted channel.
        kind: ChannelKind,
    },
}

impl ChannelEvent {
    /// Returns the URL of the channel this event concerns.
    pub fn channel_url(&self) -> &str {
        match self {
            ChannelEvent::ChannelChanged { channel }
            | ChannelEvent::UserEntered { channel, .. }
            | ChannelEvent::UserExited { channel, .. }
            | ChannelEvent::UserJoined { channel, .. }
            | ChannelEvent::UserLeft { channel, .. }
            | ChannelEvent::OperatorUpdated { channel }
            | ChannelEvent::UserBanned { channel, .. }
            | ChannelEvent::ChannelFrozen { channel }
            | ChannelEvent::ChannelUnfrozen { channel } => &channel.url,
            ChannelEvent::ChannelDeleted { channel_url, .. } => channel_url,
        }
    }
}

/// Event handler trait.
///
/// Implement this trait to receive channel events.
pub trait EventHandler: Send + Sync {
    /// Called when an event occurs.
    fn on_event(&self, event: ChannelEvent);
}

/// Simple callback-based event handler.
///
/// Wraps a closure for easy event handling.
pub struct CallbackHandler<F>
where
    F: Fn(ChannelEvent) + Send + Sync,
{
    callback: F,
}

impl<F> CallbackHandler<F>
where
    F: Fn(ChannelEvent) + Send + Sync,
{
    /// Creates a new callback handler.
    pub fn new(callback: F) -> Self {
        CallbackHandler { callback }
    }
}

impl<F> EventHandler for CallbackHandler<F>
where
    F: Fn(ChannelEvent) + Send + Sync,
{
    fn on_event(&self, event: ChannelEvent) {
        (self.callback)(event);
    }
}

/// Callbacks for the service's init sequence.
pub trait InitResultHandler: Send + Sync {
    /// Local database migration started.
    fn on_migration_started(&self) {}

    /// Initialization failed.
    fn on_init_failed(&self, _error: super::ServiceError) {}

    /// Initialization succeeded.
    fn on_init_succeeded(&self) {}
}
