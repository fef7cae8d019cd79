//! ChatKit Core Library
//!
//! Session and state core of a chat UI toolkit built on top of a remote
//! messaging service: connect with post-connect reconciliation, a serial
//! background task queue, a hash-validated emoji cache and screen-scoped
//! mirrors of remote channels.

pub mod config;
pub mod emoji;
pub mod error;
pub mod logging;
pub mod mirror;
pub mod notifications;
pub mod runtime;
pub mod service;
pub mod session;
pub mod state;
pub mod storage;

pub use config::ChatKitConfig;
pub use emoji::{Emoji, EmojiCache, EmojiCategory, EmojiContainer};
pub use error::{ChatKitError, ChatKitResult, ReconcileError};
pub use mirror::{
    EntityMirror, EventEffect, GroupChannelSettings, GroupChannelSettingsPolicy, MirrorPolicy,
    MirrorSignal, OpenChannelSettings, OpenChannelSettingsPolicy,
};
pub use notifications::{NotificationSettingsStore, SyncOutcome};
pub use runtime::{
    BridgeError, Completion, InlineDispatcher, TaskError, TaskQueue, UiDispatcher, UiThread,
    WorkerContext,
};
pub use service::{
    Channel, ChannelEvent, ChannelKind, ChatService, ConnectionState, MockChatService,
    ServiceError, User,
};
pub use session::{ChatKit, ChatKitBuilder, ConnectOutcome, SessionAdapter, SessionIdentity};
pub use state::{InitState, InitStateCell};
pub use storage::{FilePreferences, MemoryPreferences, Preferences};
