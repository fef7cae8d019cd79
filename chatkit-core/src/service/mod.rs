// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Messaging Service Contract
//!
//! The remote messaging SDK is an opaque asynchronous collaborator. This module
//! defines the surface ChatKit consumes from it.
//!
//! # Callback Contract
//!
//! Every asynchronous operation takes a boxed `FnOnce` completion. The
//! service invokes it at most once, on a thread of its choosing. Callers
//! that need a synchronous result go through
//! [`WorkerContext::await_once`](crate::runtime::WorkerContext::await_once).
//!
//! # Example
//!
//! ```ignore
//! use chatkit_core::service::{ChatService, MockChatService};
//!
//! let service = MockChatService::new();
//! service.connect("alice", Some("token"), Box::new(|user, err| {
//!     println!("connected: {:?} {:?}", user, err);
//! }));
//! ```

mod events;
mod mock;
mod types;

use std::sync::Arc;

pub use events::{CallbackHandler, ChannelEvent, EventHandler, InitResultHandler};
pub use mock::{InitStep, MockCall, MockChatService};
pub use types::{
    AppInfo, Channel, ChannelHandler, ChannelKind, ChannelSettingsHandler, ChannelUpdateParams,
    CompletionHandler, ConnectHandler, ConnectionState, DisconnectHandler, EmojiContainerHandler,
    InitParams, NotificationChannelSettings, NotificationInfo, NotificationTemplate,
    NotificationTemplateList, NotificationThemeMode, ServiceError, ServiceResult,
    TemplateListHandler, User, UserUpdateParams,
};

/// Remote messaging service.
///
/// Implementations wrap the platform SDK. All methods must be callable from
/// any thread.
pub trait ChatService: Send + Sync {
    /// Initializes the SDK. Progress is reported through `handler`.
    fn init(&self, params: InitParams, handler: Arc<dyn InitResultHandler>);

    /// Connects as `user_id`.
    fn connect(&self, user_id: &str, access_token: Option<&str>, handler: ConnectHandler);

    /// Disconnects. Safe to call when not connected.
    fn disconnect(&self, handler: DisconnectHandler);

    /// Updates the current user's profile.
    fn update_current_user_info(&self, params: UserUpdateParams, handler: CompletionHandler);

    /// Fetches the full emoji catalogue.
    fn get_all_emoji(&self, handler: EmojiContainerHandler);

    /// Application metadata, available once connected.
    fn app_info(&self) -> Option<AppInfo>;

    /// Current connection state.
    fn connection_state(&self) -> ConnectionState;

    /// The connected user, if any.
    fn current_user(&self) -> Option<User>;

    /// Registers a toolkit extension and its version with the SDK.
    fn add_extension(&self, key: &str, version: &str);

    /// Registers `handler` under `key`, replacing any handler with the same key.
    fn add_event_handler(&self, key: &str, handler: Arc<dyn EventHandler>);

    /// Removes the handler registered under `key`.
    fn remove_event_handler(&self, key: &str) -> Option<Arc<dyn EventHandler>>;

    /// Fetches a channel by URL.
    fn get_channel(&self, kind: ChannelKind, url: &str, handler: ChannelHandler);

    /// Updates a channel.
    fn update_channel(&self, url: &str, params: ChannelUpdateParams, handler: ChannelHandler);

    /// Deletes a channel.
    fn delete_channel(&self, url: &str, handler: CompletionHandler);

    /// Fetches the notification template list.
    fn get_notification_templates(&self, handler: TemplateListHandler);

    /// Fetches the notification channel settings.
    fn get_notification_channel_settings(&self, handler: ChannelSettingsHandler);
}
