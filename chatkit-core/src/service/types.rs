// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Service Data Types
//!
//! Values exchanged with the remote messaging service.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::emoji::EmojiContainer;

/// Error reported by the remote messaging service.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("service error {code}: {message}")]
pub struct ServiceError {
    /// Service-defined error code.
    pub code: u32,
    /// Human readable description.
    pub message: String,
}

impl ServiceError {
    /// Creates a new service error.
    pub fn new(code: u32, message: impl Into<String>) -> Self {
        ServiceError {
            code,
            message: message.into(),
        }
    }
}

/// Result type for service callbacks.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Connection state as reported by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    /// Not connected.
    #[default]
    Closed,
    /// Handshake in progress.
    Connecting,
    /// Connected and ready.
    Open,
}

/// A user as known to the service.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct User {
    /// Stable user id.
    pub user_id: String,
    /// Display nickname (may be empty).
    pub nickname: String,
    /// Profile image URL (may be empty).
    pub profile_url: String,
}

impl User {
    /// Creates a user with empty nickname and profile.
    pub fn new(user_id: impl Into<String>) -> Self {
        User {
            user_id: user_id.into(),
            ..Default::default()
        }
    }
}

/// Parameters for `update_current_user_info`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserUpdateParams {
    pub nickname: Option<String>,
    pub profile_url: Option<String>,
}

/// Notification feature metadata delivered with [`AppInfo`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NotificationInfo {
    /// Whether notification channels are enabled for the application.
    pub enabled: bool,
    /// Version token of the latest template list.
    pub template_list_token: String,
    /// Last update time (ms since epoch) of the channel settings.
    pub settings_updated_at: i64,
}

/// Application level metadata held by the service after connect.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppInfo {
    /// Whether message reactions are enabled.
    pub use_reaction: bool,
    /// Hash of the server's current emoji catalogue.
    pub emoji_hash: String,
    /// Notification metadata, if the feature is provisioned.
    pub notification_info: Option<NotificationInfo>,
}

/// Parameters passed to the service's `init`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitParams {
    pub app_id: String,
    pub use_caching: bool,
}

/// Kind of a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChannelKind {
    Open,
    Group,
}

/// A remote channel, the entity mirrored by settings screens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    /// Channel URL, the stable identity.
    pub url: String,
    pub kind: ChannelKind,
    pub name: String,
    pub cover_url: String,
    /// User ids holding the operator role.
    pub operators: Vec<String>,
    /// User ids of current members or participants.
    pub members: Vec<String>,
    /// Version marker (ms since epoch).
    pub updated_at: i64,
    pub frozen: bool,
}

impl Channel {
    /// Creates an empty channel with the given identity.
    pub fn new(url: impl Into<String>, kind: ChannelKind) -> Self {
        Channel {
            url: url.into(),
            kind,
            name: String::new(),
            cover_url: String::new(),
            operators: Vec::new(),
            members: Vec::new(),
            updated_at: 0,
            frozen: false,
        }
    }

    /// Returns true if `user_id` holds the operator role.
    pub fn is_operator(&self, user_id: &str) -> bool {
        self.operators.iter().any(|op| op == user_id)
    }
}

/// Parameters for updating a channel.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChannelUpdateParams {
    pub name: Option<String>,
    pub cover_url: Option<String>,
    pub operators: Option<Vec<String>>,
}

/// A single notification template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationTemplate {
    pub key: String,
    pub body: String,
}

/// Template list together with the token identifying its version.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NotificationTemplateList {
    pub token: String,
    pub templates: Vec<NotificationTemplate>,
}

/// Theme preference carried by the notification channel settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NotificationThemeMode {
    #[default]
    Default,
    Light,
    Dark,
}

/// Notification channel settings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NotificationChannelSettings {
    /// Last update time (ms since epoch).
    pub updated_at: i64,
    pub theme_mode: NotificationThemeMode,
}

/// Completion for operations without a value.
pub type CompletionHandler = Box<dyn FnOnce(Option<ServiceError>) + Send>;

/// Completion for `connect`; the service may report a user and an error together.
pub type ConnectHandler = Box<dyn FnOnce(Option<User>, Option<ServiceError>) + Send>;

/// Completion for `disconnect`.
pub type DisconnectHandler = Box<dyn FnOnce() + Send>;

/// Completion for channel lookups and updates.
pub type ChannelHandler = Box<dyn FnOnce(ServiceResult<Channel>) + Send>;

/// Completion for the emoji catalogue fetch.
pub type EmojiContainerHandler = Box<dyn FnOnce(ServiceResult<EmojiContainer>) + Send>;

/// Completion for the template list fetch.
pub type TemplateListHandler = Box<dyn FnOnce(ServiceResult<NotificationTemplateList>) + Send>;

/// Completion for the channel settings fetch.
pub type ChannelSettingsHandler =
    Box<dyn FnOnce(ServiceResult<NotificationChannelSettings>) + Send>;
