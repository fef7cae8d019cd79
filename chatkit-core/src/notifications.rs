// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Notification Settings
//!
//! Local copies of the notification template list and channel settings.
//! Each is re-fetched only when the version marker announced in
//! [`NotificationInfo`](crate::service::NotificationInfo) moves past what is
//! stored.

use std::sync::Arc;

use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::ReconcileError;
use crate::runtime::WorkerContext;
use crate::service::{
    ChatService, NotificationChannelSettings, NotificationTemplate, NotificationTemplateList,
};
use crate::storage::Preferences;

/// Preferences key for the template list.
pub const TEMPLATE_LIST_KEY: &str = "chatkit.notification_templates";

/// Preferences key for the channel settings.
pub const CHANNEL_SETTINGS_KEY: &str = "chatkit.notification_channel_settings";

/// Result of a sync call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Stored copy already matches; nothing was fetched.
    UpToDate,
    /// A fresh copy was fetched and stored.
    Refreshed,
}

/// Persisted notification template list and channel settings.
pub struct NotificationSettingsStore {
    service: Arc<dyn ChatService>,
    prefs: Arc<dyn Preferences>,
    templates: RwLock<Option<NotificationTemplateList>>,
    settings: RwLock<Option<NotificationChannelSettings>>,
}

impl NotificationSettingsStore {
    pub fn new(service: Arc<dyn ChatService>, prefs: Arc<dyn Preferences>) -> Self {
        NotificationSettingsStore {
            service,
            prefs,
            templates: RwLock::new(None),
            settings: RwLock::new(None),
        }
    }

    /// Loads persisted copies. Unreadable entries are dropped.
    pub fn init(&self) {
        *self.templates.write() = self.load(TEMPLATE_LIST_KEY);
        *self.settings.write() = self.load(CHANNEL_SETTINGS_KEY);
        debug!(
            templates = self.templates.read().is_some(),
            settings = self.settings.read().is_some(),
            "notification settings loaded"
        );
    }

    /// Fetches the template list unless the stored token equals `latest_token`.
    pub fn sync_template_list(
        &self,
        ctx: &WorkerContext,
        latest_token: &str,
    ) -> Result<SyncOutcome, ReconcileError> {
        if self.template_list_token().as_deref() == Some(latest_token) {
            return Ok(SyncOutcome::UpToDate);
        }

        let service = self.service.clone();
        let mut list = ctx.await_once(|done| {
            service.get_notification_templates(Box::new(move |result| done.complete(result)))
        })??;
        if list.token.is_empty() {
            list.token = latest_token.to_string();
        }

        self.persist(TEMPLATE_LIST_KEY, &list)?;
        info!(
            token = %list.token,
            templates = list.templates.len(),
            "notification templates refreshed"
        );
        *self.templates.write() = Some(list);
        Ok(SyncOutcome::Refreshed)
    }

    /// Fetches the channel settings if `updated_at` is newer than the stored copy.
    pub fn sync_channel_settings(
        &self,
        ctx: &WorkerContext,
        updated_at: i64,
    ) -> Result<SyncOutcome, ReconcileError> {
        if let Some(stored) = self.settings.read().as_ref() {
            if stored.updated_at >= updated_at {
                return Ok(SyncOutcome::UpToDate);
            }
        }

        let service = self.service.clone();
        let settings = ctx.await_once(|done| {
            service.get_notification_channel_settings(Box::new(move |result| done.complete(result)))
        })??;

        self.persist(CHANNEL_SETTINGS_KEY, &settings)?;
        info!(updated_at = settings.updated_at, "notification channel settings refreshed");
        *self.settings.write() = Some(settings);
        Ok(SyncOutcome::Refreshed)
    }

    pub fn template_list(&self) -> Option<NotificationTemplateList> {
        self.templates.read().clone()
    }

    pub fn template_list_token(&self) -> Option<String> {
        self.templates.read().as_ref().map(|l| l.token.clone())
    }

    /// Looks up a template by key.
    pub fn template(&self, key: &str) -> Option<NotificationTemplate> {
        self.templates
            .read()
            .as_ref()
            .and_then(|l| l.templates.iter().find(|t| t.key == key).cloned())
    }

    pub fn channel_settings(&self) -> Option<NotificationChannelSettings> {
        self.settings.read().clone()
    }

    /// Drops both copies, in memory and persisted.
    pub fn clear(&self) {
        *self.templates.write() = None;
        *self.settings.write() = None;
        for key in [TEMPLATE_LIST_KEY, CHANNEL_SETTINGS_KEY] {
            if let Err(e) = self.prefs.remove(key) {
                warn!(key, error = %e, "failed to remove notification settings");
            }
        }
    }

    fn load<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.prefs.get_string(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key, error = %e, "discarding unreadable notification settings");
                None
            }
        }
    }

    fn persist<T: Serialize>(&self, key: &str, value: &T) -> Result<(), ReconcileError> {
        let json = serde_json::to_string(value)?;
        self.prefs.put_string(key, &json)?;
        Ok(())
    }
}
