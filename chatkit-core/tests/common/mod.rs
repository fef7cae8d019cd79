// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Common Test Utilities
//!
//! Shared fixtures for building a [`ChatKit`] over [`MockChatService`] and
//! waiting on callbacks delivered from other threads.

#![allow(dead_code)]

pub mod strategies;

use std::sync::Arc;
use std::time::Duration;

use chatkit_core::emoji::{Emoji, EmojiCategory, EmojiContainer};
use chatkit_core::service::{AppInfo, NotificationInfo};
use chatkit_core::storage::{MemoryPreferences, Preferences};
use chatkit_core::{
    ChatKit, ChatKitConfig, ConnectOutcome, InlineDispatcher, MockChatService, SessionIdentity,
};

/// Upper bound for any wait in tests.
pub const WAIT: Duration = Duration::from_secs(5);

/// Test context: the kit plus handles to its collaborators.
pub struct Harness {
    pub kit: ChatKit,
    pub service: Arc<MockChatService>,
    pub prefs: Arc<MemoryPreferences>,
}

/// Builds a kit for `identity` with inline UI dispatch and memory preferences.
pub fn harness(identity: SessionIdentity) -> Harness {
    harness_with(identity, ChatKitConfig::new("test-app"), Arc::new(MockChatService::new()))
}

pub fn harness_with(
    identity: SessionIdentity,
    config: ChatKitConfig,
    service: Arc<MockChatService>,
) -> Harness {
    let prefs = Arc::new(MemoryPreferences::new());
    let kit = ChatKit::builder(config)
        .service(service.clone())
        .adapter(Arc::new(identity))
        .dispatcher(Arc::new(InlineDispatcher))
        .preferences(prefs.clone() as Arc<dyn Preferences>)
        .build()
        .unwrap();
    Harness { kit, service, prefs }
}

/// Runs `connect` and waits for the outcome.
pub fn connect_and_wait(kit: &ChatKit) -> ConnectOutcome {
    let (tx, rx) = flume::bounded(1);
    kit.connect(move |outcome| {
        let _ = tx.send(outcome);
    });
    rx.recv_timeout(WAIT).expect("connect outcome")
}

/// Runs `disconnect` and waits for its handler.
pub fn disconnect_and_wait(kit: &ChatKit) {
    let (tx, rx) = flume::bounded(1);
    kit.disconnect(move || {
        let _ = tx.send(());
    });
    rx.recv_timeout(WAIT).expect("disconnect handler");
}

pub fn emoji(key: &str) -> Emoji {
    Emoji {
        key: key.to_string(),
        url: format!("https://cdn.example/{}.png", key),
    }
}

/// A two-category catalogue with the given hash.
pub fn sample_container(hash: &str) -> EmojiContainer {
    EmojiContainer {
        emoji_hash: hash.to_string(),
        categories: vec![
            EmojiCategory {
                id: 1,
                name: "Faces".into(),
                url: "https://cdn.example/faces.png".into(),
                emojis: vec![emoji("smile"), emoji("laugh")],
            },
            EmojiCategory {
                id: 2,
                name: "Hands".into(),
                url: "https://cdn.example/hands.png".into(),
                emojis: vec![emoji("thumbsup")],
            },
        ],
    }
}

/// App info with reactions on and the given emoji hash.
pub fn app_info(emoji_hash: &str) -> AppInfo {
    AppInfo {
        use_reaction: true,
        emoji_hash: emoji_hash.to_string(),
        notification_info: None,
    }
}

/// App info with notifications enabled.
pub fn app_info_with_notifications(token: &str, settings_updated_at: i64) -> AppInfo {
    AppInfo {
        use_reaction: false,
        emoji_hash: String::new(),
        notification_info: Some(NotificationInfo {
            enabled: true,
            template_list_token: token.to_string(),
            settings_updated_at,
        }),
    }
}
