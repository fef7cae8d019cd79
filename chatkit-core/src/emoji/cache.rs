// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Emoji Cache
//!
//! Content-addressed cache of the emoji catalogue. The server-issued hash is
//! the only refresh trigger; there is no time-based expiry.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::catalogue::{
    decode_container, encode_container, Emoji, EmojiCategory, EmojiContainer, SnapshotError,
};
use crate::storage::{Preferences, PrefsError};

/// Preferences key holding the encoded snapshot.
pub const EMOJI_CONTAINER_KEY: &str = "chatkit.emoji_container";

/// Errors from updating the cache.
#[derive(Debug, Error)]
pub enum EmojiCacheError {
    #[error("snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),

    #[error("storage error: {0}")]
    Storage(#[from] PrefsError),
}

/// An installed catalogue. Built whole, then swapped in.
#[derive(Default)]
struct Catalogue {
    hash: Option<String>,
    categories: Vec<EmojiCategory>,
    category_index: HashMap<i64, usize>,
    emoji_order: Vec<String>,
    emoji_by_key: HashMap<String, Emoji>,
}

impl Catalogue {
    /// Indexes `container`. A repeated category id keeps its first position
    /// and takes the last category; the key map is flattened from the
    /// resulting categories, with the same rule for repeated keys.
    fn build(container: EmojiContainer) -> Self {
        let mut catalogue = Catalogue {
            hash: Some(container.emoji_hash),
            ..Default::default()
        };

        for category in container.categories {
            match catalogue.category_index.get(&category.id) {
                Some(&idx) => catalogue.categories[idx] = category,
                None => {
                    catalogue
                        .category_index
                        .insert(category.id, catalogue.categories.len());
                    catalogue.categories.push(category);
                }
            }
        }

        for emoji in catalogue.categories.iter().flat_map(|c| &c.emojis) {
            if !catalogue.emoji_by_key.contains_key(&emoji.key) {
                catalogue.emoji_order.push(emoji.key.clone());
            }
            catalogue
                .emoji_by_key
                .insert(emoji.key.clone(), emoji.clone());
        }

        catalogue
    }
}

/// Hash-validated, persisted emoji catalogue.
///
/// Hash, categories and the flattened key map are swapped together under one
/// lock; readers never observe a half-installed catalogue.
pub struct EmojiCache {
    catalogue: RwLock<Arc<Catalogue>>,
    prefs: Arc<dyn Preferences>,
}

impl EmojiCache {
    /// Creates an empty cache persisting to `prefs`.
    pub fn new(prefs: Arc<dyn Preferences>) -> Self {
        EmojiCache {
            catalogue: RwLock::new(Arc::new(Catalogue::default())),
            prefs,
        }
    }

    /// Installs the persisted snapshot, if any, without re-persisting it.
    ///
    /// Returns true if a snapshot was installed. A snapshot that fails to
    /// decode is discarded and treated as absent.
    pub fn init(&self) -> bool {
        let Some(encoded) = self.prefs.get_string(EMOJI_CONTAINER_KEY) else {
            debug!("no persisted emoji snapshot");
            return false;
        };
        if encoded.is_empty() {
            return false;
        }

        match decode_container(&encoded) {
            Ok(container) => {
                self.restore(container);
                true
            }
            Err(e) => {
                warn!(error = %e, "discarding unreadable emoji snapshot");
                if let Err(e) = self.prefs.remove(EMOJI_CONTAINER_KEY) {
                    warn!(error = %e, "failed to remove emoji snapshot");
                }
                false
            }
        }
    }

    /// Replaces the catalogue and persists an encoded snapshot.
    ///
    /// The in-memory swap happens first; a persistence failure leaves the new
    /// catalogue installed and is returned to the caller.
    pub fn upsert(&self, container: EmojiContainer) -> Result<(), EmojiCacheError> {
        let encoded = encode_container(&container)?;
        self.restore(container);
        self.prefs.put_string(EMOJI_CONTAINER_KEY, &encoded)?;
        Ok(())
    }

    /// Replaces the catalogue without persisting it.
    pub fn restore(&self, container: EmojiContainer) {
        let catalogue = Arc::new(Catalogue::build(container));
        info!(
            hash = ?catalogue.hash,
            categories = catalogue.categories.len(),
            "emoji catalogue installed"
        );
        *self.catalogue.write() = catalogue;
    }

    /// Drops the in-memory catalogue.
    pub fn clear(&self) {
        *self.catalogue.write() = Arc::new(Catalogue::default());
    }

    /// Hash of the installed catalogue.
    pub fn hash(&self) -> Option<String> {
        self.catalogue.read().hash.clone()
    }

    /// Returns true when `server_hash` differs from the installed hash.
    pub fn needs_refresh(&self, server_hash: &str) -> bool {
        self.catalogue.read().hash.as_deref() != Some(server_hash)
    }

    /// URL of the emoji registered under `key`.
    pub fn emoji_url(&self, key: &str) -> Option<String> {
        self.catalogue
            .read()
            .emoji_by_key
            .get(key)
            .map(|e| e.url.clone())
    }

    /// All categories in server order.
    pub fn all_categories(&self) -> Vec<EmojiCategory> {
        self.catalogue.read().categories.clone()
    }

    /// All emojis, flattened across categories in order.
    pub fn all_emojis(&self) -> Vec<Emoji> {
        let catalogue = self.current();
        catalogue
            .emoji_order
            .iter()
            .filter_map(|key| catalogue.emoji_by_key.get(key).cloned())
            .collect()
    }

    /// Emojis of one category.
    pub fn emojis(&self, category_id: i64) -> Option<Vec<Emoji>> {
        let catalogue = self.current();
        catalogue
            .category_index
            .get(&category_id)
            .map(|&idx| catalogue.categories[idx].emojis.clone())
    }

    /// The installed catalogue as a container, if one is installed.
    pub fn container(&self) -> Option<EmojiContainer> {
        let catalogue = self.current();
        catalogue.hash.as_ref().map(|hash| EmojiContainer {
            emoji_hash: hash.clone(),
            categories: catalogue.categories.clone(),
        })
    }

    fn current(&self) -> Arc<Catalogue> {
        self.catalogue.read().clone()
    }
}
