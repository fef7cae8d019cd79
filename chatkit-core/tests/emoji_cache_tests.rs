// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Tests for emoji
//!
//! Catalogue replacement, persistence and snapshot codec.

mod common;

use std::sync::Arc;
use std::thread;

use chatkit_core::emoji::{
    decode_container, encode_container, EmojiCache, EmojiCategory, EmojiContainer,
    EMOJI_CONTAINER_KEY,
};
use chatkit_core::storage::{FilePreferences, MemoryPreferences, Preferences};
use common::strategies::{container_strategy, distinct_container_strategy};
use common::*;
use proptest::prelude::*;
use tempfile::TempDir;

fn memory_cache() -> (EmojiCache, Arc<MemoryPreferences>) {
    let prefs = Arc::new(MemoryPreferences::new());
    (EmojiCache::new(prefs.clone()), prefs)
}

/// Keys of `container` flattened in order, first occurrence wins position.
/// Categories as installed: a repeated id keeps its first position and takes
/// the last category.
fn effective_categories(container: &EmojiContainer) -> Vec<EmojiCategory> {
    let mut categories: Vec<EmojiCategory> = Vec::new();
    for category in &container.categories {
        match categories.iter_mut().find(|c| c.id == category.id) {
            Some(existing) => *existing = category.clone(),
            None => categories.push(category.clone()),
        }
    }
    categories
}

fn flattened_keys(container: &EmojiContainer) -> Vec<String> {
    let mut keys: Vec<String> = Vec::new();
    for category in effective_categories(container) {
        for emoji in &category.emojis {
            if !keys.contains(&emoji.key) {
                keys.push(emoji.key.clone());
            }
        }
    }
    keys
}

#[test]
fn test_empty_cache() {
    let (cache, _) = memory_cache();
    assert!(cache.hash().is_none());
    assert!(cache.needs_refresh("anything"));
    assert!(cache.all_categories().is_empty());
    assert!(cache.all_emojis().is_empty());
    assert!(cache.emoji_url("smile").is_none());
    assert!(cache.emojis(1).is_none());
    assert!(cache.container().is_none());
}

#[test]
fn test_upsert_installs_and_persists() {
    let (cache, prefs) = memory_cache();

    cache.upsert(sample_container("h1")).unwrap();

    assert_eq!(cache.hash().as_deref(), Some("h1"));
    assert!(!cache.needs_refresh("h1"));
    assert!(cache.needs_refresh("h2"));
    assert_eq!(
        cache.emoji_url("thumbsup").as_deref(),
        Some("https://cdn.example/thumbsup.png")
    );
    assert_eq!(cache.emojis(1).unwrap().len(), 2);
    assert_eq!(cache.all_categories().len(), 2);

    let stored = prefs.get_string(EMOJI_CONTAINER_KEY).unwrap();
    assert_eq!(decode_container(&stored).unwrap(), sample_container("h1"));
}

#[test]
fn test_upsert_replaces_previous_catalogue() {
    let (cache, _) = memory_cache();
    cache.upsert(sample_container("h1")).unwrap();

    let replacement = EmojiContainer {
        emoji_hash: "h2".into(),
        categories: vec![EmojiCategory {
            id: 9,
            name: "Animals".into(),
            url: String::new(),
            emojis: vec![emoji("cat")],
        }],
    };
    cache.upsert(replacement).unwrap();

    assert!(cache.emoji_url("smile").is_none());
    assert!(cache.emojis(1).is_none());
    assert_eq!(cache.all_emojis(), vec![emoji("cat")]);
}

#[test]
fn test_restore_does_not_persist() {
    let (cache, prefs) = memory_cache();
    cache.restore(sample_container("h1"));
    assert_eq!(cache.hash().as_deref(), Some("h1"));
    assert!(prefs.get_string(EMOJI_CONTAINER_KEY).is_none());
}

#[test]
fn test_init_restores_persisted_snapshot() {
    let temp = TempDir::new().unwrap();
    {
        let prefs = Arc::new(FilePreferences::open(temp.path()).unwrap());
        EmojiCache::new(prefs).upsert(sample_container("h1")).unwrap();
    }

    let prefs = Arc::new(FilePreferences::open(temp.path()).unwrap());
    let cache = EmojiCache::new(prefs);
    assert!(cache.init());

    assert_eq!(cache.container(), Some(sample_container("h1")));
}

#[test]
fn test_init_discards_corrupt_snapshot() {
    let (cache, prefs) = memory_cache();
    prefs.put_string(EMOJI_CONTAINER_KEY, "definitely not a snapshot").unwrap();

    assert!(!cache.init());
    assert!(cache.hash().is_none());
    assert!(prefs.get_string(EMOJI_CONTAINER_KEY).is_none());
}

#[test]
fn test_init_without_snapshot() {
    let (cache, _) = memory_cache();
    assert!(!cache.init());
}

#[test]
fn test_clear_drops_memory_only() {
    let (cache, prefs) = memory_cache();
    cache.upsert(sample_container("h1")).unwrap();

    cache.clear();

    assert!(cache.hash().is_none());
    assert!(cache.all_emojis().is_empty());
    assert!(prefs.get_string(EMOJI_CONTAINER_KEY).is_some());
}

#[test]
fn test_concurrent_readers_never_see_mixed_catalogues() {
    let (cache, _) = memory_cache();
    let cache = Arc::new(cache);
    let a = sample_container("a");
    let mut b = sample_container("b");
    for category in &mut b.categories {
        for e in &mut category.emojis {
            e.key = format!("b-{}", e.key);
        }
    }
    cache.upsert(a.clone()).unwrap();

    let keys_a = flattened_keys(&a);
    let keys_b = flattened_keys(&b);

    let writer = {
        let cache = cache.clone();
        thread::spawn(move || {
            for i in 0..200 {
                let next = if i % 2 == 0 { b.clone() } else { a.clone() };
                cache.upsert(next).unwrap();
            }
        })
    };

    for _ in 0..500 {
        let keys: Vec<String> = cache.all_emojis().into_iter().map(|e| e.key).collect();
        assert!(keys == keys_a || keys == keys_b, "mixed catalogue: {:?}", keys);
    }
    writer.join().unwrap();
}

proptest! {
    #[test]
    fn prop_all_emojis_match_last_upsert(
        containers in prop::collection::vec(container_strategy(), 1..4)
    ) {
        let (cache, _) = memory_cache();
        for container in &containers {
            cache.upsert(container.clone()).unwrap();
        }
        let last = containers.last().unwrap();

        let keys: Vec<String> = cache.all_emojis().into_iter().map(|e| e.key).collect();
        prop_assert_eq!(keys, flattened_keys(last));
        let categories = effective_categories(last);
        prop_assert_eq!(cache.all_categories(), categories.clone());
        for category in &categories {
            for emoji in &category.emojis {
                prop_assert!(cache.emoji_url(&emoji.key).is_some());
            }
        }
        prop_assert_eq!(cache.hash(), Some(last.emoji_hash.clone()));
    }

    #[test]
    fn prop_snapshot_restores_identical_catalogue(container in distinct_container_strategy()) {
        let encoded = encode_container(&container).unwrap();
        let decoded = decode_container(&encoded).unwrap();

        let (original, _) = memory_cache();
        original.restore(container);
        let (restored, _) = memory_cache();
        restored.restore(decoded);

        prop_assert_eq!(restored.hash(), original.hash());
        prop_assert_eq!(restored.all_categories(), original.all_categories());
        prop_assert_eq!(restored.all_emojis(), original.all_emojis());
    }
}
