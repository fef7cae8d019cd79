// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Proptest Strategies
//!
//! Reusable proptest strategies for property-based testing.

use proptest::prelude::*;

use chatkit_core::emoji::{Emoji, EmojiCategory, EmojiContainer};

// ============================================================
// Emoji Strategies
// ============================================================

/// Emoji keys drawn from a small alphabet so repeats across categories occur.
pub fn emoji_key_strategy() -> impl Strategy<Value = String> {
    "[a-f]{1,2}"
}

pub fn emoji_strategy() -> impl Strategy<Value = Emoji> {
    (emoji_key_strategy(), "[a-z]{3,8}").prop_map(|(key, file)| Emoji {
        url: format!("https://cdn.example/{}/{}.png", key, file),
        key,
    })
}

/// Categories with ids in a small range so repeated ids occur.
pub fn category_strategy() -> impl Strategy<Value = EmojiCategory> {
    (
        0i64..6,
        "[A-Z][a-z]{2,8}",
        prop::collection::vec(emoji_strategy(), 0..6),
    )
        .prop_map(|(id, name, emojis)| EmojiCategory {
            id,
            url: format!("https://cdn.example/cat/{}.png", id),
            name,
            emojis,
        })
}

pub fn container_strategy() -> impl Strategy<Value = EmojiContainer> {
    (
        "[a-f0-9]{8,16}",
        prop::collection::vec(category_strategy(), 0..5),
    )
        .prop_map(|(emoji_hash, categories)| EmojiContainer {
            emoji_hash,
            categories,
        })
}

/// Containers whose category ids are unique, so decoded order is unambiguous.
pub fn distinct_container_strategy() -> impl Strategy<Value = EmojiContainer> {
    container_strategy().prop_map(|mut container| {
        let mut seen = std::collections::HashSet::new();
        container.categories.retain(|c| seen.insert(c.id));
        container
    })
}
