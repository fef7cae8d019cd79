// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Performance Benchmarks for the Emoji Catalogue
//!
//! Run with: cargo bench -p chatkit-core

use std::sync::Arc;

use chatkit_core::emoji::{
    decode_container, encode_container, Emoji, EmojiCache, EmojiCategory, EmojiContainer,
};
use chatkit_core::storage::MemoryPreferences;
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

/// A catalogue shaped like a production one: 8 categories of 64 emojis.
fn catalogue(categories: i64, per_category: usize) -> EmojiContainer {
    EmojiContainer {
        emoji_hash: "bench".into(),
        categories: (0..categories)
            .map(|id| EmojiCategory {
                id,
                name: format!("category-{}", id),
                url: format!("https://cdn.example/cat/{}.png", id),
                emojis: (0..per_category)
                    .map(|n| Emoji {
                        key: format!("e{}-{}", id, n),
                        url: format!("https://cdn.example/{}/{}.png", id, n),
                    })
                    .collect(),
            })
            .collect(),
    }
}

// =============================================================================
// SNAPSHOT CODEC BENCHMARKS
// =============================================================================

fn bench_snapshot_codec(c: &mut Criterion) {
    let container = catalogue(8, 64);
    let encoded = encode_container(&container).unwrap();

    let mut group = c.benchmark_group("emoji_snapshot");
    group.throughput(Throughput::Bytes(encoded.len() as u64));
    group.bench_function("encode_512", |b| {
        b.iter(|| encode_container(black_box(&container)))
    });
    group.bench_function("decode_512", |b| {
        b.iter(|| decode_container(black_box(&encoded)))
    });
    group.finish();
}

// =============================================================================
// CACHE BENCHMARKS
// =============================================================================

fn bench_cache(c: &mut Criterion) {
    let container = catalogue(8, 64);
    let cache = EmojiCache::new(Arc::new(MemoryPreferences::new()));
    cache.restore(container.clone());

    let mut group = c.benchmark_group("emoji_cache");
    group.bench_function("upsert_512", |b| {
        b.iter(|| cache.upsert(black_box(container.clone())))
    });
    group.bench_function("emoji_url_lookup", |b| {
        b.iter(|| cache.emoji_url(black_box("e4-32")))
    });
    group.bench_function("all_emojis_512", |b| b.iter(|| cache.all_emojis()));
    group.finish();
}

criterion_group!(benches, bench_snapshot_codec, bench_cache);

criterion_main!(benches);
