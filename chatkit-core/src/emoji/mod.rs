//! Emoji catalogue
//!
//! The emoji catalogue is fetched from the service, cached in memory, and
//! persisted as an encoded snapshot so it survives process restarts.
//!
//! # Example
//!
//! ```ignore
//! use chatkit_core::emoji::EmojiCache;
//! use chatkit_core::storage::MemoryPreferences;
//!
//! let cache = EmojiCache::new(Arc::new(MemoryPreferences::new()));
//! cache.init();
//! if cache.needs_refresh(&app_info.emoji_hash) {
//!     cache.upsert(fetched)?;
//! }
//! let url = cache.emoji_url("smile");
//! ```

mod cache;
mod catalogue;

pub use cache::{EmojiCache, EmojiCacheError, EMOJI_CONTAINER_KEY};
pub use catalogue::{
    decode_container, encode_container, Emoji, EmojiCategory, EmojiContainer, SnapshotError,
};
