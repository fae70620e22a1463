// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Content-addressed cache for enhanced provider answers.
//!
//! Maps a deterministic key derived from (session, conversation context,
//! latest user input) to a previously obtained high-quality answer, so a
//! repeated question within a session skips the provider round-trip.
//!
//! The cache is an optimization only: it is size-bound (LRU), entries may
//! carry a TTL, and no operation here can fail — an expired or evicted entry
//! simply reads as a miss.

use std::num::NonZeroUsize;
use std::time::{Duration, Instant};

use lru::LruCache;
use sha2::{Digest, Sha256};
use tokio::sync::Mutex;
use tracing::debug;

/// A cached answer with its insertion time and effective lifetime.
#[derive(Debug, Clone)]
struct CacheEntry {
    content: String,
    created_at: Instant,
    ttl: Option<Duration>,
}

/// Size-bound LRU cache of enhanced answers, keyed by [`make_key`].
pub struct ResponseCache {
    entries: Mutex<LruCache<String, CacheEntry>>,
    default_ttl: Option<Duration>,
}

impl ResponseCache {
    /// Create a cache holding at most `capacity` answers.
    ///
    /// * `default_ttl` - entry lifetime applied by [`put`](Self::put);
    ///   `None` retains until LRU eviction.
    ///
    /// A zero capacity is clamped to 1 rather than rejected — cache
    /// construction must never fail.
    pub fn new(capacity: usize, default_ttl: Option<Duration>) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).expect("clamped to >= 1");
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            default_ttl: default_ttl.filter(|d| !d.is_zero()),
        }
    }

    /// Look up a cached answer. Expired entries are dropped and read as a miss.
    pub async fn get(&self, key: &str) -> Option<String> {
        let mut entries = self.entries.lock().await;
        let entry = entries.get(key)?.clone();
        if let Some(ttl) = entry.ttl
            && entry.created_at.elapsed() >= ttl
        {
            entries.pop(key);
            debug!(key, "cache entry expired");
            return None;
        }
        Some(entry.content)
    }

    /// Store or overwrite an answer with the default lifetime.
    pub async fn put(&self, key: String, content: String) {
        self.put_with_ttl(key, content, self.default_ttl).await;
    }

    /// Store or overwrite an answer with an explicit lifetime override.
    pub async fn put_with_ttl(&self, key: String, content: String, ttl: Option<Duration>) {
        let mut entries = self.entries.lock().await;
        entries.put(
            key,
            CacheEntry {
                content,
                created_at: Instant::now(),
                ttl: ttl.filter(|d| !d.is_zero()),
            },
        );
    }

    /// Number of live entries (expired-but-unread entries included).
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    /// True when no entries are cached.
    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}

/// Derive the cache key for a conversation turn.
///
/// Deterministic: identical arguments always produce the same key, so a
/// repeated question in the same session intentionally hits. The full user
/// input is hashed (no prefix truncation), and each part is length-framed so
/// distinct `(session, input, digest)` triples cannot collide by
/// concatenation.
pub fn make_key(session_id: &str, user_input: &str, context_digest: Option<&str>) -> String {
    let mut hasher = Sha256::new();
    for part in [session_id, user_input, context_digest.unwrap_or("")] {
        hasher.update((part.len() as u64).to_be_bytes());
        hasher.update(part.as_bytes());
    }
    hex::encode(hasher.finalize())
}
