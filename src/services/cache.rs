use serde::Serialize;
use sha2::{Digest, Sha256};
use std::time::Duration;

use crate::models::{MatchOutcome, MatchProfile};

/// In-memory cache of AI ranking results.
///
/// Entries are keyed by a digest of the request (direction, requester and
/// pool), so a changed pool never reuses a stale ranking. Only AI-sourced
/// outcomes are worth caching; heuristic ranking is cheaper than a lookup.
#[derive(Clone)]
pub struct MatchCache<P: MatchProfile> {
    entries: moka::future::Cache<String, MatchOutcome<P>>,
}

impl<P: MatchProfile> MatchCache<P> {
    pub fn new(max_entries: u64, ttl_secs: u64) -> Self {
        let entries = moka::future::CacheBuilder::new(max_entries)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self { entries }
    }

    pub async fn get(&self, key: &str) -> Option<MatchOutcome<P>> {
        let hit = self.entries.get(key).await;
        if hit.is_some() {
            tracing::trace!("Match cache hit: {}", key);
        }
        hit
    }

    pub async fn insert(&self, key: String, outcome: MatchOutcome<P>) {
        tracing::trace!("Match cache set: {}", key);
        self.entries.insert(key, outcome).await;
    }

    /// Live entry count, after flushing pending inserts and expirations
    pub async fn entry_count(&self) -> u64 {
        self.entries.run_pending_tasks().await;
        self.entries.entry_count()
    }
}

/// Cache key builder
pub struct CacheKey;

impl CacheKey {
    /// Key for ranking `pool` on behalf of `requester`.
    ///
    /// Returns `None` when either side cannot be serialized; such requests
    /// are simply not cached.
    pub fn matches<R, C>(direction: &str, requester: &R, pool: &[C]) -> Option<String>
    where
        R: Serialize,
        C: Serialize,
    {
        let mut hasher = Sha256::new();
        hasher.update(direction.as_bytes());
        hasher.update(b"\n");
        hasher.update(serde_json::to_vec(requester).ok()?);
        hasher.update(b"\n");
        hasher.update(serde_json::to_vec(pool).ok()?);

        let digest = hasher.finalize();
        let hex: String = digest.iter().map(|b| format!("{:02x}", b)).collect();
        Some(format!("matches:{}:{}", direction, hex))
    }
}
