//! Cache tiers.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use rev_diff::PayloadDiff;
use rev_types::VersionId;

use crate::error::CacheResult;
use crate::key::CacheKey;

/// A cached comparison result, immutable once written.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CachedDiff {
    /// The diff in the key's stored direction (low to high).
    pub diff: PayloadDiff,
    /// When the entry was computed.
    pub created_at: DateTime<Utc>,
}

impl CachedDiff {
    /// Wrap a freshly computed diff.
    pub fn new(diff: PayloadDiff) -> Self {
        Self {
            diff,
            created_at: Utc::now(),
        }
    }
}

/// One storage tier of the comparison cache.
///
/// Entries are immutable: a `put` for an existing key overwrites with an
/// identical recomputation, so concurrent duplicate writes are harmless and
/// tiers need no cross-process locking.
pub trait CacheTier: Send + Sync {
    /// Look up an entry. Expired entries read as `Ok(None)`.
    fn get(&self, key: &CacheKey) -> CacheResult<Option<CachedDiff>>;

    /// Store an entry.
    fn put(&self, key: CacheKey, entry: CachedDiff) -> CacheResult<()>;

    /// Remove an entry. Returns `true` if it existed.
    fn remove(&self, key: &CacheKey) -> CacheResult<bool>;

    /// Remove every entry referencing `version`, returning the count.
    ///
    /// Used to cascade version deletion into the cache.
    fn remove_version(&self, version: VersionId) -> CacheResult<usize>;
}

/// In-memory cache tier with optional TTL.
///
/// With a TTL this models the volatile tier (entries expire and read as
/// misses); without one it models a durable tier that only loses entries to
/// explicit removal. Expired entries are dropped lazily on lookup.
pub struct InMemoryCacheTier {
    entries: RwLock<HashMap<CacheKey, CachedDiff>>,
    ttl: Option<Duration>,
}

impl InMemoryCacheTier {
    /// A tier whose entries never expire.
    pub fn durable() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl: None,
        }
    }

    /// A tier whose entries expire `ttl` after creation.
    pub fn volatile(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl: Some(ttl),
        }
    }

    /// Number of live (unexpired) entries.
    pub fn len(&self) -> usize {
        let entries = self.entries.read().expect("lock poisoned");
        match self.ttl {
            None => entries.len(),
            Some(ttl) => {
                let now = Utc::now();
                entries
                    .values()
                    .filter(|e| e.created_at + ttl > now)
                    .count()
            }
        }
    }

    /// Returns `true` if no live entries remain.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop all entries.
    pub fn clear(&self) {
        self.entries.write().expect("lock poisoned").clear();
    }

    fn is_expired(&self, entry: &CachedDiff) -> bool {
        match self.ttl {
            Some(ttl) => entry.created_at + ttl <= Utc::now(),
            None => false,
        }
    }
}

impl CacheTier for InMemoryCacheTier {
    fn get(&self, key: &CacheKey) -> CacheResult<Option<CachedDiff>> {
        {
            let entries = self.entries.read().expect("lock poisoned");
            match entries.get(key) {
                Some(entry) if !self.is_expired(entry) => return Ok(Some(entry.clone())),
                None => return Ok(None),
                Some(_) => {}
            }
        }
        // Expired: drop it so the map does not accumulate dead entries.
        self.entries.write().expect("lock poisoned").remove(key);
        Ok(None)
    }

    fn put(&self, key: CacheKey, entry: CachedDiff) -> CacheResult<()> {
        self.entries
            .write()
            .expect("lock poisoned")
            .insert(key, entry);
        Ok(())
    }

    fn remove(&self, key: &CacheKey) -> CacheResult<bool> {
        Ok(self
            .entries
            .write()
            .expect("lock poisoned")
            .remove(key)
            .is_some())
    }

    fn remove_version(&self, version: VersionId) -> CacheResult<usize> {
        let mut entries = self.entries.write().expect("lock poisoned");
        let before = entries.len();
        entries.retain(|key, _| !key.references(version));
        Ok(before - entries.len())
    }
}

impl std::fmt::Debug for InMemoryCacheTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryCacheTier")
            .field("entries", &self.entries.read().expect("lock poisoned").len())
            .field("ttl", &self.ttl)
            .finish()
    }
}
