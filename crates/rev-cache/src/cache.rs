//! The two-tier comparison cache.

use std::sync::Arc;

use chrono::Duration;

use rev_diff::{Granularity, PayloadDiff};
use rev_types::VersionId;

use crate::key::CacheKey;
use crate::tier::{CacheTier, CachedDiff, InMemoryCacheTier};

/// Memoizes version comparisons across a fast volatile tier and a durable
/// fallback tier.
///
/// Lookups check the volatile tier first, then the durable tier (a durable
/// hit repopulates the volatile tier). On a full miss the supplied compute
/// closure runs and the result is written to both tiers. Entries are stored
/// in the order-normalized direction; a reversed lookup is answered by
/// inverting the stored diff, never by recomputing.
///
/// Tier failures are logged and treated as misses — a broken cache backend
/// degrades performance, not correctness.
pub struct ComparisonCache {
    volatile: Arc<dyn CacheTier>,
    durable: Arc<dyn CacheTier>,
}

impl ComparisonCache {
    /// Build a cache over explicit tiers.
    pub fn new(volatile: Arc<dyn CacheTier>, durable: Arc<dyn CacheTier>) -> Self {
        Self { volatile, durable }
    }

    /// An all-in-memory cache with the standard 24 hour volatile TTL.
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(InMemoryCacheTier::volatile(Duration::hours(24))),
            Arc::new(InMemoryCacheTier::durable()),
        )
    }

    /// Fetch the diff for `(from, to)` at `granularity`, computing it with
    /// `compute` only on a full miss.
    ///
    /// `compute` must produce the diff in the `from`-to-`to` direction; the
    /// cache handles order normalization internally.
    pub fn get_or_compute<F>(
        &self,
        from: VersionId,
        to: VersionId,
        granularity: Granularity,
        compute: F,
    ) -> PayloadDiff
    where
        F: FnOnce() -> PayloadDiff,
    {
        let key = CacheKey::new(from, to, granularity);
        let forward = key.is_stored_direction(from);

        match self.volatile.get(&key) {
            Ok(Some(entry)) => {
                tracing::debug!(?key, "volatile cache hit");
                return oriented(&entry, forward);
            }
            Ok(None) => {}
            Err(err) => tracing::warn!(%err, "volatile tier lookup failed"),
        }

        match self.durable.get(&key) {
            Ok(Some(entry)) => {
                tracing::debug!(?key, "durable cache hit");
                if let Err(err) = self.volatile.put(key, entry.clone()) {
                    tracing::warn!(%err, "volatile tier repopulation failed");
                }
                return oriented(&entry, forward);
            }
            Ok(None) => {}
            Err(err) => tracing::warn!(%err, "durable tier lookup failed"),
        }

        tracing::debug!(?key, "cache miss, computing diff");
        let computed = compute();
        let stored = if forward {
            computed.clone()
        } else {
            computed.invert()
        };
        let entry = CachedDiff::new(stored);
        if let Err(err) = self.volatile.put(key, entry.clone()) {
            tracing::warn!(%err, "volatile tier write failed");
        }
        if let Err(err) = self.durable.put(key, entry) {
            tracing::warn!(%err, "durable tier write failed");
        }
        computed
    }

    /// Drop every cached comparison referencing `version` from both tiers.
    ///
    /// Returns how many entries were removed. Called when versions are
    /// deleted by retention cleanup.
    pub fn remove_version(&self, version: VersionId) -> usize {
        let mut removed = 0;
        for tier in [&self.volatile, &self.durable] {
            match tier.remove_version(version) {
                Ok(n) => removed += n,
                Err(err) => tracing::warn!(%err, "cache cascade removal failed"),
            }
        }
        removed
    }
}

fn oriented(entry: &CachedDiff, forward: bool) -> PayloadDiff {
    if forward {
        entry.diff.clone()
    } else {
        entry.diff.invert()
    }
}

impl std::fmt::Debug for ComparisonCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComparisonCache").finish_non_exhaustive()
    }
}
