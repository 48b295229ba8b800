//! Two-tier memoization cache for version comparisons.
//!
//! Diff computation is the expensive step in version comparison, so results
//! are memoized by order-normalized version pair and granularity. A fast
//! volatile tier (TTL-bound, possibly network-backed) sits in front of a
//! durable tier that survives eviction; entries are immutable, so
//! invalidation is expiry and concurrent duplicate computation is harmless.
//!
//! [`ComparisonCache`] is the entry point; [`CacheTier`] is the seam for
//! real backends, with [`InMemoryCacheTier`] covering tests and embedding.

pub mod cache;
pub mod error;
pub mod key;
pub mod tier;

pub use cache::ComparisonCache;
pub use error::{CacheError, CacheResult};
pub use key::CacheKey;
pub use tier::{CacheTier, CachedDiff, InMemoryCacheTier};
