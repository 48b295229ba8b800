/// Errors from cache tier operations.
///
/// The in-memory tiers never fail; network- or database-backed tiers
/// surface their transport errors here. A failing tier degrades a lookup to
/// a miss at the [`ComparisonCache`](crate::ComparisonCache) level, it never
/// fails the comparison itself.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// The backing store for a tier is unreachable or failed.
    #[error("cache backend error: {0}")]
    Backend(String),

    /// A stored entry could not be decoded.
    #[error("corrupt cache entry: {0}")]
    CorruptEntry(String),
}

/// Result alias for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;
