//! Order-normalized cache keys.

use serde::{Deserialize, Serialize};

use rev_diff::Granularity;
use rev_types::VersionId;

/// Cache key for a comparison between two versions.
///
/// The pair is order-normalized: `(a, b)` and `(b, a)` map to the same key,
/// since either direction's diff is cheaply derived from the other by
/// swapping inserts and deletes. Granularity is part of the key because
/// character, word, and line scripts over the same pair differ.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheKey {
    low: VersionId,
    high: VersionId,
    granularity: Granularity,
}

impl CacheKey {
    /// Build the key for a version pair, normalizing the order.
    pub fn new(a: VersionId, b: VersionId, granularity: Granularity) -> Self {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        Self {
            low,
            high,
            granularity,
        }
    }

    /// The smaller id of the pair; stored diffs run from `low` to `high`.
    pub fn low(&self) -> VersionId {
        self.low
    }

    /// The larger id of the pair.
    pub fn high(&self) -> VersionId {
        self.high
    }

    /// The granularity this key covers.
    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    /// Returns `true` if either side of the pair is `version`.
    pub fn references(&self, version: VersionId) -> bool {
        self.low == version || self.high == version
    }

    /// Whether a lookup for `(from, to)` reads this key in the stored
    /// direction (`false` means the caller needs the inverted diff).
    pub fn is_stored_direction(&self, from: VersionId) -> bool {
        self.low == from
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_orders_produce_the_same_key() {
        let a = VersionId::new();
        let b = VersionId::new();
        assert_eq!(
            CacheKey::new(a, b, Granularity::Word),
            CacheKey::new(b, a, Granularity::Word)
        );
    }

    #[test]
    fn granularity_separates_keys() {
        let a = VersionId::new();
        let b = VersionId::new();
        assert_ne!(
            CacheKey::new(a, b, Granularity::Word),
            CacheKey::new(a, b, Granularity::Line)
        );
    }

    #[test]
    fn references_either_side() {
        let a = VersionId::new();
        let b = VersionId::new();
        let key = CacheKey::new(a, b, Granularity::Word);
        assert!(key.references(a));
        assert!(key.references(b));
        assert!(!key.references(VersionId::new()));
    }

    #[test]
    fn stored_direction_is_low_to_high() {
        let a = VersionId::new();
        let b = VersionId::new();
        let key = CacheKey::new(a, b, Granularity::Word);
        assert!(key.is_stored_direction(key.low()));
        assert!(!key.is_stored_direction(key.high()));
    }
}
