//! Insertion-ordered count maps.
//!
//! The complaint service returns `byDepartment` (and friends) as JSON
//! objects. Hotspot derivation walks those entries in the order the service
//! sent them, so a sorted or hashed map would change its output.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};

/// Counts keyed by tag, in JSON object key order.
pub type OrderedCounts = IndexMap<String, u64>;

/// Lookup that treats a missing key as zero.
pub trait CountLookup {
    /// Returns the count for `key`, or `0` when absent.
    fn count(&self, key: &str) -> u64;
}

impl CountLookup for OrderedCounts {
    fn count(&self, key: &str) -> u64 {
        self.get(key).copied().unwrap_or(0)
    }
}

/// Decodes a count map, treating `null` as empty.
pub(crate) fn nullable_counts<'de, D>(deserializer: D) -> Result<OrderedCounts, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<OrderedCounts>::deserialize(deserializer)?.unwrap_or_default())
}
