//! Partition key range descriptors.
//!
//! A partition key range names the slice `[min_inclusive, max_exclusive)` of
//! the effective partition key space owned by one physical partition.
//! Descriptors arrive from the metadata fetch in the service's JSON shape.

use pkroute_core::{EffectiveKey, PartitionKeyRangeId};
use serde::{Deserialize, Serialize};

use crate::error::{RoutingError, RoutingResult};
use crate::range::Range;

/// Ownership of one half-open slice of the key space by one partition.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartitionKeyRange {
    /// Unique id within one routing map.
    pub id: PartitionKeyRangeId,
    /// Start of the range (inclusive).
    pub min_inclusive: EffectiveKey,
    /// End of the range (exclusive).
    pub max_exclusive: EffectiveKey,
    /// Ids of the ranges this one was split from.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parents: Vec<PartitionKeyRangeId>,
}

impl PartitionKeyRange {
    /// Creates a new partition key range with no parents.
    ///
    /// # Errors
    ///
    /// Returns `RoutingError::InvalidArgument` if `min_inclusive >= max_exclusive`.
    pub fn new(
        id: impl Into<PartitionKeyRangeId>,
        min_inclusive: impl Into<EffectiveKey>,
        max_exclusive: impl Into<EffectiveKey>,
    ) -> RoutingResult<Self> {
        let min_inclusive = min_inclusive.into();
        let max_exclusive = max_exclusive.into();
        if min_inclusive >= max_exclusive {
            return Err(RoutingError::InvalidArgument {
                name: "partition_key_range",
                reason: format!("min {min_inclusive:?} must be < max {max_exclusive:?}"),
            });
        }
        Ok(Self {
            id: id.into(),
            min_inclusive,
            max_exclusive,
            parents: Vec::new(),
        })
    }

    /// Records the ranges this one was split from.
    #[must_use]
    pub fn with_parents(mut self, parents: Vec<PartitionKeyRangeId>) -> Self {
        self.parents = parents;
        self
    }

    /// Returns true if this range owns the given key.
    #[must_use]
    pub fn contains(&self, key: &EffectiveKey) -> bool {
        *key >= self.min_inclusive && *key < self.max_exclusive
    }

    /// Returns true if this range shares at least one key with `range`.
    ///
    /// Equivalent to `self.to_range().overlaps(range)` without cloning keys.
    #[must_use]
    pub fn overlaps(&self, range: &Range<EffectiveKey>) -> bool {
        // The maximum is exclusive, so a range starting on it never overlaps.
        if range.is_empty() || *range.low() >= self.max_exclusive {
            return false;
        }
        match self.min_inclusive.cmp(range.high()) {
            std::cmp::Ordering::Less => true,
            std::cmp::Ordering::Equal => range.is_high_inclusive(),
            std::cmp::Ordering::Greater => false,
        }
    }

    /// Returns the range as a query-side `[min, max)` interval.
    #[must_use]
    pub fn to_range(&self) -> Range<EffectiveKey> {
        Range::new_unchecked(
            self.min_inclusive.clone(),
            self.max_exclusive.clone(),
            true,
            false,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_is_half_open() {
        let range = PartitionKeyRange::new("1", "30", "50").unwrap();

        assert!(range.contains(&"30".into()));
        assert!(range.contains(&"4F".into()));
        assert!(range.contains(&"4FFFFF".into()));
        assert!(!range.contains(&"50".into()));
        assert!(!range.contains(&"2F".into()));
    }

    #[test]
    fn test_new_rejects_empty_range() {
        assert!(PartitionKeyRange::new("1", "30", "30").is_err());
        assert!(PartitionKeyRange::new("1", "50", "30").is_err());
    }

    #[test]
    fn test_to_range() {
        let range = PartitionKeyRange::new("1", "30", "50").unwrap().to_range();
        assert_eq!(range.low().as_str(), "30");
        assert_eq!(range.high().as_str(), "50");
        assert!(range.is_low_inclusive());
        assert!(!range.is_high_inclusive());
    }

    #[test]
    fn test_overlaps_matches_interval_overlap() {
        let partition = PartitionKeyRange::new("1", "30", "50").unwrap();
        let queries: [Range<EffectiveKey>; 7] = [
            Range::new("20".into(), "30".into(), true, false).unwrap(),
            Range::new("20".into(), "30".into(), true, true).unwrap(),
            Range::new("30".into(), "30".into(), true, true).unwrap(),
            Range::new("4F".into(), "50".into(), false, true).unwrap(),
            Range::new("50".into(), "60".into(), true, true).unwrap(),
            Range::new("40".into(), "40".into(), false, false).unwrap(),
            Range::new("".into(), "FF".into(), true, false).unwrap(),
        ];
        let expected = [false, true, true, true, false, false, true];

        for (query, expected) in queries.iter().zip(expected) {
            assert_eq!(partition.overlaps(query), expected, "query {query}");
            assert_eq!(partition.to_range().overlaps(query), expected, "query {query}");
        }
    }

    #[test]
    fn test_deserialize_service_descriptor() {
        let json = r#"{
            "id": "3",
            "minInclusive": "05C1C9CD673398",
            "maxExclusive": "FF",
            "parents": ["0", "1"]
        }"#;
        let range: PartitionKeyRange = serde_json::from_str(json).unwrap();

        assert_eq!(range.id.as_str(), "3");
        assert_eq!(range.min_inclusive.as_str(), "05C1C9CD673398");
        assert_eq!(range.max_exclusive, EffectiveKey::maximum());
        assert_eq!(
            range.parents,
            vec![PartitionKeyRangeId::from("0"), PartitionKeyRangeId::from("1")]
        );
    }

    #[test]
    fn test_deserialize_without_parents() {
        let json = r#"{"id": "0", "minInclusive": "", "maxExclusive": "FF"}"#;
        let range: PartitionKeyRange = serde_json::from_str(json).unwrap();
        assert!(range.parents.is_empty());
        assert_eq!(serde_json::to_string(&range).unwrap(), json.replace(' ', ""));
    }
}
