//! Routing error types.
//!
//! Two concerns, two enums: `BuildError` describes why a set of partition
//! descriptors could not become a routing map, `RoutingError` describes why a
//! query against a built map was rejected.

use pkroute_core::{EffectiveKey, PartitionKeyRangeId};

/// Why a routing map could not be built from a set of descriptors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    /// Overlapping ranges or duplicate ids. The source metadata is corrupt;
    /// rebuilding from the same input will fail again.
    #[error("inconsistent partition key ranges: {reason}")]
    Inconsistent {
        /// What was wrong with the input.
        reason: String,
    },

    /// The ranges are self-consistent but do not cover the whole key space.
    /// Typical while a split is still propagating; re-fetch and retry.
    #[error("incomplete partition key ranges: {reason}")]
    Incomplete {
        /// Which part of the key space is uncovered.
        reason: String,
    },

    /// More partitions than the configured maximum.
    #[error("too many partition key ranges: {count} (max {max})")]
    LimitExceeded {
        /// Number of ranges supplied.
        count: usize,
        /// Maximum allowed.
        max: usize,
    },
}

impl BuildError {
    /// Returns true if re-fetching the descriptors and retrying may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Incomplete { .. })
    }
}

/// Errors from routing queries and value construction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RoutingError {
    /// The caller supplied an invalid argument. A programming error; never
    /// retried.
    #[error("invalid argument '{name}': {reason}")]
    InvalidArgument {
        /// The name of the argument.
        name: &'static str,
        /// Why it was invalid.
        reason: String,
    },

    /// The id is not part of the current snapshot. Rebuild and retry.
    #[error("partition key range not found: {id}")]
    NotFound {
        /// The id that was looked up.
        id: PartitionKeyRangeId,
    },

    /// The key lies outside the key space covered by the map.
    #[error("effective partition key {key:?} is outside [{minimum:?}, {maximum:?})")]
    KeyOutOfRange {
        /// The key that was looked up.
        key: EffectiveKey,
        /// Inclusive lower bound of the key space.
        minimum: EffectiveKey,
        /// Exclusive upper bound of the key space.
        maximum: EffectiveKey,
    },
}

/// Result type for routing queries.
pub type RoutingResult<T> = Result<T, RoutingError>;
