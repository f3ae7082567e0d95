//! Routing map configuration.

use pkroute_core::KeySpace;

/// Maximum number of partition key ranges in one routing map.
pub const PARTITION_KEY_RANGES_MAX: usize = 65_536;

/// Configuration for building a routing map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingMapConfig {
    /// The key space the map must cover completely.
    pub key_space: KeySpace,
    /// Maximum number of partition key ranges accepted.
    pub max_partitions: usize,
}

impl RoutingMapConfig {
    /// Creates a configuration with the default key space and limits.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the key space.
    #[must_use]
    pub fn with_key_space(mut self, key_space: KeySpace) -> Self {
        self.key_space = key_space;
        self
    }

    /// Sets the partition limit.
    #[must_use]
    pub fn with_max_partitions(mut self, max_partitions: usize) -> Self {
        self.max_partitions = max_partitions;
        self
    }
}

impl Default for RoutingMapConfig {
    fn default() -> Self {
        Self {
            key_space: KeySpace::default(),
            max_partitions: PARTITION_KEY_RANGES_MAX,
        }
    }
}
