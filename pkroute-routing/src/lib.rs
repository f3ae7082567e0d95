//! pkroute Routing - Partition key range routing map.
//!
//! This crate maps effective partition keys to the partition key ranges
//! (physical partitions) that own them, and resolves which partitions
//! intersect an arbitrary set of query key ranges.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────┐     ┌───────────────────────┐     ┌────────────────────────┐
//! │ metadata fetch │────▶│ RoutingMap::try_build │────▶│ partition_by_key       │
//! │ (descriptors)  │     │ sort, validate, index │     │ partition_by_id        │
//! └────────────────┘     └───────────────────────┘     │ overlapping_ranges     │
//!                                    │                 │ overlapping_partitions │
//!                                    ▼                 └────────────────────────┘
//!                         RoutingMapSnapshot (Arc swap)
//! ```
//!
//! # Design (`TigerStyle`)
//!
//! - **Immutable snapshots**: Maps are rebuilt and swapped, never mutated
//! - **Explicit errors**: `Inconsistent` is fatal, `Incomplete` is retryable
//! - **Explicit limits**: Partition counts are bounded
//!
//! # Example
//!
//! ```rust
//! use pkroute_routing::{
//!     overlapping_partitions, EffectiveKey, PartitionKeyRange, Range, RoutingMap,
//! };
//!
//! let map = RoutingMap::try_build(vec![
//!     (PartitionKeyRange::new("0", "", "80").unwrap(), "east"),
//!     (PartitionKeyRange::new("1", "80", "FF").unwrap(), "west"),
//! ])
//! .unwrap();
//!
//! let owner = map.partition_by_key(&"A0".into()).unwrap();
//! assert_eq!(owner.id.as_str(), "1");
//!
//! let queries: [Range<EffectiveKey>; 1] =
//!     [Range::new("10".into(), "90".into(), true, false).unwrap()];
//! let hit = overlapping_partitions(&map, &queries).unwrap();
//! assert_eq!(hit.len(), 2);
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod config;
mod error;
mod merger;
mod partition_range;
mod range;
mod routing_map;
mod snapshot;

pub use config::{RoutingMapConfig, PARTITION_KEY_RANGES_MAX};
pub use error::{BuildError, RoutingError, RoutingResult};
pub use merger::overlapping_partitions;
pub use partition_range::PartitionKeyRange;
pub use range::Range;
pub use routing_map::RoutingMap;
pub use snapshot::RoutingMapSnapshot;

pub use pkroute_core::{EffectiveKey, KeySpace, PartitionKeyRangeId};
