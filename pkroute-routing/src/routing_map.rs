//! Routing map - complete, validated partitioning of the key space.
//!
//! The routing map defines which partition key range owns which slice of the
//! effective partition key space. It is built once from a flat list of
//! descriptors, never mutated, and replaced wholesale when the partition
//! topology changes.

use std::collections::{HashMap, HashSet};

use pkroute_core::{EffectiveKey, KeySpace, PartitionKeyRangeId};
use tracing::{debug, warn};

use crate::config::RoutingMapConfig;
use crate::error::{BuildError, RoutingError, RoutingResult};
use crate::partition_range::PartitionKeyRange;
use crate::range::Range;

/// Immutable mapping from key-space intervals to partitions.
///
/// Invariants, checked at construction:
/// - ranges are sorted by `min_inclusive` and contiguous
///   (`ranges[i].max_exclusive == ranges[i + 1].min_inclusive`)
/// - the first range starts at the key space minimum and the last range ends
///   at the key space maximum
/// - ids are unique
///
/// `I` is opaque per-partition information carried alongside each range,
/// index-aligned with the ranges.
#[derive(Debug, Clone)]
pub struct RoutingMap<I> {
    /// Ranges sorted by `min_inclusive`.
    ranges: Vec<PartitionKeyRange>,
    /// Per-range information, same index as `ranges`.
    infos: Vec<I>,
    /// Id to index into `ranges`.
    index_by_id: HashMap<PartitionKeyRangeId, usize>,
    /// Ids superseded by splits absorbed through `try_combine`.
    gone: HashSet<PartitionKeyRangeId>,
    /// Build configuration, reused by `try_combine`.
    config: RoutingMapConfig,
}

impl<I> RoutingMap<I> {
    /// Builds a routing map over the default key space.
    ///
    /// # Errors
    ///
    /// - `BuildError::Inconsistent` if ranges overlap, ids repeat, or a range
    ///   is malformed or reaches outside the key space.
    /// - `BuildError::Incomplete` if the ranges leave part of the key space
    ///   uncovered.
    /// - `BuildError::LimitExceeded` if there are too many ranges.
    pub fn try_build(
        pairs: impl IntoIterator<Item = (PartitionKeyRange, I)>,
    ) -> Result<Self, BuildError> {
        Self::try_build_with_config(&RoutingMapConfig::default(), pairs)
    }

    /// Builds a routing map with an explicit configuration.
    ///
    /// # Errors
    ///
    /// See [`RoutingMap::try_build`].
    pub fn try_build_with_config(
        config: &RoutingMapConfig,
        pairs: impl IntoIterator<Item = (PartitionKeyRange, I)>,
    ) -> Result<Self, BuildError> {
        let result = Self::build(config.clone(), pairs.into_iter().collect(), HashSet::new());
        log_build_outcome("build", &result);
        result
    }

    fn build(
        config: RoutingMapConfig,
        mut pairs: Vec<(PartitionKeyRange, I)>,
        gone: HashSet<PartitionKeyRangeId>,
    ) -> Result<Self, BuildError> {
        if pairs.len() > config.max_partitions {
            return Err(BuildError::LimitExceeded {
                count: pairs.len(),
                max: config.max_partitions,
            });
        }
        if pairs.is_empty() {
            return Err(BuildError::Incomplete {
                reason: "no partition key ranges".to_string(),
            });
        }

        if let Some((range, _)) = pairs
            .iter()
            .find(|(range, _)| range.min_inclusive >= range.max_exclusive)
        {
            return Err(BuildError::Inconsistent {
                reason: format!(
                    "range {} has min {:?} >= max {:?}",
                    range.id, range.min_inclusive, range.max_exclusive
                ),
            });
        }

        // Stable: equal minimums keep input order, and are rejected below anyway.
        pairs.sort_by(|(a, _), (b, _)| a.min_inclusive.cmp(&b.min_inclusive));

        let mut index_by_id = HashMap::with_capacity(pairs.len());
        let mut first_gap: Option<String> = None;

        for (index, (range, _)) in pairs.iter().enumerate() {
            if index_by_id.insert(range.id.clone(), index).is_some() {
                return Err(BuildError::Inconsistent {
                    reason: format!("duplicate range id {}", range.id),
                });
            }

            let Some((previous, _)) = index.checked_sub(1).map(|i| &pairs[i]) else {
                continue;
            };
            if range.min_inclusive < previous.max_exclusive {
                return Err(BuildError::Inconsistent {
                    reason: format!(
                        "range {} starting at {:?} overlaps range {} ending at {:?}",
                        range.id, range.min_inclusive, previous.id, previous.max_exclusive
                    ),
                });
            }
            if range.min_inclusive > previous.max_exclusive && first_gap.is_none() {
                first_gap = Some(format!(
                    "gap [{:?}, {:?}) between ranges {} and {}",
                    previous.max_exclusive, range.min_inclusive, previous.id, range.id
                ));
            }
        }

        let space = &config.key_space;
        // Non-empty: checked above.
        let first = &pairs[0].0;
        let last = &pairs[pairs.len() - 1].0;

        if first.min_inclusive < *space.minimum() || last.max_exclusive > *space.maximum() {
            return Err(BuildError::Inconsistent {
                reason: format!(
                    "ranges span [{:?}, {:?}) outside key space [{:?}, {:?})",
                    first.min_inclusive,
                    last.max_exclusive,
                    space.minimum(),
                    space.maximum()
                ),
            });
        }
        if first.min_inclusive > *space.minimum() {
            return Err(BuildError::Incomplete {
                reason: format!(
                    "first range starts at {:?}, key space starts at {:?}",
                    first.min_inclusive,
                    space.minimum()
                ),
            });
        }
        if last.max_exclusive < *space.maximum() {
            return Err(BuildError::Incomplete {
                reason: format!(
                    "last range ends at {:?}, key space ends at {:?}",
                    last.max_exclusive,
                    space.maximum()
                ),
            });
        }
        if let Some(reason) = first_gap {
            return Err(BuildError::Incomplete { reason });
        }

        let (ranges, infos) = pairs.into_iter().unzip();
        Ok(Self {
            ranges,
            infos,
            index_by_id,
            gone,
            config,
        })
    }

    /// Returns the partition key range that owns `key`.
    ///
    /// Because the map is contiguous and gap-free, every key inside the key
    /// space has exactly one owner.
    ///
    /// # Errors
    ///
    /// Returns `RoutingError::KeyOutOfRange` if `key` is outside the key space.
    pub fn partition_by_key(&self, key: &EffectiveKey) -> RoutingResult<&PartitionKeyRange> {
        self.index_by_key(key).map(|index| &self.ranges[index])
    }

    /// Returns the partition key range and its information for `key`.
    ///
    /// # Errors
    ///
    /// Returns `RoutingError::KeyOutOfRange` if `key` is outside the key space.
    pub fn entry_by_key(&self, key: &EffectiveKey) -> RoutingResult<(&PartitionKeyRange, &I)> {
        self.index_by_key(key)
            .map(|index| (&self.ranges[index], &self.infos[index]))
    }

    fn index_by_key(&self, key: &EffectiveKey) -> RoutingResult<usize> {
        let space = &self.config.key_space;
        if !space.contains(key) {
            return Err(RoutingError::KeyOutOfRange {
                key: key.clone(),
                minimum: space.minimum().clone(),
                maximum: space.maximum().clone(),
            });
        }
        // Greatest index whose minimum is <= key.
        self.ranges
            .partition_point(|range| range.min_inclusive <= *key)
            .checked_sub(1)
            .ok_or_else(|| RoutingError::KeyOutOfRange {
                key: key.clone(),
                minimum: space.minimum().clone(),
                maximum: space.maximum().clone(),
            })
    }

    /// Returns the partition key range with the given id.
    ///
    /// # Errors
    ///
    /// Returns `RoutingError::NotFound` if the id is not in this snapshot.
    pub fn partition_by_id(&self, id: &PartitionKeyRangeId) -> RoutingResult<&PartitionKeyRange> {
        self.index_by_id(id).map(|index| &self.ranges[index])
    }

    /// Returns the information stored for the given id.
    ///
    /// # Errors
    ///
    /// Returns `RoutingError::NotFound` if the id is not in this snapshot.
    pub fn info_by_id(&self, id: &PartitionKeyRangeId) -> RoutingResult<&I> {
        self.index_by_id(id).map(|index| &self.infos[index])
    }

    fn index_by_id(&self, id: &PartitionKeyRangeId) -> RoutingResult<usize> {
        self.index_by_id
            .get(id)
            .copied()
            .ok_or_else(|| RoutingError::NotFound { id: id.clone() })
    }

    /// Returns every partition key range overlapping `range`, ascending.
    #[must_use]
    pub fn overlapping_ranges(&self, range: &Range<EffectiveKey>) -> Vec<&PartitionKeyRange> {
        if range.is_empty() {
            return Vec::new();
        }
        let start = self
            .ranges
            .partition_point(|partition| partition.min_inclusive <= *range.low())
            .saturating_sub(1);

        self.ranges[start..]
            .iter()
            .take_while(|partition| !starts_after(partition, range))
            .filter(|partition| partition.overlaps(range))
            .collect()
    }

    /// Returns true if `id` was replaced by its children in a split.
    #[must_use]
    pub fn is_gone(&self, id: &PartitionKeyRangeId) -> bool {
        self.gone.contains(id)
    }

    /// Ranges sorted by `min_inclusive`.
    #[must_use]
    pub fn ordered_partitions(&self) -> &[PartitionKeyRange] {
        &self.ranges
    }

    /// Per-range information, index-aligned with [`Self::ordered_partitions`].
    #[must_use]
    pub fn ordered_info(&self) -> &[I] {
        &self.infos
    }

    /// Iterates `(range, info)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&PartitionKeyRange, &I)> + '_ {
        self.ranges.iter().zip(self.infos.iter())
    }

    /// Number of partition key ranges.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    /// Always false for a built map; present for API symmetry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// The key space this map covers.
    #[must_use]
    pub const fn key_space(&self) -> &KeySpace {
        &self.config.key_space
    }
}

impl<I: Clone> RoutingMap<I> {
    /// Builds a successor map that absorbs freshly fetched ranges.
    ///
    /// Ranges named as `parents` by any new range, and ranges already known
    /// to be gone, are dropped. A new range with the id of an existing one
    /// replaces it. The result is validated like [`RoutingMap::try_build`];
    /// `self` is left untouched.
    ///
    /// Gone ids are kept only while some live range still lists them among
    /// its `parents`, so the set is bounded by the ancestry the service
    /// reports for the current ranges.
    ///
    /// # Errors
    ///
    /// - `BuildError::Inconsistent` if an id repeats within `new_ranges`.
    /// - Otherwise see [`RoutingMap::try_build`].
    pub fn try_combine(
        &self,
        new_ranges: impl IntoIterator<Item = (PartitionKeyRange, I)>,
    ) -> Result<Self, BuildError> {
        let result = self.combine(new_ranges.into_iter().collect());
        log_build_outcome("combine", &result);
        result
    }

    fn combine(&self, new_ranges: Vec<(PartitionKeyRange, I)>) -> Result<Self, BuildError> {
        // Only an old range may be replaced by id.
        let mut fetched_ids = HashSet::with_capacity(new_ranges.len());
        for (range, _) in &new_ranges {
            if !fetched_ids.insert(&range.id) {
                return Err(BuildError::Inconsistent {
                    reason: format!("duplicate range id {} in fetched ranges", range.id),
                });
            }
        }

        let mut gone = self.gone.clone();
        gone.extend(
            new_ranges
                .iter()
                .flat_map(|(range, _)| range.parents.iter().cloned()),
        );

        let mut by_id: HashMap<PartitionKeyRangeId, (PartitionKeyRange, I)> = self
            .iter()
            .filter(|(range, _)| !gone.contains(&range.id))
            .map(|(range, info)| (range.id.clone(), (range.clone(), info.clone())))
            .collect();
        for (range, info) in new_ranges {
            if !gone.contains(&range.id) {
                by_id.insert(range.id.clone(), (range, info));
            }
        }

        let mut map = Self::build(self.config.clone(), by_id.into_values().collect(), gone)?;

        let lineage: HashSet<&PartitionKeyRangeId> = map
            .ranges
            .iter()
            .flat_map(|range| range.parents.iter())
            .collect();
        map.gone.retain(|id| lineage.contains(id));
        Ok(map)
    }
}

/// Returns true if `partition` begins past the upper bound of `range`.
pub(crate) fn starts_after(partition: &PartitionKeyRange, range: &Range<EffectiveKey>) -> bool {
    match partition.min_inclusive.cmp(range.high()) {
        std::cmp::Ordering::Less => false,
        std::cmp::Ordering::Equal => !range.is_high_inclusive(),
        std::cmp::Ordering::Greater => true,
    }
}

fn log_build_outcome<I>(operation: &'static str, result: &Result<RoutingMap<I>, BuildError>) {
    match result {
        Ok(map) => debug!(operation, partitions = map.len(), "Built routing map"),
        Err(err @ BuildError::Incomplete { .. }) => {
            debug!(operation, error = %err, "Routing map incomplete");
        }
        Err(err) => warn!(operation, error = %err, "Rejected partition key ranges"),
    }
}
