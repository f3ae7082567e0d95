//! Routing map snapshot - the atomically swapped "current" map.
//!
//! Readers take a cheap `Arc` clone of the current map and query it without
//! further locking. Refreshes build a complete successor first and only then
//! swap it in, so a reader can observe a stale map but never a partial one.

use std::sync::{Arc, PoisonError, RwLock};

use tracing::debug;

use crate::error::BuildError;
use crate::partition_range::PartitionKeyRange;
use crate::routing_map::RoutingMap;

#[derive(Debug)]
struct Current<I> {
    map: Arc<RoutingMap<I>>,
    /// Incremented on every swap.
    generation: u64,
}

/// Holder of the current routing map for one collection.
#[derive(Debug)]
pub struct RoutingMapSnapshot<I> {
    current: RwLock<Current<I>>,
}

impl<I> RoutingMapSnapshot<I> {
    /// Creates a holder whose first generation is `map`.
    #[must_use]
    pub fn new(map: RoutingMap<I>) -> Self {
        Self {
            current: RwLock::new(Current {
                map: Arc::new(map),
                generation: 1,
            }),
        }
    }

    /// Returns the current map.
    #[must_use]
    pub fn current(&self) -> Arc<RoutingMap<I>> {
        self.load().0
    }

    /// Returns the current generation.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.load().1
    }

    fn load(&self) -> (Arc<RoutingMap<I>>, u64) {
        // The guarded value is only ever replaced whole, so a poisoned lock
        // still holds a valid map.
        let current = self.current.read().unwrap_or_else(PoisonError::into_inner);
        (Arc::clone(&current.map), current.generation)
    }

    /// Replaces the current map, returning the new generation.
    pub fn replace(&self, map: RoutingMap<I>) -> u64 {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        current.map = Arc::new(map);
        current.generation += 1;
        debug!(
            generation = current.generation,
            partitions = current.map.len(),
            "Swapped routing map"
        );
        current.generation
    }
}

impl<I: Clone> RoutingMapSnapshot<I> {
    /// Absorbs freshly fetched ranges into the current map.
    ///
    /// The successor is built from a snapshot with no lock held, then swapped
    /// in only if no other swap happened meanwhile; otherwise the build is
    /// retried against the newer map. On error the current map stays in
    /// place.
    ///
    /// # Errors
    ///
    /// Returns the `BuildError` from [`RoutingMap::try_combine`].
    pub fn try_combine(
        &self,
        new_ranges: impl IntoIterator<Item = (PartitionKeyRange, I)>,
    ) -> Result<Arc<RoutingMap<I>>, BuildError> {
        let new_ranges: Vec<_> = new_ranges.into_iter().collect();

        loop {
            let (base, generation) = self.load();
            let result = base.try_combine(new_ranges.iter().cloned());

            let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
            if current.generation != generation {
                debug!(
                    base = generation,
                    generation = current.generation,
                    "Routing map swapped during combine, retrying"
                );
                continue;
            }
            let next = Arc::new(result?);
            current.map = Arc::clone(&next);
            current.generation += 1;
            debug!(
                generation = current.generation,
                partitions = next.len(),
                "Swapped routing map"
            );
            return Ok(next);
        }
    }
}

impl<I> From<RoutingMap<I>> for RoutingMapSnapshot<I> {
    fn from(map: RoutingMap<I>) -> Self {
        Self::new(map)
    }
}
