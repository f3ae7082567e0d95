//! Range merger - resolves many query ranges against a routing map.
//!
//! Given query ranges sorted by lower bound and mutually disjoint, a single
//! forward sweep over the sorted partitions finds every partition that
//! intersects any query. The partition cursor only moves forward, so the
//! pass is `O(partitions + queries)`.

use std::cmp::Ordering;

use pkroute_core::EffectiveKey;

use crate::error::{RoutingError, RoutingResult};
use crate::partition_range::PartitionKeyRange;
use crate::range::Range;
use crate::routing_map::{starts_after, RoutingMap};

/// Returns the partitions overlapping at least one of `queries`.
///
/// The result is ascending by `min_inclusive` and free of duplicates. Empty
/// query ranges match nothing and are ignored, including by the ordering
/// checks.
///
/// # Errors
///
/// Returns `RoutingError::InvalidArgument` if the non-empty queries are not
/// sorted by lower bound or if any two of them overlap (touching boundaries
/// that are both inclusive count as overlapping). Input is never reordered
/// or merged on the caller's behalf.
pub fn overlapping_partitions<'a, I>(
    map: &'a RoutingMap<I>,
    queries: &[Range<EffectiveKey>],
) -> RoutingResult<Vec<&'a PartitionKeyRange>> {
    validate_queries(queries)?;

    let partitions = map.ordered_partitions();
    let mut matched: Vec<&PartitionKeyRange> = Vec::new();
    let mut last_matched: Option<usize> = None;
    let mut cursor = 0;

    for query in queries.iter().filter(|query| !query.is_empty()) {
        // Partitions ending at or before the query start contribute nothing.
        while cursor < partitions.len() && partitions[cursor].max_exclusive <= *query.low() {
            cursor += 1;
        }

        let mut index = cursor;
        while index < partitions.len() && !starts_after(&partitions[index], query) {
            let partition = &partitions[index];
            if partition.overlaps(query) {
                // Adjacent queries touching one boundary can share a partition.
                if last_matched != Some(index) {
                    matched.push(partition);
                    last_matched = Some(index);
                }
                // The last matched partition may also own the next query's start.
                cursor = index;
            }
            index += 1;
        }
    }

    Ok(matched)
}

/// Checks that non-empty queries are sorted by lower bound and disjoint.
///
/// Comparing each query with its predecessor suffices: sorted by lower bound
/// and pairwise-adjacent disjoint implies all pairs are disjoint.
fn validate_queries(queries: &[Range<EffectiveKey>]) -> RoutingResult<()> {
    let mut previous: Option<(usize, &Range<EffectiveKey>)> = None;

    for (index, query) in queries.iter().enumerate() {
        if query.is_empty() {
            continue;
        }
        if let Some((previous_index, previous_query)) = previous {
            if query.cmp_low(previous_query) == Ordering::Less {
                return Err(RoutingError::InvalidArgument {
                    name: "queries",
                    reason: format!(
                        "range {index} {query} starts before range {previous_index} {previous_query}"
                    ),
                });
            }
            if query.overlaps(previous_query) {
                return Err(RoutingError::InvalidArgument {
                    name: "queries",
                    reason: format!(
                        "range {index} {query} overlaps range {previous_index} {previous_query}"
                    ),
                });
            }
        }
        previous = Some((index, query));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pkr(id: &str, min: &str, max: &str) -> PartitionKeyRange {
        PartitionKeyRange::new(id, min, max).unwrap()
    }

    fn scenario() -> RoutingMap<()> {
        RoutingMap::try_build(vec![
            (pkr("P0", "", "30"), ()),
            (pkr("P1", "30", "50"), ()),
            (pkr("P2", "50", "70"), ()),
            (pkr("P3", "70", "FF"), ()),
        ])
        .unwrap()
    }

    fn closed(low: &str, high: &str) -> Range<EffectiveKey> {
        Range::new(low.into(), high.into(), true, true).unwrap()
    }

    fn half_open(low: &str, high: &str) -> Range<EffectiveKey> {
        Range::half_open(low.into(), high.into()).unwrap()
    }

    fn ids(map: &RoutingMap<()>, queries: &[Range<EffectiveKey>]) -> Vec<String> {
        overlapping_partitions(map, queries)
            .unwrap()
            .iter()
            .map(|r| r.id.to_string())
            .collect()
    }

    #[test]
    fn test_two_closed_queries() {
        let map = scenario();
        let queries = [closed("40", "45"), closed("46", "50")];
        assert_eq!(ids(&map, &queries), vec!["P1", "P2"]);
    }

    #[test]
    fn test_full_space_returns_everything() {
        let map = scenario();
        let queries = [half_open("", "FF")];
        assert_eq!(ids(&map, &queries), vec!["P0", "P1", "P2", "P3"]);
    }

    #[test]
    fn test_point_query_returns_exactly_one() {
        let map = scenario();
        for (key, expected) in [("", "P0"), ("30", "P1"), ("4F", "P1"), ("50", "P2"), ("FE", "P3")] {
            let queries = [Range::point(EffectiveKey::from(key))];
            assert_eq!(ids(&map, &queries), vec![expected], "key {key:?}");
        }
    }

    #[test]
    fn test_no_queries() {
        let map = scenario();
        assert!(ids(&map, &[]).is_empty());
    }

    #[test]
    fn test_empty_queries_are_skipped() {
        let map = scenario();
        let empty: Range<EffectiveKey> =
            Range::new("60".into(), "60".into(), false, false).unwrap();

        assert!(ids(&map, &[empty.clone()]).is_empty());
        // An empty range out of order does not trip the ordering check.
        let queries = [closed("10", "20"), empty, closed("40", "41")];
        assert_eq!(ids(&map, &queries), vec!["P0", "P1"]);
    }

    #[test]
    fn test_adjacent_queries_share_partition_once() {
        let map = scenario();
        let queries = [half_open("32", "35"), half_open("35", "38"), closed("38", "39")];
        assert_eq!(ids(&map, &queries), vec!["P1"]);
    }

    #[test]
    fn test_queries_skip_partitions_between_them() {
        let map = scenario();
        let queries = [closed("10", "10"), closed("80", "90")];
        assert_eq!(ids(&map, &queries), vec!["P0", "P3"]);
    }

    #[test]
    fn test_exclusive_upper_bound_on_partition_boundary() {
        let map = scenario();
        assert_eq!(ids(&map, &[half_open("40", "50")]), vec!["P1"]);
        assert_eq!(ids(&map, &[closed("40", "50")]), vec!["P1", "P2"]);
    }

    #[test]
    fn test_unsorted_queries_rejected() {
        let map = scenario();
        let queries = [closed("46", "50"), closed("40", "45")];
        let err = overlapping_partitions(&map, &queries).unwrap_err();
        assert!(matches!(err, RoutingError::InvalidArgument { name: "queries", .. }));
    }

    #[test]
    fn test_overlapping_queries_rejected() {
        let map = scenario();

        let queries = [closed("40", "45"), closed("44", "50")];
        assert!(overlapping_partitions(&map, &queries).is_err());

        // Touching with both ends inclusive counts as overlapping.
        let queries = [closed("40", "45"), closed("45", "50")];
        assert!(overlapping_partitions(&map, &queries).is_err());

        // Touching with one end exclusive is fine.
        let queries = [half_open("40", "45"), closed("45", "50")];
        assert!(overlapping_partitions(&map, &queries).is_ok());
    }

    #[test]
    fn test_same_low_bound_rejected() {
        let map = scenario();
        let queries = [closed("40", "41"), closed("40", "42")];
        assert!(overlapping_partitions(&map, &queries).is_err());
    }
}
