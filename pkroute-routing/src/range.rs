//! Ordered intervals with independent boundary inclusivity.
//!
//! A `Range` is the query-side interval: callers describe which slice of the
//! key space they want with it, and the merger intersects those slices with
//! the partition layout.

use std::cmp::Ordering;
use std::fmt;

use crate::error::{RoutingError, RoutingResult};

/// An interval over a totally ordered type with independent inclusivity
/// flags on each boundary.
///
/// Invariant: `low <= high`. A range with `low == high` that is not
/// inclusive on both ends is empty and matches nothing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Range<T> {
    low: T,
    high: T,
    low_inclusive: bool,
    high_inclusive: bool,
}

impl<T: Ord> Range<T> {
    /// Creates a new range.
    ///
    /// # Errors
    ///
    /// Returns `RoutingError::InvalidArgument` if `low > high`.
    pub fn new(low: T, high: T, low_inclusive: bool, high_inclusive: bool) -> RoutingResult<Self> {
        if low > high {
            return Err(RoutingError::InvalidArgument {
                name: "range",
                reason: "low bound must be <= high bound".to_string(),
            });
        }
        Ok(Self {
            low,
            high,
            low_inclusive,
            high_inclusive,
        })
    }

    /// Creates a range without checking `low <= high`.
    ///
    /// Descriptors validated by the routing map always satisfy the bound.
    #[must_use]
    pub(crate) fn new_unchecked(low: T, high: T, low_inclusive: bool, high_inclusive: bool) -> Self {
        Self {
            low,
            high,
            low_inclusive,
            high_inclusive,
        }
    }

    /// Creates the range `[low, high)`.
    ///
    /// # Errors
    ///
    /// Returns `RoutingError::InvalidArgument` if `low > high`.
    pub fn half_open(low: T, high: T) -> RoutingResult<Self> {
        Self::new(low, high, true, false)
    }

    /// Creates the single-value range `[value, value]`.
    #[must_use]
    pub fn point(value: T) -> Self
    where
        T: Clone,
    {
        Self {
            low: value.clone(),
            high: value,
            low_inclusive: true,
            high_inclusive: true,
        }
    }

    /// Lower bound.
    #[must_use]
    pub const fn low(&self) -> &T {
        &self.low
    }

    /// Upper bound.
    #[must_use]
    pub const fn high(&self) -> &T {
        &self.high
    }

    /// Whether the lower bound belongs to the range.
    #[must_use]
    pub const fn is_low_inclusive(&self) -> bool {
        self.low_inclusive
    }

    /// Whether the upper bound belongs to the range.
    #[must_use]
    pub const fn is_high_inclusive(&self) -> bool {
        self.high_inclusive
    }

    /// Returns true if no value can satisfy the range.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.low == self.high && !(self.low_inclusive && self.high_inclusive)
    }

    /// Returns true if the range holds exactly one value.
    #[must_use]
    pub fn is_single_value(&self) -> bool {
        self.low == self.high && self.low_inclusive && self.high_inclusive
    }

    /// Collapses an empty range to the canonical `(x, x)` form.
    #[must_use]
    pub fn normalize(self) -> Self {
        if self.is_empty() {
            Self {
                low_inclusive: false,
                high_inclusive: false,
                ..self
            }
        } else {
            self
        }
    }

    /// Returns true if `value` lies inside the range.
    #[must_use]
    pub fn contains(&self, value: &T) -> bool {
        let above_low = match value.cmp(&self.low) {
            Ordering::Greater => true,
            Ordering::Equal => self.low_inclusive,
            Ordering::Less => false,
        };
        let below_high = match value.cmp(&self.high) {
            Ordering::Less => true,
            Ordering::Equal => self.high_inclusive,
            Ordering::Greater => false,
        };
        above_low && below_high
    }

    /// Returns true if the two ranges share at least one value.
    ///
    /// Touching boundaries overlap only when both touching ends are
    /// inclusive. Empty ranges overlap nothing.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        Self::starts_before_end(self, other) && Self::starts_before_end(other, self)
    }

    /// Returns true if `left` begins at or before the end of `right` in a way
    /// that leaves a shared value.
    fn starts_before_end(left: &Self, right: &Self) -> bool {
        match left.low.cmp(&right.high) {
            Ordering::Less => true,
            Ordering::Equal => left.low_inclusive && right.high_inclusive,
            Ordering::Greater => false,
        }
    }

    /// Compares lower bounds only. At equal values an inclusive bound sorts
    /// before an exclusive one.
    #[must_use]
    pub fn cmp_low(&self, other: &Self) -> Ordering {
        self.low
            .cmp(&other.low)
            .then_with(|| other.low_inclusive.cmp(&self.low_inclusive))
    }

    /// Compares upper bounds only. At equal values an exclusive bound sorts
    /// before an inclusive one.
    #[must_use]
    pub fn cmp_high(&self, other: &Self) -> Ordering {
        self.high
            .cmp(&other.high)
            .then_with(|| self.high_inclusive.cmp(&other.high_inclusive))
    }
}

impl<T: Ord> Ord for Range<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cmp_low(other).then_with(|| self.cmp_high(other))
    }
}

impl<T: Ord> PartialOrd for Range<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: fmt::Display> fmt::Display for Range<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let open = if self.low_inclusive { '[' } else { '(' };
        let close = if self.high_inclusive { ']' } else { ')' };
        write!(f, "{open}{:?}, {:?}{close}", self.low.to_string(), self.high.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(low: u32, high: u32, low_inclusive: bool, high_inclusive: bool) -> Range<u32> {
        Range::new(low, high, low_inclusive, high_inclusive).unwrap()
    }

    #[test]
    fn test_new_rejects_inverted_bounds() {
        let err = Range::new(5, 4, true, true).unwrap_err();
        assert!(matches!(err, RoutingError::InvalidArgument { name: "range", .. }));
    }

    #[test]
    fn test_empty_and_single_value() {
        assert!(range(3, 3, false, false).is_empty());
        assert!(range(3, 3, true, false).is_empty());
        assert!(range(3, 3, false, true).is_empty());
        assert!(!range(3, 3, true, true).is_empty());
        assert!(range(3, 3, true, true).is_single_value());
        assert!(!range(3, 4, false, false).is_empty());
    }

    #[test]
    fn test_normalize() {
        let empty = range(3, 3, true, false).normalize();
        assert_eq!(empty, range(3, 3, false, false));

        let point = Range::point(3).normalize();
        assert_eq!(point, range(3, 3, true, true));

        let wide = range(1, 9, true, false).normalize();
        assert_eq!(wide, range(1, 9, true, false));
    }

    #[test]
    fn test_contains() {
        let r = range(10, 20, true, false);
        assert!(r.contains(&10));
        assert!(r.contains(&19));
        assert!(!r.contains(&20));
        assert!(!r.contains(&9));

        let r = range(10, 20, false, true);
        assert!(!r.contains(&10));
        assert!(r.contains(&20));
    }

    #[test]
    fn test_overlaps_boundary_cases() {
        let a = range(10, 20, true, true);

        // Touching at 20: overlap only when both touching ends are inclusive.
        assert!(a.overlaps(&range(20, 30, true, false)));
        assert!(!a.overlaps(&range(20, 30, false, false)));
        assert!(!range(10, 20, true, false).overlaps(&range(20, 30, true, false)));

        // Touching at 10 from the left.
        assert!(a.overlaps(&range(0, 10, false, true)));
        assert!(!a.overlaps(&range(0, 10, false, false)));
        assert!(!range(10, 20, false, true).overlaps(&range(0, 10, true, true)));

        // Containment and disjoint.
        assert!(a.overlaps(&range(12, 14, false, false)));
        assert!(range(12, 14, false, false).overlaps(&a));
        assert!(!a.overlaps(&range(21, 30, true, true)));
    }

    #[test]
    fn test_empty_overlaps_nothing() {
        let empty = range(15, 15, false, false);
        let wide = range(0, 100, true, true);
        assert!(!empty.overlaps(&wide));
        assert!(!wide.overlaps(&empty));
        assert!(!empty.overlaps(&empty));
    }

    #[test]
    fn test_point_overlaps_itself() {
        let p = Range::point(7);
        assert!(p.overlaps(&p));
        assert!(p.overlaps(&range(0, 7, true, true)));
        assert!(!p.overlaps(&range(0, 7, true, false)));
    }

    #[test]
    fn test_ordering_by_low_then_inclusivity() {
        let inclusive = range(10, 20, true, false);
        let exclusive = range(10, 20, false, false);
        let later = range(11, 12, true, true);

        assert_ne!(inclusive, exclusive);
        assert_eq!(inclusive.cmp_low(&exclusive), Ordering::Less);
        assert!(inclusive < exclusive);
        assert!(exclusive < later);

        // Same low bound: ties broken by the high bound.
        let short = range(10, 15, true, true);
        assert!(short < inclusive);
        assert_eq!(range(10, 20, true, false).cmp_high(&range(10, 20, true, true)), Ordering::Less);

        let mut ranges = vec![later.clone(), exclusive.clone(), inclusive.clone()];
        ranges.sort();
        assert_eq!(ranges, vec![inclusive, exclusive, later]);
    }

    #[test]
    fn test_display() {
        let r = Range::half_open("05".to_string(), "FF".to_string()).unwrap();
        assert_eq!(format!("{r}"), "[\"05\", \"FF\")");
    }
}
