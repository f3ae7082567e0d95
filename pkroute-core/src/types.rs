//! Strongly-typed keys and identifiers for routing.
//!
//! Following `TigerStyle`: explicit types prevent bugs from mixing up a
//! partition key range id with an effective partition key. Both are strings
//! on the wire, so both are string newtypes here.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Inclusive lower bound of the effective partition key space.
pub const EFFECTIVE_KEY_MIN_INCLUSIVE: &str = "";

/// Exclusive upper bound of the effective partition key space.
pub const EFFECTIVE_KEY_MAX_EXCLUSIVE: &str = "FF";

/// Macro to generate strongly-typed string wrappers.
///
/// Each wrapper provides:
/// - Type safety (can't pass an `EffectiveKey` where an id is expected)
/// - Transparent serde so descriptors deserialize from plain strings
/// - Debug/Display formatting
macro_rules! define_string_type {
    ($name:ident, $prefix:expr, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates a new value from anything convertible into a `String`.
            #[inline]
            #[must_use]
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Returns the underlying string.
            #[inline]
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consumes the wrapper, returning the underlying string.
            #[inline]
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({:?})", $prefix, self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self::new(value)
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_string_type!(
    EffectiveKey,
    "epk",
    "Resolved, comparable partition key used to route a request.\n\n\
     Ordering is plain byte-lexicographic string ordering; no arithmetic is \
     ever performed on keys."
);

define_string_type!(
    PartitionKeyRangeId,
    "pkr",
    "Unique identifier for a partition key range within one routing map."
);

impl EffectiveKey {
    /// The smallest key in the default key space.
    #[must_use]
    pub fn minimum() -> Self {
        Self::new(EFFECTIVE_KEY_MIN_INCLUSIVE)
    }

    /// The exclusive upper bound of the default key space.
    #[must_use]
    pub fn maximum() -> Self {
        Self::new(EFFECTIVE_KEY_MAX_EXCLUSIVE)
    }
}

impl From<u64> for PartitionKeyRangeId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}
