//! Bounds of the ordered key space partitioned by a routing map.

use crate::error::{Error, Result};
use crate::types::EffectiveKey;

/// The half-open key space `[minimum, maximum)` that a complete routing map
/// must cover without gaps.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeySpace {
    minimum: EffectiveKey,
    maximum: EffectiveKey,
}

impl KeySpace {
    /// Creates a key space.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidArgument` if `minimum >= maximum`.
    pub fn new(minimum: EffectiveKey, maximum: EffectiveKey) -> Result<Self> {
        if minimum >= maximum {
            return Err(Error::InvalidArgument {
                name: "key_space",
                reason: "minimum must be < maximum",
            });
        }
        Ok(Self { minimum, maximum })
    }

    /// Inclusive lower bound.
    #[must_use]
    pub const fn minimum(&self) -> &EffectiveKey {
        &self.minimum
    }

    /// Exclusive upper bound.
    #[must_use]
    pub const fn maximum(&self) -> &EffectiveKey {
        &self.maximum
    }

    /// Returns true if `key` lies inside `[minimum, maximum)`.
    #[must_use]
    pub fn contains(&self, key: &EffectiveKey) -> bool {
        *key >= self.minimum && *key < self.maximum
    }
}

impl Default for KeySpace {
    fn default() -> Self {
        Self {
            minimum: EffectiveKey::minimum(),
            maximum: EffectiveKey::maximum(),
        }
    }
}
