//! pkroute Core - Strongly-typed keys and identifiers for partition routing.
//!
//! This crate provides the primitives shared by the routing map: the
//! effective partition key, the partition key range identifier, and the
//! bounds of the key space a routing map must cover.
//!
//! # Design Principles (TigerStyle)
//!
//! - **Strongly-typed values**: Prevent mixing up keys with range ids
//! - **Comparison only**: Keys are ordered, never hashed or subtracted
//! - **No unsafe code**: Safety > Performance

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod error;
mod key_space;
mod types;

pub use error::{Error, Result};
pub use key_space::KeySpace;
pub use types::{
    EffectiveKey, PartitionKeyRangeId, EFFECTIVE_KEY_MAX_EXCLUSIVE, EFFECTIVE_KEY_MIN_INCLUSIVE,
};
