//! Error types for core key and identifier operations.
//!
//! Following `TigerStyle`: all errors must be handled explicitly.

/// The result type for core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while constructing core values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// An invalid argument was provided.
    #[error("invalid argument '{name}': {reason}")]
    InvalidArgument {
        /// The name of the argument.
        name: &'static str,
        /// Why it was invalid.
        reason: &'static str,
    },
}
