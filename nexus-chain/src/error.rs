//! Error type shared by every container in the crate.

use std::collections::TryReserveError;
use std::convert::Infallible;

/// Errors reported at the container API boundary.
///
/// A failed operation never leaves a partially mutated container behind:
/// positions are validated and storage is reserved before any link changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The operation needs at least one element.
    #[error("container is empty")]
    Empty,

    /// A positional operation was given an index outside the valid range.
    #[error("index {index} out of range for length {len}")]
    IndexOutOfRange {
        /// The requested position.
        index: usize,
        /// The length observed while walking the chain.
        len: usize,
    },

    /// Node storage could not grow, either because the allocator refused
    /// or because a bounded arena reached its limit.
    #[error("out of memory: node storage exhausted")]
    OutOfMemory,
}

/// Result alias defaulting to [`Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;

impl From<TryReserveError> for Error {
    fn from(_: TryReserveError) -> Self {
        Error::OutOfMemory
    }
}

impl From<Infallible> for Error {
    fn from(never: Infallible) -> Self {
        match never {}
    }
}
