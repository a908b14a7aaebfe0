//! Error types for queue operations.

use core::convert::Infallible;
use std::collections::TryReserveError;

/// Failure of a queue operation.
///
/// A failed operation never changes the queue: length, head and tail are
/// exactly as they were before the call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Memory for a value copy or a node slot could not be obtained.
    #[error("allocation failed: {0}")]
    Allocation(#[from] TryReserveError),

    /// Storage has used every index its index type can address.
    #[error("node index space exhausted at {capacity} slots")]
    IndexSpaceExhausted {
        /// Number of addressable slots.
        capacity: usize,
    },

    /// Removal from an empty queue.
    #[error("queue is empty")]
    Empty,

    /// Payload longer than the queue's configured bound.
    #[error("payload of {len} bytes exceeds the {max} byte limit")]
    PayloadTooLong {
        /// Length of the rejected payload.
        len: usize,
        /// Configured maximum.
        max: usize,
    },
}

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Out of memory or out of addressable node slots. Recoverable; retry
    /// after freeing elements.
    Allocation,
    /// The operation is not valid for the queue's current state or input.
    InvalidOperation,
}

impl Error {
    /// Returns the kind of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Allocation(_) | Self::IndexSpaceExhausted { .. } => ErrorKind::Allocation,
            Self::Empty | Self::PayloadTooLong { .. } => ErrorKind::InvalidOperation,
        }
    }
}

impl From<Infallible> for Error {
    fn from(never: Infallible) -> Self {
        match never {}
    }
}
