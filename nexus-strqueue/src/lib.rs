//! Singly linked byte-string queue with in-place reverse and stable sort.
//!
//! [`StrQueue`] keeps an owned copy of every pushed payload in its own node.
//! It can be used as a FIFO (`try_push_back` + `pop_front`) or a LIFO
//! (`try_push_front` + `pop_front`), and can be reversed or sorted in place
//! without touching the stored bytes.
//!
//! # Design
//!
//! Nodes do not point at each other. They live in a [`Storage`] owned by the
//! queue and link by [`Index`]:
//!
//! ```text
//! StrQueue { head, tail, len }
//!     │
//!     └── Storage (Arena)  - owns nodes, stable indices, slot reuse
//!             Node { value: Vec<u8>, next: Idx }
//! ```
//!
//! Reverse and sort rewrite `next` indices only, so neither needs unsafe code
//! or aliasing of node references, and neither allocates.
//!
//! # Quick Start
//!
//! ```
//! use nexus_strqueue::StrQueue;
//!
//! let mut queue = StrQueue::new();
//! queue.try_push_front(b"a").unwrap();
//! queue.try_push_front(b"b").unwrap();
//! assert_eq!(queue.front(), Some(&b"b"[..]));
//!
//! queue.reverse();
//! assert_eq!(queue.front(), Some(&b"a"[..]));
//! assert_eq!(queue.back(), Some(&b"b"[..]));
//!
//! assert_eq!(queue.pop_front(None).unwrap(), b"a");
//! assert_eq!(nexus_strqueue::size(Some(&queue)), 1);
//! ```
//!
//! # Errors
//!
//! Every fallible operation returns [`Error`]. [`Error::kind`] groups the
//! variants into [`ErrorKind::Allocation`] (memory or index space ran out)
//! and [`ErrorKind::InvalidOperation`] (empty queue, oversized payload). A
//! failed operation leaves the queue exactly as it was.
//!
//! # Thread Safety
//!
//! `StrQueue` has no interior mutability and every mutation takes
//! `&mut self`. Share it across threads behind a `Mutex`.
//!
//! # Feature Flags
//!
//! - `slab` - Enable [`Storage`] impl for `slab::Slab` (see `SlabStorage`)

#![warn(missing_docs)]

pub mod error;
pub mod index;
pub mod queue;
mod sort;
pub mod storage;

pub use error::{Error, ErrorKind};
pub use index::Index;
pub use queue::{ArenaStorage, Builder, Node, StrQueue};
pub use storage::{Arena, Storage};

#[cfg(feature = "slab")]
pub use queue::SlabStorage;

/// Number of elements in `queue`, or 0 when there is no queue.
///
/// ```
/// use nexus_strqueue::{StrQueue, size};
///
/// assert_eq!(size::<nexus_strqueue::ArenaStorage, u32>(None), 0);
///
/// let mut queue = StrQueue::new();
/// queue.try_push_back(b"x").unwrap();
/// assert_eq!(size(Some(&queue)), 1);
/// ```
#[inline]
#[must_use]
pub fn size<S, Idx: Index>(queue: Option<&StrQueue<S, Idx>>) -> usize {
    queue.map_or(0, StrQueue::len)
}
