//! Singly linked byte-string queue over index-addressed storage.
//!
//! Each element is a [`Node`] holding its own copy of the inserted bytes and
//! the index of its successor. The queue tracks head, tail and length; the
//! nodes themselves live in a [`Storage`] owned by the queue.
//!
//! # Example
//!
//! ```
//! use nexus_strqueue::StrQueue;
//!
//! let mut queue = StrQueue::new();
//! queue.try_push_back(b"banana").unwrap();
//! queue.try_push_back(b"apple").unwrap();
//! queue.try_push_front(b"cherry").unwrap();
//!
//! assert_eq!(queue.len(), 3);
//! assert_eq!(queue.front(), Some(&b"cherry"[..]));
//!
//! queue.sort();
//! assert_eq!(queue.pop_front(None).unwrap(), b"apple");
//!
//! // Bounded removal truncates silently.
//! assert_eq!(queue.pop_front(Some(3)).unwrap(), b"ban");
//! assert_eq!(queue.len(), 1);
//! ```

use tracing::{debug, trace};

use crate::{Arena, Error, Index, Storage};

/// A queue element.
///
/// Holds an owned copy of the payload and the index of the next node.
/// Nodes are created by the push operations and only reachable through the
/// queue; the type is public so storage types can be named.
#[derive(Debug)]
pub struct Node<Idx: Index = u32> {
    pub(crate) value: Vec<u8>,
    pub(crate) next: Idx,
}

impl<Idx: Index> Node<Idx> {
    #[inline]
    fn new(value: Vec<u8>) -> Self {
        Self {
            value,
            next: Idx::NONE,
        }
    }
}

/// Storage for queue nodes backed by an [`Arena`].
pub type ArenaStorage<Idx = u32> = Arena<Node<Idx>, Idx>;

/// Storage for queue nodes backed by `slab::Slab`.
#[cfg(feature = "slab")]
pub type SlabStorage = slab::Slab<Node<usize>>;

/// A singly linked queue of owned byte strings.
///
/// Supports push at either end, pop from the front, in-place reversal and
/// in-place stable sort. Every push copies its payload; every pop hands the
/// stored bytes back without copying.
///
/// # Type Parameters
///
/// - `S`: node storage (default [`ArenaStorage`])
/// - `Idx`: node index type (default `u32`)
///
/// # Invariants
///
/// - `len == 0` iff `head` is none iff `tail` is none
/// - following `next` from `head` visits exactly `len` nodes and ends at
///   `tail`, whose `next` is none
/// - storage holds exactly the linked nodes
#[derive(Debug)]
pub struct StrQueue<S = ArenaStorage, Idx: Index = u32> {
    pub(crate) storage: S,
    pub(crate) head: Idx,
    pub(crate) tail: Idx,
    pub(crate) len: usize,
    max_value_len: Option<usize>,
}

impl Default for StrQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl StrQueue {
    /// Creates an empty queue. Does not allocate.
    ///
    /// For another index type, use [`StrQueue::with_storage`] with an
    /// [`Arena`].
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            storage: Arena::new(),
            head: u32::NONE,
            tail: u32::NONE,
            len: 0,
            max_value_len: None,
        }
    }

    /// Creates an empty queue with node slots reserved for `capacity`
    /// elements.
    ///
    /// # Errors
    ///
    /// Returns an [`ErrorKind::Allocation`](crate::ErrorKind::Allocation)
    /// error if the slots cannot be reserved.
    pub fn try_with_capacity(capacity: usize) -> Result<Self, Error> {
        Builder::default().capacity(capacity).build()
    }

    /// Returns a [`Builder`] for configuring a new queue.
    #[inline]
    #[must_use]
    pub fn builder() -> Builder {
        Builder::default()
    }
}

// =============================================================================
// Query - no storage bound needed
// =============================================================================

impl<S, Idx: Index> StrQueue<S, Idx> {
    /// Returns the number of elements. O(1).
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the queue has no elements.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the payload bound, if one was configured.
    #[inline]
    #[must_use]
    pub const fn max_value_len(&self) -> Option<usize> {
        self.max_value_len
    }
}

impl<S, Idx: Index> StrQueue<S, Idx>
where
    S: Storage<Node<Idx>, Index = Idx>,
{
    /// Creates an empty queue over the given storage.
    ///
    /// Anything already in `storage` is dropped.
    pub fn with_storage(mut storage: S) -> Self {
        storage.clear();
        Self {
            storage,
            head: Idx::NONE,
            tail: Idx::NONE,
            len: 0,
            max_value_len: None,
        }
    }

    #[inline]
    pub(crate) fn node(&self, idx: Idx) -> &Node<Idx> {
        self.storage
            .get(idx)
            .expect("linked index missing from storage")
    }

    #[inline]
    pub(crate) fn node_mut(&mut self, idx: Idx) -> &mut Node<Idx> {
        self.storage
            .get_mut(idx)
            .expect("linked index missing from storage")
    }

    // ========================================================================
    // Access
    // ========================================================================

    /// Returns the first element's bytes.
    #[inline]
    pub fn front(&self) -> Option<&[u8]> {
        if self.head.is_none() {
            None
        } else {
            Some(&self.node(self.head).value)
        }
    }

    /// Returns the last element's bytes.
    #[inline]
    pub fn back(&self) -> Option<&[u8]> {
        if self.tail.is_none() {
            None
        } else {
            Some(&self.node(self.tail).value)
        }
    }

    // ========================================================================
    // Insert (copy + allocate + link)
    // ========================================================================

    /// Copies `payload` into a new node at the front of the queue.
    ///
    /// # Errors
    ///
    /// - [`Error::PayloadTooLong`] if `payload` exceeds the configured bound
    /// - [`Error::Allocation`] / [`Error::IndexSpaceExhausted`] if the copy
    ///   or the node cannot be allocated
    ///
    /// The queue is unchanged on error.
    pub fn try_push_front(&mut self, payload: &[u8]) -> Result<(), Error> {
        let idx = self.alloc_node(payload)?;
        let head = self.head;
        self.node_mut(idx).next = head;

        if self.tail.is_none() {
            self.tail = idx;
        }

        self.head = idx;
        self.len += 1;
        Ok(())
    }

    /// Copies `payload` into a new node at the back of the queue.
    ///
    /// # Errors
    ///
    /// Same as [`StrQueue::try_push_front`]. The queue is unchanged on error.
    pub fn try_push_back(&mut self, payload: &[u8]) -> Result<(), Error> {
        let idx = self.alloc_node(payload)?;

        if self.tail.is_some() {
            let tail = self.tail;
            self.node_mut(tail).next = idx;
        } else {
            self.head = idx;
        }

        self.tail = idx;
        self.len += 1;
        Ok(())
    }

    /// Copies the payload and stores it in an unlinked node.
    ///
    /// Nothing is linked until both allocations succeed, so a failure here
    /// leaves the queue untouched.
    fn alloc_node(&mut self, payload: &[u8]) -> Result<Idx, Error> {
        if let Some(max) = self.max_value_len.filter(|&max| payload.len() > max) {
            debug!(len = payload.len(), max, "rejected oversized payload");
            return Err(Error::PayloadTooLong {
                len: payload.len(),
                max,
            });
        }

        // Reserve exactly so the node never holds spare capacity.
        let mut value = Vec::new();
        if let Err(err) = value.try_reserve_exact(payload.len()) {
            debug!(len = payload.len(), "value allocation failed");
            return Err(err.into());
        }
        value.extend_from_slice(payload);

        self.storage.try_insert(Node::new(value)).map_err(|err| {
            let err: Error = err.into();
            debug!(error = %err, "node allocation failed");
            err
        })
    }

    // ========================================================================
    // Remove (unlink + deallocate)
    // ========================================================================

    /// Removes the first element and returns its bytes.
    ///
    /// With `Some(max_len)` the returned bytes are truncated to at most
    /// `max_len`; a value exactly `max_len` long is returned whole. The
    /// element is removed either way.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Empty`] if the queue is empty.
    pub fn pop_front(&mut self, max_len: Option<usize>) -> Result<Vec<u8>, Error> {
        let mut value = self.unlink_front()?;
        if let Some(max_len) = max_len {
            value.truncate(max_len);
        }
        Ok(value)
    }

    /// Removes the first element, copying as much of it as fits into `buf`.
    ///
    /// Returns the number of bytes written, `min(value.len(), buf.len())`.
    /// Never writes past the end of `buf`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Empty`] if the queue is empty; `buf` is untouched.
    pub fn pop_front_into(&mut self, buf: &mut [u8]) -> Result<usize, Error> {
        let value = self.unlink_front()?;
        let n = value.len().min(buf.len());
        buf[..n].copy_from_slice(&value[..n]);
        Ok(n)
    }

    fn unlink_front(&mut self) -> Result<Vec<u8>, Error> {
        if self.head.is_none() {
            return Err(Error::Empty);
        }

        let node = self
            .storage
            .remove(self.head)
            .expect("head index missing from storage");

        self.head = node.next;
        if self.head.is_none() {
            self.tail = Idx::NONE;
        }

        self.len -= 1;
        Ok(node.value)
    }

    /// Removes every element.
    pub fn clear(&mut self) {
        trace!(len = self.len, "clearing queue");
        self.storage.clear();
        self.head = Idx::NONE;
        self.tail = Idx::NONE;
        self.len = 0;
    }

    // ========================================================================
    // Reorder (relink only)
    // ========================================================================

    /// Reverses the queue in place.
    ///
    /// Every `next` link is pointed at its predecessor and head and tail swap.
    /// O(n) time, O(1) space; no node or value is allocated, freed or copied.
    pub fn reverse(&mut self) {
        if self.len < 2 {
            return;
        }

        let mut prev = Idx::NONE;
        let mut curr = self.head;
        while curr.is_some() {
            let node = self.node_mut(curr);
            let next = node.next;
            node.next = prev;
            prev = curr;
            curr = next;
        }

        self.tail = self.head;
        self.head = prev;
        trace!(len = self.len, "reversed queue");
    }
}

// =============================================================================
// Builder
// =============================================================================

/// Configuration for a new [`StrQueue`].
///
/// # Example
///
/// ```
/// use nexus_strqueue::{ErrorKind, StrQueue};
///
/// let mut queue = StrQueue::builder()
///     .capacity(1024)
///     .max_value_len(8)
///     .build()
///     .unwrap();
///
/// queue.try_push_back(b"short").unwrap();
/// let err = queue.try_push_back(b"far too long").unwrap_err();
/// assert_eq!(err.kind(), ErrorKind::InvalidOperation);
/// assert_eq!(queue.len(), 1);
/// ```
#[derive(Clone, Debug, Default)]
pub struct Builder {
    capacity: Option<usize>,
    max_value_len: Option<usize>,
}

impl Builder {
    /// Reserve node slots for at least this many elements.
    /// The queue can grow beyond this. Default: no reservation.
    #[must_use]
    pub fn capacity(mut self, elements: usize) -> Self {
        self.capacity = Some(elements);
        self
    }

    /// Reject payloads longer than `bytes`. Default: unbounded.
    #[must_use]
    pub fn max_value_len(mut self, bytes: usize) -> Self {
        self.max_value_len = Some(bytes);
        self
    }

    /// Build a queue over the default arena storage.
    ///
    /// # Errors
    ///
    /// Returns an allocation error if the requested capacity cannot be
    /// reserved.
    pub fn build(self) -> Result<StrQueue, Error> {
        self.build_with(Arena::new())
    }

    /// Build a queue over the given storage. Anything already in `storage`
    /// is dropped.
    ///
    /// # Errors
    ///
    /// Returns an allocation error if the requested capacity cannot be
    /// reserved.
    pub fn build_with<S, Idx>(self, storage: S) -> Result<StrQueue<S, Idx>, Error>
    where
        S: Storage<Node<Idx>, Index = Idx>,
        Idx: Index,
    {
        let mut queue = StrQueue::with_storage(storage);
        queue.max_value_len = self.max_value_len;

        if let Some(capacity) = self.capacity {
            queue.storage.try_reserve(capacity).map_err(|err| {
                let err: Error = err.into();
                debug!(capacity, error = %err, "queue reservation failed");
                err
            })?;
        }

        Ok(queue)
    }
}

// =============================================================================
// Test support
// =============================================================================

#[cfg(test)]
impl<S, Idx: Index> StrQueue<S, Idx>
where
    S: Storage<Node<Idx>, Index = Idx>,
{
    /// Node indices front to back.
    pub(crate) fn indices(&self) -> Vec<Idx> {
        let mut out = Vec::with_capacity(self.len);
        let mut curr = self.head;
        while curr.is_some() {
            out.push(curr);
            curr = self.node(curr).next;
        }
        out
    }

    /// Values front to back.
    pub(crate) fn values(&self) -> Vec<Vec<u8>> {
        self.indices()
            .into_iter()
            .map(|idx| self.node(idx).value.clone())
            .collect()
    }

    /// Panics if any structural invariant is broken.
    pub(crate) fn assert_invariants(&self) {
        assert_eq!(self.len == 0, self.head.is_none(), "len/head disagree");
        assert_eq!(self.len == 0, self.tail.is_none(), "len/tail disagree");
        assert_eq!(self.storage.len(), self.len, "storage holds unlinked nodes");

        let mut count = 0;
        let mut last = Idx::NONE;
        let mut curr = self.head;
        while curr.is_some() {
            count += 1;
            assert!(count <= self.len, "chain longer than len (cycle?)");
            last = curr;
            curr = self.node(curr).next;
        }

        assert_eq!(count, self.len, "chain shorter than len");
        assert_eq!(last, self.tail, "chain does not end at tail");
    }
}


#[cfg(all(test, feature = "slab"))]
mod tests_slab {
    use super::*;

    #[test]
    fn slab_backed_queue() {
        let mut queue: StrQueue<SlabStorage, usize> =
            StrQueue::with_storage(slab::Slab::with_capacity(4));

        for v in ["c", "a", "b"] {
            queue.try_push_back(v.as_bytes()).unwrap();
        }
        queue.sort();
        queue.reverse();

        assert_eq!(queue.values(), [b"c".to_vec(), b"b".to_vec(), b"a".to_vec()]);
        queue.assert_invariants();
    }

    #[test]
    fn slab_grows_automatically() {
        let mut queue: StrQueue<SlabStorage, usize> = Builder::default()
            .capacity(2)
            .build_with(slab::Slab::new())
            .unwrap();

        for i in 0..100 {
            queue.try_push_front(format!("{i}").as_bytes()).unwrap();
        }

        assert_eq!(queue.len(), 100);
        queue.assert_invariants();
    }
}
