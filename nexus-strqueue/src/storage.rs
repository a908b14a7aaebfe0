//! Node storage with stable indices.
//!
//! Storage owns every queue node. An index stays valid until its node is
//! removed, so the queue can rewire `next` links during reverse and sort by
//! assigning integers, with no aliasing of node references.

use crate::{Error, Index};

/// Slab-like storage with stable indices.
///
/// # Requirements
///
/// Implementations must provide:
/// - **Stable indices**: an index remains valid until explicitly removed
/// - **O(1)** insert, remove, get operations (insert may be amortised)
/// - **Slot reuse**: removed slots can be reused by future inserts
/// - **No partial inserts**: a failed `try_insert` drops nothing but the value
///   it was given and leaves every stored element in place
///
/// # Implementations
///
/// - [`Arena<T>`] - growable, fallible growth (in this crate)
/// - `slab::Slab<T>` - growable, aborts on allocation failure (feature `slab`)
pub trait Storage<T> {
    /// Index type for this storage.
    type Index: Index;

    /// Error type for failed insertions and reservations.
    ///
    /// - [`Error`] for [`Arena`]
    /// - `Infallible` for storage that aborts instead of failing
    type Error: Into<Error>;

    /// Inserts a value, returning its stable index.
    fn try_insert(&mut self, value: T) -> Result<Self::Index, Self::Error>;

    /// Ensures `additional` more values can be inserted without growing.
    fn try_reserve(&mut self, additional: usize) -> Result<(), Self::Error>;

    /// Removes and returns the value at `index`, if present.
    fn remove(&mut self, index: Self::Index) -> Option<T>;

    /// Returns a reference to the value at `index`, if present.
    fn get(&self, index: Self::Index) -> Option<&T>;

    /// Returns a mutable reference to the value at `index`, if present.
    fn get_mut(&mut self, index: Self::Index) -> Option<&mut T>;

    /// Number of stored values.
    fn len(&self) -> usize;

    /// Returns `true` if nothing is stored.
    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every stored value.
    fn clear(&mut self);
}

// =============================================================================
// Arena - growable, fallible growth, intrusive free list
// =============================================================================

#[derive(Debug)]
enum Entry<T, Idx> {
    Occupied(T),
    Vacant { next_free: Idx },
}

/// Growable storage backed by a single `Vec`.
///
/// Vacant slots form a LIFO free list threaded through the slots themselves,
/// so the most recently freed slot is reused first. Growth goes through
/// `Vec::try_reserve`, which turns allocator exhaustion into
/// [`Error::Allocation`] instead of an abort.
///
/// # Example
///
/// ```
/// use nexus_strqueue::{Arena, Storage};
///
/// let mut arena: Arena<u64> = Arena::new();
/// let idx = arena.try_insert(42).unwrap();
/// assert_eq!(arena.get(idx), Some(&42));
/// assert_eq!(arena.remove(idx), Some(42));
/// assert!(arena.is_empty());
/// ```
#[derive(Debug)]
pub struct Arena<T, Idx: Index = u32> {
    entries: Vec<Entry<T, Idx>>,
    free_head: Idx,
    len: usize,
}

impl<T, Idx: Index> Default for Arena<T, Idx> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, Idx: Index> Arena<T, Idx> {
    /// Creates an empty arena. Does not allocate.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            free_head: Idx::NONE,
            len: 0,
        }
    }

    /// Creates an arena with room for at least `capacity` values.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Allocation`] if the slots cannot be allocated, or
    /// [`Error::IndexSpaceExhausted`] if `capacity` exceeds what `Idx` can
    /// address.
    pub fn try_with_capacity(capacity: usize) -> Result<Self, Error> {
        let mut arena = Self::new();
        arena.try_reserve(capacity)?;
        Ok(arena)
    }

    /// Number of slots available without reallocating.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.entries.capacity()
    }

    /// Number of stored values.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if nothing is stored.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn exhausted() -> Error {
        Error::IndexSpaceExhausted {
            capacity: Idx::NONE.as_usize(),
        }
    }

    /// Ensures `additional` more values fit without growing.
    ///
    /// # Errors
    ///
    /// See [`Arena::try_with_capacity`].
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), Error> {
        let vacant = self.entries.len() - self.len;
        let needed = additional.saturating_sub(vacant);
        if needed == 0 {
            return Ok(());
        }

        // The last slot this reservation could hand out must have a link.
        let last = self.entries.len().checked_add(needed - 1);
        if last.and_then(Idx::try_from_usize).is_none() {
            return Err(Self::exhausted());
        }

        self.entries.try_reserve(needed)?;
        Ok(())
    }

    /// Inserts a value, returning its stable index.
    ///
    /// # Errors
    ///
    /// See [`Arena::try_with_capacity`]. On error `value` is dropped and the
    /// arena is unchanged.
    pub fn try_insert(&mut self, value: T) -> Result<Idx, Error> {
        let idx = if self.free_head.is_some() {
            let idx = self.free_head;
            let Entry::Vacant { next_free } = self.entries[idx.as_usize()] else {
                unreachable!("free list points at an occupied slot");
            };
            self.free_head = next_free;
            self.entries[idx.as_usize()] = Entry::Occupied(value);
            idx
        } else {
            let idx = Idx::try_from_usize(self.entries.len()).ok_or_else(Self::exhausted)?;
            self.entries.try_reserve(1)?;
            self.entries.push(Entry::Occupied(value));
            idx
        };

        self.len += 1;
        Ok(idx)
    }

    /// Removes and returns the value at `index`, if present.
    pub fn remove(&mut self, index: Idx) -> Option<T> {
        let i = index.as_usize();
        if !matches!(self.entries.get(i), Some(Entry::Occupied(_))) {
            return None;
        }

        let vacant = Entry::Vacant {
            next_free: self.free_head,
        };
        let Entry::Occupied(value) = core::mem::replace(&mut self.entries[i], vacant) else {
            unreachable!("slot checked occupied above");
        };

        self.free_head = index;
        self.len -= 1;
        Some(value)
    }

    /// Returns a reference to the value at `index`, if present.
    #[inline]
    pub fn get(&self, index: Idx) -> Option<&T> {
        match self.entries.get(index.as_usize()) {
            Some(Entry::Occupied(value)) => Some(value),
            _ => None,
        }
    }

    /// Returns a mutable reference to the value at `index`, if present.
    #[inline]
    pub fn get_mut(&mut self, index: Idx) -> Option<&mut T> {
        match self.entries.get_mut(index.as_usize()) {
            Some(Entry::Occupied(value)) => Some(value),
            _ => None,
        }
    }

    /// Drops every stored value. Keeps the allocation.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.free_head = Idx::NONE;
        self.len = 0;
    }
}

impl<T, Idx: Index> Storage<T> for Arena<T, Idx> {
    type Index = Idx;
    type Error = Error;

    #[inline]
    fn try_insert(&mut self, value: T) -> Result<Self::Index, Self::Error> {
        self.try_insert(value)
    }

    #[inline]
    fn try_reserve(&mut self, additional: usize) -> Result<(), Self::Error> {
        self.try_reserve(additional)
    }

    #[inline]
    fn remove(&mut self, index: Self::Index) -> Option<T> {
        self.remove(index)
    }

    #[inline]
    fn get(&self, index: Self::Index) -> Option<&T> {
        self.get(index)
    }

    #[inline]
    fn get_mut(&mut self, index: Self::Index) -> Option<&mut T> {
        self.get_mut(index)
    }

    #[inline]
    fn len(&self) -> usize {
        self.len
    }

    #[inline]
    fn clear(&mut self) {
        self.clear();
    }
}

// =============================================================================
// slab::Slab implementation
// =============================================================================

#[cfg(feature = "slab")]
impl<T> Storage<T> for slab::Slab<T> {
    type Index = usize;
    type Error = core::convert::Infallible;

    #[inline]
    fn try_insert(&mut self, value: T) -> Result<Self::Index, Self::Error> {
        Ok(self.insert(value))
    }

    #[inline]
    fn try_reserve(&mut self, additional: usize) -> Result<(), Self::Error> {
        self.reserve(additional);
        Ok(())
    }

    #[inline]
    fn remove(&mut self, index: Self::Index) -> Option<T> {
        self.try_remove(index)
    }

    #[inline]
    fn get(&self, index: Self::Index) -> Option<&T> {
        self.get(index)
    }

    #[inline]
    fn get_mut(&mut self, index: Self::Index) -> Option<&mut T> {
        self.get_mut(index)
    }

    #[inline]
    fn len(&self) -> usize {
        self.len()
    }

    #[inline]
    fn clear(&mut self) {
        self.clear();
    }
}
