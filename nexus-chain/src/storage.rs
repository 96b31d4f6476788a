//! Storage trait for slab-like containers with stable indices.
//!
//! Storage provides insert/remove/get operations where indices remain
//! valid until explicitly removed. The chain primitives link nodes by
//! these indices instead of pointers, so a node can be relinked, split off
//! or even forged into a cycle without any `unsafe`.

use crate::{Error, Index};

/// Slab-like storage with stable indices.
///
/// # Requirements
///
/// Implementations must provide:
/// - **Stable indices**: an index remains valid until explicitly removed
/// - **O(1)** insert, remove, get operations
/// - **Slot reuse**: removed slots can be reused by future inserts
///
/// # Implementations
///
/// - [`Arena<T>`] - growable, fallible growth, optional node limit
/// - `slab::Slab<T>` - growable, aborts on allocation failure (feature `slab`)
pub trait Storage<T> {
    /// Index type for this storage.
    type Index: Index;

    /// Error type for failed insertions.
    ///
    /// - [`Error`] for [`Arena`]
    /// - `Infallible` for `slab::Slab`
    type Error: Into<Error>;

    /// Inserts a value, returning its stable index.
    fn try_insert(&mut self, value: T) -> Result<Self::Index, Self::Error>;

    /// Removes and returns the value at `index`, if present.
    fn remove(&mut self, index: Self::Index) -> Option<T>;

    /// Returns a reference to the value at `index`, if present.
    fn get(&self, index: Self::Index) -> Option<&T>;

    /// Returns a mutable reference to the value at `index`, if present.
    fn get_mut(&mut self, index: Self::Index) -> Option<&mut T>;
}

#[derive(Debug)]
enum Slot<T, Idx> {
    Occupied(T),
    /// Vacant slot holding the next entry of the free list.
    Vacant(Idx),
}

/// Growable slot arena with a LIFO free list.
///
/// Growth goes through `Vec::try_reserve`, so allocator refusal is reported
/// as [`Error::OutOfMemory`] instead of aborting. An arena created with
/// [`Arena::bounded`] also refuses inserts past its node limit, which makes
/// exhaustion reproducible.
///
/// # Example
///
/// ```
/// use nexus_chain::{Arena, Error, Storage};
///
/// let mut arena: Arena<u64> = Arena::bounded(2);
/// let a = arena.try_insert(1).unwrap();
/// let _b = arena.try_insert(2).unwrap();
/// assert_eq!(arena.try_insert(3), Err(Error::OutOfMemory));
///
/// assert_eq!(arena.remove(a), Some(1));
/// // Freed slot is handed out again
/// assert_eq!(arena.try_insert(4), Ok(a));
/// ```
#[derive(Debug)]
pub struct Arena<T, Idx: Index = u32> {
    slots: Vec<Slot<T, Idx>>,
    /// Head of the free list threaded through vacant slots.
    free_head: Idx,
    len: usize,
    limit: usize,
}

impl<T, Idx: Index> Default for Arena<T, Idx> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, Idx: Index> Arena<T, Idx> {
    /// Creates an empty arena limited only by the index type.
    #[inline]
    pub const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_head: Idx::NONE,
            len: 0,
            limit: usize::MAX,
        }
    }

    /// Creates an empty arena with room for `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            ..Self::new()
        }
    }

    /// Creates an empty arena that holds at most `limit` live values.
    pub fn bounded(limit: usize) -> Self {
        Self {
            limit,
            ..Self::new()
        }
    }

    /// Returns the number of live values.
    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no values are live.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the maximum number of live values this arena accepts.
    #[inline]
    pub fn limit(&self) -> usize {
        self.limit.min(Idx::SLOTS)
    }

    /// Ensures `additional` more inserts succeed without allocating.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfMemory`] if the limit would be exceeded or the
    /// allocator refuses. The arena is unchanged on error.
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), Error> {
        if additional > self.limit() - self.len {
            tracing::warn!(
                len = self.len,
                additional,
                limit = self.limit(),
                "arena limit reached"
            );
            return Err(Error::OutOfMemory);
        }

        let vacant = self.slots.len() - self.len;
        let grow = additional.saturating_sub(vacant);
        if let Err(err) = self.slots.try_reserve(grow) {
            tracing::warn!(additional = grow, error = %err, "arena growth refused");
            return Err(Error::OutOfMemory);
        }
        Ok(())
    }

    /// Removes every value, returning them in slot order.
    ///
    /// All previously handed out indices become invalid.
    pub fn drain(&mut self) -> impl Iterator<Item = T> + use<T, Idx> {
        self.free_head = Idx::NONE;
        self.len = 0;
        std::mem::take(&mut self.slots)
            .into_iter()
            .filter_map(|slot| match slot {
                Slot::Occupied(value) => Some(value),
                Slot::Vacant(_) => None,
            })
    }

    /// Drops every value.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free_head = Idx::NONE;
        self.len = 0;
    }
}

impl<T, Idx: Index> Storage<T> for Arena<T, Idx> {
    type Index = Idx;
    type Error = Error;

    fn try_insert(&mut self, value: T) -> Result<Idx, Error> {
        if self.len >= self.limit() {
            tracing::warn!(limit = self.limit(), "arena limit reached");
            return Err(Error::OutOfMemory);
        }

        let idx = if self.free_head.is_some() {
            let idx = self.free_head;
            let slot = &mut self.slots[idx.slot()];
            if let Slot::Vacant(next_free) = *slot {
                self.free_head = next_free;
            }
            *slot = Slot::Occupied(value);
            idx
        } else {
            let idx = Idx::from_slot(self.slots.len()).ok_or(Error::OutOfMemory)?;
            self.try_reserve(1)?;
            self.slots.push(Slot::Occupied(value));
            idx
        };

        self.len += 1;
        Ok(idx)
    }

    fn remove(&mut self, index: Idx) -> Option<T> {
        let slot = self.slots.get_mut(index.slot())?;
        if let Slot::Vacant(_) = slot {
            return None;
        }

        match std::mem::replace(slot, Slot::Vacant(self.free_head)) {
            Slot::Occupied(value) => {
                self.free_head = index;
                self.len -= 1;
                Some(value)
            }
            Slot::Vacant(_) => None,
        }
    }

    #[inline]
    fn get(&self, index: Idx) -> Option<&T> {
        match self.slots.get(index.slot())? {
            Slot::Occupied(value) => Some(value),
            Slot::Vacant(_) => None,
        }
    }

    #[inline]
    fn get_mut(&mut self, index: Idx) -> Option<&mut T> {
        match self.slots.get_mut(index.slot())? {
            Slot::Occupied(value) => Some(value),
            Slot::Vacant(_) => None,
        }
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
    fn remove(&mut self, index: Self::Index) -> Option<T> {
        self.try_remove(index)
    }

    #[inline]
    fn get(&self, index: Self::Index) -> Option<&T> {
        slab::Slab::get(self, index)
    }

    #[inline]
    fn get_mut(&mut self, index: Self::Index) -> Option<&mut T> {
        slab::Slab::get_mut(self, index)
    }
}
