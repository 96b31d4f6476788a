//! Node-layer primitives for singly linked chains over external storage.
//!
//! A [`Node`] holds a successor index and an inline payload. A [`Chain`] is
//! nothing but a head index: nodes live in user-provided [`Storage`], and
//! every primitive takes that storage explicitly. This is the raw layer the
//! owning [`Sll`](crate::Sll) is built on; use it directly when several
//! chains share one storage pool or when a test needs to forge links.
//!
//! # Storage Invariant
//!
//! A chain must always be used with the storage its nodes were inserted
//! into. Indices that are not occupied in that storage are programming
//! errors and panic with "invalid index".
//!
//! # Example
//!
//! ```
//! use nexus_chain::{Arena, Chain, Node, Storage};
//!
//! let mut arena: Arena<Node<u64>> = Arena::new();
//! let mut chain: Chain = Chain::new();
//!
//! let a = arena.try_insert(Node::new(1)).unwrap();
//! let b = arena.try_insert(Node::new(2)).unwrap();
//! let c = arena.try_insert(Node::new(3)).unwrap();
//!
//! chain.push(&mut arena, c);
//! chain.push(&mut arena, a);
//! Chain::insert_after(&mut arena, a, b);
//!
//! assert_eq!(chain.length(&arena), 3);
//! assert_eq!(chain.ith(&arena, 1), Ok(b));
//! assert_eq!(chain.find_last(&arena), Some(c));
//! ```

use std::marker::PhantomData;

use crate::{Error, Index, Result, Storage};

/// A chain node: successor link plus payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node<T, Idx: Index = u32> {
    pub(crate) next: Idx,
    pub(crate) data: T,
}

impl<T, Idx: Index> Node<T, Idx> {
    /// Creates an unlinked node.
    #[inline]
    pub const fn new(data: T) -> Self {
        Self {
            next: Idx::NONE,
            data,
        }
    }

    /// Returns the successor's index, or `Idx::NONE` for a terminal node.
    #[inline]
    pub fn next(&self) -> Idx {
        self.next
    }

    /// Overwrites the successor link.
    ///
    /// No check is made that the result is a well-formed chain. This is how
    /// test fixtures build a back-edge for [`Chain::has_cycle`].
    #[inline]
    pub fn set_next(&mut self, next: Idx) {
        self.next = next;
    }

    /// Returns the payload.
    #[inline]
    pub fn data(&self) -> &T {
        &self.data
    }

    /// Returns the payload mutably.
    #[inline]
    pub fn data_mut(&mut self) -> &mut T {
        &mut self.data
    }

    /// Consumes the node, returning its payload.
    #[inline]
    pub fn into_data(self) -> T {
        self.data
    }
}

#[inline]
pub(crate) fn node<T, Idx, S>(storage: &S, idx: Idx) -> &Node<T, Idx>
where
    Idx: Index,
    S: Storage<Node<T, Idx>, Index = Idx>,
{
    storage.get(idx).expect("invalid index")
}

#[inline]
pub(crate) fn node_mut<T, Idx, S>(storage: &mut S, idx: Idx) -> &mut Node<T, Idx>
where
    Idx: Index,
    S: Storage<Node<T, Idx>, Index = Idx>,
{
    storage.get_mut(idx).expect("invalid index")
}

/// Removes a detached node from storage, returning its payload.
#[inline]
pub(crate) fn take<T, Idx, S>(storage: &mut S, idx: Idx) -> T
where
    Idx: Index,
    S: Storage<Node<T, Idx>, Index = Idx>,
{
    storage.remove(idx).expect("invalid index").data
}

#[inline]
pub(crate) fn next<T, Idx, S>(storage: &S, idx: Idx) -> Idx
where
    Idx: Index,
    S: Storage<Node<T, Idx>, Index = Idx>,
{
    node(storage, idx).next
}

#[inline]
pub(crate) fn set_next<T, Idx, S>(storage: &mut S, idx: Idx, next: Idx)
where
    Idx: Index,
    S: Storage<Node<T, Idx>, Index = Idx>,
{
    node_mut(storage, idx).next = next;
}

/// A singly linked chain over external storage.
///
/// Holds only the head index. Length is not cached: the chain is defined by
/// whatever the links say, so [`length`](Chain::length) walks them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chain<Idx: Index = u32> {
    pub(crate) head: Idx,
}

impl<Idx: Index> Default for Chain<Idx> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Idx: Index> Chain<Idx> {
    /// Creates an empty chain.
    #[inline]
    pub const fn new() -> Self {
        Self { head: Idx::NONE }
    }

    /// Creates a chain starting at `head` (`Idx::NONE` for empty).
    #[inline]
    pub const fn from_head(head: Idx) -> Self {
        Self { head }
    }

    /// Returns the head index, or `Idx::NONE` if empty.
    #[inline]
    pub const fn head(&self) -> Idx {
        self.head
    }

    /// Returns `true` if the chain has no nodes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Detaches the whole chain, leaving `self` empty.
    #[inline]
    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }

    /// Prepends `idx`; its successor becomes the previous head.
    ///
    /// # Panics
    ///
    /// Panics if `idx` is not valid in storage.
    #[inline]
    pub fn push<T, S>(&mut self, storage: &mut S, idx: Idx)
    where
        S: Storage<Node<T, Idx>, Index = Idx>,
    {
        set_next(storage, idx, self.head);
        self.head = idx;
    }

    /// Detaches and returns the head index. The node's link is cleared.
    ///
    /// # Errors
    ///
    /// [`Error::Empty`] if the chain has no nodes.
    #[inline]
    pub fn pop<T, S>(&mut self, storage: &mut S) -> Result<Idx>
    where
        S: Storage<Node<T, Idx>, Index = Idx>,
    {
        if self.head.is_none() {
            return Err(Error::Empty);
        }

        let idx = self.head;
        let node = node_mut(storage, idx);
        self.head = node.next;
        node.next = Idx::NONE;
        Ok(idx)
    }

    /// Splices `idx` immediately after `anchor`.
    ///
    /// There is no "after" on an empty chain, so this takes an anchor
    /// instead of a chain.
    ///
    /// # Panics
    ///
    /// Panics if `anchor` or `idx` is not valid in storage.
    #[inline]
    pub fn insert_after<T, S>(storage: &mut S, anchor: Idx, idx: Idx)
    where
        S: Storage<Node<T, Idx>, Index = Idx>,
    {
        let after = next(storage, anchor);
        set_next(storage, idx, after);
        set_next(storage, anchor, idx);
    }

    /// Detaches and returns the node after `anchor`.
    ///
    /// Returns `None` if `anchor` is the tail. The detached node stays in
    /// storage; disposing of it is the caller's job.
    ///
    /// # Panics
    ///
    /// Panics if `anchor` is not valid in storage.
    #[inline]
    pub fn remove_after<T, S>(storage: &mut S, anchor: Idx) -> Option<Idx>
    where
        S: Storage<Node<T, Idx>, Index = Idx>,
    {
        let removed = next(storage, anchor).to_option()?;
        let after = next(storage, removed);
        set_next(storage, anchor, after);
        set_next(storage, removed, Idx::NONE);
        Some(removed)
    }

    /// Returns the tail index, or `None` for an empty chain. O(n).
    pub fn find_last<T, S>(&self, storage: &S) -> Option<Idx>
    where
        S: Storage<Node<T, Idx>, Index = Idx>,
    {
        let mut idx = self.head.to_option()?;
        loop {
            let succ = next(storage, idx);
            if succ.is_none() {
                return Some(idx);
            }
            idx = succ;
        }
    }

    /// Links `idx` after the tail, or makes it the head of an empty chain.
    pub fn append<T, S>(&mut self, storage: &mut S, idx: Idx)
    where
        S: Storage<Node<T, Idx>, Index = Idx>,
    {
        set_next(storage, idx, Idx::NONE);
        match self.find_last(storage) {
            Some(tail) => set_next(storage, tail, idx),
            None => self.head = idx,
        }
    }

    /// Returns the node at zero-based offset `i`.
    ///
    /// # Errors
    ///
    /// [`Error::IndexOutOfRange`] if `i >= length`.
    pub fn ith<T, S>(&self, storage: &S, i: usize) -> Result<Idx>
    where
        S: Storage<Node<T, Idx>, Index = Idx>,
    {
        let mut idx = self.head;
        let mut walked = 0;
        while idx.is_some() {
            if walked == i {
                return Ok(idx);
            }
            idx = next(storage, idx);
            walked += 1;
        }
        Err(Error::IndexOutOfRange {
            index: i,
            len: walked,
        })
    }

    /// Counts the nodes. O(n); never returns on a cyclic chain.
    pub fn length<T, S>(&self, storage: &S) -> usize
    where
        S: Storage<Node<T, Idx>, Index = Idx>,
    {
        self.indices(storage).count()
    }

    /// Returns an iterator over node indices, head to tail.
    #[inline]
    pub fn indices<'a, T, S>(&self, storage: &'a S) -> Indices<'a, T, S, Idx>
    where
        S: Storage<Node<T, Idx>, Index = Idx>,
    {
        Indices {
            storage,
            cur: self.head,
            _marker: PhantomData,
        }
    }
}

/// Iterator over a chain's node indices.
pub struct Indices<'a, T, S, Idx: Index> {
    storage: &'a S,
    cur: Idx,
    _marker: PhantomData<T>,
}

impl<T, S, Idx> Iterator for Indices<'_, T, S, Idx>
where
    Idx: Index,
    S: Storage<Node<T, Idx>, Index = Idx>,
{
    type Item = Idx;

    #[inline]
    fn next(&mut self) -> Option<Idx> {
        let idx = self.cur.to_option()?;
        self.cur = next(self.storage, idx);
        Some(idx)
    }
}
