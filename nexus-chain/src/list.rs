//! Singly linked list that owns its nodes and its elements.
//!
//! [`Sll`] pairs a [`Chain`] with the [`Arena`] its nodes live in, plus an
//! optional destructor. Values are moved in on insertion and moved out on
//! `pop`/`remove_ith`; everything the list releases on its own (`clear`,
//! `free`, drop, duplicate removal) goes through the destructor.
//!
//! # Example
//!
//! ```
//! use nexus_chain::Sll;
//!
//! let mut list: Sll<i32> = Sll::new();
//! for value in [5, 4, 3, 6, 2] {
//!     list.sorted_insert(value, |a, b| a.cmp(b)).unwrap();
//! }
//! assert_eq!(list.iter().copied().collect::<Vec<_>>(), vec![2, 3, 4, 5, 6]);
//!
//! list.reverse();
//! assert_eq!(list.pop(), Ok(6));
//! assert_eq!(list.length(), 4);
//! ```
//!
//! # Moving Between Lists
//!
//! Every list owns a separate arena, so operations that take a second list
//! (`move_node`, the splits and merges) move payloads into the receiving
//! arena. Room is reserved before any link changes: when the receiving
//! arena cannot grow the call fails with [`Error::OutOfMemory`] and both
//! lists are left exactly as they were.
//!
//! ```
//! use nexus_chain::Sll;
//!
//! let mut list: Sll<u32> = Sll::new();
//! for value in (0..7).rev() {
//!     list.push(value).unwrap();
//! }
//!
//! let mut front = Sll::new();
//! let mut back = Sll::new();
//! list.front_back_split(&mut front, &mut back).unwrap();
//!
//! assert!(list.is_empty());
//! assert_eq!(front.iter().copied().collect::<Vec<_>>(), vec![0, 1, 2, 3]);
//! assert_eq!(back.iter().copied().collect::<Vec<_>>(), vec![4, 5, 6]);
//! ```

use std::cmp::Ordering;
use std::fmt;

use crate::node::{next, node, node_mut, set_next, take};
use crate::{Arena, Chain, Error, Index, Node, Result, Storage};

/// Disposal callback invoked once per element the list releases itself.
pub type Destructor<T> = Box<dyn FnMut(T)>;

/// A singly linked list owning its node storage.
///
/// # Type Parameters
///
/// - `T`: Element type
/// - `Idx`: Link index type (default `u32`), bounding the node count
pub struct Sll<T, Idx: Index = u32> {
    arena: Arena<Node<T, Idx>, Idx>,
    chain: Chain<Idx>,
    destructor: Option<Destructor<T>>,
}

impl<T, Idx: Index> Default for Sll<T, Idx> {
    fn default() -> Self {
        Self::with_arena(Arena::new())
    }
}

#[inline]
fn dispose<T>(destructor: &mut Option<Destructor<T>>, value: T) {
    match destructor {
        Some(destructor) => destructor(value),
        None => drop(value),
    }
}

impl<T> Sll<T> {
    /// Creates an empty list without a destructor.
    ///
    /// Uses `u32` links; see [`with_arena`](Sll::with_arena) or
    /// [`Default`] for other index types.
    pub const fn new() -> Self {
        Self::with_arena(Arena::new())
    }

    /// Creates an empty list whose released elements are passed to
    /// `destructor`.
    pub fn with_destructor(destructor: impl FnMut(T) + 'static) -> Self {
        let mut list = Self::new();
        list.set_destructor(destructor);
        list
    }

    /// Creates an empty list with node room for `capacity` elements.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_arena(Arena::with_capacity(capacity))
    }

    /// Creates an empty list holding at most `limit` elements.
    ///
    /// Inserting past the limit fails with [`Error::OutOfMemory`].
    pub fn bounded(limit: usize) -> Self {
        Self::with_arena(Arena::bounded(limit))
    }
}

impl<T, Idx: Index> Sll<T, Idx> {
    /// Creates an empty list whose nodes go into `arena`.
    ///
    /// `arena` is expected to be fresh; any values already in it are
    /// unreachable from the list and only released with it.
    ///
    /// ```
    /// use nexus_chain::{Arena, Sll};
    ///
    /// let mut list: Sll<char, u8> = Sll::with_arena(Arena::bounded(16));
    /// list.push('a').unwrap();
    /// assert_eq!(list.length(), 1);
    /// ```
    pub const fn with_arena(arena: Arena<Node<T, Idx>, Idx>) -> Self {
        Self {
            arena,
            chain: Chain::new(),
            destructor: None,
        }
    }

    /// Replaces the destructor.
    pub fn set_destructor(&mut self, destructor: impl FnMut(T) + 'static) {
        self.destructor = Some(Box::new(destructor));
    }

    /// Returns `true` if the list has no elements. O(1).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    /// Counts the elements by walking the chain. O(n).
    pub fn length(&self) -> usize {
        self.chain.length(&self.arena)
    }

    /// Returns an iterator over the elements, head to tail.
    #[inline]
    pub fn iter(&self) -> Iter<'_, T, Idx> {
        Iter {
            arena: &self.arena,
            cur: self.chain.head(),
        }
    }

    #[inline]
    fn alloc(&mut self, value: T) -> Result<Idx> {
        self.arena.try_insert(Node::new(value))
    }

    /// Pushes `value` onto the head.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfMemory`] if no node can be allocated; the list is
    /// unchanged.
    pub fn push(&mut self, value: T) -> Result<()> {
        let idx = self.alloc(value)?;
        self.chain.push(&mut self.arena, idx);
        Ok(())
    }

    /// Removes the head element and hands it to the caller.
    ///
    /// The destructor is not invoked: the caller owns the value now.
    ///
    /// # Errors
    ///
    /// [`Error::Empty`] if the list is empty.
    pub fn pop(&mut self) -> Result<T> {
        let idx = self.chain.pop(&mut self.arena)?;
        Ok(take(&mut self.arena, idx))
    }

    /// Appends `value` after the tail. O(n).
    ///
    /// # Errors
    ///
    /// [`Error::OutOfMemory`] if no node can be allocated.
    pub fn append(&mut self, value: T) -> Result<()> {
        let idx = self.alloc(value)?;
        self.chain.append(&mut self.arena, idx);
        Ok(())
    }

    /// Returns the tail element, or `None` when empty. O(n).
    pub fn last(&self) -> Option<&T> {
        let idx = self.chain.find_last(&self.arena)?;
        Some(&node(&self.arena, idx).data)
    }

    /// Returns the element at position `i` (0 is the head).
    ///
    /// # Errors
    ///
    /// [`Error::IndexOutOfRange`] if `i >= length`.
    pub fn ith(&self, i: usize) -> Result<&T> {
        let idx = self.chain.ith(&self.arena, i)?;
        Ok(&node(&self.arena, idx).data)
    }

    /// Returns the element at position `i` mutably.
    ///
    /// # Errors
    ///
    /// [`Error::IndexOutOfRange`] if `i >= length`.
    pub fn ith_mut(&mut self, i: usize) -> Result<&mut T> {
        let idx = self.chain.ith(&self.arena, i)?;
        Ok(&mut node_mut(&mut self.arena, idx).data)
    }

    /// Finds the node a positional insert/remove at `i > 0` links after.
    fn predecessor(&self, i: usize) -> Result<Idx> {
        self.chain.ith(&self.arena, i - 1).map_err(|err| match err {
            Error::IndexOutOfRange { len, .. } => Error::IndexOutOfRange { index: i, len },
            other => other,
        })
    }

    /// Inserts `value` so that it ends up at position `i`.
    ///
    /// `i == length` appends. Only links change; no element moves.
    ///
    /// # Errors
    ///
    /// [`Error::IndexOutOfRange`] if `i > length`, checked before
    /// allocating; [`Error::OutOfMemory`] if no node can be allocated.
    pub fn insert_ith(&mut self, i: usize, value: T) -> Result<()> {
        if i == 0 {
            return self.push(value);
        }

        let prev = self.predecessor(i)?;
        let idx = self.alloc(value)?;
        Chain::insert_after(&mut self.arena, prev, idx);
        Ok(())
    }

    /// Removes the element at position `i` and hands it to the caller.
    ///
    /// # Errors
    ///
    /// [`Error::IndexOutOfRange`] if `i >= length`.
    pub fn remove_ith(&mut self, i: usize) -> Result<T> {
        if i == 0 {
            return self
                .pop()
                .map_err(|_| Error::IndexOutOfRange { index: 0, len: 0 });
        }

        let prev = self.predecessor(i)?;
        match Chain::remove_after(&mut self.arena, prev) {
            Some(idx) => Ok(take(&mut self.arena, idx)),
            None => Err(Error::IndexOutOfRange { index: i, len: i }),
        }
    }

    /// Returns the first element comparing `Equal` to `value`.
    ///
    /// `cmp` receives the stored element first.
    pub fn search<F>(&self, value: &T, mut cmp: F) -> Option<&T>
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        self.iter().find(|elem| cmp(elem, value) == Ordering::Equal)
    }

    /// Counts the elements comparing `Equal` to `value`.
    pub fn elem_count<F>(&self, value: &T, mut cmp: F) -> usize
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        self.iter()
            .filter(|elem| cmp(elem, value) == Ordering::Equal)
            .count()
    }

    /// Calls `visitor(element, aux)` once per element, head to tail.
    pub fn map<A, F>(&self, mut visitor: F, aux: &mut A)
    where
        F: FnMut(&T, &mut A),
    {
        for elem in self.iter() {
            visitor(elem, aux);
        }
    }

    /// Inserts `value` before the first element that is not less than it.
    ///
    /// On a list sorted ascending under `cmp` this keeps it sorted, with the
    /// new value ahead of any equal elements. No re-sort is performed on
    /// unsorted input.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfMemory`] if no node can be allocated.
    pub fn sorted_insert<F>(&mut self, value: T, cmp: F) -> Result<()>
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        let idx = self.alloc(value)?;
        self.chain.sorted_insert(&mut self.arena, idx, cmp);
        Ok(())
    }

    /// Sorts by repeated pop and sorted insert. O(n²).
    ///
    /// Runs of equal elements end up in reverse relative order.
    pub fn insert_sort<F>(&mut self, cmp: F)
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        self.chain.insert_sort(&mut self.arena, cmp);
    }

    /// Sorts by adjacent relinking passes. O(n²), stable.
    pub fn bubble_sort<F>(&mut self, cmp: F)
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        self.chain.bubble_sort(&mut self.arena, cmp);
    }

    /// Sorts by front/back split and sorted merge. O(n log n), stable.
    pub fn merge_sort<F>(&mut self, cmp: F)
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        self.chain.merge_sort(&mut self.arena, cmp);
    }

    /// Reverses the list in place.
    pub fn reverse(&mut self) {
        self.chain.reverse(&mut self.arena);
    }

    /// Reverses the list in place by recursing on halves; depth grows with
    /// log2 of the length.
    pub fn reverse_recursive(&mut self) {
        self.chain.reverse_recursive(&mut self.arena);
    }

    /// Reports whether following the links ever revisits a node.
    pub fn detect_cycle(&self) -> bool {
        self.chain.has_cycle(&self.arena)
    }

    /// Removes every element equal to its immediate predecessor, passing
    /// each removed element to the list's destructor.
    ///
    /// Expects ascending input: only adjacent duplicates are seen. Returns
    /// the number of elements removed.
    pub fn remove_duplicates<F>(&mut self, cmp: F) -> usize
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        let Self {
            arena,
            chain,
            destructor,
        } = self;
        dedup(arena, chain, cmp, |value| dispose(destructor, value))
    }

    /// Like [`remove_duplicates`](Sll::remove_duplicates), handing removed
    /// elements to `destructor` instead of the list's own.
    pub fn remove_duplicates_with<F, D>(&mut self, cmp: F, destructor: D) -> usize
    where
        F: FnMut(&T, &T) -> Ordering,
        D: FnMut(T),
    {
        dedup(&mut self.arena, &self.chain, cmp, destructor)
    }

    /// Moves the first `count` elements of `src` into this arena as a
    /// detached chain, preserving their order.
    ///
    /// Callers reserve room first so no allocation can fail halfway.
    fn transplant(&mut self, src: &mut Self, count: usize) -> Result<Chain<Idx>> {
        let mut head = Idx::NONE;
        let mut tail = Idx::NONE;
        for _ in 0..count {
            let idx = self.alloc(src.pop()?)?;
            if tail.is_none() {
                head = idx;
            } else {
                set_next(&mut self.arena, tail, idx);
            }
            tail = idx;
        }
        Ok(Chain::from_head(head))
    }

    /// Links a detached chain of this arena after the tail.
    fn splice_back(&mut self, chain: Chain<Idx>) {
        if chain.is_empty() {
            return;
        }
        match self.chain.find_last(&self.arena) {
            Some(tail) => set_next(&mut self.arena, tail, chain.head()),
            None => self.chain = chain,
        }
    }

    /// Pops the head of `src` and pushes it onto the head of `self`.
    ///
    /// # Errors
    ///
    /// [`Error::Empty`] if `src` is empty; [`Error::OutOfMemory`] if this
    /// list cannot take another node. Neither list changes on error.
    pub fn move_node(&mut self, src: &mut Self) -> Result<()> {
        if src.is_empty() {
            return Err(Error::Empty);
        }
        self.arena.try_reserve(1)?;
        let value = src.pop()?;
        self.push(value)
    }

    /// Drains the list into `front` and `back`.
    ///
    /// For `n` elements the first ⌈n/2⌉ go to `front` and the rest to
    /// `back`, both in their original order and after whatever the outputs
    /// already hold.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfMemory`] if an output cannot take its share; all three
    /// lists are unchanged.
    pub fn front_back_split(&mut self, front: &mut Self, back: &mut Self) -> Result<()> {
        let len = self.length();
        let front_len = len.div_ceil(2);
        let back_len = len - front_len;

        front.arena.try_reserve(front_len)?;
        back.arena.try_reserve(back_len)?;

        let moved = front.transplant(self, front_len)?;
        front.splice_back(moved);
        let moved = back.transplant(self, back_len)?;
        back.splice_back(moved);

        tracing::trace!(len, front_len, back_len, "front/back split");
        Ok(())
    }

    /// Drains the list by alternating [`move_node`](Sll::move_node) into
    /// `a` and `b`, starting with `a`.
    ///
    /// `a` receives one more element when the length is odd. Each move
    /// pushes onto the head, so each output holds its share in reverse
    /// order: `[0, 1, 2, 3, 4]` gives `a = [4, 2, 0]` and `b = [3, 1]`.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfMemory`] if an output cannot take its share; all three
    /// lists are unchanged.
    pub fn alternating_split(&mut self, a: &mut Self, b: &mut Self) -> Result<()> {
        let len = self.length();
        a.arena.try_reserve(len.div_ceil(2))?;
        b.arena.try_reserve(len / 2)?;

        while !self.is_empty() {
            a.move_node(self)?;
            if self.is_empty() {
                break;
            }
            b.move_node(self)?;
        }

        tracing::trace!(len, "alternating split");
        Ok(())
    }

    /// Interleaves `other` into `self`, starting with `self`'s head.
    ///
    /// Leftovers of the longer list follow at the end. `other` is drained.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfMemory`] if `self` cannot take `other`'s elements;
    /// both lists are unchanged.
    pub fn shuffle_merge(&mut self, other: &mut Self) -> Result<()> {
        let len = other.length();
        self.arena.try_reserve(len)?;

        let theirs = self.transplant(other, len)?;
        let ours = self.chain.take();
        self.chain = Chain::shuffle_merge(&mut self.arena, ours, theirs);
        Ok(())
    }

    /// Merges the ascending list `other` into the ascending list `self`.
    ///
    /// Stable: on ties `self`'s elements come first. `other` is drained.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfMemory`] if `self` cannot take `other`'s elements;
    /// both lists are unchanged.
    pub fn sorted_merge<F>(&mut self, other: &mut Self, cmp: F) -> Result<()>
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        let len = other.length();
        self.arena.try_reserve(len)?;

        let theirs = self.transplant(other, len)?;
        let ours = self.chain.take();
        self.chain = Chain::sorted_merge(&mut self.arena, ours, theirs, cmp);
        Ok(())
    }

    /// Builds a new list with one copy of every value found in both
    /// ascending lists, ascending and free of duplicates.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfMemory`] if the result cannot be allocated; the inputs
    /// are never modified.
    pub fn sorted_intersect<F>(&self, other: &Self, mut cmp: F) -> Result<Self>
    where
        T: Clone,
        F: FnMut(&T, &T) -> Ordering,
    {
        let mut out = Self::default();
        let mut tail = Idx::NONE;

        let (mut ours, mut theirs) = (self.iter(), other.iter());
        let (mut a, mut b) = (ours.next(), theirs.next());

        while let (Some(x), Some(y)) = (a, b) {
            match cmp(x, y) {
                Ordering::Less => a = ours.next(),
                Ordering::Greater => b = theirs.next(),
                Ordering::Equal => {
                    let seen =
                        tail.is_some() && cmp(&node(&out.arena, tail).data, x) == Ordering::Equal;
                    if !seen {
                        let idx = out.alloc(x.clone())?;
                        if tail.is_none() {
                            out.chain.push(&mut out.arena, idx);
                        } else {
                            Chain::insert_after(&mut out.arena, tail, idx);
                        }
                        tail = idx;
                    }
                    a = ours.next();
                    b = theirs.next();
                }
            }
        }

        Ok(out)
    }

    /// Releases every element through the destructor, head to tail.
    pub fn clear(&mut self) {
        let mut idx = self.chain.take().head();
        let mut released = 0usize;

        while idx.is_some() {
            let Some(node) = self.arena.remove(idx) else {
                break;
            };
            idx = node.next;
            dispose(&mut self.destructor, node.data);
            released += 1;
        }

        // Nodes cut off from the head by a forged link
        for node in self.arena.drain() {
            dispose(&mut self.destructor, node.data);
            released += 1;
        }

        if released > 0 {
            tracing::trace!(released, "list released");
        }
    }

    /// Releases the list and every element it still owns.
    pub fn free(mut self) {
        self.clear();
    }
}

fn dedup<T, Idx, F, D>(
    arena: &mut Arena<Node<T, Idx>, Idx>,
    chain: &Chain<Idx>,
    mut cmp: F,
    mut destructor: D,
) -> usize
where
    Idx: Index,
    F: FnMut(&T, &T) -> Ordering,
    D: FnMut(T),
{
    let mut removed = 0;
    let mut prev = chain.head();
    if prev.is_none() {
        return 0;
    }

    loop {
        let cur = next(arena, prev);
        if cur.is_none() {
            break;
        }

        if cmp(&node(arena, prev).data, &node(arena, cur).data) == Ordering::Equal {
            if let Some(idx) = Chain::remove_after(arena, prev) {
                destructor(take(arena, idx));
                removed += 1;
            }
        } else {
            prev = cur;
        }
    }

    tracing::trace!(removed, "adjacent duplicates removed");
    removed
}

impl<T, Idx: Index> Drop for Sll<T, Idx> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T: fmt::Debug, Idx: Index> fmt::Debug for Sll<T, Idx> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// Iterator over a list's elements, head to tail.
pub struct Iter<'a, T, Idx: Index = u32> {
    arena: &'a Arena<Node<T, Idx>, Idx>,
    cur: Idx,
}

impl<'a, T, Idx: Index> Iterator for Iter<'a, T, Idx> {
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<&'a T> {
        let idx = self.cur.to_option()?;
        let arena = self.arena;
        let node = arena.get(idx)?;
        self.cur = node.next;
        Some(&node.data)
    }
}

impl<'a, T, Idx: Index> IntoIterator for &'a Sll<T, Idx> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T, Idx>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
