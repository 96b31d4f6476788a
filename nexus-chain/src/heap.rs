//! Comparator-ordered binary max-heap.
//!
//! Elements live in a contiguous buffer in the usual implicit layout: the
//! children of position `i` sit at `2i + 1` and `2i + 2`. The greatest
//! element under the comparator is at position 0.
//!
//! ```
//! use nexus_chain::Heap;
//!
//! let mut heap = Heap::new(|a: &u32, b: &u32| a.cmp(b));
//! for value in [3, 9, 1, 7] {
//!     heap.insert(value).unwrap();
//! }
//!
//! assert_eq!(heap.peek_max(), Some(&9));
//! assert_eq!(heap.pop_max(), Some(9));
//! assert_eq!(heap.pop_max(), Some(7));
//! assert_eq!(heap.len(), 2);
//! ```
//!
//! A reversed comparator turns it into a min-heap.

use std::cmp::Ordering;
use std::fmt;

use crate::Result;

/// A binary max-heap ordered by `F`.
pub struct Heap<T, F> {
    elems: Vec<T>,
    cmp: F,
}

impl<T, F> Heap<T, F>
where
    F: FnMut(&T, &T) -> Ordering,
{
    /// Creates an empty heap ordered by `cmp`.
    pub const fn new(cmp: F) -> Self {
        Self {
            elems: Vec::new(),
            cmp,
        }
    }

    /// Creates an empty heap with room for `capacity` elements.
    pub fn with_capacity(cmp: F, capacity: usize) -> Self {
        Self {
            elems: Vec::with_capacity(capacity),
            cmp,
        }
    }

    /// Returns the number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.elems.len()
    }

    /// Returns `true` if the heap is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.elems.is_empty()
    }

    /// Returns the greatest element without removing it.
    #[inline]
    pub fn peek_max(&self) -> Option<&T> {
        self.elems.first()
    }

    /// Adds `value`. O(log n).
    ///
    /// # Errors
    ///
    /// [`Error::OutOfMemory`](crate::Error::OutOfMemory) if the buffer
    /// cannot grow; the heap is unchanged.
    pub fn insert(&mut self, value: T) -> Result<()> {
        if let Err(err) = self.elems.try_reserve(1) {
            tracing::warn!(len = self.elems.len(), error = %err, "heap growth refused");
            return Err(err.into());
        }
        self.elems.push(value);
        self.sift_up(0, self.elems.len() - 1);
        Ok(())
    }

    /// Removes and returns the greatest element. O(log n).
    pub fn pop_max(&mut self) -> Option<T> {
        let last = self.elems.pop()?;
        if self.elems.is_empty() {
            return Some(last);
        }
        let max = std::mem::replace(&mut self.elems[0], last);
        self.sift_down(0);
        Some(max)
    }

    /// Consumes the heap, passing every remaining element to `f`.
    pub fn free_with(mut self, f: impl FnMut(T)) {
        self.elems.drain(..).for_each(f);
    }

    /// Moves the element at `pos` up while it is greater than its parent,
    /// never past `floor`.
    fn sift_up(&mut self, floor: usize, mut pos: usize) {
        while pos > floor {
            let parent = (pos - 1) / 2;
            if (self.cmp)(&self.elems[pos], &self.elems[parent]).is_le() {
                break;
            }
            self.elems.swap(pos, parent);
            pos = parent;
        }
    }

    /// Restores order below `pos` after its element was replaced.
    ///
    /// Two phases: descend to a leaf always following the greater child,
    /// then sift the displaced element back up to its place.
    fn sift_down(&mut self, pos: usize) {
        let len = self.elems.len();
        let mut hole = pos;

        loop {
            let left = 2 * hole + 1;
            if left >= len {
                break;
            }
            let right = left + 1;
            let greater = if right < len
                && (self.cmp)(&self.elems[right], &self.elems[left]).is_gt()
            {
                right
            } else {
                left
            };
            self.elems.swap(hole, greater);
            hole = greater;
        }

        self.sift_up(pos, hole);
    }
}

impl<T: fmt::Debug, F> fmt::Debug for Heap<T, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Heap")
            .field("len", &self.elems.len())
            .field("max", &self.elems.first())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn max_heap() -> Heap<i32, impl FnMut(&i32, &i32) -> Ordering> {
        Heap::new(|a: &i32, b: &i32| a.cmp(b))
    }

    fn drain<F: FnMut(&i32, &i32) -> Ordering>(heap: &mut Heap<i32, F>) -> Vec<i32> {
        std::iter::from_fn(|| heap.pop_max()).collect()
    }

    #[test]
    fn new_is_empty() {
        let mut heap = max_heap();
        assert!(heap.is_empty());
        assert_eq!(heap.len(), 0);
        assert_eq!(heap.peek_max(), None);
        assert_eq!(heap.pop_max(), None);
    }

    #[test]
    fn single_element() {
        let mut heap = max_heap();
        heap.insert(4).unwrap();
        assert_eq!(heap.peek_max(), Some(&4));
        assert_eq!(heap.pop_max(), Some(4));
        assert!(heap.is_empty());
    }

    #[test]
    fn pops_descending() {
        let mut heap = max_heap();
        for value in [5, 1, 9, 3, 7, 2, 8, 6, 4, 0] {
            heap.insert(value).unwrap();
        }
        assert_eq!(heap.len(), 10);
        assert_eq!(drain(&mut heap), vec![9, 8, 7, 6, 5, 4, 3, 2, 1, 0]);
    }

    #[test]
    fn duplicates() {
        let mut heap = max_heap();
        for value in [3, 3, 1, 3, 2, 1] {
            heap.insert(value).unwrap();
        }
        assert_eq!(drain(&mut heap), vec![3, 3, 3, 2, 1, 1]);
    }

    #[test]
    fn interleaved_insert_and_pop() {
        let mut heap = max_heap();
        heap.insert(10).unwrap();
        heap.insert(20).unwrap();
        assert_eq!(heap.pop_max(), Some(20));
        heap.insert(5).unwrap();
        heap.insert(15).unwrap();
        assert_eq!(heap.pop_max(), Some(15));
        assert_eq!(heap.pop_max(), Some(10));
        assert_eq!(heap.pop_max(), Some(5));
        assert_eq!(heap.pop_max(), None);
    }

    #[test]
    fn reversed_comparator_is_min_heap() {
        let mut heap = Heap::with_capacity(|a: &i32, b: &i32| b.cmp(a), 8);
        for value in [5, 1, 9, 3] {
            heap.insert(value).unwrap();
        }
        assert_eq!(heap.peek_max(), Some(&1));
        assert_eq!(drain(&mut heap), vec![1, 3, 5, 9]);
    }

    #[test]
    fn free_with_visits_remaining() {
        let mut heap = max_heap();
        for value in 0..6 {
            heap.insert(value).unwrap();
        }
        heap.pop_max();

        let mut freed = Vec::new();
        heap.free_with(|v| freed.push(v));
        freed.sort();
        assert_eq!(freed, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn many_elements() {
        let mut heap = max_heap();
        // Deterministic scramble of 0..1000
        for i in 0..1000 {
            heap.insert((i * 7919) % 1000).unwrap();
        }
        let out = drain(&mut heap);
        assert_eq!(out, (0..1000).rev().collect::<Vec<_>>());
    }
}
