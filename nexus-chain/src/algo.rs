//! Relinking algorithms on chains that share one storage.
//!
//! Everything here moves links, never payloads, and never allocates: a
//! sort, split or merge only rewrites successor indices. Comparators follow
//! the `sort_by` contract (`FnMut(&T, &T) -> Ordering`).

use std::cmp::Ordering;

use crate::node::{next, node, set_next};
use crate::{Chain, Index, Node, Storage};

/// Tail-appending chain builder used by the merges.
struct Builder<Idx: Index> {
    head: Idx,
    tail: Idx,
}

impl<Idx: Index> Builder<Idx> {
    fn new() -> Self {
        Self {
            head: Idx::NONE,
            tail: Idx::NONE,
        }
    }

    fn link<T, S>(&mut self, storage: &mut S, idx: Idx)
    where
        S: Storage<Node<T, Idx>, Index = Idx>,
    {
        if self.tail.is_none() {
            self.head = idx;
        } else {
            set_next(storage, self.tail, idx);
        }
        self.tail = idx;
    }

    /// Terminates the built chain with `rest` (`Idx::NONE` or a sub-chain).
    fn finish<T, S>(self, storage: &mut S, rest: Idx) -> Chain<Idx>
    where
        S: Storage<Node<T, Idx>, Index = Idx>,
    {
        if self.tail.is_none() {
            return Chain::from_head(rest);
        }
        set_next(storage, self.tail, rest);
        Chain::from_head(self.head)
    }
}

#[inline]
fn compare<T, Idx, S, F>(storage: &S, a: Idx, b: Idx, cmp: &mut F) -> Ordering
where
    Idx: Index,
    S: Storage<Node<T, Idx>, Index = Idx>,
    F: FnMut(&T, &T) -> Ordering,
{
    cmp(&node(storage, a).data, &node(storage, b).data)
}

impl<Idx: Index> Chain<Idx> {
    /// Reverses the chain in place by popping every node onto a new chain.
    pub fn reverse<T, S>(&mut self, storage: &mut S)
    where
        S: Storage<Node<T, Idx>, Index = Idx>,
    {
        let mut reversed = Chain::new();
        while let Ok(idx) = self.pop(storage) {
            reversed.push(storage, idx);
        }
        *self = reversed;
    }

    /// Reverses the chain in place by recursing on halves.
    ///
    /// Each call splits the chain front/back, reverses both halves, then
    /// links the reversed back half ahead of the reversed front half.
    /// Recursion depth is ⌈log2 n⌉; time is O(n log n).
    pub fn reverse_recursive<T, S>(&mut self, storage: &mut S)
    where
        S: Storage<Node<T, Idx>, Index = Idx>,
    {
        fn reverse_halves<T, Idx, S>(storage: &mut S, mut front: Chain<Idx>) -> Chain<Idx>
        where
            Idx: Index,
            S: Storage<Node<T, Idx>, Index = Idx>,
        {
            let back = front.split_front_back(storage);
            if back.is_empty() {
                return front;
            }
            // The old back head ends up as the tail of the reversed back.
            let joint = back.head;
            let front = reverse_halves(storage, front);
            let back = reverse_halves(storage, back);
            set_next(storage, joint, front.head);
            back
        }

        let chain = self.take();
        *self = reverse_halves(storage, chain);
    }

    /// Floyd's tortoise and hare.
    ///
    /// The tortoise advances one node per step, the hare two. Reaching the
    /// terminus means the chain is acyclic; the two meeting means it is not.
    /// O(n) time, O(1) space, and terminates within one lap of a cycle.
    pub fn has_cycle<T, S>(&self, storage: &S) -> bool
    where
        S: Storage<Node<T, Idx>, Index = Idx>,
    {
        let mut tortoise = self.head;
        let mut hare = self.head;
        let mut steps = 0usize;

        loop {
            if hare.is_none() {
                return false;
            }
            hare = next(storage, hare);
            if hare.is_none() {
                return false;
            }
            hare = next(storage, hare);
            tortoise = next(storage, tortoise);
            steps += 1;

            if hare.is_some() && hare == tortoise {
                tracing::debug!(steps, meet = ?hare, "cycle detected");
                return true;
            }
        }
    }

    /// Cuts the chain in two, keeping the front ⌈n/2⌉ nodes in `self` and
    /// returning the rest.
    ///
    /// An empty or single-node chain returns an empty back half.
    pub fn split_front_back<T, S>(&mut self, storage: &mut S) -> Chain<Idx>
    where
        S: Storage<Node<T, Idx>, Index = Idx>,
    {
        let len = self.length(storage);
        if len < 2 {
            return Chain::new();
        }

        let front_len = len.div_ceil(2);
        let mut cut = self.head;
        for _ in 1..front_len {
            cut = next(storage, cut);
        }

        let back = next(storage, cut);
        set_next(storage, cut, Idx::NONE);
        Chain::from_head(back)
    }

    /// Interleaves `a` and `b` node by node, starting with `a`.
    ///
    /// Leftover nodes of the longer chain follow in their original order.
    pub fn shuffle_merge<T, S>(storage: &mut S, a: Chain<Idx>, b: Chain<Idx>) -> Chain<Idx>
    where
        S: Storage<Node<T, Idx>, Index = Idx>,
    {
        let mut out = Builder::new();
        let (mut a, mut b) = (a.head, b.head);

        while a.is_some() && b.is_some() {
            let (take_a, take_b) = (a, b);
            a = next(storage, a);
            b = next(storage, b);
            out.link(storage, take_a);
            out.link(storage, take_b);
        }

        let rest = if a.is_some() { a } else { b };
        out.finish(storage, rest)
    }

    /// Merges two ascending chains into one ascending chain.
    ///
    /// Stable: on ties the node from `a` comes first.
    pub fn sorted_merge<T, S, F>(
        storage: &mut S,
        a: Chain<Idx>,
        b: Chain<Idx>,
        mut cmp: F,
    ) -> Chain<Idx>
    where
        S: Storage<Node<T, Idx>, Index = Idx>,
        F: FnMut(&T, &T) -> Ordering,
    {
        let mut out = Builder::new();
        let (mut a, mut b) = (a.head, b.head);

        while a.is_some() && b.is_some() {
            if compare(storage, a, b, &mut cmp) != Ordering::Greater {
                let take = a;
                a = next(storage, a);
                out.link(storage, take);
            } else {
                let take = b;
                b = next(storage, b);
                out.link(storage, take);
            }
        }

        let rest = if a.is_some() { a } else { b };
        out.finish(storage, rest)
    }

    /// Sorts by recursive front/back split and sorted merge. O(n log n),
    /// stable.
    pub fn merge_sort<T, S, F>(&mut self, storage: &mut S, mut cmp: F)
    where
        S: Storage<Node<T, Idx>, Index = Idx>,
        F: FnMut(&T, &T) -> Ordering,
    {
        fn sort<T, Idx, S, F>(storage: &mut S, mut front: Chain<Idx>, cmp: &mut F) -> Chain<Idx>
        where
            Idx: Index,
            S: Storage<Node<T, Idx>, Index = Idx>,
            F: FnMut(&T, &T) -> Ordering,
        {
            if front.head.is_none() || next(storage, front.head).is_none() {
                return front;
            }
            let back = front.split_front_back(storage);
            let front = sort(storage, front, cmp);
            let back = sort(storage, back, cmp);
            Chain::sorted_merge(storage, front, back, &mut *cmp)
        }

        let chain = self.take();
        *self = sort(storage, chain, &mut cmp);
    }

    /// Links `idx` in front of the first node that is not less than it.
    ///
    /// Keeps an ascending chain ascending; equal elements end up after the
    /// new node. On an unsorted chain the position is simply the first such
    /// node.
    pub fn sorted_insert<T, S, F>(&mut self, storage: &mut S, idx: Idx, mut cmp: F)
    where
        S: Storage<Node<T, Idx>, Index = Idx>,
        F: FnMut(&T, &T) -> Ordering,
    {
        let mut prev = Idx::NONE;
        let mut cur = self.head;
        while cur.is_some() && compare(storage, cur, idx, &mut cmp) == Ordering::Less {
            prev = cur;
            cur = next(storage, cur);
        }

        if prev.is_none() {
            self.push(storage, idx);
        } else {
            Chain::insert_after(storage, prev, idx);
        }
    }

    /// Pops every node and sorted-inserts it into a new chain. O(n²).
    ///
    /// Runs of equal elements come out in reverse relative order.
    pub fn insert_sort<T, S, F>(&mut self, storage: &mut S, mut cmp: F)
    where
        S: Storage<Node<T, Idx>, Index = Idx>,
        F: FnMut(&T, &T) -> Ordering,
    {
        let mut sorted = Chain::new();
        while let Ok(idx) = self.pop(storage) {
            sorted.sorted_insert(storage, idx, &mut cmp);
        }
        *self = sorted;
    }

    /// Swaps adjacent out-of-order nodes until a pass makes no swap.
    /// O(n²), stable.
    pub fn bubble_sort<T, S, F>(&mut self, storage: &mut S, mut cmp: F)
    where
        S: Storage<Node<T, Idx>, Index = Idx>,
        F: FnMut(&T, &T) -> Ordering,
    {
        loop {
            let mut swapped = false;
            let mut prev = Idx::NONE;
            let mut cur = self.head;

            while cur.is_some() {
                let succ = next(storage, cur);
                if succ.is_none() {
                    break;
                }

                if compare(storage, cur, succ, &mut cmp) == Ordering::Greater {
                    // prev -> succ -> cur -> (succ's old successor)
                    let after = next(storage, succ);
                    set_next(storage, cur, after);
                    set_next(storage, succ, cur);
                    if prev.is_none() {
                        self.head = succ;
                    } else {
                        set_next(storage, prev, succ);
                    }
                    prev = succ;
                    swapped = true;
                } else {
                    prev = cur;
                    cur = succ;
                }
            }

            if !swapped {
                return;
            }
        }
    }
}
