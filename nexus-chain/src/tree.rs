//! Unbalanced binary search tree over arena storage.
//!
//! Nodes hold a left and right child index into the tree's own [`Arena`].
//! Ordering comes from a comparator closure supplied at construction; equal
//! keys descend to the left, so duplicates are kept.
//!
//! All traversals are iterative: a degenerate (list-shaped) tree does not
//! grow the call stack.
//!
//! ```
//! use nexus_chain::{Order, Tree};
//!
//! let mut tree = Tree::new(|a: &i32, b: &i32| a.cmp(b));
//! for value in [8, 3, 10, 1, 6] {
//!     tree.insert(value).unwrap();
//! }
//!
//! assert_eq!(tree.height(), 3);
//! assert_eq!(tree.search(&6), Some(&6));
//!
//! let mut seen = Vec::new();
//! tree.map(Order::InOrder, |v, seen: &mut Vec<i32>| seen.push(*v), &mut seen);
//! assert_eq!(seen, vec![1, 3, 6, 8, 10]);
//! ```

use std::cmp::Ordering;
use std::fmt;

use crate::list::Destructor;
use crate::{Arena, Index, Result, Storage};

/// Traversal order for [`Tree::map`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Order {
    /// Node, then left subtree, then right subtree.
    PreOrder,
    /// Left subtree, node, right subtree: ascending under the comparator.
    #[default]
    InOrder,
    /// Left subtree, right subtree, then node.
    PostOrder,
}

#[derive(Debug)]
struct TreeNode<T, Idx: Index> {
    left: Idx,
    right: Idx,
    data: T,
}

type NodeArena<T, Idx> = Arena<TreeNode<T, Idx>, Idx>;

#[inline]
fn get<T, Idx: Index>(arena: &NodeArena<T, Idx>, idx: Idx) -> &TreeNode<T, Idx> {
    arena.get(idx).expect("invalid index")
}

/// A binary search tree owning its nodes.
///
/// The comparator is a shared `Fn` so lookups work through `&self`.
pub struct Tree<T, F, Idx: Index = u32> {
    arena: NodeArena<T, Idx>,
    root: Idx,
    cmp: F,
    destructor: Option<Destructor<T>>,
}

impl<T, F> Tree<T, F>
where
    F: Fn(&T, &T) -> Ordering,
{
    /// Creates an empty tree ordered by `cmp`.
    ///
    /// Uses `u32` links; [`with_limit`](Tree::with_limit) picks another
    /// index type.
    pub fn new(cmp: F) -> Self {
        Self::with_limit(cmp, usize::MAX)
    }

    /// Creates an empty tree whose released elements go to `destructor`.
    pub fn with_destructor(cmp: F, destructor: impl FnMut(T) + 'static) -> Self {
        let mut tree = Self::new(cmp);
        tree.set_destructor(destructor);
        tree
    }

    /// Creates an empty tree holding at most `limit` elements.
    pub fn bounded(cmp: F, limit: usize) -> Self {
        Self::with_limit(cmp, limit)
    }
}

impl<T, F, Idx> Tree<T, F, Idx>
where
    F: Fn(&T, &T) -> Ordering,
    Idx: Index,
{
    /// Creates an empty tree ordered by `cmp` holding at most `limit`
    /// elements, further capped by what `Idx` can address.
    ///
    /// ```
    /// use nexus_chain::Tree;
    ///
    /// let mut tree = Tree::<u32, _, u8>::with_limit(|a: &u32, b: &u32| a.cmp(b), usize::MAX);
    /// for value in 0..255 {
    ///     tree.insert(value).unwrap();
    /// }
    /// assert!(tree.insert(255).is_err());
    /// ```
    pub fn with_limit(cmp: F, limit: usize) -> Self {
        Self {
            arena: Arena::bounded(limit),
            root: Idx::NONE,
            cmp,
            destructor: None,
        }
    }

    /// Replaces the destructor.
    pub fn set_destructor(&mut self, destructor: impl FnMut(T) + 'static) {
        self.destructor = Some(Box::new(destructor));
    }

    /// Inserts `value` as a new leaf.
    ///
    /// Values comparing less than or equal to a node go to its left.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfMemory`](crate::Error::OutOfMemory) if no node can be
    /// allocated; the tree is unchanged.
    pub fn insert(&mut self, value: T) -> Result<()> {
        let idx = self.arena.try_insert(TreeNode {
            left: Idx::NONE,
            right: Idx::NONE,
            data: value,
        })?;

        if self.root.is_none() {
            self.root = idx;
            return Ok(());
        }

        let mut cur = self.root;
        let mut depth = 1usize;
        loop {
            let node = get(&self.arena, cur);
            let left = (self.cmp)(&get(&self.arena, idx).data, &node.data) != Ordering::Greater;
            let child = if left { node.left } else { node.right };

            depth += 1;
            if child.is_some() {
                cur = child;
                continue;
            }

            if let Some(parent) = self.arena.get_mut(cur) {
                if left {
                    parent.left = idx;
                } else {
                    parent.right = idx;
                }
            }
            tracing::trace!(depth, "tree leaf inserted");
            return Ok(());
        }
    }

    /// Returns the first element on the search path comparing equal to
    /// `value`.
    pub fn search(&self, value: &T) -> Option<&T> {
        let mut cur = self.root;
        while cur.is_some() {
            let node = get(&self.arena, cur);
            cur = match (self.cmp)(value, &node.data) {
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
                Ordering::Equal => return Some(&node.data),
            };
        }
        None
    }
}

impl<T, F, Idx: Index> Tree<T, F, Idx> {
    /// Returns the number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    /// Returns `true` if the tree holds no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Number of nodes on the longest root-to-leaf path.
    ///
    /// An empty tree has height 0, a single node height 1.
    pub fn height(&self) -> usize {
        let mut max = 0;
        let mut stack = Vec::new();
        if self.root.is_some() {
            stack.push((self.root, 1));
        }

        while let Some((idx, depth)) = stack.pop() {
            max = max.max(depth);
            let node = get(&self.arena, idx);
            for child in [node.left, node.right] {
                if child.is_some() {
                    stack.push((child, depth + 1));
                }
            }
        }
        max
    }

    /// Visits every node in `order`, calling `visit` with its index.
    fn walk(&self, order: Order, mut visit: impl FnMut(Idx)) {
        let mut stack = Vec::new();
        match order {
            Order::PreOrder => {
                if self.root.is_some() {
                    stack.push(self.root);
                }
                while let Some(idx) = stack.pop() {
                    visit(idx);
                    let node = get(&self.arena, idx);
                    for child in [node.right, node.left] {
                        if child.is_some() {
                            stack.push(child);
                        }
                    }
                }
            }
            Order::InOrder => {
                let mut cur = self.root;
                loop {
                    while cur.is_some() {
                        stack.push(cur);
                        cur = get(&self.arena, cur).left;
                    }
                    let Some(idx) = stack.pop() else {
                        break;
                    };
                    visit(idx);
                    cur = get(&self.arena, idx).right;
                }
            }
            Order::PostOrder => {
                let mut cur = self.root;
                let mut last = Idx::NONE;
                loop {
                    if cur.is_some() {
                        stack.push(cur);
                        cur = get(&self.arena, cur).left;
                        continue;
                    }
                    let Some(&top) = stack.last() else {
                        break;
                    };
                    let right = get(&self.arena, top).right;
                    if right.is_some() && right != last {
                        cur = right;
                    } else {
                        visit(top);
                        last = top;
                        stack.pop();
                    }
                }
            }
        }
    }

    /// Calls `visitor(element, aux)` for every element in `order`.
    pub fn map<A, V>(&self, order: Order, mut visitor: V, aux: &mut A)
    where
        V: FnMut(&T, &mut A),
    {
        self.walk(order, |idx| visitor(&get(&self.arena, idx).data, aux));
    }

    /// Releases every element in post-order through the destructor.
    pub fn clear(&mut self) {
        let mut order = Vec::with_capacity(self.arena.len());
        self.walk(Order::PostOrder, |idx| order.push(idx));
        self.root = Idx::NONE;

        for idx in &order {
            if let Some(node) = self.arena.remove(*idx) {
                match self.destructor.as_mut() {
                    Some(destructor) => destructor(node.data),
                    None => drop(node.data),
                }
            }
        }
        tracing::trace!(released = order.len(), "tree released");
    }

    /// Releases the tree and every element it owns.
    pub fn free(mut self) {
        self.clear();
    }
}

impl<T, F, Idx: Index> Drop for Tree<T, F, Idx> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T: fmt::Debug, F, Idx: Index> fmt::Debug for Tree<T, F, Idx> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut list = f.debug_list();
        self.walk(Order::InOrder, |idx| {
            list.entry(&get(&self.arena, idx).data);
        });
        list.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn cmp_int(a: &i32, b: &i32) -> Ordering {
        a.cmp(b)
    }

    fn tree_of(values: &[i32]) -> Tree<i32, fn(&i32, &i32) -> Ordering> {
        let mut tree = Tree::new(cmp_int as fn(&i32, &i32) -> Ordering);
        for &value in values {
            tree.insert(value).unwrap();
        }
        tree
    }

    fn collect<F>(tree: &Tree<i32, F>, order: Order) -> Vec<i32> {
        let mut out = Vec::new();
        tree.map(order, |v, out: &mut Vec<i32>| out.push(*v), &mut out);
        out
    }

    #[test]
    fn empty_tree() {
        let tree = tree_of(&[]);
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
        assert_eq!(tree.height(), 0);
        assert_eq!(tree.search(&1), None);
        assert!(collect(&tree, Order::InOrder).is_empty());
    }

    #[test]
    fn height() {
        assert_eq!(tree_of(&[5]).height(), 1);
        assert_eq!(tree_of(&[5, 3, 8]).height(), 2);
        assert_eq!(tree_of(&[8, 3, 10, 1, 6, 14, 4, 7, 13]).height(), 4);
        // Sorted input degenerates to a list
        assert_eq!(tree_of(&[1, 2, 3, 4, 5]).height(), 5);
    }

    #[test]
    fn search() {
        let tree = tree_of(&[8, 3, 10, 1, 6, 14]);
        for value in [8, 3, 10, 1, 6, 14] {
            assert_eq!(tree.search(&value), Some(&value));
        }
        assert_eq!(tree.search(&0), None);
        assert_eq!(tree.search(&7), None);
    }

    #[test]
    fn traversal_orders() {
        let tree = tree_of(&[8, 3, 10, 1, 6, 14, 4, 7, 13]);

        assert_eq!(
            collect(&tree, Order::PreOrder),
            vec![8, 3, 1, 6, 4, 7, 10, 14, 13]
        );
        assert_eq!(
            collect(&tree, Order::InOrder),
            vec![1, 3, 4, 6, 7, 8, 10, 13, 14]
        );
        assert_eq!(
            collect(&tree, Order::PostOrder),
            vec![1, 4, 7, 6, 3, 13, 14, 10, 8]
        );
        assert_eq!(Order::default(), Order::InOrder);
    }

    #[test]
    fn ties_go_left() {
        let mut tree = Tree::new(|a: &(i32, char), b: &(i32, char)| a.0.cmp(&b.0));
        tree.insert((5, 'a')).unwrap();
        tree.insert((5, 'b')).unwrap();
        tree.insert((5, 'c')).unwrap();

        assert_eq!(tree.height(), 3);
        // Search stops at the first equal node: the root
        assert_eq!(tree.search(&(5, 'z')), Some(&(5, 'a')));

        let mut seen = Vec::new();
        tree.map(
            Order::InOrder,
            |v, seen: &mut Vec<char>| seen.push(v.1),
            &mut seen,
        );
        assert_eq!(seen, vec!['c', 'b', 'a']);
    }

    #[test]
    fn deep_degenerate_tree_traverses_without_recursion() {
        let mut tree = Tree::new(cmp_int);
        for value in 0..4_000 {
            tree.insert(value).unwrap();
        }
        assert_eq!(tree.height(), 4_000);

        let mut count = 0usize;
        tree.map(Order::PostOrder, |_, count| *count += 1, &mut count);
        assert_eq!(count, 4_000);
    }

    #[test]
    fn free_releases_post_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        let mut tree = Tree::with_destructor(cmp_int, move |v| sink.borrow_mut().push(v));
        for value in [2, 1, 3] {
            tree.insert(value).unwrap();
        }

        tree.free();
        assert_eq!(*log.borrow(), vec![1, 3, 2]);
    }

    #[test]
    fn bounded_insert() {
        let mut tree = Tree::bounded(cmp_int, 2);
        tree.insert(1).unwrap();
        tree.insert(2).unwrap();
        assert_eq!(tree.insert(3), Err(Error::OutOfMemory));
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.search(&3), None);
    }

    #[test]
    fn narrow_index_caps_node_count() {
        let mut tree: Tree<i32, _, u8> = Tree::with_limit(cmp_int, usize::MAX);
        for value in 0..255 {
            tree.insert(value).unwrap();
        }
        assert_eq!(tree.insert(255), Err(Error::OutOfMemory));
        assert_eq!(tree.len(), 255);

        tree.set_destructor(|_| {});
        tree.clear();
        assert!(tree.is_empty());
        tree.insert(7).unwrap();
        assert_eq!(tree.search(&7), Some(&7));
    }

    #[test]
    fn debug_is_in_order() {
        let tree = tree_of(&[2, 1, 3]);
        assert_eq!(format!("{tree:?}"), "[1, 2, 3]");
    }
}
