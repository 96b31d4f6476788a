//! LIFO stacks behind one trait.
//!
//! [`ArrayStack`] keeps elements in a doubling buffer; [`ListStack`] pushes
//! onto the head of an [`Sll`]. Both release leftover elements through an
//! optional destructor when dropped, top first.

use crate::list::Destructor;
use crate::{Error, Index, Result, Sll};

/// Slots allocated by [`ArrayStack::new`] when asked for zero.
pub const DEFAULT_ALLOCATION: usize = 10;

/// A last-in, first-out container.
pub trait Stack<T> {
    /// Pushes `value` on top.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfMemory`] if the stack cannot grow.
    fn push(&mut self, value: T) -> Result<()>;

    /// Removes and returns the top element.
    ///
    /// # Errors
    ///
    /// [`Error::Empty`] if the stack is empty.
    fn pop(&mut self) -> Result<T>;

    /// Returns the number of elements.
    fn size(&self) -> usize;

    /// Returns `true` if the stack holds no elements.
    fn is_empty(&self) -> bool {
        self.size() == 0
    }
}

/// Stack over a contiguous buffer that doubles when full.
pub struct ArrayStack<T> {
    elems: Vec<T>,
    destructor: Option<Destructor<T>>,
}

impl<T> ArrayStack<T> {
    /// Creates a stack with room for `init_alloc` elements
    /// ([`DEFAULT_ALLOCATION`] when zero).
    pub fn new(init_alloc: usize) -> Self {
        let init_alloc = if init_alloc == 0 {
            DEFAULT_ALLOCATION
        } else {
            init_alloc
        };
        Self {
            elems: Vec::with_capacity(init_alloc),
            destructor: None,
        }
    }

    /// Creates a stack whose leftover elements go to `destructor` on drop.
    pub fn with_destructor(init_alloc: usize, destructor: impl FnMut(T) + 'static) -> Self {
        let mut stack = Self::new(init_alloc);
        stack.destructor = Some(Box::new(destructor));
        stack
    }

    /// Returns the number of elements the buffer holds before growing.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.elems.capacity()
    }

    fn grow(&mut self) -> Result<()> {
        let additional = self.elems.capacity().max(1);
        if let Err(err) = self.elems.try_reserve_exact(additional) {
            tracing::warn!(
                capacity = self.elems.capacity(),
                error = %err,
                "stack growth refused"
            );
            return Err(Error::OutOfMemory);
        }
        tracing::trace!(capacity = self.elems.capacity(), "stack grown");
        Ok(())
    }

    /// Releases every element through the destructor, top first.
    pub fn free(mut self) {
        self.release();
    }

    fn release(&mut self) {
        while let Some(value) = self.elems.pop() {
            match self.destructor.as_mut() {
                Some(destructor) => destructor(value),
                None => drop(value),
            }
        }
    }
}

impl<T> Stack<T> for ArrayStack<T> {
    fn push(&mut self, value: T) -> Result<()> {
        if self.elems.len() == self.elems.capacity() {
            self.grow()?;
        }
        self.elems.push(value);
        Ok(())
    }

    fn pop(&mut self) -> Result<T> {
        self.elems.pop().ok_or(Error::Empty)
    }

    #[inline]
    fn size(&self) -> usize {
        self.elems.len()
    }
}

impl<T> Drop for ArrayStack<T> {
    fn drop(&mut self) {
        self.release();
    }
}

/// Stack over a singly linked list; the head is the top.
pub struct ListStack<T, Idx: Index = u32> {
    list: Sll<T, Idx>,
    len: usize,
}

impl<T, Idx: Index> Default for ListStack<T, Idx> {
    fn default() -> Self {
        Self::with_list(Sll::default())
    }
}

impl<T> ListStack<T> {
    /// Creates an empty stack.
    pub const fn new() -> Self {
        Self {
            list: Sll::new(),
            len: 0,
        }
    }

    /// Creates an empty stack whose leftover elements go to `destructor`.
    pub fn with_destructor(destructor: impl FnMut(T) + 'static) -> Self {
        Self::with_list(Sll::with_destructor(destructor))
    }

    /// Creates an empty stack holding at most `limit` elements.
    pub fn bounded(limit: usize) -> Self {
        Self::with_list(Sll::bounded(limit))
    }
}

impl<T, Idx: Index> ListStack<T, Idx> {
    /// Creates a stack whose top is the head of `list`. O(n).
    pub fn with_list(list: Sll<T, Idx>) -> Self {
        let len = list.length();
        Self { list, len }
    }

    /// Returns the top element without removing it.
    pub fn peek(&self) -> Option<&T> {
        self.list.ith(0).ok()
    }

    /// Releases every element through the destructor, top first.
    pub fn free(self) {
        self.list.free();
    }
}

impl<T, Idx: Index> Stack<T> for ListStack<T, Idx> {
    fn push(&mut self, value: T) -> Result<()> {
        self.list.push(value)?;
        self.len += 1;
        Ok(())
    }

    fn pop(&mut self) -> Result<T> {
        let value = self.list.pop()?;
        self.len -= 1;
        Ok(value)
    }

    #[inline]
    fn size(&self) -> usize {
        self.len
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn exercise(stack: &mut dyn Stack<u32>) {
        assert!(stack.is_empty());
        assert_eq!(stack.pop(), Err(Error::Empty));

        for i in 0..50 {
            stack.push(i).unwrap();
        }
        assert_eq!(stack.size(), 50);

        for i in (0..50).rev() {
            assert_eq!(stack.pop(), Ok(i));
        }
        assert_eq!(stack.size(), 0);
        assert_eq!(stack.pop(), Err(Error::Empty));
    }

    #[test]
    fn array_stack_is_lifo() {
        exercise(&mut ArrayStack::new(4));
    }

    #[test]
    fn list_stack_is_lifo() {
        exercise(&mut ListStack::<u32>::new());
    }

    #[test]
    fn zero_allocation_uses_default() {
        let stack: ArrayStack<u8> = ArrayStack::new(0);
        assert!(stack.capacity() >= DEFAULT_ALLOCATION);
    }

    #[test]
    fn array_stack_doubles() {
        let mut stack = ArrayStack::new(2);
        let initial = stack.capacity();
        for i in 0..=initial {
            stack.push(i).unwrap();
        }
        assert!(stack.capacity() >= initial * 2);
        assert_eq!(stack.size(), initial + 1);
    }

    #[test]
    fn destructor_runs_on_drop_top_first() {
        let log = Rc::new(RefCell::new(Vec::new()));

        let sink = Rc::clone(&log);
        let mut stack = ArrayStack::with_destructor(0, move |v| sink.borrow_mut().push(v));
        for i in 0..4 {
            stack.push(i).unwrap();
        }
        assert_eq!(stack.pop(), Ok(3));
        drop(stack);
        assert_eq!(*log.borrow(), vec![2, 1, 0]);

        log.borrow_mut().clear();
        let sink = Rc::clone(&log);
        let mut stack: ListStack<i32> = ListStack::with_destructor(move |v| sink.borrow_mut().push(v));
        for i in 0..4 {
            stack.push(i).unwrap();
        }
        stack.free();
        assert_eq!(*log.borrow(), vec![3, 2, 1, 0]);
    }

    #[test]
    fn list_stack_constructors_infer_default_index() {
        let mut stack = ListStack::new();
        stack.push('x').unwrap();
        assert_eq!(stack.peek(), Some(&'x'));

        let mut list: Sll<u8, u8> = Sll::default();
        list.push(1).unwrap();
        list.push(2).unwrap();
        let mut narrow = ListStack::with_list(list);
        assert_eq!(narrow.size(), 2);
        assert_eq!(narrow.pop(), Ok(2));

        let empty: ListStack<u8, u16> = ListStack::default();
        assert!(empty.is_empty());
    }

    #[test]
    fn bounded_list_stack() {
        let mut stack: ListStack<i32> = ListStack::bounded(1);
        stack.push(1).unwrap();
        assert_eq!(stack.push(2), Err(Error::OutOfMemory));
        assert_eq!(stack.size(), 1);
        assert_eq!(stack.peek(), Some(&1));
    }
}
