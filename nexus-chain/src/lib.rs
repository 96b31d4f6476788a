//! Linked containers over index-addressed arena storage.
//!
//! Nodes live in an [`Arena`] and link to each other by integer index
//! instead of by pointer. Links are plain integers with a sentinel for
//! "none", so relinking algorithms (reverse, split, merge, sort) are safe
//! code, a forged cycle is a diagnosable state rather than memory
//! corruption, and a whole container frees in one sweep of its arena.
//!
//! # Layers
//!
//! ```text
//! Storage (Arena)   - owns nodes, hands out stable indices, reuses slots
//! Chain             - head index + O(1) splices over a storage
//! Sll / Tree        - own an arena, a structure and a destructor
//! ```
//!
//! [`Chain`] is the raw layer: every method takes the storage explicitly and
//! nothing allocates. [`Sll`] wraps a chain and its arena into an owning
//! list with the full algorithm set.
//!
//! # Quick Start
//!
//! ```
//! use nexus_chain::{Error, Sll};
//!
//! let mut list: Sll<u64> = Sll::new();
//! list.push(3).unwrap();
//! list.push(1).unwrap();
//! list.append(2).unwrap();
//!
//! list.merge_sort(|a, b| a.cmp(b));
//! assert_eq!(list.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
//!
//! assert_eq!(list.ith(5), Err(Error::IndexOutOfRange { index: 5, len: 3 }));
//! ```
//!
//! # Raw Chains
//!
//! Several chains can share one storage. The caller passes the same
//! storage to every call on a chain; indices from another storage are
//! meaningless to it.
//!
//! ```
//! use nexus_chain::{Arena, Chain, Node, Storage};
//!
//! let mut arena: Arena<Node<u32>> = Arena::new();
//! let mut chain = Chain::new();
//! for value in [3, 2, 1] {
//!     let idx = arena.try_insert(Node::new(value)).unwrap();
//!     chain.push(&mut arena, idx);
//! }
//!
//! let back = chain.split_front_back(&mut arena);
//! assert_eq!(chain.length(&arena), 2);
//! assert_eq!(back.length(&arena), 1);
//! ```
//!
//! # Containers
//!
//! | Structure | Ordering | Key Operations |
//! |-----------|----------|----------------|
//! | [`Sll`] | insertion / comparator | O(1) push/pop, O(n log n) merge sort |
//! | [`Tree`] | comparator, ties left | O(h) insert/search |
//! | [`Heap`] | comparator max-first | O(log n) insert/pop_max |
//! | [`ArrayStack`], [`ListStack`] | LIFO | O(1) push/pop |
//!
//! # Allocation Failure
//!
//! Growth goes through `try_reserve`. Allocator refusal and a configured
//! limit ([`Arena::bounded`], [`Sll::bounded`]) both surface as
//! [`Error::OutOfMemory`] and leave the container unchanged.
//!
//! # Feature Flags
//!
//! - `slab` - Enable [`Storage`] impl for `slab::Slab`

#![warn(missing_docs)]

mod algo;
pub mod error;
pub mod heap;
pub mod index;
pub mod list;
pub mod node;
pub mod stack;
pub mod storage;
pub mod tree;

pub use error::{Error, Result};
pub use heap::Heap;
pub use index::Index;
pub use list::{Destructor, Iter, Sll};
pub use node::{Chain, Indices, Node};
pub use stack::{ArrayStack, ListStack, Stack};
pub use storage::{Arena, Storage};
pub use tree::{Order, Tree};
