//! Binary search trees stored in a generational arena.
//!
//! The crate is layered:
//!
//! * [`BinaryTree`] owns the nodes, the root and the element count and
//!   answers structural queries (height, depth, equality, drawing).
//! * [`BinarySearchTree`] keeps elements ordered and offers the two
//!   rotations.
//! * [`RedBlackTree`] colors every node and rebalances after each insertion
//!   and deletion so that the height stays below `2 * log2(n + 1)`.
//!
//! Both ordered trees implement [`OrderedTree`]. Elements are their own keys
//! and equal elements are kept, so the trees behave as ordered multisets.
//!
//! ```
//! use red_black_tree::{Color, OrderedTree, RedBlackTree};
//!
//! let mut tree: RedBlackTree<u32> = vec![10, 20, 30].into_iter().collect();
//! let root = tree.root().unwrap();
//! assert_eq!(*root.element(), 20);
//! assert_eq!(root.color(), Color::Black);
//! assert_eq!(root.left().unwrap().color(), Color::Red);
//!
//! tree.delete(&20);
//! assert_eq!(tree.iter().collect::<Vec<_>>(), vec![&10, &30]);
//! ```

mod bst;
mod error;
mod node;
mod rbtree;
mod tree;

pub use bst::{BinarySearchTree, Iter, OrderedTree};
pub use error::{Error, Result};
pub use node::{NodeId, NodeRef, Payload};
pub use rbtree::{Color, RedBlackTree};
pub use tree::BinaryTree;
