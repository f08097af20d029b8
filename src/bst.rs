use generational_arena::Index;
use log::trace;
use std::cmp::Ordering;
use std::fmt;

use crate::node::{NodeId, NodeRef, Payload};
use crate::tree::BinaryTree;
use crate::{Error, Result};

/// Ordered-tree primitives shared by every tree variant. Elements that
/// compare equal to a node are placed in its left subtree.
impl<T: Ord, P: Payload> BinaryTree<T, P> {
    // Descends from the root and hangs a new node at the first vacant slot.
    // Returns the index of the new node so that callers can fix the tree up
    // from it.
    pub(crate) fn insert_element(&mut self, element: T) -> Index {
        let mut current = match self.root_index() {
            Some(root) => root,
            None => {
                let node = self.create_node(element);
                self.set_root(Some(node));
                return node;
            }
        };
        loop {
            let goes_left = element.cmp(&self.node_at(current).element) != Ordering::Greater;
            let next = if goes_left {
                self.get_left(current)
            } else {
                self.get_right(current)
            };
            match next {
                Some(next) => current = next,
                None => {
                    let node = self.create_node(element);
                    if goes_left {
                        self.set_left(current, Some(node));
                    } else {
                        self.set_right(current, Some(node));
                    }
                    self.set_parent(node, Some(current));
                    return node;
                }
            }
        }
    }

    pub(crate) fn search_index(&self, element: &T) -> Option<Index> {
        let mut current = self.root_index();
        while let Some(node) = current {
            current = match element.cmp(&self.node_at(node).element) {
                Ordering::Less => self.get_left(node),
                Ordering::Greater => self.get_right(node),
                Ordering::Equal => return Some(node),
            };
        }
        None
    }

    // Moves the element of `node` into its in-order predecessor and the
    // predecessor's element into `node`. Returns the predecessor, which
    // has no right child and can therefore be spliced out.
    pub(crate) fn swap_with_predecessor(&mut self, node: Index) -> Index {
        let mut predecessor = match self.get_left(node) {
            Some(left) => left,
            None => return node,
        };
        while let Some(right) = self.get_right(predecessor) {
            predecessor = right;
        }
        self.swap_elements(node, predecessor);
        predecessor
    }

    // Unlinks a node with at most one child, promoting that child into its
    // place, and releases it.
    pub(crate) fn splice(&mut self, node: Index) -> Option<T> {
        debug_assert!(self.get_left(node).is_none() || self.get_right(node).is_none());
        let child = self.get_left(node).or_else(|| self.get_right(node));
        self.replace_child(node, child);
        self.remove_node(node)
    }

    // Deletes one occurrence of `element` without any rebalancing.
    fn delete_element(&mut self, element: &T) -> Option<T> {
        let mut node = self.search_index(element)?;
        if self.get_left(node).is_some() && self.get_right(node).is_some() {
            node = self.swap_with_predecessor(node);
        }
        self.splice(node)
    }

    // Rotates the nodes to the left, a no-op without a right child
    //    p              q
    //   / \            / \
    //  a   q   -->    p   c
    //     / \        / \
    //    b   c      a   b
    pub(crate) fn rotate_left(&mut self, rotation_root: Index) {
        // Left rotation so pivot is to the right
        let pivot = match self.get_right(rotation_root) {
            Some(pivot) => pivot,
            None => return,
        };
        trace!("rotate left at {:?}", rotation_root);
        let pivot_left = self.get_left(pivot);

        self.set_right(rotation_root, pivot_left);
        if let Some(pivot_left) = pivot_left {
            self.set_parent(pivot_left, Some(rotation_root));
        }
        self.replace_child(rotation_root, Some(pivot));
        self.set_left(pivot, Some(rotation_root));
        self.set_parent(rotation_root, Some(pivot));
    }

    // Rotates the nodes to the right, a no-op without a left child
    //     q             p
    //    / \           / \
    //   p   c  -->    a   q
    //  / \               / \
    // a   b             b   c
    pub(crate) fn rotate_right(&mut self, rotation_root: Index) {
        // Right rotation so pivot is to the left
        let pivot = match self.get_left(rotation_root) {
            Some(pivot) => pivot,
            None => return,
        };
        trace!("rotate right at {:?}", rotation_root);
        let pivot_right = self.get_right(pivot);

        self.set_left(rotation_root, pivot_right);
        if let Some(pivot_right) = pivot_right {
            self.set_parent(pivot_right, Some(rotation_root));
        }
        self.replace_child(rotation_root, Some(pivot));
        self.set_right(pivot, Some(rotation_root));
        self.set_parent(rotation_root, Some(pivot));
    }

    // Checks the links and that the in-order sequence never decreases.
    pub(crate) fn validate_order(&self) -> Result<()> {
        self.validate_links()?;
        let mut previous: Option<&T> = None;
        for element in self.iter() {
            if let Some(previous) = previous {
                if previous > element {
                    return Err(Error::Fatal("in-order sequence is not sorted".to_string()));
                }
            }
            previous = Some(element);
        }
        Ok(())
    }
}

/// Traversals.
impl<T, P: Payload> BinaryTree<T, P> {
    /// Visits every node, parents before their children, left before right.
    pub fn pre_order<'a, F>(&'a self, mut visit: F)
    where
        F: FnMut(NodeRef<'a, T, P>),
    {
        let mut stack: Vec<Index> = self.root_index().into_iter().collect();
        while let Some(node) = stack.pop() {
            visit(self.view(node));
            stack.extend(self.get_right(node));
            stack.extend(self.get_left(node));
        }
    }

    /// Visits every node in ascending order of elements.
    pub fn in_order<'a, F>(&'a self, mut visit: F)
    where
        F: FnMut(NodeRef<'a, T, P>),
    {
        let mut iter = self.iter();
        while let Some(node) = iter.next_node() {
            visit(self.view(node));
        }
    }

    /// Visits every node, children before their parents, left before right.
    pub fn post_order<'a, F>(&'a self, mut visit: F)
    where
        F: FnMut(NodeRef<'a, T, P>),
    {
        let mut stack: Vec<Index> = self.root_index().into_iter().collect();
        let mut visits = Vec::with_capacity(self.len());
        while let Some(node) = stack.pop() {
            visits.push(node);
            stack.extend(self.get_left(node));
            stack.extend(self.get_right(node));
        }
        for node in visits.into_iter().rev() {
            visit(self.view(node));
        }
    }

    /// Returns an iterator over the elements in ascending order.
    pub fn iter(&self) -> Iter<'_, T, P> {
        let mut iter = Iter {
            tree: self,
            stack: Vec::new(),
            remaining: self.len(),
        };
        iter.push_left_spine(self.root_index());
        iter
    }
}

/// In-order iterator over the elements of a tree.
///
/// Each call to `iter()` starts a fresh traversal. The iterator borrows the
/// tree, so the tree cannot change underneath it.
pub struct Iter<'a, T, P> {
    tree: &'a BinaryTree<T, P>,
    stack: Vec<Index>,
    remaining: usize,
}

impl<'a, T, P: Payload> Iter<'a, T, P> {
    fn push_left_spine(&mut self, mut node: Option<Index>) {
        while let Some(index) = node {
            self.stack.push(index);
            node = self.tree.get_left(index);
        }
    }

    fn next_node(&mut self) -> Option<Index> {
        let node = self.stack.pop()?;
        self.push_left_spine(self.tree.get_right(node));
        self.remaining -= 1;
        Some(node)
    }
}

impl<'a, T, P: Payload> Iterator for Iter<'a, T, P> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let tree = self.tree;
        self.next_node().map(|node| &tree.node_at(node).element)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T, P: Payload> ExactSizeIterator for Iter<'a, T, P> {}

/// Operations shared by the ordered trees of this crate.
///
/// Rotations are part of the interface so that generic code can ask for
/// them, but balanced trees refuse them with `Error::Unsupported`.
pub trait OrderedTree<T: Ord> {
    type Payload: Payload;

    /// Returns the underlying binary tree, for structural queries and
    /// traversals.
    fn as_binary_tree(&self) -> &BinaryTree<T, Self::Payload>;

    /// Inserts `element`, keeping any equal elements already present, and
    /// returns the handle of the new node.
    fn insert(&mut self, element: T) -> NodeId;

    /// Removes one occurrence of `element` and returns it. Deleting an
    /// element that is not present leaves the tree untouched.
    fn delete(&mut self, element: &T) -> Option<T>;

    fn clear(&mut self);

    /// Rotates left around `node`; a no-op if the node has no right child.
    fn rotate_left(&mut self, node: NodeId) -> Result<()>;

    /// Rotates right around `node`; a no-op if the node has no left child.
    fn rotate_right(&mut self, node: NodeId) -> Result<()>;

    /// Finds a node holding an element equal to `element`.
    fn search(&self, element: &T) -> Option<NodeRef<'_, T, Self::Payload>> {
        let tree = self.as_binary_tree();
        tree.search_index(element).map(|node| tree.view(node))
    }

    fn contains(&self, element: &T) -> bool {
        self.search(element).is_some()
    }

    fn len(&self) -> usize {
        self.as_binary_tree().len()
    }

    fn is_empty(&self) -> bool {
        self.as_binary_tree().is_empty()
    }

    fn height(&self) -> isize {
        self.as_binary_tree().height()
    }

    fn root(&self) -> Result<NodeRef<'_, T, Self::Payload>> {
        self.as_binary_tree().root()
    }

    fn node(&self, node: NodeId) -> Result<NodeRef<'_, T, Self::Payload>> {
        self.as_binary_tree().node(node)
    }

    fn iter(&self) -> Iter<'_, T, Self::Payload> {
        self.as_binary_tree().iter()
    }
}

/// Unbalanced binary search tree that allows duplicate elements.
#[derive(Debug, Clone)]
pub struct BinarySearchTree<T> {
    tree: BinaryTree<T, ()>,
}

impl<T: Ord> BinarySearchTree<T> {
    pub fn new() -> Self {
        BinarySearchTree {
            tree: BinaryTree::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        BinarySearchTree {
            tree: BinaryTree::with_capacity(capacity),
        }
    }

    /// Checks the parent links, the element count and the ordering.
    pub fn validate(&self) -> Result<()> {
        self.tree.validate_order()
    }
}

impl<T: Ord> OrderedTree<T> for BinarySearchTree<T> {
    type Payload = ();

    fn as_binary_tree(&self) -> &BinaryTree<T, ()> {
        &self.tree
    }

    fn insert(&mut self, element: T) -> NodeId {
        NodeId(self.tree.insert_element(element))
    }

    fn delete(&mut self, element: &T) -> Option<T> {
        self.tree.delete_element(element)
    }

    fn clear(&mut self) {
        self.tree.clear();
    }

    fn rotate_left(&mut self, node: NodeId) -> Result<()> {
        let node = self.tree.resolve(node)?;
        self.tree.rotate_left(node);
        Ok(())
    }

    fn rotate_right(&mut self, node: NodeId) -> Result<()> {
        let node = self.tree.resolve(node)?;
        self.tree.rotate_right(node);
        Ok(())
    }
}

impl<T: Ord> Default for BinarySearchTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Ord> Extend<T> for BinarySearchTree<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for element in iter {
            self.insert(element);
        }
    }
}

impl<T: Ord> FromIterator<T> for BinarySearchTree<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut tree = BinarySearchTree::new();
        tree.extend(iter);
        tree
    }
}

impl<'a, T: Ord> IntoIterator for &'a BinarySearchTree<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T, ()>;

    fn into_iter(self) -> Self::IntoIter {
        self.tree.iter()
    }
}

impl<T: PartialEq> PartialEq for BinarySearchTree<T> {
    fn eq(&self, other: &Self) -> bool {
        self.tree == other.tree
    }
}

impl<T: fmt::Display> fmt::Display for BinarySearchTree<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(&self.tree, f)
    }
}
