use generational_arena::Index;
use std::fmt;

use crate::tree::BinaryTree;
use crate::{Error, Result};

/// Extra per-node state attached by a tree variant.
///
/// The plain ordered tree carries `()`, the red-black tree carries its
/// color. A freshly created node always starts with `Payload::default()`.
pub trait Payload: Copy + PartialEq + Default + fmt::Debug {
    /// Writes the label used when drawing the tree.
    fn fmt_label<T: fmt::Display>(&self, element: &T, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", element)
    }
}

impl Payload for () {}

/// Opaque handle to a node of a tree.
///
/// Handles stay valid across rotations. Once the node is removed the handle
/// is rejected by every operation that accepts one.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) Index);

#[derive(Debug, Clone)]
pub(crate) struct Node<T, P> {
    // Tree structure
    pub(crate) parent: Option<Index>,
    pub(crate) left: Option<Index>,
    pub(crate) right: Option<Index>,

    // Data
    pub(crate) element: T,
    pub(crate) payload: P,
}

impl<T, P: Payload> Node<T, P> {
    pub(crate) fn new(element: T) -> Self {
        Node {
            parent: None,
            left: None,
            right: None,
            element,
            payload: P::default(),
        }
    }
}

/// Read-only view of a node, borrowed from its tree.
pub struct NodeRef<'a, T, P> {
    tree: &'a BinaryTree<T, P>,
    index: Index,
}

impl<'a, T, P> Clone for NodeRef<'a, T, P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, T, P> Copy for NodeRef<'a, T, P> {}

impl<'a, T, P: Payload> NodeRef<'a, T, P> {
    pub(crate) fn new(tree: &'a BinaryTree<T, P>, index: Index) -> Self {
        NodeRef { tree, index }
    }

    fn node(&self) -> &'a Node<T, P> {
        self.tree.node_at(self.index)
    }

    /// Returns the handle of this node.
    pub fn id(&self) -> NodeId {
        NodeId(self.index)
    }

    /// Returns a reference to the element stored in this node.
    pub fn element(&self) -> &'a T {
        &self.node().element
    }

    /// Returns the payload attached to this node by the tree variant.
    pub fn payload(&self) -> P {
        self.node().payload
    }

    pub fn has_parent(&self) -> bool {
        self.node().parent.is_some()
    }

    pub fn has_left(&self) -> bool {
        self.node().left.is_some()
    }

    pub fn has_right(&self) -> bool {
        self.node().right.is_some()
    }

    /// Returns the parent of this node, or `Error::NotFound` for the root.
    pub fn parent(&self) -> Result<NodeRef<'a, T, P>> {
        self.link(self.node().parent, "parent")
    }

    /// Returns the left child of this node, or `Error::NotFound` if it has none.
    pub fn left(&self) -> Result<NodeRef<'a, T, P>> {
        self.link(self.node().left, "left child")
    }

    /// Returns the right child of this node, or `Error::NotFound` if it has none.
    pub fn right(&self) -> Result<NodeRef<'a, T, P>> {
        self.link(self.node().right, "right child")
    }

    fn link(&self, link: Option<Index>, what: &str) -> Result<NodeRef<'a, T, P>> {
        match link {
            Some(index) => Ok(NodeRef::new(self.tree, index)),
            None => Err(Error::NotFound(format!("node has no {}", what))),
        }
    }

    /// Length of the longest downward path from this node to a leaf.
    /// A node without children has height 0.
    pub fn height(&self) -> isize {
        let mut height = 0;
        let mut stack = vec![(self.index, 0)];
        while let Some((index, depth)) = stack.pop() {
            height = height.max(depth);
            let node = self.tree.node_at(index);
            stack.extend(node.left.map(|left| (left, depth + 1)));
            stack.extend(node.right.map(|right| (right, depth + 1)));
        }
        height
    }

    /// Distance from the root. The root has depth 0.
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut current = self.node().parent;
        while let Some(index) = current {
            depth += 1;
            current = self.tree.node_at(index).parent;
        }
        depth
    }
}

// Two subtrees are equal when their shapes match and every pair of
// corresponding nodes carries equal elements and payloads.
impl<'a, 'b, T: PartialEq, P: Payload> PartialEq<NodeRef<'b, T, P>> for NodeRef<'a, T, P> {
    fn eq(&self, other: &NodeRef<'b, T, P>) -> bool {
        let mut stack = vec![(self.index, other.index)];
        while let Some((a, b)) = stack.pop() {
            let a = self.tree.node_at(a);
            let b = other.tree.node_at(b);
            if a.element != b.element || a.payload != b.payload {
                return false;
            }
            for pair in [(a.left, b.left), (a.right, b.right)] {
                match pair {
                    (Some(a), Some(b)) => stack.push((a, b)),
                    (None, None) => {}
                    _ => return false,
                }
            }
        }
        true
    }
}

impl<'a, T: fmt::Display, P: Payload> fmt::Display for NodeRef<'a, T, P> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let node = self.node();
        node.payload.fmt_label(&node.element, f)
    }
}

impl<'a, T: fmt::Debug, P: Payload> fmt::Debug for NodeRef<'a, T, P> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let node = self.node();
        f.debug_struct("NodeRef")
            .field("element", &node.element)
            .field("payload", &node.payload)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BinarySearchTree, OrderedTree};

    #[test]
    fn links_and_presence() {
        let tree: BinarySearchTree<usize> = vec![5, 3, 8].into_iter().collect();
        let root = tree.root().unwrap();
        assert_eq!(*root.element(), 5);
        assert!(!root.has_parent());
        assert!(root.has_left() && root.has_right());
        match root.parent() {
            Err(err) => assert_eq!(err, Error::NotFound("node has no parent".to_string())),
            Ok(_) => panic!("root must not have a parent"),
        }

        let left = root.left().unwrap();
        assert_eq!(*left.element(), 3);
        assert_eq!(*left.parent().unwrap().element(), 5);
        assert!(matches!(left.left(), Err(Error::NotFound(_))));
        assert!(matches!(left.right(), Err(Error::NotFound(_))));
    }

    #[test]
    fn height_and_depth() {
        let tree: BinarySearchTree<usize> = vec![5, 3, 8, 1, 2].into_iter().collect();
        let root = tree.root().unwrap();
        assert_eq!(root.height(), 3);
        assert_eq!(root.depth(), 0);

        let two = tree.search(&2).unwrap();
        assert_eq!(two.height(), 0);
        assert_eq!(two.depth(), 3);
        assert_eq!(root.right().unwrap().height(), 0);
    }

    #[test]
    fn structural_equality() {
        let a: BinarySearchTree<usize> = vec![5, 3, 8].into_iter().collect();
        let b: BinarySearchTree<usize> = vec![5, 8, 3].into_iter().collect();
        let c: BinarySearchTree<usize> = vec![3, 5, 8].into_iter().collect();
        assert_eq!(a.root().unwrap(), b.root().unwrap());
        assert_ne!(a.root().unwrap(), c.root().unwrap());
        assert_eq!(a.root().unwrap().left().unwrap(), b.search(&3).unwrap());
    }
}
