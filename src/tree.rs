use generational_arena::{Arena, Index};
use log::debug;
use std::fmt;

use crate::node::{Node, NodeId, NodeRef, Payload};
use crate::{Error, Result};

/// Position of a node relative to its parent.
#[derive(PartialEq, Copy, Clone, Debug)]
pub(crate) enum NodeType {
    LeftChild(Index),
    RightChild(Index),
    Orphan,
}

/// Binary tree shared by every tree variant in this crate.
///
/// Stores the nodes in a generational arena together with the index of the
/// root and the number of elements. Nodes own their children through the
/// `left`/`right` indices, `parent` is only a back-reference.
#[derive(Debug, Clone)]
pub struct BinaryTree<T, P> {
    nodes: Arena<Node<T, P>>,
    root: Option<Index>,
    count: usize,
}

impl<T, P: Payload> Default for BinaryTree<T, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, P: Payload> BinaryTree<T, P> {
    /// Create a new empty tree
    pub fn new() -> Self {
        BinaryTree {
            nodes: Arena::new(),
            root: None,
            count: 0,
        }
    }

    /// Create a new empty tree with room for `capacity` nodes before the
    /// arena has to grow.
    pub fn with_capacity(capacity: usize) -> Self {
        BinaryTree {
            nodes: Arena::with_capacity(capacity),
            root: None,
            count: 0,
        }
    }

    /// Number of elements in the tree.
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Remove every element, releasing all nodes.
    pub fn clear(&mut self) {
        debug!("clearing tree of {} elements", self.count);
        self.nodes.clear();
        self.root = None;
        self.count = 0;
    }

    /// Height of the tree; an empty tree has height -1.
    pub fn height(&self) -> isize {
        match self.root {
            Some(root) => self.view(root).height(),
            None => -1,
        }
    }

    /// Returns the root node, or `Error::NotFound` if the tree is empty.
    pub fn root(&self) -> Result<NodeRef<'_, T, P>> {
        match self.root {
            Some(root) => Ok(self.view(root)),
            None => Err(Error::NotFound("tree is empty".to_string())),
        }
    }

    /// Resolves a node handle into a view of that node.
    ///
    /// # Arguments
    ///
    /// * `node` - A handle previously returned by this tree
    ///
    pub fn node(&self, node: NodeId) -> Result<NodeRef<'_, T, P>> {
        self.resolve(node).map(|index| self.view(index))
    }

    /// Structural search: visits the nodes in pre-order and returns the first
    /// whose element equals `element`. Ordered trees provide a logarithmic
    /// search on top of this.
    pub fn search(&self, element: &T) -> Option<NodeRef<'_, T, P>>
    where
        T: PartialEq,
    {
        let mut stack: Vec<Index> = self.root.into_iter().collect();
        while let Some(index) = stack.pop() {
            let node = self.node_at(index);
            if node.element == *element {
                return Some(self.view(index));
            }
            stack.extend(node.right);
            stack.extend(node.left);
        }
        None
    }

    pub fn contains(&self, element: &T) -> bool
    where
        T: PartialEq,
    {
        self.search(element).is_some()
    }

    // Node factory. Every node starts with the default payload of the tree
    // variant and is counted as an element straight away.
    pub(crate) fn create_node(&mut self, element: T) -> Index {
        self.count += 1;
        self.nodes.insert(Node::new(element))
    }

    // Releases a node that has already been unlinked from the tree.
    pub(crate) fn remove_node(&mut self, node: Index) -> Option<T> {
        let removed = self.nodes.remove(node)?;
        self.count -= 1;
        Some(removed.element)
    }

    pub(crate) fn resolve(&self, node: NodeId) -> Result<Index> {
        if self.nodes.contains(node.0) {
            Ok(node.0)
        } else {
            Err(Error::InvalidArgument(format!(
                "{:?} does not name a node of this tree",
                node
            )))
        }
    }

    pub(crate) fn view(&self, node: Index) -> NodeRef<'_, T, P> {
        NodeRef::new(self, node)
    }

    pub(crate) fn node_at(&self, node: Index) -> &Node<T, P> {
        &self.nodes[node]
    }

    pub(crate) fn root_index(&self) -> Option<Index> {
        self.root
    }

    pub(crate) fn set_root(&mut self, root: Option<Index>) {
        self.root = root;
    }

    // Swaps the elements held by two distinct nodes, leaving links and
    // payloads in place.
    pub(crate) fn swap_elements(&mut self, a: Index, b: Index) {
        if let (Some(a), Some(b)) = self.nodes.get2_mut(a, b) {
            std::mem::swap(&mut a.element, &mut b.element);
        }
    }

    // Returns a NodeType indicating if the given node is a left child or a
    // right child of its parent, or the root.
    pub(crate) fn get_node_type(&self, node: Index) -> NodeType {
        match self.get_parent(node) {
            Some(parent) if self.get_left(parent) == Some(node) => NodeType::LeftChild(parent),
            Some(parent) => NodeType::RightChild(parent),
            None => NodeType::Orphan,
        }
    }

    pub(crate) fn is_left_child(&self, node: Index) -> bool {
        matches!(self.get_node_type(node), NodeType::LeftChild(_))
    }

    // Returns the other child of this node's parent.
    pub(crate) fn get_sibling(&self, node: Index) -> Option<Index> {
        match self.get_node_type(node) {
            NodeType::LeftChild(parent) => self.get_right(parent),
            NodeType::RightChild(parent) => self.get_left(parent),
            NodeType::Orphan => None,
        }
    }

    // Puts `replacement` in the slot `node` occupies under its parent (or at
    // the root) and points the replacement back at that parent. `node`
    // keeps its own links.
    pub(crate) fn replace_child(&mut self, node: Index, replacement: Option<Index>) {
        let parent = self.get_parent(node);
        match self.get_node_type(node) {
            NodeType::LeftChild(parent) => self.set_left(parent, replacement),
            NodeType::RightChild(parent) => self.set_right(parent, replacement),
            NodeType::Orphan => self.root = replacement,
        }
        if let Some(replacement) = replacement {
            self.set_parent(replacement, parent);
        }
    }

    // Getter and setters
    pub(crate) fn get_left(&self, node: Index) -> Option<Index> {
        self.nodes[node].left
    }

    pub(crate) fn set_left(&mut self, node: Index, left: Option<Index>) {
        self.nodes[node].left = left;
    }

    pub(crate) fn get_right(&self, node: Index) -> Option<Index> {
        self.nodes[node].right
    }

    pub(crate) fn set_right(&mut self, node: Index, right: Option<Index>) {
        self.nodes[node].right = right;
    }

    pub(crate) fn get_parent(&self, node: Index) -> Option<Index> {
        self.nodes[node].parent
    }

    pub(crate) fn set_parent(&mut self, node: Index, parent: Option<Index>) {
        self.nodes[node].parent = parent;
    }

    pub(crate) fn get_payload(&self, node: Index) -> P {
        self.nodes[node].payload
    }

    pub(crate) fn set_payload(&mut self, node: Index, payload: P) {
        self.nodes[node].payload = payload;
    }

    /// Checks that every child points back at its parent, that the root has
    /// no parent and that the element count matches the reachable nodes.
    pub(crate) fn validate_links(&self) -> Result<()> {
        let mut reachable = 0;
        let mut stack: Vec<Index> = self.root.into_iter().collect();
        if let Some(root) = self.root {
            if self.get_parent(root).is_some() {
                return Err(Error::Fatal("root has a parent".to_string()));
            }
        }
        while let Some(index) = stack.pop() {
            reachable += 1;
            let node = self.node_at(index);
            for child in node.left.into_iter().chain(node.right) {
                if self.get_parent(child) != Some(index) {
                    return Err(Error::Fatal("child does not point back at its parent".to_string()));
                }
                stack.push(child);
            }
        }
        if reachable != self.count || reachable != self.nodes.len() {
            return Err(Error::Fatal(format!(
                "{} elements counted but {} nodes reachable",
                self.count, reachable
            )));
        }
        Ok(())
    }

    // Draws the subtree under `node`. `open[l]` records whether the branch
    // at level `l` still has a sibling to draw below.
    fn draw(&self, f: &mut fmt::Formatter, node: Index, level: usize, open: &mut Vec<bool>) -> fmt::Result
    where
        T: fmt::Display,
    {
        writeln!(f, "{}", self.view(node))?;
        if open.len() <= level {
            open.resize(level + 1, false);
        }
        open[level] = true;
        match (self.get_left(node), self.get_right(node)) {
            (Some(left), Some(right)) => {
                draw_indent(f, level, open)?;
                write!(f, "├─›")?;
                self.draw(f, left, level + 1, open)?;
                draw_indent(f, level, open)?;
                write!(f, "└─»")?;
                open[level] = false;
                self.draw(f, right, level + 1, open)
            }
            (Some(left), None) => {
                draw_indent(f, level, open)?;
                write!(f, "└─›")?;
                open[level] = false;
                self.draw(f, left, level + 1, open)
            }
            (None, Some(right)) => {
                draw_indent(f, level, open)?;
                write!(f, "└─»")?;
                open[level] = false;
                self.draw(f, right, level + 1, open)
            }
            (None, None) => Ok(()),
        }
    }
}

fn draw_indent(f: &mut fmt::Formatter, level: usize, open: &[bool]) -> fmt::Result {
    for &branch in &open[..level] {
        write!(f, "{}", if branch { "│  " } else { "   " })?;
    }
    Ok(())
}

impl<T: fmt::Display, P: Payload> fmt::Display for BinaryTree<T, P> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.root {
            Some(root) => self.draw(f, root, 0, &mut Vec::new()),
            None => Ok(()),
        }
    }
}

impl<T: PartialEq, P: Payload> PartialEq for BinaryTree<T, P> {
    fn eq(&self, other: &Self) -> bool {
        match (self.root().ok(), other.root().ok()) {
            (Some(a), Some(b)) => a == b,
            (None, None) => true,
            _ => false,
        }
    }
}
