use generational_arena::Index;
use log::trace;
use std::fmt;

use crate::bst::{Iter, OrderedTree};
use crate::node::{NodeId, NodeRef, Payload};
use crate::tree::{BinaryTree, NodeType};
use crate::{Error, Result};

/// Color of a red-black node. `None` only appears on a node that has been
/// created but not yet colored by the insertion.
#[derive(PartialEq, Eq, Copy, Clone, Debug, Default)]
pub enum Color {
    Red,
    Black,
    #[default]
    None,
}

impl Payload for Color {
    fn fmt_label<T: fmt::Display>(&self, element: &T, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Color::Red => write!(f, "R{{{}}}", element),
            Color::Black => write!(f, "B{{{}}}", element),
            Color::None => write!(f, "{{{}}}", element),
        }
    }
}

impl<'a, T> NodeRef<'a, T, Color> {
    pub fn color(&self) -> Color {
        self.payload()
    }
}

// Side of its parent on which a node, or an empty slot, hangs.
#[derive(PartialEq, Copy, Clone, Debug)]
enum Side {
    Left,
    Right,
}

/// Self-balancing binary search tree using the red-black coloring rules.
///
/// Duplicate elements are kept. Rotations are applied internally only; the
/// `OrderedTree` rotation methods return `Error::Unsupported`.
#[derive(Debug, Clone)]
pub struct RedBlackTree<T> {
    tree: BinaryTree<T, Color>,
}

impl<T: Ord> RedBlackTree<T> {
    /// Create a new empty tree
    pub fn new() -> Self {
        RedBlackTree {
            tree: BinaryTree::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        RedBlackTree {
            tree: BinaryTree::with_capacity(capacity),
        }
    }

    /// Returns the color of the specified node.
    ///
    /// # Arguments
    ///
    /// * `node` - A handle previously returned by this tree
    ///
    pub fn color(&self, node: NodeId) -> Result<Color> {
        let node = self.tree.resolve(node)?;
        Ok(self.tree.get_payload(node))
    }

    /// Checks every structural invariant of the tree and returns its black
    /// height, counting the absent leaves.
    pub fn validate(&self) -> Result<usize> {
        self.tree.validate_order()?;
        if self.get_color(self.tree.root_index()) != Color::Black {
            return Err(Error::Fatal("root is not black".to_string()));
        }
        self.check_black_heights(self.tree.root_index())
    }

    fn check_black_heights(&self, node: Option<Index>) -> Result<usize> {
        let node = match node {
            Some(node) => node,
            None => return Ok(1),
        };
        let left = self.tree.get_left(node);
        let right = self.tree.get_right(node);
        let color = self.get_color(Some(node));
        match color {
            Color::Red => {
                if self.get_color(left) == Color::Red || self.get_color(right) == Color::Red {
                    return Err(Error::Fatal("red node with a red child".to_string()));
                }
            }
            Color::Black => {}
            Color::None => return Err(Error::Fatal("uncolored node".to_string())),
        }
        let left_height = self.check_black_heights(left)?;
        let right_height = self.check_black_heights(right)?;
        if left_height != right_height {
            return Err(Error::Fatal(format!(
                "black heights differ: {} on the left, {} on the right",
                left_height, right_height
            )));
        }
        Ok(if color == Color::Black { left_height + 1 } else { left_height })
    }

    // Absent nodes count as black leaves.
    fn get_color(&self, node: Option<Index>) -> Color {
        match node {
            Some(node) => self.tree.get_payload(node),
            None => Color::Black,
        }
    }

    fn set_color(&mut self, node: Index, color: Color) {
        self.tree.set_payload(node, color);
    }

    // Rebalances the tree after inserting a new red node
    fn rebalance_insert(&mut self, mut node: Index) {
        loop {
            let parent = match self.tree.get_parent(node) {
                Some(parent) => parent,
                None => {
                    trace!("insert: node is the root");
                    self.set_color(node, Color::Black);
                    return;
                }
            };
            if self.get_color(Some(parent)) == Color::Black {
                return;
            }
            // A red parent is never the root, so the grandparent exists
            let grandparent = match self.tree.get_parent(parent) {
                Some(grandparent) => grandparent,
                None => {
                    self.set_color(parent, Color::Black);
                    return;
                }
            };
            let uncle = self.tree.get_sibling(parent);
            if self.get_color(uncle) == Color::Red {
                trace!("insert: red uncle, pushing the violation up");
                if let Some(uncle) = uncle {
                    self.set_color(uncle, Color::Black);
                }
                self.set_color(parent, Color::Black);
                self.set_color(grandparent, Color::Red);
                node = grandparent;
                continue;
            }

            // Uncle is black so we will need to do some rotations
            let mut parent = parent;
            let parent_is_left = self.tree.is_left_child(parent);
            if self.tree.is_left_child(node) != parent_is_left {
                trace!("insert: zig-zag, aligning node and parent");
                if parent_is_left {
                    self.tree.rotate_left(parent);
                } else {
                    self.tree.rotate_right(parent);
                }
                // The rotation swapped the node and its parent
                std::mem::swap(&mut node, &mut parent);
            }
            trace!("insert: zig-zig, rotating the grandparent");
            self.set_color(parent, Color::Black);
            self.set_color(grandparent, Color::Red);
            if self.tree.is_left_child(node) {
                self.tree.rotate_right(grandparent);
            } else {
                self.tree.rotate_left(grandparent);
            }
            return;
        }
    }

    // Restores the black height after a black node was removed from the
    // slot described by `position`. The slot holds either a black node or
    // nothing at all.
    fn rebalance_delete(&mut self, mut position: NodeType) {
        loop {
            let (parent, side) = match position {
                NodeType::LeftChild(parent) => (parent, Side::Left),
                NodeType::RightChild(parent) => (parent, Side::Right),
                NodeType::Orphan => return,
            };
            // Removing a black node leaves the other side at least one black
            // node deep, so the sibling exists
            let mut sibling = match self.sibling_of(parent, side) {
                Some(sibling) => sibling,
                None => return,
            };

            if self.get_color(Some(sibling)) == Color::Red {
                trace!("delete case 1: red sibling");
                self.set_color(parent, Color::Red);
                self.set_color(sibling, Color::Black);
                self.rotate_toward(parent, side);
                sibling = match self.sibling_of(parent, side) {
                    Some(sibling) => sibling,
                    None => return,
                };
            }

            let (near, far) = self.nephews(sibling, side);
            let parent_color = self.get_color(Some(parent));
            let nephews_black =
                self.get_color(near) == Color::Black && self.get_color(far) == Color::Black;
            let sibling_black = self.get_color(Some(sibling)) == Color::Black;

            if parent_color == Color::Black && sibling_black && nephews_black {
                trace!("delete case 2: all black, pushing the deficiency up");
                self.set_color(sibling, Color::Red);
                position = self.tree.get_node_type(parent);
                continue;
            }

            if parent_color == Color::Red && sibling_black && nephews_black {
                trace!("delete case 3: red parent");
                self.set_color(sibling, Color::Red);
                self.set_color(parent, Color::Black);
                return;
            }

            let mut far = far;
            if let (Color::Black, Some(near)) = (self.get_color(far), near) {
                trace!("delete case 4: near nephew red");
                self.set_color(sibling, Color::Red);
                self.set_color(near, Color::Black);
                self.rotate_away(sibling, side);
                sibling = match self.sibling_of(parent, side) {
                    Some(sibling) => sibling,
                    None => return,
                };
                far = self.nephews(sibling, side).1;
            }

            trace!("delete case 5: far nephew red");
            self.set_color(sibling, parent_color);
            self.set_color(parent, Color::Black);
            if let Some(far) = far {
                self.set_color(far, Color::Black);
            }
            self.rotate_toward(parent, side);
            return;
        }
    }

    fn sibling_of(&self, parent: Index, side: Side) -> Option<Index> {
        match side {
            Side::Left => self.tree.get_right(parent),
            Side::Right => self.tree.get_left(parent),
        }
    }

    // Children of the sibling: the one next to `side` and the one away from it
    fn nephews(&self, sibling: Index, side: Side) -> (Option<Index>, Option<Index>) {
        let left = self.tree.get_left(sibling);
        let right = self.tree.get_right(sibling);
        match side {
            Side::Left => (left, right),
            Side::Right => (right, left),
        }
    }

    // Moves `node` down towards `side`
    fn rotate_toward(&mut self, node: Index, side: Side) {
        match side {
            Side::Left => self.tree.rotate_left(node),
            Side::Right => self.tree.rotate_right(node),
        }
    }

    // Moves `node` down away from `side`
    fn rotate_away(&mut self, node: Index, side: Side) {
        match side {
            Side::Left => self.tree.rotate_right(node),
            Side::Right => self.tree.rotate_left(node),
        }
    }
}

impl<T: Ord> OrderedTree<T> for RedBlackTree<T> {
    type Payload = Color;

    fn as_binary_tree(&self) -> &BinaryTree<T, Color> {
        &self.tree
    }

    fn insert(&mut self, element: T) -> NodeId {
        let node = self.tree.insert_element(element);
        self.set_color(node, Color::Red);
        self.rebalance_insert(node);
        NodeId(node)
    }

    fn delete(&mut self, element: &T) -> Option<T> {
        let mut node = self.tree.search_index(element)?;
        if self.tree.get_left(node).is_some() && self.tree.get_right(node).is_some() {
            // Only the elements move, the colors stay with their positions
            node = self.tree.swap_with_predecessor(node);
        }
        let child = self.tree.get_left(node).or_else(|| self.tree.get_right(node));
        let position = self.tree.get_node_type(node);
        let removed_color = self.get_color(Some(node));
        let removed = self.tree.splice(node);

        if removed_color == Color::Red || self.get_color(child) == Color::Red {
            if let Some(child) = child {
                self.set_color(child, Color::Black);
            }
        } else {
            self.rebalance_delete(position);
        }
        removed
    }

    fn clear(&mut self) {
        self.tree.clear();
    }

    fn rotate_left(&mut self, _node: NodeId) -> Result<()> {
        Err(Error::Unsupported(
            "red-black trees cannot be rotated left by the user".to_string(),
        ))
    }

    fn rotate_right(&mut self, _node: NodeId) -> Result<()> {
        Err(Error::Unsupported(
            "red-black trees cannot be rotated right by the user".to_string(),
        ))
    }
}

impl<T: Ord> Default for RedBlackTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Ord> Extend<T> for RedBlackTree<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for element in iter {
            self.insert(element);
        }
    }
}

impl<T: Ord> FromIterator<T> for RedBlackTree<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut tree = RedBlackTree::new();
        tree.extend(iter);
        tree
    }
}

impl<'a, T: Ord> IntoIterator for &'a RedBlackTree<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T, Color>;

    fn into_iter(self) -> Self::IntoIter {
        self.tree.iter()
    }
}

// Equal trees have the same shape, elements and colors.
impl<T: PartialEq> PartialEq for RedBlackTree<T> {
    fn eq(&self, other: &Self) -> bool {
        self.tree == other.tree
    }
}

impl<T: fmt::Display> fmt::Display for RedBlackTree<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(&self.tree, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    impl<T: Ord + fmt::Debug> RedBlackTree<T> {
        // Level order with the color of every node
        fn get_level_order(&self) -> String {
            let mut out = String::new();
            let mut queue: std::collections::VecDeque<_> = self.root().into_iter().collect();
            while let Some(node) = queue.pop_front() {
                let color = if node.color() == Color::Red { "R" } else { "B" };
                out = format!("{}{}{:?} ", out, color, node.element());
                queue.extend(node.left());
                queue.extend(node.right());
            }
            out
        }
    }

    fn tree_of(elements: &[usize]) -> RedBlackTree<usize> {
        elements.iter().copied().collect()
    }

    #[test]
    fn insertion_test() {
        let mut tree: RedBlackTree<usize> = RedBlackTree::new();

        tree.insert(7);
        assert_eq!(tree.validate(), Ok(2));
        assert_eq!(tree.get_level_order(), "B7 ");

        tree.insert(6);
        assert_eq!(tree.get_level_order(), "B7 R6 ");

        tree.insert(5);
        assert_eq!(tree.validate(), Ok(2));
        assert_eq!(tree.get_level_order(), "B6 R5 R7 ");

        tree.insert(4);
        assert_eq!(tree.validate(), Ok(3));
        assert_eq!(tree.get_level_order(), "B6 B5 B7 R4 ");

        tree.insert(3);
        assert_eq!(tree.get_level_order(), "B6 B4 B7 R3 R5 ");

        tree.insert(2);
        assert_eq!(tree.get_level_order(), "B6 R4 B7 B3 B5 R2 ");

        tree.insert(1);
        assert_eq!(tree.get_level_order(), "B6 R4 B7 B2 B5 R1 R3 ");
        assert_eq!(tree.validate(), Ok(3));
    }

    #[test]
    fn zig_zag_insertion() {
        let tree = tree_of(&[10, 5, 7]);
        assert_eq!(tree.get_level_order(), "B7 R5 R10 ");
        let tree = tree_of(&[10, 15, 12]);
        assert_eq!(tree.get_level_order(), "B12 R10 R15 ");
    }

    #[test]
    fn deletion_test() {
        let mut tree = tree_of(&[7, 3, 18, 10, 22, 8, 11, 26, 2, 6, 13]);
        assert_eq!(
            tree.get_level_order(),
            "B10 R7 R18 B3 B8 B11 B22 R2 R6 R13 R26 "
        );
        assert_eq!(tree.validate(), Ok(3));

        // Two children, the predecessor is a red leaf
        tree.delete(&18);
        assert_eq!(tree.get_level_order(), "B10 R7 R13 B3 B8 B11 B22 R2 R6 R26 ");
        // Black leaf with a black sibling that has a far red child
        tree.delete(&11);
        assert_eq!(tree.get_level_order(), "B10 R7 R22 B3 B8 B13 B26 R2 R6 ");
        // Black node with a single red child
        tree.delete(&3);
        assert_eq!(tree.get_level_order(), "B10 R7 R22 B2 B8 B13 B26 R6 ");
        tree.validate().unwrap();
        // Black leaf, red parent and black sibling without red children
        tree.delete(&13);
        assert_eq!(tree.get_level_order(), "B10 R7 B22 B2 B8 R26 R6 ");
        tree.validate().unwrap();
        // Root with two children, then a near red nephew
        tree.delete(&10);
        assert_eq!(tree.get_level_order(), "B8 R6 B22 B2 B7 R26 ");
        assert_eq!(tree.validate(), Ok(3));
    }

    #[test]
    fn deletion_red_sibling() {
        let mut tree = tree_of(&[1, 2, 3, 4, 5, 6]);
        assert_eq!(tree.get_level_order(), "B2 B1 R4 B3 B5 R6 ");
        tree.delete(&1);
        assert_eq!(tree.get_level_order(), "B4 B2 B5 R3 R6 ");
        assert_eq!(tree.validate(), Ok(3));
    }

    #[test]
    fn deletion_pushes_deficiency_up() {
        let mut tree = tree_of(&[4, 2, 6, 1, 3, 5, 7]);
        for element in [1, 3, 5, 7] {
            tree.delete(&element);
            tree.validate().unwrap();
        }
        assert_eq!(tree.get_level_order(), "B4 B2 B6 ");
        assert_eq!(tree.validate(), Ok(3));

        // Parent, sibling and nephews all black
        tree.delete(&2);
        assert_eq!(tree.get_level_order(), "B4 R6 ");
        assert_eq!(tree.validate(), Ok(2));

        tree.delete(&6);
        assert_eq!(tree.get_level_order(), "B4 ");
        tree.delete(&4);
        assert!(tree.is_empty());
        assert_eq!(tree.validate(), Ok(1));
    }

    #[test]
    fn deletion_near_red_nephew() {
        let mut tree = tree_of(&[10, 5, 20, 15]);
        assert_eq!(tree.get_level_order(), "B10 B5 B20 R15 ");
        tree.delete(&5);
        assert_eq!(tree.get_level_order(), "B15 B10 B20 ");
        assert_eq!(tree.validate(), Ok(3));
    }

    #[test]
    fn duplicates_are_kept() {
        let mut tree = tree_of(&[5, 5, 5]);
        assert_eq!(tree.len(), 3);
        assert_eq!(tree.get_level_order(), "B5 R5 R5 ");
        assert_eq!(tree.delete(&5), Some(5));
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.iter().collect::<Vec<_>>(), vec![&5, &5]);
        tree.validate().unwrap();
    }

    #[test]
    fn rotation_is_unsupported() {
        let mut tree = tree_of(&[1, 2, 3]);
        let root = tree.root().unwrap().id();
        assert!(matches!(tree.rotate_left(root), Err(Error::Unsupported(_))));
        assert!(matches!(tree.rotate_right(root), Err(Error::Unsupported(_))));
        assert_eq!(tree.get_level_order(), "B2 R1 R3 ");
    }

    #[test]
    fn color_introspection() {
        let mut tree: RedBlackTree<usize> = RedBlackTree::new();
        let ten = tree.insert(10);
        let twenty = tree.insert(20);
        assert_eq!(tree.color(ten), Ok(Color::Black));
        assert_eq!(tree.color(twenty), Ok(Color::Red));
        tree.insert(30);
        assert_eq!(tree.color(ten), Ok(Color::Red));
        assert_eq!(tree.color(twenty), Ok(Color::Black));
        assert_eq!(tree.node(twenty).unwrap().color(), Color::Black);

        tree.delete(&30);
        assert!(tree.color(twenty).is_ok());
        tree.clear();
        assert!(matches!(tree.color(twenty), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn draw_tree() {
        let tree = tree_of(&[2, 1, 3, 4]);
        let expected = "B{2}\n\
                        ├─›B{1}\n\
                        └─»B{3}\n   \
                        └─»R{4}\n";
        assert_eq!(tree.to_string(), expected);
    }

    #[test]
    fn equality_includes_colors() {
        let a = tree_of(&[2, 1, 3]);
        let b = tree_of(&[1, 2, 3]);
        assert!(a == b);

        // Same shape and elements, different colors
        let mut c = tree_of(&[2, 1, 3, 4]);
        c.delete(&4);
        assert_eq!(c.get_level_order(), "B2 B1 B3 ");
        assert!(a != c);
        assert!(a.as_binary_tree().search(&3).is_some());
    }
}
