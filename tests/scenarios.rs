use red_black_tree::{Color, Error, OrderedTree, RedBlackTree};

fn height_bound(len: usize) -> f64 {
    2.0 * ((len + 1) as f64).log2()
}

#[test]
fn small_tree_is_balanced() {
    let tree: RedBlackTree<i32> = vec![5, 3, 8, 1, 4, 7, 9].into_iter().collect();
    assert_eq!(tree.root().unwrap().color(), Color::Black);
    assert_eq!(tree.iter().copied().collect::<Vec<_>>(), vec![1, 3, 4, 5, 7, 8, 9]);
    assert!(tree.height() as f64 <= height_bound(7));
    tree.validate().unwrap();
}

#[test]
fn ascending_insertion_rotates() {
    let tree: RedBlackTree<i32> = vec![10, 20, 30].into_iter().collect();
    let root = tree.root().unwrap();
    assert_eq!(*root.element(), 20);
    assert_eq!(root.color(), Color::Black);

    let left = root.left().unwrap();
    let right = root.right().unwrap();
    assert_eq!((*left.element(), left.color()), (10, Color::Red));
    assert_eq!((*right.element(), right.color()), (30, Color::Red));
}

#[test]
fn delete_lower_half() {
    let mut tree: RedBlackTree<i32> = (1..=100).collect();
    tree.validate().unwrap();
    for element in 1..=50 {
        assert_eq!(tree.delete(&element), Some(element));
        tree.validate().unwrap();
        assert!(tree.height() as f64 <= height_bound(tree.len()));
    }
    assert_eq!(tree.len(), 50);
    assert_eq!(tree.iter().copied().collect::<Vec<_>>(), (51..=100).collect::<Vec<_>>());
}

#[test]
fn delete_only_element() {
    let mut tree = RedBlackTree::new();
    tree.insert("only");
    assert_eq!(tree.delete(&"only"), Some("only"));
    assert!(tree.is_empty());
    assert_eq!(tree.len(), 0);
    assert_eq!(tree.height(), -1);
    assert!(matches!(tree.root(), Err(Error::NotFound(_))));
}

#[test]
fn duplicates_are_retained() {
    let mut tree: RedBlackTree<i32> = vec![5, 5, 5].into_iter().collect();
    assert_eq!(tree.len(), 3);
    tree.delete(&5);
    assert_eq!(tree.len(), 2);
    assert_eq!(tree.iter().filter(|&&e| e == 5).count(), 2);
    tree.validate().unwrap();
}

#[test]
fn deleting_absent_element_changes_nothing() {
    let mut tree: RedBlackTree<i32> = (0..20).map(|e| e * 2).collect();
    let before = tree.clone();
    assert_eq!(tree.delete(&7), None);
    assert!(tree == before);
    assert_eq!(tree.len(), 20);
}

#[test]
fn count_matches_reachable_nodes() {
    let mut tree: RedBlackTree<i32> = (0..64).rev().collect();
    for element in (0..64).step_by(3) {
        tree.delete(&element);
    }
    let mut visited = 0;
    tree.as_binary_tree().pre_order(|_| visited += 1);
    assert_eq!(visited, tree.len());
    assert_eq!(tree.iter().count(), tree.len());
    tree.validate().unwrap();
}

#[test]
fn search_and_contains() {
    let tree: RedBlackTree<i32> = (1..=15).collect();
    let node = tree.search(&11).unwrap();
    assert_eq!(*node.element(), 11);
    assert_eq!(tree.node(node.id()).unwrap().depth(), node.depth());
    assert!(tree.contains(&1));
    assert!(!tree.contains(&16));
    assert!(tree.search(&0).is_none());
}
