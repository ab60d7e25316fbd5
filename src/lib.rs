//! An ordered binary search tree kept balanced with red-black colouring.
//!
//! Nodes live in a single arena; slot 0 of that arena is a shared black
//! sentinel standing in for every missing child and for the root of an empty
//! tree. Equal keys are kept, each new duplicate lands in the right subtree
//! of the ones already present.

extern crate alloc;

mod display;
mod iter;

use core::borrow::Borrow;
use core::cmp::Ordering;
use core::fmt;

use alloc::vec::Vec;

pub use crate::iter::Iter;

/*
keys are stored apart from the links so that the sentinel slot never needs a
key value. node `i` (i > 0) owns `keys[i - 1]`.
*/

/// Colour tag carried by every node.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Color {
    #[default]
    Red,
    Black,
}

impl Color {
    fn name(self) -> &'static str {
        match self {
            Color::Red => "RED",
            Color::Black => "BLACK",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct NodeIndex(pub(crate) usize);

#[derive(Debug, Clone, Copy)]
pub(crate) struct RedoakLinks {
    color: Color,
    parent: NodeIndex,
    left: NodeIndex,
    right: NodeIndex,
}

impl RedoakLinks {
    fn new_isolated() -> Self {
        Self {
            color: Color::default(),
            parent: RedBlackTree::<()>::BLACK_NIL,
            left: RedBlackTree::<()>::BLACK_NIL,
            right: RedBlackTree::<()>::BLACK_NIL,
        }
    }

    fn sentinel() -> Self {
        Self {
            color: Color::Black,
            ..Self::new_isolated()
        }
    }

    pub(crate) fn left_child(&self) -> NodeIndex {
        self.left
    }

    pub(crate) fn right_child(&self) -> NodeIndex {
        self.right
    }
}

/// A red-black tree over keys of type `K`.
///
/// Only insertion mutates the tree. Once inserted a key stays in the tree
/// until the tree itself is dropped.
#[derive(Clone)]
pub struct RedBlackTree<K> {
    links: Vec<RedoakLinks>,
    keys: Vec<K>,
    root: NodeIndex,
}

impl<K> RedBlackTree<K> {
    pub(crate) const BLACK_NIL: NodeIndex = NodeIndex(0);

    /// Create an empty tree, its root is the sentinel.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create an empty tree with room for `capacity` keys before the arena
    /// has to grow.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let mut links = Vec::with_capacity(capacity + 1);
        links.push(RedoakLinks::sentinel());

        Self {
            links,
            keys: Vec::with_capacity(capacity),
            root: Self::BLACK_NIL,
        }
    }

    /// Reserve arena space for at least `additional` more keys.
    pub fn reserve(&mut self, additional: usize) {
        self.links.reserve(additional);
        self.keys.reserve(additional);
    }

    /// Number of keys in the tree, duplicates included.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// The root node, or `None` for an empty tree.
    #[must_use]
    pub fn root(&self) -> Option<NodeRef<'_, K>> {
        self.node_ref(self.root)
    }

    /// Length, counted in edges, of the longest path from the root down to
    /// a leaf. A single node has height 0 and an empty tree has height -1.
    #[must_use]
    pub fn height(&self) -> isize {
        self.subtree_height(self.root)
    }

    /// Number of black nodes from the root down to the sentinel, sentinel
    /// excluded. The walk always follows the left spine.
    #[must_use]
    pub fn black_height(&self) -> usize {
        let mut blacks = 0;
        let mut current_node = self.root;

        while current_node != Self::BLACK_NIL {
            if self.color(current_node) == Color::Black {
                blacks += 1;
            }
            current_node = self.get_node_by_idx(current_node).left_child();
        }

        blacks
    }

    /// Iterate over the keys in ascending order.
    pub fn iter(&self) -> Iter<'_, K> {
        Iter::new(self, self.root)
    }

    /// Collect the keys in ascending order. Duplicates come out adjacent, in
    /// the order they were inserted.
    #[must_use]
    pub fn inorder(&self) -> Vec<&K> {
        let mut acc = Vec::with_capacity(self.len());
        self.inorder_into(self.root, &mut acc);
        acc
    }

    fn inorder_into<'a>(&'a self, node: NodeIndex, acc: &mut Vec<&'a K>) {
        if node == Self::BLACK_NIL {
            return;
        }
        let links = self.get_node_by_idx(node);
        self.inorder_into(links.left_child(), acc);
        acc.push(self.key(node));
        self.inorder_into(links.right_child(), acc);
    }

    fn subtree_height(&self, node: NodeIndex) -> isize {
        if node == Self::BLACK_NIL {
            return -1;
        }
        let links = self.get_node_by_idx(node);
        let left = self.subtree_height(links.left_child());
        let right = self.subtree_height(links.right_child());
        1 + left.max(right)
    }

    pub(crate) fn get_node_by_idx(&self, node_idx: NodeIndex) -> &RedoakLinks {
        &self.links[node_idx.0]
    }

    fn get_node_by_idx_mut(&mut self, node_idx: NodeIndex) -> &mut RedoakLinks {
        debug_assert_ne!(node_idx, Self::BLACK_NIL, "sentinel is read-only");
        &mut self.links[node_idx.0]
    }

    pub(crate) fn key(&self, node_idx: NodeIndex) -> &K {
        &self.keys[node_idx.0 - 1]
    }

    fn color(&self, node_idx: NodeIndex) -> Color {
        self.get_node_by_idx(node_idx).color
    }

    fn set_color(&mut self, node_idx: NodeIndex, color: Color) {
        self.get_node_by_idx_mut(node_idx).color = color;
    }

    fn parent(&self, node_idx: NodeIndex) -> NodeIndex {
        self.get_node_by_idx(node_idx).parent
    }

    fn is_left_child(&self, node_idx: NodeIndex) -> bool {
        let parent = self.parent(node_idx);
        parent != Self::BLACK_NIL && self.get_node_by_idx(parent).left == node_idx
    }

    fn node_ref(&self, idx: NodeIndex) -> Option<NodeRef<'_, K>> {
        if idx == Self::BLACK_NIL {
            None
        } else {
            Some(NodeRef { tree: self, idx })
        }
    }

    // `center` is replaced by its right child, which must be a real node.
    //
    //        center                 sibling
    //        /    \                 /     \
    //       a    sibling   =>    center    d
    //            /    \          /    \
    //           c      d        a      c
    //
    fn rotate_left(&mut self, center: NodeIndex) {
        let grandparent_idx = self.parent(center);
        let sibling_idx = self.get_node_by_idx(center).right;
        debug_assert_ne!(sibling_idx, Self::BLACK_NIL);
        log::trace!("rotate left around node {}", center.0);

        let c_idx = self.get_node_by_idx(sibling_idx).left;
        self.get_node_by_idx_mut(center).right = c_idx;
        if c_idx != Self::BLACK_NIL {
            self.get_node_by_idx_mut(c_idx).parent = center;
        }

        self.get_node_by_idx_mut(sibling_idx).left = center;
        self.get_node_by_idx_mut(sibling_idx).parent = grandparent_idx;
        self.replace_child(grandparent_idx, center, sibling_idx);
        self.get_node_by_idx_mut(center).parent = sibling_idx;
    }

    // mirror image of `rotate_left`.
    fn rotate_right(&mut self, center: NodeIndex) {
        let grandparent_idx = self.parent(center);
        let sibling_idx = self.get_node_by_idx(center).left;
        debug_assert_ne!(sibling_idx, Self::BLACK_NIL);
        log::trace!("rotate right around node {}", center.0);

        let c_idx = self.get_node_by_idx(sibling_idx).right;
        self.get_node_by_idx_mut(center).left = c_idx;
        if c_idx != Self::BLACK_NIL {
            self.get_node_by_idx_mut(c_idx).parent = center;
        }

        self.get_node_by_idx_mut(sibling_idx).right = center;
        self.get_node_by_idx_mut(sibling_idx).parent = grandparent_idx;
        self.replace_child(grandparent_idx, center, sibling_idx);
        self.get_node_by_idx_mut(center).parent = sibling_idx;
    }

    fn replace_child(&mut self, parent: NodeIndex, old: NodeIndex, new: NodeIndex) {
        if parent == Self::BLACK_NIL {
            self.root = new;
            return;
        }

        let parent_links = self.get_node_by_idx_mut(parent);
        if parent_links.left == old {
            parent_links.left = new;
        } else {
            parent_links.right = new;
        }
    }

    fn fix_red_violation(&mut self, start_node_idx: NodeIndex) {
        let mut curr_node = start_node_idx;

        loop {
            let parent_idx = self.parent(curr_node);
            if parent_idx == Self::BLACK_NIL {
                log::trace!("fixup: node {} is the root, paint it black", curr_node.0);
                self.set_color(curr_node, Color::Black);
                return;
            }

            if self.color(parent_idx) == Color::Black {
                return;
            }

            let grandparent_idx = self.parent(parent_idx);
            if grandparent_idx == Self::BLACK_NIL {
                // a red parent is never the root, nothing left to repair.
                return;
            }

            let parent_is_left_child = self.is_left_child(parent_idx);
            let grandparent = self.get_node_by_idx(grandparent_idx);
            let uncle_idx = if parent_is_left_child {
                grandparent.right
            } else {
                grandparent.left
            };

            if self.color(uncle_idx) == Color::Red {
                log::trace!("fixup: red uncle, recolor under node {}", grandparent_idx.0);
                self.set_color(parent_idx, Color::Black);
                self.set_color(uncle_idx, Color::Black);
                self.set_color(grandparent_idx, Color::Red);

                curr_node = grandparent_idx;
                continue;
            }

            let node_is_left_child = self.is_left_child(curr_node);
            match (parent_is_left_child, node_is_left_child) {
                (false, false) => {
                    log::trace!("fixup: right-right at node {}", curr_node.0);
                    self.rotate_left(grandparent_idx);
                    self.set_color(parent_idx, Color::Black);
                }
                (true, true) => {
                    log::trace!("fixup: left-left at node {}", curr_node.0);
                    self.rotate_right(grandparent_idx);
                    self.set_color(parent_idx, Color::Black);
                }
                (false, true) => {
                    log::trace!("fixup: right-left at node {}", curr_node.0);
                    self.rotate_right(parent_idx);
                    self.rotate_left(grandparent_idx);
                    self.set_color(curr_node, Color::Black);
                }
                (true, false) => {
                    log::trace!("fixup: left-right at node {}", curr_node.0);
                    self.rotate_left(parent_idx);
                    self.rotate_right(grandparent_idx);
                    self.set_color(curr_node, Color::Black);
                }
            }
            self.set_color(grandparent_idx, Color::Red);
            return;
        }
    }
}

impl<K: Ord> RedBlackTree<K> {
    /// Insert `key`. Never fails: a key equal to one already present is
    /// stored as well, to the right of the existing ones.
    pub fn insert(&mut self, key: K) {
        let mut current_node = self.root;
        let mut parent_node = Self::BLACK_NIL;
        let mut goes_left = false;

        while current_node != Self::BLACK_NIL {
            parent_node = current_node;
            let curr_node_storage = self.get_node_by_idx(current_node);

            goes_left = key < *self.key(current_node);
            current_node = if goes_left {
                curr_node_storage.left_child()
            } else {
                curr_node_storage.right_child()
            };
        }

        let new_node_pos = NodeIndex(self.links.len());
        let mut new_links = RedoakLinks::new_isolated();
        new_links.parent = parent_node;
        self.links.push(new_links);
        self.keys.push(key);

        if parent_node == Self::BLACK_NIL {
            self.root = new_node_pos;
        } else if goes_left {
            self.get_node_by_idx_mut(parent_node).left = new_node_pos;
        } else {
            self.get_node_by_idx_mut(parent_node).right = new_node_pos;
        }
        log::debug!(
            "insert node {} under parent {}, tree size {}",
            new_node_pos.0,
            parent_node.0,
            self.len()
        );

        self.fix_red_violation(new_node_pos);
    }

    /// Find a node holding a key equal to `key`.
    pub fn search<Q>(&self, key: &Q) -> Option<NodeRef<'_, K>>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut current_node = self.root;

        while current_node != Self::BLACK_NIL {
            let curr_node_storage = self.get_node_by_idx(current_node);

            current_node = match key.cmp(self.key(current_node).borrow()) {
                Ordering::Less => curr_node_storage.left_child(),
                Ordering::Equal => break,
                Ordering::Greater => curr_node_storage.right_child(),
            };
        }

        self.node_ref(current_node)
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.search(key).is_some()
    }
}

impl<K> Default for RedBlackTree<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug> fmt::Debug for RedBlackTree<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<K: Ord> FromIterator<K> for RedBlackTree<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}

impl<K: Ord> Extend<K> for RedBlackTree<K> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        self.reserve(iter.size_hint().0);
        for key in iter {
            self.insert(key);
        }
    }
}

impl<'a, K> IntoIterator for &'a RedBlackTree<K> {
    type Item = &'a K;
    type IntoIter = Iter<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Borrowed view of one real node of a [`RedBlackTree`].
pub struct NodeRef<'a, K> {
    tree: &'a RedBlackTree<K>,
    idx: NodeIndex,
}

impl<K> Clone for NodeRef<'_, K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K> Copy for NodeRef<'_, K> {}

impl<K> PartialEq for NodeRef<'_, K> {
    fn eq(&self, other: &Self) -> bool {
        core::ptr::eq(self.tree, other.tree) && self.idx == other.idx
    }
}

impl<K> Eq for NodeRef<'_, K> {}

impl<'a, K> NodeRef<'a, K> {
    pub fn key(&self) -> &'a K {
        self.tree.key(self.idx)
    }

    pub fn color(&self) -> Color {
        self.tree.color(self.idx)
    }

    pub fn is_red(&self) -> bool {
        self.color() == Color::Red
    }

    pub fn is_black(&self) -> bool {
        self.color() == Color::Black
    }

    pub fn left(&self) -> Option<NodeRef<'a, K>> {
        self.tree.node_ref(self.tree.get_node_by_idx(self.idx).left_child())
    }

    pub fn right(&self) -> Option<NodeRef<'a, K>> {
        self.tree.node_ref(self.tree.get_node_by_idx(self.idx).right_child())
    }

    /// `None` for the root.
    pub fn parent(&self) -> Option<NodeRef<'a, K>> {
        self.tree.node_ref(self.tree.parent(self.idx))
    }
}

impl<K: fmt::Debug> fmt::Debug for NodeRef<'_, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("key", self.key())
            .field("color", &self.color())
            .finish()
    }
}


#[cfg(test)]
mod tests {
    use crate::{Color, RedBlackTree};

    fn shape(tree: &RedBlackTree<i32>) -> (i32, Option<i32>, Option<i32>) {
        let root = tree.root().unwrap();
        (
            *root.key(),
            root.left().map(|n| *n.key()),
            root.right().map(|n| *n.key()),
        )
    }

    #[test]
    pub fn create_tree() {
        let tree = RedBlackTree::<usize>::new();

        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
        assert!(tree.root().is_none());
        assert_eq!(tree.height(), -1);
        assert_eq!(tree.black_height(), 0);
        assert!(tree.inorder().is_empty());
        assert!(tree.search(&1).is_none());
    }

    #[test]
    pub fn single_insertion() {
        let mut tree = RedBlackTree::new();
        tree.insert(5);

        let root = tree.root().unwrap();
        assert_eq!(*root.key(), 5);
        assert_eq!(root.color(), Color::Black);
        assert!(root.parent().is_none());
        assert!(root.left().is_none() && root.right().is_none());
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.height(), 0);
        assert_eq!(tree.black_height(), 1);
    }

    #[test]
    pub fn right_right_rotation() {
        let tree: RedBlackTree<i32> = [10, 20, 30].into_iter().collect();

        assert_eq!(shape(&tree), (20, Some(10), Some(30)));
        let root = tree.root().unwrap();
        assert!(root.is_black());
        assert!(root.left().unwrap().is_red());
        assert!(root.right().unwrap().is_red());
        assert_eq!(tree.height(), 1);
    }

    #[test]
    pub fn left_left_rotation() {
        let tree: RedBlackTree<i32> = [30, 20, 10].into_iter().collect();

        assert_eq!(shape(&tree), (20, Some(10), Some(30)));
        assert!(tree.root().unwrap().is_black());
    }

    #[test]
    pub fn bent_rotations_converge() {
        let straight: RedBlackTree<i32> = [10, 20, 30].into_iter().collect();
        let left_right: RedBlackTree<i32> = [30, 10, 20].into_iter().collect();
        let right_left: RedBlackTree<i32> = [10, 30, 20].into_iter().collect();

        for tree in [&left_right, &right_left] {
            assert_eq!(shape(tree), shape(&straight));
            let root = tree.root().unwrap();
            assert!(root.is_black());
            assert!(root.left().unwrap().is_red());
            assert!(root.right().unwrap().is_red());
            assert_eq!(root.left().unwrap().parent(), Some(root));
            assert_eq!(root.right().unwrap().parent(), Some(root));
        }
    }

    #[test]
    pub fn red_uncle_recolors() {
        let mut tree: RedBlackTree<i32> = [20, 10, 30].into_iter().collect();
        tree.insert(5);

        let root = tree.root().unwrap();
        assert_eq!(*root.key(), 20);
        assert!(root.is_black());
        assert!(root.left().unwrap().is_black());
        assert!(root.right().unwrap().is_black());
        let new_leaf = root.left().unwrap().left().unwrap();
        assert_eq!(*new_leaf.key(), 5);
        assert!(new_leaf.is_red());
        assert_eq!(tree.black_height(), 2);
    }

    #[test]
    pub fn ascending_one_to_ten() {
        let tree: RedBlackTree<i32> = (1..=10).collect();

        let keys: Vec<i32> = tree.inorder().into_iter().copied().collect();
        assert_eq!(keys, (1..=10).collect::<Vec<_>>());
        assert_eq!(tree.len(), 10);
        assert!(tree.root().unwrap().is_black());
        assert_eq!(*tree.root().unwrap().key(), 4);
        assert_eq!(tree.height(), 4);
        assert_eq!(tree.black_height(), 3);
    }

    #[test]
    pub fn duplicate_keys_are_kept() {
        let mut tree = RedBlackTree::new();
        tree.insert(5);
        tree.insert(5);

        assert_eq!(tree.len(), 2);
        assert_eq!(tree.inorder(), vec![&5, &5]);
        let root = tree.root().unwrap();
        assert!(root.left().is_none());
        assert_eq!(root.right().map(|n| *n.key()), Some(5));
    }

    #[test]
    pub fn search_has_no_side_effects() {
        let tree: RedBlackTree<i32> = [8, 3, 11, 1, 6].into_iter().collect();

        let first = tree.search(&6).unwrap();
        let second = tree.search(&6).unwrap();
        assert_eq!(*first.key(), 6);
        assert_eq!(first, second);
        assert!(tree.search(&7).is_none());
        assert!(tree.contains(&11));
        assert!(!tree.contains(&12));
        assert_eq!(tree.len(), 5);
    }

    #[test]
    pub fn search_borrowed_keys() {
        let mut tree = RedBlackTree::new();
        tree.insert(String::from("oak"));
        tree.insert(String::from("ash"));

        assert_eq!(tree.search("ash").map(|n| n.key().as_str()), Some("ash"));
        assert!(!tree.contains("elm"));
    }

    #[test]
    pub fn capacity_hint() {
        let mut tree = RedBlackTree::with_capacity(16);
        tree.reserve(16);
        tree.extend(0..32);

        assert_eq!(tree.len(), 32);
        assert_eq!(tree.iter().count(), 32);
    }

    #[test]
    pub fn debug_lists_keys_in_order() {
        let tree: RedBlackTree<i32> = [3, 1, 2].into_iter().collect();

        assert_eq!(format!("{tree:?}"), "{1, 2, 3}");
    }
}
