use core::iter::FusedIterator;

use alloc::vec::Vec;

use crate::{NodeIndex, RedBlackTree};

/// Ascending iterator over the keys of a [`RedBlackTree`], see
/// [`RedBlackTree::iter`].
pub struct Iter<'a, K> {
    pub(crate) tree: &'a RedBlackTree<K>,
    pub(crate) curr: NodeIndex,
    pub(crate) stack: Vec<NodeIndex>,
    pub(crate) remaining: usize,
}

impl<'a, K> Iter<'a, K> {
    pub(crate) fn new(tree: &'a RedBlackTree<K>, root: NodeIndex) -> Self {
        Self {
            tree,
            curr: root,
            stack: Vec::new(),
            remaining: tree.len(),
        }
    }
}

impl<'a, K> Iterator for Iter<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        while self.curr != RedBlackTree::<K>::BLACK_NIL {
            self.stack.push(self.curr);
            self.curr = self.tree.get_node_by_idx(self.curr).left_child();
        }

        if let Some(node) = self.stack.pop() {
            self.curr = self.tree.get_node_by_idx(node).right_child();
            self.remaining -= 1;

            return Some(self.tree.key(node));
        }

        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K> ExactSizeIterator for Iter<'_, K> {}

impl<K> FusedIterator for Iter<'_, K> {}

impl<K> Clone for Iter<'_, K> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree,
            curr: self.curr,
            stack: self.stack.clone(),
            remaining: self.remaining,
        }
    }
}
