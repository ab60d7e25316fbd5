use core::fmt::{self, Display, Formatter};

use alloc::string::String;

use crate::{NodeIndex, RedBlackTree};

/// Indented dump of the tree shape, one node per line, root first.
///
/// ```
/// use redoak::RedBlackTree;
///
/// let tree: RedBlackTree<u32> = [10, 20, 30].into_iter().collect();
/// let dump = tree.to_string();
/// assert_eq!(dump, "R----20(BLACK)\n     L----10(RED)\n     R----30(RED)\n");
/// ```
impl<K: Display> Display for RedBlackTree<K> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut indent = String::new();
        self.fmt_subtree(f, self.root, &mut indent, true)
    }
}

impl<K: Display> RedBlackTree<K> {
    fn fmt_subtree(
        &self,
        f: &mut Formatter<'_>,
        node: NodeIndex,
        indent: &mut String,
        last: bool,
    ) -> fmt::Result {
        if node == Self::BLACK_NIL {
            return Ok(());
        }

        let (branch, pad) = if last {
            ("R----", "     ")
        } else {
            ("L----", "|    ")
        };
        let links = self.get_node_by_idx(node);
        writeln!(f, "{indent}{branch}{}({})", self.key(node), links.color)?;

        let restore = indent.len();
        indent.push_str(pad);
        self.fmt_subtree(f, links.left_child(), indent, false)?;
        self.fmt_subtree(f, links.right_child(), indent, true)?;
        indent.truncate(restore);

        Ok(())
    }
}
