//! Text rendering of binary trees via `termtree`.

use termtree::Tree as TermTree;

use crate::domain::{NodeId, Side, Tree};

/// Conversion of a hierarchy into a printable `termtree`.
///
/// Each child line is prefixed with its slot, `L` or `R`, since an only child
/// may sit on either side.
pub trait TreeRender<T> {
    fn to_termtree<F>(&self, label: F) -> TermTree<String>
    where
        F: Fn(&T) -> String;
}

impl<T> TreeRender<T> for Tree<T> {
    fn to_termtree<F>(&self, label: F) -> TermTree<String>
    where
        F: Fn(&T) -> String,
    {
        let Some(root_idx) = self.root() else {
            return TermTree::new("(empty tree)".to_string());
        };

        fn build_tree<T, F: Fn(&T) -> String>(
            tree: &Tree<T>,
            node_idx: NodeId,
            label: &F,
            parent_tree: &mut TermTree<String>,
        ) {
            let Some(node) = tree.node(node_idx) else {
                return;
            };
            for (side, child_idx) in [(Side::Left, node.left), (Side::Right, node.right)] {
                let Some(child) = child_idx.and_then(|idx| tree.node(idx)) else {
                    continue;
                };
                let marker = match side {
                    Side::Left => "L",
                    Side::Right => "R",
                };
                let mut child_tree = TermTree::new(format!("{} {}", marker, label(&child.value)));
                if let Some(idx) = child_idx {
                    build_tree(tree, idx, label, &mut child_tree);
                }
                parent_tree.push(child_tree);
            }
        }

        let root_label = self
            .value(root_idx)
            .map(&label)
            .unwrap_or_default();
        let mut rendered = TermTree::new(root_label);
        build_tree(self, root_idx, &label, &mut rendered);
        rendered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_tree_renders_placeholder() {
        let tree: Tree<u8> = Tree::new();
        assert_eq!(tree.to_termtree(|v| v.to_string()).to_string(), "(empty tree)\n");
    }

    #[test]
    fn test_render_marks_sides() {
        let mut tree = Tree::new();
        let root = tree.branch("A").unwrap();
        tree.attach_at(root, Side::Right, "C").unwrap();

        let rendered = tree.to_termtree(|v| v.to_string()).to_string();
        assert!(rendered.starts_with("A\n"), "{}", rendered);
        assert!(rendered.contains("R C"), "{}", rendered);
        assert!(!rendered.contains("L "), "{}", rendered);
    }
}
