use termtree::Tree;

use crate::domain::{NodeId, TreeNode};

/// Conversion of a snapshot into a printable ASCII tree.
pub trait TreeRender {
    fn to_tree_string(&self, selected: NodeId) -> Tree<String>;
}

impl TreeRender for TreeNode {
    fn to_tree_string(&self, selected: NodeId) -> Tree<String> {
        let leaves: Vec<_> = self
            .children
            .iter()
            .map(|c| c.to_tree_string(selected))
            .collect();

        Tree::new(label(self, selected)).with_leaves(leaves)
    }
}

fn label(node: &TreeNode, selected: NodeId) -> String {
    let mut label = match node.value {
        Some(value) => format!("{} = {}", node.id, value),
        None => node.id.to_string(),
    };
    if node.id == selected {
        label.push_str(" *");
    }
    label
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_snapshot_when_rendering_then_marks_selection_and_values() {
        let root = TreeNode::internal(0, vec![TreeNode::leaf(1, 2.5), TreeNode::leaf(2, 0.0)]);

        let text = root.to_tree_string(NodeId(1)).to_string();

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "#0");
        assert!(lines[1].ends_with("#1 = 2.5 *"));
        assert!(lines[2].ends_with("#2 = 0"));
    }
}
