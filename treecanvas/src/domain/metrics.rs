//! Shape metrics: height and width derived purely from tree topology.
//!
//! The functions are generic over [`ShapeNode`] so they run both over an
//! immutable [`TreeNode`] snapshot and over live arena nodes.

use std::collections::VecDeque;

use crate::domain::snapshot::TreeNode;

/// A cheap, copyable handle to a node whose children can be enumerated.
pub trait ShapeNode: Copy {
    fn child_nodes(&self) -> impl Iterator<Item = Self>;
}

impl<'a> ShapeNode for &'a TreeNode {
    fn child_nodes(&self) -> impl Iterator<Item = Self> {
        let node: &'a TreeNode = *self;
        node.children.iter()
    }
}

/// Structural measurements of a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Metrics {
    /// Number of levels (a single node has height 1)
    pub height: usize,
    /// Largest node count on any level
    pub width: usize,
    pub node_count: usize,
}

impl Metrics {
    pub fn of<N: ShapeNode>(root: N) -> Self {
        let levels = level_sizes(root);
        Self {
            height: height(root),
            width: levels.iter().copied().max().unwrap_or(0),
            node_count: levels.iter().sum(),
        }
    }
}

/// Max depth, counting the root as 1.
pub fn height<N: ShapeNode>(root: N) -> usize {
    1 + root.child_nodes().map(height).max().unwrap_or(0)
}

/// Max number of nodes on a single level.
pub fn width<N: ShapeNode>(root: N) -> usize {
    level_sizes(root).into_iter().max().unwrap_or(0)
}

pub fn node_count<N: ShapeNode>(root: N) -> usize {
    level_sizes(root).into_iter().sum()
}

/// Node count per level, root level first (breadth-first scan).
pub fn level_sizes<N: ShapeNode>(root: N) -> Vec<usize> {
    let mut sizes: Vec<usize> = Vec::new();
    let mut queue = VecDeque::new();
    queue.push_back((root, 0usize));

    while let Some((node, level)) = queue.pop_front() {
        if level == sizes.len() {
            sizes.push(0);
        }
        sizes[level] += 1;
        queue.extend(node.child_nodes().map(|child| (child, level + 1)));
    }

    sizes
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn balanced() -> TreeNode {
        TreeNode::internal(
            0,
            vec![
                TreeNode::internal(1, vec![TreeNode::leaf(3, 0.0), TreeNode::leaf(4, 0.0)]),
                TreeNode::internal(2, vec![TreeNode::leaf(5, 0.0), TreeNode::leaf(6, 0.0)]),
            ],
        )
    }

    fn chain(len: u32) -> TreeNode {
        (1..len).rev().fold(TreeNode::leaf(len, 1.0), |child, id| {
            TreeNode::internal(id, vec![child])
        })
    }

    #[test]
    fn given_single_node_when_measuring_then_height_and_width_are_one() {
        let root = TreeNode::leaf(0, 0.0);
        assert_eq!(height(&root), 1);
        assert_eq!(width(&root), 1);
        assert_eq!(node_count(&root), 1);
    }

    #[test]
    fn given_two_by_two_tree_when_measuring_then_height_three_width_four() {
        let root = balanced();
        assert_eq!(
            Metrics::of(&root),
            Metrics {
                height: 3,
                width: 4,
                node_count: 7
            }
        );
        assert_eq!(level_sizes(&root), vec![1, 2, 4]);
    }

    #[rstest]
    #[case(1, 1)]
    #[case(5, 5)]
    #[case(40, 40)]
    fn given_chain_when_measuring_then_height_is_length_and_width_one(
        #[case] len: u32,
        #[case] expected_height: usize,
    ) {
        let root = chain(len);
        assert_eq!(height(&root), expected_height);
        assert_eq!(width(&root), 1);
    }

    #[test]
    fn given_widest_level_in_middle_when_measuring_then_width_counts_across_subtrees() {
        // Level 2 spans both subtrees: 3 + 2 nodes
        let root = TreeNode::internal(
            0,
            vec![
                TreeNode::internal(
                    1,
                    vec![
                        TreeNode::leaf(2, 0.0),
                        TreeNode::leaf(3, 0.0),
                        TreeNode::internal(4, vec![TreeNode::leaf(7, 0.0)]),
                    ],
                ),
                TreeNode::internal(5, vec![TreeNode::leaf(6, 0.0), TreeNode::leaf(8, 0.0)]),
            ],
        );
        assert_eq!(level_sizes(&root), vec![1, 2, 5, 1]);
        assert_eq!(width(&root), 5);
        assert_eq!(height(&root), 4);
    }
}
