//! Seed trees the model can start from.

use crate::domain::snapshot::TreeNode;

/// The editor's starting tree: 14 nodes (ids 0..=13), height 4, width 6.
pub fn default_seed() -> TreeNode {
    TreeNode::internal(
        0,
        vec![
            TreeNode::internal(
                1,
                vec![
                    TreeNode::internal(2, vec![TreeNode::leaf(3, 2.0), TreeNode::leaf(4, 6.0)]),
                    TreeNode::leaf(5, 1.0),
                    TreeNode::internal(6, vec![TreeNode::leaf(7, 4.0), TreeNode::leaf(8, 3.0)]),
                ],
            ),
            TreeNode::internal(
                9,
                vec![
                    TreeNode::internal(10, vec![TreeNode::leaf(11, 5.0), TreeNode::leaf(12, 7.0)]),
                    TreeNode::leaf(13, 2.0),
                ],
            ),
        ],
    )
}

/// A lone root leaf with id 0 and value 0.
pub fn single_node() -> TreeNode {
    TreeNode::leaf(0, 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::metrics::Metrics;

    #[test]
    fn given_default_seed_when_measuring_then_matches_initial_canvas_shape() {
        let seed = default_seed();
        assert_eq!(
            Metrics::of(&seed),
            Metrics {
                height: 4,
                width: 6,
                node_count: 14
            }
        );
    }
}
