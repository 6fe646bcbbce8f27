//! Immutable views of the tree handed out after every commit.

use std::sync::Arc;

use crate::domain::ids::NodeId;
use crate::domain::metrics::Metrics;

/// A node of an immutable tree snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode {
    pub id: NodeId,
    /// Present iff the node is a leaf
    pub value: Option<f64>,
    /// Ordered left to right
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn leaf(id: u32, value: f64) -> Self {
        Self {
            id: NodeId(id),
            value: Some(value),
            children: Vec::new(),
        }
    }

    pub fn internal(id: u32, children: Vec<TreeNode>) -> Self {
        Self {
            id: NodeId(id),
            value: None,
            children,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Pre-order, left-to-right traversal.
    pub fn iter(&self) -> SnapshotIter<'_> {
        SnapshotIter { stack: vec![self] }
    }

    pub fn find(&self, id: NodeId) -> Option<&TreeNode> {
        self.iter().find(|node| node.id == id)
    }
}

pub struct SnapshotIter<'a> {
    stack: Vec<&'a TreeNode>,
}

impl<'a> Iterator for SnapshotIter<'a> {
    type Item = &'a TreeNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        // Push children in reverse order for left-to-right traversal
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

/// Result of a committed operation: the tree, its shape and the selection.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub root: Arc<TreeNode>,
    pub metrics: Metrics,
    pub selection: NodeId,
}
