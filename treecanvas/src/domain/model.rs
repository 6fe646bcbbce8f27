//! The tree model: node storage, structural edits and selection.

use std::cmp::Ordering;
use std::sync::Arc;

use generational_arena::Index;
use tracing::{debug, instrument};

use crate::domain::arena::{NodeRef, TreeArena};
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::ids::{IdAllocator, NodeId};
use crate::domain::metrics::Metrics;
use crate::domain::seed;
use crate::domain::selection::Selection;
use crate::domain::snapshot::{Snapshot, TreeNode};

/// Bounds the model enforces on every edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeLimits {
    /// Ids are drawn from `0..id_limit`
    pub id_limit: u32,
    /// Upper bound for a single node's child count, None for unbounded
    pub max_fan_out: Option<usize>,
}

impl Default for TreeLimits {
    fn default() -> Self {
        Self {
            id_limit: 1000,
            max_fan_out: None,
        }
    }
}

/// Owns the tree and applies edits as atomic commits.
///
/// After every successful operation the following hold:
/// ids are pairwise distinct, leaves carry a value, internal nodes carry
/// none, and the selection names a live node. Failed operations leave the
/// model untouched.
#[derive(Debug, Clone)]
pub struct TreeModel {
    tree: TreeArena,
    ids: IdAllocator,
    selection: Selection,
    limits: TreeLimits,
    snapshot: Arc<TreeNode>,
    metrics: Metrics,
}

impl TreeModel {
    /// Model over the default 14-node seed tree.
    pub fn new(limits: TreeLimits) -> DomainResult<Self> {
        Self::from_seed(&seed::default_seed(), limits)
    }

    /// Model over a single root leaf.
    pub fn single(limits: TreeLimits) -> DomainResult<Self> {
        Self::from_seed(&seed::single_node(), limits)
    }

    /// Builds a model from an arbitrary seed tree. The root is selected.
    #[instrument(level = "debug", skip(seed))]
    pub fn from_seed(seed: &TreeNode, limits: TreeLimits) -> DomainResult<Self> {
        let mut ids = IdAllocator::new(limits.id_limit);
        let mut tree = TreeArena::new(seed.id, seed.value);
        Self::check_seed_node(seed, limits)?;
        ids.reserve(seed.id).map_err(invalid_seed)?;

        let mut stack: Vec<(&TreeNode, Index)> = vec![(seed, tree.root())];
        while let Some((node, idx)) = stack.pop() {
            for child in &node.children {
                Self::check_seed_node(child, limits)?;
                ids.reserve(child.id).map_err(invalid_seed)?;
                let child_idx = tree.insert_child(idx, child.id, child.value);
                stack.push((child, child_idx));
            }
        }

        let root_id = seed.id;
        let metrics = Metrics::of(tree.root_ref());
        let snapshot = Arc::new(tree.to_snapshot());
        debug!(nodes = tree.len(), height = metrics.height, width = metrics.width, "model seeded");
        Ok(Self {
            tree,
            ids,
            selection: Selection::new(root_id),
            limits,
            snapshot,
            metrics,
        })
    }

    fn check_seed_node(node: &TreeNode, limits: TreeLimits) -> DomainResult<()> {
        match (node.is_leaf(), node.value) {
            (true, None) => Err(DomainError::InvalidSeed(format!(
                "leaf {} has no value",
                node.id
            ))),
            (false, Some(_)) => Err(DomainError::InvalidSeed(format!(
                "internal node {} carries a value",
                node.id
            ))),
            (true, Some(value)) if !value.is_finite() => Err(DomainError::InvalidSeed(format!(
                "leaf {} has non-finite value {}",
                node.id, value
            ))),
            _ => match limits.max_fan_out {
                Some(max) if node.children.len() > max => Err(DomainError::InvalidSeed(format!(
                    "node {} has {} children, limit is {}",
                    node.id,
                    node.children.len(),
                    max
                ))),
                _ => Ok(()),
            },
        }
    }

    pub fn snapshot(&self) -> Arc<TreeNode> {
        Arc::clone(&self.snapshot)
    }

    pub fn metrics(&self) -> Metrics {
        self.metrics
    }

    pub fn selection(&self) -> NodeId {
        self.selection.get()
    }

    pub fn limits(&self) -> TreeLimits {
        self.limits
    }

    pub fn ids(&self) -> &IdAllocator {
        &self.ids
    }

    pub fn node_count(&self) -> usize {
        self.tree.len()
    }

    /// Snapshot, metrics and selection of the last commit.
    pub fn current(&self) -> Snapshot {
        Snapshot {
            root: self.snapshot(),
            metrics: self.metrics,
            selection: self.selection.get(),
        }
    }

    #[instrument(level = "trace", skip(self))]
    pub fn locate(&self, id: NodeId) -> DomainResult<NodeRef<'_>> {
        self.tree
            .lookup(id)
            .and_then(|idx| self.tree.node_ref(idx))
            .ok_or(DomainError::NodeNotFound(id))
    }

    pub fn selected_node(&self) -> NodeRef<'_> {
        self.locate(self.selection.get())
            .unwrap_or_else(|_| self.tree.root_ref())
    }

    /// Depth of a node counting the root as 1.
    pub fn depth_of(&self, id: NodeId) -> DomainResult<usize> {
        let node = self.locate(id)?;
        Ok(self.tree.depth(node.index()))
    }

    #[instrument(level = "debug", skip(self))]
    pub fn select(&mut self, id: NodeId) -> DomainResult<NodeId> {
        self.locate(id)?;
        self.selection.set(id);
        Ok(id)
    }

    /// Grows or shrinks the child list of `id` to `target` entries.
    ///
    /// Shrinking pops children from the end and drops their subtrees,
    /// releasing every removed id. Growing appends leaves with value 0.
    /// The edited node ends up with value 0 when it has no children and
    /// with no value otherwise.
    #[instrument(level = "debug", skip(self))]
    pub fn set_child_count(&mut self, id: NodeId, target: i64) -> DomainResult<Snapshot> {
        let node = self.locate(id)?;
        let (idx, current) = (node.index(), node.child_count());

        let target = usize::try_from(target).map_err(|_| {
            DomainError::InvalidArgument(format!(
                "child count must be non-negative, got {target}"
            ))
        })?;
        if let Some(max) = self.limits.max_fan_out {
            if target > max {
                return Err(DomainError::InvalidArgument(format!(
                    "child count {target} exceeds the limit of {max}"
                )));
            }
        }

        match target.cmp(&current) {
            Ordering::Equal => return Ok(self.current()),
            Ordering::Less => {
                let removed = self.tree.truncate_children(idx, target);
                for removed_id in &removed {
                    self.ids.release(*removed_id);
                }
                debug!(node = %id, removed = removed.len(), "pruned children");
                self.selection.revalidate(&self.tree, id);
            }
            Ordering::Greater => {
                let fresh = self.ids.allocate_many(target - current)?;
                for child_id in fresh {
                    self.tree.insert_child(idx, child_id, Some(0.0));
                }
                debug!(node = %id, added = target - current, "appended leaves");
            }
        }

        if let Some(node) = self.tree.get_mut(idx) {
            node.value = if target == 0 { Some(0.0) } else { None };
        }

        self.commit();
        Ok(self.current())
    }

    /// Assigns a leaf's value. Internal nodes are left unchanged.
    #[instrument(level = "debug", skip(self))]
    pub fn set_value(&mut self, id: NodeId, value: f64) -> DomainResult<Snapshot> {
        let node = self.locate(id)?;
        let (idx, is_leaf) = (node.index(), node.is_leaf());

        if !is_leaf {
            debug!(node = %id, "ignoring value for internal node");
            return Ok(self.current());
        }
        if !value.is_finite() {
            return Err(DomainError::InvalidArgument(format!(
                "value must be a finite number, got {value}"
            )));
        }

        if let Some(node) = self.tree.get_mut(idx) {
            node.value = Some(value);
        }
        self.commit();
        Ok(self.current())
    }

    fn commit(&mut self) {
        self.snapshot = Arc::new(self.tree.to_snapshot());
        self.metrics = Metrics::of(self.tree.root_ref());
        debug!(
            nodes = self.metrics.node_count,
            height = self.metrics.height,
            width = self.metrics.width,
            selection = %self.selection.get(),
            "committed"
        );
    }
}

fn invalid_seed(err: DomainError) -> DomainError {
    DomainError::InvalidSeed(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> TreeModel {
        TreeModel::new(TreeLimits::default()).unwrap()
    }

    #[test]
    fn given_default_seed_when_created_then_root_selected_and_metrics_computed() {
        let model = model();
        assert_eq!(model.selection(), NodeId(0));
        assert_eq!(model.metrics().height, 4);
        assert_eq!(model.metrics().width, 6);
        assert_eq!(model.ids().in_use(), 14);
    }

    #[test]
    fn given_unchanged_count_when_setting_children_then_same_snapshot_returned() {
        let mut model = model();
        let before = model.snapshot();
        let after = model.set_child_count(NodeId(1), 3).unwrap();
        assert!(Arc::ptr_eq(&before, &after.root));
    }

    #[test]
    fn given_leaf_value_when_setting_then_only_that_leaf_changes() {
        let mut model = model();
        let snap = model.set_value(NodeId(5), 42.5).unwrap();
        assert_eq!(snap.root.find(NodeId(5)).unwrap().value, Some(42.5));
        assert_eq!(snap.root.find(NodeId(3)).unwrap().value, Some(2.0));
    }

    #[test]
    fn given_non_finite_value_when_setting_then_invalid_argument() {
        let mut model = model();
        assert!(matches!(
            model.set_value(NodeId(5), f64::NAN),
            Err(DomainError::InvalidArgument(_))
        ));
    }

    #[test]
    fn given_nested_node_when_asking_depth_then_counts_from_root() {
        let model = model();
        assert_eq!(model.depth_of(NodeId(0)).unwrap(), 1);
        assert_eq!(model.depth_of(NodeId(11)).unwrap(), 4);
        assert_eq!(
            model.depth_of(NodeId(99)),
            Err(DomainError::NodeNotFound(NodeId(99)))
        );
    }

    #[test]
    fn given_duplicate_ids_when_seeding_then_invalid_seed() {
        let seed = TreeNode::internal(0, vec![TreeNode::leaf(1, 0.0), TreeNode::leaf(1, 0.0)]);
        assert!(matches!(
            TreeModel::from_seed(&seed, TreeLimits::default()),
            Err(DomainError::InvalidSeed(_))
        ));
    }

    #[test]
    fn given_valued_internal_node_when_seeding_then_invalid_seed() {
        let mut seed = TreeNode::internal(0, vec![TreeNode::leaf(1, 0.0)]);
        seed.value = Some(3.0);
        assert!(matches!(
            TreeModel::from_seed(&seed, TreeLimits::default()),
            Err(DomainError::InvalidSeed(_))
        ));
    }
}
