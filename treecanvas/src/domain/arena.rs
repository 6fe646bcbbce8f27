use std::collections::HashMap;

use generational_arena::{Arena, Index};
use tracing::instrument;

use crate::domain::ids::NodeId;
use crate::domain::metrics::ShapeNode;
use crate::domain::snapshot::TreeNode;

/// Tree node as stored in the arena.
#[derive(Debug, Clone)]
pub struct ArenaNode {
    pub id: NodeId,
    /// Present iff the node has no children
    pub value: Option<f64>,
    /// Index of parent node in the arena, None for the root
    pub parent: Option<Index>,
    /// Indices of child nodes in the arena, left to right
    pub children: Vec<Index>,
}

/// Arena-based tree with an id index.
///
/// Uses a generational arena so stale indices of removed nodes never alias
/// newly inserted ones, and a `NodeId -> Index` map for O(1) lookups.
/// The root always exists.
#[derive(Debug, Clone)]
pub struct TreeArena {
    arena: Arena<ArenaNode>,
    root: Index,
    by_id: HashMap<NodeId, Index>,
}

impl TreeArena {
    pub fn new(root_id: NodeId, value: Option<f64>) -> Self {
        let mut arena = Arena::new();
        let root = arena.insert(ArenaNode {
            id: root_id,
            value,
            parent: None,
            children: Vec::new(),
        });
        Self {
            arena,
            root,
            by_id: HashMap::from([(root_id, root)]),
        }
    }

    /// Appends a node to the end of `parent`'s child list.
    ///
    /// The caller guarantees `id` is not already present.
    #[instrument(level = "trace", skip(self))]
    pub fn insert_child(&mut self, parent: Index, id: NodeId, value: Option<f64>) -> Index {
        let node_idx = self.arena.insert(ArenaNode {
            id,
            value,
            parent: Some(parent),
            children: Vec::new(),
        });
        if let Some(parent) = self.arena.get_mut(parent) {
            parent.children.push(node_idx);
        }
        self.by_id.insert(id, node_idx);
        node_idx
    }

    pub fn root(&self) -> Index {
        self.root
    }

    pub fn get(&self, idx: Index) -> Option<&ArenaNode> {
        self.arena.get(idx)
    }

    pub fn get_mut(&mut self, idx: Index) -> Option<&mut ArenaNode> {
        self.arena.get_mut(idx)
    }

    #[instrument(level = "trace", skip(self))]
    pub fn lookup(&self, id: NodeId) -> Option<Index> {
        self.by_id.get(&id).copied()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.by_id.contains_key(&id)
    }

    pub fn node_ref(&self, index: Index) -> Option<NodeRef<'_>> {
        self.arena.get(index).map(|node| NodeRef {
            arena: self,
            index,
            node,
        })
    }

    pub fn root_ref(&self) -> NodeRef<'_> {
        NodeRef {
            arena: self,
            index: self.root,
            node: &self.arena[self.root],
        }
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Depth of a node counting the root as 1.
    #[instrument(level = "trace", skip(self))]
    pub fn depth(&self, idx: Index) -> usize {
        let mut depth = 0;
        let mut current = self.get(idx);
        while let Some(node) = current {
            depth += 1;
            current = node.parent.and_then(|parent| self.get(parent));
        }
        depth
    }

    pub fn iter_postorder(&self, start: Index) -> PostOrderIterator<'_> {
        PostOrderIterator::new(self, start)
    }

    /// Detaches every child of `parent` beyond the first `keep`.
    ///
    /// Children are popped from the end of the list; the whole subtree of
    /// each popped child leaves the arena. Returns the ids of all removed
    /// nodes, descendants before their ancestors.
    #[instrument(level = "debug", skip(self))]
    pub fn truncate_children(&mut self, parent: Index, keep: usize) -> Vec<NodeId> {
        let popped = match self.arena.get_mut(parent) {
            Some(node) if node.children.len() > keep => node.children.split_off(keep),
            _ => return Vec::new(),
        };

        let mut removed = Vec::new();
        for child in popped.into_iter().rev() {
            let subtree: Vec<(Index, NodeId)> = self
                .iter_postorder(child)
                .map(|(idx, node)| (idx, node.id))
                .collect();
            for (idx, id) in subtree {
                self.arena.remove(idx);
                self.by_id.remove(&id);
                removed.push(id);
            }
        }
        removed
    }

    /// Copies the arena into an immutable nested tree.
    #[instrument(level = "trace", skip(self))]
    pub fn to_snapshot(&self) -> TreeNode {
        fn build(node: NodeRef<'_>) -> TreeNode {
            TreeNode {
                id: node.id(),
                value: node.value(),
                children: node.child_nodes().map(build).collect(),
            }
        }
        build(self.root_ref())
    }
}

/// Read-only handle to a live node.
#[derive(Debug, Clone, Copy)]
pub struct NodeRef<'a> {
    arena: &'a TreeArena,
    index: Index,
    node: &'a ArenaNode,
}

impl<'a> NodeRef<'a> {
    pub fn id(&self) -> NodeId {
        self.node.id
    }

    pub fn value(&self) -> Option<f64> {
        self.node.value
    }

    pub fn index(&self) -> Index {
        self.index
    }

    pub fn child_count(&self) -> usize {
        self.node.children.len()
    }

    pub fn is_leaf(&self) -> bool {
        self.node.children.is_empty()
    }

    pub fn parent(&self) -> Option<NodeRef<'a>> {
        self.node.parent.and_then(|idx| self.arena.node_ref(idx))
    }

    pub fn child_ids(&self) -> Vec<NodeId> {
        self.child_nodes().map(|child| child.id()).collect()
    }
}

impl<'a> ShapeNode for NodeRef<'a> {
    fn child_nodes(&self) -> impl Iterator<Item = Self> {
        let arena = self.arena;
        let node: &'a ArenaNode = self.node;
        node.children
            .iter()
            .filter_map(move |&idx| arena.node_ref(idx))
    }
}

/// Post-order traversal of the subtree rooted at a given node.
pub struct PostOrderIterator<'a> {
    arena: &'a TreeArena,
    stack: Vec<(Index, bool)>,
}

impl<'a> PostOrderIterator<'a> {
    fn new(arena: &'a TreeArena, start: Index) -> Self {
        Self {
            arena,
            stack: vec![(start, false)],
        }
    }
}

impl<'a> Iterator for PostOrderIterator<'a> {
    type Item = (Index, &'a ArenaNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current_idx, visited)) = self.stack.pop() {
            if let Some(node) = self.arena.get(current_idx) {
                if !visited {
                    self.stack.push((current_idx, true));
                    for &child in node.children.iter().rev() {
                        self.stack.push((child, false));
                    }
                } else {
                    return Some((current_idx, node));
                }
            }
        }
        None
    }
}
