//! Domain layer: the tree model and its invariants
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod error;
pub mod ids;
pub mod metrics;
pub mod model;
pub mod seed;
pub mod selection;
pub mod snapshot;

pub use arena::{NodeRef, TreeArena};
pub use error::{DomainError, DomainResult};
pub use ids::{IdAllocator, NodeId};
pub use metrics::{height, level_sizes, node_count, width, Metrics, ShapeNode};
pub use model::{TreeLimits, TreeModel};
pub use selection::Selection;
pub use snapshot::{Snapshot, TreeNode};
