//! Node identifiers and the bounded id allocator.

use std::collections::{BTreeSet, HashSet};
use std::fmt;

use tracing::instrument;

use crate::domain::error::{DomainError, DomainResult};

/// Identifier of a node, unique across the whole tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u32> for NodeId {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

/// Issues node ids from the space `0..limit`.
///
/// Released ids are reused lowest-first; otherwise a monotonic counter hands
/// out the next never-used id. Every id below `next` is either in `used` or
/// in `free`, every id at or above `next` is unused.
#[derive(Debug, Clone)]
pub struct IdAllocator {
    limit: u32,
    next: u32,
    used: HashSet<NodeId>,
    free: BTreeSet<NodeId>,
}

impl IdAllocator {
    pub fn new(limit: u32) -> Self {
        Self {
            limit,
            next: 0,
            used: HashSet::new(),
            free: BTreeSet::new(),
        }
    }

    /// Total size of the id space.
    pub fn capacity(&self) -> u32 {
        self.limit
    }

    pub fn in_use(&self) -> usize {
        self.used.len()
    }

    pub fn available(&self) -> usize {
        self.limit as usize - self.used.len()
    }

    pub fn is_used(&self, id: NodeId) -> bool {
        self.used.contains(&id)
    }

    #[instrument(level = "trace", skip(self))]
    pub fn allocate(&mut self) -> DomainResult<NodeId> {
        let id = if let Some(id) = self.free.pop_first() {
            id
        } else if self.next < self.limit {
            let id = NodeId(self.next);
            self.next += 1;
            id
        } else {
            return Err(DomainError::CapacityExceeded {
                capacity: self.limit,
            });
        };
        self.used.insert(id);
        Ok(id)
    }

    /// Allocates `count` ids or none at all.
    #[instrument(level = "trace", skip(self))]
    pub fn allocate_many(&mut self, count: usize) -> DomainResult<Vec<NodeId>> {
        if count > self.available() {
            return Err(DomainError::CapacityExceeded {
                capacity: self.limit,
            });
        }
        (0..count).map(|_| self.allocate()).collect()
    }

    /// Marks a specific id as used, e.g. when loading a seed tree.
    #[instrument(level = "trace", skip(self))]
    pub fn reserve(&mut self, id: NodeId) -> DomainResult<()> {
        if id.0 >= self.limit {
            return Err(DomainError::InvalidArgument(format!(
                "id {} is outside the id space 0..{}",
                id.0, self.limit
            )));
        }
        if self.used.contains(&id) {
            return Err(DomainError::InvalidArgument(format!(
                "id {} is already in use",
                id.0
            )));
        }
        if id.0 >= self.next {
            self.free.extend((self.next..id.0).map(NodeId));
            self.next = id.0 + 1;
        } else {
            self.free.remove(&id);
        }
        self.used.insert(id);
        Ok(())
    }

    /// Returns an id to the pool. Unknown ids are ignored.
    #[instrument(level = "trace", skip(self))]
    pub fn release(&mut self, id: NodeId) {
        if self.used.remove(&id) {
            self.free.insert(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_fresh_allocator_when_allocating_then_ids_are_sequential() {
        let mut ids = IdAllocator::new(10);
        assert_eq!(ids.allocate().unwrap(), NodeId(0));
        assert_eq!(ids.allocate().unwrap(), NodeId(1));
        assert!(ids.is_used(NodeId(1)));
        assert_eq!(ids.in_use(), 2);
    }

    #[test]
    fn given_released_ids_when_allocating_then_lowest_released_is_reused() {
        let mut ids = IdAllocator::new(10);
        ids.allocate_many(5).unwrap();
        ids.release(NodeId(3));
        ids.release(NodeId(1));

        assert_eq!(ids.allocate().unwrap(), NodeId(1));
        assert_eq!(ids.allocate().unwrap(), NodeId(3));
        assert_eq!(ids.allocate().unwrap(), NodeId(5));
    }

    #[test]
    fn given_full_space_when_allocating_then_capacity_exceeded() {
        let mut ids = IdAllocator::new(2);
        ids.allocate_many(2).unwrap();
        assert_eq!(
            ids.allocate(),
            Err(DomainError::CapacityExceeded { capacity: 2 })
        );
    }

    #[test]
    fn given_insufficient_space_when_allocating_many_then_nothing_is_marked() {
        let mut ids = IdAllocator::new(3);
        ids.allocate().unwrap();
        assert!(ids.allocate_many(3).is_err());
        assert_eq!(ids.in_use(), 1);
        assert_eq!(ids.available(), 2);
    }

    #[test]
    fn given_reserved_gap_when_allocating_then_gap_ids_are_handed_out() {
        let mut ids = IdAllocator::new(10);
        ids.reserve(NodeId(3)).unwrap();
        let got = ids.allocate_many(4).unwrap();
        assert_eq!(got, vec![NodeId(0), NodeId(1), NodeId(2), NodeId(4)]);
    }

    #[test]
    fn given_used_or_out_of_range_id_when_reserving_then_invalid_argument() {
        let mut ids = IdAllocator::new(4);
        ids.reserve(NodeId(1)).unwrap();
        assert!(matches!(
            ids.reserve(NodeId(1)),
            Err(DomainError::InvalidArgument(_))
        ));
        assert!(matches!(
            ids.reserve(NodeId(4)),
            Err(DomainError::InvalidArgument(_))
        ));
    }

    #[test]
    fn given_unknown_id_when_releasing_then_noop() {
        let mut ids = IdAllocator::new(4);
        ids.allocate().unwrap();
        ids.release(NodeId(3));
        assert_eq!(ids.in_use(), 1);
        assert_eq!(ids.allocate().unwrap(), NodeId(1));
    }
}
