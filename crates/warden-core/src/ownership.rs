//! Ownership registry.
//!
//! Maps an item to the item that owns its lifecycle decisions. Resources only
//! cache lookup results; the registry is the single source of truth.

use crate::{DocumentTree, NodeId, OwnershipError};
use rustc_hash::FxHashMap;

#[derive(Debug, Default)]
pub struct OwnershipRegistry {
    owners: FxHashMap<NodeId, NodeId>,
}

impl OwnershipRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `owner` as the explicit owner of `node`. The owner must contain
    /// the node.
    pub fn set_owner(
        &mut self,
        node: NodeId,
        owner: NodeId,
        document: &dyn DocumentTree,
    ) -> Result<(), OwnershipError> {
        if !document.contains(owner, node) {
            return Err(OwnershipError::NotContained { node, owner });
        }
        self.owners.insert(node, owner);
        Ok(())
    }

    pub fn explicit_owner(&self, node: NodeId) -> Option<NodeId> {
        self.owners.get(&node).copied()
    }

    pub fn is_explicitly_owned(&self, node: NodeId) -> bool {
        self.owners.contains_key(&node)
    }

    /// Walks from `node` up through its ancestors and returns the first
    /// registered owner found.
    pub fn lookup(&self, node: NodeId, document: &dyn DocumentTree) -> Option<NodeId> {
        let mut current = Some(node);
        while let Some(n) = current {
            if let Some(owner) = self.explicit_owner(n) {
                return Some(owner);
            }
            current = document.parent(n);
        }
        None
    }

    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }
}

#[cfg(test)]
#[path = "tests/ownership_tests.rs"]
mod tests;
