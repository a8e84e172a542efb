//! Fixed-position classification.

use crate::{DocumentTree, NodeId, ViewportProvider};

/// Whether `node` renders at a viewport-relative fixed position.
///
/// Walks the positioning chain starting at the node itself. A node that is
/// always fixed wins outright; otherwise the first node with a declared fixed
/// position makes the whole subtree fixed.
pub fn is_fixed(node: NodeId, document: &dyn DocumentTree, viewport: &dyn ViewportProvider) -> bool {
    let mut current = Some(node);
    while let Some(n) = current {
        if document.is_always_fixed(n) || viewport.is_declared_fixed(n) {
            return true;
        }
        current = document.offset_parent(n);
    }
    false
}
