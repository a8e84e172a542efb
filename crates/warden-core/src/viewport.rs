//! Host-side geometry and document queries.

use crate::NodeId;
use warden_geometry::{Point, Rect};

/// Supplies the current viewport and per-node geometry.
pub trait ViewportProvider {
    /// The visible rectangle in page coordinates.
    fn rect(&self) -> Rect;

    fn scroll_offset(&self) -> Point;

    /// Document-relative rectangle of a node. Substitute geometry source for
    /// items that are not upgraded yet.
    fn layout_rect(&self, node: NodeId) -> Option<Rect>;

    /// Whether the node was declared with a fixed position style.
    fn is_declared_fixed(&self, node: NodeId) -> bool;
}

/// Read-only view of the node tree the items live in.
pub trait DocumentTree {
    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// Nearest positioning ancestor.
    fn offset_parent(&self, node: NodeId) -> Option<NodeId>;

    /// Nodes that are fixed no matter what their style says.
    fn is_always_fixed(&self, _node: NodeId) -> bool {
        false
    }

    /// Whether the node is a managed item, tracked or not.
    fn is_item_node(&self, node: NodeId) -> bool;

    /// Whether `ancestor` is `node` or one of its ancestors.
    fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(n) = current {
            if n == ancestor {
                return true;
            }
            current = self.parent(n);
        }
        false
    }
}
