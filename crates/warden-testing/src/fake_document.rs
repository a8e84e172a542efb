//! In-memory document tree and viewport.

use rustc_hash::{FxHashMap, FxHashSet};
use std::cell::{Cell, RefCell};
use warden_core::{DocumentTree, NodeId, ViewportProvider};
use warden_geometry::{Point, Rect};

#[derive(Default)]
pub struct FakeDocument {
    viewport: Cell<Rect>,
    scroll: Cell<Point>,
    parents: RefCell<FxHashMap<NodeId, NodeId>>,
    offset_parents: RefCell<FxHashMap<NodeId, Option<NodeId>>>,
    item_nodes: RefCell<FxHashSet<NodeId>>,
    always_fixed: RefCell<FxHashSet<NodeId>>,
    declared_fixed: RefCell<FxHashSet<NodeId>>,
    layout_rects: RefCell<FxHashMap<NodeId, Rect>>,
}

impl FakeDocument {
    pub fn new(viewport: Rect) -> Self {
        Self {
            viewport: Cell::new(viewport),
            ..Self::default()
        }
    }

    /// Adds a plain (non-item) node.
    pub fn add_node(&self, node: NodeId, parent: Option<NodeId>) {
        if let Some(parent) = parent {
            self.parents.borrow_mut().insert(node, parent);
        }
    }

    pub fn add_item_node(&self, node: NodeId, parent: Option<NodeId>) {
        self.add_node(node, parent);
        self.item_nodes.borrow_mut().insert(node);
    }

    /// Overrides the positioning ancestor; by default it is the parent.
    pub fn set_offset_parent(&self, node: NodeId, offset_parent: Option<NodeId>) {
        self.offset_parents
            .borrow_mut()
            .insert(node, offset_parent);
    }

    pub fn set_always_fixed(&self, node: NodeId) {
        self.always_fixed.borrow_mut().insert(node);
    }

    pub fn set_declared_fixed(&self, node: NodeId) {
        self.declared_fixed.borrow_mut().insert(node);
    }

    pub fn set_layout_rect(&self, node: NodeId, rect: Rect) {
        self.layout_rects.borrow_mut().insert(node, rect);
    }

    pub fn set_viewport(&self, viewport: Rect) {
        self.viewport.set(viewport);
    }

    pub fn set_scroll_offset(&self, offset: Point) {
        self.scroll.set(offset);
    }
}

impl ViewportProvider for FakeDocument {
    fn rect(&self) -> Rect {
        self.viewport.get()
    }

    fn scroll_offset(&self) -> Point {
        self.scroll.get()
    }

    fn layout_rect(&self, node: NodeId) -> Option<Rect> {
        self.layout_rects.borrow().get(&node).copied()
    }

    fn is_declared_fixed(&self, node: NodeId) -> bool {
        self.declared_fixed.borrow().contains(&node)
    }
}

impl DocumentTree for FakeDocument {
    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.parents.borrow().get(&node).copied()
    }

    fn offset_parent(&self, node: NodeId) -> Option<NodeId> {
        match self.offset_parents.borrow().get(&node) {
            Some(offset_parent) => *offset_parent,
            None => self.parent(node),
        }
    }

    fn is_always_fixed(&self, node: NodeId) -> bool {
        self.always_fixed.borrow().contains(&node)
    }

    fn is_item_node(&self, node: NodeId) -> bool {
        self.item_nodes.borrow().contains(&node)
    }
}
