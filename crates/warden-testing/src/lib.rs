//! Testing utilities and fakes for Warden

pub mod assertions;
pub mod fake_document;
pub mod fake_item;
pub mod poll;

pub use assertions::*;
pub use fake_document::FakeDocument;
pub use fake_item::{FakeItem, LayoutScript};
pub use poll::*;

use std::rc::Rc;
use warden_core::{Item, NodeId, Resource, ResourceHost};
use warden_geometry::Rect;

/// A host wired to a [`FakeDocument`].
pub struct TestHost {
    pub document: Rc<FakeDocument>,
    pub host: ResourceHost,
}

impl TestHost {
    pub fn new(viewport: Rect) -> Self {
        let document = Rc::new(FakeDocument::new(viewport));
        let host = ResourceHost::new(document.clone(), document.clone());
        Self { document, host }
    }

    /// Adds the item's node to the document under `parent` and registers it.
    pub fn add_item(&self, item: &Rc<FakeItem>, parent: Option<NodeId>) -> Resource {
        self.document.add_item_node(item.node(), parent);
        let item: Rc<dyn Item> = item.clone();
        self.host.add(item)
    }
}

pub mod prelude {
    pub use crate::assertions::*;
    pub use crate::fake_document::FakeDocument;
    pub use crate::fake_item::{FakeItem, LayoutScript};
    pub use crate::poll::*;
    pub use crate::TestHost;
}
