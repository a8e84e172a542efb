//! Scheduler-side table of resources.
//!
//! `ResourceHost` is the narrow surface the page-wide scheduler hands to the
//! lifecycle core: the viewport and document collaborators, the node→resource
//! lookup, the ownership registry, the last reported scroll velocity and the
//! build permission gate. Resources only hold a weak [`HostHandle`] back to it.

use crate::proximity::{ProximityConfig, ScrollDirection};
use crate::{
    DocumentTree, Item, NodeId, OwnershipError, OwnershipRegistry, Resource, ResourceId,
    ViewportProvider,
};
use rustc_hash::FxHashMap;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HostConfig {
    pub proximity: ProximityConfig,
}

type BuildGate = Box<dyn Fn() -> bool>;

struct HostInner {
    config: HostConfig,
    viewport: Rc<dyn ViewportProvider>,
    document: Rc<dyn DocumentTree>,
    build_gate: RefCell<Option<BuildGate>>,
    scroll_velocity: Cell<f32>,
    resources: RefCell<FxHashMap<NodeId, Resource>>,
    ownership: RefCell<OwnershipRegistry>,
    next_id: Cell<u64>,
}

#[derive(Clone)]
pub struct ResourceHost {
    inner: Rc<HostInner>,
}

impl ResourceHost {
    pub fn new(viewport: Rc<dyn ViewportProvider>, document: Rc<dyn DocumentTree>) -> Self {
        Self::with_config(viewport, document, HostConfig::default())
    }

    pub fn with_config(
        viewport: Rc<dyn ViewportProvider>,
        document: Rc<dyn DocumentTree>,
        config: HostConfig,
    ) -> Self {
        Self {
            inner: Rc::new(HostInner {
                config,
                viewport,
                document,
                build_gate: RefCell::new(None),
                scroll_velocity: Cell::new(0.0),
                resources: RefCell::new(FxHashMap::default()),
                ownership: RefCell::new(OwnershipRegistry::new()),
                next_id: Cell::new(1),
            }),
        }
    }

    pub fn handle(&self) -> HostHandle {
        HostHandle {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Registers an item and returns its resource. Registering a node twice
    /// returns the existing resource.
    pub fn add(&self, item: Rc<dyn Item>) -> Resource {
        let node = item.node();
        if let Some(existing) = self.resource_for(node) {
            log::warn!("{} is already tracked", existing.debug_id());
            return existing;
        }
        let id = ResourceId(self.inner.next_id.get());
        self.inner.next_id.set(id.0 + 1);
        let resource = Resource::new(id, item, self.handle());
        log::debug!(
            "tracking {} in state {:?}",
            resource.debug_id(),
            resource.state()
        );
        self.inner
            .resources
            .borrow_mut()
            .insert(node, resource.clone());
        resource
    }

    pub fn resource_for(&self, node: NodeId) -> Option<Resource> {
        self.inner.resources.borrow().get(&node).cloned()
    }

    /// All tracked resources, in registration order.
    pub fn resources(&self) -> Vec<Resource> {
        let mut resources: Vec<Resource> =
            self.inner.resources.borrow().values().cloned().collect();
        resources.sort_by_key(|resource| resource.id());
        resources
    }

    pub fn len(&self) -> usize {
        self.inner.resources.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.resources.borrow().is_empty()
    }

    pub(crate) fn remove(&self, node: NodeId, id: ResourceId) {
        let mut resources = self.inner.resources.borrow_mut();
        if resources.get(&node).map(Resource::id) == Some(id) {
            resources.remove(&node);
        }
    }

    /// Assigns `owner` to `node` and drops cached ownership of every tracked
    /// descendant so the next lookup walks up from scratch. Descendants with
    /// an explicit owner of their own keep it.
    pub fn set_owner(&self, node: NodeId, owner: NodeId) -> Result<(), OwnershipError> {
        let document = self.document();
        self.inner
            .ownership
            .borrow_mut()
            .set_owner(node, owner, &*document)?;
        log::debug!("{node} is now owned by {owner}");

        if let Some(resource) = self.resource_for(node) {
            resource.update_owner(Some(owner));
        }
        let descendants: Vec<Resource> = self
            .inner
            .resources
            .borrow()
            .values()
            .filter(|resource| resource.node() != node && document.contains(node, resource.node()))
            .cloned()
            .collect();
        let ownership = self.inner.ownership.borrow();
        for resource in descendants {
            if !ownership.is_explicitly_owned(resource.node()) {
                resource.invalidate_owner();
            }
        }
        Ok(())
    }

    /// Uncached ownership lookup.
    pub fn owner_of(&self, node: NodeId) -> Option<NodeId> {
        self.inner
            .ownership
            .borrow()
            .lookup(node, &*self.inner.document)
    }

    pub fn set_scroll_velocity(&self, velocity: f32) {
        self.inner.scroll_velocity.set(velocity);
    }

    pub fn scroll_velocity(&self) -> f32 {
        self.inner.scroll_velocity.get()
    }

    pub fn scroll_direction(&self) -> ScrollDirection {
        ScrollDirection::from_velocity(self.scroll_velocity())
    }

    /// Installs the build permission gate. Without one, builds are granted.
    pub fn set_build_gate(&self, gate: impl Fn() -> bool + 'static) {
        *self.inner.build_gate.borrow_mut() = Some(Box::new(gate));
    }

    pub fn grant_build_permission(&self) -> bool {
        self.inner
            .build_gate
            .borrow()
            .as_ref()
            .map_or(true, |gate| gate())
    }

    pub fn viewport(&self) -> Rc<dyn ViewportProvider> {
        Rc::clone(&self.inner.viewport)
    }

    pub fn document(&self) -> Rc<dyn DocumentTree> {
        Rc::clone(&self.inner.document)
    }

    pub fn config(&self) -> &HostConfig {
        &self.inner.config
    }
}

/// Weak reference from a resource back to its host.
#[derive(Clone)]
pub struct HostHandle {
    inner: Weak<HostInner>,
}

impl HostHandle {
    pub fn upgrade(&self) -> Option<ResourceHost> {
        self.inner.upgrade().map(|inner| ResourceHost { inner })
    }
}
