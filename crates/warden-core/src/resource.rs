//! Per-item lifecycle controller.
//!
//! A [`Resource`] tracks one managed item from registration to disconnection:
//! build, measurement, layout scheduling, pause/resume, collapse/expand and
//! unlayout. All transitions are synchronous except layout, which hands back a
//! [`LayoutCompletion`] future.
//!
//! Handles are cheap to clone and share one set of interior-mutable fields.
//! No borrow is held across a call into the item, so items may call back into
//! their own or other resources from any notification.

use crate::fixed;
use crate::host::{HostHandle, ResourceHost};
use crate::proximity;
use crate::signal::{self, Signal, SignalResolver};
use crate::{
    Item, LayoutCompletion, LayoutError, NodeId, RenderPolicy, ResourceError, ResourceState,
    SizeChange,
};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use warden_geometry::Rect;

/// Scheduler-unique resource identity.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ResourceId(pub u64);

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum OwnerCache {
    Unknown,
    Resolved(Option<NodeId>),
}

type PendingSignal = RefCell<Option<(SignalResolver, Signal)>>;

pub(crate) struct ResourceInner {
    id: ResourceId,
    item: Rc<dyn Item>,
    host: HostHandle,
    debug_id: String,
    state: Cell<ResourceState>,
    layout_box: Cell<Rect>,
    page_layout_box: Cell<Rect>,
    initial_layout_box: Cell<Option<Rect>>,
    is_fixed: Cell<bool>,
    in_viewport: Cell<bool>,
    paused: Cell<bool>,
    priority: Cell<i32>,
    layout_count: Cell<u32>,
    next_attempt: Cell<u64>,
    pending_layout: Cell<Option<u64>>,
    last_layout_error: RefCell<Option<LayoutError>>,
    blacklisted: Cell<bool>,
    measure_requested: Cell<bool>,
    owner: Cell<OwnerCache>,
    render_range: PendingSignal,
    built: PendingSignal,
    disconnected: Cell<bool>,
}

#[derive(Clone)]
pub struct Resource {
    inner: Rc<ResourceInner>,
}

impl Resource {
    pub(crate) fn new(id: ResourceId, item: Rc<dyn Item>, host: HostHandle) -> Self {
        let state = if item.is_built() {
            ResourceState::NotLaidOut
        } else {
            ResourceState::NotBuilt
        };
        let debug_id = format!("{}#{}", item.tag_name(), id);
        let priority = item.layout_priority();
        Self {
            inner: Rc::new(ResourceInner {
                id,
                item,
                host,
                debug_id,
                state: Cell::new(state),
                layout_box: Cell::new(Rect::ZERO),
                page_layout_box: Cell::new(Rect::ZERO),
                initial_layout_box: Cell::new(None),
                is_fixed: Cell::new(false),
                in_viewport: Cell::new(false),
                paused: Cell::new(false),
                priority: Cell::new(priority),
                layout_count: Cell::new(0),
                next_attempt: Cell::new(1),
                pending_layout: Cell::new(None),
                last_layout_error: RefCell::new(None),
                blacklisted: Cell::new(false),
                measure_requested: Cell::new(false),
                owner: Cell::new(OwnerCache::Unknown),
                render_range: RefCell::new(None),
                built: RefCell::new(None),
                disconnected: Cell::new(false),
            }),
        }
    }

    pub(crate) fn from_inner(inner: Rc<ResourceInner>) -> Self {
        Self { inner }
    }

    fn host(&self) -> Option<ResourceHost> {
        self.inner.host.upgrade()
    }

    fn set_state(&self, state: ResourceState) {
        let previous = self.inner.state.replace(state);
        if previous != state {
            log::trace!("{}: {:?} -> {:?}", self.inner.debug_id, previous, state);
        }
    }

    pub fn id(&self) -> ResourceId {
        self.inner.id
    }

    pub fn node(&self) -> NodeId {
        self.inner.item.node()
    }

    pub fn item(&self) -> Rc<dyn Item> {
        Rc::clone(&self.inner.item)
    }

    pub fn debug_id(&self) -> &str {
        &self.inner.debug_id
    }

    /// Key for scheduler tasks scoped to this resource.
    pub fn task_id(&self, local_id: &str) -> String {
        format!("{}#{}", self.inner.debug_id, local_id)
    }

    pub fn state(&self) -> ResourceState {
        self.inner.state.get()
    }

    pub fn priority(&self) -> i32 {
        self.inner.priority.get()
    }

    pub fn update_priority(&self, priority: i32) {
        self.inner.priority.set(priority);
    }

    pub fn layout_box(&self) -> Rect {
        self.inner.layout_box.get()
    }

    /// Viewport-independent box. Differs from [`Self::layout_box`] only for
    /// fixed items.
    pub fn page_layout_box(&self) -> Rect {
        self.inner.page_layout_box.get()
    }

    pub fn initial_layout_box(&self) -> Option<Rect> {
        self.inner.initial_layout_box.get()
    }

    pub fn has_been_measured(&self) -> bool {
        self.inner.initial_layout_box.get().is_some()
    }

    pub fn is_displayed(&self) -> bool {
        !self.layout_box().is_empty()
    }

    pub fn is_fixed(&self) -> bool {
        self.inner.is_fixed.get()
    }

    pub fn is_in_viewport(&self) -> bool {
        self.inner.in_viewport.get()
    }

    pub fn is_paused(&self) -> bool {
        self.inner.paused.get()
    }

    pub fn is_blacklisted(&self) -> bool {
        self.inner.blacklisted.get()
    }

    pub fn is_measure_requested(&self) -> bool {
        self.inner.measure_requested.get()
    }

    pub fn layout_count(&self) -> u32 {
        self.inner.layout_count.get()
    }

    pub fn last_layout_error(&self) -> Option<LayoutError> {
        self.inner.last_layout_error.borrow().clone()
    }

    pub fn is_layout_pending(&self) -> bool {
        self.state().is_layout_pending()
    }

    /// Whether a layout attempt has been started and not yet settled.
    pub fn has_pending_layout(&self) -> bool {
        self.inner.pending_layout.get().is_some()
    }

    pub fn is_disconnected(&self) -> bool {
        self.inner.disconnected.get()
    }

    pub fn prerender_allowed(&self) -> bool {
        self.inner.item.prerender_allowed()
    }

    pub fn ptr_eq(&self, other: &Resource) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Builds the item if it is upgraded, permitted and not blacklisted.
    ///
    /// A build failure blacklists the resource for good; the error is logged
    /// and swallowed. With `measure` set, a measurement pass follows a
    /// successful build.
    pub fn build(&self, measure: bool) {
        let item = &self.inner.item;
        if self.is_blacklisted() || !item.is_upgraded() || self.state().is_built() {
            return;
        }
        let Some(host) = self.host() else {
            return;
        };
        if !host.grant_build_permission() {
            log::debug!("build of {} deferred: permission denied", self.debug_id());
            return;
        }
        if let Err(err) = item.build() {
            log::error!("failed to build {}: {err}", self.debug_id());
            self.inner.blacklisted.set(true);
            return;
        }

        if self.has_been_measured() {
            self.set_state(ResourceState::ReadyForLayout);
            item.update_layout_box(self.layout_box(), true);
        } else {
            self.set_state(ResourceState::NotLaidOut);
        }
        let pending = self.inner.built.borrow_mut().take();
        if let Some((resolver, _)) = pending {
            resolver.resolve();
        }

        if measure {
            self.measure();
        }
    }

    /// Resolves once the item has been built. Cancelled if the resource is
    /// disconnected first.
    pub fn when_built(&self) -> Signal {
        if self.state().is_built() {
            return Signal::resolved();
        }
        if self.is_disconnected() {
            return Signal::cancelled();
        }
        pending_signal(&self.inner.built)
    }

    /// Recomputes the layout box, page layout box and fixed flag.
    ///
    /// Never fails: a missing rectangle leaves everything untouched.
    pub fn measure(&self) {
        let item = &self.inner.item;
        let Some(host) = self.host() else {
            return;
        };
        let document = host.document();
        let viewport = host.viewport();
        let node = item.node();

        // Placeholders are sized by their parent item and wait until that
        // parent is tracked.
        if item.is_placeholder() {
            if let Some(parent) = document.parent(node) {
                if document.is_item_node(parent) && host.resource_for(parent).is_none() {
                    log::debug!("measure of {} deferred until parent is tracked", self.debug_id());
                    return;
                }
            }
        }

        self.inner.measure_requested.set(false);
        let measured = if item.is_upgraded() {
            item.bounding_rect()
        } else {
            viewport.layout_rect(node)
        };
        let Some(page_box) = measured else {
            return;
        };

        let is_fixed = !page_box.is_empty() && fixed::is_fixed(node, &*document, &*viewport);
        let layout_box = if is_fixed {
            let scroll = viewport.scroll_offset();
            page_box.translate(-scroll.x, -scroll.y)
        } else {
            page_box
        };
        let old_box = self.inner.layout_box.replace(layout_box);
        self.inner.page_layout_box.set(page_box);
        self.inner.is_fixed.set(is_fixed);

        // A change in `left` alone never affects readiness for layout.
        let size_changed = !old_box.size_equals(&layout_box);
        let state = self.state();
        if (state == ResourceState::NotLaidOut || old_box.top != layout_box.top || size_changed)
            && item.is_upgraded()
            && state.is_built()
            && (state == ResourceState::NotLaidOut || item.is_relayout_needed())
        {
            self.set_state(ResourceState::ReadyForLayout);
        }

        if !self.has_been_measured() {
            self.inner.initial_layout_box.set(Some(layout_box));
        }
        item.update_layout_box(layout_box, size_changed);
    }

    /// Flags the resource for remeasurement on the next pass. Ignored before
    /// the resource is ready for layout.
    pub fn request_measure(&self) {
        if self.state() >= ResourceState::ReadyForLayout {
            self.inner.measure_requested.set(true);
        }
    }

    /// Starts a layout attempt.
    ///
    /// Relayouts the item does not opt in to complete immediately without
    /// calling the item. Calling this in `LayoutFailed` retries from scratch.
    pub fn start_layout(&self) -> Result<LayoutCompletion, ResourceError> {
        let state = self.state();
        if state < ResourceState::ReadyForLayout
            || matches!(
                state,
                ResourceState::LayoutScheduled | ResourceState::LayoutComplete
            )
        {
            return Err(ResourceError::InvalidState {
                debug_id: self.inner.debug_id.clone(),
                state,
            });
        }
        if !self.is_displayed() {
            return Err(ResourceError::NotDisplayed {
                debug_id: self.inner.debug_id.clone(),
            });
        }

        let retrying = state == ResourceState::LayoutFailed;
        if !retrying && self.layout_count() > 0 && !self.inner.item.is_relayout_needed() {
            log::debug!("ignoring unwanted relayout of {}", self.debug_id());
            // Supersedes any attempt still in flight from before the box changed.
            self.inner.pending_layout.set(None);
            *self.inner.last_layout_error.borrow_mut() = None;
            self.set_state(ResourceState::LayoutComplete);
            return Ok(LayoutCompletion::ready());
        }

        let attempt = self.inner.next_attempt.get();
        self.inner.next_attempt.set(attempt + 1);
        self.inner.pending_layout.set(Some(attempt));
        self.inner.layout_count.set(self.layout_count() + 1);
        self.set_state(ResourceState::LayoutScheduled);
        let future = self.inner.item.layout();
        Ok(LayoutCompletion::pending(
            Rc::downgrade(&self.inner),
            attempt,
            future,
        ))
    }

    /// Applies the outcome of a layout attempt. Outcomes of superseded
    /// attempts are dropped.
    pub(crate) fn layout_settled(&self, attempt: u64, outcome: &Result<(), LayoutError>) {
        if self.inner.pending_layout.get() != Some(attempt) {
            log::debug!("{}: dropping stale layout outcome", self.debug_id());
            return;
        }
        self.inner.pending_layout.set(None);
        let scheduled = self.state() == ResourceState::LayoutScheduled;
        match outcome {
            Ok(()) => {
                *self.inner.last_layout_error.borrow_mut() = None;
                if scheduled {
                    self.set_state(ResourceState::LayoutComplete);
                }
            }
            Err(err) => {
                log::warn!("layout of {} failed: {err}", self.debug_id());
                *self.inner.last_layout_error.borrow_mut() = Some(err.clone());
                if scheduled {
                    self.set_state(ResourceState::LayoutFailed);
                }
            }
        }
    }

    /// Rolls back an attempt whose completion was dropped before it settled,
    /// leaving the resource ready for a fresh, ungated layout.
    pub(crate) fn layout_abandoned(&self, attempt: u64) {
        if self.inner.pending_layout.get() != Some(attempt) {
            return;
        }
        log::debug!("{}: layout attempt abandoned", self.debug_id());
        self.inner.pending_layout.set(None);
        self.inner
            .layout_count
            .set(self.layout_count().saturating_sub(1));
        if self.state() == ResourceState::LayoutScheduled {
            self.set_state(ResourceState::ReadyForLayout);
        }
    }

    /// Forwards a size change to the item and invalidates any layout.
    pub fn change_size(&self, change: SizeChange) {
        self.inner.item.change_size(change);
        if self.state() >= ResourceState::ReadyForLayout {
            self.set_state(ResourceState::NotLaidOut);
        }
    }

    pub fn complete_collapse(&self) {
        let item = &self.inner.item;
        item.set_visible(false);
        let collapsed = self.layout_box().collapsed();
        self.inner.layout_box.set(collapsed);
        self.inner.page_layout_box.set(collapsed);
        self.inner.is_fixed.set(false);
        item.update_layout_box(collapsed, true);

        let Some(owner) = self.owner() else {
            return;
        };
        match self.host().and_then(|host| host.resource_for(owner)) {
            Some(owner) => owner.item().collapsed(self.node()),
            None => log::debug!("{}: owner {owner} is not tracked", self.debug_id()),
        }
    }

    pub fn complete_expand(&self) {
        self.inner.item.set_visible(true);
        self.request_measure();
    }

    pub fn set_in_viewport(&self, in_viewport: bool) {
        if self.inner.in_viewport.replace(in_viewport) == in_viewport {
            return;
        }
        self.inner.item.viewport_changed(in_viewport);
    }

    pub fn unlayout(&self) {
        if self.state() <= ResourceState::NotLaidOut {
            return;
        }
        self.set_in_viewport(false);
        if self.inner.item.unlayout() {
            self.inner.item.toggle_placeholder(true);
            self.set_state(ResourceState::NotLaidOut);
            self.inner.layout_count.set(0);
            self.inner.pending_layout.set(None);
        }
    }

    pub fn pause(&self) {
        if self.state() == ResourceState::NotBuilt || self.is_paused() {
            return;
        }
        self.inner.paused.set(true);
        self.inner.item.pause();
        if self.inner.item.unlayout_on_pause() {
            self.unlayout();
        }
    }

    /// Pause for an item that is being detached from the document.
    pub fn pause_on_remove(&self) {
        if self.state() == ResourceState::NotBuilt {
            return;
        }
        self.set_in_viewport(false);
        if self.is_paused() {
            return;
        }
        self.inner.paused.set(true);
        self.inner.item.pause();
    }

    pub fn resume(&self) {
        if self.state() == ResourceState::NotBuilt || !self.is_paused() {
            return;
        }
        self.inner.paused.set(false);
        self.inner.item.resume();
    }

    /// Notifies the item and drops the resource from the host table. Pending
    /// signals are cancelled.
    pub fn disconnect(&self) {
        if self.inner.disconnected.replace(true) {
            return;
        }
        self.inner.item.disconnected();
        if let Some(host) = self.host() {
            host.remove(self.node(), self.id());
        }
        let render_range = self.inner.render_range.borrow_mut().take();
        let built = self.inner.built.borrow_mut().take();
        for (resolver, _) in render_range.into_iter().chain(built) {
            resolver.cancel();
        }
    }

    pub fn owner(&self) -> Option<NodeId> {
        if let OwnerCache::Resolved(owner) = self.inner.owner.get() {
            return owner;
        }
        let host = self.host()?;
        let owner = host.owner_of(self.node());
        self.inner.owner.set(OwnerCache::Resolved(owner));
        owner
    }

    pub fn has_owner(&self) -> bool {
        self.owner().is_some()
    }

    pub(crate) fn update_owner(&self, owner: Option<NodeId>) {
        self.inner.owner.set(OwnerCache::Resolved(owner));
    }

    pub(crate) fn invalidate_owner(&self) {
        self.inner.owner.set(OwnerCache::Unknown);
    }

    /// Whether the item should be rendered now even though it may be outside
    /// the viewport. Owned items always defer to their owner.
    pub fn render_outside_viewport(&self) -> bool {
        let allowed =
            self.has_owner() || self.is_within_viewport_ratio(self.inner.item.render_policy());
        if allowed {
            let pending = self.inner.render_range.borrow_mut().take();
            if let Some((resolver, _)) = pending {
                resolver.resolve();
            }
        }
        allowed
    }

    /// Same heuristic, driven by the item's idle-time policy.
    pub fn idle_render_outside_viewport(&self) -> bool {
        self.is_within_viewport_ratio(self.inner.item.idle_render_policy())
    }

    fn is_within_viewport_ratio(&self, policy: RenderPolicy) -> bool {
        let Some(host) = self.host() else {
            return false;
        };
        proximity::should_render_outside_viewport(
            &self.layout_box(),
            &host.viewport().rect(),
            policy,
            host.scroll_velocity(),
            &host.config().proximity,
        )
    }

    /// Resolves once the item comes within render range. Resolved right away
    /// when layout is no longer pending or the item is already in range;
    /// concurrent callers share one pending signal.
    pub fn when_within_render_outside_viewport(&self) -> Signal {
        if !self.is_layout_pending() || self.render_outside_viewport() {
            return Signal::resolved();
        }
        if self.is_disconnected() {
            return Signal::cancelled();
        }
        pending_signal(&self.inner.render_range)
    }

    pub fn has_pending_render_range_signal(&self) -> bool {
        self.inner.render_range.borrow().is_some()
    }
}

fn pending_signal(slot: &PendingSignal) -> Signal {
    let mut slot = slot.borrow_mut();
    if let Some((_, signal)) = slot.as_ref() {
        return signal.clone();
    }
    let (resolver, signal) = signal::signal();
    *slot = Some((resolver, signal.clone()));
    signal
}

impl fmt::Debug for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resource")
            .field("id", &self.inner.debug_id)
            .field("state", &self.state())
            .field("layout_box", &self.layout_box())
            .field("paused", &self.is_paused())
            .finish()
    }
}
