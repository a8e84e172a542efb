//! Scriptable item that records every call made into it.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};
use warden_core::{
    BuildError, Item, LayoutError, LayoutFuture, NodeId, RenderPolicy, SizeChange,
};
use warden_geometry::Rect;

/// What the next call to [`Item::layout`] does.
#[derive(Clone, Debug)]
pub enum LayoutScript {
    Succeed,
    Fail(LayoutError),
    /// Stays pending until [`FakeItem::settle_layout`] is called.
    Defer,
}

#[derive(Default)]
struct DeferredState {
    outcome: Option<Result<(), LayoutError>>,
    waker: Option<Waker>,
}

struct DeferredLayout {
    state: Rc<RefCell<DeferredState>>,
}

impl Future for DeferredLayout {
    type Output = Result<(), LayoutError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut state = self.state.borrow_mut();
        match state.outcome.take() {
            Some(outcome) => Poll::Ready(outcome),
            None => {
                state.waker = Some(cx.waker().clone());
                Poll::Pending
            }
        }
    }
}

pub struct FakeItem {
    node: NodeId,
    tag: String,
    upgraded: Cell<bool>,
    built: Cell<bool>,
    build_error: RefCell<Option<BuildError>>,
    rect: Cell<Option<Rect>>,
    placeholder: Cell<bool>,
    relayout_needed: Cell<bool>,
    unlayout_result: Cell<bool>,
    unlayout_on_pause: Cell<bool>,
    render_policy: Cell<RenderPolicy>,
    idle_policy: Cell<RenderPolicy>,
    priority: Cell<i32>,
    prerender: Cell<bool>,
    layout_scripts: RefCell<VecDeque<LayoutScript>>,
    deferred: RefCell<VecDeque<Rc<RefCell<DeferredState>>>>,

    pub build_calls: Cell<u32>,
    pub layout_calls: Cell<u32>,
    pub pause_calls: Cell<u32>,
    pub resume_calls: Cell<u32>,
    pub unlayout_calls: Cell<u32>,
    pub disconnect_calls: Cell<u32>,
    pub viewport_events: RefCell<Vec<bool>>,
    pub size_changes: RefCell<Vec<SizeChange>>,
    pub layout_boxes: RefCell<Vec<(Rect, bool)>>,
    pub collapsed_children: RefCell<Vec<NodeId>>,
    pub visibility: RefCell<Vec<bool>>,
    pub placeholder_toggles: RefCell<Vec<bool>>,
}

impl FakeItem {
    /// An upgraded, unbuilt item with no geometry.
    pub fn new(node: NodeId) -> Self {
        Self {
            node,
            tag: "fake-item".to_string(),
            upgraded: Cell::new(true),
            built: Cell::new(false),
            build_error: RefCell::new(None),
            rect: Cell::new(None),
            placeholder: Cell::new(false),
            relayout_needed: Cell::new(false),
            unlayout_result: Cell::new(false),
            unlayout_on_pause: Cell::new(false),
            render_policy: Cell::new(RenderPolicy::default()),
            idle_policy: Cell::new(RenderPolicy::Flag(false)),
            priority: Cell::new(0),
            prerender: Cell::new(false),
            layout_scripts: RefCell::new(VecDeque::new()),
            deferred: RefCell::new(VecDeque::new()),
            build_calls: Cell::new(0),
            layout_calls: Cell::new(0),
            pause_calls: Cell::new(0),
            resume_calls: Cell::new(0),
            unlayout_calls: Cell::new(0),
            disconnect_calls: Cell::new(0),
            viewport_events: RefCell::new(Vec::new()),
            size_changes: RefCell::new(Vec::new()),
            layout_boxes: RefCell::new(Vec::new()),
            collapsed_children: RefCell::new(Vec::new()),
            visibility: RefCell::new(Vec::new()),
            placeholder_toggles: RefCell::new(Vec::new()),
        }
    }

    pub fn with_tag(mut self, tag: &str) -> Self {
        self.tag = tag.to_string();
        self
    }

    pub fn with_rect(self, rect: Rect) -> Self {
        self.rect.set(Some(rect));
        self
    }

    pub fn with_priority(self, priority: i32) -> Self {
        self.priority.set(priority);
        self
    }

    pub fn already_built(self) -> Self {
        self.built.set(true);
        self
    }

    pub fn not_upgraded(self) -> Self {
        self.upgraded.set(false);
        self
    }

    pub fn as_placeholder(self) -> Self {
        self.placeholder.set(true);
        self
    }

    pub fn shared(self) -> Rc<Self> {
        Rc::new(self)
    }

    pub fn set_upgraded(&self, upgraded: bool) {
        self.upgraded.set(upgraded);
    }

    pub fn set_rect(&self, rect: Option<Rect>) {
        self.rect.set(rect);
    }

    pub fn fail_builds_with(&self, message: &str) {
        *self.build_error.borrow_mut() = Some(BuildError(message.to_string()));
    }

    pub fn set_relayout_needed(&self, needed: bool) {
        self.relayout_needed.set(needed);
    }

    pub fn set_unlayout_result(&self, released: bool) {
        self.unlayout_result.set(released);
    }

    pub fn set_unlayout_on_pause(&self, unlayout: bool) {
        self.unlayout_on_pause.set(unlayout);
    }

    pub fn set_render_policy(&self, policy: RenderPolicy) {
        self.render_policy.set(policy);
    }

    pub fn set_idle_render_policy(&self, policy: RenderPolicy) {
        self.idle_policy.set(policy);
    }

    pub fn set_prerender_allowed(&self, allowed: bool) {
        self.prerender.set(allowed);
    }

    /// Queues the behavior of a future layout call. Unscripted calls succeed.
    pub fn script_layout(&self, script: LayoutScript) {
        self.layout_scripts.borrow_mut().push_back(script);
    }

    /// Settles the oldest deferred layout.
    pub fn settle_layout(&self, outcome: Result<(), LayoutError>) {
        let Some(state) = self.deferred.borrow_mut().pop_front() else {
            panic!("no deferred layout to settle");
        };
        let waker = {
            let mut state = state.borrow_mut();
            state.outcome = Some(outcome);
            state.waker.take()
        };
        if let Some(waker) = waker {
            waker.wake();
        }
    }

    pub fn last_layout_box(&self) -> Option<(Rect, bool)> {
        self.layout_boxes.borrow().last().copied()
    }
}

impl Item for FakeItem {
    fn node(&self) -> NodeId {
        self.node
    }

    fn tag_name(&self) -> &str {
        &self.tag
    }

    fn is_upgraded(&self) -> bool {
        self.upgraded.get()
    }

    fn is_built(&self) -> bool {
        self.built.get()
    }

    fn build(&self) -> Result<(), BuildError> {
        self.build_calls.set(self.build_calls.get() + 1);
        if let Some(err) = self.build_error.borrow().clone() {
            return Err(err);
        }
        self.built.set(true);
        Ok(())
    }

    fn bounding_rect(&self) -> Option<Rect> {
        self.rect.get()
    }

    fn is_placeholder(&self) -> bool {
        self.placeholder.get()
    }

    fn layout(&self) -> LayoutFuture {
        self.layout_calls.set(self.layout_calls.get() + 1);
        let script = self
            .layout_scripts
            .borrow_mut()
            .pop_front()
            .unwrap_or(LayoutScript::Succeed);
        match script {
            LayoutScript::Succeed => Box::pin(async { Ok::<(), LayoutError>(()) }),
            LayoutScript::Fail(err) => Box::pin(async move { Err(err) }),
            LayoutScript::Defer => {
                let state = Rc::new(RefCell::new(DeferredState::default()));
                self.deferred.borrow_mut().push_back(Rc::clone(&state));
                Box::pin(DeferredLayout { state })
            }
        }
    }

    fn is_relayout_needed(&self) -> bool {
        self.relayout_needed.get()
    }

    fn change_size(&self, change: SizeChange) {
        self.size_changes.borrow_mut().push(change);
    }

    fn pause(&self) {
        self.pause_calls.set(self.pause_calls.get() + 1);
    }

    fn resume(&self) {
        self.resume_calls.set(self.resume_calls.get() + 1);
    }

    fn unlayout(&self) -> bool {
        self.unlayout_calls.set(self.unlayout_calls.get() + 1);
        self.unlayout_result.get()
    }

    fn unlayout_on_pause(&self) -> bool {
        self.unlayout_on_pause.get()
    }

    fn disconnected(&self) {
        self.disconnect_calls.set(self.disconnect_calls.get() + 1);
    }

    fn viewport_changed(&self, in_viewport: bool) {
        self.viewport_events.borrow_mut().push(in_viewport);
    }

    fn render_policy(&self) -> RenderPolicy {
        self.render_policy.get()
    }

    fn idle_render_policy(&self) -> RenderPolicy {
        self.idle_policy.get()
    }

    fn layout_priority(&self) -> i32 {
        self.priority.get()
    }

    fn update_layout_box(&self, layout_box: Rect, size_changed: bool) {
        self.layout_boxes
            .borrow_mut()
            .push((layout_box, size_changed));
    }

    fn set_visible(&self, visible: bool) {
        self.visibility.borrow_mut().push(visible);
    }

    fn toggle_placeholder(&self, show: bool) {
        self.placeholder_toggles.borrow_mut().push(show);
    }

    fn collapsed(&self, child: NodeId) {
        self.collapsed_children.borrow_mut().push(child);
    }

    fn prerender_allowed(&self) -> bool {
        self.prerender.get()
    }
}
