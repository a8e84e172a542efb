//! The managed item as seen by the lifecycle core.
//!
//! The core never knows what building or laying out an item means; it only
//! drives these entry points and reads the item's declared policies.

use crate::{BuildError, LayoutError};
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use warden_geometry::{Margins, Rect};

/// Identity of an underlying document node. Items, their ancestors and their
/// owners are all addressed by `NodeId`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

/// Future returned by [`Item::layout`].
pub type LayoutFuture = Pin<Box<dyn Future<Output = Result<(), LayoutError>>>>;

/// How eagerly an item wants to be rendered while outside the viewport.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum RenderPolicy {
    /// `true` allows eager rendering within the configured flag lookahead,
    /// `false` never renders outside the viewport.
    Flag(bool),
    /// Eager up to this many viewport heights away.
    Viewports(f32),
}

impl Default for RenderPolicy {
    fn default() -> Self {
        RenderPolicy::Viewports(3.0)
    }
}

/// Requested size change forwarded verbatim to the item.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct SizeChange {
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub margins: Option<Margins>,
}

impl SizeChange {
    pub fn new(width: Option<f32>, height: Option<f32>) -> Self {
        Self {
            width,
            height,
            margins: None,
        }
    }

    pub fn with_margins(mut self, margins: Margins) -> Self {
        self.margins = Some(margins);
        self
    }
}

pub trait Item {
    fn node(&self) -> NodeId;

    /// Used for debug and task identifiers.
    fn tag_name(&self) -> &str;

    /// Whether the item's full behavior is resolvable.
    fn is_upgraded(&self) -> bool;

    fn is_built(&self) -> bool;

    fn build(&self) -> Result<(), BuildError>;

    /// Native page-relative bounding rectangle. `None` when the item is
    /// detached or otherwise unmeasurable.
    fn bounding_rect(&self) -> Option<Rect>;

    fn is_placeholder(&self) -> bool {
        false
    }

    fn layout(&self) -> LayoutFuture;

    /// Opt-in to relayout when the layout box changes after a layout.
    fn is_relayout_needed(&self) -> bool {
        false
    }

    fn change_size(&self, change: SizeChange);

    fn pause(&self) {}

    fn resume(&self) {}

    /// Returns `true` when the item released its layout.
    fn unlayout(&self) -> bool {
        false
    }

    fn unlayout_on_pause(&self) -> bool {
        false
    }

    fn disconnected(&self) {}

    fn viewport_changed(&self, _in_viewport: bool) {}

    fn render_policy(&self) -> RenderPolicy {
        RenderPolicy::default()
    }

    fn idle_render_policy(&self) -> RenderPolicy {
        RenderPolicy::Flag(false)
    }

    fn layout_priority(&self) -> i32 {
        0
    }

    fn update_layout_box(&self, _layout_box: Rect, _size_changed: bool) {}

    fn set_visible(&self, _visible: bool) {}

    fn toggle_placeholder(&self, _show: bool) {}

    /// Called on an owner item when one of its owned children collapsed.
    fn collapsed(&self, _child: NodeId) {}

    fn prerender_allowed(&self) -> bool {
        false
    }
}
