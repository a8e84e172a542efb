//! Render-outside-viewport heuristic.
//!
//! Decides whether an off-screen item should be rendered eagerly, based on its
//! vertical distance from the viewport, the item's declared [`RenderPolicy`]
//! and the direction the page is currently scrolling in. Only the vertical
//! axis is considered; items beside the viewport are never eager unless owned,
//! which the resource checks before consulting this module.

use crate::RenderPolicy;
use warden_geometry::Rect;

/// Tuning constants for the heuristic.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProximityConfig {
    /// Lookahead, in viewport heights, granted by `RenderPolicy::Flag(true)`.
    pub flag_viewports: f32,
    /// Divisor applied to the lookahead while scrolling away from the item.
    pub away_scroll_penalty: f32,
}

impl Default for ProximityConfig {
    fn default() -> Self {
        Self {
            flag_viewports: 2.0,
            away_scroll_penalty: 2.0,
        }
    }
}

/// Sign of the current scroll velocity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScrollDirection {
    /// Scrolling back up the page.
    Backward,
    Idle,
    /// Scrolling further down the page.
    Forward,
}

impl ScrollDirection {
    pub fn from_velocity(velocity: f32) -> Self {
        if velocity > 0.0 {
            ScrollDirection::Forward
        } else if velocity < 0.0 {
            ScrollDirection::Backward
        } else {
            ScrollDirection::Idle
        }
    }
}

/// Where a layout box sits relative to the viewport.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ViewportDistance {
    /// Overlaps the viewport.
    Inside,
    /// Entirely left or right of the viewport.
    Beside,
    /// Above or below the viewport by `distance` pixels.
    Away {
        distance: f32,
        scroll_penalty: f32,
        viewport_height: f32,
    },
}

pub fn viewport_distance(
    layout_box: &Rect,
    viewport: &Rect,
    direction: ScrollDirection,
    config: &ProximityConfig,
) -> ViewportDistance {
    if !viewport.overlaps_horizontally(layout_box) {
        return ViewportDistance::Beside;
    }
    let (distance, scrolling_away) = if viewport.bottom() < layout_box.top {
        (
            layout_box.top - viewport.bottom(),
            direction == ScrollDirection::Backward,
        )
    } else if viewport.top > layout_box.bottom() {
        (
            viewport.top - layout_box.bottom(),
            direction == ScrollDirection::Forward,
        )
    } else {
        return ViewportDistance::Inside;
    };
    ViewportDistance::Away {
        distance,
        scroll_penalty: if scrolling_away {
            config.away_scroll_penalty
        } else {
            1.0
        },
        viewport_height: viewport.height,
    }
}

/// Applies a policy to an already computed distance.
pub fn is_within_viewport_ratio(
    policy: RenderPolicy,
    distance: ViewportDistance,
    config: &ProximityConfig,
) -> bool {
    let multiplier = match policy {
        RenderPolicy::Flag(false) => 0.0,
        RenderPolicy::Flag(true) => config.flag_viewports,
        RenderPolicy::Viewports(viewports) => viewports.max(0.0),
    };
    match distance {
        ViewportDistance::Inside => true,
        ViewportDistance::Beside => false,
        ViewportDistance::Away {
            distance,
            scroll_penalty,
            viewport_height,
        } => distance < viewport_height * multiplier / scroll_penalty,
    }
}

/// Full decision for an unowned item.
pub fn should_render_outside_viewport(
    layout_box: &Rect,
    viewport: &Rect,
    policy: RenderPolicy,
    velocity: f32,
    config: &ProximityConfig,
) -> bool {
    let distance = viewport_distance(
        layout_box,
        viewport,
        ScrollDirection::from_velocity(velocity),
        config,
    );
    is_within_viewport_ratio(policy, distance, config)
}

#[cfg(test)]
#[path = "tests/proximity_tests.rs"]
mod tests;
