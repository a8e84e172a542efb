//! Geometric primitives: Point, Size, Rect, Margins

#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };
}

#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub const ZERO: Size = Size {
        width: 0.0,
        height: 0.0,
    };

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// A layout rectangle in left/top/width/height form.
///
/// Right and bottom edges are derived, never stored, so a snapshot can't drift
/// out of sync with its own dimensions.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const ZERO: Rect = Rect {
        left: 0.0,
        top: 0.0,
        width: 0.0,
        height: 0.0,
    };

    pub const fn ltwh(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Zero width or zero height.
    pub fn is_empty(&self) -> bool {
        self.size().is_empty()
    }

    pub fn translate(&self, dx: f32, dy: f32) -> Self {
        Self::ltwh(self.left + dx, self.top + dy, self.width, self.height)
    }

    /// Same position, zero size. Used for collapsed items.
    pub fn collapsed(&self) -> Self {
        Self::ltwh(self.left, self.top, 0.0, 0.0)
    }

    pub fn size_equals(&self, other: &Rect) -> bool {
        self.width == other.width && self.height == other.height
    }

    /// Touching edges count as overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.overlaps_horizontally(other) && self.overlaps_vertically(other)
    }

    pub fn overlaps_horizontally(&self, other: &Rect) -> bool {
        self.left <= other.right() && other.left <= self.right()
    }

    pub fn overlaps_vertically(&self, other: &Rect) -> bool {
        self.top <= other.bottom() && other.top <= self.bottom()
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.left && y >= self.top && x <= self.right() && y <= self.bottom()
    }
}

/// Margin overrides for a size change. `None` leaves the edge untouched.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Margins {
    pub top: Option<f32>,
    pub right: Option<f32>,
    pub bottom: Option<f32>,
    pub left: Option<f32>,
}

impl Margins {
    pub fn vertical(top: f32, bottom: f32) -> Self {
        Self {
            top: Some(top),
            bottom: Some(bottom),
            ..Self::default()
        }
    }

    pub fn is_unchanged(&self) -> bool {
        self.top.is_none() && self.right.is_none() && self.bottom.is_none() && self.left.is_none()
    }
}

#[cfg(test)]
#[path = "tests/geometry_tests.rs"]
mod tests;
