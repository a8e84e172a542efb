//! Pure geometry data for Warden
//!
//! Immutable rectangle snapshots handed to the lifecycle core by the viewport
//! provider and by managed items.

mod geometry;

pub use geometry::*;

pub mod prelude {
    pub use crate::geometry::{Margins, Point, Rect, Size};
}
