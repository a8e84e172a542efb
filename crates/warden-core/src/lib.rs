//! Lifecycle core for independently owned items hosted in a page.
//!
//! Each registered item gets a [`Resource`]: a state machine deciding when the
//! item may be built, measured, laid out, paused, resumed or torn down, and
//! whether it should be rendered before it scrolls into view. The page-wide
//! scheduler drives resources through a [`ResourceHost`]; the item itself and
//! the viewport are reached only through the [`Item`], [`ViewportProvider`]
//! and [`DocumentTree`] traits.

mod error;
pub mod fixed;
pub mod host;
mod item;
mod layout;
pub mod ownership;
pub mod proximity;
mod resource;
pub mod signal;
mod state;
mod viewport;

pub use error::{BuildError, LayoutError, OwnershipError, ResourceError, SignalCancelled};
pub use host::{HostConfig, HostHandle, ResourceHost};
pub use item::{Item, LayoutFuture, NodeId, RenderPolicy, SizeChange};
pub use layout::LayoutCompletion;
pub use ownership::OwnershipRegistry;
pub use proximity::{ProximityConfig, ScrollDirection};
pub use resource::{Resource, ResourceId};
pub use signal::{Signal, SignalResolver};
pub use state::ResourceState;
pub use viewport::{DocumentTree, ViewportProvider};

pub use warden_geometry::{Margins, Point, Rect, Size};
