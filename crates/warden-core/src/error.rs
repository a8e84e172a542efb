use crate::{NodeId, ResourceState};
use std::rc::Rc;
use thiserror::Error;

/// Synchronous precondition failures raised by [`crate::Resource::start_layout`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResourceError {
    #[error("not ready to start layout: {debug_id} ({state:?})")]
    InvalidState {
        debug_id: String,
        state: ResourceState,
    },
    #[error("not displayed for layout: {debug_id}")]
    NotDisplayed { debug_id: String },
}

/// Failure reported by an item's layout procedure.
///
/// Clones share one allocation so the error recorded on a resource and the one
/// handed to the caller of the failed attempt are the same object.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct LayoutError {
    message: Rc<str>,
}

impl LayoutError {
    pub fn new(message: impl Into<String>) -> Self {
        let message: String = message.into();
        Self {
            message: Rc::from(message),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Identity comparison: true only for clones of the same error.
    pub fn ptr_eq(&self, other: &LayoutError) -> bool {
        Rc::ptr_eq(&self.message, &other.message)
    }
}

/// Failure reported by an item's build procedure. Never propagated past the
/// resource; it only blacklists it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("build failed: {0}")]
pub struct BuildError(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum OwnershipError {
    #[error("owner {owner} must contain {node}")]
    NotContained { node: NodeId, owner: NodeId },
}

/// A one-shot signal whose producer went away before resolving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("signal cancelled before it resolved")]
pub struct SignalCancelled;
