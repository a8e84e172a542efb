//! Deferred completion of a layout attempt.

use crate::resource::ResourceInner;
use crate::{LayoutError, LayoutFuture, Resource};
use std::future::Future;
use std::pin::Pin;
use std::rc::Weak;
use std::task::{Context, Poll};

enum CompletionState {
    Pending {
        resource: Weak<ResourceInner>,
        attempt: u64,
        future: LayoutFuture,
    },
    Settled(Result<(), LayoutError>),
}

/// Resolves when the item's layout procedure settles.
///
/// Polling drives the item's layout future; once it finishes, the owning
/// resource moves to `LayoutComplete` or `LayoutFailed` before the outcome is
/// handed back, so callers observing the result (including ones that retry
/// from inside their failure handling) always see the settled state.
pub struct LayoutCompletion {
    state: CompletionState,
}

impl LayoutCompletion {
    pub(crate) fn ready() -> Self {
        Self {
            state: CompletionState::Settled(Ok(())),
        }
    }

    pub(crate) fn pending(resource: Weak<ResourceInner>, attempt: u64, future: LayoutFuture) -> Self {
        Self {
            state: CompletionState::Pending {
                resource,
                attempt,
                future,
            },
        }
    }

    pub fn is_settled(&self) -> bool {
        matches!(self.state, CompletionState::Settled(_))
    }
}

impl Drop for LayoutCompletion {
    fn drop(&mut self) {
        if let CompletionState::Pending {
            resource, attempt, ..
        } = &self.state
        {
            if let Some(inner) = resource.upgrade() {
                Resource::from_inner(inner).layout_abandoned(*attempt);
            }
        }
    }
}

impl Future for LayoutCompletion {
    type Output = Result<(), LayoutError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        let outcome = match &mut this.state {
            CompletionState::Settled(outcome) => return Poll::Ready(outcome.clone()),
            CompletionState::Pending {
                resource,
                attempt,
                future,
            } => match future.as_mut().poll(cx) {
                Poll::Pending => return Poll::Pending,
                Poll::Ready(outcome) => {
                    if let Some(inner) = resource.upgrade() {
                        Resource::from_inner(inner).layout_settled(*attempt, &outcome);
                    }
                    outcome
                }
            },
        };
        this.state = CompletionState::Settled(outcome.clone());
        Poll::Ready(outcome)
    }
}
