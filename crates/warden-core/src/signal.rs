//! One-shot, single-producer, multi-consumer completion signal.
//!
//! A [`SignalResolver`] settles the signal at most once: either by resolving it
//! or, when dropped unresolved, by cancelling it. Any number of [`Signal`]
//! clones can await the outcome.

use crate::SignalCancelled;
use smallvec::SmallVec;
use std::cell::RefCell;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Status {
    Pending,
    Resolved,
    Cancelled,
}

struct SignalState {
    status: Status,
    wakers: SmallVec<[Waker; 2]>,
}

impl SignalState {
    fn new(status: Status) -> Self {
        Self {
            status,
            wakers: SmallVec::new(),
        }
    }
}

/// Creates a pending signal and the resolver that settles it.
pub fn signal() -> (SignalResolver, Signal) {
    let state = Rc::new(RefCell::new(SignalState::new(Status::Pending)));
    (
        SignalResolver {
            state: Some(Rc::clone(&state)),
        },
        Signal { state },
    )
}

/// Producer half. Not cloneable.
pub struct SignalResolver {
    state: Option<Rc<RefCell<SignalState>>>,
}

impl SignalResolver {
    pub fn resolve(mut self) {
        self.settle(Status::Resolved);
    }

    pub fn cancel(mut self) {
        self.settle(Status::Cancelled);
    }

    fn settle(&mut self, status: Status) {
        let Some(state) = self.state.take() else {
            return;
        };
        let wakers = {
            let mut state = state.borrow_mut();
            if state.status != Status::Pending {
                return;
            }
            state.status = status;
            std::mem::take(&mut state.wakers)
        };
        for waker in wakers {
            waker.wake();
        }
    }
}

impl Drop for SignalResolver {
    fn drop(&mut self) {
        self.settle(Status::Cancelled);
    }
}

/// Consumer half. Clones observe the same outcome.
#[derive(Clone)]
pub struct Signal {
    state: Rc<RefCell<SignalState>>,
}

impl Signal {
    /// A signal that is already resolved.
    pub fn resolved() -> Self {
        Self {
            state: Rc::new(RefCell::new(SignalState::new(Status::Resolved))),
        }
    }

    /// A signal that is already cancelled.
    pub fn cancelled() -> Self {
        let (resolver, signal) = signal();
        resolver.cancel();
        signal
    }

    pub fn is_pending(&self) -> bool {
        self.state.borrow().status == Status::Pending
    }

    pub fn is_resolved(&self) -> bool {
        self.state.borrow().status == Status::Resolved
    }

    pub fn is_cancelled(&self) -> bool {
        self.state.borrow().status == Status::Cancelled
    }

    /// True when both handles observe the same underlying signal.
    pub fn ptr_eq(&self, other: &Signal) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }
}

impl std::fmt::Debug for Signal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("status", &self.state.borrow().status)
            .finish()
    }
}

impl Future for Signal {
    type Output = Result<(), SignalCancelled>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut state = self.state.borrow_mut();
        match state.status {
            Status::Resolved => Poll::Ready(Ok(())),
            Status::Cancelled => Poll::Ready(Err(SignalCancelled)),
            Status::Pending => {
                if !state.wakers.iter().any(|w| w.will_wake(cx.waker())) {
                    state.wakers.push(cx.waker().clone());
                }
                Poll::Pending
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/signal_tests.rs"]
mod tests;
