//! Drive futures by hand, without an executor.

use futures_task::noop_waker_ref;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

/// Polls `future` once with a no-op waker.
pub fn poll_once<F: Future + Unpin>(future: &mut F) -> Poll<F::Output> {
    let mut cx = Context::from_waker(noop_waker_ref());
    Pin::new(future).poll(&mut cx)
}

/// Polls once and panics if the future is not ready yet.
pub fn expect_ready<F: Future + Unpin>(future: &mut F) -> F::Output {
    match poll_once(future) {
        Poll::Ready(output) => output,
        Poll::Pending => panic!("future is still pending"),
    }
}

pub fn assert_pending<F: Future + Unpin>(future: &mut F) {
    assert!(poll_once(future).is_pending(), "future resolved unexpectedly");
}
