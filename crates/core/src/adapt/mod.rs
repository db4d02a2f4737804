//! Awaitable calls
//!
//! [`CallAdapterFactory`] turns a callback-style [`Call`] into a future. The
//! call is wrapped in an [`ExecutorCallbackCall`] so completion is still
//! observed on the factory's executor before the future is woken.
//!
//! Two shapes are offered:
//! - [`CallAdapterFactory::response`] resolves to the full [`Response`],
//!   whatever its status.
//! - [`CallAdapterFactory::body`] resolves to the decoded body of a 2xx
//!   response and turns any other status into [`CallError::Http`].
//!
//! Dropping a future before it resolves cancels the call.

use std::future::Future;
use std::mem;
use std::panic::Location;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use callhop_domain::{CallError, Response, Result};
use tokio::sync::oneshot;
use tracing::{debug, trace};

use crate::dispatch::ports::{Call, Callback, Executor};
use crate::dispatch::ExecutorCallbackCall;

type Outcome<T> = Result<Response<T>>;

/// Builds awaitable calls whose completions pass through `executor`.
#[derive(Clone)]
pub struct CallAdapterFactory {
    executor: Arc<dyn Executor>,
}

impl CallAdapterFactory {
    pub fn new(executor: Arc<dyn Executor>) -> Self {
        Self { executor }
    }

    /// Enqueue `call` and resolve to its response.
    #[track_caller]
    pub fn response<T: Send + 'static>(&self, call: Box<dyn Call<T>>) -> ResponseFuture<T> {
        let origin = Location::caller();
        let call = ExecutorCallbackCall::new(Arc::clone(&self.executor), call);
        let (tx, rx) = oneshot::channel();

        let state = match call.enqueue(Some(Box::new(SenderCallback { tx }))) {
            Ok(()) => State::Pending(rx),
            Err(err) => State::Rejected(err),
        };

        ResponseFuture { call, state, origin }
    }

    /// Enqueue `call` and resolve to the body of a successful response.
    #[track_caller]
    pub fn body<T: Send + 'static>(&self, call: Box<dyn Call<T>>) -> BodyFuture<T> {
        BodyFuture { inner: self.response(call) }
    }
}

impl std::fmt::Debug for CallAdapterFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallAdapterFactory").finish_non_exhaustive()
    }
}

struct SenderCallback<T> {
    tx: oneshot::Sender<Outcome<T>>,
}

impl<T: Send> Callback<T> for SenderCallback<T> {
    fn on_response(self: Box<Self>, _call: &dyn Call<T>, response: Response<T>) {
        if self.tx.send(Ok(response)).is_err() {
            trace!("response dropped, future no longer awaited");
        }
    }

    fn on_failure(self: Box<Self>, _call: &dyn Call<T>, error: CallError) {
        if self.tx.send(Err(error)).is_err() {
            trace!("failure dropped, future no longer awaited");
        }
    }
}

enum State<T> {
    Pending(oneshot::Receiver<Outcome<T>>),
    Rejected(CallError),
    Finished,
}

/// Future returned by [`CallAdapterFactory::response`].
#[must_use = "futures do nothing unless awaited; dropping it cancels the call"]
pub struct ResponseFuture<T> {
    call: ExecutorCallbackCall<T>,
    state: State<T>,
    origin: &'static Location<'static>,
}

impl<T> ResponseFuture<T> {
    /// The wrapped call, e.g. to cancel it while the future is shared elsewhere.
    pub fn call(&self) -> &dyn Call<T>
    where
        T: Send + 'static,
    {
        &self.call
    }

    /// Source location that created this future.
    pub fn origin(&self) -> &'static Location<'static> {
        self.origin
    }
}

impl<T> Unpin for ResponseFuture<T> {}

impl<T> Future for ResponseFuture<T> {
    type Output = Outcome<T>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();

        let outcome = match mem::replace(&mut this.state, State::Finished) {
            State::Pending(mut rx) => match Pin::new(&mut rx).poll(cx) {
                Poll::Pending => {
                    this.state = State::Pending(rx);
                    return Poll::Pending;
                }
                Poll::Ready(Ok(outcome)) => outcome,
                // Callback dropped without firing.
                Poll::Ready(Err(_)) => Err(CallError::Canceled),
            },
            State::Rejected(err) => Err(err),
            State::Finished => {
                Err(CallError::InvalidArgument("call future polled after completion".to_string()))
            }
        };

        if let Err(err) = &outcome {
            debug!(
                origin = %this.origin,
                request = %this.call.delegate().request(),
                error = %err,
                "awaited call failed"
            );
        }

        Poll::Ready(outcome)
    }
}

impl<T> Drop for ResponseFuture<T> {
    fn drop(&mut self) {
        if matches!(self.state, State::Pending(_)) {
            trace!(origin = %self.origin, "call future dropped while pending; canceling");
            self.call.delegate().cancel();
        }
    }
}

/// Future returned by [`CallAdapterFactory::body`].
#[must_use = "futures do nothing unless awaited; dropping it cancels the call"]
pub struct BodyFuture<T> {
    inner: ResponseFuture<T>,
}

impl<T> BodyFuture<T> {
    pub fn origin(&self) -> &'static Location<'static> {
        self.inner.origin
    }
}

impl<T> Future for BodyFuture<T> {
    type Output = Result<T>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        let response = match Pin::new(&mut this.inner).poll(cx) {
            Poll::Pending => return Poll::Pending,
            Poll::Ready(Err(err)) => return Poll::Ready(Err(err)),
            Poll::Ready(Ok(response)) => response,
        };

        if response.is_successful() {
            return Poll::Ready(response.body.ok_or(CallError::EmptyBody));
        }

        debug!(
            origin = %this.inner.origin,
            status = response.status,
            "awaited call returned an error status"
        );
        Poll::Ready(Err(CallError::Http { code: response.status, message: response.message }))
    }
}
