//! Call wrapper that delivers completions on a chosen executor

use std::fmt;
use std::sync::Arc;

use callhop_domain::{CallError, Request, Response, Result};
use tracing::{debug, trace};

use super::ports::{BoxCallback, Call, Callback, Executor};

/// Wraps a delegate [`Call`] so that callbacks run on `callback_executor`
/// instead of the thread the delegate completes on.
///
/// If the delegate reports itself canceled when a successful response is
/// about to be delivered, the callback receives [`CallError::Canceled`]
/// instead. Failures are delivered as-is without re-checking cancellation.
pub struct ExecutorCallbackCall<T> {
    shared: Arc<Shared<T>>,
}

struct Shared<T> {
    callback_executor: Arc<dyn Executor>,
    delegate: Box<dyn Call<T>>,
}

impl<T> ExecutorCallbackCall<T> {
    pub fn new(callback_executor: Arc<dyn Executor>, delegate: Box<dyn Call<T>>) -> Self {
        Self { shared: Arc::new(Shared { callback_executor, delegate }) }
    }

    pub fn callback_executor(&self) -> &Arc<dyn Executor> {
        &self.shared.callback_executor
    }

    pub fn delegate(&self) -> &dyn Call<T> {
        self.shared.delegate.as_ref()
    }

    /// Second handle onto the same adapter, handed to callbacks as their `call`.
    fn handle(&self) -> Self {
        Self { shared: Arc::clone(&self.shared) }
    }
}

impl<T: Send + 'static> Call<T> for ExecutorCallbackCall<T> {
    fn enqueue(&self, callback: Option<BoxCallback<T>>) -> Result<()> {
        let Some(callback) = callback else {
            return Err(CallError::InvalidArgument("callback == null".to_string()));
        };

        trace!(request = %self.request(), "enqueue with executor dispatch");
        self.shared
            .delegate
            .enqueue(Some(Box::new(DispatchingCallback { call: self.handle(), callback })))
    }

    fn execute(&self) -> Result<Response<T>> {
        self.shared.delegate.execute()
    }

    fn cancel(&self) {
        self.shared.delegate.cancel();
    }

    fn is_canceled(&self) -> bool {
        self.shared.delegate.is_canceled()
    }

    fn is_executed(&self) -> bool {
        self.shared.delegate.is_executed()
    }

    // Deep clone: the copy gets its own delegate.
    fn clone_call(&self) -> Box<dyn Call<T>> {
        Box::new(Self::new(
            Arc::clone(&self.shared.callback_executor),
            self.shared.delegate.clone_call(),
        ))
    }

    fn request(&self) -> &Request {
        self.shared.delegate.request()
    }
}

impl<T> fmt::Debug for ExecutorCallbackCall<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutorCallbackCall")
            .field("request", self.shared.delegate.request())
            .field("canceled", &self.shared.delegate.is_canceled())
            .finish_non_exhaustive()
    }
}

/// Completion handler registered with the delegate.
struct DispatchingCallback<T> {
    call: ExecutorCallbackCall<T>,
    callback: BoxCallback<T>,
}

impl<T: Send + 'static> Callback<T> for DispatchingCallback<T> {
    fn on_response(self: Box<Self>, _delegate: &dyn Call<T>, response: Response<T>) {
        let Self { call, callback } = *self;
        let executor = Arc::clone(&call.shared.callback_executor);

        executor.execute(Box::new(move || {
            if call.shared.delegate.is_canceled() {
                // Cancel wins over a late success and surfaces as an I/O-class failure.
                debug!(request = %call.request(), "response arrived after cancel");
                callback.on_failure(&call, CallError::Canceled);
            } else {
                trace!(request = %call.request(), status = response.status, "delivering response");
                callback.on_response(&call, response);
            }
        }));
    }

    fn on_failure(self: Box<Self>, _delegate: &dyn Call<T>, error: CallError) {
        let Self { call, callback } = *self;
        let executor = Arc::clone(&call.shared.callback_executor);

        executor.execute(Box::new(move || {
            trace!(request = %call.request(), error = %error, "delivering failure");
            callback.on_failure(&call, error);
        }));
    }
}
