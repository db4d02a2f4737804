//! Port interfaces for calls, callbacks and executors

use std::marker::PhantomData;

use callhop_domain::{CallError, Request, Response, Result};

/// A unit of work handed to an [`Executor`].
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Runs submitted tasks asynchronously, decoupled from the submitting thread.
///
/// Ordering across submissions is the executor's own contract. Any
/// `Fn(Task) + Send + Sync` closure is an executor.
pub trait Executor: Send + Sync {
    /// Submit `task` for execution
    fn execute(&self, task: Task);
}

impl<F> Executor for F
where
    F: Fn(Task) + Send + Sync,
{
    fn execute(&self, task: Task) {
        self(task);
    }
}

/// Receives the outcome of an enqueued [`Call`].
///
/// Both entry points consume the callback, so exactly one of them can run.
pub trait Callback<T>: Send {
    /// The call produced a response (successful or not at the HTTP level)
    fn on_response(self: Box<Self>, call: &dyn Call<T>, response: Response<T>);

    /// The call failed before a response was available
    fn on_failure(self: Box<Self>, call: &dyn Call<T>, error: CallError);
}

/// Owned, type-erased callback
pub type BoxCallback<T> = Box<dyn Callback<T>>;

/// An HTTP call that can run synchronously or asynchronously, once.
pub trait Call<T>: Send + Sync {
    /// Run the call asynchronously and report the outcome to `callback`.
    ///
    /// The callback is invoked exactly once. A `None` callback is rejected
    /// with `CallError::InvalidArgument` before anything is scheduled.
    fn enqueue(&self, callback: Option<BoxCallback<T>>) -> Result<()>;

    /// Run the call on the current thread, blocking until it completes.
    fn execute(&self) -> Result<Response<T>>;

    /// Request cancellation. Calling it more than once has no further effect.
    fn cancel(&self);

    fn is_canceled(&self) -> bool;

    /// True once `execute` or `enqueue` has been accepted.
    fn is_executed(&self) -> bool;

    /// A fresh, independent call for the same request.
    fn clone_call(&self) -> Box<dyn Call<T>>;

    /// The request this call sends.
    fn request(&self) -> &Request;
}

/// [`Callback`] built from a pair of closures.
///
/// # Examples
///
/// ```
/// use callhop_core::{BoxCallback, Call, FnCallback};
/// use callhop_domain::{CallError, Response};
///
/// let callback: BoxCallback<String> = FnCallback::boxed(
///     |_call: &dyn Call<String>, response: Response<String>| {
///         assert!(response.is_successful());
///     },
///     |_call: &dyn Call<String>, error: CallError| {
///         eprintln!("call failed: {error}");
///     },
/// );
/// # drop(callback);
/// ```
pub struct FnCallback<T, S, F> {
    on_response: S,
    on_failure: F,
    _marker: PhantomData<fn(T)>,
}

impl<T, S, F> FnCallback<T, S, F> {
    pub fn new(on_response: S, on_failure: F) -> Self
    where
        S: FnOnce(&dyn Call<T>, Response<T>) + Send + 'static,
        F: FnOnce(&dyn Call<T>, CallError) + Send + 'static,
    {
        Self { on_response, on_failure, _marker: PhantomData }
    }

    /// Build and box in one step.
    pub fn boxed(on_response: S, on_failure: F) -> BoxCallback<T>
    where
        T: 'static,
        S: FnOnce(&dyn Call<T>, Response<T>) + Send + 'static,
        F: FnOnce(&dyn Call<T>, CallError) + Send + 'static,
    {
        Box::new(Self::new(on_response, on_failure))
    }
}

impl<T, S, F> Callback<T> for FnCallback<T, S, F>
where
    S: FnOnce(&dyn Call<T>, Response<T>) + Send,
    F: FnOnce(&dyn Call<T>, CallError) + Send,
{
    fn on_response(self: Box<Self>, call: &dyn Call<T>, response: Response<T>) {
        let Self { on_response, .. } = *self;
        on_response(call, response);
    }

    fn on_failure(self: Box<Self>, call: &dyn Call<T>, error: CallError) {
        let Self { on_failure, .. } = *self;
        on_failure(call, error);
    }
}
