//! Scriptable delegate call.

use std::io;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use callhop_core::{BoxCallback, Call};
use callhop_domain::{CallError, Request, Response, Result};
use parking_lot::Mutex;

/// Delegate whose completion is triggered by the test.
///
/// `enqueue` only stores the callback; the test then calls
/// [`MockCall::complete_with_response`] or [`MockCall::complete_with_failure`]
/// from whichever thread it wants the completion to come from. Clones share
/// state, the way a test keeps a handle after boxing the call away.
pub struct MockCall<T> {
    state: Arc<MockState<T>>,
}

struct MockState<T> {
    request: Request,
    executed: AtomicBool,
    canceled: AtomicBool,
    cancel_requests: AtomicUsize,
    pending: Mutex<Option<BoxCallback<T>>>,
    execute_result: Mutex<Option<Result<Response<T>>>>,
    clones: Mutex<Vec<MockCall<T>>>,
}

impl<T> Clone for MockCall<T> {
    fn clone(&self) -> Self {
        Self { state: Arc::clone(&self.state) }
    }
}

impl<T: Send + 'static> MockCall<T> {
    pub fn new(url: &str) -> Self {
        Self::for_request(Request::get(url).expect("test url should parse"))
    }

    pub fn for_request(request: Request) -> Self {
        Self {
            state: Arc::new(MockState {
                request,
                executed: AtomicBool::new(false),
                canceled: AtomicBool::new(false),
                cancel_requests: AtomicUsize::new(0),
                pending: Mutex::new(None),
                execute_result: Mutex::new(None),
                clones: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Script the outcome of a later `execute()`.
    pub fn with_execute_result(self, result: Result<Response<T>>) -> Self {
        *self.state.execute_result.lock() = Some(result);
        self
    }

    /// Type-erased handle sharing this mock's state.
    pub fn boxed(&self) -> Box<dyn Call<T>> {
        Box::new(self.clone())
    }

    pub fn has_pending_callback(&self) -> bool {
        self.state.pending.lock().is_some()
    }

    pub fn cancel_requests(&self) -> usize {
        self.state.cancel_requests.load(Ordering::SeqCst)
    }

    /// Mocks produced by `clone_call`, oldest first.
    pub fn clones(&self) -> Vec<MockCall<T>> {
        self.state.clones.lock().clone()
    }

    /// Complete the enqueued call successfully on the current thread.
    pub fn complete_with_response(&self, response: Response<T>) {
        let callback = self.take_pending();
        callback.on_response(self, response);
    }

    /// Complete the enqueued call with a failure on the current thread.
    pub fn complete_with_failure(&self, error: CallError) {
        let callback = self.take_pending();
        callback.on_failure(self, error);
    }

    /// Drop the enqueued callback without completing it.
    pub fn abandon(&self) {
        drop(self.take_pending());
    }

    fn take_pending(&self) -> BoxCallback<T> {
        self.state.pending.lock().take().expect("no callback enqueued on mock call")
    }
}

impl<T: Send + 'static> Call<T> for MockCall<T> {
    fn enqueue(&self, callback: Option<BoxCallback<T>>) -> Result<()> {
        let callback = callback
            .ok_or_else(|| CallError::InvalidArgument("callback == null".to_string()))?;
        if self.state.executed.swap(true, Ordering::SeqCst) {
            return Err(CallError::AlreadyExecuted);
        }
        *self.state.pending.lock() = Some(callback);
        Ok(())
    }

    fn execute(&self) -> Result<Response<T>> {
        if self.state.executed.swap(true, Ordering::SeqCst) {
            return Err(CallError::AlreadyExecuted);
        }
        self.state.execute_result.lock().take().unwrap_or_else(|| {
            Err(CallError::Io(io::Error::new(io::ErrorKind::Other, "no scripted result")))
        })
    }

    fn cancel(&self) {
        self.state.cancel_requests.fetch_add(1, Ordering::SeqCst);
        self.state.canceled.store(true, Ordering::SeqCst);
    }

    fn is_canceled(&self) -> bool {
        self.state.canceled.load(Ordering::SeqCst)
    }

    fn is_executed(&self) -> bool {
        self.state.executed.load(Ordering::SeqCst)
    }

    fn clone_call(&self) -> Box<dyn Call<T>> {
        let fresh = Self::for_request(self.state.request.clone());
        self.state.clones.lock().push(fresh.clone());
        Box::new(fresh)
    }

    fn request(&self) -> &Request {
        &self.state.request
    }
}
