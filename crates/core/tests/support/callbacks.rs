//! Callback that records each delivery.

use std::sync::Arc;
use std::thread::{self, ThreadId};

use callhop_core::{BoxCallback, Call, Callback};
use callhop_domain::{CallError, Request, Response, Result};
use parking_lot::Mutex;

/// One callback invocation as observed by the test.
#[derive(Debug)]
pub struct Delivery<T> {
    pub outcome: Result<Response<T>>,
    pub thread: ThreadId,
    /// Request reported by the `call` argument the callback received.
    pub request: Request,
    /// Cancellation state of the `call` argument at delivery time.
    pub call_canceled: bool,
}

/// Hands out recording callbacks and collects what they receive.
pub struct Recorder<T> {
    deliveries: Arc<Mutex<Vec<Delivery<T>>>>,
}

impl<T> Clone for Recorder<T> {
    fn clone(&self) -> Self {
        Self { deliveries: Arc::clone(&self.deliveries) }
    }
}

impl<T: Send + 'static> Recorder<T> {
    pub fn new() -> Self {
        Self { deliveries: Arc::new(Mutex::new(Vec::new())) }
    }

    pub fn callback(&self) -> BoxCallback<T> {
        Box::new(RecordingCallback { deliveries: Arc::clone(&self.deliveries) })
    }

    pub fn len(&self) -> usize {
        self.deliveries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The one and only delivery; panics if there were zero or several.
    pub fn single(&self) -> Delivery<T> {
        let mut deliveries = self.deliveries.lock();
        assert_eq!(deliveries.len(), 1, "expected exactly one callback invocation");
        deliveries.remove(0)
    }
}

struct RecordingCallback<T> {
    deliveries: Arc<Mutex<Vec<Delivery<T>>>>,
}

impl<T: Send> RecordingCallback<T> {
    fn record(&self, call: &dyn Call<T>, outcome: Result<Response<T>>) {
        self.deliveries.lock().push(Delivery {
            outcome,
            thread: thread::current().id(),
            request: call.request().clone(),
            call_canceled: call.is_canceled(),
        });
    }
}

impl<T: Send> Callback<T> for RecordingCallback<T> {
    fn on_response(self: Box<Self>, call: &dyn Call<T>, response: Response<T>) {
        self.record(call, Ok(response));
    }

    fn on_failure(self: Box<Self>, call: &dyn Call<T>, error: CallError) {
        self.record(call, Err(error));
    }
}
