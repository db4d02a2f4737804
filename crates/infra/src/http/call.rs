//! One-shot HTTP call

use std::fmt;
use std::io;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};

use callhop_core::{BoxCallback, Call};
use callhop_domain::{CallError, Request, Response, Result};
use serde::de::DeserializeOwned;
use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};
use uuid::Uuid;

use super::client::HttpClient;

/// A single request/response exchange run on the client's runtime.
///
/// A call can be enqueued or executed once. Completion callbacks run on a
/// runtime worker thread; wrap the call in an
/// [`ExecutorCallbackCall`](callhop_core::ExecutorCallbackCall) to move them
/// elsewhere.
pub struct HttpCall<T> {
    client: HttpClient,
    request: Request,
    state: Arc<CallState>,
    _body: PhantomData<fn() -> T>,
}

struct CallState {
    id: Uuid,
    executed: AtomicBool,
    cancel: CancellationToken,
}

impl<T> HttpCall<T>
where
    T: DeserializeOwned + Send + 'static,
{
    pub(crate) fn new(client: HttpClient, request: Request) -> Self {
        let state = CallState {
            id: Uuid::new_v4(),
            executed: AtomicBool::new(false),
            cancel: CancellationToken::new(),
        };
        Self { client, request, state: Arc::new(state), _body: PhantomData }
    }

    /// Identifier attached to this call's log events.
    pub fn id(&self) -> Uuid {
        self.state.id
    }

    fn handle(&self) -> Self {
        Self {
            client: self.client.clone(),
            request: self.request.clone(),
            state: Arc::clone(&self.state),
            _body: PhantomData,
        }
    }

    fn mark_executed(&self) -> Result<()> {
        if self.state.executed.swap(true, Ordering::SeqCst) {
            return Err(CallError::AlreadyExecuted);
        }
        Ok(())
    }

    async fn run(&self) -> Result<Response<T>> {
        tokio::select! {
            biased;
            () = self.state.cancel.cancelled() => Err(CallError::Canceled),
            result = self.client.fetch::<T>(&self.request) => result,
        }
    }
}

impl<T> Call<T> for HttpCall<T>
where
    T: DeserializeOwned + Send + 'static,
{
    fn enqueue(&self, callback: Option<BoxCallback<T>>) -> Result<()> {
        let Some(callback) = callback else {
            return Err(CallError::InvalidArgument("callback == null".to_string()));
        };
        self.mark_executed()?;

        debug!(call_id = %self.state.id, request = %self.request, "call enqueued");
        let completion = Completion { call: self.handle(), callback: Some(callback) };
        drop(self.client.runtime().spawn(async move {
            let outcome = completion.call.run().await;
            completion.deliver(outcome);
        }));
        Ok(())
    }

    fn execute(&self) -> Result<Response<T>> {
        if Handle::try_current().is_ok() {
            return Err(CallError::InvalidArgument(
                "execute() blocks and cannot run inside an async context".to_string(),
            ));
        }
        self.mark_executed()?;

        debug!(call_id = %self.state.id, request = %self.request, "call executing");
        let (tx, rx) = mpsc::sync_channel(1);
        let call = self.handle();
        drop(self.client.runtime().spawn(async move {
            // The receiver only goes away if the caller stopped waiting.
            let _ = tx.send(call.run().await);
        }));

        rx.recv().map_err(|_| runtime_gone())?
    }

    fn cancel(&self) {
        if !self.state.cancel.is_cancelled() {
            debug!(call_id = %self.state.id, "call canceled");
        }
        self.state.cancel.cancel();
    }

    fn is_canceled(&self) -> bool {
        self.state.cancel.is_cancelled()
    }

    fn is_executed(&self) -> bool {
        self.state.executed.load(Ordering::SeqCst)
    }

    fn clone_call(&self) -> Box<dyn Call<T>> {
        Box::new(Self::new(self.client.clone(), self.request.clone()))
    }

    fn request(&self) -> &Request {
        &self.request
    }
}

/// Callback slot for an enqueued call.
///
/// If the task is dropped before it delivers, e.g. because the runtime shut
/// down, the callback still receives exactly one failure.
struct Completion<T>
where
    T: DeserializeOwned + Send + 'static,
{
    call: HttpCall<T>,
    callback: Option<BoxCallback<T>>,
}

impl<T> Completion<T>
where
    T: DeserializeOwned + Send + 'static,
{
    fn deliver(mut self, outcome: Result<Response<T>>) {
        let Some(callback) = self.callback.take() else {
            return;
        };
        match outcome {
            Ok(response) => {
                trace!(call_id = %self.call.state.id, status = response.status, "call completed");
                callback.on_response(&self.call, response);
            }
            Err(error) => {
                debug!(call_id = %self.call.state.id, error = %error, "call failed");
                callback.on_failure(&self.call, error);
            }
        }
    }
}

impl<T> Drop for Completion<T>
where
    T: DeserializeOwned + Send + 'static,
{
    fn drop(&mut self) {
        if let Some(callback) = self.callback.take() {
            warn!(call_id = %self.call.state.id, "call dropped by its runtime before completing");
            callback.on_failure(&self.call, runtime_gone());
        }
    }
}

fn runtime_gone() -> CallError {
    CallError::Io(io::Error::new(
        io::ErrorKind::Interrupted,
        "HTTP runtime shut down before the call completed",
    ))
}

impl<T> fmt::Debug for HttpCall<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpCall")
            .field("id", &self.state.id)
            .field("request", &self.request)
            .field("executed", &self.state.executed.load(Ordering::SeqCst))
            .field("canceled", &self.state.cancel.is_cancelled())
            .finish()
    }
}
