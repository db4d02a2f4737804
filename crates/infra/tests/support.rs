#![allow(dead_code)]

use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

use callhop_core::{BoxCallback, Call, Callback};
use callhop_domain::{CallError, DispatchConfig, HttpConfig, Request, Response};
use callhop_infra::{CallbackRuntime, HttpClient};
use serde::Deserialize;
use tokio::runtime::{Builder, Runtime};
use wiremock::MockServer;

pub const CALLBACK_THREAD: &str = "it-callback";
pub const WAIT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Widget {
    pub id: u32,
    pub name: String,
}

/// Network runtime, mock server and callback runtime for one test.
///
/// Tests run on a plain thread so both runtimes can be dropped safely.
pub struct TestEnv {
    pub server: MockServer,
    pub client: HttpClient,
    pub callbacks: Option<CallbackRuntime>,
    io: Runtime,
}

impl TestEnv {
    pub fn new() -> Self {
        let io = Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .expect("io runtime should start");
        let server = io.block_on(MockServer::start());
        let config = HttpConfig { timeout_secs: 5, ..HttpConfig::default() };
        let client =
            HttpClient::from_config(&config, io.handle().clone()).expect("client should build");
        let callbacks = CallbackRuntime::new(&DispatchConfig {
            worker_threads: 1,
            thread_name: CALLBACK_THREAD.to_string(),
        })
        .expect("callback runtime should start");

        Self { server, client, callbacks: Some(callbacks), io }
    }

    pub fn block_on<F: std::future::Future>(&self, future: F) -> F::Output {
        self.io.block_on(future)
    }

    pub fn url(&self, path: &str) -> Request {
        Request::get(&format!("{}{}", self.server.uri(), path)).expect("mock server url")
    }

    pub fn callbacks(&self) -> &CallbackRuntime {
        self.callbacks.as_ref().expect("callback runtime still running")
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TestEnv {
    fn drop(&mut self) {
        if let Some(callbacks) = self.callbacks.take() {
            callbacks.shutdown(Duration::from_secs(1));
        }
    }
}

/// What a [`Probe`] callback observed.
#[derive(Debug)]
pub struct Observed<T> {
    pub outcome: Result<Response<T>, CallError>,
    pub thread: Option<String>,
    pub call_canceled: bool,
}

/// Receiving end of a callback that reports over a channel.
pub struct Probe<T> {
    rx: Receiver<Observed<T>>,
}

impl<T: Send + 'static> Probe<T> {
    pub fn new() -> (Self, BoxCallback<T>) {
        let (tx, rx) = mpsc::channel();
        (Self { rx }, Box::new(ProbeCallback { tx }))
    }

    pub fn wait(&self) -> Observed<T> {
        self.rx.recv_timeout(WAIT).expect("callback should fire")
    }

    /// Nothing else arrives within a short grace period.
    pub fn assert_quiet(&self) {
        assert!(self.rx.recv_timeout(Duration::from_millis(200)).is_err());
    }
}

struct ProbeCallback<T> {
    tx: Sender<Observed<T>>,
}

impl<T: Send> ProbeCallback<T> {
    fn report(self, call: &dyn Call<T>, outcome: Result<Response<T>, CallError>) {
        let observed = Observed {
            outcome,
            thread: thread::current().name().map(str::to_string),
            call_canceled: call.is_canceled(),
        };
        let _ = self.tx.send(observed);
    }
}

impl<T: Send> Callback<T> for ProbeCallback<T> {
    fn on_response(self: Box<Self>, call: &dyn Call<T>, response: Response<T>) {
        self.report(call, Ok(response));
    }

    fn on_failure(self: Box<Self>, call: &dyn Call<T>, error: CallError) {
        self.report(call, Err(error));
    }
}
