//! Tokio-backed executors
//!
//! [`TokioExecutor`] submits callback tasks to an existing runtime.
//! [`CallbackRuntime`] owns a small runtime dedicated to callbacks, so user
//! code never runs on the threads that drive network I/O.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use callhop_core::{Executor, Task};
use callhop_domain::{CallError, DispatchConfig, Result};
use tokio::runtime::{Builder, Handle, Runtime};
use tracing::{info, instrument};

/// Runs each task as a tokio task on `handle`.
#[derive(Clone)]
pub struct TokioExecutor {
    handle: Handle,
}

impl TokioExecutor {
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Executor bound to the runtime the caller is running on.
    ///
    /// # Errors
    /// Returns `CallError::Config` when called outside a tokio runtime.
    pub fn current() -> Result<Self> {
        Handle::try_current()
            .map(Self::new)
            .map_err(|err| CallError::Config(format!("No tokio runtime available: {err}")))
    }

    pub fn handle(&self) -> &Handle {
        &self.handle
    }
}

impl Executor for TokioExecutor {
    fn execute(&self, task: Task) {
        // A runtime that already shut down drops the task, and with it the
        // callback it carries.
        drop(self.handle.spawn(async move { task() }));
    }
}

impl fmt::Debug for TokioExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokioExecutor").field("runtime", &self.handle.runtime_flavor()).finish()
    }
}

/// Dedicated multi-thread runtime that callbacks are delivered on.
///
/// Must be created and shut down outside of an async context; tokio refuses
/// to drop a runtime from within another one.
pub struct CallbackRuntime {
    runtime: Runtime,
    executor: Arc<TokioExecutor>,
    thread_name: String,
}

impl CallbackRuntime {
    /// Build a runtime sized and named from `config`.
    ///
    /// # Errors
    /// Returns `CallError::Config` if `worker_threads` is zero, the thread
    /// name is blank, or the runtime cannot be started.
    #[instrument(skip_all, fields(
        worker_threads = config.worker_threads,
        thread_name = %config.thread_name
    ))]
    pub fn new(config: &DispatchConfig) -> Result<Self> {
        if config.worker_threads == 0 {
            return Err(CallError::Config(
                "dispatch.worker_threads must be at least 1".to_string(),
            ));
        }
        if config.thread_name.trim().is_empty() {
            return Err(CallError::Config("dispatch.thread_name must not be empty".to_string()));
        }

        let runtime = Builder::new_multi_thread()
            .worker_threads(config.worker_threads)
            .thread_name(config.thread_name.clone())
            .enable_all()
            .build()
            .map_err(|err| CallError::Config(format!("Failed to start callback runtime: {err}")))?;

        let executor = Arc::new(TokioExecutor::new(runtime.handle().clone()));
        info!("callback runtime started");

        Ok(Self { runtime, executor, thread_name: config.thread_name.clone() })
    }

    /// Shared executor submitting to this runtime.
    pub fn executor(&self) -> Arc<TokioExecutor> {
        Arc::clone(&self.executor)
    }

    pub fn handle(&self) -> &Handle {
        self.runtime.handle()
    }

    pub fn thread_name(&self) -> &str {
        &self.thread_name
    }

    /// Stop the runtime, waiting up to `timeout` for running callbacks.
    ///
    /// Tasks submitted afterwards are dropped without running.
    #[instrument(skip(self), fields(thread_name = %self.thread_name))]
    pub fn shutdown(self, timeout: Duration) {
        let Self { runtime, .. } = self;
        runtime.shutdown_timeout(timeout);
        info!(?timeout, "callback runtime stopped");
    }
}

impl fmt::Debug for CallbackRuntime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackRuntime")
            .field("thread_name", &self.thread_name)
            .finish_non_exhaustive()
    }
}
