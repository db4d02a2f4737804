//! Callback dispatch
//!
//! [`ExecutorCallbackCall`] wraps any [`Call`](ports::Call) and re-delivers
//! its completion through an [`Executor`](ports::Executor).

pub mod executor_callback;
pub mod ports;

use ports::{Executor, Task};

pub use executor_callback::ExecutorCallbackCall;

/// Executor that runs each task immediately on the submitting thread.
///
/// Useful in tests and when the delegate already completes on the thread
/// callbacks should run on.
#[derive(Debug, Clone, Copy, Default)]
pub struct InlineExecutor;

impl Executor for InlineExecutor {
    fn execute(&self, task: Task) {
        task();
    }
}
