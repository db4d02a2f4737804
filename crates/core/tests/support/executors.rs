//! Executor that queues work until the test drains it.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use callhop_core::{Executor, Task};
use parking_lot::Mutex;

/// Records submitted tasks and only runs them from [`RecordingExecutor::run_all`]
/// or [`RecordingExecutor::run_next`].
#[derive(Default)]
pub struct RecordingExecutor {
    queue: Mutex<VecDeque<Task>>,
    submitted: AtomicUsize,
}

impl RecordingExecutor {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Tasks submitted so far, run or not.
    pub fn submitted(&self) -> usize {
        self.submitted.load(Ordering::SeqCst)
    }

    /// Tasks waiting to run.
    pub fn pending(&self) -> usize {
        self.queue.lock().len()
    }

    /// Run the oldest queued task. Returns false if the queue was empty.
    pub fn run_next(&self) -> bool {
        // Pop before running so a task may submit more work.
        let task = self.queue.lock().pop_front();
        match task {
            Some(task) => {
                task();
                true
            }
            None => false,
        }
    }

    /// Run queued tasks until none remain; returns how many ran.
    pub fn run_all(&self) -> usize {
        let mut ran = 0;
        while self.run_next() {
            ran += 1;
        }
        ran
    }
}

impl Executor for RecordingExecutor {
    fn execute(&self, task: Task) {
        self.submitted.fetch_add(1, Ordering::SeqCst);
        self.queue.lock().push_back(task);
    }
}
