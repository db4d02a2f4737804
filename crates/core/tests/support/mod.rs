//! Shared test helpers for `callhop-core` integration tests.
//!
//! These helpers provide a scriptable delegate call, an executor that only
//! runs work when drained, and a callback that records what it was given, so
//! tests can focus on delivery behaviour instead of boilerplate.

#![allow(dead_code)]

pub mod calls;
pub mod callbacks;
pub mod executors;

#[allow(unused_imports)]
pub use callbacks::{Delivery, Recorder};
pub use calls::MockCall;
pub use executors::RecordingExecutor;
