//! # Callhop Core
//!
//! Callback dispatch for asynchronous calls - no HTTP or runtime setup.
//!
//! This crate contains:
//! - Port interfaces: [`Call`], [`Callback`], [`Executor`]
//! - [`ExecutorCallbackCall`], which re-delivers a call's completion on a
//!   caller-chosen executor
//! - [`CallAdapterFactory`], which turns a call into an awaitable future
//!
//! ## Architecture Principles
//! - Only depends on `callhop-domain`
//! - Concrete calls and executors live in `callhop-infra` or the caller
//! - All external dependencies via traits

pub mod adapt;
pub mod dispatch;

pub use adapt::{BodyFuture, CallAdapterFactory, ResponseFuture};
pub use dispatch::ports::{BoxCallback, Call, Callback, Executor, FnCallback, Task};
pub use dispatch::{ExecutorCallbackCall, InlineExecutor};
