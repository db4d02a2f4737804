//! HTTP delegate
//!
//! [`HttpClient`] wraps a reqwest client plus the runtime its requests run
//! on. [`HttpCall`] is the one-shot [`Call`](callhop_core::Call) it hands
//! out.

pub mod call;
pub mod client;

pub use call::HttpCall;
pub use client::{HttpClient, HttpClientBuilder};
