//! Request and response descriptions
//!
//! These are the values a call hands to its callback. They describe an HTTP
//! exchange without tying it to any particular client library.

pub mod request;
pub mod response;

pub use request::{Method, Request};
pub use response::Response;
