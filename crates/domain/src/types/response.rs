//! Response delivered to a callback

use std::collections::BTreeMap;

/// An HTTP response with an optionally decoded body.
///
/// Successful (2xx) responses carry the decoded `body`; error responses keep
/// the raw payload in `error_body` so callers can inspect it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response<T> {
    pub status: u16,
    /// Reason phrase, e.g. `"OK"` or `"Not Found"`
    pub message: String,
    pub headers: BTreeMap<String, String>,
    pub body: Option<T>,
    pub error_body: Option<String>,
}

impl<T> Response<T> {
    /// A `200 OK` response carrying `body`.
    pub fn success(body: T) -> Self {
        Self::success_with(200, Some(body))
    }

    /// A successful response with an explicit status and optional body.
    pub fn success_with(status: u16, body: Option<T>) -> Self {
        Self {
            status,
            message: reason_phrase(status).to_string(),
            headers: BTreeMap::new(),
            body,
            error_body: None,
        }
    }

    /// A non-2xx response carrying the raw error payload.
    pub fn error(status: u16, error_body: impl Into<String>) -> Self {
        Self {
            status,
            message: reason_phrase(status).to_string(),
            headers: BTreeMap::new(),
            body: None,
            error_body: Some(error_body.into()),
        }
    }

    #[must_use]
    pub fn with_headers(mut self, headers: BTreeMap<String, String>) -> Self {
        self.headers = headers;
        self
    }

    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// True for statuses in `200..300`.
    pub const fn is_successful(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    pub const fn body(&self) -> Option<&T> {
        self.body.as_ref()
    }

    pub fn into_body(self) -> Option<T> {
        self.body
    }
}

/// Canonical reason phrase for the statuses callhop commonly sees.
pub fn reason_phrase(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        202 => "Accepted",
        204 => "No Content",
        205 => "Reset Content",
        301 => "Moved Permanently",
        302 => "Found",
        304 => "Not Modified",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        409 => "Conflict",
        422 => "Unprocessable Entity",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        504 => "Gateway Timeout",
        _ => "",
    }
}
