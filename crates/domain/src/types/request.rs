//! Outgoing request description

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::errors::{CallError, Result};
use crate::impl_wire_name_conversions;

/// HTTP method of a [`Request`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    #[default]
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
}

impl_wire_name_conversions!(Method {
    Get => "GET",
    Post => "POST",
    Put => "PUT",
    Delete => "DELETE",
    Patch => "PATCH",
    Head => "HEAD",
    Options => "OPTIONS",
});

/// A request as seen by a call and its callbacks.
///
/// Headers are kept sorted by name so two equal requests always render
/// identically in logs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    pub method: Method,
    pub url: Url,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    #[serde(default)]
    pub body: Option<String>,
}

impl Request {
    pub fn new(method: Method, url: Url) -> Self {
        Self { method, url, headers: BTreeMap::new(), body: None }
    }

    /// Build a GET request from a URL string.
    ///
    /// # Errors
    /// Returns `CallError::InvalidArgument` if `url` does not parse.
    pub fn get(url: &str) -> Result<Self> {
        Self::parse(Method::Get, url)
    }

    /// Build a request from a method and URL string.
    ///
    /// # Errors
    /// Returns `CallError::InvalidArgument` if `url` does not parse.
    pub fn parse(method: Method, url: &str) -> Result<Self> {
        let url = Url::parse(url)
            .map_err(|e| CallError::InvalidArgument(format!("invalid url '{url}': {e}")))?;
        Ok(Self::new(method, url))
    }

    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }
}

impl std::fmt::Display for Request {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.method, self.url)
    }
}
