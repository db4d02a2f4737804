use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use callhop_domain::{CallError, HttpConfig, Method, Request, Response, Result};
use reqwest::header::HeaderMap;
use reqwest::{Client as ReqwestClient, StatusCode};
use serde::de::DeserializeOwned;
use tokio::runtime::Handle;
use tracing::{debug, instrument};

use super::call::HttpCall;

/// HTTP client bound to the runtime its requests execute on.
#[derive(Clone)]
pub struct HttpClient {
    client: ReqwestClient,
    runtime: Handle,
    timeout: Duration,
}

impl HttpClient {
    /// Start building a new HTTP client.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Client configured from `config`, running requests on `runtime`.
    pub fn from_config(config: &HttpConfig, runtime: Handle) -> Result<Self> {
        Self::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .runtime(runtime)
            .build()
    }

    /// A fresh, unexecuted call for `request`.
    pub fn new_call<T>(&self, request: Request) -> HttpCall<T>
    where
        T: DeserializeOwned + Send + 'static,
    {
        HttpCall::new(self.clone(), request)
    }

    pub fn runtime(&self) -> &Handle {
        &self.runtime
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Send `request` and decode the response.
    ///
    /// 2xx bodies are decoded as JSON into `T`; `204`/`205` and empty bodies
    /// decode to `None`. Other statuses keep their body as `error_body`.
    #[instrument(skip_all, fields(method = %request.method, url = %request.url))]
    pub(crate) async fn fetch<T: DeserializeOwned>(&self, request: &Request) -> Result<Response<T>> {
        let built = self.build_request(request)?;
        debug!("sending HTTP request");

        let response = self.client.execute(built).await.map_err(|err| self.map_error(err))?;
        let status = response.status();
        let headers = collect_headers(response.headers());
        let message = status.canonical_reason().unwrap_or_default().to_string();
        let bytes = response.bytes().await.map_err(|err| self.map_error(err))?;
        debug!(%status, len = bytes.len(), "received HTTP response");

        if !status.is_success() {
            let error_body = String::from_utf8_lossy(&bytes).into_owned();
            return Ok(Response::error(status.as_u16(), error_body)
                .with_headers(headers)
                .with_message(message));
        }

        let body = if is_bodiless(status) || bytes.is_empty() {
            None
        } else {
            let decoded = serde_json::from_slice(&bytes)
                .map_err(|err| CallError::Decode(format!("Invalid JSON body: {err}")))?;
            Some(decoded)
        };

        Ok(Response::success_with(status.as_u16(), body).with_headers(headers).with_message(message))
    }

    fn build_request(&self, request: &Request) -> Result<reqwest::Request> {
        let mut builder = self.client.request(to_reqwest_method(request.method), request.url.clone());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }
        builder
            .build()
            .map_err(|err| CallError::InvalidArgument(format!("Invalid request {request}: {err}")))
    }

    fn map_error(&self, err: reqwest::Error) -> CallError {
        if err.is_timeout() {
            return CallError::Timeout(self.timeout);
        }
        if err.is_decode() {
            return CallError::Decode(err.to_string());
        }
        if err.is_connect() {
            return CallError::Network(format!("HTTP connection failure: {err}"));
        }
        CallError::Network(format!("HTTP request failed: {err}"))
    }
}

impl fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpClient").field("timeout", &self.timeout).finish_non_exhaustive()
    }
}

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Duration,
    user_agent: Option<String>,
    default_headers: Option<HeaderMap>,
    runtime: Option<Handle>,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        let defaults = HttpConfig::default();
        Self {
            timeout: Duration::from_secs(defaults.timeout_secs),
            user_agent: Some(defaults.user_agent),
            default_headers: None,
            runtime: None,
        }
    }
}

impl HttpClientBuilder {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    pub fn default_headers(mut self, headers: HeaderMap) -> Self {
        self.default_headers = Some(headers);
        self
    }

    /// Runtime requests are spawned on. Defaults to the current runtime.
    pub fn runtime(mut self, runtime: Handle) -> Self {
        self.runtime = Some(runtime);
        self
    }

    /// # Errors
    /// Returns `CallError::Config` if no runtime was given and none is
    /// current, or if the underlying client cannot be built.
    pub fn build(self) -> Result<HttpClient> {
        let runtime = match self.runtime {
            Some(handle) => handle,
            None => Handle::try_current().map_err(|err| {
                CallError::Config(format!("HTTP client needs a tokio runtime: {err}"))
            })?,
        };

        let mut builder = ReqwestClient::builder().timeout(self.timeout).no_proxy();

        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }

        if let Some(headers) = self.default_headers {
            builder = builder.default_headers(headers);
        }

        let client = builder
            .build()
            .map_err(|err| CallError::Config(format!("Failed to build HTTP client: {err}")))?;

        Ok(HttpClient { client, runtime, timeout: self.timeout })
    }
}

fn to_reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Delete => reqwest::Method::DELETE,
        Method::Patch => reqwest::Method::PATCH,
        Method::Head => reqwest::Method::HEAD,
        Method::Options => reqwest::Method::OPTIONS,
    }
}

fn is_bodiless(status: StatusCode) -> bool {
    status == StatusCode::NO_CONTENT || status == StatusCode::RESET_CONTENT
}

// Non-UTF-8 header values are skipped; repeated headers keep the last value.
fn collect_headers(headers: &HeaderMap) -> BTreeMap<String, String> {
    headers
        .iter()
        .filter_map(|(name, value)| {
            value.to_str().ok().map(|value| (name.as_str().to_string(), value.to_string()))
        })
        .collect()
}
