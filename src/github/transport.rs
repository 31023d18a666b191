// src/github/transport.rs
// =============================================================================
// The one place that actually talks HTTP.
//
// Everything above this layer builds an HttpRequest (URL + the exact headers
// to send) and gets back an HttpResponse (status + body text). Keeping the
// headers explicit makes it easy to check that raw download URLs never get
// the Authorization header.
//
// The Transport trait is the seam tests plug a scripted mock into.
// =============================================================================

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tokio::sync::Semaphore;

use crate::error::FetchError;

pub const DEFAULT_API_BASE: &str = "https://api.github.com";
pub const GITHUB_ACCEPT: &str = "application/vnd.github.v3+json";
const USER_AGENT: &str = concat!("doc-exporter/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
}

impl HttpRequest {
    // A request with no headers at all (used for raw downloads)
    pub fn plain(url: impl Into<String>) -> Self {
        HttpRequest {
            url: url.into(),
            headers: Vec::new(),
        }
    }

    // A GitHub API request: Accept header, plus `Authorization: token ...`
    // when we have a credential
    pub fn api(url: impl Into<String>, credential: Option<&str>) -> Self {
        let mut headers = vec![("Accept".to_string(), GITHUB_ACCEPT.to_string())];
        if let Some(token) = credential {
            headers.push(("Authorization".to_string(), format!("token {}", token)));
        }
        HttpRequest {
            url: url.into(),
            headers,
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    // Decodes the body as JSON, reporting a MalformedResponse on failure
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, FetchError> {
        serde_json::from_str(&self.body).map_err(|e| FetchError::MalformedResponse(e.to_string()))
    }
}

// A GET-only HTTP client.
//
// Returns Err only when no status came back at all (FetchError::Network).
// Non-2xx statuses are a normal Ok(HttpResponse) - the caller decides
// whether they're fatal.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, request: HttpRequest) -> Result<HttpResponse, FetchError>;
}

/// reqwest-backed transport used by the real program.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    // GitHub refuses API requests without a User-Agent, so we always set one
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Network(e.to_string()))?;
        Ok(ReqwestTransport { client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(&self, request: HttpRequest) -> Result<HttpResponse, FetchError> {
        let mut builder = self.client.get(&request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder
            .send()
            .await
            .map_err(|e| FetchError::Network(describe_error(&request.url, &e)))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Network(describe_error(&request.url, &e)))?;

        Ok(HttpResponse { status, body })
    }
}

// Turns a reqwest error into a short, readable message
fn describe_error(url: &str, error: &reqwest::Error) -> String {
    if error.is_timeout() {
        format!("request to {} timed out", url)
    } else if error.is_connect() {
        format!("could not connect to {}", url)
    } else if error.is_redirect() {
        format!("too many redirects for {}", url)
    } else {
        format!("request to {} failed: {}", url, error)
    }
}

// Wraps another transport and caps how many requests are in flight at once.
// A permit is held only for the duration of a single GET, never across a
// recursion step, so deep trees can't starve themselves.
pub struct LimitedTransport<'a> {
    inner: &'a dyn Transport,
    permits: Semaphore,
}

impl<'a> LimitedTransport<'a> {
    pub fn new(inner: &'a dyn Transport, max_in_flight: usize) -> Self {
        LimitedTransport {
            inner,
            permits: Semaphore::new(max_in_flight.max(1)),
        }
    }
}

#[async_trait]
impl<'a> Transport for LimitedTransport<'a> {
    async fn get(&self, request: HttpRequest) -> Result<HttpResponse, FetchError> {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| FetchError::Network("request limiter closed".to_string()))?;
        self.inner.get(request).await
    }
}
