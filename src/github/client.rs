// src/github/client.rs
// =============================================================================
// A small handle bundling "how to make requests" with "which GitHub API to
// talk to", so callers don't have to pass both around.
// =============================================================================

use std::sync::Arc;
use std::time::Duration;

use super::auth;
use super::fetch;
use super::transport::{ReqwestTransport, Transport, DEFAULT_API_BASE};
use super::types::{Document, FetchConfig, UserIdentity};
use crate::error::FetchError;

#[derive(Clone)]
pub struct GithubClient {
    transport: Arc<dyn Transport>,
    api_base: String,
}

impl GithubClient {
    pub fn new(transport: Arc<dyn Transport>, api_base: impl Into<String>) -> Self {
        GithubClient {
            transport,
            api_base: api_base.into(),
        }
    }

    // reqwest client against api.github.com (or an Enterprise base URL)
    pub fn connect(api_base: Option<&str>, timeout: Duration) -> Result<Self, FetchError> {
        let transport = ReqwestTransport::new(timeout)?;
        Ok(GithubClient::new(
            Arc::new(transport),
            api_base.unwrap_or(DEFAULT_API_BASE),
        ))
    }

    pub async fn fetch_documents(
        &self,
        repo_url: &str,
        config: &FetchConfig,
    ) -> Result<Vec<Document>, FetchError> {
        fetch::fetch_documents(self.transport.as_ref(), &self.api_base, repo_url, config).await
    }

    pub async fn verify_credential(&self, token: &str) -> Result<UserIdentity, FetchError> {
        auth::verify_credential(self.transport.as_ref(), &self.api_base, token).await
    }
}
