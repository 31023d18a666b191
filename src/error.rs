// src/error.rs
// =============================================================================
// Typed errors for everything that can abort a fetch or a credential check.
//
// The variants are what the code matches on. The #[error(...)] strings are
// the human-readable messages shown to the user; nothing inspects them.
//
// Non-fatal problems (one file that won't download, one subdirectory that
// won't list) never become a FetchError - they are logged with tracing::warn!
// and the item is left out of the result.
// =============================================================================

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    /// The URL is not a `https://github.com/<owner>/<repo>/tree/<branch>/<path>` URL
    #[error(
        "Invalid GitHub repository URL format. Expected format: \
         https://github.com/owner/repo/tree/branch/path (got '{0}')"
    )]
    InvalidUrl(String),

    /// The identity endpoint answered 401
    #[error("Authentication failed. The token is invalid or has been revoked.")]
    Auth,

    /// 404 on the root directory listing
    #[error("Repository or path not found. Please check the URL.")]
    NotFound,

    /// 403 on the root listing without a credential
    #[error(
        "GitHub API rate limit exceeded. Please connect with a GitHub token to increase your limit.{}",
        .detail.as_deref().map(|m| format!(" Message: {}", m)).unwrap_or_default()
    )]
    RateLimited { detail: Option<String> },

    /// 403 on the root listing with a credential
    #[error(
        "Your GitHub token may not have the required permissions (e.g., 'repo' scope for \
         private repos), or you've exceeded your rate limit."
    )]
    Forbidden,

    /// Any other non-2xx status on a fatal path
    #[error("{context}. Status: {status}")]
    UnexpectedStatus { status: u16, context: String },

    /// The traversal worked but found nothing to export
    #[error("No .md or .mdx files found in the specified directory (or subdirectories if enabled).")]
    NoDocumentsFound,

    /// The request never got a status back (DNS, TLS, timeout, reset...)
    #[error("Network error: {0}")]
    Network(String),

    /// A 2xx response whose body wasn't the JSON we expected
    #[error("Unexpected response from GitHub: {0}")]
    MalformedResponse(String),
}

impl FetchError {
    // True when the caller should drop any credential it has stored
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, FetchError::Auth)
    }
}
