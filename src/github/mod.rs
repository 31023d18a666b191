// src/github/mod.rs
// =============================================================================
// This module handles everything that talks to GitHub.
//
// Submodules:
// - url: parse ".../tree/<branch>/<path>" URLs
// - types: the data we pass around (Document, FetchConfig, ...)
// - transport: the HTTP seam (reqwest in production, a mock in tests)
// - auth: check a token via GET /user
// - content: download one file (raw URL or authenticated contents API)
// - walker: recursive, depth-bounded, concurrent directory walk
// - fetch: top-level fetch + sort + "found nothing" check
// - client: GithubClient, a convenience handle over all of the above
// =============================================================================

mod auth;
mod client;
mod content;
mod fetch;
pub mod transport;
mod types;
mod url;
mod walker;

pub use auth::verify_credential;
pub use client::GithubClient;
pub use content::retrieve_content;
pub use fetch::{collect_documents, fetch_documents, fetch_location};
pub use transport::{HttpRequest, HttpResponse, LimitedTransport, ReqwestTransport, Transport};
pub use types::{
    ContentSource, Document, EntryKind, FetchConfig, HistoryEntry, RemoteEntry, RepoLocation,
    UserIdentity,
};
pub use url::parse_repo_url;
pub use walker::TreeWalker;
