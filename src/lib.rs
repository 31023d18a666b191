// src/lib.rs
// =============================================================================
// Library side of doc-exporter: fetch markdown docs from a GitHub folder and
// turn them into export files.
//
// The binary (src/main.rs) is one caller of this API; anything else that can
// supply a URL, a token and a few numbers can drive it the same way.
// =============================================================================

pub mod error;
pub mod export;
pub mod github;
pub mod markdown;

pub use error::FetchError;
pub use export::{build_export_blocks, ExportBlock, ExportConfig, ExportMode};
pub use github::{fetch_documents, parse_repo_url, verify_credential, Document, FetchConfig, GithubClient};
