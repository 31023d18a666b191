// src/github/content.rs
// =============================================================================
// Downloads the text of a single markdown file.
//
// Two ways to get it:
// 1. Public repos: the listing gives a raw `download_url`. We GET it with NO
//    headers - sending the token to raw.githubusercontent.com can get the
//    request rejected.
// 2. Private repos: `download_url` is null. We GET the entry's API url with
//    the token and decode the base64 `content` field.
//
// Failures here are never fatal. We log a warning and return None, and the
// walker simply leaves the file out.
// =============================================================================

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Deserialize;
use tracing::warn;

use super::transport::{HttpRequest, Transport};
use super::types::{ContentSource, RemoteEntry};

// Body of GET /repos/{owner}/{repo}/contents/{file}
#[derive(Debug, Deserialize)]
struct FileMetadata {
    content: Option<String>,
    encoding: Option<String>,
}

// Fetches the raw text for one file entry
//
// Returns: Some(text) on success, None if the file should be skipped
pub async fn retrieve_content(
    transport: &dyn Transport,
    entry: &RemoteEntry,
    credential: Option<&str>,
) -> Option<String> {
    match &entry.source {
        ContentSource::DirectlyDownloadable(url) => {
            let response = match transport.get(HttpRequest::plain(url.as_str())).await {
                Ok(r) => r,
                Err(e) => {
                    warn!(file = %entry.path, error = %e, "failed to fetch content");
                    return None;
                }
            };
            if !response.is_success() {
                warn!(file = %entry.path, status = response.status, "failed to fetch content");
                return None;
            }
            Some(response.body)
        }
        ContentSource::RequiresAuthenticatedMetadataFetch(api_url) => {
            let response = match transport.get(HttpRequest::api(api_url.as_str(), credential)).await {
                Ok(r) => r,
                Err(e) => {
                    warn!(file = %entry.path, error = %e, "failed to fetch content metadata");
                    return None;
                }
            };
            if !response.is_success() {
                warn!(file = %entry.path, status = response.status, "failed to fetch content metadata");
                return None;
            }

            let metadata: FileMetadata = match response.json() {
                Ok(m) => m,
                Err(e) => {
                    warn!(file = %entry.path, error = %e, "could not read content metadata");
                    return None;
                }
            };
            let decoded = match (metadata.content, metadata.encoding.as_deref()) {
                (Some(content), Some("base64")) => decode_base64(&content),
                _ => None,
            };
            if decoded.is_none() {
                warn!(file = %entry.path, "could not retrieve content from API");
            }
            decoded
        }
    }
}

// GitHub wraps base64 payloads at 60 columns, so strip whitespace first.
// Invalid UTF-8 sequences are replaced rather than dropping the whole file.
fn decode_base64(payload: &str) -> Option<String> {
    let compact: String = payload.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = STANDARD.decode(compact).ok()?;
    Some(String::from_utf8_lossy(&bytes).into_owned())
}
