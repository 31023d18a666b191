// src/github/types.rs
// =============================================================================
// Plain data types shared by the fetcher, the exporter and the CLI.
//
// - RepoLocation: what we parsed out of the user's URL
// - RemoteEntry: one item of a GitHub directory listing (only lives during
//   traversal)
// - Document: one fetched markdown file - the thing everything else consumes
// - FetchConfig: depth bound, credential, optional request cap
// - UserIdentity: who a token belongs to
// - HistoryEntry: the shape a caller can persist; we never store it ourselves
// =============================================================================

use serde::{Deserialize, Serialize};

/// Owner/repo/branch/path parsed from a `.../tree/<branch>/<path>` URL.
///
/// `root_path` has no leading or trailing slash. An empty string means the
/// repository root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoLocation {
    pub owner: String,
    pub repo: String,
    pub branch: String,
    pub root_path: String,
}

// Whether a listing entry is a file or a directory.
// GitHub also reports "symlink" and "submodule"; we don't follow those.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Dir,
    Other,
}

// How the content of a file entry can be obtained.
//
// Public repositories give us a raw download URL that must be fetched
// WITHOUT the token. Private repositories give `download_url: null`, and we
// have to go through the authenticated contents API instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentSource {
    DirectlyDownloadable(String),
    RequiresAuthenticatedMetadataFetch(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteEntry {
    pub name: String,
    /// Absolute path within the repository
    pub path: String,
    pub kind: EntryKind,
    pub html_url: String,
    pub source: ContentSource,
}

// Raw JSON shape of one listing item. Converted to RemoteEntry right away so
// the `download_url == null` check happens in exactly one place.
#[derive(Debug, Deserialize)]
pub struct RawEntry {
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub download_url: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
    pub url: String,
}

impl From<RawEntry> for RemoteEntry {
    fn from(raw: RawEntry) -> Self {
        let kind = match raw.kind.as_str() {
            "file" => EntryKind::File,
            "dir" => EntryKind::Dir,
            _ => EntryKind::Other,
        };
        let source = match raw.download_url {
            Some(url) => ContentSource::DirectlyDownloadable(url),
            None => ContentSource::RequiresAuthenticatedMetadataFetch(raw.url),
        };
        RemoteEntry {
            name: raw.name,
            path: raw.path,
            kind,
            html_url: raw.html_url.unwrap_or_default(),
            source,
        }
    }
}

impl RemoteEntry {
    // Only .md and .mdx files are collected (case-sensitive, like GitHub paths)
    pub fn is_markdown_file(&self) -> bool {
        self.kind == EntryKind::File && (self.name.ends_with(".md") || self.name.ends_with(".mdx"))
    }
}

/// One fetched markdown file.
///
/// `path` is relative to the requested root path, slash separated, with no
/// leading slash. It is unique within one fetch result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub name: String,
    pub path: String,
    pub content: String,
    #[serde(rename = "url")]
    pub source_url: String,
}

impl Document {
    // Directory part of `path`; empty for documents at the root
    pub fn directory(&self) -> &str {
        match self.path.rfind('/') {
            Some(idx) => &self.path[..idx],
            None => "",
        }
    }
}

/// Settings for one `fetch_documents` call.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Root directory is depth 1
    pub max_depth: usize,
    pub credential: Option<String>,
    /// Upper bound on HTTP requests in flight at once. `None` = unbounded.
    pub max_concurrent_requests: Option<usize>,
}

impl FetchConfig {
    pub fn new(max_depth: usize, credential: Option<String>) -> Self {
        FetchConfig {
            max_depth: max_depth.max(1),
            // An empty token is the same as no token
            credential: credential.filter(|t| !t.trim().is_empty()),
            max_concurrent_requests: None,
        }
    }

    pub fn with_max_concurrent_requests(mut self, limit: Option<usize>) -> Self {
        self.max_concurrent_requests = limit.map(|n| n.max(1));
        self
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        FetchConfig::new(1, None)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub login: String,
    pub avatar_url: String,
    #[serde(rename = "html_url")]
    pub profile_url: String,
}

// What a caller may persist after a successful fetch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub repo_url: String,
    pub repo_name: String,
    pub documents: Vec<Document>,
    /// Milliseconds since the Unix epoch
    pub timestamp: u64,
}
