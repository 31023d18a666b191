// src/github/walker.rs
// =============================================================================
// Recursively walks a directory in a GitHub repository and downloads every
// markdown file it finds.
//
// How it works:
// 1. List the root directory via GET /repos/{owner}/{repo}/contents/{path}
//    - failure here is FATAL (404 -> NotFound, 403 -> RateLimited/Forbidden)
// 2. For every .md/.mdx file: download it (see content.rs)
// 3. For every subdirectory: walk it at depth + 1
//    - a subdirectory deeper than max_depth is never even listed
//    - a subdirectory that fails to list is skipped with a warning
// 4. All of step 2 and 3 for one directory run concurrently; we join them
//    before the directory counts as done
//
// Each call returns its own Vec<Document> and the parent concatenates them,
// so there is no shared list being pushed to from many tasks. Ordering is
// fixed afterwards by the collector (fetch.rs).
//
// Rust concepts:
// - BoxFuture: an async fn can't call itself directly (its future would
//   have infinite size), so the recursive step returns a boxed future
// - join_all: run a batch of futures concurrently and wait for all of them
// =============================================================================

use futures::future::{join_all, BoxFuture};
use tracing::{debug, warn};
use url::Url;

use super::content::retrieve_content;
use super::transport::{HttpRequest, HttpResponse, Transport};
use super::types::{Document, EntryKind, FetchConfig, RawEntry, RemoteEntry, RepoLocation};
use crate::error::FetchError;

pub struct TreeWalker<'a> {
    transport: &'a dyn Transport,
    api_base: &'a str,
    location: &'a RepoLocation,
    config: &'a FetchConfig,
}

impl<'a> TreeWalker<'a> {
    pub fn new(
        transport: &'a dyn Transport,
        api_base: &'a str,
        location: &'a RepoLocation,
        config: &'a FetchConfig,
    ) -> Self {
        TreeWalker {
            transport,
            api_base: api_base.trim_end_matches('/'),
            location,
            config,
        }
    }

    // Walks the whole tree under the root path
    //
    // Returns: every document found, in no particular order
    pub async fn walk(&self) -> Result<Vec<Document>, FetchError> {
        let root = self.location.root_path.as_str();
        let entries = self.list(root, true).await?;
        debug!(dir = %root, entries = entries.len(), "listed root directory");
        Ok(self.walk_entries(entries, 1).await)
    }

    // Recursive step for a subdirectory. Never fails: problems are logged
    // and the subtree comes back empty.
    fn walk_subdir(&self, path: String, depth: usize) -> BoxFuture<'_, Vec<Document>> {
        Box::pin(async move {
            if depth > self.config.max_depth {
                debug!(dir = %path, depth, "depth limit reached, not listing");
                return Vec::new();
            }

            match self.list(&path, false).await {
                Ok(entries) => {
                    debug!(dir = %path, depth, entries = entries.len(), "listed directory");
                    self.walk_entries(entries, depth).await
                }
                Err(e) => {
                    warn!(dir = %path, error = %e, "skipping directory");
                    Vec::new()
                }
            }
        })
    }

    // Fans out over one directory listing and joins the results
    async fn walk_entries(&self, entries: Vec<RemoteEntry>, depth: usize) -> Vec<Document> {
        let mut tasks: Vec<BoxFuture<'_, Vec<Document>>> = Vec::new();

        for entry in entries {
            if entry.is_markdown_file() {
                tasks.push(Box::pin(async move {
                    self.fetch_file(entry).await.into_iter().collect::<Vec<_>>()
                }));
            } else if entry.kind == EntryKind::Dir {
                tasks.push(self.walk_subdir(entry.path, depth + 1));
            }
        }

        join_all(tasks).await.into_iter().flatten().collect()
    }

    async fn fetch_file(&self, entry: RemoteEntry) -> Option<Document> {
        let Some(path) = relative_path(&entry.path, &self.location.root_path) else {
            warn!(
                file = %entry.path,
                root = %self.location.root_path,
                "entry is outside the requested folder, skipping"
            );
            return None;
        };
        let content = retrieve_content(self.transport, &entry, self.credential()).await?;
        Some(Document {
            path,
            name: entry.name,
            content,
            source_url: entry.html_url,
        })
    }

    async fn list(&self, path: &str, is_root: bool) -> Result<Vec<RemoteEntry>, FetchError> {
        let url = self.contents_url(path)?;
        let response = self
            .transport
            .get(HttpRequest::api(url, self.credential()))
            .await?;

        if !response.is_success() {
            return Err(self.listing_error(path, &response, is_root));
        }

        // A file path gives back a single object instead of an array
        let raw: Vec<RawEntry> = serde_json::from_str(&response.body).map_err(|_| {
            FetchError::MalformedResponse(format!("expected a directory listing for '{}'", path))
        })?;
        Ok(raw.into_iter().map(RemoteEntry::from).collect())
    }

    fn listing_error(&self, path: &str, response: &HttpResponse, is_root: bool) -> FetchError {
        let unexpected = || FetchError::UnexpectedStatus {
            status: response.status,
            context: format!("Failed to fetch repository contents for {}", display_path(path)),
        };

        if !is_root {
            return unexpected();
        }
        match response.status {
            404 => FetchError::NotFound,
            403 if self.credential().is_some() => FetchError::Forbidden,
            403 => FetchError::RateLimited {
                detail: api_message(&response.body),
            },
            _ => unexpected(),
        }
    }

    // GET /repos/{owner}/{repo}/contents/{path}?ref={branch}
    //
    // Every piece is escaped by `url`: a folder called "C#" or "my docs"
    // must not turn into a fragment or a broken query.
    fn contents_url(&self, path: &str) -> Result<String, FetchError> {
        let loc = self.location;
        let invalid_base = || FetchError::InvalidUrl(self.api_base.to_string());

        let mut url = Url::parse(self.api_base).map_err(|_| invalid_base())?;
        {
            let mut segments = url.path_segments_mut().map_err(|_| invalid_base())?;
            segments
                .pop_if_empty()
                .push("repos")
                .push(&loc.owner)
                .push(&loc.repo)
                .push("contents");
            if !path.is_empty() {
                segments.extend(path.split('/'));
            }
        }
        url.query_pairs_mut().clear().append_pair("ref", &loc.branch);
        Ok(url.into())
    }

    fn credential(&self) -> Option<&str> {
        self.config.credential.as_deref()
    }
}

// Strips the root path from an entry's repository path
//
// Example (root = "docs"):
//   "docs/guide/intro.md" -> Some("guide/intro.md")
//   "docsX/intro.md"      -> None (not inside "docs")
pub(crate) fn relative_path(entry_path: &str, root_path: &str) -> Option<String> {
    let entry_path = entry_path.trim_start_matches('/');
    if root_path.is_empty() {
        return Some(entry_path.to_string());
    }
    entry_path
        .strip_prefix(root_path)?
        .strip_prefix('/')
        .filter(|rest| !rest.is_empty())
        .map(str::to_string)
}

// The `message` field GitHub puts in error bodies, if there is one
fn api_message(body: &str) -> Option<String> {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()?
        .get("message")?
        .as_str()
        .map(str::to_string)
}

fn display_path(path: &str) -> &str {
    if path.is_empty() {
        "/"
    } else {
        path
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why does walk_subdir return BoxFuture instead of being an async fn?
//    - An async fn compiles to a state machine that contains the state
//      machines of everything it awaits
//    - If it awaits itself, that type would contain itself forever
//    - Box::pin puts the inner future on the heap, which breaks the cycle
//
// 2. Why join_all and not tokio::spawn?
//    - join_all polls all futures on the current task; nothing needs to be
//      'static or moved to another thread
//    - We can borrow `self` inside every child future
//
// 3. Why does every call return its own Vec?
//    - No Mutex<Vec<_>> shared by many futures
//    - The parent just flattens its children's results
//    - The final sort (fetch.rs) makes the order deterministic anyway
// -----------------------------------------------------------------------------
