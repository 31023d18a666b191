// src/github/url.rs
// =============================================================================
// Parses GitHub "tree" URLs into owner / repo / branch / path.
//
// Supported format:
//   https://github.com/<owner>/<repo>/tree/<branch>/<path...>
//
// - <path> may contain more slashes; everything after the branch is the path
// - <path> may be empty (".../tree/main" or ".../tree/main/"), which means
//   the repository root
// - query strings and #fragments are ignored
// - segments are percent-decoded ("my%20docs" -> "my docs"), because the
//   GitHub API reports repository paths in decoded form
//
// Anything else is rejected as a whole: we never hand back half-filled data.
// No network access happens here.
// =============================================================================

use percent_encoding::percent_decode_str;
use url::Url;

use super::types::RepoLocation;
use crate::error::FetchError;

// Parses a GitHub tree URL
//
// Example:
//   "https://github.com/rust-lang/book/tree/main/src"
//   -> RepoLocation { owner: "rust-lang", repo: "book", branch: "main", root_path: "src" }
pub fn parse_repo_url(input: &str) -> Result<RepoLocation, FetchError> {
    let invalid = || FetchError::InvalidUrl(input.to_string());

    let url = Url::parse(input.trim()).map_err(|_| invalid())?;

    if url.scheme() != "https" {
        return Err(invalid());
    }
    match url.host_str() {
        Some("github.com") | Some("www.github.com") => {}
        _ => return Err(invalid()),
    }

    // ["owner", "repo", "tree", "branch", ...path]
    let segments: Vec<String> = url
        .path_segments()
        .ok_or_else(invalid)?
        .map(|s| percent_decode_str(s).decode_utf8().map(|d| d.into_owned()))
        .collect::<Result<_, _>>()
        .map_err(|_| invalid())?;
    if segments.len() < 4 || segments[2] != "tree" {
        return Err(invalid());
    }

    let (owner, repo, branch) = (&segments[0], &segments[1], &segments[3]);
    if owner.is_empty() || repo.is_empty() || branch.is_empty() {
        return Err(invalid());
    }

    let root_path = segments[4..].join("/").trim_matches('/').to_string();

    Ok(RepoLocation {
        owner: owner.to_string(),
        repo: repo.to_string(),
        branch: branch.to_string(),
        root_path,
    })
}
