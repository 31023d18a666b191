// src/github/fetch.rs
// =============================================================================
// Entry point for "give me all the markdown under this GitHub URL".
//
// Steps:
// 1. Parse the URL (no network if it's malformed)
// 2. Walk the tree (walker.rs)
// 3. Collect: sort by path and refuse an empty result
//
// Sorting uses plain byte order on the path (str's Ord), not anything
// locale-aware, so the output is identical on every machine no matter which
// order the downloads finished in.
// =============================================================================

use tracing::info;

use super::transport::{LimitedTransport, Transport};
use super::types::{Document, FetchConfig, RepoLocation};
use super::url::parse_repo_url;
use super::walker::TreeWalker;
use crate::error::FetchError;

// Fetches every .md/.mdx file under a GitHub tree URL
//
// Parameters:
//   transport: how HTTP requests are made
//   api_base: GitHub API root, e.g. "https://api.github.com"
//   repo_url: e.g. "https://github.com/owner/repo/tree/main/docs"
//   config: depth bound, credential, request cap
//
// Returns: documents sorted by path, or the first fatal error
pub async fn fetch_documents(
    transport: &dyn Transport,
    api_base: &str,
    repo_url: &str,
    config: &FetchConfig,
) -> Result<Vec<Document>, FetchError> {
    let location = parse_repo_url(repo_url)?;
    fetch_location(transport, api_base, &location, config).await
}

// Same as fetch_documents, for callers that already parsed the URL
pub async fn fetch_location(
    transport: &dyn Transport,
    api_base: &str,
    location: &RepoLocation,
    config: &FetchConfig,
) -> Result<Vec<Document>, FetchError> {
    let limited;
    let transport: &dyn Transport = match config.max_concurrent_requests {
        Some(limit) => {
            limited = LimitedTransport::new(transport, limit);
            &limited
        }
        None => transport,
    };

    let walker = TreeWalker::new(transport, api_base, location, config);
    let documents = collect_documents(walker.walk().await?)?;

    info!(
        repo = %format!("{}/{}", location.owner, location.repo),
        documents = documents.len(),
        "fetch complete"
    );
    Ok(documents)
}

// Sorts documents by path and enforces the "found something" rule
pub fn collect_documents(mut documents: Vec<Document>) -> Result<Vec<Document>, FetchError> {
    if documents.is_empty() {
        return Err(FetchError::NoDocumentsFound);
    }
    documents.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(documents)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::github::transport::mock::MockTransport;

    const API: &str = "https://api.github.com";
    const REPO_URL: &str = "https://github.com/o/r/tree/main/docs";

    fn list_url(path: &str) -> String {
        format!("{}/repos/o/r/contents/{}?ref=main", API, path)
    }

    fn raw_url(path: &str) -> String {
        format!("https://raw.githubusercontent.com/o/r/main/{}", path)
    }

    fn file_entry(path: &str) -> String {
        let name = path.rsplit('/').next().unwrap();
        format!(
            r#"{{"name":"{name}","path":"{path}","type":"file","download_url":"{raw}","html_url":"https://github.com/o/r/blob/main/{path}","url":"{api}"}}"#,
            name = name,
            path = path,
            raw = raw_url(path),
            api = list_url(path),
        )
    }

    fn private_file_entry(path: &str) -> String {
        let name = path.rsplit('/').next().unwrap();
        format!(
            r#"{{"name":"{name}","path":"{path}","type":"file","download_url":null,"html_url":"https://github.com/o/r/blob/main/{path}","url":"{api}"}}"#,
            name = name,
            path = path,
            api = list_url(path),
        )
    }

    fn dir_entry(path: &str) -> String {
        let name = path.rsplit('/').next().unwrap();
        format!(
            r#"{{"name":"{name}","path":"{path}","type":"dir","download_url":null,"html_url":"https://github.com/o/r/tree/main/{path}","url":"{api}"}}"#,
            name = name,
            path = path,
            api = list_url(path),
        )
    }

    fn listing(entries: &[String]) -> String {
        format!("[{}]", entries.join(","))
    }

    // docs/
    //   b.md, a.mdx, notes.txt
    //   guide/  intro.md, deep/ (more.md)
    //   api/    ref.md
    fn sample_tree() -> MockTransport {
        MockTransport::new()
            .respond(
                &list_url("docs"),
                200,
                listing(&[
                    file_entry("docs/b.md"),
                    file_entry("docs/a.mdx"),
                    file_entry("docs/notes.txt"),
                    dir_entry("docs/guide"),
                    dir_entry("docs/api"),
                ]),
            )
            .respond(
                &list_url("docs/guide"),
                200,
                listing(&[file_entry("docs/guide/intro.md"), dir_entry("docs/guide/deep")]),
            )
            .respond(
                &list_url("docs/guide/deep"),
                200,
                listing(&[file_entry("docs/guide/deep/more.md")]),
            )
            .respond(&list_url("docs/api"), 200, listing(&[file_entry("docs/api/ref.md")]))
            .respond(&raw_url("docs/b.md"), 200, "B")
            .respond(&raw_url("docs/a.mdx"), 200, "A")
            .respond(&raw_url("docs/notes.txt"), 200, "not markdown")
            .respond(&raw_url("docs/guide/intro.md"), 200, "Intro")
            .respond(&raw_url("docs/guide/deep/more.md"), 200, "More")
            .respond(&raw_url("docs/api/ref.md"), 200, "Ref")
    }

    fn paths(docs: &[Document]) -> Vec<&str> {
        docs.iter().map(|d| d.path.as_str()).collect()
    }

    #[tokio::test]
    async fn test_full_walk_sorted_and_relative() {
        let mock = sample_tree();
        let docs = fetch_documents(&mock, API, REPO_URL, &FetchConfig::new(5, None))
            .await
            .unwrap();

        assert_eq!(
            paths(&docs),
            vec!["a.mdx", "api/ref.md", "b.md", "guide/deep/more.md", "guide/intro.md"]
        );
        let intro = docs.iter().find(|d| d.path == "guide/intro.md").unwrap();
        assert_eq!(intro.name, "intro.md");
        assert_eq!(intro.content, "Intro");
        assert_eq!(intro.source_url, "https://github.com/o/r/blob/main/docs/guide/intro.md");
        assert!(!mock.requested(&raw_url("docs/notes.txt")));
    }

    #[tokio::test]
    async fn test_depth_one_never_lists_subdirectories() {
        let mock = sample_tree();
        let docs = fetch_documents(&mock, API, REPO_URL, &FetchConfig::new(1, None))
            .await
            .unwrap();

        assert_eq!(paths(&docs), vec!["a.mdx", "b.md"]);
        let listings: Vec<_> = mock
            .requests()
            .into_iter()
            .filter(|r| r.url.contains("/contents/"))
            .map(|r| r.url)
            .collect();
        assert_eq!(listings, vec![list_url("docs")]);
    }

    #[tokio::test]
    async fn test_depth_two_stops_before_grandchildren() {
        let mock = sample_tree();
        let docs = fetch_documents(&mock, API, REPO_URL, &FetchConfig::new(2, None))
            .await
            .unwrap();

        assert_eq!(paths(&docs), vec!["a.mdx", "api/ref.md", "b.md", "guide/intro.md"]);
        assert!(mock.requested(&list_url("docs/guide")));
        assert!(!mock.requested(&list_url("docs/guide/deep")));
    }

    #[tokio::test]
    async fn test_order_is_independent_of_completion_order() {
        let slow_first = sample_tree()
            .delay(&raw_url("docs/a.mdx"), Duration::from_millis(30))
            .delay(&list_url("docs/api"), Duration::from_millis(20));
        let slow_last = sample_tree()
            .delay(&raw_url("docs/b.md"), Duration::from_millis(30))
            .delay(&list_url("docs/guide"), Duration::from_millis(20));

        let config = FetchConfig::new(5, None);
        let first = fetch_documents(&slow_first, API, REPO_URL, &config).await.unwrap();
        let second = fetch_documents(&slow_last, API, REPO_URL, &config).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_failing_subdirectory_is_skipped() {
        let mock = sample_tree().respond(&list_url("docs/guide"), 500, "boom");
        let docs = fetch_documents(&mock, API, REPO_URL, &FetchConfig::new(5, None))
            .await
            .unwrap();
        assert_eq!(paths(&docs), vec!["a.mdx", "api/ref.md", "b.md"]);
    }

    #[tokio::test]
    async fn test_network_error_in_subdirectory_is_skipped() {
        let mock = sample_tree().fail(&list_url("docs/api"), "connection reset");
        let docs = fetch_documents(&mock, API, REPO_URL, &FetchConfig::new(5, None))
            .await
            .unwrap();
        assert!(!paths(&docs).contains(&"api/ref.md"));
        assert!(paths(&docs).contains(&"guide/intro.md"));
    }

    #[tokio::test]
    async fn test_failing_file_is_skipped() {
        let mock = sample_tree().respond(&raw_url("docs/b.md"), 502, "");
        let docs = fetch_documents(&mock, API, REPO_URL, &FetchConfig::new(1, None))
            .await
            .unwrap();
        assert_eq!(paths(&docs), vec!["a.mdx"]);
    }

    #[tokio::test]
    async fn test_no_markdown_is_no_documents_found() {
        let mock = MockTransport::new()
            .respond(
                &list_url("docs"),
                200,
                listing(&[file_entry("docs/readme.txt"), dir_entry("docs/img")]),
            )
            .respond(&list_url("docs/img"), 200, "[]");
        let err = fetch_documents(&mock, API, REPO_URL, &FetchConfig::new(3, None))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::NoDocumentsFound));
    }

    #[tokio::test]
    async fn test_root_not_found() {
        let mock = MockTransport::new().respond(&list_url("docs"), 404, r#"{"message":"Not Found"}"#);
        let err = fetch_documents(&mock, API, REPO_URL, &FetchConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::NotFound));
    }

    #[tokio::test]
    async fn test_root_forbidden_without_token_is_rate_limited() {
        let mock = MockTransport::new().respond(
            &list_url("docs"),
            403,
            r#"{"message":"API rate limit exceeded for 10.0.0.1."}"#,
        );
        let err = fetch_documents(&mock, API, REPO_URL, &FetchConfig::default())
            .await
            .unwrap_err();
        match err {
            FetchError::RateLimited { detail } => {
                assert_eq!(detail.as_deref(), Some("API rate limit exceeded for 10.0.0.1."))
            }
            other => panic!("expected RateLimited, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_root_forbidden_with_token_is_forbidden() {
        let mock = MockTransport::new().respond(&list_url("docs"), 403, "{}");
        let config = FetchConfig::new(1, Some("tok".to_string()));
        let err = fetch_documents(&mock, API, REPO_URL, &config).await.unwrap_err();
        assert!(matches!(err, FetchError::Forbidden));
    }

    #[tokio::test]
    async fn test_root_other_status_is_unexpected() {
        let mock = MockTransport::new().respond(&list_url("docs"), 500, "");
        let err = fetch_documents(&mock, API, REPO_URL, &FetchConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::UnexpectedStatus { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_root_that_is_a_file_is_malformed() {
        let mock = MockTransport::new().respond(&list_url("docs"), 200, file_entry("docs"));
        let err = fetch_documents(&mock, API, REPO_URL, &FetchConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_invalid_url_makes_no_requests() {
        let mock = MockTransport::new();
        let err = fetch_documents(&mock, API, "https://github.com/o/r", &FetchConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl(_)));
        assert!(mock.requests().is_empty());
    }

    #[tokio::test]
    async fn test_credential_goes_to_api_but_not_raw_host() {
        let mock = sample_tree();
        let config = FetchConfig::new(1, Some("secret".to_string()));
        fetch_documents(&mock, API, REPO_URL, &config).await.unwrap();

        let listing = mock.request_to(&list_url("docs")).unwrap();
        assert_eq!(listing.header("Authorization"), Some("token secret"));
        let download = mock.request_to(&raw_url("docs/b.md")).unwrap();
        assert_eq!(download.header("Authorization"), None);
    }

    #[tokio::test]
    async fn test_private_repo_uses_metadata_api() {
        // "# Secret" in base64
        let mock = MockTransport::new()
            .respond(&list_url("docs"), 200, listing(&[private_file_entry("docs/secret.md")]))
            .respond(
                &list_url("docs/secret.md"),
                200,
                r#"{"content":"IyBTZWNyZXQ=","encoding":"base64"}"#,
            );
        let config = FetchConfig::new(1, Some("tok".to_string()));
        let docs = fetch_documents(&mock, API, REPO_URL, &config).await.unwrap();

        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].content, "# Secret");
        let meta = mock.request_to(&list_url("docs/secret.md")).unwrap();
        assert_eq!(meta.header("Authorization"), Some("token tok"));
    }

    #[tokio::test]
    async fn test_repository_root_listing() {
        let root_listing = format!("{}/repos/o/r/contents?ref=main", API);
        let mock = MockTransport::new()
            .respond(&root_listing, 200, listing(&[file_entry("README.md")]))
            .respond(&raw_url("README.md"), 200, "hello");
        let docs = fetch_documents(&mock, API, "https://github.com/o/r/tree/main", &FetchConfig::default())
            .await
            .unwrap();
        assert_eq!(paths(&docs), vec!["README.md"]);
    }

    #[tokio::test]
    async fn test_folder_names_with_spaces_and_reserved_characters() {
        let root = format!("{}/repos/o/r/contents/my%20docs?ref=main", API);
        let csharp = format!("{}/repos/o/r/contents/my%20docs/C%23?ref=main", API);
        let question = format!("{}/repos/o/r/contents/my%20docs/what%3F?ref=main", API);
        let mock = MockTransport::new()
            .respond(
                &root,
                200,
                listing(&[
                    file_entry("my docs/a.md"),
                    dir_entry("my docs/C#"),
                    dir_entry("my docs/what?"),
                ]),
            )
            .respond(&csharp, 200, listing(&[file_entry("my docs/C#/b.md")]))
            .respond(&question, 200, listing(&[file_entry("my docs/what?/c.md")]))
            .respond(&raw_url("my docs/a.md"), 200, "A")
            .respond(&raw_url("my docs/C#/b.md"), 200, "B")
            .respond(&raw_url("my docs/what?/c.md"), 200, "C");

        let docs = fetch_documents(
            &mock,
            API,
            "https://github.com/o/r/tree/main/my%20docs",
            &FetchConfig::new(2, None),
        )
        .await
        .unwrap();

        assert_eq!(paths(&docs), vec!["C#/b.md", "a.md", "what?/c.md"]);
        assert!(mock.requested(&root));
        assert!(mock.requested(&csharp));
        assert!(mock.requested(&question));
    }

    #[tokio::test]
    async fn test_non_ascii_root_folder() {
        let root = format!("{}/repos/o/r/contents/%E6%96%87%E6%A1%A3?ref=main", API);
        let mock = MockTransport::new()
            .respond(&root, 200, listing(&[file_entry("文档/入门.md")]))
            .respond(&raw_url("文档/入门.md"), 200, "你好");

        let docs = fetch_documents(
            &mock,
            API,
            "https://github.com/o/r/tree/main/%E6%96%87%E6%A1%A3",
            &FetchConfig::default(),
        )
        .await
        .unwrap();

        assert_eq!(paths(&docs), vec!["入门.md"]);
        assert_eq!(docs[0].content, "你好");
        assert!(mock.requested(&root));
    }

    #[tokio::test]
    async fn test_entry_outside_root_is_skipped() {
        let mock = MockTransport::new()
            .respond(
                &list_url("docs"),
                200,
                listing(&[file_entry("docsX/stray.md"), file_entry("docs/b.md")]),
            )
            .respond(&raw_url("docsX/stray.md"), 200, "stray")
            .respond(&raw_url("docs/b.md"), 200, "B");

        let docs = fetch_documents(&mock, API, REPO_URL, &FetchConfig::default())
            .await
            .unwrap();

        assert_eq!(paths(&docs), vec!["b.md"]);
        assert!(!mock.requested(&raw_url("docsX/stray.md")));
    }

    #[tokio::test]
    async fn test_request_cap_is_respected() {
        let mut mock = sample_tree();
        for path in ["docs/b.md", "docs/a.mdx", "docs/guide/intro.md", "docs/api/ref.md"] {
            mock = mock.delay(&raw_url(path), Duration::from_millis(10));
        }
        let config = FetchConfig::new(5, None).with_max_concurrent_requests(Some(1));
        let docs = fetch_documents(&mock, API, REPO_URL, &config).await.unwrap();

        assert_eq!(docs.len(), 5);
        assert_eq!(mock.peak_in_flight(), 1);
    }

    #[test]
    fn test_collect_sorts_by_codepoint() {
        let doc = |p: &str| Document {
            name: p.to_string(),
            path: p.to_string(),
            content: String::new(),
            source_url: String::new(),
        };
        // Uppercase sorts before lowercase in codepoint order
        let sorted = collect_documents(vec![doc("b.md"), doc("B.md"), doc("a/z.md"), doc("a.md")]).unwrap();
        assert_eq!(paths(&sorted), vec!["B.md", "a.md", "a/z.md", "b.md"]);
    }

    #[test]
    fn test_collect_empty_is_error() {
        assert!(matches!(collect_documents(Vec::new()), Err(FetchError::NoDocumentsFound)));
    }
}
