// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (warnings go to stderr via tracing)
// 3. Dispatch to the appropriate subcommand handler
// 4. Exit with proper code (0 = success, 2 = error)
//
// All the real work lives in the library (src/lib.rs); this file only turns
// command-line flags into plain parameters and prints results.
// =============================================================================

mod cli;

use std::path::Path;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands, FetchArgs, ModeArg};
use doc_exporter::export::{build_export_blocks, write_archive, write_files, ExportConfig, ExportMode};
use doc_exporter::github::{parse_repo_url, Document, FetchConfig, GithubClient, HistoryEntry};
use doc_exporter::markdown::extract_title;
use doc_exporter::FetchError;

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            if let Some(FetchError::Auth) = e.downcast_ref::<FetchError>() {
                eprintln!("Hint: remove or replace the token in --token / GITHUB_TOKEN.");
            }
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let client = GithubClient::connect(Some(&cli.api_base), Duration::from_secs(cli.timeout))?;
    let token = cli.token.filter(|t| !t.trim().is_empty());

    match cli.command {
        Commands::Whoami => handle_whoami(&client, token.as_deref()).await,
        Commands::List { repo_url, fetch, json } => {
            handle_list(&client, &repo_url, fetch_config(&fetch, token), json).await
        }
        Commands::Export {
            repo_url,
            fetch,
            mode,
            merge_within,
            chunk_size,
            out,
        } => {
            let config = fetch_config(&fetch, token);
            handle_export(&client, &repo_url, config, mode, merge_within, chunk_size as usize, &out).await
        }
    }
}

// RUST_LOG wins if set; otherwise warnings only, or debug output for our
// own crate with -v
fn init_logging(verbose: bool) {
    let default = if verbose { "warn,doc_exporter=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn fetch_config(args: &FetchArgs, token: Option<String>) -> FetchConfig {
    FetchConfig::new(args.depth as usize, token)
        .with_max_concurrent_requests(args.concurrency.map(|n| n as usize))
}

async fn handle_whoami(client: &GithubClient, token: Option<&str>) -> Result<i32> {
    let Some(token) = token else {
        eprintln!("No token given. Pass --token or set GITHUB_TOKEN.");
        return Ok(2);
    };

    let user = client.verify_credential(token).await?;
    println!("✅ Token belongs to {}", user.login);
    println!("   Profile: {}", user.profile_url);
    println!("   Avatar:  {}", user.avatar_url);
    Ok(0)
}

async fn handle_list(client: &GithubClient, repo_url: &str, config: FetchConfig, json: bool) -> Result<i32> {
    let location = parse_repo_url(repo_url)?;
    if !json {
        println!("🔍 Fetching docs from {}/{} ({})", location.owner, location.repo, location.branch);
        println!("📊 Max depth: {}", config.max_depth);
    }

    let documents = client.fetch_documents(repo_url, &config).await?;

    if json {
        let entry = HistoryEntry {
            id: None,
            repo_url: repo_url.to_string(),
            repo_name: format!("{}/{}", location.owner, location.repo),
            documents,
            timestamp: now_millis(),
        };
        let output = serde_json::to_string_pretty(&entry).context("Failed to serialize documents")?;
        println!("{}", output);
    } else {
        print_table(&documents);
    }
    Ok(0)
}

async fn handle_export(
    client: &GithubClient,
    repo_url: &str,
    config: FetchConfig,
    mode: ModeArg,
    merge_within: bool,
    chunk_size: usize,
    out: &Path,
) -> Result<i32> {
    let location = parse_repo_url(repo_url)?;
    println!("🔍 Fetching docs from {}/{} ({})", location.owner, location.repo, location.branch);

    let documents = client.fetch_documents(repo_url, &config).await?;
    println!("📄 Found {} document(s)", documents.len());

    let repo = location.repo.as_str();
    let export_config = ExportConfig::new(mode.into(), merge_within, chunk_size)
        .with_merged_file_name(format!("{}-docs.md", repo));
    let blocks = build_export_blocks(&documents, &export_config);

    match export_config.mode {
        ExportMode::Archive => {
            let archive_path = out.join(format!("{}.zip", repo));
            write_archive(&blocks, &archive_path, repo)?;
            println!("📦 Wrote {} file(s) into {}", blocks.len(), archive_path.display());
        }
        ExportMode::MergeSingle => {
            let written = write_files(&blocks, out)?;
            for path in written {
                println!("📝 Wrote {}", path.display());
            }
        }
        ExportMode::Split => {
            let folder = out.join(format!("{}-docs", repo));
            let written = write_files(&blocks, &folder)?;
            println!("📝 Wrote {} part(s) into {}", written.len(), folder.display());
        }
    }
    Ok(0)
}

fn print_table(documents: &[Document]) {
    println!();
    println!("{:<50} {:<40} {:>10}", "PATH", "TITLE", "BYTES");
    println!("{}", "=".repeat(102));

    for doc in documents {
        let title = extract_title(&doc.content).unwrap_or_else(|| doc.name.clone());
        println!(
            "{:<50} {:<40} {:>10}",
            truncate(&doc.path, 50),
            truncate(&title, 40),
            doc.content.len()
        );
    }

    println!();
    println!("📋 Total: {} document(s)", documents.len());
}

// Shortens text to `width` characters, ending with "..." when cut
fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let kept: String = text.chars().take(width.saturating_sub(3)).collect();
    format!("{}...", kept)
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
