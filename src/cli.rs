// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Global options (token, API base, timeout, verbosity) can go before or after
// the subcommand. The token can also come from the GITHUB_TOKEN environment
// variable, so it doesn't have to appear in shell history.
// =============================================================================

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use doc_exporter::ExportMode;

#[derive(Parser, Debug)]
#[command(
    name = "doc-exporter",
    version,
    about = "Fetch markdown docs from a GitHub repository folder and export them",
    long_about = "doc-exporter walks a folder of a GitHub repository, downloads every .md and .mdx \
                  file in it, and exports them as one merged file, a zip archive that keeps the \
                  folder structure, or a series of merged parts."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// GitHub personal access token (raises rate limits, needed for private repos)
    #[arg(long, short = 't', env = "GITHUB_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// GitHub API base URL (for GitHub Enterprise)
    #[arg(long, global = true, default_value = "https://api.github.com")]
    pub api_base: String,

    /// Per-request timeout in seconds
    #[arg(long, global = true, default_value_t = 30)]
    pub timeout: u64,

    /// Show debug logging (RUST_LOG overrides this)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check the token and show which GitHub account it belongs to
    Whoami,

    /// List the markdown documents under a GitHub folder
    ///
    /// Example: doc-exporter list https://github.com/rust-lang/book/tree/main/src --depth 2
    List {
        /// GitHub folder URL (https://github.com/owner/repo/tree/branch/path)
        repo_url: String,

        #[command(flatten)]
        fetch: FetchArgs,

        /// Print the result as JSON (a history entry with all documents)
        #[arg(long)]
        json: bool,
    },

    /// Fetch the documents and write them out
    ///
    /// Example: doc-exporter export https://github.com/o/r/tree/main/docs --mode archive --merge-within
    Export {
        /// GitHub folder URL (https://github.com/owner/repo/tree/branch/path)
        repo_url: String,

        #[command(flatten)]
        fetch: FetchArgs,

        /// How to lay out the output
        #[arg(long, value_enum, default_value_t = ModeArg::Archive)]
        mode: ModeArg,

        /// Archive mode: merge the files of each folder into part_N.md files
        #[arg(long)]
        merge_within: bool,

        /// Documents per merged part (archive --merge-within and split modes)
        #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u64).range(1..))]
        chunk_size: u64,

        /// Directory to write into
        #[arg(long, short = 'o', default_value = ".")]
        out: PathBuf,
    },
}

#[derive(Args, Debug)]
pub struct FetchArgs {
    /// How many folder levels to descend (1 = only the given folder)
    #[arg(long, short = 'd', default_value_t = 1, value_parser = clap::value_parser!(u64).range(1..))]
    pub depth: u64,

    /// Cap on simultaneous HTTP requests (unbounded if not given)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub concurrency: Option<u64>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModeArg {
    /// One merged .md file
    Merge,
    /// A zip archive preserving folders
    Archive,
    /// Merged part_N.md files, folders ignored
    Split,
}

impl From<ModeArg> for ExportMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Merge => ExportMode::MergeSingle,
            ModeArg::Archive => ExportMode::Archive,
            ModeArg::Split => ExportMode::Split,
        }
    }
}
