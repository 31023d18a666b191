// src/export/batch.rs
// =============================================================================
// Turns a list of fetched documents into named blocks of text ready to be
// written to disk or into a zip archive.
//
// Modes:
// - MergeSingle: everything in one file
// - Archive: one file per document (folder structure preserved), or, with
//   merge_within_archive, each folder's documents merged into
//   part_1.md, part_2.md, ... of at most chunk_size documents each
// - Split: the whole list cut into part_N.md chunks, folders ignored
//
// This is a pure transform: no I/O, no errors. Chunk boundaries are purely
// positional and follow the order documents are given in (the fetcher hands
// them over sorted by path).
// =============================================================================

use std::collections::BTreeMap;

use crate::github::Document;

/// Placed between documents in a merged file
pub const DOCUMENT_SEPARATOR: &str = "\n\n---\n\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportMode {
    MergeSingle,
    Archive,
    Split,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportConfig {
    pub mode: ExportMode,
    /// Archive mode only: merge each folder's files into part_N.md chunks
    pub merge_within_archive: bool,
    /// Documents per chunk (archive+merge and split modes). Never 0.
    pub chunk_size: usize,
    /// File name of the MergeSingle output
    pub merged_file_name: String,
}

impl ExportConfig {
    pub fn new(mode: ExportMode, merge_within_archive: bool, chunk_size: usize) -> Self {
        ExportConfig {
            mode,
            merge_within_archive,
            chunk_size: chunk_size.max(1),
            merged_file_name: "docs.md".to_string(),
        }
    }

    pub fn with_merged_file_name(mut self, name: impl Into<String>) -> Self {
        self.merged_file_name = name.into();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportBlock {
    /// Slash separated, relative to wherever the writer puts things
    pub relative_file_path: String,
    pub text_content: String,
}

// Builds the blocks for one export
pub fn build_export_blocks(documents: &[Document], config: &ExportConfig) -> Vec<ExportBlock> {
    // The field is public, so clamp again rather than trusting `new`
    let chunk_size = config.chunk_size.max(1);

    match config.mode {
        ExportMode::MergeSingle => vec![ExportBlock {
            relative_file_path: config.merged_file_name.clone(),
            text_content: merge(documents.iter()),
        }],
        ExportMode::Archive if config.merge_within_archive => {
            merge_per_directory(documents, chunk_size)
        }
        ExportMode::Archive => documents.iter().map(attributed_copy).collect(),
        ExportMode::Split => documents
            .chunks(chunk_size)
            .enumerate()
            .map(|(i, chunk)| ExportBlock {
                relative_file_path: part_name("", i),
                text_content: merge(chunk.iter()),
            })
            .collect(),
    }
}

fn merge_per_directory(documents: &[Document], chunk_size: usize) -> Vec<ExportBlock> {
    // BTreeMap keeps the folder order stable; Vec keeps the document order
    let mut by_dir: BTreeMap<&str, Vec<&Document>> = BTreeMap::new();
    for doc in documents {
        by_dir.entry(doc.directory()).or_default().push(doc);
    }

    let mut blocks = Vec::new();
    for (dir, docs) in by_dir {
        for (i, chunk) in docs.chunks(chunk_size).enumerate() {
            blocks.push(ExportBlock {
                relative_file_path: part_name(dir, i),
                text_content: merge(chunk.iter().copied()),
            });
        }
    }
    blocks
}

// "# name" header, blank line, content; documents joined by the separator
fn merge<'a>(documents: impl Iterator<Item = &'a Document>) -> String {
    documents
        .map(|doc| format!("# {}\n\n{}", doc.name, doc.content))
        .collect::<Vec<_>>()
        .join(DOCUMENT_SEPARATOR)
}

fn attributed_copy(doc: &Document) -> ExportBlock {
    ExportBlock {
        relative_file_path: doc.path.clone(),
        text_content: format!("{}{}Source: {}\n", doc.content, DOCUMENT_SEPARATOR, doc.source_url),
    }
}

fn part_name(dir: &str, chunk_index: usize) -> String {
    if dir.is_empty() {
        format!("part_{}.md", chunk_index + 1)
    } else {
        format!("{}/part_{}.md", dir, chunk_index + 1)
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What does .chunks(n) do?
//    - Splits a slice into consecutive sub-slices of length n
//    - The last one may be shorter; none is ever empty
//    - n == 0 panics, which is why chunk_size is clamped to at least 1
//
// 2. Why BTreeMap for grouping?
//    - Like HashMap, but iterates keys in sorted order
//    - Output files come out in the same order on every run
// -----------------------------------------------------------------------------
