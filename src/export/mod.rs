// src/export/mod.rs
// =============================================================================
// This module turns fetched documents into files.
//
// Submodules:
// - batch: pure grouping/merging of documents into ExportBlocks
// - writer: puts ExportBlocks on disk (plain files or a zip archive)
// =============================================================================

mod batch;
mod writer;

pub use batch::{build_export_blocks, ExportBlock, ExportConfig, ExportMode, DOCUMENT_SEPARATOR};
pub use writer::{write_archive, write_files};
