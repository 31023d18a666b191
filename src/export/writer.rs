// src/export/writer.rs
// =============================================================================
// Writes ExportBlocks somewhere the user can open them.
//
// - write_files: each block becomes a file under an output directory,
//   creating folders as needed
// - write_archive: all blocks go into one .zip, every entry placed under a
//   top-level folder named after the repository
//
// Block paths come from GitHub and are always relative, but we still refuse
// anything with ".." or an absolute path before touching the filesystem.
// =============================================================================

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use super::batch::ExportBlock;

// Writes every block as a file under `out_dir`
//
// Returns: the paths that were written, in block order
pub fn write_files(blocks: &[ExportBlock], out_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(blocks.len());

    for block in blocks {
        let target = out_dir.join(safe_relative_path(&block.relative_file_path)?);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
        fs::write(&target, &block.text_content)
            .with_context(|| format!("Failed to write {}", target.display()))?;
        written.push(target);
    }

    Ok(written)
}

// Writes all blocks into a zip file at `archive_path`, rooted at `root_folder/`
pub fn write_archive(blocks: &[ExportBlock], archive_path: &Path, root_folder: &str) -> Result<()> {
    if let Some(parent) = archive_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    let file = File::create(archive_path)
        .with_context(|| format!("Failed to create {}", archive_path.display()))?;

    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default();

    for block in blocks {
        // Zip entry names always use forward slashes
        safe_relative_path(&block.relative_file_path)?;
        let entry_name = format!("{}/{}", root_folder, block.relative_file_path);
        zip.start_file(entry_name.as_str(), options)
            .with_context(|| format!("Failed to add {} to archive", entry_name))?;
        zip.write_all(block.text_content.as_bytes())?;
    }

    zip.finish().context("Failed to finish zip archive")?;
    Ok(())
}

// Converts "a/b/c.md" into a platform path, rejecting anything that could
// escape the output directory
fn safe_relative_path(relative: &str) -> Result<PathBuf> {
    let mut path = PathBuf::new();
    for part in relative.split('/') {
        match part {
            "" | "." => continue,
            ".." => bail!("Refusing to write outside the export folder: {}", relative),
            _ if part.contains('\\') || part.contains(':') => {
                bail!("Refusing to write suspicious path: {}", relative)
            }
            _ => path.push(part),
        }
    }
    if path.as_os_str().is_empty() {
        bail!("Empty export path");
    }
    Ok(path)
}
