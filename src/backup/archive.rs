//! Final archive step: deflate the whole backup tree into one zip file.
//!
//! The tree is walked twice, once to count entries for the progress total
//! and once to write. This runs after all network I/O has finished, so the
//! extra pass is cheap relative to the rest of a run.

use anyhow::{Context, Result};
use log::debug;
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::progress::Reporter;
use crate::runtime::Runtime;

/// Collects every directory and regular file under `root`, parents before
/// children, siblings sorted by name so the archive layout is stable.
fn walk<R: Runtime>(runtime: &R, root: &Path, out: &mut Vec<(PathBuf, bool)>) -> Result<()> {
    out.push((root.to_path_buf(), true));

    let mut entries = runtime
        .read_dir(root)
        .with_context(|| format!("Failed to list {:?}", root))?;
    entries.sort();

    for entry in entries {
        if runtime.is_dir(&entry) {
            walk(runtime, &entry, out)?;
        } else if runtime.is_file(&entry) {
            out.push((entry, false));
        }
    }
    Ok(())
}

/// Archive entry name for `path`: relative to `relroot`, normalized to
/// forward slashes so the top-level backup folder name survives inside the
/// archive on every platform.
fn entry_name(relroot: &Path, path: &Path) -> Result<String> {
    let rel = path
        .strip_prefix(relroot)
        .with_context(|| format!("{:?} is not under {:?}", path, relroot))?;
    Ok(rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/"))
}

/// Writes the complete backup tree at `download_path` into a deflate
/// compressed zip at `archive_path`.
///
/// Directory entries are written explicitly so empty directories survive a
/// round-trip. Files that disappear between the counting walk and the
/// write are skipped silently instead of failing the archive.
#[tracing::instrument(skip(runtime, reporter))]
pub fn archive_backup<R: Runtime>(
    runtime: &R,
    download_path: &Path,
    archive_path: &Path,
    reporter: &dyn Reporter,
) -> Result<()> {
    let mut entries = Vec::new();
    walk(runtime, download_path, &mut entries)?;
    let sink = reporter.task("Archiving", entries.len() as u64);

    // Entry names keep the final path component of download_path, so the
    // reference point is its parent.
    let relroot = download_path.parent().unwrap_or_else(|| Path::new(""));

    let out = runtime
        .create_file_seekable(archive_path)
        .with_context(|| format!("Failed to create archive {:?}", archive_path))?;
    let mut zip = ZipWriter::new(out);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for (path, is_dir) in &entries {
        let name = entry_name(relroot, path)?;
        if *is_dir {
            zip.add_directory(&name, options)
                .with_context(|| format!("Failed to add directory entry {}", name))?;
        } else {
            let mut reader = match runtime.open(path) {
                Ok(reader) => reader,
                Err(err) => {
                    // Vanished since the counting walk; skip it.
                    debug!("Skipping {:?}: {}", path, err);
                    sink.report(1);
                    continue;
                }
            };
            zip.start_file(&name, options)
                .with_context(|| format!("Failed to add file entry {}", name))?;
            std::io::copy(&mut reader, &mut zip)
                .with_context(|| format!("Failed to compress {:?}", path))?;
        }
        sink.report(1);
    }

    zip.finish().context("Failed to finalize archive")?;
    sink.close();
    Ok(())
}
