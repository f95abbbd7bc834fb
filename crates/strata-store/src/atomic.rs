//! Atomic write primitives
//!
//! Each write goes to its own uniquely named temp file beside the target
//! and is renamed over it, so readers see either the old or the new
//! document and concurrent writers of one target never share a temp file.

#![allow(clippy::result_large_err)]

use crate::errors::{io_error, Result};
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Atomically write bytes to a file
///
/// The temp file lives next to the target so the rename never crosses a
/// filesystem boundary. It is removed if the write or the rename fails.
pub fn atomic_write(target_path: &Path, content: &[u8]) -> Result<()> {
    let parent = match target_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(|e| io_error("create_dir", e))?;

    let mut temp = NamedTempFile::new_in(parent).map_err(|e| io_error("create_temp", e))?;
    temp.write_all(content)
        .map_err(|e| io_error("write_temp", e))?;
    temp.as_file()
        .sync_all()
        .map_err(|e| io_error("sync_temp", e))?;

    temp.persist(target_path)
        .map_err(|e| io_error("rename_temp", e.error))?;

    Ok(())
}
