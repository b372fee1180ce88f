// shellmatic: layered shell environment resolver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Filesystem helpers for scripts and documents.
//!
//! ```text
//! write_atomic(path, contents)
//!   create_dir_all(parent)
//!   NamedTempFile::new_in(parent) ── write ── flush ── persist(path)
//! ```
//!
//! Readers of `path` see either the old contents or the new ones, never a
//! partially written file.

use crate::error::{FsError, Result};
use anyhow::Context;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

/// Writes `contents` to `path`, creating missing parent directories.
///
/// # Errors
///
/// Returns an error if the parent directory cannot be created or the file
/// cannot be written or renamed into place.
pub fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)
        .map_err(|e| FsError::from_io(parent.display().to_string(), e))?;

    let mut file = NamedTempFile::new_in(parent)
        .with_context(|| format!("Failed to create temp file in {}", parent.display()))?;
    file.write_all(contents.as_bytes())
        .and_then(|()| file.flush())
        .with_context(|| format!("Failed to write {}", file.path().display()))?;
    file.persist(path)
        .map_err(|e| FsError::from_io(path.display().to_string(), e.error))?;

    debug!(path = %path.display(), bytes = contents.len(), "File written");
    Ok(())
}
