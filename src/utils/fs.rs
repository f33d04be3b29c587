//! File system utilities for copying source trees
//!
//! The patch overlay needs two copy operations: a recursive copy of a checkout
//! that leaves hidden entries (`.git`, `.github`, editor files) behind, and a
//! recursive overlay of patch files onto that copy. Both overwrite existing
//! files in the destination and create missing directories on the way.
//!
//! Symbolic links are followed: the destination receives the content of the
//! linked file or directory, never a link.

use anyhow::{Context, Result};
use std::ffi::OsStr;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

/// Ensures a directory exists, creating it and all parent directories if necessary.
///
/// # Errors
///
/// Fails if the path exists but is not a directory, or creation fails.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory: {}", path.display()))?;
    } else if !path.is_dir() {
        return Err(anyhow::anyhow!("Path exists but is not a directory: {}", path.display()));
    }
    Ok(())
}

/// Whether a file name denotes a hidden entry (leading `.`).
#[must_use]
pub fn is_hidden(name: &OsStr) -> bool {
    name.to_string_lossy().starts_with('.')
}

/// Options for [`copy_tree`].
#[derive(Debug, Clone, Copy, Default)]
pub struct CopyOptions {
    /// Skip files and directories whose name starts with `.`, at any depth
    pub skip_hidden: bool,
}

/// Recursively copy the contents of `src` into `dst`.
///
/// `dst` may already exist; files with the same relative path are
/// overwritten, other files in `dst` are left alone. Returns the number of
/// files copied.
///
/// # Errors
///
/// Fails on the first entry that cannot be read or written, including
/// dangling symbolic links.
pub fn copy_tree(src: &Path, dst: &Path, options: CopyOptions) -> Result<usize> {
    ensure_dir(dst)?;

    let walker = WalkDir::new(src)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !(options.skip_hidden && is_hidden(entry.file_name())));

    let mut copied = 0;
    for entry in walker {
        let entry = entry.with_context(|| format!("Failed to read directory tree: {}", src.display()))?;
        let relative = entry.path().strip_prefix(src).with_context(|| {
            format!("{} is not inside {}", entry.path().display(), src.display())
        })?;
        let target = dst.join(relative);

        if entry.file_type().is_dir() {
            ensure_dir(&target)?;
            continue;
        }

        if let Some(parent) = target.parent() {
            ensure_dir(parent)?;
        }
        fs::copy(entry.path(), &target).with_context(|| {
            format!("Failed to copy file from {} to {}", entry.path().display(), target.display())
        })?;
        copied += 1;
    }

    Ok(copied)
}
