//! File locking for the shared source root.
//!
//! Several runs (for different build configurations) may share one source
//! root. A checkout is created at most once per qualified name, so the
//! check-then-clone sequence is serialized across processes with an advisory
//! lock file per qualified name. The lock is released when the [`SourceLock`]
//! is dropped.

use anyhow::{Context, Result};
use fs4::fs_std::FileExt;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use crate::constants::LOCKS_DIR;

/// An exclusive lock on one qualified name inside a source root
pub struct SourceLock {
    file: File,
    path: PathBuf,
}

impl SourceLock {
    /// Acquire the lock for `token`, blocking until any other holder releases it.
    ///
    /// Lock files live in `{source_root}/.locks/{token}.lock`. There is no
    /// timeout: a run waits as long as the other run keeps fetching.
    ///
    /// # Errors
    ///
    /// Fails if the locks directory or lock file cannot be created, or the file
    /// system does not support locking.
    pub fn acquire(source_root: &Path, token: &str) -> Result<Self> {
        let locks_dir = source_root.join(LOCKS_DIR);
        std::fs::create_dir_all(&locks_dir)
            .with_context(|| format!("Failed to create locks directory {}", locks_dir.display()))?;

        let path = locks_dir.join(format!("{token}.lock"));
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&path)
            .with_context(|| format!("Failed to open lock file: {}", path.display()))?;

        tracing::trace!(target: "source", "Waiting for lock {}", path.display());
        FileExt::lock_exclusive(&file).with_context(|| format!("Failed to acquire lock for: {token}"))?;
        tracing::trace!(target: "source", "Acquired lock {}", path.display());

        Ok(Self {
            file,
            path,
        })
    }
}

impl Drop for SourceLock {
    fn drop(&mut self) {
        if let Err(e) = FileExt::unlock(&self.file) {
            tracing::warn!(target: "source", "Failed to unlock {}: {}", self.path.display(), e);
        }
    }
}
