//! Shared source checkouts.
//!
//! Every dependency is checked out once per qualified name
//! (`{name}-{git_ref}`) under the shared source root. Checkouts are created by
//! [`SourceFetcher::ensure_fetched`] and treated as read-only by everything
//! else: builds either read them directly or copy them first (see
//! [`crate::patch`]).
//!
//! # Completion Marker
//!
//! A checkout directory that exists is trusted as complete. There is no
//! integrity check and no re-fetch; deleting the directory is the way to force
//! a fresh clone.
//!
//! To keep that trust well-founded, a clone is written into a staging
//! directory `.{qualified}.partial` next to the final location and renamed
//! into place only once `git clone` succeeded. A staging directory left behind
//! by an interrupted run is removed before the next attempt.
//!
//! # Concurrency
//!
//! Runs sharing a source root serialize the check-then-clone sequence per
//! qualified name through [`lock::SourceLock`]. A run that waited for the lock
//! finds the checkout created by the other run and does not clone again.

pub mod lock;

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::BuildConfiguration;
use crate::constants::PARTIAL_SUFFIX;
use crate::core::DepBuildError;
use crate::manifest::DependencySpec;
use crate::process::{CommandRunner, ToolCommand};

pub use lock::SourceLock;

/// Result of [`SourceFetcher::ensure_fetched`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutcome {
    /// The shared checkout directory
    pub source_dir: PathBuf,
    /// `true` when this call ran the clone, `false` when the checkout existed
    pub fetched: bool,
}

/// Creates shared checkouts with the revision-control client.
pub struct SourceFetcher<'a, R: CommandRunner> {
    config: &'a BuildConfiguration,
    runner: &'a R,
}

impl<'a, R: CommandRunner> SourceFetcher<'a, R> {
    /// Create a fetcher writing under `config.source_root`.
    pub const fn new(config: &'a BuildConfiguration, runner: &'a R) -> Self {
        Self {
            config,
            runner,
        }
    }

    /// Location of the checkout for `spec`, whether or not it exists yet.
    #[must_use]
    pub fn source_dir(&self, spec: &DependencySpec) -> PathBuf {
        self.config.source_root.join(spec.qualified_name())
    }

    /// Make sure the checkout of `spec` at its pinned revision exists.
    ///
    /// Runs `git clone <git_url> -b <git_ref> <dir>` only when the checkout
    /// directory is absent. Never deletes or modifies an existing checkout.
    ///
    /// # Errors
    ///
    /// Any failure (lock, clone, rename) is reported as
    /// [`DepBuildError::FetchFailed`].
    pub fn ensure_fetched(&self, spec: &DependencySpec) -> Result<FetchOutcome, DepBuildError> {
        let source_dir = self.source_dir(spec);

        if source_dir.is_dir() {
            tracing::debug!(target: "source", "({}) Using existing checkout {}", spec.name, source_dir.display());
            return Ok(FetchOutcome {
                source_dir,
                fetched: false,
            });
        }

        let fail = |reason: String| DepBuildError::FetchFailed {
            name: spec.name.clone(),
            url: spec.git_url.clone(),
            reference: spec.git_ref.clone(),
            reason,
        };

        let root = &self.config.source_root;
        fs::create_dir_all(root)
            .map_err(|e| fail(format!("cannot create source root {}: {e}", root.display())))?;

        // Revisions may contain path separators; internal file names must not.
        let token = spec.qualified_name().replace(['/', '\\'], "_");
        let _lock = SourceLock::acquire(root, &token).map_err(|e| fail(format!("{e:#}")))?;

        if source_dir.is_dir() {
            tracing::debug!(
                target: "source",
                "({}) Checkout {} was created by another run",
                spec.name,
                source_dir.display()
            );
            return Ok(FetchOutcome {
                source_dir,
                fetched: false,
            });
        }

        let staging = root.join(format!(".{token}{PARTIAL_SUFFIX}"));
        if staging.exists() {
            tracing::info!(target: "source", "({}) Removing stale partial checkout {}", spec.name, staging.display());
            fs::remove_dir_all(&staging)
                .map_err(|e| fail(format!("cannot remove stale checkout {}: {e}", staging.display())))?;
        }

        let clone = ToolCommand::new(&self.config.tools.git)
            .args(["clone", spec.git_url.as_str(), "-b", spec.git_ref.as_str()])
            .arg(staging.display().to_string())
            .with_context(&spec.name);
        self.runner.run(&clone).map_err(|e| fail(e.to_string()))?;

        if !staging.is_dir() {
            return Err(fail(format!("clone did not create {}", staging.display())));
        }
        publish(&staging, &source_dir).map_err(|e| fail(format!("{e:#}")))?;

        tracing::info!(target: "source", "({}) Fetched {} into {}", spec.name, spec.git_ref, source_dir.display());
        Ok(FetchOutcome {
            source_dir,
            fetched: true,
        })
    }
}

fn publish(staging: &Path, target: &Path) -> anyhow::Result<()> {
    use anyhow::Context;

    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::rename(staging, target).with_context(|| {
        format!("Failed to move {} to {}", staging.display(), target.display())
    })
}
