//! Patch overlay for dependencies that need local modifications.
//!
//! A dependency named `zlib` is patched when `{patch_root}/zlib/` exists. The
//! shared checkout is never written to; instead it is copied into the
//! configuration's build root and the patch files are laid over the copy:
//!
//! ```text
//! {source_root}/zlib-v1.2.11/          shared checkout (untouched)
//! {patch_root}/zlib/CMakeLists.txt     patch set
//! {build_root}/zlib-v1.2.11-src/       checkout copy + patch set
//! ```
//!
//! Hidden entries of the checkout (`.git` and friends) are not copied. Patch
//! files keep their path relative to the patch directory, so nested layouts
//! such as `{patch_root}/zlib/contrib/minizip/CMakeLists.txt` work.
//!
//! The copy is refreshed on every run: files are overwritten, but files that
//! disappeared from the checkout or the patch set are not removed.

use std::path::{Path, PathBuf};

use crate::config::BuildConfiguration;
use crate::constants::PATCHED_SOURCE_SUFFIX;
use crate::core::DepBuildError;
use crate::manifest::DependencySpec;
use crate::utils::{CopyOptions, copy_tree};

/// Produces the effective source directory of a dependency.
pub struct PatchOverlay<'a> {
    config: &'a BuildConfiguration,
}

impl<'a> PatchOverlay<'a> {
    /// Create an overlay reading patch sets from `config.patch_root`.
    pub const fn new(config: &'a BuildConfiguration) -> Self {
        Self {
            config,
        }
    }

    /// Location of the patch set for `spec`, whether or not it exists.
    #[must_use]
    pub fn patch_dir(&self, spec: &DependencySpec) -> PathBuf {
        self.config.patch_root.join(&spec.name)
    }

    /// Location of the patched copy for `spec`.
    #[must_use]
    pub fn patched_source_dir(&self, spec: &DependencySpec) -> PathBuf {
        self.config.build_root.join(format!("{}{PATCHED_SOURCE_SUFFIX}", spec.qualified_name()))
    }

    /// Return the directory the build should read sources from.
    ///
    /// Without a patch set this is `source_dir` itself. With one, the checkout
    /// is copied (hidden entries excluded) and the patch files are copied on
    /// top; the copy is returned.
    ///
    /// # Errors
    ///
    /// Returns [`DepBuildError::PatchFailed`] when any copy fails.
    pub fn prepare_source(&self, spec: &DependencySpec, source_dir: &Path) -> Result<PathBuf, DepBuildError> {
        let patch_dir = self.patch_dir(spec);
        if !patch_dir.is_dir() {
            tracing::debug!(target: "patch", "({}) No patch set at {}", spec.name, patch_dir.display());
            return Ok(source_dir.to_path_buf());
        }

        tracing::info!(target: "patch", "Patching {}", spec.name);
        let target = self.patched_source_dir(spec);
        let fail = |path: &Path, error: anyhow::Error| DepBuildError::PatchFailed {
            name: spec.name.clone(),
            path: path.display().to_string(),
            reason: format!("{error:#}"),
        };

        let copied = copy_tree(
            source_dir,
            &target,
            CopyOptions {
                skip_hidden: true,
            },
        )
        .map_err(|e| fail(source_dir, e))?;
        tracing::debug!(target: "patch", "({}) Copied {} checkout files to {}", spec.name, copied, target.display());

        let patched = copy_tree(&patch_dir, &target, CopyOptions::default()).map_err(|e| fail(&patch_dir, e))?;
        tracing::debug!(target: "patch", "({}) Applied {} patch files", spec.name, patched);

        Ok(target)
    }
}
