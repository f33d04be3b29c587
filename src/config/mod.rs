//! Run configuration for depbuild
//!
//! A run is described by a single immutable [`BuildConfiguration`], resolved
//! once from the command line (or environment) and then borrowed by every
//! component. Nothing is persisted between runs except what the paths in the
//! configuration name on disk.
//!
//! # Directory Layout
//!
//! ```text
//! {project}/
//! ├── scripts/build/
//! │   ├── build_dependencies.json   # dependency list (default)
//! │   └── <name>/                   # optional patch set for dependency <name>
//! └── .deps/
//!     ├── source/                   # shared by all configurations
//!     │   └── <name>-<git_ref>/     # one checkout per qualified name
//!     └── build/
//!         └── <type>-<digest>/      # one build root per configuration
//!             ├── <name>-<git_ref>/       # CMake build directory
//!             └── <name>-<git_ref>-src/   # patched source copy
//! ```
//!
//! The build root defaults to a name derived from the install prefix and the
//! build type (see [`crate::naming::unique_name`]), so two configurations never
//! share build artifacts while both reuse the same checkouts.
//!
//! # Tool Locations
//!
//! The external collaborators default to `git`, `cmake` and `ninja` on `PATH`.
//! `DEPBUILD_GIT`, `DEPBUILD_CMAKE` and `DEPBUILD_NINJA` override them.

use std::path::{Path, PathBuf};

use crate::constants::{
    BUILD_ROOT_DIGITS, BUILD_SUBDIR, CMAKE_ENV, DEFAULT_BUILD_TYPE, DEFAULT_CMAKE, DEFAULT_GIT,
    DEFAULT_NINJA, DEPENDENCIES_FILE, DEPS_DIR, GIT_ENV, NINJA_ENV, SOURCE_SUBDIR,
};
use crate::core::DepBuildError;
use crate::naming::{clean_path, normalize_path, unique_name};

/// Programs used for the three external collaborators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolPaths {
    /// Revision-control client
    pub git: String,
    /// Build-file generator
    pub cmake: String,
    /// Build driver
    pub ninja: String,
}

impl Default for ToolPaths {
    fn default() -> Self {
        Self {
            git: DEFAULT_GIT.to_string(),
            cmake: DEFAULT_CMAKE.to_string(),
            ninja: DEFAULT_NINJA.to_string(),
        }
    }
}

impl ToolPaths {
    /// Defaults overridden by `DEPBUILD_GIT`, `DEPBUILD_CMAKE`, `DEPBUILD_NINJA`.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let lookup = |key: &str, default: String| {
            std::env::var(key).ok().filter(|value| !value.trim().is_empty()).unwrap_or(default)
        };

        Self {
            git: lookup(GIT_ENV, defaults.git),
            cmake: lookup(CMAKE_ENV, defaults.cmake),
            ninja: lookup(NINJA_ENV, defaults.ninja),
        }
    }

    /// Make relative paths such as `bin/ninja` absolute against `cwd`.
    ///
    /// Bare program names stay untouched so they are still looked up on
    /// `PATH`. Build steps run inside the build directory, so a relative path
    /// would otherwise resolve against a different directory than preflight.
    #[must_use]
    pub fn anchored(self, cwd: &Path) -> Self {
        let anchor = |tool: String| {
            if tool.contains(std::path::is_separator) {
                normalize_path(Path::new(&tool), cwd).to_string_lossy().into_owned()
            } else {
                tool
            }
        };

        Self {
            git: anchor(self.git),
            cmake: anchor(self.cmake),
            ninja: anchor(self.ninja),
        }
    }
}

/// Raw inputs of a run, before defaults are applied.
///
/// Relative paths are interpreted against the directory passed to
/// [`BuildConfiguration::resolve`].
#[derive(Debug, Clone, Default)]
pub struct ConfigInputs {
    /// Root of the parent project
    pub project_dir: Option<PathBuf>,
    /// Shared source root
    pub source_dir: Option<PathBuf>,
    /// Per-configuration build root
    pub build_dir: Option<PathBuf>,
    /// Install prefix (required)
    pub install_dir: PathBuf,
    /// Dependency list
    pub dependencies_file: Option<PathBuf>,
    /// Directory holding one patch set per dependency name
    pub patch_dir: Option<PathBuf>,
    /// `CMAKE_BUILD_TYPE`
    pub build_type: Option<String>,
    /// Parallelism hint for the build driver
    pub thread_count: Option<String>,
    /// Stop after the fetch phase
    pub download_only: bool,
}

/// Immutable context of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfiguration {
    /// Root of the parent project
    pub project_root: PathBuf,
    /// Shared, long-lived checkouts, one per qualified name
    pub source_root: PathBuf,
    /// Build artifacts of this configuration only
    pub build_root: PathBuf,
    /// Shared install prefix (normalized, absolute)
    pub install_root: PathBuf,
    /// Dependency list location
    pub dependencies_file: PathBuf,
    /// Patch sets live in `{patch_root}/{name}`
    pub patch_root: PathBuf,
    /// `CMAKE_BUILD_TYPE`
    pub build_type: String,
    /// Forwarded untouched as `-j <value>`
    pub parallelism: Option<String>,
    /// Stop after the fetch phase
    pub download_only: bool,
    /// External programs
    pub tools: ToolPaths,
}

impl BuildConfiguration {
    /// Apply defaults to `inputs`, resolving relative paths against `cwd`.
    ///
    /// # Errors
    ///
    /// Returns [`DepBuildError::ConfigError`] when the build type or thread
    /// count is empty.
    pub fn resolve(inputs: ConfigInputs, cwd: &Path, tools: ToolPaths) -> Result<Self, DepBuildError> {
        let absolute = |path: &Path| normalize_path(path, cwd);

        let build_type = inputs.build_type.unwrap_or_else(|| DEFAULT_BUILD_TYPE.to_string());
        if build_type.trim().is_empty() {
            return Err(DepBuildError::ConfigError {
                message: "build type must not be empty".to_string(),
            });
        }

        let parallelism = match inputs.thread_count {
            Some(count) if count.trim().is_empty() => {
                return Err(DepBuildError::ConfigError {
                    message: "thread count must not be empty".to_string(),
                });
            }
            other => other,
        };

        let project_root = match inputs.project_dir {
            Some(dir) => absolute(&dir),
            None => find_project_root(cwd).unwrap_or_else(|| clean_path(cwd)),
        };
        let install_root = absolute(&inputs.install_dir);

        let source_root = inputs
            .source_dir
            .map(|dir| absolute(&dir))
            .unwrap_or_else(|| project_root.join(DEPS_DIR).join(SOURCE_SUBDIR));
        let build_root = inputs.build_dir.map(|dir| absolute(&dir)).unwrap_or_else(|| {
            project_root
                .join(DEPS_DIR)
                .join(BUILD_SUBDIR)
                .join(unique_name(&install_root, &build_type, BUILD_ROOT_DIGITS))
        });
        let dependencies_file = inputs
            .dependencies_file
            .map(|file| absolute(&file))
            .unwrap_or_else(|| project_root.join(DEPENDENCIES_FILE));
        let patch_root = match inputs.patch_dir {
            Some(dir) => absolute(&dir),
            None => dependencies_file.parent().map_or_else(|| project_root.clone(), Path::to_path_buf),
        };

        let config = Self {
            project_root,
            source_root,
            build_root,
            install_root,
            dependencies_file,
            patch_root,
            build_type,
            parallelism,
            download_only: inputs.download_only,
            tools: tools.anchored(cwd),
        };

        tracing::debug!(target: "config", "Resolved configuration: {:?}", config);
        Ok(config)
    }
}

/// Find the nearest ancestor of `start` (inclusive) containing the default
/// dependency list.
#[must_use]
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    clean_path(start)
        .ancestors()
        .find(|dir| dir.join(DEPENDENCIES_FILE).is_file())
        .map(Path::to_path_buf)
}
