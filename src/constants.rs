//! Global constants used throughout the depbuild codebase.
//!
//! Default directory names, file locations, tool names and environment
//! variable names live here so the CLI, the configuration layer and the
//! tests agree on them.

/// Build type forwarded to `CMAKE_BUILD_TYPE` when none is given.
pub const DEFAULT_BUILD_TYPE: &str = "RelWithDebInfo";

/// CMake generator used for every dependency and in the follow-up instructions.
pub const CMAKE_GENERATOR: &str = "Ninja";

/// Directory under the project root holding shared sources and build roots.
pub const DEPS_DIR: &str = ".deps";

/// Subdirectory of [`DEPS_DIR`] holding the shared source checkouts.
pub const SOURCE_SUBDIR: &str = "source";

/// Subdirectory of [`DEPS_DIR`] holding one build root per configuration.
pub const BUILD_SUBDIR: &str = "build";

/// Location of the dependency list relative to the project root.
pub const DEPENDENCIES_FILE: &str = "scripts/build/build_dependencies.json";

/// Hex digits of the install-path digest used for the default build root.
pub const BUILD_ROOT_DIGITS: usize = 32;

/// Hex digits of the install-path digest used in the suggested parent build dir.
pub const SUGGESTED_BUILD_DIR_DIGITS: usize = 8;

/// Directory (under the source root) holding per-checkout lock files.
pub const LOCKS_DIR: &str = ".locks";

/// Suffix of the staging directory a clone is written into before it is
/// renamed into place.
pub const PARTIAL_SUFFIX: &str = ".partial";

/// Suffix appended to the qualified name for patched source copies.
pub const PATCHED_SOURCE_SUFFIX: &str = "-src";

/// Default program names for the external collaborators.
pub const DEFAULT_GIT: &str = "git";
/// Default build-file generator.
pub const DEFAULT_CMAKE: &str = "cmake";
/// Default build driver.
pub const DEFAULT_NINJA: &str = "ninja";

/// Environment variable overriding the revision-control client.
pub const GIT_ENV: &str = "DEPBUILD_GIT";
/// Environment variable overriding the build-file generator.
pub const CMAKE_ENV: &str = "DEPBUILD_CMAKE";
/// Environment variable overriding the build driver.
pub const NINJA_ENV: &str = "DEPBUILD_NINJA";
