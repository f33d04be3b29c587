//! depbuild - build a project's pinned source dependencies
//!
//! Many CMake projects depend on third-party libraries that are not reliably
//! available from a system package manager. depbuild fetches each of them at a
//! pinned revision, optionally overlays local patch files, and configures,
//! builds and installs them with CMake and Ninja into one install prefix that
//! the parent project is then configured against.
//!
//! # Architecture Overview
//!
//! - Sources are checked out once per `{name}-{git_ref}` into a source root
//!   shared by every build configuration, and never modified afterwards
//! - Each build configuration (install prefix + build type) gets its own build
//!   root, named deterministically from the configuration
//! - Dependencies are installed in list order, so later entries can find
//!   earlier ones in the install prefix
//!
//! # Core Modules
//!
//! ## Orchestration
//! - [`cli`] - Command-line interface
//! - [`config`] - Run configuration and defaults
//! - [`pipeline`] - Fetch phase, then build phase, then follow-up report
//!
//! ## Steps
//! - [`manifest`] - Dependency list parsing and validation
//! - [`source`] - Shared source checkouts
//! - [`patch`] - Patch overlay onto a private copy of a checkout
//! - [`build`] - Configure/build/install with CMake and Ninja
//! - [`report`] - Follow-up instructions for the parent project
//!
//! ## Supporting Modules
//! - [`core`] - Error types and user-facing error rendering
//! - [`naming`] - Deterministic configuration names
//! - [`process`] - External tool invocation
//! - [`preflight`] - Host tool checks
//! - [`utils`] - File system helpers
//!
//! # Dependency List
//!
//! ```json
//! [
//!   {
//!     "name": "zlib",
//!     "git_url": "https://github.com/madler/zlib.git",
//!     "git_ref": "v1.2.11",
//!     "variables": [{ "name": "BUILD_SHARED_LIBS", "value": "OFF" }]
//!   }
//! ]
//! ```
//!
//! # Command-Line Usage
//!
//! ```bash
//! # Fetch, build and install everything into ./install
//! depbuild -i install
//!
//! # Another configuration sharing the same sources
//! depbuild -i install-debug -c Debug -j 8
//!
//! # Fetch only
//! depbuild -i install -d
//! ```

// Orchestration
pub mod cli;
pub mod config;
pub mod pipeline;

// Steps
pub mod build;
pub mod manifest;
pub mod patch;
pub mod report;
pub mod source;

// Supporting modules
pub mod constants;
pub mod core;
pub mod naming;
pub mod preflight;
pub mod process;
pub mod utils;

// test_utils module is available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
