//! Integration test suite for depbuild
//!
//! These tests run the `depbuild` binary end to end against temporary
//! projects, with shell-script stand-ins for `git`, `cmake` and `ninja` (see
//! `tests/common`). They need a POSIX shell and are skipped elsewhere.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **build_flow**: Full runs, ordering, idempotent re-runs, configurations
//! - **download_only**: `--download-only` behavior
//! - **patches**: Patch overlay
//! - **error_scenarios**: Failing tools, bad inputs, exit codes
//! - **options**: Option defaults, environment variables, TOML lists
//! - **library**: Library API with the recording runner from `test-utils`

#![cfg(unix)]

// Shared test utilities (from parent tests/ directory)
#[path = "../common/mod.rs"]
mod common;

mod build_flow;
mod error_scenarios;
mod library;
