//! Command-line interface for depbuild.
//!
//! `depbuild` has a single command: fetch, build and install every dependency
//! of the project's dependency list into one install prefix. All options can
//! also be given through `DEPBUILD_*` environment variables, which is handy
//! in CI where the same configuration is reused across several steps.
//!
//! # Examples
//!
//! ```bash
//! # Build everything into ./install with the default build type
//! depbuild -i install
//!
//! # Debug configuration, 8 parallel jobs
//! depbuild -i /opt/deps-debug -c Debug -j 8
//!
//! # Only fetch sources (e.g. before going offline)
//! depbuild -i install --download-only
//! ```
//!
//! # Logging
//!
//! Log output goes to stderr. `--verbose` enables debug output, `--quiet`
//! restricts it to errors. `RUST_LOG` overrides both:
//!
//! ```bash
//! RUST_LOG=process=debug depbuild -i install
//! ```
//!
//! Tool output and the `> command` echo lines go to stdout and are not
//! affected by the log level.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::config::{BuildConfiguration, ConfigInputs, ToolPaths};
use crate::pipeline::{Pipeline, RunSummary};
use crate::process::SystemRunner;

/// Fetch, patch, build and install a project's CMake dependencies.
#[derive(Parser, Debug)]
#[command(
    name = "depbuild",
    about = "Build a project's source dependencies into a shared install prefix",
    version,
    long_about = "Fetches every dependency of the dependency list at its pinned revision, \
                  applies local patch sets, and configures, builds and installs each one \
                  with CMake and Ninja into a single install prefix."
)]
pub struct Cli {
    /// Root directory of the parent project.
    ///
    /// Defaults to the nearest ancestor of the current directory containing
    /// `scripts/build/build_dependencies.json`, else the current directory.
    #[arg(short = 'p', long, env = "DEPBUILD_PROJECT_DIR")]
    project_dir: Option<PathBuf>,

    /// Directory for dependency sources, shared by all build configurations.
    ///
    /// Defaults to `<project>/.deps/source`.
    #[arg(short = 'S', long, env = "DEPBUILD_SOURCE_DIR")]
    source_dir: Option<PathBuf>,

    /// Directory to build the dependencies in, unique per build configuration.
    ///
    /// Defaults to `<project>/.deps/build/<build-type>-<digest of install dir>`.
    #[arg(short = 'B', long, env = "DEPBUILD_BUILD_DIR")]
    build_dir: Option<PathBuf>,

    /// Directory to install this configuration and its dependencies into.
    #[arg(short = 'i', long, env = "DEPBUILD_INSTALL_DIR")]
    install_dir: PathBuf,

    /// File listing the dependencies and how to build them (JSON or TOML).
    #[arg(long, env = "DEPBUILD_DEPENDENCIES_FILE")]
    build_dependencies_file: Option<PathBuf>,

    /// Directory holding one patch set per dependency name.
    ///
    /// Defaults to the directory containing the dependency list.
    #[arg(long, env = "DEPBUILD_PATCH_DIR")]
    patch_dir: Option<PathBuf>,

    /// Value of `CMAKE_BUILD_TYPE`.
    #[arg(short = 'c', long, env = "DEPBUILD_BUILD_TYPE", default_value = crate::constants::DEFAULT_BUILD_TYPE)]
    build_type: String,

    /// Limit the number of parallel jobs when building dependencies.
    #[arg(short = 'j', long, env = "DEPBUILD_THREAD_COUNT")]
    thread_count: Option<String>,

    /// Stop after downloading the dependencies.
    #[arg(short = 'd', long, env = "DEPBUILD_DOWNLOAD_ONLY")]
    download_only: bool,

    /// Enable debug output.
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only report errors.
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    /// Run depbuild with the parsed arguments.
    ///
    /// # Errors
    ///
    /// Returns the first failure of the run; the caller renders it with
    /// [`crate::core::user_friendly_error`].
    pub fn execute(self) -> Result<()> {
        self.init_logging();

        let cwd = std::env::current_dir().context("Failed to determine the current directory")?;
        let config = BuildConfiguration::resolve(self.config_inputs(), &cwd, ToolPaths::from_env())?;

        let summary = Pipeline::new(&config, &SystemRunner).run()?;
        report(&summary);
        Ok(())
    }

    /// Translate the arguments into configuration inputs.
    #[must_use]
    pub fn config_inputs(&self) -> ConfigInputs {
        ConfigInputs {
            project_dir: self.project_dir.clone(),
            source_dir: self.source_dir.clone(),
            build_dir: self.build_dir.clone(),
            install_dir: self.install_dir.clone(),
            dependencies_file: self.build_dependencies_file.clone(),
            patch_dir: self.patch_dir.clone(),
            build_type: Some(self.build_type.clone()),
            thread_count: self.thread_count.clone(),
            download_only: self.download_only,
        }
    }

    /// Log filter implied by `--verbose`/`--quiet`.
    #[must_use]
    pub const fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            "info"
        }
    }

    fn init_logging(&self) {
        let filter = if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            EnvFilter::new(self.log_level())
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }
}

fn report(summary: &RunSummary) {
    tracing::info!(
        "Fetched {} and reused {} checkouts, installed {} dependencies",
        summary.fetched.len(),
        summary.reused.len(),
        summary.built.len()
    );

    if let Some(follow_up) = &summary.follow_up {
        println!();
        println!("{follow_up}");
    }
}
