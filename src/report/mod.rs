//! Follow-up instructions printed after a successful run.
//!
//! Once every dependency is installed, the parent project can be configured
//! against the install prefix. [`FollowUp`] renders the commands for that,
//! using a build directory named after the same configuration as the
//! dependency build root, but with a shorter digest.

use std::fmt;

use crate::config::BuildConfiguration;
use crate::constants::{CMAKE_GENERATOR, SUGGESTED_BUILD_DIR_DIGITS};
use crate::naming::{to_posix_string, unique_name};

/// Commands to configure and build the parent project for this configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FollowUp {
    /// Suggested build directory, relative to the project root
    pub build_dir: String,
    /// `CMAKE_BUILD_TYPE`
    pub build_type: String,
    /// Install prefix, forward slashes
    pub install_prefix: String,
    /// `-j` value, if one was given
    pub parallelism: Option<String>,
}

impl FollowUp {
    /// Instructions matching `config`.
    #[must_use]
    pub fn from_config(config: &BuildConfiguration) -> Self {
        Self {
            build_dir: format!(
                "build/{}",
                unique_name(&config.install_root, &config.build_type, SUGGESTED_BUILD_DIR_DIGITS)
            ),
            build_type: config.build_type.clone(),
            install_prefix: to_posix_string(&config.install_root),
            parallelism: config.parallelism.clone(),
        }
    }
}

impl fmt::Display for FollowUp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let jobs = self.parallelism.as_ref().map(|n| format!(" -j {n}")).unwrap_or_default();

        writeln!(f, "To configure and build this configuration of this project consider running:")?;
        writeln!(f)?;
        writeln!(
            f,
            "    cmake -G {CMAKE_GENERATOR} -S . -B {} -DCMAKE_BUILD_TYPE={} -DCMAKE_INSTALL_PREFIX={}",
            self.build_dir, self.build_type, self.install_prefix
        )?;
        writeln!(f, "    ninja -C {}{jobs}", self.build_dir)?;
        writeln!(f, "    ninja -C {} install", self.build_dir)?;
        writeln!(f)?;
        writeln!(f, "\"{}\" should be unique to this build configuration.", self.build_dir)?;
        write!(
            f,
            "Run these commands from the same environment as the dependency build \
             (same compiler, e.g. a x64 Native Tools Command Prompt on Windows)."
        )
    }
}
