//! Configure, build and install one dependency with CMake and Ninja.
//!
//! Each dependency gets its own build directory `{build_root}/{qualified}`
//! and is installed into the shared install prefix. The three steps run
//! strictly in sequence and the first failure stops the dependency:
//!
//! ```text
//! cmake -G Ninja -S <src> -B <build> -DCMAKE_BUILD_TYPE=<type> -DCMAKE_INSTALL_PREFIX=<prefix> -D<var>=<value>...
//! ninja [-j <N>]        (in <build>)
//! ninja install         (in <build>)
//! ```
//!
//! Paths are passed with forward slashes. Build variables follow the two
//! fixed definitions, in the order they appear in the dependency list.
//! Configure is re-run on every invocation; Ninja decides what actually
//! needs rebuilding.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::BuildConfiguration;
use crate::constants::CMAKE_GENERATOR;
use crate::core::DepBuildError;
use crate::manifest::DependencySpec;
use crate::naming::to_posix_string;
use crate::process::{CommandRunner, ToolCommand};

/// The three external steps of a dependency build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildStep {
    /// Generate build files
    Configure,
    /// Compile
    Build,
    /// Copy artifacts into the install prefix
    Install,
}

impl fmt::Display for BuildStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configure => write!(f, "configure"),
            Self::Build => write!(f, "build"),
            Self::Install => write!(f, "install"),
        }
    }
}

/// Runs the configure/build/install sequence for dependencies.
pub struct BuildDriver<'a, R: CommandRunner> {
    config: &'a BuildConfiguration,
    runner: &'a R,
}

impl<'a, R: CommandRunner> BuildDriver<'a, R> {
    /// Create a driver building under `config.build_root`.
    pub const fn new(config: &'a BuildConfiguration, runner: &'a R) -> Self {
        Self {
            config,
            runner,
        }
    }

    /// Build directory of `spec` for this configuration.
    #[must_use]
    pub fn build_dir(&self, spec: &DependencySpec) -> PathBuf {
        self.config.build_root.join(spec.qualified_name())
    }

    /// The invocations [`build`](Self::build) runs, in order.
    #[must_use]
    pub fn commands(&self, spec: &DependencySpec, source_dir: &Path) -> [(BuildStep, ToolCommand); 3] {
        let build_dir = self.build_dir(spec);
        let tools = &self.config.tools;

        let configure = ToolCommand::new(&tools.cmake)
            .args(["-G", CMAKE_GENERATOR, "-S"])
            .arg(to_posix_string(source_dir))
            .arg("-B")
            .arg(to_posix_string(&build_dir))
            .arg(format!("-DCMAKE_BUILD_TYPE={}", self.config.build_type))
            .arg(format!("-DCMAKE_INSTALL_PREFIX={}", to_posix_string(&self.config.install_root)))
            .args(spec.variables.iter().map(|variable| variable.to_definition()))
            .with_context(&spec.name);

        let mut compile = ToolCommand::new(&tools.ninja);
        if let Some(jobs) = &self.config.parallelism {
            compile = compile.args(["-j", jobs.as_str()]);
        }
        let compile = compile.current_dir(&build_dir).with_context(&spec.name);

        let install = ToolCommand::new(&tools.ninja).arg("install").current_dir(&build_dir).with_context(&spec.name);

        [(BuildStep::Configure, configure), (BuildStep::Build, compile), (BuildStep::Install, install)]
    }

    /// Configure, build and install `spec` from `source_dir`.
    ///
    /// # Errors
    ///
    /// Returns [`DepBuildError::BuildStepFailed`] naming the first step that
    /// did not succeed. Later steps are not run.
    pub fn build(&self, spec: &DependencySpec, source_dir: &Path) -> Result<(), DepBuildError> {
        tracing::info!(target: "build", "Building {} ({})", spec.name, spec.git_ref);

        for (step, command) in self.commands(spec, source_dir) {
            tracing::debug!(target: "build", "({}) Running {} step", spec.name, step);
            self.runner.run(&command).map_err(|e| DepBuildError::BuildStepFailed {
                name: spec.name.clone(),
                step,
                reason: e.to_string(),
            })?;
        }

        tracing::info!(target: "build", "Installed {} into {}", spec.name, self.config.install_root.display());
        Ok(())
    }
}
