//! End-to-end orchestration of a run.
//!
//! A run has two phases. The fetch phase makes sure every dependency of the
//! list has a shared checkout; the build phase then configures, builds and
//! installs each dependency into the install prefix:
//!
//! ```text
//! load list ─► check git ─► fetch all ─┬─► (download only) done
//!                                       └─► check cmake/ninja ─► per dependency:
//!                                             patch overlay ─► configure ─► build ─► install
//! ```
//!
//! Both phases walk the list in order, and the build phase starts only after
//! every fetch succeeded. The first failure aborts the run. Nothing is rolled
//! back: fetched checkouts stay, and installed dependencies stay installed.

use anyhow::Result;

use crate::build::BuildDriver;
use crate::config::BuildConfiguration;
use crate::manifest::{DependencySpec, load_dependencies};
use crate::patch::PatchOverlay;
use crate::preflight;
use crate::process::CommandRunner;
use crate::report::FollowUp;
use crate::source::SourceFetcher;

/// What a run did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Qualified names cloned by this run
    pub fetched: Vec<String>,
    /// Qualified names whose checkout already existed
    pub reused: Vec<String>,
    /// Dependency names installed by this run, in install order
    pub built: Vec<String>,
    /// Instructions for the parent project; `None` in download-only mode
    pub follow_up: Option<FollowUp>,
}

/// Drives one run over a [`BuildConfiguration`].
pub struct Pipeline<'a, R: CommandRunner> {
    config: &'a BuildConfiguration,
    runner: &'a R,
    preflight: bool,
}

impl<'a, R: CommandRunner> Pipeline<'a, R> {
    /// Create a pipeline that checks for the external tools before each phase.
    pub const fn new(config: &'a BuildConfiguration, runner: &'a R) -> Self {
        Self {
            config,
            runner,
            preflight: true,
        }
    }

    /// Enable or disable the `PATH` lookup of the external tools.
    ///
    /// Runners that do not spawn real processes have no use for it.
    #[must_use]
    pub const fn with_preflight(mut self, enabled: bool) -> Self {
        self.preflight = enabled;
        self
    }

    /// Execute the run.
    ///
    /// # Errors
    ///
    /// Returns the first failure as a [`crate::core::DepBuildError`] wrapped in
    /// [`anyhow::Error`].
    pub fn run(&self) -> Result<RunSummary> {
        let specs = load_dependencies(&self.config.dependencies_file)?;
        tracing::info!(
            target: "pipeline",
            "Loaded {} dependencies from {}",
            specs.len(),
            self.config.dependencies_file.display()
        );

        let mut summary = RunSummary::default();
        let sources = self.fetch_all(&specs, &mut summary)?;

        if self.config.download_only {
            tracing::info!(target: "pipeline", "Download only: skipping build of {} dependencies", specs.len());
            return Ok(summary);
        }

        if self.preflight && !specs.is_empty() {
            preflight::check_build_tools(&self.config.tools)?;
        }

        let overlay = PatchOverlay::new(self.config);
        let driver = BuildDriver::new(self.config, self.runner);
        for (spec, source_dir) in specs.iter().zip(&sources) {
            let effective = overlay.prepare_source(spec, source_dir)?;
            driver.build(spec, &effective)?;
            summary.built.push(spec.name.clone());
        }

        summary.follow_up = Some(FollowUp::from_config(self.config));
        Ok(summary)
    }

    fn fetch_all(&self, specs: &[DependencySpec], summary: &mut RunSummary) -> Result<Vec<std::path::PathBuf>> {
        if self.preflight && !specs.is_empty() {
            preflight::check_fetch_tools(&self.config.tools)?;
        }

        let fetcher = SourceFetcher::new(self.config, self.runner);
        let mut sources = Vec::with_capacity(specs.len());
        for spec in specs {
            let outcome = fetcher.ensure_fetched(spec)?;
            if outcome.fetched {
                summary.fetched.push(spec.qualified_name());
            } else {
                summary.reused.push(spec.qualified_name());
            }
            sources.push(outcome.source_dir);
        }
        Ok(sources)
    }
}
