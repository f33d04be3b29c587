//! Test utilities for depbuild
//!
//! This module provides helpers for unit and integration tests:
//! - [`RecordingRunner`] - a [`CommandRunner`] that records invocations instead
//!   of spawning processes, and simulates the side effects tests rely on
//! - [`init_test_logging`] - one-time tracing setup for tests
//!
//! # Example
//!
//! ```rust,no_run
//! use depbuild::process::{CommandRunner, ToolCommand};
//! use depbuild::test_utils::RecordingRunner;
//!
//! let runner = RecordingRunner::new().fail_on("ninja install");
//! runner.run(&ToolCommand::new("ninja")).unwrap();
//! assert!(runner.run(&ToolCommand::new("ninja").arg("install")).is_err());
//! assert_eq!(runner.commands().len(), 2);
//! ```

use std::path::Path;
use std::sync::{Mutex, Once};
use tracing::Level;
use tracing_subscriber::EnvFilter;

use crate::process::{CommandRunner, ProcessError, ToolCommand};

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Uses the provided level, or `RUST_LOG` when no level is given. Without
/// either, tests stay silent.
///
/// ```bash
/// RUST_LOG=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .try_init();
    });
}

/// Records every command instead of running it.
///
/// Side effects are simulated so that the rest of a run behaves as it would
/// against real tools:
/// - `<git> clone ... <dir>` creates `<dir>` with a `README`, a
///   `CMakeLists.txt` and a hidden `.git/HEAD`
/// - a `-B <dir>` argument (CMake configure) creates `<dir>`
///
/// Commands whose command line starts with a prefix given to
/// [`fail_on`](Self::fail_on) fail with exit code 1 after being recorded. A
/// failing clone still leaves its partially written directory behind.
#[derive(Debug, Default)]
pub struct RecordingRunner {
    commands: Mutex<Vec<ToolCommand>>,
    failures: Vec<String>,
}

impl RecordingRunner {
    /// A runner where every command succeeds.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every command whose command line starts with `prefix`.
    #[must_use]
    pub fn fail_on(mut self, prefix: impl Into<String>) -> Self {
        self.failures.push(prefix.into());
        self
    }

    /// Commands run so far, in order.
    ///
    /// # Panics
    ///
    /// Panics if a previous holder of the internal lock panicked.
    #[must_use]
    pub fn commands(&self) -> Vec<ToolCommand> {
        self.commands.lock().expect("recording lock poisoned").clone()
    }

    /// Rendered command lines run so far, in order.
    #[must_use]
    pub fn command_lines(&self) -> Vec<String> {
        self.commands().iter().map(ToolCommand::command_line).collect()
    }

    fn simulate(command: &ToolCommand) -> std::io::Result<()> {
        let args = command.arguments();

        if args.first().map(String::as_str) == Some("clone") {
            if let Some(target) = args.last() {
                let target = Path::new(target);
                std::fs::create_dir_all(target.join(".git"))?;
                std::fs::write(target.join(".git/HEAD"), "ref: refs/heads/main\n")?;
                std::fs::write(target.join("README"), "pristine readme\n")?;
                std::fs::write(target.join("CMakeLists.txt"), "project(fake)\n")?;
            }
        }

        if let Some(position) = args.iter().position(|arg| arg == "-B") {
            if let Some(build_dir) = args.get(position + 1) {
                std::fs::create_dir_all(build_dir)?;
            }
        }

        Ok(())
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&self, command: &ToolCommand) -> Result<(), ProcessError> {
        self.commands.lock().expect("recording lock poisoned").push(command.clone());

        Self::simulate(command).map_err(|source| ProcessError::Launch {
            program: command.program().to_string(),
            source,
        })?;

        let line = command.command_line();
        if self.failures.iter().any(|prefix| line.starts_with(prefix.as_str())) {
            return Err(ProcessError::Failed {
                command: line,
                status: "exit code 1".to_string(),
            });
        }
        Ok(())
    }
}
