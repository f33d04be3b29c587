//! External tool invocation.
//!
//! Every external step of a run (clone, configure, build, install) is described
//! by a [`ToolCommand`] and executed through a [`CommandRunner`]. The builder
//! keeps argument order exactly as given, because generator definitions must
//! be passed in the order they appear in the dependency list.
//!
//! [`SystemRunner`] is the production runner: it echoes each command as
//! `> program args...` on stdout, runs it with inherited stdio so tool output
//! streams straight to the terminal, and blocks until it exits. There is no
//! timeout: a hung tool hangs the run.
//!
//! # Examples
//!
//! ```rust,no_run
//! use depbuild::process::{CommandRunner, SystemRunner, ToolCommand};
//!
//! # fn example() -> anyhow::Result<()> {
//! let command = ToolCommand::new("ninja")
//!     .args(["-j", "8"])
//!     .current_dir("/tmp/build/zlib-v1.2.11")
//!     .with_context("zlib");
//! SystemRunner.run(&command)?;
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::time::Instant;
use thiserror::Error;

/// Failure to run an external tool to successful completion.
#[derive(Error, Debug)]
pub enum ProcessError {
    /// The program could not be found
    #[error("'{program}' not found")]
    NotFound {
        /// Program that was executed
        program: String,
    },

    /// The program exists but could not be started
    #[error("failed to start '{program}': {source}")]
    Launch {
        /// Program that was executed
        program: String,
        /// OS error
        #[source]
        source: std::io::Error,
    },

    /// The program ran and exited unsuccessfully
    #[error("'{command}' exited with {status}")]
    Failed {
        /// Rendered command line
        command: String,
        /// Exit code or terminating signal
        status: String,
    },
}

/// Builder describing one external invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    program: String,
    args: Vec<String>,
    current_dir: Option<PathBuf>,
    context: Option<String>,
}

impl ToolCommand {
    /// Create a command for `program` with no arguments.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            current_dir: None,
            context: None,
        }
    }

    /// Append one argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments, in order.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Run the command inside `dir` instead of the process working directory.
    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.current_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Tag log lines with a context (typically the dependency name).
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// The program to execute.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments in invocation order.
    #[must_use]
    pub fn arguments(&self) -> &[String] {
        &self.args
    }

    /// Working directory, if one was set.
    #[must_use]
    pub fn working_dir(&self) -> Option<&Path> {
        self.current_dir.as_deref()
    }

    /// Program and arguments joined by spaces, as echoed before execution.
    #[must_use]
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Executes [`ToolCommand`]s, blocking until each one finishes.
///
/// Implementations must only return `Ok` when the tool exited successfully.
pub trait CommandRunner {
    /// Run `command` to completion.
    fn run(&self, command: &ToolCommand) -> Result<(), ProcessError>;
}

impl<R: CommandRunner + ?Sized> CommandRunner for &R {
    fn run(&self, command: &ToolCommand) -> Result<(), ProcessError> {
        (**self).run(command)
    }
}

/// Runs commands as child processes with inherited stdio.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, command: &ToolCommand) -> Result<(), ProcessError> {
        let line = command.command_line();
        println!("> {line}");

        match (&command.context, &command.current_dir) {
            (Some(ctx), Some(dir)) => {
                tracing::debug!(target: "process", "({}) Executing in {}: {}", ctx, dir.display(), line);
            }
            (Some(ctx), None) => tracing::debug!(target: "process", "({}) Executing: {}", ctx, line),
            (None, Some(dir)) => {
                tracing::debug!(target: "process", "Executing in {}: {}", dir.display(), line);
            }
            (None, None) => tracing::debug!(target: "process", "Executing: {}", line),
        }

        let start = Instant::now();
        let mut cmd = Command::new(&command.program);
        cmd.args(&command.args).stdin(Stdio::inherit()).stdout(Stdio::inherit()).stderr(Stdio::inherit());
        if let Some(dir) = &command.current_dir {
            cmd.current_dir(dir);
        }

        let status = cmd.status().map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                ProcessError::NotFound {
                    program: command.program.clone(),
                }
            } else {
                ProcessError::Launch {
                    program: command.program.clone(),
                    source,
                }
            }
        })?;

        let elapsed = start.elapsed();
        if elapsed.as_secs() > 1 {
            tracing::info!(target: "process::perf", "{} took {:.2}s", command.program, elapsed.as_secs_f64());
        } else {
            tracing::debug!(target: "process::perf", "{} took {}ms", command.program, elapsed.as_millis());
        }

        if status.success() {
            Ok(())
        } else {
            tracing::debug!(target: "process", "Command failed with exit code: {:?}", status.code());
            Err(ProcessError::Failed {
                command: line,
                status: describe_status(status),
            })
        }
    }
}

fn describe_status(status: ExitStatus) -> String {
    if let Some(code) = status.code() {
        return format!("exit code {code}");
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return format!("signal {signal}");
        }
    }

    "unknown status".to_string()
}
