//! Error handling for depbuild
//!
//! This module provides the error types and user-friendly error reporting for the
//! dependency build orchestrator. The error system follows two principles:
//! 1. **Strongly-typed errors** for precise handling inside the library
//! 2. **User-friendly messages** with actionable suggestions for CLI users
//!
//! # Architecture
//!
//! - [`DepBuildError`] - Enumerated error types for every failure mode of a run
//! - [`ErrorContext`] - Wrapper that adds details and suggestions for display
//!
//! # Error Categories
//!
//! Every run aborts on the first error (fail-fast). The variants group into the
//! four kinds a run can fail with, plus environment problems:
//! - **Configuration**: [`DepBuildError::ConfigError`],
//!   [`DepBuildError::DependencyFileNotFound`],
//!   [`DepBuildError::DependencyFileParseError`],
//!   [`DepBuildError::InvalidDependency`]
//! - **Fetch**: [`DepBuildError::FetchFailed`]
//! - **Patch**: [`DepBuildError::PatchFailed`]
//! - **Build**: [`DepBuildError::BuildStepFailed`]
//! - **Environment**: [`DepBuildError::ToolNotFound`], [`DepBuildError::IoError`]
//!
//! # Examples
//!
//! ```rust,no_run
//! use depbuild::core::{DepBuildError, user_friendly_error};
//!
//! let error = DepBuildError::ToolNotFound {
//!     tool: "cmake".to_string(),
//!     program: "cmake".to_string(),
//! };
//! let ctx = user_friendly_error(anyhow::Error::from(error));
//! ctx.display(); // Shows colored error with suggestions
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

use crate::build::BuildStep;

/// The main error type for depbuild operations
///
/// Each variant names the dependency or file involved so the first failure of
/// a run can be reported without any further lookup.
#[derive(Error, Debug)]
pub enum DepBuildError {
    /// Generic configuration problem (conflicting or unusable CLI inputs)
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the configuration error
        message: String,
    },

    /// The dependency list does not exist
    #[error("Dependency list not found: {path}")]
    DependencyFileNotFound {
        /// Path that was expected to hold the dependency list
        path: String,
    },

    /// The dependency list is not valid JSON/TOML or has the wrong shape
    #[error("Invalid dependency list syntax in {file}")]
    DependencyFileParseError {
        /// Path to the dependency list
        file: String,
        /// Parser message
        reason: String,
    },

    /// One entry of the dependency list is incomplete or inconsistent
    #[error("Invalid dependency #{index} in {file}: {reason}")]
    InvalidDependency {
        /// Path to the dependency list
        file: String,
        /// Zero-based position of the entry in the list
        index: usize,
        /// What is wrong with the entry
        reason: String,
    },

    /// The revision-control client could not produce the pinned checkout
    #[error("Failed to fetch '{name}' at '{reference}' from {url}")]
    FetchFailed {
        /// Dependency name
        name: String,
        /// Repository URL
        url: String,
        /// Pinned revision
        reference: String,
        /// Underlying failure
        reason: String,
    },

    /// Copying the checkout or the patch files into the patched source failed
    #[error("Failed to apply patches for '{name}' at {path}")]
    PatchFailed {
        /// Dependency name
        name: String,
        /// Path being copied when the failure happened
        path: String,
        /// Underlying failure
        reason: String,
    },

    /// Configure, build or install of a dependency failed
    #[error("{step} step failed for '{name}'")]
    BuildStepFailed {
        /// Dependency name
        name: String,
        /// Which of the three steps failed
        step: BuildStep,
        /// Underlying failure
        reason: String,
    },

    /// An external tool is not available
    #[error("Required tool '{tool}' not found (looked for '{program}')")]
    ToolNotFound {
        /// Role of the tool (git, cmake, ninja)
        tool: String,
        /// Program name or path that was searched for
        program: String,
    },

    /// IO error from std
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Anything else, carrying the full error chain
    #[error("{message}")]
    Other {
        /// Error message
        message: String,
    },
}

/// Error wrapper that adds user-facing details and a suggestion
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: DepBuildError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context without details or suggestion.
    #[must_use]
    pub const fn new(error: DepBuildError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error (printed in green).
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add details explaining the error (printed in yellow).
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Display the error context to stderr with terminal colors
    ///
    /// - Error message: Red and bold
    /// - Details: Yellow
    /// - Suggestion: Green
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error to a user-friendly [`ErrorContext`] with actionable suggestions
///
/// Typed [`DepBuildError`]s are looked up through any `anyhow` context layers.
/// Plain IO errors get a generic suggestion. Everything else is reported with
/// its full cause chain.
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    let outermost = error.to_string();

    let error = match error.downcast::<DepBuildError>() {
        Ok(typed) => {
            let ctx = create_error_context(typed);
            // Keep the outermost context message when the typed error was wrapped
            return if ctx.details.is_none() && ctx.error.to_string() != outermost {
                ctx.with_details(outermost)
            } else {
                ctx
            };
        }
        Err(error) => error,
    };
    let chain = format_chain(&error);

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        match io_error.kind() {
            std::io::ErrorKind::PermissionDenied => {
                return ErrorContext::new(DepBuildError::Other {
                    message: error.to_string(),
                })
                .with_suggestion("Check ownership and permissions of the source, build and install directories")
                .with_details("depbuild could not read or write one of its working directories");
            }
            std::io::ErrorKind::NotFound => {
                return ErrorContext::new(DepBuildError::Other {
                    message: error.to_string(),
                })
                .with_suggestion("Check that the paths passed on the command line exist");
            }
            _ => {}
        }
    }

    let mut message = error.to_string();
    if let Some(chain) = chain {
        message.push_str("\n\n");
        message.push_str(&chain);
    }

    ErrorContext::new(DepBuildError::Other {
        message,
    })
}

fn format_chain(error: &anyhow::Error) -> Option<String> {
    let causes: Vec<String> = error.chain().skip(1).map(ToString::to_string).collect();
    if causes.is_empty() {
        return None;
    }

    let mut message = String::from("Caused by:");
    for (i, cause) in causes.iter().enumerate() {
        message.push_str(&format!("\n  {}: {}", i + 1, cause));
    }
    Some(message)
}

/// Map each [`DepBuildError`] variant to tailored details and suggestions.
fn create_error_context(error: DepBuildError) -> ErrorContext {
    match &error {
        DepBuildError::DependencyFileNotFound { .. } => {
            let ctx = ErrorContext::new(error);
            ctx.with_suggestion(
                "Pass --build-dependencies-file or run from inside a project that has scripts/build/build_dependencies.json",
            )
        }
        DepBuildError::DependencyFileParseError { reason, .. } => {
            let details = reason.clone();
            ErrorContext::new(error)
                .with_details(details)
                .with_suggestion("The dependency list must be an array of {name, git_url, git_ref, variables} records")
        }
        DepBuildError::InvalidDependency { .. } => ErrorContext::new(error).with_suggestion(
            "Every dependency needs a unique 'name', a 'git_url' and a 'git_ref'; 'variables' is optional",
        ),
        DepBuildError::FetchFailed { reason, reference, .. } => {
            let details = reason.clone();
            let suggestion =
                format!("Check the repository URL and that '{reference}' exists as a branch or tag");
            ErrorContext::new(error).with_details(details).with_suggestion(suggestion)
        }
        DepBuildError::PatchFailed { reason, .. } => {
            let details = reason.clone();
            ErrorContext::new(error)
                .with_details(details)
                .with_suggestion("Check free disk space and permissions of the build directory")
        }
        DepBuildError::BuildStepFailed { reason, step, .. } => {
            let details = reason.clone();
            let suggestion = match step {
                BuildStep::Configure => {
                    "Inspect the CMake output above; fix the dependency variables or patches and re-run"
                }
                BuildStep::Build => "Inspect the compiler output above, fix the sources or patches and re-run",
                BuildStep::Install => "Check that the install directory is writable and re-run",
            };
            ErrorContext::new(error).with_details(details).with_suggestion(suggestion)
        }
        DepBuildError::ToolNotFound { tool, .. } => {
            let suggestion = format!(
                "Install {tool} and make sure it is on PATH, or point {} at the executable",
                tool_env_var(tool)
            );
            ErrorContext::new(error).with_suggestion(suggestion)
        }
        _ => ErrorContext::new(error),
    }
}

fn tool_env_var(tool: &str) -> &'static str {
    match tool {
        "git" => crate::constants::GIT_ENV,
        "cmake" => crate::constants::CMAKE_ENV,
        _ => crate::constants::NINJA_ENV,
    }
}
