//! Core types for depbuild
//!
//! This module holds the error system shared by every component:
//! - [`DepBuildError`] - Enumerated error types covering all failure modes of a run
//! - [`ErrorContext`] - User-friendly error wrapper with suggestions and details
//! - [`user_friendly_error`] - Convert any error to the user-friendly format
//!
//! # Error Handling Pattern
//!
//! ```rust
//! use depbuild::core::{DepBuildError, user_friendly_error};
//! use anyhow::Result;
//!
//! fn example_operation() -> Result<()> {
//!     Err(DepBuildError::ConfigError {
//!         message: "install directory is required".to_string(),
//!     }
//!     .into())
//! }
//!
//! if let Err(e) = example_operation() {
//!     let friendly = user_friendly_error(e);
//!     friendly.display();
//! }
//! ```

pub mod error;

pub use error::{DepBuildError, ErrorContext, user_friendly_error};
