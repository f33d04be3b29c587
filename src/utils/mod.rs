//! Cross-platform utilities and helpers
//!
//! # Modules
//!
//! - [`fs`] - Directory creation and source-tree copying

pub mod fs;

pub use fs::{CopyOptions, copy_tree, ensure_dir};
