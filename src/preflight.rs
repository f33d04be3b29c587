//! Host tool checks.
//!
//! Verifies that the external collaborators can be found before a phase
//! starts, so a missing `cmake` is reported up front instead of after every
//! source has been fetched.

use std::path::PathBuf;

use crate::config::ToolPaths;
use crate::core::DepBuildError;

/// Locate `program` on `PATH` (or at the given path).
pub fn require_tool(tool: &str, program: &str) -> Result<PathBuf, DepBuildError> {
    match which::which(program) {
        Ok(path) => {
            tracing::debug!(target: "preflight", "Found {} at {}", tool, path.display());
            Ok(path)
        }
        Err(_) => Err(DepBuildError::ToolNotFound {
            tool: tool.to_string(),
            program: program.to_string(),
        }),
    }
}

/// Tools needed by the fetch phase.
pub fn check_fetch_tools(tools: &ToolPaths) -> Result<(), DepBuildError> {
    require_tool("git", &tools.git)?;
    Ok(())
}

/// Tools needed by the build phase.
pub fn check_build_tools(tools: &ToolPaths) -> Result<(), DepBuildError> {
    require_tool("cmake", &tools.cmake)?;
    require_tool("ninja", &tools.ninja)?;
    Ok(())
}
