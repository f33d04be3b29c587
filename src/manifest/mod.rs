//! Dependency list parsing and validation.
//!
//! The dependency list is a flat, pre-ordered sequence of records. Each record
//! names one third-party source dependency, where to fetch it from, the pinned
//! revision, and the build variables forwarded to CMake:
//!
//! ```json
//! [
//!   {
//!     "name": "zlib",
//!     "git_url": "https://github.com/madler/zlib.git",
//!     "git_ref": "v1.2.11",
//!     "variables": [{ "name": "BUILD_SHARED_LIBS", "value": "OFF" }]
//!   }
//! ]
//! ```
//!
//! Files ending in `.toml` are read as an array of `[[dependencies]]` tables
//! with the same keys; everything else is read as JSON.
//!
//! The order of the list is significant: dependencies are installed in list
//! order, and later entries may rely on files installed by earlier ones. The
//! loader therefore never reorders, and build variables keep their order too.

use serde::Deserialize;
use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use crate::core::DepBuildError;

/// One entry of the dependency list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencySpec {
    /// Stable identifier, unique within a run. Also the patch directory name.
    pub name: String,
    /// Address the source is fetched from.
    pub git_url: String,
    /// Immutable pin (tag or branch).
    pub git_ref: String,
    /// Generator definitions, in invocation order.
    pub variables: Vec<BuildVariable>,
}

impl DependencySpec {
    /// Directory name of the shared checkout: `"{name}-{git_ref}"`.
    ///
    /// The same `(name, git_ref)` pair always yields the same name, and two
    /// revisions of one dependency never share a checkout.
    #[must_use]
    pub fn qualified_name(&self) -> String {
        format!("{}-{}", self.name, self.git_ref)
    }
}

/// A single `-D<name>=<value>` definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildVariable {
    /// CMake variable name
    pub name: String,
    /// Rendered value
    pub value: String,
}

impl BuildVariable {
    /// Render as a CMake command-line definition.
    #[must_use]
    pub fn to_definition(&self) -> String {
        format!("-D{}={}", self.name, self.value)
    }
}

/// Scalar accepted as a variable value.
///
/// Numbers keep the precision they were written with: unsigned values above
/// `i64::MAX` stay exact and `1.0` keeps its fraction.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
enum VariableValue {
    Bool(bool),
    Number(serde_json::Number),
    String(String),
}

impl fmt::Display for VariableValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // CMake's canonical boolean spelling
            Self::Bool(true) => f.write_str("ON"),
            Self::Bool(false) => f.write_str("OFF"),
            Self::Number(value) => write!(f, "{value}"),
            Self::String(value) => f.write_str(value),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawVariable {
    name: Option<String>,
    value: Option<VariableValue>,
}

#[derive(Debug, Deserialize)]
struct RawDependency {
    name: Option<String>,
    git_url: Option<String>,
    git_ref: Option<String>,
    #[serde(default)]
    variables: Option<Vec<RawVariable>>,
}

#[derive(Debug, Deserialize)]
struct TomlDocument {
    #[serde(default)]
    dependencies: Vec<RawDependency>,
}

/// Supported dependency list encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListFormat {
    /// JSON array of records
    Json,
    /// TOML document with `[[dependencies]]` tables
    Toml,
}

impl ListFormat {
    /// Pick the format from the file extension (`.toml` or JSON otherwise).
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Self::Toml,
            _ => Self::Json,
        }
    }
}

/// Read and validate the dependency list at `path`.
///
/// # Errors
///
/// - [`DepBuildError::DependencyFileNotFound`] if the file does not exist
/// - [`DepBuildError::DependencyFileParseError`] if it is not valid JSON/TOML
///   or does not have the expected shape
/// - [`DepBuildError::InvalidDependency`] for missing/empty required fields,
///   unusable names, or duplicate names
pub fn load_dependencies(path: &Path) -> Result<Vec<DependencySpec>, DepBuildError> {
    if !path.is_file() {
        return Err(DepBuildError::DependencyFileNotFound {
            path: path.display().to_string(),
        });
    }

    let content = std::fs::read_to_string(path)?;
    let specs =
        parse_dependencies(&content, ListFormat::from_path(path), &path.display().to_string())?;

    tracing::debug!(
        target: "manifest",
        "Loaded {} dependencies from {}",
        specs.len(),
        path.display()
    );
    Ok(specs)
}

/// Parse and validate a dependency list held in memory.
///
/// `file` is only used in error messages.
pub fn parse_dependencies(
    content: &str,
    format: ListFormat,
    file: &str,
) -> Result<Vec<DependencySpec>, DepBuildError> {
    let parse_error = |reason: String| DepBuildError::DependencyFileParseError {
        file: file.to_string(),
        reason,
    };

    let raw: Vec<RawDependency> = match format {
        ListFormat::Json => serde_json::from_str(content).map_err(|e| parse_error(e.to_string()))?,
        ListFormat::Toml => {
            toml::from_str::<TomlDocument>(content).map_err(|e| parse_error(e.to_string()))?.dependencies
        }
    };

    let mut seen = HashSet::new();
    let mut specs = Vec::with_capacity(raw.len());

    for (index, entry) in raw.into_iter().enumerate() {
        let invalid = |reason: String| DepBuildError::InvalidDependency {
            file: file.to_string(),
            index,
            reason,
        };

        let name = required(entry.name, "name").map_err(&invalid)?;
        validate_name(&name).map_err(&invalid)?;
        let git_url = required(entry.git_url, "git_url").map_err(&invalid)?;
        let git_ref = required(entry.git_ref, "git_ref").map_err(&invalid)?;
        validate_ref(&git_ref).map_err(&invalid)?;

        if !seen.insert(name.clone()) {
            return Err(invalid(format!("duplicate dependency name '{name}'")));
        }

        let mut variables = Vec::new();
        for (position, variable) in entry.variables.unwrap_or_default().into_iter().enumerate() {
            let var_name = required(variable.name, "variables[].name")
                .map_err(|reason| invalid(format!("{reason} (variable #{position})")))?;
            let value = variable.value.ok_or_else(|| {
                invalid(format!("missing field 'value' for variable '{var_name}'"))
            })?;
            variables.push(BuildVariable {
                name: var_name,
                value: value.to_string(),
            });
        }

        specs.push(DependencySpec {
            name,
            git_url,
            git_ref,
            variables,
        });
    }

    Ok(specs)
}

fn required(value: Option<String>, field: &str) -> Result<String, String> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value),
        Some(_) => Err(format!("field '{field}' must not be empty")),
        None => Err(format!("missing field '{field}'")),
    }
}

// The name doubles as a directory name (patch set, checkout prefix).
fn validate_name(name: &str) -> Result<(), String> {
    if name == "." || name == ".." || name.contains(['/', '\\']) {
        return Err(format!("dependency name '{name}' must be a single path component"));
    }
    Ok(())
}

// The ref becomes part of the checkout path and must stay below the source root.
fn validate_ref(git_ref: &str) -> Result<(), String> {
    let escapes = git_ref.starts_with(['/', '\\'])
        || git_ref.split(['/', '\\']).any(|component| component == "..");
    if escapes {
        return Err(format!("git_ref '{git_ref}' must not be absolute or contain '..' components"));
    }
    Ok(())
}
