//! Stable names for build configurations.
//!
//! A build configuration is identified by its build type and its install
//! prefix. [`unique_name`] turns that pair into a short, filesystem-safe name
//! that is identical across processes and machines for the same inputs. It is
//! used for the default per-configuration build root and for the build
//! directory suggested in the follow-up instructions.
//!
//! The install path is normalized first ([`normalize_path`]) so that a
//! relative spelling and an absolute spelling of the same location map to the
//! same name.

use sha2::{Digest, Sha256};
use std::path::{Component, Path, PathBuf};

/// Make `path` absolute against `base` and lexically remove `.` and `..`
/// components.
///
/// Symlinks are not resolved: the install prefix usually does not exist yet on
/// the first run, and resolving it on later runs only would change the name.
#[must_use]
pub fn normalize_path(path: &Path, base: &Path) -> PathBuf {
    clean_path(&base.join(path))
}

/// Lexically remove `.` and `..` components without touching the filesystem.
#[must_use]
pub fn clean_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // `..` at the root stays at the root
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

/// Render a path with forward slashes regardless of platform.
#[must_use]
pub fn to_posix_string(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Derive the configuration name `"{build_type}-{digest}"`.
///
/// The digest is the lowercase hex SHA-256 of the normalized install path
/// (forward slashes), truncated to `digits` characters. `digits` is clamped to
/// the digest length; `0` yields an empty digest.
///
/// `install_root` should already be normalized (see [`normalize_path`]);
/// the function itself is pure and does not touch the filesystem.
///
/// # Examples
///
/// ```rust
/// use depbuild::naming::unique_name;
/// use std::path::Path;
///
/// let name = unique_name(Path::new("/tmp/out"), "Release", 8);
/// assert!(name.starts_with("Release-"));
/// assert_eq!(name.len(), "Release-".len() + 8);
/// assert_eq!(name, unique_name(Path::new("/tmp/out"), "Release", 8));
/// ```
#[must_use]
pub fn unique_name(install_root: &Path, build_type: &str, digits: usize) -> String {
    let mut hasher = Sha256::new();
    hasher.update(to_posix_string(install_root).as_bytes());
    let digest = hex::encode(hasher.finalize());

    let digits = digits.min(digest.len());
    format!("{build_type}-{}", &digest[..digits])
}
