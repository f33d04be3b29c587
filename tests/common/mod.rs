//! Common test utilities for depbuild integration tests
//!
//! Every test runs the real `depbuild` binary against a temporary project.
//! `git`, `cmake` and `ninja` are replaced by small shell scripts (selected
//! through `DEPBUILD_GIT`/`DEPBUILD_CMAKE`/`DEPBUILD_NINJA`) that append their
//! command line to a shared log and fake just enough side effects:
//!
//! - `git clone ... <dir>` creates `<dir>` with a `README`, a
//!   `CMakeLists.txt` and a `.git` directory
//! - `cmake ... -B <dir> -DCMAKE_INSTALL_PREFIX=<prefix>` creates `<dir>` and
//!   remembers the prefix in it
//! - `ninja install` appends the build directory name to
//!   `<prefix>/installed.txt`
//!
//! A tool fails with exit code 2 when its name is listed in
//! `DEPBUILD_TEST_FAIL`.

// Not every test file uses every helper
#![allow(dead_code)]

use anyhow::{Context, Result};
use assert_cmd::Command;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const ZLIB_LIST: &str = r#"[
  {
    "name": "zlib",
    "git_url": "U",
    "git_ref": "v1.2.11",
    "variables": [{"name": "BUILD_SHARED_LIBS", "value": "OFF"}]
  }
]"#;

pub const TWO_DEPS_LIST: &str = r#"[
  {"name": "zlib", "git_url": "https://example.com/zlib.git", "git_ref": "v1.2.11"},
  {"name": "libpng", "git_url": "https://example.com/libpng.git", "git_ref": "v1.6.40",
   "variables": [{"name": "PNG_SHARED", "value": false}, {"name": "ZLIB_ROOT", "value": "/x"}]}
]"#;

const FAKE_GIT: &str = r#"#!/bin/sh
echo "git $*" >> "@LOG@"
case " $DEPBUILD_TEST_FAIL " in *" git "*) exit 2 ;; esac
if [ "$1" = "clone" ]; then
  for target; do :; done
  mkdir -p "$target/.git"
  echo "ref: refs/heads/main" > "$target/.git/HEAD"
  echo "pristine readme" > "$target/README"
  echo "project(fake)" > "$target/CMakeLists.txt"
fi
"#;

const FAKE_CMAKE: &str = r#"#!/bin/sh
echo "cmake $*" >> "@LOG@"
case " $DEPBUILD_TEST_FAIL " in *" cmake "*) exit 2 ;; esac
build=""
prefix=""
while [ $# -gt 0 ]; do
  case "$1" in
    -B) build="$2"; shift ;;
    -DCMAKE_INSTALL_PREFIX=*) prefix="${1#-DCMAKE_INSTALL_PREFIX=}" ;;
  esac
  shift
done
mkdir -p "$build"
echo "$prefix" > "$build/prefix.txt"
"#;

const FAKE_NINJA: &str = r#"#!/bin/sh
echo "ninja $*" >> "@LOG@"
case " $DEPBUILD_TEST_FAIL " in *" ninja "*) exit 2 ;; esac
if [ "$1" = "install" ]; then
  prefix=$(cat prefix.txt)
  mkdir -p "$prefix"
  basename "$(pwd)" >> "$prefix/installed.txt"
fi
"#;

/// A temporary project with fake external tools
pub struct TestProject {
    _temp_dir: TempDir, // Keep alive for RAII cleanup
    root: PathBuf,
    project_dir: PathBuf,
    tools_dir: PathBuf,
    log_file: PathBuf,
}

impl TestProject {
    /// Create an empty project and install the fake tools
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let root = temp_dir.path().canonicalize()?;
        let project_dir = root.join("project");
        let tools_dir = root.join("tools");
        let log_file = root.join("tools.log");

        fs::create_dir_all(&project_dir)?;
        fs::create_dir_all(&tools_dir)?;

        let project = Self {
            _temp_dir: temp_dir,
            root,
            project_dir,
            tools_dir,
            log_file,
        };
        project.write_tool("git", FAKE_GIT)?;
        project.write_tool("cmake", FAKE_CMAKE)?;
        project.write_tool("ninja", FAKE_NINJA)?;
        Ok(project)
    }

    /// Create a project whose default dependency list has the given content
    pub fn with_dependencies(content: &str) -> Result<Self> {
        let project = Self::new()?;
        project.write_file("scripts/build/build_dependencies.json", content)?;
        Ok(project)
    }

    fn write_tool(&self, name: &str, script: &str) -> Result<()> {
        let path = self.tools_dir.join(name);
        fs::write(&path, script.replace("@LOG@", &self.log_file.display().to_string()))
            .with_context(|| format!("Failed to write fake {name}"))?;
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755))?;
        Ok(())
    }

    /// Path of a fake tool
    pub fn tool(&self, name: &str) -> PathBuf {
        self.tools_dir.join(name)
    }

    /// Root of the parent project
    pub fn project_path(&self) -> &Path {
        &self.project_dir
    }

    /// Scratch directory next to the project
    pub fn root_path(&self) -> &Path {
        &self.root
    }

    /// Default install prefix used by the tests
    pub fn install_path(&self) -> PathBuf {
        self.root.join("install")
    }

    /// Default shared source root
    pub fn source_root(&self) -> PathBuf {
        self.project_dir.join(".deps/source")
    }

    /// Default build roots
    pub fn build_roots(&self) -> PathBuf {
        self.project_dir.join(".deps/build")
    }

    /// Write a file relative to the project root
    pub fn write_file(&self, path: &str, content: &str) -> Result<()> {
        let file = self.project_dir.join(path);
        if let Some(parent) = file.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&file, content).with_context(|| format!("Failed to write {}", file.display()))?;
        Ok(())
    }

    /// Command lines the fake tools were invoked with, in order
    pub fn tool_log(&self) -> Vec<String> {
        fs::read_to_string(&self.log_file)
            .map(|log| log.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }

    /// Tool log lines starting with `program`
    pub fn invocations(&self, program: &str) -> Vec<String> {
        self.tool_log().into_iter().filter(|line| line.starts_with(&format!("{program} "))).collect()
    }

    /// Build directory names in the order `ninja install` ran for them
    pub fn installed(&self, prefix: &Path) -> Vec<String> {
        fs::read_to_string(prefix.join("installed.txt"))
            .map(|log| log.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }

    /// A `depbuild` command running in the project directory with the fake tools
    pub fn depbuild(&self) -> Command {
        let mut cmd = Command::cargo_bin("depbuild").expect("depbuild binary should be built");
        cmd.current_dir(&self.project_dir)
            .env("DEPBUILD_GIT", self.tool("git"))
            .env("DEPBUILD_CMAKE", self.tool("cmake"))
            .env("DEPBUILD_NINJA", self.tool("ninja"))
            .env("NO_COLOR", "1")
            .env_remove("RUST_LOG")
            .env_remove("DEPBUILD_TEST_FAIL");
        for key in [
            "DEPBUILD_PROJECT_DIR",
            "DEPBUILD_SOURCE_DIR",
            "DEPBUILD_BUILD_DIR",
            "DEPBUILD_INSTALL_DIR",
            "DEPBUILD_DEPENDENCIES_FILE",
            "DEPBUILD_PATCH_DIR",
            "DEPBUILD_BUILD_TYPE",
            "DEPBUILD_THREAD_COUNT",
            "DEPBUILD_DOWNLOAD_ONLY",
        ] {
            cmd.env_remove(key);
        }
        cmd
    }

    /// `depbuild -i <install>` with the default install prefix
    pub fn depbuild_install(&self) -> Command {
        let mut cmd = self.depbuild();
        cmd.arg("-i").arg(self.install_path());
        cmd
    }
}
