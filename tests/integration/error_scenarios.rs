use predicates::prelude::*;

use crate::common::{TWO_DEPS_LIST, TestProject, ZLIB_LIST};

#[test]
fn test_failed_clone_aborts_run() {
    let project = TestProject::with_dependencies(TWO_DEPS_LIST).unwrap();

    project
        .depbuild_install()
        .env("DEPBUILD_TEST_FAIL", "git")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("error: Failed to fetch 'zlib' at 'v1.2.11'"))
        .stderr(predicate::str::contains("suggestion:"));

    // First failure stops the run
    assert_eq!(project.invocations("git").len(), 1);
    assert!(project.invocations("cmake").is_empty());
    assert!(!project.source_root().join("zlib-v1.2.11").exists());
}

#[test]
fn test_run_after_failed_clone_fetches_again() {
    let project = TestProject::with_dependencies(ZLIB_LIST).unwrap();

    project.depbuild_install().env("DEPBUILD_TEST_FAIL", "git").assert().code(1);
    project.depbuild_install().assert().success();

    assert_eq!(project.invocations("git").len(), 2);
    assert!(project.source_root().join("zlib-v1.2.11/README").is_file());
}

#[test]
fn test_failed_configure_names_dependency_and_step() {
    let project = TestProject::with_dependencies(TWO_DEPS_LIST).unwrap();

    project
        .depbuild_install()
        .env("DEPBUILD_TEST_FAIL", "cmake")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("configure step failed for 'zlib'"))
        .stdout(predicate::str::contains("consider running").not());

    // Both sources were fetched before the build phase started
    assert_eq!(project.invocations("git").len(), 2);
    assert_eq!(project.invocations("cmake").len(), 1);
    assert!(project.invocations("ninja").is_empty());
}

#[test]
fn test_failed_build_names_build_step() {
    let project = TestProject::with_dependencies(ZLIB_LIST).unwrap();

    project
        .depbuild_install()
        .env("DEPBUILD_TEST_FAIL", "ninja")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("build step failed for 'zlib'"))
        .stderr(predicate::str::contains("exit code 2"));

    assert_eq!(project.invocations("ninja").len(), 1);
}

#[test]
fn test_missing_build_tool_is_reported_before_building() {
    let project = TestProject::with_dependencies(ZLIB_LIST).unwrap();

    project
        .depbuild_install()
        .env("DEPBUILD_CMAKE", "definitely_not_cmake_12345")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Required tool 'cmake' not found"))
        .stderr(predicate::str::contains("DEPBUILD_CMAKE"));

    assert_eq!(project.invocations("git").len(), 1);
    assert!(project.invocations("ninja").is_empty());
}

#[test]
fn test_missing_dependency_list() {
    let project = TestProject::new().unwrap();

    project
        .depbuild_install()
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Dependency list not found"));

    assert!(project.tool_log().is_empty());
}

#[test]
fn test_malformed_dependency_list() {
    let project = TestProject::with_dependencies("{ not json").unwrap();

    project
        .depbuild_install()
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid dependency list syntax"));
}

#[test]
fn test_duplicate_names_are_rejected() {
    let project = TestProject::with_dependencies(
        r#"[
          {"name": "zlib", "git_url": "U", "git_ref": "v1.2.11"},
          {"name": "zlib", "git_url": "U", "git_ref": "v1.3"}
        ]"#,
    )
    .unwrap();

    project
        .depbuild_install()
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid dependency #1"))
        .stderr(predicate::str::contains("duplicate dependency name 'zlib'"));

    assert!(project.tool_log().is_empty());
}

#[test]
fn test_entry_without_git_ref_is_rejected() {
    let project = TestProject::with_dependencies(r#"[{"name": "zlib", "git_url": "U"}]"#).unwrap();

    project
        .depbuild_install()
        .assert()
        .code(1)
        .stderr(predicate::str::contains("missing field 'git_ref'"));
}

#[test]
fn test_install_dir_is_required() {
    let project = TestProject::with_dependencies(ZLIB_LIST).unwrap();

    project.depbuild().assert().failure().stderr(predicate::str::contains("--install-dir"));

    assert!(project.tool_log().is_empty());
}
