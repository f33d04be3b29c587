use predicates::prelude::*;

use crate::common::{TWO_DEPS_LIST, TestProject, ZLIB_LIST};

#[test]
fn test_zlib_end_to_end() {
    let project = TestProject::with_dependencies(ZLIB_LIST).unwrap();

    project
        .depbuild_install()
        .assert()
        .success()
        .stdout(predicate::str::contains("> "))
        .stdout(predicate::str::contains("clone U -b v1.2.11"))
        .stdout(predicate::str::contains(
            "To configure and build this configuration of this project consider running:",
        ));

    let checkout = project.source_root().join("zlib-v1.2.11");
    assert!(checkout.join("README").is_file());
    assert!(!project.source_root().join(".zlib-v1.2.11.partial").exists());

    let log = project.tool_log();
    assert_eq!(log.len(), 4, "unexpected tool log: {log:#?}");
    assert!(log[0].starts_with("git clone U -b v1.2.11 "));
    assert!(log[1].starts_with(&format!("cmake -G Ninja -S {} -B ", checkout.display())));
    assert!(log[1].contains("-DCMAKE_BUILD_TYPE=RelWithDebInfo"));
    assert!(log[1].contains(&format!("-DCMAKE_INSTALL_PREFIX={}", project.install_path().display())));
    assert!(log[1].ends_with("-DBUILD_SHARED_LIBS=OFF"));
    assert_eq!(log[2], "ninja ");
    assert_eq!(log[3], "ninja install");

    assert_eq!(project.installed(&project.install_path()), ["zlib-v1.2.11"]);
}

#[test]
fn test_commands_are_echoed_before_running() {
    let project = TestProject::with_dependencies(ZLIB_LIST).unwrap();

    let output = project.depbuild_install().output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let echoed: Vec<_> = stdout.lines().filter(|line| line.starts_with("> ")).collect();
    assert_eq!(echoed.len(), 4, "unexpected stdout: {stdout}");
    assert!(echoed[0].contains("clone"));
    assert!(echoed[1].contains(" -G Ninja "));
    assert!(echoed[3].ends_with(" install"));
}

#[test]
fn test_second_run_reuses_checkout() {
    let project = TestProject::with_dependencies(ZLIB_LIST).unwrap();

    project.depbuild_install().assert().success();
    project.depbuild_install().assert().success();

    assert_eq!(project.invocations("git").len(), 1);
    assert_eq!(project.invocations("cmake").len(), 2);
    assert_eq!(project.installed(&project.install_path()), ["zlib-v1.2.11", "zlib-v1.2.11"]);
}

#[test]
fn test_install_order_follows_list() {
    let project = TestProject::with_dependencies(TWO_DEPS_LIST).unwrap();

    project.depbuild_install().assert().success();

    let log = project.tool_log();
    let programs: Vec<_> = log.iter().map(|line| line.split(' ').next().unwrap()).collect();
    assert_eq!(programs, ["git", "git", "cmake", "ninja", "ninja", "cmake", "ninja", "ninja"]);
    assert!(log[1].contains("libpng.git -b v1.6.40"));
    assert!(log[5].ends_with("-DPNG_SHARED=OFF -DZLIB_ROOT=/x"));

    assert_eq!(project.installed(&project.install_path()), ["zlib-v1.2.11", "libpng-v1.6.40"]);
}

#[test]
fn test_configurations_share_sources_but_not_build_roots() {
    let project = TestProject::with_dependencies(ZLIB_LIST).unwrap();
    let debug_install = project.root_path().join("install-debug");

    project.depbuild_install().assert().success();
    project.depbuild().arg("-i").arg(&debug_install).args(["-c", "Debug"]).assert().success();

    assert_eq!(project.invocations("git").len(), 1);

    let mut roots: Vec<_> = std::fs::read_dir(project.build_roots())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    roots.sort();
    assert_eq!(roots.len(), 2);
    assert!(roots[0].starts_with("Debug-"));
    assert!(roots[1].starts_with("RelWithDebInfo-"));
    assert_eq!(roots[0].len(), "Debug-".len() + 32);

    assert_eq!(project.installed(&debug_install), ["zlib-v1.2.11"]);
}

#[test]
fn test_thread_count_reaches_ninja_and_follow_up() {
    let project = TestProject::with_dependencies(ZLIB_LIST).unwrap();

    project
        .depbuild_install()
        .args(["-j", "3"])
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"ninja -C build/RelWithDebInfo-[0-9a-f]{8} -j 3").unwrap());

    assert_eq!(project.invocations("ninja")[0], "ninja -j 3");
}

#[test]
fn test_follow_up_is_deterministic() {
    let project = TestProject::with_dependencies(ZLIB_LIST).unwrap();

    let first = project.depbuild_install().output().unwrap();
    let second = project.depbuild_install().output().unwrap();

    let follow_up = |stdout: &[u8]| {
        let text = String::from_utf8_lossy(stdout).into_owned();
        let start = text.find("To configure and build").unwrap();
        text[start..].to_string()
    };
    assert_eq!(follow_up(&first.stdout), follow_up(&second.stdout));
    assert!(follow_up(&first.stdout).contains(&format!(
        "-DCMAKE_BUILD_TYPE=RelWithDebInfo -DCMAKE_INSTALL_PREFIX={}",
        project.install_path().display()
    )));
}
