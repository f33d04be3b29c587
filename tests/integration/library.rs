//! Drives the library API directly with a recording runner.

use depbuild::config::{BuildConfiguration, ConfigInputs, ToolPaths};
use depbuild::pipeline::Pipeline;
use depbuild::test_utils::RecordingRunner;

use crate::common::{TWO_DEPS_LIST, TestProject};

fn configuration(project: &TestProject, download_only: bool) -> BuildConfiguration {
    BuildConfiguration::resolve(
        ConfigInputs {
            install_dir: project.install_path(),
            download_only,
            ..ConfigInputs::default()
        },
        project.project_path(),
        ToolPaths::default(),
    )
    .unwrap()
}

#[test]
fn test_pipeline_with_recording_runner() {
    let project = TestProject::with_dependencies(TWO_DEPS_LIST).unwrap();
    let config = configuration(&project, false);
    let runner = RecordingRunner::new();

    let summary = Pipeline::new(&config, &runner).with_preflight(false).run().unwrap();

    assert_eq!(summary.fetched, ["zlib-v1.2.11", "libpng-v1.6.40"]);
    assert_eq!(summary.built, ["zlib", "libpng"]);
    assert_eq!(runner.commands().len(), 8);

    let follow_up = summary.follow_up.unwrap().to_string();
    assert!(follow_up.contains(&format!("-DCMAKE_INSTALL_PREFIX={}", project.install_path().display())));
}

#[test]
fn test_download_only_with_recording_runner() {
    let project = TestProject::with_dependencies(TWO_DEPS_LIST).unwrap();
    let config = configuration(&project, true);
    let runner = RecordingRunner::new();

    let summary = Pipeline::new(&config, &runner).with_preflight(false).run().unwrap();

    assert!(runner.command_lines().iter().all(|line| line.starts_with("git clone ")));
    assert!(summary.follow_up.is_none());
}
