//! Test addon export over a Gradle-shaped output tree

use std::path::Path;

use droidcheck_artifacts::{
    find_artifacts, task_output_dir, TestAddonExporter, TestInfo, DESCRIPTOR_FILE_NAME,
};
use tempfile::TempDir;

fn write(root: &Path, rel: &str) {
    let path = root.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, rel).unwrap();
}

fn descriptor(dir: &Path) -> TestInfo {
    let content = std::fs::read_to_string(dir.join(DESCRIPTOR_FILE_NAME)).unwrap();
    serde_json::from_str(&content).unwrap()
}

#[test]
fn exports_unit_test_results_per_module_and_variant() {
    let temp = TempDir::new().unwrap();
    let project = temp.path().join("project");
    write(&project, "app/build/test-results/testDebugUnitTest/TEST-Foo.xml");
    write(&project, "app/build/test-results/testDebugUnitTest/TEST-Bar.xml");
    write(&project, "app/build/test-results/testReleaseUnitTest/TEST-Foo.xml");
    write(&project, "feature/login/build/test-results/testStagingDebugUnitTest/TEST-Login.xml");

    let mut artifacts = Vec::new();
    for (module, variant) in [
        ("app", "debug"),
        ("app", "release"),
        ("feature/login", "stagingDebug"),
    ] {
        let dir = project
            .join(module)
            .join("build/test-results")
            .join(task_output_dir(variant));
        artifacts.extend(find_artifacts(&dir, "*.xml"));
    }

    let out = temp.path().join("addon");
    let mut exporter = TestAddonExporter::new(&out);
    let summary = exporter.export_all(&artifacts);

    assert!(summary.failed.is_empty());
    assert_eq!(summary.exported.len(), 4);

    assert!(out.join("app-debug/TEST-Foo.xml").is_file());
    assert!(out.join("app-debug/TEST-Bar.xml").is_file());
    assert!(out.join("app-release/TEST-Foo.xml").is_file());
    assert!(out.join("login-stagingDebug/TEST-Login.xml").is_file());

    assert_eq!(descriptor(&out.join("app-debug")).test_name, "app-debug");
    assert_eq!(descriptor(&out.join("login-stagingDebug")).test_name, "login-stagingDebug");
}

#[test]
fn unclassified_artifacts_get_numbered_other_dirs() {
    let temp = TempDir::new().unwrap();
    let project = temp.path().join("project");
    write(&project, "app/build/test-results/testDebugUnitTest/TEST-Foo.xml");
    write(&project, "app/build/snapshots/deltas/delta-home.png");
    write(&project, "app/build/snapshots/deltas/delta-login.png");

    let mut artifacts = find_artifacts(
        &project.join("app/build/test-results/testDebugUnitTest"),
        "*.xml",
    );
    artifacts.extend(find_artifacts(
        &project.join("app/build/snapshots/deltas"),
        "delta-*.png",
    ));

    let out = temp.path().join("addon");
    let mut exporter = TestAddonExporter::new(&out);
    let summary = exporter.export_all(&artifacts);

    let dirs: Vec<_> = summary
        .exported
        .iter()
        .map(|r| r.export_dir.as_str())
        .collect();
    assert_eq!(dirs, vec!["app-debug", "other", "other-1"]);

    assert!(out.join("other/delta-home.png").is_file());
    assert!(out.join("other-1/delta-login.png").is_file());
    assert_eq!(descriptor(&out.join("other-1")).test_name, "other-1");
}

#[test]
fn rerunning_export_keeps_descriptors_and_refreshes_files() {
    let temp = TempDir::new().unwrap();
    let project = temp.path().join("project");
    write(&project, "app/build/test-results/testDebugUnitTest/TEST-Foo.xml");
    let dir = project.join("app/build/test-results/testDebugUnitTest");
    let out = temp.path().join("addon");

    TestAddonExporter::new(&out).export_all(&find_artifacts(&dir, "*.xml"));
    std::fs::write(dir.join("TEST-Foo.xml"), "second run").unwrap();
    TestAddonExporter::new(&out).export_all(&find_artifacts(&dir, "*.xml"));

    let entries: Vec<_> = std::fs::read_dir(out.join("app-debug")).unwrap().collect();
    assert_eq!(entries.len(), 2);
    assert_eq!(
        std::fs::read_to_string(out.join("app-debug/TEST-Foo.xml")).unwrap(),
        "second run"
    );
}
