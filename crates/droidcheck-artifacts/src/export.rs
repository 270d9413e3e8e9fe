//! Test addon export

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, warn};

use crate::allocate::{allocate, OtherDirCounter};
use crate::classify::classify;
use crate::descriptor::ensure_descriptor;
use crate::error::ExportError;

/// A discovered output file or directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Artifact {
    /// Display name, also used for deploy archive names
    pub name: String,
    pub path: PathBuf,
}

impl Artifact {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    /// Artifact named after its file name
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        Self { name, path }
    }
}

/// Where one artifact ended up
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportRecord {
    pub source: PathBuf,
    /// Export directory name, `<module>-<variant>` or `other[-n]`
    pub export_dir: String,
    pub destination: PathBuf,
}

/// An artifact that could not be exported
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportFailure {
    pub source: PathBuf,
    pub error: String,
}

/// Result of exporting a batch of artifacts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExportSummary {
    pub exported: Vec<ExportRecord>,
    pub failed: Vec<ExportFailure>,
}

impl ExportSummary {
    pub fn extend(&mut self, other: ExportSummary) {
        self.exported.extend(other.exported);
        self.failed.extend(other.failed);
    }
}

/// Copy `artifact` into `base_dir/dir_name`, creating the directory and its
/// descriptor on first use. Returns the destination path.
///
/// An existing file with the same name in the export directory is
/// overwritten.
pub fn export_artifact(
    artifact: &Artifact,
    base_dir: &Path,
    dir_name: &str,
) -> Result<PathBuf, ExportError> {
    let export_dir = base_dir.join(dir_name);
    ensure_descriptor(&export_dir).map_err(|source| ExportError::Prepare {
        dir: export_dir.clone(),
        source,
    })?;

    let file_name = artifact
        .path
        .file_name()
        .ok_or_else(|| ExportError::NoFileName(artifact.path.clone()))?;
    let destination = export_dir.join(file_name);

    std::fs::copy(&artifact.path, &destination).map_err(|source| ExportError::Copy {
        path: artifact.path.clone(),
        source,
    })?;

    debug!(
        source = %artifact.path.display(),
        destination = %destination.display(),
        "exported artifact"
    );
    Ok(destination)
}

/// Exports artifacts into the test addon directory.
///
/// One exporter is one export pass: its `other` counter is shared by every
/// batch exported through it.
#[derive(Debug)]
pub struct TestAddonExporter {
    base_dir: PathBuf,
    counter: OtherDirCounter,
}

impl TestAddonExporter {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            counter: OtherDirCounter::new(),
        }
    }

    /// Classify, allocate, and copy a single artifact
    pub fn export(&mut self, artifact: &Artifact) -> Result<ExportRecord, ExportError> {
        let classification = classify(&artifact.path);
        if let Err(e) = &classification {
            debug!(path = %artifact.path.display(), reason = %e, "unclassified artifact");
        }
        let export_dir = allocate(&classification, &mut self.counter);
        let destination = export_artifact(artifact, &self.base_dir, &export_dir)?;

        Ok(ExportRecord {
            source: artifact.path.clone(),
            export_dir,
            destination,
        })
    }

    /// Export every artifact, skipping the ones that fail
    pub fn export_all(&mut self, artifacts: &[Artifact]) -> ExportSummary {
        let mut summary = ExportSummary::default();
        for artifact in artifacts {
            match self.export(artifact) {
                Ok(record) => summary.exported.push(record),
                Err(e) => {
                    warn!(path = %artifact.path.display(), error = %e, "failed to export artifact");
                    summary.failed.push(ExportFailure {
                        source: artifact.path.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::DESCRIPTOR_FILE_NAME;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) -> PathBuf {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_export_artifact_copies_and_writes_descriptor() {
        let temp = TempDir::new().unwrap();
        let src = write(temp.path(), "src/TEST-Foo.xml", "<testsuite/>");
        let out = temp.path().join("out");

        let dest = export_artifact(&Artifact::from_path(&src), &out, "app-debug").unwrap();

        assert_eq!(dest, out.join("app-debug/TEST-Foo.xml"));
        assert_eq!(std::fs::read_to_string(&dest).unwrap(), "<testsuite/>");
        assert!(out.join("app-debug").join(DESCRIPTOR_FILE_NAME).is_file());
    }

    #[test]
    fn test_same_basename_overwrites() {
        let temp = TempDir::new().unwrap();
        let first = write(temp.path(), "a/TEST-Foo.xml", "first");
        let second = write(temp.path(), "b/TEST-Foo.xml", "second");
        let out = temp.path().join("out");

        export_artifact(&Artifact::from_path(&first), &out, "other").unwrap();
        let dest = export_artifact(&Artifact::from_path(&second), &out, "other").unwrap();

        assert_eq!(std::fs::read_to_string(dest).unwrap(), "second");
    }

    #[test]
    fn test_missing_source_is_copy_error() {
        let temp = TempDir::new().unwrap();
        let artifact = Artifact::from_path(temp.path().join("gone.xml"));

        let err = export_artifact(&artifact, &temp.path().join("out"), "other").unwrap_err();
        assert!(matches!(err, ExportError::Copy { .. }));
        // the directory is still prepared
        assert!(temp.path().join("out/other").join(DESCRIPTOR_FILE_NAME).is_file());
    }

    #[test]
    fn test_exporter_routes_by_classification() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("project");
        let xml = write(&root, "app/build/test-results/testDebugUnitTest/TEST-Foo.xml", "x");
        let png = write(&root, "app/build/snapshots/deltas/delta-home.png", "p");
        let out = temp.path().join("addon");

        let mut exporter = TestAddonExporter::new(&out);
        let summary = exporter.export_all(&[Artifact::from_path(&xml), Artifact::from_path(&png)]);

        assert!(summary.failed.is_empty());
        let dirs: Vec<_> = summary.exported.iter().map(|r| r.export_dir.as_str()).collect();
        assert_eq!(dirs, vec!["app-debug", "other"]);
        assert!(out.join("app-debug/TEST-Foo.xml").is_file());
        assert!(out.join("other/delta-home.png").is_file());
    }

    #[test]
    fn test_failures_are_collected_and_counter_still_advances() {
        let temp = TempDir::new().unwrap();
        let good = write(temp.path(), "results/a.xml", "a");
        let out = temp.path().join("addon");

        let mut exporter = TestAddonExporter::new(&out);
        let summary = exporter.export_all(&[
            Artifact::from_path(temp.path().join("missing.xml")),
            Artifact::from_path(&good),
        ]);

        assert_eq!(summary.failed.len(), 1);
        assert_eq!(summary.exported.len(), 1);
        assert_eq!(summary.exported[0].export_dir, "other-1");
    }

    #[test]
    fn test_summary_extend() {
        let mut summary = ExportSummary::default();
        summary.extend(ExportSummary {
            exported: vec![],
            failed: vec![ExportFailure {
                source: PathBuf::from("a.xml"),
                error: "boom".to_string(),
            }],
        });
        summary.extend(ExportSummary::default());

        assert!(summary.exported.is_empty());
        assert_eq!(summary.failed.len(), 1);
        assert_eq!(summary.failed[0].source, PathBuf::from("a.xml"));
    }
}
