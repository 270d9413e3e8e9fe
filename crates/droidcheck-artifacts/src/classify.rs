//! Path classification
//!
//! `./app/build/test-results/testDebugUnitTest/TEST-Foo.xml`
//!
//! - `test-results` is the results-root marker
//! - `testDebugUnitTest` is the task output directory, variant `debug`
//! - `app`, two segments before the marker, is the module

use std::path::Path;

use droidcheck_core::naming::{lowercase_first, uppercase_first};
use serde::Serialize;

use crate::error::ClassificationError;

/// Directory Gradle writes per-task test results into
pub const RESULTS_ROOT_MARKER: &str = "test-results";

const TASK_DIR_PREFIX: &str = "test";
const TASK_DIR_SUFFIX: &str = "UnitTest";

/// Module and variant an artifact belongs to
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ArtifactIdentity {
    pub module: String,
    pub variant: String,
}

impl ArtifactIdentity {
    /// Export directory name, `<module>-<variant>`
    pub fn dir_name(&self) -> String {
        format!("{}-{}", self.module, self.variant)
    }
}

/// Derive the module and variant of an artifact from its path.
///
/// Only the first `test-results` segment counts. Both `/` and `\` separate
/// segments; non-UTF-8 components are compared lossily.
pub fn classify(path: &Path) -> Result<ArtifactIdentity, ClassificationError> {
    let raw = path.to_string_lossy();
    let segments: Vec<&str> = raw.split(['/', '\\']).collect();

    let marker = segments
        .iter()
        .position(|s| *s == RESULTS_ROOT_MARKER)
        .ok_or_else(|| ClassificationError::MarkerNotFound {
            path: raw.to_string(),
        })?;

    let variant = segments
        .get(marker + 1)
        .and_then(|dir| parse_task_dir(dir))
        .ok_or_else(|| ClassificationError::MalformedTaskDir {
            path: raw.to_string(),
        })?;

    if marker < 2 {
        return Err(ClassificationError::MarkerTooShallow {
            path: raw.to_string(),
        });
    }
    let module = segments[marker - 2].to_string();

    Ok(ArtifactIdentity { module, variant })
}

/// `testStagingDebugUnitTest` -> `stagingDebug`
fn parse_task_dir(dir: &str) -> Option<String> {
    let variant = dir
        .strip_prefix(TASK_DIR_PREFIX)?
        .strip_suffix(TASK_DIR_SUFFIX)?;
    if variant.is_empty() {
        return None;
    }
    Some(lowercase_first(variant))
}

/// Task output directory Gradle uses for a variant's unit tests.
///
/// Accepts both plain variant names (`debug`) and the suffixed names unit
/// test tasks report (`debugUnitTest`).
pub fn task_output_dir(variant: &str) -> String {
    let base = variant.strip_suffix(TASK_DIR_SUFFIX).unwrap_or(variant);
    format!("{}{}{}", TASK_DIR_PREFIX, uppercase_first(base), TASK_DIR_SUFFIX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(module: &str, variant: &str) -> ArtifactIdentity {
        ArtifactIdentity {
            module: module.to_string(),
            variant: variant.to_string(),
        }
    }

    #[test]
    fn test_classify_unit_test_result() {
        let id = classify(Path::new("app/build/test-results/testDebugUnitTest/TEST-Foo.xml")).unwrap();
        assert_eq!(id, identity("app", "debug"));
        assert_eq!(id.dir_name(), "app-debug");
    }

    #[test]
    fn test_classify_absolute_and_dotted_paths() {
        let id = classify(Path::new(
            "./app/build/test-results/testDebugUnitTest/TEST-sample.UnitTest0.xml",
        ))
        .unwrap();
        assert_eq!(id, identity("app", "debug"));

        let id = classify(Path::new(
            "/bitrise/src/feature/login/build/test-results/testStagingReleaseUnitTest/TEST-A.xml",
        ))
        .unwrap();
        assert_eq!(id, identity("login", "stagingRelease"));
    }

    #[test]
    fn test_classify_windows_separators() {
        let id = classify(Path::new(
            r"C:\work\app\build\test-results\testDebugUnitTest\TEST-Foo.xml",
        ))
        .unwrap();
        assert_eq!(id, identity("app", "debug"));
    }

    #[test]
    fn test_first_marker_wins() {
        let id = classify(Path::new(
            "app/build/test-results/testDebugUnitTest/test-results/testOtherUnitTest/a.xml",
        ))
        .unwrap();
        assert_eq!(id, identity("app", "debug"));
    }

    #[test]
    fn test_unicode_variant_first_letter() {
        let id = classify(Path::new("app/build/test-results/testÉtéUnitTest/a.xml")).unwrap();
        assert_eq!(id.variant, "été");
    }

    #[test]
    fn test_marker_not_found() {
        let err = classify(Path::new("app/build/reports/tests/index.html")).unwrap_err();
        assert!(matches!(err, ClassificationError::MarkerNotFound { .. }));

        let err = classify(Path::new("")).unwrap_err();
        assert!(matches!(err, ClassificationError::MarkerNotFound { .. }));
    }

    #[test]
    fn test_malformed_task_dir() {
        for path in [
            "app/build/test-results/debug/TEST-Foo.xml",
            "app/build/test-results/testUnitTest/TEST-Foo.xml",
            "app/build/test-results/testDebug/TEST-Foo.xml",
            "app/build/test-results/DebugUnitTest/TEST-Foo.xml",
            "app/build/test-results",
            "app/build/test-results/",
        ] {
            let err = classify(Path::new(path)).unwrap_err();
            assert!(
                matches!(err, ClassificationError::MalformedTaskDir { .. }),
                "{path}: {err:?}"
            );
        }
    }

    #[test]
    fn test_marker_too_shallow() {
        let err = classify(Path::new("build/test-results/testDebugUnitTest/a.xml")).unwrap_err();
        assert!(matches!(err, ClassificationError::MarkerTooShallow { .. }));

        let err = classify(Path::new("test-results/testDebugUnitTest/a.xml")).unwrap_err();
        assert!(matches!(err, ClassificationError::MarkerTooShallow { .. }));
    }

    #[test]
    fn test_leading_separator_counts_as_empty_segment() {
        // "/build/test-results/..." has an empty segment before "build"
        let id = classify(Path::new("/build/test-results/testDebugUnitTest/a.xml")).unwrap();
        assert_eq!(id, identity("", "debug"));
    }

    #[test]
    fn test_task_output_dir() {
        assert_eq!(task_output_dir("debug"), "testDebugUnitTest");
        assert_eq!(task_output_dir("debugUnitTest"), "testDebugUnitTest");
        assert_eq!(task_output_dir("stagingRelease"), "testStagingReleaseUnitTest");
    }

    #[test]
    fn test_task_output_dir_classifies_back() {
        for variant in ["debug", "stagingRelease", "freeDebugUnitTest"] {
            let path = format!("app/build/test-results/{}/a.xml", task_output_dir(variant));
            let id = classify(Path::new(&path)).unwrap();
            assert_eq!(
                id.variant,
                variant.strip_suffix("UnitTest").unwrap_or(variant)
            );
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_segment_does_not_panic() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let path = Path::new(OsStr::from_bytes(
            b"app/build/test-results/test\xffDebugUnitTest/a.xml",
        ));
        let id = classify(path).unwrap();
        assert_eq!(id.module, "app");
        assert!(id.variant.ends_with("Debug"));

        let path = Path::new(OsStr::from_bytes(b"\xfe/\xff/a.xml"));
        assert!(classify(path).is_err());
    }
}
