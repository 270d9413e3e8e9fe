//! Variant discovery from `gradle tasks --all` output

use std::sync::OnceLock;

use droidcheck_core::naming::lowercase_first;
use regex::Regex;

use crate::variants::VariantSet;

/// Task name endings that belong to helper tasks, not variants
const HELPER_SUFFIXES: &[&str] = &["Classes", "Resources", "Sources", "JavaRes"];

/// A task line is a single task path, optionally followed by ` - description`.
/// Section headings ("Verification tasks") and rulers never match.
fn task_line() -> &'static Regex {
    static TASK_LINE: OnceLock<Regex> = OnceLock::new();
    TASK_LINE.get_or_init(|| Regex::new(r"^(\S+)(?:\s+-\s.*)?$").expect("task line pattern"))
}

/// Extract the variants `task` can run for, per module.
///
/// `app:testDebugUnitTest - Run unit tests for the debug build.` yields
/// module `app`, variant `debugUnitTest` for task `test`. The aggregate
/// task itself (`app:test`) is not a variant.
pub fn parse_variants(task: &str, output: &str) -> VariantSet {
    let mut variants = VariantSet::new();

    for line in output.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let Some(caps) = task_line().captures(line) else {
            continue;
        };
        let task_path = &caps[1];

        let (module, name) = match task_path.rsplit_once(':') {
            Some((module, name)) => (module, name),
            None => ("", task_path),
        };

        let Some(rest) = name.strip_prefix(task) else {
            continue;
        };

        // `testDebug` is a variant of `test`, `testing` is another task
        if !rest.chars().next().is_some_and(char::is_uppercase) {
            continue;
        }

        if HELPER_SUFFIXES.iter().any(|suffix| rest.ends_with(suffix)) {
            continue;
        }

        variants.push(module, lowercase_first(rest));
    }

    variants
}

#[cfg(test)]
mod tests {
    use super::*;

    const TASKS_OUTPUT: &str = "\
Verification tasks
------------------
app:check - Runs all checks.
app:test - Run unit tests for all variants.
app:testDebugUnitTest - Run unit tests for the debug build.
app:testReleaseUnitTest - Run unit tests for the release build.
app:testDebugUnitTestClasses
feature:login:testDebugUnitTest - Run unit tests for the debug build.
app:testing - Not a variant.
lib:lintDebug - Runs lint on the debug build.
testRootUnitTest
";

    #[test]
    fn test_parse_unit_test_variants() {
        let variants = parse_variants("test", TASKS_OUTPUT);

        assert_eq!(
            variants.get("app").unwrap().to_vec(),
            vec!["debugUnitTest", "releaseUnitTest"]
        );
        assert_eq!(
            variants.get("feature:login").unwrap().to_vec(),
            vec!["debugUnitTest"]
        );
        assert_eq!(variants.get("").unwrap().to_vec(), vec!["rootUnitTest"]);
        assert!(variants.get("lib").is_none());
    }

    #[test]
    fn test_parse_snapshot_variants() {
        let output = "\
app:verifySnapshots - Verifies all snapshots.
app:verifySnapshotsDebug - Verifies snapshots for debug.
app:verifySnapshotsStagingRelease - Verifies snapshots for stagingRelease.
";
        let variants = parse_variants("verifySnapshots", output);
        assert_eq!(
            variants.get("app").unwrap().to_vec(),
            vec!["debug", "stagingRelease"]
        );
    }

    #[test]
    fn test_headings_are_ignored() {
        let variants = parse_variants("Verification", "Verification tasks\n");
        assert!(variants.is_empty());
    }
}
