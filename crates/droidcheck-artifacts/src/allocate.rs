//! Export directory allocation

use crate::classify::ArtifactIdentity;
use crate::error::ClassificationError;

/// Directory name for artifacts that could not be classified
pub const OTHER_DIR_NAME: &str = "other";

/// Numbers the `other` directories of one export pass.
///
/// The first unclassifiable artifact gets `other`, the next ones `other-1`,
/// `other-2`, ... One counter is shared by every artifact category of a
/// pass.
#[derive(Debug, Clone, Default)]
pub struct OtherDirCounter {
    allocated: usize,
}

impl OtherDirCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next `other` directory name
    pub fn next_name(&mut self) -> String {
        let index = self.allocated;
        self.allocated += 1;
        if index == 0 {
            OTHER_DIR_NAME.to_string()
        } else {
            format!("{}-{}", OTHER_DIR_NAME, index)
        }
    }

    /// How many `other` directories were handed out so far
    pub fn allocated(&self) -> usize {
        self.allocated
    }
}

/// Map a classification result to the export directory name
pub fn allocate(
    classification: &Result<ArtifactIdentity, ClassificationError>,
    counter: &mut OtherDirCounter,
) -> String {
    match classification {
        Ok(identity) => identity.dir_name(),
        Err(_) => counter.next_name(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::classify;
    use std::path::Path;

    #[test]
    fn test_other_dirs_are_numbered_in_order() {
        let mut counter = OtherDirCounter::new();
        let names: Vec<_> = (0..4).map(|_| counter.next_name()).collect();
        assert_eq!(names, vec!["other", "other-1", "other-2", "other-3"]);
        assert_eq!(counter.allocated(), 4);
    }

    #[test]
    fn test_classified_artifacts_do_not_advance_counter() {
        let mut counter = OtherDirCounter::new();
        let paths = [
            "app/build/reports/index.html",
            "app/build/test-results/testDebugUnitTest/TEST-A.xml",
            "app/build/snapshots/deltas/delta-a.png",
            "lib/build/test-results/testReleaseUnitTest/TEST-B.xml",
            "results.xml",
        ];

        let dirs: Vec<_> = paths
            .iter()
            .map(|p| allocate(&classify(Path::new(p)), &mut counter))
            .collect();

        assert_eq!(
            dirs,
            vec!["other", "app-debug", "other-1", "lib-release", "other-2"]
        );
    }
}
