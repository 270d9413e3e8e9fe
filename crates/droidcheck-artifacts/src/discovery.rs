//! Result artifact discovery

use std::path::Path;

use glob::Pattern;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::export::Artifact;

/// Find files under `root` whose file name matches `pattern`.
///
/// Entries are returned in file-name order per directory, so `other`
/// numbering is the same across runs over the same tree. A missing root
/// yields no artifacts.
pub fn find_artifacts(root: &Path, pattern: &str) -> Vec<Artifact> {
    if !root.exists() {
        debug!(root = %root.display(), "artifact root does not exist");
        return Vec::new();
    }

    let matcher = match Pattern::new(pattern) {
        Ok(matcher) => matcher,
        Err(e) => {
            warn!(pattern, error = %e, "invalid artifact pattern");
            return Vec::new();
        }
    };

    let mut artifacts = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(root = %root.display(), error = %e, "failed to walk artifact dir");
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }
        if matcher.matches(&entry.file_name().to_string_lossy()) {
            artifacts.push(Artifact::from_path(entry.path()));
        }
    }

    debug!(root = %root.display(), pattern, found = artifacts.len(), "discovered artifacts");
    artifacts
}
