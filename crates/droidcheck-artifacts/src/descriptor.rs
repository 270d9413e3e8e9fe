//! Test result descriptor files

use std::io::{self, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::debug;

/// Name of the descriptor written into every export directory
pub const DESCRIPTOR_FILE_NAME: &str = "test-info.json";

/// Contents of `test-info.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestInfo {
    #[serde(rename = "test-name")]
    pub test_name: String,
}

/// Make sure `export_dir` exists and carries a descriptor.
///
/// Returns `true` when this call wrote the descriptor. An existing
/// descriptor is never replaced. The file is written to a temporary name,
/// synced, and linked into place, so readers never see a partial file.
pub fn ensure_descriptor(export_dir: &Path) -> io::Result<bool> {
    std::fs::create_dir_all(export_dir)?;

    let descriptor = export_dir.join(DESCRIPTOR_FILE_NAME);
    if descriptor.exists() {
        return Ok(false);
    }

    let info = TestInfo {
        test_name: export_dir
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default(),
    };
    let data = serde_json::to_vec(&info).map_err(io::Error::other)?;

    let mut file = NamedTempFile::new_in(export_dir)?;
    file.write_all(&data)?;
    file.flush()?;
    file.as_file().sync_all()?;

    match file.persist_noclobber(&descriptor) {
        Ok(_) => {
            debug!(path = %descriptor.display(), "wrote test descriptor");
            Ok(true)
        }
        // Another writer got there first
        Err(e) if e.error.kind() == io::ErrorKind::AlreadyExists => Ok(false),
        Err(e) => Err(e.error),
    }
}
