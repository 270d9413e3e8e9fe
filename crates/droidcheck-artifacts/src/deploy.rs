//! Deploy directory export
//!
//! Report directories and single result files are packed into
//! `<name>.zip` archives in the deploy directory. A second archive with the
//! same name gets a local timestamp suffix instead of replacing the first.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tempfile::NamedTempFile;
use tracing::{debug, warn};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::DeployError;
use crate::export::{Artifact, ExportFailure, ExportRecord, ExportSummary};

const ZIP_EXTENSION: &str = "zip";
const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Archive name for a module's result location, `<module>-<basename>`
pub fn deploy_name(module_slug: &str, pattern: &str) -> String {
    let base = Path::new(pattern.trim_end_matches(['/', '\\']))
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| pattern.to_string());
    format!("{}-{}", module_slug, base)
}

/// `<name>.zip`, or `<name>-<timestamp>.zip` when that is taken.
///
/// Within the same second a counter follows the timestamp:
/// `<name>-<timestamp>-1.zip`, `<name>-<timestamp>-2.zip`, ...
pub fn unique_zip_path(deploy_dir: &Path, name: &str, now: DateTime<Local>) -> PathBuf {
    let plain = deploy_dir.join(format!("{}.{}", name, ZIP_EXTENSION));
    if !plain.exists() {
        return plain;
    }

    let stamped = format!("{}-{}", name, now.format(TIMESTAMP_FORMAT));
    let mut candidate = deploy_dir.join(format!("{}.{}", stamped, ZIP_EXTENSION));
    let mut n = 0u32;
    while candidate.exists() {
        n += 1;
        candidate = deploy_dir.join(format!("{}-{}.{}", stamped, n, ZIP_EXTENSION));
    }
    candidate
}

/// Packs artifacts into zip archives in the deploy directory
#[derive(Debug, Clone)]
pub struct DeployExporter {
    deploy_dir: PathBuf,
}

impl DeployExporter {
    pub fn new(deploy_dir: impl Into<PathBuf>) -> Self {
        Self {
            deploy_dir: deploy_dir.into(),
        }
    }

    /// Where `artifact` would be written right now
    pub fn target_for(&self, artifact: &Artifact) -> PathBuf {
        unique_zip_path(&self.deploy_dir, &artifact.name, Local::now())
    }

    /// Zip `artifact` into the deploy directory, returning the archive path
    pub fn deploy(&self, artifact: &Artifact) -> Result<PathBuf, DeployError> {
        if !artifact.path.exists() {
            return Err(DeployError::NotFound(artifact.path.clone()));
        }
        std::fs::create_dir_all(&self.deploy_dir)?;

        let target = self.target_for(artifact);
        let tmp = NamedTempFile::new_in(&self.deploy_dir)?;
        let mut writer = ZipWriter::new(tmp);
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        if artifact.path.is_dir() {
            add_dir(&mut writer, &artifact.path, options)?;
        } else {
            let name = artifact
                .path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| artifact.name.clone());
            add_file(&mut writer, &artifact.path, name, options)?;
        }

        let mut tmp = writer.finish()?;
        tmp.flush()?;
        tmp.as_file().sync_all()?;
        tmp.persist_noclobber(&target)?;

        debug!(source = %artifact.path.display(), archive = %target.display(), "deployed artifact");
        Ok(target)
    }

    /// Deploy every artifact, skipping the ones that fail
    pub fn deploy_all(&self, artifacts: &[Artifact]) -> ExportSummary {
        let mut summary = ExportSummary::default();
        for artifact in artifacts {
            match self.deploy(artifact) {
                Ok(destination) => summary.exported.push(ExportRecord {
                    source: artifact.path.clone(),
                    export_dir: artifact.name.clone(),
                    destination,
                }),
                Err(e) => {
                    warn!(path = %artifact.path.display(), error = %e, "failed to deploy artifact");
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

/// Add `dir` with its contents, rooted at the directory's own name
fn add_dir(
    writer: &mut ZipWriter<NamedTempFile>,
    dir: &Path,
    options: SimpleFileOptions,
) -> Result<(), DeployError> {
    let root = dir.parent().unwrap_or(dir);

    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(std::io::Error::from)?;
        let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
        let name = entry_name(relative);
        if name.is_empty() {
            continue;
        }

        if entry.file_type().is_dir() {
            writer.add_directory(format!("{}/", name), options)?;
        } else if entry.file_type().is_file() {
            add_file(writer, entry.path(), name, options)?;
        }
    }
    Ok(())
}

fn add_file(
    writer: &mut ZipWriter<NamedTempFile>,
    path: &Path,
    name: String,
    options: SimpleFileOptions,
) -> Result<(), DeployError> {
    writer.start_file(name, options)?;
    let mut file = File::open(path)?;
    std::io::copy(&mut file, writer)?;
    Ok(())
}

/// Zip entry names always use `/`
fn entry_name(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().to_string())
        .collect::<Vec<_>>()
        .join("/")
}
