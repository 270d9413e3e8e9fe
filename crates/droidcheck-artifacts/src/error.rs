//! Error types for classification and export

use std::path::PathBuf;
use thiserror::Error;

/// Why a path could not be mapped to a module and variant
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClassificationError {
    /// No `test-results` segment in the path
    #[error("path ({path}) does not contain 'test-results' folder")]
    MarkerNotFound { path: String },

    /// The segment after `test-results` is not `test<Variant>UnitTest`
    #[error("unknown path ({path}): task output dir should match test<Variant>UnitTest pattern")]
    MalformedTaskDir { path: String },

    /// Fewer than two segments before `test-results`
    #[error("unknown path ({path}): task output dir should follow <module>/build/test-results")]
    MarkerTooShallow { path: String },
}

/// Failure exporting one artifact into the test addon directory
#[derive(Error, Debug)]
pub enum ExportError {
    /// Export directory or descriptor could not be created
    #[error("could not prepare export dir ({dir}): {source}")]
    Prepare {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The artifact path has no file name
    #[error("artifact path ({0}) has no file name")]
    NoFileName(PathBuf),

    /// Copying the artifact failed
    #[error("failed to export artifact ({path}): {source}")]
    Copy {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failure packaging an artifact into the deploy directory
#[derive(Error, Debug)]
pub enum DeployError {
    /// The artifact to package does not exist
    #[error("artifact not found at {0}")]
    NotFound(PathBuf),

    /// Zip archive error
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// The archive could not be moved into place
    #[error("could not persist archive: {0}")]
    Persist(#[from] tempfile::PersistError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
