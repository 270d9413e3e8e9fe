//! droidcheck Artifacts - test result classification and export
//!
//! Gradle writes unit test results under
//! `<module>/build/test-results/test<Variant>UnitTest/`. This crate turns
//! such paths back into a `(module, variant)` identity and copies each
//! result into a per-identity directory of the test addon export root:
//!
//! ```text
//! $BITRISE_TEST_RESULT_DIR/
//!   app-debug/
//!     test-info.json        {"test-name": "app-debug"}
//!     TEST-com.example.FooTest.xml
//!   other/
//!   other-1/
//! ```
//!
//! Paths that do not follow the layout land in `other`, `other-1`, ...
//! so nothing collides. The deploy exporter separately zips whole report
//! directories into the deploy directory.

pub mod allocate;
pub mod classify;
pub mod deploy;
pub mod descriptor;
pub mod discovery;
pub mod error;
pub mod export;

pub use allocate::{allocate, OtherDirCounter, OTHER_DIR_NAME};
pub use classify::{classify, task_output_dir, ArtifactIdentity, RESULTS_ROOT_MARKER};
pub use deploy::{deploy_name, unique_zip_path, DeployExporter};
pub use descriptor::{ensure_descriptor, TestInfo, DESCRIPTOR_FILE_NAME};
pub use discovery::find_artifacts;
pub use error::{ClassificationError, DeployError, ExportError};
pub use export::{
    export_artifact, Artifact, ExportFailure, ExportRecord, ExportSummary, TestAddonExporter,
};
