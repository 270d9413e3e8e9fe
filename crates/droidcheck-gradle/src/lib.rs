//! droidcheck Gradle - the build driver seam
//!
//! Wraps the Gradle wrapper of an Android project: discovering the variants
//! a task can run for, building the task command for a selected set of
//! variants, and running it. [`BuildDriver`] is the trait the orchestration
//! layer talks to, so the step can be exercised without a real Gradle.

pub mod driver;
pub mod error;
pub mod parse;
pub mod selection;
pub mod variants;

pub use driver::{BuildDriver, GradleCommand, GradleProject, GradleTask, RunOutcome};
pub use error::{DriverError, Result, SelectionError};
pub use parse::parse_variants;
pub use selection::{select_variants, ModuleSelection, Selection, VariantStatus};
pub use variants::{module_path, module_slug, VariantSet};
