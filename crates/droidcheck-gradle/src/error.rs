//! Error types for the Gradle driver

use thiserror::Error;

/// Result type for driver operations
pub type Result<T> = std::result::Result<T, DriverError>;

/// Build driver errors
#[derive(Error, Debug)]
pub enum DriverError {
    /// Neither a Gradle wrapper nor a global Gradle was found
    #[error("Required tool '{tool}' not found. {install_hint}")]
    ToolNotFound { tool: String, install_hint: String },

    /// A Gradle invocation could not be started or reported failure
    #[error("Command failed: {command}")]
    CommandFailed {
        command: String,
        exit_code: Option<i32>,
        stderr: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Variant selection errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SelectionError {
    /// The module filter names a module Gradle did not report
    #[error("module not found: {module} (available: {available})")]
    ModuleNotFound { module: String, available: String },

    /// No variant matched the variant filter
    #[error("no buildable variant matches '{variant}'")]
    VariantNotFound { variant: String },
}
