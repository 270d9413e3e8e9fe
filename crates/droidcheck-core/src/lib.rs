//! droidcheck Core - configuration and shared types
//!
//! This crate holds the step configuration (file, environment and CLI
//! layers), its validation, and the small vocabulary types shared by the
//! Gradle driver and the artifact exporter.

pub mod config;
pub mod error;
pub mod naming;
pub mod types;

pub use config::{CacheLevel, ConfigOverrides, StepConfig};
pub use error::{ConfigError, Result};
pub use types::{EmptySelectionPolicy, ResultCategory, TaskKind};
