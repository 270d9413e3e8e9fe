//! Configuration validation

use tracing::debug;

use crate::error::{ConfigError, Result};

use super::types::StepConfig;

/// Validate configuration
pub fn validate_config(config: &StepConfig) -> Result<()> {
    debug!("validating configuration");
    validate_project(config)?;
    validate_task(config)?;
    validate_patterns(config)?;
    validate_arguments(config)?;
    validate_categories(config)?;
    debug!("configuration validation passed");
    Ok(())
}

fn validate_project(config: &StepConfig) -> Result<()> {
    let path = &config.project_location;
    if !path.exists() {
        return Err(ConfigError::invalid(
            "project_location",
            format!("{} does not exist", path.display()),
        ));
    }
    if !path.is_dir() {
        return Err(ConfigError::invalid(
            "project_location",
            format!("{} is not a directory", path.display()),
        ));
    }
    Ok(())
}

fn validate_task(config: &StepConfig) -> Result<()> {
    if config.task.trim().is_empty() {
        return Err(ConfigError::MissingField("task".to_string()));
    }
    if config.task.contains(char::is_whitespace) {
        return Err(ConfigError::invalid(
            "task",
            "must be a single Gradle task name",
        ));
    }
    Ok(())
}

fn validate_patterns(config: &StepConfig) -> Result<()> {
    for (field, value) in [
        ("report_path_pattern", &config.report_path_pattern),
        ("result_path_pattern", &config.result_path_pattern),
        ("delta_path_pattern", &config.delta_path_pattern),
    ] {
        if value.trim().is_empty() {
            return Err(ConfigError::MissingField(field.to_string()));
        }
    }
    Ok(())
}

fn validate_arguments(config: &StepConfig) -> Result<()> {
    config.gradle_arguments().map(|_| ())
}

fn validate_categories(config: &StepConfig) -> Result<()> {
    if let Some(categories) = &config.result_categories {
        if categories.is_empty() {
            return Err(ConfigError::invalid(
                "result_categories",
                "must name at least one of: html, xml, snapshot",
            ));
        }
    }
    Ok(())
}
