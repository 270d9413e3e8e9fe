//! Configuration loading

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{ConfigError, Result};

use super::defaults::config_file_names;
use super::types::StepConfig;

/// Config file syntax, picked by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Toml,
    Yaml,
}

impl Format {
    fn of(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::Toml,
            _ => Self::Yaml,
        }
    }
}

/// Load a step config file; unknown extensions are read as YAML
pub fn load_config(path: &Path) -> Result<StepConfig> {
    let format = Format::of(path);
    info!(path = %path.display(), format = ?format, "loading config");

    let content = std::fs::read_to_string(path)?;
    let config: StepConfig = match format {
        Format::Toml => toml::from_str(&content)?,
        Format::Yaml => serde_yaml::from_str(&content)?,
    };

    debug!(path = %path.display(), "config loaded");
    Ok(config.normalized())
}

/// Find the nearest config file, starting at `start_dir` and walking up.
///
/// Each level is searched for every known file name, first directly and
/// then under `.github/`.
pub fn find_config(start_dir: &Path) -> Option<PathBuf> {
    debug!(start_dir = %start_dir.display(), "searching for config file");

    let found = start_dir.ancestors().find_map(|dir| {
        config_file_names().into_iter().find_map(|name| {
            [dir.join(name), dir.join(".github").join(name)]
                .into_iter()
                .find(|candidate| candidate.is_file())
        })
    });

    match &found {
        Some(path) => info!(path = %path.display(), "found config file"),
        None => debug!("no config file found"),
    }
    found
}

/// Load configuration from directory (searching parent directories)
pub fn load_config_from_dir(dir: &Path) -> Result<(StepConfig, PathBuf)> {
    let config_path = find_config(dir).ok_or_else(|| ConfigError::NotFound(dir.to_path_buf()))?;

    let config = load_config(&config_path)?;
    Ok((config, config_path))
}

/// Load configuration or use defaults
///
/// A missing file falls back to defaults; a file that exists but fails to
/// parse is an error.
pub fn load_config_or_default(dir: &Path) -> Result<(StepConfig, Option<PathBuf>)> {
    match load_config_from_dir(dir) {
        Ok((config, path)) => Ok((config, Some(path))),
        Err(ConfigError::NotFound(_)) => {
            debug!(dir = %dir.display(), "no config file, using defaults");
            Ok((StepConfig::default(), None))
        }
        Err(e) => {
            warn!(dir = %dir.display(), error = %e, "config file could not be loaded");
            Err(e)
        }
    }
}
