//! Step configuration flags shared by `run` and `variants`

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use tracing::debug;

use droidcheck_core::config::{load_config, load_config_or_default, validate_config};
use droidcheck_core::{
    CacheLevel, ConfigOverrides, EmptySelectionPolicy, ResultCategory, StepConfig,
};

/// Step inputs; every flag can also come from its environment variable
#[derive(Debug, Clone, Default, Args)]
pub struct ConfigArgs {
    /// Config file (default: droidcheck.toml / droidcheck.yaml, searched upwards)
    #[arg(long = "config", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Root directory of the Gradle project
    #[arg(long, env = "project_location")]
    pub project_location: Option<PathBuf>,

    /// Location of the HTML reports inside a module
    #[arg(long, env = "report_path_pattern")]
    pub report_path_pattern: Option<String>,

    /// Location of the XML results inside a module
    #[arg(long, env = "result_path_pattern")]
    pub result_path_pattern: Option<String>,

    /// Location of the snapshot delta images inside a module
    #[arg(long, env = "delta_path_pattern")]
    pub delta_path_pattern: Option<String>,

    /// Gradle task to run (`test`, `verifySnapshots`, ...)
    #[arg(long, env = "task")]
    pub task: Option<String>,

    /// Only run this variant
    #[arg(long, env = "variant")]
    pub variant: Option<String>,

    /// Only run variants of this module
    #[arg(long, env = "module")]
    pub module: Option<String>,

    /// Extra Gradle arguments, shell quoted
    #[arg(long, env = "arguments", allow_hyphen_values = true)]
    pub arguments: Option<String>,

    /// Directory receiving zipped reports
    #[arg(long, env = "BITRISE_DEPLOY_DIR")]
    pub deploy_dir: Option<PathBuf>,

    /// Test addon export root
    #[arg(long, env = "BITRISE_TEST_RESULT_DIR")]
    pub test_result_dir: Option<PathBuf>,

    /// Build cache level (none, only_deps, all)
    #[arg(long, env = "cache_level", value_parser = parse_cache_level)]
    pub cache_level: Option<CacheLevel>,

    /// Debug logging (yes/no)
    #[arg(long, env = "is_debug", value_parser = parse_flag)]
    pub is_debug: Option<bool>,

    /// What to do when no variant matches the filters (skip, fail)
    #[arg(long, env = "empty_selection", value_parser = parse_empty_selection)]
    pub empty_selection: Option<EmptySelectionPolicy>,

    /// Result categories to export, e.g. `html,xml,snapshot`
    #[arg(long, env = "result_categories")]
    pub result_categories: Option<String>,
}

impl ConfigArgs {
    /// Flags and environment as a config layer
    pub fn overrides(&self) -> anyhow::Result<ConfigOverrides> {
        let result_categories = match self.result_categories.as_deref() {
            Some(raw) if !raw.trim().is_empty() => Some(
                ResultCategory::parse_list(raw)
                    .with_context(|| format!("invalid result categories: {}", raw))?,
            ),
            _ => None,
        };

        Ok(ConfigOverrides {
            project_location: self.project_location.clone(),
            report_path_pattern: self.report_path_pattern.clone(),
            result_path_pattern: self.result_path_pattern.clone(),
            delta_path_pattern: self.delta_path_pattern.clone(),
            task: self.task.clone(),
            variant: self.variant.clone(),
            module: self.module.clone(),
            arguments: self.arguments.clone(),
            deploy_dir: self.deploy_dir.clone(),
            test_result_dir: self.test_result_dir.clone(),
            cache_level: self.cache_level,
            is_debug: self.is_debug,
            empty_selection: self.empty_selection,
            result_categories,
        })
    }

    /// Merge file, environment and flags, then validate
    pub fn resolve(&self, cwd: &Path) -> anyhow::Result<StepConfig> {
        let base = match &self.config_file {
            Some(path) => {
                debug!(path = %path.display(), "loading explicit config file");
                load_config(path)
                    .with_context(|| format!("failed to load config {}", path.display()))?
            }
            None => {
                let (config, source) = load_config_or_default(cwd)?;
                match source {
                    Some(path) => debug!(path = %path.display(), "loaded config file"),
                    None => debug!("no config file, using defaults"),
                }
                config
            }
        };

        let config = base.with_overrides(self.overrides()?);
        validate_config(&config)?;
        Ok(config)
    }
}

fn parse_cache_level(s: &str) -> Result<CacheLevel, String> {
    CacheLevel::parse(s).ok_or_else(|| format!("unknown cache level '{}'", s))
}

fn parse_empty_selection(s: &str) -> Result<EmptySelectionPolicy, String> {
    EmptySelectionPolicy::parse(s).ok_or_else(|| format!("unknown empty selection policy '{}'", s))
}

fn parse_flag(s: &str) -> Result<bool, String> {
    match s.trim().to_lowercase().as_str() {
        "yes" | "true" | "1" | "on" => Ok(true),
        "no" | "false" | "0" | "off" | "" => Ok(false),
        _ => Err(format!("expected yes or no, got '{}'", s)),
    }
}
