//! Configuration types

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::types::{EmptySelectionPolicy, ResultCategory, TaskKind, UNIT_TEST_TASK};

use super::defaults::{
    DEFAULT_DELTA_PATH_PATTERN, DEFAULT_REPORT_PATH_PATTERN, DEFAULT_RESULT_PATH_PATTERN,
};

/// Resolved configuration for one step run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StepConfig {
    /// Root of the Gradle project
    pub project_location: PathBuf,

    /// HTML report directory, relative to each module
    pub report_path_pattern: String,

    /// XML result directory, relative to each module
    pub result_path_pattern: String,

    /// Snapshot delta image directory, relative to each module
    pub delta_path_pattern: String,

    /// Gradle task to run (`test`, `verifySnapshots`, ...)
    pub task: String,

    /// Only run variants with this name (case-insensitive)
    pub variant: Option<String>,

    /// Only run variants of this module
    pub module: Option<String>,

    /// Extra Gradle arguments, shell-quoted
    pub arguments: String,

    /// Where zipped reports are deployed
    pub deploy_dir: Option<PathBuf>,

    /// Test addon export root; export is enabled when set
    pub test_result_dir: Option<PathBuf>,

    /// Build cache collection level
    pub cache_level: CacheLevel,

    /// Enable debug logging
    pub is_debug: bool,

    /// Behavior when no variant matches the filters
    pub empty_selection: EmptySelectionPolicy,

    /// Result categories to export (defaults depend on the task)
    pub result_categories: Option<Vec<ResultCategory>>,
}

impl Default for StepConfig {
    fn default() -> Self {
        Self {
            project_location: PathBuf::from("."),
            report_path_pattern: DEFAULT_REPORT_PATH_PATTERN.to_string(),
            result_path_pattern: DEFAULT_RESULT_PATH_PATTERN.to_string(),
            delta_path_pattern: DEFAULT_DELTA_PATH_PATTERN.to_string(),
            task: UNIT_TEST_TASK.to_string(),
            variant: None,
            module: None,
            arguments: String::new(),
            deploy_dir: None,
            test_result_dir: None,
            cache_level: CacheLevel::default(),
            is_debug: false,
            empty_selection: EmptySelectionPolicy::default(),
            result_categories: None,
        }
    }
}

impl StepConfig {
    /// Apply overrides on top of this configuration
    ///
    /// Empty strings count as unset, since CI systems export unset inputs
    /// as empty environment variables.
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(v) = non_empty_path(overrides.project_location) {
            self.project_location = v;
        }
        if let Some(v) = non_empty(overrides.report_path_pattern) {
            self.report_path_pattern = v;
        }
        if let Some(v) = non_empty(overrides.result_path_pattern) {
            self.result_path_pattern = v;
        }
        if let Some(v) = non_empty(overrides.delta_path_pattern) {
            self.delta_path_pattern = v;
        }
        if let Some(v) = non_empty(overrides.task) {
            self.task = v;
        }
        if let Some(v) = non_empty(overrides.variant) {
            self.variant = Some(v);
        }
        if let Some(v) = non_empty(overrides.module) {
            self.module = Some(v);
        }
        if let Some(v) = overrides.arguments {
            if !v.trim().is_empty() {
                self.arguments = v;
            }
        }
        if let Some(v) = non_empty_path(overrides.deploy_dir) {
            self.deploy_dir = Some(v);
        }
        if let Some(v) = non_empty_path(overrides.test_result_dir) {
            self.test_result_dir = Some(v);
        }
        if let Some(v) = overrides.cache_level {
            self.cache_level = v;
        }
        if let Some(v) = overrides.is_debug {
            self.is_debug = v;
        }
        if let Some(v) = overrides.empty_selection {
            self.empty_selection = v;
        }
        if let Some(v) = overrides.result_categories {
            if !v.is_empty() {
                self.result_categories = Some(v);
            }
        }
        self.normalized()
    }

    /// Treat blank values as unset
    ///
    /// A config file with `variant: ""` or `test_result_dir: ""` means the
    /// same as leaving the key out.
    pub fn normalized(mut self) -> Self {
        let defaults = Self::default();
        self.variant = non_empty(self.variant.take());
        self.module = non_empty(self.module.take());
        self.deploy_dir = non_empty_path(self.deploy_dir.take());
        self.test_result_dir = non_empty_path(self.test_result_dir.take());
        self.result_categories = self.result_categories.take().filter(|v| !v.is_empty());
        if self.project_location.as_os_str().is_empty() {
            self.project_location = defaults.project_location;
        }
        if self.report_path_pattern.trim().is_empty() {
            self.report_path_pattern = defaults.report_path_pattern;
        }
        if self.result_path_pattern.trim().is_empty() {
            self.result_path_pattern = defaults.result_path_pattern;
        }
        if self.delta_path_pattern.trim().is_empty() {
            self.delta_path_pattern = defaults.delta_path_pattern;
        }
        if self.task.trim().is_empty() {
            self.task = defaults.task;
        }
        if self.arguments.trim().is_empty() {
            self.arguments.clear();
        }
        self
    }

    /// Task class of the configured task
    pub fn task_kind(&self) -> TaskKind {
        TaskKind::from_task_name(&self.task)
    }

    /// Result categories to export, falling back to the task's defaults
    pub fn categories(&self) -> Vec<ResultCategory> {
        match &self.result_categories {
            Some(categories) => categories.clone(),
            None => self.task_kind().default_categories(),
        }
    }

    /// Tokenize the extra Gradle arguments with shell quoting rules
    pub fn gradle_arguments(&self) -> Result<Vec<String>> {
        shell_words::split(&self.arguments).map_err(|e| ConfigError::Arguments {
            input: self.arguments.clone(),
            reason: e.to_string(),
        })
    }

    /// Whether the test addon export is turned on
    pub fn test_addon_enabled(&self) -> bool {
        self.test_result_dir.is_some()
    }

    /// Key/value pairs for printing the resolved configuration
    pub fn summary(&self) -> Vec<(&'static str, String)> {
        let opt = |v: &Option<String>| v.clone().unwrap_or_else(|| "<all>".to_string());
        let dir = |v: &Option<PathBuf>| {
            v.as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "<not set>".to_string())
        };

        vec![
            ("project_location", self.project_location.display().to_string()),
            ("report_path_pattern", self.report_path_pattern.clone()),
            ("result_path_pattern", self.result_path_pattern.clone()),
            ("delta_path_pattern", self.delta_path_pattern.clone()),
            ("task", self.task.clone()),
            ("variant", opt(&self.variant)),
            ("module", opt(&self.module)),
            ("arguments", self.arguments.clone()),
            ("deploy_dir", dir(&self.deploy_dir)),
            ("test_result_dir", dir(&self.test_result_dir)),
            ("cache_level", self.cache_level.as_str().to_string()),
            ("is_debug", self.is_debug.to_string()),
            ("empty_selection", self.empty_selection.as_str().to_string()),
            (
                "result_categories",
                self.categories()
                    .iter()
                    .map(|c| c.as_str())
                    .collect::<Vec<_>>()
                    .join(","),
            ),
        ]
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn non_empty_path(value: Option<PathBuf>) -> Option<PathBuf> {
    value.filter(|v| !v.as_os_str().is_empty())
}

/// Build cache collection level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheLevel {
    /// Collect nothing
    None,
    /// Collect dependency caches only
    #[default]
    OnlyDeps,
    /// Collect dependency and build caches
    All,
}

impl CacheLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::OnlyDeps => "only_deps",
            Self::All => "all",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "none" => Some(Self::None),
            "only_deps" | "only-deps" | "deps" => Some(Self::OnlyDeps),
            "all" => Some(Self::All),
            _ => None,
        }
    }
}

/// Values supplied on the command line or through the environment
///
/// Every field is optional; unset fields keep the lower layer's value.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub project_location: Option<PathBuf>,
    pub report_path_pattern: Option<String>,
    pub result_path_pattern: Option<String>,
    pub delta_path_pattern: Option<String>,
    pub task: Option<String>,
    pub variant: Option<String>,
    pub module: Option<String>,
    pub arguments: Option<String>,
    pub deploy_dir: Option<PathBuf>,
    pub test_result_dir: Option<PathBuf>,
    pub cache_level: Option<CacheLevel>,
    pub is_debug: Option<bool>,
    pub empty_selection: Option<EmptySelectionPolicy>,
    pub result_categories: Option<Vec<ResultCategory>>,
}
