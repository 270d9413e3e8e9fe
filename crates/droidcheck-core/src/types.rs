//! Shared vocabulary types

use serde::{Deserialize, Serialize};

/// Gradle task name for local unit tests
pub const UNIT_TEST_TASK: &str = "test";

/// Gradle task name for snapshot verification
pub const SNAPSHOT_TASK: &str = "verifySnapshots";

/// Suffix Gradle appends to unit-test variant names
pub const UNIT_TEST_SUFFIX: &str = "UnitTest";

/// The class of Gradle task being driven.
///
/// Determines how variant names look (unit-test tasks report
/// `debugUnitTest`, snapshot tasks report `debug`) and which result
/// categories are exported by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    /// `test`: local JVM unit tests
    UnitTest,
    /// `verifySnapshots`: UI snapshot verification
    Snapshot,
    /// Any other task name
    Custom,
}

impl TaskKind {
    /// Classify a Gradle task name
    pub fn from_task_name(task: &str) -> Self {
        match task {
            UNIT_TEST_TASK => Self::UnitTest,
            SNAPSHOT_TASK => Self::Snapshot,
            _ => Self::Custom,
        }
    }

    /// Suffix carried by variant names of this task class, if any
    pub fn variant_suffix(&self) -> Option<&'static str> {
        match self {
            Self::UnitTest => Some(UNIT_TEST_SUFFIX),
            Self::Snapshot | Self::Custom => None,
        }
    }

    /// Result categories exported when none are configured
    pub fn default_categories(&self) -> Vec<ResultCategory> {
        match self {
            Self::Snapshot => vec![
                ResultCategory::Html,
                ResultCategory::Xml,
                ResultCategory::Snapshot,
            ],
            Self::UnitTest | Self::Custom => vec![ResultCategory::Html, ResultCategory::Xml],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UnitTest => "unit-test",
            Self::Snapshot => "snapshot",
            Self::Custom => "custom",
        }
    }
}

/// A category of result artifacts produced by a test run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultCategory {
    /// HTML test reports
    Html,
    /// JUnit XML results
    Xml,
    /// Snapshot delta images
    Snapshot,
}

impl ResultCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Xml => "xml",
            Self::Snapshot => "snapshot",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "html" | "report" | "reports" => Some(Self::Html),
            "xml" | "result" | "results" => Some(Self::Xml),
            "snapshot" | "snapshots" | "delta" | "deltas" => Some(Self::Snapshot),
            _ => None,
        }
    }

    /// Parse a comma or whitespace separated list, e.g. `html,xml`
    pub fn parse_list(s: &str) -> Option<Vec<Self>> {
        let mut categories = Vec::new();
        for part in s.split(|c: char| c == ',' || c.is_whitespace()) {
            if part.is_empty() {
                continue;
            }
            let category = Self::parse(part)?;
            if !categories.contains(&category) {
                categories.push(category);
            }
        }
        Some(categories)
    }
}

impl std::fmt::Display for ResultCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What to do when variant filtering leaves nothing to run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmptySelectionPolicy {
    /// Log and skip the test run; the step succeeds
    #[default]
    Skip,
    /// Treat it as a variant resolution failure
    Fail,
}

impl EmptySelectionPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Skip => "skip",
            Self::Fail => "fail",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "skip" | "warn" => Some(Self::Skip),
            "fail" | "error" => Some(Self::Fail),
            _ => None,
        }
    }
}
