//! The test step: discover, select, run, export
//!
//! [`Orchestrator`] sequences one run over a [`RunContext`]. Console output
//! is left to a [`Progress`] implementation so the sequence itself can be
//! driven by tests with a fake build driver.

use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use droidcheck_artifacts::{
    deploy_name, find_artifacts, task_output_dir, Artifact, DeployExporter, ExportRecord,
    ExportSummary, TestAddonExporter,
};
use droidcheck_core::{ConfigError, ResultCategory, StepConfig};
use droidcheck_gradle::{
    module_path, module_slug, select_variants, BuildDriver, DriverError, GradleCommand,
    GradleTask, ModuleSelection, RunOutcome, Selection, SelectionError,
};

/// File name pattern of unit test results
pub const XML_RESULT_PATTERN: &str = "*.xml";

/// File name pattern of snapshot delta images
pub const DELTA_IMAGE_PATTERN: &str = "delta-*.png";

/// Failures that stop the step before the test run
#[derive(Debug, Error)]
pub enum StepError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to fetch variants: {0}")]
    Driver(#[from] DriverError),

    #[error("failed to find buildable variants: {0}")]
    Selection(#[from] SelectionError),
}

/// Everything one run needs
pub struct RunContext {
    pub config: StepConfig,
    pub driver: Box<dyn BuildDriver>,
}

impl RunContext {
    pub fn new(config: StepConfig, driver: Box<dyn BuildDriver>) -> Self {
        Self { config, driver }
    }
}

/// Which export root a record was written to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportTarget {
    Deploy,
    TestAddon,
}

impl ExportTarget {
    /// Environment variable naming the root, for log lines
    pub fn env_var(&self) -> &'static str {
        match self {
            Self::Deploy => "$BITRISE_DEPLOY_DIR",
            Self::TestAddon => "$BITRISE_TEST_RESULT_DIR",
        }
    }
}

/// Hooks for reporting progress while the step runs
pub trait Progress {
    fn selection(&mut self, _selection: &Selection) {}

    fn skipped(&mut self) {}

    fn command(&mut self, _command: &GradleCommand) {}

    fn finished(&mut self, _outcome: &RunOutcome) {}

    fn export_started(&mut self, _target: ExportTarget, _category: Option<ResultCategory>) {}

    fn exported(&mut self, _target: ExportTarget, _root: &Path, _record: &ExportRecord) {}
}

/// How the test run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// No buildable variants; nothing ran
    Skipped,
    Passed,
    Failed,
}

/// Outcome of one step run
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub status: RunStatus,
    pub exit_code: Option<i32>,
    pub command: Option<String>,
    pub variants: Vec<ModuleSelection>,
    pub deployed: ExportSummary,
    pub test_addon: ExportSummary,
}

impl RunSummary {
    pub fn is_failure(&self) -> bool {
        self.status == RunStatus::Failed
    }
}

/// Sequences a single step run
pub struct Orchestrator {
    ctx: RunContext,
}

impl Orchestrator {
    pub fn new(ctx: RunContext) -> Self {
        Self { ctx }
    }

    fn task(&self) -> GradleTask<'_, dyn BuildDriver> {
        GradleTask::new(self.ctx.driver.as_ref(), self.ctx.config.task.clone())
    }

    /// Discover the task's variants and apply the module and variant filters
    pub async fn select(&self) -> Result<Selection, StepError> {
        let config = &self.ctx.config;
        let args = config.gradle_arguments()?;

        let all = self.task().variants(&args).await?;
        debug!(task = %config.task, modules = all.len(), "discovered variants");

        let selection = select_variants(
            &all,
            config.module.as_deref(),
            config.variant.as_deref(),
            config.task_kind(),
            config.empty_selection,
        )?;
        Ok(selection)
    }

    /// Run the whole step.
    ///
    /// A failing test command is not an error: results are still exported
    /// and the summary reports [`RunStatus::Failed`].
    pub async fn run(&self, progress: &mut dyn Progress) -> Result<RunSummary, StepError> {
        let config = &self.ctx.config;
        let args = config.gradle_arguments()?;
        let selection = self.select().await?;
        progress.selection(&selection);

        let mut summary = RunSummary {
            status: RunStatus::Skipped,
            exit_code: None,
            command: None,
            variants: selection.report(),
            deployed: ExportSummary::default(),
            test_addon: ExportSummary::default(),
        };

        if selection.is_empty() {
            info!("no buildable variants found, skipping test run");
            progress.skipped();
            return Ok(summary);
        }

        let command = self.task().command(&selection.selected, &args);
        progress.command(&command);
        summary.command = Some(command.printable());

        // Results can exist even when the command could not start
        let outcome = match self.ctx.driver.run(&command).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(error = %e, "test command failed to run");
                RunOutcome { code: None }
            }
        };
        progress.finished(&outcome);
        summary.exit_code = outcome.code;
        summary.status = if outcome.is_success() {
            RunStatus::Passed
        } else {
            RunStatus::Failed
        };

        if let Some(deploy_dir) = &config.deploy_dir {
            summary.deployed = self.export_deploy(deploy_dir, &selection, progress);
        }
        if let Some(result_dir) = &config.test_result_dir {
            summary.test_addon = self.export_test_addon(result_dir, &selection, progress);
        }

        Ok(summary)
    }

    /// Zip each category's location of every selected module
    fn export_deploy(
        &self,
        deploy_dir: &Path,
        selection: &Selection,
        progress: &mut dyn Progress,
    ) -> ExportSummary {
        let config = &self.ctx.config;
        let project = self.ctx.driver.project_dir();
        let exporter = DeployExporter::new(deploy_dir);
        let mut summary = ExportSummary::default();

        for category in config.categories() {
            progress.export_started(ExportTarget::Deploy, Some(category));
            let pattern = category_pattern(config, category);

            let artifacts: Vec<Artifact> = selection
                .selected
                .modules()
                .filter_map(|module| {
                    let path = module_path(project, module).join(pattern);
                    if !path.exists() {
                        debug!(path = %path.display(), "no results to deploy");
                        return None;
                    }
                    Some(Artifact::new(deploy_name(&module_slug(module), pattern), path))
                })
                .collect();

            let batch = exporter.deploy_all(&artifacts);
            for record in &batch.exported {
                progress.exported(ExportTarget::Deploy, deploy_dir, record);
            }
            summary.extend(batch);
        }

        summary
    }

    /// Copy XML results and delta images into the test addon directory
    fn export_test_addon(
        &self,
        result_dir: &Path,
        selection: &Selection,
        progress: &mut dyn Progress,
    ) -> ExportSummary {
        let config = &self.ctx.config;
        let categories = config.categories();
        let project = self.ctx.driver.project_dir();
        let mut exporter = TestAddonExporter::new(result_dir);
        let mut summary = ExportSummary::default();

        progress.export_started(ExportTarget::TestAddon, None);

        for (module, variants) in selection.selected.iter() {
            let module_dir = module_path(project, module);
            let mut artifacts = Vec::new();

            if categories.contains(&ResultCategory::Xml) {
                for variant in variants {
                    let dir = module_dir
                        .join(&config.result_path_pattern)
                        .join(task_output_dir(variant));
                    artifacts.extend(find_artifacts(&dir, XML_RESULT_PATTERN));
                }
            }
            if categories.contains(&ResultCategory::Snapshot) {
                let dir = module_dir.join(&config.delta_path_pattern);
                artifacts.extend(find_artifacts(&dir, DELTA_IMAGE_PATTERN));
            }

            let batch = exporter.export_all(&artifacts);
            for record in &batch.exported {
                progress.exported(ExportTarget::TestAddon, result_dir, record);
            }
            summary.extend(batch);
        }

        summary
    }
}

fn category_pattern(config: &StepConfig, category: ResultCategory) -> &str {
    match category {
        ResultCategory::Html => &config.report_path_pattern,
        ResultCategory::Xml => &config.result_path_pattern,
        ResultCategory::Snapshot => &config.delta_path_pattern,
    }
}

/// `./relative/path` when `path` is under `cwd`, otherwise the path as is
pub fn display_source(path: &Path, cwd: Option<&Path>) -> String {
    if let Some(rel) = cwd.and_then(|cwd| path.strip_prefix(cwd).ok()) {
        return format!("./{}", rel.display());
    }
    path.display().to_string()
}

/// `$VAR/rest` for a destination under `root`
pub fn display_destination(target: ExportTarget, root: &Path, destination: &Path) -> String {
    let rel: PathBuf = destination
        .strip_prefix(root)
        .map(Path::to_path_buf)
        .unwrap_or_else(|_| destination.to_path_buf());
    format!("{}/{}", target.env_var(), rel.display())
}
