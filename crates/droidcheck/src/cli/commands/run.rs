//! Run command - run the test task and export its results

use std::path::{Path, PathBuf};

use clap::Args;
use tracing::info;

use droidcheck_artifacts::ExportRecord;
use droidcheck_core::{ResultCategory, StepConfig};
use droidcheck_gradle::{GradleCommand, GradleProject, RunOutcome, Selection};

use super::{runtime, ConfigArgs};
use crate::cli::{output, Cli};
use crate::orchestration::{
    display_destination, display_source, ExportTarget, Orchestrator, Progress, RunContext,
    RunSummary,
};

/// Run the test task for the selected variants and export the results
#[derive(Debug, Args)]
pub struct RunCommand {
    #[command(flatten)]
    pub config: ConfigArgs,
}

impl RunCommand {
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        runtime()?.block_on(self.execute_async(cli))
    }

    async fn execute_async(&self, cli: &Cli) -> anyhow::Result<()> {
        let cwd = std::env::current_dir()?;
        let config = self.config.resolve(&cwd)?;
        info!(task = %config.task, project = %config.project_location.display(), "executing run command");

        if cli.text_output() {
            print_config(&config);
        }

        let project = GradleProject::open(&config.project_location)?;
        let orchestrator = Orchestrator::new(RunContext::new(config, Box::new(project)));

        let mut progress = ConsoleProgress::new(cli.text_output(), Some(cwd));
        let summary = orchestrator.run(&mut progress).await?;

        if cli.format == crate::cli::OutputFormat::Json {
            output::json(&summary)?;
        } else if !cli.quiet {
            print_summary(&summary);
        }

        if summary.is_failure() {
            anyhow::bail!(
                "test task failed{}",
                summary
                    .exit_code
                    .map(|c| format!(" with exit code {}", c))
                    .unwrap_or_default()
            );
        }

        Ok(())
    }
}

fn print_config(config: &StepConfig) {
    println!("{}", output::header("Configs:"));
    for (key, value) in config.summary() {
        println!("{}", output::key_value(key, &value));
    }
    println!();
}

fn print_summary(summary: &RunSummary) {
    let failed = summary.deployed.failed.len() + summary.test_addon.failed.len();
    if failed > 0 {
        output::warning(&format!("{} artifact(s) could not be exported", failed));
    }
    if summary.status == crate::orchestration::RunStatus::Passed {
        output::success("Test task passed");
    }
}

/// Prints progress lines as the step runs
struct ConsoleProgress {
    enabled: bool,
    cwd: Option<PathBuf>,
}

impl ConsoleProgress {
    fn new(enabled: bool, cwd: Option<PathBuf>) -> Self {
        Self { enabled, cwd }
    }
}

impl Progress for ConsoleProgress {
    fn selection(&mut self, selection: &Selection) {
        if !self.enabled {
            return;
        }
        println!("{}", output::header("Variants:"));
        println!();
        for line in output::selection_lines(&selection.report()) {
            println!("{}", line);
        }
        println!();
    }

    fn skipped(&mut self) {
        if self.enabled {
            output::warning("No buildable variants found. Skipping tests!");
        }
    }

    fn command(&mut self, command: &GradleCommand) {
        if !self.enabled {
            return;
        }
        println!("{}", output::header("Run test:"));
        println!();
        println!(
            "{}",
            output::command_style().apply_to(format!("$ {}", command.printable()))
        );
        println!();
    }

    fn finished(&mut self, outcome: &RunOutcome) {
        if self.enabled && !outcome.is_success() {
            output::error(&format!(
                "Run: test task failed, exit code: {}",
                outcome
                    .code
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| "none".to_string())
            ));
        }
    }

    fn export_started(&mut self, target: ExportTarget, category: Option<ResultCategory>) {
        if !self.enabled {
            return;
        }
        let title = match (target, category) {
            (ExportTarget::TestAddon, _) => "Export XML results for test addon:".to_string(),
            (ExportTarget::Deploy, Some(category)) => {
                format!("Export {} results:", category.as_str().to_uppercase())
            }
            (ExportTarget::Deploy, None) => "Export results:".to_string(),
        };
        println!();
        output::info(&title);
        println!();
    }

    fn exported(&mut self, target: ExportTarget, root: &Path, record: &ExportRecord) {
        if !self.enabled {
            return;
        }
        let source = display_source(&record.source, self.cwd.as_deref());
        let destination = display_destination(target, root, &record.destination);
        println!("{}", output::export_line(&source, &destination));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_run_flags() {
        let cli = Cli::try_parse_from([
            "droidcheck",
            "run",
            "--task",
            "verifySnapshots",
            "--variant",
            "debug",
            "--arguments",
            "--stacktrace --info",
            "--empty-selection",
            "fail",
        ])
        .unwrap();

        let crate::cli::Commands::Run(cmd) = cli.command else {
            panic!("expected run command");
        };
        assert_eq!(cmd.config.task.as_deref(), Some("verifySnapshots"));
        assert_eq!(cmd.config.variant.as_deref(), Some("debug"));
        assert_eq!(cmd.config.arguments.as_deref(), Some("--stacktrace --info"));
        assert_eq!(
            cmd.config.empty_selection,
            Some(droidcheck_core::EmptySelectionPolicy::Fail)
        );
    }
}
