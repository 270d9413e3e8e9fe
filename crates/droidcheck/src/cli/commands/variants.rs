//! Variants command - show which variants a run would select

use clap::Args;
use serde::Serialize;
use tracing::info;

use droidcheck_gradle::{GradleProject, ModuleSelection};

use super::{runtime, ConfigArgs};
use crate::cli::{output, Cli, OutputFormat};
use crate::orchestration::{Orchestrator, RunContext};

/// Discover variants and show which ones would run
#[derive(Debug, Args)]
pub struct VariantsCommand {
    #[command(flatten)]
    pub config: ConfigArgs,
}

#[derive(Debug, Serialize)]
struct VariantsOutput {
    task: String,
    gradle: String,
    modules: Vec<ModuleSelection>,
}

impl VariantsCommand {
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        runtime()?.block_on(self.execute_async(cli))
    }

    async fn execute_async(&self, cli: &Cli) -> anyhow::Result<()> {
        let cwd = std::env::current_dir()?;
        let config = self.config.resolve(&cwd)?;
        info!(task = %config.task, "executing variants command");

        let project = GradleProject::open(&config.project_location)?;
        let gradle = project.gradle().to_string();
        let task = config.task.clone();

        let orchestrator = Orchestrator::new(RunContext::new(config, Box::new(project)));
        let selection = orchestrator.select().await?;

        if cli.format == OutputFormat::Json {
            return output::json(&VariantsOutput {
                task,
                gradle,
                modules: selection.report(),
            });
        }
        if cli.quiet {
            return Ok(());
        }

        println!("{}", output::header(&format!("Variants of '{}':", task)));
        println!("{}", output::key_value("gradle", &gradle));
        println!();
        for line in output::selection_lines(&selection.report()) {
            println!("{}", line);
        }

        if selection.is_empty() {
            println!();
            output::warning("No buildable variants selected");
        }

        Ok(())
    }
}
