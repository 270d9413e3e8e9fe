//! Classify command - map result paths to test addon directories

use std::path::PathBuf;

use clap::Args;
use serde::Serialize;
use tracing::info;

use droidcheck_artifacts::{allocate, classify, ArtifactIdentity, OtherDirCounter};

use crate::cli::{output, Cli, OutputFormat};

/// Show the test addon directory each result path would be exported to
#[derive(Debug, Args)]
pub struct ClassifyCommand {
    /// Result file paths, in export order
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,
}

#[derive(Debug, Serialize)]
struct Classification {
    path: PathBuf,
    export_dir: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    identity: Option<ArtifactIdentity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
}

impl ClassifyCommand {
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(paths = self.paths.len(), "executing classify command");

        let results = classify_all(&self.paths);

        if cli.format == OutputFormat::Json {
            return output::json(&results);
        }
        if cli.quiet {
            return Ok(());
        }

        for result in &results {
            println!(
                "{} => {}",
                output::path_style().apply_to(result.path.display()),
                result.export_dir
            );
            if cli.verbose {
                if let Some(reason) = &result.reason {
                    println!("  {}", console::style(reason).dim());
                }
            }
        }
        Ok(())
    }
}

/// Classify in order, sharing one `other` counter like an export pass does
fn classify_all(paths: &[PathBuf]) -> Vec<Classification> {
    let mut counter = OtherDirCounter::new();
    paths
        .iter()
        .map(|path| {
            let result = classify(path);
            let export_dir = allocate(&result, &mut counter);
            let (identity, reason) = match result {
                Ok(identity) => (Some(identity), None),
                Err(e) => (None, Some(e.to_string())),
            };
            Classification {
                path: path.clone(),
                export_dir,
                identity,
                reason,
            }
        })
        .collect()
}
