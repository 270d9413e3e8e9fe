//! CLI definition and command handling

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};

use commands::{ClassifyCommand, RunCommand, VariantsCommand};

/// droidcheck - Android Gradle test step for CI
#[derive(Debug, Parser)]
#[command(name = "droidcheck")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Working directory
    #[arg(short = 'C', long, global = true)]
    pub directory: Option<std::path::PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for CLI
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output
    Json,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the test task for the selected variants and export the results
    Run(RunCommand),

    /// Discover variants and show which ones would run
    Variants(VariantsCommand),

    /// Show the test addon directory each result path would be exported to
    Classify(ClassifyCommand),
}

impl Cli {
    /// Whether console logging should be at debug level
    pub fn debug_logging(&self) -> bool {
        let is_debug = match &self.command {
            Commands::Run(cmd) => cmd.config.is_debug,
            Commands::Variants(cmd) => cmd.config.is_debug,
            _ => None,
        };
        self.verbose || is_debug.unwrap_or(false)
    }

    /// Show human-readable progress
    pub fn text_output(&self) -> bool {
        !self.quiet && self.format == OutputFormat::Text
    }

    /// Execute the CLI command
    pub fn execute(self) -> anyhow::Result<()> {
        // Change to specified directory if provided
        if let Some(dir) = &self.directory {
            std::env::set_current_dir(dir)?;
        }

        match self.command {
            Commands::Run(ref cmd) => cmd.execute(&self),
            Commands::Variants(ref cmd) => cmd.execute(&self),
            Commands::Classify(ref cmd) => cmd.execute(&self),
        }
    }
}
