//! Output formatting utilities

use console::{style, Style};
use droidcheck_gradle::ModuleSelection;

/// Print a success message
pub fn success(message: &str) {
    println!("{} {}", style("✓").green().bold(), message);
}

/// Print an error message
pub fn error(message: &str) {
    eprintln!("{} {}", style("✗").red().bold(), message);
}

/// Print a warning message
pub fn warning(message: &str) {
    println!("{} {}", style("!").yellow().bold(), message);
}

/// Print an info message
pub fn info(message: &str) {
    println!("{} {}", style("→").blue(), message);
}

/// Create a styled header
pub fn header(text: &str) -> String {
    style(text).bold().to_string()
}

/// Create a styled key-value line
pub fn key_value(key: &str, value: &str) -> String {
    format!("  {}: {}", style(key).dim(), value)
}

/// Style for paths
pub fn path_style() -> Style {
    Style::new().cyan()
}

/// Style for the command line echoed before a run
pub fn command_style() -> Style {
    Style::new().green()
}

/// A selected variant line, `  ✓ debug`
pub fn selected_variant(name: &str) -> String {
    format!("  {} {}", style("✓").green(), name)
}

/// A skipped variant line, `  - release`
pub fn skipped_variant(name: &str) -> String {
    format!("  {} {}", style("-").dim(), style(name).dim())
}

/// Module headings with their variant lines, in discovery order
pub fn selection_lines(report: &[ModuleSelection]) -> Vec<String> {
    let mut lines = Vec::new();
    for module in report {
        lines.push(format!("{}:", module.module));
        for variant in &module.variants {
            lines.push(if variant.selected {
                selected_variant(&variant.name)
            } else {
                skipped_variant(&variant.name)
            });
        }
    }
    lines
}

/// An export line, `  Export [./src => $VAR/dest]`
pub fn export_line(source: &str, destination: &str) -> String {
    format!(
        "  Export [{} => {}]",
        path_style().apply_to(source),
        path_style().apply_to(destination)
    )
}

/// Print a value as pretty JSON
pub fn json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
