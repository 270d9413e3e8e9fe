//! CLI commands

mod classify;
mod config_args;
mod run;
mod variants;

pub use classify::ClassifyCommand;
pub use config_args::ConfigArgs;
pub use run::RunCommand;
pub use variants::VariantsCommand;

/// Current-thread runtime for the async driver seam
fn runtime() -> anyhow::Result<tokio::runtime::Runtime> {
    Ok(tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?)
}
