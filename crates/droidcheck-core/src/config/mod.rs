//! Step configuration
//!
//! Three layers are merged, highest precedence first: command line flags
//! and their environment variables (see [`ConfigOverrides`]), a
//! `droidcheck.toml` / `droidcheck.yaml` file, and built-in defaults.

pub mod defaults;
mod loader;
mod types;
pub mod validation;

pub use defaults::*;
pub use loader::*;
pub use types::*;
pub use validation::*;
