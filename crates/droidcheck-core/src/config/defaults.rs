//! Default configuration values

/// Default configuration file name (TOML)
pub const DEFAULT_CONFIG_TOML: &str = "droidcheck.toml";

/// Default configuration file name (YAML)
pub const DEFAULT_CONFIG_YAML: &str = "droidcheck.yaml";

/// Default HTML report location, relative to a module directory
pub const DEFAULT_REPORT_PATH_PATTERN: &str = "build/reports/tests";

/// Default XML result location, relative to a module directory
pub const DEFAULT_RESULT_PATH_PATTERN: &str = "build/test-results";

/// Default snapshot delta location, relative to a module directory
pub const DEFAULT_DELTA_PATH_PATTERN: &str = "build/snapshots/deltas";

/// Get list of config file names to search for
pub fn config_file_names() -> Vec<&'static str> {
    vec![
        DEFAULT_CONFIG_TOML,
        DEFAULT_CONFIG_YAML,
        ".droidcheck.toml",
        ".droidcheck.yaml",
    ]
}
