//! Exit codes for the CLI

/// Success, including a skipped run with no buildable variants
pub const SUCCESS: i32 = 0;

/// Configuration, variant resolution, or test failure
pub const ERROR: i32 = 1;
