//! Process exit codes

/// Successful termination (also used after `--ai-help`)
pub const OK: i32 = 0;

/// A command ran and failed
pub const FAILURE: i32 = 1;
