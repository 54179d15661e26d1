//! mog: Microsoft 365 from the command line, backed by Microsoft Graph

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod help;
pub mod infrastructure;
pub mod util;

/// Version reported by `--version`, stamped at build time through `MOG_VERSION`.
pub const VERSION: &str = match option_env!("MOG_VERSION") {
    Some(v) => v,
    None => "dev",
};
