//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Config file: `$XDG_CONFIG_HOME/mog/mog.toml`, or the file given by `--config`
//! 3. Environment variables: `MOG_*` prefix

use std::fmt;
use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::infrastructure::DEFAULT_GRAPH_URL;

/// Default number of items requested by list commands.
pub const DEFAULT_PAGE_SIZE: u32 = 25;

/// Default HTTP timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// How command results are rendered.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Raw settings for intermediate parsing (`None` → not specified, inherit).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub graph_url: Option<String>,
    pub access_token: Option<String>,
    pub timeout_secs: Option<u64>,
    pub page_size: Option<u32>,
    pub output: Option<OutputFormat>,
}

/// Unified configuration for mog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Graph base URL (default: https://graph.microsoft.com/v1.0)
    pub graph_url: String,
    /// OAuth bearer token for Graph
    pub access_token: Option<String>,
    /// HTTP timeout in seconds
    pub timeout_secs: u64,
    /// Items requested by list commands when `--top` is omitted
    pub page_size: u32,
    /// Output format
    pub output: OutputFormat,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            graph_url: DEFAULT_GRAPH_URL.to_string(),
            access_token: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            page_size: DEFAULT_PAGE_SIZE,
            output: OutputFormat::Table,
        }
    }
}

/// Get the XDG config directory for mog.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "mog").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("mog.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Merge overlay config onto self (base): overlay wins where specified.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            graph_url: overlay
                .graph_url
                .clone()
                .unwrap_or_else(|| self.graph_url.clone()),
            access_token: overlay
                .access_token
                .clone()
                .or_else(|| self.access_token.clone()),
            timeout_secs: overlay.timeout_secs.unwrap_or(self.timeout_secs),
            page_size: overlay.page_size.unwrap_or(self.page_size),
            output: overlay.output.unwrap_or(self.output),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `config_path` - Explicit config file (must exist); `None` uses the
    ///   global file if present
    ///
    /// # Precedence (lowest to highest)
    /// 1. Compiled defaults
    /// 2. Config file
    /// 3. Environment variables: `MOG_*` prefix
    pub fn load(config_path: Option<&Path>) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Config file: explicit path is required, global one is optional
        match config_path {
            Some(path) => {
                let raw = load_raw_settings(path)?;
                current = current.merge_with(&raw);
            }
            None => {
                if let Some(global_path) = global_config_path() {
                    if global_path.exists() {
                        let raw = load_raw_settings(&global_path)?;
                        current = current.merge_with(&raw);
                    }
                }
            }
        }

        // 3. Apply environment variables (explicit override)
        current = Self::apply_env_overrides(current)?;

        current.validate()?;
        Ok(current)
    }

    /// Apply MOG_* environment variables as explicit overrides.
    fn apply_env_overrides(settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("MOG")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        let raw = RawSettings {
            graph_url: config.get_string("graph_url").ok(),
            access_token: config.get_string("access_token").ok(),
            timeout_secs: optional(config.get::<u64>("timeout_secs"), "MOG_TIMEOUT_SECS")?,
            page_size: optional(config.get::<u32>("page_size"), "MOG_PAGE_SIZE")?,
            output: optional(config.get::<OutputFormat>("output"), "MOG_OUTPUT")?,
        };
        Ok(settings.merge_with(&raw))
    }

    fn validate(&self) -> Result<(), ApplicationError> {
        if self.page_size == 0 || self.page_size > 999 {
            return Err(ApplicationError::Config {
                message: format!("page_size must be between 1 and 999, got {}", self.page_size),
            });
        }
        if self.timeout_secs == 0 {
            return Err(ApplicationError::Config {
                message: "timeout_secs must be positive".into(),
            });
        }
        if !(self.graph_url.starts_with("https://") || self.graph_url.starts_with("http://")) {
            return Err(ApplicationError::Config {
                message: format!("graph_url must be an http(s) URL, got {}", self.graph_url),
            });
        }
        Ok(())
    }

    /// Copy with the access token masked, safe to print.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        copy.access_token = self.access_token.as_ref().map(|t| mask_token(t));
        copy
    }

    /// Show the effective configuration as TOML (token masked).
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(&self.redacted()).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# mog configuration
#
# Locations (by precedence, lowest to highest):
#   File: ~/.config/mog/mog.toml  (or --config / MOG_CONFIG)
#   Env:  MOG_* environment variables (explicit overrides)

# Microsoft Graph endpoint
# graph_url = "https://graph.microsoft.com/v1.0"

# OAuth access token with the delegated scopes your commands need
# (Mail.ReadWrite, Mail.Send, Calendars.ReadWrite, Files.ReadWrite,
#  Contacts.ReadWrite, Tasks.ReadWrite, Notes.Read).
# Prefer MOG_ACCESS_TOKEN over storing it here.
# access_token = "eyJ0..."

# HTTP timeout in seconds
# timeout_secs = 30

# Items fetched by list commands when --top is omitted
# page_size = 25

# Output format: "table" or "json"
# output = "table"
"#
        .to_string()
    }
}

/// Missing keys are `None`; present but malformed values are errors.
fn optional<T>(value: Result<T, ConfigError>, var: &str) -> Result<Option<T>, ApplicationError> {
    match value {
        Ok(v) => Ok(Some(v)),
        Err(ConfigError::NotFound(_)) => Ok(None),
        Err(e) => Err(ApplicationError::Config {
            message: format!("{}: {}", var, e),
        }),
    }
}

/// Keep the first and last four characters of long tokens.
fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 12 {
        return "****".into();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}…{}", head, tail)
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
