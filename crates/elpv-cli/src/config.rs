//! # CLI Configuration
//!
//! Optional YAML file with defaults for the `validate` subcommand. Looked up
//! from `--config`, else `elpv.yaml` in the current directory. Flags given on
//! the command line take precedence over file values.
//!
//! ```yaml
//! format: json
//! fail_on_warning: true
//! missing_preview_limit: 10
//! ```

use std::path::{Path, PathBuf};

use clap::ValueEnum;
use elpv_manifest::pipeline::DEFAULT_MISSING_PREVIEW_LIMIT;
use elpv_manifest::ValidationOptions;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// File name probed in the current directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "elpv.yaml";

/// How reports are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One line per check, with a status icon.
    #[default]
    Text,
    /// Pretty-printed JSON array of reports.
    Json,
}

/// Settings read from the configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    pub format: OutputFormat,
    pub fail_on_warning: bool,
    pub missing_preview_limit: usize,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            fail_on_warning: false,
            missing_preview_limit: DEFAULT_MISSING_PREVIEW_LIMIT,
        }
    }
}

impl CliConfig {
    /// Engine options derived from this configuration.
    pub fn validation_options(&self) -> ValidationOptions {
        ValidationOptions {
            missing_preview_limit: self.missing_preview_limit,
        }
    }
}

/// Failure to load a configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Parse {
        path: String,
        source: serde_yaml::Error,
    },
}

/// Resolve and load the configuration.
///
/// An explicit path must exist. Without one, a missing `elpv.yaml` in `cwd`
/// yields the defaults.
pub fn load_config(explicit: Option<&Path>, cwd: &Path) -> Result<CliConfig, ConfigError> {
    let path: PathBuf = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let candidate = cwd.join(DEFAULT_CONFIG_FILE);
            if !candidate.is_file() {
                tracing::debug!("no config file, using defaults");
                return Ok(CliConfig::default());
            }
            candidate
        }
    };

    let text = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    tracing::debug!(path = %path.display(), "loading config");
    parse_config(&text, &path)
}

/// Parse configuration text. Blank files yield the defaults.
pub fn parse_config(text: &str, path: &Path) -> Result<CliConfig, ConfigError> {
    if text.trim().is_empty() {
        return Ok(CliConfig::default());
    }
    serde_yaml::from_str(text).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })
}
