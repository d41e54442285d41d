//! Tool configuration loading and management.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::CoreError;

/// Full configuration for the passport tools.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PassportConfig {
    /// Where template and schema definitions live.
    #[serde(default)]
    pub data: DataConfig,

    /// Network fetch settings.
    #[serde(default)]
    pub fetch: FetchConfig,

    /// Batch processing settings.
    #[serde(default)]
    pub batch: BatchConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Signing settings.
    #[serde(default)]
    pub signing: SigningConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Directory of template definition files.
    #[serde(default = "default_templates_dir")]
    pub templates_dir: PathBuf,
    /// Directory of schema definition files.
    #[serde(default = "default_schemas_dir")]
    pub schemas_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Accept header sent when fetching documents by URL.
    #[serde(default = "default_accept")]
    pub accept: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Memoize fetched documents for the duration of one run.
    #[serde(default = "default_true")]
    pub cache: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Number of records processed concurrently.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (text, json).
    #[serde(default = "default_log_format")]
    pub format: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SigningConfig {
    /// URL of the published verification method document.
    #[serde(default)]
    pub verifier: Option<String>,
    /// Issuer URL placed into credential envelopes.
    #[serde(default)]
    pub issuer: Option<String>,
}

// Default value functions
fn default_templates_dir() -> PathBuf {
    PathBuf::from("data/templates")
}
fn default_schemas_dir() -> PathBuf {
    PathBuf::from("data/schemas")
}
fn default_accept() -> String {
    "application/vc+ld+json".into()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_true() -> bool {
    true
}
fn default_concurrency() -> usize {
    4
}
fn default_log_level() -> String {
    "info".into()
}
fn default_log_format() -> String {
    "text".into()
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            templates_dir: default_templates_dir(),
            schemas_dir: default_schemas_dir(),
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            accept: default_accept(),
            timeout_secs: default_timeout_secs(),
            cache: true,
        }
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl PassportConfig {
    /// Load config from a TOML file, falling back to defaults for missing fields.
    pub fn load(path: &Path) -> Result<Self, CoreError> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            let config: PassportConfig = toml::from_str(&contents)?;
            Ok(config)
        } else {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Save the current config to a TOML file.
    pub fn save(&self, path: &Path) -> Result<(), CoreError> {
        let contents = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Batch concurrency, never below one.
    pub fn concurrency(&self) -> usize {
        self.batch.concurrency.max(1)
    }
}
