//! Configuration management for hive-complete
//!
//! This module handles loading, parsing, and saving configuration from:
//! - The configuration file (TOML format)
//! - Environment variables
//! - Command-line arguments (applied by the CLI)
//!
//! Configuration precedence (highest to lowest):
//! 1. Command-line arguments
//! 2. Environment variables
//! 3. Configuration file
//! 4. Default values

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::completion::EngineSettings;
use crate::error::{ConfigError, Result};
use crate::query::{DEFAULT_BINARY, DEFAULT_TIMEOUT, ProcessQuery};
use crate::schema::{SchemaEntry, SchemaRegistry};

/// Environment variable overriding `query.binary`
pub const QUERY_BINARY_ENV: &str = "HIVE_API_QUERY";

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// HiveAPIQuery invocation
    #[serde(default)]
    pub query: QueryConfig,

    /// Completion behavior
    #[serde(default)]
    pub completion: CompletionConfig,

    /// Output of the command-line tool
    #[serde(default)]
    pub display: DisplayConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Additional or replaced schema elements
    #[serde(default)]
    pub schema: SchemaConfig,
}

/// HiveAPIQuery configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Path to the executable, or a program name looked up on `PATH`
    #[serde(default = "default_binary")]
    pub binary: PathBuf,

    /// Seconds to wait for one query
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionConfig {
    /// Hide the editor's own word completions while ours are shown
    #[serde(default = "default_inhibit")]
    pub inhibit_other_completions: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,
}

/// Output format options
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One candidate per line, label and insertion text separated by a tab
    Plain,

    /// A JSON document with the context and the candidates
    Json,

    /// An ASCII table
    Table,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: LogLevel,

    /// Enable timestamps in logs
    #[serde(default = "default_log_timestamps")]
    pub timestamps: bool,
}

/// Log level options
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Schema overrides, keyed by element name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaConfig {
    #[serde(default)]
    pub elements: BTreeMap<String, SchemaEntry>,
}

// Default value functions
fn default_binary() -> PathBuf {
    PathBuf::from(DEFAULT_BINARY)
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT.as_secs()
}

fn default_inhibit() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Plain
}

fn default_log_level() -> LogLevel {
    LogLevel::Warn
}

fn default_log_timestamps() -> bool {
    false
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            binary: default_binary(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            inhibit_other_completions: default_inhibit(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            timestamps: default_log_timestamps(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse configuration from TOML text
    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text).map_err(ConfigError::from)?)
    }

    /// Load configuration from a file
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file (TOML format)
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Unreadable {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml(&text)
    }

    /// Load configuration from `path`, or from the default location.
    ///
    /// An explicit path must exist. A missing default file yields the
    /// defaults. Environment overrides are applied either way.
    pub fn load_from_file(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default = Self::default_config_path();
                if default.is_file() {
                    Self::from_file(&default)?
                } else {
                    tracing::debug!(path = %default.display(), "no configuration file, using defaults");
                    Self::default()
                }
            }
        };

        config.apply_env();
        Ok(config)
    }

    /// Get the default configuration file path
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("hive-complete")
            .join("config.toml")
    }

    /// Apply overrides from the process environment
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from `lookup` (an environment-like key lookup)
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(binary) = lookup(QUERY_BINARY_ENV).filter(|b| !b.trim().is_empty()) {
            tracing::debug!(binary = %binary, "query binary overridden from environment");
            self.query.binary = PathBuf::from(binary);
        }
    }

    /// Serialize to TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| ConfigError::InvalidFormat(e.to_string()).into())
    }

    /// Save configuration to a file, creating parent directories
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let unwritable = |e: std::io::Error| ConfigError::Unreadable {
            path: path.display().to_string(),
            reason: e.to_string(),
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(unwritable)?;
        }
        std::fs::write(path, self.to_toml()?).map_err(unwritable)?;
        tracing::info!(path = %path.display(), "configuration saved");
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.query.binary.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "query.binary".to_string(),
                value: String::new(),
            }
            .into());
        }

        if self.query.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "query.timeout_secs".to_string(),
                value: self.query.timeout_secs.to_string(),
            }
            .into());
        }

        if let Some(name) = self.schema.elements.keys().find(|name| name.trim().is_empty()) {
            return Err(ConfigError::InvalidValue {
                field: "schema.elements".to_string(),
                value: format!("{name:?}"),
            }
            .into());
        }

        Ok(())
    }

    /// Get the query timeout as Duration
    pub fn query_timeout(&self) -> Duration {
        Duration::from_secs(self.query.timeout_secs)
    }

    /// HiveAPIQuery backend described by this configuration
    pub fn process_query(&self) -> ProcessQuery {
        ProcessQuery::new(&self.query.binary).with_timeout(self.query_timeout())
    }

    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            inhibit_other_completions: self.completion.inhibit_other_completions,
        }
    }

    /// Built-in HIVE schema with the configured overrides applied
    pub fn schema_registry(&self) -> SchemaRegistry {
        let mut registry = SchemaRegistry::hive();
        registry.extend(self.schema.elements.clone());
        registry
    }
}

impl LogLevel {
    /// Convert to tracing::Level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}
