//! Bootstrap configuration loading
//!
//! # Settings Sources Priority
//!
//! 1. Command-line argument (`--config`)
//! 2. Environment variable (`HYMNAL_CONFIG`)
//! 3. User config file (`~/.config/hymnal/config.toml` on Linux, platform
//!    equivalent elsewhere)
//! 4. Built-in defaults (code constants)
//!
//! A missing configuration file is not an error: defaults are used and a
//! warning is logged. A file that exists but cannot be parsed, or that holds
//! invalid analysis weights, is a fatal configuration error.

use crate::analysis::{AnalysisConfig, ScoringProfile};
use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "HYMNAL_CONFIG";

/// Bootstrap configuration loaded from TOML file
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TomlConfig {
    /// Scoring profile (baseline score and version tag)
    #[serde(default)]
    pub profile: ScoringProfile,

    /// Number of songs analyzed concurrently by batch callers
    #[serde(default = "default_batch_concurrency")]
    pub batch_concurrency: usize,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Default analysis tuning (optional)
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            profile: ScoringProfile::default(),
            batch_concurrency: default_batch_concurrency(),
            logging: LoggingConfig::default(),
            analysis: AnalysisConfig::default(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error) or full filter directive
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_batch_concurrency() -> usize {
    4
}

fn default_log_level() -> String {
    "info".to_string()
}

impl TomlConfig {
    /// Parse configuration from TOML text and validate it
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: TomlConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }

    /// Check values that deserialization alone cannot enforce
    pub fn validate(&self) -> Result<()> {
        if self.batch_concurrency == 0 {
            return Err(Error::Config(
                "batch_concurrency must be at least 1".to_string(),
            ));
        }
        self.analysis.validate()
    }
}

/// Resolves and loads the bootstrap configuration file
pub struct ConfigResolver {
    cli_path: Option<PathBuf>,
}

impl ConfigResolver {
    pub fn new(cli_path: Option<PathBuf>) -> Self {
        Self { cli_path }
    }

    /// Find the config file path following the priority order
    ///
    /// Returns `None` when no candidate exists.
    pub fn resolve_path(&self) -> Option<PathBuf> {
        // Priority 1: Command-line argument
        if let Some(path) = &self.cli_path {
            return Some(path.clone());
        }

        // Priority 2: Environment variable
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            if !path.trim().is_empty() {
                return Some(PathBuf::from(path));
            }
        }

        // Priority 3: User config directory
        default_config_path().filter(|path| path.exists())
    }

    /// Load configuration, falling back to defaults when no file is found
    ///
    /// An explicitly named file (CLI or environment) that does not exist is
    /// still treated as missing rather than fatal.
    pub fn load(&self) -> Result<TomlConfig> {
        let Some(path) = self.resolve_path() else {
            warn!("No config file found, using built-in defaults");
            return Ok(TomlConfig::default());
        };

        if !path.exists() {
            warn!(path = %path.display(), "Config file not found, using built-in defaults");
            return Ok(TomlConfig::default());
        }

        let config = TomlConfig::load(&path)?;
        info!(path = %path.display(), profile = %config.profile, "Loaded configuration");
        Ok(config)
    }
}

/// Platform config location (`<config_dir>/hymnal/config.toml`)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("hymnal").join("config.toml"))
}
