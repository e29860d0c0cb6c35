//! Configuration Loading System
//!
//! Sources are applied in the order they were added to the loader:
//! 1. Default values
//! 2. Configuration files
//! 3. Environment variables

use crate::{ConfigError, Result};
use eca_core::{Preferences, Tradeoff};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default environment variable prefix
pub const DEFAULT_ENV_PREFIX: &str = "ECA";

/// Configuration source type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Load from a file
    File(PathBuf),
    /// Load from environment variables
    Env,
    /// Use default values
    Default,
    /// Load from in-memory string (for testing)
    Memory(String),
}

/// Log level configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum LogLevel {
    /// Trace level
    Trace,
    /// Debug level
    Debug,
    /// Info level
    #[default]
    Info,
    /// Warn level
    Warn,
    /// Error level
    Error,
}

impl LogLevel {
    /// Directive understood by `tracing_subscriber::EnvFilter`
    pub const fn as_filter(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            _ => Err(ConfigError::InvalidValue {
                field: "log_level".to_string(),
                message: format!("Invalid log level: {s}"),
            }),
        }
    }
}

/// Log format configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum LogFormat {
    /// JSON format
    Json,
    /// Pretty format
    Pretty,
    /// Compact format
    #[default]
    Compact,
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" => Ok(Self::Pretty),
            "compact" => Ok(Self::Compact),
            _ => Err(ConfigError::InvalidValue {
                field: "log_format".to_string(),
                message: format!("Invalid log format: {s}"),
            }),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Log level
    pub level: LogLevel,
    /// Log format
    pub format: LogFormat,
}

/// Signal values used when the caller does not supply one
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalDefaults {
    /// Attention score in [0, 1]
    pub attention: f64,
    /// Hours since last use
    pub last_used_hours: f64,
}

/// Top-level eca configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EcaConfig {
    /// Recommendation preferences
    pub preferences: Preferences,
    /// Default usage signals
    pub signals: SignalDefaults,
    /// Logging configuration
    pub log: LogConfig,
}

/// Configuration loader
pub struct ConfigLoader {
    sources: Vec<ConfigSource>,
    env_prefix: Option<String>,
}

impl ConfigLoader {
    /// Create a new configuration loader
    #[must_use]
    pub fn new() -> Self {
        Self {
            sources: vec![ConfigSource::Default],
            env_prefix: None,
        }
    }

    /// Add a file source
    #[must_use]
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        self.sources
            .push(ConfigSource::File(expand_path(path.as_ref())));
        self
    }

    /// Add an in-memory TOML source
    #[must_use]
    pub fn with_memory(mut self, toml: impl Into<String>) -> Self {
        self.sources.push(ConfigSource::Memory(toml.into()));
        self
    }

    /// Add environment variable source with prefix
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_string());
        self.sources.push(ConfigSource::Env);
        self
    }

    /// Sources in application order
    pub fn sources(&self) -> &[ConfigSource] {
        &self.sources
    }

    /// Load configuration from all sources
    pub fn load(&self) -> Result<EcaConfig> {
        let mut config = EcaConfig::default();

        for source in &self.sources {
            match source {
                ConfigSource::Default => {
                    // Already loaded via default
                }
                ConfigSource::File(path) => {
                    let content = std::fs::read_to_string(path)?;
                    config = Self::load_from_str(&content)?;
                }
                ConfigSource::Env => {
                    if let Some(prefix) = &self.env_prefix {
                        config = Self::apply_env_overrides(config, prefix)?;
                    }
                }
                ConfigSource::Memory(content) => {
                    config = Self::load_from_str(content)?;
                }
            }
        }

        Ok(config)
    }

    /// Load configuration from a TOML string
    pub fn load_from_str(toml: &str) -> Result<EcaConfig> {
        toml::from_str(toml).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Get default configuration
    #[must_use]
    pub fn default_config() -> EcaConfig {
        EcaConfig::default()
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(mut config: EcaConfig, prefix: &str) -> Result<EcaConfig> {
        // Preference overrides
        if let Ok(val) = std::env::var(format!("{prefix}_TRADEOFF")) {
            config.preferences.tradeoff = Tradeoff::normalize(&val);
        }
        if let Ok(val) = std::env::var(format!("{prefix}_ASSUME_HARDWARE_AES")) {
            config.preferences.assume_hardware_aes = parse_bool(&val).ok_or_else(|| {
                ConfigError::EnvVar(format!("Invalid assume_hardware_aes value: {val}"))
            })?;
        }
        if let Ok(val) = std::env::var(format!("{prefix}_FORCE_EXTENSION_PRIORITY")) {
            config.preferences.force_extension_priority = parse_bool(&val).ok_or_else(|| {
                ConfigError::EnvVar(format!("Invalid force_extension_priority value: {val}"))
            })?;
        }

        // Signal overrides
        if let Ok(val) = std::env::var(format!("{prefix}_ATTENTION")) {
            config.signals.attention = val
                .parse()
                .map_err(|_| ConfigError::EnvVar(format!("Invalid attention value: {val}")))?;
        }
        if let Ok(val) = std::env::var(format!("{prefix}_LAST_USED_HOURS")) {
            config.signals.last_used_hours = val.parse().map_err(|_| {
                ConfigError::EnvVar(format!("Invalid last_used_hours value: {val}"))
            })?;
        }

        // Log overrides
        if let Ok(val) = std::env::var(format!("{prefix}_LOG_LEVEL")) {
            config.log.level = val.parse()?;
        }
        if let Ok(val) = std::env::var(format!("{prefix}_LOG_FORMAT")) {
            config.log.format = val.parse()?;
        }

        Ok(config)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Default location of the config file, `<config dir>/eca/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("eca").join("config.toml"))
}

/// Expand a leading `~/` to the home directory
pub fn expand_path(path: &Path) -> PathBuf {
    if let Some(rest) = path.to_str().and_then(|s| s.strip_prefix("~/")) {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    path.to_path_buf()
}

fn parse_bool(val: &str) -> Option<bool> {
    match val.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    // SAFETY NOTE: std::env::set_var/remove_var are unsafe in Rust 2024 because
    // they race with concurrent readers. Each test uses its own prefix and
    // cleans up the variables it sets.

    #[test]
    fn test_defaults() {
        let config = ConfigLoader::default_config();
        assert_eq!(config.preferences.tradeoff, Tradeoff::Balanced);
        assert!(!config.preferences.assume_hardware_aes);
        assert!(!config.preferences.force_extension_priority);
        assert_eq!(config.signals.attention, 0.0);
        assert_eq!(config.signals.last_used_hours, 0.0);
        assert_eq!(config.log.level, LogLevel::Info);
        assert_eq!(config.log.format, LogFormat::Compact);
    }

    #[test]
    fn test_log_level_from_str() {
        assert_eq!("trace".parse::<LogLevel>().unwrap(), LogLevel::Trace);
        assert_eq!("DEBUG".parse::<LogLevel>().unwrap(), LogLevel::Debug);
        assert_eq!("warning".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert!("loud".parse::<LogLevel>().is_err());
    }

    #[test]
    fn test_log_format_from_str() {
        assert_eq!("json".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("pretty".parse::<LogFormat>().unwrap(), LogFormat::Pretty);
        assert_eq!("compact".parse::<LogFormat>().unwrap(), LogFormat::Compact);
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_load_from_str() {
        let config = ConfigLoader::load_from_str(
            r#"
            [preferences]
            tradeoff = "ratio"
            assume_hardware_aes = true

            [signals]
            attention = 0.4

            [log]
            level = "debug"
            format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.preferences.tradeoff, Tradeoff::Ratio);
        assert!(config.preferences.assume_hardware_aes);
        assert_eq!(config.signals.attention, 0.4);
        assert_eq!(config.signals.last_used_hours, 0.0);
        assert_eq!(config.log.level, LogLevel::Debug);
        assert_eq!(config.log.format, LogFormat::Json);
    }

    #[test]
    fn test_unknown_tradeoff_normalizes() {
        let config = ConfigLoader::load_from_str("[preferences]\ntradeoff = \"turbo\"\n").unwrap();
        assert_eq!(config.preferences.tradeoff, Tradeoff::Balanced);
    }

    #[test]
    fn test_invalid_toml() {
        let result = ConfigLoader::load_from_str("[preferences\n");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[preferences]\ntradeoff = \"speed\"").unwrap();

        let config = ConfigLoader::new().with_file(file.path()).load().unwrap();
        assert_eq!(config.preferences.tradeoff, Tradeoff::Speed);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = ConfigLoader::new()
            .with_file("/nonexistent/eca/config.toml")
            .load();
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_memory_source() {
        let loader = ConfigLoader::new().with_memory("[log]\nlevel = \"warn\"\n");
        assert_eq!(loader.sources().len(), 2);
        assert_eq!(loader.load().unwrap().log.level, LogLevel::Warn);
    }

    #[test]
    fn test_env_overrides_preferences() {
        unsafe {
            std::env::set_var("ECAPREF_TRADEOFF", "Ratio");
            std::env::set_var("ECAPREF_ASSUME_HARDWARE_AES", "yes");
        }
        let config = ConfigLoader::new()
            .with_env_prefix("ECAPREF")
            .load()
            .unwrap();
        assert_eq!(config.preferences.tradeoff, Tradeoff::Ratio);
        assert!(config.preferences.assume_hardware_aes);
        unsafe {
            std::env::remove_var("ECAPREF_TRADEOFF");
            std::env::remove_var("ECAPREF_ASSUME_HARDWARE_AES");
        }
    }

    #[test]
    fn test_env_overrides_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[signals]\nattention = 0.2").unwrap();
        unsafe {
            std::env::set_var("ECASIG_ATTENTION", "0.9");
        }
        let config = ConfigLoader::new()
            .with_file(file.path())
            .with_env_prefix("ECASIG")
            .load()
            .unwrap();
        assert_eq!(config.signals.attention, 0.9);
        unsafe {
            std::env::remove_var("ECASIG_ATTENTION");
        }
    }

    #[test]
    fn test_env_invalid_value() {
        unsafe {
            std::env::set_var("ECABAD_LAST_USED_HOURS", "yesterday");
        }
        let result = ConfigLoader::new().with_env_prefix("ECABAD").load();
        assert!(matches!(result, Err(ConfigError::EnvVar(_))));
        unsafe {
            std::env::remove_var("ECABAD_LAST_USED_HOURS");
        }
    }

    #[test]
    fn test_env_invalid_log_level() {
        unsafe {
            std::env::set_var("ECALOG_LOG_LEVEL", "shout");
        }
        let result = ConfigLoader::new().with_env_prefix("ECALOG").load();
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
        unsafe {
            std::env::remove_var("ECALOG_LOG_LEVEL");
        }
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }

    #[test]
    fn test_expand_path() {
        let plain = expand_path(Path::new("/etc/eca.toml"));
        assert_eq!(plain, PathBuf::from("/etc/eca.toml"));

        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_path(Path::new("~/eca.toml")), home.join("eca.toml"));
        }
    }

    #[test]
    fn test_default_config_path() {
        if let Some(path) = default_config_path() {
            assert!(path.ends_with("eca/config.toml"));
        }
    }

    #[test]
    fn test_roundtrip_toml() {
        let mut config = EcaConfig::default();
        config.preferences.tradeoff = Tradeoff::Speed;
        let text = toml::to_string(&config).unwrap();
        assert!(text.contains("tradeoff = \"speed\""));
    }
}
