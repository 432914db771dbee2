//! Questboard configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::{AnalysisMode, SummaryLevel};

/// Environment variable that overrides `gateway.base-url`
pub const API_URL_ENV: &str = "QUESTBOARD_API_URL";

/// Main Questboard configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Remote authority connection
    pub gateway: GatewayConfig,

    /// Audio analysis job settings
    pub analysis: AnalysisConfig,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[serde(rename = "log-level")]
    pub log_level: Option<String>,
}

impl Config {
    /// Load configuration with fallback chain
    ///
    /// Explicit path, then `./.questboard.yml`, then the user config dir,
    /// then defaults. `QUESTBOARD_API_URL` overrides the base URL in every case.
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        let mut config = Self::load_file_chain(config_path)?;
        config.apply_env_override();
        Ok(config)
    }

    fn load_file_chain(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .questboard.yml
        let local_config = PathBuf::from(".questboard.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/questboard/questboard.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("questboard").join("questboard.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Read only the log level, before logging is initialised
    pub fn load_log_level(config_path: Option<&PathBuf>) -> Option<String> {
        Self::load_file_chain(config_path).ok().and_then(|c| c.log_level)
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    fn apply_env_override(&mut self) {
        if let Ok(url) = std::env::var(API_URL_ENV)
            && !url.trim().is_empty()
        {
            tracing::debug!(%url, "apply_env_override: using base URL from environment");
            self.gateway.base_url = url.trim().to_string();
        }
    }
}

/// Remote authority connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Base URL of the task board backend
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Timeout for task/stats requests in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,

    /// Retries for idempotent reads (list tasks, fetch stats)
    #[serde(rename = "max-retries")]
    pub max_retries: u32,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            timeout_ms: 30_000,
            max_retries: 2,
        }
    }
}

/// Audio analysis job settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Upper bound for one analysis request in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,

    /// Largest accepted audio upload in MiB
    #[serde(rename = "max-upload-mb")]
    pub max_upload_mb: u64,

    /// Default analysis mode
    pub mode: AnalysisMode,

    /// Default summary length
    #[serde(rename = "summary-level")]
    pub summary_level: SummaryLevel,
}

impl AnalysisConfig {
    pub fn max_upload_bytes(&self) -> usize {
        usize::try_from(self.max_upload_mb.saturating_mul(1024 * 1024)).unwrap_or(usize::MAX)
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 600_000,
            max_upload_mb: 100,
            mode: AnalysisMode::Summary,
            summary_level: SummaryLevel::Standard,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.gateway.base_url, "http://127.0.0.1:8000");
        assert_eq!(config.gateway.max_retries, 2);
        assert_eq!(config.analysis.timeout_ms, 600_000);
        assert_eq!(config.analysis.max_upload_bytes(), 100 * 1024 * 1024);
        assert!(config.log_level.is_none());
    }

    #[test]
    fn test_deserialize_config() {
        let yaml = r#"
gateway:
  base-url: https://board.example.com
  timeout-ms: 5000
  max-retries: 0

analysis:
  timeout-ms: 120000
  max-upload-mb: 25
  mode: proofread
  summary-level: short

log-level: DEBUG
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.gateway.base_url, "https://board.example.com");
        assert_eq!(config.gateway.timeout_ms, 5000);
        assert_eq!(config.gateway.max_retries, 0);
        assert_eq!(config.analysis.max_upload_mb, 25);
        assert_eq!(config.analysis.mode, AnalysisMode::Proofread);
        assert_eq!(config.analysis.summary_level, SummaryLevel::Short);
        assert_eq!(config.log_level.as_deref(), Some("DEBUG"));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let yaml = r#"
analysis:
  max-upload-mb: 10
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();

        // Specified value
        assert_eq!(config.analysis.max_upload_mb, 10);

        // Defaults for unspecified
        assert_eq!(config.analysis.timeout_ms, 600_000);
        assert_eq!(config.gateway.base_url, "http://127.0.0.1:8000");
    }

    #[test]
    #[serial]
    fn test_load_explicit_path() {
        unsafe { std::env::remove_var(API_URL_ENV) };
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("questboard.yml");
        fs::write(&path, "gateway:\n  base-url: http://lab.local:9000\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.gateway.base_url, "http://lab.local:9000");
    }

    #[test]
    #[serial]
    fn test_load_missing_explicit_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.yml");
        assert!(Config::load(Some(&path)).is_err());
    }

    #[test]
    #[serial]
    fn test_env_overrides_base_url() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("questboard.yml");
        fs::write(&path, "gateway:\n  base-url: http://lab.local:9000\n").unwrap();

        unsafe { std::env::set_var(API_URL_ENV, "http://override:8000") };
        let config = Config::load(Some(&path));
        unsafe { std::env::remove_var(API_URL_ENV) };

        assert_eq!(config.unwrap().gateway.base_url, "http://override:8000");
    }
}
