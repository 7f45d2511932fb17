use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub interview: InterviewConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the recruiting backend
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout in seconds (default: 30)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_storage_backend")]
    pub backend: StorageBackend,
    /// Directory holding the persisted session record
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: default_storage_backend(),
            data_dir: default_data_dir(),
        }
    }
}

fn default_storage_backend() -> StorageBackend {
    StorageBackend::File
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// JSON file under `data_dir`, survives restarts
    File,
    /// Process-local, gone on exit
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
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

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct InterviewConfig {
    /// Countdown refresh period in milliseconds (default: 1000)
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

impl Default for InterviewConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
        }
    }
}

impl InterviewConfig {
    /// Refresh period, kept between 1ms and one second
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.clamp(1, MAX_TICK_INTERVAL_MS))
    }
}

const MAX_TICK_INTERVAL_MS: u64 = 1000;

fn default_tick_interval_ms() -> u64 {
    1000
}

/// Outcome of [`Config::validate`]
#[derive(Debug, Default)]
pub struct ConfigReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ConfigReport {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            info!("Loading configuration from {}", path.display());
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            Self::from_toml(&content)
        } else {
            info!("No config file found, using defaults");
            Ok(Config::default())
        }
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).with_context(|| "Failed to parse configuration file")
    }

    /// Check values that parse fine but cannot work at runtime
    pub fn validate(&self) -> ConfigReport {
        let mut report = ConfigReport::default();

        let base_url = self.api.base_url.trim();
        if base_url.is_empty() {
            report.errors.push("api.base_url is empty".to_string());
        } else if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            report
                .errors
                .push(format!("api.base_url must be http(s): {}", base_url));
        } else if base_url.starts_with("http://") && !is_local(base_url) {
            report
                .warnings
                .push("api.base_url uses plain HTTP for a non-local host".to_string());
        }

        if self.api.timeout_secs == 0 {
            report
                .errors
                .push("api.timeout_secs must be greater than zero".to_string());
        }

        if self.interview.tick_interval_ms == 0 {
            report
                .errors
                .push("interview.tick_interval_ms must be greater than zero".to_string());
        } else if self.interview.tick_interval_ms > MAX_TICK_INTERVAL_MS {
            report.errors.push(format!(
                "interview.tick_interval_ms must be at most {} (countdown refreshes every second)",
                MAX_TICK_INTERVAL_MS
            ));
        }

        if self.storage.backend == StorageBackend::Memory {
            report
                .warnings
                .push("storage.backend = memory: sign-in is lost when the process exits".to_string());
        }

        report
    }
}

fn is_local(url: &str) -> bool {
    let rest = url.trim_start_matches("http://");
    rest.starts_with("localhost") || rest.starts_with("127.0.0.1") || rest.starts_with("[::1]")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api.base_url, "http://localhost:8000");
        assert_eq!(config.api.timeout(), Duration::from_secs(30));
        assert_eq!(config.storage.backend, StorageBackend::File);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.interview.tick_interval(), Duration::from_secs(1));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml(
            r#"
            [api]
            base_url = "https://hire.example.com"

            [storage]
            backend = "memory"
            "#,
        )
        .unwrap();

        assert_eq!(config.api.base_url, "https://hire.example.com");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.storage.data_dir, PathBuf::from("./data"));
    }

    #[test]
    fn test_invalid_toml() {
        assert!(Config::from_toml("[api\nbase_url = 1").is_err());
    }

    #[test]
    fn test_validate_reports_errors_and_warnings() {
        let mut config = Config::default();
        config.api.base_url = "ftp://example.com".to_string();
        config.api.timeout_secs = 0;
        let report = config.validate();
        assert_eq!(report.errors.len(), 2);

        let mut config = Config::default();
        config.api.base_url = "http://hire.example.com".to_string();
        config.storage.backend = StorageBackend::Memory;
        let report = config.validate();
        assert!(report.is_ok());
        assert_eq!(report.warnings.len(), 2);
    }

    #[test]
    fn test_tick_interval_out_of_range() {
        let config = Config::from_toml("[interview]\ntick_interval_ms = 0").unwrap();
        assert_eq!(config.interview.tick_interval(), Duration::from_millis(1));
        assert_eq!(config.validate().errors.len(), 1);

        let config = Config::from_toml("[interview]\ntick_interval_ms = 5000").unwrap();
        assert_eq!(config.interview.tick_interval(), Duration::from_secs(1));
        assert!(!config.validate().is_ok());

        let config = Config::from_toml("[interview]\ntick_interval_ms = 250").unwrap();
        assert_eq!(config.interview.tick_interval(), Duration::from_millis(250));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.api.base_url, "http://localhost:8000");
    }
}
