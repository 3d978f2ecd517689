//! Application configuration management

use log::debug;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::errors::{PanelError, Result};

/// Main application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Base URL of the pool service
    pub server_url: String,
    /// Polling cadences
    pub polling: PollingConfig,
    /// HTTP client configuration
    pub http: HttpConfig,
    /// UI configuration
    pub ui: UiConfig,
}

/// Polling-related configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    /// Full device list refresh period in seconds
    pub refresh_interval_secs: u64,
    /// Output console refresh period in seconds, while the session runs
    pub output_interval_secs: u64,
}

/// HTTP client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

/// UI-related configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Notifications disappear after this many seconds
    pub notification_ttl_secs: u64,
    /// Reset the form when the device being edited disappears from a refresh
    pub reset_orphaned_edit: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:5000".to_string(),
            polling: PollingConfig::default(),
            http: HttpConfig::default(),
            ui: UiConfig::default(),
        }
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            refresh_interval_secs: 5,
            output_interval_secs: 2,
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { timeout_secs: 10 }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            notification_ttl_secs: 5,
            reset_orphaned_edit: false,
        }
    }
}

/// Timing and behavior knobs consumed by the panel controller
#[derive(Debug, Clone, PartialEq)]
pub struct PanelSettings {
    pub refresh_interval: Duration,
    pub output_interval: Duration,
    pub notification_ttl: Duration,
    pub reset_orphaned_edit: bool,
}

impl Default for PanelSettings {
    fn default() -> Self {
        AppConfig::default().panel_settings()
    }
}

impl AppConfig {
    /// Default location: `<config_dir>/roverpool/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(crate::APP_NAME).join("config.toml"))
    }

    /// Load configuration from an explicit file, the default location, or defaults
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        match Self::default_path() {
            Some(path) if path.exists() => Self::from_file(&path),
            _ => {
                debug!("No configuration file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Read and validate a TOML configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            PanelError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        let config = Self::from_toml_str(&content)?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Replace the server URL (CLI override) and re-validate
    pub fn with_server_url(mut self, server_url: Option<String>) -> Result<Self> {
        if let Some(server_url) = server_url {
            self.server_url = server_url;
            self.validate()?;
        }
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        let parsed = url::Url::parse(&self.server_url).map_err(|e| {
            PanelError::Config(format!("invalid server_url '{}': {}", self.server_url, e))
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(PanelError::Config(format!(
                "server_url must use http or https, got '{}'",
                parsed.scheme()
            )));
        }

        let durations = [
            ("polling.refresh_interval_secs", self.polling.refresh_interval_secs),
            ("polling.output_interval_secs", self.polling.output_interval_secs),
            ("http.timeout_secs", self.http.timeout_secs),
            ("ui.notification_ttl_secs", self.ui.notification_ttl_secs),
        ];
        for (key, value) in durations {
            if value == 0 {
                return Err(PanelError::Config(format!("{} must be greater than 0", key)));
            }
        }

        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.http.timeout_secs)
    }

    pub fn panel_settings(&self) -> PanelSettings {
        PanelSettings {
            refresh_interval: Duration::from_secs(self.polling.refresh_interval_secs),
            output_interval: Duration::from_secs(self.polling.output_interval_secs),
            notification_ttl: Duration::from_secs(self.ui.notification_ttl_secs),
            reset_orphaned_edit: self.ui.reset_orphaned_edit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_match_panel_cadence() {
        let settings = PanelSettings::default();
        assert_eq!(settings.refresh_interval, Duration::from_secs(5));
        assert_eq!(settings.output_interval, Duration::from_secs(2));
        assert_eq!(settings.notification_ttl, Duration::from_secs(5));
        assert!(!settings.reset_orphaned_edit);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = AppConfig::from_toml_str(
            r#"
server_url = "http://pool.local:8000"

[ui]
reset_orphaned_edit = true
"#,
        )
        .unwrap();

        assert_eq!(config.server_url, "http://pool.local:8000");
        assert_eq!(config.polling, PollingConfig::default());
        assert!(config.ui.reset_orphaned_edit);
        assert_eq!(config.ui.notification_ttl_secs, 5);
    }

    #[test]
    fn test_zero_interval_is_rejected() {
        let err = AppConfig::from_toml_str("[polling]\noutput_interval_secs = 0\n").unwrap_err();
        assert!(err.to_string().contains("polling.output_interval_secs"));
    }

    #[test]
    fn test_non_http_scheme_is_rejected() {
        let err = AppConfig::default()
            .with_server_url(Some("ftp://pool.local".to_string()))
            .unwrap_err();
        assert!(matches!(err, PanelError::Config(_)));
    }

    #[test]
    fn test_load_explicit_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[http]\ntimeout_secs = 3").unwrap();

        let config = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.request_timeout(), Duration::from_secs(3));
    }

    #[test]
    fn test_load_missing_explicit_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = AppConfig::load(Some(&dir.path().join("absent.toml")));
        assert!(matches!(result, Err(PanelError::Config(_))));
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let result = AppConfig::from_toml_str("server_url = [");
        assert!(matches!(result, Err(PanelError::Config(_))));
    }
}
