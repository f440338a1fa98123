//! Configuration file management
//!
//! CLIConfiguration with TOML parsing for ~/.fms/config.toml
//!
//! # Configuration Format
//!
//! ```toml
//! [server]
//! url = "https://script.google.com/macros/s/<deployment>/exec"
//! timeout = 30                 # Deadline for each request, seconds
//! connection_timeout = 10      # TCP/TLS connect timeout, seconds
//!
//! [ui]
//! format = "table"             # table, json, csv
//! color = true
//! history_size = 1000
//! loading_threshold_ms = 250   # Delay before a spinner is shown
//!
//! [session]
//! store_path = "~/.config/fms/session.toml"
//! dismiss_delay_ms = 2000      # How long a submitted form stays open
//! ```

use fms_link::FmsLinkTimeouts;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{CLIError, Result};

/// CLI configuration loaded from TOML file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CLIConfiguration {
    /// Endpoint settings
    pub server: Option<ServerConfig>,

    /// UI preferences
    pub ui: Option<UIConfig>,

    /// Session persistence settings
    pub session: Option<SessionConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Apps Script deployment URL
    pub url: Option<String>,

    /// Request deadline in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Connection timeout in seconds
    #[serde(default = "default_connection_timeout")]
    pub connection_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UIConfig {
    /// Output format: table, json, csv
    #[serde(default = "default_format")]
    pub format: String,

    /// Enable colored output
    #[serde(default = "default_color")]
    pub color: bool,

    /// Maximum history size
    #[serde(default = "default_history_size")]
    pub history_size: usize,

    /// Requests faster than this never show a spinner
    #[serde(default = "default_loading_threshold_ms")]
    pub loading_threshold_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Session file location (defaults to the platform config dir)
    pub store_path: Option<String>,

    /// Delay before a submitted overlay closes
    #[serde(default = "default_dismiss_delay_ms")]
    pub dismiss_delay_ms: u64,
}

fn default_timeout() -> u64 {
    30
}

fn default_connection_timeout() -> u64 {
    10
}

fn default_format() -> String {
    "table".to_string()
}

fn default_color() -> bool {
    true
}

fn default_history_size() -> usize {
    1000
}

fn default_loading_threshold_ms() -> u64 {
    250
}

fn default_dismiss_delay_ms() -> u64 {
    2000
}

pub fn expand_config_path(path: &Path) -> PathBuf {
    let path_str = path.to_str().unwrap_or("~/.fms/config.toml");
    if let Some(rest) = path_str.strip_prefix("~/") {
        if let Some(home_dir) = dirs::home_dir() {
            return home_dir.join(rest);
        }
    }
    path.to_path_buf()
}

pub fn default_config_path() -> PathBuf {
    expand_config_path(Path::new("~/.fms/config.toml"))
}

impl CLIConfiguration {
    /// Load configuration from file
    ///
    /// Returns default configuration if file doesn't exist.
    pub fn load(path: &Path) -> Result<Self> {
        let expanded_path = expand_config_path(path);
        let path = &expanded_path;

        if !path.exists() {
            log::debug!("[CONFIG] No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path).map_err(|e| {
            CLIError::ConfigurationError(format!("Failed to read config file: {}", e))
        })?;

        let config: CLIConfiguration = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let expanded_path = expand_config_path(path);
        let path = &expanded_path;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| CLIError::ConfigurationError(format!("Failed to serialize: {}", e)))?;

        std::fs::write(path, contents)?;
        Ok(())
    }

    pub fn resolved_server(&self) -> ServerConfig {
        self.server.clone().unwrap_or(ServerConfig {
            url: None,
            timeout: default_timeout(),
            connection_timeout: default_connection_timeout(),
        })
    }

    pub fn resolved_ui(&self) -> UIConfig {
        self.ui.clone().unwrap_or(UIConfig {
            format: default_format(),
            color: default_color(),
            history_size: default_history_size(),
            loading_threshold_ms: default_loading_threshold_ms(),
        })
    }

    pub fn resolved_session(&self) -> SessionConfig {
        self.session.clone().unwrap_or(SessionConfig {
            store_path: None,
            dismiss_delay_ms: default_dismiss_delay_ms(),
        })
    }

    /// Request timeouts from the `[server]` section
    pub fn timeouts(&self) -> FmsLinkTimeouts {
        let server = self.resolved_server();
        FmsLinkTimeouts::builder()
            .connection_timeout_secs(server.connection_timeout)
            .request_timeout_secs(server.timeout)
            .build()
    }

    /// Session file from `[session].store_path`, `~` expanded
    pub fn session_store_path(&self) -> Option<PathBuf> {
        self.resolved_session()
            .store_path
            .map(|p| expand_config_path(Path::new(&p)))
    }

    pub fn dismiss_delay(&self) -> Duration {
        Duration::from_millis(self.resolved_session().dismiss_delay_ms)
    }

    pub fn loading_threshold(&self) -> Duration {
        Duration::from_millis(self.resolved_ui().loading_threshold_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config_resolves_sections() {
        let config = CLIConfiguration::default();
        assert!(config.server.is_none());

        let server = config.resolved_server();
        assert_eq!(server.url, None);
        assert_eq!(server.timeout, 30);
        assert_eq!(server.connection_timeout, 10);

        let ui = config.resolved_ui();
        assert_eq!(ui.format, "table");
        assert!(ui.color);
        assert_eq!(config.dismiss_delay(), Duration::from_secs(2));
    }

    #[test]
    fn test_partial_sections_use_field_defaults() {
        let config: CLIConfiguration = toml::from_str(
            r#"
            [server]
            url = "https://script.example.com/exec"

            [ui]
            format = "json"
            "#,
        )
        .unwrap();

        let server = config.resolved_server();
        assert_eq!(server.url.as_deref(), Some("https://script.example.com/exec"));
        assert_eq!(server.timeout, 30);

        let ui = config.resolved_ui();
        assert_eq!(ui.format, "json");
        assert_eq!(ui.history_size, 1000);
        assert_eq!(config.loading_threshold(), Duration::from_millis(250));
    }

    #[test]
    fn test_timeouts_from_server_section() {
        let config: CLIConfiguration = toml::from_str(
            r#"
            [server]
            timeout = 5
            connection_timeout = 2
            "#,
        )
        .unwrap();

        let timeouts = config.timeouts();
        assert_eq!(timeouts.request_timeout, Duration::from_secs(5));
        assert_eq!(timeouts.connection_timeout, Duration::from_secs(2));
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = CLIConfiguration::default();
        config.session = Some(SessionConfig {
            store_path: Some("/tmp/fms-session.toml".into()),
            dismiss_delay_ms: 500,
        });
        config.save(&path).unwrap();

        let loaded = CLIConfiguration::load(&path).unwrap();
        assert_eq!(
            loaded.session_store_path(),
            Some(PathBuf::from("/tmp/fms-session.toml"))
        );
        assert_eq!(loaded.dismiss_delay(), Duration::from_millis(500));
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = CLIConfiguration::load(&dir.path().join("absent.toml")).unwrap();
        assert!(config.ui.is_none());
    }

    #[test]
    fn test_invalid_toml_is_configuration_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[server\nurl=").unwrap();

        match CLIConfiguration::load(&path) {
            Err(CLIError::ConfigurationError(msg)) => assert!(msg.starts_with("TOML parse error")),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_expand_home_prefix() {
        let expanded = expand_config_path(Path::new("~/.fms/config.toml"));
        if dirs::home_dir().is_some() {
            assert!(!expanded.to_string_lossy().starts_with('~'));
        }
        assert!(expanded.ends_with(".fms/config.toml"));
    }
}
