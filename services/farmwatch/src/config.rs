//! Configuration types for the farmwatch service

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

/// Connection settings for the realtime sensor database
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_database_url")]
    pub database_url: String,
    /// Database secret or ID token appended as `auth=` to every request
    #[serde(default)]
    pub auth_token: Option<String>,
    /// Environment variable to read `auth_token` from when it is not set inline
    #[serde(default)]
    pub auth_token_env: Option<String>,
    #[serde(default = "default_reconnect_delay")]
    pub reconnect_delay_seconds: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            auth_token: None,
            auth_token_env: None,
            reconnect_delay_seconds: default_reconnect_delay(),
        }
    }
}

/// Dashboard configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_dashboard_port")]
    pub port: u16,
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_camera_url")]
    pub camera_url: String,
    /// Directory served under `/assets`, e.g. holding `weather/sunny.png`
    #[serde(default)]
    pub assets_dir: Option<PathBuf>,
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_seconds: u64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            port: default_dashboard_port(),
            title: default_title(),
            camera_url: default_camera_url(),
            assets_dir: None,
            refresh_interval_seconds: default_refresh_interval(),
        }
    }
}

impl Config {
    /// Fill in secrets that are referenced by environment variable name
    pub fn resolve_secrets(&mut self) -> crate::Result<()> {
        self.resolve_secrets_with(|name| std::env::var(name).ok())
    }

    fn resolve_secrets_with<F>(&mut self, lookup: F) -> crate::Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if self.store.auth_token.is_some() {
            return Ok(());
        }
        if let Some(var) = &self.store.auth_token_env {
            let token = lookup(var).ok_or_else(|| {
                crate::FarmwatchError::Config(format!(
                    "Environment variable {} for store.auth_token is not set",
                    var
                ))
            })?;
            tracing::debug!("Resolved store auth token from {}", var);
            self.store.auth_token = Some(token);
        }
        Ok(())
    }
}

fn default_database_url() -> String {
    "http://localhost:9000".to_string()
}

fn default_reconnect_delay() -> u64 {
    5
}

fn default_true() -> bool {
    true
}

fn default_dashboard_port() -> u16 {
    11120
}

fn default_title() -> String {
    "Weather Monitoring Dashboard UDB Smart Farm".to_string()
}

fn default_camera_url() -> String {
    "http://192.168.171.79/".to_string()
}

fn default_refresh_interval() -> u64 {
    5
}

/// Load configuration from a JSON file
pub fn load_config(path: &Path) -> crate::Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        crate::FarmwatchError::Config(format!("Failed to read config file {:?}: {}", path, e))
    })?;
    let config: Config = serde_json::from_str(&content)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_config() {
        let json = r#"{
            "store": {
                "database_url": "https://smartfarm-default-rtdb.firebaseio.com",
                "auth_token": "secret",
                "reconnect_delay_seconds": 10
            },
            "dashboard": {
                "enabled": false,
                "port": 8080,
                "title": "Farm",
                "camera_url": "http://10.0.0.5/",
                "assets_dir": "/srv/farmwatch/assets",
                "refresh_interval_seconds": 2
            }
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();

        assert_eq!(
            config.store.database_url,
            "https://smartfarm-default-rtdb.firebaseio.com"
        );
        assert_eq!(config.store.auth_token.as_deref(), Some("secret"));
        assert_eq!(config.store.reconnect_delay_seconds, 10);

        assert!(!config.dashboard.enabled);
        assert_eq!(config.dashboard.port, 8080);
        assert_eq!(config.dashboard.title, "Farm");
        assert_eq!(config.dashboard.camera_url, "http://10.0.0.5/");
        assert_eq!(
            config.dashboard.assets_dir,
            Some(PathBuf::from("/srv/farmwatch/assets"))
        );
        assert_eq!(config.dashboard.refresh_interval_seconds, 2);
    }

    #[test]
    fn parse_minimal_config() {
        let config: Config = serde_json::from_str("{}").unwrap();

        assert_eq!(config.store.database_url, "http://localhost:9000");
        assert!(config.store.auth_token.is_none());
        assert_eq!(config.store.reconnect_delay_seconds, 5);
        assert!(config.dashboard.enabled);
        assert_eq!(config.dashboard.port, 11120);
        assert_eq!(config.dashboard.camera_url, "http://192.168.171.79/");
        assert!(config.dashboard.assets_dir.is_none());
    }

    #[test]
    fn resolve_secrets_reads_named_variable() {
        let mut config = Config::default();
        config.store.auth_token_env = Some("FARMWATCH_TOKEN".to_string());

        config
            .resolve_secrets_with(|name| (name == "FARMWATCH_TOKEN").then(|| "tok".to_string()))
            .unwrap();

        assert_eq!(config.store.auth_token.as_deref(), Some("tok"));
    }

    #[test]
    fn resolve_secrets_keeps_inline_token() {
        let mut config = Config::default();
        config.store.auth_token = Some("inline".to_string());
        config.store.auth_token_env = Some("FARMWATCH_TOKEN".to_string());

        config
            .resolve_secrets_with(|_| Some("from-env".to_string()))
            .unwrap();

        assert_eq!(config.store.auth_token.as_deref(), Some("inline"));
    }

    #[test]
    fn resolve_secrets_missing_variable_is_config_error() {
        let mut config = Config::default();
        config.store.auth_token_env = Some("FARMWATCH_TOKEN".to_string());

        let err = config.resolve_secrets_with(|_| None).unwrap_err();
        match err {
            crate::FarmwatchError::Config(msg) => assert!(msg.contains("FARMWATCH_TOKEN")),
            other => panic!("expected FarmwatchError::Config, got {other:?}"),
        }
    }

    #[test]
    fn resolve_secrets_without_token_settings_is_noop() {
        let mut config = Config::default();
        config.resolve_secrets_with(|_| None).unwrap();
        assert!(config.store.auth_token.is_none());
    }

    #[test]
    fn load_config_missing_file() {
        let result = load_config(Path::new("/nonexistent/config.json"));
        match result {
            Err(crate::FarmwatchError::Config(msg)) => {
                assert!(msg.contains("Failed to read config file"))
            }
            other => panic!("expected FarmwatchError::Config, got {other:?}"),
        }
    }

    #[test]
    fn load_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.json");
        std::fs::write(
            &config_path,
            r#"{"store": {"database_url": "https://farm.example"}}"#,
        )
        .unwrap();

        let config = load_config(&config_path).unwrap();
        assert_eq!(config.store.database_url, "https://farm.example");
    }

    #[test]
    fn load_config_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.json");
        std::fs::write(&config_path, "not json").unwrap();

        let result = load_config(&config_path);
        assert!(matches!(result, Err(crate::FarmwatchError::Json(_))));
    }
}
