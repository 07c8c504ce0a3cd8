use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Top-level application configuration, persisted as TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub log: LogConfig,
}

/// Backend location and request settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:8000/api/v2/".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogConfig {
    /// Where diagnostics go. Defaults to `alfood-admin.log` in the config dir.
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl AppConfig {
    pub fn log_file(&self) -> Result<PathBuf> {
        match &self.log.file {
            Some(path) => Ok(path.clone()),
            None => Ok(config_dir()?.join("alfood-admin.log")),
        }
    }
}

/// Returns the config directory path (`~/.config/alfood-admin/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME not set")?;
    Ok(PathBuf::from(home).join(".config").join("alfood-admin"))
}

/// Returns the config file path (`~/.config/alfood-admin/config.toml`).
pub fn config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

/// Load the config from disk. Returns `Ok(None)` if the file does not exist.
pub fn load_config() -> Result<Option<AppConfig>> {
    load_config_from(&config_path()?)
}

pub fn load_config_from(path: &Path) -> Result<Option<AppConfig>> {
    if !path.exists() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config: AppConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(Some(config))
}

/// Write the config to disk, creating the directory if needed.
pub fn save_config(config: &AppConfig) -> Result<PathBuf> {
    save_config_to(config, &config_path()?)
}

pub fn save_config_to(config: &AppConfig, path: &Path) -> Result<PathBuf> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create config directory: {}", dir.display()))?;
    }
    let content = toml::to_string_pretty(config).context("Failed to serialize config")?;
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write config file: {}", path.display()))?;
    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_serialization() {
        let config = AppConfig {
            api: ApiConfig {
                base_url: "https://alfood.example.com/api/v2/".to_string(),
                timeout_secs: 3,
            },
            log: LogConfig {
                file: Some(PathBuf::from("/tmp/alfood.log")),
            },
        };
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");

        assert_eq!(parsed.api.base_url, config.api.base_url);
        assert_eq!(parsed.api.timeout_secs, 3);
        assert_eq!(parsed.log.file, config.log.file);
    }

    #[test]
    fn defaults_applied_when_fields_omitted() {
        let config: AppConfig = toml::from_str("").expect("parse empty config");
        assert_eq!(config.api.base_url, "http://localhost:8000/api/v2/");
        assert_eq!(config.api.timeout_secs, 10);
        assert!(config.log.file.is_none());

        let partial: AppConfig = toml::from_str(
            r#"
[api]
base_url = "http://10.0.0.5:8000/api/v2/"
"#,
        )
        .expect("parse partial config");
        assert_eq!(partial.api.base_url, "http://10.0.0.5:8000/api/v2/");
        assert_eq!(partial.api.timeout_secs, 10);
    }

    #[test]
    fn missing_file_loads_as_none() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        assert!(load_config_from(&path).expect("load").is_none());
    }

    #[test]
    fn save_then_load_from_nested_dir() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("config.toml");
        let mut config = AppConfig::default();
        config.api.timeout_secs = 30;

        save_config_to(&config, &path).expect("save");
        let loaded = load_config_from(&path).expect("load").expect("present");
        assert_eq!(loaded.api.timeout_secs, 30);
        assert_eq!(loaded.api.base_url, default_base_url());
    }

    #[test]
    fn explicit_log_file_wins() {
        let mut config = AppConfig::default();
        config.log.file = Some(PathBuf::from("/var/log/alfood.log"));
        assert_eq!(
            config.log_file().expect("log file"),
            PathBuf::from("/var/log/alfood.log")
        );
    }
}
