use anyhow::Context;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub bind_address: String,
    pub wharf_api_url: Option<String>,
    pub allow_cors: bool,
    /// Skips TLS certificate verification on outbound clients. Applied per
    /// client at construction time.
    pub accept_invalid_certs: bool,
    pub log_level: String,
    pub log_format: LogFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            wharf_api_url: None,
            allow_cors: false,
            accept_invalid_certs: false,
            log_level: "info".to_string(),
            log_format: LogFormat::Text,
        }
    }
}

impl AppConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = fs::read_to_string(path).context("read config")?;
        let config = serde_json::from_str(&data).context("parse config")?;
        Ok(config)
    }

    /// Loads the file and applies the process environment on top of it.
    pub fn load_with_env(path: &Path) -> anyhow::Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env(|name| std::env::var(name).ok());
        Ok(config)
    }

    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|value| !value.is_empty());
        if let Some(value) = non_empty("BIND_ADDRESS") {
            self.bind_address = value;
        }
        if let Some(value) = non_empty("WHARF_API_URL") {
            self.wharf_api_url = Some(value);
        }
        if let Some(value) = non_empty("ALLOW_CORS") {
            self.allow_cors = is_yes(&value);
        }
        if let Some(value) = non_empty("ACCEPT_INVALID_CERTS") {
            self.accept_invalid_certs = is_yes(&value);
        }
        if let Some(value) = non_empty("LOG_LEVEL") {
            self.log_level = value;
        }
        if let Some(value) = non_empty("LOG_FORMAT") {
            self.log_format = match value.to_ascii_lowercase().as_str() {
                "json" => LogFormat::Json,
                _ => LogFormat::Text,
            };
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.bind_address.trim().is_empty() {
            anyhow::bail!("bind_address must not be empty");
        }
        if let Some(url) = &self.wharf_api_url
            && !(url.starts_with("http://") || url.starts_with("https://"))
        {
            anyhow::bail!("wharf_api_url must be an absolute http(s) URL, got {url:?}");
        }
        Ok(())
    }

    pub fn require_wharf_api_url(&self) -> anyhow::Result<&str> {
        self.wharf_api_url
            .as_deref()
            .context("wharf_api_url is not configured (set WHARF_API_URL)")
    }
}

fn is_yes(value: &str) -> bool {
    matches!(
        value.to_ascii_lowercase().as_str(),
        "yes" | "true" | "1"
    )
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    let project = ProjectDirs::from("se", "iver-wharf", "azdo-bridge")
        .context("resolve project dirs")?;
    Ok(project.config_dir().join("config.json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn missing_file_yields_defaults() {
        let tmp = TempDir::new().unwrap();
        let config = AppConfig::load(&tmp.path().join("config.json")).unwrap();
        assert_eq!(config.bind_address, DEFAULT_BIND_ADDRESS);
        assert!(config.wharf_api_url.is_none());
        assert!(!config.allow_cors);
        assert!(!config.accept_invalid_certs);
    }

    #[test]
    fn load_reads_file_and_defaults_missing_fields() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.json");
        fs::write(
            &path,
            r#"{"wharf_api_url": "http://wharf-api:8080", "allow_cors": true, "log_format": "json"}"#,
        )
        .unwrap();

        let loaded = AppConfig::load(&path).unwrap();
        assert_eq!(loaded.wharf_api_url.as_deref(), Some("http://wharf-api:8080"));
        assert!(loaded.allow_cors);
        assert_eq!(loaded.log_format, LogFormat::Json);
        assert_eq!(loaded.bind_address, DEFAULT_BIND_ADDRESS);
    }

    #[test]
    fn env_overrides_file_values() {
        let mut config = AppConfig::default();
        config.apply_env(env(&[
            ("BIND_ADDRESS", "127.0.0.1:9000"),
            ("WHARF_API_URL", "https://wharf.example.com"),
            ("ALLOW_CORS", "YES"),
            ("ACCEPT_INVALID_CERTS", "no"),
            ("LOG_FORMAT", "JSON"),
        ]));
        assert_eq!(config.bind_address, "127.0.0.1:9000");
        assert_eq!(
            config.wharf_api_url.as_deref(),
            Some("https://wharf.example.com")
        );
        assert!(config.allow_cors);
        assert!(!config.accept_invalid_certs);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn empty_env_values_are_ignored() {
        let mut config = AppConfig::default();
        config.apply_env(env(&[("BIND_ADDRESS", "")]));
        assert_eq!(config.bind_address, DEFAULT_BIND_ADDRESS);
    }

    #[test]
    fn validate_rejects_relative_api_url() {
        let config = AppConfig {
            wharf_api_url: Some("wharf-api:8080".to_string()),
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
        assert!(AppConfig::default().validate().is_ok());
        assert!(AppConfig::default().require_wharf_api_url().is_err());
    }
}
