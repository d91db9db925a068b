//! Configuration management for klereo-bridge

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::client::Credentials;
use crate::error::{ConfigError, Result};

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Klereo Connect account
    #[serde(default)]
    pub klereo: KlereoSection,

    /// Home Assistant REST API target
    #[serde(skip_serializing_if = "Option::is_none")]
    pub home_assistant: Option<HomeAssistantSection>,

    /// Polling and request behaviour
    #[serde(default)]
    pub polling: PollingSection,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KlereoSection {
    #[serde(default)]
    pub username: String,

    #[serde(default)]
    pub password: String,

    /// Custom API root for development/testing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_root: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HomeAssistantSection {
    pub url: String,
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollingSection {
    /// Seconds between sensor updates in `run`
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: u32,

    /// Skip Klereo calls during the published maintenance windows
    #[serde(default = "default_maintenance_gate")]
    pub maintenance_gate: bool,
}

fn default_interval_secs() -> u64 {
    300
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_requests_per_second() -> u32 {
    crate::client::rate_limit::DEFAULT_REQUESTS_PER_SECOND
}

fn default_maintenance_gate() -> bool {
    true
}

impl Default for PollingSection {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            requests_per_second: default_requests_per_second(),
            maintenance_gate: default_maintenance_gate(),
        }
    }
}

/// Values taken from CLI flags or the environment, applied over the file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub username: Option<String>,
    pub password: Option<String>,
    pub api_root: Option<String>,
    pub ha_url: Option<String>,
    pub ha_token: Option<String>,
}

impl Config {
    /// Get the default config file path
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or(ConfigError::Invalid(
            "Could not determine home directory".to_string(),
        ))?;

        Ok(home.join(".klereo-bridge").join("config.yaml"))
    }

    /// Resolve an optional custom path against the default
    pub fn resolve_path(path: Option<&str>) -> Result<PathBuf> {
        match path {
            Some(p) => Ok(PathBuf::from(p)),
            None => Self::default_path(),
        }
    }

    /// Load configuration from a custom path or the default one
    pub fn load_at(path: Option<&str>) -> Result<Self> {
        Self::load_from(&Self::resolve_path(path)?)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound.into());
        }

        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents).map_err(ConfigError::from)?;

        Ok(config)
    }

    /// Load the file if present, otherwise start from defaults.
    ///
    /// Lets a fully environment-driven setup run without a config file.
    pub fn load_or_default(path: Option<&str>) -> Result<Self> {
        match Self::load_at(path) {
            Err(crate::error::Error::Config(ConfigError::NotFound)) => Ok(Self::default()),
            other => other,
        }
    }

    /// Save configuration to a custom path or the default one
    pub fn save_at(&self, path: Option<&str>) -> Result<()> {
        self.save_to(&Self::resolve_path(path)?)
    }

    /// Save configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents =
            serde_yaml::to_string(self).map_err(|e| ConfigError::SaveError(e.to_string()))?;
        std::fs::write(path, contents)?;

        // The file holds the Klereo password and the HA token
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = std::fs::metadata(path)?.permissions();
            perms.set_mode(0o600);
            std::fs::set_permissions(path, perms)?;
        }

        Ok(())
    }

    /// Apply CLI/env overrides. Empty values are ignored.
    pub fn apply(&mut self, overrides: &Overrides) {
        let pick = |v: &Option<String>| v.as_ref().filter(|s| !s.is_empty()).cloned();

        if let Some(username) = pick(&overrides.username) {
            self.klereo.username = username;
        }
        if let Some(password) = pick(&overrides.password) {
            self.klereo.password = password;
        }
        if let Some(root) = pick(&overrides.api_root) {
            self.klereo.api_root = Some(root);
        }

        let url = pick(&overrides.ha_url);
        let token = pick(&overrides.ha_token);
        if url.is_some() || token.is_some() {
            let current = self.home_assistant.take();
            let (cur_url, cur_token) = current
                .map(|ha| (ha.url, ha.token))
                .unwrap_or_default();
            self.home_assistant = Some(HomeAssistantSection {
                url: url.unwrap_or(cur_url),
                token: token.unwrap_or(cur_token),
            });
        }
    }

    /// Klereo credentials, failing when either half is missing
    pub fn credentials(&self) -> Result<Credentials> {
        if self.klereo.username.is_empty() || self.klereo.password.is_empty() {
            return Err(ConfigError::MissingCredentials.into());
        }
        Ok(Credentials::new(
            self.klereo.username.clone(),
            self.klereo.password.clone(),
        ))
    }

    /// Home Assistant target, failing when not configured
    pub fn home_assistant(&self) -> Result<&HomeAssistantSection> {
        match &self.home_assistant {
            Some(ha) if !ha.url.is_empty() && !ha.token.is_empty() => Ok(ha),
            _ => Err(crate::error::HassError::NotConfigured.into()),
        }
    }

    /// Validate polling values
    pub fn validate(&self) -> Result<()> {
        if self.polling.interval_secs == 0 {
            return Err(ConfigError::Invalid("polling.interval_secs must be > 0".to_string()).into());
        }
        if self.polling.request_timeout_secs == 0 {
            return Err(
                ConfigError::Invalid("polling.request_timeout_secs must be > 0".to_string()).into(),
            );
        }
        if let Some(ha) = &self.home_assistant
            && !ha.url.is_empty()
            && !ha.url.starts_with("http://")
            && !ha.url.starts_with("https://")
        {
            return Err(ConfigError::Invalid(format!(
                "home_assistant.url must start with http:// or https://, got '{}'",
                ha.url
            ))
            .into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, HassError};
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.klereo.username.is_empty());
        assert!(config.home_assistant.is_none());
        assert_eq!(config.polling.interval_secs, 300);
        assert_eq!(config.polling.request_timeout_secs, 30);
        assert_eq!(config.polling.requests_per_second, 2);
        assert!(config.polling.maintenance_gate);
    }

    #[test]
    fn test_maintenance_gate_can_be_disabled() {
        let yaml = "polling:\n  maintenance_gate: false\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert!(!config.polling.maintenance_gate);
        assert_eq!(config.polling.interval_secs, 300);
    }

    #[test]
    fn test_partial_file_gets_defaults() {
        let yaml = "klereo:\n  username: pool@example.com\n  password: secret\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.klereo.username, "pool@example.com");
        assert_eq!(config.polling.interval_secs, 300);
        assert!(config.klereo.api_root.is_none());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.yaml");

        let mut config = Config::default();
        config.klereo.username = "user".to_string();
        config.klereo.password = "pw".to_string();
        config.home_assistant = Some(HomeAssistantSection {
            url: "http://ha.local:8123".to_string(),
            token: "tok".to_string(),
        });
        config.polling.interval_secs = 60;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.klereo.username, "user");
        assert_eq!(loaded.home_assistant.unwrap().url, "http://ha.local:8123");
        assert_eq!(loaded.polling.interval_secs, 60);
    }

    #[cfg(unix)]
    #[test]
    fn test_saved_file_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        Config::default().save_to(&path).unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("absent.yaml");

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::NotFound)));

        let config = Config::load_or_default(path.to_str()).unwrap();
        assert!(config.klereo.username.is_empty());
    }

    #[test]
    fn test_invalid_yaml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "klereo: [unclosed").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_overrides_win_over_file() {
        let mut config = Config::default();
        config.klereo.username = "file-user".to_string();
        config.klereo.password = "file-pw".to_string();

        config.apply(&Overrides {
            username: Some("env-user".to_string()),
            password: Some(String::new()),
            ha_url: Some("http://ha:8123".to_string()),
            ..Default::default()
        });

        assert_eq!(config.klereo.username, "env-user");
        assert_eq!(config.klereo.password, "file-pw");
        let ha = config.home_assistant.as_ref().unwrap();
        assert_eq!(ha.url, "http://ha:8123");
        assert!(ha.token.is_empty());

        // Half-configured Home Assistant is still unusable
        assert!(matches!(
            config.home_assistant(),
            Err(Error::HomeAssistant(HassError::NotConfigured))
        ));
    }

    #[test]
    fn test_credentials_required() {
        let mut config = Config::default();
        assert!(matches!(
            config.credentials(),
            Err(Error::Config(ConfigError::MissingCredentials))
        ));

        config.klereo.username = "user".to_string();
        config.klereo.password = "pw".to_string();
        assert_eq!(config.credentials().unwrap().username(), "user");
    }

    #[test]
    fn test_validate() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.polling.interval_secs = 0;
        assert!(config.validate().is_err());

        config.polling.interval_secs = 60;
        config.home_assistant = Some(HomeAssistantSection {
            url: "ha.local".to_string(),
            token: "t".to_string(),
        });
        assert!(config.validate().is_err());
    }
}
