//! Command execution context
//!
//! Loads configuration, merges CLI/env overrides and builds the clients a
//! command needs.

use std::sync::Arc;
use std::time::Duration;

use log::debug;

use crate::bridge::{HomeAssistantClient, IntegrationBridge};
use crate::cli::OutputFormat;
use crate::cli::args::GlobalOptions;
use crate::client::{KlereoClient, MaintenanceSchedule};
use crate::config::Config;
use crate::error::Result;

/// Context for command execution
pub struct CommandContext {
    /// Configuration with overrides applied
    pub config: Config,
    /// Klereo client, shared with the bridge
    pub client: Arc<KlereoClient>,
    pub format: OutputFormat,
}

impl CommandContext {
    /// Load config, apply overrides and build the Klereo client.
    ///
    /// A missing config file is fine as long as the credentials come from
    /// flags or the environment.
    pub fn new(opts: &GlobalOptions) -> Result<Self> {
        let config = Self::load_config(opts)?;
        let client = Arc::new(Self::build_client(&config)?);

        Ok(Self {
            config,
            client,
            format: opts.format,
        })
    }

    /// Resolved configuration without building any client
    pub fn load_config(opts: &GlobalOptions) -> Result<Config> {
        let mut config = Config::load_or_default(opts.config_ref())?;
        config.apply(&opts.overrides());
        config.validate()?;
        Ok(config)
    }

    fn build_client(config: &Config) -> Result<KlereoClient> {
        let mut builder = KlereoClient::builder(config.credentials()?)
            .timeout(Duration::from_secs(config.polling.request_timeout_secs))
            .requests_per_second(config.polling.requests_per_second);

        if let Some(root) = &config.klereo.api_root {
            debug!("Using custom Klereo API root {}", root);
            builder = builder.base_url(root.clone());
        }
        if !config.polling.maintenance_gate {
            debug!("Klereo maintenance gate disabled");
            builder = builder.maintenance(MaintenanceSchedule::none());
        }

        builder.build()
    }

    /// Home Assistant client from the resolved config
    pub fn home_assistant(&self) -> Result<HomeAssistantClient> {
        let ha = self.config.home_assistant()?;
        HomeAssistantClient::new(
            &ha.url,
            &ha.token,
            Duration::from_secs(self.config.polling.request_timeout_secs),
        )
    }

    /// Bridge over this context's Klereo client
    pub fn bridge(&self) -> Result<IntegrationBridge<KlereoClient>> {
        Ok(IntegrationBridge::new(
            self.client.clone(),
            self.home_assistant()?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ConfigError, Error, HassError};
    use tempfile::tempdir;

    fn opts_with_config(path: &std::path::Path) -> GlobalOptions {
        GlobalOptions {
            config: Some(path.to_string_lossy().to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_missing_credentials() {
        let dir = tempdir().unwrap();
        let opts = opts_with_config(&dir.path().join("absent.yaml"));

        let err = CommandContext::new(&opts).err().unwrap();
        assert!(matches!(err, Error::Config(ConfigError::MissingCredentials)));
    }

    #[test]
    fn test_credentials_from_overrides_only() {
        let dir = tempdir().unwrap();
        let mut opts = opts_with_config(&dir.path().join("absent.yaml"));
        opts.username = Some("user".to_string());
        opts.password = Some("pw".to_string());

        let ctx = CommandContext::new(&opts).unwrap();
        assert_eq!(ctx.config.klereo.username, "user");

        // No Home Assistant configured
        assert!(matches!(
            ctx.bridge().err().unwrap(),
            Error::HomeAssistant(HassError::NotConfigured)
        ));
    }

    #[test]
    fn test_bridge_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(
            &path,
            "klereo:\n  username: u\n  password: p\nhome_assistant:\n  url: http://ha:8123\n  token: t\n",
        )
        .unwrap();

        let ctx = CommandContext::new(&opts_with_config(&path)).unwrap();
        assert!(ctx.bridge().is_ok());
        assert!(ctx.config.polling.maintenance_gate);
        assert_eq!(
            ctx.home_assistant().unwrap().base_url(),
            "http://ha:8123/api/"
        );
    }

    #[test]
    fn test_disabled_gate_ignores_schedule() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(
            &path,
            "klereo:\n  username: u\n  password: p\npolling:\n  maintenance_gate: false\n",
        )
        .unwrap();

        let ctx = CommandContext::new(&opts_with_config(&path)).unwrap();
        assert!(!ctx.config.polling.maintenance_gate);
        assert!(!ctx.client.is_maintenance_ongoing());
    }
}
