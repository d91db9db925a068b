//! Global CLI options shared across all commands

use crate::cli::{Cli, OutputFormat};
use crate::config::Overrides;

/// Global CLI options passed to all command handlers.
///
/// Precedence is CLI flag > environment variable > config file > default.
/// This struct captures the CLI/env layer; the config file is merged in
/// `CommandContext`.
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    pub format: OutputFormat,

    /// Custom config file path (defaults to ~/.klereo-bridge/config.yaml)
    pub config: Option<String>,

    /// Klereo API root override for development/testing
    pub api_root: Option<String>,

    pub username: Option<String>,
    pub password: Option<String>,
    pub ha_url: Option<String>,
    pub ha_token: Option<String>,
}

impl GlobalOptions {
    /// Called once in main.rs after parsing.
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            format: cli.format,
            config: cli.config.clone(),
            api_root: cli.api_root.clone(),
            username: cli.username.clone(),
            password: cli.password.clone(),
            ha_url: cli.ha_url.clone(),
            ha_token: cli.ha_token.clone(),
        }
    }

    pub fn config_ref(&self) -> Option<&str> {
        self.config.as_deref()
    }

    /// The layer applied over the config file
    pub fn overrides(&self) -> Overrides {
        Overrides {
            username: self.username.clone(),
            password: self.password.clone(),
            api_root: self.api_root.clone(),
            ha_url: self.ha_url.clone(),
            ha_token: self.ha_token.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_carry_cli_values() {
        let opts = GlobalOptions {
            username: Some("user".to_string()),
            ha_url: Some("http://ha:8123".to_string()),
            ..Default::default()
        };

        let overrides = opts.overrides();
        assert_eq!(overrides.username.as_deref(), Some("user"));
        assert_eq!(overrides.ha_url.as_deref(), Some("http://ha:8123"));
        assert!(overrides.password.is_none());
    }

    #[test]
    fn test_config_ref() {
        let opts = GlobalOptions {
            config: Some("/custom/path".to_string()),
            ..Default::default()
        };
        assert_eq!(opts.config_ref(), Some("/custom/path"));
        assert_eq!(GlobalOptions::default().config_ref(), None);
    }
}
