//! CLI command definitions and handlers

use clap::{Parser, Subcommand};
pub use clap_complete::Shell;

pub mod args;
pub mod completion;
pub mod context;
pub mod init;
pub mod maintenance;
pub mod pools;
pub mod status;
pub mod sync;
pub mod test;

pub use args::OutputFormat;
pub use context::CommandContext;

/// klereo-bridge - Publish Klereo pool probes to Home Assistant
#[derive(Parser, Debug)]
#[command(name = "klereo-bridge")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (table, json)
    #[arg(
        long,
        global = true,
        env = "KLEREO_FORMAT",
        default_value = "table",
        hide_env = true
    )]
    pub format: OutputFormat,

    /// Override config file location
    #[arg(long, global = true, env = "KLEREO_CONFIG", hide_env = true)]
    pub config: Option<String>,

    /// Enable debug logging
    #[arg(long, global = true, env = "KLEREO_DEBUG", hide_env = true)]
    pub debug: bool,

    /// Klereo Connect username
    #[arg(long, global = true, env = "KLEREO_USERNAME", hide_env_values = true)]
    pub username: Option<String>,

    /// Klereo Connect password
    #[arg(long, global = true, env = "KLEREO_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Home Assistant base URL, e.g. http://homeassistant.local:8123
    #[arg(long, global = true, env = "HA_URL", hide_env_values = true)]
    pub ha_url: Option<String>,

    /// Home Assistant long-lived access token
    #[arg(long, global = true, env = "HA_TOKEN", hide_env_values = true)]
    pub ha_token: Option<String>,

    /// Klereo API root (development/testing)
    #[arg(long, global = true, env = "KLEREO_API_ROOT", hide = true)]
    pub api_root: Option<String>,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the configuration file interactively
    Init,

    /// Show configuration status
    Status,

    /// Test the Klereo and Home Assistant connections
    Test,

    /// List pools on the Klereo account
    Pools,

    /// Show the probes of one pool
    Probes {
        /// Pool id (see `klereo-bridge pools`)
        pool_id: String,
    },

    /// Show the Klereo maintenance schedule
    Maintenance,

    /// Register pools and push every probe reading once
    Sync,

    /// Keep Home Assistant updated until interrupted
    Run {
        /// Seconds between updates (overrides polling.interval_secs)
        #[arg(long, short = 'i')]
        interval: Option<u64>,
    },

    /// Display version information
    Version,

    /// Generate shell completions
    #[command(after_help = "\
Examples:
  bash:   klereo-bridge completion bash > /etc/bash_completion.d/klereo-bridge
  zsh:    klereo-bridge completion zsh > \"${fpath[1]}/_klereo-bridge\"
  fish:   klereo-bridge completion fish > ~/.config/fish/completions/klereo-bridge.fish")]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
