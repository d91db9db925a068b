//! Status command implementation

use chrono::Local;
use colored::Colorize;

use crate::cli::CommandContext;
use crate::cli::args::GlobalOptions;
use crate::client::MaintenanceSchedule;
use crate::config::Config;
use crate::error::{ConfigError, Error, Result};
use crate::models::MaintenanceDisplay;

/// Run the status command to display configuration status
///
/// Reads the config only; no request leaves the machine.
pub fn run(opts: &GlobalOptions) -> Result<()> {
    println!("{}\n", "klereo-bridge Configuration Status".bold());

    let config_path = Config::resolve_path(opts.config_ref())?;
    let config = match CommandContext::load_config(opts) {
        Ok(config) => config,
        Err(Error::Config(ConfigError::ParseError(msg))) => {
            println!("{} Config file is invalid: {}", "✗".red(), msg);
            return Ok(());
        }
        Err(err) => return Err(err),
    };

    if config_path.exists() {
        println!("Config file: {}", config_path.display().to_string().cyan());
    } else {
        println!(
            "{} Config file not found: {}",
            "○".dimmed(),
            config_path.display()
        );
    }
    println!();

    if config.credentials().is_ok() {
        println!(
            "{} Klereo account: {}",
            "✓".green(),
            config.klereo.username
        );
    } else {
        println!("{} Klereo credentials not configured", "✗".red());
        println!("  → Run 'klereo-bridge init' to configure");
    }

    if let Some(root) = &config.klereo.api_root {
        println!("{} Custom API root: {}", "○".dimmed(), root.cyan());
    }

    match config.home_assistant() {
        Ok(ha) => println!("{} Home Assistant: {}", "✓".green(), ha.url),
        Err(_) => {
            println!("{} Home Assistant not configured", "✗".red());
            println!("  → Run 'klereo-bridge init' or set HA_URL and HA_TOKEN");
        }
    }

    println!(
        "{} Polling every {}s (timeout {}s, {} req/s)",
        "○".dimmed(),
        config.polling.interval_secs,
        config.polling.request_timeout_secs,
        config.polling.requests_per_second
    );

    let now = Local::now();
    if !config.polling.maintenance_gate {
        println!("{} Maintenance gate disabled", "○".dimmed());
    }
    match MaintenanceSchedule::klereo().active_at(&now) {
        Some(window) => println!(
            "{} Klereo maintenance ongoing ({:04}-{:04}), requests are paused",
            "⚠".yellow(),
            window.from,
            window.to
        ),
        None => println!(
            "{} No Klereo maintenance at {}",
            "✓".green(),
            MaintenanceDisplay::now_label(&now)
        ),
    }

    println!();
    Ok(())
}
