//! Connection test command

use colored::Colorize;

use crate::cli::CommandContext;
use crate::cli::args::GlobalOptions;
use crate::error::{Error, Result};

/// Test the Klereo login and, when configured, the Home Assistant API
pub async fn run(opts: &GlobalOptions) -> Result<()> {
    let ctx = CommandContext::new(opts)?;

    if ctx.client.is_maintenance_ongoing() {
        println!(
            "{} Klereo maintenance is ongoing; the login test will be skipped",
            "⚠".yellow()
        );
    }

    let klereo_ok = ctx.client.test_connection().await;
    if klereo_ok {
        println!("{} Klereo API connection OK", "✓".green());
    } else {
        println!("{} Klereo API connection failed", "✗".red());
    }

    let ha_ok = match ctx.bridge() {
        Ok(bridge) => {
            let ok = bridge.test_ha_connection().await;
            if ok {
                println!("{} Home Assistant connection OK", "✓".green());
            } else {
                println!("{} Home Assistant connection failed", "✗".red());
            }
            ok
        }
        Err(Error::HomeAssistant(err)) => {
            println!("{} {}", "○".dimmed(), err);
            true
        }
        Err(err) => return Err(err),
    };

    if klereo_ok && ha_ok {
        Ok(())
    } else {
        Err(Error::Other("connection test failed".to_string()))
    }
}
