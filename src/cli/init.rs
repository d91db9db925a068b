//! Init command implementation

use std::time::Duration;

use colored::Colorize;
use dialoguer::{Confirm, Input, Password, theme::ColorfulTheme};

use crate::bridge::HomeAssistantClient;
use crate::cli::args::GlobalOptions;
use crate::client::{Credentials, KlereoClient};
use crate::config::{Config, HomeAssistantSection};
use crate::error::Result;

/// Run the init command
///
/// Prompts for the Klereo account and the Home Assistant target, checks both
/// and writes the config file. Existing polling settings are kept.
pub async fn run(opts: &GlobalOptions) -> Result<()> {
    let theme = ColorfulTheme::default();

    println!("{}", "Welcome to klereo-bridge!".bold().green());
    println!("Let's set up your Klereo Connect account.\n");

    let mut config = Config::load_or_default(opts.config_ref())?;

    let username: String = Input::with_theme(&theme)
        .with_prompt("Klereo username")
        .with_initial_text(config.klereo.username.clone())
        .interact_text()?;
    let password: String = Password::with_theme(&theme)
        .with_prompt("Klereo password")
        .interact()?;

    println!("\n{}", "Logging in to Klereo...".cyan());
    let mut builder = KlereoClient::builder(Credentials::new(username.clone(), password.clone()))
        .timeout(Duration::from_secs(config.polling.request_timeout_secs));
    if let Some(root) = opts.api_root.as_ref().or(config.klereo.api_root.as_ref()) {
        builder = builder.base_url(root.clone());
    }
    let client = builder.build()?;

    match client.get_jwt_token().await {
        Ok(_) => println!("{}", "✓ Authentication successful!".green()),
        Err(err) => {
            println!("{} {}", "✗".red(), err);
            let keep = Confirm::with_theme(&theme)
                .with_prompt("Save these credentials anyway?")
                .default(false)
                .interact()?;
            if !keep {
                return Ok(());
            }
        }
    }

    config.klereo.username = username;
    config.klereo.password = password;

    let configure_ha = Confirm::with_theme(&theme)
        .with_prompt("Configure Home Assistant now?")
        .default(true)
        .interact()?;

    if configure_ha {
        let current_url = config
            .home_assistant
            .as_ref()
            .map(|ha| ha.url.clone())
            .unwrap_or_else(|| "http://homeassistant.local:8123".to_string());

        let url: String = Input::with_theme(&theme)
            .with_prompt("Home Assistant URL")
            .with_initial_text(current_url)
            .interact_text()?;
        let token: String = Password::with_theme(&theme)
            .with_prompt("Long-lived access token")
            .interact()?;

        println!("\n{}", "Checking Home Assistant...".cyan());
        let hass = HomeAssistantClient::new(
            &url,
            &token,
            Duration::from_secs(config.polling.request_timeout_secs),
        )?;
        match hass.get("config").await {
            Ok(_) => println!("{}", "✓ Home Assistant reachable!".green()),
            Err(err) => println!("{} {}", "⚠".yellow(), err),
        }

        config.home_assistant = Some(HomeAssistantSection { url, token });
    }

    config.validate()?;
    config.save_at(opts.config_ref())?;

    let config_path = Config::resolve_path(opts.config_ref())?;
    println!(
        "\n{} Configuration saved to: {}",
        "✓".green(),
        config_path.display()
    );

    println!("\n{}", "You're all set! Try running:".bold());
    println!("  {} - List your pools", "klereo-bridge pools".cyan());
    println!("  {} - Publish readings once", "klereo-bridge sync".cyan());
    println!("  {} - Keep Home Assistant updated", "klereo-bridge run".cyan());

    Ok(())
}
