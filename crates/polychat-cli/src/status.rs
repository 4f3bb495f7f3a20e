//! `polychat status` — show configuration and provider status.
//!
//! - Config path and whether the file exists
//! - Every known provider with its enabled state and API key status
//! - Enabled models with their sampling parameters
//! - Display settings

use anyhow::{Context, Result};
use colored::Colorize;

use polychat_core::config::{get_config_path, load_config};
use polychat_providers::registry::PROVIDERS;

/// Run the status command.
pub fn run() -> Result<()> {
    let config = load_config(None).context("failed to load configuration")?;
    let config_path = get_config_path();

    println!();
    println!("{}", "🗨  Polychat Status".cyan().bold());
    println!();

    // Config
    let config_exists = config_path.exists();
    println!(
        "  {:<18} {} {}",
        "Config:".bold(),
        config_path.display(),
        if config_exists {
            "✓".green().to_string()
        } else {
            "(not found, using defaults)".yellow().to_string()
        }
    );

    // Providers
    println!();
    println!("  {}", "Providers:".bold());
    for spec in PROVIDERS {
        let status = match config.providers.get(spec.id) {
            Some(p) if p.enabled => {
                if std::env::var(&p.api_key_env).is_ok() {
                    format!("{} enabled, key set", "✓".green())
                } else {
                    format!("{} enabled, {} not set", "!".yellow(), p.api_key_env)
                }
            }
            Some(_) => format!("{}", "· disabled".dimmed()),
            None => format!("{}", "· not configured".dimmed()),
        };
        println!("    {:<20} {}", spec.display_name, status);
    }

    // Entries outside the registry can never dispatch, so say so plainly.
    for (id, p) in &config.providers {
        if PROVIDERS.iter().any(|spec| spec.id == id.as_str()) {
            continue;
        }
        let status = if p.enabled {
            format!("{} enabled, but not a known provider id", "✗".red())
        } else {
            format!("{}", "· disabled (unknown provider id)".dimmed())
        };
        println!("    {:<20} {}", id, status);
    }

    // Models
    println!();
    println!("  {}", "Enabled models:".bold());
    let models = config.enabled_models();
    if models.is_empty() {
        println!("    {}", "(none)".dimmed());
    } else {
        for model in &models {
            println!(
                "    {:<28} {}",
                crate::helpers::column_label(model),
                format!(
                    "temp: {} | max_tokens: {}",
                    model.parameters.temperature, model.parameters.max_tokens
                )
                .dimmed()
            );
        }
    }

    // Display
    println!();
    println!(
        "  {:<18} {}",
        "Display:".bold(),
        format!(
            "{} models per row | history cap: {}",
            config.ui.models_per_row, config.ui.max_chat_history
        )
        .dimmed()
    );

    println!();

    Ok(())
}
