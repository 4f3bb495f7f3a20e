//! `polychat init` — write the default configuration.
//!
//! Creates `~/.polychat/config.yaml` with the default provider set. An
//! existing config is never overwritten.

use anyhow::Result;
use colored::Colorize;

use polychat_core::config::{get_config_path, save_config, Config};
use polychat_core::utils::get_data_path;

/// Run the init command.
pub fn run() -> Result<()> {
    println!();
    println!("{}", "🗨  Polychat — Setup".cyan().bold());
    println!();

    let config_path = get_config_path();

    if config_path.exists() {
        println!(
            "  {} config already exists at {}",
            "✓".green(),
            config_path.display()
        );
    } else {
        let config = Config::default();
        save_config(&config, Some(&config_path))?;
        println!(
            "  {} created config at {}",
            "✓".green(),
            config_path.display()
        );
    }

    // History directory for the REPL.
    let history_dir = get_data_path().join("history");
    std::fs::create_dir_all(&history_dir)?;

    println!();
    println!("{}", "Next steps:".bold());
    println!("  1. Export an API key, e.g. {}", "export OPENAI_API_KEY=sk-...".dimmed());
    println!(
        "  2. Enable the providers you want: {}",
        "polychat config enable anthropic".dimmed()
    );
    println!("  3. Start chatting: {}", "polychat chat".dimmed());
    println!();

    Ok(())
}
