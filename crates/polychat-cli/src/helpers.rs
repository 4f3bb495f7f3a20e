//! Shared CLI helpers — labels and the version banner.

use colored::Colorize;

use polychat_core::config::{Config, EnabledModel};
use polychat_providers::registry;

/// Composite key for one (provider, model) column. Model names alone can
/// collide across providers (the same model offered directly and through a
/// gateway), so columns are keyed by both.
pub fn column_key(model: &EnabledModel) -> String {
    format!("{}:{}", model.provider_id, model.name)
}

/// Display label for one column, e.g. `"GPT-4o (OpenAI)"`.
pub fn column_label(model: &EnabledModel) -> String {
    format!(
        "{} ({})",
        model.display_name,
        registry::display_name(&model.provider_id)
    )
}

/// Enabled provider ids with no registry entry. Their models can never be
/// dispatched, so chat and status report them up front instead of leaving
/// the user to find out from a failed column.
pub fn unknown_enabled_providers(config: &Config) -> Vec<String> {
    config
        .providers
        .iter()
        .filter(|(_, p)| p.enabled)
        .filter(|(id, _)| registry::find_spec(id).is_none())
        .map(|(id, _)| id.clone())
        .collect()
}

/// Print the banner shown at REPL start.
pub fn print_banner() {
    let version = env!("CARGO_PKG_VERSION");
    println!();
    println!("{}  v{}", "Polychat".cyan().bold(), version.dimmed());
    println!(
        "{}",
        "One prompt, every model. Type a message, or \"exit\" to quit.".dimmed()
    );
    println!();
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
