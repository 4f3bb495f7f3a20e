//! `polychat config` — edit the configuration from the CLI.
//!
//! - `polychat config enable <PROVIDER> [MODEL]` — enable a provider or one model
//! - `polychat config disable <PROVIDER> [MODEL]` — disable a provider or one model
//! - `polychat config set-params <PROVIDER> <MODEL> --temperature T --max-tokens N`
//! - `polychat config add-model <PROVIDER> <NAME> [--display-name NAME]`
//! - `polychat config add-provider <ID> [--api-key-env VAR] [--api-base URL]`
//! - `polychat config set-key-env <PROVIDER> <VAR>`
//! - `polychat config set-ui [--models-per-row N] [--max-chat-history N]`
//! - `polychat config show` — print the config as YAML

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;

use polychat_core::config::{load_config, save_config, ModelConfig, ProviderConfig};
use polychat_providers::registry;

// ─────────────────────────────────────────────
// Subcommand enum
// ─────────────────────────────────────────────

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Enable a provider, or a single model under it
    Enable {
        /// Provider id (e.g. "openai")
        provider: String,

        /// Model name; omit to enable the whole provider
        model: Option<String>,
    },

    /// Disable a provider, or a single model under it
    Disable {
        /// Provider id (e.g. "openai")
        provider: String,

        /// Model name; omit to disable the whole provider
        model: Option<String>,
    },

    /// Set a model's sampling parameters
    SetParams {
        /// Provider id
        provider: String,

        /// Model name
        model: String,

        /// Sampling temperature (0.0 – 2.0)
        #[arg(short, long)]
        temperature: f64,

        /// Maximum tokens to generate
        #[arg(short, long)]
        max_tokens: u32,
    },

    /// Add a model under an existing provider
    AddModel {
        /// Provider id
        provider: String,

        /// Model name as sent on the wire (e.g. "gpt-4o-mini")
        name: String,

        /// Human-readable name; defaults to the model name
        #[arg(short, long)]
        display_name: Option<String>,
    },

    /// Add a provider entry
    AddProvider {
        /// Provider id (e.g. "groq"). Known ids get their default API key
        /// variable and endpoint automatically.
        id: String,

        /// Environment variable holding the API key
        #[arg(long)]
        api_key_env: Option<String>,

        /// Base URL for an OpenAI-compatible endpoint
        #[arg(long)]
        api_base: Option<String>,
    },

    /// Change which environment variable holds a provider's API key
    SetKeyEnv {
        /// Provider id
        provider: String,

        /// Environment variable name
        env: String,
    },

    /// Change display settings
    SetUi {
        /// Models shown side by side per row
        #[arg(long)]
        models_per_row: Option<u32>,

        /// Messages kept per model transcript (0 = unlimited)
        #[arg(long)]
        max_chat_history: Option<usize>,
    },

    /// Print the configuration as YAML
    Show,
}

// ─────────────────────────────────────────────
// Dispatch
// ─────────────────────────────────────────────

/// Execute a config subcommand: load, mutate, save, confirm.
pub fn dispatch(action: ConfigCommands) -> Result<()> {
    let mut config = load_config(None).context("failed to load configuration")?;

    let confirmation = match action {
        ConfigCommands::Enable { provider, model } => match model {
            Some(model) => {
                config.toggle_model(&provider, &model, true)?;
                format!("enabled model '{model}' under '{provider}'")
            }
            None => {
                config.toggle_provider(&provider, true)?;
                format!("enabled provider '{provider}'")
            }
        },

        ConfigCommands::Disable { provider, model } => match model {
            Some(model) => {
                config.toggle_model(&provider, &model, false)?;
                format!("disabled model '{model}' under '{provider}'")
            }
            None => {
                config.toggle_provider(&provider, false)?;
                format!("disabled provider '{provider}'")
            }
        },

        ConfigCommands::SetParams {
            provider,
            model,
            temperature,
            max_tokens,
        } => {
            config.set_model_parameters(&provider, &model, temperature, max_tokens)?;
            format!(
                "set '{provider}/{model}' to temperature {temperature}, max_tokens {max_tokens}"
            )
        }

        ConfigCommands::AddModel {
            provider,
            name,
            display_name,
        } => {
            let display = display_name.unwrap_or_else(|| name.clone());
            config.add_model(
                &provider,
                ModelConfig {
                    name: name.clone(),
                    display_name: display,
                    enabled: true,
                    parameters: Default::default(),
                },
            )?;
            format!("added model '{name}' under '{provider}'")
        }

        ConfigCommands::AddProvider {
            id,
            api_key_env,
            api_base,
        } => {
            // Known providers fill in their registry defaults.
            let spec = registry::find_spec(&id);
            let key_env = api_key_env
                .or_else(|| spec.map(|s| s.default_api_key_env.to_string()))
                .with_context(|| {
                    format!("unknown provider '{id}': pass --api-key-env explicitly")
                })?;

            if spec.is_none() {
                eprintln!(
                    "warning: '{id}' is not a known provider id; its models cannot be dispatched"
                );
            }

            config.add_provider(
                &id,
                ProviderConfig {
                    enabled: false,
                    api_key_env: key_env.clone(),
                    api_base,
                    models: Vec::new(),
                },
            )?;
            format!(
                "added provider '{id}' (disabled, key from {key_env}); \
                 add models with `polychat config add-model`"
            )
        }

        ConfigCommands::SetKeyEnv { provider, env } => {
            config.set_api_key_env(&provider, &env)?;
            format!("provider '{provider}' now reads its key from {env}")
        }

        ConfigCommands::SetUi {
            models_per_row,
            max_chat_history,
        } => {
            let per_row = models_per_row.unwrap_or(config.ui.models_per_row);
            let history = max_chat_history.unwrap_or(config.ui.max_chat_history);
            config.set_ui(per_row, history);
            format!(
                "display set to {} models per row, history cap {}",
                config.ui.models_per_row, config.ui.max_chat_history
            )
        }

        ConfigCommands::Show => {
            let yaml = serde_yaml::to_string(&config)?;
            print!("{yaml}");
            return Ok(());
        }
    };

    save_config(&config, None)?;
    println!("{} {confirmation}", "✓".green());

    Ok(())
}
