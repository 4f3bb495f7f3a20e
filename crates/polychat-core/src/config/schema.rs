//! Configuration schema — providers, their models, and UI settings.
//!
//! Hierarchy: `Config` → `ProviderConfig` (one per vendor, keyed by id)
//! → `ModelConfig` → `ModelParameters`, plus a flat `UiConfig`.
//!
//! The YAML on disk uses snake_case keys throughout. Providers live in a
//! `BTreeMap` so enumeration order — and therefore dispatch and display
//! order — is deterministic.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::ConfigError;

// ─────────────────────────────────────────────
// Root Config
// ─────────────────────────────────────────────

/// Root configuration — loaded from `~/.polychat/config.yaml`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub providers: BTreeMap<String, ProviderConfig>,
    pub ui: UiConfig,
}

impl Default for Config {
    fn default() -> Self {
        let mut providers = BTreeMap::new();
        providers.insert(
            "openai".to_string(),
            ProviderConfig {
                enabled: true,
                api_key_env: "OPENAI_API_KEY".to_string(),
                api_base: None,
                models: vec![ModelConfig {
                    name: "gpt-4o".to_string(),
                    display_name: "GPT-4o".to_string(),
                    enabled: true,
                    parameters: ModelParameters::default(),
                }],
            },
        );
        providers.insert(
            "anthropic".to_string(),
            ProviderConfig {
                enabled: false,
                api_key_env: "ANTHROPIC_API_KEY".to_string(),
                api_base: None,
                models: vec![ModelConfig {
                    name: "claude-sonnet-4-20250514".to_string(),
                    display_name: "Claude Sonnet 4".to_string(),
                    enabled: true,
                    parameters: ModelParameters::default(),
                }],
            },
        );
        providers.insert(
            "google".to_string(),
            ProviderConfig {
                enabled: false,
                api_key_env: "GEMINI_API_KEY".to_string(),
                api_base: None,
                models: vec![ModelConfig {
                    name: "gemini-2.0-flash".to_string(),
                    display_name: "Gemini 2.0 Flash".to_string(),
                    enabled: true,
                    parameters: ModelParameters::default(),
                }],
            },
        );

        Config {
            providers,
            ui: UiConfig::default(),
        }
    }
}

// ─────────────────────────────────────────────
// Providers & models
// ─────────────────────────────────────────────

/// Configuration for a single LLM provider.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Whether this provider participates in dispatch at all.
    pub enabled: bool,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
    /// Custom API base URL (overrides the registry default).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
    /// Models offered by this provider.
    pub models: Vec<ModelConfig>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        ProviderConfig {
            enabled: false,
            api_key_env: String::new(),
            api_base: None,
            models: Vec::new(),
        }
    }
}

/// Configuration for a single model under a provider.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Model identifier sent on the wire (e.g. `"gpt-4o"`).
    pub name: String,
    /// Human-readable name shown in the UI.
    pub display_name: String,
    /// Whether this model participates in dispatch.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Sampling parameters.
    #[serde(default)]
    pub parameters: ModelParameters,
}

/// Sampling parameters for one model.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelParameters {
    /// Sampling temperature (0.0 – 2.0).
    pub temperature: f64,
    /// Maximum tokens to generate per response.
    pub max_tokens: u32,
}

impl Default for ModelParameters {
    fn default() -> Self {
        ModelParameters {
            temperature: 0.7,
            max_tokens: 1024,
        }
    }
}

fn default_true() -> bool {
    true
}

// ─────────────────────────────────────────────
// UI settings
// ─────────────────────────────────────────────

/// Display settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Number of response columns per row in the final grid.
    pub models_per_row: u32,
    /// Maximum messages kept per model transcript.
    pub max_chat_history: usize,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            models_per_row: 2,
            max_chat_history: 10,
        }
    }
}

// ─────────────────────────────────────────────
// Enabled-model enumeration
// ─────────────────────────────────────────────

/// A flattened (provider, model) pair ready for dispatch.
///
/// A model appears here only if both its own `enabled` flag and its
/// provider's `enabled` flag are set.
#[derive(Clone, Debug, PartialEq)]
pub struct EnabledModel {
    pub provider_id: String,
    pub provider_name: String,
    pub api_key_env: String,
    pub api_base: Option<String>,
    pub name: String,
    pub display_name: String,
    pub parameters: ModelParameters,
}

/// A provider enabled in the config but whose API-key env var is unset.
#[derive(Clone, Debug, PartialEq)]
pub struct MissingKey {
    pub provider_id: String,
    pub api_key_env: String,
}

impl Config {
    /// Enumerate all enabled models with their provider details, in
    /// deterministic provider order.
    pub fn enabled_models(&self) -> Vec<EnabledModel> {
        let mut out = Vec::new();
        for (provider_id, provider) in &self.providers {
            if !provider.enabled {
                continue;
            }
            for model in provider.models.iter().filter(|m| m.enabled) {
                out.push(EnabledModel {
                    provider_id: provider_id.clone(),
                    provider_name: capitalize(provider_id),
                    api_key_env: provider.api_key_env.clone(),
                    api_base: provider.api_base.clone(),
                    name: model.name.clone(),
                    display_name: model.display_name.clone(),
                    parameters: model.parameters.clone(),
                });
            }
        }
        out
    }

    /// Enabled providers whose API-key environment variable is unset.
    pub fn missing_api_keys(&self) -> Vec<MissingKey> {
        self.providers
            .iter()
            .filter(|(_, p)| p.enabled)
            .filter(|(_, p)| std::env::var(&p.api_key_env).is_err())
            .map(|(id, p)| MissingKey {
                provider_id: id.clone(),
                api_key_env: p.api_key_env.clone(),
            })
            .collect()
    }

    /// Enabled models whose provider's API key is actually present in the
    /// environment — the set that dispatch will query. Models excluded here
    /// are reported via [`Config::missing_api_keys`].
    pub fn dispatchable_models(&self) -> Vec<EnabledModel> {
        self.enabled_models()
            .into_iter()
            .filter(|m| std::env::var(&m.api_key_env).is_ok())
            .collect()
    }

    // ─────────────────────────────────────────
    // Settings operations
    // ─────────────────────────────────────────

    /// Toggle a provider's enabled flag.
    pub fn toggle_provider(&mut self, provider: &str, enabled: bool) -> Result<(), ConfigError> {
        self.provider_mut(provider)?.enabled = enabled;
        Ok(())
    }

    /// Toggle a model's enabled flag.
    pub fn toggle_model(
        &mut self,
        provider: &str,
        model: &str,
        enabled: bool,
    ) -> Result<(), ConfigError> {
        self.model_mut(provider, model)?.enabled = enabled;
        Ok(())
    }

    /// Update a model's sampling parameters.
    pub fn set_model_parameters(
        &mut self,
        provider: &str,
        model: &str,
        temperature: f64,
        max_tokens: u32,
    ) -> Result<(), ConfigError> {
        let m = self.model_mut(provider, model)?;
        m.parameters.temperature = temperature;
        m.parameters.max_tokens = max_tokens;
        Ok(())
    }

    /// Add a model under an existing provider. Rejects duplicates by name.
    pub fn add_model(&mut self, provider: &str, model: ModelConfig) -> Result<(), ConfigError> {
        let p = self.provider_mut(provider)?;
        if p.models.iter().any(|m| m.name == model.name) {
            return Err(ConfigError::DuplicateModel {
                provider: provider.to_string(),
                model: model.name,
            });
        }
        p.models.push(model);
        Ok(())
    }

    /// Add a new provider entry. Rejects duplicate ids.
    pub fn add_provider(
        &mut self,
        provider_id: &str,
        provider: ProviderConfig,
    ) -> Result<(), ConfigError> {
        if self.providers.contains_key(provider_id) {
            return Err(ConfigError::DuplicateProvider(provider_id.to_string()));
        }
        self.providers.insert(provider_id.to_string(), provider);
        Ok(())
    }

    /// Update the API-key environment variable name for a provider.
    pub fn set_api_key_env(&mut self, provider: &str, api_key_env: &str) -> Result<(), ConfigError> {
        self.provider_mut(provider)?.api_key_env = api_key_env.to_string();
        Ok(())
    }

    /// Update UI settings.
    pub fn set_ui(&mut self, models_per_row: u32, max_chat_history: usize) {
        self.ui.models_per_row = models_per_row.max(1);
        self.ui.max_chat_history = max_chat_history;
    }

    fn provider_mut(&mut self, provider: &str) -> Result<&mut ProviderConfig, ConfigError> {
        self.providers
            .get_mut(provider)
            .ok_or_else(|| ConfigError::UnknownProvider(provider.to_string()))
    }

    fn model_mut(&mut self, provider: &str, model: &str) -> Result<&mut ModelConfig, ConfigError> {
        self.provider_mut(provider)?
            .models
            .iter_mut()
            .find(|m| m.name == model)
            .ok_or_else(|| ConfigError::UnknownModel {
                provider: provider.to_string(),
                model: model.to_string(),
            })
    }
}

/// Fallback display name for a provider id ("openai" → "Openai").
/// The CLI substitutes the registry's proper display name when one exists.
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn two_provider_config() -> Config {
        let mut config = Config::default();
        config.toggle_provider("anthropic", true).unwrap();
        config
    }

    #[test]
    fn default_config_shape() {
        let config = Config::default();
        assert_eq!(config.providers.len(), 3);
        assert_eq!(config.ui.models_per_row, 2);
        assert_eq!(config.ui.max_chat_history, 10);
        assert!(config.providers["openai"].enabled);
        assert!(!config.providers["anthropic"].enabled);
    }

    #[test]
    fn enabled_models_requires_provider_enabled() {
        let config = Config::default();
        let models = config.enabled_models();
        // anthropic + google models are enabled but their providers are not
        assert_eq!(models.len(), 1);
        assert_eq!(models[0].provider_id, "openai");
        assert_eq!(models[0].name, "gpt-4o");
    }

    #[test]
    fn enabled_models_skips_disabled_model() {
        let mut config = Config::default();
        config.toggle_model("openai", "gpt-4o", false).unwrap();
        assert!(config.enabled_models().is_empty());
    }

    #[test]
    fn enabled_models_deterministic_order() {
        let config = two_provider_config();
        let models = config.enabled_models();
        // BTreeMap order: anthropic before openai
        assert_eq!(models[0].provider_id, "anthropic");
        assert_eq!(models[1].provider_id, "openai");
    }

    #[test]
    fn enabled_model_carries_provider_details() {
        let config = Config::default();
        let model = &config.enabled_models()[0];
        assert_eq!(model.api_key_env, "OPENAI_API_KEY");
        assert_eq!(model.provider_name, "Openai");
        assert_eq!(model.parameters.temperature, 0.7);
        assert_eq!(model.parameters.max_tokens, 1024);
    }

    #[test]
    fn missing_api_keys_flags_unset_env() {
        let mut config = Config::default();
        config
            .set_api_key_env("openai", "POLYCHAT_TEST_KEY_THAT_IS_NEVER_SET")
            .unwrap();
        let missing = config.missing_api_keys();
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].provider_id, "openai");
        assert_eq!(missing[0].api_key_env, "POLYCHAT_TEST_KEY_THAT_IS_NEVER_SET");
    }

    #[test]
    fn dispatchable_excludes_missing_key() {
        let mut config = two_provider_config();
        std::env::set_var("POLYCHAT_TEST_OPENAI_KEY", "sk-test");
        config.set_api_key_env("openai", "POLYCHAT_TEST_OPENAI_KEY").unwrap();
        config
            .set_api_key_env("anthropic", "POLYCHAT_TEST_UNSET_ANTHROPIC_KEY")
            .unwrap();

        let dispatchable = config.dispatchable_models();
        assert_eq!(dispatchable.len(), 1);
        assert_eq!(dispatchable[0].provider_id, "openai");

        std::env::remove_var("POLYCHAT_TEST_OPENAI_KEY");
    }

    #[test]
    fn toggle_provider_unknown_errors() {
        let mut config = Config::default();
        let err = config.toggle_provider("nope", true).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownProvider(_)));
    }

    #[test]
    fn toggle_model_unknown_errors() {
        let mut config = Config::default();
        let err = config.toggle_model("openai", "nope", true).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownModel { .. }));
    }

    #[test]
    fn set_model_parameters_updates() {
        let mut config = Config::default();
        config
            .set_model_parameters("openai", "gpt-4o", 0.2, 4096)
            .unwrap();
        let m = &config.providers["openai"].models[0];
        assert_eq!(m.parameters.temperature, 0.2);
        assert_eq!(m.parameters.max_tokens, 4096);
    }

    #[test]
    fn add_model_rejects_duplicate() {
        let mut config = Config::default();
        let dup = ModelConfig {
            name: "gpt-4o".to_string(),
            display_name: "Again".to_string(),
            enabled: true,
            parameters: ModelParameters::default(),
        };
        let err = config.add_model("openai", dup).unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateModel { .. }));
    }

    #[test]
    fn add_model_appends() {
        let mut config = Config::default();
        config
            .add_model(
                "openai",
                ModelConfig {
                    name: "gpt-4o-mini".to_string(),
                    display_name: "GPT-4o mini".to_string(),
                    enabled: true,
                    parameters: ModelParameters::default(),
                },
            )
            .unwrap();
        assert_eq!(config.providers["openai"].models.len(), 2);
        assert_eq!(config.enabled_models().len(), 2);
    }

    #[test]
    fn add_provider_rejects_duplicate() {
        let mut config = Config::default();
        let err = config
            .add_provider("openai", ProviderConfig::default())
            .unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateProvider(_)));
    }

    #[test]
    fn add_provider_disabled_by_default() {
        let mut config = Config::default();
        config
            .add_provider(
                "groq",
                ProviderConfig {
                    api_key_env: "GROQ_API_KEY".to_string(),
                    ..Default::default()
                },
            )
            .unwrap();
        assert!(!config.providers["groq"].enabled);
        // Nothing dispatched until the provider is switched on
        assert!(config
            .enabled_models()
            .iter()
            .all(|m| m.provider_id != "groq"));
    }

    #[test]
    fn set_ui_clamps_columns() {
        let mut config = Config::default();
        config.set_ui(0, 5);
        assert_eq!(config.ui.models_per_row, 1);
        assert_eq!(config.ui.max_chat_history, 5);
    }

    #[test]
    fn yaml_round_trip_equality() {
        let config = two_provider_config();
        let yaml = serde_yaml::to_string(&config).unwrap();
        let back: Config = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn yaml_parses_spec_shape() {
        let yaml = r#"
providers:
  openai:
    enabled: true
    api_key_env: OPENAI_API_KEY
    models:
      - name: gpt-4o
        display_name: GPT-4o
        enabled: true
        parameters:
          temperature: 0.5
          max_tokens: 2048
ui:
  models_per_row: 3
  max_chat_history: 20
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.ui.models_per_row, 3);
        let models = config.enabled_models();
        assert_eq!(models.len(), 1);
        assert_eq!(models[0].parameters.temperature, 0.5);
        assert_eq!(models[0].parameters.max_tokens, 2048);
    }

    #[test]
    fn yaml_model_defaults_apply() {
        let yaml = r#"
providers:
  openai:
    enabled: true
    api_key_env: OPENAI_API_KEY
    models:
      - name: gpt-4o
        display_name: GPT-4o
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        let m = &config.providers["openai"].models[0];
        assert!(m.enabled);
        assert_eq!(m.parameters, ModelParameters::default());
    }
}
