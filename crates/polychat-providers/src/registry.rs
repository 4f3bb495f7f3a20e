//! Provider registry — static specs for the supported LLM vendors.
//!
//! This is the typed replacement for config-driven reflective class
//! loading: a provider id in the YAML resolves to one of these specs, and
//! the factory in `http_provider` does the rest. Adding a vendor means
//! adding a row here, not a module path in user config.

// ─────────────────────────────────────────────
// ProviderSpec
// ─────────────────────────────────────────────

/// Which request field carries the generation limit.
///
/// Google's endpoint spells it `max_output_tokens`; everyone else uses
/// `max_tokens`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MaxTokensField {
    MaxTokens,
    MaxOutputTokens,
}

/// Static specification describing one LLM vendor.
#[derive(Clone, Debug)]
pub struct ProviderSpec {
    /// Config key (e.g. `"openai"`).
    pub id: &'static str,
    /// Human-readable name for display and logs.
    pub display_name: &'static str,
    /// OpenAI-compatible API base URL.
    pub default_api_base: &'static str,
    /// Conventional env var for the API key, used when a new provider
    /// entry is added without an explicit `api_key_env`.
    pub default_api_key_env: &'static str,
    /// Wire spelling of the generation limit.
    pub max_tokens_field: MaxTokensField,
}

// ─────────────────────────────────────────────
// Supported vendors
// ─────────────────────────────────────────────

/// Complete list of supported provider specifications.
pub static PROVIDERS: &[ProviderSpec] = &[
    ProviderSpec {
        id: "openai",
        display_name: "OpenAI",
        default_api_base: "https://api.openai.com/v1",
        default_api_key_env: "OPENAI_API_KEY",
        max_tokens_field: MaxTokensField::MaxTokens,
    },
    ProviderSpec {
        id: "anthropic",
        display_name: "Anthropic",
        default_api_base: "https://api.anthropic.com/v1",
        default_api_key_env: "ANTHROPIC_API_KEY",
        max_tokens_field: MaxTokensField::MaxTokens,
    },
    ProviderSpec {
        id: "google",
        display_name: "Google",
        default_api_base: "https://generativelanguage.googleapis.com/v1beta/openai",
        default_api_key_env: "GEMINI_API_KEY",
        max_tokens_field: MaxTokensField::MaxOutputTokens,
    },
    ProviderSpec {
        id: "groq",
        display_name: "Groq",
        default_api_base: "https://api.groq.com/openai/v1",
        default_api_key_env: "GROQ_API_KEY",
        max_tokens_field: MaxTokensField::MaxTokens,
    },
    ProviderSpec {
        id: "deepseek",
        display_name: "DeepSeek",
        default_api_base: "https://api.deepseek.com/v1",
        default_api_key_env: "DEEPSEEK_API_KEY",
        max_tokens_field: MaxTokensField::MaxTokens,
    },
    ProviderSpec {
        id: "mistral",
        display_name: "Mistral",
        default_api_base: "https://api.mistral.ai/v1",
        default_api_key_env: "MISTRAL_API_KEY",
        max_tokens_field: MaxTokensField::MaxTokens,
    },
    ProviderSpec {
        id: "openrouter",
        display_name: "OpenRouter",
        default_api_base: "https://openrouter.ai/api/v1",
        default_api_key_env: "OPENROUTER_API_KEY",
        max_tokens_field: MaxTokensField::MaxTokens,
    },
];

/// Find a provider spec by config id.
pub fn find_spec(id: &str) -> Option<&'static ProviderSpec> {
    PROVIDERS.iter().find(|spec| spec.id == id)
}

/// Display name for a provider id, falling back to the id itself for
/// providers not in the registry.
pub fn display_name(id: &str) -> &str {
    find_spec(id).map(|s| s.display_name).unwrap_or(id)
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_spec_known() {
        let spec = find_spec("anthropic").unwrap();
        assert_eq!(spec.display_name, "Anthropic");
        assert_eq!(spec.default_api_key_env, "ANTHROPIC_API_KEY");
    }

    #[test]
    fn find_spec_unknown() {
        assert!(find_spec("some-random-vendor").is_none());
    }

    #[test]
    fn google_uses_max_output_tokens() {
        let spec = find_spec("google").unwrap();
        assert_eq!(spec.max_tokens_field, MaxTokensField::MaxOutputTokens);
    }

    #[test]
    fn others_use_max_tokens() {
        for spec in PROVIDERS.iter().filter(|s| s.id != "google") {
            assert_eq!(spec.max_tokens_field, MaxTokensField::MaxTokens, "{}", spec.id);
        }
    }

    #[test]
    fn all_ids_unique() {
        let mut ids: Vec<&str> = PROVIDERS.iter().map(|s| s.id).collect();
        let len = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), len, "duplicate provider ids");
    }

    #[test]
    fn api_bases_have_no_trailing_slash() {
        for spec in PROVIDERS {
            assert!(!spec.default_api_base.ends_with('/'), "{}", spec.id);
        }
    }

    #[test]
    fn display_name_falls_back_to_id() {
        assert_eq!(display_name("openai"), "OpenAI");
        assert_eq!(display_name("homelab"), "homelab");
    }
}
