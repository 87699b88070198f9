//! Provider Selection
//!
//! The provider is chosen once, at construction time, from a fixed set.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use agent_core::{AgentError, LlmProvider, Result};

use crate::providers::{
    AnthropicConfig, AnthropicProvider, GeminiConfig, GeminiProvider, OpenAiConfig, OpenAiProvider,
};

/// Supported LLM backends
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ProviderKind {
    #[default]
    OpenAi,
    Anthropic,
    Gemini,
}

impl ProviderKind {
    pub const ALL: [Self; 3] = [Self::OpenAi, Self::Anthropic, Self::Gemini];

    /// Model used when none is configured
    pub const fn default_model(self) -> &'static str {
        match self {
            Self::OpenAi => "gpt-4-turbo-preview",
            Self::Anthropic => "claude-3-5-sonnet-latest",
            Self::Gemini => "gemini-2.5-flash",
        }
    }

    /// Environment variable holding the API key
    pub const fn api_key_var(self) -> &'static str {
        match self {
            Self::OpenAi => "OPENAI_API_KEY",
            Self::Anthropic => "ANTHROPIC_API_KEY",
            Self::Gemini => "GEMINI_API_KEY",
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Anthropic => "anthropic",
            Self::Gemini => "gemini",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = AgentError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi),
            "anthropic" | "claude" => Ok(Self::Anthropic),
            "gemini" | "google" => Ok(Self::Gemini),
            other => Err(AgentError::Config(format!(
                "Unsupported LLM provider: {other} (expected openai, anthropic or gemini)"
            ))),
        }
    }
}

/// Which provider and model to use
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LlmSettings {
    pub kind: ProviderKind,
    pub model: String,
}

impl LlmSettings {
    pub fn new(kind: ProviderKind, model: Option<String>) -> Self {
        Self {
            kind,
            model: model.unwrap_or_else(|| kind.default_model().to_string()),
        }
    }

    /// Read `DEFAULT_LLM_PROVIDER` and `DEFAULT_MODEL_NAME`
    pub fn from_env() -> Result<Self> {
        let kind = match std::env::var("DEFAULT_LLM_PROVIDER") {
            Ok(value) if !value.trim().is_empty() => value.parse()?,
            _ => ProviderKind::default(),
        };
        let model = std::env::var("DEFAULT_MODEL_NAME")
            .ok()
            .filter(|m| !m.trim().is_empty());

        Ok(Self::new(kind, model))
    }

    /// Apply command-line overrides on top of the environment
    #[must_use]
    pub fn with_overrides(self, kind: Option<ProviderKind>, model: Option<String>) -> Self {
        match (kind, model) {
            (Some(kind), model) if kind != self.kind => Self::new(kind, model),
            (_, Some(model)) => Self { model, ..self },
            _ => self,
        }
    }
}

/// Construct the configured provider, reading its credentials from the environment
pub fn build_provider(settings: &LlmSettings) -> Result<Arc<dyn LlmProvider>> {
    let provider: Arc<dyn LlmProvider> = match settings.kind {
        ProviderKind::OpenAi => Arc::new(OpenAiProvider::new(OpenAiConfig::from_env()?)?),
        ProviderKind::Anthropic => Arc::new(AnthropicProvider::new(AnthropicConfig::from_env()?)?),
        ProviderKind::Gemini => Arc::new(GeminiProvider::new(GeminiConfig::from_env()?)?),
    };

    tracing::info!(provider = %settings.kind, model = %settings.model, "LLM provider initialized");
    Ok(provider)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_provider_kind() {
        assert_eq!("openai".parse::<ProviderKind>().unwrap(), ProviderKind::OpenAi);
        assert_eq!(" Gemini ".parse::<ProviderKind>().unwrap(), ProviderKind::Gemini);
        assert_eq!("ANTHROPIC".parse::<ProviderKind>().unwrap(), ProviderKind::Anthropic);
        assert!(matches!("mistral".parse::<ProviderKind>(), Err(AgentError::Config(_))));
    }

    #[test]
    fn test_default_models() {
        let settings = LlmSettings::new(ProviderKind::Gemini, None);
        assert_eq!(settings.model, "gemini-2.5-flash");

        let settings = LlmSettings::new(ProviderKind::OpenAi, Some("gpt-4o".into()));
        assert_eq!(settings.model, "gpt-4o");
    }

    #[test]
    fn test_overrides() {
        let base = LlmSettings::new(ProviderKind::OpenAi, Some("gpt-4o".into()));

        // Switching provider drops the old provider's model
        let switched = base.clone().with_overrides(Some(ProviderKind::Gemini), None);
        assert_eq!(switched, LlmSettings::new(ProviderKind::Gemini, None));

        let remodeled = base.clone().with_overrides(None, Some("gpt-4o-mini".into()));
        assert_eq!(remodeled.kind, ProviderKind::OpenAi);
        assert_eq!(remodeled.model, "gpt-4o-mini");

        assert_eq!(base.clone().with_overrides(Some(ProviderKind::OpenAi), None), base);
    }

    #[test]
    fn test_round_trip_names() {
        for kind in ProviderKind::ALL {
            assert_eq!(kind.to_string().parse::<ProviderKind>().unwrap(), kind);
        }
    }
}
