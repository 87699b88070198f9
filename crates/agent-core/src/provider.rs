//! LLM Provider Strategy Pattern
//!
//! Defines a common interface for all LLM providers (OpenAI, Anthropic, Gemini, etc.)
//! allowing the agents to work with any backend without code changes.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use agent_core::provider::{GenerationOptions, LlmProvider};
//!
//! // Create a provider
//! let provider = OpenAiProvider::from_env()?;
//!
//! // Use through the trait
//! let text = provider.generate("What is BTC?", &GenerationOptions::reasoning("gpt-4o")).await?;
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::message::Message;

/// Sampling temperature used by the ReAct loop
pub const REASONING_TEMPERATURE: f32 = 0.7;
/// Output token cap used by the ReAct loop
pub const REASONING_MAX_TOKENS: u32 = 2000;
/// Sampling temperature used for investment decisions
pub const DECISION_TEMPERATURE: f32 = 0.3;
/// Output token cap used for investment decisions
pub const DECISION_MAX_TOKENS: u32 = 1000;

/// Configuration for LLM generation
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// Model identifier (e.g., "gpt-4-turbo-preview", "gemini-2.5-flash")
    pub model: String,

    /// Temperature for sampling (0.0 = deterministic, 1.0 = creative)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens to generate
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

const fn default_temperature() -> f32 { REASONING_TEMPERATURE }
const fn default_max_tokens() -> u32 { REASONING_MAX_TOKENS }

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            model: "gpt-4-turbo-preview".into(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }
}

impl GenerationOptions {
    /// Options for the reasoning/acting loop
    pub fn reasoning(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            temperature: REASONING_TEMPERATURE,
            max_tokens: REASONING_MAX_TOKENS,
        }
    }

    /// Options for the workflow's decision stage
    pub fn decision(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            temperature: DECISION_TEMPERATURE,
            max_tokens: DECISION_MAX_TOKENS,
        }
    }
}

/// Response from an LLM completion
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Completion {
    /// The generated text
    pub content: String,

    /// Model that generated this response
    pub model: String,

    /// Token usage statistics (if available)
    pub usage: Option<TokenUsage>,

    /// Finish reason
    pub finish_reason: Option<FinishReason>,
}

/// Token usage statistics
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Reason for completion finishing
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    Stop,
    Length,
    ContentFilter,
    Other,
}

/// Strategy trait for LLM providers
///
/// Implement this trait to add support for new LLM backends.
/// The agents work exclusively through this interface.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Provider name, used in logs
    fn name(&self) -> &str;

    /// Generate a completion from messages
    async fn complete(
        &self,
        messages: &[Message],
        options: &GenerationOptions,
    ) -> Result<Completion>;

    /// Single-turn text generation: one user prompt in, plain text out
    async fn generate(&self, prompt: &str, options: &GenerationOptions) -> Result<String> {
        let completion = self.complete(&[Message::user(prompt)], options).await?;
        tracing::debug!(
            provider = self.name(),
            model = %completion.model,
            chars = completion.content.len(),
            "Completion received"
        );
        Ok(completion.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoProvider;

    #[async_trait]
    impl LlmProvider for EchoProvider {
        fn name(&self) -> &str {
            "echo"
        }

        async fn complete(
            &self,
            messages: &[Message],
            options: &GenerationOptions,
        ) -> Result<Completion> {
            Ok(Completion {
                content: messages.iter().map(|m| m.content.as_str()).collect(),
                model: options.model.clone(),
                usage: None,
                finish_reason: Some(FinishReason::Stop),
            })
        }
    }

    #[test]
    fn test_generation_options_presets() {
        let opts = GenerationOptions::default();
        assert!((opts.temperature - 0.7).abs() < f32::EPSILON);
        assert_eq!(opts.max_tokens, 2000);

        let decision = GenerationOptions::decision("gemini-2.5-flash");
        assert!((decision.temperature - 0.3).abs() < f32::EPSILON);
        assert_eq!(decision.max_tokens, 1000);
        assert_eq!(decision.model, "gemini-2.5-flash");
    }

    #[tokio::test]
    async fn test_generate_sends_single_user_message() {
        let text = EchoProvider
            .generate("ping", &GenerationOptions::default())
            .await
            .unwrap();
        assert_eq!(text, "ping");
    }
}
