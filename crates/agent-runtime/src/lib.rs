//! # agent-runtime
//!
//! Runtime providers for the rust-agent system.
//!
//! ## Providers
//!
//! - **OpenAI** (default): chat completions API
//! - **Anthropic**: messages API
//! - **Gemini**: `generateContent` API
//!
//! All three implement `agent_core::LlmProvider`; the agents never see
//! which one is behind the trait object.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use agent_runtime::{build_provider, LlmSettings};
//!
//! let settings = LlmSettings::from_env()?;
//! let provider = build_provider(&settings)?;
//! let agent = AgentBuilder::new()
//!     .provider(provider)
//!     .model(settings.model)
//!     .build()?;
//! ```

pub mod providers;
pub mod settings;

pub use providers::{AnthropicProvider, GeminiProvider, OpenAiProvider};
pub use settings::{build_provider, LlmSettings, ProviderKind};

// Re-export core types for convenience
pub use agent_core::{
    Agent, AgentError, GenerationOptions, LlmProvider, Message, Result, Role, Tool, ToolRegistry,
};
