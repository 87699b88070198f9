//! Provider adapters, one per backend.

mod anthropic;
mod gemini;
mod openai;

pub use anthropic::{AnthropicConfig, AnthropicProvider};
pub use gemini::{GeminiConfig, GeminiProvider};
pub use openai::{OpenAiConfig, OpenAiProvider};

use agent_core::AgentError;
use reqwest::StatusCode;

/// Read a required API key
fn require_env(var: &str) -> agent_core::Result<String> {
    std::env::var(var)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AgentError::Config(format!("{var} environment variable not set")))
}

/// Read an optional base URL override, falling back to the public endpoint
fn base_url_from_env(var: &str, default: &str) -> String {
    std::env::var(var)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
        .trim_end_matches('/')
        .to_string()
}

fn http_client() -> agent_core::Result<reqwest::Client> {
    reqwest::Client::builder()
        .build()
        .map_err(|e| AgentError::Config(format!("HTTP client: {e}")))
}

/// Map a non-success HTTP status to an agent error
fn status_error(provider: &str, status: StatusCode, body: &str) -> AgentError {
    match status.as_u16() {
        401 | 403 => AgentError::Auth(format!("{provider}: {body}")),
        429 => AgentError::RateLimited(format!("{provider}: {body}")),
        _ => AgentError::Provider(format!("{provider} HTTP {status}: {body}")),
    }
}

/// Map a transport failure to an agent error
fn transport_error(provider: &str, err: &reqwest::Error) -> AgentError {
    if err.is_connect() || err.is_timeout() {
        AgentError::ProviderUnavailable(format!("{provider}: {err}"))
    } else {
        AgentError::Provider(format!("{provider}: {err}"))
    }
}

/// Send a prepared request and decode the JSON body, mapping failures uniformly
async fn send_json<T: serde::de::DeserializeOwned>(
    provider: &str,
    request: reqwest::RequestBuilder,
) -> agent_core::Result<T> {
    let response = request
        .send()
        .await
        .map_err(|e| transport_error(provider, &e))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(status_error(provider, status, &body));
    }

    response
        .json::<T>()
        .await
        .map_err(|e| AgentError::Parse(format!("{provider}: failed to parse response: {e}")))
}
