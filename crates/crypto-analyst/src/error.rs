//! Error Types for Crypto Analyst

use agent_core::AgentError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AnalystError>;

#[derive(Error, Debug)]
pub enum AnalystError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("{service} returned HTTP {status}")]
    Upstream { service: &'static str, status: u16 },

    #[error("Asset not supported: {0}")]
    UnsupportedAsset(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Email error: {0}")]
    Email(String),
}

impl From<AnalystError> for AgentError {
    fn from(err: AnalystError) -> Self {
        Self::ToolExecution(err.to_string())
    }
}
