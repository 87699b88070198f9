//! # crypto-analyst
//!
//! Crypto market tools and the fixed-stage analysis workflow.
//!
//! ## Pieces
//!
//! - **market** - CoinGecko snapshots with a deterministic mock fallback
//! - **signal** - threshold-based trend and signal derivation
//! - **svckit** - the agent tools: price, news, search, indicators, notification, email
//! - **workflow** - data → technicals → sentiment → decision → notification
//!
//! ```text
//! ┌──────────────┐   ┌─────────────┐   ┌─────────────┐   ┌──────────┐   ┌──────────────┐
//! │ collect_data │ → │ technicals  │ → │ sentiment   │ → │ decision │ → │ notification │
//! │  (CoinGecko) │   │ (threshold) │   │ (news feed) │   │  (LLM)   │   │ (console+)   │
//! └──────────────┘   └─────────────┘   └─────────────┘   └──────────┘   └──────────────┘
//! ```
//!
//! The ReAct agent in `agent-core` gets the search, price and news tools via
//! [`AnalystToolkit::react_registry`], plus the indicator tool through
//! [`AnalystToolkit::react_registry_with_indicators`].

pub mod error;
pub mod market;
pub mod model;
pub mod signal;
pub mod svckit;
pub mod workflow;

use std::sync::Arc;
use std::time::Duration;

use agent_core::{OutputSink, ToolRegistry};

pub use error::{AnalystError, Result};
pub use model::{Channel, PriceData};
pub use signal::{Signal, TechnicalIndicators, Trend, derive_indicators};
pub use workflow::{AnalysisResult, AnalysisWorkflow, WorkflowBuilder};

use svckit::{
    CryptoIndicatorTool, CryptoNewsTool, CryptoPriceTool, EmailNotifier, INDICATOR_TOOL,
    NEWS_TOOL, NotificationTool, PRICE_TOOL, SEARCH_TOOL, TavilySearchTool,
};

/// Timeout for every outbound tool request
pub(crate) const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Tools the ReAct agent starts with
pub const REACT_TOOL_NAMES: [&str; 3] = [SEARCH_TOOL, PRICE_TOOL, NEWS_TOOL];

pub(crate) fn http_client() -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder().timeout(HTTP_TIMEOUT).build()?)
}

/// Non-empty, trimmed environment value
pub(crate) fn env_opt(var: &str) -> Option<String> {
    std::env::var(var)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Every tool, configured once and shared between the agents
#[derive(Clone)]
pub struct AnalystToolkit {
    pub price: Arc<CryptoPriceTool>,
    pub news: Arc<CryptoNewsTool>,
    pub search: Arc<TavilySearchTool>,
    pub indicators: Arc<CryptoIndicatorTool>,
    pub notifier: Arc<NotificationTool>,
    pub email: Arc<EmailNotifier>,
}

impl AnalystToolkit {
    /// Configure every tool from the environment. Console notifications go to `sink`.
    pub fn from_env(sink: Arc<dyn OutputSink>) -> Result<Self> {
        Ok(Self {
            price: Arc::new(CryptoPriceTool::from_env()?),
            news: Arc::new(CryptoNewsTool::from_env()?),
            search: Arc::new(TavilySearchTool::from_env()?),
            indicators: Arc::new(CryptoIndicatorTool::new()),
            notifier: Arc::new(NotificationTool::from_env(sink)?),
            email: Arc::new(EmailNotifier::from_env()?),
        })
    }

    /// Registry holding the search, price and news tools
    pub fn react_registry(&self) -> agent_core::Result<ToolRegistry> {
        let mut registry = ToolRegistry::new();
        registry.register_shared(self.search.clone());
        registry.register_shared(self.price.clone());
        registry.register_shared(self.news.clone());
        registry.ensure_registered(&REACT_TOOL_NAMES)?;
        Ok(registry)
    }

    /// [`Self::react_registry`] plus `calculate_indicators`
    pub fn react_registry_with_indicators(&self) -> agent_core::Result<ToolRegistry> {
        let mut registry = self.react_registry()?;
        registry.register_shared(self.indicators.clone());
        registry.ensure_registered(&[INDICATOR_TOOL])?;
        Ok(registry)
    }

    /// Workflow builder with the price, news and notification tools in place
    pub fn workflow(&self) -> WorkflowBuilder {
        AnalysisWorkflow::builder()
            .market(self.price.clone())
            .news(self.news.clone())
            .notifier(self.notifier.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::MockMarketData;
    use crate::svckit::{CryptoPanicConfig, EmailConfig, NotificationConfig, TavilyConfig};
    use agent_core::NullSink;

    fn offline_toolkit() -> AnalystToolkit {
        AnalystToolkit {
            price: Arc::new(CryptoPriceTool::new(Arc::new(MockMarketData::new()))),
            news: Arc::new(CryptoNewsTool::new(CryptoPanicConfig::default()).unwrap()),
            search: Arc::new(TavilySearchTool::new(TavilyConfig::default()).unwrap()),
            indicators: Arc::new(CryptoIndicatorTool::new()),
            notifier: Arc::new(
                NotificationTool::new(NotificationConfig::default(), Arc::new(NullSink)).unwrap(),
            ),
            email: Arc::new(EmailNotifier::new(EmailConfig::default())),
        }
    }

    #[test]
    fn test_react_registry_order() {
        let registry = offline_toolkit().react_registry().unwrap();
        assert_eq!(registry.len(), 3);
        assert_eq!(
            registry.names(),
            vec!["get_crypto_news", "get_crypto_price", "search"]
        );
        assert!(!registry.contains("send_notification"));
    }

    #[test]
    fn test_indicator_registry_adds_one_tool() {
        let registry = offline_toolkit().react_registry_with_indicators().unwrap();
        assert_eq!(
            registry.names(),
            vec!["calculate_indicators", "get_crypto_news", "get_crypto_price", "search"]
        );
        assert!(registry.catalog().starts_with(
            "- calculate_indicators: Calculate technical indicators (RSI, MACD, etc.) for a cryptocurrency"
        ));
    }

    #[test]
    fn test_http_client_builds() {
        assert!(http_client().is_ok());
    }
}
