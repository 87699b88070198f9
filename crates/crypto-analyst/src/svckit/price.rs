//! Crypto Price Tool
//!
//! Fetches market data for one symbol, degrading to the mock snapshot on any
//! upstream failure.

use std::sync::Arc;

use async_trait::async_trait;

use agent_core::{
    AgentError, Result as CoreResult, Tool, ToolCall, ToolResult, ToolSchema,
    tool::ParameterSchema,
};

use crate::error::Result;
use crate::market::{CoinGeckoClient, CoinGeckoConfig, MarketDataSource, MockMarketData};
use crate::model::PriceData;

pub const PRICE_TOOL: &str = "get_crypto_price";

/// Tool for looking up cryptocurrency prices
pub struct CryptoPriceTool {
    source: Arc<dyn MarketDataSource>,
}

impl CryptoPriceTool {
    pub fn new(source: Arc<dyn MarketDataSource>) -> Self {
        Self { source }
    }

    /// CoinGecko-backed tool configured from the environment
    pub fn from_env() -> Result<Self> {
        let client = CoinGeckoClient::new(CoinGeckoConfig::from_env())?;
        Ok(Self::new(Arc::new(client)))
    }

    /// Live snapshot, or the mock snapshot if the source fails
    pub async fn fetch(&self, symbol: &str) -> PriceData {
        match self.source.price(symbol).await {
            Ok(data) => {
                tracing::info!(
                    symbol = %data.symbol,
                    price = data.current_price,
                    source = self.source.name(),
                    "Fetched price data"
                );
                data
            }
            Err(e) => {
                tracing::error!(symbol, error = %e, "Error fetching price, using mock data");
                MockMarketData::snapshot(symbol)
            }
        }
    }
}

#[async_trait]
impl MarketDataSource for CryptoPriceTool {
    async fn price(&self, symbol: &str) -> Result<PriceData> {
        Ok(self.fetch(symbol).await)
    }

    fn name(&self) -> &str {
        PRICE_TOOL
    }
}

#[async_trait]
impl Tool for CryptoPriceTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: PRICE_TOOL.into(),
            description: "Get current price, market cap, volume, and 24h change for a cryptocurrency. Input should be a symbol like 'BTC' or 'ETH'.".into(),
            parameters: vec![ParameterSchema::required("symbol", "Cryptocurrency symbol (e.g., 'BTC')")],
        }
    }

    async fn execute(&self, call: &ToolCall) -> CoreResult<ToolResult> {
        let symbol = call
            .str_arg("symbol")
            .ok_or_else(|| AgentError::ToolValidation("symbol must be a string".into()))?;

        let data = self.fetch(symbol).await;
        ToolResult::json(PRICE_TOOL, &data)
    }
}
