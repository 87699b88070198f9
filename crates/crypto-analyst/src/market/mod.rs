//! Market Data
//!
//! Abstractions and implementations for price data sources.

mod coingecko;
mod mock;

pub use coingecko::{CoinGeckoClient, CoinGeckoConfig, coin_id};
pub use mock::MockMarketData;

use async_trait::async_trait;

use crate::error::Result;
use crate::model::PriceData;

/// Price data source (Strategy pattern)
///
/// Implement this for each market data API.
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Current market snapshot for a symbol
    async fn price(&self, symbol: &str) -> Result<PriceData>;

    /// Source name
    fn name(&self) -> &str;
}
