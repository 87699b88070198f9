//! Mock Market Data
//!
//! Deterministic stand-in used when the live API is unavailable.

use async_trait::async_trait;

use super::MarketDataSource;
use crate::error::Result;
use crate::model::PriceData;

pub const MOCK_NOTE: &str = "Mock data - API error occurred";

/// Static prices; never fails
#[derive(Clone, Copy, Debug, Default)]
pub struct MockMarketData;

impl MockMarketData {
    pub const fn new() -> Self {
        Self
    }

    /// Fallback snapshot with the same shape as a live response
    pub fn snapshot(symbol: &str) -> PriceData {
        let is_btc = symbol.eq_ignore_ascii_case("BTC");
        let pick = |btc: f64, other: f64| if is_btc { btc } else { other };

        PriceData {
            symbol: symbol.to_uppercase(),
            name: symbol.to_string(),
            current_price: pick(50_000.0, 3_000.0),
            market_cap: 1_000_000_000_000.0,
            total_volume: 50_000_000_000.0,
            price_change_24h: 500.0,
            price_change_percentage_24h: 1.2,
            market_cap_rank: 1,
            high_24h: pick(51_000.0, 3_100.0),
            low_24h: pick(49_000.0, 2_900.0),
            ath: pick(69_000.0, 4_800.0),
            atl: pick(100.0, 0.5),
            note: Some(MOCK_NOTE.to_string()),
        }
    }
}

#[async_trait]
impl MarketDataSource for MockMarketData {
    async fn price(&self, symbol: &str) -> Result<PriceData> {
        Ok(Self::snapshot(symbol))
    }

    fn name(&self) -> &str {
        "MockMarketData"
    }
}
