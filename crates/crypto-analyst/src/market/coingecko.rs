//! CoinGecko Client
//!
//! Live market data from the `/coins/{id}` endpoint.

use async_trait::async_trait;
use serde::Deserialize;

use super::MarketDataSource;
use crate::error::{AnalystError, Result};
use crate::model::PriceData;
use crate::{env_opt, http_client};

const COINGECKO_API_BASE: &str = "https://api.coingecko.com/api/v3";

/// Map a ticker to its CoinGecko id; unknown tickers are lower-cased
pub fn coin_id(symbol: &str) -> String {
    let id = match symbol.to_uppercase().as_str() {
        "BTC" => "bitcoin",
        "ETH" => "ethereum",
        "BNB" => "binancecoin",
        "SOL" => "solana",
        "ADA" => "cardano",
        "XRP" => "ripple",
        "DOT" => "polkadot",
        "DOGE" => "dogecoin",
        "AVAX" => "avalanche-2",
        "MATIC" => "matic-network",
        "LINK" => "chainlink",
        "UNI" => "uniswap",
        "ATOM" => "cosmos",
        "LTC" => "litecoin",
        "BCH" => "bitcoin-cash",
        _ => return symbol.to_lowercase(),
    };
    id.to_string()
}

#[derive(Clone, Debug)]
pub struct CoinGeckoConfig {
    pub base_url: String,
    /// Pro API key, sent as `x-cg-pro-api-key`
    pub api_key: Option<String>,
}

impl Default for CoinGeckoConfig {
    fn default() -> Self {
        Self {
            base_url: COINGECKO_API_BASE.into(),
            api_key: None,
        }
    }
}

impl CoinGeckoConfig {
    /// Read `COINGECKO_API_KEY` and `COINGECKO_BASE_URL`
    pub fn from_env() -> Self {
        Self {
            base_url: env_opt("COINGECKO_BASE_URL")
                .unwrap_or_else(|| COINGECKO_API_BASE.into())
                .trim_end_matches('/')
                .to_string(),
            api_key: env_opt("COINGECKO_API_KEY"),
        }
    }
}

pub struct CoinGeckoClient {
    client: reqwest::Client,
    config: CoinGeckoConfig,
}

impl CoinGeckoClient {
    pub fn new(config: CoinGeckoConfig) -> Result<Self> {
        Ok(Self {
            client: http_client()?,
            config,
        })
    }
}

#[async_trait]
impl MarketDataSource for CoinGeckoClient {
    async fn price(&self, symbol: &str) -> Result<PriceData> {
        let url = format!("{}/coins/{}", self.config.base_url, coin_id(symbol));

        let mut request = self.client.get(&url).query(&[
            ("localization", "false"),
            ("tickers", "false"),
            ("market_data", "true"),
            ("community_data", "false"),
            ("developer_data", "false"),
        ]);
        if let Some(key) = &self.config.api_key {
            request = request.header("x-cg-pro-api-key", key);
        }

        let response = request.send().await?;
        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(AnalystError::UnsupportedAsset(symbol.to_uppercase()));
        }
        if !status.is_success() {
            return Err(AnalystError::Upstream {
                service: "coingecko",
                status: status.as_u16(),
            });
        }

        let coin: CoinResponse = response.json().await?;
        Ok(coin.into_price_data(symbol))
    }

    fn name(&self) -> &str {
        "CoinGecko"
    }
}

#[derive(Debug, Deserialize)]
struct CoinResponse {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    market_data: Option<MarketData>,
}

#[derive(Debug, Default, Deserialize)]
struct MarketData {
    #[serde(default)]
    current_price: Option<UsdQuote>,
    #[serde(default)]
    market_cap: Option<UsdQuote>,
    #[serde(default)]
    total_volume: Option<UsdQuote>,
    #[serde(default)]
    price_change_24h: Option<f64>,
    #[serde(default)]
    price_change_percentage_24h: Option<f64>,
    #[serde(default)]
    market_cap_rank: Option<u32>,
    #[serde(default)]
    high_24h: Option<UsdQuote>,
    #[serde(default)]
    low_24h: Option<UsdQuote>,
    #[serde(default)]
    ath: Option<UsdQuote>,
    #[serde(default)]
    atl: Option<UsdQuote>,
}

#[derive(Debug, Deserialize)]
struct UsdQuote {
    #[serde(default)]
    usd: Option<f64>,
}

fn usd(quote: Option<&UsdQuote>) -> f64 {
    quote.and_then(|q| q.usd).unwrap_or_default()
}

impl CoinResponse {
    /// Missing figures default to zero
    fn into_price_data(self, symbol: &str) -> PriceData {
        let market = self.market_data.unwrap_or_default();

        PriceData {
            symbol: symbol.to_uppercase(),
            name: self.name.unwrap_or_default(),
            current_price: usd(market.current_price.as_ref()),
            market_cap: usd(market.market_cap.as_ref()),
            total_volume: usd(market.total_volume.as_ref()),
            price_change_24h: market.price_change_24h.unwrap_or_default(),
            price_change_percentage_24h: market.price_change_percentage_24h.unwrap_or_default(),
            market_cap_rank: market.market_cap_rank.unwrap_or_default(),
            high_24h: usd(market.high_24h.as_ref()),
            low_24h: usd(market.low_24h.as_ref()),
            ath: usd(market.ath.as_ref()),
            atl: usd(market.atl.as_ref()),
            note: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer, api_key: Option<&str>) -> CoinGeckoClient {
        CoinGeckoClient::new(CoinGeckoConfig {
            base_url: server.uri(),
            api_key: api_key.map(String::from),
        })
        .unwrap()
    }

    #[test]
    fn test_coin_id_mapping() {
        assert_eq!(coin_id("btc"), "bitcoin");
        assert_eq!(coin_id("AVAX"), "avalanche-2");
        assert_eq!(coin_id("PEPE"), "pepe");
    }

    #[tokio::test]
    async fn test_parses_market_data() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/coins/ethereum"))
            .and(query_param("market_data", "true"))
            .and(query_param("tickers", "false"))
            .and(header("x-cg-pro-api-key", "cg-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "Ethereum",
                "market_data": {
                    "current_price": { "usd": 3450.5, "eur": 3200.0 },
                    "market_cap": { "usd": 415000000000.0 },
                    "total_volume": { "usd": 15000000000.0 },
                    "price_change_24h": 61.2,
                    "price_change_percentage_24h": 1.8,
                    "market_cap_rank": 2,
                    "high_24h": { "usd": 3500.0 },
                    "low_24h": { "usd": 3380.0 },
                    "ath": { "usd": 4878.26 },
                    "atl": { "usd": 0.432979 }
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let data = client_for(&server, Some("cg-key")).price("eth").await.unwrap();
        assert_eq!(data.symbol, "ETH");
        assert_eq!(data.name, "Ethereum");
        assert!((data.current_price - 3450.5).abs() < f64::EPSILON);
        assert_eq!(data.market_cap_rank, 2);
        assert!(!data.is_mock());
    }

    #[tokio::test]
    async fn test_missing_fields_default_to_zero() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/coins/bitcoin"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "Bitcoin",
                "market_data": { "current_price": { "usd": 97500.0 }, "market_cap_rank": null }
            })))
            .mount(&server)
            .await;

        let data = client_for(&server, None).price("BTC").await.unwrap();
        assert!((data.current_price - 97500.0).abs() < f64::EPSILON);
        assert_eq!(data.market_cap_rank, 0);
        assert!(data.total_volume.abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_error_statuses() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/coins/notreal"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/coins/bitcoin"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let client = client_for(&server, None);
        assert!(matches!(
            client.price("NOTREAL").await,
            Err(AnalystError::UnsupportedAsset(ref s)) if s == "NOTREAL"
        ));
        assert!(matches!(
            client.price("BTC").await,
            Err(AnalystError::Upstream { status: 429, .. })
        ));
    }
}
