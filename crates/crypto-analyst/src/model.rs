//! Domain Models
//!
//! Payloads produced by the data and notification tools. Live and mock
//! responses share these shapes, so consumers never branch on where the
//! data came from.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Market snapshot for one asset; all figures in USD
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PriceData {
    /// Upper-cased ticker (e.g., "BTC")
    pub symbol: String,
    pub name: String,
    pub current_price: f64,
    pub market_cap: f64,
    pub total_volume: f64,
    pub price_change_24h: f64,
    pub price_change_percentage_24h: f64,
    pub market_cap_rank: u32,
    pub high_24h: f64,
    pub low_24h: f64,
    /// All-time high
    pub ath: f64,
    /// All-time low
    pub atl: f64,

    /// Set on fallback data
    #[serde(rename = "_note", default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl PriceData {
    pub const fn is_mock(&self) -> bool {
        self.note.is_some()
    }

    /// Metric/value pairs in display order
    pub fn rows(&self) -> Vec<(&'static str, String)> {
        let mut rows = vec![
            ("symbol", self.symbol.clone()),
            ("name", self.name.clone()),
            ("current_price", self.current_price.to_string()),
            ("market_cap", self.market_cap.to_string()),
            ("total_volume", self.total_volume.to_string()),
            ("price_change_24h", self.price_change_24h.to_string()),
            (
                "price_change_percentage_24h",
                self.price_change_percentage_24h.to_string(),
            ),
            ("market_cap_rank", self.market_cap_rank.to_string()),
            ("high_24h", self.high_24h.to_string()),
            ("low_24h", self.low_24h.to_string()),
            ("ath", self.ath.to_string()),
            ("atl", self.atl.to_string()),
        ];
        if let Some(note) = &self.note {
            rows.push(("_note", note.clone()));
        }
        rows
    }
}

/// A single news item
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub source: String,
    pub url: String,
    pub published_at: String,
    pub sentiment: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsReport {
    pub symbol: String,
    pub article_count: usize,
    pub articles: Vec<Article>,
}

impl NewsReport {
    pub fn new(symbol: &str, articles: Vec<Article>) -> Self {
        Self {
            symbol: symbol.to_uppercase(),
            article_count: articles.len(),
            articles,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
    pub content: String,
    pub score: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchReport {
    pub query: String,
    pub answer: String,
    pub results: Vec<SearchHit>,
}

/// MACD line, signal line and their difference
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Macd {
    pub macd_line: f64,
    pub signal_line: f64,
    pub histogram: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MovingAverages {
    pub ma_7: f64,
    pub ma_25: f64,
    pub ma_99: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BollingerBands {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorSignals {
    pub trend: String,
    pub strength: String,
    pub recommendation: String,
}

/// Technical indicator snapshot for one symbol and timeframe
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IndicatorReport {
    pub symbol: String,
    pub timeframe: String,
    pub rsi: f64,
    pub macd: Macd,
    pub moving_averages: MovingAverages,
    pub bollinger_bands: BollingerBands,
    pub signals: IndicatorSignals,
}

/// Notification delivery channel
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    #[default]
    Console,
    Slack,
    Discord,
}

impl Channel {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Console => "console",
            Self::Slack => "slack",
            Self::Discord => "discord",
        }
    }

    /// Parse a channel name, falling back to the console for unknown names
    pub fn parse_or_console(name: &str) -> Self {
        name.parse().unwrap_or_else(|_| {
            tracing::warn!(channel = %name, "Unknown channel, defaulting to console");
            Self::Console
        })
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Channel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "console" => Ok(Self::Console),
            "slack" => Ok(Self::Slack),
            "discord" => Ok(Self::Discord),
            other => Err(format!("unknown channel: {other}")),
        }
    }
}

/// Outcome of a notification attempt; failures are reported, never raised
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationReceipt {
    pub success: bool,
    pub channel: Channel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl NotificationReceipt {
    pub fn delivered(channel: Channel, message: impl Into<String>) -> Self {
        Self {
            success: true,
            channel,
            message: Some(message.into()),
            error: None,
        }
    }

    pub fn failed(channel: Channel, error: impl Into<String>) -> Self {
        Self {
            success: false,
            channel,
            message: None,
            error: Some(error.into()),
        }
    }
}

/// Outcome of an email attempt
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailReceipt {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl EmailReceipt {
    pub fn sent(to: impl Into<String>, subject: impl Into<String>) -> Self {
        Self {
            success: true,
            to: Some(to.into()),
            subject: Some(subject.into()),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            to: None,
            subject: None,
            error: Some(error.into()),
        }
    }
}
