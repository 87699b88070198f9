//! Technical Signal Deriver
//!
//! Maps the latest 24h snapshot to a trend label and a trading signal.
//! Purely threshold based: no smoothing and no history.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::PriceData;

/// Percentage move treated as a strong trend
pub const STRONG_MOVE_PCT: f64 = 5.0;

/// 24h USD volume above which volume counts as high
pub const HIGH_VOLUME_USD: f64 = 1e9;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trend {
    #[serde(rename = "Strong Uptrend")]
    StrongUptrend,
    #[serde(rename = "Uptrend")]
    Uptrend,
    #[serde(rename = "Downtrend")]
    Downtrend,
    #[serde(rename = "Strong Downtrend")]
    StrongDowntrend,
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::StrongUptrend => "Strong Uptrend",
            Self::Uptrend => "Uptrend",
            Self::Downtrend => "Downtrend",
            Self::StrongDowntrend => "Strong Downtrend",
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Signal {
    Buy,
    Hold,
    Sell,
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Buy => "BUY",
            Self::Hold => "HOLD",
            Self::Sell => "SELL",
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum VolumeStatus {
    High,
    Normal,
}

impl fmt::Display for VolumeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::High => "High",
            Self::Normal => "Normal",
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechnicalIndicators {
    pub trend: Trend,
    pub signal: Signal,
    pub volume_status: VolumeStatus,
}

impl TechnicalIndicators {
    /// Indicator/value pairs in display order
    pub fn rows(&self) -> [(&'static str, String); 3] {
        [
            ("trend", self.trend.to_string()),
            ("signal", self.signal.to_string()),
            ("volume_status", self.volume_status.to_string()),
        ]
    }

    /// Derive from a snapshot; a missing snapshot reads as all zeros
    pub fn from_price(price: Option<&PriceData>) -> Self {
        price.map_or_else(
            || derive_indicators(0.0, 0.0, 0.0),
            |p| derive_indicators(p.current_price, p.price_change_percentage_24h, p.total_volume),
        )
    }
}

/// Derive trend, signal and volume status. `_current_price` does not affect
/// the result. NaN changes fall through to the strong downtrend bucket.
pub fn derive_indicators(
    _current_price: f64,
    change_pct_24h: f64,
    volume_24h: f64,
) -> TechnicalIndicators {
    let (trend, signal) = if change_pct_24h > STRONG_MOVE_PCT {
        (Trend::StrongUptrend, Signal::Buy)
    } else if change_pct_24h > 0.0 {
        (Trend::Uptrend, Signal::Hold)
    } else if change_pct_24h > -STRONG_MOVE_PCT {
        (Trend::Downtrend, Signal::Hold)
    } else {
        (Trend::StrongDowntrend, Signal::Sell)
    };

    let volume_status = if volume_24h > HIGH_VOLUME_USD {
        VolumeStatus::High
    } else {
        VolumeStatus::Normal
    };

    TechnicalIndicators {
        trend,
        signal,
        volume_status,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(change: f64) -> TechnicalIndicators {
        derive_indicators(100.0, change, 0.0)
    }

    #[test]
    fn test_trend_buckets() {
        assert_eq!(at(12.0).signal, Signal::Buy);
        assert_eq!(at(12.0).trend, Trend::StrongUptrend);
        assert_eq!(at(2.5).trend, Trend::Uptrend);
        assert_eq!(at(2.5).signal, Signal::Hold);
        assert_eq!(at(-2.5).trend, Trend::Downtrend);
        assert_eq!(at(-2.5).signal, Signal::Hold);
        assert_eq!(at(-12.0).signal, Signal::Sell);
    }

    #[test]
    fn test_threshold_boundaries() {
        // Upper bounds are inclusive
        assert_eq!(at(5.0).trend, Trend::Uptrend);
        assert_eq!(at(5.000_001).signal, Signal::Buy);
        assert_eq!(at(0.0).trend, Trend::Downtrend);
        assert_eq!(at(-5.0).trend, Trend::StrongDowntrend);
        assert_eq!(at(-5.0).signal, Signal::Sell);
        assert_eq!(at(-4.999_999).signal, Signal::Hold);
    }

    #[test]
    fn test_volume_boundary() {
        assert_eq!(derive_indicators(0.0, 0.0, 1e9).volume_status, VolumeStatus::Normal);
        assert_eq!(
            derive_indicators(0.0, 0.0, 1_000_000_001.0).volume_status,
            VolumeStatus::High
        );
    }

    #[test]
    fn test_nan_change_is_strong_downtrend() {
        assert_eq!(at(f64::NAN).trend, Trend::StrongDowntrend);
    }

    #[test]
    fn test_price_does_not_matter_and_is_pure() {
        let a = derive_indicators(1.0, 3.0, 2e9);
        let b = derive_indicators(1_000_000.0, 3.0, 2e9);
        assert_eq!(a, b);
        assert_eq!(a, derive_indicators(1.0, 3.0, 2e9));
    }

    #[test]
    fn test_missing_snapshot_reads_as_zero() {
        let indicators = TechnicalIndicators::from_price(None);
        assert_eq!(indicators.trend, Trend::Downtrend);
        assert_eq!(indicators.signal, Signal::Hold);
        assert_eq!(indicators.volume_status, VolumeStatus::Normal);
    }

    #[test]
    fn test_serialized_labels() {
        let value = serde_json::to_value(at(7.0)).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "trend": "Strong Uptrend",
                "signal": "BUY",
                "volume_status": "Normal"
            })
        );
    }
}
