//! Technical Indicator Tool
//!
//! Returns a fixed RSI/MACD/moving-average/Bollinger snapshot. No historical
//! candles are fetched, so the numbers do not depend on the symbol.

use async_trait::async_trait;

use agent_core::{
    AgentError, Result as CoreResult, Tool, ToolCall, ToolResult, ToolSchema,
    tool::ParameterSchema,
};

use crate::model::{BollingerBands, IndicatorReport, IndicatorSignals, Macd, MovingAverages};

pub const INDICATOR_TOOL: &str = "calculate_indicators";
pub const DEFAULT_TIMEFRAME: &str = "1d";

/// Tool for technical indicator snapshots
#[derive(Clone, Copy, Debug, Default)]
pub struct CryptoIndicatorTool;

impl CryptoIndicatorTool {
    pub const fn new() -> Self {
        Self
    }

    pub fn calculate(&self, symbol: &str, timeframe: &str) -> IndicatorReport {
        let report = IndicatorReport {
            symbol: symbol.to_uppercase(),
            timeframe: timeframe.to_string(),
            rsi: 65.5,
            macd: Macd {
                macd_line: 120.5,
                signal_line: 115.2,
                histogram: 5.3,
            },
            moving_averages: MovingAverages {
                ma_7: 50_000.0,
                ma_25: 48_000.0,
                ma_99: 45_000.0,
            },
            bollinger_bands: BollingerBands {
                upper: 52_000.0,
                middle: 50_000.0,
                lower: 48_000.0,
            },
            signals: IndicatorSignals {
                trend: "bullish".into(),
                strength: "moderate".into(),
                recommendation: "HOLD".into(),
            },
        };
        tracing::info!(symbol = %report.symbol, timeframe, "Calculated indicators");
        report
    }
}

#[async_trait]
impl Tool for CryptoIndicatorTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: INDICATOR_TOOL.into(),
            description: "Calculate technical indicators (RSI, MACD, etc.) for a cryptocurrency"
                .into(),
            parameters: vec![
                ParameterSchema::required("symbol", "Cryptocurrency symbol"),
                ParameterSchema::optional("timeframe", "Timeframe for calculation (1h, 4h, 1d, etc.)"),
            ],
        }
    }

    async fn execute(&self, call: &ToolCall) -> CoreResult<ToolResult> {
        let symbol = call
            .str_arg("symbol")
            .ok_or_else(|| AgentError::ToolValidation("symbol must be a string".into()))?;
        let timeframe = call.str_arg("timeframe").unwrap_or(DEFAULT_TIMEFRAME);

        ToolResult::json(INDICATOR_TOOL, &self.calculate(symbol, timeframe))
    }
}
