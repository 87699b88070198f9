//! `crypto-agent graph`

use agent_core::{OutputSink, Panel, TableView, Tone};
use crypto_analyst::workflow::{AnalysisResult, AnalysisWorkflow};
use crypto_analyst::{Channel, Signal};

use super::{Context, Input, format_usd, prompt};
use crate::cli::GraphArgs;
use crate::console::separator;

const DEFAULT_SYMBOL: &str = "BTC";
const BATCH_SYMBOLS: [&str; 3] = ["BTC", "ETH", "SOL"];

const EXAMPLE_CRYPTOS: [(&str, &str); 5] = [
    ("BTC", "Bitcoin"),
    ("ETH", "Ethereum"),
    ("SOL", "Solana"),
    ("BNB", "Binance Coin"),
    ("ADA", "Cardano"),
];

const WELCOME: &str = "
Graph Agent Demo

A fixed multi-step analysis workflow:
1. 📊 Data Collection - gather price and market data
2. 📈 Technical Analysis - derive trend and signal
3. 📰 Sentiment Analysis - summarize recent news
4. 🤔 Decision Generation - ask the model for a recommendation
5. 📢 Notification - send the results

Each step passes its output to the next.";

fn build_workflow(ctx: &Context, args: &GraphArgs, verbose: bool) -> anyhow::Result<AnalysisWorkflow> {
    let mut builder = ctx
        .toolkit()?
        .workflow()
        .provider(ctx.provider()?)
        .sink(ctx.sink.clone())
        .model(ctx.settings.model.clone())
        .verbose(verbose);

    for name in &args.notify {
        let channel: Channel = name.parse().map_err(anyhow::Error::msg)?;
        builder = builder.notify_channel(channel);
    }

    Ok(builder.build()?)
}

pub async fn run(ctx: &Context, args: &GraphArgs) -> anyhow::Result<()> {
    if let Some(symbols) = &args.compare {
        let workflow = build_workflow(ctx, args, false)?;
        compare(ctx, &workflow, &args.action, &parse_symbols(symbols)).await;
        return Ok(());
    }

    let workflow = build_workflow(ctx, args, !ctx.quiet)?;

    if args.batch {
        run_batch(ctx, &workflow, &args.action).await;
        return Ok(());
    }

    if let Some(symbol) = &args.symbol {
        let result = workflow.run(&symbol.to_uppercase(), &args.action).await;
        ctx.sink.line(&format!("\n{}\n", separator()), Tone::Info);
        display_results(ctx.sink.as_ref(), &result);
        return Ok(());
    }

    interactive(ctx, &workflow, &args.action).await
}

/// `" btc, eth ,,sol"` → `["BTC", "ETH", "SOL"]`
pub fn parse_symbols(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_uppercase)
        .collect()
}

async fn run_batch(ctx: &Context, workflow: &AnalysisWorkflow, action: &str) {
    let total = BATCH_SYMBOLS.len();
    for (i, symbol) in BATCH_SYMBOLS.iter().enumerate() {
        ctx.sink.line(&format!("\n{}", separator()), Tone::Info);
        ctx.sink
            .line(&format!("Analysis {}/{total}: {symbol}", i + 1), Tone::Info);
        ctx.sink.line(&separator(), Tone::Info);

        workflow.run(symbol, action).await;
        ctx.sink
            .line(&format!("✓ {symbol} analysis complete"), Tone::Success);
    }

    ctx.sink.line(&format!("\n{}", separator()), Tone::Success);
    ctx.sink.line("✓ Batch demo completed!", Tone::Success);
}

async fn compare(ctx: &Context, workflow: &AnalysisWorkflow, action: &str, symbols: &[String]) {
    let mut results = Vec::with_capacity(symbols.len());
    for symbol in symbols {
        ctx.sink.line(&format!("Analyzing {symbol}..."), Tone::Info);
        results.push(workflow.run(symbol, action).await);
    }

    ctx.sink.line(&format!("\n{}\n", separator()), Tone::Info);
    ctx.sink.table(comparison_table(&results));
}

async fn interactive(ctx: &Context, workflow: &AnalysisWorkflow, action: &str) -> anyhow::Result<()> {
    ctx.welcome("Welcome", WELCOME);

    ctx.sink.line("\nAvailable cryptocurrencies:", Tone::Warning);
    for (symbol, name) in EXAMPLE_CRYPTOS {
        ctx.sink.line(&format!("  • {symbol} - {name}"), Tone::Info);
    }

    loop {
        let symbol = match prompt("Enter cryptocurrency symbol", DEFAULT_SYMBOL)? {
            Input::Line(symbol) => symbol.to_uppercase(),
            Input::Exit => break,
        };

        ctx.sink
            .line(&format!("\nStarting analysis workflow for {symbol}...\n"), Tone::Info);
        let result = workflow.run(&symbol, action).await;

        ctx.sink.line(&format!("\n{}\n", separator()), Tone::Info);
        display_results(ctx.sink.as_ref(), &result);
    }

    ctx.sink.line("\nGoodbye! 👋", Tone::Warning);
    Ok(())
}

const fn signal_tone(signal: Signal) -> Tone {
    match signal {
        Signal::Buy => Tone::Success,
        Signal::Sell => Tone::Error,
        Signal::Hold => Tone::Warning,
    }
}

/// Summary panel, recommendation, price and technical tables, then the model's reasoning
pub fn display_results(sink: &dyn OutputSink, result: &AnalysisResult) {
    sink.panel(Panel::new(
        "📊 Results Summary",
        format!("{} Analysis Complete", result.symbol),
        Tone::Success,
    ));

    sink.table(recommendation_table(result));

    if let Some(price) = &result.data.price_data {
        let change = price.price_change_percentage_24h;
        let mut table = TableView::headerless().titled("Price Data");
        table.add_row(["Current Price".to_string(), format!("${}", format_usd(price.current_price))]);
        table.add_row(["24h Change".to_string(), format!("{change:+.2}%")]);
        table.highlight_last(1, if change > 0.0 { Tone::Success } else { Tone::Error });
        table.add_row(["Market Cap Rank".to_string(), format!("#{}", price.market_cap_rank)]);
        sink.table(table);
    }

    if let Some(indicators) = &result.data.technical_indicators {
        let mut table = TableView::headerless().titled("Technical Analysis");
        table.add_row(["Trend".to_string(), indicators.trend.to_string()]);
        table.add_row(["Signal".to_string(), indicators.signal.to_string()]);
        table.highlight_last(1, signal_tone(indicators.signal));
        sink.table(table);
    }

    if !result.reasoning.is_empty() {
        sink.panel(Panel::new("AI Analysis", result.reasoning.as_str(), Tone::Question));
    }
}

pub fn recommendation_table(result: &AnalysisResult) -> TableView {
    let mut table = TableView::new(["Metric", "Value"]).titled("Investment Recommendation");
    table.add_row(["Recommendation".to_string(), result.recommendation.clone()]);
    table.highlight_last(1, Tone::Success);
    table.add_row([
        "Confidence".to_string(),
        format!("{:.1}%", result.confidence * 100.0),
    ]);
    table.highlight_last(1, Tone::Success);
    table
}

/// One row per result: symbol, recommendation, signal and trend
pub fn comparison_table(results: &[AnalysisResult]) -> TableView {
    let mut table = TableView::new(["Symbol", "Recommendation", "Signal", "Trend"])
        .titled("Cryptocurrency Comparison");

    for result in results {
        match result.data.technical_indicators {
            Some(t) => {
                table.add_row([
                    result.symbol.clone(),
                    result.recommendation.clone(),
                    t.signal.to_string(),
                    t.trend.to_string(),
                ]);
                table.highlight_last(2, signal_tone(t.signal));
            }
            None => table.add_row([
                result.symbol.clone(),
                result.recommendation.clone(),
                "N/A".to_string(),
                "N/A".to_string(),
            ]),
        }
        table.highlight_last(0, Tone::Info);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use agent_core::MemorySink;
    use crypto_analyst::derive_indicators;
    use crypto_analyst::workflow::AnalysisData;

    fn result(symbol: &str, change: Option<f64>) -> AnalysisResult {
        let indicators = change.map(|c| derive_indicators(100.0, c, 0.0));
        AnalysisResult {
            symbol: symbol.into(),
            recommendation: indicators.map_or_else(|| "HOLD".into(), |t| t.signal.to_string()),
            confidence: 0.75,
            reasoning: String::new(),
            data: AnalysisData {
                price_data: None,
                technical_indicators: indicators,
                sentiment_data: None,
            },
            analyzed_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_parse_symbols() {
        assert_eq!(parse_symbols(" btc, eth ,,sol"), vec!["BTC", "ETH", "SOL"]);
        assert!(parse_symbols(" , ").is_empty());
    }

    #[test]
    fn test_comparison_table_rows() {
        let table = comparison_table(&[result("BTC", Some(8.0)), result("DOGE", None)]);

        assert_eq!(table.title.as_deref(), Some("Cryptocurrency Comparison"));
        assert_eq!(table.headers[1], "Recommendation");
        assert_eq!(table.rows[0], vec!["BTC", "BUY", "BUY", "Strong Uptrend"]);
        assert_eq!(table.rows[1], vec!["DOGE", "HOLD", "N/A", "N/A"]);
        assert_eq!(table.tone_at(0, 2), Some(Tone::Success));
        assert_eq!(table.tone_at(1, 2), None);
    }

    #[test]
    fn test_confidence_as_percentage() {
        let table = recommendation_table(&result("ETH", Some(-6.0)));
        assert_eq!(table.rows[0], vec!["Recommendation", "SELL"]);
        assert_eq!(table.rows[1], vec!["Confidence", "75.0%"]);
    }

    #[test]
    fn test_display_results_goes_through_sink() {
        let sink = MemorySink::new();
        let mut analysis = result("SOL", Some(-1.0));
        analysis.reasoning = "Wait for a clearer trend.".into();

        display_results(&sink, &analysis);

        assert_eq!(
            sink.panel_titles(),
            vec!["📊 Results Summary".to_string(), "AI Analysis".to_string()]
        );
        let titles: Vec<_> = sink.tables().into_iter().filter_map(|t| t.title).collect();
        assert_eq!(titles, vec!["Investment Recommendation", "Technical Analysis"]);
        assert_eq!(sink.tables()[1].tone_at(1, 1), Some(Tone::Warning));
    }
}
