//! Fixed-Stage Analysis Workflow
//!
//! Five stages run in order on one state record:
//!
//! ```text
//! collect_data → technical_analysis → sentiment_analysis → generate_decision → notification
//! ```
//!
//! Each stage owns its output field and degrades it to empty on failure, so a
//! run always reaches the end and always yields an [`AnalysisResult`].

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

use agent_core::{
    AgentError, GenerationOptions, LlmProvider, NullSink, OutputSink, Panel, Result as CoreResult,
    TableView, Tone,
};

use crate::market::MarketDataSource;
use crate::model::{Channel, PriceData};
use crate::signal::{Signal, TechnicalIndicators};
use crate::svckit::{DEFAULT_NEWS_LIMIT, NewsSource, Notifier};

/// Confidence reported on every result
pub const DEFAULT_CONFIDENCE: f64 = 0.75;

/// Stored as the decision when the model call fails
pub const DECISION_ERROR: &str = "Error generating decision";

pub const DEFAULT_ACTION: &str = "analyze";

const HEADLINE_LIMIT: usize = 3;
const NEUTRAL_SENTIMENT: &str = "Neutral";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WorkflowStage {
    CollectData,
    TechnicalAnalysis,
    SentimentAnalysis,
    GenerateDecision,
    Notification,
}

impl WorkflowStage {
    /// Execution order
    pub const ALL: [Self; 5] = [
        Self::CollectData,
        Self::TechnicalAnalysis,
        Self::SentimentAnalysis,
        Self::GenerateDecision,
        Self::Notification,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CollectData => "collect_data",
            Self::TechnicalAnalysis => "technical_analysis",
            Self::SentimentAnalysis => "sentiment_analysis",
            Self::GenerateDecision => "generate_decision",
            Self::Notification => "notification",
        }
    }

    pub const fn title(self) -> &'static str {
        match self {
            Self::CollectData => "📊 Data Collection",
            Self::TechnicalAnalysis => "📈 Technical Analysis",
            Self::SentimentAnalysis => "📰 Sentiment Analysis",
            Self::GenerateDecision => "🤔 Decision Generation",
            Self::Notification => "📧 Notification",
        }
    }

    const fn tone(self) -> Tone {
        match self {
            Self::CollectData => Tone::Info,
            Self::TechnicalAnalysis => Tone::Warning,
            Self::SentimentAnalysis => Tone::Observation,
            Self::GenerateDecision => Tone::Thought,
            Self::Notification => Tone::Success,
        }
    }
}

/// Reduced news picture for one symbol
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SentimentSummary {
    pub news_count: usize,
    pub overall_sentiment: String,
    pub news_headlines: Vec<String>,
}

/// State threaded through the stages; created fresh per run
#[derive(Clone, Debug, Default)]
pub struct WorkflowState {
    pub symbol: String,
    pub action: String,
    pub price_data: Option<PriceData>,
    pub technical_indicators: Option<TechnicalIndicators>,
    pub sentiment_data: Option<SentimentSummary>,
    pub decision: String,
    pub messages: Vec<String>,
}

impl WorkflowState {
    pub fn new(symbol: &str, action: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            action: action.to_string(),
            ..Self::default()
        }
    }

    fn record(&mut self, stage: WorkflowStage, note: impl AsRef<str>) {
        self.messages.push(format!("{}: {}", stage.as_str(), note.as_ref()));
    }
}

/// Snapshot of the data behind a recommendation; absent sections serialize as `{}`
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct AnalysisData {
    #[serde(serialize_with = "object_or_empty")]
    pub price_data: Option<PriceData>,
    #[serde(serialize_with = "object_or_empty")]
    pub technical_indicators: Option<TechnicalIndicators>,
    #[serde(serialize_with = "object_or_empty")]
    pub sentiment_data: Option<SentimentSummary>,
}

#[allow(clippy::ref_option)]
fn object_or_empty<T: Serialize, S: Serializer>(
    value: &Option<T>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match value {
        Some(inner) => inner.serialize(serializer),
        None => serde_json::Map::new().serialize(serializer),
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub symbol: String,
    /// Technical signal, `HOLD` when none was derived
    pub recommendation: String,
    pub confidence: f64,
    /// Raw decision text from the model
    pub reasoning: String,
    pub data: AnalysisData,
    pub analyzed_at: DateTime<Utc>,
}

impl AnalysisResult {
    fn from_state(state: WorkflowState) -> Self {
        let recommendation = state
            .technical_indicators
            .map_or(Signal::Hold, |t| t.signal)
            .to_string();

        Self {
            symbol: state.symbol,
            recommendation,
            confidence: DEFAULT_CONFIDENCE,
            reasoning: state.decision,
            data: AnalysisData {
                price_data: state.price_data,
                technical_indicators: state.technical_indicators,
                sentiment_data: state.sentiment_data,
            },
            analyzed_at: Utc::now(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct WorkflowConfig {
    /// Options for the decision stage
    pub generation: GenerationOptions,

    /// Render stage banners, tables and the decision
    pub verbose: bool,

    /// Channels notified in addition to the console
    pub extra_channels: Vec<Channel>,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            generation: GenerationOptions::decision(GenerationOptions::default().model),
            verbose: true,
            extra_channels: Vec::new(),
        }
    }
}

/// The analysis pipeline. Stateless between runs.
pub struct AnalysisWorkflow {
    provider: Arc<dyn LlmProvider>,
    market: Arc<dyn MarketDataSource>,
    news: Arc<dyn NewsSource>,
    notifier: Arc<dyn Notifier>,
    sink: Arc<dyn OutputSink>,
    config: WorkflowConfig,
}

impl AnalysisWorkflow {
    pub fn builder() -> WorkflowBuilder {
        WorkflowBuilder::new()
    }

    pub const fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    /// Run every stage for `symbol` and summarize the outcome
    pub async fn run(&self, symbol: &str, action: &str) -> AnalysisResult {
        self.sink.panel(Panel::new(
            "🚀 Graph Agent",
            format!("Starting analysis for {symbol}"),
            Tone::Info,
        ));
        tracing::info!(symbol, action, provider = self.provider.name(), "Starting analysis workflow");

        let mut state = WorkflowState::new(symbol, action);
        for stage in WorkflowStage::ALL {
            self.announce(stage, &state);
            match stage {
                WorkflowStage::CollectData => self.collect_data(&mut state).await,
                WorkflowStage::TechnicalAnalysis => self.technical_analysis(&mut state),
                WorkflowStage::SentimentAnalysis => self.sentiment_analysis(&mut state).await,
                WorkflowStage::GenerateDecision => self.generate_decision(&mut state).await,
                WorkflowStage::Notification => self.notification(&mut state).await,
            }
        }

        tracing::info!(symbol, "Analysis workflow complete");
        AnalysisResult::from_state(state)
    }

    fn announce(&self, stage: WorkflowStage, state: &WorkflowState) {
        if !self.config.verbose {
            return;
        }
        let body = match stage {
            WorkflowStage::CollectData => format!("Collecting data for {}...", state.symbol),
            WorkflowStage::TechnicalAnalysis => "Calculating technical indicators...".into(),
            WorkflowStage::SentimentAnalysis => "Analyzing market sentiment...".into(),
            WorkflowStage::GenerateDecision => "Generating investment decision...".into(),
            WorkflowStage::Notification => "Sending notification...".into(),
        };
        self.sink.panel(Panel::new(stage.title(), body, stage.tone()));
    }

    async fn collect_data(&self, state: &mut WorkflowState) {
        let stage = WorkflowStage::CollectData;
        match self.market.price(&state.symbol).await {
            Ok(data) => {
                if self.config.verbose {
                    let mut table = TableView::new(["Metric", "Value"])
                        .titled(format!("{} Price Data", state.symbol));
                    for (metric, value) in data.rows() {
                        table.add_row([metric.to_string(), value]);
                    }
                    self.sink.table(table);
                }
                state.record(stage, format!("price data from {}", self.market.name()));
                state.price_data = Some(data);
            }
            Err(e) => {
                tracing::error!(symbol = %state.symbol, error = %e, "Error collecting data");
                state.record(stage, format!("failed: {e}"));
                state.price_data = None;
            }
        }
    }

    fn technical_analysis(&self, state: &mut WorkflowState) {
        let indicators = TechnicalIndicators::from_price(state.price_data.as_ref());

        if self.config.verbose {
            let mut table = TableView::new(["Indicator", "Value"]).titled("Technical Indicators");
            for (indicator, value) in indicators.rows() {
                table.add_row([indicator.to_string(), value]);
            }
            self.sink.table(table);
        }

        state.record(
            WorkflowStage::TechnicalAnalysis,
            format!("{} / {}", indicators.trend, indicators.signal),
        );
        state.technical_indicators = Some(indicators);
    }

    async fn sentiment_analysis(&self, state: &mut WorkflowState) {
        let stage = WorkflowStage::SentimentAnalysis;
        match self.news.news(&state.symbol, DEFAULT_NEWS_LIMIT).await {
            Ok(report) => {
                let sentiment = SentimentSummary {
                    news_count: report.articles.len(),
                    overall_sentiment: NEUTRAL_SENTIMENT.into(),
                    news_headlines: report
                        .articles
                        .into_iter()
                        .take(HEADLINE_LIMIT)
                        .map(|a| a.title)
                        .collect(),
                };

                if self.config.verbose {
                    self.sink.panel(Panel::untitled(
                        format!(
                            "Found {} news articles\nOverall Sentiment: {}",
                            sentiment.news_count, sentiment.overall_sentiment
                        ),
                        Tone::Observation,
                    ));
                }
                state.record(stage, format!("{} articles", sentiment.news_count));
                state.sentiment_data = Some(sentiment);
            }
            Err(e) => {
                tracing::error!(symbol = %state.symbol, error = %e, "Error in sentiment analysis");
                state.record(stage, format!("failed: {e}"));
                state.sentiment_data = None;
            }
        }
    }

    async fn generate_decision(&self, state: &mut WorkflowState) {
        let stage = WorkflowStage::GenerateDecision;
        let decision = match self.request_decision(state).await {
            Ok(text) => {
                if self.config.verbose {
                    self.sink
                        .panel(Panel::new("💡 Investment Decision", text.as_str(), Tone::Success));
                }
                state.record(stage, "decision generated");
                text
            }
            Err(e) => {
                tracing::error!(symbol = %state.symbol, error = %e, "Error generating decision");
                state.record(stage, format!("failed: {e}"));
                DECISION_ERROR.to_string()
            }
        };
        state.decision = decision;
    }

    async fn request_decision(&self, state: &WorkflowState) -> CoreResult<String> {
        let prompt = decision_prompt(state)?;
        self.provider.generate(&prompt, &self.config.generation).await
    }

    async fn notification(&self, state: &mut WorkflowState) {
        let stage = WorkflowStage::Notification;
        let message = notification_message(state);

        let channels = std::iter::once(Channel::Console)
            .chain(self.config.extra_channels.iter().copied().filter(|c| *c != Channel::Console));

        for channel in channels {
            let receipt = self.notifier.notify(&message, channel).await;
            if receipt.success {
                if self.config.verbose {
                    self.sink.line(
                        &format!("✓ Notification sent successfully ({channel})"),
                        Tone::Success,
                    );
                }
                state.record(stage, format!("sent via {channel}"));
            } else {
                let error = receipt.error.unwrap_or_default();
                tracing::warn!(%channel, %error, "Error sending notification");
                state.record(stage, format!("{channel} failed: {error}"));
            }
        }
    }
}

fn section_json<T: Serialize>(section: Option<&T>) -> Result<String, AgentError> {
    match section {
        Some(value) => Ok(serde_json::to_string_pretty(value)?),
        None => Ok("{}".to_string()),
    }
}

/// Prompt for the decision stage
pub fn decision_prompt(state: &WorkflowState) -> Result<String, AgentError> {
    Ok(format!(
        r#"
Analyze the following cryptocurrency data and provide an investment recommendation:

Symbol: {symbol}

Price Data:
{price}

Technical Indicators:
{indicators}

Sentiment Data:
{sentiment}

Provide a clear recommendation (BUY/HOLD/SELL) with reasoning and confidence level (0-100%).
Format your response as JSON:
{{
    "recommendation": "BUY/HOLD/SELL",
    "confidence": 85,
    "reasoning": "Your detailed reasoning here"
}}
"#,
        symbol = state.symbol,
        price = section_json(state.price_data.as_ref())?,
        indicators = section_json(state.technical_indicators.as_ref())?,
        sentiment = section_json(state.sentiment_data.as_ref())?,
    ))
}

/// Human-readable summary sent by the notification stage
pub fn notification_message(state: &WorkflowState) -> String {
    let decision = if state.decision.is_empty() {
        "N/A"
    } else {
        state.decision.as_str()
    };
    let (signal, trend) = state.technical_indicators.map_or_else(
        || ("N/A".to_string(), "N/A".to_string()),
        |t| (t.signal.to_string(), t.trend.to_string()),
    );

    format!(
        "\nCrypto Analysis Complete: {symbol}\n\nDecision: {decision}\n\nTechnical Signal: {signal}\nTrend: {trend}\n\nThis is an automated analysis. Always do your own research before investing.\n",
        symbol = state.symbol,
    )
}

/// Builder for [`AnalysisWorkflow`]
pub struct WorkflowBuilder {
    provider: Option<Arc<dyn LlmProvider>>,
    market: Option<Arc<dyn MarketDataSource>>,
    news: Option<Arc<dyn NewsSource>>,
    notifier: Option<Arc<dyn Notifier>>,
    sink: Arc<dyn OutputSink>,
    config: WorkflowConfig,
}

impl Default for WorkflowBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkflowBuilder {
    pub fn new() -> Self {
        Self {
            provider: None,
            market: None,
            news: None,
            notifier: None,
            sink: Arc::new(NullSink),
            config: WorkflowConfig::default(),
        }
    }

    #[must_use]
    pub fn provider(mut self, provider: Arc<dyn LlmProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    #[must_use]
    pub fn market(mut self, market: Arc<dyn MarketDataSource>) -> Self {
        self.market = Some(market);
        self
    }

    #[must_use]
    pub fn news(mut self, news: Arc<dyn NewsSource>) -> Self {
        self.news = Some(news);
        self
    }

    #[must_use]
    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    #[must_use]
    pub fn sink(mut self, sink: Arc<dyn OutputSink>) -> Self {
        self.sink = sink;
        self
    }

    #[must_use]
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.generation.model = model.into();
        self
    }

    #[must_use]
    pub const fn verbose(mut self, verbose: bool) -> Self {
        self.config.verbose = verbose;
        self
    }

    #[must_use]
    pub fn notify_channel(mut self, channel: Channel) -> Self {
        if !self.config.extra_channels.contains(&channel) {
            self.config.extra_channels.push(channel);
        }
        self
    }

    pub fn build(self) -> CoreResult<AnalysisWorkflow> {
        let missing = |what: &str| AgentError::Config(format!("{what} is required"));

        Ok(AnalysisWorkflow {
            provider: self.provider.ok_or_else(|| missing("Provider"))?,
            market: self.market.ok_or_else(|| missing("Market data source"))?,
            news: self.news.ok_or_else(|| missing("News source"))?,
            notifier: self.notifier.ok_or_else(|| missing("Notifier"))?,
            sink: self.sink,
            config: self.config,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AnalystError, Result};
    use crate::market::MockMarketData;
    use crate::model::{Article, NewsReport, NotificationReceipt};
    use agent_core::{MemorySink, Message};
    use agent_core::provider::Completion;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Always answers with the same text and records prompts
    struct FixedProvider {
        reply: Option<String>,
        prompts: Mutex<Vec<String>>,
    }

    impl FixedProvider {
        fn replying(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Some(reply.to_string()),
                prompts: Mutex::new(Vec::new()),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                reply: None,
                prompts: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl LlmProvider for FixedProvider {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn complete(
            &self,
            messages: &[Message],
            options: &GenerationOptions,
        ) -> CoreResult<Completion> {
            self.prompts.lock().unwrap().push(messages[0].content.clone());
            assert!((options.temperature - 0.3).abs() < f32::EPSILON);
            match &self.reply {
                Some(text) => Ok(Completion {
                    content: text.clone(),
                    model: options.model.clone(),
                    usage: None,
                    finish_reason: None,
                }),
                None => Err(AgentError::ProviderUnavailable("timeout".into())),
            }
        }
    }

    struct FailingMarket;

    #[async_trait]
    impl MarketDataSource for FailingMarket {
        async fn price(&self, symbol: &str) -> Result<PriceData> {
            Err(AnalystError::UnsupportedAsset(symbol.to_string()))
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    /// Fixed market snapshot with a chosen 24h change
    struct MovingMarket(f64);

    #[async_trait]
    impl MarketDataSource for MovingMarket {
        async fn price(&self, symbol: &str) -> Result<PriceData> {
            let mut data = MockMarketData::snapshot(symbol);
            data.price_change_percentage_24h = self.0;
            data.note = None;
            Ok(data)
        }

        fn name(&self) -> &str {
            "moving"
        }
    }

    struct StaticNews(usize);

    #[async_trait]
    impl NewsSource for StaticNews {
        async fn news(&self, symbol: &str, limit: usize) -> Result<NewsReport> {
            let articles = (0..self.0.min(limit))
                .map(|i| Article {
                    title: format!("{symbol} headline {i}"),
                    source: "test".into(),
                    url: String::new(),
                    published_at: String::new(),
                    sentiment: "neutral".into(),
                })
                .collect();
            Ok(NewsReport::new(symbol, articles))
        }
    }

    struct DownNews;

    #[async_trait]
    impl NewsSource for DownNews {
        async fn news(&self, _symbol: &str, _limit: usize) -> Result<NewsReport> {
            Err(AnalystError::Config("no news".into()))
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        sent: Mutex<Vec<(Channel, String)>>,
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn notify(&self, message: &str, channel: Channel) -> NotificationReceipt {
            self.sent.lock().unwrap().push((channel, message.to_string()));
            match channel {
                Channel::Slack => NotificationReceipt::failed(channel, "Webhook not configured"),
                _ => NotificationReceipt::delivered(channel, message),
            }
        }
    }

    fn workflow(
        provider: Arc<dyn LlmProvider>,
        market: Arc<dyn MarketDataSource>,
        news: Arc<dyn NewsSource>,
    ) -> (WorkflowBuilder, Arc<RecordingNotifier>, Arc<MemorySink>) {
        let notifier = Arc::new(RecordingNotifier::default());
        let sink = Arc::new(MemorySink::new());
        let builder = AnalysisWorkflow::builder()
            .provider(provider)
            .market(market)
            .news(news)
            .notifier(notifier.clone())
            .sink(sink.clone())
            .model("test-model");
        (builder, notifier, sink)
    }

    #[tokio::test]
    async fn test_full_run() {
        let provider = FixedProvider::replying(r#"{"recommendation": "BUY", "confidence": 80}"#);
        let (builder, notifier, sink) =
            workflow(provider.clone(), Arc::new(MovingMarket(7.5)), Arc::new(StaticNews(5)));
        let result = builder.build().unwrap().run("ETH", DEFAULT_ACTION).await;

        assert_eq!(result.symbol, "ETH");
        assert_eq!(result.recommendation, "BUY");
        assert!((result.confidence - DEFAULT_CONFIDENCE).abs() < f64::EPSILON);
        assert_eq!(result.reasoning, r#"{"recommendation": "BUY", "confidence": 80}"#);

        let sentiment = result.data.sentiment_data.unwrap();
        assert_eq!(sentiment.news_count, 5);
        assert_eq!(sentiment.news_headlines.len(), 3);
        assert_eq!(sentiment.overall_sentiment, "Neutral");

        let prompt = &provider.prompts.lock().unwrap()[0];
        assert!(prompt.contains("Symbol: ETH"));
        assert!(prompt.contains("\"signal\": \"BUY\""));

        let sent = notifier.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, Channel::Console);
        assert!(sent[0].1.contains("Technical Signal: BUY"));
        assert!(sent[0].1.contains("Trend: Strong Uptrend"));

        let titles = sink.panel_titles();
        assert_eq!(titles[0], "🚀 Graph Agent");
        for stage in WorkflowStage::ALL {
            assert!(titles.iter().any(|t| t == stage.title()), "missing {}", stage.title());
        }
        assert!(titles.iter().any(|t| t == "💡 Investment Decision"));
        assert_eq!(sink.tables().len(), 2);
    }

    #[tokio::test]
    async fn test_price_failure_degrades_to_empty() {
        let (builder, _notifier, _sink) = workflow(
            FixedProvider::replying("hold"),
            Arc::new(FailingMarket),
            Arc::new(StaticNews(2)),
        );
        let result = builder.build().unwrap().run("BTC", DEFAULT_ACTION).await;

        assert_eq!(result.recommendation, "HOLD");
        assert!(result.data.price_data.is_none());

        let json = serde_json::to_value(&result.data).unwrap();
        assert_eq!(json["price_data"], serde_json::json!({}));
        assert_eq!(json["technical_indicators"]["trend"], "Downtrend");
    }

    #[tokio::test]
    async fn test_decision_failure_is_recorded() {
        let (builder, notifier, sink) = workflow(
            FixedProvider::failing(),
            Arc::new(MovingMarket(-9.0)),
            Arc::new(DownNews),
        );
        let result = builder.build().unwrap().run("SOL", DEFAULT_ACTION).await;

        assert_eq!(result.reasoning, DECISION_ERROR);
        assert_eq!(result.recommendation, "SELL");
        assert!(result.data.sentiment_data.is_none());
        assert!(!sink.panel_titles().iter().any(|t| t == "💡 Investment Decision"));
        assert!(notifier.sent.lock().unwrap()[0].1.contains("Decision: Error generating decision"));
    }

    #[tokio::test]
    async fn test_extra_channels_and_quiet_mode() {
        let (builder, notifier, sink) = workflow(
            FixedProvider::replying("ok"),
            Arc::new(MovingMarket(1.0)),
            Arc::new(StaticNews(1)),
        );
        let workflow = builder
            .verbose(false)
            .notify_channel(Channel::Slack)
            .notify_channel(Channel::Console)
            .notify_channel(Channel::Slack)
            .build()
            .unwrap();
        let result = workflow.run("ADA", DEFAULT_ACTION).await;

        let channels: Vec<Channel> = notifier.sent.lock().unwrap().iter().map(|(c, _)| *c).collect();
        assert_eq!(channels, vec![Channel::Console, Channel::Slack]);
        assert_eq!(result.recommendation, "HOLD");

        // Only the run banner is rendered when quiet
        assert_eq!(sink.panel_titles(), vec!["🚀 Graph Agent"]);
        assert!(sink.tables().is_empty());
    }

    #[test]
    fn test_builder_requires_collaborators() {
        let err = AnalysisWorkflow::builder()
            .provider(FixedProvider::replying("x"))
            .build()
            .err()
            .unwrap();
        assert!(matches!(err, AgentError::Config(ref msg) if msg.contains("Market")));
    }

    #[test]
    fn test_notification_message_without_data() {
        let message = notification_message(&WorkflowState::new("DOT", DEFAULT_ACTION));
        assert!(message.contains("Crypto Analysis Complete: DOT"));
        assert!(message.contains("Decision: N/A"));
        assert!(message.contains("Technical Signal: N/A"));
    }
}
