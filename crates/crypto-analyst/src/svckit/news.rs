//! Crypto News Tool
//!
//! CryptoPanic posts when an API key is configured, otherwise a fixed set of
//! headline templates.

use async_trait::async_trait;
use serde::Deserialize;

use agent_core::{
    AgentError, Result as CoreResult, Tool, ToolCall, ToolResult, ToolSchema,
    tool::ParameterSchema,
};

use super::MAX_RESULTS;
use crate::error::{AnalystError, Result};
use crate::model::{Article, NewsReport};
use crate::{env_opt, http_client};

pub const NEWS_TOOL: &str = "get_crypto_news";
pub const DEFAULT_NEWS_LIMIT: usize = 5;

const CRYPTOPANIC_API_BASE: &str = "https://cryptopanic.com/api/v1";

/// Source of news articles for a symbol
#[async_trait]
pub trait NewsSource: Send + Sync {
    async fn news(&self, symbol: &str, limit: usize) -> Result<NewsReport>;
}

#[derive(Clone, Debug)]
pub struct CryptoPanicConfig {
    pub api_key: Option<String>,
    pub base_url: String,
}

impl Default for CryptoPanicConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: CRYPTOPANIC_API_BASE.into(),
        }
    }
}

impl CryptoPanicConfig {
    /// Read `CRYPTOPANIC_API_KEY` and `CRYPTOPANIC_BASE_URL`
    pub fn from_env() -> Self {
        Self {
            api_key: env_opt("CRYPTOPANIC_API_KEY"),
            base_url: env_opt("CRYPTOPANIC_BASE_URL")
                .unwrap_or_else(|| CRYPTOPANIC_API_BASE.into())
                .trim_end_matches('/')
                .to_string(),
        }
    }
}

/// Tool for fetching cryptocurrency news
pub struct CryptoNewsTool {
    client: reqwest::Client,
    config: CryptoPanicConfig,
}

impl CryptoNewsTool {
    pub fn new(config: CryptoPanicConfig) -> Result<Self> {
        Ok(Self {
            client: http_client()?,
            config,
        })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(CryptoPanicConfig::from_env())
    }

    /// Rotating placeholder headlines
    pub fn template_articles(symbol: &str, limit: usize) -> Vec<Article> {
        let templates = [
            format!("{symbol} reaches new milestone as institutional adoption grows"),
            format!("Analysts predict bullish trend for {symbol} in coming weeks"),
            format!("Major exchange lists {symbol} trading pairs"),
            format!("{symbol} network upgrade scheduled for next month"),
            format!("Whale activity detected in {symbol} markets"),
        ];

        (0..limit)
            .map(|i| Article {
                title: templates[i % templates.len()].clone(),
                source: "CryptoNews".into(),
                url: format!("https://example.com/news/{i}"),
                published_at: "2024-01-15".into(),
                sentiment: "neutral".into(),
            })
            .collect()
    }

    async fn fetch_live(&self, api_key: &str, symbol: &str, limit: usize) -> Result<Vec<Article>> {
        let currency = symbol.to_uppercase();
        let response = self
            .client
            .get(format!("{}/posts/", self.config.base_url))
            .query(&[
                ("auth_token", api_key),
                ("currencies", currency.as_str()),
                ("public", "true"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AnalystError::Upstream {
                service: "cryptopanic",
                status: status.as_u16(),
            });
        }

        let posts: PostsResponse = response.json().await?;
        Ok(posts
            .results
            .into_iter()
            .take(limit)
            .map(Post::into_article)
            .collect())
    }
}

#[async_trait]
impl NewsSource for CryptoNewsTool {
    async fn news(&self, symbol: &str, limit: usize) -> Result<NewsReport> {
        let articles = match self.config.api_key.as_deref() {
            Some(key) => match self.fetch_live(key, symbol, limit).await {
                Ok(articles) => articles,
                Err(e) => {
                    tracing::warn!(symbol, error = %e, "CryptoPanic request failed, using template news");
                    Self::template_articles(symbol, limit)
                }
            },
            None => Self::template_articles(symbol, limit),
        };

        tracing::info!(symbol, count = articles.len(), "Fetched news articles");
        Ok(NewsReport::new(symbol, articles))
    }
}

#[async_trait]
impl Tool for CryptoNewsTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: NEWS_TOOL.into(),
            description: "Get latest news articles about a cryptocurrency. Input should be a symbol like 'BTC' or 'ETH'.".into(),
            parameters: vec![
                ParameterSchema::required("symbol", "Cryptocurrency symbol"),
                ParameterSchema::optional("limit", "Number of articles to return"),
            ],
        }
    }

    async fn execute(&self, call: &ToolCall) -> CoreResult<ToolResult> {
        let symbol = call
            .str_arg("symbol")
            .ok_or_else(|| AgentError::ToolValidation("symbol must be a string".into()))?;
        let limit = call
            .usize_arg("limit")
            .unwrap_or(DEFAULT_NEWS_LIMIT)
            .min(MAX_RESULTS);

        let report = self.news(symbol, limit).await?;
        ToolResult::json(NEWS_TOOL, &report)
    }
}

#[derive(Debug, Deserialize)]
struct PostsResponse {
    #[serde(default)]
    results: Vec<Post>,
}

#[derive(Debug, Deserialize)]
struct Post {
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    published_at: Option<String>,
    #[serde(default)]
    source: Option<PostSource>,
    #[serde(default)]
    votes: Option<Votes>,
}

#[derive(Debug, Deserialize)]
struct PostSource {
    #[serde(default)]
    title: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Votes {
    #[serde(default)]
    positive: u32,
    #[serde(default)]
    negative: u32,
}

impl Post {
    fn into_article(self) -> Article {
        let votes = self.votes.unwrap_or_default();
        let sentiment = match votes.positive.cmp(&votes.negative) {
            std::cmp::Ordering::Greater => "positive",
            std::cmp::Ordering::Less => "negative",
            std::cmp::Ordering::Equal => "neutral",
        };

        Article {
            title: self.title,
            source: self
                .source
                .and_then(|s| s.title)
                .unwrap_or_else(|| "CryptoPanic".into()),
            url: self.url.unwrap_or_default(),
            published_at: self.published_at.unwrap_or_default(),
            sentiment: sentiment.into(),
        }
    }
}
