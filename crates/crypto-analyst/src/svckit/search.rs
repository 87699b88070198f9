//! Web Search Tool
//!
//! Tavily search with a mock fallback when no key is set or the call fails.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use agent_core::{
    AgentError, Result as CoreResult, Tool, ToolCall, ToolResult, ToolSchema,
    tool::ParameterSchema,
};

use super::MAX_RESULTS;
use crate::error::{AnalystError, Result};
use crate::model::{SearchHit, SearchReport};
use crate::{env_opt, http_client};

pub const SEARCH_TOOL: &str = "search";
pub const DEFAULT_MAX_RESULTS: usize = 5;

const TAVILY_API_BASE: &str = "https://api.tavily.com";

#[derive(Clone, Debug)]
pub struct TavilyConfig {
    pub api_key: Option<String>,
    pub base_url: String,
}

impl Default for TavilyConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: TAVILY_API_BASE.into(),
        }
    }
}

impl TavilyConfig {
    /// Read `TAVILY_API_KEY` and `TAVILY_BASE_URL`
    pub fn from_env() -> Self {
        Self {
            api_key: env_opt("TAVILY_API_KEY"),
            base_url: env_opt("TAVILY_BASE_URL")
                .unwrap_or_else(|| TAVILY_API_BASE.into())
                .trim_end_matches('/')
                .to_string(),
        }
    }
}

/// Tool to search the web
pub struct TavilySearchTool {
    client: reqwest::Client,
    config: TavilyConfig,
}

impl TavilySearchTool {
    pub fn new(config: TavilyConfig) -> Result<Self> {
        Ok(Self {
            client: http_client()?,
            config,
        })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(TavilyConfig::from_env())
    }

    pub async fn search(&self, query: &str, max_results: usize) -> SearchReport {
        let Some(api_key) = self.config.api_key.as_deref() else {
            tracing::warn!("TAVILY_API_KEY not set, returning mock results");
            return Self::mock_search(query, max_results);
        };

        match self.search_live(api_key, query, max_results).await {
            Ok(report) => {
                tracing::info!(query, "Tavily search completed");
                report
            }
            Err(e) => {
                tracing::error!(query, error = %e, "Error in Tavily search");
                Self::mock_search(query, max_results)
            }
        }
    }

    async fn search_live(&self, api_key: &str, query: &str, max_results: usize) -> Result<SearchReport> {
        let response = self
            .client
            .post(format!("{}/search", self.config.base_url))
            .json(&SearchRequest {
                api_key,
                query,
                max_results,
                search_depth: "basic",
                include_answer: true,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AnalystError::Upstream {
                service: "tavily",
                status: status.as_u16(),
            });
        }

        let body: SearchResponse = response.json().await?;
        Ok(SearchReport {
            query: query.to_string(),
            answer: body.answer.unwrap_or_default(),
            results: body
                .results
                .into_iter()
                .map(|r| SearchHit {
                    title: r.title,
                    url: r.url,
                    content: r.content,
                    score: r.score,
                })
                .collect(),
        })
    }

    #[allow(clippy::cast_precision_loss)]
    fn mock_search(query: &str, max_results: usize) -> SearchReport {
        SearchReport {
            query: query.to_string(),
            answer: format!(
                "This is a simulated answer for: {query}. The Tavily API key is not configured."
            ),
            results: (0..max_results)
                .map(|i| SearchHit {
                    title: format!("Result {} for {query}", i + 1),
                    url: format!("https://example.com/result-{}", i + 1),
                    content: format!("This is mock content for result {} about {query}.", i + 1),
                    score: 0.1f64.mul_add(-(i as f64), 0.9),
                })
                .collect(),
        }
    }
}

#[async_trait]
impl Tool for TavilySearchTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: SEARCH_TOOL.into(),
            description: "Search the web for information. Input should be a search query string."
                .into(),
            parameters: vec![
                ParameterSchema::required("query", "Search query"),
                ParameterSchema::optional("max_results", "Maximum number of results to return"),
            ],
        }
    }

    async fn execute(&self, call: &ToolCall) -> CoreResult<ToolResult> {
        let query = call
            .str_arg("query")
            .ok_or_else(|| AgentError::ToolValidation("query must be a string".into()))?;
        let max_results = call
            .usize_arg("max_results")
            .unwrap_or(DEFAULT_MAX_RESULTS)
            .min(MAX_RESULTS);

        let report = self.search(query, max_results).await;
        ToolResult::json(SEARCH_TOOL, &report)
    }
}

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    api_key: &'a str,
    query: &'a str,
    max_results: usize,
    search_depth: &'a str,
    include_answer: bool,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    answer: Option<String>,
    #[serde(default)]
    results: Vec<RawHit>,
}

#[derive(Debug, Deserialize)]
struct RawHit {
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    score: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_mock_results_without_key() {
        let tool = TavilySearchTool::new(TavilyConfig::default()).unwrap();
        let report = tool.search("What is Bitcoin?", 3).await;

        assert_eq!(report.query, "What is Bitcoin?");
        assert_eq!(report.results.len(), 3);
        assert_eq!(report.results[0].title, "Result 1 for What is Bitcoin?");
        assert!((report.results[0].score - 0.9).abs() < 1e-9);
        assert!((report.results[2].score - 0.7).abs() < 1e-9);
        assert!(report.answer.contains("not configured"));
    }

    #[tokio::test]
    async fn test_oversized_max_results_is_clamped() {
        let tool = TavilySearchTool::new(TavilyConfig::default()).unwrap();
        let mut args = serde_json::Map::new();
        args.insert("query".into(), json!("BTC"));
        args.insert("max_results".into(), json!("2000000"));

        let result = tool.execute(&ToolCall::new(SEARCH_TOOL, args)).await.unwrap();
        let data = result.data.unwrap();
        assert_eq!(data["results"].as_array().unwrap().len(), MAX_RESULTS);
    }

    #[tokio::test]
    async fn test_live_search() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/search"))
            .and(body_partial_json(json!({
                "api_key": "tv-key",
                "query": "ETH staking",
                "max_results": 2,
                "search_depth": "basic",
                "include_answer": true
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "answer": "Staking yields vary.",
                "results": [
                    { "title": "Guide", "url": "https://a.example", "content": "...", "score": 0.87 }
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let tool = TavilySearchTool::new(TavilyConfig {
            api_key: Some("tv-key".into()),
            base_url: server.uri(),
        })
        .unwrap();

        let report = tool.search("ETH staking", 2).await;
        assert_eq!(report.answer, "Staking yields vary.");
        assert_eq!(report.results.len(), 1);
        assert_eq!(report.results[0].url, "https://a.example");
    }

    #[tokio::test]
    async fn test_live_failure_falls_back() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let tool = TavilySearchTool::new(TavilyConfig {
            api_key: Some("bad".into()),
            base_url: server.uri(),
        })
        .unwrap();

        let mut args = serde_json::Map::new();
        args.insert("query".into(), json!("SOL"));
        let result = tool.execute(&ToolCall::new(SEARCH_TOOL, args)).await.unwrap();
        let data = result.data.unwrap();
        assert_eq!(data["results"].as_array().unwrap().len(), DEFAULT_MAX_RESULTS);
    }
}
