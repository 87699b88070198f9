//! Notification Tool
//!
//! Console, Slack and Discord delivery. Every failure is reported in the
//! receipt; nothing here returns an error to the caller.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use agent_core::{
    AgentError, OutputSink, Panel, Result as CoreResult, Tone, Tool, ToolCall, ToolResult,
    ToolSchema, tool::ParameterSchema,
};

use crate::error::Result;
use crate::model::{Channel, NotificationReceipt};
use crate::{env_opt, http_client};

pub const NOTIFICATION_TOOL: &str = "send_notification";
pub const WEBHOOK_NOT_CONFIGURED: &str = "Webhook not configured";

/// Delivers a message on a channel
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, message: &str, channel: Channel) -> NotificationReceipt;
}

#[derive(Clone, Debug, Default)]
pub struct NotificationConfig {
    pub slack_webhook: Option<String>,
    pub discord_webhook: Option<String>,
}

impl NotificationConfig {
    /// Read `SLACK_WEBHOOK_URL` and `DISCORD_WEBHOOK_URL`
    pub fn from_env() -> Self {
        Self {
            slack_webhook: env_opt("SLACK_WEBHOOK_URL"),
            discord_webhook: env_opt("DISCORD_WEBHOOK_URL"),
        }
    }
}

/// Tool to send notifications via various channels
pub struct NotificationTool {
    client: reqwest::Client,
    config: NotificationConfig,
    sink: Arc<dyn OutputSink>,
}

impl NotificationTool {
    pub fn new(config: NotificationConfig, sink: Arc<dyn OutputSink>) -> Result<Self> {
        Ok(Self {
            client: http_client()?,
            config,
            sink,
        })
    }

    pub fn from_env(sink: Arc<dyn OutputSink>) -> Result<Self> {
        Self::new(NotificationConfig::from_env(), sink)
    }

    fn send_console(&self, message: &str) -> NotificationReceipt {
        self.sink
            .panel(Panel::new("📢 Notification", message, Tone::Success));
        NotificationReceipt::delivered(Channel::Console, message)
    }

    async fn send_webhook(
        &self,
        channel: Channel,
        webhook: Option<&str>,
        payload: serde_json::Value,
        message: &str,
    ) -> NotificationReceipt {
        let Some(url) = webhook else {
            tracing::warn!(%channel, "Webhook URL not configured");
            return NotificationReceipt::failed(channel, WEBHOOK_NOT_CONFIGURED);
        };

        let sent = self
            .client
            .post(url)
            .json(&payload)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status);

        match sent {
            Ok(_) => {
                tracing::info!(%channel, "Notification sent successfully");
                NotificationReceipt::delivered(channel, message)
            }
            Err(e) => {
                tracing::error!(%channel, error = %e, "Error sending notification");
                NotificationReceipt::failed(channel, e.to_string())
            }
        }
    }
}

#[async_trait]
impl Notifier for NotificationTool {
    async fn notify(&self, message: &str, channel: Channel) -> NotificationReceipt {
        match channel {
            Channel::Console => self.send_console(message),
            Channel::Slack => {
                self.send_webhook(
                    channel,
                    self.config.slack_webhook.as_deref(),
                    json!({ "text": message }),
                    message,
                )
                .await
            }
            Channel::Discord => {
                self.send_webhook(
                    channel,
                    self.config.discord_webhook.as_deref(),
                    json!({ "content": message }),
                    message,
                )
                .await
            }
        }
    }
}

#[async_trait]
impl Tool for NotificationTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: NOTIFICATION_TOOL.into(),
            description:
                "Send a notification message. Supports console, slack, and discord channels.".into(),
            parameters: vec![
                ParameterSchema::required("message", "Message to send"),
                ParameterSchema::optional("channel", "Channel to send to (console, slack, discord)"),
            ],
        }
    }

    async fn execute(&self, call: &ToolCall) -> CoreResult<ToolResult> {
        let message = call
            .str_arg("message")
            .ok_or_else(|| AgentError::ToolValidation("message must be a string".into()))?;
        let channel = call
            .str_arg("channel")
            .map_or(Channel::Console, Channel::parse_or_console);

        let receipt = self.notify(message, channel).await;
        let mut result = ToolResult::json(NOTIFICATION_TOOL, &receipt)?;
        result.success = receipt.success;
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agent_core::MemorySink;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn tool_with(config: NotificationConfig) -> (NotificationTool, Arc<MemorySink>) {
        let sink = Arc::new(MemorySink::new());
        let tool = NotificationTool::new(config, sink.clone()).unwrap();
        (tool, sink)
    }

    #[tokio::test]
    async fn test_console_renders_panel() {
        let (tool, sink) = tool_with(NotificationConfig::default());
        let receipt = tool.notify("Test message", Channel::Console).await;

        assert!(receipt.success);
        assert_eq!(receipt.channel, Channel::Console);
        assert_eq!(receipt.message.as_deref(), Some("Test message"));

        let panels = sink.panels();
        assert_eq!(panels.len(), 1);
        assert_eq!(panels[0].title.as_deref(), Some("📢 Notification"));
        assert_eq!(panels[0].body, "Test message");
    }

    #[tokio::test]
    async fn test_missing_webhook_reports_failure() {
        let (tool, _sink) = tool_with(NotificationConfig::default());
        let receipt = tool.notify("hi", Channel::Discord).await;

        assert!(!receipt.success);
        assert_eq!(receipt.channel, Channel::Discord);
        assert_eq!(receipt.error.as_deref(), Some(WEBHOOK_NOT_CONFIGURED));
    }

    #[tokio::test]
    async fn test_slack_posts_text_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/hooks/slack"))
            .and(body_json(serde_json::json!({ "text": "BTC looks strong" })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let (tool, _sink) = tool_with(NotificationConfig {
            slack_webhook: Some(format!("{}/hooks/slack", server.uri())),
            discord_webhook: None,
        });

        let receipt = tool.notify("BTC looks strong", Channel::Slack).await;
        assert!(receipt.success);
    }

    #[tokio::test]
    async fn test_discord_http_error_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_json(serde_json::json!({ "content": "hello" })))
            .respond_with(ResponseTemplate::new(400))
            .mount(&server)
            .await;

        let (tool, _sink) = tool_with(NotificationConfig {
            slack_webhook: None,
            discord_webhook: Some(server.uri()),
        });

        let receipt = tool.notify("hello", Channel::Discord).await;
        assert!(!receipt.success);
        assert!(receipt.error.unwrap().contains("400"));
    }

    #[tokio::test]
    async fn test_tool_unknown_channel_uses_console() {
        let (tool, sink) = tool_with(NotificationConfig::default());
        let mut args = serde_json::Map::new();
        args.insert("message".into(), serde_json::json!("ping"));
        args.insert("channel".into(), serde_json::json!("pager"));

        let result = tool
            .execute(&ToolCall::new(NOTIFICATION_TOOL, args))
            .await
            .unwrap();

        assert!(result.success);
        assert_eq!(result.data.unwrap()["channel"], "console");
        assert_eq!(sink.panels().len(), 1);
    }
}
