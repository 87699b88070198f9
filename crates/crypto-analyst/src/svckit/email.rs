//! Email Notification Tool
//!
//! SMTP delivery with STARTTLS.

use async_trait::async_trait;
use lettre::message::{Mailbox, header::ContentType};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use agent_core::{
    AgentError, Result as CoreResult, Tool, ToolCall, ToolResult, ToolSchema,
    tool::ParameterSchema,
};

use crate::env_opt;
use crate::error::{AnalystError, Result};
use crate::model::EmailReceipt;

pub const EMAIL_TOOL: &str = "send_email";
pub const CREDENTIALS_NOT_CONFIGURED: &str = "Email credentials not configured";

const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
const DEFAULT_SMTP_PORT: u16 = 587;

#[derive(Clone, Debug)]
pub struct EmailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_user: Option<String>,
    pub smtp_password: Option<String>,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            smtp_host: DEFAULT_SMTP_HOST.into(),
            smtp_port: DEFAULT_SMTP_PORT,
            smtp_user: None,
            smtp_password: None,
        }
    }
}

impl EmailConfig {
    /// Read `SMTP_HOST`, `SMTP_PORT`, `SMTP_USER` and `SMTP_PASSWORD`
    pub fn from_env() -> Result<Self> {
        let smtp_port = match env_opt("SMTP_PORT") {
            Some(port) => port
                .trim()
                .parse()
                .map_err(|_| AnalystError::Config(format!("Invalid SMTP_PORT: {port}")))?,
            None => DEFAULT_SMTP_PORT,
        };

        Ok(Self {
            smtp_host: env_opt("SMTP_HOST").unwrap_or_else(|| DEFAULT_SMTP_HOST.into()),
            smtp_port,
            smtp_user: env_opt("SMTP_USER"),
            smtp_password: env_opt("SMTP_PASSWORD"),
        })
    }
}

/// Tool to send email notifications
pub struct EmailNotifier {
    config: EmailConfig,
}

impl EmailNotifier {
    pub const fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    pub fn from_env() -> Result<Self> {
        Ok(Self::new(EmailConfig::from_env()?))
    }

    /// Send a plain-text email; the sender defaults to `SMTP_USER`
    pub async fn send(&self, to: &str, subject: &str, body: &str, from: Option<&str>) -> EmailReceipt {
        let (Some(user), Some(password)) = (
            self.config.smtp_user.as_deref(),
            self.config.smtp_password.as_deref(),
        ) else {
            tracing::warn!("Email credentials not configured");
            return EmailReceipt::failed(CREDENTIALS_NOT_CONFIGURED);
        };

        let from = from.unwrap_or(user);
        match self.deliver(user, password, from, to, subject, body).await {
            Ok(()) => {
                tracing::info!(to, "Email sent");
                EmailReceipt::sent(to, subject)
            }
            Err(e) => {
                tracing::error!(to, error = %e, "Error sending email");
                EmailReceipt::failed(e.to_string())
            }
        }
    }

    fn build_message(from: &str, to: &str, subject: &str, body: &str) -> Result<Message> {
        let from: Mailbox = from
            .parse()
            .map_err(|e| AnalystError::Email(format!("Invalid sender address '{from}': {e}")))?;
        let to: Mailbox = to
            .parse()
            .map_err(|e| AnalystError::Email(format!("Invalid recipient address '{to}': {e}")))?;

        Message::builder()
            .from(from)
            .to(to)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| AnalystError::Email(e.to_string()))
    }

    async fn deliver(
        &self,
        user: &str,
        password: &str,
        from: &str,
        to: &str,
        subject: &str,
        body: &str,
    ) -> Result<()> {
        let message = Self::build_message(from, to, subject, body)?;

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.smtp_host)
            .map_err(|e| AnalystError::Email(e.to_string()))?
            .port(self.config.smtp_port)
            .credentials(Credentials::new(user.to_string(), password.to_string()))
            .build();

        mailer
            .send(message)
            .await
            .map_err(|e| AnalystError::Email(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl Tool for EmailNotifier {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: EMAIL_TOOL.into(),
            description: "Send an email notification".into(),
            parameters: vec![
                ParameterSchema::required("to", "Recipient email address"),
                ParameterSchema::required("subject", "Email subject"),
                ParameterSchema::required("body", "Email body"),
                ParameterSchema::optional("from", "Sender address (defaults to SMTP_USER)"),
            ],
        }
    }

    async fn execute(&self, call: &ToolCall) -> CoreResult<ToolResult> {
        let field = |key: &str| {
            call.str_arg(key)
                .ok_or_else(|| AgentError::ToolValidation(format!("{key} must be a string")))
        };
        let (to, subject, body) = (field("to")?, field("subject")?, field("body")?);

        let receipt = self.send(to, subject, body, call.str_arg("from")).await;
        let mut result = ToolResult::json(EMAIL_TOOL, &receipt)?;
        result.success = receipt.success;
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured() -> EmailNotifier {
        EmailNotifier::new(EmailConfig {
            smtp_user: Some("alerts@example.com".into()),
            smtp_password: Some("secret".into()),
            ..EmailConfig::default()
        })
    }

    #[test]
    fn test_defaults() {
        let config = EmailConfig::default();
        assert_eq!(config.smtp_host, "smtp.gmail.com");
        assert_eq!(config.smtp_port, 587);
    }

    #[tokio::test]
    async fn test_missing_credentials() {
        let notifier = EmailNotifier::new(EmailConfig::default());
        let receipt = notifier.send("a@example.com", "hi", "body", None).await;

        assert!(!receipt.success);
        assert_eq!(receipt.error.as_deref(), Some(CREDENTIALS_NOT_CONFIGURED));
    }

    #[tokio::test]
    async fn test_invalid_recipient_is_reported() {
        let receipt = configured().send("not-an-address", "hi", "body", None).await;
        assert!(!receipt.success);
        assert!(receipt.error.unwrap().contains("Invalid recipient address"));
    }

    #[test]
    fn test_build_message() {
        let message =
            EmailNotifier::build_message("alerts@example.com", "me@example.com", "BTC", "HOLD")
                .unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();
        assert!(raw.contains("Subject: BTC"));
        assert!(raw.contains("To: me@example.com"));
    }

    #[tokio::test]
    async fn test_tool_requires_subject() {
        let mut args = serde_json::Map::new();
        args.insert("to".into(), serde_json::json!("me@example.com"));
        args.insert("body".into(), serde_json::json!("text"));

        let err = configured()
            .execute(&ToolCall::new(EMAIL_TOOL, args))
            .await
            .unwrap_err();
        assert!(matches!(err, AgentError::ToolValidation(_)));
    }
}
