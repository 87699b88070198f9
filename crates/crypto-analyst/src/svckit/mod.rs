//! Service Kit - Agent Tools
//!
//! Domain-specific tools that implement `agent_core::Tool` for the crypto analyst.
//! Result counts the model asks for are capped at [`MAX_RESULTS`].

mod email;
mod indicators;
mod news;
mod notification;
mod price;
mod search;

/// Upper bound on model-requested result counts (news articles, search hits)
pub const MAX_RESULTS: usize = 20;

pub use email::{EMAIL_TOOL, EmailConfig, EmailNotifier};
pub use indicators::{CryptoIndicatorTool, DEFAULT_TIMEFRAME, INDICATOR_TOOL};
pub use news::{CryptoNewsTool, CryptoPanicConfig, DEFAULT_NEWS_LIMIT, NEWS_TOOL, NewsSource};
pub use notification::{NOTIFICATION_TOOL, NotificationConfig, NotificationTool, Notifier};
pub use price::{CryptoPriceTool, PRICE_TOOL};
pub use search::{SEARCH_TOOL, TavilyConfig, TavilySearchTool};
