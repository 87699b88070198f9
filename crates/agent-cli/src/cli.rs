use clap::{Args, Parser, Subcommand};

use agent_core::reasoning::DEFAULT_MAX_ITERATIONS;

#[derive(Parser, Debug)]
#[command(name = "crypto-agent")]
#[command(version, about = "Crypto analysis agents: ReAct reasoning and a fixed analysis workflow")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// LLM provider (openai, anthropic, gemini); overrides DEFAULT_LLM_PROVIDER
    #[arg(long, global = true)]
    pub provider: Option<String>,

    /// Model name; overrides DEFAULT_MODEL_NAME
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// Render only questions, answers and results
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Answer questions with the ReAct agent
    React(ReactArgs),

    /// Run the five-stage analysis workflow
    Graph(GraphArgs),

    /// Send a notification message
    Notify(NotifyArgs),

    /// Send an email over SMTP
    Email(EmailArgs),
}

#[derive(Args, Debug)]
pub struct ReactArgs {
    /// Question to answer; starts an interactive session when omitted
    pub question: Option<String>,

    /// Run the predefined batch of questions
    #[arg(long, conflicts_with = "question")]
    pub batch: bool,

    /// Reasoning iteration budget
    #[arg(long, default_value_t = DEFAULT_MAX_ITERATIONS)]
    pub max_iterations: usize,

    /// Also give the agent the technical indicator tool
    #[arg(long)]
    pub indicators: bool,
}

#[derive(Args, Debug)]
pub struct GraphArgs {
    /// Symbol to analyze; starts an interactive session when omitted
    pub symbol: Option<String>,

    /// Action label recorded with the run
    #[arg(long, default_value = crypto_analyst::workflow::DEFAULT_ACTION)]
    pub action: String,

    /// Extra notification channel (slack, discord); repeatable
    #[arg(long = "notify", value_name = "CHANNEL")]
    pub notify: Vec<String>,

    /// Analyze BTC, ETH and SOL in turn
    #[arg(long, conflicts_with_all = ["symbol", "compare"])]
    pub batch: bool,

    /// Compare comma-separated symbols side by side
    #[arg(
        long,
        value_name = "SYMBOLS",
        num_args = 0..=1,
        default_missing_value = "BTC,ETH,SOL",
        conflicts_with = "symbol"
    )]
    pub compare: Option<String>,
}

#[derive(Args, Debug)]
pub struct NotifyArgs {
    /// Message to send
    pub message: String,

    /// Channel (console, slack, discord)
    #[arg(long, default_value = "console")]
    pub channel: String,
}

#[derive(Args, Debug)]
pub struct EmailArgs {
    #[arg(long)]
    pub to: String,

    #[arg(long)]
    pub subject: String,

    #[arg(long)]
    pub body: String,

    /// Sender address; defaults to SMTP_USER
    #[arg(long)]
    pub from: Option<String>,
}
