//! crypto-agent
//!
//! Terminal front end for the crypto analysis agents: the ReAct agent
//! (`react`), the fixed analysis workflow (`graph`) and the notification
//! tools (`notify`, `email`).

mod cli;
mod commands;
mod console;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, Commands};
use crate::commands::{Context, graph, notify, react};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment first so RUST_LOG from .env applies
    dotenvy::dotenv().ok();

    // Logs go to stderr; stdout belongs to the rendered output
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let ctx = Context::from_cli(&cli)?;

    tracing::debug!(provider = %ctx.settings.kind, model = %ctx.settings.model, "Starting crypto-agent");

    match &cli.command {
        Commands::React(args) => react::run(&ctx, args).await,
        Commands::Graph(args) => graph::run(&ctx, args).await,
        Commands::Notify(args) => notify::notify(&ctx, args).await,
        Commands::Email(args) => notify::email(&ctx, args).await,
    }
}
