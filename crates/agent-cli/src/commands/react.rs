//! `crypto-agent react`

use agent_core::{Agent, AgentBuilder, Tone};

use super::{Context, Input, prompt};
use crate::cli::ReactArgs;
use crate::console::separator;

const DEFAULT_QUESTION: &str = "What is the current price of Bitcoin?";

const EXAMPLE_QUESTIONS: [&str; 5] = [
    "What is the current price of Bitcoin?",
    "Compare the prices of Bitcoin and Ethereum",
    "What is the market cap rank of Solana?",
    "Tell me about recent news for BTC",
    "What are the 24h price changes for BTC and ETH?",
];

const BATCH_QUESTIONS: [&str; 3] = [
    "What is the current price of Bitcoin?",
    "Compare Bitcoin and Ethereum prices",
    "What is the market cap of Solana?",
];

const WELCOME: &str = "
ReAct Agent Demo

The agent answers questions about cryptocurrencies by alternating
reasoning and tool use:
- search the web for information
- retrieve real-time price data
- read recent news

Each thought, action and observation is shown as it happens.";

fn build_agent(ctx: &Context, args: &ReactArgs) -> anyhow::Result<Agent> {
    let toolkit = ctx.toolkit()?;
    let tools = if args.indicators {
        toolkit.react_registry_with_indicators()?
    } else {
        toolkit.react_registry()?
    };

    Ok(AgentBuilder::new()
        .provider(ctx.provider()?)
        .tools(tools)
        .sink(ctx.sink.clone())
        .model(ctx.settings.model.clone())
        .max_iterations(args.max_iterations)
        .verbose(!ctx.quiet)
        .build()?)
}

pub async fn run(ctx: &Context, args: &ReactArgs) -> anyhow::Result<()> {
    let mut agent = build_agent(ctx, args)?;

    if args.batch {
        run_batch(ctx, &mut agent).await;
        return Ok(());
    }

    if let Some(question) = &args.question {
        agent.run(question).await?;
        return Ok(());
    }

    interactive(ctx, &mut agent).await
}

async fn run_batch(ctx: &Context, agent: &mut Agent) {
    let total = BATCH_QUESTIONS.len();
    for (i, question) in BATCH_QUESTIONS.iter().enumerate() {
        ctx.sink.line(&format!("\n{}", separator()), Tone::Info);
        ctx.sink
            .line(&format!("Question {}/{total}", i + 1), Tone::Info);
        ctx.sink.line(&separator(), Tone::Info);

        if let Err(e) = agent.run(question).await {
            tracing::error!(question, error = %e, "Batch question failed");
            ctx.sink.line(&format!("Error: {}", e.user_message()), Tone::Error);
        }
        agent.reset();
    }

    ctx.sink.line(&format!("\n{}", separator()), Tone::Success);
    ctx.sink.line("✓ Batch demo completed!", Tone::Success);
}

async fn interactive(ctx: &Context, agent: &mut Agent) -> anyhow::Result<()> {
    ctx.welcome("Welcome", WELCOME);

    ctx.sink.line("\nExample questions you can ask:", Tone::Warning);
    for (i, question) in EXAMPLE_QUESTIONS.iter().enumerate() {
        ctx.sink.line(&format!("  {}. {question}", i + 1), Tone::Info);
    }

    loop {
        let question = match prompt("Your question", DEFAULT_QUESTION)? {
            Input::Line(question) => question,
            Input::Exit => break,
        };

        ctx.sink.line(&separator(), Tone::Info);
        if let Err(e) = agent.run(&question).await {
            tracing::error!(error = %e, "Question failed");
            ctx.sink.line(&format!("Error: {}", e.user_message()), Tone::Error);
            ctx.sink.line("Let's try another question...", Tone::Warning);
        }
        agent.reset();
    }

    ctx.sink.line("\nGoodbye! 👋", Tone::Warning);
    Ok(())
}
