//! `crypto-agent notify` and `crypto-agent email`

use agent_core::Tone;
use crypto_analyst::Channel;
use crypto_analyst::svckit::Notifier;

use super::Context;
use crate::cli::{EmailArgs, NotifyArgs};

pub async fn notify(ctx: &Context, args: &NotifyArgs) -> anyhow::Result<()> {
    let channel = Channel::parse_or_console(&args.channel);
    let receipt = ctx.toolkit()?.notifier.notify(&args.message, channel).await;
    report(ctx, &serde_json::to_string_pretty(&receipt)?, receipt.success)
}

pub async fn email(ctx: &Context, args: &EmailArgs) -> anyhow::Result<()> {
    let receipt = ctx
        .toolkit()?
        .email
        .send(&args.to, &args.subject, &args.body, args.from.as_deref())
        .await;
    report(ctx, &serde_json::to_string_pretty(&receipt)?, receipt.success)
}

fn report(ctx: &Context, receipt: &str, success: bool) -> anyhow::Result<()> {
    let tone = if success { Tone::Success } else { Tone::Error };
    ctx.sink.line(receipt, tone);
    if success {
        Ok(())
    } else {
        anyhow::bail!("delivery failed")
    }
}
