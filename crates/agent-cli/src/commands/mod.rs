//! Subcommand handlers

pub mod graph;
pub mod notify;
pub mod react;

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use agent_core::{LlmProvider, OutputSink, Panel, Tone};
use agent_runtime::{LlmSettings, ProviderKind, build_provider};
use crypto_analyst::AnalystToolkit;

use crate::cli::Cli;
use crate::console::ConsoleSink;

/// Words that end an interactive session
const EXIT_WORDS: [&str; 3] = ["exit", "quit", "q"];

/// Settings and collaborators shared by every subcommand
pub struct Context {
    pub settings: LlmSettings,
    pub quiet: bool,
    pub sink: Arc<dyn OutputSink>,
}

impl Context {
    pub fn from_cli(cli: &Cli) -> anyhow::Result<Self> {
        let kind = cli
            .provider
            .as_deref()
            .map(str::parse::<ProviderKind>)
            .transpose()?;
        let settings = LlmSettings::from_env()?.with_overrides(kind, cli.model.clone());

        Ok(Self {
            settings,
            quiet: cli.quiet,
            sink: Arc::new(ConsoleSink::new()),
        })
    }

    pub fn provider(&self) -> anyhow::Result<Arc<dyn LlmProvider>> {
        Ok(build_provider(&self.settings)?)
    }

    pub fn toolkit(&self) -> anyhow::Result<AnalystToolkit> {
        Ok(AnalystToolkit::from_env(self.sink.clone())?)
    }

    /// Banner plus the active provider and model
    pub fn welcome(&self, title: &str, body: &str) {
        self.sink.panel(Panel::new(title, body.trim(), Tone::Info));
        self.sink.line("Configuration:", Tone::Warning);
        self.sink
            .line(&format!("  LLM Provider: {}", self.settings.kind), Tone::Success);
        self.sink
            .line(&format!("  Model: {}", self.settings.model), Tone::Success);
    }
}

/// Outcome of one interactive prompt
#[derive(Debug, PartialEq, Eq)]
pub enum Input {
    Line(String),
    Exit,
}

/// Interpret a raw line: blank means `default`, exit words and end of input stop the session
pub fn interpret(raw: Option<&str>, default: &str) -> Input {
    let Some(raw) = raw else {
        return Input::Exit;
    };
    let line = raw.trim();
    if EXIT_WORDS.contains(&line.to_ascii_lowercase().as_str()) {
        Input::Exit
    } else if line.is_empty() {
        Input::Line(default.to_string())
    } else {
        Input::Line(line.to_string())
    }
}

/// Ask on stdout, read one line from stdin
pub fn prompt(label: &str, default: &str) -> io::Result<Input> {
    let mut stdout = io::stdout();
    write!(stdout, "\n{label} [{default}]: ")?;
    stdout.flush()?;

    let mut buffer = String::new();
    let read = io::stdin().lock().read_line(&mut buffer)?;
    Ok(interpret((read > 0).then_some(buffer.as_str()), default))
}

/// `1234567.891` → `1,234,567.89`
pub fn format_usd(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if value < 0.0 { "-" } else { "" };
    format!("{sign}{grouped}.{fraction}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interpret() {
        assert_eq!(interpret(Some("  \n"), "BTC"), Input::Line("BTC".into()));
        assert_eq!(interpret(Some("eth\n"), "BTC"), Input::Line("eth".into()));
        assert_eq!(interpret(Some("QUIT\n"), "BTC"), Input::Exit);
        assert_eq!(interpret(Some("q"), "BTC"), Input::Exit);
        assert_eq!(interpret(None, "BTC"), Input::Exit);
    }

    #[test]
    fn test_format_usd() {
        assert_eq!(format_usd(50_000.0), "50,000.00");
        assert_eq!(format_usd(1_234_567.891), "1,234,567.89");
        assert_eq!(format_usd(999.5), "999.50");
        assert_eq!(format_usd(0.0), "0.00");
        assert_eq!(format_usd(-1500.0), "-1,500.00");
    }
}
