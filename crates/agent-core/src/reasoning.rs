//! Reasoning Loop
//!
//! Implements the ReAct (Reason + Act) pattern over a plain-text protocol.
//! Each iteration renders the prompt (tool catalog, question, history),
//! asks the model for the next step, and either returns the final answer or
//! runs the requested tool and records the observation.
//!
//! Model replies are parsed by literal markers:
//!
//! ```text
//! Thought: I need the current BTC price
//! Action: get_crypto_price
//! Action Input: {"symbol": "BTC"}
//! ```
//!
//! and terminate with `Final Answer: ...`.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{AgentError, Result};
use crate::provider::{GenerationOptions, LlmProvider};
use crate::render::{NullSink, OutputSink, Panel, Tone};
use crate::tool::{Arguments, ToolCall, ToolRegistry};

/// Marker that ends the loop; everything after it is the answer
pub const FINAL_ANSWER_MARKER: &str = "Final Answer:";
const THOUGHT_MARKER: &str = "Thought:";
const ACTION_MARKER: &str = "Action:";
const ACTION_INPUT_MARKER: &str = "Action Input:";

/// Returned when the iteration budget runs out without a final answer
pub const MAX_ITERATIONS_MESSAGE: &str = "Max iterations reached.";

/// Default iteration budget
pub const DEFAULT_MAX_ITERATIONS: usize = 10;

/// One iteration of the loop. Never mutated after it is recorded.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AgentStep {
    pub thought: String,
    pub action: Option<String>,
    pub action_input: Option<Arguments>,
    pub observation: Option<String>,
}

/// A model reply, classified
#[derive(Clone, Debug, PartialEq)]
pub enum ModelReply {
    /// Text following the final-answer marker
    FinalAnswer(String),
    /// An intermediate step; action and input may be missing
    Step {
        thought: String,
        action: Option<String>,
        action_input: Option<Arguments>,
    },
}

/// Loop states. Transitions depend only on the final-answer marker and
/// the iteration count.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    Iterating,
    TerminalAnswer,
    Exhausted,
}

/// Result of a run with bookkeeping
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunOutcome {
    pub answer: String,
    pub state: LoopState,
    pub llm_calls: usize,
}

/// Classify a raw model reply.
pub fn parse_reply(text: &str) -> ModelReply {
    if let Some((_, answer)) = text.split_once(FINAL_ANSWER_MARKER) {
        return ModelReply::FinalAnswer(answer.trim().to_string());
    }

    let before_action = text.split(ACTION_MARKER).next().unwrap_or_default();
    let thought = before_action.replace(THOUGHT_MARKER, "").trim().to_string();

    let (action, action_input) = parse_action(text);
    ModelReply::Step {
        thought,
        action,
        action_input,
    }
}

/// Scan lines for `Action:` and `Action Input:`. Later lines override earlier ones.
fn parse_action(text: &str) -> (Option<String>, Option<Arguments>) {
    let mut action = None;
    let mut action_input = None;

    for line in text.trim().lines() {
        if let Some(rest) = line.strip_prefix(ACTION_MARKER) {
            let name = rest.trim();
            action = (!name.is_empty()).then(|| name.to_string());
        } else if let Some(rest) = line.strip_prefix(ACTION_INPUT_MARKER) {
            action_input = decode_action_input(rest.trim());
        }
    }

    (action, action_input)
}

/// JSON objects are taken as-is and empty JSON values (`null`, `false`, `0`,
/// `""`, `[]`) mean no input. Anything else is wrapped as `{"query": raw}`.
fn decode_action_input(raw: &str) -> Option<Arguments> {
    use serde_json::Value;

    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => Some(map),
        Ok(value) if is_empty_value(&value) => None,
        _ => {
            let mut map = Arguments::new();
            map.insert("query".into(), Value::String(raw.to_string()));
            Some(map)
        }
    }
}

fn is_empty_value(value: &serde_json::Value) -> bool {
    use serde_json::Value;

    match value {
        Value::Null | Value::Bool(false) => true,
        Value::Number(n) => n.as_f64().is_some_and(|f| f.abs() < f64::EPSILON),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

/// Render history steps as Thought/Action/Action Input/Observation lines
pub fn format_history(history: &[AgentStep]) -> String {
    let mut lines = Vec::new();

    for step in history {
        lines.push(format!("{THOUGHT_MARKER} {}", step.thought));
        if let Some(action) = &step.action {
            lines.push(format!("{ACTION_MARKER} {action}"));
            let input = step
                .action_input
                .as_ref()
                .map_or_else(|| "null".to_string(), |args| serde_json::Value::Object(args.clone()).to_string());
            lines.push(format!("{ACTION_INPUT_MARKER} {input}"));
        }
        if let Some(observation) = step.observation.as_deref().filter(|o| !o.is_empty()) {
            lines.push(format!("Observation: {observation}"));
        }
    }

    lines.join("\n")
}

fn render_prompt(tools: &str, tool_names: &str, question: &str, history: &str) -> String {
    format!(
        r"You are a cryptocurrency analysis assistant with access to various tools.

Available Tools:
{tools}

Use the following format:

Thought: Think about what information you need
Action: the action to take, should be one of [{tool_names}]
Action Input: the input to the action (JSON format)
Observation: the result of the action
... (this Thought/Action/Action Input/Observation can repeat N times)
Thought: I now know the final answer
Final Answer: the final answer to the original question

Begin!

Question: {question}
{history}
Thought:"
    )
}

/// Agent configuration
#[derive(Clone, Debug)]
pub struct AgentConfig {
    /// Maximum reasoning iterations before giving up
    pub max_iterations: usize,

    /// Generation options
    pub generation: GenerationOptions,

    /// Render every step, not just question and answer
    pub verbose: bool,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            generation: GenerationOptions::default(),
            verbose: true,
        }
    }
}

/// The ReAct agent. Owns its history; one run at a time.
pub struct Agent {
    provider: Arc<dyn LlmProvider>,
    tools: Arc<ToolRegistry>,
    sink: Arc<dyn OutputSink>,
    config: AgentConfig,
    history: Vec<AgentStep>,
}

impl Agent {
    /// Create a new agent
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        tools: Arc<ToolRegistry>,
        sink: Arc<dyn OutputSink>,
        config: AgentConfig,
    ) -> Self {
        Self {
            provider,
            tools,
            sink,
            config,
            history: Vec::new(),
        }
    }

    /// Build the prompt for the next iteration
    pub fn build_prompt(&self, question: &str) -> String {
        render_prompt(
            &self.tools.catalog(),
            &self.tools.names().join(", "),
            question,
            &format_history(&self.history),
        )
    }

    /// Answer a question, returning the final answer or the max-iterations message
    pub async fn run(&mut self, question: &str) -> Result<String> {
        self.run_detailed(question).await.map(|outcome| outcome.answer)
    }

    /// Like [`Agent::run`] but also reports the terminal state and call count
    pub async fn run_detailed(&mut self, question: &str) -> Result<RunOutcome> {
        self.history.clear();
        self.sink.panel(Panel::new("❓ Question", question, Tone::Question));
        tracing::info!(
            provider = self.provider.name(),
            model = %self.config.generation.model,
            max_iterations = self.config.max_iterations,
            "Starting ReAct run"
        );

        let mut llm_calls = 0;

        for iteration in 1..=self.config.max_iterations {
            let prompt = self.build_prompt(question);
            let response = self.provider.generate(&prompt, &self.config.generation).await?;
            llm_calls += 1;

            let (thought, action, action_input) = match parse_reply(&response) {
                ModelReply::FinalAnswer(answer) => {
                    tracing::info!(iteration, "Final answer reached");
                    self.sink.panel(Panel::new("✅ Final Answer", answer.as_str(), Tone::Success));
                    return Ok(RunOutcome {
                        answer,
                        state: LoopState::TerminalAnswer,
                        llm_calls,
                    });
                }
                ModelReply::Step {
                    thought,
                    action,
                    action_input,
                } => (thought, action, action_input),
            };

            let observation = match (&action, &action_input) {
                (Some(name), Some(args)) if !args.is_empty() => {
                    Some(self.execute_tool(name, args).await)
                }
                _ => {
                    tracing::debug!(iteration, "No dispatchable action in reply");
                    None
                }
            };

            let step = AgentStep {
                thought,
                action,
                action_input,
                observation,
            };
            self.display_step(&step, iteration);
            self.history.push(step);
        }

        tracing::warn!(max_iterations = self.config.max_iterations, "Iteration budget exhausted");
        Ok(RunOutcome {
            answer: MAX_ITERATIONS_MESSAGE.to_string(),
            state: LoopState::Exhausted,
            llm_calls,
        })
    }

    /// Run a tool and turn the outcome into observation text. Never fails.
    async fn execute_tool(&self, name: &str, arguments: &Arguments) -> String {
        if !self.tools.contains(name) {
            tracing::warn!(tool = %name, "Model requested an unknown tool");
            return format!("Error: Tool '{name}' not found.");
        }

        tracing::debug!(tool = %name, "Executing tool");
        let call = ToolCall::new(name, arguments.clone());
        match self.tools.execute(&call).await {
            Ok(result) => result.output,
            Err(AgentError::ToolNotFound(_)) => format!("Error: Tool '{name}' not found."),
            Err(e) => {
                tracing::error!(tool = %name, error = %e, "Error executing tool");
                format!("Error executing {name}: {e}")
            }
        }
    }

    fn display_step(&self, step: &AgentStep, iteration: usize) {
        if !self.config.verbose {
            return;
        }

        self.sink.line(&format!("Iteration {iteration}"), Tone::Info);
        self.sink.panel(Panel::new("💭 Thought", step.thought.as_str(), Tone::Thought));

        if let Some(action) = &step.action {
            let input = step
                .action_input
                .as_ref()
                .and_then(|args| serde_json::to_string_pretty(args).ok())
                .unwrap_or_else(|| "null".into());
            self.sink.panel(Panel::new(
                "🔧 Action",
                format!("{action}\nInput: {input}"),
                Tone::Action,
            ));
        }

        if let Some(observation) = step.observation.as_deref().filter(|o| !o.is_empty()) {
            self.sink.panel(Panel::new("👁️ Observation", observation, Tone::Observation));
        }
    }

    /// Clear the step history
    pub fn reset(&mut self) {
        self.history.clear();
        tracing::info!("Agent history reset");
    }

    /// Steps recorded by the current (or last) run
    pub fn history(&self) -> &[AgentStep] {
        &self.history
    }

    /// Get the tool registry
    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Get configuration
    pub const fn config(&self) -> &AgentConfig {
        &self.config
    }
}

/// Builder for Agent configuration
pub struct AgentBuilder {
    provider: Option<Arc<dyn LlmProvider>>,
    tools: ToolRegistry,
    sink: Arc<dyn OutputSink>,
    config: AgentConfig,
}

impl Default for AgentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AgentBuilder {
    pub fn new() -> Self {
        Self {
            provider: None,
            tools: ToolRegistry::new(),
            sink: Arc::new(NullSink),
            config: AgentConfig::default(),
        }
    }

    #[must_use]
    pub fn provider(mut self, provider: Arc<dyn LlmProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    #[must_use]
    pub fn tool<T: crate::tool::Tool + 'static>(mut self, tool: T) -> Self {
        self.tools.register(tool);
        self
    }

    #[must_use]
    pub fn tools(mut self, tools: ToolRegistry) -> Self {
        self.tools = tools;
        self
    }

    #[must_use]
    pub fn sink(mut self, sink: Arc<dyn OutputSink>) -> Self {
        self.sink = sink;
        self
    }

    #[must_use]
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.generation.model = model.into();
        self
    }

    #[must_use]
    pub const fn temperature(mut self, temp: f32) -> Self {
        self.config.generation.temperature = temp;
        self
    }

    #[must_use]
    pub const fn max_iterations(mut self, max: usize) -> Self {
        self.config.max_iterations = max;
        self
    }

    #[must_use]
    pub const fn verbose(mut self, verbose: bool) -> Self {
        self.config.verbose = verbose;
        self
    }

    pub fn build(self) -> Result<Agent> {
        let provider = self.provider
            .ok_or_else(|| AgentError::Config("Provider is required".into()))?;

        Ok(Agent::new(provider, Arc::new(self.tools), self.sink, self.config))
    }
}
