//! Output Sink
//!
//! User-facing rendering goes through an injected `OutputSink` instead of a
//! process-wide console, so components can be driven by a terminal renderer
//! in the binary and by `MemorySink` in tests.

use std::sync::Mutex;

use serde::{Deserialize, Serialize};

/// Visual intent of a rendered item; renderers map it to colors
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Info,
    Question,
    Thought,
    Action,
    Observation,
    Success,
    Warning,
    Error,
}

/// A titled, bordered block of text
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Panel {
    pub title: Option<String>,
    pub body: String,
    pub tone: Tone,
}

impl Panel {
    pub fn new(title: impl Into<String>, body: impl Into<String>, tone: Tone) -> Self {
        Self {
            title: Some(title.into()),
            body: body.into(),
            tone,
        }
    }

    pub fn untitled(body: impl Into<String>, tone: Tone) -> Self {
        Self {
            title: None,
            body: body.into(),
            tone,
        }
    }
}

/// A simple table: headers plus string rows. Empty headers render headerless.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableView {
    pub title: Option<String>,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// `(row, column, tone)` overrides for individual cells
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub highlights: Vec<(usize, usize, Tone)>,
}

impl TableView {
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            title: None,
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
            highlights: Vec::new(),
        }
    }

    /// Table without a header row
    pub fn headerless() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn titled(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn add_row<I, S>(&mut self, row: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.push(row.into_iter().map(Into::into).collect());
    }

    /// Color one cell of the most recently added row
    pub fn highlight_last(&mut self, column: usize, tone: Tone) {
        if let Some(row) = self.rows.len().checked_sub(1) {
            self.highlights.push((row, column, tone));
        }
    }

    /// Tone override for a cell, if any
    pub fn tone_at(&self, row: usize, column: usize) -> Option<Tone> {
        self.highlights
            .iter()
            .rev()
            .find(|(r, c, _)| *r == row && *c == column)
            .map(|(_, _, tone)| *tone)
    }
}

/// Destination for user-facing output
pub trait OutputSink: Send + Sync {
    /// Render a bordered panel
    fn panel(&self, panel: Panel);

    /// Render a table
    fn table(&self, table: TableView);

    /// Render a single line of text
    fn line(&self, text: &str, tone: Tone);
}

/// Discards all output
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl OutputSink for NullSink {
    fn panel(&self, _panel: Panel) {}
    fn table(&self, _table: TableView) {}
    fn line(&self, _text: &str, _tone: Tone) {}
}

/// Something a sink was asked to render
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Rendered {
    Panel(Panel),
    Table(TableView),
    Line { text: String, tone: Tone },
}

/// In-memory sink (for development/testing)
#[derive(Debug, Default)]
pub struct MemorySink {
    items: Mutex<Vec<Rendered>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, item: Rendered) {
        self.items
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(item);
    }

    /// Everything rendered so far, in order
    pub fn items(&self) -> Vec<Rendered> {
        self.items
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    /// Rendered panels, in order
    pub fn panels(&self) -> Vec<Panel> {
        self.items()
            .into_iter()
            .filter_map(|item| match item {
                Rendered::Panel(panel) => Some(panel),
                _ => None,
            })
            .collect()
    }

    /// Rendered tables, in order
    pub fn tables(&self) -> Vec<TableView> {
        self.items()
            .into_iter()
            .filter_map(|item| match item {
                Rendered::Table(table) => Some(table),
                _ => None,
            })
            .collect()
    }

    /// Titles of rendered panels, untitled panels skipped
    pub fn panel_titles(&self) -> Vec<String> {
        self.panels().into_iter().filter_map(|p| p.title).collect()
    }
}

impl OutputSink for MemorySink {
    fn panel(&self, panel: Panel) {
        self.push(Rendered::Panel(panel));
    }

    fn table(&self, table: TableView) {
        self.push(Rendered::Table(table));
    }

    fn line(&self, text: &str, tone: Tone) {
        self.push(Rendered::Line {
            text: text.to_string(),
            tone,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sink_records_in_order() {
        let sink = MemorySink::new();
        sink.line("starting", Tone::Info);
        sink.panel(Panel::new("Question", "What is BTC?", Tone::Question));

        let mut table = TableView::new(["Metric", "Value"]).titled("BTC Price Data");
        table.add_row(["current_price", "50000"]);
        sink.table(table.clone());

        let items = sink.items();
        assert_eq!(items.len(), 3);
        assert_eq!(sink.panel_titles(), vec!["Question".to_string()]);
        assert_eq!(sink.tables(), vec![table]);
    }

    #[test]
    fn test_highlight_applies_to_last_row() {
        let mut table = TableView::headerless();
        table.highlight_last(1, Tone::Error);
        assert!(table.highlights.is_empty());

        table.add_row(["Trend", "Uptrend"]);
        table.add_row(["Signal", "BUY"]);
        table.highlight_last(1, Tone::Success);

        assert_eq!(table.tone_at(1, 1), Some(Tone::Success));
        assert_eq!(table.tone_at(0, 1), None);
    }

    #[test]
    fn test_null_sink_accepts_everything() {
        let sink = NullSink;
        sink.panel(Panel::untitled("ignored", Tone::Info));
        sink.table(TableView::default());
        sink.line("ignored", Tone::Warning);
    }
}
