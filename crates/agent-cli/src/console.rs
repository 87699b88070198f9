//! Terminal rendering for the agents' output sink.

use colored::{Color, Colorize};
use comfy_table::{Cell, ContentArrangement, Table, presets::UTF8_FULL};

use agent_core::{OutputSink, Panel, TableView, Tone};

const RULE_WIDTH: usize = 80;

/// Renders panels as bordered blocks and tables with comfy-table
#[derive(Clone, Copy, Debug, Default)]
pub struct ConsoleSink;

impl ConsoleSink {
    pub const fn new() -> Self {
        Self
    }
}

const fn tone_color(tone: Tone) -> Color {
    match tone {
        Tone::Info => Color::Cyan,
        Tone::Question => Color::Magenta,
        Tone::Thought => Color::Blue,
        Tone::Action | Tone::Warning => Color::Yellow,
        Tone::Observation | Tone::Success => Color::Green,
        Tone::Error => Color::Red,
    }
}

/// Bordered block; the title, when present, sits in the top rule
pub fn render_panel(panel: &Panel) -> String {
    let color = tone_color(panel.tone);
    let top = match &panel.title {
        Some(title) => {
            let used = title.chars().count() + 4;
            format!(
                "╭─ {} {}",
                title.bold(),
                "─".repeat(RULE_WIDTH.saturating_sub(used))
            )
        }
        None => format!("╭{}", "─".repeat(RULE_WIDTH - 1)),
    };

    let mut out = format!("{}\n", top.color(color));
    for line in panel.body.lines() {
        out.push_str(&format!("{} {line}\n", "│".color(color)));
    }
    out.push_str(&format!("╰{}", "─".repeat(RULE_WIDTH - 1)).color(color).to_string());
    out
}

const fn cell_color(tone: Tone) -> comfy_table::Color {
    use comfy_table::Color as C;
    match tone {
        Tone::Info => C::Cyan,
        Tone::Question => C::Magenta,
        Tone::Thought => C::Blue,
        Tone::Action | Tone::Warning => C::Yellow,
        Tone::Observation | Tone::Success => C::Green,
        Tone::Error => C::Red,
    }
}

/// comfy-table rendering; highlighted cells get their tone's color
pub fn render_table(view: &TableView) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    if !view.headers.is_empty() {
        table.set_header(view.headers.clone());
    }
    for (r, row) in view.rows.iter().enumerate() {
        table.add_row(row.iter().enumerate().map(|(c, text)| {
            let cell = Cell::new(text);
            match view.tone_at(r, c) {
                Some(tone) => cell.fg(cell_color(tone)),
                None => cell,
            }
        }));
    }
    table
}

/// Full-width separator between runs
pub fn separator() -> String {
    "=".repeat(RULE_WIDTH)
}

impl OutputSink for ConsoleSink {
    fn panel(&self, panel: Panel) {
        println!("{}", render_panel(&panel));
    }

    fn table(&self, table: TableView) {
        if let Some(title) = &table.title {
            println!("{}", title.bold());
        }
        println!("{}", render_table(&table));
    }

    fn line(&self, text: &str, tone: Tone) {
        println!("{}", text.color(tone_color(tone)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panel_contains_title_and_every_line() {
        colored::control::set_override(false);
        let rendered = render_panel(&Panel::new("💭 Thought", "first\nsecond", Tone::Thought));

        assert!(rendered.starts_with("╭─ 💭 Thought ─"));
        assert!(rendered.contains("│ first\n"));
        assert!(rendered.contains("│ second\n"));
        assert!(rendered.ends_with('─'));
    }

    #[test]
    fn test_table_keeps_headers_and_rows() {
        let mut view = TableView::new(["Metric", "Value"]);
        view.add_row(["current_price", "50000.00"]);
        let rendered = render_table(&view).to_string();

        assert!(rendered.contains("Metric"));
        assert!(rendered.contains("50000.00"));
    }

    #[test]
    fn test_headerless_table_renders_rows_only() {
        let mut view = TableView::headerless();
        view.add_row(["Signal", "BUY"]);
        view.highlight_last(1, Tone::Success);
        let table = render_table(&view);

        assert!(table.header().is_none());
        assert!(table.to_string().contains("BUY"));
    }
}
