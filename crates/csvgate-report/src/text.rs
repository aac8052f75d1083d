//! Human-oriented renderers.

use std::fmt::Write as _;

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use csvgate_model::IssueSuite;

pub(crate) fn render_text(suite: &IssueSuite) -> String {
    let mut out = String::new();
    if let Some(source) = suite.source() {
        let _ = writeln!(out, "{source}");
    }
    for issue in suite {
        let _ = writeln!(out, "{issue}");
    }
    out
}

pub(crate) fn render_table(suite: &IssueSuite) -> String {
    let mut out = String::new();
    let title = suite.source().unwrap_or("Report");
    let _ = writeln!(out, "{title}: {} issue(s)", suite.len());
    if suite.is_empty() {
        return out;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120)
        .set_header(vec![
            header_cell("Line"),
            header_cell("id:Column"),
            header_cell("Rule"),
            header_cell("Message"),
        ]);
    if let Some(column) = table.column_mut(0) {
        column.set_cell_alignment(CellAlignment::Right);
    }
    for issue in suite {
        table.add_row(vec![
            Cell::new(issue.line),
            Cell::new(&issue.column),
            Cell::new(&issue.code).fg(Color::Red),
            Cell::new(&issue.message),
        ]);
    }
    let _ = writeln!(out, "{table}");
    out
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}
