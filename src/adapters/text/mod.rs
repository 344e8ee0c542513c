//! Plain-text `DocumentRenderer`.

use crate::domain::report::{Block, Document, Table};
use crate::ports::document_renderer::{DocumentRenderer, Result};

const RULE_WIDTH: usize = 72;

/// Renders documents as monospaced text tables.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextRenderer;

impl TextRenderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render_to_string(&self, document: &Document) -> String {
        let mut out = String::new();
        for block in &document.blocks {
            match block {
                Block::Title(text) => {
                    out.push_str(text);
                    out.push('\n');
                    out.push_str(&"=".repeat(width(text)));
                    out.push('\n');
                }
                Block::Heading(text) => {
                    out.push('\n');
                    out.push_str(text);
                    out.push('\n');
                    out.push_str(&"-".repeat(width(text)));
                    out.push('\n');
                }
                Block::Text(text) => {
                    out.push_str(text);
                    out.push('\n');
                }
                Block::Emphasis(text) => {
                    out.push_str(&format!("** {} **\n", text));
                }
                Block::Rule => {
                    out.push_str(&"-".repeat(RULE_WIDTH));
                    out.push('\n');
                }
                Block::Table(table) => {
                    out.push('\n');
                    render_table(table, &mut out);
                }
            }
        }
        out
    }
}

impl DocumentRenderer for TextRenderer {
    fn render(&self, document: &Document) -> Result<Vec<u8>> {
        Ok(self.render_to_string(document).into_bytes())
    }

    fn extension(&self) -> &'static str {
        "txt"
    }
}

fn width(text: &str) -> usize {
    text.chars().count()
}

fn render_table(table: &Table, out: &mut String) {
    let columns = table
        .rows
        .iter()
        .map(Vec::len)
        .chain(std::iter::once(table.head.len()))
        .max()
        .unwrap_or(0);
    if columns == 0 {
        return;
    }

    let mut widths = vec![0usize; columns];
    for row in std::iter::once(&table.head).chain(table.rows.iter()) {
        for (i, cell) in row.iter().enumerate() {
            let cell_width = cell.lines().map(width).max().unwrap_or(0);
            widths[i] = widths[i].max(cell_width);
        }
    }

    let separator = widths
        .iter()
        .map(|w| "-".repeat(w + 2))
        .collect::<Vec<_>>()
        .join("+");
    let separator = format!("+{}+\n", separator);

    out.push_str(&separator);
    if !table.head.is_empty() {
        render_row(&table.head, &widths, out);
        out.push_str(&separator);
    }
    for row in &table.rows {
        render_row(row, &widths, out);
    }
    out.push_str(&separator);
}

fn render_row(row: &[String], widths: &[usize], out: &mut String) {
    let cells: Vec<Vec<&str>> = widths
        .iter()
        .enumerate()
        .map(|(i, _)| row.get(i).map(|c| c.lines().collect()).unwrap_or_default())
        .collect();
    let height = cells.iter().map(Vec::len).max().unwrap_or(0).max(1);

    for line in 0..height {
        out.push('|');
        for (cell, w) in cells.iter().zip(widths) {
            let text = cell.get(line).copied().unwrap_or("");
            out.push(' ');
            out.push_str(text);
            out.push_str(&" ".repeat(w - width(text)));
            out.push_str(" |");
        }
        out.push('\n');
    }
}
