//! Terminal rendering for multi-model turns.
//!
//! Live output is line-interleaved: deltas print as they arrive, with a
//! colored header whenever the active column changes. After the turn a
//! side-by-side grid shows the complete responses, `models_per_row`
//! columns wide.

use std::collections::BTreeMap;
use std::io::{self, Write};

use colored::{ColoredString, Colorize};

use crate::fanout::{ColumnEvent, ColumnResult};

const COLUMN_WIDTH: usize = 38;
const COLUMN_GAP: &str = "  │  ";

/// Cycle of header colors so adjacent columns are distinguishable.
fn label_colored(label: &str, index: usize) -> ColoredString {
    match index % 4 {
        0 => label.cyan().bold(),
        1 => label.magenta().bold(),
        2 => label.yellow().bold(),
        _ => label.green().bold(),
    }
}

/// Prints streamed deltas as they arrive, emitting a header line each
/// time output switches to a different column.
pub struct LivePrinter {
    labels: BTreeMap<String, (String, usize)>,
    active: Option<String>,
}

impl LivePrinter {
    /// `columns` pairs each column key with its display label, in the
    /// order the columns were configured.
    pub fn new(columns: &[(String, String)]) -> Self {
        let labels = columns
            .iter()
            .enumerate()
            .map(|(i, (key, label))| (key.clone(), (label.clone(), i)))
            .collect();
        LivePrinter {
            labels,
            active: None,
        }
    }

    pub fn handle(&mut self, event: &ColumnEvent) {
        match event {
            ColumnEvent::Delta { key, text } => {
                self.switch_to(key);
                print!("{text}");
                let _ = io::stdout().flush();
            }
            ColumnEvent::Done { key } => {
                if self.active.as_deref() == Some(key) {
                    println!();
                    self.active = None;
                }
            }
            ColumnEvent::Failed { key, message } => {
                self.switch_to(key);
                println!("{}", message.red());
                self.active = None;
            }
        }
    }

    fn switch_to(&mut self, key: &str) {
        if self.active.as_deref() == Some(key) {
            return;
        }
        if self.active.is_some() {
            println!();
        }
        if let Some((label, index)) = self.labels.get(key) {
            println!("\n{}", label_colored(label, *index));
        }
        self.active = Some(key.to_string());
    }
}

/// Render completed responses side by side.
///
/// Columns appear in the order given by `columns`, wrapped to a fixed
/// width, `per_row` columns per grid row. Failed columns render their
/// error text in red.
pub fn render_grid(
    columns: &[(String, String)],
    results: &BTreeMap<String, ColumnResult>,
    per_row: usize,
) -> String {
    let per_row = per_row.max(1);
    let mut out = String::new();

    for (row_index, chunk) in columns.chunks(per_row).enumerate() {
        if row_index > 0 {
            out.push('\n');
        }

        let cells: Vec<(String, Vec<String>, bool)> = chunk
            .iter()
            .map(|(key, label)| {
                let result = results.get(key).cloned().unwrap_or_default();
                let lines = wrap_text(&result.final_text(), COLUMN_WIDTH);
                (label.clone(), lines, result.is_err())
            })
            .collect();

        // Header row.
        for (i, (label, _, _)) in cells.iter().enumerate() {
            if i > 0 {
                out.push_str(COLUMN_GAP);
            }
            out.push_str(&pad_visible(
                &label_colored(label, per_row * row_index + i).to_string(),
                label.chars().count(),
                COLUMN_WIDTH,
            ));
        }
        out.push('\n');

        for (i, _) in cells.iter().enumerate() {
            if i > 0 {
                out.push_str(COLUMN_GAP);
            }
            out.push_str(&"─".repeat(COLUMN_WIDTH));
        }
        out.push('\n');

        let height = cells.iter().map(|(_, lines, _)| lines.len()).max().unwrap_or(0);
        for line_index in 0..height {
            for (i, (_, lines, is_err)) in cells.iter().enumerate() {
                if i > 0 {
                    out.push_str(COLUMN_GAP);
                }
                let line = lines.get(line_index).map(String::as_str).unwrap_or("");
                let visible = line.chars().count();
                if *is_err {
                    out.push_str(&pad_visible(&line.red().to_string(), visible, COLUMN_WIDTH));
                } else {
                    out.push_str(&pad_visible(line, visible, COLUMN_WIDTH));
                }
            }
            out.push('\n');
        }
    }

    out
}

/// Pad `text` (whose visible width is `visible`) to `width` columns.
/// Color escape codes make `len()` useless for alignment.
fn pad_visible(text: &str, visible: usize, width: usize) -> String {
    let mut s = text.to_string();
    for _ in visible..width {
        s.push(' ');
    }
    s
}

/// Word-wrap `text` to `width` columns, preserving explicit newlines.
/// Words longer than the width are split hard.
fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        if paragraph.is_empty() {
            lines.push(String::new());
            continue;
        }
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let word_len = word.chars().count();
            if !current.is_empty() && current.chars().count() + 1 + word_len > width {
                lines.push(std::mem::take(&mut current));
            }
            if word_len > width {
                // Hard-split an overlong word across lines.
                let mut rest: Vec<char> = word.chars().collect();
                while rest.len() > width {
                    let head: String = rest.drain(..width).collect();
                    if !current.is_empty() {
                        lines.push(std::mem::take(&mut current));
                    }
                    lines.push(head);
                }
                current = rest.into_iter().collect();
            } else {
                if !current.is_empty() {
                    current.push(' ');
                }
                current.push_str(word);
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
