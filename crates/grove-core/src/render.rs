use std::io::{self, IsTerminal, Write};

use anyhow::anyhow;
use serde::Serialize;
use unicode_width::UnicodeWidthStr;

use crate::config::Config;
use crate::kanban::BoardSession;
use crate::locate::visible_rows;
use crate::session::{Notice, TreeSession};

#[derive(Debug, Clone)]
pub struct Renderer {
    color: bool,
}

impl Renderer {
    pub fn new(cfg: &Config) -> anyhow::Result<Self> {
        let color_cfg = cfg.get("color").unwrap_or_else(|| "on".to_string());
        let color = match color_cfg.to_ascii_lowercase().as_str() {
            "on" | "yes" | "true" | "1" => true,
            "off" | "no" | "false" | "0" => false,
            other => return Err(anyhow!("invalid color setting: {other}")),
        };

        Ok(Self {
            color: color && io::stdout().is_terminal(),
        })
    }

    pub fn plain() -> Self {
        Self { color: false }
    }

    #[tracing::instrument(skip(self, session))]
    pub fn print_tree(&mut self, session: &TreeSession) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();
        self.write_tree(&mut out, session)
    }

    #[tracing::instrument(skip(self, board))]
    pub fn print_board(&mut self, board: &BoardSession) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();
        self.write_board(&mut out, board)
    }

    pub fn print_notice(&mut self, notice: &Notice) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();
        writeln!(out, "{}", self.paint(&format!("! {notice}"), "33"))?;
        Ok(())
    }

    pub fn print_error(&mut self, err: &anyhow::Error) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();
        writeln!(out, "{}", self.paint(&format!("error: {err:#}"), "31"))?;
        Ok(())
    }

    pub fn print_message(&mut self, text: &str) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();
        writeln!(out, "{text}")?;
        Ok(())
    }

    pub fn print_json<T: Serialize>(&mut self, value: &T) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();
        serde_json::to_writer_pretty(&mut out, value)?;
        writeln!(out)?;
        Ok(())
    }

    pub fn write_tree<W: Write>(&self, mut out: W, session: &TreeSession) -> anyhow::Result<()> {
        let forest = session.forest();
        if forest.is_empty() {
            writeln!(out, "No nodes yet. Use \"root NAME\" to get started.")?;
        }

        let drag = session.drag();
        let rows = visible_rows(forest);
        let label_width = rows
            .iter()
            .map(|row| path_label(&row.path).len())
            .max()
            .unwrap_or(0);

        for row in rows {
            let node = row.node;
            let marker = if node.is_loading {
                "…"
            } else if !node.is_expandable() {
                "•"
            } else if node.is_expanded {
                "▾"
            } else {
                "▸"
            };

            let mut line = format!(
                "{:label_width$}  {}{} {}  {}",
                path_label(&row.path),
                "  ".repeat(row.depth),
                marker,
                node.name,
                self.paint(&node.id.short(), "90"),
            );
            if node.is_loading {
                line.push_str(&self.paint(" loading", "36"));
            }
            if drag.dragging == Some(node.id) {
                line.push_str(&self.paint(" [dragging]", "35"));
            }
            if drag.drag_over == Some(node.id) {
                line.push_str(&self.paint(" [drop here]", "32"));
            }
            writeln!(out, "{line}")?;
        }

        if let Some(target) = session.pending_delete() {
            writeln!(
                out,
                "{}",
                self.paint(
                    &format!(
                        "Delete \"{}\" and all its children? (yes/no)",
                        target.name
                    ),
                    "31"
                )
            )?;
        }

        Ok(())
    }

    pub fn write_board<W: Write>(&self, out: W, board: &BoardSession) -> anyhow::Result<()> {
        let columns = board.columns();
        let dragging = board.drag().map(|drag| drag.card_id);
        let drag_over = board.drag_over_card();

        let headers = columns
            .iter()
            .map(|col| {
                self.paint(
                    &format!("{} [{}] ({})", col.title, col.id, col.cards.len()),
                    ansi_for_hex(&col.color),
                )
            })
            .collect::<Vec<_>>();

        let depth = columns.iter().map(|col| col.cards.len()).max().unwrap_or(0);
        let mut rows = Vec::with_capacity(depth);
        for idx in 0..depth {
            let row = columns
                .iter()
                .map(|col| {
                    let Some(card) = col.cards.get(idx) else {
                        return String::new();
                    };
                    let mut cell = format!(
                        "{} {}. {} {}",
                        self.paint("▌", ansi_for_hex(&card.color)),
                        idx + 1,
                        card.title,
                        self.paint(&card.id.short(), "90")
                    );
                    if dragging == Some(card.id) {
                        cell.push_str(&self.paint(" [dragging]", "35"));
                    }
                    if drag_over == Some(card.id) {
                        cell.push_str(&self.paint(" [drop before]", "32"));
                    }
                    cell
                })
                .collect::<Vec<_>>();
            rows.push(row);
        }

        write_table(out, headers, rows)
    }

    fn paint(&self, text: &str, code: &str) -> String {
        if !self.color {
            return text.to_string();
        }
        format!("\x1b[{code}m{text}\x1b[0m")
    }
}

/// One-based dotted index path, as accepted by the `REF` arguments.
pub fn path_label(path: &[usize]) -> String {
    path.iter()
        .map(|idx| (idx + 1).to_string())
        .collect::<Vec<_>>()
        .join(".")
}

fn ansi_for_hex(hex: &str) -> &'static str {
    match hex.to_ascii_lowercase().as_str() {
        "#e74c3c" => "31",
        "#2ecc71" => "32",
        "#f39c12" => "33",
        "#3498db" => "34",
        "#9b59b6" => "35",
        _ => "37",
    }
}

fn write_table<W: Write>(
    mut writer: W,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
) -> anyhow::Result<()> {
    let column_count = headers.len();
    let mut widths = vec![0usize; column_count];

    for (idx, header) in headers.iter().enumerate() {
        widths[idx] = widths[idx].max(UnicodeWidthStr::width(strip_ansi(header).as_str()));
    }

    for row in &rows {
        for (idx, cell) in row.iter().enumerate() {
            widths[idx] = widths[idx].max(UnicodeWidthStr::width(strip_ansi(cell).as_str()));
        }
    }

    for (idx, header) in headers.iter().enumerate() {
        let visible_width = UnicodeWidthStr::width(strip_ansi(header).as_str());
        let padding = widths[idx].saturating_sub(visible_width);
        write!(writer, "{}{} ", header, " ".repeat(padding))?;
    }
    writeln!(writer)?;

    for width in &widths {
        write!(writer, "{:-<width$} ", "", width = *width)?;
    }
    writeln!(writer)?;

    for row in rows {
        for (idx, cell) in row.iter().enumerate() {
            let visible_width = UnicodeWidthStr::width(strip_ansi(cell).as_str());
            let padding = widths[idx].saturating_sub(visible_width);
            write!(writer, "{}{} ", cell, " ".repeat(padding))?;
        }
        writeln!(writer)?;
    }

    Ok(())
}

fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut escaped = false;

    for ch in s.chars() {
        if escaped {
            if ch == 'm' {
                escaped = false;
            }
            continue;
        }

        if ch == '\x1b' {
            escaped = true;
            continue;
        }

        out.push(ch);
    }

    out
}
