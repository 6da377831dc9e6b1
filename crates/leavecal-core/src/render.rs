use std::io::{self, IsTerminal, Write};

use anyhow::anyhow;
use unicode_width::UnicodeWidthStr;

use crate::calendar::{CalendarQuery, Cell, DAYS_PER_WEEK, Grid};
use crate::config::Config;
use crate::leave::LeaveRecord;
use crate::period::month_title;

const WEEKDAY_LABELS: [&str; DAYS_PER_WEEK] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
const MIN_CELL_WIDTH: usize = 3;

#[derive(Debug, Clone)]
pub struct Renderer {
    color: bool,
    other_marker: String,
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
            color,
            other_marker: cfg.other_marker(),
        })
    }

    /// Text shown for a grid cell; blanks render as an empty string.
    pub fn cell_text(&self, cell: &Cell) -> String {
        match cell {
            Cell::Blank => String::new(),
            Cell::Day(day) => day.to_string(),
            Cell::LeaveMarker(marker) => marker
                .token()
                .map(str::to_string)
                .unwrap_or_else(|| self.other_marker.clone()),
        }
    }

    #[tracing::instrument(skip(self, writer, grid))]
    pub fn write_calendar<W: Write>(
        &self,
        mut writer: W,
        query: &CalendarQuery,
        grid: &Grid,
    ) -> anyhow::Result<()> {
        let width = UnicodeWidthStr::width(self.other_marker.as_str()).max(MIN_CELL_WIDTH);

        writeln!(writer, "{}", month_title(query))?;

        let header = WEEKDAY_LABELS
            .iter()
            .enumerate()
            .map(|(idx, label)| {
                let padded = pad_left(label, width);
                if idx == 0 { self.paint(&padded, "31") } else { padded }
            })
            .collect::<Vec<_>>()
            .join(" ");
        writeln!(writer, "{header}")?;

        for row in grid.rows() {
            let line = row
                .iter()
                .enumerate()
                .map(|(idx, cell)| {
                    let padded = pad_left(&self.cell_text(cell), width);
                    match cell {
                        Cell::LeaveMarker(_) => self.paint(&padded, "1;31"),
                        _ if idx == 0 => self.paint(&padded, "31"),
                        _ => padded,
                    }
                })
                .collect::<Vec<_>>()
                .join(" ");
            writeln!(writer, "{line}")?;
        }

        Ok(())
    }

    #[tracing::instrument(skip(self, writer, leaves), fields(leaves = leaves.len()))]
    pub fn write_leave_table<W: Write>(&self, mut writer: W, leaves: &[LeaveRecord]) -> anyhow::Result<()> {
        if leaves.is_empty() {
            writeln!(writer, "No Leave")?;
            return Ok(());
        }

        let headers = vec![
            "ReasonType".to_string(),
            "Reason".to_string(),
            "Date".to_string(),
            "Month".to_string(),
            "Year".to_string(),
        ];

        let rows = leaves
            .iter()
            .map(|leave| {
                vec![
                    leave.reason_type.clone(),
                    leave.reason.clone(),
                    self.paint(&leave.date.to_string(), "33"),
                    leave.month.to_string(),
                    leave.year.to_string(),
                ]
            })
            .collect();

        write_table(&mut writer, headers, rows)?;
        Ok(())
    }

    fn paint(&self, text: &str, code: &str) -> String {
        if !self.color || !io::stdout().is_terminal() {
            return text.to_string();
        }
        format!("\x1b[{code}m{text}\x1b[0m")
    }
}

fn pad_left(text: &str, width: usize) -> String {
    let visible = UnicodeWidthStr::width(text);
    format!("{}{}", " ".repeat(width.saturating_sub(visible)), text)
}

/// Left-aligned table. Rows shorter than the header are written as they are.
fn write_table<W: Write>(mut writer: W, headers: Vec<String>, rows: Vec<Vec<String>>) -> anyhow::Result<()> {
    let column_count = headers.len();
    let mut widths = vec![0usize; column_count];

    for (idx, header) in headers.iter().enumerate() {
        widths[idx] = widths[idx].max(UnicodeWidthStr::width(header.as_str()));
    }

    for row in &rows {
        for (idx, cell) in row.iter().take(column_count).enumerate() {
            widths[idx] = widths[idx].max(UnicodeWidthStr::width(strip_ansi(cell).as_str()));
        }
    }

    let header_line = headers
        .iter()
        .zip(&widths)
        .map(|(header, width)| format!("{header:width$}", width = *width))
        .collect::<Vec<_>>()
        .join(" ");
    writeln!(writer, "{}", header_line.trim_end())?;

    let rule = widths.iter().map(|width| "-".repeat(*width)).collect::<Vec<_>>().join(" ");
    writeln!(writer, "{rule}")?;

    for row in rows {
        let line = row
            .iter()
            .zip(&widths)
            .map(|(cell, width)| {
                let visible_width = UnicodeWidthStr::width(strip_ansi(cell).as_str());
                let padding = width.saturating_sub(visible_width);
                format!("{}{}", cell, " ".repeat(padding))
            })
            .collect::<Vec<_>>()
            .join(" ");
        writeln!(writer, "{}", line.trim_end())?;
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
