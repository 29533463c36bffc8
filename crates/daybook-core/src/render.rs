use std::io::Write;

use chrono::{Datelike, NaiveDate};
use daybook_model::ThemeMode;
use daybook_model::calendar::{DayCell, MonthGrid};
use daybook_model::datetime::format_display;
use daybook_model::task_list::{EMPTY_PLACEHOLDER, TaskListView};
use unicode_width::UnicodeWidthStr;

const CELL_WIDTH: usize = 5;
const PRESENCE_MARKER: char = '•';

/// Text rendering of the three daybook regions. Colors are ANSI escapes
/// and only emitted when `color` is set.
#[derive(Debug, Clone)]
pub struct Renderer {
    color: bool,
    theme: ThemeMode,
}

impl Renderer {
    pub fn new(color: bool, theme: ThemeMode) -> Self {
        Self { color, theme }
    }

    pub fn set_theme(&mut self, theme: ThemeMode) {
        self.theme = theme;
    }

    #[tracing::instrument(skip(self, out, grid), fields(year = grid.year, month = grid.month))]
    pub fn write_calendar<W: Write>(&self, out: &mut W, grid: &MonthGrid) -> anyhow::Result<()> {
        let width = CELL_WIDTH * MonthGrid::weekday_labels().len();
        let title = format!("‹ {} ›", grid.title());
        writeln!(out, "{:^width$}", title, width = width)?;

        for label in MonthGrid::weekday_labels() {
            write!(out, "{label:^width$}", width = CELL_WIDTH)?;
        }
        writeln!(out)?;

        for row in &grid.rows {
            let line: String = row.iter().map(|cell| self.calendar_cell(cell)).collect();
            writeln!(out, "{}", line.trim_end())?;
        }

        Ok(())
    }

    fn calendar_cell(&self, cell: &DayCell) -> String {
        let DayCell::Day {
            date,
            selected,
            has_tasks,
        } = *cell
        else {
            return " ".repeat(CELL_WIDTH);
        };

        let marker = if has_tasks {
            self.paint(&PRESENCE_MARKER.to_string(), self.marker_code())
        } else {
            " ".to_string()
        };
        let day = format!("{:>2}", date.day());

        if selected {
            format!("[{}{}]", self.paint(&day, "7"), marker)
        } else {
            format!(" {day}{marker} ")
        }
    }

    #[tracing::instrument(skip(self, out, view))]
    pub fn write_task_list<W: Write>(
        &self,
        out: &mut W,
        date: NaiveDate,
        view: &TaskListView,
    ) -> anyhow::Result<()> {
        writeln!(out, "Tasks for {}", format_display(date))?;

        if view.is_empty() {
            writeln!(out, "  {}", self.paint(EMPTY_PLACEHOLDER, "3;90"))?;
            return Ok(());
        }

        let headers = vec!["ID".to_string(), "Done".to_string(), "Task".to_string()];
        let rows = view
            .entries()
            .iter()
            .map(|entry| {
                let (done, text) = if entry.completed {
                    ("[x]".to_string(), self.paint(&entry.text, "9"))
                } else {
                    ("[ ]".to_string(), entry.text.clone())
                };
                vec![self.paint(&entry.id.to_string(), "33"), done, text]
            })
            .collect();

        write_table(out, headers, rows)
    }

    pub fn write_summary<W: Write>(&self, out: &mut W, message: &str) -> anyhow::Result<()> {
        writeln!(out, "{message}")?;
        Ok(())
    }

    pub fn write_theme<W: Write>(&self, out: &mut W) -> anyhow::Result<()> {
        let name = if self.theme.is_dark() { "dark" } else { "light" };
        writeln!(
            out,
            "{} {} theme (toggle: {})",
            self.theme.icon(),
            name,
            self.theme.toggle_label()
        )?;
        Ok(())
    }

    fn marker_code(&self) -> &'static str {
        match self.theme {
            ThemeMode::Light => "38;5;208",
            ThemeMode::Dark => "38;5;134",
        }
    }

    fn paint(&self, text: &str, code: &str) -> String {
        if !self.color {
            return text.to_string();
        }
        format!("\x1b[{code}m{text}\x1b[0m")
    }
}

fn write_table<W: Write>(
    writer: &mut W,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
) -> anyhow::Result<()> {
    let mut widths: Vec<usize> = headers
        .iter()
        .map(|header| UnicodeWidthStr::width(header.as_str()))
        .collect();

    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(visible_width(cell));
        }
    }

    let header_line: Vec<String> = headers
        .iter()
        .zip(&widths)
        .map(|(header, width)| pad(header, *width))
        .collect();
    writeln!(writer, "{}", header_line.join(" ").trim_end())?;

    let rule: Vec<String> = widths.iter().map(|width| "-".repeat(*width)).collect();
    writeln!(writer, "{}", rule.join(" "))?;

    for row in rows {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(cell, width)| pad(cell, *width))
            .collect();
        writeln!(writer, "{}", line.join(" ").trim_end())?;
    }

    Ok(())
}

fn pad(cell: &str, width: usize) -> String {
    let padding = width.saturating_sub(visible_width(cell));
    format!("{cell}{}", " ".repeat(padding))
}

fn visible_width(cell: &str) -> usize {
    UnicodeWidthStr::width(strip_ansi(cell).as_str())
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
