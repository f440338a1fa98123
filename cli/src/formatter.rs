//! Output formatters for workflow rows
//!
//! Renders sheet rows as a box-drawn table, pretty JSON, or CSV. Column order
//! follows the sheet: the row handle first, then columns as first seen.

use clap::ValueEnum;
use fms_link::models::value_to_text;
use fms_link::WorkflowRecord;
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::fmt;
use std::str::FromStr;

use crate::error::{CLIError, Result};

/// Maximum column width before truncation
const MAX_COLUMN_WIDTH: usize = 32;

/// Minimum column width when resizing to fit the terminal
const MIN_COLUMN_WIDTH: usize = 6;

/// Header used for the row handle column
pub const ROW_COLUMN: &str = "Row";

/// Output format for lists
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OutputFormat::Table => "table",
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
        })
    }
}

impl FromStr for OutputFormat {
    type Err = CLIError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            other => Err(CLIError::FormatError(format!(
                "Unknown format '{}', expected table, json, or csv",
                other
            ))),
        }
    }
}

/// Formats rows for display
pub struct OutputFormatter {
    format: OutputFormat,
    color: bool,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat, color: bool) -> Self {
        Self { format, color }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn set_format(&mut self, format: OutputFormat) {
        self.format = format;
    }

    /// Get terminal width, defaulting to 80 if unavailable
    fn get_terminal_width() -> usize {
        term_size::dimensions().map(|(w, _)| w).unwrap_or(80)
    }

    /// Truncate a string to max width (in characters) with ellipsis
    fn truncate_value(value: &str, max_width: usize) -> String {
        let len = value.chars().count();
        if len <= max_width {
            value.to_string()
        } else if max_width <= 3 {
            value.chars().take(max_width).collect()
        } else {
            format!("{}...", value.chars().take(max_width - 3).collect::<String>())
        }
    }

    /// Columns of `rows` in first-seen order, row handle first.
    fn columns_of(rows: &[&WorkflowRecord]) -> Vec<String> {
        let mut columns: Vec<String> = Vec::new();
        if rows.iter().any(|r| r.row_number.is_some()) {
            columns.push(ROW_COLUMN.to_string());
        }
        for row in rows {
            for name in row.column_names() {
                if !columns.iter().any(|c| c == name) {
                    columns.push(name.to_string());
                }
            }
        }
        columns
    }

    fn cell(row: &WorkflowRecord, column: &str) -> String {
        if column == ROW_COLUMN {
            return row.row_number.map(|n| n.to_string()).unwrap_or_default();
        }
        row.get(column).map(value_to_text).unwrap_or_default()
    }

    /// Format a list of rows
    pub fn format_records(&self, rows: &[&WorkflowRecord]) -> Result<String> {
        match self.format {
            OutputFormat::Table => {
                if rows.is_empty() {
                    return Ok("(0 rows)".to_string());
                }
                let columns = Self::columns_of(rows);
                let cells: Vec<Vec<String>> = rows
                    .iter()
                    .map(|row| columns.iter().map(|c| Self::cell(row, c)).collect())
                    .collect();
                let mut output = self.render_table(&columns, &cells);
                let label = if rows.len() == 1 { "row" } else { "rows" };
                output.push_str(&format!("({} {})", rows.len(), label));
                Ok(output)
            }
            OutputFormat::Json => self.format_json(&rows),
            OutputFormat::Csv => {
                if rows.is_empty() {
                    return Ok(String::new());
                }
                let columns = Self::columns_of(rows);
                let mut output = columns
                    .iter()
                    .map(|c| Self::escape_csv(c))
                    .collect::<Vec<_>>()
                    .join(",");
                output.push('\n');
                for row in rows {
                    let values: Vec<String> = columns
                        .iter()
                        .map(|c| Self::escape_csv(&Self::cell(row, c)))
                        .collect();
                    output.push_str(&values.join(","));
                    output.push('\n');
                }
                Ok(output)
            }
        }
    }

    /// Format label/value pairs, e.g. a row detail or dashboard totals
    pub fn format_pairs(&self, pairs: &[(String, String)]) -> Result<String> {
        match self.format {
            OutputFormat::Table => {
                let headers = vec!["Field".to_string(), "Value".to_string()];
                let cells: Vec<Vec<String>> = pairs
                    .iter()
                    .map(|(k, v)| vec![k.clone(), v.clone()])
                    .collect();
                Ok(self.render_table(&headers, &cells).trim_end().to_string())
            }
            OutputFormat::Json => {
                let object: serde_json::Map<String, JsonValue> = pairs
                    .iter()
                    .map(|(k, v)| (k.clone(), JsonValue::String(v.clone())))
                    .collect();
                self.format_json(&object)
            }
            OutputFormat::Csv => {
                let mut output = String::from("field,value\n");
                for (k, v) in pairs {
                    output.push_str(&format!("{},{}\n", Self::escape_csv(k), Self::escape_csv(v)));
                }
                Ok(output)
            }
        }
    }

    pub fn format_json<T: Serialize + ?Sized>(&self, value: &T) -> Result<String> {
        serde_json::to_string_pretty(value).map_err(|e| CLIError::FormatError(e.to_string()))
    }

    fn render_table(&self, columns: &[String], rows: &[Vec<String>]) -> String {
        let mut col_widths: Vec<usize> = columns.iter().map(|c| c.chars().count()).collect();
        for row in rows {
            for (i, value) in row.iter().enumerate() {
                col_widths[i] = col_widths[i].max(value.chars().count());
            }
        }
        Self::fit_widths(&mut col_widths, Self::get_terminal_width());

        let border = |left: char, mid: char, right: char| {
            let mut line = String::new();
            line.push(left);
            for (idx, width) in col_widths.iter().enumerate() {
                line.push_str(&"─".repeat(width + 2));
                line.push(if idx == col_widths.len() - 1 { right } else { mid });
            }
            line.push('\n');
            line
        };
        let line = |values: &[String], header: bool| {
            let mut out = String::from("│");
            for (i, value) in values.iter().enumerate() {
                let text = format!(
                    "{:width$}",
                    Self::truncate_value(value, col_widths[i]),
                    width = col_widths[i]
                );
                out.push(' ');
                if header && self.color {
                    use colored::Colorize;
                    out.push_str(&text.bold().to_string());
                } else {
                    out.push_str(&text);
                }
                out.push_str(" │");
            }
            out.push('\n');
            out
        };

        let mut output = border('┌', '┬', '┐');
        output.push_str(&line(columns, true));
        output.push_str(&border('├', '┼', '┤'));
        for row in rows {
            output.push_str(&line(row.as_slice(), false));
        }
        output.push_str(&border('└', '┴', '┘'));
        output
    }

    /// Shrink widest columns until the table fits `terminal_width`
    fn fit_widths(col_widths: &mut [usize], terminal_width: usize) {
        let column_count = col_widths.len();
        if column_count == 0 {
            return;
        }
        let available = terminal_width
            .saturating_sub(column_count * 3 + 1)
            .max(column_count);

        if col_widths.iter().sum::<usize>() <= available {
            return;
        }
        for width in col_widths.iter_mut() {
            *width = (*width).min(MAX_COLUMN_WIDTH);
        }
        while col_widths.iter().sum::<usize>() > available {
            let widest = col_widths
                .iter()
                .enumerate()
                .filter(|(_, w)| **w > MIN_COLUMN_WIDTH)
                .max_by_key(|(_, w)| **w)
                .or_else(|| {
                    col_widths
                        .iter()
                        .enumerate()
                        .filter(|(_, w)| **w > 1)
                        .max_by_key(|(_, w)| **w)
                })
                .map(|(idx, _)| idx);
            match widest {
                Some(idx) => col_widths[idx] -= 1,
                None => break,
            }
        }
    }

    fn escape_csv(value: &str) -> String {
        if value.contains(',') || value.contains('"') || value.contains('\n') {
            format!("\"{}\"", value.replace('"', "\"\""))
        } else {
            value.to_string()
        }
    }
}
