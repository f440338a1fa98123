use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::utils::{is_truthy_text, lenient_row_number, value_to_f64, value_to_text};

/// One sheet row: columns in the order the sheet produced them plus the
/// row handle used by follow-up actions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkflowRecord {
    #[serde(
        rename = "rowNumber",
        default,
        deserialize_with = "lenient_row_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub row_number: Option<u64>,
    #[serde(flatten)]
    pub columns: Map<String, Value>,
}

impl WorkflowRecord {
    pub fn new(row_number: Option<u64>) -> Self {
        Self {
            row_number,
            columns: Map::new(),
        }
    }

    pub fn with_column(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.columns.insert(column.into(), value.into());
        self
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns.get(column)
    }

    /// Display text of a column; empty when missing.
    pub fn text(&self, column: &str) -> String {
        self.get(column).map(value_to_text).unwrap_or_default()
    }

    /// First non-empty text among `columns`.
    pub fn text_any(&self, columns: &[&str]) -> String {
        columns
            .iter()
            .map(|c| self.text(c))
            .find(|t| !t.is_empty())
            .unwrap_or_default()
    }

    /// Whether the column holds a non-blank value.
    pub fn is_filled(&self, column: &str) -> bool {
        self.get(column).map(is_truthy_text).unwrap_or(false)
    }

    pub fn number(&self, column: &str) -> Option<f64> {
        self.get(column).and_then(value_to_f64)
    }

    /// Case-insensitive equality of a column's text.
    pub fn text_eq_ignore_case(&self, column: &str, expected: &str) -> bool {
        self.get(column)
            .and_then(Value::as_str)
            .map(|s| s.to_lowercase() == expected.to_lowercase())
            .unwrap_or(false)
    }

    /// Case-insensitive substring search over `columns`.
    pub fn matches_search(&self, columns: &[&str], needle: &str) -> bool {
        let needle = needle.to_lowercase();
        columns
            .iter()
            .any(|c| self.text(c).to_lowercase().contains(&needle))
    }

    /// Column names in received order, excluding the row handle.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }
}
