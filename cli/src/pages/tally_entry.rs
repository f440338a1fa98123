//! Tally entry: mark lifted and stored indents as entered in Tally.

use fms_link::{FmsClient, TallyForm, TallyStatus, WorkflowRecord};

use super::PendingList;
use crate::error::{CLIError, Result};
use crate::parser::FormFields;

pub const SUCCESS_MESSAGE: &str = "Tally entry submitted successfully!";

/// Columns left out of the detail view.
pub const HIDDEN_DETAIL_COLUMNS: [&str; 6] =
    ["rowNumber", "Planned3", "Delay3", "Status", "Reason", "Actual3"];

pub fn form_from_fields(fields: &FormFields) -> Result<TallyForm> {
    let raw_status = fields.text("status");
    let status = if raw_status.trim().is_empty() {
        None
    } else {
        Some(
            raw_status
                .parse::<TallyStatus>()
                .map_err(|e| CLIError::ParseError(e.to_string()))?,
        )
    };

    Ok(TallyForm {
        status,
        reason: fields.text("reason"),
    })
}

/// Column/value pairs shown for a row, in received order.
pub fn detail_columns(record: &WorkflowRecord) -> Vec<(String, String)> {
    record
        .column_names()
        .filter(|name| !HIDDEN_DETAIL_COLUMNS.contains(name))
        .map(|name| (name.to_string(), record.text(name)))
        .collect()
}

pub async fn submit(
    list: &mut PendingList,
    client: &FmsClient,
    row_number: u64,
    form: &TallyForm,
) -> std::result::Result<&'static str, String> {
    list.submit_row(row_number, client.submit_tally_entry(row_number, form))
        .await
        .map(|_| SUCCESS_MESSAGE)
}
