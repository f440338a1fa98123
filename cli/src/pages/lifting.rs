//! Lifting: record bill details, with an optional bill photo, for indents
//! waiting to be lifted.

use fms_link::models::TYPE_OF_BILL_OPTIONS;
use fms_link::{FmsClient, LiftingForm};

use super::PendingList;
use crate::error::{CLIError, Result};
use crate::parser::FormFields;

pub const SUCCESS_MESSAGE: &str = "Lifting entry submitted successfully!";

/// Build the form from `lift <row> key=value…` arguments.
///
/// `typeOfBill` is matched case-insensitively against the known options.
pub fn form_from_fields(fields: &FormFields) -> Result<LiftingForm> {
    let raw_type = fields.text("typeOfBill");
    let type_of_bill = if raw_type.trim().is_empty() {
        String::new()
    } else {
        TYPE_OF_BILL_OPTIONS
            .iter()
            .find(|option| option.eq_ignore_ascii_case(raw_type.trim()))
            .map(|option| option.to_string())
            .ok_or_else(|| {
                CLIError::ParseError(format!(
                    "typeOfBill must be one of {}, got '{}'",
                    TYPE_OF_BILL_OPTIONS.join(", "),
                    raw_type
                ))
            })?
    };

    Ok(LiftingForm {
        bill_no: fields.text("billNo"),
        vendor_name: fields.text("vendorName"),
        lift_qty: fields.number("liftQty")?,
        type_of_bill,
        bill_amount: fields.number("billAmount")?,
        photo_of_bill: fields.attachment("photoOfBill")?,
    })
}

pub async fn submit(
    list: &mut PendingList,
    client: &FmsClient,
    row_number: u64,
    form: &LiftingForm,
) -> std::result::Result<&'static str, String> {
    list.submit_row(row_number, client.submit_lifting(row_number, form))
        .await
        .map(|_| SUCCESS_MESSAGE)
}
