//! Store in: record received quantity and a product photo.

use fms_link::{FmsClient, StoreInForm};

use super::PendingList;
use crate::error::Result;
use crate::parser::FormFields;

pub const SUCCESS_MESSAGE: &str = "Store In entry submitted successfully!";

pub fn form_from_fields(fields: &FormFields) -> Result<StoreInForm> {
    Ok(StoreInForm {
        in_qty: fields.number("inQty")?,
        unit_of_measurement: fields.text("unitOfMeasurement"),
        photo_of_product: fields.attachment("photoOfProduct")?,
    })
}

pub async fn submit(
    list: &mut PendingList,
    client: &FmsClient,
    row_number: u64,
    form: &StoreInForm,
) -> std::result::Result<&'static str, String> {
    list.submit_row(row_number, client.submit_store_in(row_number, form))
        .await
        .map(|_| SUCCESS_MESSAGE)
}
