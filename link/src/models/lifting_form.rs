use crate::bridge::Params;
use crate::error::{FmsLinkError, Result};

use super::utils::js_number;
use super::Attachment;

/// Bill types offered by the lifting form.
pub const TYPE_OF_BILL_OPTIONS: [&str; 2] = ["Independent", "Dependent"];

/// Multipart field carrying the bill photo.
pub const PHOTO_OF_BILL_FIELD: &str = "photoOfBill";

/// Text field carrying the bill photo as a data URL.
pub const PHOTO_OF_BILL_BASE64_FIELD: &str = "photoOfBillBase64";

/// Lifting details entered for one pending row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LiftingForm {
    pub bill_no: String,
    pub vendor_name: String,
    pub lift_qty: f64,
    pub type_of_bill: String,
    pub bill_amount: f64,
    pub photo_of_bill: Option<Attachment>,
}

impl LiftingForm {
    pub fn validate(&self) -> Result<()> {
        let missing_text = [&self.bill_no, &self.vendor_name, &self.type_of_bill]
            .iter()
            .any(|v| v.trim().is_empty());
        if missing_text || self.lift_qty <= 0.0 || self.bill_amount <= 0.0 {
            return Err(FmsLinkError::ValidationError(
                "Please fill in all required fields".into(),
            ));
        }
        Ok(())
    }

    /// Text fields of the `submitLifting` upload for `row_number`.
    pub fn to_fields(&self, row_number: u64) -> Params {
        vec![
            ("rowNumber", row_number.to_string()),
            ("billNo", self.bill_no.clone()),
            ("vendorName", self.vendor_name.clone()),
            ("liftQty", js_number(self.lift_qty)),
            ("typeOfBill", self.type_of_bill.clone()),
            ("billAmount", js_number(self.bill_amount)),
            (
                PHOTO_OF_BILL_BASE64_FIELD,
                self.photo_of_bill
                    .as_ref()
                    .map(Attachment::to_data_url)
                    .unwrap_or_default(),
            ),
            (
                "photoFileName",
                self.photo_of_bill
                    .as_ref()
                    .map(|a| a.file_name.clone())
                    .unwrap_or_default(),
            ),
        ]
    }
}
