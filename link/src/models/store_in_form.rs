use crate::bridge::Params;
use crate::error::{FmsLinkError, Result};

use super::utils::js_number;
use super::Attachment;

/// Multipart field carrying the product photo.
pub const PHOTO_OF_PRODUCT_FIELD: &str = "photoOfProduct";

/// Text field carrying the product photo as a data URL.
pub const PHOTO_OF_PRODUCT_BASE64_FIELD: &str = "photoOfProductBase64";

/// Store-in details entered for one pending row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreInForm {
    pub in_qty: f64,
    pub unit_of_measurement: String,
    pub photo_of_product: Option<Attachment>,
}

impl StoreInForm {
    pub fn validate(&self) -> Result<()> {
        if self.in_qty <= 0.0
            || self.photo_of_product.is_none()
            || self.unit_of_measurement.trim().is_empty()
        {
            return Err(FmsLinkError::ValidationError(
                "Please fill in all fields and upload photo".into(),
            ));
        }
        Ok(())
    }

    pub fn to_fields(&self, row_number: u64) -> Params {
        vec![
            ("rowNumber", row_number.to_string()),
            ("inQty", js_number(self.in_qty)),
            ("unitOfMeasurement", self.unit_of_measurement.clone()),
            (
                PHOTO_OF_PRODUCT_BASE64_FIELD,
                self.photo_of_product
                    .as_ref()
                    .map(Attachment::to_data_url)
                    .unwrap_or_default(),
            ),
            (
                "photoFileName",
                self.photo_of_product
                    .as_ref()
                    .map(|a| a.file_name.clone())
                    .unwrap_or_default(),
            ),
        ]
    }
}
