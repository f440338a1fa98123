use serde::{Deserialize, Serialize};

use crate::bridge::Params;
use crate::error::{FmsLinkError, Result};

/// New indent as entered on the create-indent page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndentForm {
    pub indentor_name: String,
    pub area_of_machine: String,
    pub group_head: String,
    pub product_name: String,
    pub qty: i64,
    #[serde(default)]
    pub specifications: String,
}

impl IndentForm {
    pub fn validate(&self) -> Result<()> {
        let required = [
            &self.indentor_name,
            &self.group_head,
            &self.product_name,
            &self.area_of_machine,
        ];
        if required.iter().any(|v| v.trim().is_empty()) {
            return Err(FmsLinkError::ValidationError(
                "Please fill in all required fields".into(),
            ));
        }
        if self.qty <= 0 {
            return Err(FmsLinkError::ValidationError(
                "Please enter a valid quantity".into(),
            ));
        }
        Ok(())
    }

    /// Form fields as sent with `submitFMS`.
    pub fn to_params(&self) -> Params {
        vec![
            ("indentorName", self.indentor_name.clone()),
            ("areaOfMachine", self.area_of_machine.clone()),
            ("groupHead", self.group_head.clone()),
            ("productName", self.product_name.clone()),
            ("qty", self.qty.to_string()),
            ("specifications", self.specifications.clone()),
        ]
    }
}
