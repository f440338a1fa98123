use serde::{Deserialize, Serialize};

/// Result of a successful indent submission.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndentReceipt {
    #[serde(rename = "indentNo", default, deserialize_with = "super::utils::lenient_string")]
    pub indent_no: String,
}
