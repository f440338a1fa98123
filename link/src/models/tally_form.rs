use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::bridge::Params;
use crate::error::{FmsLinkError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TallyStatus {
    Yes,
    No,
}

impl TallyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TallyStatus::Yes => "yes",
            TallyStatus::No => "no",
        }
    }
}

impl fmt::Display for TallyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TallyStatus {
    type Err = FmsLinkError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "yes" | "y" => Ok(TallyStatus::Yes),
            "no" | "n" => Ok(TallyStatus::No),
            other => Err(FmsLinkError::ValidationError(format!(
                "Unknown status '{}', expected yes or no",
                other
            ))),
        }
    }
}

/// Tally entry for one pending row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TallyForm {
    pub status: Option<TallyStatus>,
    pub reason: String,
}

impl TallyForm {
    pub fn validate(&self) -> Result<()> {
        if self.status.is_none() || self.reason.trim().is_empty() {
            return Err(FmsLinkError::ValidationError(
                "Please fill in all fields".into(),
            ));
        }
        Ok(())
    }

    pub fn to_params(&self, row_number: u64) -> Params {
        vec![
            ("rowNumber", row_number.to_string()),
            (
                "status",
                self.status.map(|s| s.as_str().to_string()).unwrap_or_default(),
            ),
            ("reason", self.reason.clone()),
        ]
    }
}
