use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::FmsLinkError;

/// Outcome chosen on the approve-indent page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalDecision {
    Approve,
    Reject,
}

impl ApprovalDecision {
    /// Value of the `actionType` parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            ApprovalDecision::Approve => "approve",
            ApprovalDecision::Reject => "reject",
        }
    }

    /// Confirmation shown once the endpoint accepted the decision.
    pub fn success_message(&self) -> &'static str {
        match self {
            ApprovalDecision::Approve => "Indent approved successfully!",
            ApprovalDecision::Reject => "Indent rejected successfully!",
        }
    }
}

impl fmt::Display for ApprovalDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApprovalDecision {
    type Err = FmsLinkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "approve" | "approved" => Ok(ApprovalDecision::Approve),
            "reject" | "rejected" => Ok(ApprovalDecision::Reject),
            other => Err(FmsLinkError::ValidationError(format!(
                "Unknown decision '{}', expected approve or reject",
                other
            ))),
        }
    }
}
