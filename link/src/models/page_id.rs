use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::FmsLinkError;

/// Identifier of a page in the FMS shell.
///
/// Declaration order is the canonical menu order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PageId {
    Dashboard,
    CreateIndent,
    ApproveIndent,
    Lifting,
    StoreIn,
    TallyEntry,
    MakePayment,
    License,
}

impl PageId {
    /// Every page, in canonical menu order.
    pub const ALL: [PageId; 8] = [
        PageId::Dashboard,
        PageId::CreateIndent,
        PageId::ApproveIndent,
        PageId::Lifting,
        PageId::StoreIn,
        PageId::TallyEntry,
        PageId::MakePayment,
        PageId::License,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PageId::Dashboard => "dashboard",
            PageId::CreateIndent => "create-indent",
            PageId::ApproveIndent => "approve-indent",
            PageId::Lifting => "lifting",
            PageId::StoreIn => "store-in",
            PageId::TallyEntry => "tally-entry",
            PageId::MakePayment => "make-payment",
            PageId::License => "license",
        }
    }

    /// Menu label.
    pub fn label(&self) -> &'static str {
        match self {
            PageId::Dashboard => "Dashboard",
            PageId::CreateIndent => "Create Indent",
            PageId::ApproveIndent => "Approve Indent",
            PageId::Lifting => "Lifting",
            PageId::StoreIn => "Store In",
            PageId::TallyEntry => "Tally Entry",
            PageId::MakePayment => "Make Payment",
            PageId::License => "License",
        }
    }

    /// Exact, case-sensitive match against the known ids.
    pub fn parse(id: &str) -> Option<PageId> {
        PageId::ALL.iter().copied().find(|page| page.as_str() == id)
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PageId {
    type Err = FmsLinkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PageId::parse(s).ok_or_else(|| FmsLinkError::ValidationError(format!("Unknown page '{}'", s)))
    }
}
