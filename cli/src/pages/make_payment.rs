//! Make payment: list billed items and hand out their payment links.

use fms_link::WorkflowRecord;
use serde::Serialize;

pub const SEARCH_COLUMNS: [&str; 4] = ["Indent No.", "Indentor Name", "Product Name", "Bill No."];
pub const PAYMENT_LINK_COLUMN: &str = "Make Payment";
pub const NO_PAYMENT_LINK: &str = "No payment link available for this item";

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PaymentTotals {
    pub items: usize,
    pub amount: f64,
    pub with_link: usize,
}

/// Item count and amount over the shown rows; link count over every row.
pub fn totals(shown: &[&WorkflowRecord], all: &[WorkflowRecord]) -> PaymentTotals {
    PaymentTotals {
        items: shown.len(),
        amount: shown.iter().filter_map(|r| r.number("Amount")).sum(),
        with_link: all.iter().filter(|r| r.is_filled(PAYMENT_LINK_COLUMN)).count(),
    }
}

pub fn payment_link(record: &WorkflowRecord) -> Result<String, &'static str> {
    if record.is_filled(PAYMENT_LINK_COLUMN) {
        Ok(record.text(PAYMENT_LINK_COLUMN))
    } else {
        Err(NO_PAYMENT_LINK)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payments() -> Vec<WorkflowRecord> {
        serde_json::from_value(json!([
            {"rowNumber": 30, "Indent No.": "IN-0030", "Indentor Name": "Ravi", "Amount": 1500, "Make Payment": "https://pay.example.com/30"},
            {"rowNumber": 31, "Indent No.": "IN-0031", "Bill No.": "B-31", "Amount": "250.5", "Make Payment": ""},
            {"rowNumber": 32, "Indent No.": "IN-0032", "Product Name": "Bearing"}
        ]))
        .unwrap()
    }

    #[test]
    fn test_totals() {
        let all = payments();
        let shown: Vec<&WorkflowRecord> = all.iter().collect();
        let totals = totals(&shown, &all);
        assert_eq!(totals.items, 3);
        assert_eq!(totals.amount, 1750.5);
        assert_eq!(totals.with_link, 1);
    }

    #[test]
    fn test_search_then_totals() {
        let all = payments();
        let shown: Vec<&WorkflowRecord> = all
            .iter()
            .filter(|r| r.matches_search(&SEARCH_COLUMNS, "b-31"))
            .collect();
        let totals = totals(&shown, &all);
        assert_eq!(totals.items, 1);
        assert_eq!(totals.amount, 250.5);
        assert_eq!(totals.with_link, 1);
    }

    #[test]
    fn test_payment_link() {
        let all = payments();
        assert_eq!(payment_link(&all[0]).unwrap(), "https://pay.example.com/30");
        assert_eq!(payment_link(&all[1]).unwrap_err(), NO_PAYMENT_LINK);
        assert_eq!(payment_link(&all[2]).unwrap_err(), NO_PAYMENT_LINK);
    }
}
