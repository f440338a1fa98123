//! Create indent: master data for the form, submission, and the searchable
//! indent history.

use fms_link::{FmsClient, IndentForm, IndentReceipt, MasterData, PageId, WorkflowRecord};
use std::time::{Duration, Instant};

use super::{describe_fetch_error, describe_submit_error, PendingList, INDENT_RESET_DELAY};
use crate::error::Result;
use crate::parser::FormFields;

/// Columns matched by the history search.
pub const HISTORY_SEARCH_COLUMNS: [&str; 5] = [
    "Indentor Name",
    "Indent No.",
    "Indent No",
    "Product Name",
    "Area Of Machine",
];

/// Build the form from `indent key=value…` arguments.
pub fn form_from_fields(fields: &FormFields) -> Result<IndentForm> {
    Ok(IndentForm {
        indentor_name: fields.text("indentorName"),
        area_of_machine: fields.text("areaOfMachine"),
        group_head: fields.text("groupHead"),
        product_name: fields.text("productName"),
        qty: fields.integer("qty")?,
        specifications: fields.text("specifications"),
    })
}

pub fn success_message(receipt: &IndentReceipt) -> String {
    format!("Indent created successfully! Indent No: {}", receipt.indent_no)
}

pub fn master_summary(master: &MasterData) -> String {
    format!(
        "Loaded {} indentors, {} groups, {} products",
        master.indentor_names.len(),
        master.group_heads.len(),
        master.product_names.len()
    )
}

/// History rows matching `needle`, in received order.
pub fn search_history<'a>(rows: &'a [WorkflowRecord], needle: Option<&str>) -> Vec<&'a WorkflowRecord> {
    match needle.map(str::trim).filter(|n| !n.is_empty()) {
        Some(needle) => rows
            .iter()
            .filter(|r| r.matches_search(&HISTORY_SEARCH_COLUMNS, needle))
            .collect(),
        None => rows.iter().collect(),
    }
}

#[derive(Debug, Default)]
pub struct CreateIndentPage {
    master: Option<MasterData>,
    master_error: Option<String>,
    history: PendingList,
    receipt: Option<(IndentReceipt, Instant)>,
}

impl CreateIndentPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn master(&self) -> Option<&MasterData> {
        self.master.as_ref()
    }

    pub fn master_error(&self) -> Option<&str> {
        self.master_error.as_deref()
    }

    pub fn history(&self) -> &PendingList {
        &self.history
    }

    /// Indent number shown until the form resets.
    pub fn receipt(&self) -> Option<&IndentReceipt> {
        self.receipt.as_ref().map(|(receipt, _)| receipt)
    }

    pub async fn load_master(&mut self, client: &FmsClient) -> std::result::Result<&MasterData, String> {
        match client.get_master_data().await {
            Ok(master) => {
                self.master_error = None;
                Ok(&*self.master.insert(master))
            }
            Err(e) => {
                let message = describe_fetch_error(&e);
                self.master_error = Some(message.clone());
                Err(message)
            }
        }
    }

    pub async fn load_history(&mut self, client: &FmsClient) -> bool {
        self.history.refresh(client, PageId::CreateIndent).await
    }

    /// Submit a new indent and return the confirmation text.
    pub async fn submit(
        &mut self,
        client: &FmsClient,
        form: &IndentForm,
    ) -> std::result::Result<String, String> {
        match client.submit_indent(form).await {
            Ok(receipt) => {
                let message = success_message(&receipt);
                self.receipt = Some((receipt, Instant::now()));
                Ok(message)
            }
            Err(e) => {
                log::warn!("[PAGES] Indent submission failed: {}", e);
                Err(describe_submit_error(&e))
            }
        }
    }

    /// Clear the confirmation once its delay has passed.
    pub fn reset_expired(&mut self, now: Instant) -> bool {
        self.reset_after(now, INDENT_RESET_DELAY)
    }

    fn reset_after(&mut self, now: Instant, delay: Duration) -> bool {
        let expired = self
            .receipt
            .as_ref()
            .is_some_and(|(_, at)| now.saturating_duration_since(*at) >= delay);
        if expired {
            self.receipt = None;
        }
        expired
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(words: &[&str]) -> FormFields {
        let words: Vec<String> = words.iter().map(|w| w.to_string()).collect();
        FormFields::parse(&words).unwrap()
    }

    #[test]
    fn test_form_from_fields() {
        let form = form_from_fields(&fields(&[
            "indentor_name=Ravi",
            "area-of-machine=Kiln",
            "groupHead=Mechanical",
            "productName=Bearing",
            "qty=6",
        ]))
        .unwrap();
        assert_eq!(form.indentor_name, "Ravi");
        assert_eq!(form.area_of_machine, "Kiln");
        assert_eq!(form.qty, 6);
        assert_eq!(form.specifications, "");
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_validation_messages() {
        let missing = form_from_fields(&fields(&["indentorName=Ravi", "qty=2"])).unwrap();
        assert_eq!(
            missing.validate().unwrap_err().to_string(),
            "Please fill in all required fields"
        );

        let zero = form_from_fields(&fields(&[
            "indentorName=Ravi",
            "areaOfMachine=Kiln",
            "groupHead=Mechanical",
            "productName=Bearing",
        ]))
        .unwrap();
        assert_eq!(zero.validate().unwrap_err().to_string(), "Please enter a valid quantity");

        assert!(form_from_fields(&fields(&["qty=two"])).is_err());
    }

    #[test]
    fn test_history_search() {
        let rows: Vec<WorkflowRecord> = vec![
            serde_json::from_value(json!({"Indent No.": "IN-0001", "Indentor Name": "Ravi", "Product Name": "Bearing"})).unwrap(),
            serde_json::from_value(json!({"Indent No": "IN-0002", "Indentor Name": "Meena", "Area Of Machine": "Kiln"})).unwrap(),
            serde_json::from_value(json!({"Indent No.": "IN-0003", "Indentor Name": "Arun", "Product Name": "V-Belt"})).unwrap(),
        ];

        assert_eq!(search_history(&rows, None).len(), 3);
        assert_eq!(search_history(&rows, Some("in-0002"))[0].text("Indentor Name"), "Meena");
        assert_eq!(search_history(&rows, Some("KILN")).len(), 1);
        assert_eq!(search_history(&rows, Some("belt"))[0].text("Indentor Name"), "Arun");
        assert!(search_history(&rows, Some("pump")).is_empty());
    }

    #[test]
    fn test_messages() {
        let receipt: IndentReceipt = serde_json::from_value(json!({"indentNo": "IN-0042"})).unwrap();
        assert_eq!(
            success_message(&receipt),
            "Indent created successfully! Indent No: IN-0042"
        );

        let master = MasterData {
            indentor_names: vec!["Ravi".into(), "Meena".into()],
            group_heads: vec!["Mechanical".into()],
            product_names: Vec::new(),
        };
        assert_eq!(master_summary(&master), "Loaded 2 indentors, 1 groups, 0 products");
    }

    #[test]
    fn test_receipt_resets_after_delay() {
        let mut page = CreateIndentPage::new();
        let at = Instant::now();
        page.receipt = Some((
            serde_json::from_value(json!({"indentNo": "IN-0042"})).unwrap(),
            at,
        ));

        assert!(!page.reset_expired(at + Duration::from_secs(2)));
        assert_eq!(page.receipt().map(|r| r.indent_no.as_str()), Some("IN-0042"));
        assert!(page.reset_expired(at + Duration::from_secs(3)));
        assert!(page.receipt().is_none());
    }
}
