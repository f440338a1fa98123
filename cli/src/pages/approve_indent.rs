//! Approve indent: approve or reject pending indents.

use fms_link::{ApprovalDecision, FmsClient, FmsLinkError, WorkflowRecord};

use super::PendingList;

/// Question asked before a decision is sent.
pub fn confirmation_prompt(record: &WorkflowRecord, decision: ApprovalDecision) -> String {
    let indent = record.text_any(&["Indent No.", "Indent No"]);
    let label = if indent.is_empty() {
        format!("row {}", record.row_number.unwrap_or_default())
    } else {
        indent
    };
    let verb = match decision {
        ApprovalDecision::Approve => "Approve",
        ApprovalDecision::Reject => "Reject",
    };
    format!("{} indent {}?", verb, label)
}

/// Send `decision` for `row_number`; the row leaves the list on success.
pub async fn decide(
    list: &mut PendingList,
    client: &FmsClient,
    row_number: u64,
    decision: ApprovalDecision,
) -> Result<&'static str, String> {
    list.submit_row_with(
        row_number,
        client.approval_action(row_number, decision),
        describe_decision_error,
    )
    .await
    .map(|_| decision.success_message())
}

/// Transport failures read "Network error during submission" on this page.
pub fn describe_decision_error(err: &FmsLinkError) -> String {
    if err.is_transport() {
        format!("Network error during submission: {}", err)
    } else {
        super::describe_submit_error(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confirmation_prompt() {
        let record = WorkflowRecord::new(Some(4)).with_column("Indent No.", "IN-0004");
        assert_eq!(
            confirmation_prompt(&record, ApprovalDecision::Approve),
            "Approve indent IN-0004?"
        );

        let bare = WorkflowRecord::new(Some(9));
        assert_eq!(
            confirmation_prompt(&bare, ApprovalDecision::Reject),
            "Reject indent row 9?"
        );
    }

    #[test]
    fn test_decision_error_wording() {
        assert_eq!(
            describe_decision_error(&FmsLinkError::TimeoutError("no response within 30s".into())),
            "Network error during submission: Request timeout: no response within 30s"
        );
        assert_eq!(
            describe_decision_error(&FmsLinkError::RemoteError("Already approved".into())),
            "Error: Already approved"
        );
    }

    #[tokio::test]
    async fn test_decide_reports_network_failure() {
        let client = FmsClient::builder()
            .base_url("http://127.0.0.1:9/exec")
            .build()
            .unwrap();
        let mut list = PendingList::new();
        let ticket = list.begin_fetch();
        list.finish_fetch(ticket, Ok(vec![WorkflowRecord::new(Some(4))]));

        let message = decide(&mut list, &client, 4, ApprovalDecision::Approve)
            .await
            .unwrap_err();
        assert!(
            message.starts_with("Network error during submission: "),
            "got {}",
            message
        );
        assert_eq!(list.len(), 1);
    }
}
