//! Dashboard: workflow totals and a monthly breakdown computed from the
//! full indent history.

use chrono::NaiveDate;
use fms_link::{FmsClient, FmsLinkError, WorkflowRecord};
use serde::Serialize;
use std::collections::BTreeMap;

/// Months kept in the breakdown, newest last.
pub const MONTHS_SHOWN: usize = 6;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub total_indents: usize,
    pub approved: usize,
    pub rejected: usize,
    pub pending_approval: usize,
    pub pending_lifting: usize,
    pub pending_store_in: usize,
    pub pending_tally_entry: usize,
    pub completed: usize,
    pub monthly: Vec<MonthlyBucket>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MonthlyBucket {
    /// `yyyy-MM`
    pub key: String,
    /// `Jan 24`
    pub label: String,
    pub indents: usize,
    pub approved: usize,
    pub rejected: usize,
    pub completed: usize,
}

fn has_outcome(record: &WorkflowRecord, outcome: &str) -> bool {
    record.text_eq_ignore_case("What", outcome) || record.text_eq_ignore_case("Status", outcome)
}

/// Planned on stage `suffix` but not yet actual.
fn pending_at(record: &WorkflowRecord, suffix: &str) -> bool {
    record.is_filled(&format!("Planned{}", suffix)) && !record.is_filled(&format!("Actual{}", suffix))
}

fn is_completed(record: &WorkflowRecord) -> bool {
    record.is_filled("Actual3")
}

/// Month of a `dd/MM/yyyy HH:mm:ss` timestamp.
fn month_of(record: &WorkflowRecord) -> Option<NaiveDate> {
    let raw = record.get("Timestamp")?.as_str()?;
    let date_part = raw.split_whitespace().next()?;
    NaiveDate::parse_from_str(date_part, "%d/%m/%Y").ok()
}

pub fn compute_stats(records: &[WorkflowRecord]) -> DashboardStats {
    let mut stats = DashboardStats {
        total_indents: records.len(),
        ..Default::default()
    };
    let mut months: BTreeMap<String, MonthlyBucket> = BTreeMap::new();

    for record in records {
        let approved = has_outcome(record, "approved");
        let rejected = has_outcome(record, "rejected");
        let completed = is_completed(record);

        stats.approved += approved as usize;
        stats.rejected += rejected as usize;
        stats.completed += completed as usize;
        stats.pending_approval += pending_at(record, "") as usize;
        stats.pending_lifting += pending_at(record, "1") as usize;
        stats.pending_store_in += pending_at(record, "2") as usize;
        stats.pending_tally_entry += pending_at(record, "3") as usize;

        if let Some(date) = month_of(record) {
            let key = date.format("%Y-%m").to_string();
            let bucket = months.entry(key.clone()).or_insert_with(|| MonthlyBucket {
                key,
                label: date.format("%b %y").to_string(),
                ..Default::default()
            });
            bucket.indents += 1;
            bucket.approved += approved as usize;
            bucket.rejected += rejected as usize;
            bucket.completed += completed as usize;
        }
    }

    let skip = months.len().saturating_sub(MONTHS_SHOWN);
    stats.monthly = months.into_values().skip(skip).collect();
    stats
}

/// Dashboard state: the last computed stats or the load error.
#[derive(Debug, Default)]
pub struct DashboardPage {
    stats: Option<DashboardStats>,
    error: Option<String>,
}

impl DashboardPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> Option<&DashboardStats> {
        self.stats.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub async fn load(&mut self, client: &FmsClient) -> Option<&DashboardStats> {
        match client.get_fms_history().await {
            Ok(records) => {
                self.error = None;
                self.stats = Some(compute_stats(&records));
            }
            Err(e) => {
                log::warn!("[PAGES] Dashboard load failed: {}", e);
                self.error = Some(describe_load_error(&e));
            }
        }
        self.stats.as_ref().filter(|_| self.error.is_none())
    }
}

fn describe_load_error(err: &FmsLinkError) -> String {
    let detail = match err {
        FmsLinkError::RemoteError(msg) => msg.clone(),
        other => other.to_string(),
    };
    format!("Failed to load dashboard data: {}", detail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: serde_json::Value) -> WorkflowRecord {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_stage_counts() {
        let records = vec![
            record(json!({"rowNumber": 2, "Planned": "01/01/2024", "Actual": ""})),
            record(json!({"rowNumber": 3, "Planned": "01/01/2024", "Actual": "02/01/2024", "What": "Approved",
                          "Planned1": "03/01/2024", "Actual1": " "})),
            record(json!({"rowNumber": 4, "Status": "REJECTED"})),
            record(json!({"rowNumber": 5, "What": "approved", "Planned2": "x", "Planned3": "y", "Actual3": "z"})),
            record(json!({"rowNumber": 6, "Planned3": "y"})),
        ];

        let stats = compute_stats(&records);
        assert_eq!(stats.total_indents, 5);
        assert_eq!(stats.approved, 2);
        assert_eq!(stats.rejected, 1);
        assert_eq!(stats.pending_approval, 1);
        assert_eq!(stats.pending_lifting, 1);
        assert_eq!(stats.pending_store_in, 1);
        assert_eq!(stats.pending_tally_entry, 1);
        assert_eq!(stats.completed, 1);
    }

    #[test]
    fn test_monthly_breakdown_keeps_last_six_months() {
        let mut records: Vec<WorkflowRecord> = (1..=8)
            .map(|month| {
                record(json!({
                    "Timestamp": format!("15/{:02}/2024 10:30:00", month),
                    "What": if month == 8 { "Approved" } else { "" }
                }))
            })
            .collect();
        records.push(record(json!({"Timestamp": "03/08/2024 09:00:00", "Actual3": "done"})));
        records.push(record(json!({"Timestamp": "not a date"})));
        records.push(record(json!({"Timestamp": 45123})));

        let stats = compute_stats(&records);
        let keys: Vec<&str> = stats.monthly.iter().map(|m| m.key.as_str()).collect();
        assert_eq!(keys, vec!["2024-03", "2024-04", "2024-05", "2024-06", "2024-07", "2024-08"]);

        let august = stats.monthly.last().unwrap();
        assert_eq!(august.label, "Aug 24");
        assert_eq!(august.indents, 2);
        assert_eq!(august.approved, 1);
        assert_eq!(august.completed, 1);
    }

    #[test]
    fn test_months_sort_across_years() {
        let records = vec![
            record(json!({"Timestamp": "01/01/2025 00:00:00"})),
            record(json!({"Timestamp": "31/12/2024 23:59:59"})),
        ];
        let stats = compute_stats(&records);
        assert_eq!(stats.monthly[0].label, "Dec 24");
        assert_eq!(stats.monthly[1].label, "Jan 25");
    }

    #[test]
    fn test_empty_history() {
        let stats = compute_stats(&[]);
        assert_eq!(stats, DashboardStats::default());
    }

    #[test]
    fn test_load_error_text() {
        assert_eq!(
            describe_load_error(&FmsLinkError::RemoteError("Failed to fetch history".into())),
            "Failed to load dashboard data: Failed to fetch history"
        );
    }
}
