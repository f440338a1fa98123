//! Workflow pages
//!
//! Every list page follows the same cycle: fetch the pending rows on open,
//! show them, submit an action for one row, drop that row locally once the
//! endpoint accepts it. [`PendingList`] holds that state; the per-page
//! modules add their form handling and messages.

pub mod approve_indent;
pub mod create_indent;
pub mod dashboard;
pub mod license;
pub mod lifting;
pub mod make_payment;
pub mod store_in;
pub mod tally_entry;

use fms_link::{FmsClient, FmsLinkError, PageId, WorkflowRecord};
use std::future::Future;
use std::time::{Duration, Instant};

/// How long a submitted overlay stays open.
pub const DISMISS_DELAY: Duration = Duration::from_secs(2);

/// How long the create-indent confirmation stays before the form resets.
pub const INDENT_RESET_DELAY: Duration = Duration::from_secs(3);

/// Issued by [`PendingList::begin_fetch`]; only the newest ticket may land.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket(u64);

/// Row detail opened from a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Overlay {
    pub row_number: u64,
    submitted_at: Option<Instant>,
}

impl Overlay {
    pub fn open(row_number: u64) -> Self {
        Self {
            row_number,
            submitted_at: None,
        }
    }

    pub fn mark_submitted(&mut self, at: Instant) {
        self.submitted_at = Some(at);
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted_at.is_some()
    }

    /// A submitted overlay closes once `delay` has passed.
    pub fn should_dismiss(&self, now: Instant, delay: Duration) -> bool {
        self.submitted_at
            .map(|at| now.saturating_duration_since(at) >= delay)
            .unwrap_or(false)
    }
}

/// Rows of one page plus its fetch and overlay state.
#[derive(Debug, Default)]
pub struct PendingList {
    rows: Vec<WorkflowRecord>,
    error: Option<String>,
    loaded: bool,
    generation: u64,
    in_flight: Option<u64>,
    overlay: Option<Overlay>,
}

impl PendingList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> &[WorkflowRecord] {
        &self.rows
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Start a fetch. Earlier tickets become stale.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.generation += 1;
        self.in_flight = Some(self.generation);
        self.error = None;
        FetchTicket(self.generation)
    }

    /// Apply a fetch result. Returns `false` and changes nothing when a newer
    /// fetch has started since `ticket` was issued.
    pub fn finish_fetch(
        &mut self,
        ticket: FetchTicket,
        result: fms_link::Result<Vec<WorkflowRecord>>,
    ) -> bool {
        if ticket.0 != self.generation {
            log::debug!(
                "[PAGES] Discarding stale fetch {} (current {})",
                ticket.0,
                self.generation
            );
            return false;
        }

        self.in_flight = None;
        match result {
            Ok(rows) => {
                self.rows = rows;
                self.error = None;
                self.loaded = true;
            }
            Err(e) => {
                log::warn!("[PAGES] Fetch failed: {}", e);
                self.error = Some(describe_fetch_error(&e));
            }
        }
        true
    }

    /// Fetch the rows behind `page` and apply them.
    pub async fn refresh(&mut self, client: &FmsClient, page: PageId) -> bool {
        let ticket = self.begin_fetch();
        let result = fetch_rows(client, page).await;
        self.finish_fetch(ticket, result)
    }

    pub fn find(&self, row_number: u64) -> Option<&WorkflowRecord> {
        self.rows.iter().find(|r| r.row_number == Some(row_number))
    }

    pub fn remove_row(&mut self, row_number: u64) -> Option<WorkflowRecord> {
        let index = self
            .rows
            .iter()
            .position(|r| r.row_number == Some(row_number))?;
        Some(self.rows.remove(index))
    }

    /// Rows whose `columns` contain `needle`, case-insensitive. No needle keeps every row.
    pub fn filter(&self, columns: &[&str], needle: Option<&str>) -> Vec<&WorkflowRecord> {
        match needle.map(str::trim).filter(|n| !n.is_empty()) {
            Some(needle) => self
                .rows
                .iter()
                .filter(|r| r.matches_search(columns, needle))
                .collect(),
            None => self.rows.iter().collect(),
        }
    }

    /// Open the overlay for a row in the list.
    pub fn select(&mut self, row_number: u64) -> Option<&WorkflowRecord> {
        let row = self.rows.iter().find(|r| r.row_number == Some(row_number))?;
        self.overlay = Some(Overlay::open(row_number));
        Some(row)
    }

    pub fn overlay(&self) -> Option<&Overlay> {
        self.overlay.as_ref()
    }

    pub fn close_overlay(&mut self) {
        self.overlay = None;
    }

    /// Close a submitted overlay whose delay has passed. Returns `true` when closed.
    pub fn dismiss_expired(&mut self, now: Instant, delay: Duration) -> bool {
        if self.overlay.is_some_and(|o| o.should_dismiss(now, delay)) {
            self.overlay = None;
            return true;
        }
        false
    }

    /// Submit an action for `row_number`.
    ///
    /// The row must be in the list. On success it is removed and its overlay
    /// marked submitted; on failure the list is left as it was and the
    /// message to show is returned.
    pub async fn submit_row<F>(&mut self, row_number: u64, action: F) -> Result<WorkflowRecord, String>
    where
        F: Future<Output = fms_link::Result<()>>,
    {
        self.submit_row_with(row_number, action, describe_submit_error)
            .await
    }

    /// [`submit_row`](Self::submit_row) with a page-specific failure message.
    pub async fn submit_row_with<F>(
        &mut self,
        row_number: u64,
        action: F,
        describe: fn(&FmsLinkError) -> String,
    ) -> Result<WorkflowRecord, String>
    where
        F: Future<Output = fms_link::Result<()>>,
    {
        if self.find(row_number).is_none() {
            return Err(format!("Row {} is not in the pending list", row_number));
        }
        self.overlay = Some(Overlay::open(row_number));

        match action.await {
            Ok(()) => {
                if let Some(overlay) = self.overlay.as_mut() {
                    overlay.mark_submitted(Instant::now());
                }
                self.remove_row(row_number)
                    .ok_or_else(|| format!("Row {} is not in the pending list", row_number))
            }
            Err(e) => {
                log::warn!("[PAGES] Submission for row {} failed: {}", row_number, e);
                Err(describe(&e))
            }
        }
    }
}

/// List action behind each page.
pub async fn fetch_rows(client: &FmsClient, page: PageId) -> fms_link::Result<Vec<WorkflowRecord>> {
    match page {
        PageId::Dashboard | PageId::CreateIndent => client.get_fms_history().await,
        PageId::ApproveIndent => client.get_pending_approvals().await,
        PageId::Lifting => client.get_pending_lifting().await,
        PageId::StoreIn => client.get_pending_store_in().await,
        PageId::TallyEntry => client.get_pending_tally_entry().await,
        PageId::MakePayment => client.get_pending_payments().await,
        PageId::License => Ok(Vec::new()),
    }
}

/// Columns matched by `list <search>` on each page.
pub fn search_columns(page: PageId) -> &'static [&'static str] {
    match page {
        PageId::MakePayment => &make_payment::SEARCH_COLUMNS,
        PageId::Dashboard | PageId::CreateIndent => &create_indent::HISTORY_SEARCH_COLUMNS,
        _ => &["Indent No.", "Indent No", "Indentor Name", "Product Name", "Vendor Name"],
    }
}

/// Error panel text for a failed fetch.
pub fn describe_fetch_error(err: &FmsLinkError) -> String {
    match err {
        FmsLinkError::RemoteError(msg) => msg.clone(),
        other => format!("Network error: {}", other),
    }
}

/// Blocking message for a failed submission.
pub fn describe_submit_error(err: &FmsLinkError) -> String {
    match err {
        FmsLinkError::RemoteError(msg) | FmsLinkError::ValidationError(msg) => {
            format!("Error: {}", msg)
        }
        other => format!("Error during submission: {}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(n: u64, name: &str) -> WorkflowRecord {
        WorkflowRecord::new(Some(n)).with_column("Indentor Name", name)
    }

    #[test]
    fn test_fetch_replaces_rows_and_clears_error() {
        let mut list = PendingList::new();
        let ticket = list.begin_fetch();
        assert!(list.is_loading());
        assert!(list.finish_fetch(ticket, Err(FmsLinkError::RemoteError("Sheet busy".into()))));
        assert_eq!(list.error(), Some("Sheet busy"));
        assert!(!list.is_loaded());

        let ticket = list.begin_fetch();
        assert_eq!(list.error(), None);
        assert!(list.finish_fetch(ticket, Ok(vec![row(1, "Ravi"), row(2, "Meena")])));
        assert_eq!(list.len(), 2);
        assert!(list.is_loaded());
        assert!(!list.is_loading());
    }

    #[test]
    fn test_stale_fetch_is_discarded() {
        let mut list = PendingList::new();
        let first = list.begin_fetch();
        let second = list.begin_fetch();

        assert!(list.finish_fetch(second, Ok(vec![row(2, "Meena")])));
        assert!(!list.finish_fetch(first, Ok(vec![row(1, "Ravi")])));
        assert_eq!(list.rows()[0].row_number, Some(2));

        let third = list.begin_fetch();
        assert!(!list.finish_fetch(second, Err(FmsLinkError::TimeoutError("late".into()))));
        assert!(list.is_loading());
        assert!(list.finish_fetch(third, Ok(Vec::new())));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            describe_fetch_error(&FmsLinkError::NetworkError("HTTP 500".into())),
            "Network error: Script loading failed: HTTP 500"
        );
        assert_eq!(
            describe_fetch_error(&FmsLinkError::RemoteError("Failed to fetch payment data".into())),
            "Failed to fetch payment data"
        );
        assert_eq!(
            describe_submit_error(&FmsLinkError::RemoteError("X".into())),
            "Error: X"
        );
        assert_eq!(
            describe_submit_error(&FmsLinkError::TimeoutError("no response within 30s".into())),
            "Error during submission: Request timeout: no response within 30s"
        );
    }

    #[test]
    fn test_filter_and_find() {
        let mut list = PendingList::new();
        let ticket = list.begin_fetch();
        list.finish_fetch(ticket, Ok(vec![row(1, "Ravi"), row(2, "Meena"), row(3, "ravindra")]));

        assert_eq!(list.filter(&["Indentor Name"], Some("RAVI")).len(), 2);
        assert_eq!(list.filter(&["Indentor Name"], Some("  ")).len(), 3);
        assert_eq!(list.filter(&["Indentor Name"], None).len(), 3);
        assert!(list.find(2).is_some());
        assert!(list.find(9).is_none());
        assert_eq!(list.remove_row(2).and_then(|r| r.row_number), Some(2));
        assert!(list.remove_row(2).is_none());
    }

    #[tokio::test]
    async fn test_submit_failure_leaves_list_unchanged() {
        let mut list = PendingList::new();
        let ticket = list.begin_fetch();
        list.finish_fetch(ticket, Ok(vec![row(7, "Ravi"), row(8, "Meena")]));

        let result = list
            .submit_row(8, async { Err(FmsLinkError::RemoteError("X".into())) })
            .await;
        assert_eq!(result.unwrap_err(), "Error: X");
        assert_eq!(list.len(), 2);
        assert!(!list.overlay().unwrap().is_submitted());
    }

    #[tokio::test]
    async fn test_submit_success_removes_row() {
        let mut list = PendingList::new();
        let ticket = list.begin_fetch();
        list.finish_fetch(ticket, Ok(vec![row(7, "Ravi"), row(8, "Meena")]));

        let removed = list.submit_row(7, async { Ok(()) }).await.unwrap();
        assert_eq!(removed.text("Indentor Name"), "Ravi");
        assert_eq!(list.len(), 1);

        let overlay = *list.overlay().unwrap();
        assert!(overlay.is_submitted());
        assert!(!list.dismiss_expired(Instant::now(), DISMISS_DELAY));
        assert!(list.dismiss_expired(Instant::now() + DISMISS_DELAY, DISMISS_DELAY));
        assert!(list.overlay().is_none());
    }

    #[tokio::test]
    async fn test_submit_unknown_row_sends_nothing() {
        let mut list = PendingList::new();
        let mut called = false;
        let result = list
            .submit_row(3, async {
                called = true;
                Ok(())
            })
            .await;
        assert!(result.is_err());
        assert!(!called);
    }

    #[test]
    fn test_overlay_timing() {
        let start = Instant::now();
        let mut overlay = Overlay::open(4);
        assert!(!overlay.should_dismiss(start + Duration::from_secs(60), DISMISS_DELAY));

        overlay.mark_submitted(start);
        assert!(!overlay.should_dismiss(start + Duration::from_millis(1999), DISMISS_DELAY));
        assert!(overlay.should_dismiss(start + Duration::from_secs(2), DISMISS_DELAY));
        assert!(!overlay.should_dismiss(start + Duration::from_secs(2), INDENT_RESET_DELAY));
    }
}
