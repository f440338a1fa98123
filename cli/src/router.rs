//! Authorization router
//!
//! Tracks the current page and keeps it inside the user's allowed pages.

use fms_link::PageId;

/// Shown when the current page is not in the allowed list.
pub const ACCESS_DENIED_MESSAGE: &str =
    "You don't have permission to access this page. Contact administrator.";

/// Landing page when a user has no pages at all.
pub const DEFAULT_LANDING_PAGE: &str = "dashboard";

/// Result of rendering the current page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteView {
    AccessDenied,
    Page(PageId),
}

#[derive(Debug, Clone)]
pub struct AuthorizationRouter {
    current_page: String,
    allowed_pages: Vec<String>,
}

impl AuthorizationRouter {
    /// Router positioned on the first allowed page.
    pub fn new(allowed_pages: Vec<String>) -> Self {
        let current_page = allowed_pages
            .first()
            .cloned()
            .unwrap_or_else(|| DEFAULT_LANDING_PAGE.to_string());
        Self {
            current_page,
            allowed_pages,
        }
    }

    pub fn current_page(&self) -> &str {
        &self.current_page
    }

    pub fn allowed_pages(&self) -> &[String] {
        &self.allowed_pages
    }

    pub fn is_authorized(&self) -> bool {
        self.allowed_pages.iter().any(|p| *p == self.current_page)
    }

    /// Move back to the first allowed page if the current one is not allowed.
    ///
    /// Returns `true` when the page changed.
    pub fn enforce(&mut self) -> bool {
        if self.is_authorized() {
            return false;
        }
        let Some(first) = self.allowed_pages.first() else {
            return false;
        };

        log::debug!(
            "[ROUTER] '{}' not allowed, redirecting to '{}'",
            self.current_page,
            first
        );
        self.current_page = first.clone();
        true
    }

    /// Select a page. No check happens here; the next render shows access
    /// denied for a forbidden page and the next [`enforce`](Self::enforce)
    /// moves off it.
    pub fn navigate(&mut self, page: impl Into<String>) {
        self.current_page = page.into();
        log::debug!("[ROUTER] Navigated to '{}'", self.current_page);
    }

    /// Replace the allowed pages and re-check the current page.
    pub fn set_allowed_pages(&mut self, allowed_pages: Vec<String>) {
        self.allowed_pages = allowed_pages;
        self.enforce();
    }

    /// View for the current page. Ids outside the known set render the dashboard.
    pub fn render(&self) -> RouteView {
        if !self.is_authorized() {
            return RouteView::AccessDenied;
        }
        RouteView::Page(PageId::parse(&self.current_page).unwrap_or(PageId::Dashboard))
    }

    pub fn title(&self) -> String {
        page_title(&self.current_page)
    }
}

/// Header title: `make-payment` becomes `Make Payment`.
pub fn page_title(page: &str) -> String {
    page.split('-')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
