//! Sidebar menu: the canonical pages filtered to what a user may open.

use colored::*;
use fms_link::PageId;

pub const NO_PAGES_MESSAGE: &str = "No pages available";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuEntry {
    pub page: PageId,
    pub label: &'static str,
    pub active: bool,
}

/// Canonical menu, in display order.
pub fn menu_items() -> impl Iterator<Item = (PageId, &'static str)> {
    PageId::ALL.into_iter().map(|page| (page, page.label()))
}

/// Entries for `allowed_pages` in canonical order, the current page marked.
pub fn menu_entries(current_page: &str, allowed_pages: &[String]) -> Vec<MenuEntry> {
    menu_items()
        .filter(|(page, _)| allowed_pages.iter().any(|p| p == page.as_str()))
        .map(|(page, label)| MenuEntry {
            page,
            label,
            active: page.as_str() == current_page,
        })
        .collect()
}

pub fn render_sidebar(entries: &[MenuEntry], color: bool) -> String {
    if entries.is_empty() {
        return if color {
            NO_PAGES_MESSAGE.dimmed().to_string()
        } else {
            NO_PAGES_MESSAGE.to_string()
        };
    }

    entries
        .iter()
        .map(|entry| {
            let line = format!(
                "{} {:<15} {}",
                if entry.active { "▸" } else { " " },
                entry.label,
                entry.page.as_str()
            );
            match (color, entry.active) {
                (true, true) => line.cyan().bold().to_string(),
                (true, false) => line.normal().to_string(),
                _ => line,
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
