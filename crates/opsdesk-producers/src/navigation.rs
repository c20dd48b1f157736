//! The dashboard's own pages, indexed under `navigation`.

use opsdesk_core::traits::Searchable;
use opsdesk_core::IndexedRecord;

use crate::models::{NavigationEntry, RowId};

const PAGES: &[(&str, &str, &str, &[&str])] = &[
    ("dashboard", "Dashboard", "/dashboard", &["home", "overview"]),
    ("employees", "Employees", "/employees", &["staff", "directory", "team"]),
    ("projects", "Projects", "/projects", &["clients", "portfolio"]),
    ("finances", "Finances", "/finances", &["budget", "costs", "invoices"]),
    ("calendar", "Calendar", "/calendar", &["events", "meetings", "schedule"]),
    ("tasks", "Tasks", "/tasks", &["activities", "todo", "board"]),
    ("vacations", "Vacations", "/vacations", &["leave", "absence", "holiday"]),
    ("info-portal", "Info Portal", "/info-portal", &["wiki", "handbook", "guides"]),
    ("workload", "Workload", "/workload", &["capacity", "hours", "utilization"]),
    ("documents", "Documents", "/documents", &["files", "uploads"]),
    ("notifications", "Notifications", "/notifications", &["announcements", "news"]),
    ("messages", "Messages", "/messages", &["chat", "conversations"]),
    ("settings", "Settings", "/settings", &["profile", "preferences"]),
];

pub fn dashboard_pages() -> Vec<NavigationEntry> {
    PAGES
        .iter()
        .map(|(id, title, path, keywords)| NavigationEntry {
            id: Some(RowId::Text((*id).to_string())),
            title: Some((*title).to_string()),
            path: Some((*path).to_string()),
            description: None,
            keywords: keywords.iter().map(|k| (*k).to_string()).collect(),
        })
        .collect()
}

pub fn navigation_records() -> Vec<IndexedRecord> {
    dashboard_pages().iter().map(Searchable::to_record).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_page_has_an_explicit_path() {
        let records = navigation_records();
        assert_eq!(records.len(), PAGES.len());
        assert!(records.iter().all(|r| r.path.as_deref().is_some_and(|p| p.starts_with('/'))));
    }

    #[test]
    fn keywords_are_searchable() {
        let records = navigation_records();
        let leave = records.iter().find(|r| r.matches("holiday")).unwrap();
        assert_eq!(leave.title, "Vacations");
        assert_eq!(leave.path.as_deref(), Some("/vacations"));
    }
}
