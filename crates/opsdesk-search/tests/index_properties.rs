use serde_json::json;
use std::sync::Arc;

use opsdesk_core::config::SearchSettings;
use opsdesk_core::traits::SearchIndex;
use opsdesk_core::Category;
use opsdesk_search::{QueryPolicy, SearchIndexStore};

fn seeded() -> SearchIndexStore {
    let store = SearchIndexStore::new();
    store.update_raw(Category::Employees, &[json!({"id": 1, "name": "Alice Smith", "role": "Engineer"})]);
    store.update_raw(Category::Projects, &[json!({"id": 2, "name": "Apollo", "status": "Active"})]);
    store
}

#[test]
fn substring_scenario_al_matches_only_the_employee() {
    let store = seeded();
    let hits = store.query("al");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].category, Category::Employees);
    assert_eq!(hits[0].title, "Alice Smith");
    assert_eq!(hits[0].path, "/employees");
    assert_eq!(hits[0].fields["role"], json!("Engineer"));
}

#[test]
fn substring_scenario_pol_matches_only_the_project() {
    let store = seeded();
    let hits = store.query("pol");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].category, Category::Projects);
    assert_eq!(hits[0].title, "Apollo");
    assert_eq!(hits[0].path, "/projects");
}

#[test]
fn terms_under_two_chars_return_nothing() {
    let store = seeded();
    for term in ["", " ", "a", " a ", "\tA\n"] {
        assert!(store.query(term).is_empty(), "term {term:?}");
    }
}

#[test]
fn matching_ignores_case() {
    let store = seeded();
    assert_eq!(store.query("ALICE"), store.query("alice"));
    assert_eq!(store.query("aLiCe").len(), 1);
}

#[test]
fn update_replaces_instead_of_merging() {
    let store = SearchIndexStore::new();
    store.update_raw(Category::Events, &[json!({"id": 1, "title": "Kickoff meeting"})]);
    store.update_raw(Category::Events, &[json!({"id": 2, "title": "Retro meeting"})]);

    let hits = store.query("meeting");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, "2");
    assert!(store.query("kickoff").is_empty());
}

#[test]
fn truncation_keeps_category_then_insertion_order() {
    let store = SearchIndexStore::new();
    let employees: Vec<_> = (0..8).map(|i| json!({"id": i, "name": format!("Ops member {i}")})).collect();
    let projects: Vec<_> = (0..5).map(|i| json!({"id": 100 + i, "name": format!("Ops project {i}")})).collect();
    // navigation precedes employees in enumeration order even when written last
    store.update_raw(Category::Projects, &projects);
    store.update_raw(Category::Employees, &employees);
    store.update_raw(Category::Navigation, &[json!({"id": "ops", "title": "Ops overview", "path": "/ops"})]);

    let outcome = store.search("ops");
    assert_eq!(outcome.total_matches, 14);
    assert_eq!(outcome.hits.len(), 10);

    let ids: Vec<_> = outcome.hits.iter().map(|h| h.id.clone()).collect();
    let mut expected = vec!["ops".to_string()];
    expected.extend((0..8).map(|i| i.to_string()));
    expected.push("100".to_string());
    assert_eq!(ids, expected);
    assert_eq!(outcome.hits[0].path, "/ops");
}

#[test]
fn one_large_category_starves_later_ones() {
    let store = SearchIndexStore::new();
    let docs: Vec<_> = (0..12).map(|i| json!({"id": i, "title": format!("Budget sheet {i}")})).collect();
    store.update_raw(Category::Finances, &docs);
    store.update_raw(Category::Documents, &[json!({"id": "d", "title": "Budget policy"})]);

    let hits = store.query("budget");
    assert_eq!(hits.len(), 10);
    assert!(hits.iter().all(|h| h.category == Category::Finances));
}

#[test]
fn malformed_rows_are_coerced() {
    let store = SearchIndexStore::new();
    store.update_raw(Category::Announcements, &[json!(null), json!(42), json!({"body": "Office closed friday"})]);

    let hits = store.query("friday");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].title, "Result");
    assert_eq!(hits[0].id, "");
    assert_eq!(hits[0].path, "/notifications");
    assert_eq!(store.query("42").len(), 1);
}

#[test]
fn configured_policy_changes_limits_and_routes() {
    let mut settings = SearchSettings { max_results: 2, min_query_chars: 3, ..SearchSettings::default() };
    settings.routes.insert("employees".into(), "/people".into());
    let store = SearchIndexStore::with_policy(QueryPolicy::from_settings(&settings).unwrap());
    store.update_raw(
        Category::Employees,
        &[json!({"name": "Ann"}), json!({"name": "Anna"}), json!({"name": "Annika"})],
    );

    assert!(store.query("an").is_empty());
    let hits = store.query("ann");
    assert_eq!(hits.len(), 2);
    assert!(hits.iter().all(|h| h.path == "/people"));
}

#[tokio::test]
async fn subscribers_see_only_effective_changes() {
    let store = Arc::new(SearchIndexStore::new());
    let mut rx = store.subscribe();
    let writer = store.claim(Category::Vacations).unwrap();

    let rows = [json!({"id": 1, "employee": "Bob", "status": "approved"})];
    writer.update_raw(&rows);
    writer.update_raw(&rows);
    writer.clear();

    let first = rx.recv().await.unwrap();
    assert_eq!((first.category, first.len, first.revision), (Category::Vacations, 1, 1));
    let second = rx.recv().await.unwrap();
    assert_eq!((second.len, second.revision), (0, 2));
    assert!(rx.try_recv().is_err());
}

#[test]
fn store_is_usable_through_the_trait() {
    let store: Box<dyn SearchIndex> = Box::new(SearchIndexStore::new());
    let records = vec![opsdesk_core::IndexedRecord::new("w1", "Sprint load", "Sprint load 32h")];
    assert!(store.update(Category::Workload, records.clone()));
    assert!(!store.update(Category::Workload, records));
    assert_eq!(store.query("32h")[0].path, "/workload");
}
