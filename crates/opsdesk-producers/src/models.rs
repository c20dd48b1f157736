//! Typed rows for every dashboard table and their index projections.
//!
//! Rows come from the remote tables with snake_case columns; camelCase
//! spellings are accepted as aliases. Every column except the id is optional
//! so partially populated rows still deserialize.
//!
//! Raw rows are always indexed from their own JSON value, so columns a model
//! does not declare still reach the searchable text and the hit fields. The
//! typed model only contributes a derived title for rows that carry neither
//! a `title` nor a `name`.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use tracing::debug;

use opsdesk_core::traits::Searchable;
use opsdesk_core::{Category, IndexedRecord};

/// Row identifiers are integers in some tables and uuids in others.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RowId {
    Int(i64),
    Text(String),
}

impl std::fmt::Display for RowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RowId::Int(n) => write!(f, "{n}"),
            RowId::Text(s) => f.write_str(s),
        }
    }
}

/// Title a model can compose from its own columns.
trait DerivedTitle {
    fn derived_title(&self) -> Option<String> {
        None
    }
}

/// `true` when `row` has a `title` or `name` normalization will pick up.
fn has_explicit_title(row: &Value) -> bool {
    ["title", "name"].iter().filter_map(|key| row.get(*key)).any(|v| match v {
        Value::String(s) => !s.trim().is_empty(),
        Value::Number(_) | Value::Bool(_) => true,
        Value::Null | Value::Array(_) | Value::Object(_) => false,
    })
}

/// Normalize `row` as-is, then fill in `derived` when the row has no title.
fn index_row(row: &Value, derived: Option<String>) -> IndexedRecord {
    let mut record = IndexedRecord::from_json(row);
    if !has_explicit_title(row) {
        if let Some(title) = derived.filter(|t| !t.trim().is_empty()) {
            record.title = title;
        }
    }
    record
}

/// Serialize a model built in code, drop null columns, and index it.
fn project<T: Serialize + DerivedTitle>(row: &T) -> IndexedRecord {
    let mut value = serde_json::to_value(row).unwrap_or(Value::Null);
    if let Value::Object(map) = &mut value {
        map.retain(|_, v| !v.is_null());
    }
    index_row(&value, row.derived_title())
}

fn joined(parts: &[&Option<String>], sep: &str) -> Option<String> {
    let parts: Vec<&str> = parts.iter().filter_map(|p| p.as_deref()).filter(|p| !p.is_empty()).collect();
    if parts.is_empty() { None } else { Some(parts.join(sep)) }
}

macro_rules! searchable {
    ($model:ty, $category:expr) => {
        impl Searchable for $model {
            const CATEGORY: Category = $category;

            fn to_record(&self) -> IndexedRecord {
                project(self)
            }
        }
    };
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationEntry {
    pub id: Option<RowId>,
    pub title: Option<String>,
    pub path: Option<String>,
    pub description: Option<String>,
    pub keywords: Vec<String>,
}

impl DerivedTitle for NavigationEntry {}

searchable!(NavigationEntry, Category::Navigation);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Employee {
    pub id: Option<RowId>,
    pub name: Option<String>,
    #[serde(alias = "firstName")]
    pub first_name: Option<String>,
    #[serde(alias = "lastName")]
    pub last_name: Option<String>,
    pub position: Option<String>,
    pub department: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
}

impl DerivedTitle for Employee {
    fn derived_title(&self) -> Option<String> {
        joined(&[&self.first_name, &self.last_name], " ")
    }
}

searchable!(Employee, Category::Employees);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Project {
    pub id: Option<RowId>,
    pub name: Option<String>,
    pub client: Option<String>,
    pub status: Option<String>,
    pub manager: Option<String>,
    pub description: Option<String>,
    #[serde(alias = "startDate")]
    pub start_date: Option<String>,
    #[serde(alias = "endDate")]
    pub end_date: Option<String>,
}

impl DerivedTitle for Project {}

searchable!(Project, Category::Projects);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinanceEntry {
    pub id: Option<RowId>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub amount: Option<Number>,
    pub currency: Option<String>,
    #[serde(alias = "type")]
    pub kind: Option<String>,
    pub category: Option<String>,
    pub date: Option<String>,
}

impl DerivedTitle for FinanceEntry {
    fn derived_title(&self) -> Option<String> {
        self.description.clone()
    }
}

searchable!(FinanceEntry, Category::Finances);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarEvent {
    pub id: Option<RowId>,
    pub title: Option<String>,
    #[serde(alias = "startDate", alias = "start")]
    pub start_date: Option<String>,
    #[serde(alias = "endDate", alias = "end")]
    pub end_date: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
}

impl DerivedTitle for CalendarEvent {}

searchable!(CalendarEvent, Category::Events);

/// A task on the activity board.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Activity {
    pub id: Option<RowId>,
    pub title: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub assignee: Option<String>,
    #[serde(alias = "dueDate")]
    pub due_date: Option<String>,
    pub description: Option<String>,
}

impl DerivedTitle for Activity {}

searchable!(Activity, Category::Activities);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vacation {
    pub id: Option<RowId>,
    #[serde(alias = "employeeName")]
    pub employee_name: Option<String>,
    #[serde(alias = "startDate")]
    pub start_date: Option<String>,
    #[serde(alias = "endDate")]
    pub end_date: Option<String>,
    pub status: Option<String>,
    #[serde(alias = "type")]
    pub kind: Option<String>,
}

impl DerivedTitle for Vacation {
    fn derived_title(&self) -> Option<String> {
        let range = joined(&[&self.start_date, &self.end_date], " to ");
        match (&self.employee_name, range) {
            (Some(name), Some(range)) => Some(format!("{name}: {range}")),
            (Some(name), None) => Some(name.clone()),
            (None, range) => range,
        }
    }
}

searchable!(Vacation, Category::Vacations);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InfoPortalEntry {
    pub id: Option<RowId>,
    pub title: Option<String>,
    pub content: Option<String>,
    pub category: Option<String>,
    pub author: Option<String>,
}

impl DerivedTitle for InfoPortalEntry {}

searchable!(InfoPortalEntry, Category::InfoPortal);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkloadEntry {
    pub id: Option<RowId>,
    #[serde(alias = "employeeName")]
    pub employee_name: Option<String>,
    #[serde(alias = "projectName")]
    pub project_name: Option<String>,
    pub hours: Option<Number>,
    pub week: Option<String>,
}

impl DerivedTitle for WorkloadEntry {
    fn derived_title(&self) -> Option<String> {
        joined(&[&self.employee_name, &self.project_name], " / ")
    }
}

searchable!(WorkloadEntry, Category::Workload);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Document {
    pub id: Option<RowId>,
    pub title: Option<String>,
    pub name: Option<String>,
    #[serde(alias = "fileName")]
    pub file_name: Option<String>,
    pub category: Option<String>,
    #[serde(alias = "uploadedBy")]
    pub uploaded_by: Option<String>,
}

impl DerivedTitle for Document {
    fn derived_title(&self) -> Option<String> {
        self.file_name.clone()
    }
}

searchable!(Document, Category::Documents);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Announcement {
    pub id: Option<RowId>,
    pub title: Option<String>,
    pub message: Option<String>,
    pub priority: Option<String>,
    #[serde(alias = "createdAt")]
    pub created_at: Option<String>,
}

impl DerivedTitle for Announcement {}

searchable!(Announcement, Category::Announcements);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Conversation {
    pub id: Option<RowId>,
    pub title: Option<String>,
    pub participants: Vec<String>,
    #[serde(alias = "lastMessage")]
    pub last_message: Option<String>,
}

impl DerivedTitle for Conversation {
    fn derived_title(&self) -> Option<String> {
        (!self.participants.is_empty()).then(|| self.participants.join(", "))
    }
}

searchable!(Conversation, Category::Conversations);

/// One category's rows, tagged with the category they belong to.
///
/// Serialized as `{"category": "employees", "records": [...]}`. Used when
/// building snapshots in code; snapshot files are read through
/// [`parse_rows`] so undeclared columns survive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "category", content = "records", rename_all = "camelCase")]
pub enum CategoryRecords {
    Navigation(Vec<NavigationEntry>),
    Employees(Vec<Employee>),
    Projects(Vec<Project>),
    Finances(Vec<FinanceEntry>),
    Events(Vec<CalendarEvent>),
    Activities(Vec<Activity>),
    Vacations(Vec<Vacation>),
    InfoPortal(Vec<InfoPortalEntry>),
    Workload(Vec<WorkloadEntry>),
    Documents(Vec<Document>),
    Announcements(Vec<Announcement>),
    Conversations(Vec<Conversation>),
}

fn records_of<T: Searchable>(rows: &[T]) -> Vec<IndexedRecord> {
    rows.iter().map(Searchable::to_record).collect()
}

impl CategoryRecords {
    pub fn category(&self) -> Category {
        match self {
            CategoryRecords::Navigation(_) => Category::Navigation,
            CategoryRecords::Employees(_) => Category::Employees,
            CategoryRecords::Projects(_) => Category::Projects,
            CategoryRecords::Finances(_) => Category::Finances,
            CategoryRecords::Events(_) => Category::Events,
            CategoryRecords::Activities(_) => Category::Activities,
            CategoryRecords::Vacations(_) => Category::Vacations,
            CategoryRecords::InfoPortal(_) => Category::InfoPortal,
            CategoryRecords::Workload(_) => Category::Workload,
            CategoryRecords::Documents(_) => Category::Documents,
            CategoryRecords::Announcements(_) => Category::Announcements,
            CategoryRecords::Conversations(_) => Category::Conversations,
        }
    }

    pub fn into_records(self) -> Vec<IndexedRecord> {
        match self {
            CategoryRecords::Navigation(rows) => records_of(&rows),
            CategoryRecords::Employees(rows) => records_of(&rows),
            CategoryRecords::Projects(rows) => records_of(&rows),
            CategoryRecords::Finances(rows) => records_of(&rows),
            CategoryRecords::Events(rows) => records_of(&rows),
            CategoryRecords::Activities(rows) => records_of(&rows),
            CategoryRecords::Vacations(rows) => records_of(&rows),
            CategoryRecords::InfoPortal(rows) => records_of(&rows),
            CategoryRecords::Workload(rows) => records_of(&rows),
            CategoryRecords::Documents(rows) => records_of(&rows),
            CategoryRecords::Announcements(rows) => records_of(&rows),
            CategoryRecords::Conversations(rows) => records_of(&rows),
        }
    }
}

fn typed_rows<T: Searchable + DerivedTitle + DeserializeOwned>(rows: &[Value]) -> Vec<IndexedRecord> {
    rows.iter()
        .map(|row| match T::deserialize(row) {
            Ok(typed) => index_row(row, typed.derived_title()),
            Err(e) => {
                debug!(category = %T::CATEGORY, error = %e, "row does not fit the typed model, indexing loosely");
                IndexedRecord::from_json(row)
            }
        })
        .collect()
}

/// Index raw rows for `category`. Every row keeps all of its columns; the
/// category's typed model supplies a title for rows that lack one.
pub fn parse_rows(category: Category, rows: &[Value]) -> Vec<IndexedRecord> {
    match category {
        Category::Navigation => typed_rows::<NavigationEntry>(rows),
        Category::Employees => typed_rows::<Employee>(rows),
        Category::Projects => typed_rows::<Project>(rows),
        Category::Finances => typed_rows::<FinanceEntry>(rows),
        Category::Events => typed_rows::<CalendarEvent>(rows),
        Category::Activities => typed_rows::<Activity>(rows),
        Category::Vacations => typed_rows::<Vacation>(rows),
        Category::InfoPortal => typed_rows::<InfoPortalEntry>(rows),
        Category::Workload => typed_rows::<WorkloadEntry>(rows),
        Category::Documents => typed_rows::<Document>(rows),
        Category::Announcements => typed_rows::<Announcement>(rows),
        Category::Conversations => typed_rows::<Conversation>(rows),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn undeclared_columns_stay_searchable() {
        let rows = [json!({"id": 1, "name": "Alice Smith", "role": "Engineer"})];
        let records = parse_rows(Category::Employees, &rows);
        assert!(records[0].matches("engineer"));
        assert_eq!(records[0].fields["role"], json!("Engineer"));
    }

    #[test]
    fn explicit_path_survives_typed_parsing() {
        let rows = [json!({"id": 2, "name": "Apollo", "path": "/projects/2"})];
        let records = parse_rows(Category::Projects, &rows);
        assert_eq!(records[0].path.as_deref(), Some("/projects/2"));
    }

    #[test]
    fn explicit_title_beats_name_and_derived_title() {
        let rows = [json!({"title": "Head of Ops", "name": "Alice", "first_name": "Al"})];
        assert_eq!(parse_rows(Category::Employees, &rows)[0].title, "Head of Ops");
    }

    #[test]
    fn employee_title_falls_back_to_first_and_last_name() {
        let rows = [json!({"id": 4, "first_name": "Grace", "last_name": "Hopper", "department": "R&D"})];
        let records = parse_rows(Category::Employees, &rows);
        assert_eq!(records[0].title, "Grace Hopper");
        assert_eq!(records[0].id, "4");
        assert!(records[0].matches("r&d"));
    }

    #[test]
    fn camel_case_columns_are_accepted() {
        let rows = [json!({"id": "v-1", "employeeName": "Bob", "startDate": "2024-07-01", "endDate": "2024-07-14"})];
        let records = parse_rows(Category::Vacations, &rows);
        assert_eq!(records[0].title, "Bob: 2024-07-01 to 2024-07-14");
        assert_eq!(records[0].fields["employeeName"], json!("Bob"));
    }

    #[test]
    fn numeric_columns_keep_their_json_form() {
        let rows = [json!({"id": 1, "title": "Server costs", "amount": 1200, "big": 9007199254740993_u64})];
        let records = parse_rows(Category::Finances, &rows);
        assert_eq!(records[0].fields["amount"], json!(1200));
        assert!(records[0].matches("1200"));
        assert!(!records[0].matches("1200.0"));
        assert!(records[0].matches("9007199254740993"));

        let typed = FinanceEntry { amount: Some(Number::from(1200)), ..FinanceEntry::default() }.to_record();
        assert_eq!(typed.fields["amount"], json!(1200));
    }

    #[test]
    fn fields_keep_row_order() {
        let rows = [json!({"name": "Zed", "id": 9, "active": true})];
        let record = &parse_rows(Category::Employees, &rows)[0];
        let keys: Vec<_> = record.fields.keys().map(String::as_str).collect();
        assert_eq!(keys, ["name", "id", "active"]);
        assert_eq!(record.searchable_text, "zed 9 true");
    }

    #[test]
    fn null_columns_do_not_reach_fields() {
        let record = Project { id: Some(RowId::Int(2)), name: Some("Apollo".into()), ..Project::default() }.to_record();
        assert_eq!(record.fields.len(), 2);
        assert_eq!(record.searchable_text, "2 apollo");
    }

    #[test]
    fn mistyped_rows_fall_back_to_loose_normalization() {
        let rows = [json!({"id": 1, "title": "Server costs", "amount": "twelve hundred", "extra": "kept"})];
        let records = parse_rows(Category::Finances, &rows);
        assert_eq!(records[0].title, "Server costs");
        assert!(records[0].matches("twelve hundred"));
        assert!(records[0].fields.contains_key("extra"));
    }

    #[test]
    fn tagged_document_round_trips_through_serde() {
        let doc = json!({
            "category": "infoPortal",
            "records": [{"id": 1, "title": "Onboarding guide", "content": "Start here"}],
        });
        let tagged: CategoryRecords = serde_json::from_value(doc).unwrap();
        assert_eq!(tagged.category(), Category::InfoPortal);
        let records = tagged.into_records();
        assert_eq!(records[0].title, "Onboarding guide");
    }

    #[test]
    fn conversation_title_uses_participants() {
        let record = Conversation { participants: vec!["Ann".into(), "Bo".into()], ..Conversation::default() }.to_record();
        assert_eq!(record.title, "Ann, Bo");
    }
}
