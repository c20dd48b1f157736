//! Normalized, query-ready records.
//!
//! Producers hand the index loosely shaped rows; normalization happens once at
//! ingestion so queries never re-derive text from raw attributes.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub type RecordId = String;

/// Title used when a record has neither a `title` nor a `name`.
pub const FALLBACK_TITLE: &str = "Result";

/// A record as stored in the index.
///
/// - `id`: category-local identifier (not globally unique)
/// - `title`: display title, never empty
/// - `searchable_text`: lowercased concatenation of every attribute value
/// - `path`: explicit navigation target carried by the record, if any
/// - `fields`: the original attributes, passed through to hits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexedRecord {
    pub id: RecordId,
    pub title: String,
    pub searchable_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default)]
    pub fields: Map<String, Value>,
}

impl IndexedRecord {
    /// Build a record from explicit parts; `text` is lowercased here.
    pub fn new(id: impl Into<String>, title: impl Into<String>, text: impl AsRef<str>) -> Self {
        let title = title.into();
        Self {
            id: id.into(),
            title: if title.trim().is_empty() { FALLBACK_TITLE.to_string() } else { title },
            searchable_text: text.as_ref().to_lowercase(),
            path: None,
            fields: Map::new(),
        }
    }

    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    #[must_use]
    pub fn with_fields(mut self, fields: Map<String, Value>) -> Self {
        self.fields = fields;
        self
    }

    /// Normalize an arbitrary JSON value. Never fails.
    pub fn from_json(value: &Value) -> Self {
        let Value::Object(fields) = value else {
            let mut text = String::new();
            push_text(value, &mut text);
            return Self::new(String::new(), FALLBACK_TITLE, text);
        };

        let id = fields.get("id").and_then(scalar_text).unwrap_or_default();
        let title = ["title", "name"]
            .iter()
            .filter_map(|key| fields.get(*key).and_then(scalar_text))
            .find(|s| !s.trim().is_empty())
            .unwrap_or_else(|| FALLBACK_TITLE.to_string());
        let path = ["path", "href"]
            .iter()
            .filter_map(|key| fields.get(*key).and_then(Value::as_str))
            .find(|s| !s.is_empty())
            .map(str::to_string);

        let mut text = String::new();
        for v in fields.values() {
            push_text(v, &mut text);
        }

        Self { id, title, searchable_text: text.to_lowercase(), path, fields: fields.clone() }
    }

    /// Case-insensitive containment test. `needle` must already be lowercase.
    pub fn matches(&self, needle: &str) -> bool {
        self.searchable_text.contains(needle)
    }
}

/// Text form of a scalar; `None` for null, arrays and objects.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Append every value reachable from `value`, space separated.
/// Object keys are never included; nulls contribute nothing.
fn push_text(value: &Value, out: &mut String) {
    match value {
        Value::Array(items) => items.iter().for_each(|v| push_text(v, out)),
        Value::Object(map) => map.values().for_each(|v| push_text(v, out)),
        other => {
            if let Some(s) = scalar_text(other) {
                if !out.is_empty() {
                    out.push(' ');
                }
                out.push_str(&s);
            }
        }
    }
}
