//! Types returned by the index.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::category::Category;
use crate::record::RecordId;

/// A matched record decorated with where it came from and where it leads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: RecordId,
    pub title: String,
    pub category: Category,
    pub path: String,
    #[serde(default)]
    pub fields: Map<String, Value>,
}

/// Hits after truncation, plus how many records matched in total.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryOutcome {
    pub term: String,
    pub hits: Vec<SearchHit>,
    pub total_matches: usize,
}

impl QueryOutcome {
    pub fn is_truncated(&self) -> bool {
        self.total_matches > self.hits.len()
    }
}

/// Broadcast after a category's stored snapshot actually changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexChange {
    pub category: Category,
    pub revision: u64,
    pub len: usize,
}
