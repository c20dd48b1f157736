//! Matching, ordering and truncation.
//!
//! Matching is a case-insensitive substring test against each record's
//! precomputed text. Hits come out in category enumeration order, then in
//! the order the producer supplied them. There is no scoring. The cap is
//! applied to the combined list, so one large category can crowd out every
//! category after it.

use opsdesk_core::config::{SearchSettings, DEFAULT_MAX_RESULTS, DEFAULT_MIN_QUERY_CHARS};
use opsdesk_core::{Category, IndexedRecord, QueryOutcome, Result, RouteTable, SearchHit};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryPolicy {
    pub min_query_chars: usize,
    pub max_results: usize,
    pub routes: RouteTable,
}

impl Default for QueryPolicy {
    fn default() -> Self {
        Self {
            min_query_chars: DEFAULT_MIN_QUERY_CHARS,
            max_results: DEFAULT_MAX_RESULTS,
            routes: RouteTable::default(),
        }
    }
}

impl QueryPolicy {
    pub fn from_settings(settings: &SearchSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self {
            min_query_chars: settings.min_query_chars,
            max_results: settings.max_results,
            routes: settings.route_table()?,
        })
    }

    /// Trimmed, lowercased needle, or `None` when the term is too short.
    pub fn needle(&self, term: &str) -> Option<String> {
        let trimmed = term.trim();
        if trimmed.chars().count() < self.min_query_chars {
            return None;
        }
        Some(trimmed.to_lowercase())
    }

    /// Run `term` over `(category, records)` pairs, which must arrive in
    /// category enumeration order.
    pub fn run<'a, I>(&self, term: &str, categories: I) -> QueryOutcome
    where
        I: IntoIterator<Item = (Category, &'a [IndexedRecord])>,
    {
        let Some(needle) = self.needle(term) else {
            return QueryOutcome { term: term.trim().to_string(), ..QueryOutcome::default() };
        };

        let matches: Vec<(Category, &IndexedRecord)> = categories
            .into_iter()
            .flat_map(|(category, records)| records.iter().map(move |r| (category, r)))
            .filter(|(_, record)| record.matches(&needle))
            .collect();

        let total_matches = matches.len();
        let hits = matches
            .into_iter()
            .take(self.max_results)
            .map(|(category, record)| self.decorate(category, record))
            .collect();

        QueryOutcome { term: term.trim().to_string(), hits, total_matches }
    }

    fn decorate(&self, category: Category, record: &IndexedRecord) -> SearchHit {
        SearchHit {
            id: record.id.clone(),
            title: record.title.clone(),
            category,
            path: self.routes.resolve(category, record.path.as_deref()).to_string(),
            fields: record.fields.clone(),
        }
    }
}
