use crate::category::Category;
use crate::record::IndexedRecord;
use crate::types::SearchHit;

/// The two operations every index implementation offers.
pub trait SearchIndex: Send + Sync {
    /// Replace `category`'s snapshot; returns `false` when nothing changed.
    fn update(&self, category: Category, records: Vec<IndexedRecord>) -> bool;
    fn query(&self, term: &str) -> Vec<SearchHit>;
}

/// A typed row that knows its category and how to project itself.
pub trait Searchable {
    const CATEGORY: Category;

    fn to_record(&self) -> IndexedRecord;
}
