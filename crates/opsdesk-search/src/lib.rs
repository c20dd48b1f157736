//! opsdesk-search
//!
//! In-memory aggregate search index. See `store` for the owned index object
//! and `query` for the matching and truncation policy.

pub mod query;
pub mod store;

pub use query::QueryPolicy;
pub use store::{CategoryWriter, SearchIndexStore};
