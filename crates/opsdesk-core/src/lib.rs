//! opsdesk-core
//!
//! Shared domain types for the dashboard search index: the closed category
//! set, normalized records, hits, the route table and configuration.

#![deny(warnings)]
#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

pub mod category;
pub mod config;
pub mod error;
pub mod record;
pub mod routes;
pub mod traits;
pub mod types;

pub use category::Category;
pub use error::{Error, Result};
pub use record::IndexedRecord;
pub use routes::RouteTable;
pub use types::{IndexChange, QueryOutcome, SearchHit};
