//! opsdesk-producers
//!
//! Category producers: typed row models for each dashboard table, the
//! producer contract, and loaders that feed snapshots into the index.

pub mod feed;
pub mod loader;
pub mod models;
pub mod navigation;
pub mod producer;

pub use feed::{follow_changes, ChangeEvent, ChangeKind};
pub use loader::{populate, LoadReport};
pub use models::CategoryRecords;
pub use producer::{discover_snapshots, refresh, Producer, SnapshotProducer, StaticProducer};
