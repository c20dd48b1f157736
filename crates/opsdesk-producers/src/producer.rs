//! The producer contract and the producers shipped with the workspace.

use anyhow::{bail, ensure, Context, Result};
use serde::Deserialize;
use serde_json::Value;
use std::future::Future;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use opsdesk_core::{Category, IndexedRecord};
use opsdesk_search::CategoryWriter;

use crate::models::parse_rows;
use crate::navigation::navigation_records;

/// Fetches the full, current record set of one category.
///
/// Every call must return a finite snapshot; the index replaces the category
/// with it wholesale.
pub trait Producer: Send + Sync {
    fn category(&self) -> Category;

    fn fetch(&self) -> impl Future<Output = Result<Vec<IndexedRecord>>> + Send;
}

/// Serves a fixed record set.
#[derive(Debug, Clone)]
pub struct StaticProducer {
    category: Category,
    records: Vec<IndexedRecord>,
}

impl StaticProducer {
    pub fn new(category: Category, records: Vec<IndexedRecord>) -> Self {
        Self { category, records }
    }

    /// The dashboard's built-in page list.
    pub fn navigation() -> Self {
        Self::new(Category::Navigation, navigation_records())
    }
}

impl Producer for StaticProducer {
    fn category(&self) -> Category {
        self.category
    }

    async fn fetch(&self) -> Result<Vec<IndexedRecord>> {
        Ok(self.records.clone())
    }
}

/// Reads a category snapshot from a JSON file.
///
/// The file holds either a bare array of rows or a tagged document
/// (`{"category": ..., "records": [...]}`) whose tag must match.
#[derive(Debug, Clone)]
pub struct SnapshotProducer {
    category: Category,
    path: PathBuf,
}

impl SnapshotProducer {
    pub fn new(category: Category, path: impl Into<PathBuf>) -> Self {
        Self { category, path: path.into() }
    }

    /// `<dir>/<category>.json`
    pub fn in_dir(dir: &Path, category: Category) -> Self {
        Self::new(category, dir.join(format!("{}.json", category.as_str())))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Producer for SnapshotProducer {
    fn category(&self) -> Category {
        self.category
    }

    async fn fetch(&self) -> Result<Vec<IndexedRecord>> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("reading snapshot {}", self.path.display()))?;
        let doc: Value = serde_json::from_str(&raw)
            .with_context(|| format!("parsing snapshot {}", self.path.display()))?;
        parse_snapshot(self.category, doc)
    }
}

/// `{"category": ..., "records": [...]}` with the rows left untyped.
#[derive(Debug, Deserialize)]
struct TaggedSnapshot {
    category: Category,
    records: Vec<Value>,
}

pub fn parse_snapshot(category: Category, doc: Value) -> Result<Vec<IndexedRecord>> {
    match doc {
        Value::Array(rows) => Ok(parse_rows(category, &rows)),
        doc @ Value::Object(_) => {
            let tagged: TaggedSnapshot = serde_json::from_value(doc).context("decoding tagged snapshot")?;
            ensure!(
                tagged.category == category,
                "snapshot is tagged '{}' but was loaded for '{}'",
                tagged.category,
                category
            );
            Ok(parse_rows(category, &tagged.records))
        }
        _ => bail!("snapshot for '{category}' must be an array of rows or a tagged document"),
    }
}

/// One [`SnapshotProducer`] per `<category>.json` directly under `dir`,
/// in category order. Files not named after a category are skipped.
pub fn discover_snapshots(dir: &Path) -> Vec<SnapshotProducer> {
    let mut producers: Vec<SnapshotProducer> = walkdir::WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.path().extension().and_then(|s| s.to_str()) == Some("json"))
        .filter_map(|e| {
            let stem = e.path().file_stem()?.to_str()?.to_string();
            match stem.parse::<Category>() {
                Ok(category) => Some(SnapshotProducer::new(category, e.path())),
                Err(_) => {
                    debug!(path = %e.path().display(), "not a category snapshot, skipping");
                    None
                }
            }
        })
        .collect();
    producers.sort_by_key(|p| p.category);
    producers.dedup_by_key(|p| p.category);
    producers
}

/// Fetch from `producer` and hand the snapshot to `writer`.
///
/// On a failed fetch the category keeps its previous snapshot.
pub async fn refresh<P: Producer>(producer: &P, writer: &CategoryWriter) -> Result<bool> {
    let category = producer.category();
    ensure!(
        category == writer.category(),
        "producer for '{}' cannot write '{}'",
        category,
        writer.category()
    );
    let records = producer.fetch().await.with_context(|| format!("fetching '{category}'"))?;
    let len = records.len();
    let changed = writer.update(records);
    info!(%category, len, changed, "refreshed category");
    Ok(changed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bare_arrays_and_tagged_documents_both_parse() {
        let rows = json!([{"id": 1, "name": "Apollo"}]);
        assert_eq!(parse_snapshot(Category::Projects, rows).unwrap()[0].title, "Apollo");

        let tagged = json!({"category": "projects", "records": [{"id": 1, "name": "Apollo"}]});
        assert_eq!(parse_snapshot(Category::Projects, tagged).unwrap().len(), 1);
    }

    #[test]
    fn tagged_rows_keep_every_column() {
        let tagged = json!({
            "category": "projects",
            "records": [{"id": 2, "name": "Apollo", "path": "/projects/2", "sponsor": "Initech"}],
        });
        let records = parse_snapshot(Category::Projects, tagged).unwrap();
        assert_eq!(records[0].path.as_deref(), Some("/projects/2"));
        assert!(records[0].matches("initech"));
    }

    #[test]
    fn mismatched_tag_is_rejected() {
        let tagged = json!({"category": "employees", "records": []});
        assert!(parse_snapshot(Category::Projects, tagged).is_err());
    }

    #[test]
    fn scalar_snapshot_is_rejected() {
        assert!(parse_snapshot(Category::Projects, json!("nope")).is_err());
    }
}
