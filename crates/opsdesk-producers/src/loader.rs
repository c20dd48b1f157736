//! One-shot population of a fresh index.

use anyhow::{ensure, Result};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

use opsdesk_core::Category;
use opsdesk_search::SearchIndexStore;

use crate::producer::{discover_snapshots, refresh, Producer, StaticProducer};

/// What [`populate`] managed to load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub loaded: Vec<(Category, usize)>,
    pub failed: Vec<(Category, String)>,
}

/// Load the built-in navigation pages and every category snapshot under
/// `snapshot_dir`, refreshing the snapshots concurrently.
///
/// A `navigation.json` snapshot replaces the built-in pages. Per-category
/// failures are collected in the report; the rest of the index still loads.
pub async fn populate(store: &Arc<SearchIndexStore>, snapshot_dir: Option<&Path>) -> Result<LoadReport> {
    let mut report = LoadReport::default();

    let producers = match snapshot_dir {
        Some(dir) => {
            ensure!(dir.is_dir(), "snapshot directory {} does not exist", dir.display());
            discover_snapshots(dir)
        }
        None => Vec::new(),
    };

    if !producers.iter().any(|p| p.category() == Category::Navigation) {
        let navigation = StaticProducer::navigation();
        let writer = store.claim(Category::Navigation)?;
        refresh(&navigation, &writer).await?;
        report.loaded.push((Category::Navigation, store.len(Category::Navigation)));
    }

    let writers = producers
        .iter()
        .map(|p| store.claim(p.category()))
        .collect::<Result<Vec<_>, _>>()?;
    let results =
        futures::future::join_all(producers.iter().zip(&writers).map(|(p, w)| refresh(p, w))).await;

    for (producer, result) in producers.iter().zip(results) {
        let category = producer.category();
        match result {
            Ok(_) => report.loaded.push((category, store.len(category))),
            Err(e) => {
                let error = format!("{e:#}");
                warn!(%category, %error, "snapshot failed to load");
                report.failed.push((category, error));
            }
        }
    }
    report.loaded.sort_by_key(|(c, _)| *c);

    info!(loaded = report.loaded.len(), failed = report.failed.len(), "index populated");
    Ok(report)
}
