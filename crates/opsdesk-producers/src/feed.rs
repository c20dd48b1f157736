//! Change-feed driven refresh.
//!
//! The remote store pushes a notification for every insert, update or
//! delete. Producers do not patch their snapshot from the event payload;
//! they refetch and resubmit the whole category.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use opsdesk_core::Category;
use opsdesk_search::CategoryWriter;

use crate::producer::{refresh, Producer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub category: Category,
    pub kind: ChangeKind,
}

impl ChangeEvent {
    pub fn new(category: Category, kind: ChangeKind) -> Self {
        Self { category, kind }
    }
}

/// Refresh `writer`'s category on every event for it until `events` closes.
///
/// Events for other categories are ignored. A failed refresh is logged and
/// the loop keeps going. Returns how many refreshes succeeded.
pub async fn follow_changes<P: Producer>(
    producer: &P,
    writer: &CategoryWriter,
    mut events: mpsc::Receiver<ChangeEvent>,
) -> usize {
    let mut refreshes = 0;
    while let Some(event) = events.recv().await {
        if event.category != writer.category() {
            continue;
        }
        debug!(category = %event.category, kind = ?event.kind, "change observed");
        match refresh(producer, writer).await {
            Ok(_) => refreshes += 1,
            Err(e) => {
                let error = format!("{e:#}");
                warn!(category = %event.category, %error, "refresh failed, keeping last snapshot");
            }
        }
    }
    refreshes
}
