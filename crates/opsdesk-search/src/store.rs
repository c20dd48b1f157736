//! The owned, shareable search index.
//!
//! Each category holds the latest snapshot its producer supplied. Updates
//! replace a category wholesale; an update equal to what is stored changes
//! nothing and notifies nobody. Categories start empty and are never absent.

use serde_json::Value;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::broadcast;
use tracing::{debug, info};

use opsdesk_core::traits::SearchIndex;
use opsdesk_core::{Category, Error, IndexChange, IndexedRecord, QueryOutcome, Result, SearchHit};

use crate::query::QueryPolicy;

/// Buffered change notifications per subscriber before it starts lagging.
pub const CHANGE_CAPACITY: usize = 64;

#[derive(Debug)]
struct IndexState {
    categories: [Vec<IndexedRecord>; Category::COUNT],
    revision: u64,
}

impl Default for IndexState {
    fn default() -> Self {
        Self { categories: std::array::from_fn(|_| Vec::new()), revision: 0 }
    }
}

#[derive(Debug)]
pub struct SearchIndexStore {
    state: RwLock<IndexState>,
    claims: Mutex<HashSet<Category>>,
    changes: broadcast::Sender<IndexChange>,
    policy: QueryPolicy,
}

impl Default for SearchIndexStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchIndexStore {
    pub fn new() -> Self {
        Self::with_policy(QueryPolicy::default())
    }

    pub fn with_policy(policy: QueryPolicy) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CAPACITY);
        Self {
            state: RwLock::new(IndexState::default()),
            claims: Mutex::new(HashSet::new()),
            changes,
            policy,
        }
    }

    pub fn policy(&self) -> &QueryPolicy {
        &self.policy
    }

    /// Replace `category`'s snapshot. Returns `false` (and does nothing)
    /// when `records` equals what is already stored.
    pub fn update(&self, category: Category, records: Vec<IndexedRecord>) -> bool {
        let change = {
            let mut state = self.write_state();
            let slot = &mut state.categories[category.index()];
            if *slot == records {
                debug!(%category, len = records.len(), "unchanged snapshot, skipping");
                return false;
            }
            let len = records.len();
            *slot = records;
            state.revision += 1;
            IndexChange { category, revision: state.revision, len }
        };

        info!(category = %change.category, len = change.len, revision = change.revision, "replaced snapshot");
        // No subscribers is not an error.
        let _ = self.changes.send(change);
        true
    }

    /// Normalize loosely shaped rows, then [`update`](Self::update).
    pub fn update_raw(&self, category: Category, rows: &[Value]) -> bool {
        self.update(category, rows.iter().map(IndexedRecord::from_json).collect())
    }

    pub fn clear(&self, category: Category) -> bool {
        self.update(category, Vec::new())
    }

    pub fn query(&self, term: &str) -> Vec<SearchHit> {
        self.search(term).hits
    }

    /// Like [`query`](Self::query) but also reports the untruncated match count.
    pub fn search(&self, term: &str) -> QueryOutcome {
        let state = self.read_state();
        self.policy.run(
            term,
            Category::ALL.iter().map(|c| (*c, state.categories[c.index()].as_slice())),
        )
    }

    pub fn records(&self, category: Category) -> Vec<IndexedRecord> {
        self.read_state().categories[category.index()].clone()
    }

    pub fn len(&self, category: Category) -> usize {
        self.read_state().categories[category.index()].len()
    }

    /// Record count per category, in enumeration order.
    pub fn counts(&self) -> Vec<(Category, usize)> {
        let state = self.read_state();
        Category::ALL.iter().map(|c| (*c, state.categories[c.index()].len())).collect()
    }

    /// Bumped once per effective update; no-op updates leave it alone.
    pub fn revision(&self) -> u64 {
        self.read_state().revision
    }

    pub fn subscribe(&self) -> broadcast::Receiver<IndexChange> {
        self.changes.subscribe()
    }

    /// Take exclusive write ownership of `category`.
    ///
    /// Fails with [`Error::CategoryClaimed`] while another writer is alive.
    pub fn claim(self: &Arc<Self>, category: Category) -> Result<CategoryWriter> {
        if !self.lock_claims().insert(category) {
            return Err(Error::CategoryClaimed(category));
        }
        debug!(%category, "claimed category");
        Ok(CategoryWriter { store: Arc::clone(self), category })
    }

    pub fn is_claimed(&self, category: Category) -> bool {
        self.lock_claims().contains(&category)
    }

    fn release(&self, category: Category) {
        self.lock_claims().remove(&category);
        debug!(%category, "released category");
    }

    // Slots are swapped whole; a poisoned lock never guards a half-written snapshot.
    fn read_state(&self) -> RwLockReadGuard<'_, IndexState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, IndexState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_claims(&self) -> MutexGuard<'_, HashSet<Category>> {
        self.claims.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SearchIndex for SearchIndexStore {
    fn update(&self, category: Category, records: Vec<IndexedRecord>) -> bool {
        SearchIndexStore::update(self, category, records)
    }

    fn query(&self, term: &str) -> Vec<SearchHit> {
        SearchIndexStore::query(self, term)
    }
}

/// Sole writer for one category. Dropping it releases the claim.
#[derive(Debug)]
pub struct CategoryWriter {
    store: Arc<SearchIndexStore>,
    category: Category,
}

impl CategoryWriter {
    pub fn category(&self) -> Category {
        self.category
    }

    pub fn store(&self) -> &Arc<SearchIndexStore> {
        &self.store
    }

    pub fn update(&self, records: Vec<IndexedRecord>) -> bool {
        self.store.update(self.category, records)
    }

    pub fn update_raw(&self, rows: &[Value]) -> bool {
        self.store.update_raw(self.category, rows)
    }

    pub fn clear(&self) -> bool {
        self.store.clear(self.category)
    }
}

impl Drop for CategoryWriter {
    fn drop(&mut self) {
        self.store.release(self.category);
    }
}
