//! Client-side working set of applications.
//!
//! The list is only ever swapped or patched one record at a time; records
//! that a mutation does not touch keep their `Arc` so a view can tell what
//! changed with a pointer comparison.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{info, warn};

use crate::client::ApplicationsApi;
use crate::error::{Error, Result};
use crate::models::application::Application;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Loaded,
    Failed(String),
}

#[derive(Default)]
struct StoreInner {
    records: Vec<Arc<Application>>,
    load_state: LoadState,
    revision: u64,
}

#[derive(Clone, Default)]
pub struct ApplicationStore {
    inner: Arc<RwLock<StoreInner>>,
}

impl ApplicationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<Application>) -> Self {
        let store = Self::new();
        store.replace(records);
        store
    }

    fn read(&self) -> RwLockReadGuard<'_, StoreInner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, StoreInner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Fetches the list for `position_id` (all positions when `None`) and
    /// swaps it in. A failed fetch leaves the current list as it was.
    pub async fn load(
        &self,
        api: &dyn ApplicationsApi,
        position_id: Option<&str>,
    ) -> Result<usize> {
        self.write().load_state = LoadState::Loading;

        match api.list(position_id.map(str::to_owned)).await {
            Ok(records) => {
                let count = records.len();
                let mut inner = self.write();
                inner.records = records.into_iter().map(Arc::new).collect();
                inner.load_state = LoadState::Loaded;
                inner.revision += 1;
                info!(count, position_id = ?position_id, "applications loaded");
                Ok(count)
            }
            Err(err) => {
                let message = err.user_message();
                warn!(error = %err, position_id = ?position_id, "failed to load applications");
                self.write().load_state = LoadState::Failed(message.clone());
                Err(Error::Fetch(message))
            }
        }
    }

    pub fn replace(&self, records: Vec<Application>) {
        self.replace_shared(records.into_iter().map(Arc::new).collect());
    }

    /// Swaps in a list that may share records with an earlier snapshot.
    pub fn replace_shared(&self, records: Vec<Arc<Application>>) {
        let mut inner = self.write();
        inner.records = records;
        inner.revision += 1;
    }

    pub fn snapshot(&self) -> Vec<Arc<Application>> {
        self.read().records.clone()
    }

    pub fn get(&self, id: &str) -> Option<Arc<Application>> {
        self.read().records.iter().find(|a| a.id == id).cloned()
    }

    /// Replaces the record `id` with `f(record)` when `f` returns `Some`.
    /// Returns whether a record was replaced.
    pub fn modify<F>(&self, id: &str, f: F) -> bool
    where
        F: FnOnce(&Application) -> Option<Application>,
    {
        let mut inner = self.write();
        let Some(idx) = inner.records.iter().position(|a| a.id == id) else {
            return false;
        };
        match f(&inner.records[idx]) {
            Some(next) => {
                inner.records[idx] = Arc::new(next);
                inner.revision += 1;
                true
            }
            None => false,
        }
    }

    pub fn update_record<F>(&self, id: &str, f: F) -> bool
    where
        F: FnOnce(&Application) -> Application,
    {
        self.modify(id, |app| Some(f(app)))
    }

    pub fn remove(&self, id: &str) -> Option<Arc<Application>> {
        let mut inner = self.write();
        let idx = inner.records.iter().position(|a| a.id == id)?;
        inner.revision += 1;
        Some(inner.records.remove(idx))
    }

    pub fn len(&self) -> usize {
        self.read().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().records.is_empty()
    }

    pub fn load_state(&self) -> LoadState {
        self.read().load_state.clone()
    }

    /// Bumped on every change to the list.
    pub fn revision(&self) -> u64 {
        self.read().revision
    }
}
