use super::traits::RecordStore;
use super::{Collection, TextRecord};
use crate::error::{CleanseError, Result};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

struct Inner {
    records: BTreeMap<i64, TextRecord>,
    last_id: i64,
}

/// In-memory record store for development/testing
pub struct InMemoryRecordStore {
    collection: Collection,
    inner: Mutex<Inner>,
}

impl InMemoryRecordStore {
    pub fn new(collection: Collection) -> Self {
        Self {
            collection,
            inner: Mutex::new(Inner {
                records: BTreeMap::new(),
                last_id: 0,
            }),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|_| CleanseError::StoreUnavailable(format!("{} lock poisoned", self.collection)))
    }

    fn not_found(&self, id: i64) -> CleanseError {
        CleanseError::NotFound {
            collection: self.collection,
            id,
        }
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    fn collection(&self) -> Collection {
        self.collection
    }

    async fn insert(&self, dirty_text: &str, clean_text: &str) -> Result<i64> {
        let mut inner = self.lock()?;
        inner.last_id += 1;
        let id = inner.last_id;
        inner.records.insert(
            id,
            TextRecord {
                id,
                dirty_text: dirty_text.to_string(),
                clean_text: clean_text.to_string(),
            },
        );

        debug!("Inserted record {} into {}", id, self.collection);
        Ok(id)
    }

    async fn get_by_id(&self, id: i64) -> Result<TextRecord> {
        let inner = self.lock()?;
        inner.records.get(&id).cloned().ok_or_else(|| self.not_found(id))
    }

    async fn list_all(&self) -> Result<Vec<TextRecord>> {
        let inner = self.lock()?;
        Ok(inner.records.values().cloned().collect())
    }

    async fn update(&self, id: i64, dirty_text: &str, clean_text: &str) -> Result<()> {
        let mut inner = self.lock()?;
        let record = inner.records.get_mut(&id).ok_or_else(|| self.not_found(id))?;
        record.dirty_text = dirty_text.to_string();
        record.clean_text = clean_text.to_string();

        debug!("Updated record {} in {}", id, self.collection);
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let mut inner = self.lock()?;
        inner.records.remove(&id).ok_or_else(|| self.not_found(id))?;

        debug!("Deleted record {} from {}", id, self.collection);
        Ok(())
    }
}
