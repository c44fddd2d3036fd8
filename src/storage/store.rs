//! Record store abstraction
//!
//! The index consumes a store only through [`RecordSource`]: read every
//! record, or read one record by id. Writers additionally need
//! [`RecordStore`], which the index itself never touches.

use crate::storage::error::{StoreError, StoreResult};
use crate::storage::types::DiaryRecord;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

/// Read access to a persisted diary record collection
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Every persisted record, in no particular order
    async fn read_all(&self) -> StoreResult<Vec<DiaryRecord>>;

    /// A single record by id
    async fn get(&self, id: &str) -> StoreResult<Option<DiaryRecord>>;
}

/// Read/write access to a persisted diary record collection
#[async_trait]
pub trait RecordStore: RecordSource {
    /// Insert or replace a record, returning the one it replaced
    async fn put(&self, record: DiaryRecord) -> StoreResult<Option<DiaryRecord>>;

    /// Delete a record by id, returning it if it existed
    async fn delete(&self, id: &str) -> StoreResult<Option<DiaryRecord>>;
}

/// Volatile record store keyed by id
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<String, DiaryRecord>>,
    closed: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with records
    pub fn with_records(records: impl IntoIterator<Item = DiaryRecord>) -> Self {
        let records = records
            .into_iter()
            .map(|record| (record.id.clone(), record))
            .collect();

        Self {
            records: RwLock::new(records),
            closed: AtomicBool::new(false),
        }
    }

    /// Close the store; every later operation fails with [`StoreError::Closed`]
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Number of records currently held
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    fn check_open(&self) -> StoreResult<()> {
        if self.is_closed() {
            return Err(StoreError::Closed);
        }
        Ok(())
    }
}

#[async_trait]
impl RecordSource for MemoryStore {
    async fn read_all(&self) -> StoreResult<Vec<DiaryRecord>> {
        self.check_open()?;
        Ok(self.records.read().await.values().cloned().collect())
    }

    async fn get(&self, id: &str) -> StoreResult<Option<DiaryRecord>> {
        self.check_open()?;
        Ok(self.records.read().await.get(id).cloned())
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn put(&self, record: DiaryRecord) -> StoreResult<Option<DiaryRecord>> {
        self.check_open()?;
        Ok(self.records.write().await.insert(record.id.clone(), record))
    }

    async fn delete(&self, id: &str) -> StoreResult<Option<DiaryRecord>> {
        self.check_open()?;
        Ok(self.records.write().await.remove(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(id: &str) -> DiaryRecord {
        let date = NaiveDate::from_ymd_opt(2025, 1, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        DiaryRecord::new("title", "content", date).id(id)
    }

    #[tokio::test]
    async fn test_put_get_delete() {
        let store = MemoryStore::new();

        assert!(store.put(record("a")).await.unwrap().is_none());
        assert!(store.put(record("a")).await.unwrap().is_some());
        assert_eq!(store.len().await, 1);

        let fetched = store.get("a").await.unwrap().unwrap();
        assert_eq!(fetched.id, "a");

        assert!(store.delete("a").await.unwrap().is_some());
        assert!(store.delete("a").await.unwrap().is_none());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_read_all() {
        let store = MemoryStore::with_records([record("a"), record("b"), record("c")]);

        let mut ids: Vec<String> = store
            .read_all()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        ids.sort();

        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_closed_store_rejects_operations() {
        let store = MemoryStore::with_records([record("a")]);
        store.close();

        assert!(store.is_closed());
        assert!(matches!(store.read_all().await, Err(StoreError::Closed)));
        assert!(matches!(store.get("a").await, Err(StoreError::Closed)));
        assert!(matches!(store.put(record("b")).await, Err(StoreError::Closed)));
        assert!(matches!(store.delete("a").await, Err(StoreError::Closed)));
    }
}
