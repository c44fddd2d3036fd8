//! Diary Service - single writer over store and index
//!
//! Every write goes to the store first and is then mirrored into the
//! [`DiaryIndex`], so the two never drift apart as long as all writes go
//! through here. Reads use the index to pick ids and the store to fetch
//! the records.
//!
//! Writes take `&mut self`. Share a service between tasks by wrapping it in
//! a `tokio::sync::Mutex`.

use crate::index::{build_searchable_text, DiaryIndex, IndexError, IndexStats};
use crate::storage::{DiaryRecord, RecordStore, StoreError};
use chrono::{NaiveDate, NaiveDateTime};
use thiserror::Error;

/// Errors surfaced by service operations
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Index error: {0}")]
    Index(#[from] IndexError),
}

/// Result type for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

/// What a [`DiaryService::save`] did to the index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// New id, inserted
    Created,
    /// Existing id, date changed, repositioned
    Moved,
    /// Existing id, same date, search text refreshed
    Updated,
}

/// Diary entry service keeping a store and its index in lockstep
pub struct DiaryService<S: RecordStore> {
    store: S,
    index: DiaryIndex,
}

impl<S: RecordStore> DiaryService<S> {
    /// Wrap a store without building the index
    pub fn new(store: S) -> Self {
        Self {
            store,
            index: DiaryIndex::new(),
        }
    }

    /// Wrap a store and build its index
    pub async fn open(store: S) -> Self {
        let mut service = Self::new(store);
        service.index.ensure_index(&service.store).await;
        service
    }

    /// Force a full rebuild, picking up out-of-band store changes
    pub async fn rebuild(&mut self) -> usize {
        self.index.build_index(&self.store).await
    }

    pub fn index(&self) -> &DiaryIndex {
        &self.index
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn stats(&self) -> IndexStats {
        self.index.stats()
    }

    // ==================== Writes ====================

    /// Persist a record and mirror it into the index
    pub async fn save(&mut self, record: DiaryRecord) -> ServiceResult<SaveOutcome> {
        if record.id.is_empty() {
            return Err(IndexError::EmptyId.into());
        }
        self.index.ensure_index(&self.store).await;

        let previous = self.store.put(record.clone()).await?;

        let outcome = match previous {
            None => {
                self.index.insert_entry(&record)?;
                SaveOutcome::Created
            }
            Some(old) if old.date != record.date => {
                self.index.update_entry_date(&record)?;
                SaveOutcome::Moved
            }
            Some(_) => {
                if self.index.contains(&record.id) {
                    self.index
                        .update_search_index(record.id.clone(), build_searchable_text(&record));
                } else {
                    self.index.insert_entry(&record)?;
                }
                SaveOutcome::Updated
            }
        };

        tracing::debug!("Saved entry {} ({:?})", record.id, outcome);
        Ok(outcome)
    }

    /// Delete a record from the store and the index
    pub async fn delete(&mut self, id: &str) -> ServiceResult<Option<DiaryRecord>> {
        self.index.ensure_index(&self.store).await;

        let removed = self.store.delete(id).await?;
        self.index.remove_entry(id);

        if removed.is_some() {
            tracing::debug!("Deleted entry {}", id);
        }
        Ok(removed)
    }

    // ==================== Reads ====================

    pub async fn get(&self, id: &str) -> ServiceResult<Option<DiaryRecord>> {
        Ok(self.store.get(id).await?)
    }

    /// Records dated within `[start, end]`, newest first
    pub async fn entries_between(
        &mut self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> ServiceResult<Vec<DiaryRecord>> {
        self.index.ensure_index(&self.store).await;
        let ids: Vec<String> = self
            .index
            .ids_in_range(start, end)
            .map(str::to_string)
            .collect();
        self.fetch(ids).await
    }

    /// The `limit` most recent records
    pub async fn recent(&mut self, limit: usize) -> ServiceResult<Vec<DiaryRecord>> {
        self.index.ensure_index(&self.store).await;
        let ids: Vec<String> = self
            .index
            .sorted_ids()
            .take(limit)
            .map(str::to_string)
            .collect();
        self.fetch(ids).await
    }

    /// Records whose text contains `query`, newest first
    pub async fn search(&mut self, query: &str, limit: usize) -> ServiceResult<Vec<DiaryRecord>> {
        self.index.ensure_index(&self.store).await;
        let ids: Vec<String> = self
            .index
            .search(query)
            .into_iter()
            .take(limit)
            .map(str::to_string)
            .collect();
        self.fetch(ids).await
    }

    /// Distinct days with at least one record, newest first
    pub async fn days(&mut self) -> Vec<NaiveDate> {
        self.index.ensure_index(&self.store).await;
        self.index.sorted_days().to_vec()
    }

    /// Resolve ids against the store, skipping ones it no longer has
    async fn fetch(&self, ids: Vec<String>) -> ServiceResult<Vec<DiaryRecord>> {
        let mut records = Vec::with_capacity(ids.len());
        for id in ids {
            match self.store.get(&id).await? {
                Some(record) => records.push(record),
                None => tracing::warn!("Index references missing record {}, skipping", id),
            }
        }
        Ok(records)
    }
}
