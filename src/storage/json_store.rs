//! JSON file record store
//!
//! Keeps every record in memory and rewrites the backing file after each
//! mutation. The file holds a JSON array of records sorted by id so that
//! diffs between saves stay small.
//!
//! # Design Notes
//! - A missing file opens as an empty store
//! - Writes go to a temporary sibling first and are renamed into place

use crate::storage::error::StoreResult;
use crate::storage::store::{RecordSource, RecordStore};
use crate::storage::types::DiaryRecord;
use async_trait::async_trait;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

/// File-backed record store
#[derive(Debug)]
pub struct JsonStore {
    records: RwLock<HashMap<String, DiaryRecord>>,
    path: PathBuf,
}

impl JsonStore {
    /// Open a store at `path`, loading existing records if the file exists
    pub fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();

        let records = if path.exists() {
            Self::load_from_file(&path)?
        } else {
            HashMap::new()
        };

        tracing::debug!("Opened record store {:?} with {} records", path, records.len());

        Ok(Self {
            records: RwLock::new(records),
            path,
        })
    }

    fn load_from_file(path: &Path) -> StoreResult<HashMap<String, DiaryRecord>> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let records: Vec<DiaryRecord> = serde_json::from_reader(reader)?;

        Ok(records
            .into_iter()
            .map(|record| (record.id.clone(), record))
            .collect())
    }

    fn save(&self, records: &HashMap<String, DiaryRecord>) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut sorted: Vec<&DiaryRecord> = records.values().collect();
        sorted.sort_by(|a, b| a.id.cmp(&b.id));

        let tmp_path = self.path.with_extension("json.tmp");
        {
            let file = File::create(&tmp_path)?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, &sorted)?;
            writer.flush()?;
        }
        std::fs::rename(&tmp_path, &self.path)?;

        Ok(())
    }

    /// Get the backing file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl RecordSource for JsonStore {
    async fn read_all(&self) -> StoreResult<Vec<DiaryRecord>> {
        Ok(self.records.read().await.values().cloned().collect())
    }

    async fn get(&self, id: &str) -> StoreResult<Option<DiaryRecord>> {
        Ok(self.records.read().await.get(id).cloned())
    }
}

#[async_trait]
impl RecordStore for JsonStore {
    async fn put(&self, record: DiaryRecord) -> StoreResult<Option<DiaryRecord>> {
        let mut records = self.records.write().await;
        let id = record.id.clone();
        let previous = records.insert(id.clone(), record);

        // Memory must not run ahead of the file
        if let Err(e) = self.save(&records) {
            match previous {
                Some(old) => records.insert(id, old),
                None => records.remove(&id),
            };
            return Err(e);
        }
        Ok(previous)
    }

    async fn delete(&self, id: &str) -> StoreResult<Option<DiaryRecord>> {
        let mut records = self.records.write().await;
        let Some(removed) = records.remove(id) else {
            return Ok(None);
        };

        if let Err(e) = self.save(&records) {
            records.insert(removed.id.clone(), removed);
            return Err(e);
        }
        Ok(Some(removed))
    }
}
