//! Diary Index - date-ordered views over the record store
//!
//! Keeps three derived views in lockstep with the store:
//!
//! - ids ordered by date, newest first
//! - distinct calendar days, newest first
//! - id → lowercase searchable text
//!
//! Dates are kept inline next to each id, so positional lookups never go
//! back to the store.
//!
//! # Ordering
//! - Build: stable sort by date descending, ties keep store read order
//! - Insert: leftmost, a new record lands before existing records with the
//!   same date
//!
//! # Performance
//! - Build: O(n log n)
//! - Insert point / range bounds: O(log n)
//! - Insert / move / remove: O(log n) search + O(n) shift

use crate::index::error::{IndexError, IndexResult};
use crate::index::search_text::build_searchable_text;
use crate::index::IndexStats;
use crate::storage::{DiaryRecord, RecordSource, StoreResult};
use chrono::{NaiveDate, NaiveDateTime};
use std::collections::{HashMap, HashSet};
use std::ops::Range;

/// One slot of the date-ordered sequence
#[derive(Debug, Clone, PartialEq, Eq)]
struct IndexedEntry {
    id: String,
    date: NaiveDateTime,
}

/// In-memory secondary index over diary records
///
/// Not synchronized: a single writer mutates the store and this index
/// together. Wrap it in a mutex if several tasks need to write.
#[derive(Debug, Default)]
pub struct DiaryIndex {
    /// Sorted by date, newest first
    entries: Vec<IndexedEntry>,
    /// id → date, mirrors `entries`
    dates: HashMap<String, NaiveDateTime>,
    /// Distinct days, newest first
    days: Vec<NaiveDate>,
    /// day → number of indexed records on it
    day_counts: HashMap<NaiveDate, usize>,
    /// id → lowercase searchable text
    search_texts: HashMap<String, String>,
    built: bool,
}

impl DiaryIndex {
    /// Create an empty, unbuilt index
    pub fn new() -> Self {
        Self::default()
    }

    // ==================== Builder ====================

    /// Rebuild every view from a full scan of the store
    ///
    /// An unreadable store yields an empty index that is still marked
    /// built. Returns the number of records indexed.
    pub async fn build_index<S>(&mut self, store: &S) -> usize
    where
        S: RecordSource + ?Sized,
    {
        let records = match store.read_all().await {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!("Record store unavailable, building empty index: {}", e);
                Vec::new()
            }
        };

        self.clear_views();

        let mut entries = Vec::with_capacity(records.len());
        for record in &records {
            self.search_texts
                .insert(record.id.clone(), build_searchable_text(record));
            self.dates.insert(record.id.clone(), record.date);
            *self.day_counts.entry(record.day()).or_insert(0) += 1;
            entries.push(IndexedEntry {
                id: record.id.clone(),
                date: record.date,
            });
        }

        // sort_by is stable: equal dates keep read order
        entries.sort_by(|a, b| b.date.cmp(&a.date));
        self.entries = entries;

        self.days = self.day_counts.keys().copied().collect();
        self.days.sort_unstable_by(|a, b| b.cmp(a));

        self.built = true;

        tracing::info!(
            "Built diary index: {} entries across {} days",
            self.entries.len(),
            self.days.len()
        );

        self.entries.len()
    }

    /// Build the index unless it has already been built
    ///
    /// Returns true if a build happened. Out-of-band store changes are only
    /// picked up by an explicit [`build_index`](Self::build_index).
    pub async fn ensure_index<S>(&mut self, store: &S) -> bool
    where
        S: RecordSource + ?Sized,
    {
        if self.built {
            return false;
        }
        self.build_index(store).await;
        true
    }

    /// Drop every view and mark the index unbuilt
    pub fn reset(&mut self) {
        self.clear_views();
        self.built = false;
    }

    fn clear_views(&mut self) {
        self.entries.clear();
        self.dates.clear();
        self.days.clear();
        self.day_counts.clear();
        self.search_texts.clear();
    }

    // ==================== Locator ====================

    /// Position at which a record dated `date` would be inserted
    ///
    /// Equals the number of indexed records strictly newer than `date`.
    pub fn find_insert_index(&self, date: NaiveDateTime) -> usize {
        self.entries.partition_point(|e| e.date > date)
    }

    /// Bounds of the ids dated within `[start, end]`, both inclusive
    ///
    /// An empty result is `start == end` at the boundary where such records
    /// would sit. An inverted query range is always empty.
    pub fn find_range_by_date_range(&self, start: NaiveDateTime, end: NaiveDateTime) -> Range<usize> {
        let lo = self.entries.partition_point(|e| e.date > end);
        let hi = self.entries.partition_point(|e| e.date >= start);
        lo..hi.max(lo)
    }

    /// Ids dated within `[start, end]`, newest first
    pub fn ids_in_range(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> impl DoubleEndedIterator<Item = &str> + ExactSizeIterator + '_ {
        let range = self.find_range_by_date_range(start, end);
        self.entries[range].iter().map(|e| e.id.as_str())
    }

    /// Indexed days within `[start, end]`, newest first
    pub fn days_in_range(&self, start: NaiveDate, end: NaiveDate) -> &[NaiveDate] {
        let lo = self.days.partition_point(|d| *d > end);
        let hi = self.days.partition_point(|d| *d >= start);
        &self.days[lo..hi.max(lo)]
    }

    fn day_insert_index(&self, day: NaiveDate) -> usize {
        self.days.partition_point(|d| *d > day)
    }

    // ==================== Mutator ====================

    /// Index a record
    ///
    /// A record whose id is already indexed is moved instead, so the id list
    /// never holds duplicates.
    pub fn insert_entry(&mut self, record: &DiaryRecord) -> IndexResult<()> {
        Self::validate(record)?;

        if self.dates.contains_key(&record.id) {
            return self.update_entry_date(record);
        }

        self.place(record);
        tracing::debug!("Indexed entry {} at {}", record.id, record.date);
        Ok(())
    }

    /// Re-position a record whose date changed
    ///
    /// Unknown ids are inserted. A day left without records is dropped.
    pub fn update_entry_date(&mut self, record: &DiaryRecord) -> IndexResult<()> {
        Self::validate(record)?;

        if let Some(old_date) = self.dates.get(&record.id).copied() {
            self.detach(&record.id, old_date);
            tracing::debug!(
                "Moving entry {} from {} to {}",
                record.id,
                old_date,
                record.date
            );
        }

        self.place(record);
        Ok(())
    }

    /// Remove an id from every view
    ///
    /// Returns false if the id was not indexed. A day left without records
    /// is dropped from the day list.
    pub fn remove_entry(&mut self, id: &str) -> bool {
        let was_placed = match self.dates.get(id).copied() {
            Some(date) => {
                self.detach(id, date);
                true
            }
            None => false,
        };
        let had_text = self.search_texts.remove(id).is_some();

        if was_placed {
            tracing::debug!("Removed entry {} from index", id);
        }

        was_placed || had_text
    }

    /// Overwrite the searchable text of an id
    ///
    /// Stored as given; callers normally pass [`build_searchable_text`] output.
    pub fn update_search_index(&mut self, id: impl Into<String>, text: impl Into<String>) {
        self.search_texts.insert(id.into(), text.into());
    }

    /// Drop ids that the store no longer holds
    ///
    /// Returns how many ids were removed.
    pub async fn prune_stale<S>(&mut self, store: &S) -> StoreResult<usize>
    where
        S: RecordSource + ?Sized,
    {
        let live: HashSet<String> = store
            .read_all()
            .await?
            .into_iter()
            .map(|record| record.id)
            .collect();

        let stale: Vec<String> = self
            .entries
            .iter()
            .filter(|e| !live.contains(&e.id))
            .map(|e| e.id.clone())
            .collect();

        for id in &stale {
            tracing::warn!("Dropping stale index entry {}", id);
            self.remove_entry(id);
        }

        Ok(stale.len())
    }

    fn validate(record: &DiaryRecord) -> IndexResult<()> {
        if record.id.is_empty() {
            return Err(IndexError::EmptyId);
        }
        Ok(())
    }

    /// Insert a record not currently in `entries`
    fn place(&mut self, record: &DiaryRecord) {
        let pos = self.find_insert_index(record.date);
        self.entries.insert(
            pos,
            IndexedEntry {
                id: record.id.clone(),
                date: record.date,
            },
        );
        self.dates.insert(record.id.clone(), record.date);
        self.search_texts
            .insert(record.id.clone(), build_searchable_text(record));
        self.acquire_day(record.day());
    }

    /// Take an id out of `entries` and release its day
    fn detach(&mut self, id: &str, date: NaiveDateTime) {
        // Only the run of equal dates can hold the id
        let run = self.find_range_by_date_range(date, date);
        if let Some(offset) = self.entries[run.clone()].iter().position(|e| e.id == id) {
            self.entries.remove(run.start + offset);
        }
        self.dates.remove(id);
        self.release_day(date.date());
    }

    fn acquire_day(&mut self, day: NaiveDate) {
        let count = self.day_counts.entry(day).or_insert(0);
        *count += 1;
        if *count == 1 {
            let pos = self.day_insert_index(day);
            self.days.insert(pos, day);
        }
    }

    fn release_day(&mut self, day: NaiveDate) {
        let Some(count) = self.day_counts.get_mut(&day) else {
            return;
        };

        *count -= 1;
        if *count == 0 {
            self.day_counts.remove(&day);
            if let Ok(pos) = self.days.binary_search_by(|d| day.cmp(d)) {
                self.days.remove(pos);
            }
        }
    }

    // ==================== Views ====================

    /// Ids ordered by date, newest first
    pub fn sorted_ids(&self) -> impl DoubleEndedIterator<Item = &str> + ExactSizeIterator + '_ {
        self.entries.iter().map(|e| e.id.as_str())
    }

    /// Id at a position of the date-ordered sequence
    pub fn id_at(&self, pos: usize) -> Option<&str> {
        self.entries.get(pos).map(|e| e.id.as_str())
    }

    /// Distinct calendar days, newest first
    pub fn sorted_days(&self) -> &[NaiveDate] {
        &self.days
    }

    /// Full id → searchable text map
    pub fn search_texts(&self) -> &HashMap<String, String> {
        &self.search_texts
    }

    pub fn search_text(&self, id: &str) -> Option<&str> {
        self.search_texts.get(id).map(String::as_str)
    }

    /// Ids whose searchable text contains `query`, newest first
    ///
    /// Matching is case-insensitive substring containment. An empty query
    /// matches every entry.
    pub fn search(&self, query: &str) -> Vec<&str> {
        let needle = query.to_lowercase();

        self.entries
            .iter()
            .filter(|e| {
                self.search_texts
                    .get(&e.id)
                    .map(|text| text.contains(&needle))
                    .unwrap_or(false)
            })
            .map(|e| e.id.as_str())
            .collect()
    }

    pub fn is_built(&self) -> bool {
        self.built
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.dates.contains_key(id)
    }

    /// Date an id is indexed under
    pub fn date_of(&self, id: &str) -> Option<NaiveDateTime> {
        self.dates.get(id).copied()
    }

    /// Get statistics about the index
    pub fn stats(&self) -> IndexStats {
        IndexStats {
            entries: self.entries.len(),
            days: self.days.len(),
            search_texts: self.search_texts.len(),
            built: self.built,
            newest: self.entries.first().map(|e| e.date),
            oldest: self.entries.last().map(|e| e.date),
        }
    }
}
