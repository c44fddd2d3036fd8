//! Diary Index Structures
//!
//! Derived, query-fast views over the record store:
//!
//! - **DiaryIndex**: ids by date (newest first), distinct days, searchable text
//! - **build_searchable_text**: the lowercase blob substring search runs on
//!
//! # Architecture
//!
//! ```text
//! Query: "entries from February"
//!        ↓
//! DiaryIndex: two binary searches → [start, end) into ids-by-date
//!        ↓
//! Store: fetch only those ids → Fast!
//! ```
//!
//! The index is a cache: it holds nothing the store does not, and is
//! rebuilt from a full scan on demand.

mod diary_index;
mod error;
mod search_text;

pub use diary_index::DiaryIndex;
pub use error::{IndexError, IndexResult};
pub use search_text::build_searchable_text;

use chrono::NaiveDateTime;
use serde::Serialize;

/// Statistics about index contents
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IndexStats {
    /// Number of ids in the date-ordered list
    pub entries: usize,
    /// Number of distinct calendar days
    pub days: usize,
    /// Number of searchable text blobs
    pub search_texts: usize,
    /// Whether a full build has happened
    pub built: bool,
    pub newest: Option<NaiveDateTime>,
    pub oldest: Option<NaiveDateTime>,
}

impl std::fmt::Display for IndexStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} entries, {} days, {} search texts",
            self.entries, self.days, self.search_texts
        )?;
        match (self.newest, self.oldest) {
            (Some(newest), Some(oldest)) => write!(f, ", {} .. {}", oldest, newest),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_display() {
        let empty = IndexStats::default();
        assert_eq!(empty.to_string(), "0 entries, 0 days, 0 search texts");

        let newest = NaiveDateTime::parse_from_str("2025-02-01 10:00:00", "%Y-%m-%d %H:%M:%S").unwrap();
        let oldest = NaiveDateTime::parse_from_str("2025-01-01 10:00:00", "%Y-%m-%d %H:%M:%S").unwrap();
        let stats = IndexStats {
            entries: 2,
            days: 2,
            search_texts: 2,
            built: true,
            newest: Some(newest),
            oldest: Some(oldest),
        };
        assert_eq!(
            stats.to_string(),
            "2 entries, 2 days, 2 search texts, 2025-01-01 10:00:00 .. 2025-02-01 10:00:00"
        );
    }
}
