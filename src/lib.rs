//! # diary-index
//!
//! In-memory secondary indexes over a persisted diary record store.
//!
//! ## Features
//!
//! - **Date ordering**: entry ids newest first, with O(log n) insert points
//!   and date-range bounds
//! - **Calendar days**: distinct days with entries, newest first
//! - **Search text**: one lowercase blob per entry for substring search
//! - **Incremental**: inserts, date moves and deletes without a rebuild
//!
//! ## Modules
//!
//! - [`storage`]: Diary records and the record store abstraction
//! - [`index`]: The derived views
//! - [`service`]: Single writer keeping store and index in lockstep
//! - [`config`]: TOML configuration
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use diary_index::{DiaryRecord, DiaryService, MemoryStore};
//! use chrono::NaiveDate;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut service = DiaryService::open(MemoryStore::new()).await;
//!
//!     let date = NaiveDate::from_ymd_opt(2025, 3, 15).unwrap().and_hms_opt(14, 30, 0).unwrap();
//!     service
//!         .save(DiaryRecord::new("Cherry blossoms", "Walked along the canal", date).tags(["spring"]))
//!         .await?;
//!
//!     let start = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
//!     let end = NaiveDate::from_ymd_opt(2025, 3, 31).unwrap().and_hms_opt(23, 59, 59).unwrap();
//!     let march = service.entries_between(start, end).await?;
//!
//!     println!("Found {} entries in March", march.len());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod index;
pub mod service;
pub mod storage;

// Re-export top-level types for convenience
pub use storage::{
    truncate_to_day, DiaryRecord, JsonStore, MemoryStore, RecordSource, RecordStore, StoreError,
    StoreResult,
};

pub use index::{build_searchable_text, DiaryIndex, IndexError, IndexResult, IndexStats};

pub use service::{DiaryService, SaveOutcome, ServiceError, ServiceResult};

pub use config::{
    Config, ConfigError, IndexConfig, LoadedConfig, LoggingConfig, StoreConfig,
};
