//! Diary Record Storage
//!
//! The persisted side of the system. The index treats everything here as
//! an external collaborator and only reads from it:
//!
//! - **types**: `DiaryRecord` and day truncation
//! - **store**: `RecordSource` / `RecordStore` traits and the in-memory store
//! - **json_store**: JSON file backed store
//! - **error**: Error types
//!
//! # Example
//!
//! ```rust,no_run
//! use diary_index::storage::{DiaryRecord, JsonStore, RecordSource, RecordStore};
//! use chrono::NaiveDate;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = JsonStore::open("./entries.json")?;
//!
//!     let date = NaiveDate::from_ymd_opt(2025, 3, 15).unwrap().and_hms_opt(9, 30, 0).unwrap();
//!     store.put(DiaryRecord::new("Morning", "Coffee by the river", date)).await?;
//!
//!     let all = store.read_all().await?;
//!     println!("{} records", all.len());
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod json_store;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use error::{StoreError, StoreResult};
pub use json_store::JsonStore;
pub use store::{MemoryStore, RecordSource, RecordStore};
pub use types::{truncate_to_day, DiaryRecord};
