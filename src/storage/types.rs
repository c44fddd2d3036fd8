//! Core data types for the diary record store
//!
//! This module defines the records the index is derived from:
//! - `DiaryRecord`: A single diary entry as persisted by the store
//! - Day truncation helpers shared by the store and the index

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// A single diary entry
///
/// Owned by the record store; the index only ever reads it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DiaryRecord {
    /// Unique identifier (store key)
    pub id: String,
    /// Wall-clock time the entry is filed under
    pub date: NaiveDateTime,
    pub title: String,
    pub content: String,
    /// Current tag list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    /// Tags written by older versions, used when `tags` is absent or empty
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legacy_tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl DiaryRecord {
    /// Create a new record with a freshly generated id
    pub fn new(title: impl Into<String>, content: impl Into<String>, date: NaiveDateTime) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            date,
            title: title.into(),
            content: content.into(),
            tags: None,
            legacy_tags: None,
            location: None,
        }
    }

    /// Builder method: set the id
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Builder method: set the date
    pub fn date(mut self, date: NaiveDateTime) -> Self {
        self.date = date;
        self
    }

    /// Builder method: set the tag list
    pub fn tags<I, T>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    /// Builder method: set the legacy tag list
    pub fn legacy_tags<I, T>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.legacy_tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    /// Builder method: set the location
    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Tags used for search: `tags` when non-empty, else `legacy_tags`, else nothing
    pub fn effective_tags(&self) -> &[String] {
        match (&self.tags, &self.legacy_tags) {
            (Some(tags), _) if !tags.is_empty() => tags.as_slice(),
            (_, Some(legacy)) => legacy.as_slice(),
            _ => &[],
        }
    }

    /// Calendar day this record belongs to
    pub fn day(&self) -> NaiveDate {
        self.date.date()
    }
}

/// Reduce a timestamp to midnight of its calendar day
pub fn truncate_to_day(date: NaiveDateTime) -> NaiveDateTime {
    date.date().and_time(NaiveTime::MIN)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").unwrap()
    }

    #[test]
    fn test_record_builder() {
        let record = DiaryRecord::new("Walk", "Went to the park", at("2025-03-15T14:30:45"))
            .id("a")
            .tags(["outdoors"])
            .location("Tokyo");

        assert_eq!(record.id, "a");
        assert_eq!(record.tags, Some(vec!["outdoors".to_string()]));
        assert_eq!(record.location.as_deref(), Some("Tokyo"));
        assert!(record.legacy_tags.is_none());
    }

    #[test]
    fn test_new_generates_distinct_ids() {
        let date = at("2025-01-01T00:00:00");
        let a = DiaryRecord::new("a", "", date);
        let b = DiaryRecord::new("b", "", date);
        assert_ne!(a.id, b.id);
        assert!(!a.id.is_empty());
    }

    #[test]
    fn test_effective_tags() {
        let date = at("2025-01-01T00:00:00");

        let both = DiaryRecord::new("t", "c", date)
            .tags(["new"])
            .legacy_tags(["old"]);
        assert_eq!(both.effective_tags(), ["new".to_string()]);

        let empty_primary = DiaryRecord::new("t", "c", date)
            .tags(Vec::<String>::new())
            .legacy_tags(["old"]);
        assert_eq!(empty_primary.effective_tags(), ["old".to_string()]);

        let legacy_only = DiaryRecord::new("t", "c", date).legacy_tags(["LegacyTag"]);
        assert_eq!(legacy_only.effective_tags(), ["LegacyTag".to_string()]);

        let none = DiaryRecord::new("t", "c", date);
        assert!(none.effective_tags().is_empty());
    }

    #[test]
    fn test_day_truncation() {
        let date = at("2025-03-15T14:30:45");
        assert_eq!(truncate_to_day(date), at("2025-03-15T00:00:00"));

        let record = DiaryRecord::new("t", "c", date);
        assert_eq!(record.day(), NaiveDate::from_ymd_opt(2025, 3, 15).unwrap());
    }

    #[test]
    fn test_record_serialization() {
        let record = DiaryRecord::new("t", "c", at("2025-03-15T14:30:45"))
            .id("a")
            .legacy_tags(["old"]);

        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"legacyTags\""));
        assert!(!json.contains("\"location\""));

        let restored: DiaryRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, record);
    }

    #[test]
    fn test_record_deserialization_defaults() {
        let json = r#"{"id":"x","date":"2025-01-01T08:00:00","title":"t","content":"c"}"#;
        let record: DiaryRecord = serde_json::from_str(json).unwrap();

        assert!(record.tags.is_none());
        assert!(record.legacy_tags.is_none());
        assert!(record.location.is_none());
    }
}
