//! Searchable text construction
//!
//! Each indexed record gets one lowercase blob: title, content, effective
//! tags and location joined by single spaces. Callers do plain substring
//! containment on it; there is no tokenization or ranking.

use crate::storage::DiaryRecord;

/// Build the lowercase search blob for a record
///
/// An absent location contributes an empty string, so the blob always
/// ends with a separator-delimited location slot.
pub fn build_searchable_text(record: &DiaryRecord) -> String {
    let tags = record.effective_tags();

    let mut parts: Vec<&str> = Vec::with_capacity(tags.len() + 3);
    parts.push(&record.title);
    parts.push(&record.content);
    parts.extend(tags.iter().map(String::as_str));
    parts.push(record.location.as_deref().unwrap_or(""));

    parts.join(" ").to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn base() -> DiaryRecord {
        let date = NaiveDate::from_ymd_opt(2025, 3, 15)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        DiaryRecord::new("My Title", "My Content", date).id("a")
    }

    #[test]
    fn test_full_composition() {
        let record = base().tags(["Tag1", "Tag2"]).location("Tokyo");
        let text = build_searchable_text(&record);

        assert!(text.contains("my title"));
        assert!(text.contains("my content"));
        assert!(text.contains("tag1"));
        assert!(text.contains("tag2"));
        assert!(text.contains("tokyo"));
        assert_eq!(text, "my title my content tag1 tag2 tokyo");
    }

    #[test]
    fn test_legacy_tags_fallback() {
        let record = base().legacy_tags(["LegacyTag"]);
        let text = build_searchable_text(&record);

        assert!(text.contains("legacytag"));
    }

    #[test]
    fn test_primary_tags_shadow_legacy() {
        let record = base().tags(["Fresh"]).legacy_tags(["Stale"]);
        let text = build_searchable_text(&record);

        assert!(text.contains("fresh"));
        assert!(!text.contains("stale"));
    }

    #[test]
    fn test_missing_location_and_tags() {
        let text = build_searchable_text(&base());
        assert_eq!(text, "my title my content ");
    }

    #[test]
    fn test_unicode_lowercasing() {
        let record = base().location("ÖSTERSUND");
        assert!(build_searchable_text(&record).ends_with("östersund"));
    }
}
