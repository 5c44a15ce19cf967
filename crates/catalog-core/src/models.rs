use serde::{Deserialize, Serialize};

/// Label used for records whose grouping field is blank.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// A single normalized row of the book catalog.
///
/// Every string field is trimmed. Blank source cells become empty strings,
/// except `isbn`, which is `None` when the source cell held no value.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BookRecord {
    /// Book title (`book` column).
    pub title: String,
    /// Author name as written in the catalog.
    pub author: String,
    /// Raw publication date; parsed lazily by the year extractor.
    pub publication_date: String,
    /// Language name.
    pub language: String,
    /// Publisher name (`book publisher` column).
    pub publisher: String,
    /// ISBN, absent when the cell was a null marker.
    pub isbn: Option<String>,
    /// British National Bibliography identifier (`BNB id` column).
    pub catalog_id: String,
}

impl BookRecord {
    /// Author label used for grouping.
    pub fn author_label(&self) -> &str {
        label_or_unknown(&self.author)
    }

    /// Language label used for grouping.
    pub fn language_label(&self) -> &str {
        label_or_unknown(&self.language)
    }

    /// Publisher label used for grouping.
    pub fn publisher_label(&self) -> &str {
        label_or_unknown(&self.publisher)
    }

    /// `true` when the ISBN is absent or blank.
    pub fn is_isbn_missing(&self) -> bool {
        self.isbn
            .as_deref()
            .map_or(true, |isbn| isbn.trim().is_empty())
    }
}

/// Return `value`, or [`UNKNOWN_LABEL`] when it is empty.
pub fn label_or_unknown(value: &str) -> &str {
    if value.is_empty() {
        UNKNOWN_LABEL
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_with_isbn(isbn: Option<&str>) -> BookRecord {
        BookRecord {
            isbn: isbn.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_blank_labels_fall_back_to_unknown() {
        let record = BookRecord::default();
        assert_eq!(record.author_label(), "Unknown");
        assert_eq!(record.language_label(), "Unknown");
        assert_eq!(record.publisher_label(), "Unknown");
    }

    #[test]
    fn test_labels_pass_through_when_present() {
        let record = BookRecord {
            author: "Dickens, Charles".to_string(),
            language: "English".to_string(),
            publisher: "Chapman & Hall".to_string(),
            ..Default::default()
        };
        assert_eq!(record.author_label(), "Dickens, Charles");
        assert_eq!(record.language_label(), "English");
        assert_eq!(record.publisher_label(), "Chapman & Hall");
    }

    #[test]
    fn test_isbn_missing_rules() {
        assert!(record_with_isbn(None).is_isbn_missing());
        assert!(record_with_isbn(Some("")).is_isbn_missing());
        assert!(record_with_isbn(Some("   ")).is_isbn_missing());
        assert!(!record_with_isbn(Some("9780141439518")).is_isbn_missing());
    }

    #[test]
    fn test_record_serializes_missing_isbn_as_null() {
        let json = serde_json::to_value(record_with_isbn(None)).unwrap();
        assert!(json["isbn"].is_null());
        assert_eq!(json["title"], "");
    }
}
