//! # Batch Documents
//!
//! Parses the JSON document used for bulk uploads:
//!
//! ```json
//! [
//!   { "title": "a", "url": "http://img/a.png", "category": "funny" },
//!   { "title": "b", "url": "http://img/b.png", "category": "" }
//! ]
//! ```
//!
//! Entry order is preserved. A missing `category` is read as `""`.
//! Reading the document from disk is the caller's job.

use serde::Deserialize;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::types::UploadRecord;

/// One entry of a batch document, before validation.
#[derive(Debug, Deserialize)]
struct BatchEntry {
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    category: String,
}

/// Parses and validates a batch document.
///
/// ## Errors
/// - [`CoreError::Parse`] for malformed JSON or a non-array document
/// - [`CoreError::Validation`] naming the first entry with a blank
///   `title` or `url`, e.g. `memes[1].url is required`
pub fn parse_batch(document: &str) -> CoreResult<Vec<UploadRecord>> {
    let entries: Vec<BatchEntry> =
        serde_json::from_str(document).map_err(|e| CoreError::Parse(e.to_string()))?;

    entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            UploadRecord::new(entry.title, entry.url, entry.category).map_err(|err| {
                let ValidationError::Required { field } = err;
                CoreError::Validation(ValidationError::Required {
                    field: format!("memes[{}].{}", index, field),
                })
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_preserves_order_and_empty_category() {
        let doc = r#"[
            {"title":"a","url":"u1","category":"c"},
            {"title":"b","url":"u2","category":""}
        ]"#;
        let records = parse_batch(doc).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].title(), "a");
        assert_eq!(records[0].category(), "c");
        assert_eq!(records[1].title(), "b");
        assert_eq!(records[1].url(), "u2");
        assert_eq!(records[1].category(), "");
    }

    #[test]
    fn test_missing_category_defaults_to_empty() {
        let records = parse_batch(r#"[{"title":"a","url":"u1"}]"#).unwrap();
        assert_eq!(records[0].category(), "");
    }

    #[test]
    fn test_empty_array_is_valid() {
        assert!(parse_batch("[]").unwrap().is_empty());
    }

    #[test]
    fn test_malformed_document_is_parse_error() {
        assert!(matches!(parse_batch("{not json"), Err(CoreError::Parse(_))));
        assert!(matches!(
            parse_batch(r#"{"title":"a","url":"u"}"#),
            Err(CoreError::Parse(_))
        ));
        assert!(matches!(
            parse_batch(r#"[{"title":1,"url":"u"}]"#),
            Err(CoreError::Parse(_))
        ));
    }

    #[test]
    fn test_blank_field_names_the_entry() {
        let err = parse_batch(r#"[{"title":"a","url":"u"},{"title":"b","url":" "}]"#)
            .unwrap_err();
        match err {
            CoreError::Validation(ValidationError::Required { field }) => {
                assert_eq!(field, "memes[1].url");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
