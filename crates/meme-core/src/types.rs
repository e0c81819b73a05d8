//! # Domain Types
//!
//! Core domain types used throughout the meme client.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   MemeRecord    │   │  UploadRecord   │   │  UploadSummary  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (server)    │   │  title (req.)   │   │  count          │       │
//! │  │  title          │   │  url (req.)     │   │  message        │       │
//! │  │  url            │   │  category       │   │                 │       │
//! │  │  category       │   │                 │   │                 │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐                                                   │
//! │  │ CategoryFilter  │   "" = every category                             │
//! │  └─────────────────┘                                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `MemeRecord` and `UploadRecord` are unrelated except that both carry a
//! category from the same string domain.

use serde::{Deserialize, Serialize};

use crate::validation::{validate_title, validate_url, ValidationResult};
use crate::UNCATEGORIZED;

// =============================================================================
// Category Filter
// =============================================================================

/// Optional category restriction for read operations.
///
/// An empty filter means "no filter": every category is returned or streamed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryFilter(String);

impl CategoryFilter {
    /// Creates a filter for the given category. Surrounding whitespace is dropped.
    ///
    /// The trimmed value is what goes on the wire, so `" funny "` asks the
    /// server for `funny` and `"   "` means every category. Clients that
    /// forward the flag untouched would send the spaces as well.
    pub fn new(category: impl Into<String>) -> Self {
        let category = category.into();
        CategoryFilter(category.trim().to_string())
    }

    /// The "no filter" value.
    pub fn all() -> Self {
        CategoryFilter(String::new())
    }

    /// Returns true if this filter matches every category.
    pub fn is_all(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the raw category string sent on the wire.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CategoryFilter {
    fn from(category: &str) -> Self {
        CategoryFilter::new(category)
    }
}

impl From<Option<String>> for CategoryFilter {
    fn from(category: Option<String>) -> Self {
        category.map(CategoryFilter::new).unwrap_or_default()
    }
}

impl std::fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_all() {
            write!(f, "<all>")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

// =============================================================================
// Meme Record
// =============================================================================

/// One item of content as returned by the service.
///
/// Immutable once received; `id` is assigned by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemeRecord {
    /// Opaque server-assigned identifier.
    pub id: String,

    /// Display title.
    pub title: String,

    /// Location of the image.
    pub url: String,

    /// Category, empty when uncategorized.
    #[serde(default)]
    pub category: String,
}

impl MemeRecord {
    /// Category as shown to users: empty becomes `uncategorized`.
    pub fn display_category(&self) -> &str {
        display_category(&self.category)
    }
}

// =============================================================================
// Upload Record
// =============================================================================

/// One item pending upload.
///
/// Construct through [`UploadRecord::new`] so that `title` and `url` are
/// guaranteed non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadRecord {
    title: String,
    url: String,
    category: String,
}

impl UploadRecord {
    /// Creates a validated upload record.
    ///
    /// ## Errors
    /// [`ValidationError::Required`](crate::ValidationError::Required) when
    /// `title` or `url` is blank. An empty `category` is accepted and kept
    /// as `""`.
    ///
    /// ## Example
    /// ```rust
    /// use meme_core::UploadRecord;
    ///
    /// let record = UploadRecord::new("Doge", "http://img/doge.png", "").unwrap();
    /// assert_eq!(record.category(), "");
    /// assert!(UploadRecord::new("", "http://img/x.png", "funny").is_err());
    /// ```
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        category: impl Into<String>,
    ) -> ValidationResult<Self> {
        let title = title.into();
        let url = url.into();
        validate_title(&title)?;
        validate_url(&url)?;

        Ok(UploadRecord {
            title,
            url,
            category: category.into(),
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    /// Consumes the record, returning `(title, url, category)`.
    pub fn into_parts(self) -> (String, String, String) {
        (self.title, self.url, self.category)
    }
}

// =============================================================================
// Upload Summary
// =============================================================================

/// Result of a batch upload as reported by the service.
///
/// `count` is the server's acknowledgement. The client never replaces it
/// with the number of records it sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadSummary {
    /// Number of records the server acknowledged.
    pub count: u32,

    /// Human-readable status from the server.
    pub message: String,
}

/// Display form of a category string.
pub fn display_category(category: &str) -> &str {
    if category.is_empty() {
        UNCATEGORIZED
    } else {
        category
    }
}
