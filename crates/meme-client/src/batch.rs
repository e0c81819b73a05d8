//! # Upload Batch Builder
//!
//! Resolves a [`BatchSource`] into an ordered list of validated
//! [`UploadRecord`]s.
//!
//! ```text
//!   BatchSource::File(path) ──► read_to_string ──► parse_batch ──┐
//!                                                                ├──► Vec<UploadRecord>
//!   BatchSource::Inline {..} ──► UploadRecord::new ──────────────┘
//! ```
//!
//! Parsing and validation are pure and live in `meme-core`; this module only
//! adds the file read.

use std::path::PathBuf;

use meme_core::{parse_batch, UploadRecord};
use tracing::{debug, warn};

use crate::error::{ClientError, ClientResult};

/// Where an upload batch comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchSource {
    /// JSON array of `{title, url, category}` objects.
    File(PathBuf),

    /// A single record given on the command line.
    Inline {
        title: String,
        url: String,
        category: String,
    },
}

/// Builds the upload batch described by `source`, preserving order.
///
/// ## Errors
/// - [`ClientError::BatchRead`] if the file cannot be read
/// - [`ClientError::Parse`] if the file is not a valid batch document
/// - [`ClientError::Validation`] if a title or url is blank
pub fn build(source: &BatchSource) -> ClientResult<Vec<UploadRecord>> {
    match source {
        BatchSource::File(path) => {
            let document =
                std::fs::read_to_string(path).map_err(|e| ClientError::BatchRead {
                    path: path.clone(),
                    reason: e.to_string(),
                })?;

            let records = parse_batch(&document)?;

            if records.is_empty() {
                warn!(path = %path.display(), "Batch file contains no memes");
            } else {
                debug!(path = %path.display(), count = records.len(), "Loaded upload batch");
            }

            Ok(records)
        }
        BatchSource::Inline {
            title,
            url,
            category,
        } => Ok(vec![UploadRecord::new(
            title.as_str(),
            url.as_str(),
            category.as_str(),
        )?]),
    }
}
