//! # Error Types
//!
//! Domain-specific error types for meme-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  meme-core errors (this file)                                          │
//! │  ├── CoreError        - Batch document / domain failures               │
//! │  └── ValidationError  - Missing required upload fields                 │
//! │                                                                         │
//! │  meme-client errors (separate crate)                                   │
//! │  └── ClientError      - Connect / Remote / Timeout / ...               │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ClientError → CLI exit status     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Domain errors raised while turning user input into upload records.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The batch document is not a JSON array of upload objects.
    ///
    /// ## When This Occurs
    /// - Invalid JSON syntax
    /// - Top-level value is not an array
    /// - An entry has a non-string `title`, `url` or `category`
    #[error("Invalid batch document: {0}")]
    Parse(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },
}

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;
