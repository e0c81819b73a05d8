//! # Validation Module
//!
//! Required-field checks applied to every upload before it is sent.
//!
//! ## Rules
//! ```text
//! ┌──────────────┬──────────────────────────────────────────────┐
//! │ Field        │ Rule                                         │
//! ├──────────────┼──────────────────────────────────────────────┤
//! │ title        │ non-empty after trimming                     │
//! │ url          │ non-empty after trimming                     │
//! │ category     │ anything; "" means uncategorized             │
//! └──────────────┴──────────────────────────────────────────────┘
//! ```
//!
//! Values are checked trimmed but stored exactly as given.

use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Fails with [`ValidationError::Required`] when `value` is blank.
///
/// Whitespace-only values count as blank, which is stricter than a plain
/// `!= ""` check.
///
/// ## Example
/// ```rust
/// use meme_core::validation::validate_required;
///
/// assert!(validate_required("title", "Doge").is_ok());
/// assert!(validate_required("title", "   ").is_err());
/// ```
pub fn validate_required(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates the title of an upload.
pub fn validate_title(title: &str) -> ValidationResult<()> {
    validate_required("title", title)
}

/// Validates the url of an upload.
pub fn validate_url(url: &str) -> ValidationResult<()> {
    validate_required("url", url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_required() {
        assert!(validate_required("title", "x").is_ok());
        assert!(validate_required("title", "").is_err());
        assert!(validate_required("title", " \t\n").is_err());
    }

    #[test]
    fn test_error_names_the_field() {
        let err = validate_url("").unwrap_err();
        assert_eq!(
            err,
            ValidationError::Required {
                field: "url".to_string()
            }
        );
        assert!(validate_title("").unwrap_err().to_string().starts_with("title"));
    }
}
