//! # Client Error Types
//!
//! Error types for every facade operation.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Client Error Categories                           │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │   Transport     │  │     Remote      │  │      Input              │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  Connect        │  │  Remote         │  │  Parse                  │ │
//! │  │  Timeout        │  │  (gRPC status)  │  │  Validation             │ │
//! │  │                 │  │                 │  │  BatchRead              │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  ┌─────────────────┐                                                   │
//! │  │  Configuration  │                                                   │
//! │  │  Config         │                                                   │
//! │  └─────────────────┘                                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Remote and timeout errors always name the RPC that failed.

use std::path::PathBuf;

use meme_core::{CoreError, ValidationError};
use thiserror::Error;
use tonic::{Code, Status};

use crate::client::Operation;

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Client error type covering all possible facade failures.
#[derive(Debug, Clone, Error)]
pub enum ClientError {
    // =========================================================================
    // Transport Errors
    // =========================================================================
    /// The endpoint could not be reached or the address is malformed.
    #[error("Connection failed: {0}")]
    Connect(String),

    /// The invocation deadline expired while awaiting the service.
    #[error("{operation}: deadline of {budget_ms}ms exceeded")]
    Timeout { operation: Operation, budget_ms: u64 },

    // =========================================================================
    // Remote Errors
    // =========================================================================
    /// The service answered a well-formed request with an error status.
    #[error("{operation}: {message} (code: {code:?})")]
    Remote {
        operation: Operation,
        code: Code,
        message: String,
    },

    // =========================================================================
    // Input Errors
    // =========================================================================
    /// The batch document is malformed.
    #[error("Invalid batch document: {0}")]
    Parse(String),

    /// An upload is missing a required field.
    #[error("Invalid upload: {0}")]
    Validation(#[from] ValidationError),

    /// The batch file could not be read.
    #[error("Failed to read batch file {}: {reason}", .path.display())]
    BatchRead { path: PathBuf, reason: String },

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid or unreadable client configuration.
    #[error("Invalid client configuration: {0}")]
    Config(String),
}

// =============================================================================
// Error Conversions
// =============================================================================

impl ClientError {
    /// Maps a gRPC status returned by `operation`.
    ///
    /// A server-side `DEADLINE_EXCEEDED` carries no budget here; the
    /// [`Deadline`](crate::Deadline) that wrapped the call fills it in.
    ///
    /// ## Mapping
    /// ```text
    /// DEADLINE_EXCEEDED  →  Timeout
    /// UNAVAILABLE        →  Connect   (reachability surfaced on first use)
    /// anything else      →  Remote
    /// ```
    pub fn from_status(operation: Operation, status: Status) -> Self {
        match status.code() {
            Code::DeadlineExceeded => ClientError::Timeout {
                operation,
                budget_ms: 0,
            },
            Code::Unavailable => {
                ClientError::Connect(format!("{}: {}", operation, status.message()))
            }
            code => ClientError::Remote {
                operation,
                code,
                message: status.message().to_string(),
            },
        }
    }
}

impl From<CoreError> for ClientError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Parse(msg) => ClientError::Parse(msg),
            CoreError::Validation(v) => ClientError::Validation(v),
        }
    }
}

impl From<toml::de::Error> for ClientError {
    fn from(err: toml::de::Error) -> Self {
        ClientError::Config(err.to_string())
    }
}

// =============================================================================
// Error Categorization
// =============================================================================

impl ClientError {
    /// Returns true if the invocation deadline expired.
    pub fn is_timeout(&self) -> bool {
        matches!(self, ClientError::Timeout { .. })
    }

    /// Returns true if the service rejected the request.
    pub fn is_remote(&self) -> bool {
        matches!(self, ClientError::Remote { .. })
    }

    /// Returns true if the endpoint could not be reached.
    pub fn is_connect(&self) -> bool {
        matches!(self, ClientError::Connect(_))
    }

    /// Returns true if the error was caused by user-supplied upload input.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            ClientError::Parse(_) | ClientError::Validation(_) | ClientError::BatchRead { .. }
        )
    }

    /// The RPC this error is attributed to, if any.
    pub fn operation(&self) -> Option<Operation> {
        match self {
            ClientError::Timeout { operation, .. } | ClientError::Remote { operation, .. } => {
                Some(*operation)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let err = ClientError::from_status(
            Operation::GetRandomMeme,
            Status::not_found("no memes for category"),
        );
        assert!(err.is_remote());
        assert_eq!(err.operation(), Some(Operation::GetRandomMeme));
        assert!(err.to_string().starts_with("GetRandomMeme: no memes for category"));

        let err = ClientError::from_status(Operation::StreamMemes, Status::deadline_exceeded("late"));
        assert!(err.is_timeout());

        let err = ClientError::from_status(Operation::UploadMemes, Status::unavailable("refused"));
        assert!(err.is_connect());
        assert!(err.to_string().contains("UploadMemes"));
    }

    #[test]
    fn test_core_error_conversion() {
        let err: ClientError = CoreError::Parse("eof".into()).into();
        assert!(matches!(err, ClientError::Parse(_)));
        assert!(err.is_input_error());

        let err: ClientError = CoreError::Validation(ValidationError::Required {
            field: "title".into(),
        })
        .into();
        assert_eq!(err.to_string(), "Invalid upload: title is required");
    }

    #[test]
    fn test_timeout_display() {
        let err = ClientError::Timeout {
            operation: Operation::GetMemesByCategory,
            budget_ms: 5000,
        };
        assert_eq!(err.to_string(), "GetMemesByCategory: deadline of 5000ms exceeded");
        assert!(!err.is_input_error());
    }
}
