//! # meme-core: Domain Types for the Meme Client
//!
//! Pure types and rules shared by the gRPC facade and the CLI. Nothing in
//! this crate touches the network or the file system.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Meme Client Architecture                         │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  apps/cli (Interaction Driver)                  │   │
//! │  │      random ──► list ──► stream ──► upload ──► render           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               meme-client (Service Facade, gRPC)                │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ meme-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐                   │   │
//! │  │   │   types   │  │   batch   │  │ validation│                   │   │
//! │  │   │MemeRecord │  │ JSON docs │  │  required │                   │   │
//! │  │   │UploadRec. │  │  → records│  │  fields   │                   │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘                   │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • PURE FUNCTIONS                          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - `MemeRecord`, `UploadRecord`, `UploadSummary`, `CategoryFilter`
//! - [`batch`] - Parsing of batch upload documents
//! - [`error`] - Domain error types
//! - [`validation`] - Required-field checks for uploads
//!
//! ## Example Usage
//!
//! ```rust
//! use meme_core::{parse_batch, CategoryFilter};
//!
//! let records = parse_batch(r#"[{"title":"a","url":"u1","category":"c"}]"#).unwrap();
//! assert_eq!(records.len(), 1);
//!
//! assert!(CategoryFilter::all().is_all());
//! ```

pub mod batch;
pub mod error;
pub mod types;
pub mod validation;

pub use batch::parse_batch;
pub use error::{CoreError, CoreResult, ValidationError};
pub use types::*;

/// Label shown for records whose category is empty.
///
/// Only used when rendering; stored records keep the empty string.
pub const UNCATEGORIZED: &str = "uncategorized";
