//! # meme-client: gRPC Facade for the Meme Service
//!
//! Typed access to a remote meme service over plaintext gRPC. One
//! [`Connection`] carries every call; one [`Deadline`] bounds every call of
//! an invocation.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          meme-client                                    │
//! │                                                                         │
//! │   ClientConfig ──► Connection::open ──► Connection (tonic Channel)     │
//! │   (TOML + env)                              │                           │
//! │                                             │ borrowed                  │
//! │                                             ▼                           │
//! │   Deadline::after(timeout) ─────────►  MemeClient                      │
//! │                                        ├─ get_random        (unary)    │
//! │                                        ├─ list_by_category  (unary)    │
//! │                                        ├─ stream_by_category ─► MemeStream
//! │                                        └─ upload_batch      (client    │
//! │                                              ▲                 stream) │
//! │   BatchSource ──► batch::build ──────────────┘                          │
//! │   (file / inline)                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//! - [`batch`] - Upload batch builder (file or inline source)
//! - [`client`] - `MemeClient` facade and the `Operation` names
//! - [`config`] - Client configuration (address, timeouts, policies)
//! - [`connection`] - Transport connector with observable release
//! - [`deadline`] - Per-invocation time budget
//! - [`error`] - Client error types
//! - [`proto`] - Generated gRPC stubs from proto/memes.proto
//! - [`stream`] - Server stream consumption and stream policy
//!
//! ## Usage
//!
//! ```rust,ignore
//! use meme_client::{ClientConfig, Connection, Deadline, MemeClient};
//! use meme_core::CategoryFilter;
//!
//! let config = ClientConfig::load(None)?;
//! let deadline = Deadline::after(config.timeout());
//! let mut connection = Connection::open(&config).await?;
//!
//! let client = MemeClient::new(&connection);
//! let memes = client
//!     .list_by_category(&CategoryFilter::new("funny"), &deadline)
//!     .await?;
//!
//! connection.close();
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod batch;
pub mod client;
pub mod config;
pub mod connection;
pub mod deadline;
pub mod error;
pub mod proto;
pub mod stream;

// =============================================================================
// Re-exports
// =============================================================================

pub use batch::{build as build_batch, BatchSource};
pub use client::{MemeClient, Operation};
pub use config::{ClientConfig, ConnectMode, StreamPolicy, DEFAULT_ADDRESS};
pub use connection::{Connection, ReleaseHandle};
pub use deadline::{Deadline, DEFAULT_TIMEOUT};
pub use error::{ClientError, ClientResult};
pub use stream::{MemeStream, StreamEnd, StreamOutcome};
