//! Generated gRPC code for the meme service.
//!
//! This module includes the Rust code generated from `proto/memes.proto`.
//!
//! ## Available Stubs
//! - `meme_service_client::MemeServiceClient` - used by [`crate::MemeClient`]
//! - `meme_service_server::MemeService` - server trait, generated only with
//!   the `server` feature

tonic::include_proto!("memes");
