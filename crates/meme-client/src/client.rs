//! # Meme Client - Service Facade
//!
//! Typed access to the four `MemeService` RPCs over one [`Connection`].
//!
//! ## Interaction Patterns
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        MemeClient (this module)                         │
//! │                                                                         │
//! │  get_random          unary          MemeRequest      ──►  Meme          │
//! │  list_by_category    unary          CategoryRequest  ──►  MemeList      │
//! │  stream_by_category  server stream  StreamRequest    ──►  Meme, Meme, … │
//! │  upload_batch        client stream  MemeUpload, …    ──►  UploadSummary │
//! │                                                                         │
//! │                                 │                                       │
//! │                                 │ gRPC over HTTP/2 (plaintext)          │
//! │                                 ▼                                       │
//! │                         Meme server (port 50051)                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every call takes the invocation [`Deadline`]. Nothing is cached or retried
//! here; errors are returned as [`ClientError`] values and the caller decides
//! what to do with them.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use meme_core::{CategoryFilter, MemeRecord, UploadRecord, UploadSummary};
use tonic::transport::Channel;
use tonic::Code;
use tracing::{debug, info, warn};

use crate::connection::Connection;
use crate::deadline::Deadline;
use crate::error::{ClientError, ClientResult};
use crate::proto::{
    meme_service_client::MemeServiceClient, CategoryRequest, Meme, MemeRequest, MemeUpload,
    StreamRequest, UploadSummary as ProtoUploadSummary,
};
use crate::stream::MemeStream;

// =============================================================================
// Operation
// =============================================================================

/// The remote operation an outcome is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Eager dial of the endpoint.
    Connect,
    GetRandomMeme,
    GetMemesByCategory,
    StreamMemes,
    UploadMemes,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Connect => "Connect",
            Operation::GetRandomMeme => "GetRandomMeme",
            Operation::GetMemesByCategory => "GetMemesByCategory",
            Operation::StreamMemes => "StreamMemes",
            Operation::UploadMemes => "UploadMemes",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Meme Client
// =============================================================================

/// Facade over a borrowed [`Connection`].
///
/// Borrowing keeps release of the connection with its owner; the client only
/// clones channel handles out of it.
pub struct MemeClient<'c> {
    connection: &'c Connection,
}

impl<'c> MemeClient<'c> {
    pub fn new(connection: &'c Connection) -> Self {
        MemeClient { connection }
    }

    fn service(&self) -> ClientResult<MemeServiceClient<Channel>> {
        Ok(MemeServiceClient::new(self.connection.channel()?))
    }

    /// Fetches one random meme, optionally restricted to a category.
    ///
    /// ## Errors
    /// [`ClientError::Remote`] when the service fails the call, including
    /// when no meme exists for the category.
    pub async fn get_random(
        &self,
        filter: &CategoryFilter,
        deadline: &Deadline,
    ) -> ClientResult<MemeRecord> {
        let operation = Operation::GetRandomMeme;
        let mut client = self.service()?;

        debug!(%operation, category = %filter, "Requesting random meme");

        let request = deadline.request(MemeRequest {
            category: filter.as_str().to_string(),
        });

        let response = deadline
            .run(operation, async {
                client
                    .get_random_meme(request)
                    .await
                    .map_err(|status| ClientError::from_status(operation, status))
            })
            .await?;

        Ok(meme_from_proto(response.into_inner()))
    }

    /// Lists memes in a category; an empty filter lists every meme.
    ///
    /// Order is whatever the server returns. An empty list is not an error.
    pub async fn list_by_category(
        &self,
        filter: &CategoryFilter,
        deadline: &Deadline,
    ) -> ClientResult<Vec<MemeRecord>> {
        let operation = Operation::GetMemesByCategory;
        let mut client = self.service()?;

        debug!(%operation, category = %filter, "Listing memes");

        let request = deadline.request(CategoryRequest {
            category: filter.as_str().to_string(),
        });

        let response = deadline
            .run(operation, async {
                client
                    .get_memes_by_category(request)
                    .await
                    .map_err(|status| ClientError::from_status(operation, status))
            })
            .await?;

        let memes: Vec<MemeRecord> = response
            .into_inner()
            .memes
            .into_iter()
            .map(meme_from_proto)
            .collect();

        info!(%operation, category = %filter, count = memes.len(), "Listed memes");
        Ok(memes)
    }

    /// Opens a server stream of memes in a category.
    ///
    /// Returns once the server has accepted the call; items are pulled with
    /// [`MemeStream::next`]. The stream is finite and cannot be restarted.
    pub async fn stream_by_category(
        &self,
        filter: &CategoryFilter,
        deadline: &Deadline,
    ) -> ClientResult<MemeStream> {
        let operation = Operation::StreamMemes;
        let mut client = self.service()?;

        debug!(%operation, category = %filter, "Opening meme stream");

        let request = deadline.request(StreamRequest {
            category: filter.as_str().to_string(),
        });

        let response = deadline
            .run(operation, async {
                client
                    .stream_memes(request)
                    .await
                    .map_err(|status| ClientError::from_status(operation, status))
            })
            .await?;

        Ok(MemeStream::new(response.into_inner(), *deadline))
    }

    /// Uploads a batch over a client stream and returns the server's summary.
    ///
    /// The whole batch is transmitted and the stream half-closed before the
    /// summary is awaited. A failure at any point aborts without a summary.
    pub async fn upload_batch(
        &self,
        records: Vec<UploadRecord>,
        deadline: &Deadline,
    ) -> ClientResult<UploadSummary> {
        let operation = Operation::UploadMemes;
        let mut client = self.service()?;

        let batch_id = uuid::Uuid::new_v4().to_string();
        let record_count = records.len();

        info!(%operation, batch_id = %batch_id, record_count, "Uploading batch");

        let sent = Arc::new(AtomicUsize::new(0));
        let counter = sent.clone();
        let outbound = tokio_stream::iter(records.into_iter().map(move |record| {
            counter.fetch_add(1, Ordering::SeqCst);
            upload_to_proto(record)
        }));

        let request = deadline.request(outbound);

        let response = deadline
            .run(operation, async {
                client
                    .upload_memes(request)
                    .await
                    .map_err(|status| ClientError::from_status(operation, status))
            })
            .await?;

        let summary = summary_from_proto(operation, response.into_inner())?;
        let transmitted = sent.load(Ordering::SeqCst);

        if summary.count as usize != transmitted {
            warn!(
                batch_id = %batch_id,
                transmitted,
                acknowledged = summary.count,
                "Server acknowledged a different number of memes than were sent"
            );
        }

        info!(
            batch_id = %batch_id,
            transmitted,
            acknowledged = summary.count,
            "Upload batch complete"
        );

        Ok(summary)
    }
}

// =============================================================================
// Conversion Helpers
// =============================================================================

/// Convert a proto::Meme to a meme_core::MemeRecord.
pub(crate) fn meme_from_proto(meme: Meme) -> MemeRecord {
    MemeRecord {
        id: meme.id,
        title: meme.title,
        url: meme.url,
        category: meme.category,
    }
}

/// Convert a meme_core::UploadRecord to a proto::MemeUpload.
fn upload_to_proto(record: UploadRecord) -> MemeUpload {
    let (title, url, category) = record.into_parts();
    MemeUpload {
        title,
        url,
        category,
    }
}

/// Convert a proto::UploadSummary, rejecting a negative count.
fn summary_from_proto(
    operation: Operation,
    summary: ProtoUploadSummary,
) -> ClientResult<UploadSummary> {
    let count = u32::try_from(summary.count).map_err(|_| ClientError::Remote {
        operation,
        code: Code::Internal,
        message: format!("server reported a negative count ({})", summary.count),
    })?;

    Ok(UploadSummary {
        count,
        message: summary.message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_names() {
        assert_eq!(Operation::GetRandomMeme.to_string(), "GetRandomMeme");
        assert_eq!(Operation::GetMemesByCategory.to_string(), "GetMemesByCategory");
        assert_eq!(Operation::StreamMemes.to_string(), "StreamMemes");
        assert_eq!(Operation::UploadMemes.to_string(), "UploadMemes");
    }

    #[test]
    fn test_meme_from_proto() {
        let record = meme_from_proto(Meme {
            id: "1".into(),
            title: "X".into(),
            url: "http://a".into(),
            category: "funny".into(),
        });
        assert_eq!(record.id, "1");
        assert_eq!(record.category, "funny");
    }

    #[test]
    fn test_upload_to_proto_keeps_empty_category() {
        let record = UploadRecord::new("t", "http://u", "").unwrap();
        let upload = upload_to_proto(record);
        assert_eq!(upload.title, "t");
        assert_eq!(upload.category, "");
    }

    #[test]
    fn test_negative_summary_count_is_rejected() {
        let err = summary_from_proto(
            Operation::UploadMemes,
            ProtoUploadSummary {
                count: -1,
                message: "bad".into(),
            },
        )
        .unwrap_err();
        assert!(err.is_remote());

        let summary = summary_from_proto(
            Operation::UploadMemes,
            ProtoUploadSummary {
                count: 3,
                message: "ok".into(),
            },
        )
        .unwrap();
        assert_eq!(summary.count, 3);
    }

    #[tokio::test]
    async fn test_closed_connection_refuses_calls() {
        let mut connection = Connection::open(&crate::ClientConfig::default())
            .await
            .unwrap();
        connection.close();

        let client = MemeClient::new(&connection);
        let err = client
            .get_random(&CategoryFilter::all(), &Deadline::default())
            .await
            .unwrap_err();
        assert!(err.is_connect());
    }
}
