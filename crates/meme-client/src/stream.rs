//! # Server Stream Consumption
//!
//! [`MemeStream`] pulls items from an open `StreamMemes` call one at a time,
//! each pull bounded by the invocation deadline. How an interrupted stream is
//! reported is decided afterwards by [`StreamOutcome::resolve`].
//!
//! ## Stream Policy
//! ```text
//! ┌──────────────┬──────────────────┬───────────────────────────────────┐
//! │ Policy       │ Clean end        │ Interrupted after N items         │
//! ├──────────────┼──────────────────┼───────────────────────────────────┤
//! │ tolerant     │ Ok(N)            │ N > 0: warn, Ok(N)                │
//! │              │                  │ N = 0: Err                        │
//! │ lenient      │ Ok(N)            │ warn, Ok(N)                       │
//! │ strict       │ Ok(N)            │ Err                               │
//! └──────────────┴──────────────────┴───────────────────────────────────┘
//! ```

use meme_core::MemeRecord;
use tracing::{debug, warn};

use crate::client::{meme_from_proto, Operation};
use crate::config::StreamPolicy;
use crate::deadline::Deadline;
use crate::error::{ClientError, ClientResult};
use crate::proto::Meme;

/// How a consumed stream ended.
#[derive(Debug, Clone)]
pub enum StreamEnd {
    /// The server signalled end-of-stream.
    Completed,
    /// A status error or the deadline ended the stream early.
    Interrupted(ClientError),
}

/// An open server stream of memes.
pub struct MemeStream {
    inner: tonic::Streaming<Meme>,
    deadline: Deadline,
    received: usize,
    end: Option<StreamEnd>,
}

impl MemeStream {
    pub(crate) fn new(inner: tonic::Streaming<Meme>, deadline: Deadline) -> Self {
        MemeStream {
            inner,
            deadline,
            received: 0,
            end: None,
        }
    }

    /// Waits for the next meme.
    ///
    /// Returns `None` once the stream has ended for any reason; inspect
    /// [`end`](Self::end) to tell a clean end from an interruption.
    pub async fn next(&mut self) -> Option<MemeRecord> {
        if self.end.is_some() {
            return None;
        }

        let deadline = self.deadline;
        let inner = &mut self.inner;
        let pulled = deadline
            .run(Operation::StreamMemes, async {
                inner
                    .message()
                    .await
                    .map_err(|status| ClientError::from_status(Operation::StreamMemes, status))
            })
            .await;

        match pulled {
            Ok(Some(meme)) => {
                self.received += 1;
                Some(meme_from_proto(meme))
            }
            Ok(None) => {
                debug!(received = self.received, "Meme stream completed");
                self.end = Some(StreamEnd::Completed);
                None
            }
            Err(err) => {
                debug!(received = self.received, error = %err, "Meme stream interrupted");
                self.end = Some(StreamEnd::Interrupted(err));
                None
            }
        }
    }

    /// Items delivered so far.
    pub fn received(&self) -> usize {
        self.received
    }

    pub fn end(&self) -> Option<&StreamEnd> {
        self.end.as_ref()
    }

    pub fn is_finished(&self) -> bool {
        self.end.is_some()
    }

    /// Consumes the stream into its outcome.
    ///
    /// A stream abandoned before its end is recorded as completed with the
    /// items seen so far.
    pub fn into_outcome(self) -> StreamOutcome {
        StreamOutcome {
            received: self.received,
            end: self.end.unwrap_or(StreamEnd::Completed),
        }
    }
}

impl std::fmt::Debug for MemeStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemeStream")
            .field("received", &self.received)
            .field("end", &self.end)
            .finish()
    }
}

/// Item count and end state of a consumed stream.
#[derive(Debug, Clone)]
pub struct StreamOutcome {
    pub received: usize,
    pub end: StreamEnd,
}

impl StreamOutcome {
    /// Applies `policy` and yields the count to report, or the error that
    /// ended the stream.
    pub fn resolve(self, policy: StreamPolicy) -> ClientResult<usize> {
        let err = match self.end {
            StreamEnd::Completed => return Ok(self.received),
            StreamEnd::Interrupted(err) => err,
        };

        let tolerate = match policy {
            StreamPolicy::Strict => false,
            StreamPolicy::Lenient => true,
            StreamPolicy::Tolerant => self.received > 0,
        };

        if tolerate {
            warn!(
                received = self.received,
                %policy,
                error = %err,
                "Meme stream ended early; reporting partial count"
            );
            Ok(self.received)
        } else {
            Err(err)
        }
    }
}
