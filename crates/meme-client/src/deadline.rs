//! # Invocation Deadline
//!
//! A single time budget created once per invocation and passed explicitly
//! into every facade call.
//!
//! ```text
//!  Deadline::after(5s)
//!        │
//!        ├──► get_random ─────► await response        ┐
//!        ├──► stream_by_cat ──► await headers, items  ├─ timeout_at(expires_at)
//!        └──► upload_batch ───► await summary         ┘
//! ```
//!
//! Each suspension point is wrapped with [`tokio::time::timeout_at`] and the
//! remaining budget is forwarded to the server as the gRPC timeout.

use std::future::Future;
use std::time::Duration;

use tokio::time::{timeout_at, Instant};

use crate::client::Operation;
use crate::error::{ClientError, ClientResult};

/// Default per-invocation budget.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Expiry used when `now + budget` does not fit in an `Instant` (about 30 years).
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// Absolute expiry shared by every operation of one invocation.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    expires_at: Instant,
    budget: Duration,
}

impl Deadline {
    /// Starts a deadline that expires `budget` from now.
    ///
    /// A budget too large to represent is clamped to a far-future expiry.
    pub fn after(budget: Duration) -> Self {
        let now = Instant::now();
        let expires_at = now
            .checked_add(budget)
            .unwrap_or_else(|| now + FAR_FUTURE);

        Deadline { expires_at, budget }
    }

    /// The full budget this deadline was created with.
    pub fn budget(&self) -> Duration {
        self.budget
    }

    /// Time left before expiry, zero once expired.
    pub fn remaining(&self) -> Duration {
        self.expires_at.saturating_duration_since(Instant::now())
    }

    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }

    /// Builds a request whose gRPC timeout is the remaining budget.
    pub fn request<T>(&self, message: T) -> tonic::Request<T> {
        let mut request = tonic::Request::new(message);
        request.set_timeout(self.remaining());
        request
    }

    /// The error reported when `operation` runs out of time.
    pub fn expired(&self, operation: Operation) -> ClientError {
        ClientError::Timeout {
            operation,
            budget_ms: self.budget.as_millis() as u64,
        }
    }

    /// Awaits `future` until the deadline.
    ///
    /// Expiry yields [`ClientError::Timeout`]; a server-side
    /// `DEADLINE_EXCEEDED` surfaced by `future` is reported the same way.
    pub async fn run<F, T>(&self, operation: Operation, future: F) -> ClientResult<T>
    where
        F: Future<Output = ClientResult<T>>,
    {
        match timeout_at(self.expires_at, future).await {
            Ok(Err(ClientError::Timeout { operation, .. })) => Err(self.expired(operation)),
            Ok(result) => result,
            Err(_) => Err(self.expired(operation)),
        }
    }
}

impl Default for Deadline {
    fn default() -> Self {
        Deadline::after(DEFAULT_TIMEOUT)
    }
}
