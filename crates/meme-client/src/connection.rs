//! # Transport Connector
//!
//! Owns the single logical channel to the meme service.
//!
//! ## Lifecycle
//! ```text
//!   Connection::open_within(&config, &deadline)
//!        │  lazy:  Endpoint::connect_lazy()   (no I/O yet)
//!        │  eager: Endpoint::connect()        (bounded by connect_timeout
//!        │                                     and the invocation deadline)
//!        ▼
//!   ┌──────────┐   channel()    ┌────────────┐
//!   │   Open   │ ─────────────► │ MemeClient │  (read-only use)
//!   └────┬─────┘                └────────────┘
//!        │ close() / Drop
//!        ▼
//!   ┌──────────┐
//!   │  Closed  │  further close() calls are no-ops
//!   └──────────┘
//! ```
//!
//! Release happens exactly once, either through [`Connection::close`] or
//! when the value is dropped on an early return or unwind.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;
use tonic::transport::{Channel, Endpoint};
use tracing::{debug, info};

use crate::client::Operation;
use crate::config::{ClientConfig, ConnectMode};
use crate::deadline::Deadline;
use crate::error::{ClientError, ClientResult};

/// Observes how many times a [`Connection`] has been released.
///
/// Stays valid after the connection itself is gone.
#[derive(Debug, Clone, Default)]
pub struct ReleaseHandle(Arc<AtomicUsize>);

impl ReleaseHandle {
    pub fn release_count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }

    pub fn is_released(&self) -> bool {
        self.release_count() > 0
    }
}

/// One logical plaintext channel to the service endpoint.
pub struct Connection {
    address: String,
    channel: Option<Channel>,
    release: ReleaseHandle,
}

impl Connection {
    /// Opens a connection with a fresh deadline of `config.timeout()`.
    pub async fn open(config: &ClientConfig) -> ClientResult<Self> {
        Self::open_within(config, &Deadline::after(config.timeout())).await
    }

    /// Opens a connection according to `config.connect_mode`.
    ///
    /// An eager dial gets the smaller of `connect_timeout` and the time left
    /// on `deadline`.
    ///
    /// ## Errors
    /// - [`ClientError::Connect`] for a malformed address, or an unreachable
    ///   endpoint in eager mode
    /// - [`ClientError::Timeout`] when an eager dial runs out of time
    pub async fn open_within(config: &ClientConfig, deadline: &Deadline) -> ClientResult<Self> {
        let uri = endpoint_uri(&config.address)?;
        let endpoint = Endpoint::from_shared(uri)
            .map_err(|e| {
                ClientError::Connect(format!("Invalid endpoint '{}': {}", config.address, e))
            })?
            .connect_timeout(config.connect_timeout());

        let channel = match config.connect_mode {
            ConnectMode::Lazy => endpoint.connect_lazy(),
            ConnectMode::Eager => {
                let budget = dial_budget(config.connect_timeout(), deadline);
                debug!(
                    address = %config.address,
                    budget_ms = budget.as_millis() as u64,
                    "Dialing meme service"
                );
                match timeout(budget, endpoint.connect()).await {
                    Ok(Ok(channel)) => channel,
                    Ok(Err(e)) => {
                        return Err(ClientError::Connect(format!(
                            "Failed to connect to {}: {}",
                            config.address, e
                        )))
                    }
                    Err(_) => {
                        return Err(ClientError::Timeout {
                            operation: Operation::Connect,
                            budget_ms: budget.as_millis() as u64,
                        })
                    }
                }
            }
        };

        info!(address = %config.address, mode = %config.connect_mode, "Connection opened");

        Ok(Connection {
            address: config.address.clone(),
            channel: Some(channel),
            release: ReleaseHandle::default(),
        })
    }

    /// The address this connection was opened for.
    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn is_open(&self) -> bool {
        self.channel.is_some()
    }

    /// A handle that outlives the connection and reports its release.
    pub fn release_handle(&self) -> ReleaseHandle {
        self.release.clone()
    }

    /// Returns a handle to the underlying channel.
    pub(crate) fn channel(&self) -> ClientResult<Channel> {
        self.channel
            .clone()
            .ok_or_else(|| ClientError::Connect("connection closed".to_string()))
    }

    /// Releases the channel.
    ///
    /// Idempotent: returns `true` only for the call that released it.
    pub fn close(&mut self) -> bool {
        match self.channel.take() {
            Some(_channel) => {
                self.release.0.fetch_add(1, Ordering::SeqCst);
                info!(address = %self.address, "Connection closed");
                true
            }
            None => false,
        }
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        self.close();
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("address", &self.address)
            .field("open", &self.is_open())
            .finish()
    }
}

/// Time allowed for an eager dial.
fn dial_budget(connect_timeout: Duration, deadline: &Deadline) -> Duration {
    connect_timeout.min(deadline.remaining())
}

/// Turns `host:port` into a URI tonic accepts; explicit schemes are kept.
fn endpoint_uri(address: &str) -> ClientResult<String> {
    let address = address.trim();
    if address.is_empty() {
        return Err(ClientError::Connect("address must not be empty".to_string()));
    }

    if address.contains("://") {
        Ok(address.to_string())
    } else {
        Ok(format!("http://{}", address))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_for(address: &str) -> ClientConfig {
        ClientConfig {
            address: address.to_string(),
            ..ClientConfig::default()
        }
    }

    #[test]
    fn test_endpoint_uri() {
        assert_eq!(endpoint_uri("localhost:50051").unwrap(), "http://localhost:50051");
        assert_eq!(endpoint_uri("http://10.0.0.1:1").unwrap(), "http://10.0.0.1:1");
        assert!(endpoint_uri("   ").is_err());
    }

    #[tokio::test]
    async fn test_lazy_open_does_not_dial() {
        // Nothing listens on port 1; lazy open must still succeed.
        let connection = Connection::open(&config_for("127.0.0.1:1")).await.unwrap();
        assert!(connection.is_open());
        assert_eq!(connection.address(), "127.0.0.1:1");
    }

    #[tokio::test]
    async fn test_malformed_address_is_connect_error() {
        let err = Connection::open(&config_for("not a valid host:xx")).await.unwrap_err();
        assert!(err.is_connect());
    }

    #[tokio::test]
    async fn test_eager_open_to_closed_port_fails() {
        let mut config = config_for("127.0.0.1:1");
        config.connect_mode = ConnectMode::Eager;
        let err = Connection::open(&config).await.unwrap_err();
        assert!(err.is_connect() || err.is_timeout());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dial_budget_respects_deadline() {
        let deadline = Deadline::after(Duration::from_secs(2));
        assert_eq!(dial_budget(Duration::from_secs(5), &deadline), Duration::from_secs(2));
        assert_eq!(dial_budget(Duration::from_secs(1), &deadline), Duration::from_secs(1));

        tokio::time::advance(Duration::from_secs(3)).await;
        assert_eq!(dial_budget(Duration::from_secs(5), &deadline), Duration::ZERO);
    }

    #[tokio::test]
    async fn test_eager_open_with_spent_deadline_fails() {
        let mut config = config_for("127.0.0.1:1");
        config.connect_mode = ConnectMode::Eager;
        let deadline = Deadline::after(Duration::ZERO);

        let err = Connection::open_within(&config, &deadline).await.unwrap_err();
        assert!(err.is_timeout() || err.is_connect());
    }

    #[tokio::test]
    async fn test_close_is_idempotent() {
        let mut connection = Connection::open(&config_for("127.0.0.1:1")).await.unwrap();
        let release = connection.release_handle();

        assert!(connection.close());
        assert!(!connection.close());
        assert!(!connection.is_open());
        assert!(connection.channel().unwrap_err().is_connect());

        drop(connection);
        assert_eq!(release.release_count(), 1);
    }

    #[tokio::test]
    async fn test_drop_releases_once() {
        let connection = Connection::open(&config_for("127.0.0.1:1")).await.unwrap();
        let release = connection.release_handle();
        assert!(!release.is_released());

        drop(connection);
        assert_eq!(release.release_count(), 1);
    }
}
