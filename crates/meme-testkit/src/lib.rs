//! # meme-testkit: Loopback Meme Service
//!
//! An in-process `MemeService` for integration tests, served on an
//! ephemeral `127.0.0.1` port.
//!
//! ```text
//!   MockMemeService::new(memes)
//!        .with_behavior(..)
//!        .serve().await ──► MockServer { address, uploads }
//!                                 │
//!        tokio::spawn(Server::builder()
//!            .add_service(MemeServiceServer)
//!            .serve_with_incoming(TcpListenerStream))
//! ```
//!
//! The server task is aborted when the [`MockServer`] is dropped.

use std::future::pending;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use meme_client::proto::{
    meme_service_server::{MemeService, MemeServiceServer},
    CategoryRequest, Meme, MemeList, MemeRequest, MemeUpload, StreamRequest, UploadSummary,
};
use meme_client::ClientConfig;
use meme_core::MemeRecord;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_stream::{wrappers::ReceiverStream, Stream, StreamExt};
use tonic::transport::Server;
use tonic::{Code, Request, Response, Status, Streaming};
use tracing::{debug, warn};

/// How the mock answers calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MockBehavior {
    /// Answer every call from the seeded memes.
    #[default]
    Normal,

    /// Never answer. Uploads are still read to the end first.
    Stall,

    /// Fail every call with the given status code.
    Fail(Code),

    /// Stream this many items, then fail the stream with `INTERNAL`.
    FailStreamAfter(usize),

    /// Stream this many items, then keep the stream open without sending.
    StallStreamAfter(usize),

    /// Acknowledge uploads with this count instead of the number received.
    AckCount(i32),
}

/// Mock implementation of `MemeService`.
#[derive(Debug, Clone)]
pub struct MockMemeService {
    memes: Arc<Vec<Meme>>,
    behavior: MockBehavior,
    uploads: Arc<Mutex<Vec<MemeUpload>>>,
    next_random: Arc<AtomicUsize>,
}

impl MockMemeService {
    pub fn new(memes: Vec<MemeRecord>) -> Self {
        let memes = memes
            .into_iter()
            .map(|m| Meme {
                id: m.id,
                title: m.title,
                url: m.url,
                category: m.category,
            })
            .collect();

        MockMemeService {
            memes: Arc::new(memes),
            behavior: MockBehavior::Normal,
            uploads: Arc::new(Mutex::new(Vec::new())),
            next_random: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_behavior(mut self, behavior: MockBehavior) -> Self {
        self.behavior = behavior;
        self
    }

    /// Binds an ephemeral loopback port and serves until the returned
    /// [`MockServer`] is dropped.
    pub async fn serve(self) -> std::io::Result<MockServer> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let address = listener.local_addr()?.to_string();
        let uploads = self.uploads.clone();

        let handle = tokio::spawn(async move {
            if let Err(e) = Server::builder()
                .add_service(MemeServiceServer::new(self))
                .serve_with_incoming(tokio_stream::wrappers::TcpListenerStream::new(listener))
                .await
            {
                warn!(error = %e, "Mock meme server stopped");
            }
        });

        debug!(%address, "Mock meme server listening");

        Ok(MockServer {
            address,
            uploads,
            handle,
        })
    }

    fn matching(&self, category: &str) -> Vec<Meme> {
        self.memes
            .iter()
            .filter(|m| category.is_empty() || m.category == category)
            .cloned()
            .collect()
    }

    fn check_fail(&self) -> Result<(), Status> {
        match self.behavior {
            MockBehavior::Fail(code) => Err(Status::new(code, "mock failure")),
            _ => Ok(()),
        }
    }
}

/// A running mock server.
pub struct MockServer {
    address: String,
    uploads: Arc<Mutex<Vec<MemeUpload>>>,
    handle: JoinHandle<()>,
}

impl MockServer {
    /// `host:port` of the listening socket.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Client configuration pointed at this server with the given deadline.
    pub fn client_config(&self, timeout: Duration) -> ClientConfig {
        ClientConfig {
            address: self.address.clone(),
            timeout_secs: timeout.as_secs().max(1),
            ..ClientConfig::default()
        }
    }

    /// Every upload item received so far, in arrival order.
    pub fn uploads(&self) -> Vec<MemeUpload> {
        match self.uploads.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

type MemeStreamResult = Pin<Box<dyn Stream<Item = Result<Meme, Status>> + Send>>;

#[tonic::async_trait]
impl MemeService for MockMemeService {
    async fn get_random_meme(
        &self,
        request: Request<MemeRequest>,
    ) -> Result<Response<Meme>, Status> {
        if self.behavior == MockBehavior::Stall {
            return pending().await;
        }
        self.check_fail()?;

        let category = request.into_inner().category;
        let candidates = self.matching(&category);
        if candidates.is_empty() {
            return Err(Status::not_found(format!(
                "no memes in category {:?}",
                category
            )));
        }

        let index = self.next_random.fetch_add(1, Ordering::SeqCst) % candidates.len();
        Ok(Response::new(candidates[index].clone()))
    }

    async fn get_memes_by_category(
        &self,
        request: Request<CategoryRequest>,
    ) -> Result<Response<MemeList>, Status> {
        if self.behavior == MockBehavior::Stall {
            return pending().await;
        }
        self.check_fail()?;

        let memes = self.matching(&request.into_inner().category);
        Ok(Response::new(MemeList { memes }))
    }

    type StreamMemesStream = MemeStreamResult;

    async fn stream_memes(
        &self,
        request: Request<StreamRequest>,
    ) -> Result<Response<Self::StreamMemesStream>, Status> {
        if self.behavior == MockBehavior::Stall {
            return pending().await;
        }
        self.check_fail()?;

        let memes = self.matching(&request.into_inner().category);
        let behavior = self.behavior;
        let (tx, rx) = mpsc::channel(32);

        tokio::spawn(async move {
            let limit = match behavior {
                MockBehavior::FailStreamAfter(n) | MockBehavior::StallStreamAfter(n) => n,
                _ => usize::MAX,
            };

            for meme in memes.into_iter().take(limit) {
                if tx.send(Ok(meme)).await.is_err() {
                    return;
                }
            }

            match behavior {
                MockBehavior::FailStreamAfter(_) => {
                    let _ = tx.send(Err(Status::internal("stream interrupted"))).await;
                }
                MockBehavior::StallStreamAfter(_) => {
                    // Holding the sender keeps the stream open.
                    let _tx = tx;
                    pending::<()>().await;
                }
                _ => {}
            }
        });

        Ok(Response::new(Box::pin(ReceiverStream::new(rx))))
    }

    async fn upload_memes(
        &self,
        request: Request<Streaming<MemeUpload>>,
    ) -> Result<Response<UploadSummary>, Status> {
        self.check_fail()?;

        let mut stream = request.into_inner();
        let mut received: i32 = 0;

        while let Some(result) = stream.next().await {
            let upload = result?;
            received += 1;
            match self.uploads.lock() {
                Ok(mut guard) => guard.push(upload),
                Err(poisoned) => poisoned.into_inner().push(upload),
            }
        }

        if self.behavior == MockBehavior::Stall {
            return pending().await;
        }

        let count = match self.behavior {
            MockBehavior::AckCount(count) => count,
            _ => received,
        };

        Ok(Response::new(UploadSummary {
            count,
            message: format!("Uploaded {} memes", received),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meme(id: &str, category: &str) -> MemeRecord {
        MemeRecord {
            id: id.into(),
            title: format!("meme {}", id),
            url: format!("http://img/{}.png", id),
            category: category.into(),
        }
    }

    #[test]
    fn test_matching_treats_empty_category_as_all() {
        let service = MockMemeService::new(vec![meme("1", "funny"), meme("2", "cats")]);
        assert_eq!(service.matching("").len(), 2);
        assert_eq!(service.matching("cats").len(), 1);
        assert!(service.matching("dogs").is_empty());
    }

    #[tokio::test]
    async fn test_serve_binds_loopback() {
        let server = MockMemeService::new(vec![]).serve().await.unwrap();
        assert!(server.address().starts_with("127.0.0.1:"));
        assert!(server.uploads().is_empty());
    }
}
