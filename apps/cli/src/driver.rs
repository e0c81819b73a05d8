//! # Interaction Driver
//!
//! Runs exactly one facade operation per invocation and renders the result.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  run(invocation, config, out)                                           │
//! │                                                                         │
//! │   1. Deadline::after(config.timeout())                                  │
//! │   2. Connection::open_within(config, &deadline)                         │
//! │   3. run_on(connection, ..)                                             │
//! │        ├─ Random  ─► get_random          ─► "Random meme: …"            │
//! │        ├─ List    ─► list_by_category    ─► "N) …" + "Listed N memes"   │
//! │        ├─ Stream  ─► stream_by_category  ─► "N) …" + "Stream completed…"│
//! │        └─ Upload  ─► batch::build + upload_batch ─► "Uploaded N memes…" │
//! │   4. connection.close()  (on every path)                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Errors are returned, never turned into an exit here.

use std::io::Write;

use meme_client::{
    build_batch, BatchSource, ClientConfig, ClientError, Connection, Deadline, MemeClient,
    StreamPolicy,
};
use meme_core::CategoryFilter;
use thiserror::Error;
use tracing::{debug, info};

use crate::render;

/// One requested operation, resolved from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    Random(CategoryFilter),
    List(CategoryFilter),
    Stream(CategoryFilter),
    Upload(BatchSource),
}

impl Invocation {
    fn name(&self) -> &'static str {
        match self {
            Invocation::Random(_) => "random",
            Invocation::List(_) => "list",
            Invocation::Stream(_) => "stream",
            Invocation::Upload(_) => "upload",
        }
    }
}

/// Result type alias for driver operations.
pub type DriverResult<T> = Result<T, DriverError>;

#[derive(Debug, Error)]
pub enum DriverError {
    #[error(transparent)]
    Client(#[from] ClientError),

    /// Writing to the output sink failed.
    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

/// Opens a connection for `config` and runs `invocation` on it.
pub async fn run<W: Write>(
    invocation: Invocation,
    config: &ClientConfig,
    out: &mut W,
) -> DriverResult<()> {
    let deadline = Deadline::after(config.timeout());
    let connection = Connection::open_within(config, &deadline).await?;

    run_on(connection, invocation, config.stream_policy, &deadline, out).await
}

/// Runs `invocation` on an already open connection, then releases it.
pub async fn run_on<W: Write>(
    mut connection: Connection,
    invocation: Invocation,
    policy: StreamPolicy,
    deadline: &Deadline,
    out: &mut W,
) -> DriverResult<()> {
    let command = invocation.name();
    debug!(command, address = %connection.address(), "Running command");

    let result = execute(&connection, invocation, policy, deadline, out).await;
    connection.close();

    if result.is_ok() {
        info!(command, "Command completed");
    }
    result
}

async fn execute<W: Write>(
    connection: &Connection,
    invocation: Invocation,
    policy: StreamPolicy,
    deadline: &Deadline,
    out: &mut W,
) -> DriverResult<()> {
    let client = MemeClient::new(connection);

    match invocation {
        Invocation::Random(filter) => {
            let meme = client.get_random(&filter, deadline).await?;
            writeln!(out, "{}", render::random_line(&meme))?;
        }
        Invocation::List(filter) => {
            let memes = client.list_by_category(&filter, deadline).await?;
            for (index, meme) in memes.iter().enumerate() {
                writeln!(out, "{}", render::indexed_line(index + 1, meme))?;
            }
            writeln!(out, "{}", render::list_footer(memes.len()))?;
        }
        Invocation::Stream(filter) => {
            let mut stream = client.stream_by_category(&filter, deadline).await?;
            while let Some(meme) = stream.next().await {
                writeln!(out, "{}", render::indexed_line(stream.received(), &meme))?;
            }
            let count = stream.into_outcome().resolve(policy)?;
            writeln!(out, "{}", render::stream_footer(count))?;
        }
        Invocation::Upload(source) => {
            let records = build_batch(&source)?;
            let summary = client.upload_batch(records, deadline).await?;
            writeln!(out, "{}", render::upload_line(&summary))?;
        }
    }

    out.flush()?;
    Ok(())
}
