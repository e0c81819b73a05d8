//! # meme-cli
//!
//! Library half of the `meme` binary: argument parsing, the interaction
//! driver, output rendering and logging setup. `main.rs` only wires these
//! together and picks the exit status.
//!
//! ## Module Organization
//! - [`cli`] - clap command surface and config resolution
//! - [`driver`] - one operation per invocation, connection scoped to it
//! - [`render`] - output line formats

pub mod cli;
pub mod driver;
pub mod render;

pub use cli::{Cli, Command};
pub use driver::{run, run_on, DriverError, DriverResult, Invocation};

use tracing_subscriber::EnvFilter;

/// Initializes logging on stderr.
///
/// `RUST_LOG` takes precedence; otherwise `verbosity` selects
/// `warn` (0), `info` (1) or `debug` (2+).
pub fn init_tracing(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
