//! # meme
//!
//! Command-line client for the meme service.
//!
//! ```bash
//! meme random --category funny
//! meme list -c cats
//! meme stream
//! meme upload --file memes.json
//! meme upload --title "Doge" --url http://img/doge.png --category animals
//! ```
//!
//! Usage errors exit with status 2, runtime errors with status 1.

use std::process::ExitCode;

use clap::Parser;
use meme_cli::{init_tracing, run, Cli};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match cli.client_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut stdout = std::io::stdout().lock();
    match run(cli.into_invocation(), &config, &mut stdout).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
