//! # Command Surface
//!
//! ```text
//! meme [--addr host:port] [--timeout-secs N] [--config PATH] [-v]... <COMMAND>
//!
//!   random  [-c CATEGORY]
//!   list    [-c CATEGORY]
//!   stream  [-c CATEGORY]
//!   upload  (-f FILE | --title T --url U [-c CATEGORY])
//! ```
//!
//! Flags override the environment and the config file; see
//! [`meme_client::config`] for the full precedence order.

use std::path::PathBuf;

use clap::{ArgAction, ArgGroup, Args, Parser, Subcommand};
use meme_client::{BatchSource, ClientConfig, ClientResult};
use meme_core::CategoryFilter;

use crate::driver::Invocation;

#[derive(Debug, Parser)]
#[command(name = "meme", version)]
#[command(about = "Command-line client for the meme service", long_about = None)]
pub struct Cli {
    /// Service address, host:port [default: localhost:50051]
    #[arg(long, global = true, value_name = "HOST:PORT")]
    pub addr: Option<String>,

    /// Deadline for the whole invocation, in seconds [default: 5]
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout_secs: Option<u64>,

    /// Client config file (TOML)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch one random meme
    Random(CategoryArgs),

    /// List memes in a category
    List(CategoryArgs),

    /// Stream memes in a category until the server stops sending
    Stream(CategoryArgs),

    /// Upload memes from a JSON file or a single meme from flags
    Upload(UploadArgs),
}

#[derive(Debug, Args)]
pub struct CategoryArgs {
    /// Category filter; empty matches every category
    #[arg(short, long, default_value = "")]
    pub category: String,
}

#[derive(Debug, Args)]
#[command(group(ArgGroup::new("source").required(true).args(["file", "title"])))]
pub struct UploadArgs {
    /// JSON file with an array of {title, url, category} objects
    #[arg(short, long, value_name = "PATH", conflicts_with = "category")]
    pub file: Option<PathBuf>,

    /// Title for a single upload
    #[arg(long, requires = "url")]
    pub title: Option<String>,

    /// URL for a single upload
    #[arg(long, requires = "title")]
    pub url: Option<String>,

    /// Category for a single upload
    #[arg(short, long)]
    pub category: Option<String>,
}

impl Cli {
    /// Resolves the client configuration, applying flag overrides last.
    pub fn client_config(&self) -> ClientResult<ClientConfig> {
        self.client_config_with(|key| std::env::var(key).ok())
    }

    /// Like [`client_config`](Self::client_config), reading environment
    /// overrides from `lookup`.
    pub fn client_config_with(
        &self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> ClientResult<ClientConfig> {
        let mut config = ClientConfig::load_with(self.config.clone(), lookup)?;

        if let Some(addr) = &self.addr {
            config.address = addr.clone();
        }
        if let Some(secs) = self.timeout_secs {
            config.timeout_secs = secs;
        }

        config.validate()?;
        Ok(config)
    }

    /// The operation this command line asks for.
    pub fn into_invocation(self) -> Invocation {
        match self.command {
            Command::Random(args) => Invocation::Random(CategoryFilter::new(args.category)),
            Command::List(args) => Invocation::List(CategoryFilter::new(args.category)),
            Command::Stream(args) => Invocation::Stream(CategoryFilter::new(args.category)),
            Command::Upload(args) => Invocation::Upload(args.into_source()),
        }
    }
}

impl UploadArgs {
    fn into_source(self) -> BatchSource {
        match self.file {
            Some(path) => BatchSource::File(path),
            None => BatchSource::Inline {
                title: self.title.unwrap_or_default(),
                url: self.url.unwrap_or_default(),
                category: self.category.unwrap_or_default(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("meme").chain(args.iter().copied()))
    }

    #[test]
    fn test_command_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_category_defaults_to_all() {
        let cli = parse(&["list"]).unwrap();
        match cli.into_invocation() {
            Invocation::List(filter) => assert!(filter.is_all()),
            other => panic!("unexpected invocation {other:?}"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = parse(&["stream", "-c", "funny", "--addr", "memes:9000", "-vv"]).unwrap();
        assert_eq!(cli.addr.as_deref(), Some("memes:9000"));
        assert_eq!(cli.verbose, 2);
        match cli.into_invocation() {
            Invocation::Stream(filter) => assert_eq!(filter.as_str(), "funny"),
            other => panic!("unexpected invocation {other:?}"),
        }
    }

    #[test]
    fn test_upload_sources() {
        let cli = parse(&["upload", "--file", "memes.json"]).unwrap();
        assert_eq!(
            cli.into_invocation(),
            Invocation::Upload(BatchSource::File(PathBuf::from("memes.json")))
        );

        let cli = parse(&["upload", "--title", "Doge", "--url", "http://img/doge.png"]).unwrap();
        assert_eq!(
            cli.into_invocation(),
            Invocation::Upload(BatchSource::Inline {
                title: "Doge".into(),
                url: "http://img/doge.png".into(),
                category: String::new(),
            })
        );
    }

    #[test]
    fn test_upload_usage_errors() {
        let err = parse(&["upload"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);

        let err = parse(&["upload", "--title", "Doge"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);

        let err = parse(&["upload", "--file", "a.json", "--title", "t", "--url", "u"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArgumentConflict);
    }

    fn config_file(contents: &str) -> tempfile::NamedTempFile {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_flags_override_file_and_environment() {
        let file = config_file("address = \"file-host:1\"\ntimeout_secs = 3\nstream_policy = \"strict\"\n");
        let path = file.path().to_str().unwrap();
        let env = |key: &str| match key {
            "MEME_ADDR" => Some("env-host:2".to_string()),
            "MEME_TIMEOUT_SECS" => Some("4".to_string()),
            _ => None,
        };

        let cli = parse(&["--config", path, "random"]).unwrap();
        let config = cli.client_config_with(env).unwrap();
        assert_eq!(config.address, "env-host:2");
        assert_eq!(config.timeout_secs, 4);
        assert_eq!(config.stream_policy, meme_client::StreamPolicy::Strict);

        let cli = parse(&[
            "--config", path, "--addr", "10.0.0.2:7000", "--timeout-secs", "9", "random",
        ])
        .unwrap();
        let config = cli.client_config_with(env).unwrap();
        assert_eq!(config.address, "10.0.0.2:7000");
        assert_eq!(config.timeout_secs, 9);
    }

    #[test]
    fn test_out_of_range_timeout_flag_is_config_error() {
        let file = config_file("");
        let path = file.path().to_str().unwrap();

        for secs in ["0", "18446744073709551615"] {
            let cli = parse(&["--config", path, "--timeout-secs", secs, "random"]).unwrap();
            let err = cli.client_config_with(|_| None).unwrap_err();
            assert!(matches!(err, meme_client::ClientError::Config(_)), "{secs}: {err:?}");
        }
    }
}
