//! # Client Configuration
//!
//! Configuration management for the meme client.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Command-line flags (highest priority, applied by the CLI)          │
//! │     --addr localhost:50051 --timeout-secs 5                            │
//! │                                                                         │
//! │  2. Environment Variables                                              │
//! │     MEME_ADDR=memes.internal:50051                                     │
//! │     MEME_TIMEOUT_SECS=10                                               │
//! │                                                                         │
//! │  3. TOML Config File                                                   │
//! │     --config PATH, or ~/.config/meme-client/client.toml (Linux)        │
//! │                                                                         │
//! │  4. Default Values (lowest priority)                                   │
//! │     localhost:50051, 5s deadline, lazy connect, tolerant streams       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # client.toml
//! address = "localhost:50051"
//! timeout_secs = 5
//! connect_timeout_secs = 5
//! connect_mode = "lazy"        # lazy | eager
//! stream_policy = "tolerant"   # tolerant | lenient | strict
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{ClientError, ClientResult};

/// Default service address.
pub const DEFAULT_ADDRESS: &str = "localhost:50051";

/// Upper bound for `timeout_secs` and `connect_timeout_secs` (one day).
pub const MAX_TIMEOUT_SECS: u64 = 86_400;

// =============================================================================
// Connect Mode
// =============================================================================

/// When the transport connector dials the endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectMode {
    /// No network I/O until the first RPC; reachability errors surface there.
    #[default]
    Lazy,

    /// Dial immediately, bounded by `connect_timeout_secs`.
    Eager,
}

impl std::fmt::Display for ConnectMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConnectMode::Lazy => write!(f, "lazy"),
            ConnectMode::Eager => write!(f, "eager"),
        }
    }
}

impl std::str::FromStr for ConnectMode {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lazy" => Ok(ConnectMode::Lazy),
            "eager" => Ok(ConnectMode::Eager),
            other => Err(ClientError::Config(format!(
                "Unknown connect mode: '{}'. Valid options: lazy, eager",
                other
            ))),
        }
    }
}

// =============================================================================
// Stream Policy
// =============================================================================

/// How a receive failure on `StreamMemes` is reported.
///
/// ```text
/// ┌───────────┬─────────────────────┬─────────────────────────────────┐
/// │ Policy    │ fails before items  │ fails after ≥1 item             │
/// ├───────────┼─────────────────────┼─────────────────────────────────┤
/// │ tolerant  │ error               │ warn, success with count so far │
/// │ lenient   │ success, 0 items    │ warn, success with count so far │
/// │ strict    │ error               │ error                           │
/// └───────────┴─────────────────────┴─────────────────────────────────┘
/// ```
/// A clean end-of-stream is always a success.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamPolicy {
    #[default]
    Tolerant,
    Lenient,
    Strict,
}

impl std::fmt::Display for StreamPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StreamPolicy::Tolerant => write!(f, "tolerant"),
            StreamPolicy::Lenient => write!(f, "lenient"),
            StreamPolicy::Strict => write!(f, "strict"),
        }
    }
}

impl std::str::FromStr for StreamPolicy {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tolerant" => Ok(StreamPolicy::Tolerant),
            "lenient" => Ok(StreamPolicy::Lenient),
            "strict" => Ok(StreamPolicy::Strict),
            other => Err(ClientError::Config(format!(
                "Unknown stream policy: '{}'. Valid options: tolerant, lenient, strict",
                other
            ))),
        }
    }
}

// =============================================================================
// Client Configuration
// =============================================================================

/// Complete client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Service endpoint, `host:port` (an `http://` scheme is added if absent).
    pub address: String,

    /// Budget for the whole invocation, in seconds.
    pub timeout_secs: u64,

    /// Budget for an eager dial, in seconds.
    pub connect_timeout_secs: u64,

    /// When to dial the endpoint.
    pub connect_mode: ConnectMode,

    /// How stream receive failures are reported.
    pub stream_policy: StreamPolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            address: DEFAULT_ADDRESS.to_string(),
            timeout_secs: 5,
            connect_timeout_secs: 5,
            connect_mode: ConnectMode::default(),
            stream_policy: StreamPolicy::default(),
        }
    }
}

impl ClientConfig {
    /// Loads configuration from file, then applies environment overrides.
    ///
    /// An explicit `config_path` must be readable. Without one, the platform
    /// default file is used when it exists and defaults otherwise.
    pub fn load(config_path: Option<PathBuf>) -> ClientResult<Self> {
        Self::load_with(config_path, |key| std::env::var(key).ok())
    }

    /// Like [`load`](Self::load), reading overrides from `lookup` instead of
    /// the process environment.
    pub fn load_with(
        config_path: Option<PathBuf>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> ClientResult<Self> {
        let mut config = match config_path {
            Some(path) => Self::from_file(&path)?,
            None => match Self::default_config_path().filter(|p| p.exists()) {
                Some(path) => Self::from_file(&path)?,
                None => {
                    debug!("No client config file, using defaults");
                    Self::default()
                }
            },
        };

        config.apply_overrides(lookup);
        config.validate()?;
        Ok(config)
    }

    /// Parses a TOML document. Missing keys keep their defaults.
    pub fn from_toml_str(contents: &str) -> ClientResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    fn from_file(path: &Path) -> ClientResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            ClientError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let config = Self::from_toml_str(&contents)?;
        debug!(?path, "Client config loaded");
        Ok(config)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ClientResult<()> {
        if self.address.trim().is_empty() {
            return Err(ClientError::Config("address must not be empty".into()));
        }

        if self.timeout_secs == 0 || self.timeout_secs > MAX_TIMEOUT_SECS {
            return Err(ClientError::Config(format!(
                "timeout_secs must be between 1 and {}",
                MAX_TIMEOUT_SECS
            )));
        }

        if self.connect_timeout_secs == 0 || self.connect_timeout_secs > MAX_TIMEOUT_SECS {
            return Err(ClientError::Config(format!(
                "connect_timeout_secs must be between 1 and {}",
                MAX_TIMEOUT_SECS
            )));
        }

        Ok(())
    }

    /// Applies overrides from `lookup`, keyed by environment variable name.
    ///
    /// Unparseable values are ignored with a warning.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(address) = lookup("MEME_ADDR") {
            debug!(address = %address, "Overriding address from environment");
            self.address = address;
        }

        if let Some(secs) = lookup("MEME_TIMEOUT_SECS") {
            match secs.parse::<u64>() {
                Ok(s) => self.timeout_secs = s,
                Err(_) => warn!(value = %secs, "Ignoring invalid MEME_TIMEOUT_SECS"),
            }
        }

        if let Some(mode) = lookup("MEME_CONNECT_MODE") {
            match mode.parse() {
                Ok(m) => self.connect_mode = m,
                Err(e) => warn!(error = %e, "Ignoring invalid MEME_CONNECT_MODE"),
            }
        }

        if let Some(policy) = lookup("MEME_STREAM_POLICY") {
            match policy.parse() {
                Ok(p) => self.stream_policy = p,
                Err(e) => warn!(error = %e, "Ignoring invalid MEME_STREAM_POLICY"),
            }
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("dev", "memes", "meme-client")
            .map(|dirs| dirs.config_dir().join("client.toml"))
    }

    /// The invocation deadline budget.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// The eager dial budget.
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}
