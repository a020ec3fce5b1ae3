//! Command-line interface parsing for the catalog backend
//!
//! This module handles parsing of CLI arguments using clap and turns them into
//! a validated `StartupConfig`.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use reqwest::Url;
use thiserror::Error;

use crate::cache::DEFAULT_TTL_SECS;
use crate::data::DEFAULT_FEED_URL;

/// Default Unix domain socket path
pub const DEFAULT_SOCKET_PATH: &str = "/run/guest-services/backend.sock";

/// Default timeout for one upstream feed request, in seconds
pub const DEFAULT_TIMEOUT_SECS: u32 = 30;

/// Error types for CLI argument validation
#[derive(Debug, Error)]
pub enum CliError {
    /// The socket path is empty
    #[error("Socket path must not be empty")]
    EmptySocketPath,

    /// The feed URL cannot be parsed or is not http(s)
    #[error("Invalid feed URL: '{0}'. Expected an http:// or https:// URL")]
    InvalidFeedUrl(String),

    /// The request timeout is zero
    #[error("Request timeout must be at least 1 second")]
    ZeroTimeout,
}

/// Catalog backend - serves a cached application feed over a Unix socket
#[derive(Parser, Debug)]
#[command(name = "catalog-backend")]
#[command(about = "Serve a cached application catalog feed over a Unix domain socket")]
#[command(version)]
pub struct Cli {
    /// Unix domain socket to listen on (a stale file at this path is removed)
    #[arg(long, value_name = "PATH", default_value = DEFAULT_SOCKET_PATH)]
    pub socket: PathBuf,

    /// URL of the upstream application feed
    #[arg(long, value_name = "URL", default_value = DEFAULT_FEED_URL)]
    pub feed_url: String,

    /// How long a fetched feed is served before it is refreshed
    #[arg(long, value_name = "SECONDS", default_value_t = DEFAULT_TTL_SECS as u32)]
    pub cache_ttl_secs: u32,

    /// Timeout for a single upstream feed request
    #[arg(long, value_name = "SECONDS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u32,
}

/// Configuration derived from CLI arguments for application startup
#[derive(Debug, Clone)]
pub struct StartupConfig {
    /// Where to bind the Unix domain socket
    pub socket_path: PathBuf,
    /// Upstream feed URL
    pub feed_url: String,
    /// Freshness window for the app cache
    pub cache_ttl: Duration,
    /// Timeout for one upstream request
    pub request_timeout: Duration,
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            socket_path: PathBuf::from(DEFAULT_SOCKET_PATH),
            feed_url: DEFAULT_FEED_URL.to_string(),
            cache_ttl: Duration::from_secs(DEFAULT_TTL_SECS),
            request_timeout: Duration::from_secs(u64::from(DEFAULT_TIMEOUT_SECS)),
        }
    }
}

/// Checks that a feed URL parses and uses http or https.
///
/// # Returns
/// * `Ok(())` if the URL is usable
/// * `Err(CliError::InvalidFeedUrl)` otherwise
pub fn validate_feed_url(url: &str) -> Result<(), CliError> {
    match Url::parse(url) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(()),
        _ => Err(CliError::InvalidFeedUrl(url.to_string())),
    }
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments.
    ///
    /// # Arguments
    /// * `cli` - The parsed CLI struct
    ///
    /// # Returns
    /// * `Ok(StartupConfig)` with validated settings
    /// * `Err(CliError)` if any argument is unusable
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        if cli.socket.as_os_str().is_empty() {
            return Err(CliError::EmptySocketPath);
        }
        validate_feed_url(&cli.feed_url)?;
        if cli.timeout_secs == 0 {
            return Err(CliError::ZeroTimeout);
        }

        Ok(StartupConfig {
            socket_path: cli.socket.clone(),
            feed_url: cli.feed_url.clone(),
            cache_ttl: Duration::from_secs(u64::from(cli.cache_ttl_secs)),
            request_timeout: Duration::from_secs(u64::from(cli.timeout_secs)),
        })
    }
}
