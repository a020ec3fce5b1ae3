//! Application catalog feed client
//!
//! This module fetches the upstream application feed and maps its entries into
//! the local `AppSummary` shape.

use std::future::Future;
use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use thiserror::Error;

use super::AppSummary;

/// Default URL of the upstream application feed
pub const DEFAULT_FEED_URL: &str = "https://assets.ca.unraid.net/feed/applicationFeed.json";

/// Default timeout for a single feed request
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors that can occur when fetching the feed
#[derive(Debug, Error)]
pub enum FeedError {
    /// HTTP client could not be constructed
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    /// HTTP request or body read failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Upstream answered with a non-success status
    #[error("Feed returned HTTP status {0}")]
    Status(StatusCode),

    /// Failed to parse JSON response
    #[error("Failed to parse JSON response: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// Something that can produce the full list of app summaries
///
/// Implemented by `FeedClient` for the real upstream, and by fakes in tests.
pub trait FeedSource: Send + Sync {
    /// Fetch and map the whole feed in upstream order
    fn fetch(&self) -> impl Future<Output = Result<Vec<AppSummary>, FeedError>> + Send;
}

/// Client for fetching the application catalog feed
#[derive(Debug, Clone)]
pub struct FeedClient {
    client: Client,
    url: String,
}

impl FeedClient {
    /// Create a new FeedClient for the default feed URL and timeout
    pub fn new() -> Result<Self, FeedError> {
        Self::with_url(DEFAULT_FEED_URL, DEFAULT_TIMEOUT)
    }

    /// Create a new FeedClient for a custom URL and request timeout
    pub fn with_url(url: impl Into<String>, timeout: Duration) -> Result<Self, FeedError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(FeedError::ClientBuild)?;
        Ok(Self::with_client(client, url))
    }

    /// Create a new FeedClient with a custom HTTP client
    pub fn with_client(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    /// The URL this client fetches
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch the feed and map it into app summaries
    ///
    /// # Returns
    /// * `Ok(Vec<AppSummary>)` - All entries, in upstream order
    /// * `Err(FeedError)` - If the request, status check, body read or parsing fails
    pub async fn fetch_summaries(&self) -> Result<Vec<AppSummary>, FeedError> {
        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status(status));
        }

        let text = response.text().await?;
        parse_feed(&text)
    }
}

impl FeedSource for FeedClient {
    fn fetch(&self) -> impl Future<Output = Result<Vec<AppSummary>, FeedError>> + Send {
        self.fetch_summaries()
    }
}

/// Parse a raw feed document into app summaries
///
/// Decoding is all-or-nothing: one malformed entry fails the whole document.
pub fn parse_feed(body: &str) -> Result<Vec<AppSummary>, FeedError> {
    let feed: CatalogFeed = serde_json::from_str(body)?;
    Ok(feed.applist.into_iter().map(AppSummary::from).collect())
}

impl From<CatalogEntry> for AppSummary {
    fn from(entry: CatalogEntry) -> Self {
        Self {
            name: entry.name.unwrap_or_default(),
            description: entry.overview.unwrap_or_default(),
            repository: entry.repository.unwrap_or_default(),
            icon: entry.icon.filter(|icon| !icon.trim().is_empty()),
        }
    }
}

/// Upstream feed document
#[derive(Debug, Deserialize)]
struct CatalogFeed {
    #[serde(default)]
    applist: Vec<CatalogEntry>,
}

/// One application entry in the upstream feed
///
/// Text fields are optional so that `null` and absent keys both decode as empty.
#[derive(Debug, Deserialize)]
struct CatalogEntry {
    #[serde(rename = "Name", default)]
    name: Option<String>,
    #[serde(rename = "Overview", default)]
    overview: Option<String>,
    #[serde(rename = "Repository", default)]
    repository: Option<String>,
    #[serde(rename = "Icon", default)]
    icon: Option<String>,
}
