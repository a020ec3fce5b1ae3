//! Time-based cache in front of the application feed
//!
//! Provides a `CacheGate` that holds the last successfully fetched list of app
//! summaries together with its fetch instant, and refreshes it from a
//! `FeedSource` once the freshness window has elapsed. Ages are measured on the
//! monotonic clock, so wall-clock adjustments never extend or shorten it.

use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{debug, info, warn};
use tokio::sync::Mutex;

use crate::data::{AppSummary, FeedError, FeedSource};

/// Default freshness window in seconds (10 minutes)
pub const DEFAULT_TTL_SECS: u64 = 600;

/// Held cache contents: the sequence and the instant it was fetched
///
/// Both fields are only ever replaced together.
#[derive(Debug, Default)]
struct CacheState {
    summaries: Arc<Vec<AppSummary>>,
    fetched_at: Option<Instant>,
}

impl CacheState {
    /// Fresh means fetched at least once and no more than `ttl` has elapsed since
    ///
    /// An instant earlier than `fetched_at` counts as zero elapsed time.
    fn is_fresh(&self, now: Instant, ttl: Duration) -> bool {
        match self.fetched_at {
            Some(fetched_at) => now.saturating_duration_since(fetched_at) <= ttl,
            None => false,
        }
    }
}

/// Read-only copy of the cache contents, taken without triggering a fetch
#[derive(Debug, Clone)]
pub struct CacheSnapshot {
    /// The held summaries (empty before the first successful fetch)
    pub data: Arc<Vec<AppSummary>>,
    /// When the held summaries were fetched, `None` if never
    pub cached_at: Option<Instant>,
}

/// Serves app summaries from memory, refreshing from a feed source when stale
///
/// The freshness check and the state update run under one lock, so refreshes
/// are serialized and a caller never sees a sequence paired with another
/// fetch's instant. A failed refresh leaves the held state untouched.
#[derive(Debug)]
pub struct CacheGate<F> {
    source: F,
    ttl: Duration,
    state: Mutex<CacheState>,
}

impl<F: FeedSource> CacheGate<F> {
    /// Creates a CacheGate with the default 10 minute freshness window
    pub fn new(source: F) -> Self {
        Self::with_ttl(source, Duration::from_secs(DEFAULT_TTL_SECS))
    }

    /// Creates a CacheGate with a custom freshness window
    ///
    /// A zero TTL refreshes on every call whose `now` is later than the last fetch.
    pub fn with_ttl(source: F, ttl: Duration) -> Self {
        Self {
            source,
            ttl,
            state: Mutex::new(CacheState::default()),
        }
    }

    /// The configured freshness window
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// The underlying feed source
    pub fn source(&self) -> &F {
        &self.source
    }

    /// Returns the app summaries, fetching them first if the cache is stale
    ///
    /// # Arguments
    /// * `now` - The current monotonic instant, used for the freshness check and as the new fetch time
    ///
    /// # Returns
    /// * `Ok(Arc<Vec<AppSummary>>)` - The held summaries, or the freshly fetched ones
    /// * `Err(FeedError)` - If a refresh was needed and failed; held state is unchanged
    pub async fn get_summaries(&self, now: Instant) -> Result<Arc<Vec<AppSummary>>, FeedError> {
        let mut state = self.state.lock().await;

        if state.is_fresh(now, self.ttl) {
            debug!("App cache hit ({} entries)", state.summaries.len());
            return Ok(Arc::clone(&state.summaries));
        }

        let summaries = match self.source.fetch().await {
            Ok(summaries) => Arc::new(summaries),
            Err(err) => {
                warn!("App feed refresh failed, keeping previous cache: {}", err);
                return Err(err);
            }
        };

        // Stale implies `now` is past the previous fetch, so this never moves backwards
        *state = CacheState {
            summaries: Arc::clone(&summaries),
            fetched_at: Some(now),
        };
        info!("App feed refreshed ({} entries)", summaries.len());

        Ok(summaries)
    }

    /// Whether a call to `get_summaries(now)` would be served from memory
    pub async fn is_fresh(&self, now: Instant) -> bool {
        self.state.lock().await.is_fresh(now, self.ttl)
    }

    /// Reads the held summaries and fetch instant without refreshing
    pub async fn snapshot(&self) -> CacheSnapshot {
        let state = self.state.lock().await;
        CacheSnapshot {
            data: Arc::clone(&state.summaries),
            cached_at: state.fetched_at,
        }
    }
}
