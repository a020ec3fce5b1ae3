//! In-memory cache for the application feed
//!
//! This module provides a cache gate that keeps the last successfully fetched
//! feed in memory for a configurable freshness window (10 minutes by default).
//! A failed refresh never discards previously cached data.

mod gate;

pub use gate::{CacheGate, CacheSnapshot, DEFAULT_TTL_SECS};
