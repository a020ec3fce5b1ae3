//! Catalog backend library
//!
//! Fetches an upstream application catalog feed, caches it in memory for a
//! freshness window, and serves it as JSON over a Unix domain socket.

pub mod cache;
pub mod cli;
pub mod data;
pub mod server;
