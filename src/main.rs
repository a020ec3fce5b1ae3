//! Catalog backend - serve a cached application feed over a Unix socket
//!
//! A small local HTTP service meant to run next to a desktop extension host.
//! It proxies the remote application catalog with a 10 minute cache.

use std::process;
use std::sync::Arc;

use clap::Parser;
use env_logger::{Env, Target};
use log::error;

use catalog_backend::cache::CacheGate;
use catalog_backend::cli::{Cli, StartupConfig};
use catalog_backend::data::FeedClient;
use catalog_backend::server;

/// Initializes logging to stdout, honouring `RUST_LOG` (default `info`)
fn init_logging() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Stdout)
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = match StartupConfig::from_cli(&cli) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {}", err);
            process::exit(2);
        }
    };

    init_logging();

    let feed = FeedClient::with_url(&config.feed_url, config.request_timeout)?;
    let gate = Arc::new(CacheGate::with_ttl(feed, config.cache_ttl));

    if let Err(err) = server::serve(&config.socket_path, gate).await {
        error!("{}", err);
        return Err(err.into());
    }

    Ok(())
}
