//! Tracked Cache - demo runner
//!
//! Records each URL given on the command line through the instrumented
//! `store` operation, fetches every page twice through the page cache, then
//! replays the `store` history.
//!
//! Usage: `tracked_cache [--json] [URL...]`

use std::time::Duration;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tracked_cache::tracking::{Replay, STORE_OPERATION};
use tracked_cache::{
    replay, shared, spawn_cleanup_task, Cache, Config, HttpFetcher, KeyValueStore, UrlCache,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tracked_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut json = false;
    let mut urls = Vec::new();
    for arg in std::env::args().skip(1) {
        if arg == "--json" {
            json = true;
        } else {
            urls.push(arg);
        }
    }

    let config = Config::from_env();
    info!(
        "Configuration loaded: page_ttl={}s, cleanup_interval={}s, fetch_timeout={}s",
        config.page_ttl, config.cleanup_interval, config.fetch_timeout
    );

    let store = shared(KeyValueStore::new());
    let cleanup_handle =
        spawn_cleanup_task(store.clone(), Duration::from_secs(config.cleanup_interval));

    let cache = Cache::new(store.clone()).await;
    let fetcher = HttpFetcher::new(config.fetch_timeout()).context("building HTTP client")?;
    let pages = UrlCache::new(store.clone(), fetcher).with_ttl(config.page_ttl());

    for url in &urls {
        let key = cache
            .store(url.as_str())
            .await
            .with_context(|| format!("recording {}", url))?;
        info!(url = %url, key = %key, "Recorded URL");

        for _ in 0..2 {
            match pages.get_page(url).await {
                Ok(body) => info!(url = %url, bytes = body.len(), "Fetched page"),
                Err(e) => warn!(url = %url, error = %e, "Could not fetch page"),
            }
        }
        let count = pages.access_count(url).await;
        info!(url = %url, count, "Page accesses");
    }

    if json {
        let history = Replay::load(&store, STORE_OPERATION).await?;
        println!("{}", serde_json::to_string_pretty(&history)?);
    } else {
        replay(&store, STORE_OPERATION).await?;
    }

    cleanup_handle.abort();
    Ok(())
}
