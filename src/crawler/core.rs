//! The `Crawler` facade owning the shared worker pools.

use crate::crawler::session::CrawlSession;
use crate::fetch::{Downloader, HostResolver};
use crate::pool::WorkerPool;
use crate::result::CrawlResult;
use crate::stats::StatCollector;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Long-lived, depth-bounded breadth-first crawler.
///
/// Owns the download and extraction worker pools and the configured
/// per-host concurrency limit. [`download`](Crawler::download) may be called
/// repeatedly and concurrently from any number of callers; every call runs
/// an independent [`CrawlSession`] and only the pools are shared.
pub struct Crawler {
    downloader: Arc<dyn Downloader>,
    resolver: Arc<dyn HostResolver>,
    download_pool: Arc<WorkerPool>,
    extract_pool: Arc<WorkerPool>,
    per_host: usize,
    shutdown_grace: Duration,
    stats: Arc<StatCollector>,
}

impl std::fmt::Debug for Crawler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Crawler")
            .field("per_host", &self.per_host)
            .field("shutdown_grace", &self.shutdown_grace)
            .finish_non_exhaustive()
    }
}

impl Crawler {
    pub(crate) fn new(
        downloader: Arc<dyn Downloader>,
        resolver: Arc<dyn HostResolver>,
        download_workers: usize,
        extract_workers: usize,
        per_host: usize,
        shutdown_grace: Duration,
    ) -> Self {
        Self {
            downloader,
            resolver,
            download_pool: Arc::new(WorkerPool::new("download", download_workers)),
            extract_pool: Arc::new(WorkerPool::new("extract", extract_workers)),
            per_host,
            shutdown_grace,
            stats: Arc::new(StatCollector::new()),
        }
    }

    /// Crawls breadth-first from `url` up to `depth` hops and blocks the
    /// calling task until the crawl completes.
    ///
    /// `depth` counts levels including the seed itself: `1` fetches only the
    /// seed, `0` fetches nothing. Per-URL failures are reported in the
    /// result; no failure aborts the crawl.
    pub async fn download(&self, url: &str, depth: usize) -> CrawlResult {
        info!(url, depth, "starting crawl");
        let session = CrawlSession::new(
            Arc::clone(&self.downloader),
            Arc::clone(&self.resolver),
            Arc::clone(&self.download_pool),
            Arc::clone(&self.extract_pool),
            self.per_host,
            Arc::clone(&self.stats),
        );
        let result = session.run(url.to_string(), depth).await;
        info!(
            url,
            downloaded = result.downloaded.len(),
            errors = result.errors.len(),
            "crawl finished"
        );
        result
    }

    /// Stops accepting new work on both pools and waits up to the configured
    /// grace period for in-flight work to finish. Idempotent; a drain
    /// timeout is logged, never returned.
    pub async fn close(&self) {
        info!("closing crawler");
        self.download_pool.close(self.shutdown_grace).await;
        self.extract_pool.close(self.shutdown_grace).await;
    }

    /// Counters accumulated across every crawl served by this instance.
    pub fn stats(&self) -> Arc<StatCollector> {
        Arc::clone(&self.stats)
    }
}
