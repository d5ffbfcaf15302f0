//! Per-call crawl state and the breadth-first orchestration loop.
//!
//! A `CrawlSession` is created fresh for every
//! [`Crawler::download`](crate::Crawler::download) invocation and owns all
//! the state of that crawl: the visited set, the next-level frontier, the
//! per-host gate map and the success/error accumulators. Nothing here
//! outlives the call or is shared between calls; the two worker pools are
//! borrowed from the owning `Crawler`.
//!
//! Each level runs in three phases: the frontier is drained and deduplicated
//! on the orchestrating task, every admitted URL is handed to its host gate
//! with a barrier registration, and the orchestrator then awaits the barrier
//! until every download and every extraction it spawned has finished. Only
//! then does the next level start, so the crawl is strictly level-by-level.

use crate::barrier::{Registration, RendezvousBarrier};
use crate::error::CrawlError;
use crate::fetch::{Downloader, HostResolver};
use crate::gate::HostGate;
use crate::pool::WorkerPool;
use crate::result::CrawlResult;
use crate::stats::StatCollector;
use crossbeam::queue::SegQueue;
use dashmap::{DashMap, DashSet};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, trace};

pub(crate) struct CrawlSession {
    downloader: Arc<dyn Downloader>,
    resolver: Arc<dyn HostResolver>,
    download_pool: Arc<WorkerPool>,
    extract_pool: Arc<WorkerPool>,
    per_host: usize,
    stats: Arc<StatCollector>,
    /// URLs ever admitted into this session's BFS; insert doubles as the
    /// atomic dedup test.
    visited: DashSet<String>,
    /// Filled by extraction jobs while the current level runs; drained in
    /// full at the start of the next level.
    frontier: SegQueue<String>,
    downloaded: SegQueue<String>,
    errors: DashMap<String, CrawlError>,
    gates: DashMap<String, Arc<HostGate>>,
}

impl CrawlSession {
    pub(crate) fn new(
        downloader: Arc<dyn Downloader>,
        resolver: Arc<dyn HostResolver>,
        download_pool: Arc<WorkerPool>,
        extract_pool: Arc<WorkerPool>,
        per_host: usize,
        stats: Arc<StatCollector>,
    ) -> Arc<Self> {
        Arc::new(Self {
            downloader,
            resolver,
            download_pool,
            extract_pool,
            per_host,
            stats,
            visited: DashSet::new(),
            frontier: SegQueue::new(),
            downloaded: SegQueue::new(),
            errors: DashMap::new(),
            gates: DashMap::new(),
        })
    }

    /// Runs the whole crawl and assembles the immutable result.
    ///
    /// A `depth` of zero dispatches no work and yields an empty result.
    pub(crate) async fn run(self: Arc<Self>, seed: String, depth: usize) -> CrawlResult {
        self.frontier.push(seed);

        for level in 0..depth {
            let remaining = depth - level;
            let barrier = RendezvousBarrier::new();
            // Held across dispatch so the barrier cannot open while work for
            // this level is still being registered.
            let own = barrier.register();

            let mut current = Vec::new();
            while let Some(url) = self.frontier.pop() {
                current.push(url);
            }
            debug!(level, urls = current.len(), "dispatching crawl level");

            for url in current {
                if !self.visited.insert(url.clone()) {
                    trace!(url = %url, "already visited, skipping");
                    self.stats.increment_duplicates_skipped();
                    continue;
                }
                Arc::clone(&self).dispatch(url, remaining, &barrier).await;
            }

            own.arrive();
            barrier.await_zero().await;
            self.stats.increment_levels_completed();
        }

        self.assemble()
    }

    /// Resolves the URL's host and hands a download job to its gate, or
    /// records a resolution failure without registering any work.
    async fn dispatch(self: Arc<Self>, url: String, remaining: usize, barrier: &Arc<RendezvousBarrier>) {
        let host = match self.resolver.host_of(&url) {
            Ok(host) => host,
            Err(e) => {
                debug!(url = %url, error = %e, "host resolution failed");
                self.stats.increment_host_resolution_errors();
                self.errors.insert(url, e);
                return;
            }
        };

        let registration = barrier.register();
        let gate = self
            .gates
            .entry(host.clone())
            .or_insert_with(|| {
                HostGate::new(host, self.per_host, Arc::clone(&self.download_pool))
            })
            .clone();

        let session = Arc::clone(&self);
        let barrier = Arc::clone(barrier);
        gate.submit(Box::pin(async move {
            session.download_one(url, remaining, barrier, registration).await;
        }))
        .await;
    }

    /// Body of one download job: fetch the page, record the outcome, and
    /// spawn an extraction job unless this is the final level.
    async fn download_one(
        self: Arc<Self>,
        url: String,
        remaining: usize,
        barrier: Arc<RendezvousBarrier>,
        registration: Registration,
    ) {
        match self.downloader.fetch(&url).await {
            Ok(document) => {
                trace!(url = %url, "fetched");
                self.downloaded.push(url.clone());
                self.stats.increment_pages_downloaded();

                if remaining > 1 {
                    let extract_registration = barrier.register();
                    let session = Arc::clone(&self);
                    self.extract_pool
                        .submit(Box::pin(async move {
                            match document.extract_links().await {
                                Ok(links) => {
                                    session.stats.add_links_discovered(links.len());
                                    for link in links {
                                        session.frontier.push(link);
                                    }
                                }
                                // Extraction failures are swallowed: the page
                                // stays a success, it just contributes no links.
                                Err(e) => {
                                    debug!(url = %url, error = %e, "link extraction failed");
                                    session.stats.increment_extractions_failed();
                                }
                            }
                            extract_registration.arrive();
                        }))
                        .await;
                }
            }
            Err(e) => {
                debug!(url = %url, error = %e, "fetch failed");
                self.stats.increment_fetch_errors();
                self.errors.insert(url, e);
            }
        }
        registration.arrive();
    }

    fn assemble(&self) -> CrawlResult {
        let mut downloaded = Vec::new();
        while let Some(url) = self.downloaded.pop() {
            downloaded.push(url);
        }
        let errors: HashMap<String, CrawlError> = self
            .errors
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();
        CrawlResult { downloaded, errors }
    }
}
