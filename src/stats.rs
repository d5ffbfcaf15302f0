//! # Statistics Module
//!
//! Collects counters describing the crawler's operation.
//!
//! ## Overview
//!
//! The `StatCollector` tracks crawl activity across every session served by
//! one `Crawler`: pages fetched, per-URL failures, links discovered,
//! duplicates skipped and levels completed. The counters are plain atomics
//! updated from the worker pools, so reading them at any time is cheap and
//! never blocks a crawl.
//!
//! ## Example
//!
//! ```rust,ignore
//! let crawler = CrawlerBuilder::new(downloader).build().await?;
//! crawler.download("https://example.com", 2).await;
//! println!("{}", crawler.stats().summary());
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

/// Point-in-time copy of the collected counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub pages_downloaded: usize,
    pub fetch_errors: usize,
    pub host_resolution_errors: usize,
    pub links_discovered: usize,
    pub duplicates_skipped: usize,
    pub extractions_failed: usize,
    pub levels_completed: usize,
}

/// Thread-safe counters shared by every crawl session of a `Crawler`.
#[derive(Debug)]
pub struct StatCollector {
    pages_downloaded: AtomicUsize,
    fetch_errors: AtomicUsize,
    host_resolution_errors: AtomicUsize,
    links_discovered: AtomicUsize,
    duplicates_skipped: AtomicUsize,
    extractions_failed: AtomicUsize,
    levels_completed: AtomicUsize,
    started_at: Instant,
}

impl Default for StatCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl StatCollector {
    pub fn new() -> Self {
        Self {
            pages_downloaded: AtomicUsize::new(0),
            fetch_errors: AtomicUsize::new(0),
            host_resolution_errors: AtomicUsize::new(0),
            links_discovered: AtomicUsize::new(0),
            duplicates_skipped: AtomicUsize::new(0),
            extractions_failed: AtomicUsize::new(0),
            levels_completed: AtomicUsize::new(0),
            started_at: Instant::now(),
        }
    }

    pub(crate) fn increment_pages_downloaded(&self) {
        self.pages_downloaded.fetch_add(1, Ordering::SeqCst);
    }

    pub(crate) fn increment_fetch_errors(&self) {
        self.fetch_errors.fetch_add(1, Ordering::SeqCst);
    }

    pub(crate) fn increment_host_resolution_errors(&self) {
        self.host_resolution_errors.fetch_add(1, Ordering::SeqCst);
    }

    pub(crate) fn add_links_discovered(&self, count: usize) {
        self.links_discovered.fetch_add(count, Ordering::SeqCst);
    }

    pub(crate) fn increment_duplicates_skipped(&self) {
        self.duplicates_skipped.fetch_add(1, Ordering::SeqCst);
    }

    pub(crate) fn increment_extractions_failed(&self) {
        self.extractions_failed.fetch_add(1, Ordering::SeqCst);
    }

    pub(crate) fn increment_levels_completed(&self) {
        self.levels_completed.fetch_add(1, Ordering::SeqCst);
    }

    /// Captures a point-in-time snapshot for reporting.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            pages_downloaded: self.pages_downloaded.load(Ordering::SeqCst),
            fetch_errors: self.fetch_errors.load(Ordering::SeqCst),
            host_resolution_errors: self.host_resolution_errors.load(Ordering::SeqCst),
            links_discovered: self.links_discovered.load(Ordering::SeqCst),
            duplicates_skipped: self.duplicates_skipped.load(Ordering::SeqCst),
            extractions_failed: self.extractions_failed.load(Ordering::SeqCst),
            levels_completed: self.levels_completed.load(Ordering::SeqCst),
        }
    }

    /// One-line human-readable summary of the counters.
    pub fn summary(&self) -> String {
        let snap = self.snapshot();
        format!(
            "downloaded={} fetch_errors={} host_errors={} links={} duplicates={} \
             extraction_failures={} levels={} elapsed={:?}",
            snap.pages_downloaded,
            snap.fetch_errors,
            snap.host_resolution_errors,
            snap.links_discovered,
            snap.duplicates_skipped,
            snap.extractions_failed,
            snap.levels_completed,
            self.started_at.elapsed(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate() {
        let stats = StatCollector::new();
        stats.increment_pages_downloaded();
        stats.increment_pages_downloaded();
        stats.increment_fetch_errors();
        stats.add_links_discovered(5);
        stats.increment_levels_completed();

        let snap = stats.snapshot();
        assert_eq!(snap.pages_downloaded, 2);
        assert_eq!(snap.fetch_errors, 1);
        assert_eq!(snap.links_discovered, 5);
        assert_eq!(snap.levels_completed, 1);
        assert_eq!(snap.duplicates_skipped, 0);
    }

    #[test]
    fn summary_mentions_every_counter() {
        let stats = StatCollector::new();
        stats.increment_duplicates_skipped();
        let summary = stats.summary();
        assert!(summary.contains("duplicates=1"));
        assert!(summary.contains("downloaded=0"));
    }
}
