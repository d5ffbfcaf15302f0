//! # Builder Module
//!
//! Provides the `CrawlerBuilder`, a fluent API for constructing and
//! configuring [`Crawler`] instances.
//!
//! ## Overview
//!
//! The builder assembles a crawler from a downloader collaborator and the
//! concurrency configuration: the sizes of the two worker pools, the
//! per-host download limit and the shutdown grace period. Worker counts
//! default to values derived from the machine's CPU count; everything can
//! be overridden before `build`.
//!
//! ## Example
//!
//! ```rust,ignore
//! use bfs_crawler::CrawlerBuilder;
//!
//! let crawler = CrawlerBuilder::new(my_downloader)
//!     .download_workers(16)
//!     .extract_workers(4)
//!     .per_host(2)
//!     .build()
//!     .await?;
//!
//! let result = crawler.download("https://example.com", 3).await;
//! crawler.close().await;
//! ```

use crate::crawler::Crawler;
use crate::error::CrawlError;
use crate::fetch::{Downloader, HostResolver, UrlHostResolver};
use std::sync::Arc;
use std::time::Duration;

/// Concurrency configuration for a [`Crawler`].
pub struct CrawlerConfig {
    /// Size of the download worker pool.
    pub download_workers: usize,
    /// Size of the link-extraction worker pool.
    pub extract_workers: usize,
    /// Maximum concurrent downloads against a single host.
    pub per_host: usize,
    /// How long [`Crawler::close`] waits for the pools to drain.
    pub shutdown_grace: Duration,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        CrawlerConfig {
            download_workers: num_cpus::get().max(8),
            extract_workers: num_cpus::get().clamp(2, 8),
            per_host: 4,
            shutdown_grace: Duration::from_secs(5),
        }
    }
}

/// Fluent constructor for [`Crawler`].
pub struct CrawlerBuilder<D: Downloader> {
    config: CrawlerConfig,
    downloader: D,
    resolver: Arc<dyn HostResolver>,
}

impl<D: Downloader + 'static> CrawlerBuilder<D> {
    /// Creates a builder around the downloader collaborator, with default
    /// configuration and the `url`-crate-backed host resolver.
    pub fn new(downloader: D) -> Self {
        Self {
            config: CrawlerConfig::default(),
            downloader,
            resolver: Arc::new(UrlHostResolver),
        }
    }

    /// Sets the size of the download worker pool.
    pub fn download_workers(mut self, count: usize) -> Self {
        self.config.download_workers = count;
        self
    }

    /// Sets the size of the link-extraction worker pool.
    pub fn extract_workers(mut self, count: usize) -> Self {
        self.config.extract_workers = count;
        self
    }

    /// Sets the maximum number of concurrent downloads per host.
    pub fn per_host(mut self, limit: usize) -> Self {
        self.config.per_host = limit;
        self
    }

    /// Sets how long [`Crawler::close`] waits for in-flight work.
    pub fn shutdown_grace(mut self, grace: Duration) -> Self {
        self.config.shutdown_grace = grace;
        self
    }

    /// Replaces the default host resolver.
    pub fn host_resolver<R>(mut self, resolver: R) -> Self
    where
        R: HostResolver + 'static,
    {
        self.resolver = Arc::new(resolver);
        self
    }

    /// Validates the configuration and starts the worker pools.
    pub async fn build(self) -> Result<Crawler, CrawlError> {
        if self.config.download_workers == 0 {
            return Err(CrawlError::Configuration(
                "download_workers must be greater than 0".to_string(),
            ));
        }
        if self.config.extract_workers == 0 {
            return Err(CrawlError::Configuration(
                "extract_workers must be greater than 0".to_string(),
            ));
        }
        if self.config.per_host == 0 {
            return Err(CrawlError::Configuration(
                "per_host must be greater than 0".to_string(),
            ));
        }

        Ok(Crawler::new(
            Arc::new(self.downloader),
            self.resolver,
            self.config.download_workers,
            self.config.extract_workers,
            self.config.per_host,
            self.config.shutdown_grace,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::Document;
    use async_trait::async_trait;

    struct NullDownloader;

    #[async_trait]
    impl Downloader for NullDownloader {
        async fn fetch(&self, url: &str) -> Result<Box<dyn Document>, CrawlError> {
            Err(CrawlError::Fetch {
                url: url.to_string(),
                reason: "null downloader".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn rejects_zero_download_workers() {
        let err = CrawlerBuilder::new(NullDownloader)
            .download_workers(0)
            .build()
            .await
            .unwrap_err();
        assert!(matches!(err, CrawlError::Configuration(_)));
    }

    #[tokio::test]
    async fn rejects_zero_per_host() {
        let err = CrawlerBuilder::new(NullDownloader)
            .per_host(0)
            .build()
            .await
            .unwrap_err();
        assert!(matches!(err, CrawlError::Configuration(_)));
    }

    #[tokio::test]
    async fn builds_with_defaults() {
        let crawler = CrawlerBuilder::new(NullDownloader).build().await.unwrap();
        crawler.close().await;
    }
}
