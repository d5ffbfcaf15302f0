//! # Fetch Module
//!
//! Defines the collaborator traits the crawler engine depends on but does
//! not implement.
//!
//! ## Overview
//!
//! The engine is deliberately agnostic about how pages are fetched and
//! parsed. Three seams cover everything it needs from the outside world:
//!
//! - **Downloader**: retrieves a page for a URL, producing a [`Document`]
//! - **Document**: a fetched page that can enumerate its outgoing links
//! - **HostResolver**: maps a URL string to the origin host that keys the
//!   per-host admission gates
//!
//! Implementations may block for as long as they like; the engine imposes
//! no retry or timeout of its own.
//!
//! ## Example
//!
//! ```rust,ignore
//! use bfs_crawler::{async_trait, CrawlError, Document, Downloader};
//!
//! struct HttpDownloader { /* http client, cache, ... */ }
//!
//! #[async_trait]
//! impl Downloader for HttpDownloader {
//!     async fn fetch(&self, url: &str) -> Result<Box<dyn Document>, CrawlError> {
//!         todo!()
//!     }
//! }
//! ```

use crate::error::CrawlError;
use async_trait::async_trait;
use url::Url;

/// A fetched page that can enumerate the absolute URLs it links to.
#[async_trait]
pub trait Document: Send + Sync {
    /// Returns the outgoing links of this page as absolute URL strings.
    ///
    /// A failure here means the page contributes no links to the crawl; it
    /// is never reported as a per-URL error.
    async fn extract_links(&self) -> Result<Vec<String>, CrawlError>;
}

/// Retrieves pages on behalf of the crawler.
///
/// Called from the download worker pool, at most
/// [`per_host`](crate::CrawlerBuilder::per_host) times concurrently for any
/// single host.
#[async_trait]
pub trait Downloader: Send + Sync {
    /// Fetches the page at `url`.
    async fn fetch(&self, url: &str) -> Result<Box<dyn Document>, CrawlError>;
}

/// Resolves the origin host of a URL string.
///
/// Used only to key the per-host gate map. A resolution failure is an
/// immediate per-URL error; the URL is never scheduled for download.
pub trait HostResolver: Send + Sync {
    fn host_of(&self, url: &str) -> Result<String, CrawlError>;
}

/// Default [`HostResolver`] backed by the `url` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct UrlHostResolver;

impl HostResolver for UrlHostResolver {
    fn host_of(&self, url: &str) -> Result<String, CrawlError> {
        let parsed = Url::parse(url).map_err(|e| CrawlError::HostResolution {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        parsed
            .host_str()
            .map(str::to_owned)
            .ok_or_else(|| CrawlError::HostResolution {
                url: url.to_string(),
                reason: "URL has no host component".to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_host_of_http_url() {
        let host = UrlHostResolver.host_of("https://example.com/page?q=1");
        assert_eq!(host.unwrap(), "example.com");
    }

    #[test]
    fn rejects_unparseable_url() {
        let err = UrlHostResolver.host_of("not a url").unwrap_err();
        assert!(matches!(err, CrawlError::HostResolution { .. }));
    }

    #[test]
    fn rejects_url_without_host() {
        let err = UrlHostResolver.host_of("data:text/plain,hello").unwrap_err();
        assert!(matches!(err, CrawlError::HostResolution { .. }));
    }
}
