//! Error types shared across the crate.
//!
//! All fallible operations in `bfs-crawler` report a [`CrawlError`]. Per-URL
//! failures (host resolution, fetch) are collected into the final
//! [`CrawlResult`](crate::CrawlResult) rather than aborting the crawl;
//! only builder validation surfaces an error to the caller directly.

use thiserror::Error;

/// Errors produced while configuring or running a crawl.
///
/// Variants carry owned strings so results remain self-contained after the
/// collaborators that produced them are gone.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CrawlError {
    /// The host component of a URL could not be determined, so the URL was
    /// never handed to the download pool.
    #[error("cannot resolve host of {url}: {reason}")]
    HostResolution { url: String, reason: String },

    /// The downloader collaborator failed to fetch a page.
    #[error("failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },

    /// Link extraction failed for a fetched page. Never recorded in a
    /// [`CrawlResult`](crate::CrawlResult); the page simply contributes no
    /// links.
    #[error("failed to extract links from {url}: {reason}")]
    Extraction { url: String, reason: String },

    /// Invalid crawler configuration detected at build time.
    #[error("invalid configuration: {0}")]
    Configuration(String),
}
