//! # bfs-crawler
//!
//! Concurrent, depth-bounded breadth-first web crawler engine.
//!
//! Given a seed URL and a depth, the crawler fetches pages level by level,
//! extracts outgoing links off the download path, and follows discovered
//! links up to the requested depth while bounding total concurrent
//! downloads, concurrent downloads per origin host, and keeping
//! link-extraction work on its own worker pool.
//!
//! Page fetching, link extraction and host parsing are collaborator traits
//! ([`Downloader`], [`Document`], [`HostResolver`]); the engine supplies the
//! scheduling: two fixed-size worker pools, per-host FIFO admission gates,
//! a per-level rendezvous barrier, per-session deduplication and
//! partial-failure accounting.
//!
//! ## Example
//!
//! ```rust,ignore
//! use bfs_crawler::{async_trait, CrawlError, CrawlerBuilder, Document, Downloader};
//!
//! struct MyDownloader { /* http client, cache, ... */ }
//!
//! #[async_trait]
//! impl Downloader for MyDownloader {
//!     async fn fetch(&self, url: &str) -> Result<Box<dyn Document>, CrawlError> {
//!         todo!()
//!     }
//! }
//!
//! # async fn run() -> Result<(), CrawlError> {
//! let crawler = CrawlerBuilder::new(MyDownloader { /* ... */ })
//!     .download_workers(16)
//!     .extract_workers(4)
//!     .per_host(2)
//!     .build()
//!     .await?;
//!
//! let result = crawler.download("https://example.com", 3).await;
//! println!("fetched {} pages, {} errors", result.downloaded.len(), result.errors.len());
//!
//! crawler.close().await;
//! # Ok(())
//! # }
//! ```

mod barrier;
pub mod builder;
pub mod crawler;
pub mod error;
pub mod fetch;
mod gate;
mod pool;
pub mod prelude;
pub mod result;
pub mod stats;

pub use builder::{CrawlerBuilder, CrawlerConfig};
pub use crawler::Crawler;
pub use error::CrawlError;
pub use fetch::{Document, Downloader, HostResolver, UrlHostResolver};
pub use result::CrawlResult;
pub use stats::{StatCollector, StatsSnapshot};

pub use async_trait::async_trait;
pub use dashmap::DashMap;
pub use tokio;
pub use url::Url;
