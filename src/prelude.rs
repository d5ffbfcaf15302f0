//! A "prelude" for users of the `bfs-crawler` crate.
//!
//! Re-exports the most commonly used traits and structs so that they can be
//! imported in one line.
//!
//! # Example
//!
//! ```
//! use bfs_crawler::prelude::*;
//! ```

pub use crate::{
    // Core structs
    CrawlResult,
    Crawler,
    CrawlerBuilder,
    // Core traits
    Document,
    Downloader,
    HostResolver,
    // Errors
    CrawlError,
    // Essential re-export for trait implementation
    async_trait,
};
