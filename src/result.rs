//! Final outcome of one crawl invocation.

use crate::error::CrawlError;
use std::collections::HashMap;

/// Immutable outcome of a single [`Crawler::download`](crate::Crawler::download)
/// call.
///
/// `downloaded` holds every successfully fetched URL in no significant
/// order; `errors` maps each failed URL to the reason it failed, with every
/// URL present at most once across both collections.
#[derive(Debug, Clone, Default)]
pub struct CrawlResult {
    /// URLs fetched successfully during the crawl.
    pub downloaded: Vec<String>,
    /// URLs that failed, with the per-URL failure reason.
    pub errors: HashMap<String, CrawlError>,
}

impl CrawlResult {
    /// True if the crawl fetched at least one page and recorded no errors.
    pub fn is_fully_successful(&self) -> bool {
        !self.downloaded.is_empty() && self.errors.is_empty()
    }

    /// Total number of URLs the crawl attempted.
    pub fn attempted(&self) -> usize {
        self.downloaded.len() + self.errors.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_result_is_not_fully_successful() {
        assert!(!CrawlResult::default().is_fully_successful());
    }

    #[test]
    fn attempted_counts_successes_and_failures() {
        let mut result = CrawlResult::default();
        result.downloaded.push("https://a.com/".to_string());
        result.errors.insert(
            "https://a.com/broken".to_string(),
            CrawlError::Fetch {
                url: "https://a.com/broken".to_string(),
                reason: "timeout".to_string(),
            },
        );
        assert_eq!(result.attempted(), 2);
        assert!(!result.is_fully_successful());
    }
}
