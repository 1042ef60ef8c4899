// src/checker/pages.rs
// =============================================================================
// This module checks that a site's critical pages are reachable.
//
// It complements the full crawl: instead of discovering pages, it probes a
// fixed list of must-exist paths ("/", "/cv/", ...) and reports any that do
// not answer 200.
//
// Unlike the crawl (strictly sequential for politeness), these are a handful
// of independent probes, so we run them concurrently with a small limit.
//
// Rust concepts:
// - Streams: buffer_unordered(N) runs up to N futures at once
// - Borrowing in async: all probe futures share the same &P
// =============================================================================

use futures::stream::{self, StreamExt};
use serde::Serialize;

use crate::driver::LinkProber;

// How many pages we probe at once
const CONCURRENT_CHECKS: usize = 4;

// The outcome of probing one critical page
#[derive(Debug, Clone, Serialize)]
pub struct PageCheckResult {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PageCheckResult {
    // A critical page is healthy only on a clean 200
    //
    // A page that could not be reached at all (status = None) is reported
    // but does not count as unhealthy: optional pages may simply not exist.
    pub fn is_ok(&self) -> bool {
        matches!(self.status, Some(200))
    }

    pub fn is_unreachable(&self) -> bool {
        self.status.is_none()
    }
}

// Probes each path under the base URL and reports the status
//
// Results come back in completion order, not input order; callers that care
// about presentation should sort.
pub async fn check_critical_pages<P: LinkProber>(
    prober: &P,
    base_url: &str,
    paths: &[String],
) -> Vec<PageCheckResult> {
    let base = base_url.trim_end_matches('/');

    let checks = paths.iter().map(|path| {
        let url = format!("{}{}", base, path);
        async move {
            println!("🔍 Checking critical page: {}", url);
            match prober.get(&url).await {
                Ok(status) => PageCheckResult {
                    url,
                    status: Some(status),
                    error: None,
                },
                Err(error) => PageCheckResult {
                    url,
                    status: None,
                    error: Some(error.message),
                },
            }
        }
    });

    stream::iter(checks)
        .buffer_unordered(CONCURRENT_CHECKS)
        .collect()
        .await
}
