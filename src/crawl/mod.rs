// src/crawl/mod.rs
// =============================================================================
// This module handles website crawling.
//
// Features:
// - Stack-based (LIFO) traversal starting from one URL
// - Respects the base-URL boundary (doesn't crawl external sites)
// - Configurable page budget and URL exclusion patterns
// - Polite crawling with a fixed delay between pages
// - Delegates every external link to the checker module
//
// Why crawl?
// - To find all reachable pages on a website
// - To verify every link on those pages actually resolves
// - One crawl run is one smoke test of the whole site
// =============================================================================

mod site;

// Re-export the crawler and its result types
pub use site::{BrokenLink, CrawlOptions, CrawlReport, PageError, PageErrorKind, SiteCrawler};
