// src/crawl/site.rs
// =============================================================================
// This module implements the site crawl: starting from one URL, visit every
// reachable internal page and validate every link found along the way.
//
// How it works:
// 1. Start with the initial URL on the frontier
// 2. Pop a URL (the frontier is a stack - LIFO, deliberately kept from day
//    one so traversal order stays reproducible)
// 3. Navigate to it; record page errors (HTTP >= 400) and navigation
//    failures, which also skip link extraction for that page
// 4. Filter the page's anchors, then classify each link:
//    external -> validate over the network, internal/relative -> enqueue
// 5. Mark the URL visited and pause briefly before the next page
//
// Politeness:
// - Exactly one page and one link probe in flight at any time
// - A fixed pause after each fully-processed page
//
// Rust concepts:
// - HashSet: To track visited URLs (O(1) lookup)
// - Explicit state struct: All crawl state lives in one value created per
//   crawl() call, so crawls never share or leak state
// =============================================================================

use serde::Serialize;
use std::collections::HashSet;
use std::time::Duration;
use url::Url;

use crate::checker::{LinkCategory, LinkValidator};
use crate::config::{DEFAULT_MAX_PAGES, POLITENESS_DELAY_MS};
use crate::driver::{Anchor, LinkProber, PageDriver};

// What kind of failure a page produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PageErrorKind {
    /// The page itself answered HTTP >= 400
    Page,
    /// The driver could not complete the navigation (timeout, DNS, ...)
    Navigation,
}

// One failed page, recorded without aborting the crawl
#[derive(Debug, Clone, Serialize)]
pub struct PageError {
    pub url: String,
    pub error: String,
    pub kind: PageErrorKind,
}

// One link that failed validation, with where it was found
#[derive(Debug, Clone, Serialize)]
pub struct BrokenLink {
    /// The page the link appeared on
    pub page: String,
    /// The link itself, as written in the anchor
    pub link: String,
    /// The anchor's visible text
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub category: LinkCategory,
}

// The final aggregate of one crawl() call - the sole return value
#[derive(Debug, Serialize)]
pub struct CrawlReport {
    /// Every URL that was dequeued, whether it loaded cleanly or not
    pub visited: HashSet<String>,
    /// Page-level failures
    pub errors: Vec<PageError>,
    /// Link-level failures
    pub broken_links: Vec<BrokenLink>,
}

impl CrawlReport {
    // True when the crawl found nothing wrong
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.broken_links.is_empty()
    }
}

// Knobs for one crawl
#[derive(Debug, Clone)]
pub struct CrawlOptions {
    /// Stop once this many pages have been visited
    pub max_pages: usize,
    /// Classify external links but never probe them
    pub skip_external_links: bool,
    /// Skip any URL containing one of these substrings
    pub exclude_patterns: Vec<String>,
    /// Pause between pages, in milliseconds (tests set 0)
    pub delay_ms: u64,
}

impl Default for CrawlOptions {
    fn default() -> Self {
        Self {
            max_pages: DEFAULT_MAX_PAGES,
            skip_external_links: false,
            exclude_patterns: Vec::new(),
            delay_ms: POLITENESS_DELAY_MS,
        }
    }
}

// All mutable state of one crawl in one place
//
// Created inside crawl() and dropped when it returns: nothing here survives
// across calls, so two crawls can never interfere with each other.
struct CrawlState {
    // Discovered but not yet visited, popped from the back (LIFO)
    frontier: Vec<String>,
    visited: HashSet<String>,
    errors: Vec<PageError>,
    broken_links: Vec<BrokenLink>,
}

impl CrawlState {
    fn new(start_url: &str) -> Self {
        Self {
            frontier: vec![start_url.to_string()],
            visited: HashSet::new(),
            errors: Vec::new(),
            broken_links: Vec::new(),
        }
    }

    // Enqueue with linear de-duplication: fine at crawl scale, and keeps the
    // frontier free of duplicates without imposing any ordering
    fn enqueue(&mut self, url: String) {
        if !self.visited.contains(&url) && !self.frontier.contains(&url) {
            println!("📌 Added to queue: {}", url);
            self.frontier.push(url);
        }
    }

    fn into_report(self) -> CrawlReport {
        CrawlReport {
            visited: self.visited,
            errors: self.errors,
            broken_links: self.broken_links,
        }
    }
}

// Crawls a website and validates every discovered link
//
// Holds only configuration and capabilities; all per-crawl state lives in a
// CrawlState scoped to one crawl() call.
pub struct SiteCrawler<D: PageDriver, P: LinkProber> {
    driver: D,
    validator: LinkValidator<P>,
    base_url: String,
    options: CrawlOptions,
}

impl<D: PageDriver, P: LinkProber> SiteCrawler<D, P> {
    pub fn new(
        driver: D,
        validator: LinkValidator<P>,
        base_url: impl Into<String>,
        options: CrawlOptions,
    ) -> Self {
        Self {
            driver,
            validator,
            base_url: base_url.into(),
            options,
        }
    }

    // Runs the crawl to completion and returns the report
    //
    // Nothing in here is fatal: failed pages and broken links are recorded
    // and the traversal continues until the frontier is empty or the page
    // budget is reached.
    pub async fn crawl(&self, start_url: &str) -> CrawlReport {
        let mut state = CrawlState::new(start_url);

        println!("🚀 Starting crawl from: {}", start_url);
        println!("📝 Max pages limit: {}", self.options.max_pages);

        while state.visited.len() < self.options.max_pages {
            let Some(url) = state.frontier.pop() else {
                break;
            };

            if state.visited.contains(&url) {
                continue;
            }

            // Excluded URLs are neither navigated nor counted against the budget
            if self.is_excluded(&url) {
                println!("⏭️  Skipping excluded URL: {}", url);
                continue;
            }

            println!(
                "🔍 Checking page [{}/{}]: {}",
                state.visited.len() + 1,
                self.options.max_pages,
                url
            );

            self.crawl_page(&url, &mut state).await;
            state.visited.insert(url);

            // Small delay to be respectful to the target server
            tokio::time::sleep(Duration::from_millis(self.options.delay_ms)).await;
        }

        state.into_report()
    }

    fn is_excluded(&self, url: &str) -> bool {
        self.options
            .exclude_patterns
            .iter()
            .any(|pattern| url.contains(pattern))
    }

    // Navigates to one page and processes its links
    //
    // A page error (HTTP >= 400) means the page's own links are unreachable
    // content, so extraction is skipped for it.
    async fn crawl_page(&self, url: &str, state: &mut CrawlState) {
        match self.driver.navigate(url).await {
            Ok(status) if status >= 400 => {
                println!("❌ Page failed: {} (HTTP {})", url, status);
                state.errors.push(PageError {
                    url: url.to_string(),
                    error: format!("HTTP {}", status),
                    kind: PageErrorKind::Page,
                });
            }
            Ok(status) => {
                println!("✅ Page OK: {} (HTTP {})", url, status);
                self.process_page_links(url, state).await;
            }
            Err(error) => {
                println!("❌ Navigation failed: {} - {}", url, error.message);
                state.errors.push(PageError {
                    url: url.to_string(),
                    error: error.message,
                    kind: PageErrorKind::Navigation,
                });
            }
        }
    }

    async fn process_page_links(&self, page_url: &str, state: &mut CrawlState) {
        let anchors = match self.driver.anchors().await {
            Ok(anchors) => anchors,
            Err(error) => {
                println!("❌ Link extraction failed: {} - {}", page_url, error.message);
                state.errors.push(PageError {
                    url: page_url.to_string(),
                    error: error.message,
                    kind: PageErrorKind::Navigation,
                });
                return;
            }
        };

        let links: Vec<Anchor> = anchors
            .into_iter()
            .filter(|anchor| is_navigable(&anchor.href))
            .collect();

        println!("🔗 Found {} links on {}", links.len(), page_url);

        for anchor in &links {
            self.process_link(&anchor.href, &anchor.text, page_url, state)
                .await;
        }
    }

    // Classifies one link and acts on it
    //
    // Precedence: external first, then absolute internal, then relative.
    async fn process_link(&self, link: &str, text: &str, page_url: &str, state: &mut CrawlState) {
        if self.is_external(link) {
            if !self.options.skip_external_links {
                let verdict = self.validator.check_external_link(link).await;
                if !verdict.valid {
                    state.broken_links.push(BrokenLink {
                        page: page_url.to_string(),
                        link: link.to_string(),
                        text: text.to_string(),
                        status: verdict.status,
                        error: verdict.error,
                        category: verdict.category,
                    });
                }
            }
            return;
        }

        self.enqueue_internal(link, text, page_url, state);
    }

    // External = any absolute http(s) link that doesn't live under our base URL
    fn is_external(&self, link: &str) -> bool {
        link.starts_with("http") && !link.starts_with(&self.base_url)
    }

    // Resolves an internal link and adds it to the frontier
    //
    // Relative links resolve against the *current page*, not the base URL:
    // "details/" on /projects/ must become /projects/details/.
    fn enqueue_internal(&self, link: &str, text: &str, page_url: &str, state: &mut CrawlState) {
        let full_link = if link.starts_with("http") {
            link.to_string()
        } else {
            match resolve_relative(page_url, link) {
                Ok(resolved) => resolved,
                Err(error) => {
                    // A malformed href is a finding about this one link,
                    // never a reason to stop processing the rest
                    println!("❌ Link check failed: {} - {}", link, error);
                    state.broken_links.push(BrokenLink {
                        page: page_url.to_string(),
                        link: link.to_string(),
                        text: text.to_string(),
                        status: None,
                        error: Some(error),
                        category: LinkCategory::Error,
                    });
                    return;
                }
            }
        };

        if full_link.starts_with(&self.base_url) {
            state.enqueue(full_link);
        }
    }
}

// The anchor filter, applied before any classification
//
// Drops empty/whitespace hrefs, mailto:/tel:/javascript: pseudo-links, and
// any href containing '#' anywhere. The '#' rule is intentionally broad: it
// also drops cross-page section links, not just same-page fragments.
fn is_navigable(href: &str) -> bool {
    !href.trim().is_empty()
        && !href.starts_with("mailto:")
        && !href.starts_with("tel:")
        && !href.starts_with("javascript:")
        && !href.contains('#')
}

// Resolves a relative href against the page it appeared on
fn resolve_relative(page_url: &str, href: &str) -> Result<String, String> {
    let base = Url::parse(page_url).map_err(|e| e.to_string())?;
    let resolved = base.join(href).map_err(|e| e.to_string())?;
    Ok(resolved.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::fakes::{FakeDriver, FakeProber};
    use std::sync::Arc;

    const BASE: &str = "https://example.com";

    fn crawler(
        driver: Arc<FakeDriver>,
        prober: Arc<FakeProber>,
        options: CrawlOptions,
    ) -> SiteCrawler<Arc<FakeDriver>, Arc<FakeProber>> {
        let validator = LinkValidator::new(prober, vec!["linkedin.com".to_string()]);
        SiteCrawler::new(driver, validator, BASE, options)
    }

    fn options() -> CrawlOptions {
        CrawlOptions {
            delay_ms: 0,
            ..CrawlOptions::default()
        }
    }

    #[tokio::test]
    async fn test_crawl_discovers_relative_and_absolute_internal_links() {
        let driver = Arc::new(
            FakeDriver::new()
                .page(
                    "https://example.com/",
                    200,
                    vec![
                        Anchor::new("/about", "About"),
                        Anchor::new("https://example.com/contact", "Contact"),
                        Anchor::new("https://external.test/x", "Elsewhere"),
                        Anchor::new("mailto:a@b.com", "Mail"),
                    ],
                )
                .page("https://example.com/about", 200, vec![])
                .page("https://example.com/contact", 200, vec![]),
        );
        let prober = Arc::new(FakeProber::new().head_status("https://external.test/x", 200));

        let report = crawler(driver.clone(), prober.clone(), options())
            .crawl("https://example.com/")
            .await;

        // Relative resolved against the page, absolute internal enqueued
        assert!(report.visited.contains("https://example.com/about"));
        assert!(report.visited.contains("https://example.com/contact"));
        assert_eq!(report.visited.len(), 3);

        // External link probed once, came back healthy
        assert_eq!(prober.head_call_count(), 1);
        assert!(report.broken_links.is_empty());
        assert!(report.errors.is_empty());

        // mailto never navigated
        assert!(!driver.navigated().iter().any(|u| u.starts_with("mailto:")));
    }

    #[tokio::test]
    async fn test_broken_external_link_is_reported() {
        let driver = Arc::new(FakeDriver::new().page(
            "https://example.com/",
            200,
            vec![Anchor::new("https://external.test/x", "Elsewhere")],
        ));
        let prober = Arc::new(FakeProber::new().head_status("https://external.test/x", 404));

        let report = crawler(driver, prober, options())
            .crawl("https://example.com/")
            .await;

        assert_eq!(report.broken_links.len(), 1);
        let broken = &report.broken_links[0];
        assert_eq!(broken.page, "https://example.com/");
        assert_eq!(broken.link, "https://external.test/x");
        assert_eq!(broken.text, "Elsewhere");
        assert_eq!(broken.status, Some(404));
        assert_eq!(broken.category, LinkCategory::External);
    }

    #[tokio::test]
    async fn test_frontier_is_a_stack() {
        // The page links to /a then /b; LIFO means /b is visited first
        let driver = Arc::new(
            FakeDriver::new()
                .page(
                    "https://example.com/",
                    200,
                    vec![
                        Anchor::new("https://example.com/a", "A"),
                        Anchor::new("https://example.com/b", "B"),
                    ],
                )
                .page("https://example.com/a", 200, vec![])
                .page("https://example.com/b", 200, vec![]),
        );
        let prober = Arc::new(FakeProber::new());

        crawler(driver.clone(), prober, options())
            .crawl("https://example.com/")
            .await;

        assert_eq!(
            driver.navigated(),
            vec![
                "https://example.com/",
                "https://example.com/b",
                "https://example.com/a",
            ]
        );
    }

    #[tokio::test]
    async fn test_max_pages_bounds_the_crawl() {
        let driver = Arc::new(
            FakeDriver::new()
                .page(
                    "https://example.com/",
                    200,
                    vec![Anchor::new("https://example.com/1", "One")],
                )
                .page(
                    "https://example.com/1",
                    200,
                    vec![Anchor::new("https://example.com/2", "Two")],
                )
                .page("https://example.com/2", 200, vec![]),
        );
        let prober = Arc::new(FakeProber::new());

        let report = crawler(
            driver,
            prober,
            CrawlOptions {
                max_pages: 2,
                ..options()
            },
        )
        .crawl("https://example.com/")
        .await;

        assert_eq!(report.visited.len(), 2);
    }

    #[tokio::test]
    async fn test_excluded_urls_are_never_navigated_or_counted() {
        let driver = Arc::new(
            FakeDriver::new()
                .page(
                    "https://example.com/",
                    200,
                    vec![
                        Anchor::new("https://example.com/admin/panel", "Admin"),
                        Anchor::new("https://example.com/about", "About"),
                    ],
                )
                .page("https://example.com/about", 200, vec![]),
        );
        let prober = Arc::new(FakeProber::new());

        let report = crawler(
            driver.clone(),
            prober,
            CrawlOptions {
                exclude_patterns: vec!["/admin".to_string()],
                ..options()
            },
        )
        .crawl("https://example.com/")
        .await;

        assert!(!driver
            .navigated()
            .iter()
            .any(|u| u.contains("/admin")));
        assert!(!report.visited.iter().any(|u| u.contains("/admin")));
        assert_eq!(report.visited.len(), 2);
    }

    #[tokio::test]
    async fn test_anchor_filter_drops_non_navigable_hrefs() {
        let driver = Arc::new(FakeDriver::new().page(
            "https://example.com/",
            200,
            vec![
                Anchor::new("", "Empty"),
                Anchor::new("   ", "Whitespace"),
                Anchor::new("mailto:a@b.com", "Mail"),
                Anchor::new("tel:+351123", "Phone"),
                Anchor::new("javascript:void(0)", "JS"),
                Anchor::new("https://example.com/docs#intro", "Fragment"),
                Anchor::new("#top", "Top"),
            ],
        ));
        let prober = Arc::new(FakeProber::new());

        let report = crawler(driver.clone(), prober.clone(), options())
            .crawl("https://example.com/")
            .await;

        // Nothing reached classification: no probes, no enqueues, no findings
        assert_eq!(prober.head_call_count(), 0);
        assert_eq!(report.visited.len(), 1);
        assert!(report.broken_links.is_empty());
        assert_eq!(driver.navigated(), vec!["https://example.com/"]);
    }

    #[tokio::test]
    async fn test_error_page_links_are_not_extracted() {
        let driver = Arc::new(FakeDriver::new().page(
            "https://example.com/",
            404,
            vec![Anchor::new("https://example.com/ghost", "Ghost")],
        ));
        let prober = Arc::new(FakeProber::new());

        let report = crawler(driver.clone(), prober, options())
            .crawl("https://example.com/")
            .await;

        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].kind, PageErrorKind::Page);
        assert_eq!(report.errors[0].error, "HTTP 404");
        // The 404 page's links never entered the frontier
        assert_eq!(driver.navigated(), vec!["https://example.com/"]);
        assert!(report.visited.contains("https://example.com/"));
    }

    #[tokio::test]
    async fn test_navigation_failure_does_not_abort_the_crawl() {
        let driver = Arc::new(
            FakeDriver::new()
                .page(
                    "https://example.com/",
                    200,
                    vec![
                        Anchor::new("https://example.com/fine", "Fine"),
                        Anchor::new("https://example.com/dead", "Dead"),
                    ],
                )
                .failing_page("https://example.com/dead", "net::ERR_TIMED_OUT")
                .page("https://example.com/fine", 200, vec![]),
        );
        let prober = Arc::new(FakeProber::new());

        let report = crawler(driver, prober, options())
            .crawl("https://example.com/")
            .await;

        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].kind, PageErrorKind::Navigation);
        assert_eq!(report.errors[0].error, "net::ERR_TIMED_OUT");
        // The failed page still counts as visited, and the crawl went on
        assert_eq!(report.visited.len(), 3);
    }

    #[tokio::test]
    async fn test_already_seen_links_are_not_reenqueued() {
        // Both pages link back to each other and to themselves
        let driver = Arc::new(
            FakeDriver::new()
                .page(
                    "https://example.com/",
                    200,
                    vec![
                        Anchor::new("https://example.com/about", "About"),
                        Anchor::new("https://example.com/about", "About again"),
                    ],
                )
                .page(
                    "https://example.com/about",
                    200,
                    vec![Anchor::new("https://example.com/", "Home")],
                ),
        );
        let prober = Arc::new(FakeProber::new());

        let report = crawler(driver.clone(), prober, options())
            .crawl("https://example.com/")
            .await;

        assert_eq!(report.visited.len(), 2);
        assert_eq!(driver.navigated().len(), 2);
    }

    #[tokio::test]
    async fn test_skip_external_links_probes_nothing() {
        let driver = Arc::new(FakeDriver::new().page(
            "https://example.com/",
            200,
            vec![Anchor::new("https://external.test/x", "Elsewhere")],
        ));
        let prober = Arc::new(FakeProber::new().head_status("https://external.test/x", 404));

        let report = crawler(
            driver,
            prober.clone(),
            CrawlOptions {
                skip_external_links: true,
                ..options()
            },
        )
        .crawl("https://example.com/")
        .await;

        assert_eq!(prober.head_call_count(), 0);
        assert!(report.broken_links.is_empty());
    }

    #[tokio::test]
    async fn test_social_link_needs_no_network_call() {
        let driver = Arc::new(FakeDriver::new().page(
            "https://example.com/",
            200,
            vec![Anchor::new("https://www.linkedin.com/in/someone", "Me")],
        ));
        let prober = Arc::new(FakeProber::new());

        let report = crawler(driver, prober.clone(), options())
            .crawl("https://example.com/")
            .await;

        assert_eq!(prober.head_call_count(), 0);
        assert_eq!(prober.get_call_count(), 0);
        assert!(report.broken_links.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_relative_link_is_recorded_and_skipped() {
        let driver = Arc::new(
            FakeDriver::new()
                .page(
                    "https://example.com/",
                    200,
                    vec![
                        Anchor::new("//[bad]", "Broken markup"),
                        Anchor::new("/about", "About"),
                    ],
                )
                .page("https://example.com/about", 200, vec![]),
        );
        let prober = Arc::new(FakeProber::new());

        let report = crawler(driver, prober, options())
            .crawl("https://example.com/")
            .await;

        assert_eq!(report.broken_links.len(), 1);
        assert_eq!(report.broken_links[0].category, LinkCategory::Error);
        assert!(report.broken_links[0].error.is_some());
        // The anchors after the malformed one were still processed
        assert!(report.visited.contains("https://example.com/about"));
    }

    #[tokio::test]
    async fn test_relative_links_resolve_against_current_page() {
        let driver = Arc::new(
            FakeDriver::new()
                .page(
                    "https://example.com/projects/",
                    200,
                    vec![Anchor::new("details/", "Details")],
                )
                .page("https://example.com/projects/details/", 200, vec![]),
        );
        let prober = Arc::new(FakeProber::new());

        let report = crawler(driver, prober, options())
            .crawl("https://example.com/projects/")
            .await;

        assert!(report
            .visited
            .contains("https://example.com/projects/details/"));
    }

    #[test]
    fn test_is_navigable_filter_rules() {
        assert!(is_navigable("/about"));
        assert!(is_navigable("https://example.com/contact"));
        assert!(!is_navigable(""));
        assert!(!is_navigable("  "));
        assert!(!is_navigable("mailto:x@y.z"));
        assert!(!is_navigable("tel:123"));
        assert!(!is_navigable("javascript:void(0)"));
        // '#' anywhere disqualifies, not just fragment-only hrefs
        assert!(!is_navigable("#top"));
        assert!(!is_navigable("/docs#section"));
        assert!(!is_navigable("https://example.com/page#part"));
    }
}
