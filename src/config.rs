// src/config.rs
// =============================================================================
// This file holds the configuration surface of the tool.
//
// Everything can be supplied through environment variables (handy for CI
// pipelines) with sensible defaults, and the CLI flags override both.
//
// Environment variables:
// - BASE_URL          the site under test (defines "internal" vs "external")
// - MAX_PAGES         crawl budget (default: 50)
// - TIMEOUT           page navigation timeout in milliseconds (default: 30000)
// - SKIP_EXTERNAL     "true" to classify external links without probing them
// - EXCLUDE_PATTERNS  comma-separated URL substrings to skip while crawling
//
// Rust concepts:
// - const: Compile-time constants baked into the binary
// - std::env::var: Reading environment variables (returns Result)
// =============================================================================

use std::env;

// The site we crawl when no URL is given on the command line or environment
pub const DEFAULT_BASE_URL: &str = "https://www.carloschaves.com";

// Default crawl budget: stop after this many visited pages
pub const DEFAULT_MAX_PAGES: usize = 50;

// Default page navigation timeout in milliseconds
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

// Politeness pause between pages so we don't hammer the target server
pub const POLITENESS_DELAY_MS: u64 = 500;

// Domains that reliably reject automated HEAD/GET probes with anti-bot
// responses even though the links themselves are fine. Probing them only
// produces noise, so the validator assumes they are valid.
pub const SOCIAL_MEDIA_DOMAINS: &[&str] = &[
    "linkedin.com",
    "facebook.com",
    "instagram.com",
    "twitter.com",
    "x.com",
];

// Pages that must exist for the site to be considered healthy
// Checked by the 'pages' subcommand
pub const CRITICAL_PAGES: &[&str] = &["/cv/", "/", "/case-studies/"];

// Holds the resolved configuration for one run
//
// Built from the environment first; the CLI layer then overrides whichever
// fields the user passed explicitly.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// The base URL that defines which links are internal
    pub base_url: String,
    /// Maximum number of pages to visit in one crawl
    pub max_pages: usize,
    /// Page navigation timeout in milliseconds
    pub timeout_ms: u64,
    /// When true, external links are never probed over the network
    pub skip_external_links: bool,
    /// URL substrings that exclude a page from the crawl entirely
    pub exclude_patterns: Vec<String>,
}

impl SiteConfig {
    // Reads the configuration from environment variables
    //
    // Missing or unparseable values silently fall back to the defaults,
    // matching how a CI pipeline would expect this to behave: an empty
    // environment gives a fully working configuration.
    pub fn from_env() -> Self {
        Self {
            base_url: env::var("BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            max_pages: env::var("MAX_PAGES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MAX_PAGES),
            timeout_ms: env::var("TIMEOUT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_TIMEOUT_MS),
            skip_external_links: env::var("SKIP_EXTERNAL")
                .map(|v| v == "true")
                .unwrap_or(false),
            exclude_patterns: env::var("EXCLUDE_PATTERNS")
                .map(|v| split_patterns(&v))
                .unwrap_or_default(),
        }
    }
}

// Splits a comma-separated pattern list into clean entries
//
// "admin, /draft ," -> ["admin", "/draft"]
// Whitespace around each entry is trimmed, empty entries are dropped
pub fn split_patterns(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .collect()
}
