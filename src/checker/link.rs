// src/checker/link.rs
// =============================================================================
// This module validates a single external link.
//
// Strategy (cheapest thing first):
// 1. Social-media fast path: known anti-bot domains are assumed valid
//    without any network call
// 2. HEAD probe: header-only request, 8 second budget
// 3. GET fallback: only when the server rejected the HEAD method itself
//    (405 Method Not Allowed), 6 second budget
//
// Status interpretation, preserved exactly:
// - 400..=998  broken (carries the status)
// - 999        LinkedIn-style anti-bot sentinel, treated as valid
// - < 400      valid
//
// Rust concepts:
// - Generics: LinkValidator works with any LinkProber (real or fake)
// - Enums with serde: LinkCategory serializes as snake_case for JSON reports
// =============================================================================

use serde::{Deserialize, Serialize};
use url::Url;

use crate::driver::{LinkProber, ProbeError};

// Why a link verdict turned out the way it did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkCategory {
    /// Known anti-bot domain, assumed valid without probing
    Social,
    /// Responded with the 999 anti-bot sentinel, assumed valid
    Blocked,
    /// An ordinary external link (valid or broken, see the status)
    External,
    /// Validation itself failed unexpectedly (e.g. malformed URL)
    Error,
}

// The outcome of validating one external link
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkVerdict {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub category: LinkCategory,
}

impl LinkVerdict {
    fn valid_with_status(status: u16) -> Self {
        Self {
            valid: true,
            status: Some(status),
            error: None,
            category: LinkCategory::External,
        }
    }

    fn broken(status: u16) -> Self {
        Self {
            valid: false,
            status: Some(status),
            error: None,
            category: LinkCategory::External,
        }
    }

    fn failed(message: String) -> Self {
        Self {
            valid: false,
            status: None,
            error: Some(message),
            category: LinkCategory::External,
        }
    }
}

// Validates external links through a LinkProber
pub struct LinkValidator<P: LinkProber> {
    prober: P,
    social_domains: Vec<String>,
}

impl<P: LinkProber> LinkValidator<P> {
    pub fn new(prober: P, social_domains: Vec<String>) -> Self {
        Self {
            prober,
            social_domains,
        }
    }

    // Checks whether an external link resolves without an HTTP error
    //
    // Never returns an error: every failure mode folds into the verdict, so
    // a bad link can never abort the crawl that discovered it.
    pub async fn check_external_link(&self, link: &str) -> LinkVerdict {
        // Skip social media links
        if self.is_social_media(link) {
            println!("⚠️  Social media link (assuming valid): {}", link);
            return LinkVerdict {
                valid: true,
                status: None,
                error: None,
                category: LinkCategory::Social,
            };
        }

        match self.prober.head(link).await {
            Ok(status) => interpret_status(status, link),
            Err(error) => self.handle_probe_failure(error, link).await,
        }
    }

    // True when the link's host is one of the configured anti-bot domains
    //
    // Matches on the host, not the whole URL, so a link that merely mentions
    // "facebook.com" in its query string is still probed normally.
    fn is_social_media(&self, link: &str) -> bool {
        let Ok(parsed) = Url::parse(link) else {
            return false;
        };
        let Some(host) = parsed.host_str() else {
            return false;
        };

        self.social_domains
            .iter()
            .any(|domain| host == domain || host.ends_with(&format!(".{}", domain)))
    }

    // Decides what a failed HEAD probe means
    //
    // A "405 Method Not Allowed" signal means the server refuses HEAD but
    // might serve GET fine, so we retry once with a full fetch. Any other
    // failure (timeout, DNS, connection reset) is final.
    async fn handle_probe_failure(&self, error: ProbeError, link: &str) -> LinkVerdict {
        if error.message.contains("Method Not Allowed") || error.message.contains("405") {
            return self.try_get_request(link).await;
        }

        println!("❌ External link error: {} - {}", link, error.message);
        LinkVerdict::failed(error.message)
    }

    async fn try_get_request(&self, link: &str) -> LinkVerdict {
        match self.prober.get(link).await {
            Ok(status) => interpret_status(status, link),
            Err(error) => {
                println!("❌ External link failed: {} - {}", link, error.message);
                LinkVerdict::failed(error.message)
            }
        }
    }
}

// Maps an HTTP status to a verdict
//
// 999 is not a real HTTP status: LinkedIn and friends use it to turn away
// bots. The link itself is almost certainly fine, so it counts as valid.
fn interpret_status(status: u16, link: &str) -> LinkVerdict {
    if status == 999 {
        println!("⚠️  Anti-bot response (999): {}", link);
        LinkVerdict {
            valid: true,
            status: None,
            error: None,
            category: LinkCategory::Blocked,
        }
    } else if status >= 400 {
        println!("❌ Broken external link: {} (HTTP {})", link, status);
        LinkVerdict::broken(status)
    } else {
        println!("✅ External link OK: {} (HTTP {})", link, status);
        LinkVerdict::valid_with_status(status)
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What is let-else?
//    - `let Ok(parsed) = Url::parse(link) else { return false; };`
//    - Binds the success value, or runs the else block (which must diverge)
//    - Cleaner than match when the failure path is just "bail out"
//
// 2. Why does the validator never return Result?
//    - Broken links are data, not errors: the caller wants a verdict either
//      way and must never abort the crawl because one link misbehaved
//
// 3. Why generics instead of Box<dyn LinkProber>?
//    - The concrete prober type is known at each call site
//    - Generics avoid the extra allocation and keep the fake-injection in
//      tests completely free
// -----------------------------------------------------------------------------
