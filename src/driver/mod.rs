// src/driver/mod.rs
// =============================================================================
// This module defines the "browser driver" capability the crawler consumes.
//
// The crawler never talks to the network directly. It only knows about two
// narrow capabilities:
// - PageDriver: navigate to a page and read its anchors
// - LinkProber: lightweight HEAD / full GET probes for external links
//
// Why traits?
// - The production implementation (src/driver/http.rs) uses reqwest + scraper
// - Unit tests substitute deterministic in-memory fakes (no network at all)
// - This is the same seam a real browser automation tool would plug into
//
// Rust concepts:
// - Traits: Interfaces that multiple types can implement
// - async-trait: Async functions aren't allowed in plain traits yet, this
//   macro rewrites them into boxed futures for us
// - Send + Sync bounds: Required so implementations work inside tokio tasks
// =============================================================================

mod http;

pub use http::{HttpDriver, HttpProber};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

// One anchor element extracted from a page, in document order
//
// href is the raw attribute value (possibly relative), text is the trimmed
// visible text. Anchors are ephemeral: the crawler consumes them immediately
// and never stores them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Anchor {
    pub href: String,
    pub text: String,
}

impl Anchor {
    pub fn new(href: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            text: text.into(),
        }
    }
}

// A failed page navigation (timeout, DNS failure, protocol error, ...)
//
// We keep the message as a plain String: the crawler records it verbatim in
// the crawl report, the same way a browser would surface its failure text.
#[derive(Debug, Clone)]
pub struct DriverError {
    pub message: String,
}

impl DriverError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for DriverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for DriverError {}

// A failed link probe
//
// The message matters: the validator inspects it to recognize the
// "405 Method Not Allowed" signal that triggers the GET fallback.
#[derive(Debug, Clone)]
pub struct ProbeError {
    pub message: String,
}

impl ProbeError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for ProbeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ProbeError {}

// The page navigation capability
//
// navigate() loads a URL and returns the final HTTP status, or an error when
// the navigation itself failed. anchors() reads the anchor elements of the
// page navigate() last loaded, in document order.
#[async_trait]
pub trait PageDriver: Send + Sync {
    async fn navigate(&self, url: &str) -> Result<u16, DriverError>;
    async fn anchors(&self) -> Result<Vec<Anchor>, DriverError>;
}

// The link probing capability, two variants:
// - head: header-only request (cheap, preferred)
// - get: full content fetch (fallback when a server rejects HEAD)
//
// Both return the HTTP status on any response, and an error only when the
// request itself failed (timeout, DNS, connection reset, ...).
#[async_trait]
pub trait LinkProber: Send + Sync {
    async fn head(&self, url: &str) -> Result<u16, ProbeError>;
    async fn get(&self, url: &str) -> Result<u16, ProbeError>;
}

// Forward both capabilities through Arc so a driver can be shared: the caller
// keeps one handle (tests assert on recorded calls through it) while the
// crawler owns another.
#[async_trait]
impl<T: PageDriver + ?Sized> PageDriver for std::sync::Arc<T> {
    async fn navigate(&self, url: &str) -> Result<u16, DriverError> {
        (**self).navigate(url).await
    }

    async fn anchors(&self) -> Result<Vec<Anchor>, DriverError> {
        (**self).anchors().await
    }
}

#[async_trait]
impl<T: LinkProber + ?Sized> LinkProber for std::sync::Arc<T> {
    async fn head(&self, url: &str) -> Result<u16, ProbeError> {
        (**self).head(url).await
    }

    async fn get(&self, url: &str) -> Result<u16, ProbeError> {
        (**self).get(url).await
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why #[async_trait]?
//    - As of this crate's edition, `async fn` in a trait can't be used as a
//      trait object and can't carry Send bounds ergonomically
//    - The async-trait macro turns each async fn into one returning
//      Pin<Box<dyn Future + Send>>, which just works everywhere
//
// 2. Why Result<u16, ProbeError> instead of Result<Response, ...>?
//    - The crawler only ever needs the status code
//    - Returning the smallest useful type keeps fakes trivial to write
//
// 3. Why impl Into<String> in constructors?
//    - Callers can pass either &str or String without extra .to_string() calls
//    - The conversion happens once, inside the constructor
// -----------------------------------------------------------------------------
