// src/driver/http.rs
// =============================================================================
// Production implementations of the driver capabilities, built on reqwest.
//
// HttpDriver plays the role of the browser: it fetches pages over plain HTTP
// (no JavaScript rendering) and extracts anchors from the HTML with the
// `scraper` crate.
//
// HttpProber issues the HEAD/GET link probes with a realistic browser header
// set. Some servers answer automated probes differently from browsers, so we
// present ourselves the way a browser would.
//
// Rust concepts:
// - Client reuse: One reqwest::Client per concern (connection pooling)
// - Interior mutability: Mutex<Option<String>> holds the "current page" body
// - Per-request timeouts: RequestBuilder::timeout overrides the client default
// =============================================================================

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONNECTION, DNT, USER_AGENT};
use reqwest::Client;
use scraper::{Html, Selector};
use std::sync::Mutex;
use std::time::Duration;

use super::{Anchor, DriverError, LinkProber, PageDriver, ProbeError};

// Header-only probes get the longer budget; the GET fallback fetches a body,
// so it gets a tighter one. Keep this asymmetry.
const HEAD_TIMEOUT_MS: u64 = 8_000;
const GET_TIMEOUT_MS: u64 = 6_000;

// The header set servers expect from a real browser
//
// Without a browser-like User-Agent many sites answer probes with 403 even
// though the link works fine for humans.
fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        USER_AGENT,
        HeaderValue::from_static("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36"),
    );
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
    );
    headers.insert(
        ACCEPT_LANGUAGE,
        HeaderValue::from_static("pt-PT,pt;q=0.9,en;q=0.8"),
    );
    headers.insert(DNT, HeaderValue::from_static("1"));
    headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
    headers
}

// Fetches pages and extracts their anchors
//
// Keeps the body of the last successful navigation so anchors() can parse it
// on demand, mirroring a browser's "current page".
pub struct HttpDriver {
    client: Client,
    current_body: Mutex<Option<String>>,
}

impl HttpDriver {
    // Creates a driver with the given navigation timeout (milliseconds)
    pub fn new(timeout_ms: u64) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .default_headers(browser_headers())
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        Ok(Self {
            client,
            current_body: Mutex::new(None),
        })
    }
}

#[async_trait]
impl PageDriver for HttpDriver {
    async fn navigate(&self, url: &str) -> Result<u16, DriverError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| DriverError::new(e.to_string()))?;

        let status = response.status().as_u16();

        // Keep the body even for error pages; the crawler decides whether the
        // page's links are worth extracting.
        let body = response
            .text()
            .await
            .map_err(|e| DriverError::new(e.to_string()))?;
        *self.current_body.lock().unwrap() = Some(body);

        Ok(status)
    }

    async fn anchors(&self) -> Result<Vec<Anchor>, DriverError> {
        let body = self.current_body.lock().unwrap();
        match body.as_ref() {
            Some(html) => Ok(parse_anchors(html)),
            None => Err(DriverError::new("no page loaded")),
        }
    }
}

// Extracts all <a href> elements from HTML, in document order
//
// href is kept exactly as written in the markup (relative links stay
// relative; the crawler resolves them against the current page), and the
// anchor text is trimmed.
fn parse_anchors(html: &str) -> Vec<Anchor> {
    let document = Html::parse_document(html);

    // A constant selector, known valid, so unwrap() is fine here
    let selector = Selector::parse("a[href]").unwrap();

    document
        .select(&selector)
        .filter_map(|element| {
            element.value().attr("href").map(|href| Anchor {
                href: href.to_string(),
                text: element.text().collect::<String>().trim().to_string(),
            })
        })
        .collect()
}

// Issues the external-link probes
pub struct HttpProber {
    client: Client,
}

impl HttpProber {
    pub fn new() -> anyhow::Result<Self> {
        // No client-level timeout: each probe carries its own budget
        let client = Client::builder()
            .default_headers(browser_headers())
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl LinkProber for HttpProber {
    async fn head(&self, url: &str) -> Result<u16, ProbeError> {
        let response = self
            .client
            .head(url)
            .timeout(Duration::from_millis(HEAD_TIMEOUT_MS))
            .send()
            .await
            .map_err(|e| ProbeError::new(e.to_string()))?;

        Ok(response.status().as_u16())
    }

    async fn get(&self, url: &str) -> Result<u16, ProbeError> {
        let response = self
            .client
            .get(url)
            .timeout(Duration::from_millis(GET_TIMEOUT_MS))
            .send()
            .await
            .map_err(|e| ProbeError::new(e.to_string()))?;

        Ok(response.status().as_u16())
    }
}
