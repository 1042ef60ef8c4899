// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// clap is a popular Rust library for parsing command-line arguments.
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things).
//
// Every option can also come from the environment (see src/config.rs);
// that's why most flags here are Option<...> - None means "not given on the
// command line, fall back to the environment or the default".
// =============================================================================

use clap::{Parser, Subcommand};

// This struct represents our entire CLI application
//
// #[derive(Parser)] tells clap to automatically generate parsing code
// The #[command(...)] attributes configure how the CLI behaves
#[derive(Parser, Debug)]
#[command(
    name = "site-sentinel",
    version = "0.1.0",
    about = "Crawl a live website and validate every page and link",
    long_about = "site-sentinel smoke-tests a live website: it crawls every reachable internal \
                  page and verifies that each discovered link (internal or external) resolves \
                  without an HTTP error. Perfect for CI/CD pipelines that should fail when a \
                  deployment breaks a page or a link goes stale."
)]
pub struct Cli {
    // The #[command(subcommand)] attribute tells clap that this field
    // will hold one of the subcommands defined in the Commands enum
    #[command(subcommand)]
    pub command: Commands,
}

// This enum defines our subcommands (crawl, pages)
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Crawl the whole site and validate every discovered link
    ///
    /// Example: site-sentinel crawl https://example.com --max-pages 100
    Crawl {
        /// Website URL to crawl (falls back to the BASE_URL environment
        /// variable, then to the built-in default)
        url: Option<String>,

        /// Maximum number of pages to visit (env: MAX_PAGES, default: 50)
        #[arg(long)]
        max_pages: Option<usize>,

        /// Page navigation timeout in milliseconds (env: TIMEOUT, default: 30000)
        #[arg(long)]
        timeout: Option<u64>,

        /// Classify external links but never probe them over the network
        ///
        /// Useful for fast local runs (env: SKIP_EXTERNAL)
        #[arg(long)]
        skip_external: bool,

        /// Comma-separated URL substrings to exclude from the crawl
        ///
        /// Example: --exclude "/admin,/drafts" (env: EXCLUDE_PATTERNS)
        #[arg(long)]
        exclude: Option<String>,

        /// Output the crawl report in JSON format instead of a summary
        #[arg(long)]
        json: bool,
    },

    /// Check that the site's critical pages answer 200
    ///
    /// Example: site-sentinel pages https://example.com --paths "/,/about/"
    Pages {
        /// Website base URL (falls back to BASE_URL, then the default)
        url: Option<String>,

        /// Comma-separated page paths to check
        ///
        /// Defaults to the built-in critical page list
        #[arg(long)]
        paths: Option<String>,

        /// Output results in JSON format instead of a table
        #[arg(long)]
        json: bool,
    },
}
