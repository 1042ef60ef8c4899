// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Merge them with the environment configuration
// 3. Dispatch to the appropriate subcommand handler
// 4. Print the report and exit with proper code
//    (0 = healthy, 1 = findings, 2 = error)
//
// The crawl itself never fails: it always runs to completion and returns a
// best-effort report. Deciding that findings mean "failure" happens here,
// at the edge, so CI pipelines get a meaningful exit code.
// =============================================================================

// Module declarations - tells Rust about our other source files
mod checker; // src/checker/ - link and critical-page validation
mod cli; // src/cli.rs - command-line parsing
mod config; // src/config.rs - environment configuration
mod crawl; // src/crawl/ - website crawling logic
mod driver; // src/driver/ - browser-driver capability + HTTP impl

use clap::Parser;
use cli::{Cli, Commands};

// anyhow::Result is like std::result::Result but simpler for applications
// It lets us return any error type with the ? operator
use anyhow::Result;

use checker::{check_critical_pages, LinkValidator, PageCheckResult};
use config::{SiteConfig, CRITICAL_PAGES, SOCIAL_MEDIA_DOMAINS};
use crawl::{CrawlOptions, CrawlReport, SiteCrawler};
use driver::{HttpDriver, HttpProber};

// The #[tokio::main] attribute transforms our async main into a real main function
// It creates a tokio runtime and runs our async code inside it
#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // If an unexpected error occurred, print it and exit with code 2
            eprintln!("Error: {}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// This is the main application logic
// Returns:
//   Ok(0) = site is healthy
//   Ok(1) = page errors or broken links found
//   Err = unexpected error (becomes exit code 2)
async fn run() -> Result<i32> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Crawl {
            url,
            max_pages,
            timeout,
            skip_external,
            exclude,
            json,
        } => handle_crawl(url, max_pages, timeout, skip_external, exclude, json).await,
        Commands::Pages { url, paths, json } => handle_pages(url, paths, json).await,
    }
}

// Handles the 'crawl' subcommand: full site traversal + link validation
async fn handle_crawl(
    url: Option<String>,
    max_pages: Option<usize>,
    timeout: Option<u64>,
    skip_external: bool,
    exclude: Option<String>,
    json: bool,
) -> Result<i32> {
    // Environment first, CLI flags override
    let env = SiteConfig::from_env();
    let base_url = url.unwrap_or(env.base_url);

    let options = CrawlOptions {
        max_pages: max_pages.unwrap_or(env.max_pages),
        skip_external_links: skip_external || env.skip_external_links,
        exclude_patterns: exclude
            .map(|raw| config::split_patterns(&raw))
            .unwrap_or(env.exclude_patterns),
        ..CrawlOptions::default()
    };

    println!("🌐 Testing website: {}", base_url);

    let driver = HttpDriver::new(timeout.unwrap_or(env.timeout_ms))?;
    let prober = HttpProber::new()?;
    let validator = LinkValidator::new(
        prober,
        SOCIAL_MEDIA_DOMAINS.iter().map(|d| d.to_string()).collect(),
    );
    let crawler = SiteCrawler::new(driver, validator, base_url.clone(), options);

    let report = crawler.crawl(&base_url).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_crawl_summary(&report);
    }

    if report.is_clean() {
        println!(
            "\n🎉 All {} pages and their links are working correctly!",
            report.visited.len()
        );
        Ok(0)
    } else {
        Ok(1) // Exit code 1 = findings
    }
}

// Handles the 'pages' subcommand: critical pages must answer 200
async fn handle_pages(url: Option<String>, paths: Option<String>, json: bool) -> Result<i32> {
    let env = SiteConfig::from_env();
    let base_url = url.unwrap_or(env.base_url);

    let paths: Vec<String> = match paths {
        Some(raw) => config::split_patterns(&raw),
        None => CRITICAL_PAGES.iter().map(|p| p.to_string()).collect(),
    };

    let prober = HttpProber::new()?;
    let results = check_critical_pages(&prober, &base_url, &paths).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        print_page_results(&results);
    }

    // An unreachable page might simply be optional, so only a wrong HTTP
    // status counts as a failure
    let failed = results
        .iter()
        .filter(|r| !r.is_ok() && !r.is_unreachable())
        .count();

    if failed > 0 {
        Ok(1)
    } else {
        Ok(0)
    }
}

// Prints the crawl report the way the crawl logs read: a banner, the counts,
// then every finding itemized
fn print_crawl_summary(report: &CrawlReport) {
    println!("\n{}", "=".repeat(60));
    println!("📊 CRAWL SUMMARY");
    println!("{}", "=".repeat(60));
    println!("✅ Total pages checked: {}", report.visited.len());
    println!("❌ Pages with errors: {}", report.errors.len());
    println!("🔗 Broken links found: {}", report.broken_links.len());

    if !report.errors.is_empty() {
        println!("\n❌ PAGE ERRORS:");
        for error in &report.errors {
            println!("  • {}: {}", error.url, error.error);
        }
    }

    if !report.broken_links.is_empty() {
        println!("\n🔗 BROKEN LINKS:");
        for broken in &report.broken_links {
            println!("  • {}", broken.page);
            println!("    Link: {}", broken.link);
            println!("    Text: \"{}\"", broken.text);
            match broken.status {
                Some(status) => println!("    Error: {}", status),
                None => println!("    Error: {}", broken.error.as_deref().unwrap_or("unknown")),
            }
            println!();
        }
    }
}

// Prints critical-page results as a small table
fn print_page_results(results: &[PageCheckResult]) {
    println!("{:<50} {:<10}", "PAGE", "STATUS");
    println!("{}", "=".repeat(60));

    for result in results {
        let status = match (result.status, &result.error) {
            (Some(200), _) => "✅ 200".to_string(),
            (Some(code), _) => format!("❌ {}", code),
            (None, Some(error)) => format!("ℹ️  {}", error),
            (None, None) => "ℹ️  unreachable".to_string(),
        };
        println!("{:<50} {:<10}", result.url, status);
    }

    let healthy = results.iter().filter(|r| r.is_ok()).count();
    println!("\n📊 {} of {} critical pages healthy", healthy, results.len());
}
