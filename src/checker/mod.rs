// src/checker/mod.rs
// =============================================================================
// This module contains all link and page validation logic.
//
// Submodules:
// - link: Validates a single external link (HEAD probe, GET fallback,
//   social-media fast path, anti-bot handling)
// - pages: Checks that a fixed list of critical pages answers 200
//
// This file (mod.rs) is the module root - it ties everything together and
// exports the public API that other parts of our application can use.
// =============================================================================

// Declare submodules (tells Rust to include these files)
mod link;
mod pages;

// Re-export public items from submodules
// This lets users write `checker::LinkValidator` instead of
// `checker::link::LinkValidator`
pub use link::{LinkCategory, LinkValidator, LinkVerdict};
pub use pages::{check_critical_pages, PageCheckResult};
