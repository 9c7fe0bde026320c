// src/specs/mod.rs
//! # Page specs
//!
//! One module per kind of remote page. Each spec knows *where the data lives
//! in the HTML* and nothing else: no fetching, no caching, no retry policy.
//!
//! ## What lives here
//! - **Search URL construction** for each directory (`search_url`).
//! - **Pure HTML parsing** of search result pages into profile links plus a
//!   pagination hint (`SearchPage`).
//! - **Profile parsing** into `model::Company`.
//! - **Website pages** (`website`): emails plus same-site links to follow.
//!
//! ## What does **not** live here
//! - Network access, robots.txt and retries (`core::net`).
//! - Crawl order, worker pools, resumable state (`scrape`, `store`).
//! - Export formatting (`file`, `csv`).
//!
//! ## Typical call chain
//! ```text
//! cli / gui → scrape::run → Fetch::get(search_url) → specs::<site>::parse_search
//!                        ↘ Fetch::get(profile)    → specs::<site>::parse_company
//! ```
//!
//! ## Conventions
//! - Missing fields come back as empty strings; `N/A` is an export concern.
//! - Links are absolute, fragment-free and deduplicated in page order.
//! - Selectors that fail to match are not errors. A profile with no `h1`
//!   still yields a record keyed by its URL.
//!
//! ## Testing notes
//! All specs are tested offline against inline HTML fixtures.
pub mod europages;
pub mod exportbureau;
pub mod website;

/// One page of directory search results.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchPage {
    pub links: Vec<String>,
    pub has_next: bool,
    /// Absolute URL of the next page when the site links it directly.
    pub next_url: Option<String>,
}
