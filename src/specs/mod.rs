// src/specs/mod.rs
//! # Scraping "specs" module
//!
//! Page-specific knowledge of the publications site: *where the ground truth lives in
//! the HTML* and *how to read it*. Each spec owns one kind of page.
//!
//! ## What lives here
//! - **`listing`**: the presidential-actions index. Yields [`Candidate`]s
//!   (title, link, listing date) one page at a time and follows the pagination link.
//! - **`article`**: a single action's page. Produces the title, publish date, the
//!   formatted body text and the executive-order markers used for verification.
//!
//! ## What does **not** live here
//! - **Dedup and persistence**: `dedup` and `store` decide what is new and write it.
//! - **Run control**: `runner` sequences the stages and reports through `progress`.
//!
//! ## Conventions
//! - Selectors are parsed once per run (`ListingParser::new`, `ArticleParser::new`).
//! - Parsing is pure over `&str`/[`Page`](crate::core::Page) so it can be tested offline
//!   against captured fixtures.
//! - Relative links resolve against the *final* response URL.
//!
//! [`Candidate`]: crate::record::Candidate
pub mod article;
pub mod listing;

use scraper::Selector;

use crate::error::ParseError;

pub(crate) fn selector(css: &'static str) -> Result<Selector, ParseError> {
    Selector::parse(css).map_err(|e| ParseError::Selector { css, message: e.to_string() })
}
