// src/specs/listing.rs
//! Scraping *spec* for the listing (index) pages.
//!
//! Markup, per entry:
//! ```html
//! <li class="wp-block-post ...">
//!   <h2 class="wp-block-post-title"><a href="https://.../slug/">Title</a></h2>
//!   <div class="wp-block-post-date"><time datetime="2025-01-20T17:00:00-05:00">January 20, 2025</time></div>
//! </li>
//! ```
//! followed by `<a class="wp-block-query-pagination-next" href="...page/2/">`.
//!
//! A page with no entries is a [`ParseError::NoEntries`]: the site structure changed
//! or the page is a placeholder.

use std::collections::HashSet;

use chrono::NaiveDate;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};
use url::Url;

use super::selector;
use crate::core::net::{Fetch, Page};
use crate::core::retry::{RetryPolicy, with_retry};
use crate::core::sanitize::{normalize_ws, parse_site_date};
use crate::error::{ListingError, ParseError};
use crate::progress::Progress;
use crate::record::Candidate;

/// One parsed listing page.
#[derive(Clone, Debug)]
pub struct ListingPage {
    pub url: Url,
    pub candidates: Vec<Candidate>,
    pub next: Option<Url>,
}

pub struct ListingParser {
    entry: Selector,
    link: Selector,
    time: Selector,
    date_text: Selector,
    next: Selector,
}

impl ListingParser {
    pub fn new() -> Result<Self, ParseError> {
        Ok(Self {
            entry: selector("li.wp-block-post")?,
            link: selector("h2.wp-block-post-title a")?,
            time: selector("time")?,
            date_text: selector(".wp-block-post-date")?,
            next: selector("a.wp-block-query-pagination-next")?,
        })
    }

    pub fn parse(&self, page: &Page) -> Result<ListingPage, ParseError> {
        let doc = Html::parse_document(&page.body);

        let mut candidates = Vec::new();
        for entry in doc.select(&self.entry) {
            if let Some(c) = self.read_entry(entry, &page.url)? {
                candidates.push(c);
            }
        }
        if candidates.is_empty() {
            return Err(ParseError::NoEntries { url: page.url.to_string() });
        }

        let next = match doc.select(&self.next).next().and_then(|a| a.value().attr("href")) {
            Some(href) => Some(resolve(&page.url, href)?),
            None => None,
        };

        Ok(ListingPage { url: page.url.clone(), candidates, next })
    }

    fn read_entry(&self, entry: ElementRef<'_>, base: &Url) -> Result<Option<Candidate>, ParseError> {
        let Some(a) = entry.select(&self.link).next() else {
            return Ok(None);
        };
        let title = normalize_ws(&a.text().collect::<String>());
        let href = a.value().attr("href").map(str::trim).unwrap_or("");
        if title.is_empty() || href.is_empty() {
            debug!(%title, %href, "listing entry without title or link");
            return Ok(None);
        }

        Ok(Some(Candidate {
            title,
            url: resolve(base, href)?,
            date: self.read_date(entry),
        }))
    }

    fn read_date(&self, entry: ElementRef<'_>) -> Option<NaiveDate> {
        if let Some(t) = entry.select(&self.time).next() {
            let parsed = t
                .value()
                .attr("datetime")
                .and_then(parse_site_date)
                .or_else(|| parse_site_date(&t.text().collect::<String>()));
            if parsed.is_some() {
                return parsed;
            }
        }
        entry
            .select(&self.date_text)
            .next()
            .and_then(|d| parse_site_date(&d.text().collect::<String>()))
    }
}

fn resolve(base: &Url, href: &str) -> Result<Url, ParseError> {
    base.join(href).map_err(|source| ParseError::BadLink { href: href.to_string(), source })
}

/// The paginated listing, read lazily one page per [`Listing::next_page`] call.
///
/// Each page fetch+parse goes through the retry wrapper. Pagination ends when a page has
/// no next link, the next link was already visited, or `max_pages` is reached.
pub struct Listing<'a, F: Fetch + ?Sized> {
    fetch: &'a F,
    parser: ListingParser,
    retry: &'a RetryPolicy,
    next: Option<Url>,
    visited: HashSet<Url>,
    pages: usize,
    max_pages: usize,
}

impl<'a, F: Fetch + ?Sized> Listing<'a, F> {
    pub fn new(fetch: &'a F, start: Url, retry: &'a RetryPolicy, max_pages: usize) -> Result<Self, ParseError> {
        Ok(Self {
            fetch,
            parser: ListingParser::new()?,
            retry,
            next: Some(start),
            visited: HashSet::new(),
            pages: 0,
            max_pages: max_pages.max(1),
        })
    }

    /// Pages read so far.
    pub fn pages(&self) -> usize { self.pages }

    pub fn next_page(&mut self, progress: &mut dyn Progress) -> Option<Result<ListingPage, ListingError>> {
        let url = self.next.take()?;
        if self.pages >= self.max_pages {
            warn!(max = self.max_pages, %url, "page cap reached; not following further");
            return None;
        }
        if !self.visited.insert(url.clone()) {
            warn!(%url, "pagination loops back to a visited page");
            return None;
        }
        self.pages += 1;

        progress.page_started(&url);

        let fetch = self.fetch;
        let parser = &self.parser;
        let result = with_retry(
            self.retry,
            |_| -> Result<ListingPage, ListingError> {
                let page = fetch.get(&url)?;
                Ok(parser.parse(&page)?)
            },
            |a| progress.retrying(&url, a.number, a.max, a.error),
        );

        if let Ok(page) = &result {
            self.next = page.next.clone();
        }
        Some(result)
    }
}
