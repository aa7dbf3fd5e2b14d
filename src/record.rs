// src/record.rs
//
// - Candidate:   one listing entry, not yet confirmed as an order
// - DedupKey:    (title, date), the identity of a stored row
// - OrderRecord: the persisted unit; built once, never mutated

use std::fmt;

use chrono::{DateTime, Local, NaiveDate};
use url::Url;

use crate::core::sanitize::normalize_ws;

pub const DATE_FMT: &str = "%Y-%m-%d";
pub const TIMESTAMP_FMT: &str = "%Y-%m-%d %H:%M:%S";

/// What the listing page shows about an entry without following its link.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Candidate {
    pub title: String,
    pub url: Url,
    pub date: Option<NaiveDate>,
}

impl Candidate {
    /// Known before fetching only when the listing shows a date.
    pub fn key(&self) -> Option<DedupKey> {
        self.date.map(|d| DedupKey::new(&self.title, d))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DedupKey {
    title: String,
    date: NaiveDate,
}

impl DedupKey {
    /// Titles compare after whitespace normalisation.
    pub fn new(title: &str, date: NaiveDate) -> Self {
        Self { title: normalize_ws(title), date }
    }
    pub fn title(&self) -> &str { &self.title }
    pub fn date(&self) -> NaiveDate { self.date }
}

impl fmt::Display for DedupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.title, self.date.format(DATE_FMT))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct OrderRecord {
    title: String,
    published_date: NaiveDate,
    body_text: String,
    verified: bool,
    scraped_at: DateTime<Local>,
}

impl OrderRecord {
    pub fn new(
        title: &str,
        published_date: NaiveDate,
        body_text: String,
        verified: bool,
        scraped_at: DateTime<Local>,
    ) -> Self {
        Self {
            title: normalize_ws(title),
            published_date,
            body_text,
            verified,
            scraped_at,
        }
    }

    pub fn title(&self) -> &str { &self.title }
    pub fn published_date(&self) -> NaiveDate { self.published_date }
    pub fn body_text(&self) -> &str { &self.body_text }
    pub fn verified(&self) -> bool { self.verified }
    pub fn scraped_at(&self) -> DateTime<Local> { self.scraped_at }

    pub fn key(&self) -> DedupKey {
        DedupKey::new(&self.title, self.published_date)
    }
}
