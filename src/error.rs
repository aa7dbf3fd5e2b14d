// src/error.rs
//
// Error taxonomy for a run:
// - FetchError:      network / HTTP failure for one URL
// - ParseError:      page structure not as expected
// - ExtractionError: one article's record could not be produced
// - ListingError:    the listing could not be read (fatal on the first page)
// - StoreError:      the CSV store could not be read or appended to
// - RunError:        what ends a run in FAILED

use std::path::PathBuf;

use thiserror::Error;

use crate::core::retry::Transient;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("timed out fetching {url}")]
    Timeout { url: String },

    #[error("could not connect to {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("transport error for {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("could not build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

impl FetchError {
    /// Map a `reqwest` failure for `url` onto the taxonomy.
    pub fn from_reqwest(url: &str, e: reqwest::Error) -> Self {
        let url = url.to_string();
        if e.is_timeout() {
            FetchError::Timeout { url }
        } else if e.is_connect() {
            FetchError::Connect { url, source: e }
        } else if let Some(status) = e.status() {
            FetchError::Status { url, status: status.as_u16() }
        } else {
            FetchError::Transport { url, source: e }
        }
    }
}

impl Transient for FetchError {
    fn is_transient(&self) -> bool {
        match self {
            FetchError::Status { status, .. } => *status >= 500 || *status == 429,
            FetchError::Timeout { .. }
            | FetchError::Connect { .. }
            | FetchError::Transport { .. } => true,
            FetchError::Client(_) => false,
        }
    }
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid selector `{css}`: {message}")]
    Selector { css: &'static str, message: String },

    #[error("no entries found on {url} (site structure may have changed)")]
    NoEntries { url: String },

    #[error("bad link `{href}`: {source}")]
    BadLink {
        href: String,
        #[source]
        source: url::ParseError,
    },
}

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("no title found on {url}")]
    MissingTitle { url: String },

    #[error("no publish date on listing or article for {url}")]
    MissingDate { url: String },

    #[error("no body text found on {url}")]
    EmptyBody { url: String },

    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl Transient for ExtractionError {
    fn is_transient(&self) -> bool {
        match self {
            ExtractionError::Fetch(e) => e.is_transient(),
            // A partially rendered page gets another chance.
            ExtractionError::MissingTitle { .. }
            | ExtractionError::MissingDate { .. }
            | ExtractionError::EmptyBody { .. } => true,
            ExtractionError::Parse(ParseError::Selector { .. }) => false,
            ExtractionError::Parse(_) => true,
        }
    }
}

#[derive(Debug, Error)]
pub enum ListingError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl Transient for ListingError {
    fn is_transient(&self) -> bool {
        match self {
            ListingError::Fetch(e) => e.is_transient(),
            ListingError::Parse(ParseError::NoEntries { .. }) => true,
            ListingError::Parse(_) => false,
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error on {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("append to {path} failed ({source}) and the partial rows could not be removed: {rollback}")]
    PartialAppend {
        path: PathBuf,
        #[source]
        source: std::io::Error,
        rollback: std::io::Error,
    },

    #[error("{path} has header {found:?}; expected {expected:?}")]
    HeaderMismatch {
        path: PathBuf,
        found: Vec<String>,
        expected: Vec<String>,
    },
}

#[derive(Debug, Error)]
pub enum RunError {
    #[error("listing unavailable: {0}")]
    Listing(#[from] ListingError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}
