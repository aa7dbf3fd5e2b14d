// src/config/options.rs
use std::{env, path::PathBuf, str::FromStr, time::Duration};

use thiserror::Error;

use super::consts::*;
use crate::core::retry::RetryPolicy;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var}={value:?} is not valid: {reason}")]
    Invalid { var: &'static str, value: String, reason: String },
}

/// Everything one scrape run needs to know.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScrapeOptions {
    /// First listing page; pagination starts here.
    pub listing_url: String,
    pub out_path: PathBuf,
    pub retry: RetryPolicy,
    /// Pause between consecutive article fetches.
    pub request_pause: Duration,
    pub max_pages: usize,
    pub verify: VerifyOptions,
}

impl Default for ScrapeOptions {
    fn default() -> Self {
        Self {
            listing_url: BASE_URL.to_string(),
            out_path: PathBuf::from(CSV_FILE),
            retry: RetryPolicy::default(),
            request_pause: Duration::from_millis(REQUEST_PAUSE_MS),
            max_pages: MAX_PAGES,
            verify: VerifyOptions::default(),
        }
    }
}

impl ScrapeOptions {
    /// Defaults with `EO_SCRAPE_*` environment overrides applied.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Same as [`ScrapeOptions::from_env`] but reads variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut opts = Self::default();

        if let Some(url) = lookup(ENV_URL) {
            url::Url::parse(&url).map_err(|e| ConfigError::Invalid {
                var: ENV_URL,
                value: url.clone(),
                reason: e.to_string(),
            })?;
            opts.listing_url = url;
        }
        if let Some(path) = lookup(ENV_CSV) {
            if path.trim().is_empty() {
                return Err(ConfigError::Invalid {
                    var: ENV_CSV,
                    value: path,
                    reason: "empty path".into(),
                });
            }
            opts.out_path = PathBuf::from(path);
        }
        if let Some(n) = parse_var::<u32>(&lookup, ENV_RETRIES)? {
            if n == 0 {
                return Err(ConfigError::Invalid {
                    var: ENV_RETRIES,
                    value: n.to_string(),
                    reason: "at least one attempt is required".into(),
                });
            }
            opts.retry.max_attempts = n;
        }
        if let Some(ms) = parse_var::<u64>(&lookup, ENV_PAUSE_MS)? {
            opts.request_pause = Duration::from_millis(ms);
        }
        if let Some(n) = parse_var::<usize>(&lookup, ENV_MAX_PAGES)? {
            opts.max_pages = n.max(1);
        }

        Ok(opts)
    }
}

fn parse_var<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(var) {
        None => Ok(None),
        Some(raw) => raw.trim().parse::<T>().map(Some).map_err(|e| ConfigError::Invalid {
            var,
            value: raw.clone(),
            reason: e.to_string(),
        }),
    }
}

/// Knobs for the "verified" heuristic.
///
/// A record is verified when its body has at least `min_body_chars` characters and,
/// if `require_marker` is set, at least one of `markers` (case-insensitive) shows up
/// in the page's category links, byline or title.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerifyOptions {
    pub min_body_chars: usize,
    pub require_marker: bool,
    /// Also look for markers in the opening of the body. Off by default: fact sheets and
    /// statements routinely mention orders in their text.
    pub scan_body: bool,
    pub markers: Vec<String>,
}

impl Default for VerifyOptions {
    fn default() -> Self {
        Self {
            min_body_chars: MIN_BODY_CHARS,
            require_marker: true,
            scan_body: false,
            markers: VERIFY_MARKERS.iter().map(|m| m.to_string()).collect(),
        }
    }
}
