// src/core/sanitize.rs

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Collapse runs of whitespace (including NBSP) to one space and trim.
pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space { out.push(' '); prev_space = true; }
        } else { out.push(ch); prev_space = false; }
    }
    out.trim().to_string()
}

/// Parse the date formats the site uses into a calendar date.
///
/// Accepts ISO dates, RFC 3339 timestamps (`2025-01-20T17:00:00-05:00`, the offset's
/// local date is kept), naive timestamps, and long/short month names
/// (`January 20, 2025`, `Jan 20, 2025`).
pub fn parse_site_date(raw: &str) -> Option<NaiveDate> {
    let s = normalize_ws(raw);
    if s.is_empty() { return None; }

    if let Ok(dt) = DateTime::parse_from_rfc3339(&s) {
        return Some(dt.date_naive());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(&s, fmt) {
            return Some(dt.date());
        }
    }
    for fmt in ["%Y-%m-%d", "%B %d, %Y", "%b %d, %Y", "%B %e, %Y", "%m/%d/%Y"] {
        if let Ok(d) = NaiveDate::parse_from_str(&s, fmt) {
            return Some(d);
        }
    }
    None
}
