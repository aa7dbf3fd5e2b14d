// tests/common/mod.rs
// Shared fixtures: a scripted in-memory site and throwaway output paths.
#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use eo_scrape::config::ScrapeOptions;
use eo_scrape::core::net::{Fetch, Page};
use eo_scrape::core::retry::RetryPolicy;
use eo_scrape::error::FetchError;
use url::Url;

pub const LISTING: &str = "https://site.test/presidential-actions/";

enum Reply {
    Html(String),
    Status(u16),
    Timeout,
}

/// Answers GETs from a per-URL script. The last scripted reply for a URL repeats.
#[derive(Default)]
pub struct FakeSite {
    script: RefCell<HashMap<String, VecDeque<Reply>>>,
    calls: RefCell<HashMap<String, usize>>,
}

impl FakeSite {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(self, url: &str, reply: Reply) -> Self {
        self.script.borrow_mut().entry(url.to_string()).or_default().push_back(reply);
        self
    }

    pub fn page(self, url: &str, html: impl Into<String>) -> Self {
        self.push(url, Reply::Html(html.into()))
    }

    pub fn status(self, url: &str, status: u16) -> Self {
        self.push(url, Reply::Status(status))
    }

    pub fn timeout(self, url: &str) -> Self {
        self.push(url, Reply::Timeout)
    }

    pub fn calls(&self, url: &str) -> usize {
        self.calls.borrow().get(url).copied().unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.calls.borrow().values().sum()
    }
}

impl Fetch for FakeSite {
    fn get(&self, url: &Url) -> Result<Page, FetchError> {
        let key = url.to_string();
        *self.calls.borrow_mut().entry(key.clone()).or_default() += 1;

        let mut script = self.script.borrow_mut();
        let Some(queue) = script.get_mut(&key) else {
            return Err(FetchError::Status { url: key, status: 404 });
        };
        let reply = if queue.len() > 1 { queue.pop_front() } else { None };
        let reply = reply.as_ref().or(queue.front());

        match reply {
            Some(Reply::Html(body)) => Ok(Page { url: url.clone(), body: body.clone() }),
            Some(Reply::Status(status)) => Err(FetchError::Status { url: key, status: *status }),
            Some(Reply::Timeout) | None => Err(FetchError::Timeout { url: key }),
        }
    }
}

/// One listing entry: (title, href, ISO date or "" for undated).
pub fn listing_html(entries: &[(&str, &str, &str)], next: Option<&str>) -> String {
    let mut html = String::from("<html><body><main><ul class=\"wp-block-post-template\">");
    for (title, href, date) in entries {
        html.push_str(&format!(
            "<li class=\"wp-block-post\"><h2 class=\"wp-block-post-title\"><a href=\"{href}\">{title}</a></h2>"
        ));
        if !date.is_empty() {
            html.push_str(&format!(
                "<div class=\"wp-block-post-date\"><time datetime=\"{date}T12:00:00-05:00\">{date}</time></div>"
            ));
        }
        html.push_str("</li>");
    }
    html.push_str("</ul>");
    if let Some(next) = next {
        html.push_str(&format!("<a class=\"wp-block-query-pagination-next\" href=\"{next}\">Next</a>"));
    }
    html.push_str("</main></body></html>");
    html
}

/// An article page filed under the executive-orders category, one `<p>` per paragraph.
pub fn article_html(title: &str, date: Option<&str>, paragraphs: &[&str]) -> String {
    let meta = date
        .map(|d| format!("<meta property=\"article:published_time\" content=\"{d}T12:00:00+00:00\">"))
        .unwrap_or_default();
    let body: String = paragraphs.iter().map(|p| format!("<p>{p}</p>")).collect();
    format!(
        "<html><head><title>{title} | The White House</title>{meta}</head><body>\
         <nav><p>Menu</p></nav>\
         <main><h1>{title}</h1>\
         <div class=\"taxonomy-category\"><a href=\"/presidential-actions/executive-orders/\">Executive Orders</a></div>\
         <div class=\"entry-content\">{body}</div></main>\
         <footer><p>Footer</p></footer></body></html>"
    )
}

/// A press-release style page: no executive-order markers anywhere.
pub fn plain_article_html(title: &str, text: &str) -> String {
    format!(
        "<html><body><main><h1>{title}</h1><div class=\"entry-content\"><p>{text}</p></div></main></body></html>"
    )
}

/// A fact sheet filed under its own category whose text mentions an order.
pub fn fact_sheet_html(title: &str, text: &str) -> String {
    format!(
        "<html><body><main><h1>{title}</h1>\
         <div class=\"taxonomy-category\"><a href=\"/presidential-actions/fact-sheets/\">Fact Sheets</a></div>\
         <div class=\"entry-content\"><p>{text}</p></div></main></body></html>"
    )
}

pub fn url(path: &str) -> String {
    format!("https://site.test{path}")
}

pub fn tmp_dir(name: &str) -> PathBuf {
    let mut p = std::env::temp_dir();
    p.push(format!("eo_scrape_{}_{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&p);
    fs::create_dir_all(&p).unwrap();
    p
}

/// Options pointed at the fake site, with no waiting anywhere.
pub fn options(out: PathBuf) -> ScrapeOptions {
    ScrapeOptions {
        listing_url: LISTING.to_string(),
        out_path: out,
        retry: RetryPolicy::immediate(3),
        request_pause: Duration::ZERO,
        ..ScrapeOptions::default()
    }
}

/// Data rows of a CSV file, header excluded.
pub fn rows(path: &PathBuf) -> Vec<Vec<String>> {
    let mut rdr = csv::Reader::from_path(path).unwrap();
    rdr.records()
        .map(|r| r.unwrap().iter().map(str::to_string).collect())
        .collect()
}
