// src/specs/article.rs
//! Scraping *spec* for a single presidential-action page.
//!
//! Purpose:
//! - Pull the title (`h1`, then `og:title`, then `<title>`), the publish date
//!   (`article:published_time`, then the first `time`), and the body text.
//! - Collect the surfaces that say whether the page is an Executive Order:
//!   category links (`.taxonomy-category a`), the topper byline and the title.
//!
//! Body text keeps paragraph structure: every outermost text block (`p`, `h2`–`h6`, `li`,
//! `pre`) under the content root becomes one whitespace-normalised paragraph, and
//! paragraphs are joined with a blank line.

use chrono::{DateTime, Local, NaiveDate};
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use super::selector;
use crate::config::VerifyOptions;
use crate::core::net::Page;
use crate::core::sanitize::{normalize_ws, parse_site_date};
use crate::error::{ExtractionError, ParseError};
use crate::record::{Candidate, OrderRecord};

const BLOCKS: &[&str] = &["p", "h2", "h3", "h4", "h5", "h6", "li", "pre"];
const SKIP: &[&str] = &["script", "style", "noscript", "nav", "header", "footer", "aside", "form"];
const BODY_MARKER_CHARS: usize = 600;

/// Everything read off one article page, before reconciliation with its listing entry.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Article {
    pub title: Option<String>,
    pub date: Option<NaiveDate>,
    pub body: String,
    /// Category hrefs/labels, byline and title, as found on the page.
    pub marker_text: Vec<String>,
}

impl Article {
    /// The "verified" heuristic: enough body text and, when required, a recognised
    /// executive-order marker in the category links, byline or title (and the opening of
    /// the body only with `scan_body`).
    pub fn verify(&self, opts: &VerifyOptions) -> bool {
        let body = self.body.trim();
        if body.is_empty() || body.chars().count() < opts.min_body_chars {
            return false;
        }
        if !opts.require_marker {
            return true;
        }

        let mut surfaces: Vec<String> = self.marker_text.iter().map(|s| s.to_lowercase()).collect();
        if opts.scan_body {
            let opening: String = body.chars().take(BODY_MARKER_CHARS).collect();
            surfaces.push(opening.to_lowercase());
        }

        opts.markers
            .iter()
            .map(|m| m.to_lowercase())
            .filter(|m| !m.is_empty())
            .any(|m| surfaces.iter().any(|s| s.contains(&m)))
    }
}

pub struct ArticleParser {
    h1: Selector,
    og_title: Selector,
    doc_title: Selector,
    published: Selector,
    time: Selector,
    roots: Vec<Selector>,
    blocks: Selector,
    category: Selector,
    byline: Selector,
}

impl ArticleParser {
    pub fn new() -> Result<Self, ParseError> {
        Ok(Self {
            h1: selector("h1")?,
            og_title: selector(r#"meta[property="og:title"]"#)?,
            doc_title: selector("title")?,
            published: selector(r#"meta[property="article:published_time"]"#)?,
            time: selector("time")?,
            roots: vec![
                selector(".entry-content")?,
                selector(".wp-block-post-content")?,
                selector("article")?,
                selector("main")?,
                selector("body")?,
            ],
            blocks: selector("p, h2, h3, h4, h5, h6, li, pre")?,
            category: selector(".taxonomy-category a")?,
            byline: selector("div.wp-block-whitehouse-topper__meta--byline")?,
        })
    }

    pub fn parse(&self, html: &str) -> Article {
        let doc = Html::parse_document(html);

        let h1 = doc.select(&self.h1).next().map(text_of).filter(|t| !t.is_empty());
        let title = h1
            .clone()
            .or_else(|| meta_content(&doc, &self.og_title))
            .or_else(|| doc.select(&self.doc_title).next().map(text_of).filter(|t| !t.is_empty()));

        let shown = doc.select(&self.time).find_map(|t| {
            t.value()
                .attr("datetime")
                .and_then(parse_site_date)
                .or_else(|| parse_site_date(&text_of(t)))
        });
        let date = match meta_content(&doc, &self.published) {
            // A UTC publish time can fall on the next day; the page's own `time` is local.
            Some(raw) => match DateTime::parse_from_rfc3339(&raw) {
                Ok(dt) if dt.offset().local_minus_utc() == 0 => shown.or(Some(dt.date_naive())),
                Ok(dt) => Some(dt.date_naive()),
                Err(_) => parse_site_date(&raw).or(shown),
            },
            None => shown,
        };

        let mut marker_text = Vec::new();
        for a in doc.select(&self.category) {
            if let Some(href) = a.value().attr("href") {
                marker_text.push(href.to_string());
            }
            marker_text.push(text_of(a));
        }
        marker_text.extend(doc.select(&self.byline).map(text_of));
        marker_text.extend(h1);

        Article { title, date, body: self.body_text(&doc), marker_text }
    }

    fn body_text(&self, doc: &Html) -> String {
        let Some(root) = self.roots.iter().find_map(|s| doc.select(s).next()) else {
            return String::new();
        };

        let paragraphs: Vec<String> = root
            .select(&self.blocks)
            .filter(|el| !inside_any(*el, root, BLOCKS) && !inside_any(*el, root, SKIP))
            .map(text_of)
            .filter(|t| !t.is_empty())
            .collect();

        if paragraphs.is_empty() {
            // Bare text directly in the root.
            return text_of(root);
        }
        paragraphs.join("\n\n")
    }
}

fn text_of(el: ElementRef<'_>) -> String {
    normalize_ws(&el.text().collect::<String>())
}

fn meta_content(doc: &Html, sel: &Selector) -> Option<String> {
    doc.select(sel)
        .next()
        .and_then(|m| m.value().attr("content"))
        .map(normalize_ws)
        .filter(|s| !s.is_empty())
}

/// True if any ancestor of `el` strictly below `root` is one of `names`.
fn inside_any(el: ElementRef<'_>, root: ElementRef<'_>, names: &[&str]) -> bool {
    for node in el.ancestors() {
        if node.id() == root.id() {
            break;
        }
        if let Some(e) = node.value().as_element() {
            if names.contains(&e.name()) {
                return true;
            }
        }
    }
    false
}

/// Turns a fetched article page plus its listing entry into an [`OrderRecord`].
pub struct ArticleExtractor {
    parser: ArticleParser,
    verify: VerifyOptions,
}

impl ArticleExtractor {
    pub fn new(verify: VerifyOptions) -> Result<Self, ParseError> {
        Ok(Self { parser: ArticleParser::new()?, verify })
    }

    pub fn parser(&self) -> &ArticleParser { &self.parser }

    /// Listing title and date win over what the article page says; the article only
    /// fills in what the listing did not show.
    pub fn extract(
        &self,
        page: &Page,
        candidate: &Candidate,
        scraped_at: DateTime<Local>,
    ) -> Result<OrderRecord, ExtractionError> {
        let article = self.parser.parse(&page.body);

        let title = if candidate.title.trim().is_empty() {
            article.title.clone()
        } else {
            Some(candidate.title.clone())
        }
        .ok_or_else(|| ExtractionError::MissingTitle { url: candidate.url.to_string() })?;

        if let (Some(listed), Some(own)) = (candidate.date, article.date) {
            if listed != own {
                debug!(url = %candidate.url, %listed, %own, "article date differs from listing; keeping listing date");
            }
        }
        let date = candidate
            .date
            .or(article.date)
            .ok_or_else(|| ExtractionError::MissingDate { url: candidate.url.to_string() })?;

        if article.body.trim().is_empty() {
            return Err(ExtractionError::EmptyBody { url: candidate.url.to_string() });
        }

        let verified = article.verify(&self.verify);
        Ok(OrderRecord::new(&title, date, article.body, verified, scraped_at))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::retry::Transient;

    fn parser() -> ArticleParser {
        ArticleParser::new().unwrap()
    }

    #[test]
    fn body_keeps_paragraphs_and_skips_chrome() {
        let html = r#"
            <html><body>
              <nav><p>Menu item</p></nav>
              <main>
                <h1>Some Order</h1>
                <div class="entry-content">
                  <p>By the authority   vested in me.</p>
                  <h2>Sec. 1</h2>
                  <ul><li><p>First item</p></li><li>Second item</li></ul>
                  <script>var x = 1;</script>
                </div>
              </main>
              <footer><p>Footer</p></footer>
            </body></html>
        "#;
        let a = parser().parse(html);
        assert_eq!(
            a.body,
            "By the authority vested in me.\n\nSec. 1\n\nFirst item\n\nSecond item"
        );
        assert_eq!(a.title.as_deref(), Some("Some Order"));
    }

    #[test]
    fn title_falls_back_to_meta_then_document_title() {
        let a = parser().parse(r#"<head><meta property="og:title" content="OG Title"><title>Doc</title></head>"#);
        assert_eq!(a.title.as_deref(), Some("OG Title"));
        let b = parser().parse("<head><title> Doc  Title </title></head><body></body>");
        assert_eq!(b.title.as_deref(), Some("Doc Title"));
    }

    #[test]
    fn date_prefers_published_meta() {
        let html = r#"
            <head><meta property="article:published_time" content="2025-02-03T10:00:00-05:00"></head>
            <body><time datetime="2024-12-31">Dec 31, 2024</time></body>
        "#;
        assert_eq!(parser().parse(html).date, NaiveDate::from_ymd_opt(2025, 2, 3));
        let html = r#"<head><meta property="article:published_time" content="2025-02-03T01:30:00Z"></head>"#;
        assert_eq!(parser().parse(html).date, NaiveDate::from_ymd_opt(2025, 2, 3));
        let html = r#"<body><time>March 4, 2025</time></body>"#;
        assert_eq!(parser().parse(html).date, NaiveDate::from_ymd_opt(2025, 3, 4));
    }

    #[test]
    fn utc_publish_time_defers_to_local_time_element() {
        // 21:30 Eastern on the 20th is already the 21st in UTC.
        let html = r#"
            <head><meta property="article:published_time" content="2025-01-21T02:30:00+00:00"></head>
            <body><time datetime="2025-01-20T21:30:00-05:00">January 20, 2025</time></body>
        "#;
        assert_eq!(parser().parse(html).date, NaiveDate::from_ymd_opt(2025, 1, 20));
    }

    #[test]
    fn verify_needs_body_and_marker() {
        let opts = VerifyOptions::default();
        let mut a = Article {
            body: s("Hello"),
            marker_text: vec![s("/presidential-actions/executive-orders/")],
            ..Default::default()
        };
        assert!(a.verify(&opts));

        a.marker_text = vec![s("Fact Sheets")];
        assert!(!a.verify(&opts));

        a.body = s("By the authority vested in me as President");
        assert!(!a.verify(&opts));
        assert!(a.verify(&VerifyOptions { scan_body: true, ..VerifyOptions::default() }));

        a.body = s("   ");
        assert!(!a.verify(&opts));
    }

    #[test]
    fn fact_sheet_mentioning_an_order_is_not_verified() {
        let html = r#"<body><main>
            <h1>Fact Sheet: President Signs Order on Trade</h1>
            <div class="taxonomy-category"><a href="/presidential-actions/fact-sheets/">Fact Sheets</a></div>
            <div class="entry-content"><p>Today, the President signed an Executive Order on trade.</p></div>
        </main></body>"#;
        let a = parser().parse(html);
        assert!(!a.body.is_empty());
        assert!(!a.verify(&VerifyOptions::default()));
    }

    #[test]
    fn verify_marker_requirement_is_optional() {
        let opts = VerifyOptions { min_body_chars: 3, require_marker: false, scan_body: false, markers: vec![] };
        let a = Article { body: s("Hello"), ..Default::default() };
        assert!(a.verify(&opts));
        let short = Article { body: s("Hi"), ..Default::default() };
        assert!(!short.verify(&opts));
    }

    fn candidate(title: &str, date: Option<NaiveDate>) -> Candidate {
        Candidate { title: s(title), url: url::Url::parse("https://x.gov/a/").unwrap(), date }
    }

    #[test]
    fn listing_title_and_date_win() {
        let html = r#"<head><meta property="article:published_time" content="2025-01-21"></head>
            <body><h1>Page Title</h1><div class="entry-content"><p>Text</p></div></body>"#;
        let page = Page { url: url::Url::parse("https://x.gov/a/").unwrap(), body: s(html) };
        let ex = ArticleExtractor::new(VerifyOptions::default()).unwrap();
        let listed = NaiveDate::from_ymd_opt(2025, 1, 20);

        let r = ex.extract(&page, &candidate("Listed  Title", listed), Local::now()).unwrap();
        assert_eq!(r.title(), "Listed Title");
        assert_eq!(Some(r.published_date()), listed);
        assert_eq!(r.body_text(), "Text");

        let r = ex.extract(&page, &candidate("", None), Local::now()).unwrap();
        assert_eq!(r.title(), "Page Title");
        assert_eq!(Some(r.published_date()), NaiveDate::from_ymd_opt(2025, 1, 21));
    }

    #[test]
    fn no_date_anywhere_is_an_error() {
        let page = Page { url: url::Url::parse("https://x.gov/a/").unwrap(), body: s("<h1>T</h1><p>x</p>") };
        let ex = ArticleExtractor::new(VerifyOptions::default()).unwrap();
        let err = ex.extract(&page, &candidate("T", None), Local::now()).unwrap_err();
        assert!(matches!(err, ExtractionError::MissingDate { .. }));
    }

    #[test]
    fn empty_body_is_a_retryable_error() {
        let page = Page {
            url: url::Url::parse("https://x.gov/a/").unwrap(),
            body: s(r#"<body><div class="entry-content">  </div></body>"#),
        };
        let ex = ArticleExtractor::new(VerifyOptions::default()).unwrap();
        let err = ex
            .extract(&page, &candidate("Order A", NaiveDate::from_ymd_opt(2025, 1, 20)), Local::now())
            .unwrap_err();
        assert!(matches!(err, ExtractionError::EmptyBody { .. }));
        assert!(err.is_transient());
    }

    #[test]
    fn unmarked_text_is_kept_unverified() {
        let page = Page {
            url: url::Url::parse("https://x.gov/a/").unwrap(),
            body: s(r#"<body><h1>Statement</h1><div class="entry-content"><p>Remarks.</p></div></body>"#),
        };
        let ex = ArticleExtractor::new(VerifyOptions::default()).unwrap();
        let r = ex
            .extract(&page, &candidate("Statement", NaiveDate::from_ymd_opt(2025, 1, 20)), Local::now())
            .unwrap();
        assert_eq!(r.body_text(), "Remarks.");
        assert!(!r.verified());
    }

    fn s(v: &str) -> String { v.to_string() }
}
