// src/runner.rs
// One run, start to finish:
//
//   START → FETCHING_LISTING → FILTERING → EXTRACTING* → WRITING → DONE
//
// Per-item failures never leave the EXTRACTING loop. Only the listing (first page) or
// the store can move the run to FAILED, and then nothing is written.

use std::{path::PathBuf, thread};

use chrono::Local;
use tracing::{debug, info};
use url::Url;

use crate::{
    config::ScrapeOptions,
    core::{net::Fetch, retry::with_retry},
    dedup::{self, Filtered},
    error::{ExtractionError, ListingError, ParseError, RunError},
    progress::{Level, NullProgress, Progress},
    record::{Candidate, OrderRecord},
    specs::{article::ArticleExtractor, listing::Listing},
    store::OrderStore,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunPhase {
    Start,
    FetchingListing,
    Filtering,
    Extracting,
    Writing,
    Done,
    Failed,
}

/// A candidate that was dropped after its retries ran out.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FailedItem {
    pub title: String,
    pub url: String,
    pub reason: String,
}

/// Summary of what a run did.
#[derive(Clone, Debug, Default)]
pub struct RunSummary {
    pub out_path: PathBuf,
    pub pages: usize,
    /// Entries seen across all listing pages.
    pub listed: usize,
    pub saved: usize,
    pub skipped: usize,
    pub unverified: usize,
    pub failed: Vec<FailedItem>,
}

/// Run the whole pipeline once against `fetch`.
/// `progress` can be None (no reporting) or Some(&mut impl Progress).
pub fn run<F: Fetch + ?Sized>(
    opts: &ScrapeOptions,
    fetch: &F,
    progress: Option<&mut dyn Progress>,
) -> Result<RunSummary, RunError> {
    let mut null = NullProgress;
    let progress: &mut dyn Progress = match progress {
        Some(p) => p,
        None => &mut null,
    };

    let result = run_stages(opts, fetch, progress);
    if let Err(e) = &result {
        debug!(error = %e, "run failed");
        progress.phase(RunPhase::Failed);
        progress.run_failed(e);
    }
    result
}

fn run_stages<F: Fetch + ?Sized>(
    opts: &ScrapeOptions,
    fetch: &F,
    progress: &mut dyn Progress,
) -> Result<RunSummary, RunError> {
    progress.phase(RunPhase::Start);

    let store = OrderStore::new(&opts.out_path);
    let snapshot = store.load_keys()?;
    if !store.exists() {
        progress.log(Level::Highlight, "No existing CSV found - starting fresh scrape");
    }
    let extractor = ArticleExtractor::new(opts.verify.clone())?;

    let mut summary = RunSummary { out_path: opts.out_path.clone(), ..Default::default() };

    // ---------- FETCHING_LISTING ----------
    progress.phase(RunPhase::FetchingListing);
    let (candidates, pages) = collect_listing(opts, fetch, progress)?;
    summary.pages = pages;
    summary.listed = candidates.len();
    info!(pages, listed = candidates.len(), "listing collected");

    // ---------- FILTERING ----------
    progress.phase(RunPhase::Filtering);
    let Filtered { fresh, skipped } = dedup::filter(candidates, &snapshot);
    summary.skipped = skipped.len();
    for c in &skipped {
        progress.item_skipped(c);
    }

    // ---------- EXTRACTING ----------
    progress.phase(RunPhase::Extracting);
    progress.begin(fresh.len());
    let mut claimed = snapshot;
    let mut records: Vec<OrderRecord> = Vec::with_capacity(fresh.len());
    let total = fresh.len();

    for (i, c) in fresh.iter().enumerate() {
        if i > 0 && !opts.request_pause.is_zero() {
            thread::sleep(opts.request_pause); // be polite
        }
        progress.item_started(i + 1, total, c);

        let extracted = with_retry(
            &opts.retry,
            |_| -> Result<OrderRecord, ExtractionError> {
                let page = fetch.get(&c.url)?;
                extractor.extract(&page, c, Local::now())
            },
            |a| progress.retrying(&c.url, a.number, a.max, a.error),
        );

        match extracted {
            Ok(record) => {
                // Undated listing entries only get their key here.
                if !claimed.insert(record.key()) {
                    summary.skipped += 1;
                    progress.item_skipped(c);
                    continue;
                }
                if !record.verified() {
                    summary.unverified += 1;
                }
                progress.item_done(&record);
                records.push(record);
            }
            Err(e) => {
                debug!(url = %c.url, error = %e, "giving up on candidate");
                progress.item_failed(c, &e);
                summary.failed.push(failed_item(c, &e));
            }
        }
    }

    // ---------- WRITING ----------
    progress.phase(RunPhase::Writing);
    summary.saved = store.append(&records)?;

    progress.phase(RunPhase::Done);
    progress.finish(&summary);
    Ok(summary)
}

/// Walk the listing pages. The first page must succeed; a later page failing ends
/// pagination with what was gathered so far.
fn collect_listing<F: Fetch + ?Sized>(
    opts: &ScrapeOptions,
    fetch: &F,
    progress: &mut dyn Progress,
) -> Result<(Vec<Candidate>, usize), ListingError> {
    let start = Url::parse(&opts.listing_url).map_err(|source| ParseError::BadLink {
        href: opts.listing_url.clone(),
        source,
    })?;
    let mut listing = Listing::new(fetch, start, &opts.retry, opts.max_pages)?;

    let mut all = Vec::new();
    while let Some(page) = listing.next_page(progress) {
        match page {
            Ok(page) => {
                progress.page_done(&page.url, page.candidates.len());
                all.extend(page.candidates);
            }
            Err(e) if listing.pages() <= 1 => return Err(e),
            Err(e) => {
                debug!(error = %e, "stopping pagination");
                progress.log(Level::Warning, &format!("Skipping remaining pages after fetch failure: {e}"));
                break;
            }
        }
    }
    Ok((all, listing.pages()))
}

fn failed_item(c: &Candidate, e: &dyn std::error::Error) -> FailedItem {
    FailedItem {
        title: c.title.clone(),
        url: c.url.to_string(),
        reason: e.to_string(),
    }
}
