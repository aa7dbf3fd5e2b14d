// src/progress.rs
//! Progress reporting for a run. Purely observational: nothing a sink does changes
//! control flow or data. The CLI prints coloured lines; tests record events.

use std::error::Error;
use std::io::{self, Stdout, Write};

use chrono::Local;
use colored::Colorize;
use url::Url;

use crate::record::{Candidate, OrderRecord, TIMESTAMP_FMT};
use crate::runner::{RunPhase, RunSummary};

pub trait Progress {
    /// The run moved to another stage.
    fn phase(&mut self, _phase: RunPhase) {}

    /// A listing page is about to be fetched.
    fn page_started(&mut self, _url: &Url) {}

    /// A listing page was read; `found` entries on it.
    fn page_done(&mut self, _url: &Url, _found: usize) {}

    /// Called before extraction with the number of new candidates.
    fn begin(&mut self, _total: usize) {}

    /// A network-bound attempt failed and will be retried.
    fn retrying(&mut self, _url: &Url, _attempt: u32, _max: u32, _error: &dyn Error) {}

    /// A candidate is already in the store (or was already handled this run).
    fn item_skipped(&mut self, _candidate: &Candidate) {}

    /// Extraction of candidate `index` (1-based) of `total` starts.
    fn item_started(&mut self, _index: usize, _total: usize, _candidate: &Candidate) {}

    /// A record was extracted and queued for writing.
    fn item_done(&mut self, _record: &OrderRecord) {}

    /// A candidate failed after retries and will not be written.
    fn item_failed(&mut self, _candidate: &Candidate, _error: &dyn Error) {}

    /// Free-form status line.
    fn log(&mut self, _level: Level, _msg: &str) {}

    /// The run reached DONE.
    fn finish(&mut self, _summary: &RunSummary) {}

    /// The run reached FAILED.
    fn run_failed(&mut self, _error: &dyn Error) {}
}

/// A no-op progress sink.
pub struct NullProgress;
impl Progress for NullProgress {}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    Info,
    Warning,
    Error,
    Success,
    Highlight,
}

/// Timestamped, colour-coded console lines: `[2025-01-20 17:00:00] message`.
pub struct ConsoleProgress<W: Write = Stdout> {
    out: W,
}

impl ConsoleProgress<Stdout> {
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write> ConsoleProgress<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, level: Level, msg: &str) {
        let painted = match level {
            Level::Info => msg.white(),
            Level::Warning => msg.yellow(),
            Level::Error => msg.red(),
            Level::Success => msg.green(),
            Level::Highlight => msg.cyan(),
        };
        // Console output is best-effort.
        let _ = writeln!(self.out, "[{}] {}", Local::now().format(TIMESTAMP_FMT), painted);
    }
}

impl<W: Write> Progress for ConsoleProgress<W> {
    fn phase(&mut self, phase: RunPhase) {
        match phase {
            RunPhase::FetchingListing => self.line(Level::Info, "Starting URL collection..."),
            RunPhase::Writing => self.line(Level::Info, "Writing new records..."),
            _ => {}
        }
    }

    fn page_started(&mut self, url: &Url) {
        self.line(Level::Info, &format!("Processing page: {url}"));
    }

    fn page_done(&mut self, _url: &Url, found: usize) {
        self.line(Level::Info, &format!("Page processed: found {found} entries"));
    }

    fn begin(&mut self, total: usize) {
        if total > 0 {
            self.line(Level::Success, &format!("Found {total} new Presidential Action URLs to process"));
        }
    }

    fn retrying(&mut self, url: &Url, attempt: u32, max: u32, error: &dyn Error) {
        self.line(Level::Warning, &format!("Attempt {attempt}/{max} failed for {url}: {error}"));
    }

    fn item_skipped(&mut self, candidate: &Candidate) {
        self.line(Level::Info, &format!("Already recorded: {}", candidate.title));
    }

    fn item_started(&mut self, index: usize, total: usize, candidate: &Candidate) {
        self.line(Level::Highlight, &format!("Processing item {index}/{total}: {}", candidate.url));
    }

    fn item_done(&mut self, record: &OrderRecord) {
        let tag = if record.verified() { "verified" } else { "unverified" };
        let title: String = record.title().chars().take(60).collect();
        let level = if record.verified() { Level::Success } else { Level::Warning };
        self.line(level, &format!("Extracted ({tag}): {title}"));
    }

    fn item_failed(&mut self, candidate: &Candidate, error: &dyn Error) {
        self.line(Level::Error, &format!("Failed {}: {error}", candidate.url));
    }

    fn log(&mut self, level: Level, msg: &str) {
        self.line(level, msg);
    }

    fn finish(&mut self, s: &RunSummary) {
        if s.saved == 0 && s.failed.is_empty() {
            self.line(Level::Warning, "No new Executive Orders found");
        } else if s.saved > 0 {
            self.line(Level::Success, &format!("Saved {} rows to {}", s.saved, s.out_path.display()));
        }
        self.line(Level::Success, "Scraping complete! Final stats:");
        self.line(Level::Info, &format!("Listed:     {}", s.listed));
        self.line(Level::Info, &format!("New:        {}", s.saved));
        self.line(Level::Info, &format!("Skipped:    {}", s.skipped));
        let failed_level = if s.failed.is_empty() { Level::Info } else { Level::Error };
        self.line(failed_level, &format!("Failed:     {}", s.failed.len()));
        self.line(Level::Info, &format!("Unverified: {}", s.unverified));
    }

    fn run_failed(&mut self, error: &dyn Error) {
        self.line(Level::Error, &format!("Run failed: {error}"));
        self.line(Level::Error, "Check: site structure / CSS selectors, network connection, output file");
    }
}
