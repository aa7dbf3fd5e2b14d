// src/store.rs
// The persisted store: one append-only CSV file.
//
// Columns, fixed order: title, date, text, verified, scraped_timestamp.
// Rows are never rewritten; the only mutation is an append.

use std::{
    fs::{self, File, OpenOptions},
    io::{self, Read, Seek, SeekFrom, Write},
    path::{Path, PathBuf},
};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::dedup::KeySet;
use crate::error::StoreError;
use crate::record::{DATE_FMT, DedupKey, OrderRecord, TIMESTAMP_FMT};

pub const HEADER: [&str; 5] = ["title", "date", "text", "verified", "scraped_timestamp"];

#[derive(Debug, Serialize)]
struct RowOut<'a> {
    title: &'a str,
    date: String,
    text: &'a str,
    verified: bool,
    scraped_timestamp: String,
}

impl<'a> From<&'a OrderRecord> for RowOut<'a> {
    fn from(r: &'a OrderRecord) -> Self {
        Self {
            title: r.title(),
            date: r.published_date().format(DATE_FMT).to_string(),
            text: r.body_text(),
            verified: r.verified(),
            scraped_timestamp: r.scraped_at().format(TIMESTAMP_FMT).to_string(),
        }
    }
}

/// The part of a stored row the dedup snapshot needs.
#[derive(Debug, Deserialize)]
struct StoredKey {
    title: String,
    date: String,
}

pub struct OrderStore {
    path: PathBuf,
}

impl OrderStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path { &self.path }

    /// Present and non-empty.
    pub fn exists(&self) -> bool {
        fs::metadata(&self.path).map(|m| m.len() > 0).unwrap_or(false)
    }

    /// Snapshot of every (title, date) already stored. A missing file is an empty store.
    pub fn load_keys(&self) -> Result<KeySet, StoreError> {
        if !self.exists() {
            return Ok(KeySet::new());
        }

        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(&self.path)
            .map_err(|e| self.csv_err(e))?;

        let found: Vec<String> = rdr
            .headers()
            .map_err(|e| self.csv_err(e))?
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').to_string())
            .collect();
        if found != HEADER {
            return Err(StoreError::HeaderMismatch {
                path: self.path.clone(),
                found,
                expected: HEADER.iter().map(|h| h.to_string()).collect(),
            });
        }

        let mut keys = KeySet::new();
        for row in rdr.deserialize::<StoredKey>() {
            let row = row.map_err(|e| self.csv_err(e))?;
            match NaiveDate::parse_from_str(row.date.trim(), DATE_FMT) {
                Ok(date) => {
                    keys.insert(DedupKey::new(&row.title, date));
                }
                // Can never equal a key this crate produces.
                Err(_) => warn!(title = %row.title, date = %row.date, "stored row has an unreadable date"),
            }
        }
        debug!(path = %self.path.display(), keys = keys.len(), "loaded store snapshot");
        Ok(keys)
    }

    /// Append `records` in order. Creates the file with a header row if needed.
    ///
    /// All rows are serialised before the file is touched; if the write fails the
    /// file is cut back to its previous length, so a row is either whole or absent.
    pub fn append(&self, records: &[OrderRecord]) -> Result<usize, StoreError> {
        if records.is_empty() {
            return Ok(0);
        }
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                ensure_directory(parent).map_err(|e| self.io_err(e))?;
            }
        }

        let prior_len = fs::metadata(&self.path).map(|m| m.len()).unwrap_or(0);
        let mut buf: Vec<u8> = Vec::new();
        if prior_len > 0 && !self.ends_with_newline().map_err(|e| self.io_err(e))? {
            buf.push(b'\n');
        }

        {
            let mut wtr = csv::WriterBuilder::new()
                .has_headers(false)
                .terminator(csv::Terminator::Any(b'\n'))
                .from_writer(&mut buf);
            if prior_len == 0 {
                wtr.write_record(HEADER).map_err(|e| self.csv_err(e))?;
            }
            for r in records {
                wtr.serialize(RowOut::from(r)).map_err(|e| self.csv_err(e))?;
            }
            wtr.flush().map_err(|e| self.io_err(e))?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| self.io_err(e))?;

        write_or_restore(&mut file, &buf, prior_len).map_err(|f| self.write_err(f))?;

        debug!(path = %self.path.display(), rows = records.len(), "appended");
        Ok(records.len())
    }

    fn ends_with_newline(&self) -> io::Result<bool> {
        let mut f = File::open(&self.path)?;
        f.seek(SeekFrom::End(-1))?;
        let mut last = [0u8; 1];
        f.read_exact(&mut last)?;
        Ok(last[0] == b'\n')
    }

    fn write_err(&self, failure: WriteFailure) -> StoreError {
        match failure.rollback {
            None => self.io_err(failure.write),
            Some(rollback) => {
                warn!(path = %self.path.display(), error = %rollback, "could not cut back a partial append");
                StoreError::PartialAppend { path: self.path.clone(), source: failure.write, rollback }
            }
        }
    }

    fn io_err(&self, source: io::Error) -> StoreError {
        StoreError::Io { path: self.path.clone(), source }
    }

    fn csv_err(&self, source: csv::Error) -> StoreError {
        StoreError::Csv { path: self.path.clone(), source }
    }
}

/// Where an append lands. `truncate` restores the length seen before the append.
trait AppendTarget: Write {
    fn sync(&mut self) -> io::Result<()>;
    fn truncate(&mut self, len: u64) -> io::Result<()>;
}

impl AppendTarget for File {
    fn sync(&mut self) -> io::Result<()> { self.sync_all() }
    fn truncate(&mut self, len: u64) -> io::Result<()> { self.set_len(len) }
}

struct WriteFailure {
    write: io::Error,
    rollback: Option<io::Error>,
}

/// Write `buf` whole, or cut the target back to `prior_len`.
fn write_or_restore<T: AppendTarget>(target: &mut T, buf: &[u8], prior_len: u64) -> Result<(), WriteFailure> {
    let written = target.write_all(buf).and_then(|_| target.flush()).and_then(|_| target.sync());
    match written {
        Ok(()) => Ok(()),
        Err(write) => Err(WriteFailure { write, rollback: target.truncate(prior_len).err() }),
    }
}

pub fn ensure_directory(dir: &Path) -> io::Result<()> {
    if dir.exists() && !dir.is_dir() {
        return Err(io::Error::other(format!(
            "Path exists but is not a directory: {}",
            dir.display()
        )));
    }
    if !dir.exists() { fs::create_dir_all(dir)?; }
    Ok(())
}
