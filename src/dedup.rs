// src/dedup.rs
// Snapshot of stored keys and the pure filter that drops candidates already recorded.

use std::collections::HashSet;

use crate::record::{Candidate, DedupKey};

/// Keys present in the store at run start, plus anything this run has claimed.
#[derive(Clone, Debug, Default)]
pub struct KeySet {
    keys: HashSet<DedupKey>,
}

impl KeySet {
    pub fn new() -> Self { Self::default() }

    pub fn contains(&self, key: &DedupKey) -> bool { self.keys.contains(key) }

    /// Returns false if the key was already present.
    pub fn insert(&mut self, key: DedupKey) -> bool { self.keys.insert(key) }

    pub fn len(&self) -> usize { self.keys.len() }
    pub fn is_empty(&self) -> bool { self.keys.is_empty() }
}

impl FromIterator<DedupKey> for KeySet {
    fn from_iter<I: IntoIterator<Item = DedupKey>>(iter: I) -> Self {
        Self { keys: iter.into_iter().collect() }
    }
}

/// Split of the listing into work and already-known entries, both in listing order.
#[derive(Clone, Debug, Default)]
pub struct Filtered {
    pub fresh: Vec<Candidate>,
    pub skipped: Vec<Candidate>,
}

/// Keep candidates whose key is absent from `existing`.
///
/// Two candidates with the same key: only the first is kept. Candidates the listing
/// shows without a date have no key yet and pass through; their key is checked once
/// the article supplies a date. Two undated candidates with the same link are treated
/// as the same entry.
pub fn filter<I>(candidates: I, existing: &KeySet) -> Filtered
where
    I: IntoIterator<Item = Candidate>,
{
    let mut out = Filtered::default();
    let mut seen_keys: HashSet<DedupKey> = HashSet::new();
    let mut seen_undated = HashSet::new();

    for c in candidates {
        let first = match c.key() {
            Some(key) => !existing.contains(&key) && seen_keys.insert(key),
            None => seen_undated.insert(c.url.clone()),
        };
        if first {
            out.fresh.push(c);
        } else {
            out.skipped.push(c);
        }
    }
    out
}
