//! In-memory query store holding the latest collection run's records.
//!
//! The record set is kept behind an `Arc<[Quote]>` that is swapped as a whole
//! on [`QuoteStore::replace`]. Queries clone the `Arc` and work on that
//! snapshot, so a reader sees either the old set or the new one, never a
//! partially replaced set.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::{Arc, RwLock};

use crate::models::{Quote, QuoteStats};

/// Search and tag filter applied together.
///
/// Empty or absent criteria match everything. Both criteria follow the same
/// case rule.
#[derive(Debug, Clone, Default)]
pub struct QuoteQuery {
    /// Substring matched against text or author.
    pub search: Option<String>,
    /// Exact tag match against any of the quote's tags.
    pub tag: Option<String>,
    pub case_sensitive: bool,
}

impl QuoteQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, needle: impl Into<String>) -> Self {
        self.search = Some(needle.into());
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn case_sensitive(mut self) -> Self {
        self.case_sensitive = true;
        self
    }

    /// Whether a single quote satisfies both criteria.
    pub fn matches(&self, quote: &Quote) -> bool {
        self.matches_search(quote) && self.matches_tag(quote)
    }

    fn matches_search(&self, quote: &Quote) -> bool {
        let needle = match self.search.as_deref() {
            None | Some("") => return true,
            Some(needle) => needle,
        };
        if self.case_sensitive {
            quote.text.contains(needle) || quote.author.contains(needle)
        } else {
            let needle = needle.to_lowercase();
            quote.text.to_lowercase().contains(&needle)
                || quote.author.to_lowercase().contains(&needle)
        }
    }

    fn matches_tag(&self, quote: &Quote) -> bool {
        let wanted = match self.tag.as_deref() {
            None | Some("") => return true,
            Some(tag) => tag,
        };
        if self.case_sensitive {
            quote.tags.iter().any(|t| t == wanted)
        } else {
            let wanted = wanted.to_lowercase();
            quote.tags.iter().any(|t| t.to_lowercase() == wanted)
        }
    }

    /// Apply the query to a record set, keeping insertion order.
    pub fn apply(&self, quotes: &[Quote]) -> Vec<Quote> {
        quotes.iter().filter(|q| self.matches(q)).cloned().collect()
    }
}

impl QuoteStats {
    /// Compute statistics over a record set.
    pub fn from_quotes(quotes: &[Quote]) -> Self {
        let authors: HashSet<&str> = quotes.iter().map(|q| q.author.as_str()).collect();

        let mut tag_frequency = BTreeMap::new();
        for tag in quotes.iter().flat_map(|q| &q.tags) {
            *tag_frequency.entry(tag.clone()).or_insert(0) += 1;
        }

        Self {
            total_quotes: quotes.len(),
            unique_authors: authors.len(),
            unique_tags: tag_frequency.len(),
            tag_frequency,
        }
    }
}

/// Process-scoped holder of the current record set.
///
/// Starts empty. Each successful scrape replaces the set wholesale; there is
/// no incremental merge.
#[derive(Debug, Default)]
pub struct QuoteStore {
    records: RwLock<Arc<[Quote]>>,
}

impl QuoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swap in a new record set, discarding the previous one.
    pub fn replace(&self, records: Vec<Quote>) {
        let records: Arc<[Quote]> = records.into();
        let mut guard = self
            .records
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = records;
    }

    /// The current record set.
    pub fn snapshot(&self) -> Arc<[Quote]> {
        self.records
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Case-insensitive substring search over text and author.
    pub fn search(&self, needle: &str) -> Vec<Quote> {
        self.query(&QuoteQuery::new().search(needle))
    }

    /// Case-insensitive exact tag filter. An empty tag returns everything.
    pub fn filter_by_tag(&self, tag: &str) -> Vec<Quote> {
        self.query(&QuoteQuery::new().tag(tag))
    }

    pub fn query(&self, query: &QuoteQuery) -> Vec<Quote> {
        query.apply(&self.snapshot())
    }

    /// Statistics over the current set, computed on every call.
    pub fn stats(&self) -> QuoteStats {
        QuoteStats::from_quotes(&self.snapshot())
    }

    /// Every tag used by the current set, sorted.
    pub fn list_tags(&self) -> BTreeSet<String> {
        self.snapshot()
            .iter()
            .flat_map(|q| q.tags.iter().cloned())
            .collect()
    }
}
