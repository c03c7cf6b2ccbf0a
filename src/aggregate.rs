//! Token aggregation across pages.
//!
//! Observations are first deduplicated within a page ([`PageObservations`]),
//! then merged into a [`TokenAggregator`] keyed by canonical value. A record's
//! usage count is always the size of its source URL set, so merging the same
//! page twice cannot inflate it.
//!
//! `merge` takes `&mut self`: callers that collect pages concurrently build
//! `PageObservations` in parallel and merge them through a single writer.

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::types::{CanonicalKey, ExtractedToken, TokenValue};

/// A single value seen on a page, tagged with the sub-category it came from.
#[derive(Debug, Clone)]
pub struct Observation<V> {
    pub key: String,
    pub value: V,
    pub category: &'static str,
    pub description: Option<String>,
}

impl<V: CanonicalKey> Observation<V> {
    pub fn new(value: V, category: &'static str) -> Self {
        Self {
            key: value.canonical_key(),
            value,
            category,
            description: None,
        }
    }
}

impl<V> Observation<V> {
    /// Prefixes the key so equal values under different scopes stay apart.
    pub fn scoped(mut self, scope: &str) -> Self {
        self.key = format!("{scope}::{}", self.key);
        self
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Observations for one page, deduplicated by canonical key.
#[derive(Debug)]
pub struct PageObservations<V> {
    url: String,
    seen: HashSet<String>,
    unique: Vec<Observation<V>>,
    total: usize,
}

impl<V> PageObservations<V> {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            seen: HashSet::new(),
            unique: Vec::new(),
            total: 0,
        }
    }

    /// Records an observation; repeats of a key on this page are counted but
    /// otherwise ignored (the first occurrence wins).
    pub fn push(&mut self, observation: Observation<V>) {
        self.total += 1;
        if self.seen.insert(observation.key.clone()) {
            self.unique.push(observation);
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Number of raw observations, repeats included.
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn unique_len(&self) -> usize {
        self.unique.len()
    }
}

/// Accumulated state for one canonical value.
#[derive(Debug, Clone)]
pub struct TokenRecord<V> {
    pub key: String,
    pub value: V,
    /// Sub-category of the first observation.
    pub category: &'static str,
    pub description: Option<String>,
    pub source_urls: BTreeSet<String>,
    /// Discovery position, used as the stable tie-breaker.
    pub order: usize,
}

impl<V> TokenRecord<V> {
    pub fn usage_count(&self) -> usize {
        self.source_urls.len()
    }

    /// Copies the record's bookkeeping onto a different value.
    pub fn with_value<U>(&self, value: U) -> TokenRecord<U> {
        TokenRecord {
            key: self.key.clone(),
            value,
            category: self.category,
            description: self.description.clone(),
            source_urls: self.source_urls.clone(),
            order: self.order,
        }
    }
}

#[derive(Debug)]
pub struct TokenAggregator<V> {
    index: HashMap<String, usize>,
    records: Vec<TokenRecord<V>>,
    observations: usize,
    pages: BTreeSet<String>,
}

impl<V> Default for TokenAggregator<V> {
    fn default() -> Self {
        Self {
            index: HashMap::new(),
            records: Vec::new(),
            observations: 0,
            pages: BTreeSet::new(),
        }
    }
}

impl<V> TokenAggregator<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges one page's deduplicated observations.
    pub fn merge(&mut self, page: PageObservations<V>) {
        let PageObservations {
            url, unique, total, ..
        } = page;
        self.observations += total;
        self.pages.insert(url.clone());

        for observation in unique {
            match self.index.get(&observation.key) {
                Some(&idx) => {
                    let record = &mut self.records[idx];
                    record.source_urls.insert(url.clone());
                    if record.description.is_none() {
                        record.description = observation.description;
                    }
                }
                None => {
                    let order = self.records.len();
                    self.index.insert(observation.key.clone(), order);
                    self.records.push(TokenRecord {
                        key: observation.key,
                        value: observation.value,
                        category: observation.category,
                        description: observation.description,
                        source_urls: BTreeSet::from([url.clone()]),
                        order,
                    });
                }
            }
        }
    }

    /// Total raw observations merged, within-page repeats included.
    pub fn observations(&self) -> usize {
        self.observations
    }

    /// Distinct pages merged so far.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[TokenRecord<V>] {
        &self.records
    }

    /// Names every record, drops those below `minimum_occurrences`, and sorts
    /// by usage count descending with discovery order breaking ties.
    ///
    /// `namer` receives all records in discovery order and must return one
    /// name per record, in the same order.
    pub fn finalize<F>(self, minimum_occurrences: usize, namer: F) -> Vec<ExtractedToken>
    where
        V: Into<TokenValue>,
        F: FnOnce(&[TokenRecord<V>]) -> Vec<String>,
    {
        let names = namer(&self.records);
        debug_assert_eq!(names.len(), self.records.len());

        let mut named: Vec<(usize, TokenRecord<V>, String)> = self
            .records
            .into_iter()
            .zip(names)
            .filter(|(record, _)| record.usage_count() >= minimum_occurrences)
            .map(|(record, name)| (record.order, record, name))
            .collect();

        named.sort_by(|a, b| {
            b.1.usage_count()
                .cmp(&a.1.usage_count())
                .then(a.0.cmp(&b.0))
        });

        named
            .into_iter()
            .map(|(_, record, name)| {
                ExtractedToken::new(name, record.category, record.value, record.source_urls)
                    .with_description(record.description)
            })
            .collect()
    }
}
