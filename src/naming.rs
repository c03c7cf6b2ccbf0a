//! Semantic naming shared by every category.
//!
//! Each category maps a value to a base name (`spacing-4`, `shadow-lg`) and a
//! qualifier derived from the raw value. Names are assigned in ascending value
//! order: the first record claims its base name, later collisions fall back to
//! `{base}-{qualifier}` and then to a numeric counter. The result depends only
//! on the set of values, never on page order.

use std::cmp::Ordering;
use std::collections::HashSet;

use crate::aggregate::TokenRecord;
use crate::types::format_number;

/// Preferred name for a record plus the suffix used when it collides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameRequest {
    pub base: String,
    pub qualifier: String,
}

impl NameRequest {
    pub fn new(base: impl Into<String>, qualifier: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            qualifier: qualifier.into(),
        }
    }
}

/// Resolves requests, given in naming order, into unique names.
pub fn disambiguate(requests: &[NameRequest]) -> Vec<String> {
    let mut taken: HashSet<String> = HashSet::new();
    requests
        .iter()
        .map(|request| {
            let mut candidate = request.base.clone();
            if taken.contains(&candidate) && !request.qualifier.is_empty() {
                candidate = format!("{}-{}", request.base, request.qualifier);
            }
            if taken.contains(&candidate) {
                let stem = candidate.clone();
                let mut n = 2usize;
                while taken.contains(&candidate) {
                    candidate = format!("{stem}-{n}");
                    n += 1;
                }
            }
            taken.insert(candidate.clone());
            candidate
        })
        .collect()
}

/// Names records in ascending `magnitude` order (ties by canonical key) and
/// returns the names aligned with the input order.
pub fn assign_names<V, M, L>(records: &[TokenRecord<V>], magnitude: M, label: L) -> Vec<String>
where
    M: Fn(&TokenRecord<V>) -> f64,
    L: Fn(&TokenRecord<V>) -> NameRequest,
{
    let mut order: Vec<usize> = (0..records.len()).collect();
    order.sort_by(|&a, &b| {
        magnitude(&records[a])
            .total_cmp(&magnitude(&records[b]))
            .then_with(|| records[a].key.cmp(&records[b].key))
    });

    let requests: Vec<NameRequest> = order.iter().map(|&i| label(&records[i])).collect();
    let resolved = disambiguate(&requests);

    let mut names = vec![String::new(); records.len()];
    for (slot, name) in order.into_iter().zip(resolved) {
        names[slot] = name;
    }
    names
}

/// Kebab-safe rendering of a number: `2.5` -> `2-5`, `-4` -> `neg-4`.
pub fn number_slug(value: f64) -> String {
    let text = format_number(value.abs()).replace('.', "-");
    if value < 0.0 && text != "0" {
        format!("neg-{text}")
    } else {
        text
    }
}

/// Kebab-safe rendering of a value with a unit: `1.5rem` -> `1-5rem`.
pub fn value_slug(value: f64, unit: &str) -> String {
    format!("{}{}", number_slug(value), unit)
}

/// Lowercases and replaces anything outside `[a-z0-9]` with dashes.
pub fn kebab(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last_dash = true;
    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
            last_dash = false;
        } else if !last_dash {
            out.push('-');
            last_dash = true;
        }
    }
    while out.ends_with('-') {
        out.pop();
    }
    out
}

/// Places `value` into the first bucket whose upper bound it does not exceed.
pub fn bucket<'a>(value: f64, buckets: &[(f64, &'a str)], overflow: &'a str) -> &'a str {
    buckets
        .iter()
        .find(|(limit, _)| value.partial_cmp(limit) != Some(Ordering::Greater))
        .map(|(_, label)| *label)
        .unwrap_or(overflow)
}
