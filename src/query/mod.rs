//! URL query state and the codecs that project list state into it.
//!
//! A list screen's filters and pagination are mirrored into the query string
//! of its location. The codecs here are pure: they read a [`UrlState`] and
//! produce typed state, or the reverse. Nothing in this module performs I/O.

use std::fmt;

use url::form_urlencoded;

use crate::error::{RbacError, Result};

pub mod filters;
pub mod location;
pub mod pagination;
pub mod sort;

pub use filters::{FilterKey, FilterKind, FilterSchema, FilterSet, FilterValue};
pub use location::Location;
pub use pagination::{PaginationDefaults, PaginationState};
pub use sort::{Column, SortDirection, SortState};

/// Ordered query-string parameters.
///
/// Keys may repeat; multi-select filters are written as one pair per value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlState {
    pairs: Vec<(String, String)>,
}

impl UrlState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a query string, with or without the leading `?`.
    pub fn parse(query: &str) -> Result<Self> {
        let trimmed = query.trim();
        let raw = trimmed.strip_prefix('?').unwrap_or(trimmed);

        if raw.contains('#') {
            return Err(RbacError::InvalidQuery(
                query.to_string(),
                "fragments are not part of the query".to_string(),
            ));
        }

        let pairs = form_urlencoded::parse(raw.as_bytes())
            .filter(|(key, _)| !key.is_empty())
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();

        Ok(Self { pairs })
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.pairs.iter().any(|(k, _)| k == key)
    }

    /// First value for `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Every value for `key`, in order of appearance
    pub fn get_all(&self, key: &str) -> Vec<&str> {
        self.pairs
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((key.into(), value.into()));
    }

    /// Replace every value of `key` with a single value
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.remove(key);
        self.pairs.push((key.to_string(), value.into()));
    }

    pub fn remove(&mut self, key: &str) {
        self.pairs.retain(|(k, _)| k != key);
    }

    /// Overlay `other` onto this state: every key present in `other` replaces
    /// all of its values here. Keys absent from `other` are kept.
    pub fn overlay(&mut self, other: &UrlState) {
        for key in other.keys() {
            self.remove(key);
        }
        self.pairs.extend(other.pairs.iter().cloned());
    }

    /// Distinct keys in order of first appearance
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = Vec::new();
        for (k, _) in &self.pairs {
            if !keys.contains(&k.as_str()) {
                keys.push(k);
            }
        }
        keys
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }
}

impl fmt::Display for UrlState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let encoded = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs.iter())
            .finish();
        f.write_str(&encoded)
    }
}
