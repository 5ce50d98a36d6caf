//! Filter state and its URL codec.
//!
//! Each list entity declares a fixed [`FilterSchema`]. A [`FilterSet`] only
//! ever holds declared keys with non-empty values; an absent key means
//! "no constraint".

use std::collections::BTreeMap;

use crate::error::{RbacError, Result};

use super::UrlState;

/// Shape of a filter value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    /// Free-text search box
    Text,
    /// Checkbox group; values keep their order
    Multi,
}

impl FilterKind {
    /// Bring a value into this kind's shape
    fn coerce(self, value: FilterValue) -> FilterValue {
        match (self, value) {
            (FilterKind::Text, FilterValue::Multi(values)) => {
                FilterValue::Text(values.into_iter().next().unwrap_or_default())
            }
            (FilterKind::Multi, FilterValue::Text(text)) => FilterValue::Multi(vec![text]),
            (_, value) => value,
        }
    }
}

/// A single declared filter key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterKey {
    pub name: &'static str,
    pub kind: FilterKind,
}

impl FilterKey {
    pub const fn text(name: &'static str) -> Self {
        Self {
            name,
            kind: FilterKind::Text,
        }
    }

    pub const fn multi(name: &'static str) -> Self {
        Self {
            name,
            kind: FilterKind::Multi,
        }
    }
}

/// Value of one filter key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    Text(String),
    Multi(Vec<String>),
}

impl FilterValue {
    pub fn text(value: impl Into<String>) -> Self {
        FilterValue::Text(value.into())
    }

    pub fn multi<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FilterValue::Multi(values.into_iter().map(Into::into).collect())
    }

    /// An empty value carries no constraint
    pub fn is_empty(&self) -> bool {
        match self {
            FilterValue::Text(text) => text.is_empty(),
            FilterValue::Multi(values) => values.iter().all(|v| v.is_empty()),
        }
    }

    /// Values as a list; a text value is a one-element list
    pub fn values(&self) -> Vec<&str> {
        match self {
            FilterValue::Text(text) => vec![text.as_str()],
            FilterValue::Multi(values) => values.iter().map(String::as_str).collect(),
        }
    }

    fn normalized(self) -> Option<Self> {
        let value = match self {
            FilterValue::Multi(values) => {
                FilterValue::Multi(values.into_iter().filter(|v| !v.is_empty()).collect())
            }
            other => other,
        };
        (!value.is_empty()).then_some(value)
    }
}

/// Active filter constraints of a list screen
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSet {
    values: BTreeMap<String, FilterValue>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn get(&self, key: &str) -> Option<&FilterValue> {
        self.values.get(key)
    }

    /// Text value of `key`, if set
    pub fn text(&self, key: &str) -> Option<&str> {
        match self.values.get(key) {
            Some(FilterValue::Text(text)) => Some(text),
            _ => None,
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Set `key`. An empty value removes the key.
    ///
    /// This does not check the key against a schema; use
    /// [`FilterSchema::merge`] for user-supplied changes.
    pub fn insert(&mut self, key: impl Into<String>, value: FilterValue) {
        let key = key.into();
        match value.normalized() {
            Some(value) => {
                self.values.insert(key, value);
            }
            None => {
                self.values.remove(&key);
            }
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: FilterValue) -> Self {
        self.insert(key, value);
        self
    }

    pub fn remove(&mut self, key: &str) -> Option<FilterValue> {
        self.values.remove(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FilterValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Keep only the listed keys
    pub fn retain_keys(&mut self, keys: &[&str]) {
        self.values.retain(|k, _| keys.contains(&k.as_str()));
    }
}

/// The declared filter keys of one list entity plus its default constraints
#[derive(Debug)]
pub struct FilterSchema {
    pub entity: &'static str,
    pub keys: &'static [FilterKey],
    /// Applied when the URL carries none of the declared keys
    pub defaults: &'static [(&'static str, &'static [&'static str])],
}

impl FilterSchema {
    pub fn key(&self, name: &str) -> Option<&FilterKey> {
        self.keys.iter().find(|k| k.name == name)
    }

    pub fn key_names(&self) -> Vec<&'static str> {
        self.keys.iter().map(|k| k.name).collect()
    }

    pub fn default_set(&self) -> FilterSet {
        let mut set = FilterSet::new();
        for (name, values) in self.defaults {
            if let Some(key) = self.key(name) {
                let value = key.kind.coerce(FilterValue::multi(values.iter().copied()));
                set.insert(*name, value);
            }
        }
        set
    }

    /// True when at least one declared key appears in the URL
    pub fn is_present(&self, url: &UrlState) -> bool {
        self.keys.iter().any(|k| url.contains(k.name))
    }

    /// Read the filter set from the URL.
    ///
    /// Undeclared keys are ignored. If no declared key is present at all the
    /// schema default applies; otherwise absent keys carry no constraint.
    pub fn decode(&self, url: &UrlState) -> FilterSet {
        if !self.is_present(url) {
            return self.default_set();
        }

        let mut set = FilterSet::new();
        for key in self.keys {
            if !url.contains(key.name) {
                continue;
            }
            let value = match key.kind {
                FilterKind::Text => FilterValue::text(url.get(key.name).unwrap_or_default()),
                FilterKind::Multi => FilterValue::multi(url.get_all(key.name)),
            };
            set.insert(key.name, value);
        }
        set
    }

    /// Write the filter set as URL parameters.
    ///
    /// A set equal to the default writes nothing. A set with no constraints
    /// whose default is non-empty writes the first default key with an empty
    /// value, so decoding does not bring the default back.
    pub fn encode(&self, filters: &FilterSet) -> UrlState {
        let mut url = UrlState::new();

        if *filters == self.default_set() {
            return url;
        }

        if filters.is_empty() {
            if let Some((name, _)) = self.defaults.first() {
                url.append(*name, "");
            }
            return url;
        }

        for key in self.keys {
            if let Some(value) = filters.get(key.name) {
                for v in value.values() {
                    url.append(key.name, v);
                }
            }
        }
        url
    }

    /// Apply a partial change. Keys in `patch` replace their current value
    /// (an empty value clears the key); unspecified keys are retained.
    ///
    /// Fails without changing `filters` if the patch names an undeclared key.
    pub fn merge<I, K>(&self, filters: &mut FilterSet, patch: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, FilterValue)>,
        K: Into<String>,
    {
        let mut changes = Vec::new();
        for (name, value) in patch {
            let name = name.into();
            let key = self
                .key(&name)
                .ok_or_else(|| RbacError::InvalidFilter(name.clone(), self.entity))?;
            changes.push((name, key.kind.coerce(value)));
        }

        for (name, value) in changes {
            filters.insert(name, value);
        }
        Ok(())
    }
}
