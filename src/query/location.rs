//! The URL a routed list screen is mirrored into.

use std::fmt;

use crate::error::Result;

use super::UrlState;

/// Path plus query state of a list screen.
///
/// The list controller is the source of truth; the location is a derived
/// projection it writes to. Every write replaces the query and bumps
/// `revision`, so callers can tell whether a render rewrote the URL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    path: String,
    search: UrlState,
    revision: u64,
}

impl Location {
    pub fn new(path: impl Into<String>, search: UrlState) -> Self {
        Self {
            path: path.into(),
            search,
            revision: 0,
        }
    }

    /// Parse `/users?limit=20&offset=0`. A bare query string is accepted with an empty path.
    pub fn parse(href: &str) -> Result<Self> {
        let (path, query) = match href.split_once('?') {
            Some((path, query)) => (path, query),
            None if href.contains('=') => ("", href),
            None => (href, ""),
        };
        Ok(Self::new(path, UrlState::parse(query)?))
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn search(&self) -> &UrlState {
        &self.search
    }

    /// Number of times the query has been rewritten since construction
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn replace_search(&mut self, search: UrlState) {
        self.search = search;
        self.revision += 1;
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.search.is_empty() {
            write!(f, "{}", self.path)
        } else {
            write!(f, "{}?{}", self.path, self.search)
        }
    }
}
