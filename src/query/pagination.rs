//! Pagination state and its URL codec.

use serde::{Deserialize, Serialize};

use crate::types::PrivilegeTier;

use super::UrlState;

pub const LIMIT_KEY: &str = "limit";
pub const OFFSET_KEY: &str = "offset";

/// Built-in page sizes for the two privilege tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationDefaults {
    #[serde(default = "default_standard_limit")]
    pub standard_limit: u32,
    #[serde(default = "default_admin_limit")]
    pub admin_limit: u32,
}

fn default_standard_limit() -> u32 {
    20
}

fn default_admin_limit() -> u32 {
    50
}

impl Default for PaginationDefaults {
    fn default() -> Self {
        Self {
            standard_limit: default_standard_limit(),
            admin_limit: default_admin_limit(),
        }
    }
}

impl PaginationDefaults {
    pub fn limit_for(&self, tier: PrivilegeTier) -> u32 {
        match tier {
            PrivilegeTier::Standard => self.standard_limit,
            PrivilegeTier::Elevated => self.admin_limit,
        }
    }

    /// First page at the tier's page size
    pub fn for_tier(&self, tier: PrivilegeTier) -> PaginationState {
        PaginationState::new(self.limit_for(tier), 0)
    }
}

/// The current page window of a list.
///
/// `offset` is a multiple of `limit` in steady state. `count` is only known
/// once a fetch has resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationState {
    pub limit: u32,
    pub offset: u32,
    pub count: Option<u64>,
    redirected: bool,
}

impl PaginationState {
    pub fn new(limit: u32, offset: u32) -> Self {
        Self {
            limit: limit.max(1),
            offset,
            count: None,
            redirected: false,
        }
    }

    /// Read pagination from the URL, falling back to `default` for the caller's tier.
    pub fn decode(url: &UrlState, default: PaginationState) -> Self {
        let default = PaginationState::new(default.limit, default.offset);

        let limit = match url.get(LIMIT_KEY).map(|v| v.trim().parse::<i64>()) {
            None => default.limit,
            Some(Ok(limit)) if limit > 0 => u32::try_from(limit).unwrap_or(u32::MAX),
            Some(_) => return default.redirect(),
        };
        let offset = match url.get(OFFSET_KEY).map(|v| v.trim().parse::<i64>()) {
            None => default.offset,
            Some(Ok(offset)) if offset >= 0 => match u32::try_from(offset) {
                Ok(offset) => offset,
                Err(_) => return default.redirect(),
            },
            Some(_) => return default.redirect(),
        };

        let aligned = offset - offset % limit;
        let state = PaginationState::new(limit, aligned);
        if aligned != offset {
            state.redirect()
        } else {
            state
        }
    }

    /// Write `limit` and `offset`. `count` is derived and never written.
    pub fn encode(&self) -> UrlState {
        let mut url = UrlState::new();
        url.append(LIMIT_KEY, self.limit.to_string());
        url.append(OFFSET_KEY, self.offset.to_string());
        url
    }

    /// True when the URL carries either pagination key
    pub fn is_present(url: &UrlState) -> bool {
        url.contains(LIMIT_KEY) || url.contains(OFFSET_KEY)
    }

    fn redirect(mut self) -> Self {
        self.redirected = true;
        self
    }

    pub fn redirected(&self) -> bool {
        self.redirected
    }

    /// Consume the redirect signal. Returns true at most once per decode.
    pub fn take_redirect(&mut self) -> bool {
        std::mem::take(&mut self.redirected)
    }

    /// 1-based page number
    pub fn page(&self) -> u32 {
        self.offset / self.limit + 1
    }

    /// Number of pages, once the total count is known
    pub fn page_count(&self) -> Option<u64> {
        self.count
            .map(|count| count.div_ceil(u64::from(self.limit)).max(1))
    }

    /// Move to a 1-based page, keeping the page size
    pub fn with_page(mut self, page: u32) -> Self {
        self.offset = page.saturating_sub(1).saturating_mul(self.limit);
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit.max(1);
        self.offset -= self.offset % self.limit;
        self
    }

    pub fn first_page(self) -> Self {
        self.with_page(1)
    }

    /// Take the server's view of the window after a fetch resolves
    pub fn apply_meta(&mut self, limit: u32, offset: u32, count: u64) {
        if limit > 0 {
            self.limit = limit;
        }
        self.offset = offset;
        self.count = Some(count);
    }
}
