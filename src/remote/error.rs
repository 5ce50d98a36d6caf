//! Errors reported by the RBAC backend.
//!
//! The backend answers a rejected request with a body of the form
//! `{"errors": [{"status": "400", "source": "...", "detail": "..."}]}`.
//! Callers inspect the first entry to recognize the few error shapes that
//! get special treatment (a malformed identifier, a duplicate group name).

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Source suffix the backend uses for identifier validation failures
const UUID_VALIDATION_SOURCE: &str = "uuid validation";

/// One entry of the backend's `errors` array
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    errors: Vec<ErrorDetail>,
}

/// A rejected remote call
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct RemoteError {
    /// HTTP status, when the request reached the server
    pub status: Option<u16>,
    pub detail: Option<ErrorDetail>,
    pub message: String,
}

impl RemoteError {
    pub fn new(status: Option<u16>, message: impl Into<String>) -> Self {
        Self {
            status,
            detail: None,
            message: message.into(),
        }
    }

    /// An error with a structured backend detail
    pub fn with_detail(status: u16, source: &str, detail: &str) -> Self {
        Self {
            status: Some(status),
            detail: Some(ErrorDetail {
                status: Some(status.to_string()),
                source: Some(source.to_string()),
                detail: Some(detail.to_string()),
            }),
            message: format!("HTTP {status}: {detail}"),
        }
    }

    /// Build an error from a non-2xx response body
    pub fn from_response(status: u16, body: &str) -> Self {
        let detail = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.errors.into_iter().next());

        let text = detail
            .as_ref()
            .and_then(|d| d.detail.clone())
            .or_else(|| {
                let trimmed = body.trim();
                (!trimmed.is_empty()).then(|| truncate(trimmed, 200))
            })
            .unwrap_or_else(|| "request failed".to_string());

        Self {
            status: Some(status),
            detail,
            message: format!("HTTP {status}: {text}"),
        }
    }

    /// Status from the body when present, otherwise the HTTP status
    fn effective_status(&self) -> Option<u16> {
        self.detail
            .as_ref()
            .and_then(|d| d.status.as_deref())
            .and_then(|s| s.trim().parse().ok())
            .or(self.status)
    }

    fn source(&self) -> Option<&str> {
        self.detail.as_ref().and_then(|d| d.source.as_deref())
    }

    /// A malformed identifier was rejected (e.g. a bad group uuid in a deep link)
    pub fn is_bad_identifier(&self) -> bool {
        self.effective_status() == Some(400)
            && self
                .source()
                .is_some_and(|s| s.trim().ends_with(UUID_VALIDATION_SOURCE))
    }

    /// A group with the requested name already exists
    pub fn is_name_conflict(&self) -> bool {
        self.effective_status() == Some(400) && self.source() == Some("name")
    }

    pub fn is_not_found(&self) -> bool {
        self.status == Some(404)
    }
}

impl From<reqwest::Error> for RemoteError {
    fn from(err: reqwest::Error) -> Self {
        let status = err.status().map(|s| s.as_u16());
        let message = if err.is_timeout() {
            format!("request timed out: {err}")
        } else {
            err.to_string()
        };
        Self::new(status, message)
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
