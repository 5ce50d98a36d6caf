use thiserror::Error;

use crate::list::Refusal;
use crate::remote::RemoteError;

#[derive(Error, Debug)]
pub enum RbacError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("authentication error: {0}")]
    Auth(String),

    #[error("remote error: {0}")]
    Remote(#[from] RemoteError),

    #[error("action refused: {0}")]
    Refused(#[from] Refusal),

    #[error("unknown filter '{0}' for {1} list")]
    InvalidFilter(String, &'static str),

    #[error("column {0} of the {1} list is not sortable")]
    InvalidColumn(usize, &'static str),

    #[error("invalid {0} '{1}'. Must be one of: {2}")]
    InvalidValue(&'static str, String, String),

    #[error("invalid query string '{0}': {1}")]
    InvalidQuery(String, String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, RbacError>;
