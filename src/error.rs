//! Crate-wide error type.
//!
//! Most failures never leave the function that hits them: a page that cannot
//! be fetched is logged and skipped, a missing field becomes an empty string.
//! The variants here are what is left over for the callers that do need to
//! tell failures apart (the crawl-policy check inspects [`Error::Status`]) and
//! for the two conditions that end a run early.

use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{url} answered with HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Invalid selector `{selector}`: {reason}")]
    Selector { selector: String, reason: String },

    #[error("Crawl policy could not be parsed: {0}")]
    PolicyParse(String),

    #[error("Crawl policy disallows fetching {0}")]
    PolicyDisallows(String),

    #[error("No article URLs discovered for {0}; check the date or the site layout")]
    EmptyDiscovery(NaiveDate),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Config error: {0}")]
    Config(#[from] serde_yaml::Error),

    #[error("Invalid date path format `{0}`")]
    DateFormat(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Record store lock poisoned by a panicked writer")]
    StorePoisoned,
}

pub type Result<T> = std::result::Result<T, Error>;
