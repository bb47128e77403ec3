//! Indicator retrieval abstractions

use super::indicator::{Indicator, Observation};
use async_trait::async_trait;
use thiserror::Error;

/// Inclusive range of calendar years.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearRange {
    pub start: i32,
    pub end: i32,
}

/// One bulk request: every country and indicator over the whole year range.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    pub countries: Vec<String>,
    pub indicators: Vec<Indicator>,
    pub years: YearRange,
}

#[derive(Debug, Error)]
pub enum FetchError {
    /// The request never produced a response (connection, timeout).
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// The server answered with a non-success status.
    #[error("HTTP error {status} for {url}")]
    Status { status: u16, url: String },
    /// The API answered with its error envelope instead of data.
    #[error("API returned an error: {0}")]
    Api(String),
    /// The body did not have the expected shape.
    #[error("Malformed response: {0}")]
    Malformed(String),
    /// The result spans more pages than were retrieved.
    #[error("Result spans {pages} pages and only the first was retrieved; raise provider.per_page")]
    Truncated { pages: u64, total: Option<u64> },
}

#[async_trait]
pub trait IndicatorSource: Send + Sync {
    /// Returns every observation for the request. An empty result is not an error.
    async fn fetch(&self, request: &FetchRequest) -> Result<Vec<Observation>, FetchError>;
}
