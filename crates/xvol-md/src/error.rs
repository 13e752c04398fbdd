use std::time::Duration;

use chrono::NaiveDate;
use thiserror::Error;

/// Errors a [`crate::PriceDataSource`] may return.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SourceError {
    /// The source answered but holds no usable data for the request.
    #[error("no data for {ticker} on {date}: {reason}")]
    Unavailable {
        ticker: String,
        date: NaiveDate,
        reason: String,
    },
    /// The fetch did not complete within the configured bound.
    #[error("fetch for {ticker} timed out after {after:?}")]
    Timeout { ticker: String, after: Duration },
    /// Network or transport failure.
    #[error("transport error: {0}")]
    Transport(String),
    /// The upstream API returned an application-level error.
    #[error("provider api error{}: {message}", fmt_code(.code))]
    Api { code: Option<i64>, message: String },
    /// A response payload could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),
    /// The request itself is malformed (bad interval, empty ticker, ...).
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

fn fmt_code(code: &Option<i64>) -> String {
    match code {
        Some(c) => format!(" code={c}"),
        None => String::new(),
    }
}

impl SourceError {
    pub fn unavailable<T: Into<String>, R: Into<String>>(ticker: T, date: NaiveDate, reason: R) -> Self {
        SourceError::Unavailable {
            ticker: ticker.into(),
            date,
            reason: reason.into(),
        }
    }

    /// Transient failures worth another attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SourceError::Timeout { .. } | SourceError::Transport(_))
    }

    /// Definitive answers that a cache may remember.
    pub fn is_definitive(&self) -> bool {
        matches!(self, SourceError::Unavailable { .. })
    }
}
