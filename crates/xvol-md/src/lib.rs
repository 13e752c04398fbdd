//! xvol-md
//!
//! Price-data boundary. This crate owns the [`PriceDataSource`] abstraction,
//! concrete sources (Yahoo chart API, CSV fixtures) and the optional
//! boundary layers (read-through cache, timeout/retry guard).
//!
//! It does **not** decide which days to analyse; callers resolve dates with a
//! trading calendar and ask a source for exactly those dates.

pub mod cache;
pub mod csv_source;
mod error;
pub mod guard;
pub mod yahoo;

pub use cache::CachedSource;
pub use csv_source::CsvSource;
pub use error::SourceError;
pub use guard::{FetchPolicy, GuardedSource};
pub use yahoo::YahooChartSource;

use std::sync::Arc;

use chrono::{DateTime, Days, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// How far back a source may look for a close before reporting no data.
pub const CLOSE_LOOKBACK_DAYS: u64 = 10;

// ---------------------------------------------------------------------------
// Interval
// ---------------------------------------------------------------------------

/// Sampling interval for intraday series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Interval {
    #[default]
    #[serde(rename = "1m")]
    M1,
    #[serde(rename = "2m")]
    M2,
    #[serde(rename = "5m")]
    M5,
    #[serde(rename = "15m")]
    M15,
    #[serde(rename = "30m")]
    M30,
    #[serde(rename = "1h")]
    H1,
}

impl Interval {
    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::M1 => "1m",
            Interval::M2 => "2m",
            Interval::M5 => "5m",
            Interval::M15 => "15m",
            Interval::M30 => "30m",
            Interval::H1 => "1h",
        }
    }

    pub fn parse(s: &str) -> Result<Self, SourceError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1m" | "1min" => Ok(Interval::M1),
            "2m" | "2min" => Ok(Interval::M2),
            "5m" | "5min" => Ok(Interval::M5),
            "15m" | "15min" => Ok(Interval::M15),
            "30m" | "30min" => Ok(Interval::M30),
            "1h" | "60m" => Ok(Interval::H1),
            other => Err(SourceError::InvalidRequest(format!(
                "invalid interval '{other}'. expected one of: 1m | 2m | 5m | 15m | 30m | 1h"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Samples and closes
// ---------------------------------------------------------------------------

/// One intraday observation (adjusted price).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceSample {
    pub ts: DateTime<Utc>,
    pub price: f64,
}

impl PriceSample {
    pub fn new(ts: DateTime<Utc>, price: f64) -> Self {
        Self { ts, price }
    }

    /// Finite and strictly positive.
    pub fn is_valid(&self) -> bool {
        self.price.is_finite() && self.price > 0.0
    }
}

/// Closing price used as the crossing threshold.
///
/// `actual_date` is the session the price belongs to; it is never later than
/// `requested`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReferenceClose {
    pub price: f64,
    pub requested: NaiveDate,
    pub actual_date: NaiveDate,
}

impl ReferenceClose {
    pub fn new(price: f64, requested: NaiveDate, actual_date: NaiveDate) -> Result<Self, SourceError> {
        if actual_date > requested {
            return Err(SourceError::Decode(format!(
                "close dated {actual_date} is after requested date {requested}"
            )));
        }
        if !(price.is_finite() && price > 0.0) {
            return Err(SourceError::Decode(format!(
                "close for {actual_date} is not a positive price: {price}"
            )));
        }
        Ok(Self {
            price,
            requested,
            actual_date,
        })
    }
}

/// Uppercase, trimmed ticker as every source looks it up.
pub fn normalize_ticker(ticker: &str) -> String {
    ticker.trim().to_ascii_uppercase()
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Intraday fetch for one session date of one ticker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntradayRequest {
    /// Normalised ticker.
    pub ticker: String,
    pub date: NaiveDate,
    pub interval: Interval,
    /// Venue timezone; the session window is local midnight to local midnight.
    pub tz: Tz,
}

impl IntradayRequest {
    pub fn new(ticker: &str, date: NaiveDate, interval: Interval, tz: Tz) -> Self {
        Self {
            ticker: normalize_ticker(ticker),
            date,
            interval,
            tz,
        }
    }

    /// `[start, end)` in UTC covering `date` in the venue timezone.
    pub fn window(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        let next = self.date.checked_add_days(Days::new(1)).unwrap_or(self.date);
        (local_midnight_utc(self.tz, self.date), local_midnight_utc(self.tz, next))
    }
}

fn local_midnight_utc(tz: Tz, date: NaiveDate) -> DateTime<Utc> {
    let naive = date.and_time(chrono::NaiveTime::default());
    match tz.from_local_datetime(&naive).earliest() {
        Some(dt) => dt.with_timezone(&Utc),
        // Midnight skipped by a DST jump: fall back to the UTC reading.
        None => Utc.from_utc_datetime(&naive),
    }
}

// ---------------------------------------------------------------------------
// Source trait
// ---------------------------------------------------------------------------

/// Upstream price-data contract.
///
/// "No data" is an error ([`SourceError::Unavailable`]), never an empty `Ok`:
/// `fetch_intraday` returns at least one sample on success, time-ordered.
#[async_trait::async_trait]
pub trait PriceDataSource: Send + Sync {
    /// Human-readable source name (e.g. `"yahoo"`).
    fn name(&self) -> &'static str;

    async fn fetch_intraday(&self, req: &IntradayRequest) -> Result<Vec<PriceSample>, SourceError>;

    /// Close of the latest session at or before `date` that the source holds.
    async fn fetch_close_on_or_before(
        &self,
        ticker: &str,
        date: NaiveDate,
    ) -> Result<ReferenceClose, SourceError>;
}

#[async_trait::async_trait]
impl<S: PriceDataSource + ?Sized> PriceDataSource for Arc<S> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    async fn fetch_intraday(&self, req: &IntradayRequest) -> Result<Vec<PriceSample>, SourceError> {
        (**self).fetch_intraday(req).await
    }

    async fn fetch_close_on_or_before(
        &self,
        ticker: &str,
        date: NaiveDate,
    ) -> Result<ReferenceClose, SourceError> {
        (**self).fetch_close_on_or_before(ticker, date).await
    }
}

/// Sorts by timestamp, drops invalid prices and duplicate timestamps
/// (first wins).
pub fn clean_series(mut samples: Vec<PriceSample>) -> Vec<PriceSample> {
    samples.retain(PriceSample::is_valid);
    samples.sort_by_key(|s| s.ts);
    samples.dedup_by_key(|s| s.ts);
    samples
}

// -----------------
// Tests (no network)
// -----------------
