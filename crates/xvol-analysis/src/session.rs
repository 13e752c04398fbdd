use chrono::NaiveDate;
use futures_util::future::join;
use serde::Serialize;
use xvol_calendar::{TradingCalendar, TradingDate};
use xvol_md::{Interval, IntradayRequest, PriceDataSource, ReferenceClose};

use crate::{count_crossings, resolve_reference_close, CrossingResult, DayError};

/// Crossing count for one ticker on one session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionRow {
    pub ticker: String,
    pub date: TradingDate,
    pub reference: ReferenceClose,
    pub result: CrossingResult,
    /// Samples the count was computed over.
    pub samples: usize,
}

/// A (ticker, date) that produced no row, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkipRecord {
    pub ticker: String,
    pub date: NaiveDate,
    pub reason: String,
}

impl SkipRecord {
    pub fn new(ticker: &str, date: NaiveDate, reason: impl ToString) -> Self {
        Self {
            ticker: ticker.to_string(),
            date,
            reason: reason.to_string(),
        }
    }
}

/// Fetches `day`'s intraday series and the close of the last session on or
/// before `reference_date`, then counts crossings.
pub async fn analyze_session<S>(
    calendar: &dyn TradingCalendar,
    source: &S,
    ticker: &str,
    day: TradingDate,
    reference_date: NaiveDate,
    interval: Interval,
) -> Result<SessionRow, DayError>
where
    S: PriceDataSource + ?Sized,
{
    let req = IntradayRequest::new(ticker, day.date(), interval, calendar.timezone());
    let (samples, reference) = join(
        source.fetch_intraday(&req),
        resolve_reference_close(calendar, source, &req.ticker, reference_date),
    )
    .await;
    let samples = samples?;
    let reference = reference?;

    let result = count_crossings(&samples, reference.price);
    tracing::debug!(
        ticker = %req.ticker,
        date = %day,
        reference = reference.price,
        total = result.total_crossings,
        "session analysed"
    );

    Ok(SessionRow {
        ticker: req.ticker,
        date: day,
        reference,
        result,
        samples: samples.len(),
    })
}
