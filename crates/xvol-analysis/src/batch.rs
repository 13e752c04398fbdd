//! Per-universe batches.
//!
//! Tickers run concurrently up to `concurrency`, but output rows always follow
//! the input ticker order. A data failure becomes one [`SkipRecord`]; a
//! calendar failure aborts the batch and is reported once for the venue.

use chrono::NaiveDate;
use futures_util::stream::{self, StreamExt};
use serde::Serialize;
use xvol_calendar::{TradingCalendar, TradingDate, VenueId};
use xvol_md::{Interval, PriceDataSource};

use crate::{
    analyze_session, AnalysisError, DayError, RollingWindowAggregator, SessionRow, SkipRecord, WindowReport,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionBatch {
    pub venue: VenueId,
    pub date: TradingDate,
    pub reference_date: NaiveDate,
    pub rows: Vec<SessionRow>,
    pub skips: Vec<SkipRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowBatch {
    pub venue: VenueId,
    pub anchor: TradingDate,
    pub reports: Vec<WindowReport>,
}

/// Counts crossings on `date` for every ticker, each against the close of
/// the last session on or before `reference_date`.
pub async fn run_session_batch<S>(
    calendar: &dyn TradingCalendar,
    source: &S,
    tickers: &[String],
    date: TradingDate,
    reference_date: NaiveDate,
    interval: Interval,
    concurrency: usize,
) -> Result<SessionBatch, AnalysisError>
where
    S: PriceDataSource + ?Sized,
{
    // Resolve once up front so a broken calendar fails the batch before any fetch.
    calendar
        .last_trading_day_on_or_before(reference_date)
        .map_err(|e| venue_failure(calendar, e.into()))?;

    let results: Vec<(&String, Result<SessionRow, DayError>)> = stream::iter(tickers)
        .map(|ticker| async move {
            let res = analyze_session(calendar, source, ticker, date, reference_date, interval).await;
            (ticker, res)
        })
        .buffered(concurrency.max(1))
        .collect()
        .await;

    let mut rows = Vec::with_capacity(results.len());
    let mut skips = Vec::new();
    for (ticker, res) in results {
        match res {
            Ok(row) => rows.push(row),
            Err(DayError::Calendar(e)) if e.is_venue_fatal() => {
                return Err(venue_failure(calendar, e.into()));
            }
            Err(e) => {
                tracing::warn!(%ticker, %date, reason = %e, "ticker skipped");
                skips.push(SkipRecord::new(&xvol_md::normalize_ticker(ticker), date.date(), &e));
            }
        }
    }

    tracing::info!(
        venue = %calendar.venue(),
        %date,
        rows = rows.len(),
        skipped = skips.len(),
        "session batch done"
    );
    Ok(SessionBatch {
        venue: calendar.venue().clone(),
        date,
        reference_date,
        rows,
        skips,
    })
}

/// Rolling-window aggregation for every ticker.
pub async fn run_window_batch<S>(
    calendar: &dyn TradingCalendar,
    source: &S,
    tickers: &[String],
    anchor: NaiveDate,
    aggregator: &RollingWindowAggregator,
    concurrency: usize,
) -> Result<WindowBatch, AnalysisError>
where
    S: PriceDataSource + ?Sized,
{
    let anchor_day = calendar
        .last_trading_day_on_or_before(anchor)
        .map_err(|e| venue_failure(calendar, e.into()))?;

    let results: Vec<Result<WindowReport, AnalysisError>> = stream::iter(tickers)
        .map(|ticker| aggregator.aggregate(ticker, calendar, source, anchor_day.date()))
        .buffered(concurrency.max(1))
        .collect()
        .await;

    let mut reports = Vec::with_capacity(results.len());
    for res in results {
        reports.push(res.map_err(|e| venue_failure(calendar, e))?);
    }

    Ok(WindowBatch {
        venue: calendar.venue().clone(),
        anchor: anchor_day,
        reports,
    })
}

fn venue_failure(calendar: &dyn TradingCalendar, err: AnalysisError) -> AnalysisError {
    tracing::error!(venue = %calendar.venue(), error = %err, "batch aborted");
    err
}
