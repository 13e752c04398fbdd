//! Close-to-close percentage variation over a trailing calendar window.

use std::collections::HashMap;

use chrono::{Days, NaiveDate};
use serde::Serialize;
use xvol_calendar::{TradingCalendar, TradingDate};
use xvol_md::{normalize_ticker, PriceDataSource};

use crate::{resolve_reference_close, AnalysisError, DayError, SkipRecord};

/// Change from `from`'s close to `date`'s close, `date` being the next
/// session after `from`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VariationPoint {
    pub date: TradingDate,
    pub from: TradingDate,
    pub from_close: f64,
    pub close: f64,
    /// `(close / from_close - 1) * 100`
    pub pct_change: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariationSeries {
    pub ticker: String,
    pub points: Vec<VariationPoint>,
    pub skips: Vec<SkipRecord>,
}

pub fn pct_change(from: f64, to: f64) -> f64 {
    (to / from - 1.0) * 100.0
}

/// Variation series for the sessions in `[anchor - calendar_days, anchor]`,
/// keeping at most the newest `max_days` of them.
///
/// Each session is paired with the next session in the window, so the anchor
/// itself only ever appears as the later half of a pair.
pub async fn close_variation_series<S>(
    calendar: &dyn TradingCalendar,
    source: &S,
    ticker: &str,
    anchor: NaiveDate,
    calendar_days: u64,
    max_days: usize,
) -> Result<VariationSeries, AnalysisError>
where
    S: PriceDataSource + ?Sized,
{
    let ticker = normalize_ticker(ticker);
    let anchor_day = calendar.last_trading_day_on_or_before(anchor)?;
    let start = anchor_day
        .date()
        .checked_sub_days(Days::new(calendar_days))
        .unwrap_or(NaiveDate::MIN);

    let mut days = calendar.valid_trading_days(start, anchor_day.date())?;
    if days.len() > max_days {
        days.drain(..days.len() - max_days);
    }

    let mut closes: HashMap<NaiveDate, Result<f64, DayError>> = HashMap::new();
    let mut points = Vec::new();
    let mut skips = Vec::new();

    // Sessions past the anchor are never resolved: the newest day has no pair.
    for pair in days.windows(2) {
        let (day, next) = (pair[0], pair[1]);

        for session in [day, next] {
            if !closes.contains_key(&session.date()) {
                let close = resolve_reference_close(calendar, source, &ticker, session.date())
                    .await
                    .map(|c| c.price);
                closes.insert(session.date(), close);
            }
        }

        let from_close = closes.get(&day.date()).cloned();
        let close = closes.get(&next.date()).cloned();
        match (from_close, close) {
            (Some(Ok(from_close)), Some(Ok(close))) => points.push(VariationPoint {
                date: next,
                from: day,
                from_close,
                close,
                pct_change: pct_change(from_close, close),
            }),
            (Some(Err(DayError::Calendar(e))), _) | (_, Some(Err(DayError::Calendar(e)))) => {
                return Err(e.into());
            }
            (Some(Err(e)), _) | (_, Some(Err(e))) => {
                tracing::warn!(%ticker, date = %next, reason = %e, "variation day skipped");
                skips.push(SkipRecord::new(&ticker, next.date(), &e));
            }
            _ => {}
        }
    }

    tracing::info!(%ticker, points = points.len(), skipped = skips.len(), "variation series");
    Ok(VariationSeries {
        ticker,
        points,
        skips,
    })
}
