//! Date defaults and reference-close resolution.

use chrono::{DateTime, NaiveDate, Utc};
use xvol_calendar::{TradingCalendar, TradingDate};
use xvol_md::{normalize_ticker, PriceDataSource, ReferenceClose};

use crate::{AnalysisError, DayError};

/// Last session on or before `now`'s local date in the venue timezone.
pub fn default_analysis_date(
    calendar: &dyn TradingCalendar,
    now: DateTime<Utc>,
) -> Result<TradingDate, AnalysisError> {
    let today = now.with_timezone(&calendar.timezone()).date_naive();
    Ok(calendar.last_trading_day_on_or_before(today)?)
}

/// Session before `analysis_date`; its close is the default reference.
pub fn default_previous_date(
    calendar: &dyn TradingCalendar,
    analysis_date: TradingDate,
) -> Result<TradingDate, AnalysisError> {
    Ok(calendar.previous_trading_day(analysis_date)?)
}

/// Resolves a user-supplied analysis date to a session.
///
/// Dates after the venue's local today are rejected; a non-trading date rolls
/// back to the last session on or before it.
pub fn resolve_analysis_date(
    calendar: &dyn TradingCalendar,
    requested: NaiveDate,
    now: DateTime<Utc>,
) -> Result<TradingDate, AnalysisError> {
    let today = now.with_timezone(&calendar.timezone()).date_naive();
    if requested > today {
        return Err(AnalysisError::FutureDate {
            venue: calendar.venue().clone(),
            date: requested,
            today,
        });
    }
    Ok(calendar.last_trading_day_on_or_before(requested)?)
}

/// Close of the last session on or before `requested`.
///
/// The calendar decides which session that is; the source must hold exactly
/// that session. An older close is reported as [`DayError::StaleClose`]
/// instead of silently standing in.
pub async fn resolve_reference_close<S>(
    calendar: &dyn TradingCalendar,
    source: &S,
    ticker: &str,
    requested: NaiveDate,
) -> Result<ReferenceClose, DayError>
where
    S: PriceDataSource + ?Sized,
{
    let ticker = normalize_ticker(ticker);
    let session = calendar.last_trading_day_on_or_before(requested)?;
    let close = source.fetch_close_on_or_before(&ticker, session.date()).await?;
    if close.actual_date != session.date() {
        return Err(DayError::StaleClose {
            expected: session.date(),
            actual: close.actual_date,
        });
    }
    Ok(ReferenceClose::new(close.price, requested, close.actual_date)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::TimeZone;
    use xvol_calendar::{BusinessDayCalendar, ExchangeCalendar};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn default_date_uses_venue_local_day() {
        let nyse = ExchangeCalendar::nyse();
        // 2024-01-09T03:00Z is still Monday 2024-01-08 in New York.
        let now = Utc.with_ymd_and_hms(2024, 1, 9, 3, 0, 0).unwrap();
        assert_eq!(default_analysis_date(&nyse, now).unwrap().date(), d(2024, 1, 8));
    }

    #[test]
    fn default_date_on_weekend_rolls_back() {
        let bcba = BusinessDayCalendar::bcba();
        let now = Utc.with_ymd_and_hms(2025, 9, 28, 15, 0, 0).unwrap();
        let day = default_analysis_date(&bcba, now).unwrap();
        assert_eq!(day.date(), d(2025, 9, 26));
        assert_eq!(default_previous_date(&bcba, day).unwrap().date(), d(2025, 9, 25));
    }

    #[test]
    fn future_date_is_rejected() {
        let nyse = ExchangeCalendar::nyse();
        let now = Utc.with_ymd_and_hms(2024, 1, 8, 15, 0, 0).unwrap();
        let err = resolve_analysis_date(&nyse, d(2024, 1, 9), now).unwrap_err();
        assert!(matches!(err, AnalysisError::FutureDate { .. }));
        assert_eq!(resolve_analysis_date(&nyse, d(2024, 1, 7), now).unwrap().date(), d(2024, 1, 5));
    }
}
