//! Rolling window of trading days ending at an anchor.
//!
//! The window counts *valid* days: a day whose data is missing is skipped and
//! the walk continues to older sessions until the window is full or the scan
//! cap is reached. An under-filled window is reported as
//! [`WindowOutcome::PartialWindow`], never as complete statistics.

use chrono::{Days, NaiveDate};
use serde::Serialize;
use xvol_calendar::{TradingCalendar, TradingDate, VenueId};
use xvol_md::{Interval, PriceDataSource};

use crate::{analyze_session, AggregateStats, AnalysisError, DailySummaryRow, DayError, SkipRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowParams {
    /// Target number of valid trading days.
    pub window_size: usize,
    pub interval: Interval,
    /// Scan cap as a multiple of the calendar span `window_size` implies.
    pub lookback_factor: u32,
}

impl Default for WindowParams {
    fn default() -> Self {
        Self {
            window_size: 20,
            interval: Interval::M1,
            lookback_factor: 3,
        }
    }
}

impl WindowParams {
    /// Calendar days the walk may cover: `lookback_factor * ceil(window_size * 7 / 5)`.
    pub fn scan_cap_days(&self) -> u64 {
        let span = (self.window_size as u64 * 7).div_ceil(5);
        span * u64::from(self.lookback_factor)
    }

    fn validate(&self) -> Result<(), AnalysisError> {
        if self.window_size == 0 {
            return Err(AnalysisError::InvalidWindow("window_size must be at least 1".to_string()));
        }
        if self.lookback_factor == 0 {
            return Err(AnalysisError::InvalidWindow("lookback_factor must be at least 1".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum WindowOutcome {
    Complete { stats: AggregateStats },
    PartialWindow { gathered: usize, target: usize },
}

impl WindowOutcome {
    pub fn is_complete(&self) -> bool {
        matches!(self, WindowOutcome::Complete { .. })
    }

    pub fn stats(&self) -> Option<&AggregateStats> {
        match self {
            WindowOutcome::Complete { stats } => Some(stats),
            WindowOutcome::PartialWindow { .. } => None,
        }
    }
}

/// Everything one aggregation produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowReport {
    pub ticker: String,
    pub venue: VenueId,
    pub anchor: TradingDate,
    /// Ascending by date.
    pub rows: Vec<DailySummaryRow>,
    /// Newest first, in the order the walk met them.
    pub skips: Vec<SkipRecord>,
    pub outcome: WindowOutcome,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RollingWindowAggregator {
    params: WindowParams,
}

impl RollingWindowAggregator {
    pub fn new(params: WindowParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &WindowParams {
        &self.params
    }

    /// Walks back from the last session on or before `anchor`, comparing
    /// each day against its own previous session's close.
    ///
    /// Data failures skip the day. Calendar failures abort: without the
    /// calendar there is no way to tell which days belong in the window.
    pub async fn aggregate<S>(
        &self,
        ticker: &str,
        calendar: &dyn TradingCalendar,
        source: &S,
        anchor: NaiveDate,
    ) -> Result<WindowReport, AnalysisError>
    where
        S: PriceDataSource + ?Sized,
    {
        self.params.validate()?;
        let ticker = xvol_md::normalize_ticker(ticker);
        let ticker = ticker.as_str();
        let target = self.params.window_size;
        let anchor_day = calendar.last_trading_day_on_or_before(anchor)?;
        let floor = anchor_day
            .date()
            .checked_sub_days(Days::new(self.params.scan_cap_days()))
            .unwrap_or(NaiveDate::MIN);

        let mut rows: Vec<DailySummaryRow> = Vec::with_capacity(target);
        let mut skips = Vec::new();
        let mut day = anchor_day;

        while rows.len() < target && day.date() >= floor {
            let previous = calendar.previous_trading_day(day)?;

            match analyze_session(calendar, source, ticker, day, previous.date(), self.params.interval).await {
                Ok(row) => rows.push(DailySummaryRow {
                    date: row.date,
                    reference: row.reference,
                    result: row.result,
                }),
                Err(DayError::Calendar(e)) => return Err(e.into()),
                Err(e) => {
                    tracing::warn!(%ticker, date = %day, reason = %e, "window day skipped");
                    skips.push(SkipRecord::new(ticker, day.date(), &e));
                }
            }

            day = previous;
        }

        rows.reverse();
        let outcome = if rows.len() < target {
            tracing::warn!(
                %ticker,
                gathered = rows.len(),
                target,
                scan_cap_days = self.params.scan_cap_days(),
                "window under-filled"
            );
            WindowOutcome::PartialWindow {
                gathered: rows.len(),
                target,
            }
        } else {
            match AggregateStats::from_rows(&rows) {
                Some(stats) => WindowOutcome::Complete { stats },
                None => WindowOutcome::PartialWindow { gathered: 0, target },
            }
        };

        tracing::info!(
            %ticker,
            venue = %calendar.venue(),
            anchor = %anchor_day,
            days = rows.len(),
            skipped = skips.len(),
            complete = outcome.is_complete(),
            "window aggregated"
        );

        Ok(WindowReport {
            ticker: ticker.to_string(),
            venue: calendar.venue().clone(),
            anchor: anchor_day,
            rows,
            skips,
            outcome,
        })
    }
}
