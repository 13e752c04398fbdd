//! xvol-calendar
//!
//! Venue trading calendars. Deterministic, pure logic: no IO, no wall-clock.
//!
//! # Design
//!
//! [`TradingCalendar`] is the capability every venue implements. A venue only
//! has to answer two questions ([`TradingCalendar::coverage`] and
//! [`TradingCalendar::is_trading_day`]); the range and search operations are
//! provided on top of those and are identical for every venue.
//!
//! Two rule sets ship in [`rules`]:
//! - [`ExchangeCalendar`]: an exchange schedule (weekends plus the exchange's
//!   own closure list, including ad-hoc closures).
//! - [`BusinessDayCalendar`]: a business-day weekmask minus a separate
//!   venue-specific holiday list.
//!
//! Callers resolve a venue through [`CalendarRegistry`]. Adding a venue means
//! registering another `Arc<dyn TradingCalendar>`; nothing downstream branches
//! on the venue identifier.

mod error;
pub mod holidays;
pub mod registry;
pub mod rules;

pub use error::CalendarError;
pub use registry::CalendarRegistry;
pub use rules::{BusinessDayCalendar, ExchangeCalendar, HolidayTable, Weekmask};

use std::fmt;

use chrono::{Days, NaiveDate};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Calendar days searched when resolving the last or next trading day.
///
/// Ten days covers the longest holiday cluster of any supported venue
/// (carnival + weekend + bridge day).
pub const LOOKBACK_DAYS: u64 = 10;

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

/// Identifies a trading venue (e.g. `nyse`, `bcba`).
///
/// Normalised to lowercase so config files and CLI flags are case-insensitive.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VenueId(String);

impl VenueId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().trim().to_ascii_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VenueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A calendar date that a [`TradingCalendar`] has confirmed as a session.
///
/// Only this crate constructs values; downstream code cannot fabricate one for
/// an inclusion decision.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct TradingDate(NaiveDate);

impl TradingDate {
    pub(crate) fn confirmed(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }
}

impl fmt::Display for TradingDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

// ---------------------------------------------------------------------------
// Capability
// ---------------------------------------------------------------------------

/// Trading-day capability for one venue.
pub trait TradingCalendar: Send + Sync {
    fn venue(&self) -> &VenueId;

    /// Exchange timezone; session dates are interpreted in this zone.
    fn timezone(&self) -> Tz;

    /// Inclusive date range for which this calendar has holiday data.
    fn coverage(&self) -> (NaiveDate, NaiveDate);

    /// Returns whether `date` is a regular session.
    ///
    /// Must return [`CalendarError::CalendarUnavailable`] for dates outside
    /// [`coverage`](Self::coverage) rather than guessing.
    fn is_trading_day(&self, date: NaiveDate) -> Result<bool, CalendarError>;

    /// All trading days in `[start, end]`, ascending. Empty when `start > end`
    /// or when the range holds no session.
    fn valid_trading_days(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<TradingDate>, CalendarError> {
        let mut out = Vec::new();
        for date in start.iter_days().take_while(|d| *d <= end) {
            if self.is_trading_day(date)? {
                out.push(TradingDate::confirmed(date));
            }
        }
        Ok(out)
    }

    /// Most recent trading day in `[reference - LOOKBACK_DAYS, reference]`.
    ///
    /// Fails with [`CalendarError::NoTradingDayFound`] when the window holds no
    /// session; the requested date is never substituted.
    fn last_trading_day_on_or_before(
        &self,
        reference: NaiveDate,
    ) -> Result<TradingDate, CalendarError> {
        let mut date = reference;
        for _ in 0..=LOOKBACK_DAYS {
            if self.is_trading_day(date)? {
                tracing::debug!(venue = %self.venue(), %reference, resolved = %date, "last trading day");
                return Ok(TradingDate::confirmed(date));
            }
            date = match date.pred_opt() {
                Some(d) => d,
                None => break,
            };
        }
        Err(CalendarError::NoTradingDayFound {
            venue: self.venue().clone(),
            reference,
            lookback_days: LOOKBACK_DAYS,
        })
    }

    /// First trading day strictly after `date`, searching forward at most
    /// `LOOKBACK_DAYS` calendar days.
    fn next_trading_day_after(&self, date: NaiveDate) -> Result<TradingDate, CalendarError> {
        let mut cursor = date;
        for _ in 0..LOOKBACK_DAYS {
            cursor = match cursor.checked_add_days(Days::new(1)) {
                Some(d) => d,
                None => break,
            };
            if self.is_trading_day(cursor)? {
                return Ok(TradingDate::confirmed(cursor));
            }
        }
        Err(CalendarError::NoTradingDayFound {
            venue: self.venue().clone(),
            reference: date,
            lookback_days: LOOKBACK_DAYS,
        })
    }

    /// Trading day immediately preceding `day` (the session whose close is
    /// `day`'s reference).
    fn previous_trading_day(&self, day: TradingDate) -> Result<TradingDate, CalendarError> {
        match day.date().pred_opt() {
            Some(d) => self.last_trading_day_on_or_before(d),
            None => Err(CalendarError::NoTradingDayFound {
                venue: self.venue().clone(),
                reference: day.date(),
                lookback_days: LOOKBACK_DAYS,
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
