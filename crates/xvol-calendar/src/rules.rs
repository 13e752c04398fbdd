//! Venue rule sets.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, Weekday};
use chrono_tz::Tz;

use crate::holidays::{BCBA_HOLIDAYS, BCBA_YEARS, NYSE_CLOSURES, NYSE_YEARS};
use crate::{CalendarError, TradingCalendar, VenueId};

// ---------------------------------------------------------------------------
// HolidayTable
// ---------------------------------------------------------------------------

/// Named closure dates for a contiguous span of fully-listed years.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HolidayTable {
    first_year: i32,
    last_year: i32,
    dates: BTreeMap<NaiveDate, String>,
}

impl HolidayTable {
    pub fn new(first_year: i32, last_year: i32) -> Self {
        debug_assert!(first_year <= last_year);
        Self {
            first_year,
            last_year,
            dates: BTreeMap::new(),
        }
    }

    pub fn from_static(years: (i32, i32), rows: &[(i32, u32, u32, &str)]) -> Self {
        let mut table = Self::new(years.0, years.1);
        for &(y, m, d, name) in rows {
            if let Some(date) = NaiveDate::from_ymd_opt(y, m, d) {
                table.insert(date, name);
            }
        }
        table
    }

    pub fn insert<S: Into<String>>(&mut self, date: NaiveDate, name: S) {
        self.dates.insert(date, name.into());
    }

    /// Adds extra closures (e.g. from configuration). Dates outside the
    /// covered years are ignored: they cannot make an unknown year known.
    pub fn with_extra<I>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        for date in extra {
            if self.covers(date) {
                self.dates.entry(date).or_insert_with(|| "configured".to_string());
            }
        }
        self
    }

    pub fn coverage(&self) -> (NaiveDate, NaiveDate) {
        (
            NaiveDate::from_ymd_opt(self.first_year, 1, 1).unwrap_or(NaiveDate::MIN),
            NaiveDate::from_ymd_opt(self.last_year, 12, 31).unwrap_or(NaiveDate::MAX),
        )
    }

    pub fn covers(&self, date: NaiveDate) -> bool {
        (self.first_year..=self.last_year).contains(&date.year())
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.dates.contains_key(&date)
    }

    pub fn name(&self, date: NaiveDate) -> Option<&str> {
        self.dates.get(&date).map(String::as_str)
    }
}

fn outside_coverage(venue: &VenueId, table: &HolidayTable, date: NaiveDate) -> CalendarError {
    let (start, end) = table.coverage();
    CalendarError::CalendarUnavailable {
        venue: venue.clone(),
        reason: format!("no holiday data for {date} (covered: {start}..={end})"),
    }
}

// ---------------------------------------------------------------------------
// ExchangeCalendar
// ---------------------------------------------------------------------------

/// An exchange's published schedule: weekends closed, plus every full-day
/// closure the exchange announces (statutory holidays and ad-hoc closures).
#[derive(Clone, Debug)]
pub struct ExchangeCalendar {
    venue: VenueId,
    tz: Tz,
    closures: HolidayTable,
}

impl ExchangeCalendar {
    pub fn new(venue: VenueId, tz: Tz, closures: HolidayTable) -> Self {
        Self { venue, tz, closures }
    }

    /// New York Stock Exchange.
    pub fn nyse() -> Self {
        Self::new(
            VenueId::new("nyse"),
            chrono_tz::America::New_York,
            HolidayTable::from_static(NYSE_YEARS, NYSE_CLOSURES),
        )
    }

    pub fn with_extra_closures<I>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        self.closures = self.closures.with_extra(extra);
        self
    }

    /// Name of the closure on `date`, if the exchange is shut that day.
    pub fn closure_name(&self, date: NaiveDate) -> Option<&str> {
        self.closures.name(date)
    }
}

impl TradingCalendar for ExchangeCalendar {
    fn venue(&self) -> &VenueId {
        &self.venue
    }

    fn timezone(&self) -> Tz {
        self.tz
    }

    fn coverage(&self) -> (NaiveDate, NaiveDate) {
        self.closures.coverage()
    }

    fn is_trading_day(&self, date: NaiveDate) -> Result<bool, CalendarError> {
        if !self.closures.covers(date) {
            return Err(outside_coverage(&self.venue, &self.closures, date));
        }
        if matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
            return Ok(false);
        }
        Ok(!self.closures.contains(date))
    }
}

// ---------------------------------------------------------------------------
// BusinessDayCalendar
// ---------------------------------------------------------------------------

/// Which weekdays are business days.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Weekmask([bool; 7]);

impl Weekmask {
    pub const MON_FRI: Weekmask = Weekmask([true, true, true, true, true, false, false]);

    /// Parses a space-separated list of weekday abbreviations
    /// (e.g. `"Mon Tue Wed Thu Fri"`).
    pub fn parse(s: &str) -> Option<Self> {
        let mut mask = [false; 7];
        for token in s.split_whitespace() {
            let wd: Weekday = token.parse().ok()?;
            mask[wd.num_days_from_monday() as usize] = true;
        }
        if mask.iter().any(|b| *b) {
            Some(Weekmask(mask))
        } else {
            None
        }
    }

    pub fn includes(&self, wd: Weekday) -> bool {
        self.0[wd.num_days_from_monday() as usize]
    }
}

impl Default for Weekmask {
    fn default() -> Self {
        Weekmask::MON_FRI
    }
}

/// Business days per a weekmask, minus a venue-specific holiday list.
#[derive(Clone, Debug)]
pub struct BusinessDayCalendar {
    venue: VenueId,
    tz: Tz,
    weekmask: Weekmask,
    holidays: HolidayTable,
}

impl BusinessDayCalendar {
    pub fn new(venue: VenueId, tz: Tz, weekmask: Weekmask, holidays: HolidayTable) -> Self {
        Self {
            venue,
            tz,
            weekmask,
            holidays,
        }
    }

    /// Buenos Aires exchange: Monday–Friday minus Argentine national holidays.
    pub fn bcba() -> Self {
        Self::new(
            VenueId::new("bcba"),
            chrono_tz::America::Argentina::Buenos_Aires,
            Weekmask::MON_FRI,
            HolidayTable::from_static(BCBA_YEARS, BCBA_HOLIDAYS),
        )
    }

    pub fn with_extra_holidays<I>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        self.holidays = self.holidays.with_extra(extra);
        self
    }

    pub fn holiday_name(&self, date: NaiveDate) -> Option<&str> {
        self.holidays.name(date)
    }
}

impl TradingCalendar for BusinessDayCalendar {
    fn venue(&self) -> &VenueId {
        &self.venue
    }

    fn timezone(&self) -> Tz {
        self.tz
    }

    fn coverage(&self) -> (NaiveDate, NaiveDate) {
        self.holidays.coverage()
    }

    fn is_trading_day(&self, date: NaiveDate) -> Result<bool, CalendarError> {
        if !self.holidays.covers(date) {
            return Err(outside_coverage(&self.venue, &self.holidays, date));
        }
        Ok(self.weekmask.includes(date.weekday()) && !self.holidays.contains(date))
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
