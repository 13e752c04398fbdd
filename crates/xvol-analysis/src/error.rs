use chrono::NaiveDate;
use thiserror::Error;
use xvol_calendar::{CalendarError, VenueId};
use xvol_md::SourceError;

/// Failures that stop an analysis outright.
///
/// Missing data for a single day or ticker never lands here; it becomes a
/// [`crate::SkipRecord`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Calendar(#[from] CalendarError),

    #[error("invalid window: {0}")]
    InvalidWindow(String),

    #[error("analysis date {date} is after today ({today}) in venue '{venue}'")]
    FutureDate {
        venue: VenueId,
        date: NaiveDate,
        today: NaiveDate,
    },
}

/// Why one (ticker, date) could not be analysed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DayError {
    #[error(transparent)]
    Calendar(#[from] CalendarError),

    #[error(transparent)]
    Data(#[from] SourceError),

    /// The source's latest close is older than the session the calendar
    /// resolved (the source is missing that session).
    #[error("close for {expected} missing; latest available is {actual}")]
    StaleClose { expected: NaiveDate, actual: NaiveDate },
}

impl DayError {
    /// Calendar failures that make every other date on the venue pointless.
    pub fn is_venue_fatal(&self) -> bool {
        matches!(self, DayError::Calendar(e) if e.is_venue_fatal())
    }
}
