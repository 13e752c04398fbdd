use chrono::NaiveDate;
use thiserror::Error;

use crate::VenueId;

/// Errors raised while resolving trading days.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalendarError {
    /// The venue is unknown, or the requested date lies outside the range the
    /// venue's holiday data covers. Fatal for any analysis on that venue.
    #[error("calendar unavailable for venue '{venue}': {reason}")]
    CalendarUnavailable { venue: VenueId, reason: String },

    /// No session in the bounded search window. Signals a calendar data
    /// problem; never replaced with the requested date.
    #[error("no trading day for venue '{venue}' within {lookback_days} days of {reference}")]
    NoTradingDayFound {
        venue: VenueId,
        reference: NaiveDate,
        lookback_days: u64,
    },
}

impl CalendarError {
    pub fn venue(&self) -> &VenueId {
        match self {
            CalendarError::CalendarUnavailable { venue, .. } => venue,
            CalendarError::NoTradingDayFound { venue, .. } => venue,
        }
    }

    /// `true` when the venue cannot be used at all (as opposed to a single
    /// date resolution failing).
    pub fn is_venue_fatal(&self) -> bool {
        matches!(self, CalendarError::CalendarUnavailable { .. })
    }
}
