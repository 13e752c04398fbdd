//! Venue → calendar lookup.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::{BusinessDayCalendar, CalendarError, ExchangeCalendar, TradingCalendar, VenueId};

/// Owns one calendar per venue. Cheap to clone.
#[derive(Clone, Default)]
pub struct CalendarRegistry {
    calendars: BTreeMap<VenueId, Arc<dyn TradingCalendar>>,
}

impl CalendarRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in `nyse` and `bcba` venues.
    pub fn builtin() -> Self {
        let mut reg = Self::new();
        reg.register(Arc::new(ExchangeCalendar::nyse()));
        reg.register(Arc::new(BusinessDayCalendar::bcba()));
        reg
    }

    /// Registers (or replaces) the calendar for its own venue id.
    pub fn register(&mut self, calendar: Arc<dyn TradingCalendar>) {
        self.calendars.insert(calendar.venue().clone(), calendar);
    }

    pub fn get(&self, venue: &VenueId) -> Result<Arc<dyn TradingCalendar>, CalendarError> {
        self.calendars
            .get(venue)
            .cloned()
            .ok_or_else(|| CalendarError::CalendarUnavailable {
                venue: venue.clone(),
                reason: "no calendar registered for venue".to_string(),
            })
    }

    pub fn venues(&self) -> impl Iterator<Item = &VenueId> {
        self.calendars.keys()
    }
}

impl std::fmt::Debug for CalendarRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CalendarRegistry")
            .field("venues", &self.calendars.keys().collect::<Vec<_>>())
            .finish()
    }
}
