//! Last-trading-day resolution across weekends, holiday clusters and
//! calendar data gaps.
//!
//!   2024-01-05 Fri: regular NYSE session
//!   2024-01-07 Sun: weekend
//!   2024-01-01 Mon: New Year's Day (NYSE closed)
//!   2024-03-28..04-02: Semana Santa + Malvinas cluster (BCBA closed 4 sessions)

use chrono::NaiveDate;
use xvol_calendar::*;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

#[test]
fn sunday_resolves_to_previous_friday() {
    let cal = ExchangeCalendar::nyse();
    let got = cal.last_trading_day_on_or_before(d(2024, 1, 7)).unwrap();
    assert_eq!(got.date(), d(2024, 1, 5));
    assert!(got.date() < d(2024, 1, 7));
}

#[test]
fn trading_day_resolves_to_itself() {
    let cal = ExchangeCalendar::nyse();
    let got = cal.last_trading_day_on_or_before(d(2024, 1, 8)).unwrap();
    assert_eq!(got.date(), d(2024, 1, 8));
}

#[test]
fn resolution_is_idempotent() {
    let nyse = ExchangeCalendar::nyse();
    let bcba = BusinessDayCalendar::bcba();
    let cals: [&dyn TradingCalendar; 2] = [&nyse, &bcba];

    for cal in cals {
        for day in d(2024, 3, 20).iter_days().take(30) {
            let first = cal.last_trading_day_on_or_before(day).unwrap();
            let second = cal.last_trading_day_on_or_before(first.date()).unwrap();
            assert_eq!(first, second, "venue={} day={}", cal.venue(), day);
        }
    }
}

#[test]
fn holiday_crosses_year_boundary() {
    let cal = ExchangeCalendar::nyse();
    let got = cal.last_trading_day_on_or_before(d(2024, 1, 1)).unwrap();
    assert_eq!(got.date(), d(2023, 12, 29));
}

#[test]
fn bcba_easter_cluster_skips_four_closures() {
    let cal = BusinessDayCalendar::bcba();
    let got = cal.last_trading_day_on_or_before(d(2024, 4, 2)).unwrap();
    assert_eq!(got.date(), d(2024, 3, 27));

    let next = cal.next_trading_day_after(d(2024, 3, 27)).unwrap();
    assert_eq!(next.date(), d(2024, 4, 3));
}

#[test]
fn previous_trading_day_skips_weekend() {
    let cal = ExchangeCalendar::nyse();
    let monday = cal.last_trading_day_on_or_before(d(2024, 1, 8)).unwrap();
    let prev = cal.previous_trading_day(monday).unwrap();
    assert_eq!(prev.date(), d(2024, 1, 5));
}

#[test]
fn closure_longer_than_lookback_is_an_error() {
    let mut table = HolidayTable::new(2024, 2024);
    for day in d(2024, 1, 1).iter_days().take(15) {
        table.insert(day, "market suspended");
    }
    let cal = BusinessDayCalendar::new(
        VenueId::new("test"),
        chrono_tz::UTC,
        Weekmask::MON_FRI,
        table,
    );

    let err = cal.last_trading_day_on_or_before(d(2024, 1, 14)).unwrap_err();
    match err {
        CalendarError::NoTradingDayFound {
            reference,
            lookback_days,
            ..
        } => {
            assert_eq!(reference, d(2024, 1, 14));
            assert_eq!(lookback_days, LOOKBACK_DAYS);
        }
        other => panic!("expected NoTradingDayFound, got {other:?}"),
    }
}

#[test]
fn date_beyond_holiday_data_is_unavailable() {
    let cal = BusinessDayCalendar::bcba();
    let err = cal.last_trading_day_on_or_before(d(2028, 3, 1)).unwrap_err();
    assert!(matches!(err, CalendarError::CalendarUnavailable { .. }));
}

#[test]
fn bcba_holy_week_2027() {
    // Mar 24 (Memoria) runs straight into Jueves and Viernes Santo.
    let cal = BusinessDayCalendar::bcba();
    assert_eq!(cal.last_trading_day_on_or_before(d(2027, 3, 28)).unwrap().date(), d(2027, 3, 23));
    assert!(!cal.is_trading_day(d(2027, 2, 8)).unwrap());
    assert!(cal.is_trading_day(d(2027, 2, 10)).unwrap());
    assert!(cal.is_trading_day(d(2027, 12, 31)).unwrap());
}
