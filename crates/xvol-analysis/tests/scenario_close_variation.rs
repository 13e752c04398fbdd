//! Scenario: close-to-next-close variation on BCBA, 30 calendar days ending
//! Friday 2025-09-26, at most 20 sessions.
//!
//! Sessions in [Aug 27, Sep 26]: Aug 27-29 plus the 20 September weekdays;
//! the newest 20 are Sep 1..26. Sep 26 is the anchor and has no later
//! session inside the window, so 19 pairs remain. Close on day-of-month `n`
//! is `100 + n`.

use chrono::{Datelike, NaiveDate};
use xvol_analysis::{close_variation_series, pct_change};
use xvol_calendar::BusinessDayCalendar;
use xvol_md::{IntradayRequest, PriceDataSource, PriceSample, ReferenceClose, SourceError};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

struct DailyCloses {
    missing: Option<NaiveDate>,
}

#[async_trait::async_trait]
impl PriceDataSource for DailyCloses {
    fn name(&self) -> &'static str {
        "daily"
    }

    async fn fetch_intraday(&self, req: &IntradayRequest) -> Result<Vec<PriceSample>, SourceError> {
        Err(SourceError::unavailable(&req.ticker, req.date, "closes only"))
    }

    async fn fetch_close_on_or_before(
        &self,
        _ticker: &str,
        date: NaiveDate,
    ) -> Result<ReferenceClose, SourceError> {
        // Weekday closes only; a missing date falls back to the day before.
        let mut day = date;
        while day.weekday().number_from_monday() > 5 || Some(day) == self.missing {
            day = day.pred_opt().unwrap();
        }
        ReferenceClose::new(100.0 + f64::from(day.day()), date, day)
    }
}

#[tokio::test]
async fn nineteen_pairs_dated_at_the_next_session() {
    let cal = BusinessDayCalendar::bcba();
    let series = close_variation_series(&cal, &DailyCloses { missing: None }, "ggal.ba", d(2025, 9, 26), 30, 20)
        .await
        .unwrap();

    assert_eq!(series.ticker, "GGAL.BA");
    assert_eq!(series.points.len(), 19);
    assert!(series.skips.is_empty());

    let first = &series.points[0];
    assert_eq!(first.from.date(), d(2025, 9, 1));
    assert_eq!(first.date.date(), d(2025, 9, 2));
    assert!((first.pct_change - pct_change(101.0, 102.0)).abs() < 1e-12);
    assert!(first.pct_change > 0.0);

    assert_eq!(series.points.last().unwrap().date.date(), d(2025, 9, 26));
}

#[tokio::test]
async fn friday_pairs_with_monday() {
    let cal = BusinessDayCalendar::bcba();
    let series = close_variation_series(&cal, &DailyCloses { missing: None }, "GGAL.BA", d(2025, 9, 26), 30, 20)
        .await
        .unwrap();

    let monday = series
        .points
        .iter()
        .find(|p| p.from.date() == d(2025, 9, 5))
        .unwrap();
    assert_eq!(monday.date.date(), d(2025, 9, 8));
    assert_eq!(monday.from_close, 105.0);
    assert_eq!(monday.close, 108.0);
}

#[tokio::test]
async fn missing_close_skips_both_adjacent_pairs() {
    let cal = BusinessDayCalendar::bcba();
    let src = DailyCloses {
        missing: Some(d(2025, 9, 10)),
    };
    let series = close_variation_series(&cal, &src, "GGAL.BA", d(2025, 9, 26), 30, 20)
        .await
        .unwrap();

    assert_eq!(series.points.len(), 17);
    let skipped: Vec<NaiveDate> = series.skips.iter().map(|s| s.date).collect();
    assert_eq!(skipped, vec![d(2025, 9, 10), d(2025, 9, 11)]);
    assert!(series.points.iter().all(|p| p.date.date() != d(2025, 9, 10)));
}

#[tokio::test]
async fn anchor_on_last_covered_day_needs_no_later_session() {
    // BCBA holiday data ends 2027-12-31; Jan 2028 is never looked up.
    let cal = BusinessDayCalendar::bcba();
    let series = close_variation_series(&cal, &DailyCloses { missing: None }, "GGAL.BA", d(2027, 12, 31), 30, 20)
        .await
        .unwrap();

    // 22 sessions in December (Dec 8 closed); the newest 20 start Dec 3.
    assert_eq!(series.points.len(), 19);
    assert_eq!(series.points[0].from.date(), d(2027, 12, 3));
    assert_eq!(series.points.last().unwrap().date.date(), d(2027, 12, 31));

    let year_end = close_variation_series(&cal, &DailyCloses { missing: None }, "GGAL.BA", d(2026, 12, 31), 30, 20)
        .await
        .unwrap();
    assert_eq!(year_end.points.last().unwrap().date.date(), d(2026, 12, 31));
}
