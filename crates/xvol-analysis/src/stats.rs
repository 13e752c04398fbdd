use std::cmp::Ordering;

use serde::Serialize;
use xvol_calendar::TradingDate;
use xvol_md::ReferenceClose;

use crate::CrossingResult;

/// One analysed session inside a rolling window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DailySummaryRow {
    pub date: TradingDate,
    /// Close the session was compared against (the previous trading day's).
    pub reference: ReferenceClose,
    pub result: CrossingResult,
}

/// Summary over a set of [`DailySummaryRow`].
///
/// Extremal rows break ties by first occurrence in ascending date order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateStats {
    pub days: usize,
    pub mean_total: f64,
    pub median_total: f64,
    pub mean_down: f64,
    pub mean_up: f64,
    pub max_total: DailySummaryRow,
    pub min_total: DailySummaryRow,
    pub max_down: DailySummaryRow,
    pub min_down: DailySummaryRow,
    pub max_up: DailySummaryRow,
    pub min_up: DailySummaryRow,
}

impl AggregateStats {
    /// `None` for an empty set.
    pub fn from_rows(rows: &[DailySummaryRow]) -> Option<Self> {
        let first = rows.first()?;
        let mut sorted = rows.to_vec();
        sorted.sort_by_key(|r| r.date);

        let totals: Vec<u32> = sorted.iter().map(|r| r.result.total_crossings).collect();
        let downs = sorted.iter().map(|r| r.result.transitions_down);
        let ups = sorted.iter().map(|r| r.result.transitions_up);

        let total = |r: &DailySummaryRow| r.result.total_crossings;
        let down = |r: &DailySummaryRow| r.result.transitions_down;
        let up = |r: &DailySummaryRow| r.result.transitions_up;

        Some(Self {
            days: sorted.len(),
            mean_total: mean(totals.iter().copied()),
            median_total: median(&totals),
            mean_down: mean(downs),
            mean_up: mean(ups),
            max_total: extremal(&sorted, total, Ordering::Greater).unwrap_or(*first),
            min_total: extremal(&sorted, total, Ordering::Less).unwrap_or(*first),
            max_down: extremal(&sorted, down, Ordering::Greater).unwrap_or(*first),
            min_down: extremal(&sorted, down, Ordering::Less).unwrap_or(*first),
            max_up: extremal(&sorted, up, Ordering::Greater).unwrap_or(*first),
            min_up: extremal(&sorted, up, Ordering::Less).unwrap_or(*first),
        })
    }
}

fn mean<I: Iterator<Item = u32>>(values: I) -> f64 {
    let (sum, n) = values.fold((0u64, 0u64), |(s, n), v| (s + u64::from(v), n + 1));
    if n == 0 {
        0.0
    } else {
        sum as f64 / n as f64
    }
}

fn median(values: &[u32]) -> f64 {
    let mut v = values.to_vec();
    v.sort_unstable();
    let n = v.len();
    match n {
        0 => 0.0,
        _ if n % 2 == 1 => f64::from(v[n / 2]),
        _ => (f64::from(v[n / 2 - 1]) + f64::from(v[n / 2])) / 2.0,
    }
}

/// First row (in slice order) whose key is strictly better than all earlier.
fn extremal<F>(rows: &[DailySummaryRow], key: F, want: Ordering) -> Option<DailySummaryRow>
where
    F: Fn(&DailySummaryRow) -> u32,
{
    let mut best: Option<&DailySummaryRow> = None;
    for row in rows {
        match best {
            Some(b) if key(row).cmp(&key(b)) != want => {}
            _ => best = Some(row),
        }
    }
    best.copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::NaiveDate;
    use xvol_calendar::{BusinessDayCalendar, TradingCalendar};

    fn row(day: u32, down: u32, up: u32) -> DailySummaryRow {
        let cal = BusinessDayCalendar::bcba();
        let date = NaiveDate::from_ymd_opt(2025, 9, day).unwrap();
        let td = cal.last_trading_day_on_or_before(date).unwrap();
        assert_eq!(td.date(), date, "fixture day must trade");
        let prev = NaiveDate::from_ymd_opt(2025, 8, 29).unwrap();
        DailySummaryRow {
            date: td,
            reference: ReferenceClose::new(100.0, prev, prev).unwrap(),
            result: CrossingResult::new(down, up),
        }
    }

    #[test]
    fn empty_set_has_no_stats() {
        assert!(AggregateStats::from_rows(&[]).is_none());
    }

    #[test]
    fn means_and_median() {
        let rows = [row(1, 1, 1), row(2, 0, 1), row(3, 3, 3), row(4, 1, 0)];
        let s = AggregateStats::from_rows(&rows).unwrap();
        assert_eq!(s.days, 4);
        // totals 2, 1, 6, 1
        assert_eq!(s.mean_total, 2.5);
        assert_eq!(s.median_total, 1.5);
        assert_eq!(s.mean_down, 1.25);
        assert_eq!(s.mean_up, 1.25);
    }

    #[test]
    fn ties_go_to_the_oldest_day() {
        // Given newest-first to make sure ordering is by date, not input.
        let rows = [row(4, 2, 0), row(3, 0, 2), row(2, 2, 0), row(1, 0, 2)];
        let s = AggregateStats::from_rows(&rows).unwrap();
        assert_eq!(s.max_total.date.date().to_string(), "2025-09-01");
        assert_eq!(s.min_total.date.date().to_string(), "2025-09-01");
        assert_eq!(s.max_down.date.date().to_string(), "2025-09-02");
        assert_eq!(s.min_down.date.date().to_string(), "2025-09-01");
        assert_eq!(s.max_up.date.date().to_string(), "2025-09-01");
        assert_eq!(s.min_up.date.date().to_string(), "2025-09-02");
    }

    #[test]
    fn odd_median() {
        assert_eq!(median(&[3, 1, 2]), 2.0);
        assert_eq!(median(&[]), 0.0);
    }
}
