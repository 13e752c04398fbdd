//! Rendering of analysis results.
//!
//! Text output is one `key=value` record per line, prefixed by the record kind
//! (`session`, `row`, `skip`, `window`, `extreme`, `variation`) so it can be
//! grepped. JSON output is one pretty-printed document.

use anyhow::{Context, Result};
use serde::Serialize;
use xvol_analysis::{
    AggregateStats, DailySummaryRow, SessionBatch, SkipRecord, VariationSeries, WindowBatch, WindowOutcome,
    WindowReport,
};

#[derive(Debug, Serialize)]
pub struct SessionDocument<'a> {
    pub config_hash: &'a str,
    pub universe: &'a str,
    pub session: &'a SessionBatch,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub windows: Option<&'a WindowBatch>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub variations: Vec<VariationSeries>,
}

pub fn to_json<T: Serialize>(doc: &T) -> Result<String> {
    serde_json::to_string_pretty(doc).context("serialize report json failed")
}

pub fn session_lines(doc: &SessionDocument<'_>) -> Vec<String> {
    let s = doc.session;
    let mut out = vec![format!(
        "session universe={} venue={} date={} reference_date={} rows={} skipped={} config_hash={}",
        doc.universe,
        s.venue,
        s.date,
        s.reference_date,
        s.rows.len(),
        s.skips.len(),
        doc.config_hash
    )];

    for row in &s.rows {
        out.push(format!(
            "row ticker={} date={} reference_date={} reference_close={:.4} samples={} total={} down={} up={}",
            row.ticker,
            row.date,
            row.reference.actual_date,
            row.reference.price,
            row.samples,
            row.result.total_crossings,
            row.result.transitions_down,
            row.result.transitions_up
        ));
    }
    out.extend(s.skips.iter().map(skip_line));

    if let Some(windows) = doc.windows {
        for report in &windows.reports {
            out.extend(window_lines(report));
        }
    }
    for series in &doc.variations {
        out.extend(variation_lines(series));
    }
    out
}

pub fn window_lines(report: &WindowReport) -> Vec<String> {
    let mut out = Vec::new();
    match &report.outcome {
        WindowOutcome::Complete { stats } => {
            out.push(format!(
                "window ticker={} venue={} anchor={} status=complete days={} mean_total={:.2} median_total={:.2} mean_down={:.2} mean_up={:.2}",
                report.ticker,
                report.venue,
                report.anchor,
                stats.days,
                stats.mean_total,
                stats.median_total,
                stats.mean_down,
                stats.mean_up
            ));
            out.extend(extreme_lines(&report.ticker, stats));
        }
        WindowOutcome::PartialWindow { gathered, target } => {
            out.push(format!(
                "window ticker={} venue={} anchor={} status=partial_window gathered={} target={}",
                report.ticker, report.venue, report.anchor, gathered, target
            ));
        }
    }
    out.extend(report.skips.iter().map(skip_line));
    out
}

fn extreme_lines(ticker: &str, stats: &AggregateStats) -> Vec<String> {
    let kinds: [(&str, &DailySummaryRow); 6] = [
        ("max_total", &stats.max_total),
        ("min_total", &stats.min_total),
        ("max_down", &stats.max_down),
        ("min_down", &stats.min_down),
        ("max_up", &stats.max_up),
        ("min_up", &stats.min_up),
    ];
    kinds
        .iter()
        .map(|(kind, row)| {
            format!(
                "extreme ticker={} kind={} date={} total={} down={} up={}",
                ticker,
                kind,
                row.date,
                row.result.total_crossings,
                row.result.transitions_down,
                row.result.transitions_up
            )
        })
        .collect()
}

pub fn variation_lines(series: &VariationSeries) -> Vec<String> {
    let mut out: Vec<String> = series
        .points
        .iter()
        .map(|p| {
            format!(
                "variation ticker={} date={} from={} from_close={:.4} close={:.4} pct_change={:.2}",
                series.ticker, p.date, p.from, p.from_close, p.close, p.pct_change
            )
        })
        .collect();
    out.extend(series.skips.iter().map(skip_line));
    out
}

fn skip_line(skip: &SkipRecord) -> String {
    format!("skip ticker={} date={} reason={:?}", skip.ticker, skip.date, skip.reason)
}
