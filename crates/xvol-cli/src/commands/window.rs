//! Single-ticker commands: `xvol window` and `xvol variation`.

use anyhow::Result;
use chrono::{NaiveDate, Utc};
use serde::Serialize;
use xvol_analysis::{
    close_variation_series, default_analysis_date, resolve_analysis_date, RollingWindowAggregator,
    VariationSeries, WindowParams, WindowReport,
};
use xvol_calendar::TradingCalendar;

use super::{build_registry, build_source, calendar_for, load_config, parse_date, parse_format, parse_interval, OutputFormat};
use crate::report;
use crate::{CommonArgs, SourceArgs};

#[derive(Serialize)]
struct WindowDocument<'a> {
    config_hash: &'a str,
    report: &'a WindowReport,
}

#[derive(Serialize)]
struct VariationDocument<'a> {
    config_hash: &'a str,
    series: &'a VariationSeries,
}

fn resolve_anchor(calendar: &dyn TradingCalendar, anchor: Option<&str>) -> Result<NaiveDate> {
    let now = Utc::now();
    let day = match anchor {
        Some(raw) => resolve_analysis_date(calendar, parse_date("anchor", raw)?, now)?,
        None => default_analysis_date(calendar, now)?,
    };
    Ok(day.date())
}

pub async fn run_window(
    ticker: String,
    venue: String,
    anchor: Option<String>,
    size: Option<usize>,
    source_args: SourceArgs,
    common: CommonArgs,
) -> Result<()> {
    let format = parse_format(&common.format)?;
    let (loaded, cfg) = load_config(&common.config_paths)?;
    let registry = build_registry(&cfg);
    let calendar = calendar_for(&registry, &venue)?;
    let source = build_source(&source_args, &cfg)?;
    let anchor = resolve_anchor(calendar.as_ref(), anchor.as_deref())?;

    let aggregator = RollingWindowAggregator::new(WindowParams {
        window_size: size.unwrap_or(cfg.analysis.window_size),
        interval: parse_interval(&cfg.analysis.interval)?,
        lookback_factor: cfg.analysis.lookback_factor,
    });
    let report = aggregator
        .aggregate(&ticker, calendar.as_ref(), source.as_ref(), anchor)
        .await?;

    match format {
        OutputFormat::Json => {
            let doc = WindowDocument {
                config_hash: &loaded.config_hash,
                report: &report,
            };
            println!("{}", report::to_json(&doc)?);
        }
        OutputFormat::Text => {
            for row in &report.rows {
                println!(
                    "day date={} reference_date={} total={} down={} up={}",
                    row.date,
                    row.reference.actual_date,
                    row.result.total_crossings,
                    row.result.transitions_down,
                    row.result.transitions_up
                );
            }
            for line in report::window_lines(&report) {
                println!("{line}");
            }
            println!("config_hash={}", loaded.config_hash);
        }
    }
    Ok(())
}

pub async fn run_variation(
    ticker: String,
    venue: String,
    anchor: Option<String>,
    source_args: SourceArgs,
    common: CommonArgs,
) -> Result<()> {
    let format = parse_format(&common.format)?;
    let (loaded, cfg) = load_config(&common.config_paths)?;
    let registry = build_registry(&cfg);
    let calendar = calendar_for(&registry, &venue)?;
    let source = build_source(&source_args, &cfg)?;
    let anchor = resolve_anchor(calendar.as_ref(), anchor.as_deref())?;

    let series = close_variation_series(
        calendar.as_ref(),
        source.as_ref(),
        &ticker,
        anchor,
        cfg.analysis.window_calendar_days,
        cfg.analysis.window_size,
    )
    .await?;

    match format {
        OutputFormat::Json => {
            let doc = VariationDocument {
                config_hash: &loaded.config_hash,
                series: &series,
            };
            println!("{}", report::to_json(&doc)?);
        }
        OutputFormat::Text => {
            for line in report::variation_lines(&series) {
                println!("{line}");
            }
            println!("config_hash={}", loaded.config_hash);
        }
    }
    Ok(())
}
