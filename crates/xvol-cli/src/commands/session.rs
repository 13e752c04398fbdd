//! `xvol session`: one session across a ticker universe, optionally extended
//! with rolling-window statistics and the close-variation series.

use anyhow::Result;
use chrono::Utc;
use xvol_analysis::{
    close_variation_series, default_analysis_date, default_previous_date, resolve_analysis_date,
    run_session_batch, run_window_batch, RollingWindowAggregator, WindowParams,
};
use xvol_calendar::TradingCalendar;

use super::{build_registry, build_source, calendar_for, load_config, parse_date, parse_format, parse_interval, OutputFormat};
use crate::report::{self, SessionDocument};
use crate::{CommonArgs, SourceArgs};

pub struct SessionArgs {
    pub universe: String,
    pub date: Option<String>,
    pub previous_date: Option<String>,
    pub window: bool,
    pub variation: bool,
    pub source: SourceArgs,
    pub common: CommonArgs,
}

pub async fn run_session(args: SessionArgs) -> Result<()> {
    let format = parse_format(&args.common.format)?;
    let (loaded, cfg) = load_config(&args.common.config_paths)?;
    let universe = cfg.universe(&args.universe)?;
    let registry = build_registry(&cfg);
    let calendar = calendar_for(&registry, &universe.venue)?;
    let source = build_source(&args.source, &cfg)?;
    let interval = parse_interval(&cfg.analysis.interval)?;

    let now = Utc::now();
    let date = match &args.date {
        Some(raw) => resolve_analysis_date(calendar.as_ref(), parse_date("date", raw)?, now)?,
        None => default_analysis_date(calendar.as_ref(), now)?,
    };
    let reference_date = match &args.previous_date {
        Some(raw) => parse_date("previous-date", raw)?,
        None => default_previous_date(calendar.as_ref(), date)?.date(),
    };

    tracing::info!(
        universe = %args.universe,
        venue = %calendar.venue(),
        %date,
        %reference_date,
        tickers = universe.tickers.len(),
        source = source.name(),
        "session start"
    );

    let session = run_session_batch(
        calendar.as_ref(),
        source.as_ref(),
        &universe.tickers,
        date,
        reference_date,
        interval,
        cfg.fetch.concurrency,
    )
    .await?;

    let windows = if args.window {
        let aggregator = RollingWindowAggregator::new(WindowParams {
            window_size: cfg.analysis.window_size,
            interval,
            lookback_factor: cfg.analysis.lookback_factor,
        });
        Some(
            run_window_batch(
                calendar.as_ref(),
                source.as_ref(),
                &universe.tickers,
                date.date(),
                &aggregator,
                cfg.fetch.concurrency,
            )
            .await?,
        )
    } else {
        None
    };

    let mut variations = Vec::new();
    if args.variation {
        for ticker in &universe.tickers {
            variations.push(
                close_variation_series(
                    calendar.as_ref(),
                    source.as_ref(),
                    ticker,
                    date.date(),
                    cfg.analysis.window_calendar_days,
                    cfg.analysis.window_size,
                )
                .await?,
            );
        }
    }

    let doc = SessionDocument {
        config_hash: &loaded.config_hash,
        universe: &args.universe,
        session: &session,
        windows: windows.as_ref(),
        variations,
    };
    match format {
        OutputFormat::Json => println!("{}", report::to_json(&doc)?),
        OutputFormat::Text => {
            for line in report::session_lines(&doc) {
                println!("{line}");
            }
        }
    }

    Ok(())
}
