//! Command handler modules for xvol-cli.
//!
//! Shared utilities used by multiple command paths live here.
//! Command-specific logic lives in the submodules.

pub mod calendar;
pub mod session;
pub mod window;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use xvol_calendar::{BusinessDayCalendar, CalendarRegistry, ExchangeCalendar, TradingCalendar, VenueId};
use xvol_config::{AnalysisConfig, LoadedConfig, UnusedKeyPolicy};
use xvol_md::{CachedSource, CsvSource, FetchPolicy, GuardedSource, Interval, PriceDataSource, YahooChartSource};

use crate::SourceArgs;

// ---------------------------------------------------------------------------
// Argument parsing
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

pub fn parse_format(format: &str) -> Result<OutputFormat> {
    match format.trim().to_ascii_lowercase().as_str() {
        "text" => Ok(OutputFormat::Text),
        "json" => Ok(OutputFormat::Json),
        other => anyhow::bail!("invalid --format '{}'. expected one of: text | json", other),
    }
}

/// Parse a `YYYY-MM-DD` flag value.
pub fn parse_date(flag: &str, raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .with_context(|| format!("invalid --{} '{}'. expected YYYY-MM-DD", flag, raw))
}

pub fn parse_interval(raw: &str) -> Result<Interval> {
    Ok(Interval::parse(raw)?)
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Built-in defaults plus the user's layers. Unused keys are logged, not fatal.
pub fn load_config(paths: &[String]) -> Result<(LoadedConfig, AnalysisConfig)> {
    let path_refs: Vec<&str> = paths.iter().map(|s| s.as_str()).collect();
    let loaded = xvol_config::load_with_defaults(&path_refs)?;

    let report = xvol_config::report_unused_keys(&loaded.config_json, UnusedKeyPolicy::Warn)?;
    if !report.is_clean() {
        tracing::warn!(keys = ?report.unused_leaf_pointers, "config keys not used by any command");
    }

    let cfg = loaded.analysis()?;
    tracing::debug!(config_hash = %loaded.config_hash, "config loaded");
    Ok((loaded, cfg))
}

/// Built-in venues with the config's extra closures applied.
pub fn build_registry(cfg: &AnalysisConfig) -> CalendarRegistry {
    let mut registry = CalendarRegistry::new();
    registry.register(Arc::new(
        ExchangeCalendar::nyse().with_extra_closures(cfg.extra_holidays("nyse").iter().copied()),
    ));
    registry.register(Arc::new(
        BusinessDayCalendar::bcba().with_extra_holidays(cfg.extra_holidays("bcba").iter().copied()),
    ));

    for name in cfg.venues.keys() {
        let id = VenueId::new(name);
        if registry.get(&id).is_err() {
            tracing::warn!(venue = %id, "extra_holidays given for a venue with no calendar; ignored");
        }
    }
    registry
}

pub fn calendar_for(registry: &CalendarRegistry, venue: &str) -> Result<Arc<dyn TradingCalendar>> {
    Ok(registry.get(&VenueId::new(venue))?)
}

// ---------------------------------------------------------------------------
// Price source
// ---------------------------------------------------------------------------

/// Base source behind the timeout/retry guard, then the cache when enabled.
pub fn build_source(args: &SourceArgs, cfg: &AnalysisConfig) -> Result<Arc<dyn PriceDataSource>> {
    let policy = FetchPolicy {
        timeout: cfg.fetch.timeout(),
        max_attempts: cfg.fetch.max_attempts,
        backoff: cfg.fetch.backoff(),
    };

    match args.source.trim().to_ascii_lowercase().as_str() {
        "yahoo" => {
            let base = match &args.yahoo_base_url {
                Some(url) => YahooChartSource::new_with_base_url(url.clone()),
                None => YahooChartSource::new(),
            };
            Ok(layer(GuardedSource::new(base, policy), cfg))
        }
        "csv" => {
            let intraday = args
                .intraday_csv
                .as_deref()
                .context("--source csv requires --intraday-csv")?;
            let closes = args
                .closes_csv
                .as_deref()
                .context("--source csv requires --closes-csv")?;
            let base = CsvSource::from_paths(Path::new(intraday), Path::new(closes))?;
            Ok(layer(GuardedSource::new(base, policy), cfg))
        }
        other => anyhow::bail!("invalid --source '{}'. expected one of: yahoo | csv", other),
    }
}

fn layer<S>(guarded: GuardedSource<S>, cfg: &AnalysisConfig) -> Arc<dyn PriceDataSource>
where
    S: PriceDataSource + 'static,
{
    if cfg.fetch.cache_ttl_secs == 0 {
        Arc::new(guarded)
    } else {
        Arc::new(CachedSource::new(guarded, cfg.fetch.cache_ttl()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_is_case_insensitive() {
        assert_eq!(parse_format("JSON").unwrap(), OutputFormat::Json);
        assert!(parse_format("yaml").is_err());
    }

    #[test]
    fn date_flag_error_names_the_flag() {
        let err = parse_date("date", "08/01/2024").unwrap_err().to_string();
        assert!(err.contains("--date"), "{err}");
        assert_eq!(
            parse_date("date", "2024-01-08").unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 8).unwrap()
        );
    }

    #[test]
    fn registry_applies_extra_closures() {
        let cfg = AnalysisConfig::from_json(&serde_json::json!({
            "venues": {"nyse": {"extra_holidays": ["2024-01-09"]}}
        }))
        .unwrap();
        let reg = build_registry(&cfg);
        let nyse = calendar_for(&reg, "NYSE").unwrap();
        assert!(!nyse.is_trading_day(NaiveDate::from_ymd_opt(2024, 1, 9).unwrap()).unwrap());
        assert!(calendar_for(&reg, "lse").is_err());
    }

    #[test]
    fn csv_source_needs_both_files() {
        let cfg = AnalysisConfig::from_json(&serde_json::json!({})).unwrap();
        let args = SourceArgs {
            source: "csv".to_string(),
            intraday_csv: Some("x.csv".to_string()),
            closes_csv: None,
            yahoo_base_url: None,
        };
        let err = build_source(&args, &cfg).err().map(|e| e.to_string()).unwrap_or_default();
        assert!(err.contains("--closes-csv"), "{err}");
    }
}
