//! `xvol calendar days`, `xvol calendar last` and `xvol calendar coverage`.

use anyhow::Result;
use xvol_calendar::TradingCalendar;

use super::{build_registry, calendar_for, load_config, parse_date};

pub fn days(venue: &str, start: &str, end: &str, config_paths: &[String]) -> Result<()> {
    let (_, cfg) = load_config(config_paths)?;
    let registry = build_registry(&cfg);
    let calendar = calendar_for(&registry, venue)?;

    let start = parse_date("start", start)?;
    let end = parse_date("end", end)?;
    let days = calendar.valid_trading_days(start, end)?;

    for day in &days {
        println!("{day}");
    }
    println!("venue={} start={} end={} trading_days={}", calendar.venue(), start, end, days.len());
    Ok(())
}

pub fn last(venue: &str, date: &str, config_paths: &[String]) -> Result<()> {
    let (_, cfg) = load_config(config_paths)?;
    let registry = build_registry(&cfg);
    let calendar = calendar_for(&registry, venue)?;

    let date = parse_date("date", date)?;
    let day = calendar.last_trading_day_on_or_before(date)?;
    println!("venue={} date={} last_trading_day={}", calendar.venue(), date, day);
    Ok(())
}

pub fn coverage(config_paths: &[String]) -> Result<()> {
    let (_, cfg) = load_config(config_paths)?;
    let registry = build_registry(&cfg);

    for venue in registry.venues() {
        let calendar = registry.get(venue)?;
        let (start, end) = calendar.coverage();
        println!(
            "venue={} timezone={} covered_from={} covered_to={}",
            venue,
            calendar.timezone(),
            start,
            end
        );
    }
    Ok(())
}
