use std::collections::BTreeMap;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Typed view over the merged config document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub universes: BTreeMap<String, UniverseConfig>,
    #[serde(default)]
    pub analysis: AnalysisSection,
    #[serde(default)]
    pub fetch: FetchSection,
    #[serde(default)]
    pub venues: BTreeMap<String, VenueSection>,
}

/// A named ticker set bound to exactly one venue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniverseConfig {
    pub venue: String,
    pub tickers: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisSection {
    /// Intraday sampling interval (`1m`, `5m`, ...).
    pub interval: String,
    /// Rolling window size in trading days.
    pub window_size: usize,
    /// Calendar span of the close-variation series.
    pub window_calendar_days: u64,
    /// Rolling-window scan cap multiplier.
    pub lookback_factor: u32,
}

impl Default for AnalysisSection {
    fn default() -> Self {
        Self {
            interval: "1m".to_string(),
            window_size: 20,
            window_calendar_days: 30,
            lookback_factor: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchSection {
    pub timeout_secs: u64,
    pub max_attempts: u32,
    pub backoff_ms: u64,
    /// 0 disables the cache.
    pub cache_ttl_secs: u64,
    /// Tickers fetched at once within a batch.
    pub concurrency: usize,
}

impl Default for FetchSection {
    fn default() -> Self {
        Self {
            timeout_secs: 15,
            max_attempts: 2,
            backoff_ms: 250,
            cache_ttl_secs: 300,
            concurrency: 4,
        }
    }
}

impl FetchSection {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn backoff(&self) -> Duration {
        Duration::from_millis(self.backoff_ms)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VenueSection {
    /// Closures added on top of the built-in holiday table.
    #[serde(default)]
    pub extra_holidays: Vec<NaiveDate>,
}

impl AnalysisConfig {
    pub fn from_json(v: &Value) -> Result<Self> {
        let cfg: AnalysisConfig =
            serde_json::from_value(v.clone()).context("config does not match the analysis schema")?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<()> {
        if self.analysis.window_size == 0 {
            bail!("CONFIG_INVALID analysis.window_size must be >= 1");
        }
        if self.analysis.lookback_factor == 0 {
            bail!("CONFIG_INVALID analysis.lookback_factor must be >= 1");
        }
        if self.fetch.max_attempts == 0 {
            bail!("CONFIG_INVALID fetch.max_attempts must be >= 1");
        }
        if self.fetch.concurrency == 0 {
            bail!("CONFIG_INVALID fetch.concurrency must be >= 1");
        }
        for (name, u) in &self.universes {
            if u.venue.trim().is_empty() {
                bail!("CONFIG_INVALID universes.{name}.venue is empty");
            }
            if u.tickers.iter().all(|t| t.trim().is_empty()) {
                bail!("CONFIG_INVALID universes.{name}.tickers is empty");
            }
        }
        Ok(())
    }

    /// Case-insensitive universe lookup.
    pub fn universe(&self, name: &str) -> Result<&UniverseConfig> {
        let wanted = name.trim().to_ascii_lowercase();
        match self
            .universes
            .iter()
            .find(|(k, _)| k.to_ascii_lowercase() == wanted)
        {
            Some((_, u)) => Ok(u),
            None => {
                let known: Vec<&str> = self.universes.keys().map(|k| k.as_str()).collect();
                bail!("unknown universe '{name}'. known: {}", known.join(" | "))
            }
        }
    }

    pub fn extra_holidays(&self, venue: &str) -> &[NaiveDate] {
        let wanted = venue.trim().to_ascii_lowercase();
        self.venues
            .iter()
            .find(|(k, _)| k.to_ascii_lowercase() == wanted)
            .map(|(_, v)| v.extra_holidays.as_slice())
            .unwrap_or(&[])
    }
}
