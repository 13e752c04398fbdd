//! CSV fixture source for offline runs and tests.
//!
//! ## Column contract (header row required, order-independent)
//!
//! Intraday file:
//!
//! | Column      | Example                     | Notes                 |
//! |-------------|-----------------------------|-----------------------|
//! | `ticker`    | `GGAL.BA`                   | case-insensitive      |
//! | `timestamp` | `2024-01-08T14:31:00Z`      | RFC 3339              |
//! | `price`     | `1012.5`                    | adjusted price        |
//!
//! Close file:
//!
//! | Column   | Example      |
//! |----------|--------------|
//! | `ticker` | `GGAL.BA`    |
//! | `date`   | `2024-01-05` |
//! | `close`  | `1003.0`     |

use std::collections::{BTreeMap, HashMap};
use std::io::Read;
use std::path::Path;

use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::Deserialize;

use crate::{
    clean_series, normalize_ticker, IntradayRequest, PriceDataSource, PriceSample, ReferenceClose,
    SourceError, CLOSE_LOOKBACK_DAYS,
};

#[derive(Debug, Deserialize)]
struct IntradayRow {
    ticker: String,
    timestamp: DateTime<Utc>,
    price: f64,
}

#[derive(Debug, Deserialize)]
struct CloseRow {
    ticker: String,
    date: NaiveDate,
    close: f64,
}

/// In-memory series loaded from CSV.
#[derive(Debug, Clone, Default)]
pub struct CsvSource {
    intraday: HashMap<String, Vec<PriceSample>>,
    closes: HashMap<String, BTreeMap<NaiveDate, f64>>,
}

impl CsvSource {
    pub fn from_paths(intraday: &Path, closes: &Path) -> Result<Self, SourceError> {
        let open = |p: &Path| {
            std::fs::File::open(p)
                .map_err(|e| SourceError::Decode(format!("open '{}': {e}", p.display())))
        };
        Self::from_readers(open(intraday)?, open(closes)?)
    }

    pub fn from_strs(intraday: &str, closes: &str) -> Result<Self, SourceError> {
        Self::from_readers(intraday.as_bytes(), closes.as_bytes())
    }

    pub fn from_readers<R1: Read, R2: Read>(intraday: R1, closes: R2) -> Result<Self, SourceError> {
        let mut out = CsvSource::default();

        let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(intraday);
        for (i, row) in rdr.deserialize::<IntradayRow>().enumerate() {
            let row = row.map_err(|e| SourceError::Decode(format!("intraday csv row {}: {e}", i + 1)))?;
            out.intraday
                .entry(normalize_ticker(&row.ticker))
                .or_default()
                .push(PriceSample::new(row.timestamp, row.price));
        }
        for series in out.intraday.values_mut() {
            *series = clean_series(std::mem::take(series));
        }

        let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(closes);
        for (i, row) in rdr.deserialize::<CloseRow>().enumerate() {
            let row = row.map_err(|e| SourceError::Decode(format!("close csv row {}: {e}", i + 1)))?;
            if row.close.is_finite() && row.close > 0.0 {
                out.closes
                    .entry(normalize_ticker(&row.ticker))
                    .or_default()
                    .insert(row.date, row.close);
            }
        }

        Ok(out)
    }

    pub fn tickers(&self) -> Vec<String> {
        let mut t: Vec<String> = self
            .intraday
            .keys()
            .chain(self.closes.keys())
            .cloned()
            .collect();
        t.sort();
        t.dedup();
        t
    }
}

#[async_trait::async_trait]
impl PriceDataSource for CsvSource {
    fn name(&self) -> &'static str {
        "csv"
    }

    async fn fetch_intraday(&self, req: &IntradayRequest) -> Result<Vec<PriceSample>, SourceError> {
        let (start, end) = req.window();
        let samples: Vec<PriceSample> = self
            .intraday
            .get(&normalize_ticker(&req.ticker))
            .map(|series| {
                series
                    .iter()
                    .filter(|s| s.ts >= start && s.ts < end)
                    .copied()
                    .collect()
            })
            .unwrap_or_default();

        if samples.is_empty() {
            return Err(SourceError::unavailable(&req.ticker, req.date, "no intraday rows"));
        }
        Ok(samples)
    }

    async fn fetch_close_on_or_before(
        &self,
        ticker: &str,
        date: NaiveDate,
    ) -> Result<ReferenceClose, SourceError> {
        let ticker = normalize_ticker(ticker);
        let floor = date
            .checked_sub_days(Days::new(CLOSE_LOOKBACK_DAYS))
            .unwrap_or(NaiveDate::MIN);

        let found = self
            .closes
            .get(&ticker)
            .and_then(|m| m.range(floor..=date).next_back());

        match found {
            Some((actual, price)) => ReferenceClose::new(*price, date, *actual),
            None => Err(SourceError::unavailable(ticker, date, "no close rows")),
        }
    }
}
