//! Yahoo Finance chart API source.
//!
//! `GET {base}/v8/finance/chart/{TICKER}?period1=..&period2=..&interval=..`
//!
//! Adjusted closes are preferred when the payload carries them (daily bars);
//! intraday payloads only carry raw closes, which are the adjusted price for
//! the current session.

use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::Deserialize;

use crate::{
    clean_series, normalize_ticker, IntradayRequest, PriceDataSource, PriceSample, ReferenceClose,
    SourceError, CLOSE_LOOKBACK_DAYS,
};

const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";
const USER_AGENT: &str = "Mozilla/5.0 (compatible; xvol/0.0.1)";

#[derive(Debug, Clone)]
pub struct YahooChartSource {
    http: reqwest::Client,
    base_url: String,
}

impl Default for YahooChartSource {
    fn default() -> Self {
        Self::new()
    }
}

impl YahooChartSource {
    pub fn new() -> Self {
        Self::new_with_base_url(DEFAULT_BASE_URL.to_string())
    }

    pub fn new_with_base_url(base_url: String) -> Self {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { http, base_url }
    }

    fn chart_url(&self, ticker: &str) -> String {
        format!("{}/v8/finance/chart/{}", self.base_url.trim_end_matches('/'), ticker)
    }

    async fn get_chart(
        &self,
        ticker: &str,
        date: NaiveDate,
        period1: i64,
        period2: i64,
        interval: &str,
    ) -> Result<Series, SourceError> {
        let p1 = period1.to_string();
        let p2 = period2.to_string();
        let resp = self
            .http
            .get(self.chart_url(ticker))
            .query(&[
                ("period1", p1.as_str()),
                ("period2", p2.as_str()),
                ("interval", interval),
                ("includePrePost", "false"),
                ("events", "div,splits"),
            ])
            .send()
            .await
            .map_err(|e| SourceError::Transport(format!("yahoo request failed: {e}")))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| SourceError::Transport(format!("yahoo body read failed: {e}")))?;
        let envelope: Option<ChartEnvelope> = serde_json::from_str(&body).ok();

        if let Some(err) = envelope.as_ref().and_then(|e| e.chart.error.as_ref()) {
            if status.as_u16() == 404 || err.code.eq_ignore_ascii_case("not found") {
                return Err(SourceError::unavailable(ticker, date, err.description.clone()));
            }
            return Err(SourceError::Api {
                code: Some(i64::from(status.as_u16())),
                message: format!("{}: {}", err.code, err.description),
            });
        }
        if !status.is_success() {
            return Err(SourceError::Api {
                code: Some(i64::from(status.as_u16())),
                message: "unexpected http status".to_string(),
            });
        }

        let envelope =
            envelope.ok_or_else(|| SourceError::Decode("yahoo chart json decode failed".to_string()))?;
        let result = envelope
            .chart
            .result
            .and_then(|mut r| if r.is_empty() { None } else { Some(r.swap_remove(0)) })
            .ok_or_else(|| SourceError::unavailable(ticker, date, "empty chart result"))?;

        Ok(Series::from_result(result))
    }
}

/// Decoded `(epoch seconds, price)` pairs plus the exchange UTC offset.
struct Series {
    gmtoffset: i64,
    points: Vec<(i64, f64)>,
}

impl Series {
    fn from_result(result: ChartResult) -> Self {
        let adj = result
            .indicators
            .adjclose
            .into_iter()
            .next()
            .map(|b| b.adjclose)
            .filter(|v| v.len() == result.timestamp.len());
        let prices = match adj {
            Some(v) => v,
            None => result
                .indicators
                .quote
                .into_iter()
                .next()
                .map(|q| q.close)
                .unwrap_or_default(),
        };

        let points = result
            .timestamp
            .iter()
            .zip(prices)
            .filter_map(|(ts, p)| p.map(|p| (*ts, p)))
            .collect();

        Series {
            gmtoffset: result.meta.gmtoffset,
            points,
        }
    }
}

#[async_trait::async_trait]
impl PriceDataSource for YahooChartSource {
    fn name(&self) -> &'static str {
        "yahoo"
    }

    async fn fetch_intraday(&self, req: &IntradayRequest) -> Result<Vec<PriceSample>, SourceError> {
        let ticker = normalize_ticker(&req.ticker);
        let (start, end) = req.window();
        let series = self
            .get_chart(&ticker, req.date, start.timestamp(), end.timestamp(), req.interval.as_str())
            .await?;

        let samples: Vec<PriceSample> = series
            .points
            .into_iter()
            .filter_map(|(ts, p)| DateTime::<Utc>::from_timestamp(ts, 0).map(|t| PriceSample::new(t, p)))
            .filter(|s| s.ts >= start && s.ts < end)
            .collect();
        let samples = clean_series(samples);

        if samples.is_empty() {
            return Err(SourceError::unavailable(ticker, req.date, "no intraday samples in session"));
        }
        tracing::debug!(%ticker, date = %req.date, n = samples.len(), "yahoo intraday");
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
        let ceil = date.checked_add_days(Days::new(2)).unwrap_or(date);
        let p1 = floor.and_time(chrono::NaiveTime::default()).and_utc().timestamp();
        let p2 = ceil.and_time(chrono::NaiveTime::default()).and_utc().timestamp();

        let series = self.get_chart(&ticker, date, p1, p2, "1d").await?;

        let best = series
            .points
            .iter()
            .filter_map(|(ts, p)| {
                DateTime::<Utc>::from_timestamp(ts + series.gmtoffset, 0).map(|t| (t.date_naive(), *p))
            })
            .filter(|(d, p)| *d >= floor && *d <= date && p.is_finite() && *p > 0.0)
            .max_by_key(|(d, _)| *d);

        match best {
            Some((actual, price)) => ReferenceClose::new(price, date, actual),
            None => Err(SourceError::unavailable(ticker, date, "no daily close in lookback")),
        }
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: ChartBody,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    meta: ChartMeta,
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct ChartMeta {
    #[serde(default)]
    gmtoffset: i64,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<QuoteBlock>,
    #[serde(default)]
    adjclose: Vec<AdjCloseBlock>,
}

#[derive(Debug, Deserialize)]
struct QuoteBlock {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct AdjCloseBlock {
    #[serde(default)]
    adjclose: Vec<Option<f64>>,
}
