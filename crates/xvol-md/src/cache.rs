//! Read-through cache in front of a [`PriceDataSource`].
//!
//! Keys are `(ticker, window start, window end, interval)` for intraday series
//! and `(ticker, date)` for closes. Tickers never share keys, so one cache can
//! serve a whole batch. Successes and definitive "no data" answers are kept
//! for `ttl`; transient failures are never cached.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use chrono::{DateTime, NaiveDate, Utc};

use crate::{
    normalize_ticker, Interval, IntradayRequest, PriceDataSource, PriceSample, ReferenceClose,
    SourceError,
};

type IntradayKey = (String, DateTime<Utc>, DateTime<Utc>, Interval);
type CloseKey = (String, NaiveDate);

struct Entry<T> {
    stored_at: Instant,
    value: Result<T, SourceError>,
}

/// Hit/miss counters, for logs and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

pub struct CachedSource<S> {
    inner: S,
    ttl: Duration,
    intraday: Mutex<HashMap<IntradayKey, Entry<Vec<PriceSample>>>>,
    closes: Mutex<HashMap<CloseKey, Entry<ReferenceClose>>>,
    stats: Mutex<CacheStats>,
}

impl<S: PriceDataSource> CachedSource<S> {
    pub fn new(inner: S, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            intraday: Mutex::new(HashMap::new()),
            closes: Mutex::new(HashMap::new()),
            stats: Mutex::new(CacheStats::default()),
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn stats(&self) -> CacheStats {
        self.stats.lock().map(|s| *s).unwrap_or_default()
    }

    fn record(&self, hit: bool) {
        if let Ok(mut s) = self.stats.lock() {
            if hit {
                s.hits += 1;
            } else {
                s.misses += 1;
            }
        }
    }
}

fn lookup<K, T>(map: &Mutex<HashMap<K, Entry<T>>>, key: &K, ttl: Duration) -> Option<Result<T, SourceError>>
where
    K: std::hash::Hash + Eq,
    T: Clone,
{
    let mut guard = map.lock().ok()?;
    let expired = guard.get(key)?.stored_at.elapsed() > ttl;
    if expired {
        guard.remove(key);
        return None;
    }
    guard.get(key).map(|entry| entry.value.clone())
}

/// Inserts `value` when cacheable and drops every entry older than `ttl`.
fn store<K, T>(
    map: &Mutex<HashMap<K, Entry<T>>>,
    key: K,
    value: &Result<T, SourceError>,
    ttl: Duration,
) where
    K: std::hash::Hash + Eq,
    T: Clone,
{
    let keep = match value {
        Ok(_) => true,
        Err(e) => e.is_definitive(),
    };
    if !keep {
        return;
    }
    if let Ok(mut guard) = map.lock() {
        guard.retain(|_, entry| entry.stored_at.elapsed() <= ttl);
        guard.insert(
            key,
            Entry {
                stored_at: Instant::now(),
                value: value.clone(),
            },
        );
    }
}

#[async_trait::async_trait]
impl<S: PriceDataSource> PriceDataSource for CachedSource<S> {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    async fn fetch_intraday(&self, req: &IntradayRequest) -> Result<Vec<PriceSample>, SourceError> {
        let (start, end) = req.window();
        let key = (normalize_ticker(&req.ticker), start, end, req.interval);

        if let Some(hit) = lookup(&self.intraday, &key, self.ttl) {
            tracing::debug!(ticker = %req.ticker, date = %req.date, "intraday cache hit");
            self.record(true);
            return hit;
        }
        self.record(false);

        let value = self.inner.fetch_intraday(req).await;
        store(&self.intraday, key, &value, self.ttl);
        value
    }

    async fn fetch_close_on_or_before(
        &self,
        ticker: &str,
        date: NaiveDate,
    ) -> Result<ReferenceClose, SourceError> {
        let key = (normalize_ticker(ticker), date);

        if let Some(hit) = lookup(&self.closes, &key, self.ttl) {
            tracing::debug!(%ticker, %date, "close cache hit");
            self.record(true);
            return hit;
        }
        self.record(false);

        let value = self.inner.fetch_close_on_or_before(ticker, date).await;
        store(&self.closes, key, &value, self.ttl);
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use chrono::TimeZone;

    struct CountingSource {
        calls: AtomicUsize,
        fail_transport: bool,
    }

    #[async_trait::async_trait]
    impl PriceDataSource for CountingSource {
        fn name(&self) -> &'static str {
            "counting"
        }

        async fn fetch_intraday(&self, req: &IntradayRequest) -> Result<Vec<PriceSample>, SourceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_transport {
                return Err(SourceError::Transport("reset".into()));
            }
            let (start, _) = req.window();
            Ok(vec![PriceSample::new(start, 10.0)])
        }

        async fn fetch_close_on_or_before(
            &self,
            ticker: &str,
            date: NaiveDate,
        ) -> Result<ReferenceClose, SourceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(SourceError::unavailable(ticker, date, "no close"))
        }
    }

    fn source(fail_transport: bool) -> CountingSource {
        CountingSource {
            calls: AtomicUsize::new(0),
            fail_transport,
        }
    }

    fn req(ticker: &str) -> IntradayRequest {
        let date = NaiveDate::from_ymd_opt(2024, 1, 8).unwrap();
        IntradayRequest::new(ticker, date, Interval::M1, chrono_tz::UTC)
    }

    #[tokio::test]
    async fn second_fetch_is_served_from_cache() {
        let cached = CachedSource::new(source(false), Duration::from_secs(300));
        let a = cached.fetch_intraday(&req("ypf")).await.unwrap();
        let b = cached.fetch_intraday(&req("YPF")).await.unwrap();
        assert_eq!(a, b);
        assert_eq!(cached.inner().calls.load(Ordering::SeqCst), 1);
        assert_eq!(cached.stats(), CacheStats { hits: 1, misses: 1 });
    }

    #[tokio::test]
    async fn tickers_do_not_share_entries() {
        let cached = CachedSource::new(source(false), Duration::from_secs(300));
        cached.fetch_intraday(&req("YPF")).await.unwrap();
        cached.fetch_intraday(&req("GGAL")).await.unwrap();
        assert_eq!(cached.inner().calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn transient_errors_are_not_cached() {
        let cached = CachedSource::new(source(true), Duration::from_secs(300));
        assert!(cached.fetch_intraday(&req("YPF")).await.is_err());
        assert!(cached.fetch_intraday(&req("YPF")).await.is_err());
        assert_eq!(cached.inner().calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn unavailable_close_is_cached() {
        let cached = CachedSource::new(source(false), Duration::from_secs(300));
        let day = Utc.with_ymd_and_hms(2024, 1, 5, 0, 0, 0).unwrap().date_naive();
        assert!(cached.fetch_close_on_or_before("YPF", day).await.is_err());
        assert!(cached.fetch_close_on_or_before("ypf", day).await.is_err());
        assert_eq!(cached.inner().calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn expired_entries_are_evicted() {
        let cached = CachedSource::new(source(false), Duration::from_millis(20));
        let ypf = req("YPF");
        cached.fetch_intraday(&ypf).await.unwrap();
        tokio::time::sleep(Duration::from_millis(40)).await;

        // Storing another key sweeps the stale YPF entry.
        cached.fetch_intraday(&req("GGAL")).await.unwrap();
        assert_eq!(cached.intraday.lock().unwrap().len(), 1);

        // A lookup on a stale key removes it.
        tokio::time::sleep(Duration::from_millis(40)).await;
        let (start, end) = ypf.window();
        let ggal_key = ("GGAL".to_string(), start, end, Interval::M1);
        assert!(lookup(&cached.intraday, &ggal_key, cached.ttl).is_none());
        assert!(cached.intraday.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn zero_ttl_always_refetches() {
        let cached = CachedSource::new(source(false), Duration::ZERO);
        cached.fetch_intraday(&req("YPF")).await.unwrap();
        tokio::time::sleep(Duration::from_millis(2)).await;
        cached.fetch_intraday(&req("YPF")).await.unwrap();
        assert_eq!(cached.inner().calls.load(Ordering::SeqCst), 2);
    }
}
