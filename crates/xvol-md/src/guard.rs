//! Bounded-wait fetch with a retry-or-skip policy.
//!
//! Every call is wrapped in `tokio::time::timeout`. Transient failures
//! (timeouts, transport errors) are retried up to `max_attempts` with linear
//! backoff; anything else is returned immediately so the caller can skip.

use std::time::Duration;

use chrono::NaiveDate;

use crate::{IntradayRequest, PriceDataSource, PriceSample, ReferenceClose, SourceError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchPolicy {
    pub timeout: Duration,
    /// Total attempts including the first (minimum 1).
    pub max_attempts: u32,
    /// Delay before attempt `n + 1` is `backoff * n`.
    pub backoff: Duration,
}

impl Default for FetchPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(15),
            max_attempts: 2,
            backoff: Duration::from_millis(250),
        }
    }
}

pub struct GuardedSource<S> {
    inner: S,
    policy: FetchPolicy,
}

impl<S: PriceDataSource> GuardedSource<S> {
    pub fn new(inner: S, policy: FetchPolicy) -> Self {
        Self { inner, policy }
    }

    pub fn policy(&self) -> &FetchPolicy {
        &self.policy
    }

    async fn run<T, F, Fut>(&self, ticker: &str, mut call: F) -> Result<T, SourceError>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T, SourceError>>,
    {
        let attempts = self.policy.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            let outcome = match tokio::time::timeout(self.policy.timeout, call()).await {
                Ok(res) => res,
                Err(_) => Err(SourceError::Timeout {
                    ticker: ticker.to_string(),
                    after: self.policy.timeout,
                }),
            };

            match outcome {
                Err(e) if e.is_retryable() && attempt < attempts => {
                    tracing::warn!(%ticker, attempt, error = %e, "fetch failed, retrying");
                    tokio::time::sleep(self.policy.backoff * attempt).await;
                    attempt += 1;
                }
                other => return other,
            }
        }
    }
}

#[async_trait::async_trait]
impl<S: PriceDataSource> PriceDataSource for GuardedSource<S> {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    async fn fetch_intraday(&self, req: &IntradayRequest) -> Result<Vec<PriceSample>, SourceError> {
        self.run(&req.ticker, || self.inner.fetch_intraday(req)).await
    }

    async fn fetch_close_on_or_before(
        &self,
        ticker: &str,
        date: NaiveDate,
    ) -> Result<ReferenceClose, SourceError> {
        self.run(ticker, || self.inner.fetch_close_on_or_before(ticker, date))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    use crate::Interval;

    /// Fails with the configured error for the first `failures` calls, then
    /// sleeps `delay` and succeeds.
    struct Flaky {
        calls: AtomicU32,
        failures: u32,
        error: SourceError,
        delay: Duration,
    }

    #[async_trait::async_trait]
    impl PriceDataSource for Flaky {
        fn name(&self) -> &'static str {
            "flaky"
        }

        async fn fetch_intraday(&self, req: &IntradayRequest) -> Result<Vec<PriceSample>, SourceError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if n < self.failures {
                return Err(self.error.clone());
            }
            tokio::time::sleep(self.delay).await;
            let (start, _) = req.window();
            Ok(vec![PriceSample::new(start, 1.0)])
        }

        async fn fetch_close_on_or_before(
            &self,
            ticker: &str,
            date: NaiveDate,
        ) -> Result<ReferenceClose, SourceError> {
            Err(SourceError::unavailable(ticker, date, "unused"))
        }
    }

    fn flaky(failures: u32, error: SourceError, delay: Duration) -> Flaky {
        Flaky {
            calls: AtomicU32::new(0),
            failures,
            error,
            delay,
        }
    }

    fn req() -> IntradayRequest {
        let date = NaiveDate::from_ymd_opt(2024, 1, 8).unwrap();
        IntradayRequest::new("YPF", date, Interval::M1, chrono_tz::UTC)
    }

    fn policy(max_attempts: u32) -> FetchPolicy {
        FetchPolicy {
            timeout: Duration::from_secs(1),
            max_attempts,
            backoff: Duration::from_millis(10),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn transport_error_is_retried() {
        let src = GuardedSource::new(
            flaky(1, SourceError::Transport("reset".into()), Duration::ZERO),
            policy(2),
        );
        assert!(src.fetch_intraday(&req()).await.is_ok());
        assert_eq!(src.inner.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn unavailable_is_not_retried() {
        let day = NaiveDate::from_ymd_opt(2024, 1, 8).unwrap();
        let src = GuardedSource::new(
            flaky(5, SourceError::unavailable("YPF", day, "empty"), Duration::ZERO),
            policy(3),
        );
        let err = src.fetch_intraday(&req()).await.unwrap_err();
        assert!(matches!(err, SourceError::Unavailable { .. }));
        assert_eq!(src.inner.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_fetch_times_out_after_all_attempts() {
        let src = GuardedSource::new(
            flaky(0, SourceError::Transport("unused".into()), Duration::from_secs(5)),
            policy(2),
        );
        let err = src.fetch_intraday(&req()).await.unwrap_err();
        assert!(matches!(err, SourceError::Timeout { .. }));
        assert_eq!(src.inner.calls.load(Ordering::SeqCst), 2);
    }
}
