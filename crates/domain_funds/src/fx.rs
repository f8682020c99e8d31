//! Currency conversion for submitted funds
//!
//! Rates come from an injected [`RateProvider`] (the live source) and are
//! memoised in a [`RateCache`] until the next local midnight. When the live
//! source fails or is too slow, caller-supplied manual rates are used instead.
//!
//! Lookup order for a pair:
//!
//! 1. identical currencies (rate 1)
//! 2. today's cached rate
//! 3. the provider, bounded by a timeout
//! 4. manual overrides
//!
//! If none of these produce a rate the pair fails with an [`FxError`]; the
//! caller decides what that means for the row.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use core_kernel::{Clock, Currency, DomainPort, PortError, SystemClock, Timezone};
use futures::future::join_all;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tracing::{debug, instrument, warn};

use crate::error::FxError;

/// Default bound on a single live rate fetch
pub const DEFAULT_FX_TIMEOUT: Duration = Duration::from_millis(8000);

/// Port for a live exchange-rate source
#[async_trait]
pub trait RateProvider: DomainPort {
    /// Short name reported alongside quotes, e.g. "frankfurter.app"
    fn name(&self) -> &str;

    /// Units of `to` per one unit of `from`
    async fn latest_rate(&self, from: Currency, to: Currency) -> Result<Decimal, PortError>;
}

/// Cache key: one rate per pair per local day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RateKey {
    pub day: NaiveDate,
    pub from: Currency,
    pub to: Currency,
}

/// Memo of fetched rates
///
/// Concurrent lookups for the same key may both miss and both store; the
/// stored values are the same rate so the race is harmless.
pub trait RateCache: Send + Sync {
    fn get(&self, key: &RateKey, now: DateTime<Utc>) -> Option<Decimal>;
    fn put(&self, key: RateKey, rate: Decimal, expires_at: DateTime<Utc>);
}

#[derive(Debug, Clone, Copy)]
struct CachedRate {
    rate: Decimal,
    expires_at: DateTime<Utc>,
}

/// Process-local rate cache
#[derive(Debug, Default)]
pub struct InMemoryRateCache {
    entries: RwLock<HashMap<RateKey, CachedRate>>,
}

impl InMemoryRateCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl RateCache for InMemoryRateCache {
    fn get(&self, key: &RateKey, now: DateTime<Utc>) -> Option<Decimal> {
        let entries = self.entries.read().ok()?;
        entries
            .get(key)
            .filter(|cached| cached.expires_at > now)
            .map(|cached| cached.rate)
    }

    fn put(&self, key: RateKey, rate: Decimal, expires_at: DateTime<Utc>) {
        if let Ok(mut entries) = self.entries.write() {
            // Yesterday's rates are never read again
            entries.retain(|k, _| k.day >= key.day);
            entries.insert(key, CachedRate { rate, expires_at });
        }
    }
}

/// Caller-supplied fallback rates, in GBP per one unit of each currency
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ManualFxOverrides(HashMap<Currency, Decimal>);

impl ManualFxOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a rate; non-positive rates are ignored
    pub fn with_rate(mut self, currency: Currency, base_per_unit: Decimal) -> Self {
        if base_per_unit > Decimal::ZERO {
            self.0.insert(currency, base_per_unit);
        }
        self
    }

    /// Adds an INR rate given the usual "rupees per pound" quote
    pub fn with_inr_per_gbp(self, inr_per_gbp: Decimal) -> Self {
        if inr_per_gbp <= Decimal::ZERO {
            return self;
        }
        self.with_rate(Currency::INR, Decimal::ONE / inr_per_gbp)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Layers `other` on top; its rates win where both define a currency
    pub fn merge(mut self, other: &ManualFxOverrides) -> Self {
        self.0.extend(other.0.iter().map(|(c, r)| (*c, *r)));
        self
    }

    fn base_value(&self, currency: Currency, base: Currency) -> Option<Decimal> {
        if currency == base {
            Some(Decimal::ONE)
        } else {
            self.0.get(&currency).copied()
        }
    }

    /// Units of `to` per unit of `from`, crossing through the base currency
    pub fn rate(&self, from: Currency, to: Currency, base: Currency) -> Option<Decimal> {
        let from_value = self.base_value(from, base)?;
        let to_value = self.base_value(to, base)?;
        from_value.checked_div(to_value)
    }
}

/// Where a quoted rate came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateSource {
    Identity,
    Cache,
    Live,
    Manual,
}

/// A resolved exchange rate
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FxQuote {
    pub from: Currency,
    pub to: Currency,
    /// Units of `to` per unit of `from`, unrounded
    pub rate: Decimal,
    pub source: RateSource,
    pub provider: Option<String>,
    /// Local day the rate applies to
    pub date: NaiveDate,
}

/// Converts amounts between currencies for one report
///
/// Cloning is cheap; the provider, cache, and clock are shared. Overrides
/// belong to a single request, so attach them to a clone.
#[derive(Clone)]
pub struct FxConverter {
    provider: Option<Arc<dyn RateProvider>>,
    cache: Arc<dyn RateCache>,
    clock: Arc<dyn Clock>,
    timezone: Timezone,
    timeout: Duration,
    overrides: ManualFxOverrides,
    base: Currency,
}

impl FxConverter {
    /// A converter with no live source; only identity and manual rates resolve
    pub fn offline() -> Self {
        Self {
            provider: None,
            cache: Arc::new(InMemoryRateCache::new()),
            clock: Arc::new(SystemClock),
            timezone: Timezone::default(),
            timeout: DEFAULT_FX_TIMEOUT,
            overrides: ManualFxOverrides::default(),
            base: Currency::GBP,
        }
    }

    pub fn new(provider: Arc<dyn RateProvider>) -> Self {
        Self::offline().with_provider(provider)
    }

    pub fn with_provider(mut self, provider: Arc<dyn RateProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn with_cache(mut self, cache: Arc<dyn RateCache>) -> Self {
        self.cache = cache;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_timezone(mut self, timezone: Timezone) -> Self {
        self.timezone = timezone;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_overrides(mut self, overrides: ManualFxOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    pub fn base(&self) -> Currency {
        self.base
    }

    pub fn provider_name(&self) -> Option<&str> {
        self.provider.as_deref().map(|p| p.name())
    }

    /// Resolves the rate for one pair
    #[instrument(skip_all, fields(from = %from, to = %to))]
    pub async fn rate(&self, from: Currency, to: Currency) -> Result<FxQuote, FxError> {
        let now = self.clock.now();
        let day = self.timezone.date_at(now);
        let quote = |rate, source, provider: Option<String>| FxQuote {
            from,
            to,
            rate,
            source,
            provider,
            date: day,
        };

        if from == to {
            return Ok(quote(Decimal::ONE, RateSource::Identity, None));
        }

        let key = RateKey { day, from, to };
        let provider_name = self.provider_name().map(str::to_string);
        if let Some(rate) = self.cache.get(&key, now) {
            debug!("Rate served from cache");
            return Ok(quote(rate, RateSource::Cache, provider_name));
        }

        let live_failure = match &self.provider {
            Some(provider) => match self.fetch_live(provider.as_ref(), from, to).await {
                Ok(rate) => {
                    self.cache.put(key, rate, self.timezone.next_midnight(now));
                    return Ok(quote(rate, RateSource::Live, provider_name));
                }
                Err(err) => {
                    warn!(error = %err, "Live rate lookup failed");
                    Some(err)
                }
            },
            None => None,
        };

        if let Some(rate) = self.overrides.rate(from, to, self.base) {
            debug!(%rate, "Using manual rate");
            return Ok(quote(rate, RateSource::Manual, None));
        }

        Err(match live_failure {
            Some(source) => FxError::Port { from, to, source },
            None => FxError::unavailable(from, to, "no live provider or manual rate"),
        })
    }

    async fn fetch_live(
        &self,
        provider: &dyn RateProvider,
        from: Currency,
        to: Currency,
    ) -> Result<Decimal, PortError> {
        let rate = tokio::time::timeout(self.timeout, provider.latest_rate(from, to))
            .await
            .map_err(|_| PortError::Timeout {
                operation: format!("{} {from}->{to}", provider.name()),
                duration_ms: self.timeout.as_millis() as u64,
            })??;
        if rate <= Decimal::ZERO {
            return Err(PortError::transformation(format!(
                "non-positive rate {rate} for {from}->{to}"
            )));
        }
        Ok(rate)
    }

    /// Resolves rates from each distinct currency to `to`, concurrently
    pub async fn rates_to<I>(&self, currencies: I, to: Currency) -> HashMap<Currency, Result<FxQuote, FxError>>
    where
        I: IntoIterator<Item = Currency>,
    {
        let distinct: BTreeSet<Currency> = currencies.into_iter().collect();
        let lookups = distinct.iter().map(|&from| async move { (from, self.rate(from, to).await) });
        join_all(lookups).await.into_iter().collect()
    }
}

impl std::fmt::Debug for FxConverter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FxConverter")
            .field("provider", &self.provider_name())
            .field("timezone", &self.timezone)
            .field("timeout", &self.timeout)
            .field("overrides", &self.overrides)
            .field("base", &self.base)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use core_kernel::FixedClock;
    use rust_decimal_macros::dec;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingProvider {
        rate: Result<Decimal, ()>,
        calls: AtomicUsize,
    }

    impl DomainPort for CountingProvider {}

    #[async_trait]
    impl RateProvider for CountingProvider {
        fn name(&self) -> &str {
            "counting"
        }

        async fn latest_rate(&self, from: Currency, to: Currency) -> Result<Decimal, PortError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.rate
                .map_err(|_| PortError::not_found("Rate", format!("{from}->{to}")))
        }
    }

    fn clock_at(hour: u32) -> Arc<dyn Clock> {
        Arc::new(FixedClock(Utc.with_ymd_and_hms(2026, 1, 15, hour, 0, 0).unwrap()))
    }

    #[test]
    fn test_manual_cross_rates() {
        let overrides = ManualFxOverrides::new()
            .with_rate(Currency::USD, dec!(0.8))
            .with_inr_per_gbp(dec!(100));
        let gbp = Currency::GBP;
        assert_eq!(overrides.rate(Currency::USD, gbp, gbp), Some(dec!(0.8)));
        assert_eq!(overrides.rate(gbp, Currency::INR, gbp), Some(dec!(100)));
        assert_eq!(overrides.rate(Currency::USD, Currency::INR, gbp), Some(dec!(80)));
        assert_eq!(overrides.rate(Currency::EUR, gbp, gbp), None);
    }

    #[test]
    fn test_non_positive_overrides_ignored() {
        let overrides = ManualFxOverrides::new()
            .with_rate(Currency::USD, dec!(0))
            .with_inr_per_gbp(dec!(-5));
        assert!(overrides.is_empty());
    }

    #[tokio::test]
    async fn test_identity_needs_no_provider() {
        let quote = FxConverter::offline().rate(Currency::GBP, Currency::GBP).await.unwrap();
        assert_eq!(quote.rate, Decimal::ONE);
        assert_eq!(quote.source, RateSource::Identity);
    }

    #[tokio::test]
    async fn test_live_rate_cached_for_the_day() {
        let provider = Arc::new(CountingProvider {
            rate: Ok(dec!(0.0095)),
            calls: AtomicUsize::new(0),
        });
        let cache = Arc::new(InMemoryRateCache::new());
        let fx = FxConverter::new(provider.clone())
            .with_cache(cache.clone())
            .with_clock(clock_at(9));

        let first = fx.rate(Currency::INR, Currency::GBP).await.unwrap();
        let second = fx.rate(Currency::INR, Currency::GBP).await.unwrap();

        assert_eq!(first.source, RateSource::Live);
        assert_eq!(second.source, RateSource::Cache);
        assert_eq!(second.rate, dec!(0.0095));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_cache_expires_at_local_midnight() {
        let provider = Arc::new(CountingProvider {
            rate: Ok(dec!(0.8)),
            calls: AtomicUsize::new(0),
        });
        let cache: Arc<dyn RateCache> = Arc::new(InMemoryRateCache::new());
        let tz: Timezone = "Asia/Kolkata".parse().unwrap();

        let morning = FxConverter::new(provider.clone())
            .with_cache(cache.clone())
            .with_timezone(tz)
            .with_clock(clock_at(9));
        morning.rate(Currency::USD, Currency::GBP).await.unwrap();

        // 19:00 UTC is past midnight in India
        let next_day = morning.clone().with_clock(clock_at(19));
        let quote = next_day.rate(Currency::USD, Currency::GBP).await.unwrap();
        assert_eq!(quote.source, RateSource::Live);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_provider_failure_falls_back_to_manual() {
        let provider = Arc::new(CountingProvider {
            rate: Err(()),
            calls: AtomicUsize::new(0),
        });
        let fx = FxConverter::new(provider)
            .with_overrides(ManualFxOverrides::new().with_inr_per_gbp(dec!(110)));

        let quote = fx.rate(Currency::INR, Currency::GBP).await.unwrap();
        assert_eq!(quote.source, RateSource::Manual);
        assert_eq!(quote.rate, Decimal::ONE / dec!(110));
    }

    #[tokio::test]
    async fn test_provider_failure_without_manual_is_error() {
        let provider = Arc::new(CountingProvider {
            rate: Err(()),
            calls: AtomicUsize::new(0),
        });
        let err = FxConverter::new(provider)
            .rate(Currency::NGN, Currency::GBP)
            .await
            .unwrap_err();
        assert_eq!(err.currency(), Currency::NGN);
        assert!(matches!(err, FxError::Port { .. }));
    }

    #[tokio::test]
    async fn test_rates_to_deduplicates() {
        let provider = Arc::new(CountingProvider {
            rate: Ok(dec!(0.85)),
            calls: AtomicUsize::new(0),
        });
        let fx = FxConverter::new(provider.clone());
        let rates = fx
            .rates_to(
                [Currency::EUR, Currency::EUR, Currency::GBP, Currency::EUR],
                Currency::GBP,
            )
            .await;
        assert_eq!(rates.len(), 2);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }
}
