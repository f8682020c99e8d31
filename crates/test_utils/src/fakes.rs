//! In-memory fakes for external collaborators
//!
//! Rate providers that never touch the network, with call counters so tests
//! can assert on caching and deduplication.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use core_kernel::{Currency, DomainPort, FixedClock, PortError};
use domain_funds::RateProvider;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::fixtures::TemporalFixtures;

/// Serves fixed rates; unknown pairs are `NotFound`
#[derive(Debug, Default)]
pub struct StaticRateProvider {
    rates: HashMap<(Currency, Currency), Decimal>,
    calls: AtomicUsize,
}

impl StaticRateProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a rate for `from`->`to`, in units of `to` per unit of `from`
    pub fn with_rate(mut self, from: Currency, to: Currency, rate: Decimal) -> Self {
        self.rates.insert((from, to), rate);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn into_arc(self) -> Arc<Self> {
        Arc::new(self)
    }
}

impl DomainPort for StaticRateProvider {}

#[async_trait]
impl RateProvider for StaticRateProvider {
    fn name(&self) -> &str {
        "static"
    }

    async fn latest_rate(&self, from: Currency, to: Currency) -> Result<Decimal, PortError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.rates
            .get(&(from, to))
            .copied()
            .ok_or_else(|| PortError::not_found("Rate", format!("{from}->{to}")))
    }
}

/// Always fails as if the provider were down
#[derive(Debug, Default)]
pub struct FailingRateProvider {
    calls: AtomicUsize,
}

impl FailingRateProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl DomainPort for FailingRateProvider {}

#[async_trait]
impl RateProvider for FailingRateProvider {
    fn name(&self) -> &str {
        "failing"
    }

    async fn latest_rate(&self, _from: Currency, _to: Currency) -> Result<Decimal, PortError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(PortError::ServiceUnavailable {
            service: "failing".to_string(),
        })
    }
}

/// Answers only after `delay`, for exercising timeouts
#[derive(Debug)]
pub struct SlowRateProvider {
    delay: Duration,
    rate: Decimal,
}

impl SlowRateProvider {
    pub fn new(delay: Duration, rate: Decimal) -> Self {
        Self { delay, rate }
    }
}

impl DomainPort for SlowRateProvider {}

#[async_trait]
impl RateProvider for SlowRateProvider {
    fn name(&self) -> &str {
        "slow"
    }

    async fn latest_rate(&self, _from: Currency, _to: Currency) -> Result<Decimal, PortError> {
        tokio::time::sleep(self.delay).await;
        Ok(self.rate)
    }
}

/// A clock pinned to [`TemporalFixtures::now`]
pub fn fixed_clock() -> Arc<FixedClock> {
    Arc::new(FixedClock(TemporalFixtures::now()))
}

pub fn clock_at(instant: DateTime<Utc>) -> Arc<FixedClock> {
    Arc::new(FixedClock(instant))
}
