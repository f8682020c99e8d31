//! Frankfurter rate adapter
//!
//! Calls `GET {base_url}/latest?from=XXX&to=YYY`, which answers with
//!
//! ```json
//! {"amount": 1.0, "base": "INR", "date": "2026-01-14", "rates": {"GBP": 0.0093}}
//! ```
//!
//! # Error Handling
//!
//! Responses are mapped to `PortError` variants:
//! - 404 or 422 (unknown currency) -> `PortError::NotFound`
//! - 429 -> `PortError::RateLimited`
//! - 5xx -> `PortError::ServiceUnavailable`
//! - client timeouts -> `PortError::Timeout`
//! - unreadable bodies or missing rates -> `PortError::Transformation`

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use core_kernel::{AdapterHealth, Currency, DomainPort, HealthCheckResult, HealthCheckable, PortError};
use domain_funds::RateProvider;
use reqwest::header::{HeaderMap, ACCEPT, RETRY_AFTER};
use reqwest::{Client, StatusCode};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::{debug, instrument, warn};

/// Name reported with every quote from this source
pub const PROVIDER_NAME: &str = "frankfurter.app";

const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// Connection settings for the Frankfurter API
#[derive(Debug, Clone)]
pub struct FrankfurterConfig {
    /// API root without a trailing slash
    pub base_url: String,
    /// Whole-request timeout
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for FrankfurterConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.frankfurter.app".to_string(),
            timeout: Duration::from_millis(8000),
            connect_timeout: Duration::from_secs(4),
        }
    }
}

impl FrankfurterConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Debug, Deserialize)]
struct LatestResponse {
    date: Option<NaiveDate>,
    #[serde(default)]
    rates: HashMap<String, Decimal>,
}

/// Live rates from the Frankfurter API
#[derive(Debug, Clone)]
pub struct FrankfurterRateProvider {
    config: FrankfurterConfig,
    client: Client,
}

impl FrankfurterRateProvider {
    /// Builds the adapter and its HTTP client
    ///
    /// # Errors
    ///
    /// Returns `PortError::Connection` if the TLS backend cannot be set up.
    pub fn new(config: FrankfurterConfig) -> Result<Self, PortError> {
        let client = Client::builder()
            .user_agent(concat!("ukvi-funds-engine/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| PortError::Connection {
                message: "failed to build HTTP client".to_string(),
                source: Some(Box::new(e)),
            })?;

        Ok(Self { config, client })
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    fn latest_url(&self, from: Currency, to: Currency) -> String {
        format!(
            "{}/latest?from={}&to={}",
            self.config.base_url.trim_end_matches('/'),
            from.code(),
            to.code()
        )
    }

    fn map_send_error(&self, error: reqwest::Error, from: Currency, to: Currency) -> PortError {
        if error.is_timeout() {
            PortError::Timeout {
                operation: format!("GET latest {from}->{to}"),
                duration_ms: u64::try_from(self.config.timeout.as_millis()).unwrap_or(u64::MAX),
            }
        } else {
            PortError::Connection {
                message: format!("GET latest {from}->{to} failed"),
                source: Some(Box::new(error)),
            }
        }
    }
}

impl DomainPort for FrankfurterRateProvider {}

#[async_trait]
impl RateProvider for FrankfurterRateProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    #[instrument(skip(self), fields(provider = PROVIDER_NAME))]
    async fn latest_rate(&self, from: Currency, to: Currency) -> Result<Decimal, PortError> {
        let response = self
            .client
            .get(self.latest_url(from, to))
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| self.map_send_error(e, from, to))?;

        let status = response.status();
        if !status.is_success() {
            let error = status_to_error(status, response.headers(), from, to);
            warn!(%status, error = %error, "Rate request rejected");
            return Err(error);
        }

        let body = response
            .text()
            .await
            .map_err(|e| self.map_send_error(e, from, to))?;
        let (rate, date) = parse_latest(&body, to)?;
        debug!(%rate, ?date, "Fetched live rate");
        Ok(rate)
    }
}

#[async_trait]
impl HealthCheckable for FrankfurterRateProvider {
    /// Fetches GBP->EUR, a pair the API always carries
    async fn health_check(&self) -> HealthCheckResult {
        let start = Instant::now();
        let result = self.latest_rate(Currency::GBP, Currency::EUR).await;
        let latency_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

        let (status, message) = match result {
            Ok(_) => (AdapterHealth::Healthy, None),
            Err(e) if e.is_transient() => (AdapterHealth::Degraded, Some(e.to_string())),
            Err(e) => (AdapterHealth::Unhealthy, Some(e.to_string())),
        };

        HealthCheckResult {
            adapter_id: "frankfurter-rate-provider".to_string(),
            status,
            latency_ms,
            message,
            checked_at: Utc::now(),
        }
    }
}

/// Maps a non-success status to a port error
fn status_to_error(status: StatusCode, headers: &HeaderMap, from: Currency, to: Currency) -> PortError {
    match status {
        StatusCode::NOT_FOUND | StatusCode::UNPROCESSABLE_ENTITY => {
            PortError::not_found("Rate", format!("{from}->{to}"))
        }
        StatusCode::TOO_MANY_REQUESTS => PortError::RateLimited {
            retry_after_secs: headers
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(DEFAULT_RETRY_AFTER_SECS),
        },
        s if s.is_server_error() => PortError::ServiceUnavailable {
            service: format!("{PROVIDER_NAME} ({s})"),
        },
        s => PortError::connection(format!("{PROVIDER_NAME} returned {s}")),
    }
}

/// Extracts the `to` rate from a `/latest` body
fn parse_latest(body: &str, to: Currency) -> Result<(Decimal, Option<NaiveDate>), PortError> {
    let parsed: LatestResponse = serde_json::from_str(body)
        .map_err(|e| PortError::transformation(format!("invalid rate response: {e}")))?;

    let rate = parsed
        .rates
        .get(to.code())
        .copied()
        .ok_or_else(|| PortError::transformation(format!("response has no rate for {to}")))?;

    if rate <= Decimal::ZERO {
        return Err(PortError::transformation(format!("non-positive rate {rate} for {to}")));
    }
    Ok((rate, parsed.date))
}
