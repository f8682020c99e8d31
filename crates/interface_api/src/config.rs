//! API configuration
//!
//! Two sources:
//!
//! - [`ApiConfig`]: server settings from `API_*` environment variables
//! - [`EligibilityConfig`]: Home Office rates from a JSON file, optionally
//!   overlaid by a remote JSON document, with `UKVI__*` environment overrides
//!   (e.g. `UKVI__FEES__DEFAULT_BUFFER_GBP=500`)

use async_trait::async_trait;
use config::builder::AsyncState;
use config::{
    AsyncSource, Config, ConfigBuilder, ConfigError, Environment, File, FileFormat, Format, Map,
    Value,
};
use core_kernel::{TemporalError, Timezone};
use domain_report::{EligibilityConfig, ReportError};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

/// API configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Log level
    pub log_level: String,
    /// Emit logs as JSON lines
    pub log_json: bool,
    /// Path of the eligibility configuration JSON
    pub eligibility_config_path: String,
    /// Remote JSON merged over the local file when set
    pub eligibility_config_url: Option<String>,
    /// IANA timezone used to resolve "today"
    pub timezone: String,
    /// Root URL of the Frankfurter rate API
    pub fx_provider_url: String,
    /// Bound on a single live rate lookup
    pub fx_timeout_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            log_level: "info".to_string(),
            log_json: false,
            eligibility_config_path: "config/ukvi_config.json".to_string(),
            eligibility_config_url: None,
            timezone: "Asia/Kolkata".to_string(),
            fx_provider_url: "https://api.frankfurter.app".to_string(),
            fx_timeout_ms: 8000,
        }
    }
}

impl ApiConfig {
    /// Loads configuration from environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(Environment::with_prefix("API").try_parsing(true))
            .build()?
            .try_deserialize()
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn timezone(&self) -> Result<Timezone, TemporalError> {
        self.timezone.parse()
    }

    pub fn fx_timeout(&self) -> Duration {
        Duration::from_millis(self.fx_timeout_ms)
    }
}

/// Errors loading the eligibility configuration
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("Failed to read eligibility configuration: {0}")]
    Source(#[from] ConfigError),

    #[error(transparent)]
    Invalid(#[from] ReportError),
}

/// Eligibility overrides published at a URL
///
/// The document has the shape of the local file; tables merge key by key so
/// a remote `routes` entry adds to or replaces single routes.
#[derive(Debug, Clone)]
pub struct RemoteConfigSource {
    url: String,
    client: reqwest::Client,
}

impl RemoteConfigSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, ConfigError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ConfigError::Foreign(Box::new(e)))?;
        Ok(Self {
            url: url.into(),
            client,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl AsyncSource for RemoteConfigSource {
    async fn collect(&self) -> Result<Map<String, Value>, ConfigError> {
        debug!(url = %self.url, "Fetching remote eligibility configuration");
        let text = self
            .client
            .get(&self.url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| ConfigError::Foreign(Box::new(e)))?
            .text()
            .await
            .map_err(|e| ConfigError::Foreign(Box::new(e)))?;

        Format::parse(&FileFormat::Json, Some(&self.url), &text).map_err(ConfigError::Foreign)
    }
}

/// `UKVI__`-prefixed overrides, e.g. `UKVI__IHS__STUDENT_YEARLY_GBP=800`
pub fn ukvi_environment() -> Environment {
    Environment::with_prefix("UKVI")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

/// Loads the eligibility configuration
///
/// Layers, later wins: built-in defaults, the JSON file at `path` (optional),
/// the `remote` document when given, then `UKVI__`-prefixed environment
/// variables. The result is validated.
pub async fn load_eligibility_config(
    path: &str,
    remote: Option<&RemoteConfigSource>,
) -> Result<EligibilityConfig, ConfigLoadError> {
    load_layers(path, remote, ukvi_environment()).await
}

async fn load_layers(
    path: &str,
    remote: Option<&RemoteConfigSource>,
    environment: Environment,
) -> Result<EligibilityConfig, ConfigLoadError> {
    let defaults = Config::try_from(&EligibilityConfig::default())?;

    let mut builder = ConfigBuilder::<AsyncState>::default()
        .add_source(defaults)
        .add_source(File::new(path, FileFormat::Json).required(false));
    if let Some(remote) = remote {
        builder = builder.add_async_source(remote.clone());
    }

    let config: EligibilityConfig = builder
        .add_source(environment)
        .build()
        .await?
        .try_deserialize()?;

    config.validate()?;
    info!(
        path,
        remote = remote.map(RemoteConfigSource::url),
        routes = ?config.routes.keys().collect::<Vec<_>>(),
        "Loaded eligibility configuration"
    );
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{routing::get, Json, Router};
    use rust_decimal_macros::dec;
    use serde_json::json;
    use tokio::net::TcpListener;

    fn no_environment() -> Environment {
        ukvi_environment().source(Some(Map::new()))
    }

    /// Serves `body` at `/ukvi.json` on a loopback port
    async fn serve_json(body: serde_json::Value) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = Router::new().route(
            "/ukvi.json",
            get(move || {
                let body = body.clone();
                async move { Json(body) }
            }),
        );
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/ukvi.json")
    }

    #[test]
    fn test_defaults() {
        let config = ApiConfig::default();
        assert_eq!(config.server_addr(), "0.0.0.0:8080");
        assert_eq!(config.fx_timeout(), Duration::from_millis(8000));
        assert!(config.timezone().is_ok());
        assert!(config.eligibility_config_url.is_none());
    }

    #[tokio::test]
    async fn test_missing_file_falls_back_to_defaults() {
        let config = load_layers("does/not/exist.json", None, no_environment()).await.unwrap();
        assert_eq!(config, EligibilityConfig::default());
    }

    #[tokio::test]
    async fn test_shipped_file_matches_defaults() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../config/ukvi_config.json");
        let config = load_layers(path, None, no_environment()).await.unwrap();
        assert_eq!(config, EligibilityConfig::default());
    }

    #[tokio::test]
    async fn test_environment_overrides_ihs_rate() {
        let vars = Map::from([(
            "UKVI__IHS__STUDENT_YEARLY_GBP".to_string(),
            "800".to_string(),
        )]);
        let environment = ukvi_environment().source(Some(vars));

        let config = load_layers("does/not/exist.json", None, environment).await.unwrap();
        assert_eq!(config.ihs.rates.yearly_gbp, dec!(800));
        assert_eq!(config.ihs.rates.half_year_gbp, dec!(388));
    }

    #[tokio::test]
    async fn test_remote_document_merges_over_local() {
        let url = serve_json(json!({
            "routes": {
                "graduate": {
                    "max_months": 2,
                    "maintenance_monthly_gbp": {"london": 1483, "outside_london": 1136},
                    "dependant_monthly_gbp": {"london": 845, "outside_london": 680}
                }
            },
            "ihs": {"student_yearly_gbp": 800}
        }))
        .await;
        let remote = RemoteConfigSource::new(url, Duration::from_secs(5)).unwrap();

        let config = load_layers("does/not/exist.json", Some(&remote), no_environment())
            .await
            .unwrap();

        assert_eq!(config.routes.get("student").unwrap().max_months, 12);
        assert_eq!(config.routes.get("graduate").unwrap().max_months, 2);
        assert_eq!(config.ihs.rates.yearly_gbp, dec!(800));
        assert_eq!(config.ihs.rates.half_year_gbp, dec!(388));
    }

    #[tokio::test]
    async fn test_environment_wins_over_remote() {
        let url = serve_json(json!({ "ihs": {"student_yearly_gbp": 800} })).await;
        let remote = RemoteConfigSource::new(url, Duration::from_secs(5)).unwrap();
        let vars = Map::from([(
            "UKVI__IHS__STUDENT_YEARLY_GBP".to_string(),
            "900".to_string(),
        )]);

        let config = load_layers("does/not/exist.json", Some(&remote), ukvi_environment().source(Some(vars)))
            .await
            .unwrap();
        assert_eq!(config.ihs.rates.yearly_gbp, dec!(900));
    }

    #[tokio::test]
    async fn test_unreachable_remote_is_an_error() {
        // Bind then drop to get a port nothing listens on
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let remote =
            RemoteConfigSource::new(format!("http://{addr}/ukvi.json"), Duration::from_secs(2)).unwrap();

        let result = load_layers("does/not/exist.json", Some(&remote), no_environment()).await;
        assert!(matches!(result, Err(ConfigLoadError::Source(_))));
    }
}
