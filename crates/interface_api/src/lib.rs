//! HTTP API Layer
//!
//! This crate provides the REST API for the eligibility engine using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: report, IHS estimate, FX quote, configuration, health
//! - **Middleware**: request ids, tracing, audit logging
//! - **DTOs**: lenient form bodies converted into domain requests
//! - **Error Handling**: consistent JSON error responses
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::{create_router, AppState};
//!
//! let state = AppState::from_config(config).await?;
//! axum::serve(listener, create_router(state)).await?;
//! ```

pub mod config;
pub mod error;
pub mod middleware;
pub mod handlers;
pub mod dto;

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use core_kernel::HealthCheckable;
use domain_funds::FxConverter;
use domain_report::ReportAssembler;
use infra_fx::{FrankfurterConfig, FrankfurterRateProvider};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::config::{load_eligibility_config, ApiConfig, ConfigLoadError, RemoteConfigSource};
use crate::error::StartupError;
use crate::handlers::{config as config_handler, fx, health, ihs, report};
use crate::middleware::audit_middleware;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub assembler: Arc<ReportAssembler>,
    pub config: ApiConfig,
    /// Remote document merged into the eligibility configuration, if any
    pub remote_config_url: Option<String>,
    /// Live rate source, probed by the readiness check
    pub fx_health: Option<Arc<dyn HealthCheckable>>,
}

impl AppState {
    pub fn new(assembler: ReportAssembler, config: ApiConfig) -> Self {
        Self {
            assembler: Arc::new(assembler),
            config,
            remote_config_url: None,
            fx_health: None,
        }
    }

    pub fn with_fx_health(mut self, adapter: Arc<dyn HealthCheckable>) -> Self {
        self.fx_health = Some(adapter);
        self
    }

    /// Wires the production stack: eligibility config from disk (and the
    /// remote overlay when configured), Frankfurter rates, and "today" in the
    /// configured timezone
    ///
    /// An unreachable remote overlay is logged and the local layers are used.
    pub async fn from_config(config: ApiConfig) -> Result<Self, StartupError> {
        let path = config.eligibility_config_path.as_str();
        let (eligibility, remote_config_url) = match &config.eligibility_config_url {
            Some(url) => {
                let remote = RemoteConfigSource::new(url.clone(), config.fx_timeout())
                    .map_err(ConfigLoadError::from)?;
                match load_eligibility_config(path, Some(&remote)).await {
                    Ok(eligibility) => (eligibility, Some(url.clone())),
                    Err(e) => {
                        warn!(url = %url, error = %e, "Remote eligibility configuration unavailable, using local");
                        (load_eligibility_config(path, None).await?, None)
                    }
                }
            }
            None => (load_eligibility_config(path, None).await?, None),
        };
        let timezone = config.timezone()?;

        let provider = Arc::new(FrankfurterRateProvider::new(
            FrankfurterConfig::new(config.fx_provider_url.clone()).timeout(config.fx_timeout()),
        )?);
        let fx = FxConverter::new(provider.clone())
            .with_timezone(timezone)
            .with_timeout(config.fx_timeout());

        let assembler = ReportAssembler::new(Arc::new(eligibility), fx).with_timezone(timezone);
        let mut state = Self::new(assembler, config).with_fx_health(provider);
        state.remote_config_url = remote_config_url;
        Ok(state)
    }
}

/// Creates the main API router
///
/// # Arguments
///
/// * `state` - Shared application state
///
/// # Returns
///
/// Configured Axum router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    // Public routes
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    // Audited API routes
    let api_routes = Router::new()
        .route("/config", get(config_handler::get_config))
        .route("/fx", get(fx::get_rate))
        .route("/ihs", post(ihs::estimate_ihs))
        .route("/report", post(report::create_report))
        .layer(axum_middleware::from_fn(audit_middleware));

    Router::new()
        .merge(public_routes)
        .nest("/api", api_routes)
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
