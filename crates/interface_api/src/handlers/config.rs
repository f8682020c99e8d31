//! Configuration handler

use axum::{extract::State, Json};

use crate::dto::fx::ConfigResponse;
use crate::AppState;

/// Returns the eligibility configuration in force
pub async fn get_config(State(state): State<AppState>) -> Json<ConfigResponse> {
    Json(ConfigResponse {
        config: state.assembler.config().clone(),
        source: state.config.eligibility_config_path.clone(),
        config_url: state.remote_config_url.clone(),
        timezone: state.config.timezone.clone(),
    })
}
