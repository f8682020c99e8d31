//! Exchange-rate handler

use axum::{
    extract::{Query, State},
    Json,
};
use core_kernel::Currency;
use domain_funds::FxQuote;

use crate::dto::fx::FxQuery;
use crate::{error::ApiError, AppState};

/// Quotes a single rate, identity when both currencies match
///
/// Falls back to the configured manual rates, plus the legacy INR rate when
/// `manual_enabled` is set.
pub async fn get_rate(
    State(state): State<AppState>,
    Query(query): Query<FxQuery>,
) -> Result<Json<FxQuote>, ApiError> {
    let from = Currency::from_code(&query.from)?;
    let to = Currency::from_code(&query.to)?;

    let overrides = query.overrides(&state.assembler.config().fx.manual_rates);
    let quote = state
        .assembler
        .fx()
        .clone()
        .with_overrides(overrides)
        .rate(from, to)
        .await?;

    Ok(Json(quote))
}
