//! IHS estimate handler

use axum::{extract::State, Json};

use crate::dto::report::{IhsResponse, ReportRequestDto};
use crate::{error::ApiError, AppState};

/// Surcharge only; tolerates missing course dates
pub async fn estimate_ihs(
    State(state): State<AppState>,
    Json(dto): Json<ReportRequestDto>,
) -> Result<Json<IhsResponse>, ApiError> {
    let request = dto.into_request()?;
    let ihs = state.assembler.estimate_ihs(&request)?;
    Ok(Json(IhsResponse { ihs }))
}
