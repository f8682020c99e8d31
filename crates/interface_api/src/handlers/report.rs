//! Report handler

use axum::{extract::State, Json};
use domain_report::Report;

use crate::dto::report::ReportRequestDto;
use crate::{error::ApiError, AppState};

/// Builds the full eligibility report
pub async fn create_report(
    State(state): State<AppState>,
    Json(dto): Json<ReportRequestDto>,
) -> Result<Json<Report>, ApiError> {
    let request = dto.into_request()?;
    let report = state.assembler.assemble(&request).await?;
    Ok(Json(report))
}
