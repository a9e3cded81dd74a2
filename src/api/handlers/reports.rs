//! Report handlers

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Extension, Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::IntoParams;

use super::error_response;
use crate::api::dto::{ApiResponse, DailyReportDto, OperatorSummaryDto};
use crate::api::router::ApiState;
use crate::application::report_file_name;
use crate::auth::AuthenticatedUser;

#[derive(Debug, Deserialize, IntoParams)]
pub struct DailyReportParams {
    /// Report day (YYYY-MM-DD, UTC). Defaults to today.
    pub date: Option<NaiveDate>,
}

/// Daily report download. Served as a JSON attachment under the
/// canonical `parking-report-<date>.json` name.
#[utoipa::path(
    get,
    path = "/api/v1/reports/daily",
    tag = "Reports",
    security(("bearer_auth" = [])),
    params(DailyReportParams),
    responses(
        (status = 200, description = "Daily revenue and activity report", body = DailyReportDto),
        (status = 403, description = "Admin only")
    )
)]
pub async fn daily_report(
    State(state): State<ApiState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(params): Query<DailyReportParams>,
) -> Result<impl IntoResponse, (StatusCode, Json<ApiResponse<DailyReportDto>>)> {
    let date = params
        .date
        .unwrap_or_else(|| chrono::Utc::now().date_naive());

    let report = state
        .reports
        .daily_report(&user.actor(), date)
        .await
        .map_err(error_response)?;

    let disposition = format!("attachment; filename=\"{}\"", report_file_name(date));
    Ok((
        [(header::CONTENT_DISPOSITION, disposition)],
        Json(DailyReportDto::from_domain(report)),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/operators/{id}/summary",
    tag = "Operators",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Operator user ID")),
    responses(
        (status = 200, description = "Spend and activity totals for one operator", body = ApiResponse<OperatorSummaryDto>),
        (status = 403, description = "Belongs to another operator")
    )
)]
pub async fn operator_summary(
    State(state): State<ApiState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<OperatorSummaryDto>>, (StatusCode, Json<ApiResponse<OperatorSummaryDto>>)>
{
    let summary = state
        .reports
        .operator_summary(&user.actor(), &id)
        .await
        .map_err(error_response)?;

    Ok(Json(ApiResponse::success(OperatorSummaryDto::from_domain(
        summary,
    ))))
}
