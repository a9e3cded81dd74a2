//! Payment handlers

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Extension, Json,
};
use chrono::Utc;

use super::{error_response, parking::parse_method};
use crate::api::dto::{ApiResponse, PaymentDto, ReceiptDto, RecordPaymentRequest};
use crate::api::router::ApiState;
use crate::application::receipt_file_name;
use crate::auth::AuthenticatedUser;

#[utoipa::path(
    get,
    path = "/api/v1/payments",
    tag = "Payments",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Caller's payments, or all payments for admins", body = ApiResponse<Vec<PaymentDto>>)
    )
)]
pub async fn list_payments(
    State(state): State<ApiState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<ApiResponse<Vec<PaymentDto>>>, (StatusCode, Json<ApiResponse<Vec<PaymentDto>>>)> {
    let payments = if user.is_admin() {
        state.store.list_payments().await
    } else {
        state.store.list_payments_for_operator(&user.user_id).await
    }
    .map_err(error_response)?;

    let items = payments.into_iter().map(PaymentDto::from_domain).collect();
    Ok(Json(ApiResponse::success(items)))
}

#[utoipa::path(
    post,
    path = "/api/v1/payments",
    tag = "Payments",
    security(("bearer_auth" = [])),
    request_body = RecordPaymentRequest,
    responses(
        (status = 201, description = "Payment recorded against a released record", body = ApiResponse<PaymentDto>),
        (status = 409, description = "Record still active or already paid")
    )
)]
pub async fn record_payment(
    State(state): State<ApiState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<RecordPaymentRequest>,
) -> Result<(StatusCode, Json<ApiResponse<PaymentDto>>), (StatusCode, Json<ApiResponse<PaymentDto>>)>
{
    let method = parse_method(&request.method).map_err(error_response)?;
    let payment = state
        .billing
        .record_payment(&user.actor(), &request.record_id, method, Utc::now())
        .await
        .map_err(error_response)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(PaymentDto::from_domain(payment))),
    ))
}

/// Receipt download. Served as a JSON attachment so clients save it
/// under the canonical `receipt-<payment id>.json` name.
#[utoipa::path(
    get,
    path = "/api/v1/payments/{id}/receipt",
    tag = "Payments",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Payment ID")),
    responses(
        (status = 200, description = "Receipt with vehicle and duration details", body = ReceiptDto),
        (status = 404, description = "Not found")
    )
)]
pub async fn download_receipt(
    State(state): State<ApiState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, Json<ApiResponse<ReceiptDto>>)> {
    let receipt = state
        .reports
        .receipt(&user.actor(), &id)
        .await
        .map_err(error_response)?;

    let disposition = format!("attachment; filename=\"{}\"", receipt_file_name(&id));
    Ok((
        [(header::CONTENT_DISPOSITION, disposition)],
        Json(ReceiptDto::from_domain(receipt)),
    ))
}
